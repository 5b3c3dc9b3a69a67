//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

//! BGP enumerations shared by the configuration builders and the northbound
//! layer. Serialized names follow the OpenConfig identity names, without the
//! module prefix.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::yang::ToYang;

// Configurable (AFI,SAFI) tuples.
//
// Only the unicast families are accepted by the configuration builders. The
// remaining variants exist so that callers can express them and get a proper
// validation error back.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[derive(Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AfiSafi {
    Ipv4Unicast,
    Ipv6Unicast,
    Ipv4LabeledUnicast,
    Ipv6LabeledUnicast,
    L3vpnIpv4Unicast,
    L3vpnIpv6Unicast,
    L2vpnEvpn,
}

// BGP peer type.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[derive(Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PeerType {
    Internal,
    External,
}

// Policy for removing private AS numbers from the AS_PATH.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[derive(Deserialize, Serialize)]
pub enum PrivateAsRemove {
    #[serde(rename = "PRIVATE_AS_REMOVE_ALL")]
    RemoveAll,
    #[serde(rename = "PRIVATE_AS_REPLACE_ALL")]
    ReplaceAll,
}

// Community types sent to a peer.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[derive(Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommunityType {
    Standard,
    Extended,
    Large,
    Both,
    None,
}

// ===== impl AfiSafi =====

impl AfiSafi {
    pub const fn is_unicast(&self) -> bool {
        matches!(self, AfiSafi::Ipv4Unicast | AfiSafi::Ipv6Unicast)
    }
}

impl std::fmt::Display for AfiSafi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AfiSafi::Ipv4Unicast => write!(f, "ipv4-unicast"),
            AfiSafi::Ipv6Unicast => write!(f, "ipv6-unicast"),
            AfiSafi::Ipv4LabeledUnicast => write!(f, "ipv4-labeled-unicast"),
            AfiSafi::Ipv6LabeledUnicast => write!(f, "ipv6-labeled-unicast"),
            AfiSafi::L3vpnIpv4Unicast => write!(f, "l3vpn-ipv4-unicast"),
            AfiSafi::L3vpnIpv6Unicast => write!(f, "l3vpn-ipv6-unicast"),
            AfiSafi::L2vpnEvpn => write!(f, "l2vpn-evpn"),
        }
    }
}

impl ToYang for AfiSafi {
    fn to_yang(&self) -> Cow<'static, str> {
        match self {
            AfiSafi::Ipv4Unicast => "openconfig-bgp-types:IPV4_UNICAST".into(),
            AfiSafi::Ipv6Unicast => "openconfig-bgp-types:IPV6_UNICAST".into(),
            AfiSafi::Ipv4LabeledUnicast => {
                "openconfig-bgp-types:IPV4_LABELED_UNICAST".into()
            }
            AfiSafi::Ipv6LabeledUnicast => {
                "openconfig-bgp-types:IPV6_LABELED_UNICAST".into()
            }
            AfiSafi::L3vpnIpv4Unicast => {
                "openconfig-bgp-types:L3VPN_IPV4_UNICAST".into()
            }
            AfiSafi::L3vpnIpv6Unicast => {
                "openconfig-bgp-types:L3VPN_IPV6_UNICAST".into()
            }
            AfiSafi::L2vpnEvpn => "openconfig-bgp-types:L2VPN_EVPN".into(),
        }
    }
}

// ===== impl PeerType =====

impl ToYang for PeerType {
    fn to_yang(&self) -> Cow<'static, str> {
        match self {
            PeerType::Internal => "openconfig-bgp-types:INTERNAL".into(),
            PeerType::External => "openconfig-bgp-types:EXTERNAL".into(),
        }
    }
}

// ===== impl PrivateAsRemove =====

impl ToYang for PrivateAsRemove {
    fn to_yang(&self) -> Cow<'static, str> {
        match self {
            PrivateAsRemove::RemoveAll => {
                "openconfig-bgp-types:PRIVATE_AS_REMOVE_ALL".into()
            }
            PrivateAsRemove::ReplaceAll => {
                "openconfig-bgp-types:PRIVATE_AS_REPLACE_ALL".into()
            }
        }
    }
}

// ===== impl CommunityType =====

impl ToYang for CommunityType {
    fn to_yang(&self) -> Cow<'static, str> {
        match self {
            CommunityType::Standard => "openconfig-bgp-types:STANDARD".into(),
            CommunityType::Extended => "openconfig-bgp-types:EXTENDED".into(),
            CommunityType::Large => "openconfig-bgp-types:LARGE".into(),
            CommunityType::Both => "openconfig-bgp-types:BOTH".into(),
            CommunityType::None => "openconfig-bgp-types:NONE".into(),
        }
    }
}
