//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

//! Session attributes shared by neighbors and peer groups.
//!
//! [`Transport`], [`Timers`] and [`PrefixLimit`] are plain value records.
//! Their zero values mean "not set": a zero duration or a zero TCP MSS is
//! left out of the merged tree instead of being written as zero.

use std::time::Duration;

use ocbuild_utils::bgp::{AfiSafi, CommunityType, PeerType, PrivateAsRemove};

use crate::node::Builder;
use crate::northbound::configuration::{
    ApplyPolicyCfg, EbgpMultihopCfg, LoggingOptionsCfg, PrefixLimitCfg,
    SessionCfg, TimersCfg, TransportCfg,
};

// Transport session parameters.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Transport {
    pub passive_mode: bool,
    pub tcp_mss: u16,
    pub mtu_discovery: bool,
    pub local_address: Option<String>,
}

// Session timers.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Timers {
    pub minimum_advertisement_interval: Duration,
    pub hold_time: Duration,
    pub keepalive_interval: Duration,
    pub connect_retry: Duration,
}

// Maximum number of prefixes accepted from a peer.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct PrefixLimit {
    pub max_prefixes: u32,
    pub prevent_teardown: bool,
    pub restart_timer: Duration,
    // Percentage of `max_prefixes` at which a warning is raised. Values
    // above 100 are merged as 100.
    pub warning_threshold_pct: u8,
}

// Pending session attributes, recorded by the builder and turned into a
// `SessionCfg` when the node is merged.
#[derive(Clone, Debug, Default)]
pub struct SessionAttrs {
    // Single address-family selection. `None` means unset.
    pub afi_safi: Option<AfiSafi>,
    pub auth_password: String,
    pub description: String,
    pub transport: Option<Transport>,
    pub timers: Option<Timers>,
    pub local_as: u32,
    pub peer_as: u32,
    pub peer_type: Option<PeerType>,
    pub remove_private_as: Option<PrivateAsRemove>,
    pub send_community: Option<CommunityType>,
    pub prefix_limit: Option<PrefixLimit>,
    pub ebgp_multihop_ttl: u8,
    pub log_state_changes: bool,
    pub import_policy: Vec<String>,
    pub export_policy: Vec<String>,
}

// Fluent setters for the session attributes of neighbors and peer groups.
//
// All setters are no-ops when invoked on an absent node.
pub trait SessionBuilder: Builder<Attrs: AsMut<SessionAttrs>> {
    fn with_afi_safi(self, afi_safi: AfiSafi) -> Self {
        self.update(|attrs| attrs.as_mut().afi_safi = Some(afi_safi))
    }

    fn with_auth_password(self, password: impl Into<String>) -> Self {
        let password = password.into();
        self.update(|attrs| attrs.as_mut().auth_password = password)
    }

    fn with_description(self, description: impl Into<String>) -> Self {
        let description = description.into();
        self.update(|attrs| attrs.as_mut().description = description)
    }

    fn with_transport(self, transport: Transport) -> Self {
        self.update(|attrs| attrs.as_mut().transport = Some(transport))
    }

    fn with_timers(self, timers: Timers) -> Self {
        self.update(|attrs| attrs.as_mut().timers = Some(timers))
    }

    fn with_local_as(self, asn: u32) -> Self {
        self.update(|attrs| attrs.as_mut().local_as = asn)
    }

    fn with_peer_as(self, asn: u32) -> Self {
        self.update(|attrs| attrs.as_mut().peer_as = asn)
    }

    fn with_peer_type(self, peer_type: PeerType) -> Self {
        self.update(|attrs| attrs.as_mut().peer_type = Some(peer_type))
    }

    fn with_remove_private_as(self, policy: PrivateAsRemove) -> Self {
        self.update(|attrs| attrs.as_mut().remove_private_as = Some(policy))
    }

    fn with_send_community(self, community: CommunityType) -> Self {
        self.update(|attrs| attrs.as_mut().send_community = Some(community))
    }

    fn with_prefix_limit(self, prefix_limit: PrefixLimit) -> Self {
        self.update(|attrs| attrs.as_mut().prefix_limit = Some(prefix_limit))
    }

    fn with_ebgp_multihop(self, ttl: u8) -> Self {
        self.update(|attrs| attrs.as_mut().ebgp_multihop_ttl = ttl)
    }

    fn with_log_state_changes(self, enabled: bool) -> Self {
        self.update(|attrs| attrs.as_mut().log_state_changes = enabled)
    }

    // Names of the import and export policies applied to the selected
    // address family.
    fn with_apply_policy<I, E>(self, import: I, export: E) -> Self
    where
        I: IntoIterator<Item: Into<String>>,
        E: IntoIterator<Item: Into<String>>,
    {
        let import: Vec<String> = import.into_iter().map(Into::into).collect();
        let export: Vec<String> = export.into_iter().map(Into::into).collect();
        self.update(|attrs| {
            let attrs = attrs.as_mut();
            attrs.import_policy = import;
            attrs.export_policy = export;
        })
    }
}

impl<T> SessionBuilder for T where T: Builder<Attrs: AsMut<SessionAttrs>> {}

// ===== impl Transport =====

impl Transport {
    fn to_cfg(&self) -> Option<TransportCfg> {
        let cfg = TransportCfg {
            passive_mode: flag(self.passive_mode),
            tcp_mss: nonzero(self.tcp_mss),
            mtu_discovery: flag(self.mtu_discovery),
            local_address: self.local_address.clone().and_then(nonempty),
        };
        (cfg != TransportCfg::default()).then_some(cfg)
    }
}

// ===== impl Timers =====

impl Timers {
    fn to_cfg(&self) -> Option<TimersCfg> {
        let cfg = TimersCfg {
            connect_retry: seconds(self.connect_retry),
            hold_time: seconds(self.hold_time),
            keepalive_interval: seconds(self.keepalive_interval),
            minimum_advertisement_interval: seconds(
                self.minimum_advertisement_interval,
            ),
        };
        (cfg != TimersCfg::default()).then_some(cfg)
    }
}

// ===== impl PrefixLimit =====

impl PrefixLimit {
    fn to_cfg(&self) -> PrefixLimitCfg {
        PrefixLimitCfg {
            max_prefixes: nonzero(self.max_prefixes),
            prevent_teardown: flag(self.prevent_teardown),
            restart_timer: seconds(self.restart_timer),
            warning_threshold_pct: nonzero(
                self.warning_threshold_pct.min(100),
            ),
        }
    }
}

// ===== impl SessionAttrs =====

impl SessionAttrs {
    // Address family that carries the per-family attributes. A prefix limit
    // or a policy given without an address family lands under IPv4 unicast.
    pub(crate) fn effective_afi_safi(&self) -> AfiSafi {
        self.afi_safi.unwrap_or(AfiSafi::Ipv4Unicast)
    }

    pub(crate) fn to_cfg(&self) -> SessionCfg {
        let mut cfg = SessionCfg {
            description: nonempty(self.description.clone()),
            auth_password: nonempty(self.auth_password.clone()),
            local_as: nonzero(self.local_as),
            peer_as: nonzero(self.peer_as),
            peer_type: self.peer_type,
            remove_private_as: self.remove_private_as,
            send_community: self.send_community,
            transport: self.transport.as_ref().and_then(Transport::to_cfg),
            timers: self.timers.as_ref().and_then(Timers::to_cfg),
            ebgp_multihop: nonzero(self.ebgp_multihop_ttl).map(|ttl| {
                EbgpMultihopCfg {
                    enabled: Some(true),
                    multihop_ttl: Some(ttl),
                }
            }),
            logging_options: flag(self.log_state_changes).map(|enabled| {
                LoggingOptionsCfg {
                    log_neighbor_state_changes: Some(enabled),
                }
            }),
            ..Default::default()
        };

        if let Some(afi_safi) = self.afi_safi {
            cfg.afi_safi_mut(afi_safi).enabled = Some(true);
        }
        if let Some(prefix_limit) = &self.prefix_limit {
            let afi_safi = cfg.afi_safi_mut(self.effective_afi_safi());
            if let Some(unicast) = afi_safi.unicast_mut() {
                unicast.prefix_limit = Some(prefix_limit.to_cfg());
            }
        }
        if !self.import_policy.is_empty() || !self.export_policy.is_empty() {
            let afi_safi = cfg.afi_safi_mut(self.effective_afi_safi());
            afi_safi.apply_policy = Some(ApplyPolicyCfg {
                import_policy: self.import_policy.clone(),
                export_policy: self.export_policy.clone(),
            });
        }

        cfg
    }
}

// ===== helper functions =====

pub(crate) fn nonzero<T>(value: T) -> Option<T>
where
    T: Default + PartialEq,
{
    (value != T::default()).then_some(value)
}

pub(crate) fn nonempty(value: String) -> Option<String> {
    (!value.is_empty()).then_some(value)
}

pub(crate) fn flag(value: bool) -> Option<bool> {
    value.then_some(true)
}

pub(crate) fn seconds(value: Duration) -> Option<f64> {
    (!value.is_zero()).then(|| value.as_secs_f64())
}

pub(crate) fn whole_seconds(value: Duration) -> Option<u16> {
    nonzero(u16::try_from(value.as_secs()).unwrap_or(u16::MAX))
}
