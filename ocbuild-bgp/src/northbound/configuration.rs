//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

//! Merged BGP configuration tree.
//!
//! These are the structures the builders merge into and the structures
//! features mutate. They serialize to the JSON payload handed to the
//! config-push collaborator: leaf names follow OpenConfig, unset leaves are
//! omitted and keyed lists are emitted as arrays.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use derive_new::new;
use itertools::Itertools;
use ocbuild_utils::bgp::{AfiSafi, CommunityType, PeerType, PrivateAsRemove};
use ocbuild_utils::protocol::Protocol;
use ocbuild_utils::yang::ToYang;
use serde::{Serialize, Serializer};
use serde_with::skip_serializing_none;

// Reference to a position in the merged tree, shared between the tree and
// the node that was merged into it.
pub type Shared<T> = Rc<RefCell<T>>;

#[derive(Debug, Default, new)]
#[derive(Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct NetworkInstanceCfg {
    pub name: String,
    #[new(default)]
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    #[serde(serialize_with = "values")]
    pub protocols: BTreeMap<ProtocolKey, ProtocolCfg>,
}

#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, new)]
pub struct ProtocolKey {
    pub identifier: Protocol,
    pub name: String,
}

#[derive(Debug, new)]
#[derive(Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ProtocolCfg {
    #[serde(serialize_with = "identity")]
    pub identifier: Protocol,
    pub name: String,
    pub bgp: Shared<BgpCfg>,
}

#[derive(Debug, Default)]
#[derive(Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct BgpCfg {
    pub global: GlobalCfg,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    #[serde(serialize_with = "values")]
    pub peer_groups: BTreeMap<String, Shared<PeerGroupCfg>>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    #[serde(serialize_with = "values")]
    pub neighbors: BTreeMap<String, Shared<NeighborCfg>>,
}

#[skip_serializing_none]
#[derive(Debug, Default)]
#[derive(Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct GlobalCfg {
    #[serde(rename = "as")]
    pub asn: Option<u32>,
    pub router_id: Option<String>,
    pub graceful_restart: Option<GracefulRestartCfg>,
    pub external_route_distance: Option<u8>,
    pub ebgp_maximum_paths: Option<u32>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    #[serde(serialize_with = "values")]
    pub afi_safis: BTreeMap<AfiSafi, AfiSafiCfg>,
}

#[skip_serializing_none]
#[derive(Debug, Default)]
#[derive(Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct NeighborCfg {
    pub neighbor_address: String,
    pub peer_group: Option<String>,
    pub enabled: Option<bool>,
    #[serde(flatten)]
    pub session: SessionCfg,
}

#[derive(Debug, Default)]
#[derive(Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct PeerGroupCfg {
    pub peer_group_name: String,
    #[serde(flatten)]
    pub session: SessionCfg,
}

// Session attributes common to neighbors and peer groups.
#[skip_serializing_none]
#[derive(Debug, Default)]
#[derive(Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct SessionCfg {
    pub description: Option<String>,
    pub auth_password: Option<String>,
    pub local_as: Option<u32>,
    pub peer_as: Option<u32>,
    #[serde(serialize_with = "identity_opt")]
    pub peer_type: Option<PeerType>,
    #[serde(serialize_with = "identity_opt")]
    pub remove_private_as: Option<PrivateAsRemove>,
    #[serde(serialize_with = "identity_opt")]
    pub send_community: Option<CommunityType>,
    pub transport: Option<TransportCfg>,
    pub timers: Option<TimersCfg>,
    pub ebgp_multihop: Option<EbgpMultihopCfg>,
    pub logging_options: Option<LoggingOptionsCfg>,
    pub graceful_restart: Option<GracefulRestartCfg>,
    pub route_reflector: Option<RouteReflectorCfg>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    #[serde(serialize_with = "values")]
    pub afi_safis: BTreeMap<AfiSafi, AfiSafiCfg>,
}

#[skip_serializing_none]
#[derive(Debug, Default, PartialEq)]
#[derive(Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct TransportCfg {
    pub passive_mode: Option<bool>,
    pub tcp_mss: Option<u16>,
    pub mtu_discovery: Option<bool>,
    pub local_address: Option<String>,
}

// Timer values in seconds.
#[skip_serializing_none]
#[derive(Debug, Default, PartialEq)]
#[derive(Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct TimersCfg {
    pub connect_retry: Option<f64>,
    pub hold_time: Option<f64>,
    pub keepalive_interval: Option<f64>,
    pub minimum_advertisement_interval: Option<f64>,
}

#[skip_serializing_none]
#[derive(Debug, Default, PartialEq)]
#[derive(Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct EbgpMultihopCfg {
    pub enabled: Option<bool>,
    pub multihop_ttl: Option<u8>,
}

#[skip_serializing_none]
#[derive(Debug, Default, PartialEq)]
#[derive(Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct LoggingOptionsCfg {
    pub log_neighbor_state_changes: Option<bool>,
}

#[skip_serializing_none]
#[derive(Debug, Default, PartialEq)]
#[derive(Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct GracefulRestartCfg {
    pub enabled: Option<bool>,
    pub restart_time: Option<u16>,
    pub stale_routes_time: Option<f64>,
    pub helper_only: Option<bool>,
}

#[skip_serializing_none]
#[derive(Debug, Default, PartialEq)]
#[derive(Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct RouteReflectorCfg {
    pub route_reflector_cluster_id: Option<String>,
    pub route_reflector_client: Option<bool>,
}

#[skip_serializing_none]
#[derive(Debug, PartialEq, new)]
#[derive(Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct AfiSafiCfg {
    #[serde(serialize_with = "identity")]
    pub afi_safi_name: AfiSafi,
    #[new(default)]
    pub enabled: Option<bool>,
    #[new(default)]
    pub ipv4_unicast: Option<UnicastCfg>,
    #[new(default)]
    pub ipv6_unicast: Option<UnicastCfg>,
    #[new(default)]
    pub apply_policy: Option<ApplyPolicyCfg>,
    #[new(default)]
    pub add_paths: Option<AddPathsCfg>,
}

#[skip_serializing_none]
#[derive(Debug, Default, PartialEq)]
#[derive(Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct UnicastCfg {
    pub prefix_limit: Option<PrefixLimitCfg>,
}

#[skip_serializing_none]
#[derive(Debug, Default, PartialEq)]
#[derive(Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct PrefixLimitCfg {
    pub max_prefixes: Option<u32>,
    pub prevent_teardown: Option<bool>,
    pub restart_timer: Option<f64>,
    pub warning_threshold_pct: Option<u8>,
}

#[derive(Debug, Default, PartialEq)]
#[derive(Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ApplyPolicyCfg {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub import_policy: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub export_policy: Vec<String>,
}

#[skip_serializing_none]
#[derive(Debug, Default, PartialEq)]
#[derive(Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct AddPathsCfg {
    pub receive: Option<bool>,
    pub send: Option<bool>,
    pub send_max: Option<u8>,
}

// ===== impl NetworkInstanceCfg =====

impl NetworkInstanceCfg {
    // Returns the BGP container of the protocol instance with the given name.
    pub fn bgp(&self, name: &str) -> Option<Shared<BgpCfg>> {
        let key = ProtocolKey::new(Protocol::BGP, name.to_owned());
        self.protocols.get(&key).map(|protocol| protocol.bgp.clone())
    }
}

// ===== impl NeighborCfg =====

impl NeighborCfg {
    // Writes the leaves that differ between two renditions of the builder
    // attributes. Leaves set by features are kept.
    pub(crate) fn patch(&mut self, old: NeighborCfg, new: NeighborCfg) {
        patch(&mut self.peer_group, old.peer_group, new.peer_group);
        patch(&mut self.enabled, old.enabled, new.enabled);
        self.session.patch(old.session, new.session);
    }
}

// ===== impl PeerGroupCfg =====

impl PeerGroupCfg {
    pub(crate) fn patch(&mut self, old: PeerGroupCfg, new: PeerGroupCfg) {
        self.session.patch(old.session, new.session);
    }
}

// ===== impl SessionCfg =====

impl SessionCfg {
    pub(crate) fn patch(&mut self, old: SessionCfg, new: SessionCfg) {
        patch(&mut self.description, old.description, new.description);
        patch(&mut self.auth_password, old.auth_password, new.auth_password);
        patch(&mut self.local_as, old.local_as, new.local_as);
        patch(&mut self.peer_as, old.peer_as, new.peer_as);
        patch(&mut self.peer_type, old.peer_type, new.peer_type);
        patch(
            &mut self.remove_private_as,
            old.remove_private_as,
            new.remove_private_as,
        );
        patch(
            &mut self.send_community,
            old.send_community,
            new.send_community,
        );
        patch(&mut self.transport, old.transport, new.transport);
        patch(&mut self.timers, old.timers, new.timers);
        patch(&mut self.ebgp_multihop, old.ebgp_multihop, new.ebgp_multihop);
        patch(
            &mut self.logging_options,
            old.logging_options,
            new.logging_options,
        );
        patch_afi_safis(&mut self.afi_safis, old.afi_safis, new.afi_safis);
    }

    // Returns the configuration of the given address family, creating it if
    // necessary.
    pub fn afi_safi_mut(&mut self, afi_safi: AfiSafi) -> &mut AfiSafiCfg {
        self.afi_safis
            .entry(afi_safi)
            .or_insert_with(|| AfiSafiCfg::new(afi_safi))
    }
}

// ===== impl GlobalCfg =====

impl GlobalCfg {
    pub(crate) fn patch(&mut self, old: GlobalCfg, new: GlobalCfg) {
        patch(&mut self.asn, old.asn, new.asn);
        patch(&mut self.router_id, old.router_id, new.router_id);
        patch(
            &mut self.graceful_restart,
            old.graceful_restart,
            new.graceful_restart,
        );
        patch(
            &mut self.external_route_distance,
            old.external_route_distance,
            new.external_route_distance,
        );
        patch(
            &mut self.ebgp_maximum_paths,
            old.ebgp_maximum_paths,
            new.ebgp_maximum_paths,
        );
        patch_afi_safis(&mut self.afi_safis, old.afi_safis, new.afi_safis);
    }

    pub fn afi_safi_mut(&mut self, afi_safi: AfiSafi) -> &mut AfiSafiCfg {
        self.afi_safis
            .entry(afi_safi)
            .or_insert_with(|| AfiSafiCfg::new(afi_safi))
    }
}

// ===== impl AfiSafiCfg =====

impl AfiSafiCfg {
    // Returns the unicast container matching this address family.
    pub fn unicast_mut(&mut self) -> Option<&mut UnicastCfg> {
        let unicast = match self.afi_safi_name {
            AfiSafi::Ipv4Unicast => &mut self.ipv4_unicast,
            AfiSafi::Ipv6Unicast => &mut self.ipv6_unicast,
            _ => return None,
        };
        Some(unicast.get_or_insert_with(Default::default))
    }
}

// ===== helper functions =====

fn patch<T: PartialEq>(leaf: &mut T, old: T, new: T) {
    if old != new {
        *leaf = new;
    }
}

// Per-family counterpart of `patch`. The ADD-PATH container belongs to
// features and is never touched. An entry left empty is removed.
fn patch_afi_safis(
    afi_safis: &mut BTreeMap<AfiSafi, AfiSafiCfg>,
    mut old: BTreeMap<AfiSafi, AfiSafiCfg>,
    mut new: BTreeMap<AfiSafi, AfiSafiCfg>,
) {
    let keys = old.keys().chain(new.keys()).copied().unique().collect_vec();
    for afi_safi in keys {
        let old_cfg = old
            .remove(&afi_safi)
            .unwrap_or_else(|| AfiSafiCfg::new(afi_safi));
        let new_cfg = new
            .remove(&afi_safi)
            .unwrap_or_else(|| AfiSafiCfg::new(afi_safi));
        if old_cfg == new_cfg {
            continue;
        }

        let cfg = afi_safis
            .entry(afi_safi)
            .or_insert_with(|| AfiSafiCfg::new(afi_safi));
        patch(&mut cfg.enabled, old_cfg.enabled, new_cfg.enabled);
        patch(
            &mut cfg.ipv4_unicast,
            old_cfg.ipv4_unicast,
            new_cfg.ipv4_unicast,
        );
        patch(
            &mut cfg.ipv6_unicast,
            old_cfg.ipv6_unicast,
            new_cfg.ipv6_unicast,
        );
        patch(
            &mut cfg.apply_policy,
            old_cfg.apply_policy,
            new_cfg.apply_policy,
        );
        if *cfg == AfiSafiCfg::new(afi_safi) {
            afi_safis.remove(&afi_safi);
        }
    }
}

fn values<S, K, V>(
    map: &BTreeMap<K, V>,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    V: Serialize,
{
    serializer.collect_seq(map.values())
}

fn identity<S, T>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    T: ToYang,
{
    serializer.serialize_str(&value.to_yang())
}

fn identity_opt<S, T>(
    value: &Option<T>,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    T: ToYang,
{
    match value {
        Some(value) => identity(value, serializer),
        None => serializer.serialize_none(),
    }
}
