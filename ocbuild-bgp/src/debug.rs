//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use itertools::Itertools;
use ocbuild_utils::bgp::AfiSafi;
use tracing::{debug, debug_span};

use crate::error::NodeKind;

// BGP configuration debug messages.
#[derive(Debug)]
pub enum Debug<'a> {
    InstanceAugmented(&'a str, &'a [&'a str], &'a [&'a str]),
    InstanceRollback(&'a str),
    PeerGroupAugmented(&'a str, Option<AfiSafi>),
    NeighborAugmented(&'a str, Option<AfiSafi>),
    NodeUpdated(NodeKind, &'a str),
    FeatureApply(NodeKind, &'a str),
    ConfigPush(&'a str),
    ProtocolDelete(&'a str, &'a str),
}

// ===== impl Debug =====

impl Debug<'_> {
    // Log debug message using the tracing API.
    pub(crate) fn log(&self) {
        match self {
            Debug::InstanceAugmented(name, peer_groups, neighbors) => {
                debug_span!("bgp", %name).in_scope(|| {
                    debug!(
                        peer_groups = %peer_groups.iter().join(","),
                        neighbors = %neighbors.iter().join(","),
                        "{}", self
                    );
                });
            }
            Debug::InstanceRollback(name) => {
                debug_span!("bgp", %name).in_scope(|| {
                    debug!("{}", self);
                });
            }
            Debug::PeerGroupAugmented(name, afi_safi) => {
                debug_span!("peer-group", %name).in_scope(|| {
                    debug!(?afi_safi, "{}", self);
                });
            }
            Debug::NeighborAugmented(address, afi_safi) => {
                debug_span!("neighbor", %address).in_scope(|| {
                    debug!(?afi_safi, "{}", self);
                });
            }
            Debug::NodeUpdated(kind, key) | Debug::FeatureApply(kind, key) => {
                debug!(%kind, %key, "{}", self);
            }
            Debug::ConfigPush(network_instance) => {
                debug_span!("northbound").in_scope(|| {
                    debug!(%network_instance, "{}", self);
                });
            }
            Debug::ProtocolDelete(network_instance, name) => {
                debug_span!("northbound").in_scope(|| {
                    debug!(%network_instance, %name, "{}", self);
                });
            }
        }
    }
}

impl std::fmt::Display for Debug<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Debug::InstanceAugmented(..) => {
                write!(f, "instance merged")
            }
            Debug::InstanceRollback(..) => {
                write!(f, "instance subtree discarded")
            }
            Debug::PeerGroupAugmented(..) => {
                write!(f, "peer group merged")
            }
            Debug::NeighborAugmented(..) => {
                write!(f, "neighbor merged")
            }
            Debug::NodeUpdated(..) => {
                write!(f, "merged node updated")
            }
            Debug::FeatureApply(..) => {
                write!(f, "applying feature")
            }
            Debug::ConfigPush(..) => {
                write!(f, "pushing configuration")
            }
            Debug::ProtocolDelete(..) => {
                write!(f, "deleting protocol instance")
            }
        }
    }
}
