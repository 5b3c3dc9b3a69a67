//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

//! Composition of OpenConfig BGP configuration trees.
//!
//! A [`Bgp`](instance::Bgp) instance, its [`PeerGroup`](peer_group::PeerGroup)s
//! and [`Neighbor`](neighbor::Neighbor)s are described through chained
//! builder calls and merged into a
//! [`NetworkInstanceCfg`](northbound::configuration::NetworkInstanceCfg)
//! with [`Augment::augment`](node::Augment::augment). Once merged, a node
//! accepts [`Feature`](feature::Feature)s that extend its part of the tree.
//!
//! ```ignore
//! use ocbuild_bgp::prelude::*;
//!
//! let mut ni = NetworkInstanceCfg::new("DEFAULT".to_owned());
//! let mut bgp = Bgp::new()
//!     .with_as(65001)
//!     .with_router_id("1.2.3.4")
//!     .add_peer_group(
//!         PeerGroup::new("GLOBAL-PEER")
//!             .with_peer_as(65002)
//!             .with_afi_safi(AfiSafi::Ipv4Unicast),
//!     );
//! bgp.augment(&mut ni)?;
//! bgp.peer_group("GLOBAL-PEER")
//!     .with_feature(&mut RouteReflectorClient::new())?;
//! ```

pub mod debug;
pub mod error;
pub mod feature;
pub mod instance;
pub mod neighbor;
pub mod node;
pub mod northbound;
pub mod peer_group;
pub mod session;
pub mod validation;

pub mod prelude {
    pub use ocbuild_utils::bgp::{
        AfiSafi, CommunityType, PeerType, PrivateAsRemove,
    };

    pub use crate::error::{Error, NodeKind};
    pub use crate::feature::{
        AddPaths, Feature, FeatureError, RouteReflectorClient, WithFeature,
    };
    pub use crate::instance::{Bgp, InstanceBuilder};
    pub use crate::neighbor::{Neighbor, NeighborBuilder};
    pub use crate::node::{Augment, Builder};
    pub use crate::northbound::configuration::{
        BgpCfg, NeighborCfg, NetworkInstanceCfg, PeerGroupCfg,
    };
    pub use crate::peer_group::PeerGroup;
    pub use crate::session::{PrefixLimit, SessionBuilder, Timers, Transport};
    pub use crate::validation::ValidationError;
}
