//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

//! Feature extension protocol.
//!
//! A [`Feature`] extends the subtree of a node after that node was merged
//! into its parent. The node itself knows nothing about the feature's type:
//! [`WithFeature::with_feature`] hands the live merged configuration to the
//! feature and returns whatever error the feature produced.
//!
//! Closures taking the merged configuration are features too, so one-off
//! extensions don't need a dedicated type.

use std::time::Duration;

use derive_new::new;
use ocbuild_utils::bgp::AfiSafi;

use crate::debug::Debug;
use crate::error::{Error, NodeKind};
use crate::node;
use crate::northbound::configuration::{
    AddPathsCfg, BgpCfg, GracefulRestartCfg, NeighborCfg, PeerGroupCfg,
    RouteReflectorCfg, SessionCfg, Shared,
};
use crate::session::{flag, nonzero, seconds, whole_seconds};
use crate::validation::ValidationError;

// Opaque error returned by a feature.
pub type FeatureError = Box<dyn std::error::Error + Send + Sync>;

// Extension applied to the merged configuration of a node.
pub trait Feature<C: ?Sized> {
    fn augment(&mut self, cfg: &mut C) -> Result<(), FeatureError>;
}

// Nodes that accept features once merged.
pub trait WithFeature<C> {
    // Applies `feature` to the live merged configuration of this node.
    //
    // Does nothing on an absent node. Fails with `Error::InvalidArgument` if
    // the node hasn't been merged yet.
    fn with_feature<F>(&self, feature: &mut F) -> Result<(), Error>
    where
        F: Feature<C> + ?Sized;
}

// Graceful restart for a single neighbor or peer group. The restart time is
// sent in whole seconds, saturating at `u16::MAX`.
#[derive(Clone, Copy, Debug, Default, new)]
pub struct PeerGracefulRestart {
    pub restart_time: Duration,
    pub stale_routes_time: Duration,
    #[new(default)]
    pub helper_only: bool,
}

// ADD-PATH capability for one address family.
#[derive(Clone, Copy, Debug, new)]
pub struct AddPaths {
    pub afi_safi: AfiSafi,
    #[new(default)]
    pub receive: bool,
    #[new(default)]
    pub send: bool,
    #[new(default)]
    pub send_max: u8,
}

// Marks the peers as route-reflector clients.
#[derive(Clone, Debug, Default, new)]
pub struct RouteReflectorClient {
    #[new(default)]
    pub cluster_id: Option<String>,
}

// ===== impl Feature =====

impl<C, F> Feature<C> for F
where
    C: ?Sized,
    F: FnMut(&mut C) -> Result<(), FeatureError>,
{
    fn augment(&mut self, cfg: &mut C) -> Result<(), FeatureError> {
        self(cfg)
    }
}

// ===== impl WithFeature =====

impl<C, T> WithFeature<C> for Option<T>
where
    T: WithFeature<C>,
{
    fn with_feature<F>(&self, feature: &mut F) -> Result<(), Error>
    where
        F: Feature<C> + ?Sized,
    {
        match self {
            Some(node) => node.with_feature(feature),
            None => Ok(()),
        }
    }
}

impl<C, T> WithFeature<C> for &T
where
    T: WithFeature<C> + ?Sized,
{
    fn with_feature<F>(&self, feature: &mut F) -> Result<(), Error>
    where
        F: Feature<C> + ?Sized,
    {
        (**self).with_feature(feature)
    }
}

// ===== impl PeerGracefulRestart =====

impl PeerGracefulRestart {
    fn apply(&self, session: &mut SessionCfg) {
        session.graceful_restart = Some(GracefulRestartCfg {
            enabled: Some(true),
            restart_time: whole_seconds(self.restart_time),
            stale_routes_time: seconds(self.stale_routes_time),
            helper_only: flag(self.helper_only),
        });
    }
}

impl Feature<NeighborCfg> for PeerGracefulRestart {
    fn augment(&mut self, cfg: &mut NeighborCfg) -> Result<(), FeatureError> {
        self.apply(&mut cfg.session);
        Ok(())
    }
}

impl Feature<PeerGroupCfg> for PeerGracefulRestart {
    fn augment(&mut self, cfg: &mut PeerGroupCfg) -> Result<(), FeatureError> {
        self.apply(&mut cfg.session);
        Ok(())
    }
}

// ===== impl AddPaths =====

impl AddPaths {
    fn to_cfg(&self) -> Result<AddPathsCfg, FeatureError> {
        if !self.afi_safi.is_unicast() {
            let error = ValidationError::UnsupportedAfiSafi(self.afi_safi);
            return Err(error.into());
        }

        Ok(AddPathsCfg {
            receive: flag(self.receive),
            send: flag(self.send),
            send_max: nonzero(self.send_max),
        })
    }
}

impl Feature<NeighborCfg> for AddPaths {
    fn augment(&mut self, cfg: &mut NeighborCfg) -> Result<(), FeatureError> {
        let add_paths = self.to_cfg()?;
        cfg.session.afi_safi_mut(self.afi_safi).add_paths = Some(add_paths);
        Ok(())
    }
}

impl Feature<PeerGroupCfg> for AddPaths {
    fn augment(&mut self, cfg: &mut PeerGroupCfg) -> Result<(), FeatureError> {
        let add_paths = self.to_cfg()?;
        cfg.session.afi_safi_mut(self.afi_safi).add_paths = Some(add_paths);
        Ok(())
    }
}

impl Feature<BgpCfg> for AddPaths {
    fn augment(&mut self, cfg: &mut BgpCfg) -> Result<(), FeatureError> {
        let add_paths = self.to_cfg()?;
        cfg.global.afi_safi_mut(self.afi_safi).add_paths = Some(add_paths);
        Ok(())
    }
}

// ===== impl RouteReflectorClient =====

impl RouteReflectorClient {
    pub fn with_cluster_id(mut self, cluster_id: impl Into<String>) -> Self {
        self.cluster_id = Some(cluster_id.into());
        self
    }

    fn apply(&self, session: &mut SessionCfg) {
        session.route_reflector = Some(RouteReflectorCfg {
            route_reflector_cluster_id: self.cluster_id.clone(),
            route_reflector_client: Some(true),
        });
    }
}

impl Feature<NeighborCfg> for RouteReflectorClient {
    fn augment(&mut self, cfg: &mut NeighborCfg) -> Result<(), FeatureError> {
        self.apply(&mut cfg.session);
        Ok(())
    }
}

impl Feature<PeerGroupCfg> for RouteReflectorClient {
    fn augment(&mut self, cfg: &mut PeerGroupCfg) -> Result<(), FeatureError> {
        self.apply(&mut cfg.session);
        Ok(())
    }
}

// ===== global functions =====

// Hands the merged state of a node to a feature.
pub(crate) fn apply<C, F>(
    kind: NodeKind,
    key: &str,
    state: Option<&Shared<C>>,
    feature: &mut F,
) -> Result<(), Error>
where
    F: Feature<C> + ?Sized,
{
    let Some(state) = state else {
        return Err(Error::InvalidArgument("node not augmented"));
    };
    let mut cfg = node::borrow_state(state)?;

    Debug::FeatureApply(kind, key).log();
    feature.augment(&mut cfg).map_err(Error::Feature)
}
