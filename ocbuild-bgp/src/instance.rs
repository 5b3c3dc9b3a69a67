//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::collections::btree_map::Entry;
use std::rc::Rc;
use std::time::Duration;

use ocbuild_utils::bgp::AfiSafi;
use ocbuild_utils::protocol::Protocol;

use crate::debug::Debug;
use crate::error::{Error, NodeKind};
use crate::feature::{self, Feature, WithFeature};
use crate::neighbor::Neighbor;
use crate::node::{self, Augment, Builder};
use crate::northbound::configuration::{
    BgpCfg, GlobalCfg, GracefulRestartCfg, NetworkInstanceCfg, ProtocolCfg,
    ProtocolKey, Shared,
};
use crate::peer_group::PeerGroup;
use crate::session::{flag, nonempty, nonzero, seconds, whole_seconds};
use crate::validation;

// BGP protocol instance.
//
// Peer groups and neighbors added before the instance is merged are merged
// along with it, as a single unit. Those added afterwards are merged into
// the live tree right away.
#[derive(Debug)]
pub struct Bgp {
    attrs: InstanceAttrs,
    state: Option<Shared<BgpCfg>>,
}

#[derive(Debug)]
pub struct InstanceAttrs {
    pub name: String,
    pub asn: u32,
    // Dotted-quad format isn't checked.
    pub router_id: String,
    pub afi_safis: BTreeSet<AfiSafi>,
    pub graceful_restart: Option<GracefulRestart>,
    pub external_route_distance: u8,
    pub ebgp_maximum_paths: u32,
    pub peer_groups: Vec<PeerGroup>,
    pub neighbors: Vec<Neighbor>,
}

// Global graceful restart parameters. The restart time is sent in whole
// seconds, saturating at `u16::MAX`.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct GracefulRestart {
    pub enabled: bool,
    pub restart_time: Duration,
    pub stale_routes_time: Duration,
}

// Instance-specific setters.
pub trait InstanceBuilder: Builder<Attrs = InstanceAttrs> {
    fn with_as(self, asn: u32) -> Self {
        self.update(|attrs| attrs.asn = asn)
    }

    fn with_router_id(self, router_id: impl Into<String>) -> Self {
        let router_id = router_id.into();
        self.update(|attrs| attrs.router_id = router_id)
    }

    // Protocol instance name. Defaults to "BGP".
    fn with_name(self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.update(|attrs| attrs.name = name)
    }

    // Enables an address family globally. May be called more than once.
    fn with_global_afi_safi(self, afi_safi: AfiSafi) -> Self {
        self.update(|attrs| {
            attrs.afi_safis.insert(afi_safi);
        })
    }

    fn with_graceful_restart(self, graceful_restart: GracefulRestart) -> Self {
        self.update(|attrs| attrs.graceful_restart = Some(graceful_restart))
    }

    fn with_external_route_distance(self, distance: u8) -> Self {
        self.update(|attrs| attrs.external_route_distance = distance)
    }

    fn with_ebgp_multipath(self, maximum_paths: u32) -> Self {
        self.update(|attrs| attrs.ebgp_maximum_paths = maximum_paths)
    }

    // Adds a peer group to be merged with the instance. Absent peer groups
    // are ignored. A peer group that can't be merged into an already merged
    // instance is logged and kept unmerged.
    fn add_peer_group(self, peer_group: impl Into<Option<PeerGroup>>) -> Self {
        let peer_group = peer_group.into();
        self.update(|attrs| attrs.peer_groups.extend(peer_group))
    }

    // Adds a neighbor to be merged with the instance. Absent neighbors are
    // ignored. Otherwise behaves like `add_peer_group`.
    fn add_neighbor(self, neighbor: impl Into<Option<Neighbor>>) -> Self {
        let neighbor = neighbor.into();
        self.update(|attrs| attrs.neighbors.extend(neighbor))
    }
}

impl<T> InstanceBuilder for T where T: Builder<Attrs = InstanceAttrs> {}

// ===== impl Bgp =====

impl Bgp {
    pub const DFLT_NAME: &'static str = "BGP";

    pub fn new() -> Bgp {
        Bgp {
            attrs: InstanceAttrs {
                name: Bgp::DFLT_NAME.to_owned(),
                asn: 0,
                router_id: String::new(),
                afi_safis: Default::default(),
                graceful_restart: None,
                external_route_distance: 0,
                ebgp_maximum_paths: 0,
                peer_groups: Default::default(),
                neighbors: Default::default(),
            },
            state: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.attrs.name
    }

    pub fn attrs(&self) -> &InstanceAttrs {
        &self.attrs
    }

    pub fn state(&self) -> Option<&Shared<BgpCfg>> {
        self.state.as_ref()
    }

    pub fn is_augmented(&self) -> bool {
        self.state.is_some()
    }

    // Peer group added through `add_peer_group`.
    pub fn peer_group(&self, name: &str) -> Option<&PeerGroup> {
        self.attrs.peer_groups.iter().find(|pg| pg.name() == name)
    }

    // Neighbor added through `add_neighbor`.
    pub fn neighbor(&self, address: &str) -> Option<&Neighbor> {
        self.attrs
            .neighbors
            .iter()
            .find(|nbr| nbr.address() == address)
    }

    // Merges the pending children into a detached BGP container.
    //
    // On failure, children merged by this call are reset so that they can be
    // merged again later.
    fn build(&mut self) -> Result<BgpCfg, Error> {
        let mut bgp = BgpCfg {
            global: self.attrs.global_cfg(),
            ..Default::default()
        };

        let result = self
            .attrs
            .peer_groups
            .iter_mut()
            .try_for_each(|pg| pg.augment(&mut bgp))
            .and_then(|_| {
                self.attrs
                    .neighbors
                    .iter_mut()
                    .try_for_each(|nbr| nbr.augment(&mut bgp))
            });
        if let Err(error) = result {
            for pg in &mut self.attrs.peer_groups {
                pg.detach(&bgp);
            }
            for nbr in &mut self.attrs.neighbors {
                nbr.detach(&bgp);
            }
            Debug::InstanceRollback(&self.attrs.name).log();
            return Err(error);
        }

        Ok(bgp)
    }

    // Writes the changes made to the attributes of a merged instance to the
    // live tree and merges the children added by the change.
    fn write_through(
        &self,
        new: &mut InstanceAttrs,
        state: &Shared<BgpCfg>,
    ) -> Result<(), Error> {
        node::check_key(&self.attrs.name, &new.name)?;
        validation::validate_instance(new)?;

        let mut bgp = node::borrow_state(state)?;
        bgp.global.patch(self.attrs.global_cfg(), new.global_cfg());
        for pg in &mut new.peer_groups {
            if let Err(error) = pg.augment(&mut *bgp) {
                error.log();
            }
        }
        for nbr in &mut new.neighbors {
            if let Err(error) = nbr.augment(&mut *bgp) {
                error.log();
            }
        }
        Debug::NodeUpdated(NodeKind::Protocol, &self.attrs.name).log();

        Ok(())
    }
}

impl Default for Bgp {
    fn default() -> Bgp {
        Bgp::new()
    }
}

impl Builder for Bgp {
    type Attrs = InstanceAttrs;

    fn update(mut self, f: impl FnOnce(&mut InstanceAttrs)) -> Self {
        let Some(state) = self.state.clone() else {
            f(&mut self.attrs);
            return self;
        };

        // The change is made on a copy without children, so that the copy
        // only holds the children added by `f`.
        let mut attrs = self.attrs.globals();
        f(&mut attrs);
        if let Err(error) = self.write_through(&mut attrs, &state) {
            error.log();
            return self;
        }

        let mut old = std::mem::replace(&mut self.attrs, attrs);
        old.peer_groups.append(&mut self.attrs.peer_groups);
        old.neighbors.append(&mut self.attrs.neighbors);
        self.attrs.peer_groups = old.peer_groups;
        self.attrs.neighbors = old.neighbors;
        self
    }
}

impl Augment<NetworkInstanceCfg> for Bgp {
    fn augment(&mut self, ni: &mut NetworkInstanceCfg) -> Result<(), Error> {
        node::check_unmerged(&self.state, &self.attrs.name)?;
        validation::validate_instance(&self.attrs)?;

        let key = ProtocolKey::new(Protocol::BGP, self.attrs.name.clone());
        let entry = match ni.protocols.entry(key) {
            Entry::Occupied(_) => {
                return Err(Error::DuplicateEntry(
                    NodeKind::Protocol,
                    self.attrs.name.clone(),
                ));
            }
            Entry::Vacant(entry) => entry,
        };

        let state = Rc::new(RefCell::new(self.build()?));
        entry.insert(ProtocolCfg::new(
            Protocol::BGP,
            self.attrs.name.clone(),
            state.clone(),
        ));
        self.state = Some(state);

        let peer_groups = self
            .attrs
            .peer_groups
            .iter()
            .map(PeerGroup::name)
            .collect::<Vec<_>>();
        let neighbors = self
            .attrs
            .neighbors
            .iter()
            .map(Neighbor::address)
            .collect::<Vec<_>>();
        Debug::InstanceAugmented(&self.attrs.name, &peer_groups, &neighbors)
            .log();

        Ok(())
    }
}

impl WithFeature<BgpCfg> for Bgp {
    fn with_feature<F>(&self, feature: &mut F) -> Result<(), Error>
    where
        F: Feature<BgpCfg> + ?Sized,
    {
        feature::apply(
            NodeKind::Protocol,
            &self.attrs.name,
            self.state.as_ref(),
            feature,
        )
    }
}

// ===== impl InstanceAttrs =====

impl InstanceAttrs {
    // Copy of the global attributes, without peer groups and neighbors.
    fn globals(&self) -> InstanceAttrs {
        InstanceAttrs {
            name: self.name.clone(),
            asn: self.asn,
            router_id: self.router_id.clone(),
            afi_safis: self.afi_safis.clone(),
            graceful_restart: self.graceful_restart,
            external_route_distance: self.external_route_distance,
            ebgp_maximum_paths: self.ebgp_maximum_paths,
            peer_groups: Vec::new(),
            neighbors: Vec::new(),
        }
    }

    fn global_cfg(&self) -> GlobalCfg {
        let mut global = GlobalCfg {
            asn: nonzero(self.asn),
            router_id: nonempty(self.router_id.clone()),
            graceful_restart: self
                .graceful_restart
                .as_ref()
                .map(GracefulRestart::to_cfg),
            external_route_distance: nonzero(self.external_route_distance),
            ebgp_maximum_paths: nonzero(self.ebgp_maximum_paths),
            afi_safis: Default::default(),
        };
        for afi_safi in &self.afi_safis {
            global.afi_safi_mut(*afi_safi).enabled = Some(true);
        }
        global
    }
}

// ===== impl GracefulRestart =====

impl GracefulRestart {
    fn to_cfg(&self) -> GracefulRestartCfg {
        GracefulRestartCfg {
            enabled: flag(self.enabled),
            restart_time: whole_seconds(self.restart_time),
            stale_routes_time: seconds(self.stale_routes_time),
            helper_only: None,
        }
    }
}
