//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::rc::Rc;

use crate::debug::Debug;
use crate::error::{Error, NodeKind};
use crate::feature::{self, Feature, WithFeature};
use crate::instance::Bgp;
use crate::node::{self, Augment, Builder};
use crate::northbound::configuration::{BgpCfg, NeighborCfg, Shared};
use crate::session::SessionAttrs;
use crate::validation;

// BGP neighbor, keyed by its peer address.
#[derive(Debug)]
pub struct Neighbor {
    attrs: NeighborAttrs,
    state: Option<Shared<NeighborCfg>>,
}

#[derive(Clone, Debug)]
pub struct NeighborAttrs {
    pub address: String,
    // Not checked against the existing peer groups.
    pub peer_group: Option<String>,
    pub enabled: Option<bool>,
    pub session: SessionAttrs,
}

// Neighbor-specific setters.
pub trait NeighborBuilder: Builder<Attrs = NeighborAttrs> {
    fn with_peer_group(self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.update(|attrs| attrs.peer_group = Some(name))
    }

    fn with_enabled(self, enabled: bool) -> Self {
        self.update(|attrs| attrs.enabled = Some(enabled))
    }
}

impl<T> NeighborBuilder for T where T: Builder<Attrs = NeighborAttrs> {}

// ===== impl Neighbor =====

impl Neighbor {
    pub fn new(address: impl Into<String>) -> Neighbor {
        Neighbor {
            attrs: NeighborAttrs {
                address: address.into(),
                peer_group: None,
                enabled: None,
                session: Default::default(),
            },
            state: None,
        }
    }

    pub fn address(&self) -> &str {
        &self.attrs.address
    }

    pub fn attrs(&self) -> &NeighborAttrs {
        &self.attrs
    }

    // Merged configuration, available once the neighbor was augmented.
    pub fn state(&self) -> Option<&Shared<NeighborCfg>> {
        self.state.as_ref()
    }

    pub fn is_augmented(&self) -> bool {
        self.state.is_some()
    }

    // Forgets the merged state if it belongs to the given, discarded tree.
    pub(crate) fn detach(&mut self, bgp: &BgpCfg) {
        let entry = bgp.neighbors.get(&self.attrs.address);
        let owned = match (&self.state, entry) {
            (Some(state), Some(entry)) => Rc::ptr_eq(state, entry),
            _ => false,
        };
        if owned {
            self.state = None;
        }
    }
}

impl Builder for Neighbor {
    type Attrs = NeighborAttrs;

    fn update(mut self, f: impl FnOnce(&mut NeighborAttrs)) -> Self {
        let Some(state) = &self.state else {
            f(&mut self.attrs);
            return self;
        };

        let mut attrs = self.attrs.clone();
        f(&mut attrs);
        match self.attrs.write_through(attrs, state) {
            Ok(attrs) => self.attrs = attrs,
            Err(error) => error.log(),
        }
        self
    }
}

impl Augment<BgpCfg> for Neighbor {
    fn augment(&mut self, bgp: &mut BgpCfg) -> Result<(), Error> {
        let attrs = &self.attrs;
        node::check_unmerged(&self.state, &attrs.address)?;
        validation::validate_session(&attrs.session)?;

        let state = node::insert(
            &mut bgp.neighbors,
            NodeKind::Neighbor,
            &attrs.address,
            || attrs.to_cfg(),
        )?;
        self.state = Some(state);

        Debug::NeighborAugmented(&attrs.address, attrs.session.afi_safi).log();

        Ok(())
    }
}

impl Augment<Bgp> for Neighbor {
    fn augment(&mut self, bgp: &mut Bgp) -> Result<(), Error> {
        let Some(state) = bgp.state() else {
            return Err(Error::InvalidArgument("parent not augmented"));
        };
        let mut bgp = state
            .try_borrow_mut()
            .map_err(|_| Error::InvalidArgument("parent state in use"))?;
        self.augment(&mut *bgp)
    }
}

impl WithFeature<NeighborCfg> for Neighbor {
    fn with_feature<F>(&self, feature: &mut F) -> Result<(), Error>
    where
        F: Feature<NeighborCfg> + ?Sized,
    {
        feature::apply(
            NodeKind::Neighbor,
            &self.attrs.address,
            self.state.as_ref(),
            feature,
        )
    }
}

// ===== impl NeighborAttrs =====

impl NeighborAttrs {
    fn to_cfg(&self) -> NeighborCfg {
        NeighborCfg {
            neighbor_address: self.address.clone(),
            peer_group: self.peer_group.clone(),
            enabled: self.enabled,
            session: self.session.to_cfg(),
        }
    }

    // Writes the changes made to the attributes of a merged neighbor to its
    // merged configuration.
    fn write_through(
        &self,
        new: NeighborAttrs,
        state: &Shared<NeighborCfg>,
    ) -> Result<NeighborAttrs, Error> {
        node::check_key(&self.address, &new.address)?;
        validation::validate_session(&new.session)?;

        let mut cfg = node::borrow_state(state)?;
        cfg.patch(self.to_cfg(), new.to_cfg());
        Debug::NodeUpdated(NodeKind::Neighbor, &new.address).log();

        Ok(new)
    }
}

impl AsMut<SessionAttrs> for NeighborAttrs {
    fn as_mut(&mut self) -> &mut SessionAttrs {
        &mut self.session
    }
}
