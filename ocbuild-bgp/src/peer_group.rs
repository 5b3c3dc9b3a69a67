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
use crate::northbound::configuration::{BgpCfg, PeerGroupCfg, Shared};
use crate::session::SessionAttrs;
use crate::validation;

// BGP peer group, keyed by name.
#[derive(Debug)]
pub struct PeerGroup {
    attrs: PeerGroupAttrs,
    state: Option<Shared<PeerGroupCfg>>,
}

#[derive(Clone, Debug)]
pub struct PeerGroupAttrs {
    pub name: String,
    pub session: SessionAttrs,
}

// ===== impl PeerGroup =====

impl PeerGroup {
    pub fn new(name: impl Into<String>) -> PeerGroup {
        PeerGroup {
            attrs: PeerGroupAttrs {
                name: name.into(),
                session: Default::default(),
            },
            state: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.attrs.name
    }

    pub fn attrs(&self) -> &PeerGroupAttrs {
        &self.attrs
    }

    pub fn state(&self) -> Option<&Shared<PeerGroupCfg>> {
        self.state.as_ref()
    }

    pub fn is_augmented(&self) -> bool {
        self.state.is_some()
    }

    pub(crate) fn detach(&mut self, bgp: &BgpCfg) {
        let entry = bgp.peer_groups.get(&self.attrs.name);
        let owned = match (&self.state, entry) {
            (Some(state), Some(entry)) => Rc::ptr_eq(state, entry),
            _ => false,
        };
        if owned {
            self.state = None;
        }
    }
}

impl Builder for PeerGroup {
    type Attrs = PeerGroupAttrs;

    fn update(mut self, f: impl FnOnce(&mut PeerGroupAttrs)) -> Self {
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

impl Augment<BgpCfg> for PeerGroup {
    fn augment(&mut self, bgp: &mut BgpCfg) -> Result<(), Error> {
        let attrs = &self.attrs;
        node::check_unmerged(&self.state, &attrs.name)?;
        validation::validate_session(&attrs.session)?;

        let state = node::insert(
            &mut bgp.peer_groups,
            NodeKind::PeerGroup,
            &attrs.name,
            || attrs.to_cfg(),
        )?;
        self.state = Some(state);

        Debug::PeerGroupAugmented(&attrs.name, attrs.session.afi_safi).log();

        Ok(())
    }
}

impl Augment<Bgp> for PeerGroup {
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

impl WithFeature<PeerGroupCfg> for PeerGroup {
    fn with_feature<F>(&self, feature: &mut F) -> Result<(), Error>
    where
        F: Feature<PeerGroupCfg> + ?Sized,
    {
        feature::apply(
            NodeKind::PeerGroup,
            &self.attrs.name,
            self.state.as_ref(),
            feature,
        )
    }
}

// ===== impl PeerGroupAttrs =====

impl PeerGroupAttrs {
    fn to_cfg(&self) -> PeerGroupCfg {
        PeerGroupCfg {
            peer_group_name: self.name.clone(),
            session: self.session.to_cfg(),
        }
    }

    fn write_through(
        &self,
        new: PeerGroupAttrs,
        state: &Shared<PeerGroupCfg>,
    ) -> Result<PeerGroupAttrs, Error> {
        node::check_key(&self.name, &new.name)?;
        validation::validate_session(&new.session)?;

        let mut cfg = node::borrow_state(state)?;
        cfg.patch(self.to_cfg(), new.to_cfg());
        Debug::NodeUpdated(NodeKind::PeerGroup, &new.name).log();

        Ok(new)
    }
}

impl AsMut<SessionAttrs> for PeerGroupAttrs {
    fn as_mut(&mut self) -> &mut SessionAttrs {
        &mut self.session
    }
}
