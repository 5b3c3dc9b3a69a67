//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

//! Builder and merge behavior shared by BGP instances, peer groups and
//! neighbors.
//!
//! Builders are implemented for the node types themselves and for
//! `Option<Node>`. On `None`, every setter returns `None`, so a chain of
//! calls started on an absent node degrades into a no-op and only the
//! terminal `augment` call reports the problem.
//!
//! Once a node is merged, its setters write through to the merged tree.
//! A change the tree can't take (a key change, or one that fails
//! validation) is logged and discarded, leaving node and tree unchanged.

use std::cell::{RefCell, RefMut};
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::rc::Rc;

use crate::error::{Error, NodeKind};
use crate::northbound::configuration::Shared;

// Fluent mutation of the attributes of a node.
pub trait Builder: Sized {
    type Attrs;

    // Applies `f` to the attributes of the node and returns the node.
    fn update(self, f: impl FnOnce(&mut Self::Attrs)) -> Self;
}

// Merge of a built node into its parent.
pub trait Augment<P: ?Sized> {
    // Validates the node and inserts it into the parent's keyed collection.
    //
    // A node is merged at most once. On failure the parent is left
    // untouched.
    fn augment(&mut self, parent: &mut P) -> Result<(), Error>;
}

// ===== impl Option =====

impl<T> Builder for Option<T>
where
    T: Builder,
{
    type Attrs = T::Attrs;

    fn update(self, f: impl FnOnce(&mut T::Attrs)) -> Self {
        self.map(|node| node.update(f))
    }
}

impl<P, T> Augment<P> for Option<T>
where
    P: ?Sized,
    T: Augment<P>,
{
    fn augment(&mut self, parent: &mut P) -> Result<(), Error> {
        match self {
            Some(node) => node.augment(parent),
            None => Err(Error::InvalidArgument("absent node")),
        }
    }
}

// ===== global functions =====

// Inserts a new entry into a keyed collection of the merged tree.
//
// The configuration is only built once the key is known to be free.
pub(crate) fn insert<C>(
    collection: &mut BTreeMap<String, Shared<C>>,
    kind: NodeKind,
    key: &str,
    build: impl FnOnce() -> C,
) -> Result<Shared<C>, Error> {
    match collection.entry(key.to_owned()) {
        Entry::Occupied(_) => Err(Error::DuplicateEntry(kind, key.to_owned())),
        Entry::Vacant(entry) => {
            let state = Rc::new(RefCell::new(build()));
            entry.insert(state.clone());
            Ok(state)
        }
    }
}

// Checks that a node can still be merged.
pub(crate) fn check_unmerged<C>(
    state: &Option<Shared<C>>,
    key: &str,
) -> Result<(), Error> {
    if state.is_some() {
        return Err(Error::InvalidArgument("node already augmented"));
    }
    if key.is_empty() {
        return Err(Error::InvalidArgument("missing key"));
    }

    Ok(())
}

// Checks that a setter left the key of a merged node alone.
pub(crate) fn check_key(old: &str, new: &str) -> Result<(), Error> {
    if old != new {
        return Err(Error::InvalidArgument(
            "key of a merged node can't change",
        ));
    }

    Ok(())
}

// Mutable access to the merged configuration of a node.
pub(crate) fn borrow_state<C>(
    state: &Shared<C>,
) -> Result<RefMut<'_, C>, Error> {
    state
        .try_borrow_mut()
        .map_err(|_| Error::InvalidArgument("node state in use"))
}
