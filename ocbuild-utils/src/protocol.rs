//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::yang::ToYang;

// Protocol instances that can be configured under a network instance.
#[allow(clippy::upper_case_acronyms)]
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[derive(Deserialize, Serialize)]
pub enum Protocol {
    BGP,
}

// ===== impl Protocol =====

impl std::fmt::Display for Protocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Protocol::BGP => write!(f, "bgp"),
        }
    }
}

impl ToYang for Protocol {
    fn to_yang(&self) -> Cow<'static, str> {
        match self {
            Protocol::BGP => "openconfig-policy-types:BGP".into(),
        }
    }
}
