//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

pub mod bgp;
pub mod protocol;
pub mod yang;
