//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::borrow::Cow;

pub trait ToYang {
    // Return the OpenConfig identity name of the value, qualified by the
    // module that defines it.
    fn to_yang(&self) -> Cow<'static, str>;
}
