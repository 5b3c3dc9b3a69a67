//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use ocbuild_utils::bgp::AfiSafi;

use crate::instance::InstanceAttrs;
use crate::session::SessionAttrs;

// Cross-field checks performed before a node is merged.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ValidationError {
    PrefixLimitNotApplicable(AfiSafi),
    UnsupportedAfiSafi(AfiSafi),
}

// ===== impl ValidationError =====

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::PrefixLimitNotApplicable(..) => {
                write!(f, "prefix-limit not applicable to this address family")
            }
            ValidationError::UnsupportedAfiSafi(..) => {
                write!(f, "unsupported address family")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

// ===== global functions =====

// Checks the session attributes of a neighbor or peer group.
//
// An unset address family is accepted.
pub(crate) fn validate_session(
    attrs: &SessionAttrs,
) -> Result<(), ValidationError> {
    let Some(afi_safi) = attrs.afi_safi else {
        return Ok(());
    };

    validate_afi_safi(afi_safi)?;
    if afi_safi == AfiSafi::Ipv6Unicast && attrs.prefix_limit.is_some() {
        return Err(ValidationError::PrefixLimitNotApplicable(afi_safi));
    }

    Ok(())
}

// Checks the global attributes of a BGP instance.
pub(crate) fn validate_instance(
    attrs: &InstanceAttrs,
) -> Result<(), ValidationError> {
    attrs.afi_safis.iter().copied().try_for_each(validate_afi_safi)
}

fn validate_afi_safi(afi_safi: AfiSafi) -> Result<(), ValidationError> {
    if !afi_safi.is_unicast() {
        return Err(ValidationError::UnsupportedAfiSafi(afi_safi));
    }

    Ok(())
}
