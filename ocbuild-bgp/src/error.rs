//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use enum_as_inner::EnumAsInner;
use tracing::{warn, warn_span};

use crate::feature::FeatureError;
use crate::validation::ValidationError;

// Configuration builder errors.
#[derive(Debug, EnumAsInner)]
pub enum Error {
    // Absent node, node merged twice, or parent not merged yet
    InvalidArgument(&'static str),
    // Cross-field checks
    ValidationFailed(ValidationError),
    // Keyed insertion
    DuplicateEntry(NodeKind, String),
    // Error returned by a feature, left untouched
    Feature(FeatureError),
}

// Kinds of configuration nodes that are merged under a key.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum NodeKind {
    Protocol,
    PeerGroup,
    Neighbor,
}

// ===== impl Error =====

impl Error {
    pub fn log(&self) {
        match self {
            Error::InvalidArgument(..) => {
                warn!("{}", self);
            }
            Error::ValidationFailed(error) => {
                warn!(%error, "{}", self);
            }
            Error::DuplicateEntry(kind, key) => match kind {
                NodeKind::Protocol => {
                    warn_span!("bgp", name = %key).in_scope(|| {
                        warn!("{}", self);
                    });
                }
                NodeKind::PeerGroup => {
                    warn_span!("peer-group", name = %key).in_scope(|| {
                        warn!("{}", self);
                    });
                }
                NodeKind::Neighbor => {
                    warn_span!("neighbor", address = %key).in_scope(|| {
                        warn!("{}", self);
                    });
                }
            },
            Error::Feature(error) => {
                warn!(error = %with_source(&**error), "feature failed");
            }
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::InvalidArgument(reason) => {
                write!(f, "invalid argument: {reason}")
            }
            Error::ValidationFailed(error) => write!(f, "{error}"),
            Error::DuplicateEntry(kind, key) => {
                write!(f, "duplicate entry: {kind} {key}")
            }
            Error::Feature(error) => write!(f, "{error}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::ValidationFailed(error) => Some(error),
            Error::Feature(error) => error.source(),
            _ => None,
        }
    }
}

impl From<ValidationError> for Error {
    fn from(error: ValidationError) -> Error {
        Error::ValidationFailed(error)
    }
}

// ===== impl NodeKind =====

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeKind::Protocol => write!(f, "protocol"),
            NodeKind::PeerGroup => write!(f, "peer-group"),
            NodeKind::Neighbor => write!(f, "neighbor"),
        }
    }
}

// ===== global functions =====

fn with_source(error: &dyn std::error::Error) -> String {
    if let Some(source) = error.source() {
        format!("{} ({})", error, with_source(source))
    } else {
        error.to_string()
    }
}
