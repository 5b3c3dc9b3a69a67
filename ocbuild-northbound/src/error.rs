//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use tracing::warn;

// Northbound errors.
#[derive(Debug)]
pub enum Error {
    Serialize(serde_json::Error),
    Rejected(String, String),
    ConfigLoad(String, std::io::Error),
    ConfigParse(String, toml::de::Error),
}

// ===== impl Error =====

impl Error {
    pub fn log(&self) {
        match self {
            Error::Serialize(error) => {
                warn!(%error, "{}", self);
            }
            Error::Rejected(path, reason) => {
                warn!(%path, %reason, "{}", self);
            }
            Error::ConfigLoad(path, error) => {
                warn!(%path, %error, "{}", self);
            }
            Error::ConfigParse(path, error) => {
                warn!(%path, %error, "{}", self);
            }
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Serialize(..) => {
                write!(f, "failed to serialize configuration")
            }
            Error::Rejected(..) => {
                write!(f, "configuration rejected by the device")
            }
            Error::ConfigLoad(..) => {
                write!(f, "failed to load configuration file")
            }
            Error::ConfigParse(..) => {
                write!(f, "failed to parse configuration file")
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Serialize(error) => Some(error),
            Error::ConfigLoad(_, error) => Some(error),
            Error::ConfigParse(_, error) => Some(error),
            Error::Rejected(..) => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Error {
        Error::Serialize(error)
    }
}
