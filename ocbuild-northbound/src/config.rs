//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

#![allow(clippy::derivable_impls)]

use serde::Deserialize;

use crate::api::Operation;
use crate::error::Error;

// Push settings shared by every configuration request.
#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub network_instance: String,
    pub bgp: Bgp,
    pub push: Push,
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Bgp {
    // Name of the BGP protocol instance.
    pub protocol_name: String,
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Push {
    pub operation: Operation,
}

// ===== impl Config =====

impl Config {
    pub const DFLT_NETWORK_INSTANCE: &'static str = "DEFAULT";

    pub fn load(config_file: &str) -> Result<Config, Error> {
        let config_str = std::fs::read_to_string(config_file)
            .map_err(|error| Error::ConfigLoad(config_file.to_owned(), error))?;
        Config::parse(config_file, &config_str)
    }

    pub(crate) fn parse(
        origin: &str,
        config_str: &str,
    ) -> Result<Config, Error> {
        toml::from_str(config_str)
            .map_err(|error| Error::ConfigParse(origin.to_owned(), error))
    }
}

impl Default for Config {
    fn default() -> Config {
        Config {
            network_instance: Config::DFLT_NETWORK_INSTANCE.to_owned(),
            bgp: Default::default(),
            push: Default::default(),
        }
    }
}

impl std::str::FromStr for Config {
    type Err = Error;

    fn from_str(config_str: &str) -> Result<Config, Error> {
        Config::parse("<string>", config_str)
    }
}

// ===== impl Bgp =====

impl Bgp {
    pub const DFLT_PROTOCOL_NAME: &'static str = "BGP";
}

impl Default for Bgp {
    fn default() -> Bgp {
        Bgp {
            protocol_name: Bgp::DFLT_PROTOCOL_NAME.to_owned(),
        }
    }
}

// ===== impl Push =====

impl Default for Push {
    fn default() -> Push {
        Push {
            operation: Operation::Update,
        }
    }
}
