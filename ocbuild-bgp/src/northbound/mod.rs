//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

pub mod configuration;

use ocbuild_northbound::{Config, ConfigPush, Error, Operation, Request};

use crate::debug::Debug;
use crate::northbound::configuration::NetworkInstanceCfg;

// Hands merged configuration trees to a config-push collaborator.
#[derive(Debug)]
pub struct Client<P: ConfigPush> {
    pusher: P,
    config: Config,
}

// ===== impl Client =====

impl<P> Client<P>
where
    P: ConfigPush,
{
    pub fn new(pusher: P, config: Config) -> Client<P> {
        Client { pusher, config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn pusher(&self) -> &P {
        &self.pusher
    }

    pub fn into_pusher(self) -> P {
        self.pusher
    }

    // Returns an empty tree for the configured network instance.
    pub fn network_instance(&self) -> NetworkInstanceCfg {
        NetworkInstanceCfg::new(self.config.network_instance.clone())
    }

    // Pushes the given tree using the configured operation.
    pub fn apply(&mut self, ni: &NetworkInstanceCfg) -> Result<(), Error> {
        let operation = self.config.push.operation;
        let path = network_instance_path(&ni.name);
        let mut request = Request::new(operation, path);
        if operation != Operation::Delete {
            request = request.with_data(serde_json::to_value(ni)?);
        }

        Debug::ConfigPush(&ni.name).log();
        ocbuild_northbound::push_all(&mut self.pusher, vec![request])
    }

    // Removes the configured BGP protocol instance from the device.
    pub fn delete_bgp(&mut self) -> Result<(), Error> {
        let ni_name = &self.config.network_instance;
        let name = &self.config.bgp.protocol_name;
        let path = format!(
            "{}/protocols/protocol[identifier=BGP][name={}]",
            network_instance_path(ni_name),
            name
        );

        Debug::ProtocolDelete(ni_name, name).log();
        let request = Request::new(Operation::Delete, path);
        ocbuild_northbound::push_all(&mut self.pusher, vec![request])
    }
}

// ===== helper functions =====

fn network_instance_path(name: &str) -> String {
    format!("/network-instances/network-instance[name={name}]")
}
