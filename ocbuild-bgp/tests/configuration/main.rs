//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

mod feature;
mod instance;
mod northbound;

use ocbuild_bgp::prelude::*;
use serde_json::Value;

//
// Helper functions.
//

fn network_instance() -> NetworkInstanceCfg {
    NetworkInstanceCfg::new("DEFAULT".to_owned())
}

// Builds the instance used by most tests: AS 65001, router-id 1.2.3.4 and
// the "GLOBAL-PEER" peer group.
fn global_peer_instance() -> Bgp {
    Bgp::new()
        .with_as(65001)
        .with_router_id("1.2.3.4")
        .add_peer_group(
            PeerGroup::new("GLOBAL-PEER")
                .with_peer_as(65002)
                .with_afi_safi(AfiSafi::Ipv4Unicast),
        )
}

fn to_json<T: serde::Serialize>(cfg: &T) -> Value {
    serde_json::to_value(cfg).unwrap()
}
