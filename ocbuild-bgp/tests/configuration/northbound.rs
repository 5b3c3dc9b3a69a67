//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use ocbuild_bgp::northbound::Client;
use ocbuild_bgp::prelude::*;
use ocbuild_northbound::{Config, Error, Operation, Recorder};
use serde_json::json;

use super::global_peer_instance;

#[test]
fn test_apply() {
    ocbuild_utils::test::setup();

    let mut client = Client::new(Recorder::new(), Config::default());
    let mut ni = client.network_instance();
    let mut bgp = global_peer_instance();
    bgp.augment(&mut ni).unwrap();
    client.apply(&ni).unwrap();

    let requests = client.pusher().requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].operation, Operation::Update);
    assert_eq!(
        requests[0].path,
        "/network-instances/network-instance[name=DEFAULT]"
    );
    assert_eq!(
        requests[0].data,
        Some(json!({
            "name": "DEFAULT",
            "protocols": [{
                "identifier": "openconfig-policy-types:BGP",
                "name": "BGP",
                "bgp": {
                    "global": {
                        "as": 65001,
                        "router-id": "1.2.3.4",
                    },
                    "peer-groups": [{
                        "peer-group-name": "GLOBAL-PEER",
                        "peer-as": 65002,
                        "afi-safis": [{
                            "afi-safi-name": "openconfig-bgp-types:IPV4_UNICAST",
                            "enabled": true,
                        }],
                    }],
                },
            }],
        }))
    );
}

#[test]
fn test_apply_replace() {
    ocbuild_utils::test::setup();

    let config = r#"
        network_instance = "VRF-A"

        [push]
        operation = "replace"
    "#
    .parse::<Config>()
    .unwrap();
    let mut client = Client::new(Recorder::new(), config);
    let ni = client.network_instance();
    client.apply(&ni).unwrap();

    let requests = client.into_pusher().take_requests();
    assert_eq!(requests[0].operation, Operation::Replace);
    assert_eq!(
        requests[0].path,
        "/network-instances/network-instance[name=VRF-A]"
    );
    assert_eq!(requests[0].data, Some(json!({"name": "VRF-A"})));
}

#[test]
fn test_delete_bgp() {
    ocbuild_utils::test::setup();

    let mut client = Client::new(Recorder::new(), Config::default());
    client.delete_bgp().unwrap();

    let requests = client.pusher().requests();
    assert_eq!(requests[0].operation, Operation::Delete);
    assert_eq!(
        requests[0].path,
        concat!(
            "/network-instances/network-instance[name=DEFAULT]",
            "/protocols/protocol[identifier=BGP][name=BGP]"
        )
    );
    assert_eq!(requests[0].data, None);
}

#[test]
fn test_rejected() {
    ocbuild_utils::test::setup();

    let recorder = Recorder::new().reject("/network-instances", "read-only");
    let mut client = Client::new(recorder, Config::default());
    let ni = client.network_instance();

    let error = client.apply(&ni).unwrap_err();
    assert!(matches!(error, Error::Rejected(..)));
    assert!(client.pusher().requests().is_empty());
}
