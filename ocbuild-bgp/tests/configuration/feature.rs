//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::time::Duration;

use ocbuild_bgp::feature::PeerGracefulRestart;
use ocbuild_bgp::prelude::*;
use serde_json::json;

use super::{global_peer_instance, network_instance, to_json};

#[derive(Debug)]
struct Rejected;

impl std::fmt::Display for Rejected {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "rejected by feature")
    }
}

impl std::error::Error for Rejected {}

#[test]
fn test_live_state() {
    ocbuild_utils::test::setup();

    let mut bgp = BgpCfg::default();
    let mut nbr = Neighbor::new("192.0.2.1");
    nbr.augment(&mut bgp).unwrap();

    let mut seen: *const NeighborCfg = std::ptr::null();
    nbr.with_feature(&mut |cfg: &mut NeighborCfg| -> Result<(), FeatureError> {
        seen = cfg;
        cfg.session.description = Some("added by feature".to_owned());
        Ok(())
    })
    .unwrap();

    let entry = &bgp.neighbors["192.0.2.1"];
    assert!(std::ptr::eq(seen, entry.as_ptr()));
    assert_eq!(
        entry.borrow().session.description.as_deref(),
        Some("added by feature")
    );
}

#[test]
fn test_called_once() {
    ocbuild_utils::test::setup();

    let mut bgp = BgpCfg::default();
    let mut pg = PeerGroup::new("GLOBAL-PEER");
    pg.augment(&mut bgp).unwrap();

    let mut calls = 0;
    pg.with_feature(&mut |_: &mut PeerGroupCfg| -> Result<(), FeatureError> {
        calls += 1;
        Ok(())
    })
    .unwrap();
    assert_eq!(calls, 1);
}

#[test]
fn test_unmerged_node() {
    ocbuild_utils::test::setup();

    let nbr = Neighbor::new("192.0.2.1");
    let error = nbr
        .with_feature(&mut PeerGracefulRestart::default())
        .unwrap_err();
    assert!(error.is_invalid_argument());

    let bgp = Bgp::new();
    let error = bgp
        .with_feature(&mut AddPaths::new(AfiSafi::Ipv4Unicast))
        .unwrap_err();
    assert!(error.is_invalid_argument());
}

#[test]
fn test_error_unchanged() {
    ocbuild_utils::test::setup();

    let mut bgp = BgpCfg::default();
    let mut nbr = Neighbor::new("192.0.2.1");
    nbr.augment(&mut bgp).unwrap();

    let error = nbr
        .with_feature(&mut |_: &mut NeighborCfg| -> Result<(), FeatureError> {
            Err(Box::new(Rejected))
        })
        .unwrap_err();
    error.log();
    assert_eq!(error.to_string(), "rejected by feature");

    let error = error.into_feature().unwrap();
    assert!(error.downcast_ref::<Rejected>().is_some());
}

#[test]
fn test_graceful_restart() {
    ocbuild_utils::test::setup();

    let mut bgp = BgpCfg::default();
    let mut nbr = Neighbor::new("192.0.2.1");
    nbr.augment(&mut bgp).unwrap();

    let mut feature: Box<dyn Feature<NeighborCfg>> =
        Box::new(PeerGracefulRestart::new(
            Duration::from_secs(120),
            Duration::from_secs(300),
        ));
    nbr.with_feature(&mut *feature).unwrap();

    assert_eq!(
        to_json(&*nbr.state().unwrap().borrow())["graceful-restart"],
        json!({
            "enabled": true,
            "restart-time": 120,
            "stale-routes-time": 300.0,
        })
    );
}

#[test]
fn test_add_paths() {
    ocbuild_utils::test::setup();

    let mut ni = network_instance();
    let mut bgp = global_peer_instance();
    bgp.augment(&mut ni).unwrap();

    let mut add_paths = AddPaths::new(AfiSafi::Ipv4Unicast);
    add_paths.send = true;
    add_paths.send_max = 4;
    bgp.peer_group("GLOBAL-PEER")
        .with_feature(&mut add_paths)
        .unwrap();
    bgp.with_feature(&mut add_paths).unwrap();

    let state = bgp.state().unwrap().borrow();
    let pg = state.peer_groups["GLOBAL-PEER"].borrow();
    assert_eq!(
        to_json(&pg.session.afi_safis[&AfiSafi::Ipv4Unicast]),
        json!({
            "afi-safi-name": "openconfig-bgp-types:IPV4_UNICAST",
            "enabled": true,
            "add-paths": {"send": true, "send-max": 4},
        })
    );
    assert_eq!(
        to_json(&state.global.afi_safis[&AfiSafi::Ipv4Unicast]),
        json!({
            "afi-safi-name": "openconfig-bgp-types:IPV4_UNICAST",
            "add-paths": {"send": true, "send-max": 4},
        })
    );
}

#[test]
fn test_add_paths_unsupported() {
    ocbuild_utils::test::setup();

    let mut bgp = BgpCfg::default();
    let mut nbr = Neighbor::new("192.0.2.1");
    nbr.augment(&mut bgp).unwrap();

    let error = nbr
        .with_feature(&mut AddPaths::new(AfiSafi::L2vpnEvpn))
        .unwrap_err();
    let error = error.into_feature().unwrap();
    assert_eq!(
        error.downcast_ref::<ValidationError>(),
        Some(&ValidationError::UnsupportedAfiSafi(AfiSafi::L2vpnEvpn))
    );
    assert!(bgp.neighbors["192.0.2.1"].borrow().session.afi_safis.is_empty());
}

#[test]
fn test_route_reflector_client() {
    ocbuild_utils::test::setup();

    let mut ni = network_instance();
    let nbr = Neighbor::new("192.0.2.1").with_peer_group("GLOBAL-PEER");
    let mut bgp = global_peer_instance().add_neighbor(nbr);
    bgp.augment(&mut ni).unwrap();

    let mut rr_client = RouteReflectorClient::new().with_cluster_id("10.0.0.1");
    bgp.neighbor("192.0.2.1")
        .with_feature(&mut rr_client)
        .unwrap();
    // Lookups of unknown children are absent nodes.
    bgp.neighbor("192.0.2.99")
        .with_feature(&mut rr_client)
        .unwrap();

    let bgp_cfg = ni.bgp("BGP").unwrap();
    assert_eq!(
        to_json(&*bgp_cfg.borrow())["neighbors"][0]["route-reflector"],
        json!({
            "route-reflector-cluster-id": "10.0.0.1",
            "route-reflector-client": true,
        })
    );
}
