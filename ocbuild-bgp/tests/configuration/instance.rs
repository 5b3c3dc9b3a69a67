//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::time::Duration;

use maplit::btreemap;
use ocbuild_bgp::instance::GracefulRestart;
use ocbuild_bgp::northbound::configuration::ProtocolKey;
use ocbuild_bgp::prelude::*;
use ocbuild_utils::protocol::Protocol;
use serde_json::json;

use super::{global_peer_instance, network_instance, to_json};

#[test]
fn test_global() {
    ocbuild_utils::test::setup();

    let mut ni = network_instance();
    let mut bgp = Bgp::new()
        .with_as(65001)
        .with_router_id("1.2.3.4")
        .with_global_afi_safi(AfiSafi::Ipv6Unicast)
        .with_global_afi_safi(AfiSafi::Ipv4Unicast)
        .with_graceful_restart(GracefulRestart {
            enabled: true,
            restart_time: Duration::from_secs(120),
            stale_routes_time: Duration::from_secs(360),
        })
        .with_external_route_distance(20)
        .with_ebgp_multipath(4);
    bgp.augment(&mut ni).unwrap();

    let state = bgp.state().unwrap().borrow();
    assert_eq!(
        to_json(&state.global),
        json!({
            "as": 65001,
            "router-id": "1.2.3.4",
            "graceful-restart": {
                "enabled": true,
                "restart-time": 120,
                "stale-routes-time": 360.0,
            },
            "external-route-distance": 20,
            "ebgp-maximum-paths": 4,
            "afi-safis": [
                {
                    "afi-safi-name": "openconfig-bgp-types:IPV4_UNICAST",
                    "enabled": true,
                },
                {
                    "afi-safi-name": "openconfig-bgp-types:IPV6_UNICAST",
                    "enabled": true,
                },
            ],
        })
    );
}

#[test]
fn test_unsupported_global_afi_safi() {
    ocbuild_utils::test::setup();

    let mut ni = network_instance();
    let mut bgp = Bgp::new()
        .with_as(65001)
        .with_global_afi_safi(AfiSafi::L2vpnEvpn);
    let error = bgp.augment(&mut ni).unwrap_err();
    assert_eq!(
        error.as_validation_failed(),
        Some(&ValidationError::UnsupportedAfiSafi(AfiSafi::L2vpnEvpn))
    );
    assert!(ni.protocols.is_empty());
    assert!(!bgp.is_augmented());
}

#[test]
fn test_duplicate_protocol() {
    ocbuild_utils::test::setup();

    let mut ni = network_instance();
    let mut bgp1 = global_peer_instance();
    let mut bgp2 = global_peer_instance();
    let mut bgp3 = Bgp::new().with_name("BGP-2").with_as(65010);

    bgp1.augment(&mut ni).unwrap();
    let error = bgp2.augment(&mut ni).unwrap_err();
    assert_eq!(
        error.as_duplicate_entry(),
        Some((&NodeKind::Protocol, &"BGP".to_owned()))
    );
    // The children of the rejected instance are left untouched.
    assert!(!bgp2.peer_group("GLOBAL-PEER").unwrap().is_augmented());
    bgp3.augment(&mut ni).unwrap();

    assert_eq!(
        ni.protocols.keys().cloned().collect::<Vec<_>>(),
        vec![
            ProtocolKey::new(Protocol::BGP, "BGP".to_owned()),
            ProtocolKey::new(Protocol::BGP, "BGP-2".to_owned()),
        ]
    );
    assert_eq!(ni.bgp("BGP-2").unwrap().borrow().global.asn, Some(65010));
}

#[test]
fn test_subtree_rollback() {
    ocbuild_utils::test::setup();

    let mut ni = network_instance();
    let mut bgp = global_peer_instance()
        .add_neighbor(Neighbor::new("192.0.2.1").with_peer_group("GLOBAL-PEER"))
        .add_neighbor(
            Neighbor::new("2001:db8::1")
                .with_afi_safi(AfiSafi::Ipv6Unicast)
                .with_prefix_limit(PrefixLimit {
                    max_prefixes: 10,
                    ..Default::default()
                }),
        );

    let error = bgp.augment(&mut ni).unwrap_err();
    assert!(error.is_validation_failed());
    assert!(ni.protocols.is_empty());
    assert!(!bgp.is_augmented());
    assert!(!bgp.peer_group("GLOBAL-PEER").unwrap().is_augmented());
    assert!(!bgp.neighbor("192.0.2.1").unwrap().is_augmented());
    assert!(!bgp.neighbor("2001:db8::1").unwrap().is_augmented());
}

#[test]
fn test_duplicate_child() {
    ocbuild_utils::test::setup();

    let mut ni = network_instance();
    let mut bgp = Bgp::new()
        .add_neighbor(Neighbor::new("192.0.2.1").with_peer_as(65002))
        .add_neighbor(Neighbor::new("192.0.2.1").with_peer_as(65003));

    let error = bgp.augment(&mut ni).unwrap_err();
    assert!(error.is_duplicate_entry());
    assert!(ni.protocols.is_empty());
    assert!(!bgp.neighbor("192.0.2.1").unwrap().is_augmented());
}

#[test]
fn test_children() {
    ocbuild_utils::test::setup();

    let mut ni = network_instance();
    let mut bgp = global_peer_instance()
        .add_neighbor(Neighbor::new("192.0.2.1").with_peer_group("GLOBAL-PEER"))
        .add_neighbor(None::<Neighbor>)
        .add_peer_group(None::<PeerGroup>);
    bgp.augment(&mut ni).unwrap();

    let bgp_cfg = ni.bgp("BGP").unwrap();
    let bgp_cfg = bgp_cfg.borrow();
    let peer_groups = bgp_cfg
        .peer_groups
        .iter()
        .map(|(name, pg)| (name.clone(), pg.borrow().session.peer_as))
        .collect::<std::collections::BTreeMap<_, _>>();
    assert_eq!(
        peer_groups,
        btreemap! {"GLOBAL-PEER".to_owned() => Some(65002)}
    );
    assert_eq!(
        bgp_cfg.neighbors["192.0.2.1"].borrow().peer_group.as_deref(),
        Some("GLOBAL-PEER")
    );

    // The merged children share their state with the tree.
    let nbr = bgp.neighbor("192.0.2.1").unwrap();
    assert!(std::rc::Rc::ptr_eq(
        nbr.state().unwrap(),
        &bgp_cfg.neighbors["192.0.2.1"]
    ));
}

#[test]
fn test_absent_instance() {
    ocbuild_utils::test::setup();

    let mut bgp = None::<Bgp>
        .with_as(65001)
        .with_router_id("1.2.3.4")
        .add_neighbor(Neighbor::new("192.0.2.1"));
    assert!(bgp.is_none());

    let mut ni = network_instance();
    assert!(bgp.augment(&mut ni).unwrap_err().is_invalid_argument());
    assert!(ni.protocols.is_empty());
}

#[test]
fn test_augment_twice() {
    ocbuild_utils::test::setup();

    let mut ni1 = network_instance();
    let mut ni2 = network_instance();
    let mut bgp = global_peer_instance();
    bgp.augment(&mut ni1).unwrap();
    assert!(bgp.augment(&mut ni2).unwrap_err().is_invalid_argument());
    assert!(ni2.protocols.is_empty());
}

#[test]
fn test_update_after_merge() {
    ocbuild_utils::test::setup();

    let mut ni = network_instance();
    let mut bgp = Bgp::new().with_as(65001);
    bgp.augment(&mut ni).unwrap();

    let bgp = bgp
        .with_as(65099)
        .with_global_afi_safi(AfiSafi::Ipv4Unicast)
        .add_peer_group(PeerGroup::new("LATE").with_peer_as(65003))
        .add_neighbor(Neighbor::new("192.0.2.2").with_peer_group("LATE"));
    assert_eq!(bgp.attrs().asn, 65099);
    assert!(bgp.peer_group("LATE").unwrap().is_augmented());
    assert!(bgp.neighbor("192.0.2.2").unwrap().is_augmented());

    let bgp_cfg = ni.bgp("BGP").unwrap();
    let bgp_cfg = bgp_cfg.borrow();
    assert_eq!(bgp_cfg.global.asn, Some(65099));
    assert_eq!(
        bgp_cfg.global.afi_safis[&AfiSafi::Ipv4Unicast].enabled,
        Some(true)
    );
    assert!(bgp_cfg.peer_groups.contains_key("LATE"));
    assert!(std::rc::Rc::ptr_eq(
        bgp.neighbor("192.0.2.2").unwrap().state().unwrap(),
        &bgp_cfg.neighbors["192.0.2.2"]
    ));
}

#[test]
fn test_rejected_update_after_merge() {
    ocbuild_utils::test::setup();

    let mut ni = network_instance();
    let nbr = Neighbor::new("192.0.2.1").with_peer_group("GLOBAL-PEER");
    let mut bgp = global_peer_instance().add_neighbor(nbr);
    bgp.augment(&mut ni).unwrap();

    let bgp = bgp
        .with_global_afi_safi(AfiSafi::L2vpnEvpn)
        .with_name("BGP-2")
        .add_neighbor(Neighbor::new("192.0.2.1").with_peer_as(65003))
        .add_neighbor(
            Neighbor::new("2001:db8::1")
                .with_afi_safi(AfiSafi::Ipv6Unicast)
                .with_prefix_limit(PrefixLimit {
                    max_prefixes: 10,
                    ..Default::default()
                }),
        );
    assert!(bgp.attrs().afi_safis.is_empty());
    assert_eq!(bgp.name(), "BGP");
    // Children that couldn't be merged are kept, unmerged.
    assert_eq!(bgp.attrs().neighbors.len(), 3);
    assert!(bgp.attrs().neighbors[0].is_augmented());
    assert!(!bgp.attrs().neighbors[1].is_augmented());
    assert!(!bgp.neighbor("2001:db8::1").unwrap().is_augmented());

    let bgp_cfg = ni.bgp("BGP").unwrap();
    let bgp_cfg = bgp_cfg.borrow();
    assert!(bgp_cfg.global.afi_safis.is_empty());
    assert_eq!(
        bgp_cfg.neighbors.keys().map(String::as_str).collect::<Vec<_>>(),
        vec!["192.0.2.1"]
    );
    assert_eq!(bgp_cfg.neighbors["192.0.2.1"].borrow().session.peer_as, None);
    assert_eq!(ni.protocols.len(), 1);
}
