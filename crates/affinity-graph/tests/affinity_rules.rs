//! Reachability rules and packet loss over whole-catalog graphs

use affinity_graph::affinity::{MAX_REACHABLE_PACKET_LOSS, UNREACHABLE_PACKET_LOSS};
use affinity_graph::{HubTier, Isp, Point, Reachability, Simnet, SimnetConfig};

fn simnet() -> Simnet {
    Simnet::new(&SimnetConfig::seeded(42)).unwrap()
}

fn at(simnet: &Simnet, name: &str, isp: f64) -> Point {
    let city = simnet.catalog().lookup(name).unwrap().clone();
    Point::new(city, Isp(isp))
}

/// Whether any reachability rule admits `a -> b`, evaluated from the raw
/// point attributes rather than through `classify`
fn qualifies(simnet: &Simnet, a: &Point, b: &Point) -> bool {
    let same_province = a.same_province(b);
    let same_isp = a.same_isp(b);
    let hub_uplink = match b.city.hub_tier() {
        HubTier::FirstClassCore => true,
        HubTier::SecondClassInflux => a.city.same_district(&b.city),
        HubTier::Base => false,
    };

    (same_province && same_isp)
        || (!same_province && same_isp && hub_uplink)
        || (same_province && !same_isp && simnet.isps().is_base(b.isp))
}

#[test]
fn full_catalog_edges_follow_rules() {
    let simnet = simnet();
    let n = simnet.catalog().len();
    let points = simnet.points(n).unwrap();
    let affinity = simnet.affinity(&points);

    assert_eq!(affinity.len(), n * (n - 1));

    for edge in &affinity {
        let (a, b) = (&edge.from, &edge.to);
        assert_ne!(a, b);

        if !edge.is_reachable() {
            assert_eq!(edge.packet_loss, UNREACHABLE_PACKET_LOSS);
            assert!(
                !qualifies(&simnet, a, b),
                "{} -> {} satisfies a reachability rule but was rejected",
                a,
                b
            );
            continue;
        }
        assert!(edge.packet_loss <= MAX_REACHABLE_PACKET_LOSS);

        match edge.reachability {
            Reachability::ProvinceMesh => {
                assert!(a.same_province(b) && a.same_isp(b));
            }
            Reachability::RegionalHub => {
                assert!(!a.same_province(b) && a.same_isp(b));
                assert_eq!(b.city.hub_tier(), HubTier::SecondClassInflux);
                assert!(a.city.same_district(&b.city));
            }
            Reachability::CoreHub => {
                assert!(!a.same_province(b) && a.same_isp(b));
                assert_eq!(b.city.hub_tier(), HubTier::FirstClassCore);
            }
            Reachability::BaseIsp => {
                assert!(a.same_province(b) && !a.same_isp(b));
                assert!(simnet.isps().is_base(b.isp));
            }
            Reachability::Unreachable => unreachable!(),
        }
    }

    let stats = affinity.stats();
    assert_eq!(stats.edges, affinity.len());
    assert_eq!(stats.reachable + stats.unreachable, stats.edges);
    assert!(stats.reachable > 0);
    assert!(stats.unreachable > 0);
}

#[test]
fn qualifying_pairs_are_reachable_for_any_seed() {
    for seed in [1, 7, 42, 99] {
        let simnet = Simnet::new(&SimnetConfig::seeded(seed)).unwrap();
        let points = simnet.points(simnet.catalog().len()).unwrap();
        let affinity = simnet.affinity(&points);

        let mut qualifying = 0usize;
        for edge in &affinity {
            let admitted = qualifies(&simnet, &edge.from, &edge.to);
            assert_eq!(
                edge.is_reachable(),
                admitted,
                "seed {}: {} -> {}",
                seed,
                edge.from,
                edge.to
            );
            if admitted {
                qualifying += 1;
                assert!(edge.packet_loss < UNREACHABLE_PACKET_LOSS);
            }
        }
        assert_eq!(qualifying, affinity.stats().reachable);
        assert!(qualifying > 0, "seed {}", seed);
    }
}

#[test]
fn reachable_loss_matches_isolation() {
    let simnet = simnet();
    let points = simnet.points(120).unwrap();
    let affinity = simnet.affinity(&points);

    for edge in affinity.reachable() {
        let percent = (simnet.isolate(&edge.from, &edge.to) * 100.0).floor() as u64;
        assert_eq!(edge.packet_loss as u64, percent.min(99));
    }
}

#[test]
fn duplicate_points_produce_duplicate_edges() {
    let simnet = simnet();
    let a = at(&simnet, "南京市", 0.4);
    let b = at(&simnet, "苏州市", 0.4);

    let single = simnet.affinity(&[a.clone(), b.clone()]);
    assert_eq!(single.len(), 2);

    let doubled = simnet.affinity(&[a.clone(), b.clone(), b.clone()]);
    // b -> b is skipped, a -> b and b -> a appear twice
    assert_eq!(doubled.len(), 4);
    assert_eq!(doubled.iter().filter(|e| e.from == a).count(), 2);
}

#[test]
fn core_hub_between_cores() {
    let simnet = simnet();
    let beijing = at(&simnet, "北京市", 0.7);
    let shanghai = at(&simnet, "上海市", 0.7);

    let affinity = simnet.affinity(&[beijing, shanghai]);
    for edge in &affinity {
        assert_eq!(edge.reachability, Reachability::CoreHub);
        assert!(edge.packet_loss < UNREACHABLE_PACKET_LOSS);
    }
}

#[test]
fn same_province_non_base_isps_unreachable() {
    let simnet = simnet();
    let nanjing = at(&simnet, "南京市", 2.5);
    let suzhou = at(&simnet, "苏州市", -3.2);

    let affinity = simnet.affinity(&[nanjing, suzhou]);
    assert_eq!(affinity.len(), 2);
    for edge in &affinity {
        assert_eq!(edge.reachability, Reachability::Unreachable);
        assert_eq!(edge.packet_loss, 100);
    }
}

#[test]
fn farthest_core_uplink_is_capped() {
    let simnet = simnet();
    let daxinganling = at(&simnet, "大兴安岭地区", 1.2);
    let beijing = at(&simnet, "北京市", 1.2);

    assert_eq!(simnet.isolate(&daxinganling, &beijing), 1.0);

    let affinity = simnet.affinity(&[daxinganling, beijing]);
    let uplink = affinity
        .iter()
        .find(|e| e.to.city.name == "北京市")
        .unwrap();
    assert_eq!(uplink.reachability, Reachability::CoreHub);
    assert_eq!(uplink.packet_loss, 99);

    // 北京市 is not an influx hub of 东北, and 大兴安岭地区 is no hub at all
    let reverse = affinity
        .iter()
        .find(|e| e.to.city.name == "大兴安岭地区")
        .unwrap();
    assert_eq!(reverse.reachability, Reachability::Unreachable);
}

#[test]
fn different_province_and_isp_unreachable() {
    let simnet = simnet();
    let xining = at(&simnet, "西宁市", 0.1);
    let guangzhou = at(&simnet, "广州市", 0.2);

    let affinity = simnet.affinity(&[xining, guangzhou]);
    assert!(affinity.iter().all(|e| !e.is_reachable()));
    assert_eq!(affinity.stats().unreachable, 2);
}
