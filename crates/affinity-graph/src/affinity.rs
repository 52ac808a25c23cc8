//! Affinity graph construction
//!
//! Every ordered pair of distinct points becomes a directed edge. The rule
//! engine decides reachability from the edge's own perspective (the
//! destination's hub tier and ISP matter, the source's do not):
//!
//! 1. Same province, same ISP: all IDCs form a connected mesh.
//! 2. Different province, same ISP: an IDC reaches a regional influx hub of
//!    its own district, or any first-class core hub.
//! 3. Same province, different ISP: an IDC reaches the base ISPs its
//!    management machines are built on.
//! 4. Anything else is unreachable.

use crate::catalog::HubTier;
use crate::isp::IspPopulation;
use crate::point::Point;
use crate::simnet::Simnet;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Packet loss of an unreachable edge
pub const UNREACHABLE_PACKET_LOSS: u8 = 100;

/// Ceiling for reachable edges; isolation can reach √2 so the raw value may exceed 100
pub const MAX_REACHABLE_PACKET_LOSS: u8 = 99;

/// Rule that admitted (or rejected) an edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reachability {
    /// Same province, same ISP
    ProvinceMesh,
    /// Different province, same ISP, destination is an influx hub of the same district
    RegionalHub,
    /// Different province, same ISP, destination is a first-class core
    CoreHub,
    /// Same province, destination ISP is a base ISP
    BaseIsp,
    Unreachable,
}

impl Reachability {
    pub fn is_reachable(self) -> bool {
        self != Reachability::Unreachable
    }
}

/// Apply the reachability rules to the edge `a → b`
pub fn classify(a: &Point, b: &Point, isps: &IspPopulation) -> Reachability {
    match (a.same_province(b), a.same_isp(b)) {
        (true, true) => Reachability::ProvinceMesh,
        (false, true) => match b.city.hub_tier() {
            HubTier::SecondClassInflux if a.city.same_district(&b.city) => Reachability::RegionalHub,
            HubTier::FirstClassCore => Reachability::CoreHub,
            _ => Reachability::Unreachable,
        },
        (true, false) if isps.is_base(b.isp) => Reachability::BaseIsp,
        _ => Reachability::Unreachable,
    }
}

/// Truncate `isolation * 100` into a reachable packet-loss percentage
pub fn packet_loss(isolation: f64) -> u8 {
    let percent = (isolation * 100.0).floor();
    percent.clamp(0.0, MAX_REACHABLE_PACKET_LOSS as f64) as u8
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AffinityEdge {
    pub from: Point,
    pub to: Point,
    pub reachability: Reachability,
    /// Packet loss in percent, 100 when unreachable
    pub packet_loss: u8,
}

impl AffinityEdge {
    pub fn is_reachable(&self) -> bool {
        self.reachability.is_reachable()
    }
}

/// Directed edge list over a set of points
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Affinity {
    edges: Vec<AffinityEdge>,
}

impl Affinity {
    /// Evaluate every ordered pair `(a, b)` with `a != b`.
    ///
    /// Pairs of structurally equal points are skipped; duplicated input
    /// points otherwise produce duplicated edges.
    pub fn build(simnet: &Simnet, points: &[Point]) -> Self {
        let metric = simnet.metric();
        let isps = simnet.isps();
        let mut edges = Vec::with_capacity(points.len() * points.len().saturating_sub(1));

        for a in points {
            for b in points {
                if a == b {
                    continue;
                }

                let reachability = classify(a, b, isps);
                let packet_loss = if reachability.is_reachable() {
                    packet_loss(metric.isolate(a, b))
                } else {
                    UNREACHABLE_PACKET_LOSS
                };

                edges.push(AffinityEdge {
                    from: a.clone(),
                    to: b.clone(),
                    reachability,
                    packet_loss,
                });
            }
        }

        let affinity = Self { edges };
        let stats = affinity.stats();
        info!(
            "Built affinity over {} points: {} edges, {} reachable",
            points.len(),
            stats.edges,
            stats.reachable
        );
        debug!("{:?}", stats);

        affinity
    }

    pub fn edges(&self) -> &[AffinityEdge] {
        &self.edges
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AffinityEdge> {
        self.edges.iter()
    }

    pub fn reachable(&self) -> impl Iterator<Item = &AffinityEdge> {
        self.edges.iter().filter(|e| e.is_reachable())
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn stats(&self) -> AffinityStats {
        let mut stats = AffinityStats {
            edges: self.edges.len(),
            ..AffinityStats::default()
        };
        let mut loss_total = 0u64;

        for edge in &self.edges {
            match edge.reachability {
                Reachability::ProvinceMesh => stats.province_mesh += 1,
                Reachability::RegionalHub => stats.regional_hub += 1,
                Reachability::CoreHub => stats.core_hub += 1,
                Reachability::BaseIsp => stats.base_isp += 1,
                Reachability::Unreachable => {
                    stats.unreachable += 1;
                    continue;
                }
            }
            stats.reachable += 1;
            loss_total += edge.packet_loss as u64;
        }

        if stats.reachable > 0 {
            stats.mean_packet_loss = loss_total as f64 / stats.reachable as f64;
        }
        stats
    }
}

impl IntoIterator for Affinity {
    type Item = AffinityEdge;
    type IntoIter = std::vec::IntoIter<AffinityEdge>;

    fn into_iter(self) -> Self::IntoIter {
        self.edges.into_iter()
    }
}

impl<'a> IntoIterator for &'a Affinity {
    type Item = &'a AffinityEdge;
    type IntoIter = std::slice::Iter<'a, AffinityEdge>;

    fn into_iter(self) -> Self::IntoIter {
        self.edges.iter()
    }
}

/// Edge counts per rule
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AffinityStats {
    pub edges: usize,
    pub reachable: usize,
    pub unreachable: usize,
    pub province_mesh: usize,
    pub regional_hub: usize,
    pub core_hub: usize,
    pub base_isp: usize,
    /// Mean packet loss over reachable edges
    pub mean_packet_loss: f64,
}
