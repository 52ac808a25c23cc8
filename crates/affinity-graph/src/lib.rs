//! Affinity Graph Library
//!
//! Deterministic synthetic model of reachability between simulated
//! data-center points. Each point is a city from a fixed administrative
//! hierarchy paired with an ISP value drawn from a normal distribution.
//!
//! # Pipeline
//!
//! ```text
//! CityCatalog ─┐
//!              ├─> Simnet ─> Point ─> Affinity (edge list + packet loss)
//! IspPopulation┘       └──> IsolationMetric
//! ```
//!
//! | Rule | Same province | Same ISP | Reachable when |
//! |------|---------------|----------|----------------|
//! | Province mesh | yes | yes | always |
//! | Hub uplink | no | yes | `b` is a same-district influx hub, or a core hub |
//! | Base ISP | yes | no | `b` uses a base ISP |
//! | - | no | no | never |
//!
//! Reachable edges carry `floor(isolation * 100)` packet loss (capped at 99),
//! unreachable edges carry exactly 100.

use thiserror::Error;

pub mod affinity;
pub mod catalog;
pub mod config;
pub mod export;
pub mod isolation;
pub mod isp;
pub mod point;
pub mod simnet;

pub use affinity::{Affinity, AffinityEdge, AffinityStats, Reachability};
pub use catalog::{City, CityCatalog, District, HubTier};
pub use config::SimnetConfig;
pub use isolation::{AxisRange, IsolationMetric};
pub use isp::{Isp, IspConfig, IspPopulation};
pub use point::Point;
pub use simnet::Simnet;

#[derive(Error, Debug)]
pub enum AffinityError {
    #[error("City not found: {0:?}")]
    CityNotFound(String),
    #[error("Duplicate city in dataset: {0}")]
    DuplicateCity(String),
    #[error("{field} ordinal {value} does not fit in {width} digits")]
    OrdinalOverflow {
        field: &'static str,
        value: usize,
        width: u32,
    },
    #[error("Catalog contains no cities")]
    EmptyCatalog,
    #[error("ISP population is empty")]
    EmptyPopulation,
    #[error("Invalid ISP distribution: {0}")]
    InvalidDistribution(String),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AffinityError>;
