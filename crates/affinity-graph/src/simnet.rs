//! Process-scoped model state
//!
//! A [`Simnet`] owns the city catalog, the ISP population and the isolation
//! metric derived from both. It is built once and never mutated, so one
//! instance can be shared by any number of threads building graphs.

use crate::affinity::Affinity;
use crate::catalog::CityCatalog;
use crate::config::SimnetConfig;
use crate::isolation::IsolationMetric;
use crate::isp::IspPopulation;
use crate::point::Point;
use crate::Result;

#[derive(Debug, Clone)]
pub struct Simnet {
    catalog: CityCatalog,
    isps: IspPopulation,
    metric: IsolationMetric,
}

impl Simnet {
    /// Load the embedded catalog and sample the ISP population
    pub fn new(config: &SimnetConfig) -> Result<Self> {
        let catalog = CityCatalog::load_from_static()?;
        Self::with_catalog(catalog, config)
    }

    pub fn with_catalog(catalog: CityCatalog, config: &SimnetConfig) -> Result<Self> {
        let isps = IspPopulation::generate(&config.isp)?;
        Ok(Self::from_parts(catalog, isps))
    }

    pub fn from_parts(catalog: CityCatalog, isps: IspPopulation) -> Self {
        let metric = IsolationMetric::new(&catalog, &isps);
        Self {
            catalog,
            isps,
            metric,
        }
    }

    pub fn catalog(&self) -> &CityCatalog {
        &self.catalog
    }

    pub fn isps(&self) -> &IspPopulation {
        &self.isps
    }

    pub fn metric(&self) -> &IsolationMetric {
        &self.metric
    }

    pub fn point(&self, index: usize) -> Result<Point> {
        Point::from_index(&self.catalog, &self.isps, index)
    }

    /// Points for slots `0..count`
    pub fn points(&self, count: usize) -> Result<Vec<Point>> {
        (0..count).map(|i| self.point(i)).collect()
    }

    pub fn point_from_city(&self, name: &str) -> Result<Point> {
        Point::from_city(&self.catalog, name)
    }

    pub fn isolate(&self, a: &Point, b: &Point) -> f64 {
        self.metric.isolate(a, b)
    }

    pub fn affinity(&self, points: &[Point]) -> Affinity {
        Affinity::build(self, points)
    }
}
