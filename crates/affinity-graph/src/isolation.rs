//! Isolation metric
//!
//! Euclidean distance between two points on the unit square spanned by the
//! city-id axis and the ISP axis:
//!
//! ```text
//! x = (id  - min_id)  / (max_id  - min_id)
//! y = (isp - min_isp) / (max_isp - min_isp)
//! isolation(a, b) = sqrt((ax - bx)² + (ay - by)²)      ∈ [0, √2]
//! ```
//!
//! District is the most significant digit of a city id and province the next
//! group, so cities sharing a province are always closer on the x axis than
//! cities that do not.

use crate::catalog::CityCatalog;
use crate::isp::IspPopulation;
use crate::point::Point;
use serde::{Deserialize, Serialize};

/// Largest isolation two points inside the observed ranges can have
pub const MAX_ISOLATION: f64 = std::f64::consts::SQRT_2;

/// Observed extent of one axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisRange {
    pub min: f64,
    pub max: f64,
}

impl AxisRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Range that projects every value to zero
    pub fn degenerate() -> Self {
        Self { min: 0.0, max: 0.0 }
    }

    pub fn width(&self) -> f64 {
        self.max - self.min
    }

    pub fn is_degenerate(&self) -> bool {
        let width = self.width();
        !(width.is_finite() && width > 0.0)
    }

    /// Scale `value` into [0, 1]; a degenerate axis contributes nothing
    pub fn normalize(&self, value: f64) -> f64 {
        if self.is_degenerate() {
            return 0.0;
        }
        (value - self.min) / self.width()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IsolationMetric {
    pub city_axis: AxisRange,
    pub isp_axis: AxisRange,
}

impl IsolationMetric {
    pub fn new(catalog: &CityCatalog, isps: &IspPopulation) -> Self {
        let city_axis = AxisRange::new(catalog.min_id() as f64, catalog.max_id() as f64);
        let isp_axis = match (isps.min(), isps.max()) {
            (Some(min), Some(max)) => AxisRange::new(min.value(), max.value()),
            _ => AxisRange::degenerate(),
        };

        Self {
            city_axis,
            isp_axis,
        }
    }

    pub fn isolate(&self, a: &Point, b: &Point) -> f64 {
        let (ax, ay) = self.project(a);
        let (bx, by) = self.project(b);

        let dx = ax - bx;
        let dy = ay - by;
        (dx * dx + dy * dy).sqrt()
    }

    fn project(&self, point: &Point) -> (f64, f64) {
        (
            self.city_axis.normalize(point.city.id as f64),
            self.isp_axis.normalize(point.isp.value()),
        )
    }
}
