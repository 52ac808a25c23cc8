//! Points: a city paired with an ISP

use crate::catalog::{City, CityCatalog};
use crate::isp::{Isp, IspPopulation};
use crate::{AffinityError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub city: City,
    pub isp: Isp,
}

impl Point {
    pub fn new(city: City, isp: Isp) -> Self {
        Self { city, isp }
    }

    /// Point for slot `index`: `names[index % cities]` paired with `isps[index % isps]`
    pub fn from_index(catalog: &CityCatalog, isps: &IspPopulation, index: usize) -> Result<Self> {
        let isp = isps.get(index).ok_or(AffinityError::EmptyPopulation)?;
        let names = catalog.names();
        if names.is_empty() {
            return Err(AffinityError::EmptyCatalog);
        }
        let city = catalog.lookup(&names[index % names.len()])?;
        Ok(Self::new(city.clone(), isp))
    }

    /// Geography-only point; the ISP dimension is pinned to [`Isp::ZERO`]
    pub fn from_city(catalog: &CityCatalog, name: &str) -> Result<Self> {
        let city = catalog.lookup(name)?;
        Ok(Self::new(city.clone(), Isp::ZERO))
    }

    pub fn same_province(&self, other: &Point) -> bool {
        self.city.same_province(&other.city)
    }

    pub fn same_isp(&self, other: &Point) -> bool {
        self.isp == other.isp
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.city, self.isp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::isp::IspConfig;

    fn fixtures() -> (CityCatalog, IspPopulation) {
        let catalog = CityCatalog::load_from_static().unwrap();
        let isps = IspPopulation::generate(&IspConfig {
            seed: Some(11),
            ..IspConfig::default()
        })
        .unwrap();
        (catalog, isps)
    }

    #[test]
    fn test_from_index_selects_by_modulo() {
        let (catalog, isps) = fixtures();

        let point = Point::from_index(&catalog, &isps, 0).unwrap();
        assert_eq!(point.city.name, catalog.names()[0]);
        assert_eq!(point.isp, isps.as_slice()[0]);

        let index = catalog.len() + 7;
        let point = Point::from_index(&catalog, &isps, index).unwrap();
        assert_eq!(point.city.name, catalog.names()[7]);
        assert_eq!(point.isp, isps.as_slice()[index % isps.len()]);
    }

    #[test]
    fn test_from_index_is_deterministic() {
        let (catalog, isps) = fixtures();
        for i in [0, 1, 99, 100, 337, 338, 1000] {
            assert_eq!(
                Point::from_index(&catalog, &isps, i).unwrap(),
                Point::from_index(&catalog, &isps, i).unwrap()
            );
        }
    }

    #[test]
    fn test_from_index_requires_isps() {
        let catalog = CityCatalog::load_from_static().unwrap();
        let empty = IspPopulation::generate(&IspConfig {
            count: 0,
            seed: Some(1),
            ..IspConfig::default()
        })
        .unwrap();
        assert!(matches!(
            Point::from_index(&catalog, &empty, 3),
            Err(AffinityError::EmptyPopulation)
        ));
    }

    #[test]
    fn test_from_city() {
        let (catalog, _) = fixtures();
        let point = Point::from_city(&catalog, "武汉市").unwrap();
        assert_eq!(point.city.province, "湖北省");
        assert_eq!(point.isp, Isp::ZERO);

        assert!(matches!(
            Point::from_city(&catalog, "Gotham"),
            Err(AffinityError::CityNotFound(_))
        ));
    }

    #[test]
    fn test_structural_equality() {
        let (catalog, _) = fixtures();
        let a = Point::from_city(&catalog, "杭州市").unwrap();
        let b = Point::from_city(&catalog, "杭州市").unwrap();
        let c = Point::new(a.city.clone(), Isp(0.25));

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a.same_province(&c));
        assert!(!a.same_isp(&c));
    }
}
