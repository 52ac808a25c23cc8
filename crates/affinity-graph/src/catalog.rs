//! Geography catalog
//!
//! Province → city hierarchy loaded from a static administrative-division
//! dataset. Every city is classified into one of seven districts and given a
//! numeric id that encodes its position:
//!
//! ```text
//! id = D PPP CCC
//!      │  │   └── city ordinal within the province (0-based)
//!      │  └────── province ordinal in dataset order (1-based)
//!      └───────── district ordinal (1-7)
//! ```
//!
//! Provinces without a district mapping are dropped together with their cities.

use crate::{AffinityError, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, info};

/// Province → prefectural cities, from the modood Administrative-divisions-of-China `pc.json` dump.
const CHINA_CITY: &str = include_str!("../data/china_city.json");

const PROVINCE_DIGITS: u32 = 3;
const CITY_DIGITS: u32 = 3;

/// Top-tier hubs reachable from every province over the same ISP.
pub const FIRST_CLASS_CORES: [&str; 3] = ["北京市", "上海市", "广州市"];

/// Regional hubs reachable from provinces of the same district over the same ISP.
pub const SECOND_CLASS_INFLUXES: [&str; 4] = ["成都市", "武汉市", "西安市", "沈阳市"];

/// Macro-regions used to group provinces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum District {
    #[serde(rename = "华北")]
    NorthChina,
    #[serde(rename = "华中")]
    CentralChina,
    #[serde(rename = "华南")]
    SouthChina,
    #[serde(rename = "华东")]
    EastChina,
    #[serde(rename = "西北")]
    Northwest,
    #[serde(rename = "西南")]
    Southwest,
    #[serde(rename = "东北")]
    Northeast,
}

impl District {
    pub const ALL: [District; 7] = [
        District::NorthChina,
        District::CentralChina,
        District::SouthChina,
        District::EastChina,
        District::Northwest,
        District::Southwest,
        District::Northeast,
    ];

    /// Leading digit of every city id in this district
    pub fn ordinal(self) -> u32 {
        match self {
            District::NorthChina => 1,
            District::CentralChina => 2,
            District::SouthChina => 3,
            District::EastChina => 4,
            District::Northwest => 5,
            District::Southwest => 6,
            District::Northeast => 7,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            District::NorthChina => "华北",
            District::CentralChina => "华中",
            District::SouthChina => "华南",
            District::EastChina => "华东",
            District::Northwest => "西北",
            District::Southwest => "西南",
            District::Northeast => "东北",
        }
    }

    /// District of a province, `None` for provinces outside the table
    pub fn of_province(province: &str) -> Option<Self> {
        let district = match province {
            "北京市" | "天津市" | "河北省" | "山西省" | "内蒙古自治区" => District::NorthChina,
            "河南省" | "湖北省" | "湖南省" => District::CentralChina,
            "广西壮族自治区" | "广东省" | "海南省" => District::SouthChina,
            "上海市" | "山东省" | "江苏省" | "安徽省" | "浙江省" | "福建省" | "江西省" => {
                District::EastChina
            }
            "新疆维吾尔自治区" | "青海省" | "甘肃省" | "宁夏回族自治区" | "陕西省" => {
                District::Northwest
            }
            "西藏自治区" | "四川省" | "重庆市" | "贵州省" | "云南省" => District::Southwest,
            "黑龙江省" | "吉林省" | "辽宁省" => District::Northeast,
            _ => return None,
        };
        Some(district)
    }
}

impl fmt::Display for District {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Hub classification of a city in the long-haul topology
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HubTier {
    Base,
    SecondClassInflux,
    FirstClassCore,
}

impl HubTier {
    pub fn of(name: &str) -> Self {
        if FIRST_CLASS_CORES.contains(&name) {
            HubTier::FirstClassCore
        } else if SECOND_CLASS_INFLUXES.contains(&name) {
            HubTier::SecondClassInflux
        } else {
            HubTier::Base
        }
    }

    /// Map marker radius (degrees) used when plotting the city
    pub fn marker_radius(self) -> f64 {
        match self {
            HubTier::Base => 0.02,
            HubTier::SecondClassInflux => 0.05,
            HubTier::FirstClassCore => 0.08,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct City {
    pub id: u32,
    pub name: String,
    pub province: String,
    pub district: District,
}

impl City {
    pub fn hub_tier(&self) -> HubTier {
        HubTier::of(&self.name)
    }

    pub fn same_province(&self, other: &City) -> bool {
        self.province == other.province
    }

    pub fn same_district(&self, other: &City) -> bool {
        self.district == other.district
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}({})", self.district, self.province, self.name, self.id)
    }
}

/// Encode `(district, province ordinal, city ordinal)` as `D PPP CCC`
pub fn encode_city_id(district: District, province_ordinal: usize, city_ordinal: usize) -> Result<u32> {
    let province = fit_digits("province", province_ordinal, PROVINCE_DIGITS)?;
    let city = fit_digits("city", city_ordinal, CITY_DIGITS)?;

    Ok(district.ordinal() * 10u32.pow(PROVINCE_DIGITS + CITY_DIGITS)
        + province * 10u32.pow(CITY_DIGITS)
        + city)
}

fn fit_digits(field: &'static str, value: usize, width: u32) -> Result<u32> {
    if value >= 10usize.pow(width) {
        return Err(AffinityError::OrdinalOverflow { field, value, width });
    }
    Ok(value as u32)
}

/// Immutable city lookup table
#[derive(Debug, Clone)]
pub struct CityCatalog {
    cities: HashMap<String, City>,
    names: Vec<String>,
    min_id: u32,
    max_id: u32,
}

impl CityCatalog {
    /// Build the catalog from the embedded dataset
    pub fn load_from_static() -> Result<Self> {
        Self::from_json(CHINA_CITY)
    }

    /// Build a catalog from a `{"province": ["city", ...], ...}` document.
    ///
    /// Province ordinals follow document order; every province counts
    /// towards the ordinal, including those dropped for lacking a district.
    pub fn from_json(json: &str) -> Result<Self> {
        let table: IndexMap<String, Vec<String>> = serde_json::from_str(json)?;

        let mut cities = HashMap::new();
        let mut names = Vec::new();
        let mut min_id = u32::MAX;
        let mut max_id = u32::MIN;
        let mut skipped = 0;

        for (index, (province, city_names)) in table.into_iter().enumerate() {
            let Some(district) = District::of_province(&province) else {
                debug!("Skipping {} ({} cities): no district", province, city_names.len());
                skipped += 1;
                continue;
            };

            for (ordinal, name) in city_names.into_iter().enumerate() {
                let id = encode_city_id(district, index + 1, ordinal)?;
                min_id = min_id.min(id);
                max_id = max_id.max(id);

                let city = City {
                    id,
                    name: name.clone(),
                    province: province.clone(),
                    district,
                };
                if cities.insert(name.clone(), city).is_some() {
                    return Err(AffinityError::DuplicateCity(name));
                }
                names.push(name);
            }
        }

        if names.is_empty() {
            return Err(AffinityError::EmptyCatalog);
        }
        names.sort();

        info!(
            "Loaded {} cities ({} provinces skipped), ids {}..={}",
            names.len(),
            skipped,
            min_id,
            max_id
        );

        Ok(Self {
            cities,
            names,
            min_id,
            max_id,
        })
    }

    pub fn lookup(&self, name: &str) -> Result<&City> {
        self.cities
            .get(name)
            .ok_or_else(|| AffinityError::CityNotFound(name.to_string()))
    }

    pub fn get(&self, name: &str) -> Option<&City> {
        self.cities.get(name)
    }

    /// All city names, sorted byte-wise
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Cities in name order
    pub fn cities(&self) -> impl Iterator<Item = &City> {
        self.names.iter().filter_map(|name| self.cities.get(name))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn min_id(&self) -> u32 {
        self.min_id
    }

    pub fn max_id(&self) -> u32 {
        self.max_id
    }
}
