//! Model configuration

use crate::isp::IspConfig;
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use tracing::warn;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimnetConfig {
    pub isp: IspConfig,
}

impl SimnetConfig {
    /// Configuration with a fixed ISP seed
    pub fn seeded(seed: u64) -> Self {
        Self {
            isp: IspConfig {
                seed: Some(seed),
                ..IspConfig::default()
            },
        }
    }

    /// Defaults overridden by `SIMNET_ISP_COUNT`, `SIMNET_ISP_MEAN`,
    /// `SIMNET_ISP_STDDEV` and `SIMNET_SEED`
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = IspConfig::default();
        Self {
            isp: IspConfig {
                count: parse_var(&lookup, "SIMNET_ISP_COUNT").unwrap_or(defaults.count),
                mean: parse_var(&lookup, "SIMNET_ISP_MEAN").unwrap_or(defaults.mean),
                stddev: parse_var(&lookup, "SIMNET_ISP_STDDEV").unwrap_or(defaults.stddev),
                seed: parse_var(&lookup, "SIMNET_SEED").or(defaults.seed),
            },
        }
    }
}

fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("Ignoring unparsable {}={:?}", key, raw);
            None
        }
    }
}
