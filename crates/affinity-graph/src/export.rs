//! Affinity export formats
//!
//! - JSON report (metadata + full edge list)
//! - Cytoscape.js elements for plotting hubs and reachable links

use crate::affinity::{Affinity, AffinityStats};
use crate::catalog::{City, HubTier};
use crate::isp::IspConfig;
use crate::simnet::Simnet;
use crate::Result;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use tracing::info;

/// Colour of links terminating at a first-class core
const CORE_LINK_COLOR: &str = "#ff0000";
/// Colour of every other reachable link
const LINK_COLOR: &str = "#00643c";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub generated_at: String,
    pub points: usize,
    pub isp: IspConfig,
    pub base_isp_buckets: Vec<i64>,
    pub stats: AffinityStats,
}

/// Serializable affinity graph with generation metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AffinityReport {
    pub metadata: ReportMetadata,
    pub affinity: Affinity,
}

impl AffinityReport {
    pub fn new(simnet: &Simnet, isp: &IspConfig, points: usize, affinity: Affinity) -> Self {
        Self {
            metadata: ReportMetadata {
                generated_at: Utc::now().to_rfc3339(),
                points,
                isp: isp.clone(),
                base_isp_buckets: simnet.isps().base_buckets().collect(),
                stats: affinity.stats(),
            },
            affinity,
        }
    }

    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<()> {
        write_pretty(path.as_ref(), self)?;
        info!("Wrote {} edges to {:?}", self.affinity.len(), path.as_ref());
        Ok(())
    }
}

/// Cytoscape.js element format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CytoscapeElement {
    pub group: String,
    pub data: CytoscapeData,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classes: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CytoscapeData {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub province: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tier: Option<HubTier>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub packet_loss: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

fn tier_class(tier: HubTier) -> &'static str {
    match tier {
        HubTier::Base => "base",
        HubTier::SecondClassInflux => "influx",
        HubTier::FirstClassCore => "core",
    }
}

fn city_node(city: &City) -> CytoscapeElement {
    let tier = city.hub_tier();
    CytoscapeElement {
        group: "nodes".to_string(),
        data: CytoscapeData {
            id: city.name.clone(),
            label: Some(city.name.clone()),
            province: Some(city.province.clone()),
            district: Some(city.district.to_string()),
            tier: Some(tier),
            radius: Some(tier.marker_radius()),
            ..CytoscapeData::default()
        },
        classes: Some(tier_class(tier).to_string()),
    }
}

/// One node per distinct city, one edge per reachable pair
pub fn to_cytoscape(affinity: &Affinity) -> Vec<CytoscapeElement> {
    let mut elements = Vec::new();
    let mut drawn: HashSet<&str> = HashSet::new();

    for edge in affinity {
        for city in [&edge.from.city, &edge.to.city] {
            if drawn.insert(city.name.as_str()) {
                elements.push(city_node(city));
            }
        }
    }

    for (index, edge) in affinity.iter().enumerate() {
        if !edge.is_reachable() {
            continue;
        }
        let color = if edge.to.city.hub_tier() == HubTier::FirstClassCore {
            CORE_LINK_COLOR
        } else {
            LINK_COLOR
        };

        elements.push(CytoscapeElement {
            group: "edges".to_string(),
            data: CytoscapeData {
                id: format!("e{}", index),
                source: Some(edge.from.city.name.clone()),
                target: Some(edge.to.city.name.clone()),
                packet_loss: Some(edge.packet_loss),
                color: Some(color.to_string()),
                ..CytoscapeData::default()
            },
            classes: None,
        });
    }

    elements
}

pub fn write_cytoscape(affinity: &Affinity, path: impl AsRef<Path>) -> Result<()> {
    let elements = to_cytoscape(affinity);
    write_pretty(path.as_ref(), &elements)?;
    info!("Wrote {} Cytoscape elements to {:?}", elements.len(), path.as_ref());
    Ok(())
}

fn write_pretty<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, value)?;
    Ok(())
}
