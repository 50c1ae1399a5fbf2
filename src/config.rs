//! Layered configuration for a triage run.
//!
//! Settings come from built-in defaults, then an optional config file, then
//! `CARECONNECT_*` environment variables:
//!
//! ```toml
//! queue_capacity = 50
//! heap_capacity = 50
//! patient_node = 0
//!
//! [[facilities]]
//! name = "AIIMS"
//! location = "Rishikesh"
//!
//! [[distances]]
//! from = 0
//! to = 2
//! distance = 50
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::data::{BoundedQueue, Facility, FacilityGraph, Reading, TriageHeap, TriageThresholds};
use crate::pipeline::Pipeline;

/// A facility entry. Ids are assigned in list order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacilitySettings {
    pub name: String,
    pub location: String,
}

/// A symmetric edge, in tenths of a kilometre.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistanceSettings {
    pub from: usize,
    pub to: usize,
    pub distance: u32,
}

/// All knobs of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub queue_capacity: usize,
    pub heap_capacity: usize,
    pub max_facilities: usize,
    pub max_nodes: usize,
    /// Graph node the patient is located at.
    pub patient_node: usize,
    pub thresholds: TriageThresholds,
    pub facilities: Vec<FacilitySettings>,
    pub distances: Vec<DistanceSettings>,
}

impl Default for Settings {
    fn default() -> Self {
        let facility = |name: &str, location: &str| FacilitySettings {
            name: name.to_string(),
            location: location.to_string(),
        };
        let edge = |from, to, distance| DistanceSettings { from, to, distance };

        Self {
            queue_capacity: 50,
            heap_capacity: 50,
            max_facilities: 10,
            max_nodes: 10,
            patient_node: 0,
            thresholds: TriageThresholds::default(),
            facilities: vec![
                facility("Max Hospital", "Dehradun"),
                facility("Apollo Hospital", "New Delhi"),
                facility("AIIMS", "Rishikesh"),
            ],
            distances: vec![edge(0, 1, 250), edge(0, 2, 50), edge(1, 2, 280)],
        }
    }
}

impl Settings {
    /// Load settings, layering `path` (if given) and the environment over the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }
        let config = builder
            .add_source(Environment::with_prefix("CARECONNECT").try_parsing(true))
            .build()
            .context("Failed to load configuration")?;

        config
            .try_deserialize()
            .context("Invalid configuration")
    }

    /// Build the facility graph described by these settings.
    pub fn build_graph(&self) -> Result<FacilityGraph> {
        let mut graph = FacilityGraph::new(self.max_facilities, self.max_nodes)?;
        for entry in &self.facilities {
            graph
                .add_facility(Facility::new(&entry.name, &entry.location))
                .with_context(|| format!("Cannot add facility '{}'", entry.name))?;
        }
        for edge in &self.distances {
            graph
                .set_distance(edge.from, edge.to, edge.distance)
                .with_context(|| format!("Invalid distance {} -> {}", edge.from, edge.to))?;
        }
        Ok(graph)
    }

    /// Build a pipeline with freshly allocated structures.
    pub fn build_pipeline(&self) -> Result<Pipeline> {
        let queue = BoundedQueue::<Reading>::new(self.queue_capacity)?;
        let heap = TriageHeap::with_thresholds(self.heap_capacity, self.thresholds)?;
        let graph = self.build_graph()?;
        Ok(Pipeline::new(queue, heap, graph, self.patient_node))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Distance;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.queue_capacity, 50);
        assert_eq!(settings.facilities.len(), 3);

        let graph = settings.build_graph().unwrap();
        assert_eq!(graph.num_facilities(), 3);
        assert_eq!(graph.distance(0, 2), Some(Distance::Finite(50)));
        assert_eq!(graph.nearest_facility(0).unwrap().facility.name, "AIIMS");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
queue_capacity = 5
patient_node = 3

[thresholds.critical]
heart_rate_above = 110
blood_pressure_above = 160
spo2_below = 90

[[facilities]]
name = "Clinic"
location = "Mussoorie"

[[distances]]
from = 3
to = 0
distance = 35
"#
        )
        .unwrap();
        file.flush().unwrap();

        let settings = Settings::load(Some(file.path())).unwrap();
        assert_eq!(settings.queue_capacity, 5);
        assert_eq!(settings.heap_capacity, 50);
        assert_eq!(settings.patient_node, 3);
        assert_eq!(settings.thresholds.critical.heart_rate_above, 110);
        assert_eq!(settings.thresholds.warning.heart_rate_above, 100);

        let pipeline = settings.build_pipeline().unwrap();
        assert_eq!(pipeline.queue().capacity(), 5);
        let nearest = pipeline.graph().nearest_facility(3).unwrap();
        assert_eq!(nearest.facility.name, "Clinic");
        assert_eq!(nearest.distance, Distance::Finite(35));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(Settings::load(Some(Path::new("/nonexistent/careconnect.toml"))).is_err());
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let settings = Settings {
            queue_capacity: 0,
            ..Settings::default()
        };
        assert!(settings.build_pipeline().is_err());

        let settings = Settings {
            distances: vec![DistanceSettings {
                from: 0,
                to: 10,
                distance: 1,
            }],
            ..Settings::default()
        };
        let err = settings.build_graph().unwrap_err();
        assert!(err.to_string().contains("Invalid distance"));

        let settings = Settings {
            max_facilities: 2,
            ..Settings::default()
        };
        assert!(settings.build_graph().is_err());
    }
}
