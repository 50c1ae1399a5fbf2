//! # careconnect
//!
//! Offline triage of vital-sign readings with emergency routing.
//!
//! A batch of `heartRate,bloodPressure,spo2` records is validated, staged in a
//! fixed-capacity ring buffer, re-ordered by urgency in a fixed-capacity
//! max-heap, and, when any reading is critical, routed to the nearest
//! facility in a small distance graph.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                            Pipeline                            │
//! │  ┌─────────┐    ┌──────────────┐    ┌────────────┐             │
//! │  │ source  │───▶│ BoundedQueue │───▶│ TriageHeap │──▶ report   │
//! │  │ (input) │    │  (staging)   │    │ (ordering) │             │
//! │  └─────────┘    └──────────────┘    └─────┬──────┘             │
//! │                                           │ Critical > 0       │
//! │                                           ▼                    │
//! │                                    ┌───────────────┐           │
//! │                                    │ FacilityGraph │           │
//! │                                    └───────────────┘           │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`data`]**: The bounded structures and the severity rules
//! - **[`source`]**: Record sources ([`RecordSource`] trait) over files and readers
//! - **[`pipeline`]**: The ingest → triage → route sequence
//! - **[`report`]**: Text and JSON rendering of a run
//! - **[`config`]**: Layered settings (defaults, file, environment)
//!
//! ## Usage
//!
//! ```
//! use std::io::Cursor;
//! use careconnect::{RoutingOutcome, Settings, StreamSource};
//!
//! let mut pipeline = Settings::default().build_pipeline().unwrap();
//! let mut source = StreamSource::new(Cursor::new("80,120,98\n125,110,97\n"), "memory");
//!
//! let report = pipeline.run(&mut source);
//! assert_eq!(report.emergencies(), 1);
//! assert!(matches!(report.routing, RoutingOutcome::Routed(_)));
//! ```

pub mod config;
pub mod data;
pub mod error;
pub mod pipeline;
pub mod report;
pub mod source;

// Re-export main types for convenience
pub use config::Settings;
pub use data::{
    BoundedQueue, Distance, Facility, FacilityGraph, NearestFacility, Reading, SeverityTier,
    TriageHeap, TriageNode, TriageThresholds,
};
pub use error::{Error, Result};
pub use pipeline::{Pipeline, RoutingOutcome, TriageReport};
pub use source::{FileSource, Record, RecordSource, StreamSource};
