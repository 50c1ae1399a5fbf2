//! Core data structures for triage and routing.
//!
//! ## Submodules
//!
//! - [`reading`]: Validated vital-sign readings and record parsing
//! - [`triage`]: Severity tiers and the thresholds that assign them
//! - [`queue`]: Fixed-capacity FIFO ring buffer for staging readings
//! - [`heap`]: Fixed-capacity max-heap ordering readings by urgency
//! - [`graph`]: Facility graph with a nearest-facility query
//!
//! ## Data Flow
//!
//! ```text
//! raw record
//!     │
//!     ▼
//! Reading::parse()
//!     │
//!     ▼
//! BoundedQueue ──(drain)──▶ TriageHeap ──(extract_max)──▶ triaged order
//!                                                              │
//!                                          any Critical? ──────┴──▶ FacilityGraph::nearest_facility()
//! ```

pub mod graph;
pub mod heap;
pub mod queue;
pub mod reading;
pub mod triage;

pub use graph::{Distance, Facility, FacilityGraph, NearestFacility};
pub use heap::{TriageHeap, TriageNode};
pub use queue::BoundedQueue;
pub use reading::{Reading, VitalSign};
pub use triage::{classify, SeverityTier, TierLimits, TriageThresholds};
