//! Error types for the triage core.

use thiserror::Error;

use crate::data::reading::VitalSign;

/// Errors reported by the readings validator and the bounded structures.
///
/// None of these abort the process. Construction errors make the affected
/// structure unusable; everything else is recoverable by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A fixed-capacity structure was asked for zero slots.
    #[error("{component} capacity must be positive (got {capacity})")]
    InvalidCapacity {
        component: &'static str,
        capacity: usize,
    },

    /// A raw record did not contain three comma-separated integers.
    #[error("Failed to parse record: {0}")]
    Parse(String),

    /// A parsed reading is outside physiological bounds.
    #[error("{sign} {value} outside valid range {min}..={max}")]
    OutOfRange {
        sign: VitalSign,
        value: i32,
        min: i32,
        max: i32,
    },

    /// The structure is at capacity; nothing was mutated.
    #[error("Structure is full (capacity: {capacity})")]
    Full { capacity: usize },

    /// The structure holds no elements; nothing was mutated.
    #[error("Structure is empty")]
    Empty,

    /// A routing query found no facility to route to.
    #[error("No facilities in graph")]
    NoFacilities,

    /// A node index lies outside the graph.
    #[error("Node index {index} out of range (max nodes: {limit})")]
    InvalidIndex { index: usize, limit: usize },
}

/// Result alias for core operations.
pub type Result<T> = std::result::Result<T, Error>;
