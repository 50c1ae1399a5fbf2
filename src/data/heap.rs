//! Fixed-capacity binary max-heap ordering readings by urgency.
//!
//! Nodes are keyed by `(tier, earliest sequence)`: a higher tier always wins,
//! and within a tier the node inserted first wins. Draining the heap therefore
//! yields readings most-urgent first, in arrival order within each tier.

use std::cmp::{Ordering, Reverse};

use serde::Serialize;
use tracing::debug;

use super::reading::Reading;
use super::triage::{SeverityTier, TriageThresholds};
use crate::error::{Error, Result};

/// A reading stamped with its tier and insertion sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TriageNode {
    pub reading: Reading,
    pub tier: SeverityTier,
    pub sequence: u64,
}

impl TriageNode {
    fn key(&self) -> (SeverityTier, Reverse<u64>) {
        (self.tier, Reverse(self.sequence))
    }

    /// Whether this node belongs above `other` in the heap.
    pub fn dominates(&self, other: &TriageNode) -> bool {
        self.key().cmp(&other.key()) == Ordering::Greater
    }
}

/// Bounded priority heap of [`TriageNode`]s, stored as an implicit binary tree
/// (children of `i` at `2i + 1` and `2i + 2`).
#[derive(Debug, Clone)]
pub struct TriageHeap {
    nodes: Vec<TriageNode>,
    capacity: usize,
    next_sequence: u64,
    thresholds: TriageThresholds,
}

impl TriageHeap {
    /// Create a heap with the default classification thresholds.
    pub fn new(capacity: usize) -> Result<Self> {
        Self::with_thresholds(capacity, TriageThresholds::default())
    }

    /// Create a heap that classifies with the given thresholds.
    pub fn with_thresholds(capacity: usize, thresholds: TriageThresholds) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::InvalidCapacity {
                component: "heap",
                capacity,
            });
        }
        debug!(capacity, "heap initialized");

        Ok(Self {
            nodes: Vec::with_capacity(capacity),
            capacity,
            next_sequence: 0,
            thresholds,
        })
    }

    /// Classify and insert a reading, returning its tier.
    ///
    /// Fails with [`Error::Full`] without consuming a sequence number.
    pub fn insert(&mut self, reading: Reading) -> Result<SeverityTier> {
        if self.is_full() {
            return Err(Error::Full {
                capacity: self.capacity,
            });
        }

        let tier = self.thresholds.classify(&reading);
        let sequence = self.next_sequence;
        self.next_sequence += 1;

        self.nodes.push(TriageNode {
            reading,
            tier,
            sequence,
        });
        self.sift_up(self.nodes.len() - 1);
        Ok(tier)
    }

    /// Remove and return the most urgent node.
    pub fn extract_max(&mut self) -> Result<TriageNode> {
        if self.nodes.is_empty() {
            return Err(Error::Empty);
        }

        let root = self.nodes.swap_remove(0);
        if !self.nodes.is_empty() {
            self.sift_down(0);
        }
        Ok(root)
    }

    /// Most urgent node without removing it.
    pub fn peek(&self) -> Option<&TriageNode> {
        self.nodes.first()
    }

    /// Nodes in storage (array) order.
    pub fn iter(&self) -> impl Iterator<Item = &TriageNode> + '_ {
        self.nodes.iter()
    }

    /// Remove all nodes. Sequence numbers keep increasing afterwards.
    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    pub fn thresholds(&self) -> &TriageThresholds {
        &self.thresholds
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.nodes.len() == self.capacity
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn sift_up(&mut self, mut index: usize) {
        while index > 0 {
            let parent = (index - 1) / 2;
            if !self.nodes[index].dominates(&self.nodes[parent]) {
                break;
            }
            self.nodes.swap(index, parent);
            index = parent;
        }
    }

    fn sift_down(&mut self, mut index: usize) {
        let len = self.nodes.len();
        loop {
            let left = 2 * index + 1;
            let right = 2 * index + 2;
            let mut largest = index;

            if left < len && self.nodes[left].dominates(&self.nodes[largest]) {
                largest = left;
            }
            if right < len && self.nodes[right].dominates(&self.nodes[largest]) {
                largest = right;
            }

            if largest == index {
                break;
            }
            self.nodes.swap(index, largest);
            index = largest;
        }
    }
}
