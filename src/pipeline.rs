//! Batch orchestration: ingest, triage, and route.
//!
//! ```text
//! RecordSource ─▶ Reading::parse ─▶ BoundedQueue ─▶ TriageHeap ─▶ triaged order
//!                                                                     │
//!                                              Critical > 0 ─▶ FacilityGraph
//! ```

use serde::Serialize;
use tracing::{info, warn};

use crate::data::{
    BoundedQueue, FacilityGraph, NearestFacility, Reading, SeverityTier, TriageHeap, TriageNode,
};
use crate::error::Error;
use crate::source::RecordSource;

/// A record dropped during ingestion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rejection {
    pub line: usize,
    pub record: String,
    pub reason: String,
}

/// Outcome of reading the input into the queue.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IngestSummary {
    /// Readings accepted into the queue, in arrival order.
    pub accepted: Vec<Reading>,
    pub rejected: Vec<Rejection>,
    /// Ingestion stopped early because the queue filled up.
    pub queue_overflow: bool,
    /// Read error that cut the input short, if any.
    pub input_error: Option<String>,
}

/// Per-tier tallies of the triaged readings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TierCounts {
    pub normal: usize,
    pub warning: usize,
    pub critical: usize,
}

impl TierCounts {
    fn record(&mut self, tier: SeverityTier) {
        match tier {
            SeverityTier::Normal => self.normal += 1,
            SeverityTier::Warning => self.warning += 1,
            SeverityTier::Critical => self.critical += 1,
        }
    }

    pub fn get(&self, tier: SeverityTier) -> usize {
        match tier {
            SeverityTier::Normal => self.normal,
            SeverityTier::Warning => self.warning,
            SeverityTier::Critical => self.critical,
        }
    }

    pub fn total(&self) -> usize {
        self.normal + self.warning + self.critical
    }
}

/// What happened when routing was attempted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RoutingOutcome {
    /// No critical readings, so no facility was queried.
    NotNeeded,
    Routed(NearestFacility),
    Failed { reason: String },
}

/// Everything a pipeline run produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TriageReport {
    pub source: String,
    pub ingest: IngestSummary,
    /// Readings the heap had no room for during transfer.
    pub dropped: Vec<Reading>,
    /// Heap contents in storage order once the transfer finished.
    pub heap_snapshot: Vec<TriageNode>,
    pub heap_capacity: usize,
    /// Readings in the order they were extracted, most urgent first.
    pub triaged: Vec<TriageNode>,
    pub counts: TierCounts,
    pub patient_node: usize,
    pub routing: RoutingOutcome,
}

impl TriageReport {
    /// Number of critical readings.
    pub fn emergencies(&self) -> usize {
        self.counts.critical
    }
}

/// Owns the three bounded structures for one batch run.
#[derive(Debug)]
pub struct Pipeline {
    queue: BoundedQueue<Reading>,
    heap: TriageHeap,
    graph: FacilityGraph,
    patient_node: usize,
}

impl Pipeline {
    pub fn new(
        queue: BoundedQueue<Reading>,
        heap: TriageHeap,
        graph: FacilityGraph,
        patient_node: usize,
    ) -> Self {
        Self {
            queue,
            heap,
            graph,
            patient_node,
        }
    }

    /// Validate records into the queue until the input ends or the queue fills.
    ///
    /// The record that finds the queue full is lost, as is the rest of the input.
    pub fn ingest(&mut self, source: &mut dyn RecordSource) -> IngestSummary {
        let mut summary = IngestSummary::default();

        while let Some(record) = source.next_record() {
            let reading = match Reading::parse(&record.text) {
                Ok(reading) => reading,
                Err(e) => {
                    warn!(line = record.line, record = %record.text, "invalid health reading: {}", e);
                    summary.rejected.push(Rejection {
                        line: record.line,
                        record: record.text,
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            match self.queue.enqueue(reading) {
                Ok(()) => summary.accepted.push(reading),
                Err(e) => {
                    warn!(line = record.line, "queue full, stopping input: {}", e);
                    summary.queue_overflow = true;
                    break;
                }
            }
        }

        summary.input_error = source.error().map(str::to_string);
        info!(
            accepted = summary.accepted.len(),
            rejected = summary.rejected.len(),
            "ingestion finished"
        );
        summary
    }

    /// Move every queued reading into the heap, returning those that did not fit.
    pub fn transfer(&mut self) -> Vec<Reading> {
        let mut dropped = Vec::new();
        while let Ok(reading) = self.queue.dequeue() {
            if let Err(e) = self.heap.insert(reading) {
                warn!(%reading, "reading not triaged: {}", e);
                dropped.push(reading);
            }
        }
        info!(heap_size = self.heap.len(), dropped = dropped.len(), "transfer finished");
        dropped
    }

    /// Extract every node from the heap, most urgent first.
    pub fn drain(&mut self) -> Vec<TriageNode> {
        std::iter::from_fn(|| self.heap.extract_max().ok()).collect()
    }

    /// Route to the nearest facility if there is at least one emergency.
    pub fn route(&self, emergencies: usize) -> RoutingOutcome {
        if emergencies == 0 {
            return RoutingOutcome::NotNeeded;
        }

        match self.graph.nearest_facility(self.patient_node) {
            Ok(nearest) => {
                info!(facility = %nearest.facility.name, distance = %nearest.distance, "emergency routed");
                RoutingOutcome::Routed(nearest)
            }
            Err(e) => {
                warn!(patient_node = self.patient_node, "routing failed: {}", e);
                e.into()
            }
        }
    }

    /// Run the whole batch over `source`.
    pub fn run(&mut self, source: &mut dyn RecordSource) -> TriageReport {
        let ingest = self.ingest(source);
        let dropped = self.transfer();
        let heap_snapshot: Vec<TriageNode> = self.heap.iter().copied().collect();

        let triaged = self.drain();
        let mut counts = TierCounts::default();
        for node in &triaged {
            counts.record(node.tier);
        }
        let routing = self.route(counts.critical);

        TriageReport {
            source: source.description().to_string(),
            ingest,
            dropped,
            heap_snapshot,
            heap_capacity: self.heap.capacity(),
            triaged,
            counts,
            patient_node: self.patient_node,
            routing,
        }
    }

    pub fn queue(&self) -> &BoundedQueue<Reading> {
        &self.queue
    }

    pub fn heap(&self) -> &TriageHeap {
        &self.heap
    }

    pub fn graph(&self) -> &FacilityGraph {
        &self.graph
    }

    pub fn patient_node(&self) -> usize {
        self.patient_node
    }
}

impl From<Error> for RoutingOutcome {
    fn from(e: Error) -> Self {
        RoutingOutcome::Failed {
            reason: e.to_string(),
        }
    }
}
