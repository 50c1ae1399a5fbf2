//! Human-readable and JSON rendering of a [`TriageReport`].

use std::fmt;

use serde_json::{json, Value};

use crate::data::{Distance, FacilityGraph, SeverityTier};
use crate::pipeline::{RoutingOutcome, TriageReport};

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";

/// Format a distance stored in tenths of a kilometre.
pub fn format_distance(distance: Distance) -> String {
    match distance.value() {
        Some(d) => format!("{:.1} km", d as f64 / 10.0),
        None => "unreachable".to_string(),
    }
}

/// Render the full run summary.
pub fn render(report: &TriageReport, graph: &FacilityGraph) -> String {
    ReportView { report, graph }.to_string()
}

/// A run summary paired with the graph it was routed over.
pub struct ReportView<'a> {
    pub report: &'a TriageReport,
    pub graph: &'a FacilityGraph,
}

impl fmt::Display for ReportView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_report(f, self.report, self.graph)
    }
}

fn write_report(
    out: &mut fmt::Formatter<'_>,
    report: &TriageReport,
    graph: &FacilityGraph,
) -> fmt::Result {
    writeln!(out, "READINGS ({})", report.source)?;
    writeln!(out, "{}", RULE)?;
    for (i, reading) in report.ingest.accepted.iter().enumerate() {
        writeln!(out, "Reading {}: {}", i + 1, reading)?;
    }
    for rejection in &report.ingest.rejected {
        writeln!(
            out,
            "Skipped line {}: '{}' ({})",
            rejection.line, rejection.record, rejection.reason
        )?;
    }
    if report.ingest.queue_overflow {
        writeln!(out, "Queue full! Remaining input was not read.")?;
    }
    if let Some(err) = &report.ingest.input_error {
        writeln!(out, "Input ended early: {}", err)?;
    }
    writeln!(out, "Total readings loaded: {}", report.ingest.accepted.len())?;

    writeln!(out)?;
    writeln!(out, "PRIORITY HEAP ANALYSIS")?;
    writeln!(out, "{}", RULE)?;
    if report.heap_snapshot.is_empty() {
        writeln!(out, "Heap empty")?;
    } else {
        writeln!(
            out,
            "Heap size: {}/{}",
            report.heap_snapshot.len(),
            report.heap_capacity
        )?;
        for (i, node) in report.heap_snapshot.iter().enumerate() {
            writeln!(out, "  [{}] [{}] {}", i + 1, node.tier, node.reading)?;
        }
    }
    for reading in &report.dropped {
        writeln!(out, "Not triaged (heap full): {}", reading)?;
    }

    writeln!(out)?;
    writeln!(out, "TRIAGE ORDER")?;
    writeln!(out, "{}", RULE)?;
    for node in &report.triaged {
        let marker = if node.tier == SeverityTier::Critical {
            " [EMERGENCY!]"
        } else {
            ""
        };
        writeln!(out, "{:<8} {}{}", node.tier, node.reading, marker)?;
    }

    writeln!(out)?;
    writeln!(out, "FACILITY ROUTING")?;
    writeln!(out, "{}", RULE)?;
    write_facilities(out, graph)?;
    writeln!(out)?;
    write_distance_matrix(out, graph)?;

    match &report.routing {
        RoutingOutcome::NotNeeded => {}
        RoutingOutcome::Routed(nearest) => {
            writeln!(out)?;
            writeln!(out, "NEAREST FACILITY FOR EMERGENCY:")?;
            writeln!(out, "   Name: {}", nearest.facility.name)?;
            writeln!(out, "   Location: {}", nearest.facility.location)?;
            writeln!(out, "   Distance: {}", format_distance(nearest.distance))?;
        }
        RoutingOutcome::Failed { reason } => {
            writeln!(out)?;
            writeln!(out, "Routing failed: {}", reason)?;
        }
    }

    writeln!(out)?;
    writeln!(out, "FINAL SUMMARY")?;
    writeln!(out, "{}", RULE)?;
    writeln!(out, "Total Readings: {}", report.ingest.accepted.len())?;
    for tier in SeverityTier::ALL.iter().rev() {
        writeln!(out, "{:<8}: {}", tier, report.counts.get(*tier))?;
    }
    writeln!(out, "Emergencies Detected: {}", report.emergencies())?;
    writeln!(
        out,
        "Heap Capacity: {}/{}",
        report.heap_snapshot.len(),
        report.heap_capacity
    )?;
    Ok(())
}

fn write_facilities(out: &mut fmt::Formatter<'_>, graph: &FacilityGraph) -> fmt::Result {
    if graph.num_facilities() == 0 {
        return writeln!(out, "No facilities");
    }
    writeln!(out, "Facilities ({}):", graph.num_facilities())?;
    for facility in graph.facilities() {
        writeln!(
            out,
            "  [{}] {} - {}",
            facility.id, facility.name, facility.location
        )?;
    }
    Ok(())
}

/// Matrix over registered facilities, in tenths of a kilometre.
fn write_distance_matrix(out: &mut fmt::Formatter<'_>, graph: &FacilityGraph) -> fmt::Result {
    let n = graph.num_facilities().min(graph.max_nodes());
    writeln!(out, "Distance Matrix (x10 km):")?;
    write!(out, "     ")?;
    for i in 0..n {
        write!(out, "{:>6} ", i)?;
    }
    writeln!(out)?;

    for i in 0..n {
        write!(out, "  {}: ", i)?;
        for j in 0..n {
            let cell = graph.distance(i, j).unwrap_or(Distance::Unreachable);
            write!(out, "{:>6} ", cell.to_string())?;
        }
        writeln!(out)?;
    }
    Ok(())
}

/// Build the JSON export of a run.
pub fn to_json(report: &TriageReport) -> Value {
    let readings: Vec<Value> = report
        .triaged
        .iter()
        .map(|node| {
            json!({
                "sequence": node.sequence,
                "tier": node.tier,
                "heart_rate": node.reading.heart_rate(),
                "blood_pressure": node.reading.blood_pressure(),
                "spo2": node.reading.spo2(),
            })
        })
        .collect();

    json!({
        "summary": {
            "source": report.source,
            "total_readings": report.ingest.accepted.len(),
            "rejected": report.ingest.rejected.len(),
            "dropped": report.dropped.len(),
            "queue_overflow": report.ingest.queue_overflow,
            "input_error": report.ingest.input_error,
            "normal": report.counts.normal,
            "warning": report.counts.warning,
            "critical": report.counts.critical,
            "heap_capacity": report.heap_capacity,
        },
        "rejections": report.ingest.rejected,
        "triaged": readings,
        "patient_node": report.patient_node,
        "routing": report.routing,
    })
}
