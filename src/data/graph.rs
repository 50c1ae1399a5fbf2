//! Facility graph: a small adjacency matrix of travel distances plus the
//! facilities emergencies can be routed to.
//!
//! Facility ids and graph node indices share one index space: facility `i`
//! sits at node `i`. A patient location passed to [`FacilityGraph::nearest_facility`]
//! is interpreted in that same space.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Distance between two graph nodes, in tenths of a kilometre.
///
/// `Unreachable` marks a pair with no known path and compares greater than
/// every finite distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Distance {
    Finite(u32),
    Unreachable,
}

impl Distance {
    /// The finite value, if any.
    pub fn value(&self) -> Option<u32> {
        match self {
            Distance::Finite(d) => Some(*d),
            Distance::Unreachable => None,
        }
    }

    pub fn is_finite(&self) -> bool {
        matches!(self, Distance::Finite(_))
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Distance::Finite(d) => write!(f, "{}", d),
            Distance::Unreachable => write!(f, "INF"),
        }
    }
}

/// A routing target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Facility {
    /// Assigned by the graph on insertion.
    pub id: usize,
    pub name: String,
    pub location: String,
}

impl Facility {
    /// A facility not yet registered with a graph. Its id is a placeholder.
    pub fn new(name: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            id: 0,
            name: name.into(),
            location: location.into(),
        }
    }
}

/// Result of a nearest-facility query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NearestFacility {
    pub facility: Facility,
    pub distance: Distance,
}

/// Fixed-size weighted graph of facilities.
#[derive(Debug, Clone)]
pub struct FacilityGraph {
    facilities: Vec<Facility>,
    max_facilities: usize,
    max_nodes: usize,
    /// Row-major `max_nodes x max_nodes` matrix.
    distances: Vec<Distance>,
}

impl FacilityGraph {
    /// Create a graph with room for `max_facilities` facilities over `max_nodes` nodes.
    ///
    /// Every off-diagonal distance starts out unreachable.
    pub fn new(max_facilities: usize, max_nodes: usize) -> Result<Self> {
        if max_facilities == 0 {
            return Err(Error::InvalidCapacity {
                component: "facility list",
                capacity: max_facilities,
            });
        }
        if max_nodes == 0 {
            return Err(Error::InvalidCapacity {
                component: "graph",
                capacity: max_nodes,
            });
        }

        let mut distances = vec![Distance::Unreachable; max_nodes * max_nodes];
        for i in 0..max_nodes {
            distances[i * max_nodes + i] = Distance::Finite(0);
        }
        debug!(max_facilities, max_nodes, "graph initialized");

        Ok(Self {
            facilities: Vec::with_capacity(max_facilities),
            max_facilities,
            max_nodes,
            distances,
        })
    }

    /// Register a facility, returning the id it was assigned.
    ///
    /// Any id set on `facility` is overwritten with the next sequential id.
    pub fn add_facility(&mut self, mut facility: Facility) -> Result<usize> {
        if self.facilities.len() >= self.max_facilities {
            warn!(limit = self.max_facilities, name = %facility.name, "facility limit reached");
            return Err(Error::Full {
                capacity: self.max_facilities,
            });
        }

        facility.id = self.facilities.len();
        debug!(id = facility.id, name = %facility.name, location = %facility.location, "facility added");
        self.facilities.push(facility);
        Ok(self.facilities.len() - 1)
    }

    /// Set the distance between two nodes in both directions.
    ///
    /// Replaces any previous value. Out-of-range indices leave the matrix untouched.
    pub fn set_distance(&mut self, a: usize, b: usize, distance: u32) -> Result<()> {
        for index in [a, b] {
            if index >= self.max_nodes {
                warn!(a, b, max_nodes = self.max_nodes, "invalid node indices");
                return Err(Error::InvalidIndex {
                    index,
                    limit: self.max_nodes,
                });
            }
        }

        self.distances[a * self.max_nodes + b] = Distance::Finite(distance);
        self.distances[b * self.max_nodes + a] = Distance::Finite(distance);
        Ok(())
    }

    /// Distance between two nodes, or `None` if either index is outside the graph.
    pub fn distance(&self, a: usize, b: usize) -> Option<Distance> {
        if a < self.max_nodes && b < self.max_nodes {
            Some(self.distances[a * self.max_nodes + b])
        } else {
            None
        }
    }

    /// Find the facility closest to `from_node`.
    ///
    /// Scans facilities in id order, skipping the facility whose id equals
    /// `from_node`, and keeps the first minimum. Facilities whose id has no
    /// node in the matrix count as unreachable.
    ///
    /// When no facility is reachable the result is facility 0 at
    /// [`Distance::Unreachable`], even if facility 0 sits at `from_node`.
    pub fn nearest_facility(&self, from_node: usize) -> Result<NearestFacility> {
        if from_node >= self.max_nodes {
            return Err(Error::InvalidIndex {
                index: from_node,
                limit: self.max_nodes,
            });
        }

        let mut facility = self.facilities.first().ok_or(Error::NoFacilities)?;
        let mut distance = Distance::Unreachable;
        for candidate in self.facilities.iter().filter(|f| f.id != from_node) {
            let d = self
                .distance(from_node, candidate.id)
                .unwrap_or(Distance::Unreachable);
            if d < distance {
                facility = candidate;
                distance = d;
            }
        }

        Ok(NearestFacility {
            facility: facility.clone(),
            distance,
        })
    }

    /// Registered facilities in id order.
    pub fn facilities(&self) -> &[Facility] {
        &self.facilities
    }

    pub fn facility(&self, id: usize) -> Option<&Facility> {
        self.facilities.get(id)
    }

    pub fn num_facilities(&self) -> usize {
        self.facilities.len()
    }

    pub fn max_facilities(&self) -> usize {
        self.max_facilities
    }

    pub fn max_nodes(&self) -> usize {
        self.max_nodes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_graph() -> FacilityGraph {
        let mut graph = FacilityGraph::new(10, 10).unwrap();
        graph.add_facility(Facility::new("Max Hospital", "Dehradun")).unwrap();
        graph.add_facility(Facility::new("Apollo Hospital", "New Delhi")).unwrap();
        graph.add_facility(Facility::new("AIIMS", "Rishikesh")).unwrap();
        graph.set_distance(0, 1, 250).unwrap();
        graph.set_distance(0, 2, 50).unwrap();
        graph.set_distance(1, 2, 280).unwrap();
        graph
    }

    #[test]
    fn test_invalid_capacity() {
        assert!(matches!(
            FacilityGraph::new(0, 5),
            Err(Error::InvalidCapacity { .. })
        ));
        assert!(matches!(
            FacilityGraph::new(5, 0),
            Err(Error::InvalidCapacity { .. })
        ));
    }

    #[test]
    fn test_initial_matrix() {
        let graph = FacilityGraph::new(2, 3).unwrap();
        for a in 0..3 {
            for b in 0..3 {
                let expected = if a == b {
                    Distance::Finite(0)
                } else {
                    Distance::Unreachable
                };
                assert_eq!(graph.distance(a, b), Some(expected));
            }
        }
        assert_eq!(graph.distance(3, 0), None);
    }

    #[test]
    fn test_unreachable_sorts_last() {
        assert!(Distance::Finite(u32::MAX) < Distance::Unreachable);
        assert!(Distance::Finite(1) < Distance::Finite(2));
    }

    #[test]
    fn test_add_facility_assigns_ids() {
        let mut graph = FacilityGraph::new(2, 2).unwrap();
        let mut facility = Facility::new("A", "X");
        facility.id = 42;
        assert_eq!(graph.add_facility(facility), Ok(0));
        assert_eq!(graph.add_facility(Facility::new("B", "Y")), Ok(1));
        assert_eq!(graph.facility(0).unwrap().id, 0);
        assert_eq!(graph.facility(1).unwrap().name, "B");

        assert_eq!(
            graph.add_facility(Facility::new("C", "Z")),
            Err(Error::Full { capacity: 2 })
        );
        assert_eq!(graph.num_facilities(), 2);
    }

    #[test]
    fn test_set_distance_is_symmetric() {
        let mut graph = FacilityGraph::new(3, 3).unwrap();
        graph.set_distance(0, 2, 75).unwrap();
        assert_eq!(graph.distance(0, 2), Some(Distance::Finite(75)));
        assert_eq!(graph.distance(2, 0), Some(Distance::Finite(75)));

        // Updates replace, never accumulate
        graph.set_distance(2, 0, 30).unwrap();
        assert_eq!(graph.distance(0, 2), Some(Distance::Finite(30)));
    }

    #[test]
    fn test_set_distance_rejects_bad_index() {
        let mut graph = FacilityGraph::new(3, 3).unwrap();
        assert_eq!(
            graph.set_distance(0, 3, 10),
            Err(Error::InvalidIndex { index: 3, limit: 3 })
        );
        assert_eq!(
            graph.set_distance(5, 0, 10),
            Err(Error::InvalidIndex { index: 5, limit: 3 })
        );
        for a in 0..3 {
            for b in 0..3 {
                assert_ne!(graph.distance(a, b), Some(Distance::Finite(10)));
            }
        }
    }

    #[test]
    fn test_nearest_facility_skips_self() {
        let graph = sample_graph();
        let nearest = graph.nearest_facility(0).unwrap();
        assert_eq!(nearest.facility.id, 2);
        assert_eq!(nearest.facility.name, "AIIMS");
        assert_eq!(nearest.distance, Distance::Finite(50));

        let nearest = graph.nearest_facility(1).unwrap();
        assert_eq!(nearest.facility.id, 0);
        assert_eq!(nearest.distance, Distance::Finite(250));
    }

    #[test]
    fn test_nearest_facility_first_minimum_wins() {
        let mut graph = FacilityGraph::new(4, 4).unwrap();
        for name in ["A", "B", "C"] {
            graph.add_facility(Facility::new(name, "-")).unwrap();
        }
        graph.set_distance(3, 0, 40).unwrap();
        graph.set_distance(3, 1, 20).unwrap();
        graph.set_distance(3, 2, 20).unwrap();

        let nearest = graph.nearest_facility(3).unwrap();
        assert_eq!(nearest.facility.id, 1);
    }

    #[test]
    fn test_shared_index_space() {
        // A patient node equal to a facility id is treated as that facility's
        // own location and excluded from the scan.
        let mut graph = FacilityGraph::new(2, 3).unwrap();
        graph.add_facility(Facility::new("A", "-")).unwrap();
        graph.add_facility(Facility::new("B", "-")).unwrap();
        graph.set_distance(0, 1, 90).unwrap();
        graph.set_distance(2, 0, 10).unwrap();

        assert_eq!(graph.nearest_facility(0).unwrap().facility.id, 1);
        assert_eq!(graph.nearest_facility(2).unwrap().facility.id, 0);
    }

    #[test]
    fn test_nearest_facility_unreachable() {
        let mut graph = FacilityGraph::new(3, 3).unwrap();
        graph.add_facility(Facility::new("A", "-")).unwrap();
        graph.add_facility(Facility::new("B", "-")).unwrap();

        let nearest = graph.nearest_facility(2).unwrap();
        assert_eq!(nearest.facility.id, 0);
        assert_eq!(nearest.distance, Distance::Unreachable);

        // Nothing reachable from node 0 either: facility 0 is still the
        // answer, though it is the patient's own index.
        let nearest = graph.nearest_facility(0).unwrap();
        assert_eq!(nearest.facility.id, 0);
        assert_eq!(nearest.distance, Distance::Unreachable);
    }

    #[test]
    fn test_nearest_facility_only_self() {
        let mut graph = FacilityGraph::new(3, 3).unwrap();
        graph.add_facility(Facility::new("Only", "-")).unwrap();

        let nearest = graph.nearest_facility(0).unwrap();
        assert_eq!(nearest.facility.name, "Only");
        assert_eq!(nearest.distance, Distance::Unreachable);
    }

    #[test]
    fn test_nearest_facility_errors() {
        let graph = FacilityGraph::new(3, 3).unwrap();
        assert_eq!(graph.nearest_facility(0), Err(Error::NoFacilities));

        let mut graph = FacilityGraph::new(3, 3).unwrap();
        graph.add_facility(Facility::new("Only", "-")).unwrap();
        assert_eq!(
            graph.nearest_facility(3),
            Err(Error::InvalidIndex { index: 3, limit: 3 })
        );
    }

    #[test]
    fn test_facility_beyond_matrix_is_unreachable() {
        let mut graph = FacilityGraph::new(3, 2).unwrap();
        graph.add_facility(Facility::new("A", "-")).unwrap();
        graph.add_facility(Facility::new("B", "-")).unwrap();
        graph.add_facility(Facility::new("C", "-")).unwrap();
        graph.set_distance(0, 1, 5).unwrap();

        let nearest = graph.nearest_facility(0).unwrap();
        assert_eq!(nearest.facility.id, 1);
        assert_eq!(graph.distance(0, 2), None);
    }
}
