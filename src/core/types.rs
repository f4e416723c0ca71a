//! Core type definitions used throughout the codebase

use glam::DVec2;

/// Growth class for road nodes and agents
///
/// Highways are the arterial skeleton of the city and grow toward dense
/// population; streets fill in the space between them. Generic is used for
/// probe nodes that only exist to run spatial queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoadClass {
    Highway,
    Street,
    Generic,
}

/// Class of an edge, derived from its endpoints
///
/// An edge is a highway segment only if both of its endpoints are
/// highway nodes; every other combination renders as a street.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeClass {
    Highway,
    Street,
}

impl EdgeClass {
    /// Derive the edge class from the classes of its two endpoints
    pub fn from_endpoints(a: RoadClass, b: RoadClass) -> Self {
        if a == RoadClass::Highway && b == RoadClass::Highway {
            EdgeClass::Highway
        } else {
            EdgeClass::Street
        }
    }
}

/// A road segment handed to rendering collaborators
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeRecord {
    pub a: DVec2,
    pub b: DVec2,
    pub class: EdgeClass,
}
