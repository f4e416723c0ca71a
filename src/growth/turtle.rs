//! Turtle agent driving directed growth
//!
//! A positioned, headed cursor over the map. It can propose a move without
//! committing (`dry_move`), commit position/heading mutations, stamp its
//! current position as a graph node, and duplicate itself for branching.
//! Turtles are ephemeral: they exist only while growth runs and are never
//! persisted.

use glam::DVec2;

use crate::core::types::RoadClass;
use crate::graph::Node;

#[derive(Debug, Clone, Copy)]
pub struct Turtle {
    position: DVec2,
    heading_deg: f64,
    node: Option<Node>,
    class: RoadClass,
}

impl Turtle {
    pub fn new(class: RoadClass) -> Self {
        Self {
            position: DVec2::ZERO,
            heading_deg: 0.0,
            node: None,
            class,
        }
    }

    pub fn position(&self) -> DVec2 {
        self.position
    }

    pub fn heading_deg(&self) -> f64 {
        self.heading_deg
    }

    pub fn node(&self) -> Option<Node> {
        self.node
    }

    pub fn class(&self) -> RoadClass {
        self.class
    }

    pub fn set_position(&mut self, position: DVec2) {
        self.position = position;
    }

    /// Turn by `delta_deg`, wrapping into [0, 360)
    pub fn rotate(&mut self, delta_deg: f64) {
        self.heading_deg = (self.heading_deg + delta_deg).rem_euclid(360.0);
    }

    /// Advance along the current heading
    pub fn move_forward(&mut self, distance: f64) {
        let radians = self.heading_deg.to_radians();
        self.position += distance * DVec2::from_angle(radians);
    }

    /// Where a move of `distance` at `relative_deg` off the current heading
    /// would land, without mutating the turtle
    pub fn dry_move(&self, relative_deg: f64, distance: f64) -> DVec2 {
        let radians = (self.heading_deg + relative_deg).to_radians();
        self.position + distance * DVec2::from_angle(radians)
    }

    /// Stamp the current position as a node tagged with this turtle's class
    /// and adopt it as the current node; the caller inserts it into a graph
    pub fn make_node(&mut self) -> Node {
        let node = Node::new(self.position, self.class);
        self.node = Some(node);
        node
    }

    /// Independent copy; further mutation is not shared
    pub fn duplicate(&self) -> Turtle {
        *self
    }

    /// Independent copy with a different growth class
    ///
    /// Class is fixed for a turtle's lifetime; branches may only pick a new
    /// class at creation, which is what this is for.
    pub fn duplicate_as(&self, class: RoadClass) -> Turtle {
        Turtle { class, ..*self }
    }
}
