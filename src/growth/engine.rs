//! Agent-driven road network growth
//!
//! The engine keeps two ordered sets of active turtles, highways and
//! streets, and steps every turtle once per pass (highways first). A step
//! proposes one segment ahead of the turtle, corrects it against the field,
//! truncates it at crossings with existing roads, snaps it onto nearby
//! nodes, and finally commits it to the graph or terminates the branch.
//! Surviving turtles may spawn a perpendicular branch.
//!
//! Determinism contract: the random stream is consumed in exactly this
//! visitation order, so reordering agents changes the resulting city.
//! Branches spawned during a pass join their set only after the pass ends.

use glam::DVec2;
use tracing::{debug, info};

use crate::core::config::GeneratorConfig;
use crate::core::error::{CityError, Result};
use crate::core::types::{EdgeClass, RoadClass};
use crate::field::GeoField;
use crate::graph::{Node, SpatialGraph};
use crate::growth::geometry::segment_intersection;
use crate::growth::rng::SineRng;
use crate::growth::turtle::Turtle;

/// Per-class growth behavior (spec'd as a strategy table instead of
/// scattering highway/street branches through the step)
struct ClassParams {
    segment_length: f64,
    /// Highways steer toward population; streets always grow straight
    directional: bool,
    /// Only highways rotate/extend their way around illegal terrain
    self_corrects: bool,
    /// Highway nodes are always snap targets; street nodes only for streets
    snaps_to_streets: bool,
    /// Highways only truncate against highway-class edges
    highway_edges_only: bool,
    branch_prob: f64,
}

impl ClassParams {
    fn for_class(class: RoadClass, config: &GeneratorConfig) -> Self {
        match class {
            RoadClass::Highway => Self {
                segment_length: config.highway_segment_length,
                directional: true,
                self_corrects: true,
                snaps_to_streets: false,
                highway_edges_only: true,
                branch_prob: config.highway_branch_prob,
            },
            // Generic never drives an agent; treat it as a street
            _ => Self {
                segment_length: config.street_segment_length,
                directional: false,
                self_corrects: false,
                snaps_to_streets: true,
                highway_edges_only: false,
                branch_prob: config.street_branch_prob,
            },
        }
    }
}

struct StepOutcome {
    survives: bool,
    spawned: Option<Turtle>,
}

/// Grows one road network, then yields the finished graph
pub struct RoadGrowthEngine<'a> {
    field: &'a GeoField,
    config: &'a GeneratorConfig,
    rng: &'a mut SineRng,
    graph: SpatialGraph,
    highways: Vec<Turtle>,
    streets: Vec<Turtle>,
}

impl<'a> RoadGrowthEngine<'a> {
    pub fn new(field: &'a GeoField, config: &'a GeneratorConfig, rng: &'a mut SineRng) -> Self {
        Self {
            field,
            config,
            rng,
            graph: SpatialGraph::new(),
            highways: Vec::new(),
            streets: Vec::new(),
        }
    }

    /// Run growth until all agents terminate or the iteration budget runs
    /// out, whichever comes first; the budget bounds runtime regardless of
    /// how the branch probabilities play out
    pub fn grow(mut self, max_iterations: usize) -> Result<SpatialGraph> {
        let start = self
            .starting_point()
            .ok_or(CityError::NoStartingPoint)?;

        let mut root = Turtle::new(RoadClass::Highway);
        root.set_position(start);
        let root_node = root.make_node();
        self.graph.add_node(root_node);
        self.highways.push(root);
        debug!(x = start.x, y = start.y, "planted road network root");

        let mut budget = max_iterations;
        while budget > 0 && (!self.highways.is_empty() || !self.streets.is_empty()) {
            budget = self.run_pass(RoadClass::Highway, budget);
            if budget == 0 {
                break;
            }
            budget = self.run_pass(RoadClass::Street, budget);
        }

        info!(
            nodes = self.graph.num_nodes(),
            edges = self.graph.num_edges(),
            spent = max_iterations - budget,
            "road growth finished"
        );
        Ok(self.graph)
    }

    /// Step every agent of one class once, in list order
    fn run_pass(&mut self, class: RoadClass, mut budget: usize) -> usize {
        let mut agents = match class {
            RoadClass::Street => std::mem::take(&mut self.streets),
            _ => std::mem::take(&mut self.highways),
        };
        let mut survivors = Vec::with_capacity(agents.len());
        let mut spawned_highways = Vec::new();
        let mut spawned_streets = Vec::new();

        let mut idx = 0;
        while idx < agents.len() && budget > 0 {
            budget -= 1;
            let outcome = self.step_agent(&mut agents[idx]);
            if let Some(branch) = outcome.spawned {
                match branch.class() {
                    RoadClass::Street => spawned_streets.push(branch),
                    _ => spawned_highways.push(branch),
                }
            }
            if outcome.survives {
                survivors.push(agents[idx]);
            }
            idx += 1;
        }
        // Budget exhaustion mid-pass keeps the unstepped tail alive
        survivors.extend(agents.drain(idx..));

        match class {
            RoadClass::Street => self.streets = survivors,
            _ => self.highways = survivors,
        }
        // Branches join their sets only after the pass, never mid-iteration
        self.highways.extend(spawned_highways);
        self.streets.extend(spawned_streets);
        budget
    }

    fn step_agent(&mut self, agent: &mut Turtle) -> StepOutcome {
        let terminated = StepOutcome {
            survives: false,
            spawned: None,
        };
        let Some(last) = agent.node() else {
            return terminated;
        };
        let params = ClassParams::for_class(agent.class(), self.config);

        // 1. Direction selection
        let mut offset = 0.0;
        if params.directional {
            offset = self.pick_direction(agent);
        }

        // 2. Legality correction
        let mut length = params.segment_length;
        let mut end_branch = false;
        let mut make_node = true;
        let mut split: Option<(Node, Node)> = None;

        if self.field.population_density(agent.dry_move(offset, length)) < 0.0 {
            match self.correct_segment(agent, offset, length, &params) {
                Some((legal_offset, legal_length)) => {
                    offset = legal_offset;
                    length = legal_length;
                }
                None => {
                    end_branch = true;
                    make_node = false;
                }
            }
        }
        let endpoint = agent.dry_move(offset, length);

        // 3. Truncate at the nearest crossing with an existing edge
        if !end_branch {
            if let Some((distance, e1, e2)) =
                self.nearest_crossing(last.position(), endpoint, params.highway_edges_only, length)
            {
                length = distance;
                end_branch = true;
                split = Some((e1, e2));
            }
        }

        // 4. Snap onto a nearby node instead of creating a twin
        if !end_branch {
            if let Some(target) = self.snap_target(endpoint, &params) {
                self.graph.connect(last, target);
                end_branch = true;
                make_node = false;
            }
        }

        // 5. Near-miss: an edge just past the endpoint also ends the branch
        if !end_branch {
            let trial_length = length + self.config.extension_margin;
            let trial_end = agent.dry_move(offset, trial_length);
            if let Some((distance, e1, e2)) = self.nearest_crossing(
                last.position(),
                trial_end,
                params.highway_edges_only,
                trial_length,
            ) {
                length = distance;
                end_branch = true;
                split = Some((e1, e2));
            }
        }

        // 6. Commit
        if make_node {
            agent.rotate(offset);
            agent.move_forward(length);
            let new_node = agent.make_node();
            self.graph.connect(last, new_node);
            if let Some((e1, e2)) = split {
                self.graph.split_edge(e1, e2, new_node);
            }
        }

        // 7. Branch management
        if end_branch {
            return terminated;
        }
        let spawned = if self.rng.next_value() < params.branch_prob {
            Some(self.spawn_branch(agent))
        } else {
            None
        };
        StepOutcome {
            survives: true,
            spawned,
        }
    }

    /// Sample candidate headings and keep the one whose forward population,
    /// weighted 1/distance, is highest
    fn pick_direction(&mut self, agent: &Turtle) -> f64 {
        let half_spread = self.config.direction_spread_deg / 2.0;
        let mut best_offset = 0.0;
        let mut best_weight = f64::NEG_INFINITY;
        for _ in 0..self.config.direction_samples {
            let candidate = self.rng.range(-half_spread, half_spread);
            let mut weight = 0.0;
            for step in 1..=self.config.sample_length {
                let distance = step as f64;
                weight += self.field.population_density(agent.dry_move(candidate, distance))
                    / distance;
            }
            if weight > best_weight {
                best_weight = weight;
                best_offset = candidate;
            }
        }
        best_offset
    }

    /// Bounded search for a legal variant of an off-land segment: rotate
    /// outward in symmetric steps first, then try reaching across the
    /// obstacle with a longer segment; None terminates the branch
    fn correct_segment(
        &self,
        agent: &Turtle,
        offset: f64,
        length: f64,
        params: &ClassParams,
    ) -> Option<(f64, f64)> {
        if !params.self_corrects {
            return None;
        }
        let step = self.config.max_correction_angle_deg / self.config.rotation_steps as f64;
        for i in 0..=self.config.rotation_steps {
            let delta = step * i as f64;
            if self.field.population_density(agent.dry_move(offset + delta, length)) >= 0.0 {
                return Some((offset + delta, length));
            }
            if self.field.population_density(agent.dry_move(offset - delta, length)) >= 0.0 {
                return Some((offset - delta, length));
            }
        }
        // Unit extensions up to twice the base segment length
        let max_extension = length.round() as u32;
        for extension in 1..=max_extension {
            let trial = length + extension as f64;
            if self.field.population_density(agent.dry_move(offset, trial)) >= 0.0 {
                return Some((offset, trial));
            }
        }
        None
    }

    /// Closest interior crossing between (from, to) and an existing edge
    /// within `limit` of `from`, with the endpoints of the crossed edge
    fn nearest_crossing(
        &self,
        from: DVec2,
        to: DVec2,
        highway_edges_only: bool,
        limit: f64,
    ) -> Option<(f64, Node, Node)> {
        let probe = Node::new(to, RoadClass::Generic);
        // Edges reach up to a highway segment away from their endpoints
        let radius = self.config.highway_segment_length.max(limit);
        let mut best: Option<(f64, Node, Node)> = None;
        for node in self.graph.nodes_near(&probe, radius) {
            for neighbor in self.graph.adjacent(&node) {
                if highway_edges_only
                    && EdgeClass::from_endpoints(node.class, neighbor.class) != EdgeClass::Highway
                {
                    continue;
                }
                let Some(hit) =
                    segment_intersection(from, to, node.position(), neighbor.position())
                else {
                    continue;
                };
                let distance = from.distance(hit);
                if distance < limit && best.is_none_or(|(d, _, _)| distance < d) {
                    best = Some((distance, node, *neighbor));
                }
            }
        }
        best
    }

    /// Nearest eligible node within the snap radius of `endpoint`
    fn snap_target(&self, endpoint: DVec2, params: &ClassParams) -> Option<Node> {
        let probe = Node::new(endpoint, RoadClass::Generic);
        let mut nearest: Option<(f64, Node)> = None;
        for node in self.graph.nodes_near(&probe, self.config.snap_radius) {
            let eligible = node.class == RoadClass::Highway
                || (params.snaps_to_streets && node.class == RoadClass::Street);
            if !eligible {
                continue;
            }
            let distance = endpoint.distance(node.position());
            if nearest.is_none_or(|(d, _)| distance < d) {
                nearest = Some((distance, node));
            }
        }
        nearest.map(|(_, node)| node)
    }

    fn spawn_branch(&mut self, agent: &Turtle) -> Turtle {
        let class = if agent.class() == RoadClass::Highway {
            if self.rng.next_value() < self.config.highway_branch_street_prob {
                RoadClass::Street
            } else {
                RoadClass::Highway
            }
        } else {
            RoadClass::Street
        };
        let mut branch = agent.duplicate_as(class);
        branch.rotate(90.0);
        branch
    }

    /// Pick a growth origin: a random open tile (lower corner on land),
    /// then a rejection-sampled point inside it with positive density.
    /// Bounded tries per tile and across tiles; None means the map has no
    /// legal starting point
    fn starting_point(&mut self) -> Option<DVec2> {
        let size = self.config.map_size;
        let tile = (size / 5.0).floor();
        let mut open: Vec<DVec2> = Vec::new();
        let mut x = -size;
        while x < size {
            let mut y = -size;
            while y < size {
                if self.field.is_land(DVec2::new(x, y)) {
                    open.push(DVec2::new(x, y));
                }
                y += tile;
            }
            x += tile;
        }
        if open.is_empty() {
            return None;
        }
        for _ in 0..self.config.start_tile_tries {
            let corner = open[self.rng.index(open.len())];
            for _ in 0..self.config.start_point_tries {
                let candidate = corner
                    + DVec2::new(self.rng.range(0.0, tile), self.rng.range(0.0, tile));
                if self.field.population_density(candidate) > 0.0 {
                    return Some(candidate);
                }
            }
        }
        None
    }
}
