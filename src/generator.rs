//! Top-level generation facade
//!
//! Owns the field, the random stream, and the current road graph, and
//! exposes the surface rendering/demo collaborators consume: grow a city,
//! list its edges, place buildings over it, and tune the land ratio live.

use glam::DVec2;

use ahash::AHashSet;

use crate::buildings::{BuildingPlacer, Footprint};
use crate::core::config::GeneratorConfig;
use crate::core::error::Result;
use crate::core::types::{EdgeClass, EdgeRecord};
use crate::field::GeoField;
use crate::graph::{Node, SpatialGraph};
use crate::growth::{RoadGrowthEngine, SineRng};

pub struct CityGenerator {
    config: GeneratorConfig,
    field: GeoField,
    rng: SineRng,
    graph: SpatialGraph,
}

impl CityGenerator {
    /// Build a generator from a validated configuration
    pub fn new(config: GeneratorConfig) -> Result<Self> {
        let config = config.validate()?;
        let field = GeoField::new(
            config.terrain_seed,
            config.population_seed,
            config.land_ratio,
            config.map_size,
        );
        let rng = SineRng::new(config.rng_seed);
        Ok(Self {
            config,
            field,
            rng,
            graph: SpatialGraph::new(),
        })
    }

    /// Grow a fresh road network, replacing any prior one
    ///
    /// The random accumulator is rewound first, so repeated calls with the
    /// same budget rebuild the same city rather than extending the old one.
    pub fn generate(&mut self, max_iterations: usize) -> Result<()> {
        self.rng.reset(self.config.rng_seed);
        let engine = RoadGrowthEngine::new(&self.field, &self.config, &mut self.rng);
        self.graph = engine.grow(max_iterations)?;
        Ok(())
    }

    /// Every road segment with its class, each undirected edge once
    pub fn edges(&self) -> Vec<EdgeRecord> {
        let mut seen: AHashSet<(Node, Node)> = AHashSet::new();
        let mut records = Vec::with_capacity(self.graph.num_edges());
        for node in self.graph.nodes() {
            for neighbor in self.graph.adjacent(node) {
                if !seen.insert((*node, *neighbor)) {
                    continue;
                }
                seen.insert((*neighbor, *node));
                records.push(EdgeRecord {
                    a: node.position(),
                    b: neighbor.position(),
                    class: EdgeClass::from_endpoints(node.class, neighbor.class),
                });
            }
        }
        records
    }

    /// Rasterize the current network and place up to `max` buildings
    ///
    /// Each call rebuilds the cell grid from the current graph and produces
    /// a fresh batch; footprints from earlier calls are superseded.
    pub fn place_buildings(&mut self, max: usize) -> Vec<Footprint> {
        let mut placer = BuildingPlacer::new(&self.field, &self.graph, &self.config);
        placer.place(max, &mut self.rng)
    }

    /// Live-tune the land/water split; affects subsequent queries and runs
    pub fn set_land_ratio(&mut self, ratio: f64) {
        self.field.set_land_ratio(ratio);
    }

    pub fn population_density(&self, pos: DVec2) -> f64 {
        self.field.population_density(pos)
    }

    pub fn is_land(&self, pos: DVec2) -> bool {
        self.field.is_land(pos)
    }

    pub fn graph(&self) -> &SpatialGraph {
        &self.graph
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }
}
