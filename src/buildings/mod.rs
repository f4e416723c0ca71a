//! Building placement over the finished road network
//!
//! The map is rasterized into unit cells. Cells touching water, the map
//! boundary, or the path of a road are unusable; empty cells next to an
//! unusable one become the eligible sites, so every building fronts a road,
//! the shore, or the map edge. Placement samples eligible cells without
//! replacement and emits footprint records with population-scaled massing.

use glam::DVec2;
use tracing::{debug, info};

use crate::core::config::GeneratorConfig;
use crate::core::types::RoadClass;
use crate::field::GeoField;
use crate::graph::{Node, SpatialGraph};
use crate::growth::geometry::segment_intersection;
use crate::growth::rng::SineRng;

/// Per-layer shrink factor of the massing
const LAYER_SCALE_FALLOFF: f64 = 0.8;

/// Fixed skyscraper massing, bottom to top: (height, scale)
const SKYSCRAPER_LAYERS: [(f64, f64); 6] = [
    (0.75, 1.5),
    (3.0, 1.2),
    (6.0, 1.1),
    (6.2, 1.0),
    (6.4, 0.9),
    (8.0, 0.2),
];

/// Polygon side count of a footprint layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SideCount {
    Four,
    Five,
    Six,
    Eight,
}

impl SideCount {
    pub fn sides(&self) -> u8 {
        match self {
            SideCount::Four => 4,
            SideCount::Five => 5,
            SideCount::Six => 6,
            SideCount::Eight => 8,
        }
    }

    fn from_draw(index: usize) -> Self {
        match index {
            0 => SideCount::Four,
            1 => SideCount::Five,
            2 => SideCount::Six,
            _ => SideCount::Eight,
        }
    }
}

/// One stacked layer of a building
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BuildingLayer {
    pub sides: SideCount,
    /// Top of this layer above ground; strictly increasing up the stack
    pub height: f64,
    /// Horizontal scale relative to a unit cell
    pub scale: f64,
    /// Lateral offset of this layer from the footprint center
    pub offset: DVec2,
}

/// Terminal output record for one building; never mutated after creation
#[derive(Debug, Clone, PartialEq)]
pub struct Footprint {
    /// Center of the cell this building occupies, in map space
    pub position: DVec2,
    pub layers: Vec<BuildingLayer>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CellState {
    Unavailable,
    Available,
    Empty,
}

/// Rasterized placement grid plus the sampling pass over it
pub struct BuildingPlacer<'a> {
    field: &'a GeoField,
    config: &'a GeneratorConfig,
    half_side: f64,
    grid: Vec<Vec<CellState>>,
    available: Vec<(usize, usize)>,
}

impl<'a> BuildingPlacer<'a> {
    pub fn new(field: &'a GeoField, graph: &SpatialGraph, config: &'a GeneratorConfig) -> Self {
        let half_side = config.map_size.floor();
        let side = (2.0 * half_side) as usize;
        let mut placer = Self {
            field,
            config,
            half_side,
            grid: vec![vec![CellState::Empty; side]; side],
            available: Vec::new(),
        };
        placer.mask_water();
        placer.mask_roads(graph);
        placer.promote_frontage();
        placer.collect_available();
        debug!(
            side,
            available = placer.available.len(),
            "building grid rasterized"
        );
        placer
    }

    fn cell_anchor(&self, i: usize, j: usize) -> DVec2 {
        DVec2::new(i as f64 - self.half_side, j as f64 - self.half_side)
    }

    /// Mark cells with a water or out-of-range corner unusable, together
    /// with the neighbors sharing that corner
    fn mask_water(&mut self) {
        let side = self.grid.len();
        for i in 0..side {
            for j in 0..side {
                if self.field.population_density(self.cell_anchor(i, j)) < 0.0 {
                    self.grid[i][j] = CellState::Unavailable;
                    self.grid[i.saturating_sub(1)][j] = CellState::Unavailable;
                    self.grid[i][j.saturating_sub(1)] = CellState::Unavailable;
                    self.grid[i.saturating_sub(1)][j.saturating_sub(1)] = CellState::Unavailable;
                }
            }
        }
    }

    /// Mark cells crossed by a road edge unusable
    ///
    /// Each cell tests its +x and +y grid lines against every edge near the
    /// cell; a hit also voids the neighbor on the other side of that line.
    fn mask_roads(&mut self, graph: &SpatialGraph) {
        // Corrected highway segments reach twice the base length, so a
        // crossing edge can hold both endpoints outside the configured
        // clearance of the cell it crosses; the query must cover that reach
        let clearance = self
            .config
            .road_clearance_radius
            .max(2.0 * self.config.highway_segment_length);
        let side = self.grid.len();
        for i in 0..side {
            for j in 0..side {
                let anchor = self.cell_anchor(i, j);
                let probe = Node::new(anchor, RoadClass::Generic);
                for node in graph.nodes_near(&probe, clearance) {
                    for neighbor in graph.adjacent(&node) {
                        let edge = (node.position(), neighbor.position());
                        let along_x = segment_intersection(
                            anchor,
                            anchor + DVec2::new(1.0, 0.0),
                            edge.0,
                            edge.1,
                        );
                        if along_x.is_some() {
                            self.grid[i][j] = CellState::Unavailable;
                            if j > 0 {
                                self.grid[i][j - 1] = CellState::Unavailable;
                            }
                        }
                        let along_y = segment_intersection(
                            anchor,
                            anchor + DVec2::new(0.0, 1.0),
                            edge.0,
                            edge.1,
                        );
                        if along_y.is_some() {
                            self.grid[i][j] = CellState::Unavailable;
                            if i > 0 {
                                self.grid[i - 1][j] = CellState::Unavailable;
                            }
                        }
                    }
                }
            }
        }
    }

    /// Empty cells 4-adjacent to an unusable one become the placement sites
    fn promote_frontage(&mut self) {
        let side = self.grid.len();
        let mut promoted = Vec::new();
        for i in 0..side {
            for j in 0..side {
                if self.grid[i][j] != CellState::Empty {
                    continue;
                }
                let mut fronts = false;
                if i > 0 {
                    fronts |= self.grid[i - 1][j] == CellState::Unavailable;
                }
                if j > 0 {
                    fronts |= self.grid[i][j - 1] == CellState::Unavailable;
                }
                if i + 1 < side {
                    fronts |= self.grid[i + 1][j] == CellState::Unavailable;
                }
                if j + 1 < side {
                    fronts |= self.grid[i][j + 1] == CellState::Unavailable;
                }
                if fronts {
                    promoted.push((i, j));
                }
            }
        }
        for (i, j) in promoted {
            self.grid[i][j] = CellState::Available;
        }
    }

    fn collect_available(&mut self) {
        self.available.clear();
        for i in 0..self.grid.len() {
            for j in 0..self.grid[i].len() {
                if self.grid[i][j] == CellState::Available {
                    self.available.push((i, j));
                }
            }
        }
    }

    /// Number of cells still eligible for placement
    pub fn available_cells(&self) -> usize {
        self.available.len()
    }

    /// Emit up to `max` footprints on random available cells, consuming
    /// each cell; the batch replaces any prior one
    pub fn place(&mut self, max: usize, rng: &mut SineRng) -> Vec<Footprint> {
        let mut footprints = Vec::new();
        while footprints.len() < max && !self.available.is_empty() {
            let idx = rng.index(self.available.len());
            let (i, j) = self.available.remove(idx);
            self.grid[i][j] = CellState::Unavailable;
            let center = self.cell_anchor(i, j) + DVec2::splat(0.5);
            footprints.push(self.make_footprint(center, rng));
        }
        info!(count = footprints.len(), "placed buildings");
        footprints
    }

    /// Population-scaled massing: denser cells get more, taller layers;
    /// very dense cells sometimes get the fixed skyscraper silhouette
    fn make_footprint(&self, position: DVec2, rng: &mut SineRng) -> Footprint {
        let density = self.field.population_density(position);

        if density > self.config.skyscraper_density
            && rng.next_value() < self.config.skyscraper_prob
        {
            let layers = SKYSCRAPER_LAYERS
                .iter()
                .map(|&(height, scale)| BuildingLayer {
                    sides: SideCount::Four,
                    height,
                    scale,
                    offset: DVec2::ZERO,
                })
                .collect();
            return Footprint { position, layers };
        }

        let layer_count = (rng.range(1.0, 0.5 + density * 4.0).floor() as i64).max(1) as usize;

        let mut heights = Vec::with_capacity(layer_count);
        let mut running = 0.0;
        for _ in 0..layer_count {
            running += rng.range(1.0, 1.0 + density * 4.0);
            heights.push(running);
        }

        let mut base_scale = rng.range(0.8, 1.4);
        if density > self.config.skyscraper_density {
            base_scale = 1.5;
        }

        let mut layers = Vec::with_capacity(layer_count);
        for (index, &height) in heights.iter().enumerate() {
            let scale = base_scale * LAYER_SCALE_FALLOFF.powi(index as i32);
            let drawn = SideCount::from_draw(rng.index(4));
            // Single-layer buildings are always simple boxes
            let sides = if layer_count == 1 {
                SideCount::Four
            } else {
                drawn
            };
            let wiggle = 1.5 - scale;
            let offset = DVec2::new(rng.range(-wiggle, wiggle), rng.range(-wiggle, wiggle));
            layers.push(BuildingLayer {
                sides,
                height,
                scale,
                offset,
            });
        }
        Footprint { position, layers }
    }
}
