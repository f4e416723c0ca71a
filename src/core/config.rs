//! Generator configuration with documented constants
//!
//! All tuning knobs for field evaluation, road growth, and building
//! placement are collected here with explanations of their purpose and how
//! they interact with each other.

use glam::DVec2;

use crate::core::error::{CityError, Result};

/// Configuration for one city generation run
///
/// These values have been tuned to produce plausible road networks on a
/// 50-unit map. Changing them changes the city; identical configs always
/// reproduce identical cities.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    // === TERRAIN / POPULATION FIELD ===
    /// Half-extent of the map in world units
    ///
    /// The field reports positions beyond `map_size + 50` on either axis as
    /// non-buildable, and the building grid covers `2 * map_size` unit cells
    /// per side. Must be at least 5 so the starting-tile partition is
    /// non-degenerate.
    pub map_size: f64,

    /// Fraction of the terrain noise range classified as land, in [0, 1]
    ///
    /// Classification compares 3-octave terrain noise against
    /// `land_ratio - 0.075`; the 0.075 offset keeps a coastline margin so
    /// roads do not hug the waterline.
    pub land_ratio: f64,

    /// Seed vector for the land/water terrain noise
    pub terrain_seed: DVec2,

    /// Seed vector for the population-density noise
    pub population_seed: DVec2,

    // === RANDOM STREAM ===
    /// Initial value of the sine-hash random accumulator
    ///
    /// Reset at the start of every `generate` call so repeated runs of the
    /// same engine replay the same stream.
    pub rng_seed: DVec2,

    // === DIRECTION SELECTION ===
    /// Number of candidate headings sampled per highway step
    pub direction_samples: u32,

    /// Total angular spread of candidate headings, centered on the current
    /// heading (degrees); candidates fall within +/- half of this
    pub direction_spread_deg: f64,

    /// How far ahead (world units) each candidate heading samples the
    /// population field; nearer samples are weighted 1/distance heavier
    pub sample_length: u32,

    // === LEGALITY CORRECTION ===
    /// Maximum angular deviation a highway may rotate to get back on land
    /// (degrees)
    pub max_correction_angle_deg: f64,

    /// Number of symmetric angular correction steps between 0 and
    /// `max_correction_angle_deg`
    pub rotation_steps: u32,

    // === SEGMENTS / SNAPPING ===
    /// Length of one highway segment (world units)
    pub highway_segment_length: f64,

    /// Length of one street segment (world units)
    ///
    /// Streets are short and straight; the grid texture of the city comes
    /// from their high branch probability rather than from steering.
    pub street_segment_length: f64,

    /// Endpoints within this distance of an existing eligible node merge
    /// into it instead of creating a new node
    ///
    /// Must stay below `street_segment_length` or every street step would
    /// snap back onto its own origin neighborhood.
    pub snap_radius: f64,

    /// Extra length appended to a committed segment when probing for a
    /// near-miss intersection just beyond the endpoint
    pub extension_margin: f64,

    // === BRANCHING ===
    /// Per-step probability that a surviving highway agent spawns a
    /// perpendicular branch
    pub highway_branch_prob: f64,

    /// Probability that a freshly spawned highway branch is downgraded to a
    /// street agent
    pub highway_branch_street_prob: f64,

    /// Per-step probability that a surviving street agent spawns a
    /// perpendicular street branch
    pub street_branch_prob: f64,

    // === STARTING POINT SEARCH ===
    /// How many random open tiles to try before giving up on a run
    pub start_tile_tries: u32,

    /// How many rejection samples to draw inside one tile before moving on
    pub start_point_tries: u32,

    // === BUILDING PLACEMENT ===
    /// Minimum radius (world units) around a grid cell searched for road
    /// edges when marking cells unusable; the effective radius is at least
    /// twice `highway_segment_length` so extended segments are never missed
    pub road_clearance_radius: f64,

    /// Population density above which the skyscraper massing may trigger
    pub skyscraper_density: f64,

    /// Probability gate applied on top of the density threshold before the
    /// skyscraper massing replaces the layered one
    pub skyscraper_prob: f64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            map_size: 50.0,
            land_ratio: 0.6,
            terrain_seed: DVec2::new(0.1234, 0.5678),
            population_seed: DVec2::new(0.4112, 0.9382),
            rng_seed: DVec2::new(0.46123, 0.93452),
            direction_samples: 7,
            direction_spread_deg: 60.0,
            sample_length: 50,
            max_correction_angle_deg: 70.0,
            rotation_steps: 5,
            highway_segment_length: 3.0,
            street_segment_length: 1.0,
            snap_radius: 0.75,
            extension_margin: 2.0,
            highway_branch_prob: 0.10,
            highway_branch_street_prob: 0.6,
            street_branch_prob: 0.30,
            start_tile_tries: 32,
            start_point_tries: 32,
            road_clearance_radius: 3.0,
            skyscraper_density: 0.7,
            skyscraper_prob: 0.5,
        }
    }
}

impl GeneratorConfig {
    /// Validate the configuration, returning it unchanged on success
    ///
    /// Malformed configuration is the only condition that aborts generation
    /// outright; everything downstream recovers locally.
    pub fn validate(self) -> Result<Self> {
        if !self.map_size.is_finite() || self.map_size < 5.0 {
            return Err(CityError::InvalidConfig(format!(
                "map_size must be finite and at least 5.0, got {}",
                self.map_size
            )));
        }
        if !(0.0..=1.0).contains(&self.land_ratio) {
            return Err(CityError::InvalidConfig(format!(
                "land_ratio must be in [0, 1], got {}",
                self.land_ratio
            )));
        }
        if self.rotation_steps == 0 {
            return Err(CityError::InvalidConfig(
                "rotation_steps must be positive".into(),
            ));
        }
        if self.highway_segment_length <= 0.0 || self.street_segment_length <= 0.0 {
            return Err(CityError::InvalidConfig(
                "segment lengths must be positive".into(),
            ));
        }
        if self.snap_radius >= self.street_segment_length {
            return Err(CityError::InvalidConfig(format!(
                "snap_radius ({}) must be smaller than street_segment_length ({})",
                self.snap_radius, self.street_segment_length
            )));
        }
        Ok(self)
    }
}
