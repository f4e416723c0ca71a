//! Terrain and population oracle
//!
//! A pure scalar field over the map plane: land/water classification from
//! 3-octave fractal value noise, and a population-density scalar from
//! 2-octave noise squared. Every query is a pure function of (position,
//! seeds, land ratio) and reproduces bit-for-bit across runs; the only
//! mutable state is the land ratio, which UI collaborators tune live.

use glam::DVec2;

/// Density reported for water positions
pub const WATER_SENTINEL: f64 = -0.001;

/// Density reported for positions beyond the map margin
pub const OUT_OF_RANGE_SENTINEL: f64 = -0.003;

/// Positions farther than `map_size + MAP_MARGIN` from the origin on either
/// axis are non-buildable
const MAP_MARGIN: f64 = 50.0;

/// Coastline offset subtracted from the land ratio, so classification keeps
/// a margin of shallows around every landmass
const COAST_MARGIN: f64 = 0.075;

fn fract(x: f64) -> f64 {
    x - x.floor()
}

fn smoothstep(x: f64) -> f64 {
    let t = x.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

fn mix(x: f64, y: f64, a: f64) -> f64 {
    x * (1.0 - a) + y * a
}

/// Sine-based value hash of a lattice point, in [0, 1)
fn value_hash(p: DVec2, seed: DVec2) -> f64 {
    fract(((p + seed).dot(DVec2::new(127.1, 311.7))).sin() * 29.13)
}

/// Single octave of value noise: smoothstep-interpolated blend of the four
/// hashed corners of the unit cell containing `p`
fn value_noise(p: DVec2, seed: DVec2) -> f64 {
    let cell = p.floor();
    let c00 = value_hash(cell, seed);
    let c10 = value_hash(cell + DVec2::new(1.0, 0.0), seed);
    let c01 = value_hash(cell + DVec2::new(0.0, 1.0), seed);
    let c11 = value_hash(cell + DVec2::new(1.0, 1.0), seed);
    let tx = smoothstep(fract(p.x));
    let ty = smoothstep(fract(p.y));
    mix(mix(c00, c10, tx), mix(c01, c11, tx), ty)
}

/// Fractal Brownian motion: normalized sum of value-noise octaves with
/// persistence 0.5 and doubling frequency, in [0, 1]
pub fn fbm(p: DVec2, octaves: u32, base_frequency: f64, seed: DVec2) -> f64 {
    const PERSISTENCE: f64 = 0.5;

    let mut total = 0.0;
    let mut normalizer = 0.0;
    let mut frequency = base_frequency;
    let mut amplitude = PERSISTENCE;

    for _ in 0..octaves {
        normalizer += amplitude;
        total += value_noise(p * frequency, seed) * amplitude;
        frequency *= 2.0;
        amplitude *= PERSISTENCE;
    }
    total / normalizer
}

/// The terrain/population scalar field
#[derive(Debug, Clone)]
pub struct GeoField {
    terrain_seed: DVec2,
    population_seed: DVec2,
    land_ratio: f64,
    map_size: f64,
}

impl GeoField {
    pub fn new(terrain_seed: DVec2, population_seed: DVec2, land_ratio: f64, map_size: f64) -> Self {
        Self {
            terrain_seed,
            population_seed,
            land_ratio,
            map_size,
        }
    }

    /// Retune the land/water split; takes effect on the next query
    pub fn set_land_ratio(&mut self, ratio: f64) {
        self.land_ratio = ratio;
    }

    /// Whether `pos` is on land under the current land ratio
    pub fn is_land(&self, pos: DVec2) -> bool {
        fbm(pos, 3, 0.05, self.terrain_seed) < self.land_ratio - COAST_MARGIN
    }

    /// Population density at `pos`
    ///
    /// Valid land yields a value in [0, 1]; water and positions beyond the
    /// map margin yield distinct negative sentinels so callers can treat any
    /// negative result as non-buildable.
    pub fn population_density(&self, pos: DVec2) -> f64 {
        if !self.is_land(pos) {
            return WATER_SENTINEL;
        }
        if pos.x.abs() > self.map_size + MAP_MARGIN || pos.y.abs() > self.map_size + MAP_MARGIN {
            return OUT_OF_RANGE_SENTINEL;
        }
        fbm(pos, 2, 0.08, self.population_seed).powi(2)
    }
}
