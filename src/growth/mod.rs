//! Road-network growth
//!
//! A population of turtle agents extends the spatial graph one segment at a
//! time: highways steer toward dense population and self-correct around
//! water, streets grow straight and branch aggressively. All randomness
//! comes from one deterministic sine-hash stream consumed in a fixed agent
//! order, so a given configuration always grows the same city.

pub mod engine;
pub mod geometry;
pub mod rng;
pub mod turtle;

pub use engine::RoadGrowthEngine;
pub use rng::SineRng;
pub use turtle::Turtle;
