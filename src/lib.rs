//! Cityforge - procedural city layout generation
//!
//! Synthesizes a plausible city over a bounded 2D terrain: a hierarchical
//! road network (highways and streets) grown by turtle agents over a
//! population field, and building footprints placed along the resulting
//! roads. Output is plain geometric data; rendering is someone else's job.

pub mod buildings;
pub mod core;
pub mod field;
pub mod generator;
pub mod graph;
pub mod growth;
