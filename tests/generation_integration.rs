//! Integration tests for the full generation pipeline
//!
//! These tests verify the engine-level contract:
//! - A zero-budget run plants exactly the root node on valid land
//! - Identical configurations reproduce identical cities, run to run and
//!   engine to engine
//! - Node counts grow monotonically with the iteration budget
//! - Building placement respects the cell grid and the requested count
//!
//! The reference scenario: map size 50, land ratio 0.6, terrain seed
//! (0.1234, 0.5678), population seed (0.4112, 0.9382).

use cityforge::core::config::GeneratorConfig;
use cityforge::core::error::CityError;
use cityforge::core::types::EdgeClass;
use cityforge::generator::CityGenerator;
use glam::DVec2;

fn scenario_config() -> GeneratorConfig {
    GeneratorConfig {
        map_size: 50.0,
        land_ratio: 0.6,
        terrain_seed: DVec2::new(0.1234, 0.5678),
        population_seed: DVec2::new(0.4112, 0.9382),
        ..Default::default()
    }
}

/// Sortable, orientation-normalized encoding of an edge list
fn edge_set(generator: &CityGenerator) -> Vec<(u64, u64, u64, u64, bool)> {
    let mut edges: Vec<(u64, u64, u64, u64, bool)> = generator
        .edges()
        .iter()
        .map(|e| {
            let a = (e.a.x.to_bits(), e.a.y.to_bits());
            let b = (e.b.x.to_bits(), e.b.y.to_bits());
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            (lo.0, lo.1, hi.0, hi.1, e.class == EdgeClass::Highway)
        })
        .collect();
    edges.sort_unstable();
    edges
}

// ============================================================================
// Growth Contract
// ============================================================================

#[test]
fn test_zero_budget_plants_a_single_land_valid_root() {
    let mut generator = CityGenerator::new(scenario_config()).unwrap();
    generator.generate(0).unwrap();

    assert_eq!(generator.graph().num_nodes(), 1);
    assert_eq!(generator.graph().num_edges(), 0);

    let root = generator.graph().nodes().next().unwrap();
    assert!(generator.population_density(root.position()) > 0.0);
    assert!(generator.is_land(root.position()));
}

#[test]
fn test_identical_engines_grow_identical_cities() {
    let mut first = CityGenerator::new(scenario_config()).unwrap();
    let mut second = CityGenerator::new(scenario_config()).unwrap();
    first.generate(800).unwrap();
    second.generate(800).unwrap();

    assert_eq!(first.graph().num_nodes(), second.graph().num_nodes());
    assert_eq!(first.graph().num_edges(), second.graph().num_edges());
    assert_eq!(edge_set(&first), edge_set(&second));
}

#[test]
fn test_regenerate_rewinds_the_random_stream() {
    let mut generator = CityGenerator::new(scenario_config()).unwrap();
    generator.generate(500).unwrap();
    let first = edge_set(&generator);

    // Same engine, same budget: the prior graph is discarded and rebuilt
    generator.generate(500).unwrap();
    assert_eq!(edge_set(&generator), first);
}

#[test]
fn test_node_count_monotonic_in_iteration_budget() {
    let mut counts = Vec::new();
    for budget in [0usize, 10, 50, 200, 800] {
        let mut generator = CityGenerator::new(scenario_config()).unwrap();
        generator.generate(budget).unwrap();
        counts.push(generator.graph().num_nodes());
    }
    assert!(
        counts.windows(2).all(|w| w[0] <= w[1]),
        "node counts not monotonic: {counts:?}"
    );
}

#[test]
fn test_grown_graph_stays_consistent() {
    let mut generator = CityGenerator::new(scenario_config()).unwrap();
    generator.generate(600).unwrap();
    let graph = generator.graph();

    // Adjacency symmetry and no self-loops, over the whole grown graph
    let mut half_edges = 0;
    for node in graph.nodes() {
        for neighbor in graph.adjacent(node) {
            assert_ne!(node, neighbor, "self-loop at {:?}", node.position());
            assert!(
                graph.adjacent(neighbor).contains(node),
                "asymmetric edge at {:?}", node.position()
            );
            half_edges += 1;
        }
    }
    assert_eq!(half_edges / 2, graph.num_edges());

    // Components partition the node set
    let total: usize = graph.connected_components().iter().map(Vec::len).sum();
    assert_eq!(total, graph.num_nodes());
}

#[test]
fn test_all_water_map_fails_with_no_starting_point() {
    let config = GeneratorConfig {
        land_ratio: 0.0,
        ..scenario_config()
    };
    let mut generator = CityGenerator::new(config).unwrap();
    let result = generator.generate(100);
    assert!(matches!(result, Err(CityError::NoStartingPoint)));
}

#[test]
fn test_invalid_config_rejected_at_construction() {
    let config = GeneratorConfig {
        map_size: -1.0,
        ..Default::default()
    };
    assert!(matches!(
        CityGenerator::new(config),
        Err(CityError::InvalidConfig(_))
    ));
}

// ============================================================================
// Building Placement
// ============================================================================

#[test]
fn test_building_batch_respects_count_and_cells() {
    let mut generator = CityGenerator::new(scenario_config()).unwrap();
    generator.generate(600).unwrap();

    let footprints = generator.place_buildings(120);
    assert!(footprints.len() <= 120);

    // One footprint per grid cell per batch
    let mut cells: Vec<(i64, i64)> = footprints
        .iter()
        .map(|f| (f.position.x.floor() as i64, f.position.y.floor() as i64))
        .collect();
    cells.sort_unstable();
    cells.dedup();
    assert_eq!(cells.len(), footprints.len());

    for footprint in &footprints {
        assert!(!footprint.layers.is_empty());
        for pair in footprint.layers.windows(2) {
            assert!(pair[0].height < pair[1].height);
        }
    }
}

#[test]
fn test_building_placement_is_deterministic() {
    let run = || {
        let mut generator = CityGenerator::new(scenario_config()).unwrap();
        generator.generate(400).unwrap();
        generator.place_buildings(80)
    };
    assert_eq!(run(), run());
}

// ============================================================================
// Field Passthroughs
// ============================================================================

#[test]
fn test_land_ratio_tuning_flows_through() {
    let mut generator = CityGenerator::new(scenario_config()).unwrap();
    let pos = DVec2::new(7.0, -3.0);
    // Ratios past the noise range force the classification both ways
    generator.set_land_ratio(1.5);
    assert!(generator.is_land(pos));
    generator.set_land_ratio(0.0);
    assert!(!generator.is_land(pos));
    assert!(generator.population_density(pos) < 0.0);
}
