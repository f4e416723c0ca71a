//! Headless generation demo
//!
//! Grows a city from the command line and prints summary statistics, useful
//! for eyeballing parameter changes without a renderer attached.

use clap::Parser;
use glam::DVec2;
use tracing_subscriber::EnvFilter;

use cityforge::core::config::GeneratorConfig;
use cityforge::core::types::EdgeClass;
use cityforge::generator::CityGenerator;

#[derive(Parser, Debug)]
#[command(name = "forge_city", about = "Generate a city layout and print statistics")]
struct Args {
    /// Half-extent of the map in world units
    #[arg(long, default_value_t = 50.0)]
    map_size: f64,

    /// Land/water ratio in [0, 1]
    #[arg(long, default_value_t = 0.6)]
    land_ratio: f64,

    /// Growth iteration budget (agent steps)
    #[arg(long, default_value_t = 2000)]
    iterations: usize,

    /// Maximum number of buildings to place
    #[arg(long, default_value_t = 400)]
    buildings: usize,

    /// Terrain noise seed, two components
    #[arg(long, num_args = 2, default_values_t = [0.1234, 0.5678])]
    terrain_seed: Vec<f64>,

    /// Population noise seed, two components
    #[arg(long, num_args = 2, default_values_t = [0.4112, 0.9382])]
    population_seed: Vec<f64>,

    /// Print every edge as "x1 y1 x2 y2 class"
    #[arg(long)]
    dump_edges: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let config = GeneratorConfig {
        map_size: args.map_size,
        land_ratio: args.land_ratio,
        terrain_seed: DVec2::new(args.terrain_seed[0], args.terrain_seed[1]),
        population_seed: DVec2::new(args.population_seed[0], args.population_seed[1]),
        ..Default::default()
    };

    let mut generator = CityGenerator::new(config)?;
    generator.generate(args.iterations)?;

    let edges = generator.edges();
    let highways = edges
        .iter()
        .filter(|e| e.class == EdgeClass::Highway)
        .count();
    let footprints = generator.place_buildings(args.buildings);
    let components = generator.graph().connected_components();

    println!("nodes:      {}", generator.graph().num_nodes());
    println!("edges:      {} ({} highway, {} street)", edges.len(), highways, edges.len() - highways);
    println!("components: {}", components.len());
    println!("buildings:  {}", footprints.len());

    if args.dump_edges {
        for edge in &edges {
            let class = match edge.class {
                EdgeClass::Highway => "highway",
                EdgeClass::Street => "street",
            };
            println!("{} {} {} {} {}", edge.a.x, edge.a.y, edge.b.x, edge.b.y, class);
        }
    }
    Ok(())
}
