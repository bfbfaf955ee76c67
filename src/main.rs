use clap::{Parser, ValueEnum};

use cave_generator::ascii::{self, AsciiMode};
use cave_generator::config::{CaveConfig, MapConfig, SeedSource};
use cave_generator::{caves, export, logging, mesh, verify, Result};

/// Starting parameter set
#[derive(Clone, Copy, Debug, ValueEnum)]
enum Preset {
    Default,
    Small,
    Large,
    Open,
    Dense,
}

impl Preset {
    fn map_config(self) -> MapConfig {
        match self {
            Preset::Default => MapConfig::default(),
            Preset::Small => MapConfig::small(),
            Preset::Large => MapConfig::large(),
            Preset::Open => MapConfig::open(),
            Preset::Dense => MapConfig::dense(),
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "cave_generator")]
#[command(about = "Generate connected cave maps and triangulate them into meshes")]
struct Args {
    /// JSON configuration file (flags below override its values)
    #[arg(short, long)]
    config: Option<String>,

    /// Parameter preset used when no config file is given
    #[arg(short, long, value_enum, default_value = "default")]
    preset: Preset,

    /// Map length in tiles (x axis, before the border)
    #[arg(short = 'L', long)]
    length: Option<usize>,

    /// Map width in tiles (y axis, before the border)
    #[arg(short = 'W', long)]
    width: Option<usize>,

    /// Random seed (uses random seed if not specified)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Initial wall density (0.0-1.0)
    #[arg(short, long)]
    density: Option<f64>,

    /// Wall border thickness added around the map
    #[arg(long)]
    border: Option<usize>,

    /// Tunnel radius in tiles
    #[arg(long)]
    tunnel_radius: Option<usize>,

    /// Tiles per mesh chunk side
    #[arg(long)]
    chunk_size: Option<usize>,

    /// Skip the floor mesh
    #[arg(long)]
    no_floor: bool,

    /// ASCII rendering mode for the printed map
    #[arg(long, value_enum, default_value = "tiles")]
    ascii: AsciiArg,

    /// Do not print the map to stdout
    #[arg(short, long)]
    quiet: bool,

    /// Export the map with statistics to a text file
    #[arg(long)]
    export: Option<String>,

    /// Export the map as a PNG image
    #[arg(long)]
    png: Option<String>,

    /// Pixels per tile in the PNG export
    #[arg(long, default_value = "4")]
    png_scale: u32,

    /// Export the mesh as a Wavefront OBJ file
    #[arg(long)]
    obj: Option<String>,

    /// Export the map and mesh as JSON
    #[arg(long)]
    json: Option<String>,

    /// Run the independent connectivity and mesh checks
    #[arg(long)]
    verify: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum AsciiArg {
    Tiles,
    Regions,
}

impl From<AsciiArg> for AsciiMode {
    fn from(arg: AsciiArg) -> Self {
        match arg {
            AsciiArg::Tiles => AsciiMode::Tiles,
            AsciiArg::Regions => AsciiMode::Regions,
        }
    }
}

fn build_config(args: &Args) -> Result<CaveConfig> {
    let mut config = match &args.config {
        Some(path) => CaveConfig::load(path)?,
        None => CaveConfig {
            map: args.preset.map_config(),
            ..Default::default()
        },
    };

    let map = &mut config.map;
    if let Some(length) = args.length {
        map.length = length;
    }
    if let Some(width) = args.width {
        map.width = width;
    }
    if args.seed.is_some() {
        map.seed = SeedSource::from(args.seed);
    }
    if let Some(density) = args.density {
        map.initial_density = density;
    }
    if let Some(border) = args.border {
        map.border_size = border;
    }
    if let Some(radius) = args.tunnel_radius {
        map.tunnel_radius = radius;
    }
    if let Some(chunk_size) = args.chunk_size {
        config.mesh.chunk_size = chunk_size;
    }
    if args.no_floor {
        config.mesh.generate_floor = false;
    }

    config.validate()?;
    Ok(config)
}

fn run(args: Args) -> Result<bool> {
    let config = build_config(&args)?;
    let seed = config.map.seed.resolve();

    println!("Generating cave with seed: {}", seed);
    println!(
        "Map size: {}x{} (+{} border)",
        config.map.length, config.map.width, config.map.border_size
    );

    let (map, stats) = caves::generate_with_stats(&config.map, seed)?;
    println!(
        "Connected {} rooms with {} tunnels ({} small wall regions and {} small floor regions removed)",
        stats.rooms_before_connect, stats.tunnels, stats.pruned_wall_regions, stats.pruned_floor_regions
    );
    println!(
        "Floor: {} tiles ({:.1}%)",
        stats.floor_tiles,
        100.0 * stats.floor_tiles as f64 / (map.length() * map.width()) as f64
    );

    if !args.quiet {
        println!();
        print!("{}", ascii::render_ascii_map(&map, args.ascii.into()));
        println!();
    }

    let needs_mesh = args.obj.is_some() || args.json.is_some() || args.verify;
    let cave_mesh = if needs_mesh {
        let cave_mesh = mesh::triangulate(&map, &config.mesh)?;
        println!(
            "Mesh: {} chunks, {} outlines, {} vertices, {} triangles",
            cave_mesh.chunks.len(),
            cave_mesh.outline_count(),
            cave_mesh.vertex_count(),
            cave_mesh.triangle_count()
        );
        Some(cave_mesh)
    } else {
        None
    };

    if let Some(path) = &args.export {
        ascii::export_map_file(&map, Some(&stats), path)?;
        println!("Exported map to {}", path);
    }
    if let Some(path) = &args.png {
        export::export_map_png(&map, path, args.png_scale)?;
        println!("Exported image to {}", path);
    }
    if let (Some(path), Some(cave_mesh)) = (&args.obj, &cave_mesh) {
        export::export_mesh_obj(cave_mesh, path)?;
        println!("Exported mesh to {}", path);
    }
    if let Some(path) = &args.json {
        export::export_json(&map, cave_mesh.as_ref(), path)?;
        println!("Exported JSON to {}", path);
    }

    if args.verify {
        let report = match &cave_mesh {
            Some(cave_mesh) => verify::verify_all(&map, cave_mesh),
            None => verify::verify_map(&map),
        };
        print!("{}", report.format());
        return Ok(report.passed());
    }

    Ok(true)
}

fn main() {
    logging::init();
    let args = Args::parse();

    match run(args) {
        Ok(true) => {}
        Ok(false) => std::process::exit(2),
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    }
}
