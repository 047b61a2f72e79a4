//! Terrain generator binary: synthesizes a terrain, drags a brush across it
//! and prints statistics. Nothing is written to disk.
//!
//! Usage: cargo run --release --bin generate_terrain -- [OPTIONS]
//!
//! Options:
//!   --biome <ID>        Biome to generate (default: config initial biome)
//!   --size <TEXELS>     Square heightfield resolution (default: 512)
//!   --seed <SEED>       Noise seed (default: random)
//!   --biomes <FILE>     JSON biome table replacing the built-in profiles
//!   --config <FILE>     JSON editor configuration

use std::path::PathBuf;
use std::time::Instant;

use glam::Vec3;

use terrapaint::brush::BrushState;
use terrapaint::core::{EditorConfig, Result, logging};
use terrapaint::editor::{PointerEvent, TerrainEditor};
use terrapaint::raster::{Heightfield, MixMap};
use terrapaint::render::{GroundMeshOptions, HeadlessRenderer, MaterialLibrary, MaterialTexture, bake_specular};
use terrapaint::terrain::{BiomeId, BiomeTable, MixCategory};

/// Flat stand-in colors for the built-in material names
const MATERIAL_COLORS: &[(&str, [u8; 4])] = &[
    ("sand", [214, 196, 148, 255]),
    ("grass", [86, 140, 62, 255]),
    ("dirt", [120, 92, 64, 255]),
    ("rocks", [128, 128, 122, 255]),
    ("dry_ground", [168, 132, 96, 255]),
    ("desert_sand", [226, 190, 130, 255]),
    ("mesa", [178, 98, 64, 255]),
    ("cave_floor", [72, 66, 60, 255]),
    ("cave_rock", [96, 92, 88, 255]),
    ("cave_ceiling", [52, 50, 48, 255]),
    ("swamp", [64, 78, 52, 255]),
    ("mossy_grass", [92, 120, 64, 255]),
    ("moss", [70, 104, 56, 255]),
];

/// Brush steps in the scripted drag
const DRAG_STEPS: usize = 12;

fn main() {
    logging::builder().format_timestamp_millis().init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();

    let mut config = match parse_str_arg(&args, "--config") {
        Some(path) => EditorConfig::load(&PathBuf::from(path))?,
        None => EditorConfig::default(),
    };
    if let Some(size) = parse_u32_arg(&args, "--size") {
        config.resolution = [size, size];
    }
    if let Some(seed) = parse_u32_arg(&args, "--seed") {
        config.seed = Some(seed);
    }
    if let Some(biome) = parse_str_arg(&args, "--biome") {
        config.initial_biome = BiomeId::new(biome);
    }
    let biomes = match parse_str_arg(&args, "--biomes") {
        Some(path) => BiomeTable::load(&PathBuf::from(path))?,
        None => BiomeTable::builtin(),
    };

    let mut library = MaterialLibrary::new();
    for (name, color) in MATERIAL_COLORS {
        library.insert(*name, MaterialTexture::solid(*color));
    }

    let mut editor = TerrainEditor::new(config, biomes)?;
    let mut renderer = HeadlessRenderer::new(library);
    let max_height = editor.config().base_max_height * editor.profile().height_scale as f32;
    renderer.attach_ground(GroundMeshOptions::from_config(editor.config(), max_height))?;
    renderer.attach_material(&editor.profile().textures);

    let [width, height] = editor.config().resolution;
    println!("=== Terrapaint Terrain Generator ===");
    println!("Biome:      {}", editor.biome());
    println!("Resolution: {} x {}", width, height);
    println!("Map size:   {} units, {} subdivisions", editor.config().map_size, editor.config().subdivisions);
    println!();

    let start = Instant::now();
    editor.regenerate(&mut renderer);
    println!("Generated in {:.1}ms (seed {})", start.elapsed().as_secs_f64() * 1000.0, editor.seed());
    print_stats(editor.heightfield(), editor.mixmap());

    // Drag an add brush across the middle of the map
    let map_size = editor.config().map_size;
    *editor.brush_mut() = BrushState::add(Default::default(), (width.min(height) / 16).max(1) as f64, 0.5);

    let start = Instant::now();
    let mut texels = 0;
    editor.handle_pointer(PointerEvent::Down { primary: true }, &mut renderer)?;
    for step in 0..DRAG_STEPS {
        let t = step as f32 / (DRAG_STEPS - 1) as f32;
        let pick = Vec3::new((t - 0.5) * map_size * 0.5, 0.0, 0.0);
        if let Some(outcome) = editor.handle_pointer(PointerEvent::Move { pick: Some(pick) }, &mut renderer)? {
            texels += outcome.texels;
        }
    }
    editor.handle_pointer(PointerEvent::Up, &mut renderer)?;

    println!();
    println!(
        "Brushed {} stroke(s), {} steps (radius {}), {} texels in {:.1}ms",
        editor.session().strokes(),
        DRAG_STEPS,
        editor.brush().radius,
        texels,
        start.elapsed().as_secs_f64() * 1000.0
    );
    print_stats(editor.heightfield(), editor.mixmap());

    if let Some(ground) = renderer.ground() {
        let (low, high) = ground.height_range();
        println!();
        println!(
            "Mesh:     {} vertices, {} triangles, heights {:.3}..{:.3}",
            ground.vertex_count(),
            ground.triangle_count(),
            low,
            high
        );
    }
    println!(
        "Renderer: {} mesh refreshes, {} material refreshes",
        renderer.mesh_refreshes(),
        renderer.material_refreshes()
    );

    if let Some(diffuse) = renderer.bake_diffuse() {
        println!("Diffuse:  mean color {:?}", mean_color(diffuse.pixels()));
    }
    let specular = bake_specular(editor.heightfield());
    println!("Specular: mean {}", mean_color(specular.pixels())[0]);

    Ok(())
}

fn print_stats(heightfield: &Heightfield, mixmap: &MixMap) {
    if let Some((low, high)) = heightfield.range() {
        println!("Heights:  {}..{}", low, high);
    }
    let histogram = mixmap.histogram();
    let total = histogram.iter().sum::<usize>().max(1) as f64;
    for category in MixCategory::ALL {
        let count = histogram[category.index()];
        println!("  {:<6} {:>8} texels ({:5.1}%)", format!("{:?}", category), count, count as f64 * 100.0 / total);
    }
}

fn mean_color(pixels: impl Iterator<Item = [u8; 4]>) -> [u8; 3] {
    let mut sum = [0u64; 3];
    let mut count = 0u64;
    for pixel in pixels {
        for channel in 0..3 {
            sum[channel] += pixel[channel] as u64;
        }
        count += 1;
    }
    sum.map(|s| (s / count.max(1)) as u8)
}

fn parse_u32_arg(args: &[String], flag: &str) -> Option<u32> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_str_arg(args: &[String], flag: &str) -> Option<String> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}
