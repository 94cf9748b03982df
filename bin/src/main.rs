#[macro_use]
extern crate log;

use integrators::*;
use materials::*;
use radiotrace_core::app::*;
use radiotrace_core::base::*;
use radiotrace_core::geometry::*;
use radiotrace_core::image_io::write_heatmap;
use radiotrace_core::material::ArcMaterial;
use radiotrace_core::path::PathRecord;
use radiotrace_core::radio::*;
use radiotrace_core::rng::RNG;
use shapes::TriangleMesh;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::sync::Arc;

/// Half the edge length of the demo city block.
const CITY_EXTENT: Float = 100.0;

/// Height of the transmitter mast.
const MAST_HEIGHT: Float = 30.0;

/// Pixels per coverage cell in the heatmap.
const HEATMAP_SCALE: u32 = 4;

fn main() {
    // Initialize `env_logger`.
    env_logger::init();

    // In case of error report it.
    if let Err(e) = run() {
        error!("{e}");
    }
}

fn run() -> Result<(), String> {
    let options = &*OPTIONS;

    let scene = demo_scene(options.buildings, options.seed).map_err(|e| e.to_string())?;
    let tracer = Tracer::new(&scene).map_err(|e| e.to_string())?;

    let transmitters = vec![Transmitter::new(
        point3(0.0, MAST_HEIGHT, 0.0),
        options.frequency_hz(),
        options.power,
        0.0,
    )];
    let receivers = vec![
        Receiver::new(point3(40.0, options.plane_height, 40.0), 0.0, 1.0),
        Receiver::new(point3(-60.0, options.plane_height, 10.0), 0.0, 1.0),
    ];

    let settings = CoverageSettings {
        n_rays: options.n_rays,
        max_reflection: options.max_reflection,
        cell_size: options.cell_size,
        plane_height: options.plane_height,
        n_threads: options.threads(),
        polarization: options.polarization,
        record_paths: options.traced_paths_file.is_some(),
        record_escapes: options.record_escapes,
        show_progress: !options.quiet,
        ..CoverageSettings::default()
    };

    let coverage = CoverageTracer::new(tracer, transmitters, receivers, settings);
    let result = coverage.generate().map_err(|e| e.to_string())?;

    match result.map.db_range() {
        Some((lo, hi)) => info!("Received power ranges from {lo:.1} dBm to {hi:.1} dBm"),
        None => warn!("No cell received any power"),
    }
    info!("{} paths reached a receiver", result.received.len());

    if let Some(path) = options.image_file.as_ref() {
        write_heatmap(path, &result.map, HEATMAP_SCALE).map_err(|e| e.to_string())?;
    }
    if let Some(path) = options.coverage_file.as_ref() {
        write_coverage_csv(path, &result).map_err(|e| format!("Error writing {path}: {e}"))?;
    }
    if let Some(path) = options.paths_file.as_ref() {
        write_paths_csv(path, &result.received)
            .map_err(|e| format!("Error writing {path}: {e}"))?;
    }
    if let Some(path) = options.traced_paths_file.as_ref() {
        write_paths_csv(path, &result.paths).map_err(|e| format!("Error writing {path}: {e}"))?;
    }
    Ok(())
}

/// Build a square of ground with randomly placed buildings. All buildings
/// share one unit cube mesh placed by per-instance transforms.
///
/// * `buildings` - Number of buildings.
/// * `seed`      - Layout seed.
fn demo_scene(
    buildings: usize,
    seed: u64,
) -> Result<SceneDescription, radiotrace_core::error::TracerError> {
    let ground_material: ArcMaterial = Arc::new(Dielectric::medium_dry_ground());
    let wall_material: ArcMaterial = Arc::new(Dielectric::concrete());

    let mut scene = SceneDescription::default();
    let ground = scene.add_mesh(TriangleMesh::ground(
        "ground",
        (-CITY_EXTENT, -CITY_EXTENT),
        (CITY_EXTENT, CITY_EXTENT),
        0.0,
        Some(ground_material),
    )?);
    scene.add_instance(ground, Transform::default());

    let block = scene.add_mesh(TriangleMesh::cuboid(
        "building",
        point3(-0.5, 0.0, -0.5),
        point3(0.5, 1.0, 0.5),
        Some(wall_material),
    )?);

    let mut rng = RNG::new(seed);
    for _ in 0..buildings {
        let width = rng.uniform_range(8.0, 20.0);
        let depth = rng.uniform_range(8.0, 20.0);
        let height = rng.uniform_range(6.0, 40.0);
        let x = rng.uniform_range(-CITY_EXTENT + 15.0, CITY_EXTENT - 15.0);
        let z = rng.uniform_range(-CITY_EXTENT + 15.0, CITY_EXTENT - 15.0);

        // Keep the mast clear.
        if x.abs() < 15.0 && z.abs() < 15.0 {
            continue;
        }

        let transform = translate(&vector3(x, 0.0, z))
            * rotate_y(rng.uniform_range(0.0, 90.0))
            * scale(width, height, depth)?;
        scene.add_instance(block, transform);
    }
    Ok(scene)
}

/// Write one line per coverage cell.
///
/// * `path`   - Output file path.
/// * `result` - Coverage result.
fn write_coverage_csv(path: &str, result: &CoverageResult) -> std::io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    writeln!(out, "x,y,z,hits,strength_mw,strength_dbm")?;
    for cell in result.map.cells.iter().filter(|c| c.hits > 0) {
        writeln!(
            out,
            "{},{},{},{},{:e},{}",
            cell.center.x, cell.center.y, cell.center.z, cell.hits, cell.strength, cell.strength_db
        )?;
    }
    out.flush()
}

/// Write one line per path with its points joined by `;`.
///
/// * `path`    - Output file path.
/// * `records` - Paths to write.
fn write_paths_csv(path: &str, records: &[PathRecord]) -> std::io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    writeln!(
        out,
        "transmitter,receiver,termination,reflections,distance,delay,strength_dbm,points"
    )?;
    for record in records {
        let points: Vec<String> = record
            .points
            .iter()
            .map(|p| format!("{} {} {}", p.x, p.y, p.z))
            .collect();
        writeln!(
            out,
            "{},{},{:?},{},{},{:e},{},{}",
            record.transmitter,
            record.receiver.map_or(-1, |r| r as i64),
            record.termination,
            record.reflections,
            record.distance,
            record.delay,
            record.strength_dbm(),
            points.join(";")
        )?;
    }
    out.flush()
}
