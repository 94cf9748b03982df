//! Coverage tracer

use crate::tracer::*;
use radiotrace_core::app::create_progress_bar;
use radiotrace_core::base::*;
use radiotrace_core::coverage_map::*;
use radiotrace_core::error::*;
use radiotrace_core::geometry::*;
use radiotrace_core::interaction::*;
use radiotrace_core::path::*;
use radiotrace_core::primitive::*;
use radiotrace_core::propagation::*;
use radiotrace_core::radio::*;
use radiotrace_core::sampling::*;
use shapes::Quad;
use std::collections::BTreeMap;

/// Parameters of a coverage run.
#[derive(Clone, Debug)]
pub struct CoverageSettings {
    /// Number of rays launched from each transmitter.
    pub n_rays: usize,

    /// Maximum number of reflections per ray.
    pub max_reflection: usize,

    /// Coverage map cell edge length in meters.
    pub cell_size: Float,

    /// Height of the derived coverage plane above the lowest scene point.
    pub plane_height: Float,

    /// Scale applied to the scene extent when deriving the coverage plane.
    pub plane_margin: Float,

    /// Explicit coverage plane; derived from the scene bounds when `None`.
    pub plane: Option<CoveragePlane>,

    /// Number of worker threads.
    pub n_threads: usize,

    /// Number of rays traced per unit of work.
    pub chunk_size: usize,

    /// Polarization used for Fresnel reflection.
    pub polarization: Polarization,

    /// Keep the path of every traced ray.
    pub record_paths: bool,

    /// Keep escaped paths, ending them `escape_distance` along the ray.
    pub record_escapes: bool,

    /// Length of the final segment of escaped paths.
    pub escape_distance: Float,

    /// Draw a progress bar.
    pub show_progress: bool,
}

impl Default for CoverageSettings {
    fn default() -> Self {
        Self {
            n_rays: 10_000,
            max_reflection: 3,
            cell_size: 1.0,
            plane_height: 1.5,
            plane_margin: 3.0,
            plane: None,
            n_threads: 1,
            chunk_size: 1024,
            polarization: Polarization::TM,
            record_paths: false,
            record_escapes: false,
            escape_distance: 1000.0,
            show_progress: false,
        }
    }
}

impl CoverageSettings {
    /// Reject settings that cannot produce a coverage map.
    pub fn validate(&self) -> Result<(), TracerError> {
        let invalid = |msg: &str| Err(TracerError::InvalidSettings(msg.to_string()));
        if self.n_threads == 0 {
            return invalid("thread count must be at least 1");
        }
        if self.chunk_size == 0 {
            return invalid("chunk size must be at least 1");
        }
        if !(self.plane_margin > 0.0) {
            return invalid("plane margin must be positive");
        }
        if !(self.escape_distance > 0.0) {
            return invalid("escape distance must be positive");
        }
        if self.record_escapes && !self.record_paths {
            warn!("Escaped paths are only kept when paths are recorded");
        }
        Ok(())
    }
}

/// Output of a coverage run.
#[derive(Clone, Debug)]
pub struct CoverageResult {
    /// Received power per cell, converted to dBm.
    pub map: CoverageMap,

    /// Paths of the traced rays when recording is enabled.
    pub paths: Vec<PathRecord>,

    /// Paths that passed through a receiver.
    pub received: Vec<PathRecord>,
}

/// Partial results of one unit of work.
struct CoverageTile {
    /// Partial grid.
    map: CoverageMap,

    /// Recorded paths.
    paths: Vec<PathRecord>,

    /// Received paths.
    received: Vec<PathRecord>,
}

/// A contiguous range of rays from one transmitter.
#[derive(Copy, Clone, Debug)]
struct Chunk {
    /// Transmitter index.
    transmitter: usize,

    /// First ray.
    start: usize,

    /// One past the last ray.
    end: usize,
}

/// Returns the largest number of chunks handed out ahead of the merge
/// point.
///
/// * `n_threads` - Number of worker threads.
fn tile_window(n_threads: usize) -> usize {
    2 * n_threads
}

/// Folds partial grids into the final result in chunk order. Tiles that
/// arrive early wait until every earlier chunk has been merged so the sums
/// do not depend on scheduling.
struct TileMerger {
    /// Final grid.
    map: CoverageMap,

    /// Recorded paths in chunk order.
    paths: Vec<PathRecord>,

    /// Received paths in chunk order.
    received: Vec<PathRecord>,

    /// Tiles waiting for an earlier chunk.
    pending: BTreeMap<usize, CoverageTile>,

    /// Index of the next chunk to merge.
    next: usize,

    /// Largest number of tiles held at once.
    peak: usize,
}

impl TileMerger {
    /// Create a merger accumulating into `map`.
    ///
    /// * `map` - Empty final grid.
    fn new(map: CoverageMap) -> Self {
        Self {
            map,
            paths: vec![],
            received: vec![],
            pending: BTreeMap::new(),
            next: 0,
            peak: 0,
        }
    }

    /// Accept the tile of a chunk and merge every tile that is now in order.
    ///
    /// * `chunk_idx` - Chunk index.
    /// * `tile`      - Partial results.
    fn push(&mut self, chunk_idx: usize, tile: CoverageTile) {
        self.pending.insert(chunk_idx, tile);
        self.peak = self.peak.max(self.pending.len());
        while let Some(tile) = self.pending.remove(&self.next) {
            self.map.merge(&tile.map);
            self.paths.extend(tile.paths);
            self.received.extend(tile.received);
            self.next += 1;
        }
    }

    /// Returns the number of chunks merged so far.
    fn merged(&self) -> usize {
        self.next
    }

    /// Returns the largest number of tiles held at once.
    fn peak(&self) -> usize {
        self.peak
    }

    /// Returns the merged grid and paths.
    fn finish(self) -> (CoverageMap, Vec<PathRecord>, Vec<PathRecord>) {
        if !self.pending.is_empty() {
            warn!("{} partial grids were never merged", self.pending.len());
        }
        (self.map, self.paths, self.received)
    }
}

/// Launches rays from every transmitter, follows their specular reflections
/// and accumulates received power on a horizontal coverage plane.
pub struct CoverageTracer {
    /// The scene.
    tracer: Tracer,

    /// Transmitters.
    transmitters: Vec<Transmitter>,

    /// Receivers.
    receivers: Vec<Receiver>,

    /// Run parameters.
    settings: CoverageSettings,
}

impl CoverageTracer {
    /// Create a new coverage tracer.
    ///
    /// * `tracer`       - The scene.
    /// * `transmitters` - Transmitters.
    /// * `receivers`    - Receivers.
    /// * `settings`     - Run parameters.
    pub fn new(
        tracer: Tracer,
        transmitters: Vec<Transmitter>,
        receivers: Vec<Receiver>,
        settings: CoverageSettings,
    ) -> Self {
        Self {
            tracer,
            transmitters,
            receivers,
            settings,
        }
    }

    /// Returns the scene.
    pub fn tracer(&self) -> &Tracer {
        &self.tracer
    }

    /// Returns the run parameters.
    pub fn settings(&self) -> &CoverageSettings {
        &self.settings
    }

    /// Returns the coverage plane used by `generate()`.
    pub fn coverage_plane(&self) -> Result<CoveragePlane, TracerError> {
        if let Some(plane) = self.settings.plane {
            return Ok(plane);
        }
        let bounds = self.tracer.world_bound();
        if bounds.is_empty() {
            return Err(TracerError::EmptyScene);
        }
        Ok(CoveragePlane::from_bounds(
            &bounds,
            self.settings.plane_height,
            self.settings.plane_margin,
        ))
    }

    /// Trace all rays and build the coverage map. Directions come from a
    /// Fibonacci lattice so repeated runs give identical results regardless
    /// of the thread count.
    pub fn generate(&self) -> Result<CoverageResult, TracerError> {
        self.generate_tiles().map(|(result, _)| result)
    }

    /// Does the work of `generate()` and also returns the largest number of
    /// partial grids that were alive at once.
    fn generate_tiles(&self) -> Result<(CoverageResult, usize), TracerError> {
        self.settings.validate()?;
        let plane = self.coverage_plane()?;
        let map = CoverageMap::new(plane, self.settings.cell_size)?;
        let (u, v) = plane.edges();
        let quad = Quad::new(plane.corner, u, v, None);
        let directions = fibonacci_directions(self.settings.n_rays);

        let chunks: Vec<Chunk> = (0..self.transmitters.len())
            .flat_map(|transmitter| {
                (0..directions.len())
                    .step_by(self.settings.chunk_size)
                    .map(move |start| (transmitter, start))
            })
            .map(|(transmitter, start)| Chunk {
                transmitter,
                start,
                end: (start + self.settings.chunk_size).min(directions.len()),
            })
            .collect();

        info!(
            "Tracing {} rays from {} transmitters in {} chunks on a {}x{} grid",
            directions.len(),
            self.transmitters.len(),
            chunks.len(),
            map.nx,
            map.nz
        );
        for (i, tx) in self.transmitters.iter().enumerate() {
            debug!(
                "Transmitter {} at {:?} facing {:?}, {} Hz, {} dBm",
                i,
                tx.position,
                tx.forward(),
                tx.frequency,
                tx.power
            );
        }

        let progress = create_progress_bar(chunks.len() as u64, self.settings.show_progress);
        progress.set_message("Tracing rays");

        let empty = map.cleared();
        let n_threads = self.settings.n_threads;
        let window = tile_window(n_threads);
        let mut merger = TileMerger::new(map);

        crossbeam::scope(|scope| {
            let (tx, rx) = crossbeam_channel::bounded::<(usize, Chunk)>(n_threads);
            let (result_tx, result_rx) = crossbeam_channel::unbounded();

            // Spawn worker threads.
            for _ in 0..n_threads {
                let rxc = rx.clone();
                let result_tx = result_tx.clone();
                let (progress, empty, quad, directions) = (&progress, &empty, &quad, &directions);
                scope.spawn(move |_| {
                    for (chunk_idx, chunk) in rxc.iter() {
                        let tile = self.trace_chunk(chunk, directions, quad, empty.clone());
                        if result_tx.send((chunk_idx, tile)).is_err() {
                            break;
                        }
                        progress.inc(1);
                    }
                });
            }
            drop(rx); // Drop extra rx since we've cloned one for each worker.
            drop(result_tx);

            // Never hand out a chunk more than `window` ahead of the next one
            // to merge so at most `window` partial grids exist at a time.
            let mut next_job = 0;
            while merger.merged() < chunks.len() {
                while next_job < chunks.len() && next_job < merger.merged() + window {
                    if tx.send((next_job, chunks[next_job])).is_err() {
                        break;
                    }
                    next_job += 1;
                }
                match result_rx.recv() {
                    Ok((chunk_idx, tile)) => merger.push(chunk_idx, tile),
                    Err(_) => break,
                }
            }
            drop(tx);
        })
        .unwrap_or_else(|panic| std::panic::resume_unwind(panic));

        let peak = merger.peak();
        let (mut map, paths, received) = merger.finish();
        map.convert_to_db();

        progress.finish_with_message("Tracing complete");
        info!(
            "Coverage complete: {} paths recorded, {} paths received",
            paths.len(),
            received.len()
        );
        debug!("At most {} partial grids were alive at once", peak);

        Ok((
            CoverageResult {
                map,
                paths,
                received,
            },
            peak,
        ))
    }

    /// Trace a range of rays into a partial grid.
    ///
    /// * `chunk`      - The rays to trace.
    /// * `directions` - Ray directions shared by all transmitters.
    /// * `quad`       - The coverage plane as a traceable quad.
    /// * `map`        - Empty partial grid.
    fn trace_chunk(
        &self,
        chunk: Chunk,
        directions: &[Vector3f],
        quad: &Quad,
        map: CoverageMap,
    ) -> CoverageTile {
        let mut tile = CoverageTile {
            map,
            paths: vec![],
            received: vec![],
        };
        for d in &directions[chunk.start..chunk.end] {
            self.trace_ray(chunk.transmitter, d, quad, &mut tile);
        }
        tile
    }

    /// Follow one ray through up to `max_reflection` reflections.
    ///
    /// * `transmitter` - Transmitter index.
    /// * `direction`   - Launch direction.
    /// * `quad`        - The coverage plane as a traceable quad.
    /// * `tile`        - Partial results to add to.
    fn trace_ray(&self, transmitter: usize, direction: &Vector3f, quad: &Quad, tile: &mut CoverageTile) {
        let tx = &self.transmitters[transmitter];
        let wavelength = tx.wavelength();
        let tx_power = tx.power_mw();
        let tx_gain = tx.gain_linear();

        let mut path = PathRecord::new(tx.position, transmitter, tx_power);
        let mut ray = Ray::new(tx.position, *direction);

        for depth in 0..=self.settings.max_reflection {
            let t_range = Interval::new(RAY_EPSILON, INFINITY);
            let scene_hit = self.tracer.intersect(&ray, &t_range);
            let segment = t_range.with_max(scene_hit.as_ref().map_or(INFINITY, |si| si.t));

            // Sample the plane where the segment crosses it.
            if let Some(plane_hit) = quad.intersect(&ray, &segment) {
                let d = path.distance + plane_hit.t;
                let power = friis_received_power(tx_power, tx_gain, 1.0, wavelength, d, path.coefficient);
                tile.map.accumulate(&plane_hit.p, power);
            }

            for (rx_idx, rx) in self.receivers.iter().enumerate() {
                if let Some(t) = rx.capture(&ray, &segment) {
                    let mut received = path.clone();
                    received.extend(ray.at(t));
                    let strength = friis_received_power(
                        tx_power,
                        tx_gain,
                        rx.gain_linear(),
                        wavelength,
                        received.distance,
                        received.coefficient,
                    );
                    received.update_signal(strength, tx_power, wavelength);
                    received.receiver = Some(rx_idx);
                    received.terminate(Termination::Received);
                    tile.received.push(received);
                }
            }

            let Some(si) = scene_hit else {
                if self.settings.record_escapes {
                    path.extend(ray.at(self.settings.escape_distance));
                    self.finish(path, Termination::Escaped, tx_power, tx_gain, wavelength, tile);
                }
                return;
            };

            if depth == self.settings.max_reflection {
                path.extend(si.p);
                self.finish(path, Termination::MaxReflections, tx_power, tx_gain, wavelength, tile);
                return;
            }

            match self.scatter(&ray, &si, tx.frequency) {
                Some((scattered, coefficient)) => {
                    path.reflect(si.p, si.material.clone(), si.triangle, coefficient);
                    let strength = friis_received_power(
                        tx_power,
                        tx_gain,
                        1.0,
                        wavelength,
                        path.distance,
                        path.coefficient,
                    );
                    path.update_signal(strength, tx_power, wavelength);
                    ray = scattered;
                }
                None => {
                    path.extend(si.p);
                    self.finish(path, Termination::Absorbed, tx_power, tx_gain, wavelength, tile);
                    return;
                }
            }
        }
    }

    /// Returns the reflected ray and the amplitude coefficient of the
    /// reflection, or `None` if the surface absorbs the ray.
    ///
    /// * `ray`       - Incoming ray.
    /// * `si`        - The hit.
    /// * `frequency` - Carrier frequency in Hz.
    fn scatter(&self, ray: &Ray, si: &SurfaceInteraction, frequency: Float) -> Option<(Ray, Float)> {
        let material = si.material.as_ref()?;
        let record = material.is_scattering(ray, si)?;

        // The incidence angle is half the angle between the reversed incoming
        // direction and the reflected direction.
        let cos_2theta = clamp(-ray.d.dot(&record.scattered.d), -1.0, 1.0);
        let theta = 0.5 * cos_2theta.acos();
        let eta2 = material.relative_permittivity(frequency);
        let fresnel = fresnel_coefficient(theta, 1.0, eta2, self.settings.polarization);

        Some((record.scattered, fresnel * record.attenuation))
    }

    /// End a path and keep it if paths are being recorded.
    ///
    /// * `path`        - The path.
    /// * `termination` - Reason.
    /// * `tx_power`    - Transmit power in mW.
    /// * `tx_gain`     - Transmit gain as a linear factor.
    /// * `wavelength`  - Wavelength in meters.
    /// * `tile`        - Partial results to add to.
    fn finish(
        &self,
        mut path: PathRecord,
        termination: Termination,
        tx_power: Float,
        tx_gain: Float,
        wavelength: Float,
        tile: &mut CoverageTile,
    ) {
        path.terminate(termination);
        if self.settings.record_paths {
            let strength =
                friis_received_power(tx_power, tx_gain, 1.0, wavelength, path.distance, path.coefficient);
            path.update_signal(strength, tx_power, wavelength);
            tile.paths.push(path);
        }
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;
    use materials::*;
    use radiotrace_core::material::ArcMaterial;
    use shapes::TriangleMesh;
    use std::sync::Arc;

    const GHZ: Float = 1e9;

    fn city(ground: ArcMaterial) -> Tracer {
        let concrete: ArcMaterial = Arc::new(Dielectric::concrete());
        let mut scene = SceneDescription::default();
        let ground = scene.add_mesh(
            TriangleMesh::ground("ground", (-40.0, -40.0), (40.0, 40.0), 0.0, Some(ground)).unwrap(),
        );
        let building = scene.add_mesh(
            TriangleMesh::cuboid(
                "building",
                point3(-4.0, 0.0, -4.0),
                point3(4.0, 12.0, 4.0),
                Some(concrete),
            )
            .unwrap(),
        );
        scene.add_instance(ground, Transform::default());
        for (x, z) in [(-15.0, -10.0), (12.0, -14.0), (0.0, 18.0)] {
            scene.add_instance(building, translate(&vector3(x, 0.0, z)));
        }
        Tracer::new(&scene).unwrap()
    }

    fn empty_scene() -> Tracer {
        Tracer::new(&SceneDescription::default()).unwrap()
    }

    fn open_plane() -> CoveragePlane {
        CoveragePlane::new(point3(-20.0, 0.0, -20.0), 40.0, 40.0)
    }

    fn transmitter(x: Float, z: Float) -> Transmitter {
        Transmitter::new(point3(x, 10.0, z), 2.4 * GHZ, 20.0, 0.0)
    }

    #[test]
    fn empty_scene_needs_a_plane() {
        let ct = CoverageTracer::new(
            empty_scene(),
            vec![transmitter(0.0, 0.0)],
            vec![],
            CoverageSettings::default(),
        );
        assert!(matches!(ct.generate(), Err(TracerError::EmptyScene)));
    }

    #[test]
    fn invalid_settings() {
        let settings = CoverageSettings {
            n_threads: 0,
            plane: Some(open_plane()),
            ..Default::default()
        };
        let ct = CoverageTracer::new(empty_scene(), vec![transmitter(0.0, 0.0)], vec![], settings);
        assert!(matches!(ct.generate(), Err(TracerError::InvalidSettings(_))));
    }

    #[test]
    fn derived_plane_spans_scene() {
        let ct = CoverageTracer::new(
            city(Arc::new(Dielectric::medium_dry_ground())),
            vec![],
            vec![],
            CoverageSettings::default(),
        );
        let plane = ct.coverage_plane().unwrap();
        assert!(approx_eq!(f32, plane.height(), 1.5));
        assert!(approx_eq!(f32, plane.size_x, 240.0, epsilon = 1e-3));
        assert!(approx_eq!(f32, plane.corner.x, -120.0, epsilon = 1e-3));
    }

    #[test]
    fn superposition_in_empty_scene() {
        let settings = CoverageSettings {
            n_rays: 20_000,
            cell_size: 2.0,
            plane: Some(open_plane()),
            ..Default::default()
        };
        let a = transmitter(-5.0, 0.0);
        let b = transmitter(6.0, 3.0);
        let run = |txs: Vec<Transmitter>| {
            CoverageTracer::new(empty_scene(), txs, vec![], settings.clone())
                .generate()
                .unwrap()
                .map
        };

        let map_a = run(vec![a]);
        let map_b = run(vec![b]);
        let both = run(vec![a, b]);

        let mut non_empty = 0;
        for ((ca, cb), c) in map_a.cells.iter().zip(&map_b.cells).zip(&both.cells) {
            let expected = ca.strength + cb.strength;
            assert!(approx_eq!(f32, c.strength, expected, epsilon = expected * 1e-5));
            assert_eq!(c.hits, ca.hits + cb.hits);
            if c.hits > 0 {
                non_empty += 1;
                assert!(c.strength_db.is_finite());
            } else {
                assert_eq!(c.strength_db, -INFINITY);
            }
        }
        assert!(non_empty > 0);
    }

    #[test]
    fn direct_power_matches_friis() {
        let settings = CoverageSettings {
            n_rays: 50_000,
            plane: Some(open_plane()),
            ..Default::default()
        };
        let tx = transmitter(0.5, 0.5);
        let map = CoverageTracer::new(empty_scene(), vec![tx], vec![], settings)
            .generate()
            .unwrap()
            .map;

        // Every hit in a cell is a direct ray so the mean power per hit is
        // close to Friis at the cell center.
        let i = map.cell_index(&point3(0.5, 0.0, 0.5)).unwrap();
        let cell = &map.cells[i];
        assert!(cell.hits > 0);
        let per_hit = cell.strength / cell.hits as Float;
        let expected = friis_received_power(tx.power_mw(), 1.0, 1.0, tx.wavelength(), 10.0, 1.0);
        assert!(approx_eq!(f32, per_hit, expected, epsilon = expected * 0.01));
    }

    #[test]
    fn deterministic_and_thread_independent() {
        let settings = CoverageSettings {
            n_rays: 6000,
            chunk_size: 97,
            record_paths: true,
            ..Default::default()
        };
        let txs = vec![transmitter(0.0, 0.0), transmitter(-25.0, 20.0)];
        let ground: ArcMaterial = Arc::new(Dielectric::medium_dry_ground());

        let one = CoverageTracer::new(city(Arc::clone(&ground)), txs.clone(), vec![], settings.clone())
            .generate()
            .unwrap();
        let again = CoverageTracer::new(city(Arc::clone(&ground)), txs.clone(), vec![], settings.clone())
            .generate()
            .unwrap();
        let four = CoverageTracer::new(
            city(ground),
            txs,
            vec![],
            CoverageSettings {
                n_threads: 4,
                ..settings
            },
        )
        .generate()
        .unwrap();

        assert_eq!(one.map, again.map);
        assert_eq!(one.map, four.map);
        assert_eq!(one.paths.len(), four.paths.len());
        for (p, q) in one.paths.iter().zip(&four.paths) {
            assert_eq!(p.points, q.points);
            assert_eq!(p.termination, q.termination);
        }
    }

    #[test]
    fn partial_grids_stay_bounded() {
        let settings = CoverageSettings {
            n_rays: 400,
            chunk_size: 1,
            n_threads: 3,
            plane: Some(open_plane()),
            ..Default::default()
        };
        let ct = CoverageTracer::new(
            city(Arc::new(Dielectric::medium_dry_ground())),
            vec![transmitter(0.0, 0.0), transmitter(20.0, 5.0)],
            vec![],
            settings.clone(),
        );
        let (result, peak) = ct.generate_tiles().unwrap();
        assert!(peak >= 1);
        assert!(peak <= tile_window(3), "{} partial grids alive", peak);

        // Ordered merging still matches a single worker.
        let single = CoverageTracer::new(
            city(Arc::new(Dielectric::medium_dry_ground())),
            vec![transmitter(0.0, 0.0), transmitter(20.0, 5.0)],
            vec![],
            CoverageSettings {
                n_threads: 1,
                ..settings
            },
        )
        .generate()
        .unwrap();
        assert_eq!(result.map, single.map);
    }

    #[test]
    fn merger_waits_for_earlier_chunks() {
        let map = CoverageMap::new(open_plane(), 10.0).unwrap();
        let tile = |power: Float| {
            let mut m = map.cleared();
            m.accumulate(&point3(0.5, 0.0, 0.5), power);
            CoverageTile {
                map: m,
                paths: vec![],
                received: vec![],
            }
        };
        let mut merger = TileMerger::new(map.cleared());
        merger.push(2, tile(3.0));
        merger.push(1, tile(2.0));
        assert_eq!(merger.merged(), 0);
        assert_eq!(merger.peak(), 2);
        merger.push(0, tile(1.0));
        assert_eq!(merger.merged(), 3);
        let (merged, _, _) = merger.finish();
        let i = merged.cell_index(&point3(0.5, 0.0, 0.5)).unwrap();
        assert_eq!(merged.cells[i].hits, 3);
        assert!(approx_eq!(f32, merged.cells[i].strength, 6.0));
    }

    #[test]
    fn reflections_follow_material() {
        let settings = CoverageSettings {
            n_rays: 2000,
            max_reflection: 1,
            record_paths: true,
            plane: Some(open_plane()),
            ..Default::default()
        };
        let ground_only = |material: ArcMaterial| {
            let mut scene = SceneDescription::default();
            scene.add_mesh(
                TriangleMesh::ground("ground", (-50.0, -50.0), (50.0, 50.0), -1.0, Some(material))
                    .unwrap(),
            );
            Tracer::new(&scene).unwrap()
        };

        let absorbed = CoverageTracer::new(
            ground_only(Arc::new(Absorber::default())),
            vec![transmitter(0.0, 0.0)],
            vec![],
            settings.clone(),
        )
        .generate()
        .unwrap();
        let reflected = CoverageTracer::new(
            ground_only(Arc::new(Metal)),
            vec![transmitter(0.0, 0.0)],
            vec![],
            CoverageSettings {
                record_escapes: true,
                ..settings
            },
        )
        .generate()
        .unwrap();

        let hits = |map: &CoverageMap| map.cells.iter().map(|c| c.hits).sum::<u32>();
        assert!(hits(&reflected.map) > hits(&absorbed.map));

        assert!(!absorbed.paths.is_empty());
        for path in &absorbed.paths {
            assert_eq!(path.termination, Termination::Absorbed);
            assert_eq!(path.reflections, 0);
            assert!(approx_eq!(f32, path.last().y, -1.0, epsilon = 1e-4));
        }

        // Every ray ends up leaving the scene, reflected rays after one bounce.
        let bounced: Vec<&PathRecord> = reflected.paths.iter().filter(|p| p.reflections > 0).collect();
        assert!(!bounced.is_empty());
        assert_eq!(reflected.paths.len(), 2000);
        for path in reflected.paths.iter() {
            assert_eq!(path.termination, Termination::Escaped);
        }
        for path in bounced {
            assert_eq!(path.reflections, 1);
            assert_eq!(path.points.len(), 3);
            assert!(path.coefficient > 0.99);
            assert!(approx_eq!(f32, path.points[1].y, -1.0, epsilon = 1e-4));
        }
    }

    #[test]
    fn receiver_paths_delay() {
        let settings = CoverageSettings {
            n_rays: 20_000,
            plane: Some(open_plane()),
            ..Default::default()
        };
        let tx = transmitter(0.0, 0.0);
        let rx = Receiver::new(point3(20.0, 10.0, 0.0), 0.0, 1.0);
        let result = CoverageTracer::new(empty_scene(), vec![tx], vec![rx], settings)
            .generate()
            .unwrap();

        assert!(!result.received.is_empty());
        for path in &result.received {
            assert_eq!(path.receiver, Some(0));
            assert_eq!(path.termination, Termination::Received);
            assert!(path.distance > 19.4 && path.distance < 20.1);
            assert!(approx_eq!(
                f32,
                path.delay,
                path.distance / SPEED_OF_LIGHT,
                epsilon = 1e-12
            ));
            assert!(path.phase >= 0.0 && path.phase < TWO_PI);
            assert!(path.loss > 0.0);
        }
    }

    #[test]
    fn escapes_are_kept_on_request() {
        let settings = CoverageSettings {
            n_rays: 500,
            record_paths: true,
            record_escapes: true,
            escape_distance: 50.0,
            plane: Some(open_plane()),
            ..Default::default()
        };
        let result =
            CoverageTracer::new(empty_scene(), vec![transmitter(0.0, 0.0)], vec![], settings.clone())
                .generate()
                .unwrap();
        assert_eq!(result.paths.len(), 500);
        for path in &result.paths {
            assert_eq!(path.termination, Termination::Escaped);
            assert_eq!(path.points.len(), 2);
            assert!(approx_eq!(f32, path.distance, 50.0, epsilon = 1e-3));
        }

        // Escapes are dropped unless asked for, and need recorded paths.
        for (record_paths, record_escapes) in [(true, false), (false, true)] {
            let result = CoverageTracer::new(
                empty_scene(),
                vec![transmitter(0.0, 0.0)],
                vec![],
                CoverageSettings {
                    record_paths,
                    record_escapes,
                    ..settings.clone()
                },
            )
            .generate()
            .unwrap();
            assert!(result.paths.is_empty());
        }
    }
}
