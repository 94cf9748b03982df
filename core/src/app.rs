//! Application related stuff

use crate::base::Float;
use crate::propagation::Polarization;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};

lazy_static! {
    /// The global application options.
    pub static ref OPTIONS: Options = Options::parse();
}

/// System wide options.
#[derive(Parser, Clone, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Options {
    /// Number of threads to use for tracing.
    #[arg(
        long = "nthreads",
        short = 't',
        value_name = "NUM",
        default_value_t = 1,
        help = "Use specified number of threads for tracing."
    )]
    n_threads: usize,

    /// Number of rays launched per transmitter.
    #[arg(
        long = "rays",
        short = 'n',
        value_name = "NUM",
        default_value_t = 100_000,
        help = "Number of rays launched from each transmitter."
    )]
    pub n_rays: usize,

    /// Maximum number of reflections per ray.
    #[arg(
        long = "reflections",
        short = 'r',
        value_name = "NUM",
        default_value_t = 3,
        help = "Maximum number of reflections per ray."
    )]
    pub max_reflection: usize,

    /// Coverage map cell size in meters.
    #[arg(
        long = "cellsize",
        short = 'c',
        value_name = "FLOAT",
        default_value_t = 1.0,
        help = "Edge length of a coverage map cell in meters."
    )]
    pub cell_size: Float,

    /// Height of the coverage plane above the lowest point in the scene.
    #[arg(
        long = "height",
        value_name = "FLOAT",
        default_value_t = 1.5,
        help = "Height of the coverage plane above the ground in meters."
    )]
    pub plane_height: Float,

    /// Carrier frequency in GHz.
    #[arg(
        long = "frequency",
        short = 'f',
        value_name = "GHZ",
        default_value_t = 2.4,
        help = "Transmitter carrier frequency in GHz."
    )]
    pub frequency: Float,

    /// Transmit power in dBm.
    #[arg(
        long = "power",
        value_name = "DBM",
        default_value_t = 20.0,
        help = "Transmit power in dBm."
    )]
    pub power: Float,

    /// Polarization used for reflection coefficients.
    #[arg(
        long = "polarization",
        value_name = "TE|TM",
        default_value_t = Polarization::TM,
        help = "Wave polarization used for Fresnel reflection (TE or TM)."
    )]
    pub polarization: Polarization,

    /// Number of buildings in the generated scene.
    #[arg(
        long = "buildings",
        value_name = "NUM",
        default_value_t = 12,
        help = "Number of buildings placed in the demo scene."
    )]
    pub buildings: usize,

    /// Seed used to lay out the generated scene.
    #[arg(
        long = "seed",
        value_name = "NUM",
        default_value_t = 1,
        help = "Seed for the demo scene layout."
    )]
    pub seed: u64,

    /// Keep paths that escape the scene.
    #[arg(
        long = "escapes",
        help = "Keep rays that escape the scene in the traced paths, ending at a far point."
    )]
    pub record_escapes: bool,

    /// Suppress all text output other than error messages.
    #[arg(long, help = "Suppress all text output other than error messages.")]
    pub quiet: bool,

    /// Path to the heatmap image.
    #[arg(
        long = "outfile",
        short = 'o',
        value_name = "FILE",
        help = "Write the coverage heatmap to the given PNG or TGA file."
    )]
    pub image_file: Option<String>,

    /// Path to the coverage CSV.
    #[arg(
        long = "csv",
        value_name = "FILE",
        help = "Write coverage cells as CSV to the given file."
    )]
    pub coverage_file: Option<String>,

    /// Path to the traced paths CSV.
    #[arg(
        long = "traced-paths",
        value_name = "FILE",
        help = "Record the path of every traced ray and write them as CSV to the given file."
    )]
    pub traced_paths_file: Option<String>,

    /// Path to the received paths CSV.
    #[arg(
        long = "paths",
        value_name = "FILE",
        help = "Write paths captured by receivers as CSV to the given file."
    )]
    pub paths_file: Option<String>,
}

impl Options {
    /// Returns the number of threads to use.
    pub fn threads(&self) -> usize {
        let max_threads = num_cpus::get();
        match self.n_threads {
            0 => {
                warn!("Invalid nthreads");
                1
            }
            n if n > max_threads => {
                warn!("Num threads > max logical CPUs {}", max_threads);
                max_threads
            }
            n => n,
        }
    }

    /// Returns the carrier frequency in Hz.
    pub fn frequency_hz(&self) -> Float {
        self.frequency * 1e9
    }
}

/// Create a progress bar for `len` units of work. A hidden bar is returned
/// when progress should not be shown.
///
/// * `len`  - Units of work.
/// * `show` - Whether to draw the bar.
pub fn create_progress_bar(len: u64, show: bool) -> ProgressBar {
    if !show {
        return ProgressBar::hidden();
    }
    let progress = ProgressBar::new(len);
    let style = ProgressStyle::default_bar()
        .template("{msg} {bar:40} {pos}/{len} ETA: {eta}")
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    progress.set_style(style);
    progress
}
