//! Image I/O

use crate::base::{clamp, lerp, Float};
use crate::coverage_map::CoverageMap;
use crate::error::TracerError;
use image::{ImageBuffer, ImageFormat, Rgb, RgbImage};
use regex::Regex;
use std::sync::OnceLock;

/// Color ramp from weak (blue) to strong (red) signal.
const HEAT_RAMP: [[Float; 3]; 5] = [
    [0.0, 0.0, 0.5],
    [0.0, 0.4, 1.0],
    [0.0, 0.9, 0.3],
    [1.0, 0.9, 0.0],
    [0.9, 0.0, 0.0],
];

/// Write a coverage map as a heatmap image. Rows run along the z-axis and
/// columns along the x-axis; cells that received nothing are black. The
/// format is chosen from the file extension (`.png` or `.tga`).
///
/// * `path`  - Output file path.
/// * `map`   - Coverage map with dB values computed.
/// * `scale` - Pixels per cell edge.
pub fn write_heatmap(path: &str, map: &CoverageMap, scale: u32) -> Result<(), TracerError> {
    let format = match get_extension_from_filename(path) {
        Some(".png") => ImageFormat::Png,
        Some(".tga") => ImageFormat::Tga,
        Some(extension) => {
            return Err(TracerError::Image(format!(
                "Extension {extension} is not supported"
            )))
        }
        None => {
            return Err(TracerError::Image(format!(
                "Can't determine file type from suffix of filename {path}"
            )))
        }
    };

    let imgbuf = render_heatmap(map, scale.max(1));
    info!(
        "Writing heatmap {path} with resolution {}x{}",
        imgbuf.width(),
        imgbuf.height()
    );

    imgbuf
        .save_with_format(path, format)
        .map_err(|err| TracerError::Image(format!("Error saving heatmap {path}: {err}.")))
}

/// Rasterize a coverage map into an RGB image.
///
/// * `map`   - Coverage map with dB values computed.
/// * `scale` - Pixels per cell edge.
pub fn render_heatmap(map: &CoverageMap, scale: u32) -> RgbImage {
    let (lo, hi) = map.db_range().unwrap_or((0.0, 0.0));
    let span = if hi > lo { hi - lo } else { 1.0 };

    let res_x = map.nx as u32 * scale;
    let res_y = map.nz as u32 * scale;
    ImageBuffer::from_fn(res_x, res_y, |x, y| {
        let cell = map.cell((x / scale) as usize, (y / scale) as usize);
        if cell.strength_db.is_finite() {
            Rgb(heat_color((cell.strength_db - lo) / span))
        } else {
            Rgb([0, 0, 0])
        }
    })
}

/// Map a value in `[0, 1]` to an 8-bit color on the heat ramp.
///
/// * `t` - The value; clamped to `[0, 1]`.
pub fn heat_color(t: Float) -> [u8; 3] {
    let segments = (HEAT_RAMP.len() - 1) as Float;
    let x = clamp(t, 0.0, 1.0) * segments;
    let i = (x.floor() as usize).min(HEAT_RAMP.len() - 2);
    let f = x - i as Float;

    let (a, b) = (HEAT_RAMP[i], HEAT_RAMP[i + 1]);
    let c = |k: usize| (clamp(lerp(f, a[k], b[k]), 0.0, 1.0) * 255.0 + 0.5) as u8;
    [c(0), c(1), c(2)]
}

/// Returns a regular expression for matching a file extension.
fn regex_file_ext() -> &'static Regex {
    static DATA: OnceLock<Regex> = OnceLock::new();
    DATA.get_or_init(|| Regex::new(r"(\.[^./\\]+)$").expect("file extension pattern"))
}

/// Returns the file extension, including the leading `.`.
///
/// * `path` - File path.
fn get_extension_from_filename(path: &str) -> Option<&str> {
    regex_file_ext()
        .captures(path)
        .and_then(|c| c.get(1).map(|m| m.as_str()))
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coverage_map::CoveragePlane;
    use crate::geometry::point3;

    #[test]
    fn extension() {
        assert_eq!(get_extension_from_filename("out/map.png"), Some(".png"));
        assert_eq!(get_extension_from_filename("map.tar.tga"), Some(".tga"));
        assert_eq!(get_extension_from_filename("out.d/map"), None);
    }

    #[test]
    fn unsupported_extension_is_an_error() {
        let map = CoverageMap::new(CoveragePlane::new(point3(0.0, 0.0, 0.0), 2.0, 2.0), 1.0)
            .unwrap();
        assert!(matches!(
            write_heatmap("map.jpg", &map, 1),
            Err(TracerError::Image(_))
        ));
    }

    #[test]
    fn ramp_end_points() {
        assert_eq!(heat_color(0.0), [0, 0, 128]);
        assert_eq!(heat_color(1.0), [230, 0, 0]);
        assert_eq!(heat_color(-5.0), heat_color(0.0));
        assert_eq!(heat_color(5.0), heat_color(1.0));
    }

    #[test]
    fn heatmap_size_and_empty_cells() {
        let mut map =
            CoverageMap::new(CoveragePlane::new(point3(0.0, 0.0, 0.0), 3.0, 2.0), 1.0).unwrap();
        map.accumulate(&point3(0.5, 0.0, 0.5), 1.0);
        map.accumulate(&point3(2.5, 0.0, 1.5), 100.0);
        map.convert_to_db();

        let img = render_heatmap(&map, 4);
        assert_eq!((img.width(), img.height()), (12, 8));
        assert_eq!(img.get_pixel(0, 0).0, heat_color(0.0));
        assert_eq!(img.get_pixel(11, 7).0, heat_color(1.0));
        assert_eq!(img.get_pixel(5, 0).0, [0, 0, 0]);
    }
}
