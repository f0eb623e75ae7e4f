//! Synthetic volume generation from closed-form fields.
//!
//! The generator samples an implicit field on a regular grid spanning the
//! cube [-1, 1] per axis, scales the result so the field maximum maps to
//! 255 and quantizes to unsigned bytes. Quantization is the one lossy step
//! of the pipeline.

use crate::volume::Volume;
use crate::volume_loader::RawFilename;

use ndarray::{Array3, Zip};

/// The ellipsoid field of the bundled example volume:
/// `R = x² + (y/0.5)² + (z/0.25)²`, value `sqrt(1 - R)` inside `R < 1`,
/// zero outside.
pub fn elliptic_field(x: f32, y: f32, z: f32) -> f32 {
    let r = (x / 1.0).powi(2) + (y / 0.5).powi(2) + (z / 0.25).powi(2);
    if r < 1.0 { (1.0 - r).sqrt() } else { 0.0 }
}

/// Evaluate `field` on a regular `dim` grid over [-1, 1]³ and quantize.
/// Grid axis i maps to array axis i.
pub fn sample_grid<F>(field: F, dim: (usize, usize, usize)) -> Array3<u8>
where
    F: Fn(f32, f32, f32) -> f32 + Sync,
{
    let coord = |n: usize, i: usize| {
        if n > 1 {
            -1.0 + 2.0 * i as f32 / (n - 1) as f32
        } else {
            0.0
        }
    };

    let mut values = Array3::<f32>::zeros(dim);
    Zip::indexed(&mut values).par_for_each(|(i, j, k), value| {
        *value = field(coord(dim.0, i), coord(dim.1, j), coord(dim.2, k));
    });
    quantize(&values)
}

/// Scale a non-negative field so its maximum hits 255, truncating to u8.
/// An all-zero field stays all zero.
pub fn quantize(values: &Array3<f32>) -> Array3<u8> {
    let max = values.fold(0.0f32, |acc, &v| acc.max(v));
    if max <= 0.0 {
        return Array3::zeros(values.dim());
    }
    let scale = 255.0 / max;
    values.mapv(|v| (v * scale) as u8)
}

/// Generate the example ellipsoid volume together with the filename header
/// encoding its dimensions.
pub fn generate(prefix: &str, resolution: u32, dim: (usize, usize, usize)) -> (Volume, RawFilename) {
    let data = sample_grid(elliptic_field, dim);
    let header = RawFilename {
        prefix: prefix.to_owned(),
        resolution,
        nx: dim.0,
        ny: dim.1,
        nz: dim.2,
    };
    (Volume::new(data), header)
}
