use crate::enums::{Axis, Plane};
use crate::interpolator::Interpolator;

use image::ImageBuffer;
use image::Luma;
use ndarray::Axis as NdAxis;
use ndarray::{Array2, Array3, Zip};
use rayon::prelude::*;

/// In-memory voxel volume with a fixed isotropic voxel spacing.
///
/// All transforms mutate the array in place; the previous orientation is
/// lost. There is no undo history and no transform log.
#[derive(Debug)]
pub struct Volume {
    pub data: Array3<u8>,
    pub spacing: (f32, f32, f32),
}

impl Volume {
    pub fn new(data: Array3<u8>) -> Self {
        Self {
            data,
            spacing: (0.1, 0.1, 0.1),
        }
    }

    /// Get the dimensions of the volume (x, y, z)
    pub fn dim(&self) -> (usize, usize, usize) {
        self.data.dim()
    }

    /// Get a reference to the underlying data
    pub fn data(&self) -> &Array3<u8> {
        &self.data
    }

    /// Get a mutable reference to the underlying data
    pub fn data_mut(&mut self) -> &mut Array3<u8> {
        &mut self.data
    }

    pub fn max_intensity(&self) -> u8 {
        self.data.iter().copied().max().unwrap_or(0)
    }

    /// Sum of samples along the axis orthogonal to `plane`.
    pub fn project(&self, plane: Plane) -> Array2<u32> {
        self.data
            .fold_axis(NdAxis(plane.sum_axis()), 0u32, |acc, &v| acc + v as u32)
    }

    /// Normalize a projection to an 8-bit grayscale image for display.
    pub fn projection_to_image(projection: &Array2<u32>) -> Option<ImageBuffer<Luma<u8>, Vec<u8>>> {
        let (height, width) = projection.dim();
        let max = projection.iter().copied().max().unwrap_or(0).max(1);
        let scale = 255.0 / max as f32;
        let pixel_data: Vec<u8> = projection
            .into_par_iter()
            .map(|&v| (v as f32 * scale).clamp(0.0, 255.0) as u8)
            .collect();
        ImageBuffer::from_raw(width as u32, height as u32, pixel_data)
    }

    /// Interpolated rotation about the array center in the rotation plane
    /// of `axis`. The output shape is unchanged; samples falling outside
    /// the bounds are dropped and vacated samples become 0.
    pub fn rotate(&mut self, axis: Axis, angle_deg: f32) {
        let (p, q) = axis.rotation_plane();
        let dim = self.data.dim();
        let shape = [dim.0, dim.1, dim.2];
        let (sin, cos) = angle_deg.to_radians().sin_cos();
        let center_p = (shape[p] as f32 - 1.0) / 2.0;
        let center_q = (shape[q] as f32 - 1.0) / 2.0;

        let source = &self.data;
        let mut rotated = Array3::<u8>::zeros(dim);
        Zip::indexed(&mut rotated).par_for_each(|(i, j, k), value| {
            let idx = [i, j, k];
            // pull each output sample from the unrotated plane
            let u = idx[p] as f32 - center_p;
            let v = idx[q] as f32 - center_q;
            let src_p = cos.mul_add(u, sin * v) + center_p;
            let src_q = cos.mul_add(v, -sin * u) + center_q;
            if let Some(sample) = Interpolator::bilinear_sample(source, idx, p, q, src_p, src_q)
            {
                *value = sample.round().clamp(0.0, 255.0) as u8;
            }
        });
        self.data = rotated;
    }

    /// Exact reversal along one axis. Applying it twice restores the
    /// volume bit for bit.
    pub fn flip(&mut self, axis: Axis) {
        self.data.invert_axis(NdAxis(axis.index()));
    }

    /// Exact quarter turn in the rotation plane of `axis`: the plane axes
    /// swap and one of them reverses. No interpolation; four applications
    /// restore the original orientation.
    pub fn rotate90(&mut self, axis: Axis) {
        let (p, q) = axis.rotation_plane();
        self.data.swap_axes(p, q);
        self.data.invert_axis(NdAxis(p));
        let standard = self.data.as_standard_layout().into_owned();
        self.data = standard;
    }

    /// Intensity-weighted centroid in index coordinates, or `None` for an
    /// all-zero volume.
    pub fn centroid(&self) -> Option<(f32, f32, f32)> {
        let mut total = 0u64;
        let mut weighted = [0f64; 3];
        for ((i, j, k), &v) in self.data.indexed_iter() {
            total += v as u64;
            weighted[0] += (i as f64) * v as f64;
            weighted[1] += (j as f64) * v as f64;
            weighted[2] += (k as f64) * v as f64;
        }
        if total == 0 {
            return None;
        }
        let total = total as f64;
        Some((
            (weighted[0] / total) as f32,
            (weighted[1] / total) as f32,
            (weighted[2] / total) as f32,
        ))
    }

    /// Shift the volume by its raw centroid tuple, nearest-integer, with
    /// vacated samples zero-filled. The shift amount deliberately is the
    /// centroid itself rather than its offset from the array center; see
    /// DESIGN.md. An all-zero volume is left untouched.
    pub fn center(&mut self) {
        let Some(com) = self.centroid() else {
            return;
        };
        let shift = [
            com.0.round() as isize,
            com.1.round() as isize,
            com.2.round() as isize,
        ];
        let dim = self.data.dim();
        let bounds = [dim.0 as isize, dim.1 as isize, dim.2 as isize];

        let source = &self.data;
        let mut shifted = Array3::<u8>::zeros(dim);
        Zip::indexed(&mut shifted).par_for_each(|(i, j, k), value| {
            let src = [
                i as isize + shift[0],
                j as isize + shift[1],
                k as isize + shift[2],
            ];
            let inside = src
                .iter()
                .zip(&bounds)
                .all(|(&s, &n)| s >= 0 && s < n);
            if inside {
                *value = source[[src[0] as usize, src[1] as usize, src[2] as usize]];
            }
        });
        self.data = shifted;
    }
}
