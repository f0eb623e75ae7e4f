use crate::volume::Volume;

use fast_surface_nets::ndshape::Shape;
use fast_surface_nets::{SurfaceNetsBuffer, surface_nets};
use nalgebra::{Point3, Vector3};

/// Triangle mesh extracted from a volume at an intensity threshold.
/// Positions are in voxel-spacing units, normals point out of the
/// high-intensity side.
pub struct SurfaceMesh {
    pub positions: Vec<Point3<f32>>,
    pub normals: Vec<Vector3<f32>>,
    pub indices: Vec<u32>,
}

impl SurfaceMesh {
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    fn empty() -> Self {
        Self {
            positions: Vec::new(),
            normals: Vec::new(),
            indices: Vec::new(),
        }
    }
}

/// Extraction threshold: a tenth below the maximum intensity.
pub fn threshold(volume: &Volume) -> f32 {
    volume.max_intensity() as f32 / 1.1
}

/// The discrete grid shape handed to surface nets, linearized the same
/// way the volume array is laid out (last axis fastest).
#[derive(Clone, Copy)]
struct GridShape {
    n0: u32,
    n1: u32,
    n2: u32,
}

impl Shape<3> for GridShape {
    type Coord = u32;

    #[inline]
    fn as_array(&self) -> [Self::Coord; 3] {
        [self.n0, self.n1, self.n2]
    }

    fn size(&self) -> Self::Coord {
        self.n0 * self.n1 * self.n2
    }

    fn usize(&self) -> usize {
        (self.n0 * self.n1 * self.n2) as usize
    }

    fn linearize(&self, coords: [Self::Coord; 3]) -> u32 {
        let [x0, x1, x2] = coords;
        (x0 * self.n1 + x1) * self.n2 + x2
    }

    fn delinearize(&self, i: u32) -> [Self::Coord; 3] {
        let x2 = i % self.n2;
        let x01 = i / self.n2;
        let x1 = x01 % self.n1;
        let x0 = x01 / self.n1;
        [x0, x1, x2]
    }
}

/// Mesh the isosurface of `volume` at [`threshold`].
///
/// The sampled field is the threshold-shifted intensity, negative inside,
/// so the zero crossing meshed by surface nets sits at the threshold.
/// Recomputed from scratch on every call; nothing is cached.
pub fn extract_surface(volume: &Volume) -> SurfaceMesh {
    let (n0, n1, n2) = volume.dim();
    if n0 < 2 || n1 < 2 || n2 < 2 {
        return SurfaceMesh::empty();
    }

    let iso = threshold(volume);
    let field: Vec<f32> = volume.data().iter().map(|&v| iso - v as f32).collect();

    let shape = GridShape {
        n0: n0 as u32,
        n1: n1 as u32,
        n2: n2 as u32,
    };
    let mut buffer = SurfaceNetsBuffer::default();
    surface_nets(
        &field,
        &shape,
        [0, 0, 0],
        [n0 as u32 - 1, n1 as u32 - 1, n2 as u32 - 1],
        &mut buffer,
    );

    let (sx, sy, sz) = volume.spacing;
    SurfaceMesh {
        positions: buffer
            .positions
            .iter()
            .map(|p| Point3::new(p[0] * sx, p[1] * sy, p[2] * sz))
            .collect(),
        normals: buffer
            .normals
            .iter()
            .map(|n| Vector3::new(n[0], n[1], n[2]))
            .collect(),
        indices: buffer.indices,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array3, s};

    fn solid_block() -> Volume {
        let mut data = Array3::<u8>::zeros((8, 8, 8));
        data.slice_mut(s![2..6, 2..6, 2..6]).fill(255);
        Volume::new(data)
    }

    #[test]
    fn threshold_sits_below_the_maximum() {
        let volume = solid_block();
        let iso = threshold(&volume);
        assert!(iso < 255.0);
        assert!(iso > 200.0);
    }

    #[test]
    fn solid_block_yields_a_mesh() {
        let mesh = extract_surface(&solid_block());
        assert!(!mesh.is_empty());
        assert!(mesh.triangle_count() > 0);
        assert_eq!(mesh.positions.len(), mesh.normals.len());
        // indices address actual vertices
        let max_index = mesh.indices.iter().copied().max().unwrap() as usize;
        assert!(max_index < mesh.positions.len());
    }

    #[test]
    fn mesh_positions_stay_inside_the_spaced_bounds() {
        let volume = solid_block();
        let mesh = extract_surface(&volume);
        let limit = (volume.dim().0 - 1) as f32 * volume.spacing.0;
        for p in &mesh.positions {
            assert!(p.x >= 0.0 && p.x <= limit);
            assert!(p.y >= 0.0 && p.y <= limit);
            assert!(p.z >= 0.0 && p.z <= limit);
        }
    }

    #[test]
    fn empty_volume_yields_no_mesh() {
        let mesh = extract_surface(&Volume::new(Array3::zeros((8, 8, 8))));
        assert!(mesh.is_empty());
    }

    #[test]
    fn degenerate_volume_yields_no_mesh() {
        let mesh = extract_surface(&Volume::new(Array3::zeros((1, 8, 8))));
        assert!(mesh.is_empty());
    }
}
