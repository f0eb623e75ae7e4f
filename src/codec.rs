//! Raw sample buffer to 3D array codec.
//!
//! A raw volume file is nothing but the flattened samples; dimensions and
//! layout arrive out of band (see [`crate::volume_loader`]). Decoding is a
//! reshape, encoding is a flatten, and the only thing that can go wrong is
//! a sample count that does not match the promised dimensions.

use crate::enums::MemoryOrder;
use crate::volume_loader::FormatError;

use ndarray::{Array3, ShapeBuilder};

/// Reshape a flat sample buffer into a 3D array.
///
/// # Errors
///
/// Returns [`FormatError::LengthMismatch`] if the buffer does not hold
/// exactly `nx * ny * nz` samples.
pub fn decode(
    bytes: Vec<u8>,
    dim: (usize, usize, usize),
    order: MemoryOrder,
) -> Result<Array3<u8>, FormatError> {
    let expected = dim.0 * dim.1 * dim.2;
    let actual = bytes.len();
    if actual != expected {
        return Err(FormatError::LengthMismatch { expected, actual });
    }

    let array = match order {
        MemoryOrder::C => Array3::from_shape_vec(dim, bytes),
        MemoryOrder::Fortran => Array3::from_shape_vec(dim.f(), bytes),
    };
    array.map_err(|_| FormatError::LengthMismatch { expected, actual })
}

/// Flatten a 3D array into a sample buffer in the requested order.
pub fn encode(data: &Array3<u8>, order: MemoryOrder) -> Vec<u8> {
    match order {
        MemoryOrder::C => data.iter().copied().collect(),
        // iterating the transposed view row-major yields the samples in
        // column-major order of the original
        MemoryOrder::Fortran => data.t().iter().copied().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_bytes() -> Vec<u8> {
        (0..24).collect()
    }

    #[test]
    fn round_trip_is_byte_exact_in_c_order() {
        let bytes = sample_bytes();
        let array = decode(bytes.clone(), (2, 3, 4), MemoryOrder::C).unwrap();
        assert_eq!(encode(&array, MemoryOrder::C), bytes);
    }

    #[test]
    fn round_trip_is_byte_exact_in_fortran_order() {
        let bytes = sample_bytes();
        let array = decode(bytes.clone(), (2, 3, 4), MemoryOrder::Fortran).unwrap();
        assert_eq!(encode(&array, MemoryOrder::Fortran), bytes);
    }

    #[test]
    fn orders_disagree_on_the_same_buffer() {
        let bytes = sample_bytes();
        let c = decode(bytes.clone(), (2, 3, 4), MemoryOrder::C).unwrap();
        let f = decode(bytes, (2, 3, 4), MemoryOrder::Fortran).unwrap();
        assert_eq!(c[[0, 0, 1]], 1);
        assert_eq!(f[[1, 0, 0]], 1);
        assert_ne!(c, f);
    }

    #[test]
    fn length_mismatch_is_rejected() {
        let err = decode(vec![0; 23], (2, 3, 4), MemoryOrder::C).unwrap_err();
        match err {
            FormatError::LengthMismatch { expected, actual } => {
                assert_eq!(expected, 24);
                assert_eq!(actual, 23);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
