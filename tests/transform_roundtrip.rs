//! End-to-end scenario: generate a known analytic shape, write it out,
//! load it back, run a dead-zone rotation and save, asserting the saved
//! bytes equal the input.

use raw_volume::app::{self, ZERO_ANGLE};
use raw_volume::codec;
use raw_volume::enums::MemoryOrder;
use raw_volume::generator;
use raw_volume::volume_loader::{RawFilename, VolumeLoader, VolumeWriter};

use std::fs;
use tempfile::tempdir;

/// Sphere of radius 0.5 in the unit cube.
fn sphere(x: f32, y: f32, z: f32) -> f32 {
    let r = x * x + y * y + z * z;
    if r < 0.25 { (0.25 - r).sqrt() } else { 0.0 }
}

#[test]
fn noop_update_round_trips_byte_for_byte() {
    let data = generator::sample_grid(sphere, (11, 11, 11));
    let header = RawFilename {
        prefix: "sphere".to_owned(),
        resolution: 11,
        nx: 11,
        ny: 11,
        nz: 11,
    };

    let dir = tempdir().unwrap();
    let input = dir.path().join(header.file_name());
    fs::write(&input, codec::encode(&data, MemoryOrder::C)).unwrap();

    let (mut volume, header) = VolumeLoader::load_from_path(&input, MemoryOrder::C).unwrap();
    assert_eq!(volume.dim(), (11, 11, 11));
    assert_eq!(volume.data(), &data);

    // a 0° rotation sits inside the dead-zone and must not touch the data
    assert!(0.0f32.abs() <= ZERO_ANGLE);
    app::apply_rotations(&mut volume, [0.0, 0.0, 0.0]);

    let output = VolumeWriter::write_raw(&volume, &header, dir.path(), MemoryOrder::C).unwrap();
    assert_eq!(
        output.file_name().unwrap().to_str().unwrap(),
        "sphere-t_11_11_11_11.raw"
    );
    assert_eq!(fs::read(&output).unwrap(), fs::read(&input).unwrap());
}

#[test]
fn fortran_order_round_trips_the_same_way() {
    let data = generator::sample_grid(generator::elliptic_field, (9, 12, 15));
    let header = RawFilename {
        prefix: "ellipsoid".to_owned(),
        resolution: 15,
        nx: 9,
        ny: 12,
        nz: 15,
    };

    let dir = tempdir().unwrap();
    let input = dir.path().join(header.file_name());
    fs::write(&input, codec::encode(&data, MemoryOrder::Fortran)).unwrap();

    let (volume, header) = VolumeLoader::load_from_path(&input, MemoryOrder::Fortran).unwrap();
    assert_eq!(volume.data(), &data);

    let output =
        VolumeWriter::write_raw(&volume, &header, dir.path(), MemoryOrder::Fortran).unwrap();
    assert_eq!(fs::read(&output).unwrap(), fs::read(&input).unwrap());
}

#[test]
fn exact_transforms_survive_a_save_load_cycle() {
    let data = generator::sample_grid(sphere, (8, 10, 12));
    let header = RawFilename {
        prefix: "sphere".to_owned(),
        resolution: 12,
        nx: 8,
        ny: 10,
        nz: 12,
    };

    let dir = tempdir().unwrap();
    let input = dir.path().join(header.file_name());
    fs::write(&input, codec::encode(&data, MemoryOrder::C)).unwrap();

    let (mut volume, header) = VolumeLoader::load_from_path(&input, MemoryOrder::C).unwrap();
    volume.rotate90(raw_volume::enums::Axis::X);
    assert_eq!(volume.dim(), (8, 12, 10));

    let output = VolumeWriter::write_raw(&volume, &header, dir.path(), MemoryOrder::C).unwrap();
    // the new name carries the swapped dimensions
    assert_eq!(
        output.file_name().unwrap().to_str().unwrap(),
        "sphere-t_12_8_12_10.raw"
    );
    let (reloaded, _) = VolumeLoader::load_from_path(&output, MemoryOrder::C).unwrap();
    assert_eq!(reloaded.data(), volume.data());
}
