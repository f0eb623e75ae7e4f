//! # raw-volume library
//!
//! This crate serves a high-level API for inspecting and re-orienting 3D
//! voxel volumes stored as raw binary sample buffers

//!
//! A raw volume file carries no header: its dimensions and a resolution
//! tag are encoded in the filename as
//! `<prefix>_<resolution>_<Nx>_<Ny>_<Nz>.raw`, and the memory layout
//! (row-major or column-major) is chosen per invocation. A loaded
//! [`Volume`] can be rotated by arbitrary angles about the three
//! principal axes, flipped and quarter-turned exactly, and recentered on
//! its intensity-weighted centroid. Derived views are recomputed from
//! scratch on request:
//!  - three orthogonal sum projections (XY, XZ, YZ)
//!  - an isosurface mesh at a tenth below the maximum intensity
//!
//! The `loadtool` binary wires these operations to an egui control
//! surface; `genvolume` writes a synthetic ellipsoid volume to play with.
//!
//! # Examples
//!
//! ## Loading a raw volume and saving a projection
//!
//! Read a raw volume named by the filename convention, sum it along the
//! Z axis and save the projection as a grayscale image.
//!
//! ```no_run
//! # use raw_volume::enums::{MemoryOrder, Plane};
//! # use raw_volume::volume::Volume;
//! # use raw_volume::volume_loader::VolumeLoader;
//! # use std::path::Path;
//! let (volume, _header) = VolumeLoader::load_from_path(
//!     Path::new("exampleFile_200_101_150_200.raw"),
//!     MemoryOrder::C,
//! )
//! .expect("should have loaded the raw volume");
//! let image = Volume::projection_to_image(&volume.project(Plane::XY))
//!     .expect("projection fits a grayscale image");
//! image.save("result.png");
//! ```
//!
//! [`Volume`]: crate::volume::Volume

pub mod app;
pub mod codec;
pub mod enums;
pub mod generator;
mod interpolator;
pub mod surface;
pub mod volume;
pub mod volume_loader;
