use crate::codec;
use crate::enums::MemoryOrder;
use crate::volume::Volume;

use ndarray_npy::{NpzWriter, WriteNpzError};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FormatError {
    #[error("unexpected filename format, expected prefix_resolution_Nx_Ny_Nz.raw")]
    FieldCount,

    #[error("non-numeric field in filename: {0}")]
    BadField(String),

    #[error("expected {expected} samples, file holds {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("npz error: {0}")]
    Npz(#[from] WriteNpzError),
}

/// Dimensions and resolution tag carried by a raw volume's filename, the
/// only metadata the format persists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFilename {
    pub prefix: String,
    pub resolution: u32,
    pub nx: usize,
    pub ny: usize,
    pub nz: usize,
}

impl RawFilename {
    /// Parse `<prefix>_<resolution>_<Nx>_<Ny>_<Nz>.raw`. Exactly five
    /// underscore-delimited fields are required.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError::FieldCount`] on a wrong field count and
    /// [`FormatError::BadField`] on non-numeric resolution or dimensions.
    pub fn parse(path: &Path) -> Result<Self, FormatError> {
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or(FormatError::FieldCount)?;

        let fields: Vec<&str> = stem.split('_').collect();
        if fields.len() != 5 {
            return Err(FormatError::FieldCount);
        }

        let numeric =
            |field: &str| field.parse().map_err(|_| FormatError::BadField(field.to_owned()));

        Ok(Self {
            prefix: fields[0].to_owned(),
            resolution: fields[1]
                .parse()
                .map_err(|_| FormatError::BadField(fields[1].to_owned()))?,
            nx: numeric(fields[2])?,
            ny: numeric(fields[3])?,
            nz: numeric(fields[4])?,
        })
    }

    pub fn dim(&self) -> (usize, usize, usize) {
        (self.nx, self.ny, self.nz)
    }

    fn stem(&self) -> String {
        format!(
            "{}_{}_{}_{}_{}",
            self.prefix, self.resolution, self.nx, self.ny, self.nz
        )
    }

    /// Filename for the current state, `<prefix>_<res>_<Nx>_<Ny>_<Nz>.raw`.
    pub fn file_name(&self) -> String {
        format!("{}.raw", self.stem())
    }

    /// Filename of the npz container sharing this stem.
    pub fn npz_name(&self) -> String {
        format!("{}.npz", self.stem())
    }

    /// Name for a transformed copy: marker appended to the prefix, dimension
    /// fields regenerated. The marker joins with a hyphen, an underscore
    /// would break the five-field convention.
    pub fn transformed(&self, dim: (usize, usize, usize)) -> RawFilename {
        RawFilename {
            prefix: format!("{}-t", self.prefix),
            resolution: self.resolution,
            nx: dim.0,
            ny: dim.1,
            nz: dim.2,
        }
    }
}

pub struct VolumeLoader;

impl VolumeLoader {
    /// Load a volume from a raw file, taking dimensions from the filename.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError`] if the filename does not follow the
    /// convention, the file cannot be read, or the byte count does not
    /// match the encoded dimensions.
    pub fn load_from_path(
        path: impl AsRef<Path>,
        order: MemoryOrder,
    ) -> Result<(Volume, RawFilename), FormatError> {
        let path = path.as_ref();
        let header = RawFilename::parse(path)?;
        let bytes = fs::read(path)?;
        let data = codec::decode(bytes, header.dim(), order)?;
        log::debug!(
            "decoded {} as {:?} in {order} order",
            path.display(),
            header.dim()
        );
        Ok((Volume::new(data), header))
    }
}

pub struct VolumeWriter;

impl VolumeWriter {
    /// Write the volume into `dir` as a raw file under the transform-marked
    /// name derived from `header` and the current array shape. Returns the
    /// written path.
    pub fn write_raw(
        volume: &Volume,
        header: &RawFilename,
        dir: &Path,
        order: MemoryOrder,
    ) -> Result<PathBuf, FormatError> {
        let path = dir.join(header.transformed(volume.dim()).file_name());
        fs::write(&path, codec::encode(volume.data(), order))?;
        Ok(path)
    }

    /// Write the volume into `dir` as an npz container holding a single
    /// dataset named `volume`. Returns the written path.
    pub fn write_npz(
        volume: &Volume,
        header: &RawFilename,
        dir: &Path,
    ) -> Result<PathBuf, FormatError> {
        let path = dir.join(header.transformed(volume.dim()).npz_name());
        let mut npz = NpzWriter::new(File::create(&path)?);
        npz.add_array("volume", &volume.data().as_standard_layout())?;
        npz.finish()?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;
    use ndarray_npy::NpzReader;
    use tempfile::tempdir;

    #[test]
    fn filename_parses_into_resolution_and_dimensions() {
        let header = RawFilename::parse(Path::new("foo_200_101_150_200.raw")).unwrap();
        assert_eq!(header.prefix, "foo");
        assert_eq!(header.resolution, 200);
        assert_eq!(header.dim(), (101, 150, 200));
    }

    #[test]
    fn too_few_fields_is_a_format_error() {
        let err = RawFilename::parse(Path::new("foo_200_101.raw")).unwrap_err();
        assert!(matches!(err, FormatError::FieldCount));
    }

    #[test]
    fn non_numeric_dimension_is_a_format_error() {
        let err = RawFilename::parse(Path::new("foo_200_abc_150_200.raw")).unwrap_err();
        assert!(matches!(err, FormatError::BadField(field) if field == "abc"));
    }

    #[test]
    fn load_rejects_a_short_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("stub_10_2_3_4.raw");
        fs::write(&path, vec![0u8; 23]).unwrap();
        let err = VolumeLoader::load_from_path(&path, MemoryOrder::C).unwrap_err();
        assert!(matches!(err, FormatError::LengthMismatch { expected: 24, actual: 23 }));
    }

    #[test]
    fn load_reshapes_to_the_filename_dimensions() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("stub_10_2_3_4.raw");
        fs::write(&path, (0..24).collect::<Vec<u8>>()).unwrap();
        let (volume, header) = VolumeLoader::load_from_path(&path, MemoryOrder::C).unwrap();
        assert_eq!(volume.dim(), (2, 3, 4));
        assert_eq!(header.prefix, "stub");
        assert_eq!(volume.data()[[0, 0, 1]], 1);
        assert_eq!(volume.data()[[1, 0, 0]], 12);
    }

    #[test]
    fn written_raw_file_carries_the_transform_marker() {
        let dir = tempdir().unwrap();
        let volume = Volume::new(Array3::zeros((2, 3, 4)));
        let header = RawFilename::parse(Path::new("foo_10_2_3_4.raw")).unwrap();
        let path = VolumeWriter::write_raw(&volume, &header, dir.path(), MemoryOrder::C).unwrap();
        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            "foo-t_10_2_3_4.raw"
        );
        assert_eq!(fs::read(&path).unwrap().len(), 24);
        // the marked name still parses under the five-field convention
        let reparsed = RawFilename::parse(&path).unwrap();
        assert_eq!(reparsed.prefix, "foo-t");
        assert_eq!(reparsed.dim(), (2, 3, 4));
    }

    #[test]
    fn npz_container_holds_one_named_dataset() {
        let dir = tempdir().unwrap();
        let data = Array3::from_shape_fn((2, 3, 4), |(i, j, k)| (i + 2 * j + 3 * k) as u8);
        let header = RawFilename::parse(Path::new("foo_10_2_3_4.raw")).unwrap();
        let path = VolumeWriter::write_npz(&Volume::new(data.clone()), &header, dir.path()).unwrap();
        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            "foo-t_10_2_3_4.npz"
        );
        let mut npz = NpzReader::new(File::open(&path).unwrap()).unwrap();
        let stored: Array3<u8> = npz.by_name("volume.npy").unwrap();
        assert_eq!(stored, data);
    }
}
