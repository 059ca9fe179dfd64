use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::Path,
};

use flate2::{read::GzDecoder, write::GzEncoder, Compression};
use objpose_image::{Image, ImageSize, Mask};
use serde::{Deserialize, Serialize};

use crate::error::IoError;

/// Instance segmentation result of one image.
///
/// The three vectors are parallel: `masks[i]` has class `labels[i]` with score `scores[i]`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Detections {
    /// One boolean mask per detected instance, all of the image size.
    pub masks: Vec<Mask>,
    /// Class id of each instance.
    pub labels: Vec<u32>,
    /// Detection confidence of each instance.
    pub scores: Vec<f32>,
}

impl Detections {
    /// Number of detected instances.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Returns true when nothing was detected.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

// on-disk layout; masks are stored as flat row-major vectors
#[derive(Serialize, Deserialize)]
struct DetectionsRecord {
    width: usize,
    height: usize,
    masks: Vec<Vec<bool>>,
    labels: Vec<u32>,
    scores: Vec<f32>,
}

/// Write detections to a gzip-compressed archive, overwriting any existing file.
///
/// # Arguments
///
/// * `file_path` - Destination of the archive.
/// * `detections` - The detections to store. All masks must share one size.
pub fn save_detections(
    file_path: impl AsRef<Path>,
    detections: &Detections,
) -> Result<(), IoError> {
    if detections.masks.len() != detections.labels.len()
        || detections.scores.len() != detections.labels.len()
    {
        return Err(IoError::InvalidArchive(format!(
            "{} masks, {} labels and {} scores",
            detections.masks.len(),
            detections.labels.len(),
            detections.scores.len()
        )));
    }

    let size = detections
        .masks
        .first()
        .map(|m| m.size())
        .unwrap_or(ImageSize {
            width: 0,
            height: 0,
        });
    if detections.masks.iter().any(|m| m.size() != size) {
        return Err(IoError::InvalidArchive(
            "masks of different sizes".to_string(),
        ));
    }

    let record = DetectionsRecord {
        width: size.width,
        height: size.height,
        masks: detections
            .masks
            .iter()
            .map(|m| m.as_slice().to_vec())
            .collect(),
        labels: detections.labels.clone(),
        scores: detections.scores.clone(),
    };

    let file = File::create(file_path)?;
    let mut encoder = GzEncoder::new(BufWriter::new(file), Compression::default());
    bincode::serde::encode_into_std_write(&record, &mut encoder, bincode::config::standard())?;
    encoder.finish()?.flush()?;
    Ok(())
}

/// Read detections written by [`save_detections`].
pub fn load_detections(file_path: impl AsRef<Path>) -> Result<Detections, IoError> {
    let file_path = file_path.as_ref();
    if !file_path.exists() {
        return Err(IoError::FileDoesNotExist(file_path.to_path_buf()));
    }

    let file = File::open(file_path)?;
    let mut decoder = GzDecoder::new(BufReader::new(file));
    let record: DetectionsRecord =
        bincode::serde::decode_from_std_read(&mut decoder, bincode::config::standard())?;

    if record.masks.len() != record.labels.len() || record.scores.len() != record.labels.len() {
        return Err(IoError::InvalidArchive(
            "mismatching number of masks, labels and scores".to_string(),
        ));
    }

    let size = ImageSize {
        width: record.width,
        height: record.height,
    };
    let masks = record
        .masks
        .into_iter()
        .map(|data| Image::new(size, data))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Detections {
        masks,
        labels: record.labels,
        scores: record.scores,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_load_detections() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;
        let path = tmp_dir.path().join("detections.bin.gz");

        let size = ImageSize {
            width: 4,
            height: 3,
        };
        let detections = Detections {
            masks: vec![
                Mask::from_fn(size, |x, _| [x < 2]),
                Mask::from_fn(size, |x, y| [x == y]),
            ],
            labels: vec![5, 21],
            scores: vec![0.9, 0.25],
        };
        save_detections(&path, &detections)?;
        // overwritten on rerun
        save_detections(&path, &detections)?;

        let loaded = load_detections(&path)?;
        assert_eq!(loaded, detections);
        assert_eq!(loaded.len(), 2);
        Ok(())
    }

    #[test]
    fn empty_detections() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;
        let path = tmp_dir.path().join("empty.bin.gz");
        save_detections(&path, &Detections::default())?;
        assert!(load_detections(&path)?.is_empty());
        Ok(())
    }

    #[test]
    fn inconsistent_detections() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;
        let path = tmp_dir.path().join("bad.bin.gz");
        let detections = Detections {
            masks: vec![],
            labels: vec![1],
            scores: vec![0.5],
        };
        assert!(matches!(
            save_detections(&path, &detections),
            Err(IoError::InvalidArchive(_))
        ));
        assert!(matches!(
            load_detections(&path),
            Err(IoError::FileDoesNotExist(_))
        ));
        Ok(())
    }
}
