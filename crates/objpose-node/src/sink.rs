use std::{
    fs::File,
    io::BufWriter,
    path::{Path, PathBuf},
};

use objpose_io::png::write_image_png_rgb8;

use crate::{error::NodeError, marker::MarkerArray, msgs::ImageMsg};

/// Destination of the node outputs.
pub trait MarkerSink {
    /// Publish the pose markers of a frame.
    fn publish_markers(&mut self, markers: &MarkerArray) -> Result<(), NodeError>;

    /// Publish the instance label visualization of a frame.
    fn publish_image(&mut self, image: &ImageMsg) -> Result<(), NodeError>;
}

impl<S: MarkerSink + ?Sized> MarkerSink for &mut S {
    fn publish_markers(&mut self, markers: &MarkerArray) -> Result<(), NodeError> {
        (**self).publish_markers(markers)
    }

    fn publish_image(&mut self, image: &ImageMsg) -> Result<(), NodeError> {
        (**self).publish_image(image)
    }
}

/// Writes every output into a directory.
///
/// Markers go to `markers_<seq>.json` and visualizations to `label_ins_viz_<seq>.png`,
/// where `seq` is the zero padded header sequence number. Files are overwritten.
#[derive(Debug, Clone)]
pub struct FileMarkerSink {
    dir: PathBuf,
}

impl FileMarkerSink {
    /// Creates a sink writing into `dir`, creating it if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, NodeError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// The output directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl MarkerSink for FileMarkerSink {
    fn publish_markers(&mut self, markers: &MarkerArray) -> Result<(), NodeError> {
        let seq = markers.markers.first().map_or(0, |m| m.header.seq);
        let path = self.dir.join(format!("markers_{seq:06}.json"));
        let writer = BufWriter::new(File::create(&path)?);
        serde_json::to_writer_pretty(writer, markers)?;
        log::debug!("wrote {}", path.display());
        Ok(())
    }

    fn publish_image(&mut self, image: &ImageMsg) -> Result<(), NodeError> {
        let path = self
            .dir
            .join(format!("label_ins_viz_{:06}.png", image.header.seq));
        write_image_png_rgb8(&path, &image.to_rgb8()?)?;
        log::debug!("wrote {}", path.display());
        Ok(())
    }
}
