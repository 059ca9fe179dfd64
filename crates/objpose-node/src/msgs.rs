use objpose_3d::{
    camera::PinholeCamera,
    depth::{depth_from_millimeters, sanitize_depth},
};
use objpose_image::{Image, ImageSize};
use serde::{Deserialize, Serialize};

use crate::error::NodeError;

/// Image encodings understood by the node.
pub mod encodings {
    /// 8-bit RGB.
    pub const RGB8: &str = "rgb8";
    /// 8-bit BGR.
    pub const BGR8: &str = "bgr8";
    /// 8-bit single channel.
    pub const MONO8: &str = "mono8";
    /// 16-bit single channel.
    pub const MONO16: &str = "mono16";
    /// 16-bit unsigned single channel.
    pub const TYPE_16UC1: &str = "16UC1";
    /// 32-bit float single channel.
    pub const TYPE_32FC1: &str = "32FC1";
    /// 32-bit signed single channel.
    pub const TYPE_32SC1: &str = "32SC1";
}

/// A timestamp.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Time {
    /// Seconds.
    pub sec: i32,
    /// Nanoseconds within the second.
    pub nanosec: u32,
}

impl Time {
    /// Creates a timestamp.
    pub fn new(sec: i32, nanosec: u32) -> Self {
        Self { sec, nanosec }
    }
}

/// A duration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Duration {
    /// Seconds.
    pub sec: i32,
    /// Nanoseconds.
    pub nanosec: u32,
}

/// Metadata shared by all messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    /// Sequence number of the message in its stream.
    pub seq: u32,
    /// Acquisition time.
    pub stamp: Time,
    /// Coordinate frame of the data.
    pub frame_id: String,
}

/// Calibration of the camera that produced a frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CameraInfo {
    /// Message header.
    #[serde(default)]
    pub header: Header,
    /// Image height in pixels.
    pub height: u32,
    /// Image width in pixels.
    pub width: u32,
    /// Row-major 3x3 camera matrix.
    pub k: [f64; 9],
}

impl CameraInfo {
    /// The pinhole intrinsics of the camera matrix.
    pub fn camera(&self) -> PinholeCamera {
        PinholeCamera::from_k(&self.k)
    }
}

/// An uncompressed image.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageMsg {
    /// Message header.
    pub header: Header,
    /// Number of rows.
    pub height: u32,
    /// Number of columns.
    pub width: u32,
    /// Pixel encoding, see [`encodings`].
    pub encoding: String,
    /// Byte order of multi-byte channels.
    pub is_bigendian: bool,
    /// Length of a row in bytes.
    pub step: u32,
    /// Pixel data.
    pub data: Vec<u8>,
}

impl ImageMsg {
    /// Wrap an RGB image into a message.
    pub fn from_rgb8(header: Header, image: &Image<u8, 3>) -> Self {
        Self {
            header,
            height: image.height() as u32,
            width: image.width() as u32,
            encoding: encodings::RGB8.to_string(),
            is_bigendian: false,
            step: (image.width() * 3) as u32,
            data: image.as_slice().to_vec(),
        }
    }

    /// Wrap a 16-bit image, typically depth in millimeters, into a `16UC1` message.
    pub fn from_mono16(header: Header, image: &Image<u16, 1>) -> Self {
        Self {
            header,
            height: image.height() as u32,
            width: image.width() as u32,
            encoding: encodings::TYPE_16UC1.to_string(),
            is_bigendian: false,
            step: (image.width() * 2) as u32,
            data: image
                .as_slice()
                .iter()
                .flat_map(|v| v.to_le_bytes())
                .collect(),
        }
    }

    /// Wrap a 32-bit signed single channel image into a message.
    pub fn from_labels(header: Header, labels: &Image<i32, 1>) -> Self {
        Self {
            header,
            height: labels.height() as u32,
            width: labels.width() as u32,
            encoding: encodings::TYPE_32SC1.to_string(),
            is_bigendian: false,
            step: (labels.width() * 4) as u32,
            data: labels
                .as_slice()
                .iter()
                .flat_map(|v| v.to_le_bytes())
                .collect(),
        }
    }

    /// The size of the image.
    pub fn size(&self) -> ImageSize {
        ImageSize {
            width: self.width as usize,
            height: self.height as usize,
        }
    }

    /// Decode an `rgb8` or `bgr8` image into RGB.
    pub fn to_rgb8(&self) -> Result<Image<u8, 3>, NodeError> {
        let swap = match self.encoding.as_str() {
            encodings::RGB8 => false,
            encodings::BGR8 => true,
            _ => return Err(self.unsupported(&[encodings::RGB8, encodings::BGR8])),
        };
        let mut image = self.decode::<u8, 3>(1, |b, _| b[0])?;
        if swap {
            image
                .as_slice_mut()
                .chunks_exact_mut(3)
                .for_each(|px| px.swap(0, 2));
        }
        Ok(image)
    }

    /// Decode a depth image into meters, NaN where invalid.
    ///
    /// 16-bit depth is in millimeters and zero marks missing measurements. Float depth is
    /// in meters.
    pub fn to_depth(&self) -> Result<Image<f32, 1>, NodeError> {
        match self.encoding.as_str() {
            encodings::TYPE_16UC1 | encodings::MONO16 => {
                let raw = self.decode::<u16, 1>(2, |b, big| {
                    let bytes = [b[0], b[1]];
                    if big {
                        u16::from_be_bytes(bytes)
                    } else {
                        u16::from_le_bytes(bytes)
                    }
                })?;
                Ok(depth_from_millimeters(&raw)?)
            }
            encodings::TYPE_32FC1 => {
                let mut depth = self.decode::<f32, 1>(4, |b, big| {
                    let bytes = [b[0], b[1], b[2], b[3]];
                    if big {
                        f32::from_be_bytes(bytes)
                    } else {
                        f32::from_le_bytes(bytes)
                    }
                })?;
                sanitize_depth(&mut depth);
                Ok(depth)
            }
            _ => Err(self.unsupported(&[
                encodings::TYPE_16UC1,
                encodings::MONO16,
                encodings::TYPE_32FC1,
            ])),
        }
    }

    /// Decode a label image into signed ids.
    pub fn to_labels(&self) -> Result<Image<i32, 1>, NodeError> {
        match self.encoding.as_str() {
            encodings::TYPE_32SC1 => self.decode::<i32, 1>(4, |b, big| {
                let bytes = [b[0], b[1], b[2], b[3]];
                if big {
                    i32::from_be_bytes(bytes)
                } else {
                    i32::from_le_bytes(bytes)
                }
            }),
            encodings::TYPE_16UC1 | encodings::MONO16 => self.decode::<i32, 1>(2, |b, big| {
                let bytes = [b[0], b[1]];
                if big {
                    u16::from_be_bytes(bytes) as i32
                } else {
                    u16::from_le_bytes(bytes) as i32
                }
            }),
            encodings::MONO8 => self.decode::<i32, 1>(1, |b, _| b[0] as i32),
            _ => Err(self.unsupported(&[
                encodings::TYPE_32SC1,
                encodings::TYPE_16UC1,
                encodings::MONO16,
                encodings::MONO8,
            ])),
        }
    }

    fn unsupported(&self, expected: &[&str]) -> NodeError {
        NodeError::UnsupportedEncoding {
            expected: expected.join(", "),
            actual: self.encoding.clone(),
        }
    }

    // reads every channel of every row, honoring the row step
    fn decode<T, const C: usize>(
        &self,
        bytes_per_channel: usize,
        read: impl Fn(&[u8], bool) -> T,
    ) -> Result<Image<T, C>, NodeError> {
        let size = self.size();
        let row_len = size.width * C * bytes_per_channel;
        let step = self.step as usize;
        if step < row_len {
            return Err(NodeError::BufferTooShort {
                expected: row_len,
                actual: step,
            });
        }
        let required = match size.height {
            0 => 0,
            h => step * (h - 1) + row_len,
        };
        if self.data.len() < required {
            return Err(NodeError::BufferTooShort {
                expected: required,
                actual: self.data.len(),
            });
        }

        let mut data = Vec::with_capacity(size.area() * C);
        for y in 0..size.height {
            let row = &self.data[y * step..y * step + row_len];
            data.extend(
                row.chunks_exact(bytes_per_channel)
                    .map(|b| read(b, self.is_bigendian)),
            );
        }
        Ok(Image::new(size, data)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msg(encoding: &str, width: u32, height: u32, step: u32, data: Vec<u8>) -> ImageMsg {
        ImageMsg {
            header: Header::default(),
            height,
            width,
            encoding: encoding.to_string(),
            is_bigendian: false,
            step,
            data,
        }
    }

    #[test]
    fn rgb_and_bgr() -> Result<(), NodeError> {
        let rgb = msg(encodings::RGB8, 2, 1, 6, vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(rgb.to_rgb8()?.as_slice(), &[1, 2, 3, 4, 5, 6]);

        let bgr = msg(encodings::BGR8, 2, 1, 6, vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(bgr.to_rgb8()?.as_slice(), &[3, 2, 1, 6, 5, 4]);

        let image = Image::<u8, 3>::from_fn(ImageSize { width: 3, height: 2 }, |x, y| {
            [x as u8, y as u8, 9]
        });
        let back = ImageMsg::from_rgb8(Header::default(), &image).to_rgb8()?;
        assert_eq!(back, image);
        Ok(())
    }

    #[test]
    fn padded_rows() -> Result<(), NodeError> {
        // two mono8 pixels per row padded to 4 bytes
        let labels = msg(encodings::MONO8, 2, 2, 4, vec![1, 2, 0, 0, 3, 4, 0, 0]);
        assert_eq!(labels.to_labels()?.as_slice(), &[1, 2, 3, 4]);
        Ok(())
    }

    #[test]
    fn depth_in_millimeters() -> Result<(), NodeError> {
        let mut data = Vec::new();
        for v in [0u16, 1500, 500, 2000] {
            data.extend(v.to_le_bytes());
        }
        let depth = msg(encodings::TYPE_16UC1, 2, 2, 4, data).to_depth()?;
        assert!(depth.as_slice()[0].is_nan());
        assert_eq!(&depth.as_slice()[1..], &[1.5, 0.5, 2.0]);
        Ok(())
    }

    #[test]
    fn depth_from_mono16_image() -> Result<(), NodeError> {
        let raw = Image::<u16, 1>::new(ImageSize { width: 2, height: 1 }, vec![250, 0])?;
        let depth = ImageMsg::from_mono16(Header::default(), &raw).to_depth()?;
        assert_eq!(depth.as_slice()[0], 0.25);
        assert!(depth.as_slice()[1].is_nan());
        Ok(())
    }

    #[test]
    fn depth_in_meters() -> Result<(), NodeError> {
        let mut data = Vec::new();
        for v in [0.75f32, 0.0] {
            data.extend(v.to_be_bytes());
        }
        let mut m = msg(encodings::TYPE_32FC1, 2, 1, 8, data);
        m.is_bigendian = true;
        let depth = m.to_depth()?;
        assert_eq!(depth.as_slice()[0], 0.75);
        assert!(depth.as_slice()[1].is_nan());
        Ok(())
    }

    #[test]
    fn labels_roundtrip() -> Result<(), NodeError> {
        let labels = Image::<i32, 1>::new(ImageSize { width: 2, height: 2 }, vec![-1, 0, 7, 3])?;
        let back = ImageMsg::from_labels(Header::default(), &labels).to_labels()?;
        assert_eq!(back, labels);
        Ok(())
    }

    #[test]
    fn malformed_messages() {
        let short = msg(encodings::RGB8, 2, 2, 6, vec![0; 11]);
        assert!(matches!(
            short.to_rgb8(),
            Err(NodeError::BufferTooShort {
                expected: 12,
                actual: 11
            })
        ));

        let wrong = msg(encodings::MONO8, 1, 1, 1, vec![0]);
        assert!(matches!(
            wrong.to_rgb8(),
            Err(NodeError::UnsupportedEncoding { .. })
        ));
        assert!(matches!(
            wrong.to_depth(),
            Err(NodeError::UnsupportedEncoding { .. })
        ));
    }
}
