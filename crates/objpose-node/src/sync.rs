use std::collections::BTreeMap;

use crate::msgs::{CameraInfo, ImageMsg, Time};

/// Default number of incomplete stamps kept while waiting for the other streams.
pub const DEFAULT_QUEUE_SIZE: usize = 100;

/// The five messages of one frame, all carrying the same stamp.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncedFrame {
    /// Camera calibration.
    pub camera_info: CameraInfo,
    /// Color image.
    pub rgb: ImageMsg,
    /// Depth image.
    pub depth: ImageMsg,
    /// Dense instance ids.
    pub label_ins: ImageMsg,
    /// Dense class ids.
    pub label_cls: ImageMsg,
}

#[derive(Debug, Default)]
struct Pending {
    camera_info: Option<CameraInfo>,
    rgb: Option<ImageMsg>,
    depth: Option<ImageMsg>,
    label_ins: Option<ImageMsg>,
    label_cls: Option<ImageMsg>,
}

impl Pending {
    fn take_complete(&mut self) -> Option<SyncedFrame> {
        if self.camera_info.is_none()
            || self.rgb.is_none()
            || self.depth.is_none()
            || self.label_ins.is_none()
            || self.label_cls.is_none()
        {
            return None;
        }
        Some(SyncedFrame {
            camera_info: self.camera_info.take()?,
            rgb: self.rgb.take()?,
            depth: self.depth.take()?,
            label_ins: self.label_ins.take()?,
            label_cls: self.label_cls.take()?,
        })
    }
}

/// Groups messages of five streams by exact stamp.
///
/// A frame is emitted as soon as all five messages of a stamp arrived. Emitting a frame
/// discards every pending stamp older than it. When more than `queue_size` stamps are
/// pending the oldest one is dropped.
///
/// ```
/// use objpose_node::msgs::{CameraInfo, Header, ImageMsg, Time};
/// use objpose_node::sync::FrameSynchronizer;
///
/// let mut sync = FrameSynchronizer::new(10);
/// let header = Header { seq: 0, stamp: Time::new(1, 0), frame_id: "camera".into() };
/// let image = ImageMsg { header: header.clone(), ..Default::default() };
///
/// assert!(sync.add_rgb(image.clone()).is_none());
/// assert!(sync.add_depth(image.clone()).is_none());
/// assert!(sync.add_label_ins(image.clone()).is_none());
/// assert!(sync.add_label_cls(image).is_none());
/// let info = CameraInfo { header, ..Default::default() };
/// assert!(sync.add_camera_info(info).is_some());
/// ```
#[derive(Debug)]
pub struct FrameSynchronizer {
    queue_size: usize,
    pending: BTreeMap<Time, Pending>,
}

impl Default for FrameSynchronizer {
    fn default() -> Self {
        Self::new(DEFAULT_QUEUE_SIZE)
    }
}

impl FrameSynchronizer {
    /// Creates a synchronizer keeping at most `queue_size` pending stamps.
    pub fn new(queue_size: usize) -> Self {
        Self {
            queue_size: queue_size.max(1),
            pending: BTreeMap::new(),
        }
    }

    /// Number of stamps still waiting for messages.
    pub fn num_pending(&self) -> usize {
        self.pending.len()
    }

    /// Add a camera calibration message.
    pub fn add_camera_info(&mut self, msg: CameraInfo) -> Option<SyncedFrame> {
        let stamp = msg.header.stamp;
        self.insert(stamp, |p| p.camera_info = Some(msg))
    }

    /// Add a color image.
    pub fn add_rgb(&mut self, msg: ImageMsg) -> Option<SyncedFrame> {
        let stamp = msg.header.stamp;
        self.insert(stamp, |p| p.rgb = Some(msg))
    }

    /// Add a depth image.
    pub fn add_depth(&mut self, msg: ImageMsg) -> Option<SyncedFrame> {
        let stamp = msg.header.stamp;
        self.insert(stamp, |p| p.depth = Some(msg))
    }

    /// Add an instance label image.
    pub fn add_label_ins(&mut self, msg: ImageMsg) -> Option<SyncedFrame> {
        let stamp = msg.header.stamp;
        self.insert(stamp, |p| p.label_ins = Some(msg))
    }

    /// Add a class label image.
    pub fn add_label_cls(&mut self, msg: ImageMsg) -> Option<SyncedFrame> {
        let stamp = msg.header.stamp;
        self.insert(stamp, |p| p.label_cls = Some(msg))
    }

    fn insert(&mut self, stamp: Time, set: impl FnOnce(&mut Pending)) -> Option<SyncedFrame> {
        set(self.pending.entry(stamp).or_default());

        let frame = self.pending.get_mut(&stamp).and_then(Pending::take_complete);
        if frame.is_some() {
            // everything up to and including the emitted stamp is done
            self.pending = self.pending.split_off(&stamp);
            self.pending.remove(&stamp);
            return frame;
        }

        while self.pending.len() > self.queue_size {
            if let Some((dropped, _)) = self.pending.pop_first() {
                log::warn!(
                    "dropping incomplete frame at {}.{:09}",
                    dropped.sec,
                    dropped.nanosec
                );
            }
        }
        None
    }
}
