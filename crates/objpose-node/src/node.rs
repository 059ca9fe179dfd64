use objpose_dnn::{Frame, PosePredictor, SingleViewPoseEstimator};
use objpose_imgproc::color::label_to_rgb;

use crate::{
    error::NodeError,
    lazy::{LazyTransport, LazyTransportState},
    marker::markers_from_poses,
    models::MeshResolver,
    msgs::{CameraInfo, ImageMsg},
    sink::MarkerSink,
    sync::{FrameSynchronizer, SyncedFrame, DEFAULT_QUEUE_SIZE},
};

/// Blend factor of the instance label visualization.
const LABEL_VIZ_ALPHA: f32 = 0.5;

/// Node estimating object poses on synchronized RGB-D frames with dense instance and
/// class labels.
///
/// The node consumes its inputs only while at least one downstream subscriber is
/// connected. Messages received while inactive are ignored.
pub struct SingleViewPoseNode<P: PosePredictor, R: MeshResolver, S: MarkerSink> {
    estimator: SingleViewPoseEstimator<P>,
    resolver: R,
    sink: S,
    state: LazyTransportState,
    sync: Option<FrameSynchronizer>,
    queue_size: usize,
}

impl<P: PosePredictor, R: MeshResolver, S: MarkerSink> SingleViewPoseNode<P, R, S> {
    /// Creates an inactive node.
    pub fn new(estimator: SingleViewPoseEstimator<P>, resolver: R, sink: S) -> Self {
        Self {
            estimator,
            resolver,
            sink,
            state: LazyTransportState::default(),
            sync: None,
            queue_size: DEFAULT_QUEUE_SIZE,
        }
    }

    /// Sets the number of incomplete frames kept by the synchronizer.
    pub fn with_queue_size(mut self, queue_size: usize) -> Self {
        self.queue_size = queue_size;
        self
    }

    /// The pose estimator.
    pub fn estimator(&self) -> &SingleViewPoseEstimator<P> {
        &self.estimator
    }

    /// The output sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Whether the node is consuming its inputs.
    pub fn is_active(&self) -> bool {
        self.sync.is_some()
    }

    /// Register a downstream subscriber, subscribing to the inputs on the first one.
    pub fn connect_subscriber(&mut self) -> Result<(), NodeError> {
        if self.state.connect() {
            self.subscribe()?;
        }
        Ok(())
    }

    /// Unregister a downstream subscriber, unsubscribing from the inputs after the last one.
    pub fn disconnect_subscriber(&mut self) -> Result<(), NodeError> {
        if self.state.disconnect() {
            self.unsubscribe()?;
        }
        Ok(())
    }

    /// Handle a camera calibration message.
    ///
    /// Returns the number of published poses when the message completed a frame.
    pub fn on_camera_info(&mut self, msg: CameraInfo) -> Result<Option<usize>, NodeError> {
        let frame = self.sync.as_mut().and_then(|s| s.add_camera_info(msg));
        self.process_synced(frame)
    }

    /// Handle a color image.
    pub fn on_rgb(&mut self, msg: ImageMsg) -> Result<Option<usize>, NodeError> {
        let frame = self.sync.as_mut().and_then(|s| s.add_rgb(msg));
        self.process_synced(frame)
    }

    /// Handle a depth image.
    pub fn on_depth(&mut self, msg: ImageMsg) -> Result<Option<usize>, NodeError> {
        let frame = self.sync.as_mut().and_then(|s| s.add_depth(msg));
        self.process_synced(frame)
    }

    /// Handle an instance label image.
    pub fn on_label_ins(&mut self, msg: ImageMsg) -> Result<Option<usize>, NodeError> {
        let frame = self.sync.as_mut().and_then(|s| s.add_label_ins(msg));
        self.process_synced(frame)
    }

    /// Handle a class label image.
    pub fn on_label_cls(&mut self, msg: ImageMsg) -> Result<Option<usize>, NodeError> {
        let frame = self.sync.as_mut().and_then(|s| s.add_label_cls(msg));
        self.process_synced(frame)
    }

    fn process_synced(&mut self, frame: Option<SyncedFrame>) -> Result<Option<usize>, NodeError> {
        frame.map(|f| self.process(&f)).transpose()
    }

    /// Estimate and publish the poses of one synchronized frame.
    ///
    /// The instance label visualization is always published. Markers are published only
    /// when at least one instance was estimated.
    ///
    /// # Returns
    ///
    /// The number of estimated poses.
    pub fn process(&mut self, frame: &SyncedFrame) -> Result<usize, NodeError> {
        let rgb = frame.rgb.to_rgb8()?;
        let depth = frame.depth.to_depth()?;
        let label_ins = frame.label_ins.to_labels()?;
        let label_cls = frame.label_cls.to_labels()?;

        let viz = label_to_rgb(&label_ins, &rgb, LABEL_VIZ_ALPHA)?;
        let viz_msg = ImageMsg::from_rgb8(frame.rgb.header.clone(), &viz);
        self.sink.publish_image(&viz_msg)?;

        let frame_data = Frame::new(rgb, depth, frame.camera_info.camera())?;
        let poses = self
            .estimator
            .process_frame(&frame_data, &label_ins, &label_cls)?;
        log::debug!("frame {}: {} poses", frame.rgb.header.seq, poses.len());
        if poses.is_empty() {
            return Ok(0);
        }

        let markers = markers_from_poses(&frame.rgb.header, &poses, &self.resolver)?;
        self.sink.publish_markers(&markers)?;
        Ok(poses.len())
    }
}

impl<P: PosePredictor, R: MeshResolver, S: MarkerSink> LazyTransport
    for SingleViewPoseNode<P, R, S>
{
    fn subscribe(&mut self) -> Result<(), NodeError> {
        log::info!("subscribing to input streams");
        self.sync = Some(FrameSynchronizer::new(self.queue_size));
        Ok(())
    }

    fn unsubscribe(&mut self) -> Result<(), NodeError> {
        log::info!("unsubscribing from input streams");
        self.sync = None;
        Ok(())
    }
}
