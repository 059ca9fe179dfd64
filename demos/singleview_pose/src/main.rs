use argh::FromArgs;
use std::path::{Path, PathBuf};

use objpose::dnn::{onnx::OnnxPoseModelBuilder, EstimatorConfig, SingleViewPoseEstimator};
use objpose::image::Image;
use objpose::io::png;
use objpose::node::{
    models::YcbVideoModels,
    msgs::{CameraInfo, Header, ImageMsg, Time},
    sink::FileMarkerSink,
    SingleViewPoseNode,
};

#[derive(FromArgs)]
/// Replay recorded RGB-D frames through the single-view pose estimation node
struct Args {
    /// directory with one sub-directory per frame holding rgb.png, depth.png,
    /// label_ins.png, label_cls.png and camera_info.json
    #[argh(option, short = 'f')]
    frames_dir: PathBuf,

    /// path to the ONNX pose model, with its args file alongside
    #[argh(option, short = 'm')]
    model_path: PathBuf,

    /// root of the YCB-Video dataset holding the object models
    #[argh(option)]
    ycb_video_dir: PathBuf,

    /// output directory for markers and visualizations
    #[argh(option, short = 'o')]
    output_dir: PathBuf,

    /// number of inference threads
    #[argh(option, default = "4")]
    num_threads: usize,
}

/// One message of a recorded frame.
enum Message {
    Info(CameraInfo),
    Rgb(ImageMsg),
    Depth(ImageMsg),
    LabelIns(ImageMsg),
    LabelCls(ImageMsg),
}

fn read_frame(dir: &Path, seq: u32) -> Result<[Message; 5], Box<dyn std::error::Error>> {
    let mut camera_info: CameraInfo =
        serde_json::from_reader(std::fs::File::open(dir.join("camera_info.json"))?)?;
    let header = Header {
        seq,
        stamp: Time::new(seq as i32, 0),
        frame_id: camera_info.header.frame_id.clone(),
    };
    camera_info.header = header.clone();

    let rgb = png::read_image_png_rgb8(dir.join("rgb.png"))?;
    let depth = png::read_image_png_mono16(dir.join("depth.png"))?;

    // instance ids are stored shifted by one, zero is background
    let label_ins = png::read_image_png_mono16(dir.join("label_ins.png"))?;
    let label_ins = Image::<i32, 1>::new(
        label_ins.size(),
        label_ins.as_slice().iter().map(|&v| v as i32 - 1).collect(),
    )?;
    let label_cls = png::read_image_png_mono8(dir.join("label_cls.png"))?;
    let label_cls = Image::<i32, 1>::new(
        label_cls.size(),
        label_cls.as_slice().iter().map(|&v| v as i32).collect(),
    )?;

    Ok([
        Message::Info(camera_info),
        Message::Rgb(ImageMsg::from_rgb8(header.clone(), &rgb)),
        Message::Depth(ImageMsg::from_mono16(header.clone(), &depth)),
        Message::LabelIns(ImageMsg::from_labels(header.clone(), &label_ins)),
        Message::LabelCls(ImageMsg::from_labels(header, &label_cls)),
    ])
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    objpose::dnn::onnx::init_ort_from_env()?;

    let model = OnnxPoseModelBuilder::new(args.model_path)
        .with_num_threads(args.num_threads)
        .build()?;
    let estimator = SingleViewPoseEstimator::new(model, EstimatorConfig::default());

    let mut node = SingleViewPoseNode::new(
        estimator,
        YcbVideoModels::new(&args.ycb_video_dir),
        FileMarkerSink::new(&args.output_dir)?,
    );

    // the file sink is the only downstream subscriber
    node.connect_subscriber()?;

    let mut frame_dirs = std::fs::read_dir(&args.frames_dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()?;
    frame_dirs.retain(|p| p.is_dir());
    frame_dirs.sort();

    for (seq, dir) in frame_dirs.iter().enumerate() {
        let now = std::time::Instant::now();

        let mut num_poses = None;
        for msg in read_frame(dir, seq as u32)? {
            let published = match msg {
                Message::Info(m) => node.on_camera_info(m)?,
                Message::Rgb(m) => node.on_rgb(m)?,
                Message::Depth(m) => node.on_depth(m)?,
                Message::LabelIns(m) => node.on_label_ins(m)?,
                Message::LabelCls(m) => node.on_label_cls(m)?,
            };
            num_poses = num_poses.or(published);
        }

        match num_poses {
            Some(n) => log::info!("{}: {} poses in {:?}", dir.display(), n, now.elapsed()),
            None => log::warn!("{}: incomplete frame", dir.display()),
        }
    }

    node.disconnect_subscriber()?;

    Ok(())
}
