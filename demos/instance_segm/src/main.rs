use argh::FromArgs;
use std::path::PathBuf;

use objpose::dnn::{onnx::OnnxInstanceSegmenter, InstanceSegmenter};
use objpose::imgproc::color::instances_to_rgb;
use objpose::io::{detections::save_detections, png};

#[derive(FromArgs)]
/// Segment object instances in an image and save the detections next to it
struct Args {
    /// path to an input RGB png image
    #[argh(option, short = 'i')]
    image_path: PathBuf,

    /// path to the ONNX instance segmentation model
    #[argh(option, short = 'm')]
    model_path: PathBuf,

    /// detections scoring lower are dropped
    #[argh(option, default = "0.0")]
    score_threshold: f32,

    /// number of inference threads
    #[argh(option, default = "4")]
    num_threads: usize,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    objpose::dnn::onnx::init_ort_from_env()?;

    let rgb = png::read_image_png_rgb8(&args.image_path)?;

    let segmenter =
        OnnxInstanceSegmenter::new(&args.model_path, args.score_threshold, args.num_threads)?;
    let detections = segmenter.segment(&rgb)?;
    log::info!("{} detections", detections.len());

    let out_dir = args
        .image_path
        .parent()
        .map(PathBuf::from)
        .unwrap_or_default();

    let detections_file = out_dir.join("detections.bin.gz");
    save_detections(&detections_file, &detections)?;
    log::info!("saved to {}", detections_file.display());

    // detection labels are foreground indices
    let class_ids = detections.labels.iter().map(|l| l + 1).collect::<Vec<_>>();
    let viz = instances_to_rgb(&rgb, &class_ids, &detections.masks, 2)?;

    let viz_file = out_dir.join("detections_viz.png");
    png::write_image_png_rgb8(&viz_file, &viz)?;
    log::info!("saved to {}", viz_file.display());

    Ok(())
}
