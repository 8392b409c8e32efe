use std::path::PathBuf;
use std::process;
use std::time::Duration;

use clap::Parser;
use crossterm::event::{self, Event, KeyCode};
use image::RgbImage;
use nokhwa::pixel_format::RgbFormat;

use agelens_core::detection::infrastructure::onnx_attribute_classifier::OnnxAttributeClassifier;
use agelens_core::detection::infrastructure::onnx_face_localizer::OnnxFaceLocalizer;
use agelens_core::pipeline::analyze_frame_use_case::AnalyzeFrameUseCase;
use agelens_core::shared::frame::Frame;
use agelens_core::shared::model_resolver::{
    self, AGE_CLASSIFIER, FACE_DETECTOR, GENDER_CLASSIFIER,
};

mod overlay;
mod video;

/// Face detection with age and gender estimation, live or on still images.
#[derive(Parser)]
#[command(name = "agelens")]
struct Cli {
    /// Input image to annotate (runs the webcam loop when omitted).
    input: Option<PathBuf>,

    /// Output path for the annotated image (required with an input).
    output: Option<PathBuf>,

    /// Camera device index for the webcam loop.
    #[arg(long, default_value = "0")]
    camera: u32,

    /// Face detection confidence threshold (0.0-1.0).
    #[arg(long, default_value = "0.7")]
    confidence: f32,

    /// Downscale frames so neither side exceeds this before detection.
    #[arg(long)]
    max_dim: Option<u32>,

    /// Directory holding the three model files (defaults to ./models,
    /// falling back to the cache/download path).
    #[arg(long)]
    models_dir: Option<PathBuf>,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;

    let mut pipeline = build_pipeline(&cli)?;

    match (&cli.input, &cli.output) {
        (Some(input), Some(output)) => run_image(input, output, &mut pipeline, cli.max_dim),
        _ => run_webcam(cli.camera, &mut pipeline, cli.max_dim),
    }
}

fn run_image(
    input: &PathBuf,
    output: &PathBuf,
    pipeline: &mut AnalyzeFrameUseCase,
    max_dim: Option<u32>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut img = image::open(input)?.into_rgb8();
    let detections = analyze(pipeline, &img, max_dim)?;
    log::info!("Found {} face(s) in {}", detections.len(), input.display());

    let font = overlay::load_font();
    overlay::annotate(&mut img, &detections, font.as_ref());
    img.save(output)?;
    log::info!("Output written to {}", output.display());
    Ok(())
}

fn run_webcam(
    camera_index: u32,
    pipeline: &mut AnalyzeFrameUseCase,
    max_dim: Option<u32>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut camera = video::open_camera(camera_index)?;
    let resolution = camera.resolution();
    let mut display = video::DisplayStream::new(resolution.width(), resolution.height())?;
    let font = overlay::load_font();

    crossterm::terminal::enable_raw_mode()?;
    let result = webcam_loop(&mut camera, &mut display, pipeline, max_dim, font.as_ref());
    crossterm::terminal::disable_raw_mode()?;

    camera.stop_stream()?;
    display.close()?;
    result
}

fn webcam_loop(
    camera: &mut nokhwa::Camera,
    display: &mut video::DisplayStream,
    pipeline: &mut AnalyzeFrameUseCase,
    max_dim: Option<u32>,
    font: Option<&ab_glyph::FontVec>,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        let buffer = match camera.frame() {
            Ok(buffer) => buffer,
            Err(e) => {
                log::error!("Camera capture failed: {e}");
                break;
            }
        };
        let mut img: RgbImage = buffer.decode_image::<RgbFormat>()?;

        let detections = analyze(pipeline, &img, max_dim)?;
        overlay::annotate(&mut img, &detections, font);

        if let Err(e) = display.write_frame(&img) {
            log::error!("Display write failed: {e}");
            break;
        }

        if quit_requested()? {
            log::info!("Quit requested");
            break;
        }
    }
    Ok(())
}

fn analyze(
    pipeline: &mut AnalyzeFrameUseCase,
    img: &RgbImage,
    max_dim: Option<u32>,
) -> Result<Vec<agelens_core::detection::domain::face_detection::FaceDetection>, Box<dyn std::error::Error>>
{
    let frame = Frame::new(img.as_raw().clone(), img.width(), img.height(), 3);
    match max_dim {
        Some(dim) => pipeline.execute_bounded(&frame, dim),
        None => pipeline.execute(&frame),
    }
}

/// Non-blocking check for a `q` keypress.
fn quit_requested() -> Result<bool, Box<dyn std::error::Error>> {
    while event::poll(Duration::from_millis(1))? {
        if let Event::Key(key) = event::read()? {
            if key.code == KeyCode::Char('q') {
                return Ok(true);
            }
        }
    }
    Ok(false)
}

fn build_pipeline(cli: &Cli) -> Result<AnalyzeFrameUseCase, Box<dyn std::error::Error>> {
    let models_dir = cli
        .models_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from("models"));

    let mut paths = Vec::with_capacity(3);
    for spec in [&FACE_DETECTOR, &GENDER_CLASSIFIER, &AGE_CLASSIFIER] {
        log::info!("Resolving model: {}", spec.name);
        let path = model_resolver::resolve(spec, Some(&models_dir), Some(Box::new(download_progress)))?;
        paths.push(path);
    }
    eprintln!();

    let localizer = OnnxFaceLocalizer::with_threshold(&paths[0], cli.confidence)?;
    let classifier = OnnxAttributeClassifier::new(&paths[1], &paths[2])?;
    Ok(AnalyzeFrameUseCase::new(
        Box::new(localizer),
        Box::new(classifier),
    ))
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if cli.input.is_some() && cli.output.is_none() {
        return Err("Output path is required when an input image is given".into());
    }
    if let Some(input) = &cli.input {
        if !input.exists() {
            return Err(format!("Input file not found: {}", input.display()).into());
        }
    }
    if !(0.0..=1.0).contains(&cli.confidence) {
        return Err(format!(
            "Confidence must be between 0.0 and 1.0, got {}",
            cli.confidence
        )
        .into());
    }
    if let Some(dim) = cli.max_dim {
        if dim == 0 {
            return Err("--max-dim must be positive".into());
        }
    }
    Ok(())
}

fn download_progress(downloaded: u64, total: u64) {
    if total > 0 {
        let pct = (downloaded as f64 / total as f64 * 100.0) as u32;
        eprint!("\rDownloading model... {pct}%");
    } else {
        eprint!("\rDownloading model... {downloaded} bytes");
    }
}
