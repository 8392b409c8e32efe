use std::path::PathBuf;
use std::process;

use actix_web::{web, App, HttpServer};
use clap::Parser;

use agelens_core::detection::infrastructure::onnx_attribute_classifier::OnnxAttributeClassifier;
use agelens_core::detection::infrastructure::onnx_face_localizer::OnnxFaceLocalizer;
use agelens_core::pipeline::analyze_frame_use_case::AnalyzeFrameUseCase;
use agelens_core::shared::model_resolver::{
    self, AGE_CLASSIFIER, FACE_DETECTOR, GENDER_CLASSIFIER,
};

mod routes;
mod state;

use state::AppState;

/// HTTP API for face detection with age and gender estimation.
#[derive(Parser)]
#[command(name = "agelens-server")]
struct Cli {
    /// Address to bind.
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on.
    #[arg(long, default_value = "8000")]
    port: u16,

    /// Directory holding the three model files (defaults to ./models,
    /// falling back to the cache/download path).
    #[arg(long)]
    models_dir: Option<PathBuf>,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    // Networks load once here and live for the process lifetime.
    let pipeline = match build_pipeline(&cli) {
        Ok(pipeline) => pipeline,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };
    let state = web::Data::new(AppState::new(pipeline));

    log::info!("Listening on {}:{}", cli.host, cli.port);
    HttpServer::new(move || {
        App::new().app_data(state.clone()).service(routes::index).service(
            web::scope("/api")
                .service(routes::detect)
                .service(routes::history)
                .default_service(web::route().to(routes::invalid_method)),
        )
    })
    .bind((cli.host.as_str(), cli.port))?
    .run()
    .await
}

fn build_pipeline(cli: &Cli) -> Result<AnalyzeFrameUseCase, Box<dyn std::error::Error>> {
    let models_dir = cli
        .models_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from("models"));

    let mut paths = Vec::with_capacity(3);
    for spec in [&FACE_DETECTOR, &GENDER_CLASSIFIER, &AGE_CLASSIFIER] {
        log::info!("Resolving model: {}", spec.name);
        let path =
            model_resolver::resolve(spec, Some(&models_dir), Some(Box::new(download_progress)))?;
        paths.push(path);
    }
    eprintln!();

    let localizer = OnnxFaceLocalizer::new(&paths[0])?;
    let classifier = OnnxAttributeClassifier::new(&paths[1], &paths[2])?;
    Ok(AnalyzeFrameUseCase::new(
        Box::new(localizer),
        Box::new(classifier),
    ))
}

fn download_progress(downloaded: u64, total: u64) {
    if total > 0 {
        let pct = (downloaded as f64 / total as f64 * 100.0) as u32;
        eprint!("\rDownloading model... {pct}%");
    } else {
        eprint!("\rDownloading model... {downloaded} bytes");
    }
}
