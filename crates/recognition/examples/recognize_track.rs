//! Example: Recognize signs from a recorded landmark track.
//!
//! Run with:
//!   cargo run -p signscribe-recognition --example recognize_track -- \
//!     track.json models/sign_language_model.onnx [labels.csv] [fps]
//!
//! Set OPENAI_API_KEY to turn multi-word results into a sentence.

use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use signscribe_classifier::label_candidates;
use signscribe_onnx::OnnxLoader;
use signscribe_pose::RecordedLandmarks;
use signscribe_recognition::{
    Capabilities, RecognizerConfig, SignRecognitionService, SignRecognizer,
};
use signscribe_sentence::{OpenAiSentenceGenerator, SentenceAssembler, SentenceConfig};
use signscribe_video::{MaterializedClip, DEFAULT_FPS};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,signscribe=debug")),
        )
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        eprintln!(
            "Usage: {} <track.json> <model.onnx> [labels.csv] [fps]",
            args[0]
        );
        std::process::exit(1);
    }

    let track = match RecordedLandmarks::load(&args[1]) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Failed to load landmark track: {}", e);
            std::process::exit(1);
        }
    };
    let labels = match args.get(3) {
        Some(path) => vec![PathBuf::from(path)],
        None => label_candidates(),
    };
    let fps = args
        .get(4)
        .and_then(|s| s.parse::<f64>().ok())
        .unwrap_or(DEFAULT_FPS);

    let frame_count = track.len() as u64;
    let capabilities = match Capabilities::load(
        Arc::new(track),
        &OnnxLoader,
        Some(Path::new(&args[2])),
        &labels,
    ) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}", e.user_message());
            eprintln!("  ({})", e);
            std::process::exit(1);
        }
    };

    let recognizer = match SignRecognizer::new(capabilities, RecognizerConfig::default()) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    let sentence_config = SentenceConfig::default();
    let timeout = sentence_config.timeout();
    let assembler = match OpenAiSentenceGenerator::from_env(sentence_config) {
        Ok(generator) => SentenceAssembler::new(Arc::new(generator)).with_timeout(timeout),
        Err(e) => {
            println!("Sentence generation disabled: {}", e);
            SentenceAssembler::offline()
        }
    };

    let service = SignRecognitionService::new(recognizer, assembler);
    let clip = MaterializedClip::placeholders(fps, frame_count);

    match service.process(clip).await {
        Ok(outcome) => {
            println!("\n=== {} ===", outcome.status.user_message());
            println!("{}", outcome.sentence);
            match serde_json::to_string_pretty(&outcome) {
                Ok(json) => println!("\n{}", json),
                Err(e) => eprintln!("Failed to serialize outcome: {}", e),
            }
        }
        Err(e) => {
            eprintln!("{}", e.user_message());
            eprintln!("  ({})", e);
            std::process::exit(1);
        }
    }
}
