//! Estimate the skin tone of the most prominent face in a photo.
//!
//! Usage:
//!   cargo run --example analyze_photo --features rustface -- <model.bin> <photo> [config.json]
//!
//! Set `RUST_LOG=skintone=trace` to see the sampled cheek windows.

use anyhow::{bail, Context, Result};
use skintone::{RustfaceDetector, SkinToneAnalyzer, SkinToneConfig};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (model, photo, config) = match args.as_slice() {
        [model, photo] => (model, photo, None),
        [model, photo, config] => (model, photo, Some(config)),
        _ => bail!("usage: analyze_photo <model.bin> <photo> [config.json]"),
    };

    let config = match config {
        Some(path) => {
            let json = std::fs::read_to_string(path).with_context(|| format!("reading {path}"))?;
            SkinToneConfig::from_json_str(&json)?
        }
        None => SkinToneConfig::default(),
    };

    let detector = RustfaceDetector::from_path(model)?;
    let input = std::fs::read(photo).with_context(|| format!("reading {photo}"))?;

    let analysis = SkinToneAnalyzer::new(input)?
        .config(config)
        .face_detector(Box::new(detector))
        .analyze()?;

    println!("{}", serde_json::to_string_pretty(&analysis)?);
    Ok(())
}
