// src/lib.rs

pub mod aligner;
pub mod asc_models;
pub mod config;
pub mod converter;
pub mod detection_models;
pub mod detector;
pub mod error;
pub mod parser;
pub mod placer;
pub mod wires;
pub mod writer;

use crate::asc_models::Schematic;
use crate::config::ReconstructConfig;
use crate::error::{Error, Result};
use log::{debug, info};
use std::io::Write;
use std::path::Path;

/// Parses uploaded ASC bytes.
///
/// The bytes are staged in a scratch file that is removed when this returns,
/// whether parsing succeeded or not.
pub fn parse_asc_bytes(content: &[u8]) -> Result<Schematic> {
    let mut scratch = tempfile::Builder::new().suffix(".asc").tempfile()?;
    scratch.write_all(content)?;
    scratch.flush()?;
    debug!("Staged {} bytes at {:?}", content.len(), scratch.path());

    parser::parse_asc_file(scratch.path())
}

/// Converts an ASC file into `<stem>.json` and a normalized `<stem>.asc`
/// inside `output_dir`.
pub async fn convert_asc_file(input: &Path, output_dir: &Path) -> Result<Schematic> {
    info!("Converting ASC file {:?}", input);
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| Error::MissingData(format!("No file name in {:?}", input)))?;

    let content = tokio::fs::read(input).await?;
    let schematic = parse_asc_bytes(&content)?;

    let output = writer::AscOutput {
        path: output_dir.to_path_buf(),
    };
    output.setup_directories()?;
    output.write_json(stem, &schematic)?;
    output.write_asc(stem, &schematic)?;

    info!(
        "Converted {:?}: {} components, {} wires, {} flags",
        input,
        schematic.components.len(),
        schematic.wires.len(),
        schematic.flags.len()
    );
    Ok(schematic)
}

/// Sends an image to the detector and reconstructs the schematic it shows.
pub async fn recognize_image(
    image: bytes::Bytes,
    detector: &detector::DetectorApi,
    config: &ReconstructConfig,
) -> Result<Schematic> {
    info!("Requesting detections from {}", detector.endpoint());
    let detections = detector.detect(image).await?;
    converter::reconstruct(&detections, config)
}
