//! Image encoding: `DynamicImage` ⇄ PNG/JPEG bytes.
//!
//! Used in two places: the renderer round-trips each page through the
//! requested format so the in-memory buffer matches what a save would
//! produce, and export encodes the stored buffer into the bytes written to
//! disk. PNG is lossless; JPEG uses the encoder's default quality and has
//! no alpha channel, so RGBA input is flattened to RGB first.

use crate::config::OutputFormat;
use image::DynamicImage;
use std::io::Cursor;
use tracing::debug;

/// Encode a rendered page into the chosen format.
pub fn encode_image(
    image: &DynamicImage,
    format: OutputFormat,
) -> Result<Vec<u8>, image::ImageError> {
    let mut buf = Vec::new();
    match format {
        OutputFormat::Png => {
            image.write_to(&mut Cursor::new(&mut buf), format.image_format())?;
        }
        OutputFormat::Jpeg => {
            let rgb = DynamicImage::ImageRgb8(image.to_rgb8());
            rgb.write_to(&mut Cursor::new(&mut buf), format.image_format())?;
        }
    }
    debug!("Encoded image → {} bytes {}", buf.len(), format.name());
    Ok(buf)
}

/// Decode previously encoded bytes back into a pixel buffer.
pub fn decode_image(bytes: &[u8]) -> Result<DynamicImage, image::ImageError> {
    image::load_from_memory(bytes)
}
