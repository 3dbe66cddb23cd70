// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Frame image loading.
//!
//! This module decodes frame images (from disk or from the backend's frame
//! capture) into RGBA pixels suitable for display in egui.

use anyhow::{Context, Result};
use image::ImageFormat;
use std::path::Path;

/// A decoded frame image.
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    /// RGBA8, row-major
    pub pixels: Vec<u8>,
}

impl DecodedImage {
    pub fn size(&self) -> [usize; 2] {
        [self.width as usize, self.height as usize]
    }
}

/// Load an image file, returning the raw bytes and the decoded image.
///
/// The bytes are kept so the frame can be uploaded when saved.
pub fn load_image(path: &Path) -> Result<(Vec<u8>, DecodedImage)> {
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let decoded = decode_image(&bytes).with_context(|| format!("decoding {}", path.display()))?;
    log::info!(
        "Loaded image {} ({}x{})",
        path.display(),
        decoded.width,
        decoded.height
    );
    Ok((bytes, decoded))
}

/// Decode encoded image bytes into RGBA pixels.
pub fn decode_image(bytes: &[u8]) -> Result<DecodedImage> {
    let img = image::load_from_memory(bytes).context("unsupported or corrupt image")?;
    let rgba = img.to_rgba8();
    Ok(DecodedImage {
        width: rgba.width(),
        height: rgba.height(),
        pixels: rgba.into_raw(),
    })
}

/// MIME type and file extension of encoded image bytes, defaulting to PNG.
pub fn image_kind(bytes: &[u8]) -> (&'static str, &'static str) {
    match image::guess_format(bytes) {
        Ok(ImageFormat::Jpeg) => ("image/jpeg", "jpg"),
        Ok(ImageFormat::WebP) => ("image/webp", "webp"),
        Ok(ImageFormat::Bmp) => ("image/bmp", "bmp"),
        _ => ("image/png", "png"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn png(pixels: &[u8], width: u32, height: u32) -> Vec<u8> {
        let buffer = image::RgbaImage::from_raw(width, height, pixels.to_vec()).unwrap();
        let mut out = Cursor::new(Vec::new());
        buffer.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn test_png_decodes_to_rgba() {
        let pixels = [255, 0, 0, 255, 0, 255, 0, 255];
        let png = png(&pixels, 2, 1);

        let decoded = decode_image(&png).unwrap();
        assert_eq!(decoded.size(), [2, 1]);
        assert_eq!(decoded.pixels, pixels);
        assert_eq!(image_kind(&png), ("image/png", "png"));
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert!(decode_image(b"definitely not an image").is_err());
        assert_eq!(image_kind(b"??"), ("image/png", "png"));
    }

    #[test]
    fn test_load_missing_file() {
        let path = std::env::temp_dir().join("framemeasure-no-such-image.png");
        assert!(load_image(&path).is_err());
    }
}
