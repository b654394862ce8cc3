//! Binary PGM (P5) codec for occupancy-grid maps.
//!
//! Decoding and encoding go through the `image` crate's PNM codec. The magic
//! number is checked up front so that ASCII (`P2`) and other PNM variants are
//! rejected, and only 8-bit rasters (`maxval <= 255`) are accepted.

use std::fs;
use std::io::Cursor;
use std::path::Path;

use image::codecs::pnm::{PnmDecoder, PnmEncoder, PnmSubtype, SampleEncoding};
use image::{ColorType, ExtendedColorType, GrayImage, ImageDecoder, ImageEncoder, ImageError};
use tracing::debug;
use wayedit_core::{Error, MapError, Result};

const MAGIC: &[u8] = b"P5";

fn decode_error(err: ImageError) -> Error {
    MapError::Decode(err.to_string()).into()
}

/// First header token, for error reporting.
fn leading_token(bytes: &[u8]) -> String {
    let token: Vec<u8> = bytes
        .iter()
        .take_while(|b| !b.is_ascii_whitespace())
        .take(16)
        .copied()
        .collect();
    String::from_utf8_lossy(&token).into_owned()
}

/// Decodes a P5 raster from bytes.
pub fn decode_pgm(bytes: &[u8]) -> Result<GrayImage> {
    if !bytes.starts_with(MAGIC) {
        return Err(MapError::InvalidMagic {
            found: leading_token(bytes),
        }
        .into());
    }

    let decoder = PnmDecoder::new(Cursor::new(bytes)).map_err(decode_error)?;
    let color = decoder.color_type();
    if color != ColorType::L8 {
        return Err(MapError::UnsupportedColorType(format!("{:?}", color)).into());
    }

    let (width, height) = decoder.dimensions();
    let mut data = vec![0u8; decoder.total_bytes() as usize];
    decoder.read_image(&mut data).map_err(decode_error)?;

    debug!("Decoded PGM {}x{}", width, height);
    GrayImage::from_raw(width, height, data)
        .ok_or_else(|| Error::other("PGM buffer size mismatch"))
}

pub fn load_pgm(path: impl AsRef<Path>) -> Result<GrayImage> {
    let bytes = fs::read(path)?;
    decode_pgm(&bytes)
}

/// Encodes a raster as binary P5 with maxval 255.
pub fn encode_pgm(image: &GrayImage) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(image.as_raw().len() + 32);
    PnmEncoder::new(&mut out)
        .with_subtype(PnmSubtype::Graymap(SampleEncoding::Binary))
        .write_image(
            image.as_raw(),
            image.width(),
            image.height(),
            ExtendedColorType::L8,
        )
        .map_err(|e| MapError::Encode(e.to_string()))?;
    Ok(out)
}

pub fn save_pgm(path: impl AsRef<Path>, image: &GrayImage) -> Result<()> {
    fs::write(path, encode_pgm(image)?)?;
    Ok(())
}
