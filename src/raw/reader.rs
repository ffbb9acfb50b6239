//! Raw buffer reader and writer.
//!
//! Every per-frame binary file shares one layout: an 8-byte little-endian
//! `(width: i32, height: i32)` header followed by `width * height` pixels.
//! Decoded images stay in the sensor's native orientation.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use byteorder::{ByteOrder, LittleEndian};

use super::format::*;
use crate::util::{ConfidenceImage, DepthImage, Error, FaceImage, Image, Pixel, Result};

/// Read a raw image, returning `Ok(None)` if the file does not exist.
pub fn read_raw<T: Pixel>(path: impl AsRef<Path>) -> Result<Option<Image<T>>> {
    let path = path.as_ref();
    let bytes = match fs::read(path) {
        Ok(b) => b,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(Error::Io(e)),
    };
    decode_raw(&bytes, path).map(Some)
}

/// Decode a raw image from bytes; `path` is only used for error reporting.
pub fn decode_raw<T: Pixel>(bytes: &[u8], path: &Path) -> Result<Image<T>> {
    let (width, height) = parse_header(bytes, path)?;

    let count = width as usize * height as usize;
    let expected = count
        .checked_mul(T::FORMAT.num_bytes())
        .ok_or_else(|| Error::InvalidHeader {
            path: path.to_path_buf(),
            width: width as i32,
            height: height as i32,
        })?;
    let payload = &bytes[HEADER_SIZE..];
    if payload.len() < expected {
        return Err(Error::TruncatedPayload {
            path: path.to_path_buf(),
            expected,
            actual: payload.len(),
        });
    }

    let mut pixels = vec![T::default(); count];
    T::decode_le(&payload[..expected], &mut pixels);
    Image::from_pixels(width, height, pixels)
}

/// Parse and validate the raw header.
fn parse_header(bytes: &[u8], path: &Path) -> Result<(u32, u32)> {
    if bytes.len() < HEADER_SIZE {
        return Err(Error::TruncatedHeader {
            path: path.to_path_buf(),
            len: bytes.len(),
        });
    }

    let width = LittleEndian::read_i32(&bytes[WIDTH_OFFSET..]);
    let height = LittleEndian::read_i32(&bytes[HEIGHT_OFFSET..]);
    if width < 0 || height < 0 {
        return Err(Error::InvalidHeader {
            path: path.to_path_buf(),
            width,
            height,
        });
    }

    Ok((width as u32, height as u32))
}

/// Encode an image in the raw layout.
pub fn encode_raw<T: Pixel>(image: &Image<T>) -> Vec<u8> {
    let mut out = Vec::with_capacity(HEADER_SIZE + image.len() * T::FORMAT.num_bytes());
    out.extend_from_slice(&(image.width() as i32).to_le_bytes());
    out.extend_from_slice(&(image.height() as i32).to_le_bytes());
    T::encode_le(image.pixels(), &mut out);
    out
}

/// Write an image in the raw layout.
pub fn write_raw<T: Pixel>(path: impl AsRef<Path>, image: &Image<T>) -> Result<()> {
    fs::write(path, encode_raw(image))?;
    Ok(())
}

/// Read a depth or smoothed depth buffer (`f32` per pixel).
#[inline]
pub fn read_depth(path: impl AsRef<Path>) -> Result<Option<DepthImage>> {
    read_raw(path)
}

/// Read a confidence buffer (`u8` per pixel).
#[inline]
pub fn read_confidence(path: impl AsRef<Path>) -> Result<Option<ConfidenceImage>> {
    read_raw(path)
}

/// Read one cubemap face (four `f16` per pixel).
#[inline]
pub fn read_cubemap_face(path: impl AsRef<Path>) -> Result<Option<FaceImage>> {
    read_raw(path)
}
