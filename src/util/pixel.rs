//! Pixel formats stored in capture buffers.

use byteorder::{ByteOrder, LittleEndian};
use bytemuck::Pod;
use half::f16;
use std::fmt;

/// Half-float RGBA texel, as stored in environment cubemap faces.
pub type Rgba16 = [f16; 4];

/// 8-bit RGBA texel, as produced by the video decoder.
pub type Rgba8 = [u8; 4];

/// Storage format of a capture buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// Single 32-bit float (depth, smoothed depth)
    R32Float,
    /// Single unsigned byte (depth confidence)
    R8Unorm,
    /// Four 16-bit floats (cubemap faces)
    Rgba16Float,
    /// Four unsigned bytes (video color)
    Rgba8Unorm,
}

impl PixelFormat {
    /// Size in bytes of one pixel.
    #[inline]
    pub const fn num_bytes(self) -> usize {
        match self {
            Self::R32Float => 4,
            Self::R8Unorm => 1,
            Self::Rgba16Float => 8,
            Self::Rgba8Unorm => 4,
        }
    }

    /// Returns the name of this format as a string.
    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            Self::R32Float => "r32float",
            Self::R8Unorm => "r8unorm",
            Self::Rgba16Float => "rgba16float",
            Self::Rgba8Unorm => "rgba8unorm",
        }
    }
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A pixel type that can be decoded from and encoded to little-endian bytes.
pub trait Pixel: Pod + Default + PartialEq + fmt::Debug + Send + Sync + 'static {
    /// On-disk and in-memory format.
    const FORMAT: PixelFormat;

    /// Decode `out.len()` pixels from `bytes` (exactly `out.len() * FORMAT.num_bytes()` long).
    fn decode_le(bytes: &[u8], out: &mut [Self]);

    /// Append the little-endian encoding of `pixels` to `out`.
    fn encode_le(pixels: &[Self], out: &mut Vec<u8>);
}

impl Pixel for f32 {
    const FORMAT: PixelFormat = PixelFormat::R32Float;

    fn decode_le(bytes: &[u8], out: &mut [Self]) {
        LittleEndian::read_f32_into(bytes, out);
    }

    fn encode_le(pixels: &[Self], out: &mut Vec<u8>) {
        let start = out.len();
        out.resize(start + pixels.len() * 4, 0);
        LittleEndian::write_f32_into(pixels, &mut out[start..]);
    }
}

impl Pixel for u8 {
    const FORMAT: PixelFormat = PixelFormat::R8Unorm;

    fn decode_le(bytes: &[u8], out: &mut [Self]) {
        out.copy_from_slice(bytes);
    }

    fn encode_le(pixels: &[Self], out: &mut Vec<u8>) {
        out.extend_from_slice(pixels);
    }
}

impl Pixel for Rgba16 {
    const FORMAT: PixelFormat = PixelFormat::Rgba16Float;

    fn decode_le(bytes: &[u8], out: &mut [Self]) {
        for (texel, chunk) in out.iter_mut().zip(bytes.chunks_exact(8)) {
            for (c, raw) in texel.iter_mut().zip(chunk.chunks_exact(2)) {
                *c = f16::from_bits(LittleEndian::read_u16(raw));
            }
        }
    }

    fn encode_le(pixels: &[Self], out: &mut Vec<u8>) {
        out.reserve(pixels.len() * 8);
        for texel in pixels {
            for c in texel {
                out.extend_from_slice(&c.to_bits().to_le_bytes());
            }
        }
    }
}

impl Pixel for Rgba8 {
    const FORMAT: PixelFormat = PixelFormat::Rgba8Unorm;

    fn decode_le(bytes: &[u8], out: &mut [Self]) {
        for (texel, chunk) in out.iter_mut().zip(bytes.chunks_exact(4)) {
            texel.copy_from_slice(chunk);
        }
    }

    fn encode_le(pixels: &[Self], out: &mut Vec<u8>) {
        out.extend_from_slice(bytemuck::cast_slice(pixels));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_sizes() {
        assert_eq!(<f32 as Pixel>::FORMAT.num_bytes(), 4);
        assert_eq!(<u8 as Pixel>::FORMAT.num_bytes(), 1);
        assert_eq!(<Rgba16 as Pixel>::FORMAT.num_bytes(), 8);
        assert_eq!(std::mem::size_of::<Rgba16>(), PixelFormat::Rgba16Float.num_bytes());
    }

    #[test]
    fn test_f32_decode() {
        let bytes = [0x00, 0x00, 0x80, 0x3F, 0x00, 0x00, 0x00, 0xC0];
        let mut out = [0.0f32; 2];
        f32::decode_le(&bytes, &mut out);
        assert_eq!(out, [1.0, -2.0]);
    }

    #[test]
    fn test_half_decode() {
        // 1.0 = 0x3C00, 0.5 = 0x3800, 2.0 = 0x4000, 0.0
        let bytes = [0x00, 0x3C, 0x00, 0x38, 0x00, 0x40, 0x00, 0x00];
        let mut out = [Rgba16::default(); 1];
        Rgba16::decode_le(&bytes, &mut out);
        assert_eq!(out[0].map(f16::to_f32), [1.0, 0.5, 2.0, 0.0]);
    }
}
