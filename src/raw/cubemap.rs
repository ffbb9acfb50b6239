//! Environment probe cubemaps.
//!
//! A probe captured at frame `f` stores six half-float RGBA faces under
//! `<root>/<f>/<probe-id>/envcubemap_<0..5>.raw`. Faces are gamma-decoded on
//! load and composed into a [`Cubemap`] with a full mip chain.

use std::ops::Range;
use std::path::Path;

use half::f16;

use super::format::{cubemap_face_file, CUBEMAP_FACES, CUBEMAP_GAMMA};
use super::reader::read_cubemap_face;
use crate::util::{Error, FaceImage, Result, Rgba16};

/// Six square faces (+X, -X, +Y, -Y, +Z, -Z), each with its mip chain.
#[derive(Clone, Debug, PartialEq)]
pub struct Cubemap {
    size: u32,
    faces: [Vec<FaceImage>; CUBEMAP_FACES],
}

impl Cubemap {
    /// Compose six base-level faces and generate their mip chains.
    pub fn from_faces(faces: [FaceImage; CUBEMAP_FACES]) -> Result<Self> {
        let size = faces[0].width();
        for (i, face) in faces.iter().enumerate() {
            if face.width() != face.height() {
                return Err(Error::InvalidCubemap(format!(
                    "face {} is {}x{}, expected square",
                    i,
                    face.width(),
                    face.height()
                )));
            }
            if face.width() != size {
                return Err(Error::InvalidCubemap(format!(
                    "face {} is {} wide, face 0 is {}",
                    i,
                    face.width(),
                    size
                )));
            }
        }

        let faces = faces.map(build_mip_chain);
        Ok(Self { size, faces })
    }

    /// Edge length of the base level.
    #[inline]
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Number of mip levels, base included.
    #[inline]
    pub fn mip_count(&self) -> usize {
        self.faces[0].len()
    }

    /// Face `face` at mip `level`.
    pub fn face(&self, face: usize, level: usize) -> Option<&FaceImage> {
        self.faces.get(face).and_then(|chain| chain.get(level))
    }
}

/// Number of mip levels for a base size (1x1 included).
#[inline]
pub fn mip_count_for(size: u32) -> usize {
    if size == 0 {
        1
    } else {
        (u32::BITS - size.leading_zeros()) as usize
    }
}

/// Apply `linear = raw^(1/2.2)` to every channel.
pub fn gamma_decode(face: &mut FaceImage) {
    let inv = 1.0 / CUBEMAP_GAMMA;
    for texel in face.pixels_mut() {
        for c in texel.iter_mut() {
            *c = f16::from_f32(c.to_f32().powf(inv));
        }
    }
}

/// Build levels `0..mip_count_for(size)` by 2x2 box filtering.
fn build_mip_chain(base: FaceImage) -> Vec<FaceImage> {
    let count = mip_count_for(base.width());
    let mut chain = Vec::with_capacity(count);
    chain.push(base);
    while chain.len() < count {
        let next = downsample(&chain[chain.len() - 1]);
        chain.push(next);
    }
    chain
}

/// Source range covered by destination texel `i` of `dst_len`.
///
/// The last texel of an odd-sized source also takes the trailing row or
/// column, so no source texel is dropped.
fn footprint(i: u32, src_len: u32, dst_len: u32) -> Range<u32> {
    let start = 2 * i;
    let end = if i + 1 == dst_len { src_len } else { start + 2 };
    start..end.clamp(start + 1, src_len.max(start + 1))
}

fn downsample(src: &FaceImage) -> FaceImage {
    let w = (src.width() / 2).max(1);
    let h = (src.height() / 2).max(1);
    let mut dst = FaceImage::new(w, h);

    for y in 0..h {
        let rows = footprint(y, src.height(), h);
        for x in 0..w {
            let cols = footprint(x, src.width(), w);
            let mut acc = [0.0f32; 4];
            let mut n = 0u32;
            for py in rows.clone() {
                for px in cols.clone() {
                    let texel = src.get(px, py).unwrap_or_default();
                    for (a, c) in acc.iter_mut().zip(texel) {
                        *a += c.to_f32();
                    }
                    n += 1;
                }
            }
            let scale = 1.0 / n.max(1) as f32;
            let texel: Rgba16 = acc.map(|a| f16::from_f32(a * scale));
            dst.set(x, y, texel);
        }
    }
    dst
}

/// Load and compose the cubemap of `probe_id` from a frame directory.
///
/// Returns `Ok(None)` when the frame directory or face 0 is missing, or
/// face 0 has no area.
pub fn load_probe_cubemap(frame_dir: &Path, probe_id: &str) -> Result<Option<Cubemap>> {
    if !frame_dir.is_dir() {
        return Ok(None);
    }
    let probe_dir = frame_dir.join(probe_id);

    let Some(first) = read_cubemap_face(probe_dir.join(cubemap_face_file(0)))? else {
        return Ok(None);
    };
    if first.is_empty() {
        return Ok(None);
    }

    let mut faces: Vec<FaceImage> = Vec::with_capacity(CUBEMAP_FACES);
    faces.push(first);
    for i in 1..CUBEMAP_FACES {
        let path = probe_dir.join(cubemap_face_file(i));
        match read_cubemap_face(&path)? {
            Some(face) => faces.push(face),
            None => return Err(Error::MissingCubemapFace { path, face: i }),
        }
    }

    for face in &mut faces {
        gamma_decode(face);
    }

    let faces: [FaceImage; CUBEMAP_FACES] = faces
        .try_into()
        .map_err(|_| Error::InvalidCubemap("expected six faces".into()))?;
    Cubemap::from_faces(faces).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raw::write_raw;
    use std::fs;

    fn face(size: u32, value: f32) -> FaceImage {
        let texel = [f16::from_f32(value); 4];
        FaceImage::from_pixels(size, size, vec![texel; (size * size) as usize]).unwrap()
    }

    #[test]
    fn test_mip_count() {
        assert_eq!(mip_count_for(1), 1);
        assert_eq!(mip_count_for(2), 2);
        assert_eq!(mip_count_for(16), 5);
        assert_eq!(mip_count_for(17), 5);
    }

    #[test]
    fn test_gamma_decode() {
        let mut f = face(1, 0.25);
        gamma_decode(&mut f);
        let v = f.get(0, 0).unwrap()[0].to_f32();
        assert!((v - 0.25f32.powf(1.0 / 2.2)).abs() < 1e-3);
    }

    #[test]
    fn test_mip_chain_averages() {
        let base = FaceImage::from_pixels(
            2,
            2,
            [0.0f32, 1.0, 2.0, 3.0]
                .iter()
                .map(|v| [f16::from_f32(*v); 4])
                .collect(),
        )
        .unwrap();
        let faces = std::array::from_fn(|_| base.clone());
        let cube = Cubemap::from_faces(faces).unwrap();
        assert_eq!(cube.size(), 2);
        assert_eq!(cube.mip_count(), 2);
        let top = cube.face(3, 1).unwrap();
        assert_eq!(top.size(), crate::util::UVec2::ONE);
        assert_eq!(top.get(0, 0).unwrap()[2].to_f32(), 1.5);
    }

    fn ramp(size: u32) -> FaceImage {
        let pixels = (0..size * size).map(|v| [f16::from_f32(v as f32); 4]).collect();
        FaceImage::from_pixels(size, size, pixels).unwrap()
    }

    fn texel(cube: &Cubemap, level: usize, x: u32, y: u32) -> f32 {
        cube.face(0, level).unwrap().get(x, y).unwrap()[0].to_f32()
    }

    #[test]
    fn test_odd_size_mips_keep_edges() {
        // 3x3 ramp 0..8: the single top texel averages all nine
        let cube = Cubemap::from_faces(std::array::from_fn(|_| ramp(3))).unwrap();
        assert_eq!(cube.mip_count(), 2);
        assert_eq!(texel(&cube, 1, 0, 0), 4.0);

        // 5x5 ramp: the last column and row fold into the second texel
        let cube = Cubemap::from_faces(std::array::from_fn(|_| ramp(5))).unwrap();
        assert_eq!(cube.mip_count(), 3);
        assert_eq!(cube.face(0, 1).unwrap().size(), crate::util::UVec2::new(2, 2));
        assert_eq!(texel(&cube, 1, 0, 0), 3.0);
        assert_eq!(texel(&cube, 1, 1, 0), 5.5);
        assert_eq!(texel(&cube, 1, 0, 1), 15.5);
        assert_eq!(texel(&cube, 1, 1, 1), 18.0);
        assert_eq!(texel(&cube, 2, 0, 0), 10.5);
    }

    #[test]
    fn test_zero_size_faces_have_no_texture() {
        let dir = tempfile::tempdir().unwrap();
        let probe_dir = dir.path().join("0").join("probe");
        fs::create_dir_all(&probe_dir).unwrap();
        for i in 0..6 {
            write_raw(probe_dir.join(cubemap_face_file(i)), &FaceImage::new(0, 0)).unwrap();
        }
        assert!(load_probe_cubemap(&dir.path().join("0"), "probe").unwrap().is_none());
    }

    #[test]
    fn test_rejects_mismatched_faces() {
        let mut faces: [FaceImage; 6] = std::array::from_fn(|_| face(4, 1.0));
        faces[5] = face(2, 1.0);
        assert!(matches!(Cubemap::from_faces(faces), Err(Error::InvalidCubemap(_))));

        let faces: [FaceImage; 6] = std::array::from_fn(|_| FaceImage::new(4, 2));
        assert!(Cubemap::from_faces(faces).is_err());
    }

    #[test]
    fn test_load_probe_cubemap() {
        let dir = tempfile::tempdir().unwrap();
        let frame_dir = dir.path().join("0");
        assert!(load_probe_cubemap(&frame_dir, "probe").unwrap().is_none());

        let probe_dir = frame_dir.join("probe");
        fs::create_dir_all(&probe_dir).unwrap();
        assert!(load_probe_cubemap(&frame_dir, "probe").unwrap().is_none());

        for i in 0..6 {
            write_raw(probe_dir.join(cubemap_face_file(i)), &face(4, 1.0)).unwrap();
        }
        let cube = load_probe_cubemap(&frame_dir, "probe").unwrap().unwrap();
        assert_eq!(cube.size(), 4);
        assert_eq!(cube.mip_count(), 3);
        assert_eq!(cube.face(0, 0).unwrap().get(1, 1).unwrap()[0].to_f32(), 1.0);
    }

    #[test]
    fn test_missing_later_face_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let probe_dir = dir.path().join("0").join("probe");
        fs::create_dir_all(&probe_dir).unwrap();
        for i in 0..3 {
            write_raw(probe_dir.join(cubemap_face_file(i)), &face(2, 0.5)).unwrap();
        }
        assert!(matches!(
            load_probe_cubemap(&dir.path().join("0"), "probe"),
            Err(Error::MissingCubemapFace { face: 3, .. })
        ));
    }
}
