//! Orientation transform pipeline.
//!
//! Raw buffers are recorded in the native sensor orientation
//! (`LandscapeRight`). To present a frame the way the device displayed it,
//! each buffer goes through:
//!
//! - `LandscapeRight` - identity, the source buffer itself is returned
//! - `LandscapeLeft` / `Portrait` / `PortraitUpsideDown` - a [`Kernel`]
//!   dispatched over a work-group grid into a pre-sized destination
//! - `Unknown` - no output
//!
//! Kernels run on a [`TransformBackend`]: [`CpuBackend`] is the reference,
//! [`ParallelBackend`] spreads destination rows over rayon. Both produce the
//! same bytes.

mod buffers;
mod cpu;
mod kernel;
mod parallel;

pub use buffers::*;
pub use cpu::*;
pub use kernel::*;
pub use parallel::*;

use crate::core::Orientation;
use crate::util::{Image, Pixel, UVec2};

/// Executes an orientation kernel over a dispatch grid.
pub trait TransformBackend {
    /// Short backend name for logs.
    fn name(&self) -> &'static str;

    /// Run `kernel` over `grid`, reading `src` and writing `dst`.
    ///
    /// `dst` must already be `kernel.output_size(src.size())`.
    fn dispatch<T: Pixel>(&self, kernel: Kernel, grid: &Dispatch, src: &Image<T>, dst: &mut Image<T>);
}

/// Backend selected at runtime.
#[derive(Clone, Copy, Debug)]
pub enum Backend {
    Cpu(CpuBackend),
    Parallel(ParallelBackend),
}

impl Backend {
    /// `ParallelBackend` if `parallel`, else `CpuBackend`.
    pub fn select(parallel: bool) -> Self {
        if parallel {
            Self::Parallel(ParallelBackend)
        } else {
            Self::Cpu(CpuBackend)
        }
    }
}

impl Default for Backend {
    fn default() -> Self {
        Self::Cpu(CpuBackend)
    }
}

impl TransformBackend for Backend {
    fn name(&self) -> &'static str {
        match self {
            Self::Cpu(b) => b.name(),
            Self::Parallel(b) => b.name(),
        }
    }

    fn dispatch<T: Pixel>(&self, kernel: Kernel, grid: &Dispatch, src: &Image<T>, dst: &mut Image<T>) {
        match self {
            Self::Cpu(b) => b.dispatch(kernel, grid, src, dst),
            Self::Parallel(b) => b.dispatch(kernel, grid, src, dst),
        }
    }
}

/// Reorients native buffers with a fixed backend and work-group size.
#[derive(Clone, Copy, Debug)]
pub struct Pipeline<B: TransformBackend = Backend> {
    backend: B,
    group_size: UVec2,
}

impl<B: TransformBackend> Pipeline<B> {
    pub fn new(backend: B, group_size: UVec2) -> Self {
        Self { backend, group_size }
    }

    #[inline]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    #[inline]
    pub fn group_size(&self) -> UVec2 {
        self.group_size
    }

    /// Image of `src` in `orientation`.
    ///
    /// Returns `src` itself for the native orientation, `None` for Unknown,
    /// and otherwise the matching slot of `buffers` after running the kernel.
    pub fn reorient<'a, T: Pixel>(
        &self,
        src: &'a Image<T>,
        orientation: Orientation,
        buffers: &'a mut OrientedBuffer<T>,
    ) -> Option<&'a Image<T>> {
        if orientation.is_native() {
            return Some(src);
        }
        let kernel = Kernel::for_orientation(orientation)?;
        let dst = buffers.slot_mut(orientation);
        self.reorient_into(kernel, src, dst);
        Some(&*dst)
    }

    /// Run `kernel` from `src` into `dst`, resizing `dst` if needed.
    pub fn reorient_into<T: Pixel>(&self, kernel: Kernel, src: &Image<T>, dst: &mut Image<T>) {
        let out = kernel.output_size(src.size());
        dst.ensure_size(out.x, out.y);
        let grid = Dispatch::new(src.size(), self.group_size);
        self.backend.dispatch(kernel, &grid, src, dst);
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(Backend::default(), DEFAULT_GROUP_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::{DepthImage, Intrinsics};

    fn cpu() -> Pipeline<CpuBackend> {
        Pipeline::new(CpuBackend, DEFAULT_GROUP_SIZE)
    }

    /// Image whose pixel value encodes its native coordinates.
    fn coords(w: u32, h: u32) -> DepthImage {
        let pixels = (0..h).flat_map(|y| (0..w).map(move |x| (y * 100 + x) as f32)).collect();
        DepthImage::from_pixels(w, h, pixels).unwrap()
    }

    #[test]
    fn test_landscape_right_is_identity() {
        let src = coords(4, 2);
        let mut buffers = OrientedBuffer::default();
        let out = cpu()
            .reorient(&src, Orientation::LandscapeRight, &mut buffers)
            .unwrap();
        assert!(std::ptr::eq(out, &src));
    }

    #[test]
    fn test_unknown_has_no_output() {
        let src = coords(4, 2);
        let mut buffers = OrientedBuffer::default();
        assert!(cpu()
            .reorient(&src, Orientation::Unknown, &mut buffers)
            .is_none());
    }

    #[test]
    fn test_portrait_swaps_size() {
        let src = coords(4, 2);
        let mut buffers = OrientedBuffer::with_native_size(src.size());
        let out = cpu()
            .reorient(&src, Orientation::Portrait, &mut buffers)
            .unwrap();
        assert_eq!((out.width(), out.height()), (2, 4));
        // (x, y) -> (y, x)
        assert_eq!(out.get(1, 3), Some(103.0));
        assert_eq!(out.get(0, 2), Some(2.0));
    }

    #[test]
    fn test_landscape_left_rotates() {
        let src = coords(4, 2);
        let mut buffers = OrientedBuffer::default();
        let out = cpu()
            .reorient(&src, Orientation::LandscapeLeft, &mut buffers)
            .unwrap();
        assert_eq!(out.size(), src.size());
        assert_eq!(out.get(0, 0), Some(103.0));
        assert_eq!(out.get(3, 1), Some(0.0));
    }

    #[test]
    fn test_backends_bit_identical() {
        let src = coords(19, 11);
        for orientation in [Orientation::LandscapeLeft, Orientation::Portrait, Orientation::PortraitUpsideDown] {
            for group in [UVec2::new(8, 8), UVec2::new(3, 5), UVec2::ONE] {
                let mut a = OrientedBuffer::default();
                let mut b = OrientedBuffer::default();
                let cpu = Pipeline::new(CpuBackend, group);
                let par = Pipeline::new(ParallelBackend, group);
                let ca = cpu.reorient(&src, orientation, &mut a).unwrap();
                let pb = par.reorient(&src, orientation, &mut b).unwrap();
                assert_eq!(ca.as_bytes(), pb.as_bytes(), "{} {:?}", orientation, group);
            }
        }
    }

    #[test]
    fn test_principal_point_follows_intrinsics() {
        // Mark the pixel under the native principal point, reorient, and check
        // it lands under the remapped principal point.
        let size = UVec2::new(8, 6);
        let (cx, cy) = (2u32, 1u32);
        let mut src = DepthImage::new(size.x, size.y);
        src.set(cx, cy, 1.0);
        // pixel centers: principal point at (cx + 0.5, cy + 0.5)
        let k = Intrinsics::new(10.0, 10.0, cx as f32 + 0.5, cy as f32 + 0.5);

        for orientation in [Orientation::LandscapeLeft, Orientation::Portrait, Orientation::PortraitUpsideDown] {
            let mut buffers = OrientedBuffer::default();
            let out = cpu().reorient(&src, orientation, &mut buffers).unwrap();
            let r = orientation.remap_intrinsics(k, size);
            let (px, py) = ((r.cx - 0.5) as u32, (r.cy - 0.5) as u32);
            assert_eq!(out.get(px, py), Some(1.0), "{}", orientation);
        }
    }
}
