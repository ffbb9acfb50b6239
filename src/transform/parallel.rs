//! Rayon backend: destination rows are gathered concurrently.

use rayon::prelude::*;

use super::{Dispatch, Kernel, TransformBackend};
use crate::util::{Image, Pixel};

/// Multi-threaded backend; output is bit-identical to [`CpuBackend`](super::CpuBackend).
#[derive(Clone, Copy, Debug, Default)]
pub struct ParallelBackend;

impl TransformBackend for ParallelBackend {
    fn name(&self) -> &'static str {
        "parallel"
    }

    fn dispatch<T: Pixel>(&self, kernel: Kernel, grid: &Dispatch, src: &Image<T>, dst: &mut Image<T>) {
        let size = grid.size;
        let dst_width = dst.width() as usize;
        if dst_width == 0 || src.is_empty() {
            return;
        }
        let src_pixels = src.pixels();
        let src_width = size.x as usize;

        dst.pixels_mut()
            .par_chunks_mut(dst_width)
            .enumerate()
            .for_each(|(dy, row)| {
                for (dx, out) in row.iter_mut().enumerate() {
                    let (x, y) = kernel.source(dx as u32, dy as u32, size);
                    *out = src_pixels[y as usize * src_width + x as usize];
                }
            });
    }
}
