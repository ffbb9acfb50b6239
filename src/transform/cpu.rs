//! Reference backend: walks the dispatch grid one work group at a time.

use super::{Dispatch, Kernel, TransformBackend};
use crate::util::{Image, Pixel};

/// Single-threaded reference implementation of the orientation kernels.
#[derive(Clone, Copy, Debug, Default)]
pub struct CpuBackend;

impl TransformBackend for CpuBackend {
    fn name(&self) -> &'static str {
        "cpu"
    }

    fn dispatch<T: Pixel>(&self, kernel: Kernel, grid: &Dispatch, src: &Image<T>, dst: &mut Image<T>) {
        let size = grid.size;
        let dst_width = dst.width() as usize;
        let src_pixels = src.pixels();
        let dst_pixels = dst.pixels_mut();

        for gy in 0..grid.groups.y {
            for gx in 0..grid.groups.x {
                for ly in 0..grid.group_size.y {
                    let y = gy * grid.group_size.y + ly;
                    if y >= size.y {
                        break;
                    }
                    for lx in 0..grid.group_size.x {
                        let x = gx * grid.group_size.x + lx;
                        if x >= size.x {
                            break;
                        }
                        let (dx, dy) = kernel.map(x, y, size);
                        dst_pixels[dy as usize * dst_width + dx as usize] =
                            src_pixels[y as usize * size.x as usize + x as usize];
                    }
                }
            }
        }
    }
}
