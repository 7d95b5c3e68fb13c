use rayon::prelude::*;

use acuity_image::{ImageBatch, ImageError};

use crate::parallel::ExecutionStrategy;

/// Mirror an out-of-range index back into `[0, len)`.
///
/// Reflection is `[2, 1, | 0, 1, 2, ...]` (the edge sample is not repeated),
/// which avoids the edge darkening that zero padding introduces. The fold
/// loops so that kernels wider than the plane stay well-defined.
#[inline]
fn reflect_index(mut i: isize, len: usize) -> usize {
    let n = len as isize;
    if n == 1 {
        return 0;
    }
    loop {
        if i < 0 {
            i = -i;
        } else if i >= n {
            i = 2 * n - 2 - i;
        } else {
            return i as usize;
        }
    }
}

/// A separable 2-D filter applied as two reflect-padded 1-D convolutions.
///
/// The vertical pass runs first into a temporary buffer, then the horizontal
/// pass writes the destination, matching the two-pass order of the filters
/// built on top.
struct SeparableFilter {
    kernel_x: Vec<f32>,
    kernel_y: Vec<f32>,
    offsets_x: Vec<isize>,
    offsets_y: Vec<isize>,
}

impl SeparableFilter {
    fn new(kernel_x: &[f32], kernel_y: &[f32]) -> Self {
        let half_x = kernel_x.len() / 2;
        let half_y = kernel_y.len() / 2;

        let offsets_x = (0..kernel_x.len())
            .map(|i| i as isize - half_x as isize)
            .collect();

        let offsets_y = (0..kernel_y.len())
            .map(|i| i as isize - half_y as isize)
            .collect();

        Self {
            kernel_x: kernel_x.to_vec(),
            kernel_y: kernel_y.to_vec(),
            offsets_x,
            offsets_y,
        }
    }

    fn apply_plane_serial(&self, src: &[f32], dst: &mut [f32], temp: &mut [f32], cols: usize) {
        let rows = src.len() / cols;

        // vertical
        for r in 0..rows {
            for c in 0..cols {
                let mut acc = 0.0f32;
                for (&k, &off) in self.kernel_y.iter().zip(self.offsets_y.iter()) {
                    let y = reflect_index(r as isize + off, rows);
                    acc += src[y * cols + c] * k;
                }
                temp[r * cols + c] = acc;
            }
        }

        // horizontal
        for r in 0..rows {
            let row = &temp[r * cols..(r + 1) * cols];
            for c in 0..cols {
                let mut acc = 0.0f32;
                for (&k, &off) in self.kernel_x.iter().zip(self.offsets_x.iter()) {
                    let x = reflect_index(c as isize + off, cols);
                    acc += row[x] * k;
                }
                dst[r * cols + c] = acc;
            }
        }
    }

    fn apply_plane_parallel(&self, src: &[f32], dst: &mut [f32], temp: &mut [f32], cols: usize) {
        let rows = src.len() / cols;

        // vertical (parallel by rows)
        temp.par_chunks_mut(cols).enumerate().for_each(|(r, out)| {
            for (c, out_val) in out.iter_mut().enumerate() {
                let mut acc = 0.0f32;
                for (&k, &off) in self.kernel_y.iter().zip(self.offsets_y.iter()) {
                    let y = reflect_index(r as isize + off, rows);
                    acc += src[y * cols + c] * k;
                }
                *out_val = acc;
            }
        });

        // horizontal (parallel by rows)
        let temp_ref: &[f32] = temp;
        dst.par_chunks_mut(cols).enumerate().for_each(|(r, out)| {
            let row = &temp_ref[r * cols..(r + 1) * cols];
            for (c, out_val) in out.iter_mut().enumerate() {
                let mut acc = 0.0f32;
                for (&k, &off) in self.kernel_x.iter().zip(self.offsets_x.iter()) {
                    let x = reflect_index(c as isize + off, cols);
                    acc += row[x] * k;
                }
                *out_val = acc;
            }
        });
    }
}

/// Apply a separable filter with execution strategy control.
///
/// Each `(batch, channel)` plane is convolved independently; channels are
/// never mixed. Boundaries are handled with mirror reflection.
///
/// # Arguments
///
/// * `src` - The source batch.
/// * `dst` - The destination batch, same size as the source.
/// * `kernel_x` - The horizontal kernel.
/// * `kernel_y` - The vertical kernel.
/// * `strategy` - Execution strategy: `Serial`, `Parallel`, or `Auto`.
pub fn separable_filter_with_strategy<const C: usize>(
    src: &ImageBatch<f32, C>,
    dst: &mut ImageBatch<f32, C>,
    kernel_x: &[f32],
    kernel_y: &[f32],
    strategy: ExecutionStrategy,
) -> Result<(), ImageError> {
    if kernel_x.is_empty() || kernel_y.is_empty() {
        return Err(ImageError::InvalidKernelLength(
            kernel_x.len(),
            kernel_y.len(),
        ));
    }

    if src.size() != dst.size() {
        return Err(ImageError::InvalidBatchSize(src.size(), dst.size()));
    }

    let filter = SeparableFilter::new(kernel_x, kernel_y);
    let cols = src.width();
    let parallel = strategy.is_parallel(src.size().plane_len());
    let mut temp = vec![0.0f32; src.plane_len()];

    for b in 0..src.batch() {
        for c in 0..C {
            let src_plane = src.plane(b, c);
            let dst_plane = dst.plane_mut(b, c);
            if parallel {
                filter.apply_plane_parallel(src_plane, dst_plane, &mut temp, cols);
            } else {
                filter.apply_plane_serial(src_plane, dst_plane, &mut temp, cols);
            }
        }
    }

    Ok(())
}

/// Apply a separable filter to an image batch.
///
/// Uses [`ExecutionStrategy::Auto`]; for explicit control, use
/// [`separable_filter_with_strategy`].
pub fn separable_filter<const C: usize>(
    src: &ImageBatch<f32, C>,
    dst: &mut ImageBatch<f32, C>,
    kernel_x: &[f32],
    kernel_y: &[f32],
) -> Result<(), ImageError> {
    separable_filter_with_strategy(src, dst, kernel_x, kernel_y, ExecutionStrategy::Auto)
}

#[cfg(test)]
mod tests {
    use super::*;
    use acuity_image::BatchSize;

    #[test]
    fn test_reflect_index() {
        assert_eq!(reflect_index(-1, 3), 1);
        assert_eq!(reflect_index(-2, 3), 2);
        assert_eq!(reflect_index(0, 3), 0);
        assert_eq!(reflect_index(2, 3), 2);
        assert_eq!(reflect_index(3, 3), 1);
        assert_eq!(reflect_index(4, 3), 0);
        assert_eq!(reflect_index(5, 1), 0);
    }

    #[test]
    fn test_separable_filter_impulse() -> Result<(), ImageError> {
        let size = BatchSize {
            batch: 1,
            height: 5,
            width: 5,
        };

        let mut data = vec![0.0f32; 25];
        data[12] = 1.0;
        let img = ImageBatch::<f32, 1>::new(size, data)?;
        let mut dst = ImageBatch::from_size_val(size, 0.0f32)?;

        let kernel = vec![1.0, 1.0, 1.0];
        separable_filter(&img, &mut dst, &kernel, &kernel)?;

        #[rustfmt::skip]
        assert_eq!(
            dst.as_slice(),
            &[
                0.0, 0.0, 0.0, 0.0, 0.0,
                0.0, 1.0, 1.0, 1.0, 0.0,
                0.0, 1.0, 1.0, 1.0, 0.0,
                0.0, 1.0, 1.0, 1.0, 0.0,
                0.0, 0.0, 0.0, 0.0, 0.0,
            ]
        );

        let sum = dst.as_slice().iter().sum::<f32>();
        assert_eq!(sum, 9.0);
        Ok(())
    }

    #[test]
    fn test_separable_filter_reflects_not_replicates() -> Result<(), ImageError> {
        let size = BatchSize {
            batch: 1,
            height: 1,
            width: 3,
        };
        let img = ImageBatch::<f32, 1>::new(size, vec![1.0, 0.0, 0.0])?;
        let mut dst = ImageBatch::from_size_val(size, 0.0f32)?;

        let kernel = vec![1.0, 1.0, 1.0];
        separable_filter(&img, &mut dst, &kernel, &kernel)?;

        // With mirror reflection the left border sees its right neighbor
        // twice (replication would see the edge sample itself and yield 6).
        assert_eq!(dst.as_slice(), &[3.0, 3.0, 0.0]);
        Ok(())
    }

    #[test]
    fn test_serial_and_parallel_agree() -> Result<(), ImageError> {
        let size = BatchSize {
            batch: 2,
            height: 7,
            width: 6,
        };
        let data = (0..size.num_pixels()).map(|x| x as f32 * 0.01).collect();
        let img = ImageBatch::<f32, 1>::new(size, data)?;

        let kernel = vec![0.25, 0.5, 0.25];

        let mut dst_serial = ImageBatch::from_size_val(size, 0.0f32)?;
        separable_filter_with_strategy(
            &img,
            &mut dst_serial,
            &kernel,
            &kernel,
            ExecutionStrategy::Serial,
        )?;

        let mut dst_parallel = ImageBatch::from_size_val(size, 0.0f32)?;
        separable_filter_with_strategy(
            &img,
            &mut dst_parallel,
            &kernel,
            &kernel,
            ExecutionStrategy::Parallel,
        )?;

        assert_eq!(dst_serial.as_slice(), dst_parallel.as_slice());
        Ok(())
    }

    #[test]
    fn test_empty_kernel_is_rejected() {
        let size = BatchSize {
            batch: 1,
            height: 2,
            width: 2,
        };
        let img = ImageBatch::<f32, 1>::from_size_val(size, 0.0).unwrap();
        let mut dst = ImageBatch::from_size_val(size, 0.0f32).unwrap();

        let res = separable_filter(&img, &mut dst, &[], &[1.0]);
        assert_eq!(res, Err(ImageError::InvalidKernelLength(0, 1)));
    }
}
