use rayon::prelude::*;

use acuity_image::ImageBatch;

/// Pixel count at which [`ExecutionStrategy::Auto`] switches to the parallel path.
const PARALLEL_THRESHOLD: usize = 100_000;

/// Controls how filtering operations are executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionStrategy {
    /// Run sequentially on the current thread.
    ///
    /// Useful for small images or when the overhead of parallelization
    /// outweighs the benefits.
    Serial,

    /// Use the global Rayon thread pool to process rows in parallel.
    Parallel,

    /// Pick between [`ExecutionStrategy::Serial`] and
    /// [`ExecutionStrategy::Parallel`] based on the image size.
    #[default]
    Auto,
}

impl ExecutionStrategy {
    /// Whether the parallel path should be taken for `num_pixels` pixels.
    pub fn is_parallel(&self, num_pixels: usize) -> bool {
        match self {
            ExecutionStrategy::Serial => false,
            ExecutionStrategy::Parallel => true,
            ExecutionStrategy::Auto => num_pixels >= PARALLEL_THRESHOLD,
        }
    }
}

/// Apply a function to each element of an image batch in parallel by rows.
pub fn par_iter_rows_val<const C1: usize, const C2: usize>(
    src: &ImageBatch<f32, C1>,
    dst: &mut ImageBatch<f32, C2>,
    f: impl Fn(&f32, &mut f32) + Send + Sync,
) {
    let width = src.width();
    src.as_slice()
        .par_chunks(width)
        .zip(dst.as_slice_mut().par_chunks_mut(width))
        .for_each(|(src_row, dst_row)| {
            src_row
                .iter()
                .zip(dst_row.iter_mut())
                .for_each(|(src_val, dst_val)| {
                    f(src_val, dst_val);
                });
        });
}

/// Apply a function to each element pair of two image batches in parallel by rows.
pub fn par_iter_rows_val_two<const C1: usize, const C2: usize, const C3: usize>(
    src1: &ImageBatch<f32, C1>,
    src2: &ImageBatch<f32, C2>,
    dst: &mut ImageBatch<f32, C3>,
    f: impl Fn(&f32, &f32, &mut f32) + Send + Sync,
) {
    let width = src1.width();
    src1.as_slice()
        .par_chunks(width)
        .zip(src2.as_slice().par_chunks(width))
        .zip(dst.as_slice_mut().par_chunks_mut(width))
        .for_each(|((src1_row, src2_row), dst_row)| {
            src1_row
                .iter()
                .zip(src2_row.iter())
                .zip(dst_row.iter_mut())
                .for_each(|((src1_val, src2_val), dst_val)| {
                    f(src1_val, src2_val, dst_val);
                });
        });
}
