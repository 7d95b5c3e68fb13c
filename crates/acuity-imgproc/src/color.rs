use rayon::prelude::*;

use acuity_image::{ImageBatch, ImageError};

use crate::parallel;

/// Define the BT.709 RGB weights for the luma conversion.
const RW: f32 = 0.2126;
const GW: f32 = 0.7152;
const BW: f32 = 0.0722;

/// Guard against division by near-zero luma in ratio recombinations.
pub const LUMA_EPS: f32 = 1e-6;

/// Convert an RGB batch to luma using the formula:
///
/// L = 0.2126 * R + 0.7152 * G + 0.0722 * B
///
/// # Arguments
///
/// * `src` - The input RGB batch.
/// * `dst` - The output single-channel luma batch.
///
/// Precondition: the input and output batches must have the same size.
pub fn luma_from_rgb(
    src: &ImageBatch<f32, 3>,
    dst: &mut ImageBatch<f32, 1>,
) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidBatchSize(src.size(), dst.size()));
    }

    let width = src.width();
    for b in 0..src.batch() {
        let r = src.plane(b, 0);
        let g = src.plane(b, 1);
        let bl = src.plane(b, 2);

        dst.plane_mut(b, 0)
            .par_chunks_mut(width)
            .enumerate()
            .for_each(|(y, row)| {
                let offset = y * width;
                for (x, out) in row.iter_mut().enumerate() {
                    let i = offset + x;
                    *out = RW * r[i] + GW * g[i] + BW * bl[i];
                }
            });
    }

    Ok(())
}

/// Replace the luma of an RGB batch while preserving chroma ratios.
///
/// Each RGB channel is rescaled by `(new_luma + eps) / (luma(base) + eps)`
/// with `eps = 1e-6` added to both numerator and denominator, then clamped
/// to the unit interval. This is a proportional approximation, not a true
/// colorimetric luma replacement.
///
/// # Arguments
///
/// * `new_luma` - The replacement luma plane.
/// * `base` - The RGB batch providing the chroma.
/// * `dst` - The output RGB batch.
pub fn rgb_from_luma_ratio(
    new_luma: &ImageBatch<f32, 1>,
    base: &ImageBatch<f32, 3>,
    dst: &mut ImageBatch<f32, 3>,
) -> Result<(), ImageError> {
    if new_luma.size() != base.size() {
        return Err(ImageError::InvalidBatchSize(new_luma.size(), base.size()));
    }

    let mut base_luma = ImageBatch::from_size_val(base.size(), 0.0f32)?;
    luma_from_rgb(base, &mut base_luma)?;

    scale_rgb_by_luma_ratio(base, &base_luma, new_luma, dst)
}

/// Rescale an RGB batch by the ratio of two precomputed luma planes.
///
/// Shared recombination step: `dst = clamp01(base * (new_l + eps) / (l + eps))`.
/// [`rgb_from_luma_ratio`] derives the base luma itself; the sharpening
/// filters that already hold it call this directly.
pub fn scale_rgb_by_luma_ratio(
    base: &ImageBatch<f32, 3>,
    base_luma: &ImageBatch<f32, 1>,
    new_luma: &ImageBatch<f32, 1>,
    dst: &mut ImageBatch<f32, 3>,
) -> Result<(), ImageError> {
    if base.size() != dst.size() {
        return Err(ImageError::InvalidBatchSize(base.size(), dst.size()));
    }

    let width = base.width();
    for b in 0..base.batch() {
        let l = base_luma.plane(b, 0);
        let nl = new_luma.plane(b, 0);
        for c in 0..3 {
            let src_plane = base.plane(b, c);
            dst.plane_mut(b, c)
                .par_chunks_mut(width)
                .enumerate()
                .for_each(|(y, row)| {
                    let offset = y * width;
                    for (x, out) in row.iter_mut().enumerate() {
                        let i = offset + x;
                        let scale = (nl[i] + LUMA_EPS) / (l[i] + LUMA_EPS);
                        *out = (src_plane[i] * scale).clamp(0.0, 1.0);
                    }
                });
        }
    }

    Ok(())
}

/// Broadcast a single-channel batch into three identical RGB channels.
///
/// # Arguments
///
/// * `src` - The input single-channel batch.
/// * `dst` - The output RGB batch.
pub fn rgb_from_gray(
    src: &ImageBatch<f32, 1>,
    dst: &mut ImageBatch<f32, 3>,
) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidBatchSize(src.size(), dst.size()));
    }

    for b in 0..src.batch() {
        let gray = src.plane(b, 0);
        for c in 0..3 {
            dst.plane_mut(b, c).copy_from_slice(gray);
        }
    }

    Ok(())
}

/// Elementwise squared copy of a single-channel batch.
pub(crate) fn squared(src: &ImageBatch<f32, 1>, dst: &mut ImageBatch<f32, 1>) {
    parallel::par_iter_rows_val(src, dst, |&x, out| *out = x * x);
}
