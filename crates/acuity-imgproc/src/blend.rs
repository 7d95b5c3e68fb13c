use acuity_image::{ImageBatch, ImageError};

use crate::parallel;

/// Overlay blend of two batches.
///
/// Per element: `base <= 0.5` yields `2 * base * blend`, otherwise
/// `1 - 2 * (1 - base) * (1 - blend)`; the result is clamped to [0, 1].
///
/// # Arguments
///
/// * `base` - The base batch.
/// * `blend` - The blend layer.
/// * `dst` - The output batch.
pub fn overlay<const C: usize>(
    base: &ImageBatch<f32, C>,
    blend: &ImageBatch<f32, C>,
    dst: &mut ImageBatch<f32, C>,
) -> Result<(), ImageError> {
    check_sizes(base, blend, dst)?;

    parallel::par_iter_rows_val_two(base, blend, dst, |&b, &s, out| {
        let res = if b <= 0.5 {
            2.0 * b * s
        } else {
            1.0 - 2.0 * (1.0 - b) * (1.0 - s)
        };
        *out = res.clamp(0.0, 1.0);
    });

    Ok(())
}

/// Soft-light blend of two batches.
///
/// Uses the simplified approximation of the W3C formula,
/// `(1 - 2 * blend) * base^2 + 2 * blend * base`, clamped to [0, 1]. The
/// approximation is intentional and kept as-is for parity, not replaced by
/// the exact piecewise definition.
pub fn soft_light<const C: usize>(
    base: &ImageBatch<f32, C>,
    blend: &ImageBatch<f32, C>,
    dst: &mut ImageBatch<f32, C>,
) -> Result<(), ImageError> {
    check_sizes(base, blend, dst)?;

    parallel::par_iter_rows_val_two(base, blend, dst, |&b, &s, out| {
        let res = (1.0 - 2.0 * s) * b * b + 2.0 * s * b;
        *out = res.clamp(0.0, 1.0);
    });

    Ok(())
}

/// Mix an effect over its base with a constant opacity.
///
/// Linear interpolation `base * (1 - opacity) + effect * opacity`, clamped.
pub fn apply_opacity<const C: usize>(
    base: &ImageBatch<f32, C>,
    effect: &ImageBatch<f32, C>,
    opacity: f32,
    dst: &mut ImageBatch<f32, C>,
) -> Result<(), ImageError> {
    check_sizes(base, effect, dst)?;

    parallel::par_iter_rows_val_two(base, effect, dst, |&b, &e, out| {
        *out = (b * (1.0 - opacity) + e * opacity).clamp(0.0, 1.0);
    });

    Ok(())
}

fn check_sizes<const C: usize>(
    src1: &ImageBatch<f32, C>,
    src2: &ImageBatch<f32, C>,
    dst: &ImageBatch<f32, C>,
) -> Result<(), ImageError> {
    if src1.size() != src2.size() {
        return Err(ImageError::InvalidBatchSize(src1.size(), src2.size()));
    }
    if src1.size() != dst.size() {
        return Err(ImageError::InvalidBatchSize(src1.size(), dst.size()));
    }
    Ok(())
}
