use std::f32::consts::PI;

use rayon::prelude::*;

use acuity_image::{ImageBatch, ImageError};

use crate::color;

/// Raised-cosine weighting mask centered on mid-luma.
///
/// Produces a plateau of ~1 around luma 0.5 that tapers smoothly to 0 at
/// `0.5 ± softness` and is exactly 0 beyond. The cosine taper alone does not
/// reach 0 at the boundary, so the explicit zeroing outside the band is part
/// of the contract.
///
/// # Arguments
///
/// * `src` - The input RGB batch.
/// * `dst` - The output single-channel mask, values in [0, 1].
/// * `softness` - Half-width of the midtone band, clamped into (0, 0.5].
pub fn midtone_mask(
    src: &ImageBatch<f32, 3>,
    dst: &mut ImageBatch<f32, 1>,
    softness: f32,
) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidBatchSize(src.size(), dst.size()));
    }

    let s = softness.clamp(1e-6, 0.5);

    color::luma_from_rgb(src, dst)?;
    dst.as_slice_mut().par_iter_mut().for_each(|v| {
        let l = *v;
        let raw = ((l - 0.5) * PI / (2.0 * s)).cos().clamp(-1.0, 1.0);
        let m = (raw + 1.0) / 2.0;
        *v = if l > 0.5 + s || l < 0.5 - s { 0.0 } else { m };
    });

    Ok(())
}
