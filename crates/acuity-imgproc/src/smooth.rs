use acuity_image::{ImageBatch, ImageError};

use crate::color;
use crate::filter::{box_filter, kernels};
use crate::parallel;

/// Default regularization for [`guided_smooth`].
pub const GUIDED_EPS: f32 = 1e-4;

/// Edge-aware smoothing of luma (guided-filter approximation).
///
/// The guide is the luma itself. Local mean and variance over a square
/// reflect-padded window drive a per-pixel blend between the local mean
/// (flat regions) and the original luma (edges):
///
/// 1. `mean_l`, `mean_l2`: box averages of luma and luma squared;
/// 2. `var = mean_l2 - mean_l^2`;
/// 3. `a = var / (var + eps)`, `b = (1 - a) * mean_l`;
/// 4. `a` and `b` are box-averaged again;
/// 5. output `= mean_a * luma + mean_b`.
///
/// The two-stage averaging (luma and luma squared first, then the
/// coefficients) is required; collapsing it into a single pass changes the
/// edge response.
///
/// # Arguments
///
/// * `src` - The input RGB batch.
/// * `dst` - The output single-channel batch.
/// * `radius` - Box-window radius; `radius <= 0` returns the luma unchanged.
/// * `eps` - Regularization strength, typically [`GUIDED_EPS`].
pub fn guided_smooth(
    src: &ImageBatch<f32, 3>,
    dst: &mut ImageBatch<f32, 1>,
    radius: f32,
    eps: f32,
) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidBatchSize(src.size(), dst.size()));
    }

    let size = src.size();
    let mut luma: ImageBatch<f32, 1> = ImageBatch::from_size_val(size, 0.0f32)?;
    color::luma_from_rgb(src, &mut luma)?;

    if radius <= 0.0 {
        dst.as_slice_mut().copy_from_slice(luma.as_slice());
        return Ok(());
    }

    let k = kernels::odd_window(radius);

    let mut mean_l: ImageBatch<f32, 1> = ImageBatch::from_size_val(size, 0.0f32)?;
    box_filter(&luma, &mut mean_l, k)?;

    let mut sq: ImageBatch<f32, 1> = ImageBatch::from_size_val(size, 0.0f32)?;
    color::squared(&luma, &mut sq);
    let mut mean_l2: ImageBatch<f32, 1> = ImageBatch::from_size_val(size, 0.0f32)?;
    box_filter(&sq, &mut mean_l2, k)?;

    // edge confidence: near 1 in high-variance regions, near 0 in flat ones
    let mut a: ImageBatch<f32, 1> = ImageBatch::from_size_val(size, 0.0f32)?;
    parallel::par_iter_rows_val_two(&mean_l, &mean_l2, &mut a, |&m, &m2, out| {
        let var = m2 - m * m;
        *out = var / (var + eps);
    });

    let mut b: ImageBatch<f32, 1> = ImageBatch::from_size_val(size, 0.0f32)?;
    parallel::par_iter_rows_val_two(&a, &mean_l, &mut b, |&a_val, &m, out| {
        *out = (1.0 - a_val) * m;
    });

    let mut mean_a: ImageBatch<f32, 1> = ImageBatch::from_size_val(size, 0.0f32)?;
    box_filter(&a, &mut mean_a, k)?;
    let mut mean_b: ImageBatch<f32, 1> = ImageBatch::from_size_val(size, 0.0f32)?;
    box_filter(&b, &mut mean_b, k)?;

    parallel::par_iter_rows_val_two(&mean_a, &luma, dst, |&ma, &l, out| *out = ma * l);
    let scaled = dst.clone();
    parallel::par_iter_rows_val_two(&scaled, &mean_b, dst, |&s, &mb, out| *out = s + mb);

    Ok(())
}
