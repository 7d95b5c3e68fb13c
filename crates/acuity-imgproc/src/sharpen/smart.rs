use serde::{Deserialize, Serialize};

use acuity_image::{ImageBatch, ImageError};

use crate::color;
use crate::parallel;
use crate::smooth::guided_smooth;

/// Knee of the noise-shrink curve; detail near this magnitude is treated as
/// micro noise.
const NOISE_KNEE: f32 = 0.03;

/// Regularization passed to the guided smoother; looser than the smoother's
/// own default so fine texture survives the edge-aware estimate.
const SMOOTH_EPS: f32 = 1e-3;

/// Parameters for [`smart_sharpen`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SmartSharpenParams {
    /// Nominal sharpening radius; the edge-aware estimate runs at twice
    /// this, floored at 1.
    pub radius: f32,
    /// Gain applied to the luma detail.
    pub amount: f32,
    /// Strength of the micro-noise shrink, in [0, 1].
    pub reduce_noise: f32,
    /// How much sharpening fades out of the shadows, in [0, 1].
    pub fade_shadows: f32,
    /// How much sharpening fades out of the highlights, in [0, 1].
    pub fade_highlights: f32,
}

impl Default for SmartSharpenParams {
    fn default() -> Self {
        Self {
            radius: 1.8,
            amount: 1.2,
            reduce_noise: 0.15,
            fade_shadows: 0.2,
            fade_highlights: 0.2,
        }
    }
}

/// Edge-aware sharpening on luma.
///
/// The detail layer is the difference between luma and its edge-aware
/// smooth estimate, so halos around strong edges stay small. Micro noise is
/// shrunk with `(|dL| / (|dL| + knee))^(1 - reduce_noise)`, the remaining
/// detail fades out of shadows and highlights, and the boosted luma is
/// written back through the luma-ratio recombination.
pub fn smart_sharpen(
    src: &ImageBatch<f32, 3>,
    dst: &mut ImageBatch<f32, 3>,
    params: &SmartSharpenParams,
) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidBatchSize(src.size(), dst.size()));
    }

    let mut luma = ImageBatch::from_size_val(src.size(), 0.0f32)?;
    color::luma_from_rgb(src, &mut luma)?;

    // the guided radius is always derived, never the raw radius
    let mut smooth = ImageBatch::from_size_val(src.size(), 0.0f32)?;
    guided_smooth(src, &mut smooth, (params.radius * 2.0).max(1.0), SMOOTH_EPS)?;

    let amount = params.amount;
    let reduce_noise = params.reduce_noise;
    let fade_shadows = params.fade_shadows;
    let fade_highlights = params.fade_highlights;

    let mut luma_out = ImageBatch::from_size_val(src.size(), 0.0f32)?;
    parallel::par_iter_rows_val_two(&luma, &smooth, &mut luma_out, move |&l, &s, out| {
        let mut d = l - s;

        if reduce_noise > 0.0 {
            let mag = d.abs();
            d *= (mag / (mag + NOISE_KNEE)).powf(1.0 - reduce_noise);
        }

        let shadows = (1.0 - l).clamp(0.0, 1.0);
        let highlights = l.clamp(0.0, 1.0);
        d *= (1.0 - fade_shadows * shadows) * (1.0 - fade_highlights * highlights);

        *out = (l + amount * d).clamp(0.0, 1.0);
    });

    color::scale_rgb_by_luma_ratio(src, &luma, &luma_out, dst)
}
