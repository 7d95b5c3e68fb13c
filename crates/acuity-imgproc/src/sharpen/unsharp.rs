use serde::{Deserialize, Serialize};

use acuity_image::{ImageBatch, ImageError};

use super::ChannelMode;
use crate::color;
use crate::filter::gaussian_blur;
use crate::parallel;

/// Parameters for [`unsharp_mask`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UnsharpMaskParams {
    /// Blur radius of the low-pass estimate, in pixels.
    pub radius: f32,
    /// Gain applied to the detail layer.
    pub amount: f32,
    /// Detail with magnitude at or below this is dropped; 0 disables the
    /// thresholding step entirely.
    pub threshold: f32,
    /// Channel handling.
    pub channel_mode: ChannelMode,
}

impl Default for UnsharpMaskParams {
    fn default() -> Self {
        Self {
            radius: 2.0,
            amount: 1.0,
            threshold: 0.0,
            channel_mode: ChannelMode::FullRgb,
        }
    }
}

/// Classic unsharp masking.
///
/// The detail layer is the difference between the image and its
/// gaussian-blurred copy; detail below the threshold is suppressed, the rest
/// is amplified and added back:
/// `out = clamp01(src + amount * detail)`.
///
/// In [`ChannelMode::LumaOnly`] the same pipeline runs on the luma plane and
/// RGB is rescaled to the new luma.
pub fn unsharp_mask(
    src: &ImageBatch<f32, 3>,
    dst: &mut ImageBatch<f32, 3>,
    params: &UnsharpMaskParams,
) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidBatchSize(src.size(), dst.size()));
    }

    let mut low = ImageBatch::from_size_val(src.size(), 0.0f32)?;
    gaussian_blur(src, &mut low, params.radius)?;

    let amount = params.amount;
    let threshold = params.threshold;
    let boost = move |x: f32, blurred: f32| {
        let mut d = x - blurred;
        if threshold > 0.0 && d.abs() <= threshold {
            d = 0.0;
        }
        (x + amount * d).clamp(0.0, 1.0)
    };

    match params.channel_mode {
        ChannelMode::FullRgb => {
            parallel::par_iter_rows_val_two(src, &low, dst, move |&x, &l, out| {
                *out = boost(x, l);
            });
        }
        ChannelMode::LumaOnly => {
            let mut luma = ImageBatch::from_size_val(src.size(), 0.0f32)?;
            color::luma_from_rgb(src, &mut luma)?;
            let mut luma_low = ImageBatch::from_size_val(src.size(), 0.0f32)?;
            color::luma_from_rgb(&low, &mut luma_low)?;

            let mut luma_out = ImageBatch::from_size_val(src.size(), 0.0f32)?;
            parallel::par_iter_rows_val_two(&luma, &luma_low, &mut luma_out, move |&l, &ll, out| {
                *out = boost(l, ll);
            });

            color::rgb_from_luma_ratio(&luma_out, src, dst)?;
        }
    }

    Ok(())
}
