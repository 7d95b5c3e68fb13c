use serde::{Deserialize, Serialize};

use acuity_image::{ImageBatch, ImageError};

use super::ChannelMode;
use crate::color;
use crate::filter::gaussian_blur;
use crate::parallel;

/// Parameters for [`texture`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextureParams {
    /// Blur radius of the low-pass estimate; small radii select
    /// micro-contrast.
    pub radius: f32,
    /// Strength of the boost; negative values smooth fine texture.
    pub strength: f32,
    /// Channel handling.
    pub channel_mode: ChannelMode,
}

impl Default for TextureParams {
    fn default() -> Self {
        Self {
            radius: 2.0,
            strength: 0.4,
            channel_mode: ChannelMode::FullRgb,
        }
    }
}

/// Micro-contrast boost.
///
/// A gentle, unmasked high-frequency lift at a small radius:
/// `out = clamp01(src + strength * hf)`. The luma-only path boosts luma
/// detail and rescales RGB by the luma ratio.
pub fn texture(
    src: &ImageBatch<f32, 3>,
    dst: &mut ImageBatch<f32, 3>,
    params: &TextureParams,
) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidBatchSize(src.size(), dst.size()));
    }

    let mut low = ImageBatch::from_size_val(src.size(), 0.0f32)?;
    gaussian_blur(src, &mut low, params.radius)?;

    let strength = params.strength;
    match params.channel_mode {
        ChannelMode::FullRgb => {
            parallel::par_iter_rows_val_two(src, &low, dst, move |&x, &l, out| {
                *out = (x + strength * (x - l)).clamp(0.0, 1.0);
            });
        }
        ChannelMode::LumaOnly => {
            let mut luma = ImageBatch::from_size_val(src.size(), 0.0f32)?;
            color::luma_from_rgb(src, &mut luma)?;
            let mut luma_low = ImageBatch::from_size_val(src.size(), 0.0f32)?;
            color::luma_from_rgb(&low, &mut luma_low)?;

            let mut luma_out = ImageBatch::from_size_val(src.size(), 0.0f32)?;
            parallel::par_iter_rows_val_two(&luma, &luma_low, &mut luma_out, move |&l, &ll, out| {
                *out = (l + strength * (l - ll)).clamp(0.0, 1.0);
            });

            color::scale_rgb_by_luma_ratio(src, &luma, &luma_out, dst)?;
        }
    }

    Ok(())
}
