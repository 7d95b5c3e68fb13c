use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use acuity_image::{ImageBatch, ImageError};

use super::ChannelMode;
use crate::color;
use crate::filter::gaussian_blur;
use crate::mask::midtone_mask;

/// Parameters for [`clarity`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClarityParams {
    /// Blur radius of the low-pass estimate; large radii give the local
    /// contrast look.
    pub radius: f32,
    /// Strength of the effect; negative values soften local contrast.
    pub strength: f32,
    /// Half-width of the midtone band the effect is confined to.
    pub midtone_softness: f32,
    /// Channel handling.
    pub channel_mode: ChannelMode,
}

impl Default for ClarityParams {
    fn default() -> Self {
        Self {
            radius: 24.0,
            strength: 0.35,
            midtone_softness: 0.35,
            channel_mode: ChannelMode::FullRgb,
        }
    }
}

/// Midtone-weighted local contrast.
///
/// Large-radius high-pass detail is multiplied by the raised-cosine midtone
/// mask before recombination, so shadows and highlights stay untouched:
/// `out = clamp01(src + strength * detail * mask)`. The luma-only path
/// boosts masked luma detail and rescales RGB by the luma ratio.
pub fn clarity(
    src: &ImageBatch<f32, 3>,
    dst: &mut ImageBatch<f32, 3>,
    params: &ClarityParams,
) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidBatchSize(src.size(), dst.size()));
    }

    let mut low = ImageBatch::from_size_val(src.size(), 0.0f32)?;
    gaussian_blur(src, &mut low, params.radius)?;

    let mut mask = ImageBatch::from_size_val(src.size(), 0.0f32)?;
    midtone_mask(src, &mut mask, params.midtone_softness)?;

    let strength = params.strength;
    let width = src.width();

    match params.channel_mode {
        ChannelMode::FullRgb => {
            for b in 0..src.batch() {
                let m = mask.plane(b, 0);
                for c in 0..3 {
                    let x = src.plane(b, c);
                    let l = low.plane(b, c);
                    dst.plane_mut(b, c)
                        .par_chunks_mut(width)
                        .enumerate()
                        .for_each(|(y, row)| {
                            let offset = y * width;
                            for (xi, out) in row.iter_mut().enumerate() {
                                let i = offset + xi;
                                let detail = (x[i] - l[i]) * m[i];
                                *out = (x[i] + strength * detail).clamp(0.0, 1.0);
                            }
                        });
                }
            }
        }
        ChannelMode::LumaOnly => {
            let mut luma = ImageBatch::from_size_val(src.size(), 0.0f32)?;
            color::luma_from_rgb(src, &mut luma)?;
            let mut luma_low = ImageBatch::from_size_val(src.size(), 0.0f32)?;
            color::luma_from_rgb(&low, &mut luma_low)?;

            let mut luma_out = ImageBatch::from_size_val(src.size(), 0.0f32)?;
            for b in 0..src.batch() {
                let m = mask.plane(b, 0);
                let l = luma.plane(b, 0);
                let ll = luma_low.plane(b, 0);
                luma_out
                    .plane_mut(b, 0)
                    .par_chunks_mut(width)
                    .enumerate()
                    .for_each(|(y, row)| {
                        let offset = y * width;
                        for (xi, out) in row.iter_mut().enumerate() {
                            let i = offset + xi;
                            let dl = (l[i] - ll[i]) * m[i];
                            *out = (l[i] + strength * dl).clamp(0.0, 1.0);
                        }
                    });
            }

            color::scale_rgb_by_luma_ratio(src, &luma, &luma_out, dst)?;
        }
    }

    Ok(())
}
