use serde::{Deserialize, Serialize};

use acuity_image::{ImageBatch, ImageError};

use super::{BlendMode, ChannelMode};
use crate::blend;
use crate::color;
use crate::filter::gaussian_blur;
use crate::parallel;

/// Parameters for [`high_pass_sharpen`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HighPassParams {
    /// Blur radius of the low-pass estimate, in pixels.
    pub radius: f32,
    /// Gain applied to the detail before re-biasing around mid-gray.
    pub amount: f32,
    /// How the gray layer is composited over the base.
    pub blend_mode: BlendMode,
    /// Opacity of the composited effect, in [0, 1].
    pub opacity: f32,
    /// Channel handling for the detail extraction.
    pub channel_mode: ChannelMode,
}

impl Default for HighPassParams {
    fn default() -> Self {
        Self {
            radius: 3.0,
            amount: 1.0,
            blend_mode: BlendMode::Overlay,
            opacity: 1.0,
            channel_mode: ChannelMode::FullRgb,
        }
    }
}

/// High-pass sharpening via blend-mode compositing.
///
/// The detail layer is re-biased to a gray layer `0.5 + amount * detail`
/// (clamped), composited over the base with Overlay or SoftLight, then mixed
/// back with the opacity. With [`ChannelMode::LumaOnly`] the gray layer is
/// built from luma detail, clamped, and only then broadcast to 3 channels.
pub fn high_pass_sharpen(
    src: &ImageBatch<f32, 3>,
    dst: &mut ImageBatch<f32, 3>,
    params: &HighPassParams,
) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidBatchSize(src.size(), dst.size()));
    }

    let mut low = ImageBatch::from_size_val(src.size(), 0.0f32)?;
    gaussian_blur(src, &mut low, params.radius)?;

    let amount = params.amount;
    let mut layer = ImageBatch::from_size_val(src.size(), 0.0f32)?;
    match params.channel_mode {
        ChannelMode::FullRgb => {
            parallel::par_iter_rows_val_two(src, &low, &mut layer, move |&x, &l, out| {
                *out = (0.5 + amount * (x - l)).clamp(0.0, 1.0);
            });
        }
        ChannelMode::LumaOnly => {
            let mut luma = ImageBatch::from_size_val(src.size(), 0.0f32)?;
            color::luma_from_rgb(src, &mut luma)?;
            let mut luma_low = ImageBatch::from_size_val(src.size(), 0.0f32)?;
            color::luma_from_rgb(&low, &mut luma_low)?;

            let mut gray = ImageBatch::from_size_val(src.size(), 0.0f32)?;
            parallel::par_iter_rows_val_two(&luma, &luma_low, &mut gray, move |&l, &ll, out| {
                *out = (0.5 + amount * (l - ll)).clamp(0.0, 1.0);
            });

            color::rgb_from_gray(&gray, &mut layer)?;
        }
    }

    let mut blended = ImageBatch::from_size_val(src.size(), 0.0f32)?;
    match params.blend_mode {
        BlendMode::Overlay => blend::overlay(src, &layer, &mut blended)?,
        BlendMode::SoftLight => blend::soft_light(src, &layer, &mut blended)?,
    }

    blend::apply_opacity(src, &blended, params.opacity, dst)
}

#[cfg(test)]
mod tests {
    use super::*;
    use acuity_image::BatchSize;

    fn ramp_rgb(size: BatchSize) -> ImageBatch<f32, 3> {
        let n = size.num_pixels() * 3;
        let data = (0..n).map(|x| (x % 53) as f32 / 52.0).collect();
        ImageBatch::new(size, data).unwrap()
    }

    #[test]
    fn test_zero_opacity_returns_base() -> Result<(), ImageError> {
        let size = BatchSize {
            batch: 1,
            height: 5,
            width: 5,
        };
        let src = ramp_rgb(size);
        let mut dst = ImageBatch::from_size_val(size, 0.0f32)?;

        for blend_mode in [BlendMode::Overlay, BlendMode::SoftLight] {
            let params = HighPassParams {
                opacity: 0.0,
                amount: 2.0,
                blend_mode,
                ..Default::default()
            };
            high_pass_sharpen(&src, &mut dst, &params)?;
            for (o, x) in dst.as_slice().iter().zip(src.as_slice().iter()) {
                assert!((o - x).abs() < 1e-6);
            }
        }
        Ok(())
    }

    #[test]
    fn test_flat_image_is_neutral() -> Result<(), ImageError> {
        // no detail -> the layer is mid-gray, which both blend modes treat
        // as neutral
        let size = BatchSize {
            batch: 1,
            height: 4,
            width: 4,
        };
        let src = ImageBatch::<f32, 3>::from_size_val(size, 0.3f32)?;
        let mut dst = ImageBatch::from_size_val(size, 0.0f32)?;

        for blend_mode in [BlendMode::Overlay, BlendMode::SoftLight] {
            let params = HighPassParams {
                blend_mode,
                ..Default::default()
            };
            high_pass_sharpen(&src, &mut dst, &params)?;
            for &v in dst.as_slice() {
                assert!((v - 0.3).abs() < 1e-5, "{blend_mode:?}");
            }
        }
        Ok(())
    }

    #[test]
    fn test_overlay_steepens_an_edge() -> Result<(), ImageError> {
        let size = BatchSize {
            batch: 1,
            height: 4,
            width: 8,
        };
        let mut data = vec![0.3f32; size.num_pixels() * 3];
        for c in 0..3 {
            for y in 0..4 {
                for x in 4..8 {
                    data[c * 32 + y * 8 + x] = 0.7;
                }
            }
        }
        let src = ImageBatch::<f32, 3>::new(size, data)?;
        let mut dst = ImageBatch::from_size_val(size, 0.0f32)?;

        let params = HighPassParams::default();
        high_pass_sharpen(&src, &mut dst, &params)?;

        // dark side of the edge gets darker, bright side brighter
        let row = 8;
        assert!(dst.plane(0, 0)[row + 3] < 0.3 + 1e-4);
        assert!(dst.plane(0, 0)[row + 4] > 0.7 - 1e-4);
        Ok(())
    }

    #[test]
    fn test_luma_layer_is_broadcast() -> Result<(), ImageError> {
        let size = BatchSize {
            batch: 1,
            height: 5,
            width: 5,
        };
        let src = ramp_rgb(size);
        let mut dst = ImageBatch::from_size_val(size, 0.0f32)?;

        let params = HighPassParams {
            channel_mode: ChannelMode::LumaOnly,
            ..Default::default()
        };
        high_pass_sharpen(&src, &mut dst, &params)?;

        assert_eq!(dst.size(), size);
        for &v in dst.as_slice() {
            assert!((0.0..=1.0).contains(&v));
        }
        Ok(())
    }
}
