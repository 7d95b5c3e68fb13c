use acuity_image::{ImageBatch, ImageError};

use super::{kernels, separable_filter};

/// Blur an image batch with a gaussian kernel derived from a radius.
///
/// A radius of zero or less short-circuits to an identity copy of the
/// source rather than convolving with a degenerate kernel. Otherwise the
/// sigma comes from [`kernels::sigma_from_radius`] and the blur runs as a
/// reflect-padded separable convolution, each plane independently.
///
/// # Arguments
///
/// * `src` - The source batch.
/// * `dst` - The destination batch, same size as the source.
/// * `radius` - The blur radius in pixels.
pub fn gaussian_blur<const C: usize>(
    src: &ImageBatch<f32, C>,
    dst: &mut ImageBatch<f32, C>,
    radius: f32,
) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidBatchSize(src.size(), dst.size()));
    }

    if radius <= 0.0 {
        dst.as_slice_mut().copy_from_slice(src.as_slice());
        return Ok(());
    }

    let kernel = kernels::gaussian_kernel_1d(kernels::sigma_from_radius(radius));
    separable_filter(src, dst, &kernel, &kernel)
}

/// Average an image batch over a square window.
///
/// Equivalent to a k x k box convolution with reflect padding; used as the
/// windowed-statistics primitive of the guided smoother.
///
/// # Arguments
///
/// * `src` - The source batch.
/// * `dst` - The destination batch, same size as the source.
/// * `kernel_size` - The window size, expected odd.
pub fn box_filter<const C: usize>(
    src: &ImageBatch<f32, C>,
    dst: &mut ImageBatch<f32, C>,
    kernel_size: usize,
) -> Result<(), ImageError> {
    let kernel = kernels::box_kernel_1d(kernel_size);
    separable_filter(src, dst, &kernel, &kernel)
}

#[cfg(test)]
mod tests {
    use super::*;
    use acuity_image::BatchSize;

    #[test]
    fn test_gaussian_blur_zero_radius_is_identity() -> Result<(), ImageError> {
        let size = BatchSize {
            batch: 1,
            height: 3,
            width: 4,
        };
        let data: Vec<f32> = (0..36).map(|x| x as f32 / 36.0).collect();
        let img = ImageBatch::<f32, 3>::new(size, data.clone())?;
        let mut dst = ImageBatch::from_size_val(size, 0.0f32)?;

        gaussian_blur(&img, &mut dst, 0.0)?;
        assert_eq!(dst.as_slice(), img.as_slice());

        gaussian_blur(&img, &mut dst, -2.5)?;
        assert_eq!(dst.as_slice(), img.as_slice());
        Ok(())
    }

    #[test]
    fn test_gaussian_blur_preserves_constant_images() -> Result<(), ImageError> {
        let size = BatchSize {
            batch: 2,
            height: 6,
            width: 5,
        };
        let img = ImageBatch::<f32, 3>::from_size_val(size, 0.5f32)?;
        let mut dst = ImageBatch::from_size_val(size, 0.0f32)?;

        gaussian_blur(&img, &mut dst, 3.0)?;
        for &v in dst.as_slice() {
            assert!((v - 0.5).abs() < 1e-6);
        }
        Ok(())
    }

    #[test]
    fn test_gaussian_blur_smooths_an_impulse() -> Result<(), ImageError> {
        let size = BatchSize {
            batch: 1,
            height: 15,
            width: 15,
        };
        let mut data = vec![0.0f32; 225];
        data[7 * 15 + 7] = 1.0;
        let img = ImageBatch::<f32, 1>::new(size, data)?;
        let mut dst = ImageBatch::from_size_val(size, 0.0f32)?;

        gaussian_blur(&img, &mut dst, 2.0)?;

        let center = dst.as_slice()[7 * 15 + 7];
        assert!(center < 1.0 && center > 0.0);
        // energy is preserved by the normalized kernel
        let sum = dst.as_slice().iter().sum::<f32>();
        assert!((sum - 1.0).abs() < 1e-4);
        // shape unchanged
        assert_eq!(dst.size(), size);
        Ok(())
    }

    #[test]
    fn test_box_filter_averages() -> Result<(), ImageError> {
        let size = BatchSize {
            batch: 1,
            height: 5,
            width: 5,
        };
        let mut data = vec![0.0f32; 25];
        data[2 * 5 + 2] = 9.0;
        let img = ImageBatch::<f32, 1>::new(size, data)?;
        let mut dst = ImageBatch::from_size_val(size, 0.0f32)?;

        box_filter(&img, &mut dst, 3)?;

        // the center impulse spreads evenly into every 3x3 window holding it
        #[rustfmt::skip]
        let expected = [
            0.0, 0.0, 0.0, 0.0, 0.0,
            0.0, 1.0, 1.0, 1.0, 0.0,
            0.0, 1.0, 1.0, 1.0, 0.0,
            0.0, 1.0, 1.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 0.0, 0.0,
        ];
        for (&v, &e) in dst.as_slice().iter().zip(expected.iter()) {
            assert!((v - e).abs() < 1e-6);
        }
        Ok(())
    }
}
