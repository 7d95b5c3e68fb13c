use rayon::prelude::*;

use acuity_image::{ImageBatch, ImageError};

use crate::color::{self, LUMA_EPS};
use crate::filter::{kernels, separable_filter};
use crate::parallel;

/// Sobel edge magnitude of luma, normalized per batch item.
///
/// The gradient pair comes from the separable 3x3 sobel decomposition over
/// the reflect-padded luma plane; the magnitude `sqrt(gx^2 + gy^2)` is then
/// divided by each item's maximum so the output lands in [0, 1].
///
/// # Arguments
///
/// * `src` - The input RGB batch.
/// * `dst` - The output single-channel edge response.
pub fn edge_magnitude(
    src: &ImageBatch<f32, 3>,
    dst: &mut ImageBatch<f32, 1>,
) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidBatchSize(src.size(), dst.size()));
    }

    let size = src.size();
    let mut luma = ImageBatch::from_size_val(size, 0.0f32)?;
    color::luma_from_rgb(src, &mut luma)?;

    let (deriv, smooth) = kernels::sobel_kernel_1d();

    let mut gx = ImageBatch::from_size_val(size, 0.0f32)?;
    separable_filter(&luma, &mut gx, &deriv, &smooth)?;

    let mut gy = ImageBatch::from_size_val(size, 0.0f32)?;
    separable_filter(&luma, &mut gy, &smooth, &deriv)?;

    parallel::par_iter_rows_val_two(&gx, &gy, dst, |&x, &y, out| {
        *out = (x * x + y * y).sqrt();
    });

    // normalize each batch item by its own peak response
    for b in 0..size.batch {
        let plane = dst.plane_mut(b, 0);
        let max = plane.iter().fold(0.0f32, |acc, &v| acc.max(v));
        let inv = 1.0 / (max + LUMA_EPS);
        plane.par_iter_mut().for_each(|v| *v *= inv);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use acuity_image::BatchSize;

    #[test]
    fn test_flat_image_has_no_edges() -> Result<(), ImageError> {
        let size = BatchSize {
            batch: 1,
            height: 4,
            width: 4,
        };
        let rgb = ImageBatch::<f32, 3>::from_size_val(size, 0.7f32)?;
        let mut edges = ImageBatch::from_size_val(size, 1.0f32)?;

        edge_magnitude(&rgb, &mut edges)?;
        for &v in edges.as_slice() {
            assert!(v.abs() < 1e-4);
        }
        Ok(())
    }

    #[test]
    fn test_step_edge_peaks_at_transition() -> Result<(), ImageError> {
        let size = BatchSize {
            batch: 1,
            height: 5,
            width: 6,
        };
        let mut data = vec![0.0f32; size.num_pixels() * 3];
        for c in 0..3 {
            for y in 0..5 {
                for x in 3..6 {
                    data[c * 30 + y * 6 + x] = 1.0;
                }
            }
        }
        let rgb = ImageBatch::<f32, 3>::new(size, data)?;
        let mut edges = ImageBatch::from_size_val(size, 0.0f32)?;

        edge_magnitude(&rgb, &mut edges)?;

        let e = edges.as_slice();
        // the peak sits on the step and is normalized to 1
        let row = &e[2 * 6..3 * 6];
        let peak = row.iter().cloned().fold(0.0f32, f32::max);
        assert!((peak - 1.0).abs() < 1e-3);
        // far side of each flat half is quiet
        assert!(row[0] < 0.1);
        assert!(row[5] < 0.1);
        // everything is inside the unit range
        assert!(e.iter().all(|&v| (0.0..=1.0 + 1e-6).contains(&v)));
        Ok(())
    }
}
