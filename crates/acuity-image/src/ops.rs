use num_traits::Float;

use crate::error::ImageError;
use crate::image::ImageBatch;

/// Clamp every element of an image batch to the unit interval.
///
/// # Arguments
///
/// * `src` - The source batch.
/// * `dst` - The destination batch, same size as the source.
///
/// # Errors
///
/// Returns an error if the sizes of `src` and `dst` do not match.
pub fn clamp_unit<T, const C: usize>(
    src: &ImageBatch<T, C>,
    dst: &mut ImageBatch<T, C>,
) -> Result<(), ImageError>
where
    T: Float,
{
    if src.size() != dst.size() {
        return Err(ImageError::InvalidBatchSize(src.size(), dst.size()));
    }

    dst.as_slice_mut()
        .iter_mut()
        .zip(src.as_slice().iter())
        .for_each(|(out, &x)| {
            *out = x.clamp(T::zero(), T::one());
        });

    Ok(())
}

/// Clamp every element of an image batch to the unit interval in place.
pub fn clamp_unit_mut<T, const C: usize>(image: &mut ImageBatch<T, C>)
where
    T: Float,
{
    image.as_slice_mut().iter_mut().for_each(|x| {
        *x = x.clamp(T::zero(), T::one());
    });
}
