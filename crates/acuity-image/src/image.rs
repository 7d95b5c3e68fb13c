use crate::error::ImageError;

/// Size of an image batch in pixels.
///
/// The channel count is carried by the [`ImageBatch`] type itself.
///
/// # Examples
///
/// ```
/// use acuity_image::BatchSize;
///
/// let size = BatchSize {
///     batch: 2,
///     height: 20,
///     width: 10,
/// };
///
/// assert_eq!(size.num_pixels(), 400);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BatchSize {
    /// Number of images in the batch.
    pub batch: usize,
    /// Height of each image in pixels.
    pub height: usize,
    /// Width of each image in pixels.
    pub width: usize,
}

impl BatchSize {
    /// Total number of pixels across the batch, ignoring channels.
    pub fn num_pixels(&self) -> usize {
        self.batch * self.height * self.width
    }

    /// Number of pixels in a single plane.
    pub fn plane_len(&self) -> usize {
        self.height * self.width
    }
}

impl std::fmt::Display for BatchSize {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "BatchSize {{ batch: {}, height: {}, width: {} }}",
            self.batch, self.height, self.width
        )
    }
}

/// A batch of images stored as a dense planar buffer.
///
/// The data is laid out channel-first as `[batch, CHANNELS, height, width]`,
/// so each `(batch, channel)` pair owns a contiguous `height * width` plane.
/// `CHANNELS` is 3 for RGB data and 1 for luma planes and masks.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageBatch<T, const CHANNELS: usize> {
    size: BatchSize,
    data: Vec<T>,
}

impl<T, const CHANNELS: usize> ImageBatch<T, CHANNELS> {
    /// Create a new image batch from a planar data buffer.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::InvalidDataLength`] if the buffer length does
    /// not match `batch * CHANNELS * height * width`.
    ///
    /// # Examples
    ///
    /// ```
    /// use acuity_image::{BatchSize, ImageBatch};
    ///
    /// let image = ImageBatch::<f32, 3>::new(
    ///     BatchSize { batch: 1, height: 2, width: 2 },
    ///     vec![0.0; 12],
    /// )
    /// .unwrap();
    ///
    /// assert_eq!(image.size().height, 2);
    /// assert_eq!(image.num_channels(), 3);
    /// ```
    pub fn new(size: BatchSize, data: Vec<T>) -> Result<Self, ImageError> {
        let expected = size.num_pixels() * CHANNELS;
        if data.len() != expected {
            return Err(ImageError::InvalidDataLength(data.len(), expected));
        }
        Ok(Self { size, data })
    }

    /// Create a new image batch filled with a constant value.
    pub fn from_size_val(size: BatchSize, val: T) -> Result<Self, ImageError>
    where
        T: Clone,
    {
        let data = vec![val; size.num_pixels() * CHANNELS];
        Self::new(size, data)
    }

    /// The size of the batch.
    pub fn size(&self) -> BatchSize {
        self.size
    }

    /// Number of images in the batch.
    pub fn batch(&self) -> usize {
        self.size.batch
    }

    /// Height of each image in pixels.
    pub fn height(&self) -> usize {
        self.size.height
    }

    /// Width of each image in pixels.
    pub fn width(&self) -> usize {
        self.size.width
    }

    /// Number of channels carried by the type.
    pub fn num_channels(&self) -> usize {
        CHANNELS
    }

    /// Number of elements in a single `(batch, channel)` plane.
    pub fn plane_len(&self) -> usize {
        self.size.plane_len()
    }

    /// The whole buffer as a flat slice.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// The whole buffer as a mutable flat slice.
    pub fn as_slice_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Consume the batch and return the underlying buffer.
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// The plane of a single `(batch, channel)` pair.
    ///
    /// The caller must pass `c < CHANNELS`; an out-of-range batch index
    /// panics via slicing.
    pub fn plane(&self, b: usize, c: usize) -> &[T] {
        let len = self.plane_len();
        let start = (b * CHANNELS + c) * len;
        &self.data[start..start + len]
    }

    /// The mutable plane of a single `(batch, channel)` pair.
    pub fn plane_mut(&mut self, b: usize, c: usize) -> &mut [T] {
        let len = self.plane_len();
        let start = (b * CHANNELS + c) * len;
        &mut self.data[start..start + len]
    }

    /// Extract a single channel as a one-channel batch.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::ChannelIndexOutOfBounds`] if `channel` is not a
    /// valid channel index.
    pub fn channel(&self, channel: usize) -> Result<ImageBatch<T, 1>, ImageError>
    where
        T: Clone,
    {
        if channel >= CHANNELS {
            return Err(ImageError::ChannelIndexOutOfBounds(channel, CHANNELS));
        }

        let mut data = Vec::with_capacity(self.size.num_pixels());
        for b in 0..self.size.batch {
            data.extend_from_slice(self.plane(b, channel));
        }

        ImageBatch::new(self.size, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_checks_length() {
        let size = BatchSize {
            batch: 1,
            height: 2,
            width: 3,
        };
        let image = ImageBatch::<f32, 3>::new(size, vec![0.0; 18]);
        assert!(image.is_ok());

        let bad = ImageBatch::<f32, 3>::new(size, vec![0.0; 17]);
        assert_eq!(bad, Err(ImageError::InvalidDataLength(17, 18)));
    }

    #[test]
    fn test_plane_layout() -> Result<(), ImageError> {
        let size = BatchSize {
            batch: 2,
            height: 1,
            width: 2,
        };
        // batch 0: R=[0,1] G=[2,3] B=[4,5]; batch 1 continues.
        let data = (0..12).map(|x| x as f32).collect();
        let image = ImageBatch::<f32, 3>::new(size, data)?;

        assert_eq!(image.plane(0, 0), &[0.0, 1.0]);
        assert_eq!(image.plane(0, 2), &[4.0, 5.0]);
        assert_eq!(image.plane(1, 1), &[8.0, 9.0]);
        Ok(())
    }

    #[test]
    fn test_channel_extraction() -> Result<(), ImageError> {
        let size = BatchSize {
            batch: 2,
            height: 1,
            width: 2,
        };
        let data = (0..12).map(|x| x as f32).collect();
        let image = ImageBatch::<f32, 3>::new(size, data)?;

        let green = image.channel(1)?;
        assert_eq!(green.as_slice(), &[2.0, 3.0, 8.0, 9.0]);

        assert_eq!(
            image.channel(3),
            Err(ImageError::ChannelIndexOutOfBounds(3, 3))
        );
        Ok(())
    }
}
