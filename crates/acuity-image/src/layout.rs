use crate::error::ImageError;
use crate::image::{BatchSize, ImageBatch};

/// Build an RGB batch from a host tensor, normalizing its layout.
///
/// The host hands over a 4-dimensional float tensor in either
/// `[batch, 3, height, width]` (channel-first) or `[batch, height, width, 3]`
/// (channel-last) layout. Channel-last is auto-detected when the trailing
/// axis has exactly 3 entries and permuted into the planar channel-first
/// storage used internally; anything else is assumed channel-first.
///
/// # Errors
///
/// * [`ImageError::InvalidRank`] if `shape` is not 4-dimensional.
/// * [`ImageError::InvalidChannelCount`] if neither layout has 3 channels.
/// * [`ImageError::InvalidDataLength`] if `data` does not match `shape`.
pub fn image_from_host(shape: &[usize], data: Vec<f32>) -> Result<ImageBatch<f32, 3>, ImageError> {
    let &[batch, d1, d2, d3] = shape else {
        return Err(ImageError::InvalidRank(shape.len()));
    };

    let expected = batch * d1 * d2 * d3;
    if data.len() != expected {
        return Err(ImageError::InvalidDataLength(data.len(), expected));
    }

    if d3 == 3 {
        // channel-last: [B, H, W, 3] -> [B, 3, H, W]
        let (height, width) = (d1, d2);
        let size = BatchSize {
            batch,
            height,
            width,
        };
        let plane_len = size.plane_len();
        let mut planar = vec![0.0f32; data.len()];
        for b in 0..batch {
            let base = b * plane_len * 3;
            for i in 0..plane_len {
                for c in 0..3 {
                    planar[base + c * plane_len + i] = data[base + i * 3 + c];
                }
            }
        }
        ImageBatch::new(size, planar)
    } else if d1 == 3 {
        // already channel-first: [B, 3, H, W]
        let size = BatchSize {
            batch,
            height: d2,
            width: d3,
        };
        ImageBatch::new(size, data)
    } else {
        Err(ImageError::InvalidChannelCount(d1))
    }
}

/// Return an RGB batch to the host in channel-last layout.
///
/// The inverse of [`image_from_host`]: planar `[B, 3, H, W]` storage is
/// permuted back to `[B, H, W, 3]`, the layout the host renders from.
pub fn image_to_host(src: &ImageBatch<f32, 3>) -> (Vec<usize>, Vec<f32>) {
    let size = src.size();
    let plane_len = size.plane_len();
    let data = src.as_slice();

    let mut out = vec![0.0f32; data.len()];
    for b in 0..size.batch {
        let base = b * plane_len * 3;
        for i in 0..plane_len {
            for c in 0..3 {
                out[base + i * 3 + c] = data[base + c * plane_len + i];
            }
        }
    }

    let shape = vec![size.batch, size.height, size.width, 3];
    (shape, out)
}
