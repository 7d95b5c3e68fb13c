/// Map a user-facing blur radius to a gaussian sigma.
///
/// Soft heuristic close to the Photoshop radius feel; floored at 0.15 so a
/// tiny positive radius still yields a usable kernel.
pub fn sigma_from_radius(radius: f32) -> f32 {
    (radius * 0.5 + 0.25).max(0.15)
}

/// Create a 1-D gaussian kernel from a sigma.
///
/// The support half-width is `round(3 * sigma)`, so the kernel length
/// `2 * half + 1` is always odd. Values are the gaussian density sampled at
/// integer offsets, renormalized to sum exactly 1 to account for truncation.
///
/// # Arguments
///
/// * `sigma` - The sigma of the gaussian kernel.
///
/// # Returns
///
/// A vector of the kernel.
pub fn gaussian_kernel_1d(sigma: f32) -> Vec<f32> {
    if sigma <= 0.0 {
        return vec![1.0];
    }

    let half = (3.0 * sigma + 0.5) as usize;
    let len = 2 * half + 1;
    let sigma_sq = sigma * sigma;

    let mut kernel = Vec::with_capacity(len);
    for i in 0..len {
        let x = i as f32 - half as f32;
        kernel.push((-(x * x) / (2.0 * sigma_sq)).exp());
    }

    let norm = kernel.iter().sum::<f32>();
    kernel.iter_mut().for_each(|k| *k /= norm);
    kernel
}

/// Create a box kernel of the given size.
///
/// # Arguments
///
/// * `kernel_size` - The size of the kernel.
///
/// # Returns
///
/// A vector of the kernel.
pub fn box_kernel_1d(kernel_size: usize) -> Vec<f32> {
    vec![1.0 / kernel_size as f32; kernel_size]
}

/// Round a float radius to the nearest odd window size, at least 1.
///
/// An odd window keeps the output dimensions equal to the input and the
/// window symmetric around each pixel.
pub fn odd_window(radius: f32) -> usize {
    let mut k = radius.round().max(1.0) as usize;
    if k % 2 == 0 {
        k += 1;
    }
    k
}

/// The separable 3x3 sobel kernel pair (derivative, smoothing).
pub fn sobel_kernel_1d() -> (Vec<f32>, Vec<f32>) {
    (vec![-1.0, 0.0, 1.0], vec![1.0, 2.0, 1.0])
}
