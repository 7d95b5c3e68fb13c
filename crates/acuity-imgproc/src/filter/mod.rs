/// kernel generators.
pub mod kernels;

mod ops;
mod separable;

pub use ops::{box_filter, gaussian_blur};
pub use separable::{separable_filter, separable_filter_with_strategy};
