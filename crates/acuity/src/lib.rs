#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

#[doc(inline)]
pub use acuity_image as image;

#[doc(inline)]
pub use acuity_imgproc as imgproc;
