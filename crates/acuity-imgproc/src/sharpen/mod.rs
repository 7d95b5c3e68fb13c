use serde::{Deserialize, Serialize};

mod clarity;
mod high_pass;
mod smart;
mod texture;
mod unsharp;

pub use clarity::{clarity, ClarityParams};
pub use high_pass::{high_pass_sharpen, HighPassParams};
pub use smart::{smart_sharpen, SmartSharpenParams};
pub use texture::{texture, TextureParams};
pub use unsharp::{unsharp_mask, UnsharpMaskParams};

/// Which channels the detail pass of a filter works on.
///
/// `LumaOnly` extracts and boosts detail on the luma plane and rescales RGB
/// proportionally afterwards, which avoids color halos at strong settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ChannelMode {
    /// Detail is extracted and recombined on all three channels.
    #[default]
    FullRgb,
    /// Detail is extracted on luma; RGB is rescaled by the luma ratio.
    LumaOnly,
}

/// Blend mode used to composite the high-pass gray layer over its base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BlendMode {
    /// Overlay compositing.
    #[default]
    Overlay,
    /// Soft-light compositing (simplified W3C formula).
    SoftLight,
}
