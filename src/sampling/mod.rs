//! Patch sampling
//!
//! Raw per-pixel channel triplets from the external pixel extractor are
//! turned into one averaged color and one noise figure per patch.

pub mod dump;
pub mod sampler;
pub mod source;
pub mod window;

pub use dump::parse_pixel_dump;
pub use sampler::{PatchSample, PatchSampler};
pub use source::{PixelSource, RecordedPixels};
pub use window::SampleWindow;

/// One pixel as delivered by the extractor: three raw channel codes
pub type RawPixel = [f64; 3];
