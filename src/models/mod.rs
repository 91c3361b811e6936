//! Core data structures (rectangles, regions, blobs, masks, images)

pub mod blob;
pub mod image;
pub mod mask;
pub mod rect;
pub mod region;

pub use blob::TextBlob;
pub use image::{PixelFormat, RasterImage};
pub use mask::BinaryMask;
pub use rect::Rect;
pub use region::{CandidateRegion, RegionSource, RegionType, TemplateRegion};
