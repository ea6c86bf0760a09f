//! On-disk logo asset handling

pub mod raster;
pub mod store;

pub use raster::{ImageRasterizer, Rasterizer};
pub use store::AssetStore;
