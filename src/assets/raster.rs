//! Vector-to-raster conversion seam
//!
//! Conversion is an external collaborator as far as the pipeline is
//! concerned: the asset-directory adapter hands it bytes and either
//! gets raster bytes back or skips that asset's logo entry. The
//! bundled [`ImageRasterizer`] covers raster inputs (re-encoding to
//! PNG via the `image` crate); true vector formats need a real
//! converter injected behind the same trait.

use std::io::Cursor;

use image::ImageFormat;

use crate::errors::SourceError;

/// Converts image bytes to PNG bytes. A failure means the single
/// asset is skipped, never the run.
pub trait Rasterizer: Send + Sync {
    fn rasterize(&self, input: &[u8], asset_name: &str) -> Result<Vec<u8>, SourceError>;
}

/// `image`-crate backed rasterizer.
///
/// Decodes any raster format the crate understands and re-encodes to
/// PNG. SVG and other vector bytes are not decodable and come back as
/// a conversion failure.
#[derive(Debug, Default, Clone)]
pub struct ImageRasterizer;

impl Rasterizer for ImageRasterizer {
    fn rasterize(&self, input: &[u8], asset_name: &str) -> Result<Vec<u8>, SourceError> {
        let decoded = image::load_from_memory(input)
            .map_err(|e| SourceError::conversion(asset_name, e.to_string()))?;

        let mut out = Cursor::new(Vec::new());
        decoded
            .write_to(&mut out, ImageFormat::Png)
            .map_err(|e| SourceError::conversion(asset_name, e.to_string()))?;
        Ok(out.into_inner())
    }
}
