//! Page rasterization
//!
//! The comparator only needs "give me page N as RGB", so rendering sits behind
//! [`PageRasterizer`]. Production code renders with pdfium.

use std::path::Path;
use image::RgbImage;
use pdfium_render::prelude::*;
use crate::error::{Error, Result};

/// Directory searched for a bundled pdfium library before the system one
pub const PDFIUM_LIBRARY_DIR: &str = "./lib";

/// Something that can render the pages of one document to RGB rasters
///
/// Rendering the same page twice must produce the same raster.
pub trait PageRasterizer {
    /// Number of pages in the document
    fn page_count(&self) -> usize;

    /// Render the page at 0-based `index`
    fn render_page(&self, index: usize) -> Result<RgbImage>;
}

/// Bind pdfium, preferring a library in [`PDFIUM_LIBRARY_DIR`]
pub fn bind_pdfium() -> Result<Pdfium> {
    let bindings = Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(
        PDFIUM_LIBRARY_DIR,
    ))
    .or_else(|_| Pdfium::bind_to_system_library())?;

    Ok(Pdfium::new(bindings))
}

/// Renders the pages of a PDF loaded into pdfium
pub struct PdfiumRasterizer<'a> {
    document: PdfDocument<'a>,
    scale: Option<f32>,
}

impl<'a> PdfiumRasterizer<'a> {
    /// Load a PDF file for rendering
    pub fn open(pdfium: &'a Pdfium, path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::FileNotFound(path.to_path_buf()));
        }

        let document = pdfium.load_pdf_from_file(path, None)?;
        Ok(Self { document, scale: None })
    }

    /// Render at `scale` times the page size in points instead of the default
    pub fn with_scale(mut self, scale: Option<f32>) -> Self {
        self.scale = scale;
        self
    }

    fn render_config(&self) -> PdfRenderConfig {
        let config = PdfRenderConfig::new();
        match self.scale {
            Some(scale) => config.scale_page_by_factor(scale),
            None => config,
        }
    }
}

impl PageRasterizer for PdfiumRasterizer<'_> {
    fn page_count(&self) -> usize {
        self.document.pages().len() as usize
    }

    fn render_page(&self, index: usize) -> Result<RgbImage> {
        let page_index = PdfPageIndex::try_from(index)
            .map_err(|_| Error::General(format!("Page index out of range: {}", index)))?;

        let page = self.document.pages().get(page_index)?;
        let bitmap = page.render_with_config(&self.render_config())?;

        Ok(bitmap.as_image().to_rgb8())
    }
}
