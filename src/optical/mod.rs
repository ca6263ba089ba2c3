//! Optical (pixel level) comparison of PDF renderings

pub mod compare;
pub mod diff;
pub mod render;

// Re-export commonly used items
pub use compare::{
    compare_rasterized, diff_image_path, optical_compare, score_page, CompareOptions,
    Comparison, PageDifference, DEFAULT_MIN_AVERAGE_DIFFERENCE,
};
pub use render::{bind_pdfium, PageRasterizer, PdfiumRasterizer};
