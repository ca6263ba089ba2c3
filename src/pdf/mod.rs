//! PDF content stream manipulation module

pub mod content;
pub mod metadata;
pub mod stroke;

// Re-export commonly used items
pub use content::{rewrite_paint_operators, PaintOperator, Rewrite};
pub use metadata::{count_pages, ensure_same_page_count};
pub use stroke::{convert_document, convert_fill_to_stroke, StrokeOptions, StrokeReport};
