//! Error types for the PDF ruiner library

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the PDF ruiner library
#[derive(Error, Debug)]
pub enum Error {
    /// Source file could not be parsed as a PDF
    #[error("Could not open PDF {path:?}: {source}")]
    DocumentOpen {
        path: PathBuf,
        #[source]
        source: lopdf::Error,
    },

    /// PDF processing error
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    /// A single page's content could not be read or rewritten
    #[error("Page {page}: {reason}")]
    PageContent { page: u32, reason: String },

    /// Rendering a page (or binding pdfium) failed
    #[error("Render error: {0}")]
    Render(#[from] pdfium_render::prelude::PdfiumError),

    /// Two rasters being compared have different sizes
    #[error("Page {page}: raster size mismatch ({before:?} vs {after:?})")]
    DimensionMismatch {
        page: usize,
        before: (u32, u32),
        after: (u32, u32),
    },

    /// Image encoding error
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Summary writing error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Color is not a 6-digit hex code
    #[error("Invalid color (expected 6 hex digits like #FF0000): {0}")]
    InvalidColor(String),

    /// File not found
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Invalid glob pattern
    #[error("Invalid glob pattern: {0}")]
    InvalidGlob(String),

    /// No files matched pattern
    #[error("No PDF files found matching pattern: {0}")]
    NoFilesMatched(String),

    /// General error
    #[error("{0}")]
    General(String),
}
