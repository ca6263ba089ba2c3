//! PDF Ruiner Library
//!
//! Ruins PDF files in a terrible way, then checks how badly. This library
//! provides functionality to:
//! - Turn every fill paint operator into a stroke, optionally recolored
//! - Render two PDFs and find pages that visually differ
//! - Run both over a batch of files and write a CSV summary
//!
//! # Example
//!
//! ```no_run
//! use pdf_ruiner::pdf::{StrokeOptions, convert_fill_to_stroke};
//! use std::path::PathBuf;
//!
//! let options = StrokeOptions {
//!     input_path: PathBuf::from("handout.pdf"),
//!     output_path: PathBuf::from("ruined/handout.pdf"),
//!     color: None,
//! };
//!
//! let report = convert_fill_to_stroke(&options).expect("Failed to convert");
//! println!("{} fills converted", report.replacements);
//! ```

pub mod color;
pub mod error;
pub mod files;
pub mod optical;
pub mod pdf;
pub mod ruin;
pub mod summary;

// Re-export commonly used items
pub use error::{Error, Result};
