//! PDF page counting

use std::path::Path;
use lopdf::Document;
use crate::error::{Error, Result};

/// Count the pages of a PDF file
///
/// Used to check that two documents line up before comparing them.
pub fn count_pages(path: &Path) -> Result<usize> {
    if !path.exists() {
        return Err(Error::FileNotFound(path.to_path_buf()));
    }

    let doc = Document::load(path).map_err(|source| Error::DocumentOpen {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(doc.get_pages().len())
}

/// Fail unless both PDFs have the same number of pages
pub fn ensure_same_page_count(before: &Path, after: &Path) -> Result<usize> {
    let before_pages = count_pages(before)?;
    let after_pages = count_pages(after)?;

    if before_pages != after_pages {
        return Err(Error::General(format!(
            "Page count mismatch: {} has {} pages, {} has {} pages",
            before.display(),
            before_pages,
            after.display(),
            after_pages
        )));
    }

    Ok(before_pages)
}
