//! Optical comparison of two PDFs, page by page

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use image::RgbImage;
use pdfium_render::prelude::Pdfium;
use crate::error::{Error, Result};
use crate::optical::diff::{average_intensity, bounding_box, shake_map, subtract};
use crate::optical::render::{PageRasterizer, PdfiumRasterizer};

/// Pages whose score is below this ratio are treated as noise
pub const DEFAULT_MIN_AVERAGE_DIFFERENCE: f64 = 0.05 / 100.0;

/// Options for an optical comparison
#[derive(Debug, Clone)]
pub struct CompareOptions {
    /// Minimum shake-map average (0.0..1.0) for a page to count as different
    pub min_average_difference: f64,
    /// 0-based page indices to compare; all common pages when `None`
    pub pages: Option<Vec<usize>>,
    /// Write `<after>_diff<page>.png` for every page reported as different
    pub save_diff_images: bool,
    /// Render scale passed to the rasterizer; renderer default when `None`
    pub render_scale: Option<f32>,
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self {
            min_average_difference: DEFAULT_MIN_AVERAGE_DIFFERENCE,
            pages: None,
            save_diff_images: true,
            render_scale: None,
        }
    }
}

/// Outcome of comparing two documents
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Comparison {
    /// Highest page score, 0.0 when nothing was reported
    pub max_difference: f64,
    /// 1-based numbers of the reported pages, in comparison order
    pub pages: Vec<usize>,
    /// `(page number, score)` for every reported page
    pub page_scores: Vec<(usize, f64)>,
}

impl Comparison {
    fn from_scores(page_scores: Vec<(usize, f64)>) -> Self {
        if page_scores.is_empty() {
            return Self::default();
        }

        let max_difference = page_scores
            .iter()
            .map(|&(_, score)| score)
            .fold(0.0, f64::max);

        Self {
            max_difference,
            pages: page_scores.iter().map(|&(page, _)| page).collect(),
            page_scores,
        }
    }

    /// Reported page numbers joined with commas, e.g. `"2,5"`
    pub fn pages_label(&self) -> String {
        self.pages
            .iter()
            .map(|page| page.to_string())
            .collect::<Vec<_>>()
            .join(",")
    }

    pub fn has_differences(&self) -> bool {
        !self.pages.is_empty()
    }
}

/// Difference between two renderings of the same page
#[derive(Debug, Clone)]
pub struct PageDifference {
    /// `after - before`, floored at zero
    pub diff: RgbImage,
    /// Average intensity of the shake map, `None` when the shake map is empty
    pub score: Option<f64>,
}

/// Score two rasters of one page
///
/// `page_number` is only used for error reporting.
pub fn score_page(before: &RgbImage, after: &RgbImage, page_number: usize) -> Result<PageDifference> {
    if before.dimensions() != after.dimensions() {
        return Err(Error::DimensionMismatch {
            page: page_number,
            before: before.dimensions(),
            after: after.dimensions(),
        });
    }

    let diff = subtract(after, before);
    let shake = shake_map(&diff);

    let score = bounding_box(&shake).map(|_| average_intensity(&shake));

    Ok(PageDifference { diff, score })
}

/// Where the raw diff of a page is written: `<after>_diff<page>.png`
pub fn diff_image_path(after_path: &Path, page_number: usize) -> PathBuf {
    let mut name = OsString::from(after_path.as_os_str());
    name.push(format!("_diff{}.png", page_number));
    PathBuf::from(name)
}

/// Render both PDFs with pdfium and compare them
///
/// The documents are expected to share page count and page sizes, for
/// example an original and its converted copy.
///
/// # Example
///
/// ```no_run
/// use pdf_ruiner::optical::{bind_pdfium, optical_compare, CompareOptions};
/// use std::path::Path;
///
/// let pdfium = bind_pdfium().expect("pdfium not available");
/// let comparison = optical_compare(
///     &pdfium,
///     Path::new("input.pdf"),
///     Path::new("ruined/input.pdf"),
///     &CompareOptions::default(),
/// ).expect("Failed to compare");
///
/// println!("pages {} differ by up to {:.2}%",
///     comparison.pages_label(), comparison.max_difference * 100.0);
/// ```
pub fn optical_compare(
    pdfium: &Pdfium,
    before_path: &Path,
    after_path: &Path,
    options: &CompareOptions,
) -> Result<Comparison> {
    let before = PdfiumRasterizer::open(pdfium, before_path)?.with_scale(options.render_scale);
    let after = PdfiumRasterizer::open(pdfium, after_path)?.with_scale(options.render_scale);

    compare_rasterized(&before, &after, after_path, options)
}

/// Compare two documents through their rasterizers
///
/// Diff images are named after `after_path`.
pub fn compare_rasterized<B, A>(
    before: &B,
    after: &A,
    after_path: &Path,
    options: &CompareOptions,
) -> Result<Comparison>
where
    B: PageRasterizer + ?Sized,
    A: PageRasterizer + ?Sized,
{
    let page_count = before.page_count().min(after.page_count());
    let indices: Vec<usize> = match &options.pages {
        Some(pages) => pages.iter().copied().filter(|&i| i < page_count).collect(),
        None => (0..page_count).collect(),
    };

    let mut page_scores = Vec::new();

    for index in indices {
        let page_number = index + 1;

        let before_image = before.render_page(index)?;
        let after_image = after.render_page(index)?;

        let difference = score_page(&before_image, &after_image, page_number)?;

        let score = match difference.score {
            Some(score) if score >= options.min_average_difference => score,
            _ => continue,
        };

        if options.save_diff_images {
            difference.diff.save(diff_image_path(after_path, page_number))?;
        }

        log::info!(
            "Difference found on page {}: {:.2}%",
            page_number,
            score * 100.0
        );
        page_scores.push((page_number, score));
    }

    let comparison = Comparison::from_scores(page_scores);
    if comparison.has_differences() {
        log::info!(
            "{} page(s) differ, maximum difference {:.2}%",
            comparison.pages.len(),
            comparison.max_difference * 100.0
        );
    }

    Ok(comparison)
}
