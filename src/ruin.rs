//! Per-file pipeline: convert fills to strokes, then optionally compare
//! the result against the original.

use std::path::{Path, PathBuf};
use std::time::Instant;
use pdfium_render::prelude::Pdfium;
use crate::color::StrokeColor;
use crate::error::Result;
use crate::files::output_path_for;
use crate::optical::{optical_compare, CompareOptions};
use crate::pdf::{convert_fill_to_stroke, StrokeOptions};
use crate::summary::{RuinedInfo, SummaryWriter};

/// Options shared by every file in a batch
#[derive(Debug, Clone, Default)]
pub struct RuinOptions {
    /// Stroke color for converted operators
    pub color: Option<StrokeColor>,
    /// Compare each output with its input when set
    pub compare: Option<CompareOptions>,
    /// Only compare the pages the converter changed
    pub changed_pages_only: bool,
}

/// Ruin one PDF and describe what happened
///
/// `pdfium` is required when `options.compare` is set.
pub fn ruin_file(
    input: &Path,
    output: &Path,
    options: &RuinOptions,
    pdfium: Option<&Pdfium>,
) -> Result<RuinedInfo> {
    if let Ok(metadata) = std::fs::metadata(input) {
        log::debug!(
            "Found file {:.2} MB: {}",
            metadata.len() as f64 / 1024.0 / 1024.0,
            input.display()
        );
    }

    let begin_modify = Instant::now();

    let report = convert_fill_to_stroke(&StrokeOptions {
        input_path: input.to_path_buf(),
        output_path: output.to_path_buf(),
        color: options.color,
    })?;

    let modify_time = begin_modify.elapsed().as_secs_f32();

    let mut info = RuinedInfo {
        file_name: input.display().to_string(),
        fill_rects_converted: report.replacements,
        modify_time,
        ..Default::default()
    };

    if let (Some(compare_options), Some(pdfium)) = (&options.compare, pdfium) {
        let begin_analyze = Instant::now();

        let mut compare_options = compare_options.clone();
        if options.changed_pages_only {
            compare_options.pages = Some(
                report
                    .pages_changed
                    .iter()
                    .map(|&page| page as usize - 1)
                    .collect(),
            );
        }

        let comparison = optical_compare(pdfium, input, output, &compare_options)?;

        info.max_difference = Some(comparison.max_difference);
        info.diff_pages = Some(comparison.pages_label());
        info.analyze_time = begin_analyze.elapsed().as_secs_f32();
    } else if options.compare.is_some() {
        log::warn!("Comparison requested without a renderer, skipping {}", input.display());
    }

    Ok(info)
}

/// Ruin every input into `out_dir`, writing one summary row per file
///
/// A file that fails is logged and recorded in the summary; the batch goes on.
/// Returns the number of files that failed.
pub fn ruin_batch(
    inputs: &[PathBuf],
    out_dir: &Path,
    options: &RuinOptions,
    pdfium: Option<&Pdfium>,
    summary: &mut SummaryWriter,
) -> Result<usize> {
    std::fs::create_dir_all(out_dir)?;

    let mut failures = 0;

    for (idx, input) in inputs.iter().enumerate() {
        log::info!("Processing file {}/{}: {}", idx + 1, inputs.len(), input.display());

        let result = output_path_for(input, out_dir)
            .and_then(|output| ruin_file(input, &output, options, pdfium));

        let info = match result {
            Ok(info) => info,
            Err(e) => {
                log::error!("Failed to process {}: {}", input.display(), e);
                failures += 1;
                RuinedInfo::failed(input.display().to_string(), e)
            }
        };

        summary.write(&info)?;
    }

    Ok(failures)
}
