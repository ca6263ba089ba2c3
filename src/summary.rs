//! Per-file summary records and the `summary.csv` writer

use std::fs::File;
use std::path::Path;
use serde::Serialize;
use crate::error::Result;

/// One row of `summary.csv`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RuinedInfo {
    #[serde(rename = "filename")]
    pub file_name: String,
    /// Number of fill operators turned into strokes
    pub fill_rects_converted: usize,
    /// Largest optical difference ratio, empty when comparison is off
    pub max_difference: Option<f64>,
    /// Comma separated page numbers that differ, empty when comparison is off
    pub diff_pages: Option<String>,
    /// Seconds spent converting
    pub modify_time: f32,
    /// Seconds spent comparing
    pub analyze_time: f32,
    /// Why the file could not be processed
    pub error: Option<String>,
}

impl RuinedInfo {
    /// Row for a file that failed before producing any results
    pub fn failed(file_name: impl Into<String>, error: impl ToString) -> Self {
        Self {
            file_name: file_name.into(),
            error: Some(error.to_string()),
            ..Default::default()
        }
    }
}

/// Writes summary rows as they are produced
///
/// Every row is flushed right away so an interrupted batch still leaves a
/// usable summary behind.
pub struct SummaryWriter {
    writer: csv::Writer<File>,
}

impl SummaryWriter {
    pub fn create(path: &Path) -> Result<Self> {
        Ok(Self {
            writer: csv::Writer::from_path(path)?,
        })
    }

    pub fn write(&mut self, info: &RuinedInfo) -> Result<()> {
        self.writer.serialize(info)?;
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_summary_rows() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("summary.csv");

        let mut writer = SummaryWriter::create(&path).unwrap();
        writer
            .write(&RuinedInfo {
                file_name: "a.pdf".to_string(),
                fill_rects_converted: 12,
                max_difference: Some(0.5),
                diff_pages: Some("2,5".to_string()),
                modify_time: 0.25,
                analyze_time: 1.5,
                error: None,
            })
            .unwrap();
        writer
            .write(&RuinedInfo {
                file_name: "b.pdf".to_string(),
                fill_rects_converted: 3,
                ..Default::default()
            })
            .unwrap();
        writer.write(&RuinedInfo::failed("c.pdf", "broken")).unwrap();
        drop(writer);

        let written = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = written.lines().collect();
        assert_eq!(
            lines,
            vec![
                "filename,fill_rects_converted,max_difference,diff_pages,modify_time,analyze_time,error",
                "a.pdf,12,0.5,\"2,5\",0.25,1.5,",
                "b.pdf,3,,,0.0,0.0,",
                "c.pdf,0,,,0.0,0.0,broken",
            ]
        );
    }
}
