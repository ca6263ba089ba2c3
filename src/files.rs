//! Input file discovery

use std::path::{Path, PathBuf};
use glob::glob;
use crate::error::{Error, Result};

/// Resolve the PDFs to process from a file, directory or glob pattern
///
/// - a directory yields every `*.pdf` below it, recursively
/// - a pattern containing `*`, `?` or `[` is expanded with glob
/// - anything else is taken as a single file, which must exist
///
/// Results are sorted for a stable processing order.
pub fn collect_pdf_inputs(input: &str) -> Result<Vec<PathBuf>> {
    let path = Path::new(input);

    let mut paths = if path.is_dir() {
        // Directory names may contain glob metacharacters such as `[`
        let root = glob::Pattern::escape(&path.to_string_lossy());
        let pattern = Path::new(&root).join("**").join("*.pdf");
        expand_glob(&pattern.to_string_lossy())?
    } else if is_glob_pattern(input) {
        let paths = expand_glob(input)?;
        if paths.is_empty() {
            return Err(Error::NoFilesMatched(input.to_string()));
        }
        paths
    } else if path.exists() {
        vec![path.to_path_buf()]
    } else {
        return Err(Error::FileNotFound(path.to_path_buf()));
    };

    paths.sort();
    Ok(paths)
}

fn is_glob_pattern(s: &str) -> bool {
    s.contains('*') || s.contains('?') || s.contains('[')
}

fn expand_glob(pattern: &str) -> Result<Vec<PathBuf>> {
    let entries = glob(pattern).map_err(|e| Error::InvalidGlob(format!("{}: {}", pattern, e)))?;

    let mut paths = Vec::new();
    for entry in entries {
        match entry {
            Ok(path) if path.is_file() => paths.push(path),
            Ok(_) => {}
            Err(e) => log::warn!("glob error for {}: {}", pattern, e),
        }
    }

    Ok(paths)
}

/// Where the converted copy of `input` goes inside `out_dir`
pub fn output_path_for(input: &Path, out_dir: &Path) -> Result<PathBuf> {
    let file_name = input
        .file_name()
        .ok_or_else(|| Error::General(format!("Not a file path: {}", input.display())))?;
    Ok(out_dir.join(file_name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"%PDF-1.5\n").unwrap();
    }

    #[test]
    fn test_directory_is_searched_recursively() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        touch(&root.join("b.pdf"));
        touch(&root.join("a.pdf"));
        touch(&root.join("nested").join("c.pdf"));
        touch(&root.join("notes.txt"));

        let files = collect_pdf_inputs(root.to_str().unwrap()).unwrap();

        assert_eq!(
            files,
            vec![
                root.join("a.pdf"),
                root.join("b.pdf"),
                root.join("nested").join("c.pdf"),
            ]
        );
    }

    #[test]
    fn test_directory_name_with_glob_characters() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path().join("set[1]");
        touch(&root.join("a.pdf"));
        touch(&root.join("deeper").join("b.pdf"));

        let files = collect_pdf_inputs(root.to_str().unwrap()).unwrap();

        assert_eq!(files, vec![root.join("a.pdf"), root.join("deeper").join("b.pdf")]);
    }

    #[test]
    fn test_single_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let file = temp_dir.path().join("one.pdf");
        touch(&file);

        let files = collect_pdf_inputs(file.to_str().unwrap()).unwrap();
        assert_eq!(files, vec![file]);
    }

    #[test]
    fn test_missing_file() {
        let result = collect_pdf_inputs("does-not-exist.pdf");
        assert!(matches!(result.unwrap_err(), Error::FileNotFound(_)));
    }

    #[test]
    fn test_glob_without_matches() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let pattern = temp_dir.path().join("*.pdf");

        let result = collect_pdf_inputs(pattern.to_str().unwrap());
        assert!(matches!(result.unwrap_err(), Error::NoFilesMatched(_)));
    }

    #[test]
    fn test_output_path_for() {
        let out = output_path_for(Path::new("in/deep/report.pdf"), Path::new("ruined")).unwrap();
        assert_eq!(out, PathBuf::from("ruined/report.pdf"));
    }
}
