//! CSV Importer Module
//! Loads delimited text files into Polars DataFrames, sniffing the separator.

use polars::prelude::*;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use thiserror::Error;

/// Separators the sniffer considers, in preference order on ties.
const SEPARATOR_CANDIDATES: [u8; 4] = [b',', b';', b'\t', b'|'];

/// Lines inspected when sniffing the separator.
const SNIFF_LINES: usize = 16;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] PolarsError),
}

/// Loads CSV files with Polars, auto-detecting the field separator.
pub struct CsvImporter;

impl CsvImporter {
    /// Load a delimited text file into a DataFrame.
    ///
    /// The separator is inferred from file content, so semicolon- and
    /// tab-delimited exports load the same way comma files do.
    pub fn load(path: &Path) -> Result<DataFrame, LoaderError> {
        let separator = Self::detect_separator(path)?;

        let df = LazyCsvReader::new(path)
            .with_separator(separator)
            .with_infer_schema_length(Some(10000))
            .with_ignore_errors(true)
            .finish()?
            .collect()?;

        log::debug!(
            "loaded {} rows x {} columns from {} (separator {:?})",
            df.height(),
            df.width(),
            path.display(),
            separator as char
        );

        Ok(df)
    }

    /// Pick the most plausible separator from the first lines of the file.
    ///
    /// Each candidate is scored by its minimum per-line occurrence count; a
    /// separator that appears on every sampled line beats one that only shows
    /// up sporadically inside free text. Falls back to comma.
    fn detect_separator(path: &Path) -> Result<u8, LoaderError> {
        let reader = BufReader::new(File::open(path)?);

        let mut min_counts: [Option<usize>; SEPARATOR_CANDIDATES.len()] =
            [None; SEPARATOR_CANDIDATES.len()];
        let mut sampled = 0usize;

        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            for (i, &candidate) in SEPARATOR_CANDIDATES.iter().enumerate() {
                let count = line.bytes().filter(|&b| b == candidate).count();
                min_counts[i] = Some(match min_counts[i] {
                    Some(current) => current.min(count),
                    None => count,
                });
            }

            sampled += 1;
            if sampled >= SNIFF_LINES {
                break;
            }
        }

        let mut best = b',';
        let mut best_score = 0usize;
        for (i, &candidate) in SEPARATOR_CANDIDATES.iter().enumerate() {
            let score = min_counts[i].unwrap_or(0);
            if score > best_score {
                best = candidate;
                best_score = score;
            }
        }

        Ok(best)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(content: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.csv");
        let mut file = File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        (dir, path)
    }

    #[test]
    fn detects_comma() {
        let (_dir, path) = write_temp("a,b,c\n1,2,3\n4,5,6\n");
        assert_eq!(CsvImporter::detect_separator(&path).unwrap(), b',');
    }

    #[test]
    fn detects_semicolon() {
        let (_dir, path) = write_temp("a;b;c\n1;2;3\n4;5;6\n");
        assert_eq!(CsvImporter::detect_separator(&path).unwrap(), b';');
    }

    #[test]
    fn detects_tab() {
        let (_dir, path) = write_temp("a\tb\tc\n1\t2\t3\n");
        assert_eq!(CsvImporter::detect_separator(&path).unwrap(), b'\t');
    }

    #[test]
    fn defaults_to_comma_for_single_column() {
        let (_dir, path) = write_temp("header\nvalue\nother\n");
        assert_eq!(CsvImporter::detect_separator(&path).unwrap(), b',');
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = CsvImporter::load(Path::new("/nonexistent/never.csv")).unwrap_err();
        assert!(matches!(err, LoaderError::Io(_)));
    }

    #[test]
    fn loads_semicolon_file() {
        let (_dir, path) = write_temp(
            "Product_Category;Country;Revenue\nBikes;Germany;100.5\nClothing;France;20\n",
        );
        let df = CsvImporter::load(&path).unwrap();
        assert_eq!(df.height(), 2);
        assert_eq!(df.width(), 3);
        assert!(df.column("Revenue").is_ok());
    }
}
