//! Statistics reporting.

use std::path::Path;

use console::style;

use crate::dedup::ContentRecord;
use crate::media::mime;
use crate::scan::{FailureStage, RunStats};

/// Report rows, in print order.
const REPORTED_TYPES: &[(&str, &str)] = &[
    ("JPEG", mime::JPEG),
    ("NEF", mime::NEF),
    ("HEIC", mime::HEIC),
    ("GIF", mime::GIF),
    ("TIFF", mime::TIFF),
    ("BMP", mime::BMP),
    ("PNG", mime::PNG),
    ("WEBP", mime::WEBP),
    ("RTF", mime::RTF),
    ("AVI", mime::AVI),
    ("MP4", mime::MP4),
    ("QuickTime", mime::QUICKTIME),
    ("MP3", mime::MP3),
];

/// Summary of the dedup store contents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreReport {
    /// Number of distinct files recorded.
    pub records: u64,
    /// Sum of duplicate counters.
    pub duplicates: u64,
    /// Records whose capture time came from embedded metadata.
    pub with_exif: u64,
    /// Count per row of the type table, in print order.
    pub by_type: Vec<(&'static str, u64)>,
    /// Records whose type has no row.
    pub other: u64,
    /// JPEG and NEF records carrying a capture time.
    raw_and_jpeg_with_exif: u64,
}

impl StoreReport {
    pub fn from_records(records: &[ContentRecord]) -> Self {
        let mut report = StoreReport {
            records: records.len() as u64,
            by_type: REPORTED_TYPES.iter().map(|(label, _)| (*label, 0)).collect(),
            ..Default::default()
        };

        for record in records {
            report.duplicates += record.duplicates;
            if record.has_exif {
                report.with_exif += 1;
            }

            match REPORTED_TYPES
                .iter()
                .position(|(_, mime_type)| *mime_type == record.mime_type)
            {
                Some(row) => report.by_type[row].1 += 1,
                None => report.other += 1,
            }

            if record.has_exif && is_jpeg_or_nef(&record.mime_type) {
                report.raw_and_jpeg_with_exif += 1;
            }
        }

        report
    }

    /// Count for one row label, e.g. `"JPEG"`.
    pub fn count(&self, label: &str) -> u64 {
        self.by_type
            .iter()
            .find(|(row, _)| *row == label)
            .map(|(_, count)| *count)
            .unwrap_or(0)
    }

    /// Consistency problems worth pointing out.
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        let listed: u64 = self.by_type.iter().map(|(_, count)| count).sum();
        if listed != self.records {
            warnings.push(format!(
                "Total records ({}) != sum of listed types ({}); {} with other types",
                self.records, listed, self.other
            ));
        }

        let jpeg_and_nef = self.count("JPEG") + self.count("NEF");
        if self.raw_and_jpeg_with_exif < jpeg_and_nef {
            warnings.push(format!(
                "{} JPEG/NEF images with missing EXIF data detected",
                jpeg_and_nef - self.raw_and_jpeg_with_exif
            ));
        }

        warnings
    }
}

fn is_jpeg_or_nef(mime_type: &str) -> bool {
    mime_type == mime::JPEG || mime_type == mime::NEF
}

/// Print counters for the scan that just finished.
pub fn print_run_stats(stats: &RunStats, source: &Path, output: &Path) {
    println!();
    println!("{}", style("Scan Statistics:").bold());
    println!("  Input:       {}", source.display());
    println!("  Output:      {}", output.display());
    println!("  Processed:   {}", stats.files_processed());
    println!("  Originals:   {}", style(stats.originals).green());
    println!("  Duplicates:  {}", style(stats.duplicates).yellow());
    println!("  Skipped:     {}", stats.skipped());
    println!("  Unrecognized: {}", stats.unrecognized);

    let fallbacks: u64 = stats.fallbacks.values().sum();
    if fallbacks > 0 {
        println!("  Fallback names: {}", fallbacks);
        for (reason, count) in &stats.fallbacks {
            println!("    {}: {}", reason, count);
        }
    }

    if stats.total_failures() > 0 {
        println!("  Failed:      {}", style(stats.total_failures()).red());
        for stage in [
            FailureStage::Classify,
            FailureStage::Fingerprint,
            FailureStage::Naming,
            FailureStage::Copy,
        ] {
            let count = stats.failures_at(stage);
            if count > 0 {
                println!("    {}: {}", stage, count);
            }
        }
    }

    if stats.walk_errors > 0 {
        println!("  Walk errors: {}", style(stats.walk_errors).red());
    }
}

/// Print the store report, including consistency warnings.
pub fn print_store_report(report: &StoreReport) {
    println!();
    println!("{}", style("═".repeat(50)).dim());
    println!("{}", style("Store Statistics:").bold());
    println!("  Records:    {}", report.records);
    println!("  Duplicates: {}", report.duplicates);
    println!("  EXIF:       {}", report.with_exif);
    for (label, count) in &report.by_type {
        println!("  {:<10}  {}", format!("{}:", label), count);
    }
    if report.other > 0 {
        println!("  Other:      {}", report.other);
    }
    println!("{}", style("═".repeat(50)).dim());

    for warning in report.warnings() {
        println!("{} {}", style("WARNING:").yellow().bold(), warning);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::CaptureTime;

    fn record(md5: &str, mime_type: &str, capture: Option<i64>, duplicates: u64) -> ContentRecord {
        let mut record = ContentRecord::new(
            Path::new("/backups/x"),
            mime_type,
            md5.to_string(),
            format!("0000000000_{}_x", md5),
            capture.map(CaptureTime::from_epoch),
        );
        record.duplicates = duplicates;
        record
    }

    #[test]
    fn test_counts_by_type() {
        let records = vec![
            record("a", mime::JPEG, Some(1), 2),
            record("b", mime::JPEG, Some(2), 0),
            record("c", mime::NEF, Some(3), 1),
            record("d", mime::MP4, None, 0),
        ];
        let report = StoreReport::from_records(&records);

        assert_eq!(report.records, 4);
        assert_eq!(report.duplicates, 3);
        assert_eq!(report.with_exif, 3);
        assert_eq!(report.count("JPEG"), 2);
        assert_eq!(report.count("NEF"), 1);
        assert_eq!(report.count("MP4"), 1);
        assert_eq!(report.count("GIF"), 0);
        assert!(report.warnings().is_empty());
    }

    #[test]
    fn test_missing_exif_warning() {
        let records = vec![
            record("a", mime::JPEG, None, 0),
            record("b", mime::NEF, Some(3), 0),
        ];
        let warnings = StoreReport::from_records(&records).warnings();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("missing EXIF"));
    }

    #[test]
    fn test_unlisted_type_warning() {
        let records = vec![record("a", "video/mjpeg", None, 0)];
        let report = StoreReport::from_records(&records);
        assert_eq!(report.other, 1);
        assert_eq!(report.warnings().len(), 1);
    }

    #[test]
    fn test_empty_store() {
        let report = StoreReport::from_records(&[]);
        assert_eq!(report.records, 0);
        assert!(report.warnings().is_empty());
    }
}
