//! Run statistics
//!
//! Counters collected by the coordinator during a run, logged at the end
//! and printed by the CLI.

/// Counters for a single migration run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Distinct URLs found by discovery
    pub discovered: usize,

    /// Pages fetched and extracted
    pub extracted: usize,

    /// Pages dropped after exhausting retries
    pub failed: usize,

    /// Content documents written
    pub documents_written: usize,

    /// Images stored under the public directory
    pub images_downloaded: usize,

    /// Images that could not be fetched or stored
    pub images_failed: usize,
}

impl RunSummary {
    /// Percentage of discovered pages that were extracted
    pub fn success_rate(&self) -> f64 {
        let attempted = self.extracted + self.failed;
        if attempted == 0 {
            0.0
        } else {
            (self.extracted as f64 / attempted as f64) * 100.0
        }
    }

    /// Emits the summary through `tracing`
    pub fn log(&self) {
        tracing::info!(
            "Run finished: {} discovered, {} extracted, {} failed, {} documents, {} images ({} failed)",
            self.discovered,
            self.extracted,
            self.failed,
            self.documents_written,
            self.images_downloaded,
            self.images_failed
        );
    }
}

/// Prints the summary to stdout in a formatted manner
pub fn print_summary(summary: &RunSummary) {
    println!("=== Migration Summary ===\n");

    println!("Pages:");
    println!("  Discovered: {}", summary.discovered);
    println!("  Extracted: {}", summary.extracted);
    println!("  Failed: {}", summary.failed);
    println!("  Success rate: {:.1}%", summary.success_rate());
    println!();

    println!("Artifacts:");
    println!("  Documents written: {}", summary.documents_written);
    println!("  Images downloaded: {}", summary.images_downloaded);
    if summary.images_failed > 0 {
        println!("  Images failed: {}", summary.images_failed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_rate() {
        let summary = RunSummary {
            extracted: 9,
            failed: 1,
            ..Default::default()
        };
        assert!((summary.success_rate() - 90.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_success_rate_empty_run() {
        assert_eq!(RunSummary::default().success_rate(), 0.0);
    }
}
