//! Operator-facing progress lines on stdout.

use harvester_core::{DownloadTarget, ProgressReporter};

/// Prints a plain status line before and after each fetch.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleProgress;

impl ProgressReporter for ConsoleProgress {
    fn page_started(&self, url: &str) {
        println!("Retrieving startpage: {url}");
    }

    fn page_fetched(&self, _url: &str, _bytes: usize) {
        println!("Success");
    }

    fn file_started(&self, target: &DownloadTarget) {
        println!("Retrieving file {}", target.file_name);
    }

    fn file_saved(&self, _target: &DownloadTarget, _bytes: u64) {
        println!("Success");
    }
}
