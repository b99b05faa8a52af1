//! The harvest pipeline: fetch the index page, extract links, resolve them,
//! then download each file in order.
//!
//! Everything runs sequentially on the caller's task. The first failure of
//! any step is returned as-is and nothing after it is attempted.

use tracing::{debug, info, instrument};

use crate::config::HarvestConfig;
use crate::download::{DownloadError, DownloadTarget, HttpClient, plan_targets};
use crate::markup::extract_links;

/// Receives progress notifications while a harvest runs.
///
/// All methods default to doing nothing.
pub trait ProgressReporter {
    /// The index page request is about to be sent.
    fn page_started(&self, _url: &str) {}

    /// The index page arrived.
    fn page_fetched(&self, _url: &str, _bytes: usize) {}

    /// A file download is about to start.
    fn file_started(&self, _target: &DownloadTarget) {}

    /// A file was written to disk.
    fn file_saved(&self, _target: &DownloadTarget, _bytes: u64) {}
}

/// Reporter that ignores every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {}

/// Links found on the index page and where each will be written.
#[derive(Debug, Clone)]
pub struct HarvestPlan {
    /// Links exactly as they appeared in the page, deduplicated.
    pub links: Vec<String>,
    /// One target per link, same order.
    pub targets: Vec<DownloadTarget>,
}

/// Outcome of a completed run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HarvestReport {
    /// Qualifying links found on the index page.
    pub links_found: usize,
    /// Files written.
    pub files_written: usize,
    /// Total bytes written across all files.
    pub bytes_written: u64,
}

/// Runs harvests for one configuration.
#[derive(Debug, Clone)]
pub struct Harvester {
    config: HarvestConfig,
    client: HttpClient,
}

impl Harvester {
    /// Creates a harvester with an HTTP client built from the configured timeouts.
    #[must_use]
    pub fn new(config: HarvestConfig) -> Self {
        let client = HttpClient::with_timeouts(config.timeouts);
        Self { config, client }
    }

    /// Creates a harvester around an existing client.
    #[must_use]
    pub fn with_client(config: HarvestConfig, client: HttpClient) -> Self {
        Self { config, client }
    }

    /// The configuration this harvester runs with.
    #[must_use]
    pub fn config(&self) -> &HarvestConfig {
        &self.config
    }

    /// Fetches the index page and works out what would be downloaded.
    ///
    /// # Errors
    ///
    /// Returns an error if the page cannot be fetched or a link cannot be
    /// turned into a target.
    #[instrument(skip(self, progress), fields(page = %self.config.page_url))]
    pub async fn plan(&self, progress: &dyn ProgressReporter) -> Result<HarvestPlan, DownloadError> {
        let page_url = self.config.page_url.as_str();
        progress.page_started(page_url);
        let page = self.client.fetch_bytes(page_url).await?;
        progress.page_fetched(page_url, page.len());

        let links = extract_links(
            &page,
            &self.config.extensions,
            self.config.max_parse_recoveries,
        );
        info!(
            links = links.len(),
            extensions = %self.config.extensions,
            "extracted links"
        );

        let targets = plan_targets(&self.config.page_url, &links, &self.config.output_dir)?;
        for target in &targets {
            debug!(url = %target.url, path = %target.path.display(), "planned download");
        }
        Ok(HarvestPlan { links, targets })
    }

    /// Fetches the index page and downloads every qualifying file.
    ///
    /// # Errors
    ///
    /// Returns the first network, filesystem or resolution error. Files
    /// written before the failure are left in place.
    pub async fn run(&self, progress: &dyn ProgressReporter) -> Result<HarvestReport, DownloadError> {
        let plan = self.plan(progress).await?;
        let mut report = HarvestReport {
            links_found: plan.links.len(),
            ..HarvestReport::default()
        };

        for target in &plan.targets {
            progress.file_started(target);
            let bytes = self
                .client
                .download_to_path(&target.url, &target.path)
                .await?;
            progress.file_saved(target, bytes);
            report.files_written += 1;
            report.bytes_written += bytes;
        }

        info!(
            files = report.files_written,
            bytes = report.bytes_written,
            "harvest complete"
        );
        Ok(report)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::config::ExtensionFilter;

    use tempfile::TempDir;
    use url::Url;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[derive(Default)]
    struct RecordingProgress {
        events: RefCell<Vec<String>>,
    }

    impl ProgressReporter for RecordingProgress {
        fn page_started(&self, _url: &str) {
            self.events.borrow_mut().push("page".to_string());
        }

        fn page_fetched(&self, _url: &str, _bytes: usize) {
            self.events.borrow_mut().push("page ok".to_string());
        }

        fn file_started(&self, target: &DownloadTarget) {
            self.events
                .borrow_mut()
                .push(format!("file {}", target.file_name));
        }

        fn file_saved(&self, target: &DownloadTarget, bytes: u64) {
            self.events
                .borrow_mut()
                .push(format!("saved {} {bytes}", target.file_name));
        }
    }

    async fn serve(server: &MockServer, route: &str, body: &str) {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(server)
            .await;
    }

    fn harvester_for(server: &MockServer, dir: &TempDir) -> Harvester {
        let page_url = Url::parse(&format!("{}/docs/index.html", server.uri())).unwrap();
        Harvester::new(HarvestConfig::new(
            page_url,
            dir.path(),
            ExtensionFilter::single(".pdf"),
        ))
    }

    #[tokio::test]
    async fn test_plan_resolves_relative_links() {
        let server = MockServer::start().await;
        serve(
            &server,
            "/docs/index.html",
            r#"<a href="files/a.pdf">a</a><a href="/b.pdf">b</a><a href="c.txt">c</a>"#,
        )
        .await;
        let dir = TempDir::new().unwrap();

        let plan = harvester_for(&server, &dir)
            .plan(&SilentProgress)
            .await
            .unwrap();
        assert_eq!(plan.links, vec!["files/a.pdf", "/b.pdf"]);
        assert_eq!(
            plan.targets[0].url,
            format!("{}/docs/files/a.pdf", server.uri())
        );
        assert_eq!(plan.targets[1].url, format!("{}/b.pdf", server.uri()));
        assert_eq!(plan.targets[1].path, dir.path().join("b.pdf"));
        // planning writes nothing
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_run_reports_progress_in_order() {
        let server = MockServer::start().await;
        serve(
            &server,
            "/docs/index.html",
            r#"<a href="one.pdf"></a><a href="two.pdf"></a>"#,
        )
        .await;
        serve(&server, "/docs/one.pdf", "1").await;
        serve(&server, "/docs/two.pdf", "22").await;
        let dir = TempDir::new().unwrap();
        let progress = RecordingProgress::default();

        let report = harvester_for(&server, &dir).run(&progress).await.unwrap();

        assert_eq!(
            report,
            HarvestReport {
                links_found: 2,
                files_written: 2,
                bytes_written: 3,
            }
        );
        assert_eq!(
            *progress.events.borrow(),
            vec![
                "page",
                "page ok",
                "file one.pdf",
                "saved one.pdf 1",
                "file two.pdf",
                "saved two.pdf 2",
            ]
        );
    }

    #[tokio::test]
    async fn test_page_failure_aborts_before_extraction() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/docs/index.html"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;
        let dir = TempDir::new().unwrap();
        let progress = RecordingProgress::default();

        let err = harvester_for(&server, &dir)
            .run(&progress)
            .await
            .unwrap_err();
        assert!(
            matches!(err, DownloadError::HttpStatus { status: 503, .. }),
            "got {err:?}"
        );
        assert_eq!(*progress.events.borrow(), vec!["page"]);
    }
}
