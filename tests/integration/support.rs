//! Mock-site helpers shared by the integration tests

use kanoon_indexer::config::{Config, CrawlerConfig};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

/// Creates a test configuration pointed at the mock server
pub fn create_test_config(base_url: &str, links_dir: &Path) -> Config {
    let mut config = Config::default();
    config.site.base_url = base_url.to_string();
    config.crawler = CrawlerConfig {
        politeness_delay_ms: 0, // No waiting in tests
        max_retries: 0,
        retry_backoff_ms: 10,
        ..CrawlerConfig::default()
    };
    config.output.links_dir = links_dir.to_path_buf();
    config
}

/// Wraps anchors in a minimal page
pub fn page(links: &[(&str, &str)]) -> String {
    let anchors: String = links
        .iter()
        .map(|(href, text)| format!(r#"<li><a href="{}">{}</a></li>"#, href, text))
        .collect();
    format!(
        "<html><head><title>Listing</title></head><body><ul>{}</ul></body></html>",
        anchors
    )
}

/// A month page listing court fragment links for the given ids
pub fn court_results(ids: &[u64]) -> String {
    let links: Vec<(String, String)> = ids
        .iter()
        .map(|id| {
            (
                format!("/docfragment/{}/?formInput=doctypes:supremecourt", id),
                format!("Judgment {}", id),
            )
        })
        .collect();
    let borrowed: Vec<(&str, &str)> = links
        .iter()
        .map(|(href, text)| (href.as_str(), text.as_str()))
        .collect();
    page(&borrowed)
}

/// A month page with no document links
pub fn empty_results() -> String {
    page(&[("/browse/", "Back to listing")])
}

/// Mounts a GET mock for a path
pub async fn mount_path(server: &MockServer, at: &str, body: String, expected: u64) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(expected)
        .mount(server)
        .await;
}

/// Mounts a GET mock for one page of a month's search results
pub async fn mount_month_page(
    server: &MockServer,
    form_input: &str,
    page_num: u32,
    body: String,
    expected: u64,
) {
    Mock::given(method("GET"))
        .and(path("/search/"))
        .and(query_param("formInput", form_input))
        .and(query_param("pagenum", page_num.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(expected)
        .mount(server)
        .await;
}

/// Serves a page and raises a flag, like Ctrl-C arriving mid-request
pub struct RaiseFlag {
    pub flag: Arc<AtomicBool>,
    pub body: String,
}

impl Respond for RaiseFlag {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        self.flag.store(true, Ordering::Relaxed);
        ResponseTemplate::new(200).set_body_string(self.body.clone())
    }
}

/// Mounts a month page whose response raises `flag`
pub async fn mount_month_page_raising(
    server: &MockServer,
    form_input: &str,
    page_num: u32,
    responder: RaiseFlag,
) {
    Mock::given(method("GET"))
        .and(path("/search/"))
        .and(query_param("formInput", form_input))
        .and(query_param("pagenum", page_num.to_string()))
        .respond_with(responder)
        .expect(1)
        .mount(server)
        .await;
}

/// Mounts a GET mock for a month page that answers with an HTTP status
pub async fn mount_month_status(server: &MockServer, form_input: &str, page_num: u32, status: u16) {
    Mock::given(method("GET"))
        .and(path("/search/"))
        .and(query_param("formInput", form_input))
        .and(query_param("pagenum", page_num.to_string()))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

/// Every request the mock server has seen so far
pub async fn received(server: &MockServer) -> Vec<Request> {
    server
        .received_requests()
        .await
        .expect("request recording is enabled")
}

/// Requests for one month's result pages
pub async fn month_requests(server: &MockServer, form_input: &str) -> usize {
    received(server)
        .await
        .iter()
        .filter(|req| req.url.path() == "/search/")
        .filter(|req| {
            req.url
                .query_pairs()
                .any(|(k, v)| k == "formInput" && v == form_input)
        })
        .count()
}
