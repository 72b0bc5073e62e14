//! End-to-end crawl tests against a mock listing site

use crate::support::*;
use kanoon_indexer::crawler::Coordinator;
use kanoon_indexer::state::{Collection, CrawlPhase, YearRange};
use kanoon_indexer::storage::{JsonResumeStore, ResumeStore, StoreError, YearIndex};
use kanoon_indexer::{CrawlStatus, IndexerError};
use std::sync::atomic::Ordering;
use tempfile::TempDir;
use wiremock::MockServer;

const COURT: &str = "Supreme Court";

/// Mounts the court root listing and the Supreme Court category page
async fn mount_court_listing(server: &MockServer, years: &[u16]) {
    let root = page(&[
        ("/browse/delhi/", "Delhi High Court"),
        ("/browse/supremecourt/", COURT),
        ("/browse/bombay/", "Bombay High Court"),
    ]);
    mount_path(server, "/browse/", root, 1).await;

    let year_links: Vec<(String, String)> = years
        .iter()
        .map(|y| (format!("/browse/supremecourt/{}/", y), y.to_string()))
        .collect();
    let borrowed: Vec<(&str, &str)> = year_links
        .iter()
        .map(|(h, t)| (h.as_str(), t.as_str()))
        .collect();
    mount_path(server, "/browse/supremecourt/", page(&borrowed), 1).await;
}

/// Mounts a year page with the given months plus a whole-year link
async fn mount_year_page(server: &MockServer, year: u16, months: &[&str], expected: u64) {
    let month_links: Vec<(String, String)> = months
        .iter()
        .map(|m| (format!("/search/?formInput={}-{}", year, m), m.to_string()))
        .chain(std::iter::once((
            format!("/search/?formInput={}-all", year),
            "Entire Year".to_string(),
        )))
        .collect();
    let borrowed: Vec<(&str, &str)> = month_links
        .iter()
        .map(|(h, t)| (h.as_str(), t.as_str()))
        .collect();
    mount_path(
        server,
        &format!("/browse/supremecourt/{}/", year),
        page(&borrowed),
        expected,
    )
    .await;
}

fn year_file(links_dir: &std::path::Path, year: u16) -> std::path::PathBuf {
    links_dir
        .join("Court_PDFs")
        .join(COURT)
        .join(format!("{}.json", year))
}

#[tokio::test]
async fn test_crawl_single_year_and_resume() {
    let server = MockServer::start().await;
    let links_dir = TempDir::new().unwrap();
    let uri = server.uri();

    mount_court_listing(&server, &[2019, 2020, 2021]).await;
    mount_year_page(&server, 2020, &["jan"], 1).await;
    mount_month_page(&server, "2020-jan", 0, court_results(&[101]), 1).await;
    mount_month_page(&server, "2020-jan", 1, court_results(&[102]), 1).await;
    mount_month_page(&server, "2020-jan", 2, empty_results(), 1).await;
    // The whole-year link must never be followed
    mount_month_page(&server, "2020-all", 0, court_results(&[999]), 0).await;

    let config = create_test_config(&uri, links_dir.path());
    let collection = Collection::court(COURT);
    let years = YearRange::single(2020).unwrap();

    let mut coordinator = Coordinator::new(config.clone()).unwrap();
    let outcome = coordinator.run(&collection, years).await.unwrap();

    assert_eq!(outcome.status, CrawlStatus::Completed);
    assert_eq!(outcome.crawled, vec![2020]);
    assert!(outcome.resumed.is_empty());
    assert_eq!(outcome.requests, 6);

    let raw = std::fs::read_to_string(year_file(links_dir.path(), 2020)).unwrap();
    assert_eq!(raw, format!(r#"["{0}/doc/101/","{0}/doc/102/"]"#, uri));

    // A second run finds the year stored and makes no request at all
    let before = received(&server).await.len();
    let mut coordinator = Coordinator::new(config).unwrap();
    let outcome = coordinator.run(&collection, years).await.unwrap();

    assert_eq!(outcome.status, CrawlStatus::Completed);
    assert_eq!(outcome.resumed, vec![2020]);
    assert!(outcome.crawled.is_empty());
    assert_eq!(outcome.requests, 0);
    assert_eq!(received(&server).await.len(), before);
    assert_eq!(outcome.years[&2020].len(), 2);
}

#[tokio::test]
async fn test_month_ends_at_first_empty_page() {
    let server = MockServer::start().await;
    let links_dir = TempDir::new().unwrap();

    mount_court_listing(&server, &[2020]).await;
    mount_year_page(&server, 2020, &["mar"], 1).await;
    mount_month_page(&server, "2020-mar", 0, court_results(&[1, 2]), 1).await;
    mount_month_page(&server, "2020-mar", 1, court_results(&[3]), 1).await;
    mount_month_page(&server, "2020-mar", 2, court_results(&[4, 5, 6]), 1).await;
    mount_month_page(&server, "2020-mar", 3, empty_results(), 1).await;
    mount_month_page(&server, "2020-mar", 4, court_results(&[7]), 0).await;

    let config = create_test_config(&server.uri(), links_dir.path());
    let mut coordinator = Coordinator::new(config).unwrap();
    let outcome = coordinator
        .run(&Collection::court(COURT), YearRange::single(2020).unwrap())
        .await
        .unwrap();

    assert_eq!(month_requests(&server, "2020-mar").await, 4);
    assert_eq!(outcome.years[&2020].len(), 6);
}

#[tokio::test]
async fn test_duplicates_across_months_are_kept() {
    let server = MockServer::start().await;
    let links_dir = TempDir::new().unwrap();

    mount_court_listing(&server, &[2020]).await;
    mount_year_page(&server, 2020, &["jan", "feb"], 1).await;
    mount_month_page(&server, "2020-jan", 0, court_results(&[7, 8]), 1).await;
    mount_month_page(&server, "2020-jan", 1, empty_results(), 1).await;
    mount_month_page(&server, "2020-feb", 0, court_results(&[8]), 1).await;
    mount_month_page(&server, "2020-feb", 1, empty_results(), 1).await;

    let config = create_test_config(&server.uri(), links_dir.path());
    let mut coordinator = Coordinator::new(config).unwrap();
    let outcome = coordinator
        .run(&Collection::court(COURT), YearRange::single(2020).unwrap())
        .await
        .unwrap();

    let urls = outcome.years[&2020].urls();
    assert_eq!(urls.len(), 3);
    assert_eq!(urls[1], urls[2]);
}

#[tokio::test]
async fn test_only_years_in_range_are_crawled() {
    let server = MockServer::start().await;
    let links_dir = TempDir::new().unwrap();

    mount_court_listing(&server, &[2018, 2019, 2020, 2022]).await;
    mount_year_page(&server, 2018, &["jan"], 0).await;
    mount_year_page(&server, 2019, &["jan"], 1).await;
    mount_year_page(&server, 2020, &["jan"], 1).await;
    mount_year_page(&server, 2022, &["jan"], 0).await;
    mount_month_page(&server, "2019-jan", 0, court_results(&[19]), 1).await;
    mount_month_page(&server, "2019-jan", 1, empty_results(), 1).await;
    mount_month_page(&server, "2020-jan", 0, court_results(&[20]), 1).await;
    mount_month_page(&server, "2020-jan", 1, empty_results(), 1).await;

    let config = create_test_config(&server.uri(), links_dir.path());
    let mut coordinator = Coordinator::new(config).unwrap();
    let outcome = coordinator
        .run(
            &Collection::court(COURT),
            YearRange::new(2019, 2021).unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(outcome.status, CrawlStatus::Completed);
    assert_eq!(outcome.crawled, vec![2019, 2020]);
    assert!(year_file(links_dir.path(), 2019).exists());
    assert!(year_file(links_dir.path(), 2020).exists());
    assert!(!year_file(links_dir.path(), 2018).exists());
    assert!(!year_file(links_dir.path(), 2021).exists());
    assert!(!year_file(links_dir.path(), 2022).exists());
}

#[tokio::test]
async fn test_duplicate_year_links_crawled_once() {
    let server = MockServer::start().await;
    let links_dir = TempDir::new().unwrap();

    mount_court_listing(&server, &[2020, 2020]).await;
    mount_year_page(&server, 2020, &["jan"], 1).await;
    mount_month_page(&server, "2020-jan", 0, empty_results(), 1).await;

    let config = create_test_config(&server.uri(), links_dir.path());
    let mut coordinator = Coordinator::new(config).unwrap();
    let outcome = coordinator
        .run(&Collection::court(COURT), YearRange::single(2020).unwrap())
        .await
        .unwrap();

    assert_eq!(outcome.crawled, vec![2020]);
    assert!(outcome.years[&2020].is_empty());

    // A month with no documents still yields a stored (empty) year
    let raw = std::fs::read_to_string(year_file(links_dir.path(), 2020)).unwrap();
    assert_eq!(raw, "[]");
}

#[tokio::test]
async fn test_stored_year_is_not_refetched() {
    let server = MockServer::start().await;
    let links_dir = TempDir::new().unwrap();
    let collection = Collection::court(COURT);

    let mut store = JsonResumeStore::new(links_dir.path().to_path_buf());
    store
        .save(
            &collection,
            &YearIndex::from_urls(2019, vec!["https://indiankanoon.org/doc/5/".to_string()]),
        )
        .unwrap();
    let stored_before = std::fs::read(year_file(links_dir.path(), 2019)).unwrap();

    mount_court_listing(&server, &[2019, 2020]).await;
    mount_year_page(&server, 2019, &["jan"], 0).await;
    mount_year_page(&server, 2020, &["jan"], 1).await;
    mount_month_page(&server, "2020-jan", 0, court_results(&[42]), 1).await;
    mount_month_page(&server, "2020-jan", 1, empty_results(), 1).await;

    let config = create_test_config(&server.uri(), links_dir.path());
    let mut coordinator = Coordinator::new(config).unwrap();
    let outcome = coordinator
        .run(&collection, YearRange::new(2019, 2020).unwrap())
        .await
        .unwrap();

    assert_eq!(outcome.resumed, vec![2019]);
    assert_eq!(outcome.crawled, vec![2020]);
    assert_eq!(
        outcome.years[&2019].urls(),
        ["https://indiankanoon.org/doc/5/".to_string()]
    );
    assert_eq!(month_requests(&server, "2019-jan").await, 0);

    let stored_after = std::fs::read(year_file(links_dir.path(), 2019)).unwrap();
    assert_eq!(stored_before, stored_after);
}

#[tokio::test]
async fn test_fully_stored_range_makes_no_requests() {
    let server = MockServer::start().await;
    let links_dir = TempDir::new().unwrap();
    let collection = Collection::court(COURT);

    let mut store = JsonResumeStore::new(links_dir.path().to_path_buf());
    store.save(&collection, &YearIndex::new(2020)).unwrap();
    store
        .save(
            &collection,
            &YearIndex::from_urls(2021, vec!["https://indiankanoon.org/doc/9/".to_string()]),
        )
        .unwrap();

    let config = create_test_config(&server.uri(), links_dir.path());
    let mut coordinator = Coordinator::new(config).unwrap();
    let outcome = coordinator
        .run(&collection, YearRange::new(2020, 2021).unwrap())
        .await
        .unwrap();

    assert_eq!(outcome.status, CrawlStatus::Completed);
    assert_eq!(outcome.resumed, vec![2020, 2021]);
    assert_eq!(outcome.requests, 0);
    assert!(received(&server).await.is_empty());
}

#[tokio::test]
async fn test_failed_year_is_isolated() {
    let server = MockServer::start().await;
    let links_dir = TempDir::new().unwrap();

    mount_court_listing(&server, &[2019, 2020]).await;
    mount_year_page(&server, 2019, &["jan"], 1).await;
    mount_month_page(&server, "2019-jan", 0, court_results(&[1]), 1).await;
    mount_month_status(&server, "2019-jan", 1, 500).await;
    mount_year_page(&server, 2020, &["jan"], 1).await;
    mount_month_page(&server, "2020-jan", 0, court_results(&[2]), 1).await;
    mount_month_page(&server, "2020-jan", 1, empty_results(), 1).await;

    let config = create_test_config(&server.uri(), links_dir.path());
    let mut coordinator = Coordinator::new(config).unwrap();
    let outcome = coordinator
        .run(
            &Collection::court(COURT),
            YearRange::new(2019, 2020).unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(outcome.status, CrawlStatus::CompletedWithFailures);
    assert_eq!(outcome.crawled, vec![2020]);
    assert_eq!(outcome.failures.len(), 1);

    let failure = &outcome.failures[0];
    assert_eq!(failure.year, 2019);
    assert_eq!(failure.month.as_deref(), Some("/search/?formInput=2019-jan"));
    assert_eq!(failure.page, Some(1));
    assert!(matches!(
        failure.error,
        IndexerError::HttpStatus { status: 500, .. }
    ));

    assert!(!year_file(links_dir.path(), 2019).exists());
    assert!(year_file(links_dir.path(), 2020).exists());
}

#[tokio::test]
async fn test_category_not_found() {
    let server = MockServer::start().await;
    let links_dir = TempDir::new().unwrap();

    mount_path(
        &server,
        "/browse/",
        page(&[("/browse/delhi/", "Delhi High Court")]),
        1,
    )
    .await;

    let config = create_test_config(&server.uri(), links_dir.path());
    let mut coordinator = Coordinator::new(config).unwrap();
    let outcome = coordinator
        .run(&Collection::court(COURT), YearRange::single(2020).unwrap())
        .await
        .unwrap();

    assert_eq!(outcome.status, CrawlStatus::CategoryNotFound);
    assert_eq!(outcome.requests, 1);
    assert!(outcome.years.is_empty());
    assert!(!links_dir.path().join("Court_PDFs").exists());
}

#[tokio::test]
async fn test_category_match_is_exact() {
    let server = MockServer::start().await;
    let links_dir = TempDir::new().unwrap();

    mount_path(
        &server,
        "/browse/",
        page(&[("/browse/supremecourt/", "Supreme Court of India")]),
        1,
    )
    .await;

    let config = create_test_config(&server.uri(), links_dir.path());
    let mut coordinator = Coordinator::new(config).unwrap();
    let outcome = coordinator
        .run(&Collection::court(COURT), YearRange::single(2020).unwrap())
        .await
        .unwrap();

    assert_eq!(outcome.status, CrawlStatus::CategoryNotFound);
}

#[tokio::test]
async fn test_root_listing_failure_is_an_error() {
    let server = MockServer::start().await;
    let links_dir = TempDir::new().unwrap();

    let config = create_test_config(&server.uri(), links_dir.path());
    let mut coordinator = Coordinator::new(config).unwrap();
    let result = coordinator
        .run(&Collection::court(COURT), YearRange::single(2020).unwrap())
        .await;

    assert!(matches!(
        result,
        Err(IndexerError::HttpStatus { status: 404, .. })
    ));
}

#[tokio::test]
async fn test_act_collection() {
    let server = MockServer::start().await;
    let links_dir = TempDir::new().unwrap();
    let uri = server.uri();
    let act = "Constitution of India";

    mount_path(
        &server,
        "/browselaws/",
        page(&[
            ("/browse/constitution/", act),
            ("/browse/ipc/", "Indian Penal Code"),
        ]),
        1,
    )
    .await;
    mount_path(
        &server,
        "/browse/constitution/",
        page(&[("/browse/constitution/1950/", "1950")]),
        1,
    )
    .await;
    mount_path(
        &server,
        "/browse/constitution/1950/",
        page(&[
            ("/search/?formInput=1950-jan", "January"),
            ("/search/?formInput=1950-all", "Entire Year"),
        ]),
        1,
    )
    .await;
    mount_month_page(
        &server,
        "1950-jan",
        0,
        page(&[
            ("/doc/555/", "Article 1"),
            ("/doc/556/?type=print", "Article 2"),
        ]),
        1,
    )
    .await;
    mount_month_page(&server, "1950-jan", 1, empty_results(), 1).await;

    let config = create_test_config(&uri, links_dir.path());
    let mut coordinator = Coordinator::new(config).unwrap();
    let outcome = coordinator
        .run(&Collection::act(act), YearRange::single(1950).unwrap())
        .await
        .unwrap();

    assert_eq!(outcome.status, CrawlStatus::Completed);

    let path = links_dir
        .path()
        .join("Constitution_ACTs")
        .join(act)
        .join("1950.json");
    let raw = std::fs::read_to_string(path).unwrap();
    assert_eq!(raw, format!(r#"["{0}/doc/555/","{0}/doc/556/"]"#, uri));
}

#[tokio::test]
async fn test_pagination_limit_caps_month() {
    let server = MockServer::start().await;
    let links_dir = TempDir::new().unwrap();

    mount_court_listing(&server, &[2020]).await;
    mount_year_page(&server, 2020, &["jan"], 1).await;
    mount_month_page(&server, "2020-jan", 0, court_results(&[1]), 1).await;
    mount_month_page(&server, "2020-jan", 1, court_results(&[2]), 1).await;
    mount_month_page(&server, "2020-jan", 2, court_results(&[3]), 0).await;

    let mut config = create_test_config(&server.uri(), links_dir.path());
    config.crawler.pagination_limit = 2;
    let mut coordinator = Coordinator::new(config).unwrap();
    let outcome = coordinator
        .run(&Collection::court(COURT), YearRange::single(2020).unwrap())
        .await
        .unwrap();

    assert_eq!(outcome.status, CrawlStatus::Completed);
    assert_eq!(month_requests(&server, "2020-jan").await, 2);
    assert_eq!(outcome.years[&2020].len(), 2);
    assert!(year_file(links_dir.path(), 2020).exists());
}

#[tokio::test]
async fn test_cancelled_before_first_year() {
    let server = MockServer::start().await;
    let links_dir = TempDir::new().unwrap();

    mount_court_listing(&server, &[2020]).await;
    mount_year_page(&server, 2020, &["jan"], 0).await;

    let config = create_test_config(&server.uri(), links_dir.path());
    let mut coordinator = Coordinator::new(config).unwrap();
    coordinator.cancel_flag().store(true, Ordering::Relaxed);

    let outcome = coordinator
        .run(&Collection::court(COURT), YearRange::single(2020).unwrap())
        .await
        .unwrap();

    assert_eq!(outcome.status, CrawlStatus::Cancelled);
    assert!(outcome.years.is_empty());
    assert!(!year_file(links_dir.path(), 2020).exists());
}

#[tokio::test]
async fn test_cancel_between_pages_discards_year() {
    let server = MockServer::start().await;
    let links_dir = TempDir::new().unwrap();

    let config = create_test_config(&server.uri(), links_dir.path());
    let mut coordinator = Coordinator::new(config).unwrap();

    mount_court_listing(&server, &[2020, 2021]).await;
    mount_year_page(&server, 2020, &["jan"], 1).await;
    mount_month_page_raising(
        &server,
        "2020-jan",
        0,
        RaiseFlag {
            flag: coordinator.cancel_flag(),
            body: court_results(&[101]),
        },
    )
    .await;
    mount_month_page(&server, "2020-jan", 1, empty_results(), 0).await;
    mount_year_page(&server, 2021, &["jan"], 0).await;

    let outcome = coordinator
        .run(
            &Collection::court(COURT),
            YearRange::new(2020, 2021).unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(outcome.status, CrawlStatus::Cancelled);
    assert!(outcome.years.is_empty());
    assert!(outcome.crawled.is_empty());
    assert!(outcome.failures.is_empty());
    assert_eq!(coordinator.phase(), CrawlPhase::Done);
    assert_eq!(month_requests(&server, "2020-jan").await, 1);
    assert!(!year_file(links_dir.path(), 2020).exists());
    assert!(!year_file(links_dir.path(), 2021).exists());
}

#[tokio::test]
async fn test_corrupt_stored_year_is_a_failure() {
    let server = MockServer::start().await;
    let links_dir = TempDir::new().unwrap();

    let corrupt = year_file(links_dir.path(), 2019);
    std::fs::create_dir_all(corrupt.parent().unwrap()).unwrap();
    std::fs::write(&corrupt, r#"["https://indiankanoon.org/doc/1/""#).unwrap();

    mount_court_listing(&server, &[2019, 2020]).await;
    mount_year_page(&server, 2019, &["jan"], 0).await;
    mount_year_page(&server, 2020, &["jan"], 1).await;
    mount_month_page(&server, "2020-jan", 0, court_results(&[20]), 1).await;
    mount_month_page(&server, "2020-jan", 1, empty_results(), 1).await;

    let config = create_test_config(&server.uri(), links_dir.path());
    let mut coordinator = Coordinator::new(config).unwrap();
    let outcome = coordinator
        .run(
            &Collection::court(COURT),
            YearRange::new(2019, 2020).unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(outcome.status, CrawlStatus::CompletedWithFailures);
    assert_eq!(outcome.crawled, vec![2020]);
    assert_eq!(outcome.failures.len(), 1);

    let failure = &outcome.failures[0];
    assert_eq!(failure.year, 2019);
    assert_eq!(failure.month, None);
    assert!(matches!(
        failure.error,
        IndexerError::Store(StoreError::Corrupt { .. })
    ));

    // The damaged file is left for an operator to inspect
    assert_eq!(
        std::fs::read_to_string(&corrupt).unwrap(),
        r#"["https://indiankanoon.org/doc/1/""#
    );
    assert!(year_file(links_dir.path(), 2020).exists());
}
