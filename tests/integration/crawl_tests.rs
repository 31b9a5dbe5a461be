//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end: index, chapter pages, PDF downloads
//! and the item store.

use law_scraper::config::{
    Config, CrawlerConfig, FilesConfig, HrefPolicy, OutputConfig, UserAgentConfig,
};
use law_scraper::crawler::{crawl, Coordinator};
use law_scraper::item::PDF_DOWNLOAD_FAILURE;
use law_scraper::storage::{ItemStore, RunStatus, SqliteStorage};
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const BOUNDARIES_PDF: &[u8] = b"%PDF-1.4 boundaries";
const REVENUE_PDF: &[u8] = b"%PDF-1.4 revenue";

/// Creates a test configuration crawling the mock server
fn create_test_config(server: &MockServer, dir: &TempDir) -> Config {
    Config {
        crawler: CrawlerConfig {
            start_url: format!("{}/statutes/", server.uri()),
            allowed_domains: vec!["127.0.0.1".to_string()],
            download_delay: 0,
            obey_robots: true,
            missing_href: HrefPolicy::Skip,
        },
        user_agent: UserAgentConfig {
            crawler_name: "TestBot".to_string(),
            crawler_version: "1.0.0".to_string(),
            contact_url: "https://example.com/contact".to_string(),
            contact_email: "test@example.com".to_string(),
        },
        files: FilesConfig {
            store: dir.path().join("pdfs").display().to_string(),
        },
        output: OutputConfig {
            database_path: dir.path().join("statutes.db").display().to_string(),
        },
    }
}

async fn mount_html(server: &MockServer, at: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

async fn mount_pdf(server: &MockServer, at: &str, body: &[u8]) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body.to_vec(), "application/pdf"))
        .mount(server)
        .await;
}

async fn mount_status(server: &MockServer, at: &str, status: u16) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

fn index_html() -> String {
    r#"<html><body>
<div id="Panel1"><span>
<ul>
  <li><span>I - GENERAL PROVISIONS</span></li>
  <ul>
    <li><a href="chapter/1">1 Boundaries</a></li>
    <li><a>2 Citizenship</a></li>
    <li><a href="chapter/1#top">1 Boundaries (again)</a></li>
  </ul>
  <li><span>IV - REVENUE AND TAXATION</span></li>
  <ul>
    <li><a href="chapter/131">131 Department of Revenue</a></li>
    <li><a href="chapter/200">200 Unavailable</a></li>
    <li><a href="private/chapter/999">999 Private</a></li>
    <li><a href="http://elsewhere.example/statutes/chapter/9">9 Offsite</a></li>
  </ul>
</ul>
</span></div>
</body></html>"#
        .to_string()
}

#[tokio::test]
async fn test_full_crawl_downloads_subchapters() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("User-agent: *\nDisallow: /statutes/private/\n"),
        )
        .mount(&server)
        .await;

    mount_html(&server, "/statutes/", &index_html()).await;
    mount_html(
        &server,
        "/statutes/chapter/1",
        r#"<html><body><ul>
            <li><a href="/statutes/pdf/1-010.pdf">.010 Boundary of state</a></li>
            <li><a href="/statutes/pdf/1-020.pdf">.020 Repealed</a></li>
        </ul></body></html>"#,
    )
    .await;
    mount_html(
        &server,
        "/statutes/chapter/131",
        r#"<html><body><ul>
            <li><a href="/statutes/pdf/131-010.pdf">.010 Department</a></li>
        </ul></body></html>"#,
    )
    .await;
    mount_status(&server, "/statutes/chapter/200", 500).await;
    mount_pdf(&server, "/statutes/pdf/1-010.pdf", BOUNDARIES_PDF).await;
    mount_status(&server, "/statutes/pdf/1-020.pdf", 404).await;
    mount_pdf(&server, "/statutes/pdf/131-010.pdf", REVENUE_PDF).await;

    let config = create_test_config(&server, &dir);
    let store = config.files.store.clone();
    let db_path = config.output.database_path.clone();

    let stats = crawl(config, "test-hash").await.expect("Crawl failed");

    assert_eq!(stats.pages_fetched, 3);
    assert_eq!(stats.page_errors, 1);
    assert_eq!(stats.extraction_errors, 0);
    assert_eq!(stats.chapter_requests, 3);
    assert_eq!(stats.chapters_skipped, 1);
    assert_eq!(stats.duplicates_filtered, 1);
    assert_eq!(stats.offsite_filtered, 1);
    assert_eq!(stats.robots_denied, 1);
    assert_eq!(stats.items_scraped, 3);
    assert_eq!(stats.downloads_succeeded, 2);
    assert_eq!(stats.downloads_failed, 1);

    let storage = SqliteStorage::new(Path::new(&db_path)).expect("Failed to open DB");
    let run = storage.get_latest_run().unwrap().expect("No run recorded");
    assert_eq!(run.status, RunStatus::Completed);
    assert_eq!(run.config_hash, "test-hash");

    let items = storage.load_items(run.id).unwrap();
    assert_eq!(items.len(), 3);

    let boundary = &items[0];
    assert_eq!(boundary.title_name, "I - GENERAL PROVISIONS");
    assert_eq!(boundary.title_index, 1);
    assert_eq!(boundary.chapter_name, "1 Boundaries");
    assert_eq!(boundary.subchapter_index, "010");
    assert_eq!(
        boundary.subchapter_link,
        format!("{}/statutes/pdf/1-010.pdf", server.uri())
    );
    let pdf = boundary.pdf().expect("First subchapter should be downloaded");
    assert_eq!(pdf.pdf_md5, "ee2e85bac95b3be934ee536a093de4f8");
    assert!(pdf.pdf_path.starts_with(&store));
    assert!(pdf.pdf_path.ends_with(".pdf"));
    assert_eq!(std::fs::read(&pdf.pdf_path).unwrap(), BOUNDARIES_PDF);
    assert_eq!(pdf.download_time.len(), "2024-01-01 00:00:00".len());

    let repealed = &items[1];
    assert_eq!(repealed.subchapter_index, "020");
    assert_eq!(repealed.failure(), Some(PDF_DOWNLOAD_FAILURE));
    assert!(repealed.pdf().is_none());

    let revenue = &items[2];
    assert_eq!(revenue.title_name, "IV - REVENUE AND TAXATION");
    assert_eq!(revenue.title_index, 4);
    assert_eq!(revenue.chapter_name, "131 Department of Revenue");
    assert_eq!(
        revenue.pdf().map(|pdf| pdf.pdf_md5.as_str()),
        Some("eb39ac244d6a162d882a3de5c2a78852")
    );

    let counts = storage.count_items(run.id).unwrap();
    assert_eq!(counts.titles, 2);
    assert_eq!(counts.chapters, 2);
}

#[tokio::test]
async fn test_malformed_chapter_keeps_earlier_items() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_status(&server, "/robots.txt", 404).await;
    mount_html(
        &server,
        "/statutes/",
        r#"<div id="Panel1"><span><ul>
            <li><span>I - GENERAL PROVISIONS</span></li>
            <ul><li><a href="chapter/1">1 Boundaries</a></li></ul>
        </ul></span></div>"#,
    )
    .await;
    mount_html(
        &server,
        "/statutes/chapter/1",
        r#"<ul>
            <li><a href="/statutes/pdf/1-010.pdf">.010 Boundary of state</a></li>
            <li><a href="/statutes/pdf/1-note.pdf">Editor's note</a></li>
        </ul>"#,
    )
    .await;
    mount_pdf(&server, "/statutes/pdf/1-010.pdf", BOUNDARIES_PDF).await;

    let config = create_test_config(&server, &dir);
    let db_path = config.output.database_path.clone();
    let mut coordinator = Coordinator::new(config, "test-hash").unwrap();
    let run_id = coordinator.run_id();
    let stats = coordinator.run().await.expect("Crawl failed");

    assert_eq!(stats.pages_fetched, 2);
    assert_eq!(stats.extraction_errors, 1);
    assert_eq!(stats.items_scraped, 1);
    assert_eq!(stats.downloads_succeeded, 1);

    let storage = SqliteStorage::new(Path::new(&db_path)).unwrap();
    let items = storage.load_items(run_id).unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].subchapter_index, "010");
    assert!(items[0].pdf().is_some());
    assert_eq!(storage.get_run(run_id).unwrap().status, RunStatus::Completed);
}

#[tokio::test]
async fn test_unreachable_index_completes_empty_run() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_status(&server, "/statutes/", 503).await;

    let mut config = create_test_config(&server, &dir);
    config.crawler.obey_robots = false;
    let db_path = config.output.database_path.clone();

    let stats = crawl(config, "test-hash").await.expect("Crawl failed");
    assert_eq!(stats.pages_fetched, 0);
    assert_eq!(stats.page_errors, 1);
    assert_eq!(stats.items_scraped, 0);

    let storage = SqliteStorage::new(Path::new(&db_path)).unwrap();
    let run = storage.get_latest_run().unwrap().unwrap();
    assert_eq!(storage.count_items(run.id).unwrap().total, 0);
}

#[tokio::test]
async fn test_robots_denied_pdf_is_recorded_as_failure() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("User-agent: TestBot\nDisallow: /statutes/pdf/\n"),
        )
        .mount(&server)
        .await;
    mount_html(
        &server,
        "/statutes/",
        r#"<div id="Panel1"><span><ul>
            <li><span>II - LEGISLATIVE BRANCH</span></li>
            <ul><li><a href="chapter/6">6 General Assembly</a></li></ul>
        </ul></span></div>"#,
    )
    .await;
    mount_html(
        &server,
        "/statutes/chapter/6",
        r#"<ul><li><a href="/statutes/pdf/6-010.pdf">.010 Sessions</a></li></ul>"#,
    )
    .await;
    mount_pdf(&server, "/statutes/pdf/6-010.pdf", BOUNDARIES_PDF).await;

    let config = create_test_config(&server, &dir);
    let db_path = config.output.database_path.clone();
    let stats = crawl(config, "test-hash").await.expect("Crawl failed");

    assert_eq!(stats.robots_denied, 1);
    assert_eq!(stats.downloads_failed, 1);

    let storage = SqliteStorage::new(Path::new(&db_path)).unwrap();
    let run = storage.get_latest_run().unwrap().unwrap();
    let items = storage.load_items(run.id).unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].title_index, 2);
    assert_eq!(items[0].failure(), Some(PDF_DOWNLOAD_FAILURE));
}

#[tokio::test]
async fn test_malformed_title_keeps_earlier_chapters() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_status(&server, "/robots.txt", 404).await;
    mount_html(
        &server,
        "/statutes/",
        r#"<div id="Panel1"><span><ul>
            <li><span>I - GENERAL PROVISIONS</span></li>
            <ul><li><a href="chapter/1">1 Boundaries</a></li></ul>
            <li><span>APPENDIX</span></li>
            <ul><li><a href="appendix">Tables</a></li></ul>
        </ul></span></div>"#,
    )
    .await;
    mount_html(
        &server,
        "/statutes/chapter/1",
        r#"<ul><li><a href="/statutes/pdf/1-010.pdf">.010 Boundary of state</a></li></ul>"#,
    )
    .await;
    mount_pdf(&server, "/statutes/pdf/1-010.pdf", BOUNDARIES_PDF).await;

    let config = create_test_config(&server, &dir);
    let db_path = config.output.database_path.clone();
    let stats = crawl(config, "test-hash").await.expect("Crawl failed");

    assert_eq!(stats.extraction_errors, 1);
    assert_eq!(stats.chapter_requests, 1);
    assert_eq!(stats.pages_fetched, 2);
    assert_eq!(stats.downloads_succeeded, 1);

    let storage = SqliteStorage::new(Path::new(&db_path)).unwrap();
    let run = storage.get_latest_run().unwrap().unwrap();
    let items = storage.load_items(run.id).unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].title_name, "I - GENERAL PROVISIONS");
    assert_eq!(items[0].chapter_name, "1 Boundaries");
}

#[tokio::test]
async fn test_legacy_charset_labels_are_decoded() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_status(&server, "/robots.txt", 404).await;
    Mock::given(method("GET"))
        .and(path("/statutes/"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            b"<div id=\"Panel1\"><span><ul>\
              <li><span>I - GENERAL PROVISIONS</span></li>\
              <ul><li><a href=\"chapter/1\">1 Boundaries \xA7 1</a></li></ul>\
              </ul></span></div>"
                .to_vec(),
            "text/html; charset=windows-1252",
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/statutes/chapter/1"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            b"<ul><li><a href=\"/statutes/pdf/1-010.pdf\">.010 Boundary \x96 state</a></li></ul>"
                .to_vec(),
            "text/html; charset=windows-1252",
        ))
        .mount(&server)
        .await;
    mount_pdf(&server, "/statutes/pdf/1-010.pdf", BOUNDARIES_PDF).await;

    let config = create_test_config(&server, &dir);
    let db_path = config.output.database_path.clone();
    crawl(config, "test-hash").await.expect("Crawl failed");

    let storage = SqliteStorage::new(Path::new(&db_path)).unwrap();
    let run = storage.get_latest_run().unwrap().unwrap();
    let items = storage.load_items(run.id).unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].chapter_name, "1 Boundaries \u{a7} 1");
    assert_eq!(items[0].subchapter_name, ".010 Boundary \u{2013} state");
    assert_eq!(items[0].savepath(), "I_-_GENERAL_PROVISIONS/1_Boundaries_\u{a7}_1");
}
