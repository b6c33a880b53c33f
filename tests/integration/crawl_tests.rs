//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end with the default collaborators.

use kb_harvest::config::Config;
use kb_harvest::crawler::{Fetcher, HttpFetcher};
use kb_harvest::output::{JsonOutputHandler, OutputHandler};
use kb_harvest::{normalize_entry, ContentType, Crawler, PageState, ScrapeError};
use std::time::Duration;
use tempfile::tempdir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ARTICLE_TEXT: &str = "Shipping a data product means deciding which questions matter, \
    collecting the right events, and keeping dashboards honest as the company grows. \
    This post walks through the checklist we use for every launch.";

/// Creates a test configuration with no delay between pages
fn create_test_config(max_pages: usize) -> Config {
    let mut config = Config::default();
    config.crawler.max_pages = max_pages;
    config.crawler.delay_seconds = 0.0;
    config.crawler.request_timeout_secs = 5;
    config
}

fn html_page(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(
        format!("<html><head><title>Test</title></head><body>{}</body></html>", body),
        "text/html",
    )
}

async fn mount_get(server: &MockServer, route: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(response)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_blog_crawl_end_to_end() {
    // Start a mock server
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_get(
        &mock_server,
        "/blog",
        html_page(
            r#"<nav><a href="/">Home</a></nav>
            <main><p>Latest posts</p>
            <a href="/blog/post-1">Post 1</a>
            <a href="https://external.com/x">Elsewhere</a></main>"#,
        ),
    )
    .await;

    mount_get(
        &mock_server,
        "/blog/post-1",
        html_page(&format!(
            "<article><h1>Launch Checklist</h1><p>{}</p></article>",
            ARTICLE_TEXT
        )),
    )
    .await;

    // The home page has nothing worth keeping
    mount_get(&mock_server, "/", html_page("<p>Welcome</p>")).await;

    let entry = format!("{}/blog", base_url);
    let crawler = Crawler::from_config(&create_test_config(10)).unwrap();
    let (result, stats) = crawler.crawl_with_stats(&entry).await.unwrap();

    assert_eq!(result.site, entry);
    assert_eq!(result.items.len(), 1);

    let item = &result.items[0];
    assert_eq!(item.title, "Launch Checklist");
    assert_eq!(item.content_type, ContentType::Blog);
    assert_eq!(item.source_url.as_str(), format!("{}/blog/post-1", base_url));
    assert!(item.content.contains("checklist we use for every launch"));

    // /blog, /blog/post-1 and / were visited; external.com never was
    assert_eq!(stats.pages_visited, 3);
    assert_eq!(stats.items(), 1);
    assert_eq!(stats.skipped(), 2);
    assert_eq!(stats.failed(), 0);
}

#[tokio::test]
async fn test_output_file_written() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_get(
        &mock_server,
        "/",
        html_page(&format!("<main><h1>Über uns</h1><p>{}</p></main>", ARTICLE_TEXT)),
    )
    .await;

    let crawler = Crawler::from_config(&create_test_config(5)).unwrap();
    let result = crawler.crawl(&base_url).await.unwrap();

    let dir = tempdir().unwrap();
    let output = dir.path().join("site_scraped.json");
    JsonOutputHandler::new(&output)
        .write_result(&result)
        .unwrap();

    let written = std::fs::read_to_string(&output).unwrap();
    assert!(written.contains("Über uns"));

    let value: serde_json::Value = serde_json::from_str(&written).unwrap();
    assert_eq!(value["site"], base_url.as_str());
    assert_eq!(value["items"].as_array().unwrap().len(), 1);
    assert_eq!(value["items"][0]["title"], "Über uns");
    assert_eq!(value["items"][0]["source_url"], format!("{}/", base_url));
}

#[tokio::test]
async fn test_server_error_does_not_stop_crawl() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_get(
        &mock_server,
        "/",
        html_page(r#"<a href="/broken">Broken</a><a href="/guide/setup">Setup</a>"#),
    )
    .await;

    mount_get(
        &mock_server,
        "/broken",
        ResponseTemplate::new(500).set_body_raw(
            r#"<html><body><a href="/hidden">Hidden</a></body></html>"#,
            "text/html",
        ),
    )
    .await;

    mount_get(
        &mock_server,
        "/guide/setup",
        html_page(&format!("<article><p>{}</p></article>", ARTICLE_TEXT)),
    )
    .await;

    let crawler = Crawler::from_config(&create_test_config(10)).unwrap();
    let (result, stats) = crawler.crawl_with_stats(&base_url).await.unwrap();

    assert_eq!(result.items.len(), 1);
    assert_eq!(
        result.items[0].source_url.as_str(),
        format!("{}/guide/setup", base_url)
    );

    // Links on the error page are never followed
    assert_eq!(stats.pages_visited, 3);
    assert_eq!(stats.count(PageState::HttpError), 1);
    assert_eq!(stats.failures.len(), 1);
    assert_eq!(stats.failures[0].url, format!("{}/broken", base_url));
    assert_eq!(stats.failures[0].reason, "HTTP 500");
}

#[tokio::test]
async fn test_non_html_page_is_skipped() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_get(
        &mock_server,
        "/",
        html_page(r#"<a href="/report.pdf">Report</a>"#),
    )
    .await;

    mount_get(
        &mock_server,
        "/report.pdf",
        ResponseTemplate::new(200).set_body_raw(ARTICLE_TEXT, "application/pdf"),
    )
    .await;

    let crawler = Crawler::from_config(&create_test_config(10)).unwrap();
    let (result, stats) = crawler.crawl_with_stats(&base_url).await.unwrap();

    assert!(result.items.is_empty());
    assert_eq!(stats.count(PageState::NotHtml), 1);
    assert_eq!(stats.count(PageState::Skipped), 1);
}

#[tokio::test]
async fn test_fetcher_leaves_unwanted_bodies_unread() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_get(
        &mock_server,
        "/dump.bin",
        ResponseTemplate::new(200)
            .set_body_raw(vec![0u8; 8 * 1024 * 1024], "application/octet-stream"),
    )
    .await;

    mount_get(
        &mock_server,
        "/broken",
        ResponseTemplate::new(500).set_body_raw(
            format!("<html><body><p>{}</p></body></html>", ARTICLE_TEXT),
            "text/html",
        ),
    )
    .await;

    mount_get(&mock_server, "/", html_page("<p>Welcome</p>")).await;

    let fetcher = HttpFetcher::from_config(&create_test_config(5)).unwrap();

    let binary = normalize_entry(&format!("{}/dump.bin", base_url)).unwrap();
    let response = fetcher.fetch(&binary).await.unwrap();
    assert_eq!(response.status, 200);
    assert_eq!(
        response.content_type.as_deref(),
        Some("application/octet-stream")
    );
    assert!(response.body.is_empty());

    let broken = normalize_entry(&format!("{}/broken", base_url)).unwrap();
    let response = fetcher.fetch(&broken).await.unwrap();
    assert_eq!(response.status, 500);
    assert!(response.body.is_empty());

    let home = normalize_entry(&base_url).unwrap();
    let response = fetcher.fetch(&home).await.unwrap();
    assert!(response.body.contains("Welcome"));
}

#[tokio::test]
async fn test_links_resolve_against_redirect_target() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_get(
        &mock_server,
        "/old",
        ResponseTemplate::new(301).insert_header("location", "/docs/"),
    )
    .await;

    mount_get(
        &mock_server,
        "/docs/",
        html_page(r#"<a href="intro">Intro</a>"#),
    )
    .await;

    mount_get(
        &mock_server,
        "/docs/intro",
        html_page(&format!("<article><p>{}</p></article>", ARTICLE_TEXT)),
    )
    .await;

    let crawler = Crawler::from_config(&create_test_config(10)).unwrap();
    let result = crawler.crawl(&format!("{}/old", base_url)).await.unwrap();

    assert_eq!(result.items.len(), 1);
    assert_eq!(
        result.items[0].source_url.as_str(),
        format!("{}/docs/intro", base_url)
    );
}

#[tokio::test]
async fn test_unreachable_site_yields_empty_result() {
    // Nothing listens on port 9 locally
    let crawler = Crawler::from_config(&create_test_config(5)).unwrap();
    let (result, stats) = crawler
        .crawl_with_stats("http://127.0.0.1:9/")
        .await
        .unwrap();

    assert!(result.items.is_empty());
    assert_eq!(stats.pages_visited, 1);
    assert_eq!(stats.failed(), 1);
}

#[tokio::test]
async fn test_invalid_entry_url() {
    let result = kb_harvest::crawler::crawl("javascript:alert(1)", 5, Duration::ZERO).await;
    assert!(matches!(
        result,
        Err(ScrapeError::InvalidEntryUrl { .. })
    ));

    let result = kb_harvest::crawler::crawl("", 5, Duration::ZERO).await;
    assert!(matches!(
        result,
        Err(ScrapeError::InvalidEntryUrl { .. })
    ));
}
