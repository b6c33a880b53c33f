//! Crawl-loop tests against stub collaborators
//!
//! The stub fetcher serves a synthetic link graph with no network, so
//! these tests pin down traversal order, deduplication and the page
//! budget exactly.

use async_trait::async_trait;
use kb_harvest::crawler::{
    ContentExtractor, ExtractedContent, FetchError, FetchResponse, Fetcher, LinkExtractor,
    PageProcessor,
};
use kb_harvest::{Classifier, ContentType, Crawler, NormalizedUrl};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use url::Url;

const SITE: &str = "https://site.test";

/// Serves pages whose body is their list of hrefs, one per line
struct GraphFetcher {
    graph: fn(&str) -> Option<Vec<String>>,
    redirects: Vec<(&'static str, &'static str)>,
    fetched: Mutex<Vec<String>>,
}

impl GraphFetcher {
    fn new(graph: fn(&str) -> Option<Vec<String>>) -> Arc<Self> {
        Self::with_redirects(graph, vec![])
    }

    /// Like `new`, but each `(from, to)` path answers with the page at `to`
    fn with_redirects(
        graph: fn(&str) -> Option<Vec<String>>,
        redirects: Vec<(&'static str, &'static str)>,
    ) -> Arc<Self> {
        Arc::new(Self {
            graph,
            redirects,
            fetched: Mutex::new(Vec::new()),
        })
    }

    fn fetched_paths(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }
}

#[async_trait]
impl Fetcher for GraphFetcher {
    async fn fetch(&self, url: &NormalizedUrl) -> Result<FetchResponse, FetchError> {
        let path = url.path().to_string();
        self.fetched.lock().unwrap().push(path.clone());

        let (target, final_url) = match self.redirects.iter().find(|(from, _)| *from == path) {
            Some((_, to)) => (*to, url.as_url().join(to).unwrap()),
            None => (path.as_str(), url.as_url().clone()),
        };

        let (status, body) = match (self.graph)(target) {
            Some(links) => (200, links.join("\n")),
            None => (404, String::new()),
        };

        Ok(FetchResponse {
            status,
            final_url,
            content_type: Some("text/html".to_string()),
            body,
        })
    }
}

struct LineLinks;

impl LinkExtractor for LineLinks {
    fn extract_links(&self, html: &str, _base: &Url) -> Vec<String> {
        html.lines().map(str::to_string).collect()
    }
}

/// Produces a long article for every page except the listed paths
struct StubContent {
    empty_paths: Vec<&'static str>,
}

impl ContentExtractor for StubContent {
    fn extract(&self, _html: &str, url: &Url) -> Option<ExtractedContent> {
        if self.empty_paths.contains(&url.path()) {
            return None;
        }
        Some(ExtractedContent {
            markdown: format!(
                "# Notes for {}\n\nThis stub article is padded out so that it clears the minimum content length used by the crawler.",
                url.path()
            ),
            title: None,
        })
    }
}

fn crawler(
    fetcher: Arc<GraphFetcher>,
    empty_paths: Vec<&'static str>,
    max_pages: usize,
    delay: Duration,
) -> Crawler {
    let processor = PageProcessor::new(
        fetcher,
        Arc::new(LineLinks),
        Arc::new(StubContent { empty_paths }),
        Classifier::default(),
    );
    Crawler::new(processor, max_pages, delay)
}

fn links(paths: &[&str]) -> Option<Vec<String>> {
    Some(paths.iter().map(|p| p.to_string()).collect())
}

fn cycle_graph(path: &str) -> Option<Vec<String>> {
    match path {
        "/" => links(&["/a"]),
        "/a" => links(&["/b", "/"]),
        "/b" => links(&["/a", "/a/", "/A#top", "/"]),
        _ => None,
    }
}

fn tree_graph(path: &str) -> Option<Vec<String>> {
    match path {
        "/" => links(&["/a", "/b"]),
        "/a" => links(&["/c"]),
        "/b" => links(&["/d", "/a"]),
        "/c" | "/d" => links(&[]),
        _ => None,
    }
}

/// Every page links to two fresh pages
fn infinite_graph(path: &str) -> Option<Vec<String>> {
    let n: u64 = path.trim_start_matches("/n").parse().unwrap_or(0);
    Some(vec![
        format!("/n{}", 2 * n + 1),
        format!("/n{}", 2 * n + 2),
    ])
}

fn mixed_host_graph(path: &str) -> Option<Vec<String>> {
    match path {
        "/" => Some(vec![
            "https://other.test/page".to_string(),
            "https://www.site.test/page".to_string(),
            "mailto:team@site.test".to_string(),
            "/local".to_string(),
        ]),
        "/local" => links(&[]),
        _ => None,
    }
}

#[tokio::test]
async fn test_cycle_visits_each_page_once() {
    let fetcher = GraphFetcher::new(cycle_graph);
    let result = crawler(fetcher.clone(), vec![], 50, Duration::ZERO)
        .crawl(SITE)
        .await
        .unwrap();

    // "/A" differs from "/a" because paths are case-sensitive
    assert_eq!(fetcher.fetched_paths(), vec!["/", "/a", "/b", "/A"]);
    assert_eq!(result.items.len(), 3);
}

#[tokio::test]
async fn test_breadth_first_order() {
    let fetcher = GraphFetcher::new(tree_graph);
    let result = crawler(fetcher.clone(), vec![], 50, Duration::ZERO)
        .crawl(SITE)
        .await
        .unwrap();

    assert_eq!(fetcher.fetched_paths(), vec!["/", "/a", "/b", "/c", "/d"]);

    let sources: Vec<&str> = result
        .items
        .iter()
        .map(|item| item.source_url.as_str())
        .collect();
    assert_eq!(
        sources,
        vec![
            "https://site.test/",
            "https://site.test/a",
            "https://site.test/b",
            "https://site.test/c",
            "https://site.test/d",
        ]
    );
}

#[tokio::test]
async fn test_page_budget_on_infinite_graph() {
    let fetcher = GraphFetcher::new(infinite_graph);
    let (result, stats) = crawler(fetcher.clone(), vec![], 7, Duration::ZERO)
        .crawl_with_stats(SITE)
        .await
        .unwrap();

    assert_eq!(fetcher.fetched_paths().len(), 7);
    assert_eq!(result.items.len(), 7);
    assert_eq!(stats.pages_visited, 7);
    assert!(stats.links_enqueued > 7);
}

#[tokio::test]
async fn test_zero_budget_fetches_nothing() {
    let fetcher = GraphFetcher::new(infinite_graph);
    let result = crawler(fetcher.clone(), vec![], 0, Duration::ZERO)
        .crawl(SITE)
        .await
        .unwrap();

    assert!(fetcher.fetched_paths().is_empty());
    assert!(result.items.is_empty());
    assert_eq!(result.site, SITE);
}

#[tokio::test]
async fn test_empty_extraction_still_follows_links() {
    let fetcher = GraphFetcher::new(tree_graph);
    let result = crawler(fetcher.clone(), vec!["/"], 50, Duration::ZERO)
        .crawl(SITE)
        .await
        .unwrap();

    assert_eq!(fetcher.fetched_paths().len(), 5);
    assert_eq!(result.items.len(), 4);
    assert!(result
        .items
        .iter()
        .all(|item| item.source_url.as_str() != "https://site.test/"));
}

#[tokio::test]
async fn test_missing_page_is_counted_and_skipped() {
    let fetcher = GraphFetcher::new(|path| match path {
        "/" => links(&["/gone", "/here"]),
        "/here" => links(&[]),
        _ => None,
    });
    let (result, stats) = crawler(fetcher.clone(), vec![], 50, Duration::ZERO)
        .crawl_with_stats(SITE)
        .await
        .unwrap();

    assert_eq!(fetcher.fetched_paths(), vec!["/", "/gone", "/here"]);
    assert_eq!(result.items.len(), 2);
    assert_eq!(stats.failed(), 1);
    assert_eq!(stats.failures[0].reason, "HTTP 404");
}

#[tokio::test]
async fn test_only_entry_host_is_followed() {
    let fetcher = GraphFetcher::new(mixed_host_graph);
    let (_, stats) = crawler(fetcher.clone(), vec![], 50, Duration::ZERO)
        .crawl_with_stats(SITE)
        .await
        .unwrap();

    assert_eq!(fetcher.fetched_paths(), vec!["/", "/local"]);
    assert_eq!(stats.links_discovered, 4);
    assert_eq!(stats.links_enqueued, 1);
}

#[tokio::test]
async fn test_delay_between_pages() {
    let fetcher = GraphFetcher::new(tree_graph);
    let start = Instant::now();
    crawler(fetcher.clone(), vec![], 3, Duration::from_millis(50))
        .crawl(SITE)
        .await
        .unwrap();

    // Three pages, two pauses
    assert_eq!(fetcher.fetched_paths().len(), 3);
    assert!(start.elapsed() >= Duration::from_millis(100));
}

#[tokio::test]
async fn test_no_delay_after_last_page() {
    let fetcher = GraphFetcher::new(|path| match path {
        "/" => links(&[]),
        _ => None,
    });

    let crawl = crawler(fetcher, vec![], 50, Duration::from_secs(30));
    let result = tokio::time::timeout(Duration::from_secs(5), crawl.crawl(SITE))
        .await
        .expect("crawl should not sleep after its only page")
        .unwrap();

    assert_eq!(result.items.len(), 1);
}

#[tokio::test]
async fn test_url_rules_drive_classification() {
    let fetcher = GraphFetcher::new(|path| match path {
        "/" => links(&["/podcast/ep-1", "/books/rust"]),
        "/podcast/ep-1" | "/books/rust" => links(&[]),
        _ => None,
    });
    let result = crawler(fetcher, vec!["/"], 50, Duration::ZERO)
        .crawl(SITE)
        .await
        .unwrap();

    let labels: Vec<ContentType> = result.items.iter().map(|item| item.content_type).collect();
    assert_eq!(
        labels,
        vec![ContentType::PodcastTranscript, ContentType::Book]
    );
    assert_eq!(result.items[0].title, "Notes for /podcast/ep-1");
}

#[tokio::test]
async fn test_concurrent_crawls_are_independent() {
    let fetcher = GraphFetcher::new(tree_graph);
    let crawl = crawler(fetcher, vec![], 50, Duration::ZERO);

    let (first, second) = tokio::join!(crawl.crawl(SITE), crawl.crawl(SITE));

    assert_eq!(first.unwrap().items.len(), 5);
    assert_eq!(second.unwrap().items.len(), 5);
}

#[tokio::test]
async fn test_redirect_target_is_not_fetched_again() {
    let fetcher = GraphFetcher::with_redirects(
        |path| match path {
            "/" => links(&["/old", "/new"]),
            "/new" => links(&["/new", "/old"]),
            _ => None,
        },
        vec![("/old", "/new")],
    );
    let (result, stats) = crawler(fetcher.clone(), vec![], 50, Duration::ZERO)
        .crawl_with_stats(SITE)
        .await
        .unwrap();

    // "/new" was already queued when "/old" landed on it
    assert_eq!(fetcher.fetched_paths(), vec!["/", "/old"]);
    assert_eq!(stats.pages_visited, 2);

    let copies = result
        .items
        .iter()
        .filter(|item| item.title == "Notes for /new")
        .count();
    assert_eq!(copies, 1);
    assert_eq!(result.items[1].source_url.as_str(), "https://site.test/old");
}
