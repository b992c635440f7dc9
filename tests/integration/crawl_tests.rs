//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and run whole
//! sitemap crawls and scrapes against them.

use async_trait::async_trait;
use pagewise::config::{Config, CrawlerConfig};
use pagewise::crawler::{Fetcher, SitemapBuilder};
use pagewise::extract::{ContentExtractor, ExtractError, ReadableTextExtractor};
use pagewise::Scraper;
use tempfile::TempDir;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fetcher() -> Fetcher {
    Fetcher::new(&CrawlerConfig::default()).expect("Failed to build fetcher")
}

/// Mounts an HTML page at `route` that expects to be fetched `times` times
async fn mount_page(server: &MockServer, route: &str, body: String, times: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(body, "text/html; charset=utf-8"),
        )
        .expect(times)
        .mount(server)
        .await;
}

fn links_page(hrefs: &[&str]) -> String {
    let anchors: String = hrefs
        .iter()
        .map(|href| format!(r#"<a href="{}">link</a>"#, href))
        .collect();
    format!("<html><body><p>Page</p>{}</body></html>", anchors)
}

/// Sitemap entries with the mock server's origin stripped
fn paths(urls: &[String], base: &str) -> Vec<String> {
    urls.iter()
        .map(|u| u.strip_prefix(base).unwrap_or(u).to_string())
        .collect()
}

#[tokio::test]
async fn test_sample_scenario() {
    let server = MockServer::start().await;
    let other = MockServer::start().await;
    let base = server.uri();

    let home = format!(
        r#"<html><head><title>Example</title></head><body>
        <h1>Welcome</h1>
        <p>Example home page.</p>
        <a href="{base}/about">About</a>
        <a href="{other}/">Elsewhere</a>
        <a href="report.pdf">Report</a>
        </body></html>"#,
        base = base,
        other = other.uri()
    );
    // Extraction, the file scan and the crawl each fetch the seed once.
    mount_page(&server, "/", home, 3).await;
    mount_page(&server, "/about", links_page(&["/"]), 1).await;
    Mock::given(method("GET"))
        .and(path("/report.pdf"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(b"%PDF-1.4 sample".to_vec())
                .insert_header("content-type", "application/pdf"),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&other)
        .await;

    let dir = TempDir::new().unwrap();
    let mut config = Config::default();
    config.crawler.max_depth = 1;
    config.download.directory = dir.path().join("downloads").display().to_string();

    let scraper = Scraper::new(config).unwrap();
    let extractor = ReadableTextExtractor::new(scraper.fetcher().clone());
    let result = scraper.scrape(&format!("{}/", base), &extractor).await;

    assert_eq!(
        result.sitemap.urls(),
        &[format!("{}/", base), format!("{}/about", base)]
    );
    assert_eq!(result.downloads.attempted(), 1);
    assert_eq!(result.downloads.successful(), 1);
    assert!(dir.path().join("downloads").join("report.pdf").exists());

    let text = result.text.expect("page text");
    assert!(text.starts_with("# Welcome"));
    assert!(text.contains("Example home page."));
}

#[tokio::test]
async fn test_depth_bound_on_cycle() {
    let server = MockServer::start().await;
    let base = server.uri();

    // a -> b -> c -> a, and c -> d
    mount_page(&server, "/a", links_page(&["/b"]), 1).await;
    mount_page(&server, "/b", links_page(&["/c"]), 1).await;
    mount_page(&server, "/c", links_page(&["/a", "/d"]), 1).await;
    mount_page(&server, "/d", links_page(&["/a"]), 0).await;

    let sitemap = SitemapBuilder::new(fetcher(), 2)
        .generate_sitemap(&format!("{}/a", base))
        .await;

    assert_eq!(paths(sitemap.urls(), &base), vec!["/a", "/b", "/c"]);
}

#[tokio::test]
async fn test_depth_zero_visits_only_seed() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", links_page(&["/one", "/two"]), 1).await;
    mount_page(&server, "/one", links_page(&[]), 0).await;
    mount_page(&server, "/two", links_page(&[]), 0).await;

    let (sitemap, tally) = SitemapBuilder::new(fetcher(), 0)
        .generate_with_tally(&format!("{}/", base))
        .await;

    assert_eq!(paths(sitemap.urls(), &base), vec!["/"]);
    assert_eq!(tally.done, 1);
    assert_eq!(tally.skipped, 2);
}

#[tokio::test]
async fn test_each_url_crawled_once() {
    let server = MockServer::start().await;
    let base = server.uri();

    // Densely cross-linked pages; every page links to every other one.
    let all = ["/", "/p1", "/p2", "/p3", "/p4"];
    for route in all {
        mount_page(&server, route, links_page(&all), 1).await;
    }

    let (sitemap, tally) = SitemapBuilder::new(fetcher(), 3)
        .generate_with_tally(&format!("{}/", base))
        .await;

    assert_eq!(sitemap.len(), 5);
    let mut deduped = sitemap.urls().to_vec();
    deduped.dedup();
    assert_eq!(deduped.len(), sitemap.len());
    assert_eq!(tally.visited(), sitemap.len() as u64);
    assert_eq!(tally.failed, 0);
}

#[tokio::test]
async fn test_external_links_excluded() {
    let server = MockServer::start().await;
    let other = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/",
        links_page(&[
            &format!("{}/elsewhere", other.uri()),
            "https://example.org/",
            "mailto:someone@example.com",
            "/inside",
        ]),
        1,
    )
    .await;
    mount_page(&server, "/inside", links_page(&[]), 1).await;
    mount_page(&other, "/elsewhere", links_page(&[]), 0).await;

    let sitemap = SitemapBuilder::new(fetcher(), 2)
        .generate_sitemap(&format!("{}/", base))
        .await;

    assert_eq!(paths(sitemap.urls(), &base), vec!["/", "/inside"]);
    assert!(sitemap.urls().iter().all(|u| u.starts_with(&base)));
}

#[tokio::test]
async fn test_query_and_fragment_normalized() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/",
        links_page(&["#top", "/docs?page=2", "/docs#intro", "/docs"]),
        1,
    )
    .await;
    mount_page(&server, "/docs", links_page(&["/docs?page=3"]), 1).await;

    let sitemap = SitemapBuilder::new(fetcher(), 2)
        .generate_sitemap(&format!("{}/?ref=home#top", base))
        .await;

    assert_eq!(paths(sitemap.urls(), &base), vec!["/", "/docs"]);
}

#[tokio::test]
async fn test_failed_and_non_html_pages_listed() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/",
        links_page(&["/broken", "/data.json", "/fine"]),
        1,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/data.json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(r#"{"links": ["/never"]}"#, "application/json"),
        )
        .mount(&server)
        .await;
    mount_page(&server, "/fine", links_page(&["/deeper"]), 1).await;
    mount_page(&server, "/deeper", links_page(&[]), 1).await;

    let (sitemap, tally) = SitemapBuilder::new(fetcher(), 2)
        .generate_with_tally(&format!("{}/", base))
        .await;

    assert_eq!(
        paths(sitemap.urls(), &base),
        vec!["/", "/broken", "/data.json", "/deeper", "/fine"]
    );
    assert_eq!(tally.failed, 1);
    assert_eq!(tally.done, 4);
}

#[tokio::test]
async fn test_unreachable_seed_scrape_is_not_an_error() {
    let dir = TempDir::new().unwrap();
    let mut config = Config::default();
    config.download.directory = dir.path().join("downloads").display().to_string();

    let scraper = Scraper::new(config).unwrap();
    let extractor = ReadableTextExtractor::new(scraper.fetcher().clone());
    let result = scraper.scrape("http://127.0.0.1:1/", &extractor).await;

    assert!(result.text.is_none());
    assert!(result.downloads.is_empty());
    assert_eq!(result.sitemap.urls(), &["http://127.0.0.1:1/"]);
    assert_eq!(result.crawl.failed, 1);
    assert!(!dir.path().join("downloads").exists());
}

#[tokio::test]
async fn test_invalid_url_scrape_is_empty() {
    let scraper = Scraper::new(Config::default()).unwrap();
    let extractor = ReadableTextExtractor::new(scraper.fetcher().clone());
    let result = scraper.scrape("not a url", &extractor).await;

    assert!(result.is_empty());
}

/// Extractor that always fails, standing in for an unavailable service
struct FailingExtractor;

#[async_trait]
impl ContentExtractor for FailingExtractor {
    async fn extract(&self, url: &Url) -> Result<String, ExtractError> {
        Err(ExtractError::Empty(url.to_string()))
    }
}

#[tokio::test]
async fn test_extraction_failure_keeps_other_results() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", links_page(&["/next", "/file.zip"]), 2).await;
    mount_page(&server, "/next", links_page(&[]), 1).await;
    Mock::given(method("GET"))
        .and(path("/file.zip"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![1u8, 2, 3]))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut config = Config::default();
    config.download.directory = dir.path().display().to_string();

    let scraper = Scraper::new(config).unwrap();
    let result = scraper.scrape(&format!("{}/", base), &FailingExtractor).await;

    assert!(result.text.is_none());
    assert_eq!(result.downloads.successful(), 1);
    assert_eq!(paths(result.sitemap.urls(), &base), vec!["/", "/next"]);
}
