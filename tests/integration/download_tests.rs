//! Integration tests for file downloads
//!
//! A mock page links to files on a mock server; the orchestrator is run
//! against it and the written files are checked on disk.

use pagewise::config::CrawlerConfig;
use pagewise::crawler::{download, scan_and_download, DownloadOutcome, Fetcher};
use pagewise::ExtensionSet;
use tempfile::TempDir;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fetcher() -> Fetcher {
    Fetcher::new(&CrawlerConfig::default()).expect("Failed to build fetcher")
}

async fn mount_html(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(body, "text/html"),
        )
        .mount(server)
        .await;
}

async fn mount_file(server: &MockServer, route: &str, body: &[u8], times: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body.to_vec()))
        .expect(times)
        .mount(server)
        .await;
}

fn page_url(server: &MockServer) -> Url {
    Url::parse(&format!("{}/", server.uri())).unwrap()
}

#[tokio::test]
async fn test_extension_filter_exactness() {
    let server = MockServer::start().await;
    mount_html(
        &server,
        "/",
        r#"<html><body>
            <a href="a.pdf">A</a>
            <a href="b.PDF">B</a>
            <a href="c.html">C</a>
            <a href="d.zip?x=1">D</a>
        </body></html>"#
            .to_string(),
    )
    .await;
    mount_file(&server, "/a.pdf", b"a", 1).await;
    mount_file(&server, "/b.PDF", b"b", 1).await;
    mount_file(&server, "/c.html", b"c", 0).await;
    mount_file(&server, "/d.zip", b"d", 1).await;

    let dir = TempDir::new().unwrap();
    let report = scan_and_download(
        &fetcher(),
        &page_url(&server),
        dir.path(),
        &ExtensionSet::new(["pdf", "zip"]),
    )
    .await;

    assert_eq!(report.attempted(), 3);
    assert_eq!(report.successful(), 3);
    assert!(dir.path().join("a.pdf").exists());
    assert!(dir.path().join("b.PDF").exists());
    assert!(dir.path().join("d.zip").exists());
    assert!(!dir.path().join("c.html").exists());
}

#[tokio::test]
async fn test_partial_failure_isolation() {
    let server = MockServer::start().await;
    mount_html(
        &server,
        "/",
        r#"<html><body>
            <a href="/one.pdf">1</a>
            <a href="/two.pdf">2</a>
            <a href="http://127.0.0.1:1/dead.pdf">3</a>
            <a href="/three.pdf">4</a>
            <a href="/four.pdf">5</a>
        </body></html>"#
            .to_string(),
    )
    .await;
    for route in ["/one.pdf", "/two.pdf", "/three.pdf", "/four.pdf"] {
        mount_file(&server, route, b"%PDF", 1).await;
    }

    let dir = TempDir::new().unwrap();
    let report = scan_and_download(
        &fetcher(),
        &page_url(&server),
        dir.path(),
        &ExtensionSet::new(["pdf"]),
    )
    .await;

    assert_eq!(report.outcomes().len(), 5);
    assert_eq!(report.successful(), 4);
    assert_eq!(report.failed(), 1);

    let failed: Vec<_> = report
        .outcomes()
        .iter()
        .filter(|o| !o.is_success())
        .map(|o| o.url().as_str())
        .collect();
    assert_eq!(failed, vec!["http://127.0.0.1:1/dead.pdf"]);
    assert_eq!(report.files().count(), 4);
}

#[tokio::test]
async fn test_idempotent_directory_creation() {
    let server = MockServer::start().await;
    mount_file(&server, "/first.zip", b"1", 1).await;
    mount_file(&server, "/second.zip", b"2", 1).await;

    let dir = TempDir::new().unwrap();
    let target = dir.path().join("not").join("yet").join("there");
    let fetcher = fetcher();

    let first = Url::parse(&format!("{}/first.zip", server.uri())).unwrap();
    let second = Url::parse(&format!("{}/second.zip", server.uri())).unwrap();

    assert!(download(&fetcher, &first, &target).await.is_success());
    assert!(download(&fetcher, &second, &target).await.is_success());
    assert_eq!(std::fs::read(target.join("second.zip")).unwrap(), b"2");
}

#[tokio::test]
async fn test_concurrent_downloads_share_new_directory() {
    let server = MockServer::start().await;
    let names: Vec<String> = (0..8).map(|i| format!("file{}.png", i)).collect();
    let anchors: String = names
        .iter()
        .map(|n| format!(r#"<a href="{}">img</a>"#, n))
        .collect();
    mount_html(&server, "/", format!("<html><body>{}</body></html>", anchors)).await;
    for name in &names {
        mount_file(&server, &format!("/{}", name), b"png", 1).await;
    }

    let dir = TempDir::new().unwrap();
    let target = dir.path().join("images");
    let report = scan_and_download(
        &fetcher(),
        &page_url(&server),
        &target,
        &ExtensionSet::new(["png"]),
    )
    .await;

    assert_eq!(report.successful(), names.len());
    for name in &names {
        assert!(target.join(name).exists());
    }
}

#[tokio::test]
async fn test_non_html_page_not_scanned() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(r#"<a href="a.pdf">looks like html</a>"#, "text/plain"),
        )
        .mount(&server)
        .await;
    mount_file(&server, "/a.pdf", b"a", 0).await;

    let dir = TempDir::new().unwrap();
    let report = scan_and_download(
        &fetcher(),
        &page_url(&server),
        dir.path(),
        &ExtensionSet::new(["pdf"]),
    )
    .await;

    assert!(report.is_empty());
}

#[tokio::test]
async fn test_missing_page_gives_empty_report() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let report = scan_and_download(
        &fetcher(),
        &page_url(&server),
        dir.path(),
        &ExtensionSet::new(["pdf"]),
    )
    .await;

    assert!(report.is_empty());
}

#[tokio::test]
async fn test_failed_file_reports_status() {
    let server = MockServer::start().await;
    mount_html(&server, "/", r#"<a href="/gone.pdf">gone</a>"#.to_string()).await;
    Mock::given(method("GET"))
        .and(path("/gone.pdf"))
        .respond_with(ResponseTemplate::new(410))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let report = scan_and_download(
        &fetcher(),
        &page_url(&server),
        dir.path(),
        &ExtensionSet::new(["pdf"]),
    )
    .await;

    match report.outcomes() {
        [DownloadOutcome::Failure { error, .. }] => {
            assert!(error.to_string().contains("410"));
        }
        other => panic!("expected one failure, got {:?}", other),
    }
}
