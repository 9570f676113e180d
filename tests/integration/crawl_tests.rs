//! Integration tests for the migrator
//!
//! These tests use wiremock to create mock HTTP servers and test
//! discovery and the full migration cycle end-to-end.

use serde_json::Value;
use std::path::Path;
use std::time::Duration;
use sumi_migrate::config::{parse_config, Config};
use sumi_migrate::crawler::{Discoverer, DiscoverySource, FetchResult, Fetcher, Scheduler};
use sumi_migrate::robots::RobotsRules;
use sumi_migrate::url::UrlFilter;
use sumi_migrate::{Coordinator, MigrateError, RunMode};
use tempfile::TempDir;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointing at the mock server, with every
/// output directory inside `out`
fn create_test_config(base_url: &str, out: &Path, max_retries: u32, robots: bool) -> Config {
    let dir = |name: &str| out.join(name).display().to_string();
    parse_config(&format!(
        r#"
[site]
base-url = '{base}/'
site-name = 'Example Co'

[crawler]
request-delay-ms = 0
retry-delay-ms = 10
max-retries = {retries}
respect-robots-txt = {robots}

[user-agent]
crawler-name = "TestBot"
crawler-version = "1.0"
contact-url = "https://example.com/bot"
contact-email = "bot@example.com"

[output]
content-dir = '{content}'
data-dir = '{data}'
reports-dir = '{reports}'
public-dir = '{public}'
"#,
        base = base_url,
        retries = max_retries,
        robots = robots,
        content = dir("content"),
        data = dir("data"),
        reports = dir("reports"),
        public = dir("public"),
    ))
    .expect("test config is valid")
}

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body.to_string())
        .insert_header("content-type", "text/html")
}

fn xml(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body)
        .insert_header("content-type", "application/xml")
}

fn urlset(locs: &[String]) -> String {
    let entries: String = locs
        .iter()
        .map(|loc| format!("<url><loc>{}</loc></url>", loc))
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">{}</urlset>"#,
        entries
    )
}

fn read_json(path: &Path) -> Value {
    let content = std::fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("cannot read {}: {}", path.display(), e));
    serde_json::from_str(&content).unwrap()
}

fn test_fetcher(config: &Config) -> Fetcher {
    Fetcher::new(&config.user_agent, &config.crawler).unwrap()
}

#[tokio::test]
async fn test_sitemap_index_discovery_is_complete_and_repeatable() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    let index = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
        <sitemapindex xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
          <sitemap><loc>{base}/page-sitemap.xml</loc></sitemap>
          <sitemap><loc>{base}/post-sitemap.xml</loc></sitemap>
        </sitemapindex>"#
    );
    let pages: Vec<String> = (0..30).map(|i| format!("{}/page-{}/", base, i)).collect();
    let posts: Vec<String> = (0..20).map(|i| format!("{}/blog/post-{}/", base, i)).collect();

    Mock::given(method("GET"))
        .and(path("/sitemap_index.xml"))
        .respond_with(xml(index))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/page-sitemap.xml"))
        .respond_with(xml(urlset(&pages)))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/post-sitemap.xml"))
        .respond_with(xml(urlset(&posts)))
        .mount(&mock_server)
        .await;

    let out = TempDir::new().unwrap();
    let config = create_test_config(&base, out.path(), 0, false);
    let fetcher = test_fetcher(&config);
    let filter = UrlFilter::from_config(&config).unwrap();
    let robots = RobotsRules::allow_all("TestBot");
    let sitemap_url = filter.base().join("/sitemap_index.xml").unwrap();

    let mut scheduler = Scheduler::with_delay(Duration::ZERO);
    let first = Discoverer::new(&fetcher, &mut scheduler, &filter, &robots)
        .discover(&sitemap_url)
        .await;

    assert_eq!(first.source, DiscoverySource::Sitemap);
    assert_eq!(first.urls.len(), 50);
    assert_eq!(first.urls[0].as_str(), format!("{}/page-0/", base));
    assert_eq!(first.urls[30].as_str(), format!("{}/blog/post-0/", base));

    // Same server contents, same discovered sequence
    let second = Discoverer::new(&fetcher, &mut scheduler, &filter, &robots)
        .discover(&sitemap_url)
        .await;
    let keys = |d: &sumi_migrate::crawler::Discovery| -> Vec<String> {
        d.urls.iter().map(|u| u.as_str().to_string()).collect()
    };
    assert_eq!(keys(&first), keys(&second));
}

#[tokio::test]
async fn test_crawl_fallback_fetches_each_page_once() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    // No sitemap is mounted, so discovery falls back to crawling
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(&format!(
            r##"<html><body>
            <a href="/a/">A</a>
            <a href="/b">B</a>
            <a href="/a/#team">A again</a>
            <a href="{base}/a">A without slash</a>
            <a href="https://elsewhere.org/">External</a>
            <a href="mailto:hi@example.com">Mail</a>
            <a href="/wp-admin/">Admin</a>
            </body></html>"##
        )))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/a/"))
        .respond_with(html(r#"<a href="/">Home</a><a href="/b/">B</a>"#))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/b"))
        .respond_with(html(r#"<a href="c">C</a>"#))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/c"))
        .respond_with(html("<p>Leaf</p>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let out = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri(), out.path(), 0, false);
    let fetcher = test_fetcher(&config);
    let filter = UrlFilter::from_config(&config).unwrap();
    let robots = RobotsRules::allow_all("TestBot");
    let sitemap_url = filter.base().join("/sitemap_index.xml").unwrap();
    let mut scheduler = Scheduler::with_delay(Duration::ZERO);

    let discovery = Discoverer::new(&fetcher, &mut scheduler, &filter, &robots)
        .discover(&sitemap_url)
        .await;

    assert_eq!(discovery.source, DiscoverySource::Crawl);
    let paths: Vec<&str> = discovery.urls.iter().map(|u| u.path()).collect();
    assert_eq!(paths, vec!["/", "/a/", "/b", "/c"]);
    // Mock expectations verify that no page was fetched twice
}

#[tokio::test]
async fn test_failing_endpoint_is_tried_exactly_max_retries_plus_one_times() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(503))
        .expect(4)
        .mount(&mock_server)
        .await;

    let out = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri(), out.path(), 3, false);
    let fetcher = test_fetcher(&config);

    let result = fetcher.fetch(&format!("{}/flaky", mock_server.uri())).await;
    match result {
        FetchResult::Failed { attempts, error } => {
            assert_eq!(attempts, 4);
            assert!(error.contains("503"), "unexpected error: {}", error);
        }
        FetchResult::Success { .. } => panic!("expected failure"),
    }
}

#[tokio::test]
async fn test_full_site_migration_writes_all_artifacts() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("User-agent: *\nAllow: /"))
        .mount(&mock_server)
        .await;

    let locs = vec![
        format!("{}/", base),
        format!("{}/services/consulting/", base),
        format!("{}/about", base),
        format!("{}/broken/", base),
    ];
    Mock::given(method("GET"))
        .and(path("/sitemap_index.xml"))
        .respond_with(xml(urlset(&locs)))
        .mount(&mock_server)
        .await;

    let homepage = r#"<html><head>
        <title>Example Co</title>
        <meta name="description" content="We build things">
        <script async src="https://www.googletagmanager.com/gtag/js?id=G-TEST123"></script>
        </head><body>
        <header>
          <a class="logo" href="/"><img src="/wp-content/uploads/logo.png" alt="Example"></a>
          <nav><ul>
            <li><a href="/">Home</a></li>
            <li><a href="/services/">Services</a>
              <ul class="sub-menu">
                <li><a href="/services/consulting/">Consulting</a></li>
              </ul>
            </li>
            <li><a href="about">About</a></li>
          </ul></nav>
        </header>
        <main>
          <h1>Welcome</h1>
          <p>We build <strong>things</strong>.</p>
          <img src="/wp-content/uploads/2024/01/hero.jpg" alt="Hero">
        </main>
        <footer>
          <div class="widget"><h3>Company</h3><a href="/about">About us</a></div>
          <p class="copyright">© 2024 Example Co</p>
        </footer>
        </body></html>"#;

    // Navigation and extraction share one homepage fetch
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(homepage))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/services/consulting/"))
        .respond_with(html(
            r#"<html><head><title>Consulting</title></head><body><main>
            <h1>Consulting</h1>
            <form id="contact" action="/send" method="post">
              <label for="email">Your email</label>
              <input type="email" id="email" name="email" required>
              <textarea name="message" placeholder="How can we help?"></textarea>
              <button type="submit">Send</button>
            </form>
            </main></body></html>"#,
        ))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/about"))
        .respond_with(html(
            r#"<html><head><title>About</title></head><body><article><h2>Our story</h2></article></body></html>"#,
        ))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/broken/"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/wp-content/uploads/2024/01/hero.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"JPEGDATA".to_vec()))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/wp-content/uploads/logo.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"PNGDATA".to_vec()))
        .mount(&mock_server)
        .await;

    let out = TempDir::new().unwrap();
    let config = create_test_config(&base, out.path(), 2, true);
    let mut coordinator = Coordinator::new(config, "abc123").unwrap();
    let summary = coordinator.run(RunMode::FullSite).await.unwrap();

    assert_eq!(summary.discovered, 4);
    assert_eq!(summary.extracted, 3);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.documents_written, 3);
    assert_eq!(coordinator.failed_urls(), &[format!("{}/broken/", base)]);

    // Documents
    let content = out.path().join("content");
    let index = std::fs::read_to_string(content.join("index.mdx")).unwrap();
    assert!(index.starts_with("---\ntitle: \"Example Co\"\n"));
    assert!(index.contains("layout: \"homepage\"\n"));
    assert!(index.contains("# Welcome"));
    assert!(!index.contains("Services"), "navigation leaked into content");

    let consulting =
        std::fs::read_to_string(content.join("services/consulting/index.mdx")).unwrap();
    assert!(consulting.contains("layout: \"service\"\n"));
    assert!(content.join("about.mdx").exists());
    assert!(!content.join("broken/index.mdx").exists());

    // Navigation
    let nav = read_json(&out.path().join("data/navigation.json"));
    assert_eq!(nav["header"]["logo"], "/images/logo.png");
    assert_eq!(nav["header"]["menu"][0]["label"], "Home");
    assert_eq!(nav["header"]["menu"][1]["items"][0]["href"], "/services/consulting/");
    assert_eq!(nav["header"]["menu"][2]["href"], "/about");
    assert_eq!(nav["footer"]["copyright"], "© 2024 Example Co");
    assert_eq!(nav["footer"]["sections"][0]["title"], "Company");

    // Reports
    let reports = out.path().join("reports");
    let migration = read_json(&reports.join("migration-report.json"));
    assert_eq!(migration["totalPages"], 4);
    assert_eq!(migration["successfulPages"], 3);
    assert_eq!(migration["failedPages"], 1);
    assert_eq!(migration["pagesWithForms"], 1);
    assert_eq!(migration["pagesWithAnalytics"], 1);
    assert_eq!(migration["configHash"], "abc123");

    let audit = read_json(&reports.join("url-audit.json"));
    assert_eq!(audit["total"], 3);
    assert_eq!(audit["mappings"][1]["destinationPath"], "/services/consulting/");

    let forms = read_json(&reports.join("forms.json"));
    assert_eq!(forms["totalForms"], 1);
    assert_eq!(forms["forms"][0]["formId"], "contact");
    assert_eq!(forms["forms"][0]["fields"][0]["label"], "Your email");

    let analytics = read_json(&reports.join("analytics-audit.json"));
    assert_eq!(
        analytics["detectedScripts"][0]["type"],
        "Google Analytics (gtag.js)"
    );
    assert_eq!(analytics["detectedScripts"][0]["id"], "G-TEST123");

    // Assets: upload paths preserved, logo flattened
    let public = out.path().join("public");
    assert_eq!(
        std::fs::read(public.join("wp-content/uploads/2024/01/hero.jpg")).unwrap(),
        b"JPEGDATA"
    );
    assert_eq!(std::fs::read(public.join("images/logo.png")).unwrap(), b"PNGDATA");
    assert_eq!(summary.images_failed, 0);
}

#[tokio::test]
async fn test_homepage_mode_skips_discovery() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(
            r#"<html><head><title>Home</title></head><body>
            <header><nav><ul><li><a href="/about/">About</a></li></ul></nav></header>
            <main><h1>Hello</h1><img src="/missing/banner.png"></main>
            </body></html>"#,
        ))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/sitemap_index.xml"))
        .respond_with(xml(urlset(&[])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let out = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri(), out.path(), 0, false);
    let mut coordinator = Coordinator::new(config, "hash").unwrap();
    let summary = coordinator.run(RunMode::Homepage).await.unwrap();

    assert_eq!(summary.extracted, 1);
    assert_eq!(summary.documents_written, 1);
    assert_eq!(summary.images_failed, 1);
    assert!(out.path().join("content/index.mdx").exists());

    // Without a logo image the configured default is kept
    let nav = read_json(&out.path().join("data/navigation.json"));
    assert_eq!(nav["header"]["logo"], "/images/logo.png");
    assert_eq!(nav["header"]["menu"][0]["href"], "/about/");
}

#[tokio::test]
async fn test_homepage_mode_fails_when_homepage_unavailable() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(500))
        .expect(2)
        .mount(&mock_server)
        .await;

    let out = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri(), out.path(), 1, false);
    let mut coordinator = Coordinator::new(config, "hash").unwrap();

    let err = coordinator.run(RunMode::Homepage).await.unwrap_err();
    assert!(matches!(err, MigrateError::HomepageUnavailable { .. }));
    assert!(!out.path().join("reports").exists());
}

#[tokio::test]
async fn test_robots_disallowed_pages_are_not_fetched() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("User-agent: *\nDisallow: /private/\n"),
        )
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/sitemap_index.xml"))
        .respond_with(xml(urlset(&[
            format!("{}/public/", base),
            format!("{}/private/secret/", base),
        ])))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html("<html><body><main>Home</main></body></html>"))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/public/"))
        .respond_with(html("<html><body><main>Public</main></body></html>"))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/private/secret/"))
        .respond_with(html("<html><body><main>Secret</main></body></html>"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let out = TempDir::new().unwrap();
    let config = create_test_config(&base, out.path(), 0, true);
    let mut coordinator = Coordinator::new(config, "hash").unwrap();
    let summary = coordinator.run(RunMode::FullSite).await.unwrap();

    assert_eq!(summary.discovered, 1);
    assert_eq!(summary.extracted, 1);
    let public = Url::parse(&format!("{}/public/", base)).unwrap();
    assert!(coordinator
        .pages()
        .iter()
        .any(|page| page.url == public.as_str()));
}
