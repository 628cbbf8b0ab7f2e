//! Integration tests for the harvest and extraction pipeline
//!
//! These tests use wiremock to serve a small documentation site and run the
//! full pipeline end-to-end with the HTTP renderer.

use docsift::config::{parse_config, BrowserConfig, Config, RenderEngine};
use docsift::crawler::{run_pipeline, HttpRenderer, PageRenderer, Stage};
use docsift::DocsiftError;
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const INDEX_PAGE: &str = r##"<html><head><title>Docs</title></head><body>
<nav><a href="/docs/nav-only">Nav</a></nav>
<article>
  <h1>Docs</h1>
  <div class="devsite-toc"><a href="/docs/toc-only">Contents</a></div>
  <h2>Guides</h2>
  <ul>
    <li><a href="/docs/guides/one">One</a></li>
    <li><a href="/docs/guides/two">Two</a></li>
    <li><a href="/docs/guides/one">One again</a></li>
    <li><a href="#install">Install</a></li>
  </ul>
  <h2>Reference</h2>
  <h3>Calendar</h3>
  <p><a href="/docs/reference/calendar">CalendarApp</a> and <a href="https://elsewhere.example/">elsewhere</a></p>
  <h2>Empty</h2>
</article>
</body></html>"##;

const GUIDE_ONE: &str = r#"<html><body>
<nav><p>Site menu</p></nav>
<article>
  <h1>One</h1>
  <div><span>On this page</span></div>
  <p>First<code>guide</code>page.</p>
</article>
</body></html>"#;

const CALENDAR: &str = r#"<html><body><main>
  <h2>CalendarApp</h2>
  <pre>var cal = CalendarApp.getDefaultCalendar();</pre>
  <ul><li>Item</li></ul>
</main></body></html>"#;

async fn mount_html(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

/// Serves the mock documentation site; `/docs/guides/two` always fails
async fn docs_site() -> MockServer {
    let server = MockServer::start().await;

    mount_html(&server, "/docs/", INDEX_PAGE).await;
    mount_html(&server, "/docs/guides/one", GUIDE_ONE).await;
    mount_html(&server, "/docs/reference/calendar", CALENDAR).await;

    Mock::given(method("GET"))
        .and(path("/docs/guides/two"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    server
}

/// Creates a test configuration pointing at the mock site
fn create_test_config(base_url: &str, output_dir: &Path) -> Config {
    parse_config(&format!(
        r#"
[browser]
engine = "http"
navigation-timeout-ms = 5000
settle-ms = 0
page-delay-ms = 0

[output]
directory = "{}"

[[source]]
name = "test_docs"
title = "Test Docs"
seeds = ["{}/docs/"]
allow = ["/docs/"]
"#,
        output_dir.display(),
        base_url
    ))
    .expect("Failed to parse test config")
}

fn read(path: &Path) -> String {
    std::fs::read_to_string(path).expect("Failed to read output document")
}

#[tokio::test]
async fn test_full_pipeline() {
    let server = docs_site().await;
    let base = server.uri();
    let out = TempDir::new().unwrap();
    let config = create_test_config(&base, out.path());

    let summaries = run_pipeline(config, Stage::All, None)
        .await
        .expect("Pipeline failed");

    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].links, Some(3));
    assert_eq!(summaries[0].pages, Some(2));

    // URL index
    let urls = read(&out.path().join("test_docs_urls.md"));
    assert!(urls.starts_with("# Test Docs - URL Index\n\nGenerated: "));
    assert!(urls.contains("- [Guides](#guides) (2)\n- [Reference / Calendar](#reference-/-calendar) (1)\n"));
    assert!(urls.contains("**Total: 3 items**"));
    assert!(urls.contains(&format!(
        "## Guides\n\n- [One]({base}/docs/guides/one)\n- [Two]({base}/docs/guides/two)\n\n"
    )));
    assert!(urls.contains(&format!(
        "## Reference / Calendar\n\n- [CalendarApp]({base}/docs/reference/calendar)\n\n"
    )));
    assert!(!urls.contains("nav-only"));
    assert!(!urls.contains("toc-only"));
    assert!(!urls.contains("elsewhere"));
    assert!(!urls.contains("## Empty"));
    assert!(!urls.contains("## Docs"));

    // Content document
    let content = read(&out.path().join("test_docs_content.md"));
    assert!(content.starts_with("# Test Docs - Content\n\n"));
    assert!(content.contains("**Total: 2 items**"));
    assert!(content.contains("## Guides\n\n### One\n\n# One\n\nFirst `guide` page.\n\n---\n\n"));
    assert!(content.contains(
        "## Reference / Calendar\n\n### CalendarApp\n\n## CalendarApp\n\n```\nvar cal = CalendarApp.getDefaultCalendar();\n```\n\n- Item\n\n---\n\n"
    ));
    assert!(!content.contains("### Two"));
    assert!(!content.contains("Site menu"));
    assert!(!content.contains("On this page"));
}

#[tokio::test]
async fn test_urls_only_then_content_only() {
    let server = docs_site().await;
    let out = TempDir::new().unwrap();

    let summaries = run_pipeline(
        create_test_config(&server.uri(), out.path()),
        Stage::UrlsOnly,
        Some("test_docs"),
    )
    .await
    .unwrap();
    assert_eq!(summaries[0].links, Some(3));
    assert_eq!(summaries[0].pages, None);
    assert!(!out.path().join("test_docs_content.md").exists());

    let summaries = run_pipeline(
        create_test_config(&server.uri(), out.path()),
        Stage::ContentOnly,
        None,
    )
    .await
    .unwrap();
    assert_eq!(summaries[0].links, None);
    assert_eq!(summaries[0].pages, Some(2));
    assert!(out.path().join("test_docs_content.md").exists());
}

#[tokio::test]
async fn test_content_only_requires_url_index() {
    let server = docs_site().await;
    let out = TempDir::new().unwrap();

    let summaries = run_pipeline(
        create_test_config(&server.uri(), out.path()),
        Stage::ContentOnly,
        None,
    )
    .await
    .unwrap();

    assert!(matches!(
        summaries[0].error,
        Some(DocsiftError::MissingLinkList(_))
    ));
    assert!(!out.path().join("test_docs_content.md").exists());
}

#[tokio::test]
async fn test_failed_reharvest_keeps_existing_index() {
    let server = docs_site().await;
    let out = TempDir::new().unwrap();

    run_pipeline(
        create_test_config(&server.uri(), out.path()),
        Stage::UrlsOnly,
        None,
    )
    .await
    .unwrap();
    let index = out.path().join("test_docs_urls.md");
    let first = read(&index);
    assert!(first.contains("**Total: 3 items**"));

    // Same source against a site that serves nothing
    let empty = MockServer::start().await;
    let summaries = run_pipeline(
        create_test_config(&empty.uri(), out.path()),
        Stage::UrlsOnly,
        None,
    )
    .await
    .unwrap();

    assert_eq!(summaries[0].links, Some(0));
    assert!(summaries[0].urls_path.is_none());
    assert_eq!(read(&index), first);
}

#[tokio::test]
async fn test_path_segment_sections_with_converted_content() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_html(
        &server,
        "/pine-script-docs/welcome/",
        r#"<html><body><main>
            <a href="/pine-script-docs/language/arrays/">Arrays</a>
            <a href="/pine-script-docs/error-messages/">Error messages</a>
        </main></body></html>"#,
    )
    .await;
    mount_html(
        &server,
        "/pine-script-docs/language/arrays/",
        r#"<html><body><main>
            <h1>Arrays</h1>
            <p>Arrays hold <a href="/pine-script-docs/language/maps/">many</a> values.</p>
            <p>Next: Maps</p>
            <p>Copyright 2025 TradingView</p>
        </main></body></html>"#,
    )
    .await;

    let out = TempDir::new().unwrap();
    let config = parse_config(&format!(
        r#"
[browser]
engine = "http"
page-delay-ms = 0

[output]
directory = "{}"

[[source]]
name = "pine_docs"
title = "Pine Docs"
seeds = ["{base}/pine-script-docs/welcome/"]
allow = ["/pine-script-docs/"]
section-rule = "path-segment"
section-base-path = "/pine-script-docs/"
content-mode = "converted"
"#,
        out.path().display()
    ))
    .unwrap();

    let summaries = run_pipeline(config, Stage::All, None).await.unwrap();
    assert_eq!(summaries[0].links, Some(2));
    assert_eq!(summaries[0].pages, Some(1));

    let urls = read(&out.path().join("pine_docs_urls.md"));
    assert!(urls.contains("- [Language](#language) (1)\n- [Error Messages](#error-messages) (1)\n"));

    let content = read(&out.path().join("pine_docs_content.md"));
    assert!(content.contains("### Arrays"));
    assert!(content.contains("Arrays hold many values."));
    assert!(!content.contains("Next: Maps"));
    assert!(!content.contains("Copyright"));
    assert!(!content.contains("http://"));
}

const REFERENCE_PAGE: &str = r##"<html><body><main>
<div class="tv-pine-reference-item" id="fun_ta.sma">
  <h3>ta.sma()</h3>
  <div class="tv-pine-reference-item__content">
    <div class="tv-pine-reference-item__text">Returns the simple moving average.</div>
    <div class="tv-pine-reference-item__sub-header">Example</div>
    <pre>plot(ta.sma(close, 20))</pre>
    <div class="tv-pine-reference-item__sub-header">See also</div>
    <div class="tv-pine-reference-item__see-also"><a href="#fun_ta.ema">ta.ema</a></div>
  </div>
</div>
<div class="tv-pine-reference-item" id="var_close">
  <h3>close</h3>
  <div class="tv-pine-reference-item__content">
    <div class="tv-pine-reference-item__text">Close price of the current bar.</div>
  </div>
</div>
</main></body></html>"##;

#[tokio::test]
async fn test_reference_items_pipeline() {
    let server = MockServer::start().await;
    let base = server.uri();
    mount_html(&server, "/pine-script-reference/v6/", REFERENCE_PAGE).await;

    let out = TempDir::new().unwrap();
    let config = parse_config(&format!(
        r#"
[browser]
engine = "http"
page-delay-ms = 0

[output]
directory = "{}"

[[source]]
name = "pine_reference"
title = "Pine Script V6 Reference"
seeds = ["{base}/pine-script-reference/v6/"]
section-rule = "item-id-prefix"
content-mode = "items"
code-language = "pine"
"#,
        out.path().display()
    ))
    .unwrap();

    let summaries = run_pipeline(config, Stage::All, None).await.unwrap();
    assert_eq!(summaries[0].links, Some(2));
    assert_eq!(summaries[0].pages, Some(2));

    let urls = read(&out.path().join("pine_reference_urls.md"));
    assert!(urls.contains("- [Functions](#functions) (1)\n- [Variables](#variables) (1)\n"));
    assert!(urls.contains(&format!(
        "## Functions\n\n- [ta.sma()]({base}/pine-script-reference/v6/#fun_ta.sma)\n\n"
    )));

    let content = read(&out.path().join("pine_reference_content.md"));
    assert!(content.contains(
        "### ta.sma()\n\nReturns the simple moving average.\n\n**Example**\n\n```pine\nplot(ta.sma(close, 20))\n```\n\n---\n\n"
    ));
    assert!(content.contains("### close\n\nClose price of the current bar."));
    assert!(!content.contains("ta.ema"));

    // One render for the harvest, one for all items
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
}

#[tokio::test]
async fn test_http_renderer_reports_status() {
    let server = MockServer::start().await;
    let config = BrowserConfig {
        engine: RenderEngine::Http,
        ..BrowserConfig::default()
    };
    let mut renderer = HttpRenderer::new(&config).unwrap();

    let result = renderer.render(&format!("{}/missing", server.uri())).await;
    match result {
        Err(DocsiftError::HttpStatus { status, .. }) => assert_eq!(status, 404),
        other => panic!("expected HTTP 404, got {:?}", other.map(|_| ())),
    }
}

#[tokio::test]
async fn test_http_renderer_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<html></html>")
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let config = BrowserConfig {
        engine: RenderEngine::Http,
        navigation_timeout_ms: 200,
        ..BrowserConfig::default()
    };
    let mut renderer = HttpRenderer::new(&config).unwrap();

    let result = renderer.render(&format!("{}/slow", server.uri())).await;
    assert!(matches!(result, Err(DocsiftError::Timeout { .. })));
}
