//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and run the full
//! crawl cycle end-to-end over real HTTP.

use moss::config::{validate_seed_url, Config};
use moss::crawler::{Coordinator, PageRecord, StopReason};
use moss::output::{write_report, OutputFormat};
use moss::url::Category;
use std::time::Duration;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration with short timeouts
fn create_test_config() -> Config {
    let mut config = Config::default();
    config.crawler.timeout = 1;
    config.crawler.concurrency = 4;
    config.user_agent.crawler_name = "TestBot".to_string();
    config.user_agent.crawler_version = "1.0.0".to_string();
    config
}

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(format!("<html><body>{}</body></html>", body))
        .insert_header("content-type", "text/html")
}

/// Mounts a GET mock that must be hit exactly `times` times
async fn mount_page(server: &MockServer, route: &str, response: ResponseTemplate, times: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(response)
        .expect(times)
        .mount(server)
        .await;
}

fn find<'a>(records: &'a [PageRecord], url: &str) -> &'a PageRecord {
    records
        .iter()
        .find(|record| record.url == url)
        .unwrap_or_else(|| panic!("no record for {}", url))
}

#[tokio::test]
async fn test_full_crawl_single_site() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/",
        html(r#"<a href="/page1">1</a> <a href="/page2#top">2</a>
                <a href="/style.css">css</a> <a href="/missing">gone</a>"#),
        1,
    )
    .await;
    mount_page(
        &server,
        "/page1",
        html(r#"<a href="/page2">again</a> <a href="page3/">3</a>"#),
        1,
    )
    .await;
    mount_page(&server, "/page2", html(r#"<a href="/">home</a>"#), 1).await;
    mount_page(&server, "/page3", html("leaf"), 1).await;
    mount_page(
        &server,
        "/style.css",
        ResponseTemplate::new(200).set_body_string("a { color: red }"),
        1,
    )
    .await;

    let seed = validate_seed_url(&format!("{}/", base)).unwrap();
    let report = Coordinator::new(seed, &create_test_config())
        .unwrap()
        .run()
        .await;

    let urls: Vec<&str> = report.records.iter().map(|r| r.url.as_str()).collect();
    assert_eq!(
        urls,
        vec![
            format!("{}/", base),
            format!("{}/style.css", base),
            format!("{}/page1", base),
            format!("{}/page2", base),
            format!("{}/missing", base),
            format!("{}/page3", base),
        ]
    );

    assert_eq!(report.stop_reason, StopReason::Exhausted);
    assert_eq!(report.levels, 3);
    assert_eq!(report.hostname, "127.0.0.1");

    let css = find(&report.records, &format!("{}/style.css", base));
    assert_eq!(css.category, Category::Frontend);
    assert_eq!(css.level, 1);
    assert_eq!(css.content_length, "a { color: red }".len());

    // Unmatched routes answer 404; the record keeps the status
    let missing = find(&report.records, &format!("{}/missing", base));
    assert_eq!(missing.status_code, 404);
    assert_eq!(missing.category, Category::Internal);
    assert_eq!(missing.level, 2);
}

#[tokio::test]
async fn test_other_hosts_fetched_once_not_expanded() {
    let site = MockServer::start().await;
    let other = MockServer::start().await;

    // Same machine, different host name: "localhost" is not the seed host
    let other_base = format!("http://localhost:{}", other.address().port());

    mount_page(
        &site,
        "/",
        html(&format!(
            r#"<a href="{0}/about">about</a> <a href="{0}/logo.png">logo</a>
               <a href="{0}/about?ref=home">about again</a>"#,
            other_base
        )),
        1,
    )
    .await;
    mount_page(
        &other,
        "/about",
        html(r#"<a href="/deeper">deeper</a>"#),
        1,
    )
    .await;
    mount_page(
        &other,
        "/logo.png",
        ResponseTemplate::new(200).set_body_bytes(vec![0x89, b'P', b'N', b'G']),
        1,
    )
    .await;
    mount_page(&other, "/deeper", html("never"), 0).await;

    let seed = validate_seed_url(&site.uri()).unwrap();
    let report = Coordinator::new(seed, &create_test_config())
        .unwrap()
        .run()
        .await;

    assert_eq!(report.records.len(), 3);
    assert_eq!(report.levels, 1);

    let about = find(&report.records, &format!("{}/about", other_base));
    assert_eq!(about.category, Category::External);
    assert_eq!(about.level, 1);

    let logo = find(&report.records, &format!("{}/logo.png", other_base));
    assert_eq!(logo.category, Category::Image);
    assert_eq!(logo.content_length, 4);
}

#[tokio::test]
async fn test_failed_fetches_are_dropped() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/",
        html(
            r#"<a href="/slow">slow</a> <a href="/fast">fast</a>
               <a href="http://127.0.0.1:1/report.pdf">unreachable</a>
               <a href="mailto:team@example.com">mail</a>"#,
        ),
        1,
    )
    .await;
    mount_page(
        &server,
        "/slow",
        html("late").set_delay(Duration::from_secs(3)),
        1,
    )
    .await;
    mount_page(&server, "/fast", html("quick"), 1).await;

    let seed = validate_seed_url(&base).unwrap();
    let report = Coordinator::new(seed, &create_test_config())
        .unwrap()
        .run()
        .await;

    let urls: Vec<&str> = report.records.iter().map(|r| r.url.as_str()).collect();
    assert_eq!(urls, vec![format!("{}/", base), format!("{}/fast", base)]);
    assert_eq!(report.stop_reason, StopReason::Exhausted);
}

#[tokio::test]
async fn test_latin1_page_links_decode_by_charset() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/",
        ResponseTemplate::new(200).set_body_raw(
            b"<a href=\"/caf\xE9\">caf\xE9</a>".to_vec(),
            "text/html; charset=iso-8859-1",
        ),
        1,
    )
    .await;
    mount_page(&server, "/caf%C3%A9", html("menu"), 1).await;

    let mut config = create_test_config();
    config.output.include_body = true;

    let seed = validate_seed_url(&base).unwrap();
    let report = Coordinator::new(seed, &config).unwrap().run().await;

    let urls: Vec<&str> = report.records.iter().map(|r| r.url.as_str()).collect();
    assert_eq!(urls, vec![format!("{}/", base), format!("{}/caf%C3%A9", base)]);
    assert_eq!(report.records[0].body, "<a href=\"/café\">café</a>");
    assert_eq!(report.records[0].content_length, 24);
}

#[tokio::test]
async fn test_requests_carry_user_agent() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .and(header("user-agent", "TestBot/1.0.0"))
        .respond_with(html("hello"))
        .expect(1)
        .mount(&server)
        .await;

    let seed = validate_seed_url(&server.uri()).unwrap();
    let report = Coordinator::new(seed, &create_test_config())
        .unwrap()
        .run()
        .await;

    assert_eq!(report.records.len(), 1);
    assert_eq!(report.records[0].status_code, 200);
}

#[tokio::test]
async fn test_max_pages_over_http() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/",
        html(r#"<a href="/a">a</a> <a href="/b">b</a> <a href="/c">c</a>"#),
        1,
    )
    .await;
    mount_page(&server, "/a", html("a"), 1).await;
    mount_page(&server, "/b", html("b"), 0).await;
    mount_page(&server, "/c", html("c"), 0).await;

    let mut config = create_test_config();
    config.crawler.max_pages = Some(2);

    let seed = validate_seed_url(&base).unwrap();
    let report = Coordinator::new(seed, &config).unwrap().run().await;

    assert_eq!(report.records.len(), 2);
    assert_eq!(report.stop_reason, StopReason::MaxPages);
}

#[tokio::test]
async fn test_crawl_and_write_json_report() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", html(r#"<a href="/data.csv">data</a>"#), 1).await;
    mount_page(
        &server,
        "/data.csv",
        ResponseTemplate::new(200).set_body_string("a,b\n1,2\n"),
        1,
    )
    .await;

    let temp = tempfile::tempdir().unwrap();
    let mut config = create_test_config();
    config.output.format = OutputFormat::Json;
    config.output.directory = Some(temp.path().to_path_buf());

    let seed = validate_seed_url(&base).unwrap();
    let report = moss::crawler::crawl(seed, &config).await.unwrap();
    let report_path = write_report(&report, &config.output).unwrap();

    assert_eq!(report_path, temp.path().join("moss_result_127.0.0.1.json"));

    let content = std::fs::read_to_string(&report_path).unwrap();
    let rows: serde_json::Value = serde_json::from_str(&content).unwrap();
    let rows = rows.as_array().unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["type"], "INTERNAL");
    assert_eq!(rows[1]["url"], format!("{}/data.csv", base));
    assert_eq!(rows[1]["type"], "DATA");
    assert_eq!(rows[1]["content_length"], 8);
    assert!(rows[0].get("body").is_none());
}
