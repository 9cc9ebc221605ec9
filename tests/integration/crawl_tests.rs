//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use link_atlas::config::CrawlerConfig;
use link_atlas::crawler::{CrawlMode, Crawler};
use link_atlas::output::{to_graphml, CrawlReport};
use link_atlas::progress::{self, EventKind, ObserverRegistry, ProgressEvent, ProgressRelay};
use link_atlas::{AtlasError, CrawlResult};
use tokio::sync::mpsc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_crawler() -> Crawler {
    let config = CrawlerConfig {
        request_timeout_secs: 2,
        connect_timeout_secs: 2,
        ..CrawlerConfig::default()
    };
    Crawler::from_config(&config).expect("Failed to build crawler")
}

async fn mount_page(server: &MockServer, page: &str, status: u16, body: String) {
    Mock::given(method("GET"))
        .and(path(page))
        .respond_with(
            ResponseTemplate::new(status)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

/// Drains every event from a closed progress channel
async fn collect(mut events: mpsc::Receiver<ProgressEvent>) -> Vec<ProgressEvent> {
    let mut collected = Vec::new();
    while let Some(event) = events.recv().await {
        collected.push(event);
    }
    collected
}

/// Site layout:
///
/// ```text
/// /        -> /page1, /page2 (absolute), http://other.test/, /page1?ref=x
/// /page1   -> /, /page1/deep
/// /page2   -> 404
/// /page1/deep -> /page3
/// ```
async fn mount_site(server: &MockServer) {
    let base = server.uri();

    mount_page(
        server,
        "/",
        200,
        format!(
            r#"<html><body>
            <a href="/page1">Page 1</a>
            <a href="{}/page2">Page 2</a>
            <a href="http://other.test/">Elsewhere</a>
            <a href="/page1?ref=x">Page 1 again</a>
            </body></html>"#,
            base
        ),
    )
    .await;

    mount_page(
        server,
        "/page1",
        200,
        r#"<html><body><a href="/">Home</a><a href="page1/deep">Deep</a></body></html>"#
            .to_string(),
    )
    .await;

    mount_page(server, "/page2", 404, "not found".to_string()).await;

    mount_page(
        server,
        "/page1/deep",
        200,
        r#"<a href="/page3">Page 3</a>"#.to_string(),
    )
    .await;
}

#[tokio::test]
async fn test_graph_crawl_single_origin() {
    let server = MockServer::start().await;
    mount_site(&server).await;
    let base = server.uri();

    let (sink, events) = progress::channel(1024);
    let graph = test_crawler()
        .crawl_graph(&format!("{}/", base), 2, &sink)
        .await
        .expect("Crawl failed");
    drop(sink);

    let home = base.clone();
    let page1 = format!("{}/page1", base);
    let page2 = format!("{}/page2", base);
    let deep = format!("{}/page1/deep", base);

    // Crawl order is breadth-first
    let order: Vec<&str> = graph.pages().map(|p| p.as_str()).collect();
    assert_eq!(
        order,
        vec![home.as_str(), page1.as_str(), page2.as_str(), deep.as_str()]
    );

    let home_links: Vec<&str> = graph.links(&home).unwrap().iter().map(|p| p.as_str()).collect();
    assert_eq!(home_links, vec![page1.as_str(), page2.as_str(), page1.as_str()]);

    // 404 page is present with no links
    assert_eq!(graph.links(&page2).map(|l| l.len()), Some(0));

    // /page3 is beyond depth 2: an edge target, never a key
    assert!(!graph.contains(&format!("{}/page3", base)));
    assert_eq!(graph.links(&deep).unwrap().len(), 1);

    // Every edge stays within the seed's origin
    assert!(graph
        .iter()
        .flat_map(|(_, links)| links)
        .all(|link| link.as_str().starts_with(&base)));

    let events = collect(events).await;
    let started = events
        .iter()
        .filter(|e| e.kind() == EventKind::PageStarted)
        .count();
    assert_eq!(started, 4);
    assert_eq!(events.last(), Some(&ProgressEvent::Completed { count: 4 }));
}

#[tokio::test]
async fn test_graph_crawl_fetches_each_page_once() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<a href="/a">a</a><a href="/b">b</a><a href="/a/">a again</a>"#,
        ))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(r#"<a href="/b">b</a><a href="/">home</a>"#),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/b"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"<a href="/a">a</a>"#))
        .expect(1)
        .mount(&server)
        .await;

    let graph = test_crawler()
        .crawl_graph(&base, 5, &progress::NullSink)
        .await
        .expect("Crawl failed");

    assert_eq!(graph.len(), 3);
    server.verify().await;
}

#[tokio::test]
async fn test_graph_crawl_follows_redirects() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", 200, r#"<a href="/old">old</a>"#.to_string()).await;
    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(ResponseTemplate::new(301).insert_header("location", "/new"))
        .mount(&server)
        .await;
    mount_page(&server, "/new", 200, r#"<a href="/">home</a>"#.to_string()).await;

    let graph = test_crawler()
        .crawl_graph(&base, 1, &progress::NullSink)
        .await
        .expect("Crawl failed");

    // The page is keyed by the URL that was linked, not where it landed
    let old = format!("{}/old", base);
    assert_eq!(graph.links(&old).unwrap()[0].as_str(), base);
}

#[tokio::test]
async fn test_simple_crawl_returns_raw_links() {
    let server = MockServer::start().await;
    mount_site(&server).await;
    let base = server.uri();

    let (sink, events) = progress::channel(64);
    let links = test_crawler()
        .crawl_simple(&format!("{}/", base), &sink)
        .await
        .expect("Crawl failed");
    drop(sink);

    assert_eq!(
        links,
        vec![
            "/page1".to_string(),
            format!("{}/page2", base),
            "http://other.test/".to_string(),
            "/page1?ref=x".to_string(),
        ]
    );

    let kinds: Vec<EventKind> = collect(events).await.iter().map(|e| e.kind()).collect();
    assert_eq!(
        kinds,
        vec![
            EventKind::PageStarted,
            EventKind::PageResult,
            EventKind::SimpleLinksFound,
            EventKind::Completed,
        ]
    );
}

#[tokio::test]
async fn test_simple_crawl_404() {
    let server = MockServer::start().await;
    let base = server.uri();

    let (sink, events) = progress::channel(64);
    let links = test_crawler()
        .crawl_simple(&format!("{}/missing", base), &sink)
        .await
        .expect("Crawl failed");
    drop(sink);

    assert!(links.is_empty());

    let events = collect(events).await;
    let results: Vec<&ProgressEvent> = events
        .iter()
        .filter(|e| e.kind() == EventKind::PageResult)
        .collect();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].count(), 404);
    assert!(events.iter().all(|e| e.kind() != EventKind::Error));
}

#[tokio::test]
async fn test_unreachable_seed_degrades_to_empty_graph() {
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let seed = format!("http://127.0.0.1:{}/", port);

    let (sink, events) = progress::channel(64);
    let graph = test_crawler()
        .crawl_graph(&seed, 2, &sink)
        .await
        .expect("Crawl should not fail on transport errors");
    drop(sink);

    assert_eq!(graph.len(), 1);
    assert!(graph.iter().all(|(_, links)| links.is_empty()));

    let events = collect(events).await;
    let errors: Vec<&ProgressEvent> = events
        .iter()
        .filter(|e| e.kind() == EventKind::Error)
        .collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].count(), 500);
}

#[tokio::test]
async fn test_invalid_seed_is_rejected() {
    let result = test_crawler()
        .crawl(
            "mailto:someone@example.com",
            CrawlMode::Graph { max_depth: 2 },
            &progress::NullSink,
        )
        .await;

    assert!(matches!(result, Err(AtlasError::InvalidSeed { .. })));
}

#[tokio::test]
async fn test_progress_relayed_to_observer() {
    let server = MockServer::start().await;
    mount_site(&server).await;
    let base = server.uri();

    let registry = ObserverRegistry::new();
    let mut observer = registry.register("client-1");

    let (sink, events) = progress::channel(1024);
    let relay = ProgressRelay::new(registry.clone(), "client-1", 9);
    let relay_task = relay.clone().spawn(events);

    let result = test_crawler()
        .crawl(&base, CrawlMode::Graph { max_depth: 1 }, &sink)
        .await
        .expect("Crawl failed");
    drop(sink);
    let relayed = relay_task.await.unwrap();

    let report = CrawlReport::new(&base, result, chrono::Utc::now()).unwrap();
    assert!(relay.publish_result(&report));

    let mut messages = Vec::new();
    while let Ok(message) = observer.try_recv() {
        messages.push(serde_json::from_str::<serde_json::Value>(&message).unwrap());
    }

    assert_eq!(messages.len(), relayed + 1);
    assert_eq!(messages[0]["kind"], "page_started");
    assert_eq!(messages[relayed - 1]["kind"], "completed");

    let last = messages.last().unwrap();
    assert_eq!(last["type"], "result");
    assert_eq!(last["task_id"], 9);
    assert_eq!(last["data"]["message"], "Built graph of 3 pages");
}

#[tokio::test]
async fn test_graphml_from_crawled_graph() {
    let server = MockServer::start().await;
    mount_site(&server).await;
    let base = server.uri();

    let result = test_crawler()
        .crawl(&base, CrawlMode::Graph { max_depth: 2 }, &progress::NullSink)
        .await
        .expect("Crawl failed");
    let CrawlResult::SiteGraph(graph) = result else {
        panic!("expected a site graph");
    };

    let xml = to_graphml(&graph).unwrap();

    assert_eq!(xml.matches("<node ").count(), graph.len());
    // Home -> page1, page2, page1; page1 -> home, deep; deep -> page3 is dropped
    assert_eq!(xml.matches("<edge ").count(), 5);
    assert_eq!(xml, to_graphml(&graph).unwrap());
}
