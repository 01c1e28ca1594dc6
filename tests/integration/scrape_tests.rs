use gazeta::checkpoint::{CrawlCheckpointStore, ParseCheckpointStore};
use gazeta::config::{ScraperConfig, SeedTarget};
use gazeta::crawler::Coordinator;
use gazeta::fetch::{DelayBounds, Gateway, HttpTransport, RetryPolicy};
use gazeta::output::ArticleWriter;
use gazeta::sources::{BodyRule, FetchMode, JoinRule, LinkRule, Pagination, Source, SourceRegistry};
use std::collections::BTreeMap;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Scraper config with no delays and no retries, suitable for tests
fn test_scraper_config() -> ScraperConfig {
    ScraperConfig {
        timeout_seconds: 5,
        encoding: "utf-8".to_string(),
        delay_min_seconds: 0,
        delay_max_seconds: 0,
        retry_max_attempts: 1,
        retry_backoff_ms: 0,
        headers: BTreeMap::new(),
    }
}

/// A source profile matching URLs containing `pattern`, with the markup
/// conventions all test pages share
fn test_source(pattern: &str, bucket: &str, pagination: Pagination) -> Source {
    Source {
        pattern: pattern.to_string(),
        bucket: bucket.to_string(),
        fetch_mode: FetchMode::Static,
        pagination,
        link_rule: LinkRule {
            selector: "a.article-link".to_string(),
            join: JoinRule::Absolute,
        },
        body_rule: BodyRule {
            container: "div.body".to_string(),
            paragraph: "p".to_string(),
            lead: None,
        },
    }
}

struct TestHarness {
    dir: TempDir,
    registry: SourceRegistry,
    seeds: Vec<SeedTarget>,
}

impl TestHarness {
    fn new(registry: SourceRegistry, seeds: Vec<SeedTarget>) -> Self {
        Self {
            dir: TempDir::new().expect("tempdir"),
            registry,
            seeds,
        }
    }

    fn articles_dir(&self) -> std::path::PathBuf {
        self.dir.path().join("articles")
    }

    fn crawl_checkpoint_path(&self) -> std::path::PathBuf {
        self.dir.path().join("crawl_checkpoint.json")
    }

    fn parse_checkpoint_path(&self) -> std::path::PathBuf {
        self.dir.path().join("parse_checkpoint.json")
    }

    fn parse_store(&self) -> ParseCheckpointStore {
        ParseCheckpointStore::new(self.parse_checkpoint_path())
    }

    fn coordinator(&self) -> Coordinator {
        let transport =
            HttpTransport::new(&test_scraper_config()).expect("failed to build transport");
        let gateway = Gateway::with_transport(
            Box::new(transport),
            RetryPolicy::no_retry(),
            DelayBounds::none(),
        );
        let crawl_store =
            CrawlCheckpointStore::open(self.crawl_checkpoint_path()).expect("crawl store");

        Coordinator::with_parts(
            self.seeds.clone(),
            self.registry.clone(),
            gateway,
            crawl_store,
            self.parse_store(),
            ArticleWriter::new(self.articles_dir()),
        )
    }

    fn article_text(&self, bucket: &str, sequence: usize) -> Option<String> {
        std::fs::read_to_string(
            self.articles_dir()
                .join(bucket)
                .join(format!("{sequence}.txt")),
        )
        .ok()
    }
}

fn listing_html(links: &[String]) -> String {
    let anchors: String = links
        .iter()
        .map(|url| format!(r#"<a class="article-link" href="{url}">headline</a>"#))
        .collect();
    format!("<html><body>{anchors}</body></html>")
}

fn article_html(paragraphs: &[&str]) -> String {
    let body: String = paragraphs.iter().map(|p| format!("<p>{p}</p>")).collect();
    format!(r#"<html><body><div class="body">{body}</div></body></html>"#)
}

async fn mount_page(server: &MockServer, route: &str, html: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_string(html))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_run_writes_numbered_articles() {
    let server = MockServer::start().await;
    let base = server.uri();

    let article_urls: Vec<String> = (1..=3).map(|n| format!("{base}/siteA/art{n}")).collect();
    mount_page(&server, "/siteA/list", listing_html(&article_urls)).await;
    for (n, url) in article_urls.iter().enumerate() {
        let route = url.strip_prefix(&base).unwrap().to_string();
        mount_page(
            &server,
            &route,
            article_html(&[&format!("Paragraph one of {}.", n + 1), "Shared tail."]),
        )
        .await;
    }

    let harness = TestHarness::new(
        SourceRegistry::new(vec![test_source("/siteA", "siteA_articles", Pagination::None)]),
        vec![SeedTarget {
            url: format!("{base}/siteA/list"),
            target_articles: 10,
        }],
    );

    let summary = harness.coordinator().run().await.expect("run failed");

    assert_eq!(summary.written, 3);
    assert_eq!(summary.skipped, 0);
    assert_eq!(summary.completed_total, 3);
    assert_eq!(
        harness.article_text("siteA_articles", 1).unwrap(),
        "Paragraph one of 1.\nShared tail."
    );
    assert!(harness.article_text("siteA_articles", 3).is_some());
    assert!(harness.article_text("siteA_articles", 4).is_none());

    let checkpoint = harness.parse_store().load().expect("checkpoint");
    assert!(checkpoint.is_terminal());
    assert_eq!(checkpoint.completed_count, 3);
}

#[tokio::test]
async fn test_counted_pages_fetches_computed_range() {
    let server = MockServer::start().await;
    let base = server.uri();

    // Page size 25, target 60: pages 1 and 2 must be fetched, nothing else
    let page1_urls: Vec<String> = (1..=2).map(|n| format!("{base}/siteB/p1art{n}")).collect();
    let page2_urls: Vec<String> = (1..=2).map(|n| format!("{base}/siteB/p2art{n}")).collect();

    Mock::given(method("GET"))
        .and(path("/siteB/list"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_html(&page1_urls)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/siteB/list"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_html(&page2_urls)))
        .mount(&server)
        .await;

    for url in page1_urls.iter().chain(&page2_urls) {
        let route = url.strip_prefix(&base).unwrap().to_string();
        mount_page(&server, &route, article_html(&["Body."])).await;
    }

    let harness = TestHarness::new(
        SourceRegistry::new(vec![test_source(
            "/siteB",
            "siteB_articles",
            Pagination::CountedPages { page_size: 25 },
        )]),
        vec![SeedTarget {
            url: format!("{base}/siteB/list"),
            target_articles: 60,
        }],
    );

    let summary = harness.coordinator().run().await.expect("run failed");
    assert_eq!(summary.written, 4);

    let crawl_store = CrawlCheckpointStore::open(harness.crawl_checkpoint_path()).unwrap();
    assert_eq!(crawl_store.pages_fetched("siteB_articles"), 2);

    let listing_requests: Vec<_> = server
        .received_requests()
        .await
        .unwrap()
        .into_iter()
        .filter(|req| req.url.path() == "/siteB/list")
        .collect();
    assert_eq!(listing_requests.len(), 2);
}

#[tokio::test]
async fn test_counted_pages_resume_skips_checkpointed_page() {
    let server = MockServer::start().await;
    let base = server.uri();

    let page2_urls = vec![format!("{base}/siteB/late1")];
    Mock::given(method("GET"))
        .and(path("/siteB/list"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_html(&page2_urls)))
        .mount(&server)
        .await;
    mount_page(&server, "/siteB/late1", article_html(&["Late body."])).await;

    let harness = TestHarness::new(
        SourceRegistry::new(vec![test_source(
            "/siteB",
            "siteB_articles",
            Pagination::CountedPages { page_size: 25 },
        )]),
        vec![SeedTarget {
            url: format!("{base}/siteB/list"),
            target_articles: 60,
        }],
    );

    // Page 1 was fetched by a previous run and sits in the checkpoint; it
    // contributes a URL without being re-fetched.
    let early_url = format!("{base}/siteB/early1");
    mount_page(&server, "/siteB/early1", article_html(&["Early body."])).await;
    {
        let mut crawl_store = CrawlCheckpointStore::open(harness.crawl_checkpoint_path()).unwrap();
        crawl_store
            .append_page("siteB_articles", listing_html(&[early_url]))
            .unwrap();
    }

    let summary = harness.coordinator().run().await.expect("run failed");
    assert_eq!(summary.written, 2);

    // Checkpointed page content counts toward discovery order first
    assert_eq!(
        harness.article_text("siteB_articles", 1).unwrap(),
        "Early body."
    );
    assert_eq!(
        harness.article_text("siteB_articles", 2).unwrap(),
        "Late body."
    );

    // Page 1 must not have been requested again
    let page1_requests = server
        .received_requests()
        .await
        .unwrap()
        .into_iter()
        .filter(|req| {
            req.url.path() == "/siteB/list"
                && req.url.query().map(|q| q.contains("page=1")).unwrap_or(false)
        })
        .count();
    assert_eq!(page1_requests, 0);
}

#[tokio::test]
async fn test_resume_processes_exactly_the_remaining_articles() {
    let server = MockServer::start().await;
    let base = server.uri();

    let urls: Vec<String> = (1..=3).map(|n| format!("{base}/siteA/art{n}")).collect();
    for (n, url) in urls.iter().enumerate() {
        let route = url.strip_prefix(&base).unwrap().to_string();
        mount_page(&server, &route, article_html(&[&format!("Body {}.", n + 1)])).await;
    }

    let harness = TestHarness::new(
        SourceRegistry::new(vec![test_source("/siteA", "siteA_articles", Pagination::None)]),
        vec![],
    );

    // A previous run discovered 3 URLs and completed the first one
    let store = harness.parse_store();
    store.initialize_if_absent(&urls).unwrap();
    store.advance(&urls[0]).unwrap();

    let summary = harness.coordinator().run().await.expect("run failed");

    // Exactly M - N articles processed, numbered N+1..M with no gaps
    assert_eq!(summary.written, 2);
    assert_eq!(summary.completed_total, 3);
    assert!(harness.article_text("siteA_articles", 1).is_none());
    assert_eq!(harness.article_text("siteA_articles", 2).unwrap(), "Body 2.");
    assert_eq!(harness.article_text("siteA_articles", 3).unwrap(), "Body 3.");

    // The listing was never fetched: resume trusts the parse checkpoint
    let listing_requests = server
        .received_requests()
        .await
        .unwrap()
        .into_iter()
        .filter(|req| req.url.path().contains("list"))
        .count();
    assert_eq!(listing_requests, 0);
}

#[tokio::test]
async fn test_missing_body_container_writes_empty_file_and_advances() {
    let server = MockServer::start().await;
    let base = server.uri();

    let urls = vec![
        format!("{base}/siteA/no-body"),
        format!("{base}/siteA/normal"),
    ];
    mount_page(&server, "/siteA/list", listing_html(&urls)).await;
    mount_page(
        &server,
        "/siteA/no-body",
        "<html><body><p>outside any container</p></body></html>".to_string(),
    )
    .await;
    mount_page(&server, "/siteA/normal", article_html(&["Real body."])).await;

    let harness = TestHarness::new(
        SourceRegistry::new(vec![test_source("/siteA", "siteA_articles", Pagination::None)]),
        vec![SeedTarget {
            url: format!("{base}/siteA/list"),
            target_articles: 10,
        }],
    );

    let summary = harness.coordinator().run().await.expect("run failed");

    assert_eq!(summary.written, 2);
    assert_eq!(harness.article_text("siteA_articles", 1).unwrap(), "");
    assert_eq!(
        harness.article_text("siteA_articles", 2).unwrap(),
        "Real body."
    );
    assert!(harness.parse_store().load().unwrap().is_terminal());
}

#[tokio::test]
async fn test_broken_article_consumes_sequence_number_without_file() {
    let server = MockServer::start().await;
    let base = server.uri();

    let urls = vec![
        format!("{base}/siteA/ok1"),
        format!("{base}/siteA/broken"),
        format!("{base}/siteA/ok2"),
    ];
    mount_page(&server, "/siteA/list", listing_html(&urls)).await;
    mount_page(&server, "/siteA/ok1", article_html(&["First."])).await;
    Mock::given(method("GET"))
        .and(path("/siteA/broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    mount_page(&server, "/siteA/ok2", article_html(&["Third."])).await;

    let harness = TestHarness::new(
        SourceRegistry::new(vec![test_source("/siteA", "siteA_articles", Pagination::None)]),
        vec![SeedTarget {
            url: format!("{base}/siteA/list"),
            target_articles: 10,
        }],
    );

    let summary = harness.coordinator().run().await.expect("run failed");

    assert_eq!(summary.written, 2);
    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.completed_total, 3);

    // The broken article kept its slot: no 2.txt, and the next article is 3
    assert_eq!(harness.article_text("siteA_articles", 1).unwrap(), "First.");
    assert!(harness.article_text("siteA_articles", 2).is_none());
    assert_eq!(harness.article_text("siteA_articles", 3).unwrap(), "Third.");

    // A permanently-broken URL is marked done, so a second run is a no-op
    let second = harness.coordinator().run().await.expect("second run");
    assert_eq!(second.written, 0);
    assert_eq!(second.skipped, 0);
}

#[tokio::test]
async fn test_unknown_seed_does_not_stop_other_seeds() {
    let server = MockServer::start().await;
    let base = server.uri();

    let urls = vec![format!("{base}/siteA/only")];
    mount_page(&server, "/siteA/list", listing_html(&urls)).await;
    mount_page(&server, "/siteA/only", article_html(&["Survivor."])).await;
    mount_page(&server, "/siteC/list", listing_html(&[])).await;

    let harness = TestHarness::new(
        SourceRegistry::new(vec![
            test_source("/siteA", "siteA_articles", Pagination::None),
            test_source("/siteC", "siteC_articles", Pagination::None),
        ]),
        vec![
            SeedTarget {
                url: "https://unregistered.example/list".to_string(),
                target_articles: 10,
            },
            SeedTarget {
                url: format!("{base}/siteA/list"),
                target_articles: 10,
            },
            SeedTarget {
                url: format!("{base}/siteC/list"),
                target_articles: 10,
            },
        ],
    );

    let summary = harness.coordinator().run().await.expect("run failed");

    assert_eq!(summary.written, 1);
    assert_eq!(
        harness.article_text("siteA_articles", 1).unwrap(),
        "Survivor."
    );
}

#[tokio::test]
async fn test_duplicate_links_across_pages_processed_once() {
    let server = MockServer::start().await;
    let base = server.uri();

    let shared = format!("{base}/siteB/shared");
    let unique = format!("{base}/siteB/unique");

    Mock::given(method("GET"))
        .and(path("/siteB/list"))
        .and(query_param("page", "1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(listing_html(&[shared.clone(), shared.clone()])),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/siteB/list"))
        .and(query_param("page", "2"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(listing_html(&[shared.clone(), unique.clone()])),
        )
        .mount(&server)
        .await;

    mount_page(&server, "/siteB/shared", article_html(&["Shared."])).await;
    mount_page(&server, "/siteB/unique", article_html(&["Unique."])).await;

    let harness = TestHarness::new(
        SourceRegistry::new(vec![test_source(
            "/siteB",
            "siteB_articles",
            Pagination::CountedPages { page_size: 25 },
        )]),
        vec![SeedTarget {
            url: format!("{base}/siteB/list"),
            target_articles: 60,
        }],
    );

    let summary = harness.coordinator().run().await.expect("run failed");

    assert_eq!(summary.written, 2);
    assert_eq!(harness.article_text("siteB_articles", 1).unwrap(), "Shared.");
    assert_eq!(harness.article_text("siteB_articles", 2).unwrap(), "Unique.");

    // The shared article was fetched exactly once
    let shared_fetches = server
        .received_requests()
        .await
        .unwrap()
        .into_iter()
        .filter(|req| req.url.path() == "/siteB/shared")
        .count();
    assert_eq!(shared_fetches, 1);
}

#[tokio::test]
async fn test_corrupt_parse_checkpoint_aborts_run() {
    let harness = TestHarness::new(SourceRegistry::new(vec![]), vec![]);

    std::fs::create_dir_all(harness.dir.path()).unwrap();
    std::fs::write(harness.parse_checkpoint_path(), "{{ definitely not json").unwrap();

    let result = harness.coordinator().run().await;
    assert!(matches!(
        result,
        Err(gazeta::ScrapeError::CheckpointCorruption { .. })
    ));
}

#[tokio::test]
async fn test_listing_failure_leaves_counter_for_next_run() {
    let server = MockServer::start().await;
    let base = server.uri();

    // Page 1 works, page 2 is down: pagination stops, counter stays at 1
    let page1_urls = vec![format!("{base}/siteB/art1")];
    Mock::given(method("GET"))
        .and(path("/siteB/list"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_html(&page1_urls)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/siteB/list"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    mount_page(&server, "/siteB/art1", article_html(&["Only one."])).await;

    let harness = TestHarness::new(
        SourceRegistry::new(vec![test_source(
            "/siteB",
            "siteB_articles",
            Pagination::CountedPages { page_size: 25 },
        )]),
        vec![SeedTarget {
            url: format!("{base}/siteB/list"),
            target_articles: 60,
        }],
    );

    let summary = harness.coordinator().run().await.expect("run failed");
    assert_eq!(summary.written, 1);

    let crawl_store = CrawlCheckpointStore::open(harness.crawl_checkpoint_path()).unwrap();
    assert_eq!(crawl_store.pages_fetched("siteB_articles"), 1);
}

/// Guard against path helpers drifting from what the stores actually write
#[test]
fn test_harness_paths_are_inside_tempdir() {
    let harness = TestHarness::new(SourceRegistry::new(vec![]), vec![]);
    assert!(harness.crawl_checkpoint_path().starts_with(harness.dir.path()));
    assert!(harness.parse_checkpoint_path().starts_with(harness.dir.path()));
}
