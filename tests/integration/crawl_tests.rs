//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end against an on-disk database.

use shoreline::config::Config;
use shoreline::crawler::{build_controller, Controller, ControllerState, HttpFetcher};
use shoreline::state::{Clock, ManualClock, UrlStatus};
use shoreline::storage::{open_storage, FrontierStore, SqliteStorage};
use shoreline::ShorelineError;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration with short timeouts
fn create_test_config(filter: Option<&str>) -> Config {
    let mut config = Config::default();
    config.crawler.request_timeout = 5;
    config.crawler.refresh_period = 300;
    config.crawler.filter_hostname = filter.map(str::to_string);
    config.user_agent.crawler_name = "TestBot".to_string();
    config
}

fn create_controller(
    config: &Config,
    db_path: &Path,
    clock: &ManualClock,
) -> Controller<SqliteStorage> {
    let clock: Arc<dyn Clock> = Arc::new(clock.clone());
    let storage = open_storage(db_path, clock.clone()).expect("Failed to open storage");
    let fetcher = HttpFetcher::from_config(
        &config.user_agent,
        Duration::from_secs(config.crawler.request_timeout),
    )
    .expect("Failed to build fetcher");

    build_controller(config, storage, Box::new(fetcher), clock)
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

/// Steps until the controller goes idle, with an upper bound
async fn crawl_until_idle(controller: &mut Controller<SqliteStorage>, max_steps: usize) {
    let cancel = CancellationToken::new();
    for _ in 0..max_steps {
        if controller.step(&cancel).await == &ControllerState::Idle {
            return;
        }
    }
    panic!("controller still active after {} steps", max_steps);
}

#[tokio::test]
async fn test_full_crawl_single_domain() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        200,
        format!(
            r#"<html><head><title>Home</title></head><body>
            <a href="{}/page1">Page 1</a>
            <a href="/page2">Page 2</a>
            <a href="mailto:x@y">Mail</a>
            </body></html>"#,
            base_url
        ),
    )
    .await;
    mount_page(
        &mock_server,
        "/page1",
        200,
        r#"<html><body>Content 1</body></html>"#.to_string(),
    )
    .await;
    mount_page(
        &mock_server,
        "/page2",
        200,
        r#"<html><body>Content 2</body></html>"#.to_string(),
    )
    .await;

    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("frontier.db");
    let clock = ManualClock::new(1_700_000_000);
    let config = create_test_config(None);
    let mut controller = create_controller(&config, &db_path, &clock);

    let seed = format!("{}/", base_url);
    controller.start(Some(&seed)).expect("Failed to start");
    crawl_until_idle(&mut controller, 10).await;

    let storage = controller.into_store();
    assert_eq!(storage.count_urls().unwrap(), 3);
    assert_eq!(storage.count_urls_by_status(UrlStatus::Done).unwrap(), 3);

    let home = storage.get_url(&seed).unwrap().unwrap();
    assert!(home.digest.is_some());

    let links: Vec<String> = storage
        .outgoing_links(&seed)
        .unwrap()
        .into_iter()
        .map(|l| l.link)
        .collect();
    assert_eq!(
        links,
        vec![format!("{}/page1", base_url), format!("{}/page2", base_url)]
    );
    assert_eq!(storage.count_links().unwrap(), 2);

    storage.close().unwrap();
}

#[tokio::test]
async fn test_error_pages_are_parsed() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        500,
        r#"<html><body><a href="/recovered">Try here</a></body></html>"#.to_string(),
    )
    .await;

    let dir = tempfile::tempdir().unwrap();
    let clock = ManualClock::new(0);
    let config = create_test_config(None);
    let mut controller = create_controller(&config, &dir.path().join("frontier.db"), &clock);

    controller.start(Some(&format!("{}/", base_url))).unwrap();
    controller.step(&CancellationToken::new()).await;

    let recovered = format!("{}/recovered", base_url);
    assert_eq!(
        controller.state(),
        &ControllerState::Active(recovered.clone())
    );
    assert!(controller.store().get_url(&recovered).unwrap().is_some());
}

#[tokio::test]
async fn test_unreachable_page_is_done_without_links() {
    // Nothing listens on the port once the server is dropped
    let base_url = {
        let server = MockServer::start().await;
        server.uri()
    };

    let dir = tempfile::tempdir().unwrap();
    let clock = ManualClock::new(0);
    let config = create_test_config(None);
    let mut controller = create_controller(&config, &dir.path().join("frontier.db"), &clock);

    let seed = format!("{}/", base_url);
    controller.start(Some(&seed)).unwrap();
    crawl_until_idle(&mut controller, 2).await;

    let record = controller.store().get_url(&seed).unwrap().unwrap();
    assert_eq!(record.status, UrlStatus::Done);
    assert_eq!(record.digest, None);
    assert_eq!(controller.store().count_links().unwrap(), 0);
}

#[tokio::test]
async fn test_resume_after_restart() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        200,
        r#"<a href="/next">Next</a><a href="/later">Later</a>"#.to_string(),
    )
    .await;

    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("frontier.db");
    let clock = ManualClock::new(1_000);
    let config = create_test_config(None);

    {
        let mut controller = create_controller(&config, &db_path, &clock);
        controller.start(Some(&format!("{}/", base_url))).unwrap();
        controller.step(&CancellationToken::new()).await;
        controller.into_store().close().unwrap();
    }

    // "/next" was marked PROCESSING when selected, so it resumes first
    clock.advance(60);
    let mut controller = create_controller(&config, &db_path, &clock);
    controller.start(None).unwrap();
    assert_eq!(
        controller.state(),
        &ControllerState::Active(format!("{}/next", base_url))
    );

    let later = controller
        .store()
        .get_url(&format!("{}/later", base_url))
        .unwrap()
        .unwrap();
    assert_eq!(later.status, UrlStatus::Todo);
}

#[tokio::test]
async fn test_start_without_seed_on_new_database() {
    let dir = tempfile::tempdir().unwrap();
    let clock = ManualClock::new(0);
    let config = create_test_config(None);
    let mut controller = create_controller(&config, &dir.path().join("frontier.db"), &clock);

    let result = controller.start(None);
    assert!(matches!(result, Err(ShorelineError::EmptyFrontier)));
}

#[tokio::test]
async fn test_run_stops_when_cancelled() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/", 200, "<p>no links</p>".to_string()).await;

    let dir = tempfile::tempdir().unwrap();
    let clock = ManualClock::new(0);
    let config = create_test_config(None);
    let mut controller = create_controller(&config, &dir.path().join("frontier.db"), &clock);
    controller.start(Some(&format!("{}/", base_url))).unwrap();

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(500)).await;
        trigger.cancel();
    });

    // The page is crawled, then the loop idles on a 300s refresh period
    tokio::time::timeout(Duration::from_secs(10), controller.run(&cancel))
        .await
        .expect("run did not stop after cancellation");

    assert_eq!(controller.state(), &ControllerState::Idle);
    let record = controller
        .store()
        .get_url(&format!("{}/", base_url))
        .unwrap()
        .unwrap();
    assert_eq!(record.status, UrlStatus::Done);
}

#[tokio::test]
async fn test_hostname_filter_limits_crawl() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        200,
        r#"<a href="https://elsewhere.test/">Away</a><a href="/stay">Stay</a>"#.to_string(),
    )
    .await;
    mount_page(&mock_server, "/stay", 200, String::new()).await;

    let dir = tempfile::tempdir().unwrap();
    let clock = ManualClock::new(0);
    let config = create_test_config(Some("127.0.0.1"));
    let mut controller = create_controller(&config, &dir.path().join("frontier.db"), &clock);

    // The filter is a suffix of the network location, which carries the port
    let port = url::Url::parse(&base_url).unwrap().port().unwrap();
    let config_with_port = create_test_config(Some(&format!("127.0.0.1:{}", port)));

    // Without the port the seed's netloc does not end with the filter
    let result = controller.start(Some(&format!("{}/", base_url)));
    assert!(matches!(result, Err(ShorelineError::InvalidSeed { .. })));

    let mut controller = create_controller(&config_with_port, &dir.path().join("other.db"), &clock);
    controller.start(Some(&format!("{}/", base_url))).unwrap();
    crawl_until_idle(&mut controller, 5).await;

    let storage = controller.store();
    assert_eq!(storage.count_urls().unwrap(), 2);
    assert!(storage.get_url("https://elsewhere.test/").unwrap().is_none());
}
