use super::*;
use std::{sync::Arc, time::Duration};

use anyhow::Result;
use axum::{
    extract::{RawQuery, State},
    http::StatusCode,
    routing::get,
    Router,
};
use shared::{domain::FactId, error::FetchOutcome};
use tokio::{net::TcpListener, sync::Mutex};

const RANDOM_FACT: &str = r#"{
    "categories": [],
    "created_at": "2020-01-05 13:42:19.104863",
    "icon_url": "https://assets.chucknorris.host/img/avatar/chuck-norris.png",
    "id": "Yk8QcShZTMSUjUeaF3pD2w",
    "updated_at": "2020-01-05 13:42:19.104863",
    "url": "https://api.chucknorris.io/jokes/Yk8QcShZTMSUjUeaF3pD2w",
    "value": "Chuck Norris can divide by zero."
}"#;

#[derive(Clone)]
struct StubApi {
    status: StatusCode,
    body: String,
    delay: Duration,
    seen_queries: Arc<Mutex<Vec<Option<String>>>>,
}

async fn respond(State(api): State<StubApi>, RawQuery(query): RawQuery) -> (StatusCode, String) {
    api.seen_queries.lock().await.push(query);
    if !api.delay.is_zero() {
        tokio::time::sleep(api.delay).await;
    }
    (api.status, api.body.clone())
}

async fn spawn_stub_api(
    path: &str,
    status: StatusCode,
    body: &str,
    delay: Duration,
) -> Result<(String, Arc<Mutex<Vec<Option<String>>>>)> {
    let seen_queries = Arc::new(Mutex::new(Vec::new()));
    let state = StubApi {
        status,
        body: body.to_string(),
        delay,
        seen_queries: seen_queries.clone(),
    };
    let app = Router::new().route(path, get(respond)).with_state(state);
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok((format!("http://{addr}"), seen_queries))
}

fn source(base_url: &str) -> HttpFactsDataSource {
    HttpFactsDataSource::new(base_url, Duration::from_secs(5)).expect("data source")
}

#[tokio::test]
async fn free_text_search_unwraps_result_page() {
    let body = format!(r#"{{"total":1,"result":[{RANDOM_FACT}]}}"#);
    let (base_url, seen) = spawn_stub_api("/jokes/search", StatusCode::OK, &body, Duration::ZERO)
        .await
        .expect("stub api");

    let outcome = source(&base_url).fetch_by_free_text("divide zero").await;

    let facts = match outcome {
        FetchOutcome::Success(facts) => facts,
        other => panic!("expected success, got {other:?}"),
    };
    assert_eq!(facts.len(), 1);
    assert_eq!(facts[0].id, FactId("Yk8QcShZTMSUjUeaF3pD2w".into()));
    assert_eq!(
        *seen.lock().await,
        vec![Some("query=divide+zero".to_string())]
    );
}

#[tokio::test]
async fn empty_query_is_sent_as_is() {
    let (base_url, seen) = spawn_stub_api(
        "/jokes/search",
        StatusCode::OK,
        r#"{"total":0,"result":[]}"#,
        Duration::ZERO,
    )
    .await
    .expect("stub api");

    let outcome = source(&base_url).fetch_by_free_text("").await;

    assert_eq!(outcome, FetchOutcome::Success(Vec::new()));
    assert_eq!(*seen.lock().await, vec![Some("query=".to_string())]);
}

#[tokio::test]
async fn category_and_random_wrap_single_fact() {
    let (base_url, seen) =
        spawn_stub_api("/jokes/random", StatusCode::OK, RANDOM_FACT, Duration::ZERO)
            .await
            .expect("stub api");
    let source = source(&base_url);

    let by_category = source.fetch_by_category("dev").await;
    let random = source.fetch_random().await;

    assert!(matches!(&by_category, FetchOutcome::Success(facts) if facts.len() == 1));
    assert_eq!(by_category, random);
    assert_eq!(
        *seen.lock().await,
        vec![Some("category=dev".to_string()), None]
    );
}

#[tokio::test]
async fn categories_list_decodes() {
    let (base_url, _) = spawn_stub_api(
        "/jokes/categories",
        StatusCode::OK,
        r#"["animal","career","dev","food"]"#,
        Duration::ZERO,
    )
    .await
    .expect("stub api");

    let outcome = source(&base_url).fetch_categories().await;

    assert_eq!(
        outcome.into_result().expect("categories"),
        vec!["animal", "career", "dev", "food"]
    );
}

#[tokio::test]
async fn non_success_status_becomes_api_error() {
    let body = r#"{"timestamp":"2020-01-05T13:42:19.104Z","status":404,"error":"Not Found","message":"No jokes for category \"nope\" found.","path":"/jokes/random"}"#;
    let (base_url, _) = spawn_stub_api("/jokes/random", StatusCode::NOT_FOUND, body, Duration::ZERO)
        .await
        .expect("stub api");

    let outcome = source(&base_url).fetch_by_category("nope").await;

    assert_eq!(outcome, FetchOutcome::ApiError { status_code: 404 });
}

#[tokio::test]
async fn api_error_without_json_body_keeps_status() {
    let (base_url, _) = spawn_stub_api(
        "/jokes/search",
        StatusCode::INTERNAL_SERVER_ERROR,
        "upstream exploded",
        Duration::ZERO,
    )
    .await
    .expect("stub api");

    let outcome = source(&base_url).fetch_by_free_text("food").await;

    assert_eq!(outcome, FetchOutcome::ApiError { status_code: 500 });
}

#[tokio::test]
async fn undecodable_body_becomes_server_error() {
    let (base_url, _) = spawn_stub_api(
        "/jokes/random",
        StatusCode::OK,
        "<html>maintenance</html>",
        Duration::ZERO,
    )
    .await
    .expect("stub api");

    assert_eq!(
        source(&base_url).fetch_random().await,
        FetchOutcome::ServerError
    );
}

#[tokio::test]
async fn refused_connection_becomes_connection_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let outcome = source(&format!("http://{addr}")).fetch_random().await;

    assert_eq!(outcome, FetchOutcome::ConnectionError);
}

#[tokio::test]
async fn slow_response_times_out_as_connection_error() {
    let (base_url, _) = spawn_stub_api(
        "/jokes/random",
        StatusCode::OK,
        RANDOM_FACT,
        Duration::from_secs(3),
    )
    .await
    .expect("stub api");
    let source =
        HttpFactsDataSource::new(&base_url, Duration::from_millis(200)).expect("data source");

    assert_eq!(source.fetch_random().await, FetchOutcome::ConnectionError);
}

#[tokio::test]
async fn base_url_path_prefix_is_kept() {
    let (base_url, _) = spawn_stub_api(
        "/api/jokes/random",
        StatusCode::OK,
        RANDOM_FACT,
        Duration::ZERO,
    )
    .await
    .expect("stub api");
    let source = source(&format!("{base_url}/api"));

    assert!(source.base_url().as_str().ends_with("/api/"));
    assert!(source.fetch_random().await.is_success());
}

#[test]
fn rejects_unusable_base_urls() {
    assert!(matches!(
        HttpFactsDataSource::new("not a url", Duration::from_secs(1)),
        Err(FactsClientError::InvalidBaseUrl { .. })
    ));
    assert!(matches!(
        HttpFactsDataSource::new("mailto:facts@example.com", Duration::from_secs(1)),
        Err(FactsClientError::OpaqueBaseUrl(_))
    ));
}
