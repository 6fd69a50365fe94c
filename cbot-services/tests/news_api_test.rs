//! Integration tests for [`cbot_services::NewsService`] against a mock
//! headlines API: happy path, category/query forwarding, API-reported
//! errors, HTTP errors, empty results, and the missing-key short circuit.

use cbot_core::NewsCategory;
use cbot_services::NewsService;
use mockito::Matcher;
use serde_json::json;

fn service(base_url: &str) -> NewsService {
    NewsService::with_base_url(Some("news-key".to_string()), base_url)
        .expect("service must build")
}

/// **Test: articles render as a numbered list with sources and links.**
#[tokio::test]
async fn articles_render_as_numbered_list() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/top-headlines")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("apiKey".into(), "news-key".into()),
            Matcher::UrlEncoded("country".into(), "us".into()),
            Matcher::UrlEncoded("pageSize".into(), "5".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "status": "ok",
                "articles": [
                    {"title": "Headline one", "source": {"name": "Reuters"}, "url": "https://example.com/1"},
                    {"title": "Headline two", "source": {"name": "AP"}, "url": "https://example.com/2"}
                ]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let reply = service(&server.url()).headlines_reply(None, None).await;

    mock.assert_async().await;
    assert!(reply.starts_with("Here are the latest headlines:"), "reply: {reply}");
    assert!(reply.contains("1. Headline one (Reuters)"), "reply: {reply}");
    assert!(reply.contains("   Read more: https://example.com/1"), "reply: {reply}");
    assert!(reply.contains("2. Headline two (AP)"), "reply: {reply}");
}

/// **Test: category and query slots are forwarded as query parameters.**
#[tokio::test]
async fn category_and_query_are_forwarded() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/top-headlines")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("category".into(), "technology".into()),
            Matcher::UrlEncoded("q".into(), "climate change".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "status": "ok",
                "articles": [{"title": "T", "source": {"name": "S"}, "url": "https://example.com"}]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let _reply = service(&server.url())
        .headlines_reply(Some(NewsCategory::Technology), Some("climate change"))
        .await;
    mock.assert_async().await;
}

/// **Test: an API-reported error becomes an apology with the reason.**
#[tokio::test]
async fn api_error_status_becomes_apology() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/top-headlines")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"status": "error", "message": "apiKey invalid"}).to_string())
        .create_async()
        .await;

    let reply = service(&server.url()).headlines_reply(None, None).await;
    assert_eq!(reply, "Sorry, I couldn't fetch the news: apiKey invalid");
}

/// **Test: an HTTP error becomes an apology naming the status.**
#[tokio::test]
async fn http_error_becomes_apology() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/top-headlines")
        .match_query(Matcher::Any)
        .with_status(429)
        .create_async()
        .await;

    let reply = service(&server.url()).headlines_reply(None, None).await;
    assert!(
        reply.starts_with("Sorry, I couldn't fetch the news:"),
        "reply: {reply}"
    );
    assert!(reply.contains("429"), "reply: {reply}");
}

/// **Test: an empty article list reports no matching articles.**
#[tokio::test]
async fn empty_articles_report_no_results() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/top-headlines")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"status": "ok", "articles": []}).to_string())
        .create_async()
        .await;

    let reply = service(&server.url()).headlines_reply(None, None).await;
    assert_eq!(reply, "I couldn't find any news articles matching your request.");
}

/// **Test: missing API key short-circuits without any HTTP call.**
#[tokio::test]
async fn missing_api_key_makes_no_call() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/top-headlines")
        .match_query(Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let service = NewsService::with_base_url(None, server.url()).expect("service must build");
    let reply = service.headlines_reply(None, None).await;

    mock.assert_async().await;
    assert_eq!(reply, "News API key is missing. Please configure it.");
}
