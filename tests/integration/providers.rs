//! Integration tests for the upstream clients
//!
//! Finnhub, Stooq and SendGrid are each exercised against a wiremock server.

use crate::test_utils::{
    apple_metrics, apple_profile, mock_metrics, mock_news, mock_profile, mock_quote,
    mock_sendgrid, mock_stooq, stooq_csv, FINNHUB_KEY, SENDGRID_KEY,
};
use serde_json::{json, Value};
use stockshark::services::email::{EmailError, EmailSender, SendGridSender};
use stockshark::services::error::DataError;
use stockshark::services::finnhub::FinnhubClient;
use stockshark::services::fundamentals::Stance;
use stockshark::services::research::ResearchSource;
use stockshark::services::stooq::StooqClient;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn finnhub(server: &MockServer) -> FinnhubClient {
    FinnhubClient::with_client(server.uri(), FINNHUB_KEY, reqwest::Client::new())
}

#[tokio::test]
async fn finnhub_quote_sends_token_and_parses_prices() {
    let server = MockServer::start().await;
    mock_quote(&server, "SPY", 512.5, 510.0).await;

    let quote = finnhub(&server).quote("SPY").await.expect("quote");

    assert_eq!(quote.current, Some(512.5));
    assert_eq!(quote.previous_close, Some(510.0));
}

#[tokio::test]
async fn finnhub_fundamentals_are_scored() {
    let server = MockServer::start().await;
    mock_profile(&server, "AAPL", apple_profile()).await;
    mock_metrics(&server, "AAPL", apple_metrics()).await;

    let snapshot = finnhub(&server).fundamentals("AAPL").await.expect("fundamentals");

    assert_eq!(snapshot.name, "Apple Inc");
    assert_eq!(snapshot.industry, "Technology");
    assert!((snapshot.market_cap.unwrap() - 2950.0).abs() < 1e-9);
    assert!((snapshot.operating_margin.unwrap() - 0.305).abs() < 1e-9);
    assert_eq!(snapshot.stance, Stance::Healthy);
    assert_eq!(
        snapshot.stance_reason,
        "Strong operating margin, Healthy net margin, Weak revenue growth, Solid EPS growth"
    );
}

#[tokio::test]
async fn finnhub_headlines_skip_incomplete_items() {
    let server = MockServer::start().await;
    mock_news(
        &server,
        "NVDA",
        json!([
            { "headline": "", "url": "https://example.com/empty", "source": "Reuters" },
            { "headline": "Nvidia guides higher", "url": "https://www.cnbc.com/nvda", "source": "CNBC" },
            { "headline": "No link", "url": "  ", "source": "Yahoo" },
            { "headline": "Chip stocks rally", "url": "https://example.com/chips", "source": "MarketWatch" },
            { "headline": "Third", "url": "https://example.com/3", "source": "Reuters" },
        ]),
    )
    .await;

    let headlines = finnhub(&server).headlines("NVDA", 3, 2).await.expect("headlines");

    let titles: Vec<_> = headlines.iter().map(|h| h.title.as_str()).collect();
    assert_eq!(titles, vec!["Nvidia guides higher", "Chip stocks rally"]);
}

#[tokio::test]
async fn finnhub_client_errors_are_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/stock/profile2"))
        .respond_with(ResponseTemplate::new(403))
        .expect(1)
        .mount(&server)
        .await;

    let err = finnhub(&server).company_profile2("AAPL").await.unwrap_err();
    assert!(!err.to_string().contains(FINNHUB_KEY));

    match err {
        DataError::Status { endpoint, status } => {
            assert_eq!(endpoint, "/stock/profile2");
            assert_eq!(status, 403);
        }
        other => panic!("expected status error, got {:?}", other),
    }
}

#[tokio::test]
async fn stooq_history_is_parsed_into_series() {
    let server = MockServer::start().await;
    mock_stooq(&server, "aapl.us", stooq_csv(&vec![180.0; 40])).await;

    let client = StooqClient::with_client(server.uri(), reqwest::Client::new());
    let series = client.daily_history("AAPL", 90).await.expect("history").expect("enough bars");

    assert_eq!(series.symbol(), "AAPL");
    assert_eq!(series.len(), 40);
    assert_eq!(series.last().map(|b| b.close), Some(180.0));
}

#[tokio::test]
async fn stooq_unknown_or_short_history_is_none() {
    let server = MockServer::start().await;
    mock_stooq(&server, "zzzz.us", "No data".to_string()).await;
    mock_stooq(&server, "brk-b.us", stooq_csv(&vec![400.0; 12])).await;

    let client = StooqClient::with_client(server.uri(), reqwest::Client::new());

    assert!(client.daily_history("ZZZZ", 90).await.expect("request").is_none());
    assert!(client.daily_history("BRK.B", 90).await.expect("request").is_none());
}

#[tokio::test]
async fn sendgrid_posts_message_with_bearer_auth() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v3/mail/send"))
        .and(header("authorization", format!("Bearer {}", SENDGRID_KEY).as_str()))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;

    let sender = SendGridSender::with_client(
        server.uri(),
        SENDGRID_KEY,
        "me@example.com",
        "digest@example.com",
        reqwest::Client::new(),
    );
    sender.send("Daily digest", "<p>hi</p>").await.expect("accepted");

    let requests = server.received_requests().await.expect("recorded");
    let body: Value = serde_json::from_slice(&requests[0].body).expect("json body");
    assert_eq!(body["subject"], "Daily digest");
    assert_eq!(body["personalizations"][0]["to"][0]["email"], "me@example.com");
    assert_eq!(body["from"]["email"], "digest@example.com");
    assert_eq!(body["content"][0]["type"], "text/html");
    assert_eq!(body["content"][0]["value"], "<p>hi</p>");
}

#[tokio::test]
async fn sendgrid_rejection_carries_status() {
    let server = MockServer::start().await;
    mock_sendgrid(&server, 401).await;

    let sender = SendGridSender::with_client(
        server.uri(),
        "bad-key",
        "me@example.com",
        "digest@example.com",
        reqwest::Client::new(),
    );

    match sender.send("Daily digest", "<p>hi</p>").await {
        Err(EmailError::Rejected { status, .. }) => assert_eq!(status, 401),
        other => panic!("expected rejection, got {:?}", other),
    }
}
