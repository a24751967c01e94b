//! Unit tests for digest rendering

use chrono::TimeZone;
use chrono_tz::America::New_York;
use stockshark::jobs::types::{DigestSections, MarketPulseRow, ResearchEntry, SignalRow};
use stockshark::models::signal::RiskLevel;
use stockshark::render::{digest_subject, digest_title, render_digest, research_links};
use stockshark::services::fundamentals::FundamentalsDisplay;
use stockshark::services::news::{Headline, NewsBuckets};

fn row(symbol: &str, risk: Option<RiskLevel>, reason: &str) -> SignalRow {
    SignalRow {
        symbol: symbol.to_string(),
        close: "10.00".to_string(),
        risk,
        reason: reason.to_string(),
    }
}

#[test]
fn test_title_and_subject_use_local_time() {
    let now = New_York.with_ymd_and_hms(2024, 3, 4, 7, 30, 0).unwrap();
    assert_eq!(
        digest_title(&now),
        "Stockshark Digest — Mon Mar 04, 2024 07:30 AM (America/New_York)"
    );
    assert_eq!(digest_subject(&now), "Stockshark Digest — Mon Mar 04");
}

#[test]
fn test_empty_sections_render_placeholders() {
    let now = New_York.with_ymd_and_hms(2024, 3, 4, 7, 30, 0).unwrap();
    let email = render_digest(&now, &DigestSections::default());

    assert!(email.html.contains("No high-priority alerts today."));
    assert!(email.html.contains("No alerts triggered."));
    assert!(email.html.contains("<p><em>No data</em></p>"));
    assert!(email.html.contains("Not investment advice."));
}

#[test]
fn test_sections_render_in_order() {
    let now = New_York.with_ymd_and_hms(2024, 3, 4, 7, 30, 0).unwrap();
    let email = render_digest(&now, &DigestSections::default());

    let positions: Vec<usize> = [
        "Top focus today",
        "Market pulse",
        "Your holdings",
        "Risky watchlist",
        "All alerts triggered",
        "Research pack",
    ]
    .iter()
    .map(|heading| email.html.find(heading).unwrap())
    .collect();
    let mut sorted = positions.clone();
    sorted.sort();
    assert_eq!(positions, sorted);
}

#[test]
fn test_external_text_is_escaped() {
    let now = New_York.with_ymd_and_hms(2024, 3, 4, 7, 30, 0).unwrap();
    let flagged = row("<b>X</b>", Some(RiskLevel::Warn), "a & b");
    let sections = DigestSections {
        holdings: vec![flagged.clone()],
        triggered: vec![flagged.clone()],
        top_focus: vec![flagged],
        research: vec![ResearchEntry {
            symbol: "ACME".to_string(),
            links: research_links("ACME", None),
            fundamentals: FundamentalsDisplay::unavailable("ACME"),
            news: NewsBuckets::split(vec![Headline {
                title: "Q3 <script>alert(1)</script>".to_string(),
                link: "https://example.com/a?b=1&c=\"2\"".to_string(),
                source: "CNBC".to_string(),
            }]),
        }],
        ..DigestSections::default()
    };

    let email = render_digest(&now, &sections);

    assert!(!email.html.contains("<b>X</b>"));
    assert!(email.html.contains("&lt;b&gt;X&lt;/b&gt;"));
    assert!(email.html.contains("a &amp; b"));
    assert!(!email.html.contains("<script>"));
    assert!(email.html.contains("CNBC mentions"));
    assert!(email.html.contains("No fundamentals returned"));
}

#[test]
fn test_market_pulse_and_buckets_render_rows() {
    let now = New_York.with_ymd_and_hms(2024, 3, 4, 7, 30, 0).unwrap();
    let sections = DigestSections {
        market_pulse: vec![MarketPulseRow {
            symbol: "SPY".to_string(),
            last: "512.34".to_string(),
            chg: "-0.42%".to_string(),
            note: "Core index".to_string(),
        }],
        risky: vec![row("RIVN", None, "No price history returned")],
        ..DigestSections::default()
    };

    let email = render_digest(&now, &sections);

    assert!(email.html.contains("512.34"));
    assert!(email.html.contains("-0.42%"));
    assert!(email.html.contains("No price history returned"));
    assert!(email.html.contains(">n/a<"));
}
