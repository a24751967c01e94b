//! Research links for a ticker.

use serde::{Deserialize, Serialize};
use url::form_urlencoded::byte_serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResearchLink {
    pub label: String,
    pub url: String,
}

impl ResearchLink {
    fn new(label: &str, url: String) -> Self {
        Self {
            label: label.to_string(),
            url,
        }
    }
}

fn encode(value: &str) -> String {
    byte_serialize(value.as_bytes()).collect()
}

/// Yahoo, TradingView, Google News and SEC EDGAR links, plus the Instagram
/// profile when a non-blank handle is given.
pub fn research_links(symbol: &str, instagram_handle: Option<&str>) -> Vec<ResearchLink> {
    let sym = symbol.trim().to_uppercase();
    let query = encode(&sym);

    let mut links = vec![
        ResearchLink::new("Yahoo", format!("https://finance.yahoo.com/quote/{}", sym)),
        ResearchLink::new(
            "TradingView",
            format!("https://www.tradingview.com/symbols/{}/", sym),
        ),
        ResearchLink::new(
            "Google News",
            format!("https://news.google.com/search?q={}", query),
        ),
        ResearchLink::new(
            "SEC EDGAR",
            format!("https://www.sec.gov/edgar/search/#/q={}", query),
        ),
    ];

    if let Some(handle) = instagram_handle
        .map(|h| h.trim().trim_start_matches('@'))
        .filter(|h| !h.is_empty())
    {
        links.push(ResearchLink::new(
            "Instagram",
            format!("https://www.instagram.com/{}/", handle),
        ));
    }

    links
}
