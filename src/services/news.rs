//! Company headlines for the research pack.

use crate::services::finnhub::NewsItem;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Headline {
    pub title: String,
    pub link: String,
    pub source: String,
}

/// Up to `max_items` headlines that carry both a title and a link, in feed order.
pub fn headlines_from_items(items: &[NewsItem], max_items: usize) -> Vec<Headline> {
    items
        .iter()
        .filter_map(|item| {
            let title = item.headline.trim();
            let link = item.url.trim();
            if title.is_empty() || link.is_empty() {
                return None;
            }
            Some(Headline {
                title: title.to_string(),
                link: link.to_string(),
                source: item.source.trim().to_string(),
            })
        })
        .take(max_items)
        .collect()
}

/// Headlines split into CNBC mentions and everything else.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsBuckets {
    pub cnbc: Vec<Headline>,
    pub buzz: Vec<Headline>,
}

impl NewsBuckets {
    pub fn split(headlines: Vec<Headline>) -> Self {
        let (cnbc, buzz) = headlines
            .into_iter()
            .partition(|h| h.source.to_ascii_lowercase().contains("cnbc"));
        Self { cnbc, buzz }
    }

    pub fn is_empty(&self) -> bool {
        self.cnbc.is_empty() && self.buzz.is_empty()
    }
}
