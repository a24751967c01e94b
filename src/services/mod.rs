pub mod email;
pub mod error;
pub mod finnhub;
pub mod fundamentals;
pub mod market_data;
pub mod news;
pub mod research;
pub mod stooq;

pub use email::{DryRunSender, EmailError, EmailSender, SendGridSender};
pub use error::DataError;
pub use finnhub::FinnhubClient;
pub use fundamentals::{score_fundamentals, FundamentalSnapshot, FundamentalsDisplay, Stance};
pub use market_data::{HybridMarketData, InMemoryMarketData, MarketDataProvider};
pub use news::{Headline, NewsBuckets};
pub use research::{ResearchSource, StaticResearch};
pub use stooq::StooqClient;
