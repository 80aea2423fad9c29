//! Time-windowed data adapters for analyst-rs
//!
//! Everything the analyst nodes can ask for lives here:
//!
//! - [`window`]: trailing-window arithmetic and date parsing
//! - [`macro_indicators`]: three-year macro indicator window from a local CSV
//! - [`news`]: company and global news windows, local snapshot store
//! - [`finnhub`]: live news from the Finnhub API
//! - [`capabilities`]: model-facing declarations (`get_macro_ind`, `get_news`, `get_global_news`)
//! - [`vendors`]: wiring of backends into a [`analyst_tools::VendorRouter`]
//!
//! Adapters return text meant for a language model. An empty window is a
//! normal result described in a sentence; only bad input, missing resources
//! and malformed datasets are errors.

pub mod capabilities;
pub mod config;
pub mod finnhub;
pub mod macro_indicators;
pub mod news;
pub mod vendors;
pub mod window;

pub use config::{DataflowConfig, NewsVendor};
pub use finnhub::FinnhubClient;
pub use macro_indicators::{LocalMacroBackend, retrieve_macro_window};
pub use news::{ArticleSource, CompanyNews, GlobalNews, LocalNewsStore, NewsArticle};
pub use vendors::build_router;
pub use window::{TrailingWindow, derive_sentiment_window};
