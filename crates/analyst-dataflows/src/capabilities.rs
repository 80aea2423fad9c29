//! Model-facing capability declarations
//!
//! The names here are the contract the model is told to use in prompts and
//! tool requests. Each declaration is a [`RoutedTool`]; which backend serves
//! it is decided by the router passed in.

use analyst_llm::tools::schema;
use analyst_tools::{RoutedTool, Tool, VendorRouter};
use serde_json::json;
use std::sync::Arc;

use crate::news::GLOBAL_NEWS_LIMIT;
use crate::window::SENTIMENT_LOOKBACK_DAYS;

/// Three-year macro indicator window
pub const GET_MACRO_IND: &str = "get_macro_ind";

/// Company news between two dates
pub const GET_NEWS: &str = "get_news";

/// Market-wide news before a date
pub const GET_GLOBAL_NEWS: &str = "get_global_news";

/// `get_macro_ind(curr_date)`
pub fn macro_indicators(router: Arc<VendorRouter>) -> Arc<dyn Tool> {
    Arc::new(RoutedTool::new(
        GET_MACRO_IND,
        "Retrieve monthly macroeconomic indicators (CPI, inflation, federal funds rate, real GDP, \
         unemployment, payrolls, durables, retail sales) for the three years up to the current date.",
        schema::object(
            json!({
                "curr_date": schema::date("The current date you are trading on"),
            }),
            &["curr_date"],
        ),
        router,
    ))
}

/// `get_news(ticker, start_date, end_date)`
pub fn company_news(router: Arc<VendorRouter>) -> Arc<dyn Tool> {
    Arc::new(RoutedTool::new(
        GET_NEWS,
        "Retrieve news articles about a company published between two dates, newest first.",
        schema::object(
            json!({
                "ticker": schema::string("Ticker symbol of the company, e.g. AAPL"),
                "start_date": schema::date("First day of the window"),
                "end_date": schema::date("Last day of the window"),
            }),
            &["ticker", "start_date", "end_date"],
        ),
        router,
    ))
}

/// `get_global_news(curr_date, look_back_days = 7, limit = 5)`
pub fn global_news(router: Arc<VendorRouter>) -> Arc<dyn Tool> {
    Arc::new(RoutedTool::new(
        GET_GLOBAL_NEWS,
        "Retrieve global market and macroeconomic news from the days before the current date.",
        schema::object(
            json!({
                "curr_date": schema::date("The current date you are trading on"),
                "look_back_days": schema::integer_with_default(
                    "How many days before curr_date to include",
                    i64::try_from(SENTIMENT_LOOKBACK_DAYS).unwrap_or(7),
                ),
                "limit": schema::integer_with_default(
                    "Maximum number of articles",
                    i64::try_from(GLOBAL_NEWS_LIMIT).unwrap_or(5),
                ),
            }),
            &["curr_date"],
        ),
        router,
    ))
}
