//! Analyst presets
//!
//! Presets differ only in role text, capability set and report field; all of
//! them are plain [`AnalystConfig`] values fed to the generic node.

use analyst_core::{Error, ReportTopic, Result};
use analyst_dataflows::capabilities;
use analyst_dataflows::window::SENTIMENT_LOOKBACK_DAYS;
use analyst_llm::LLMProvider;
use analyst_tools::{ToolRegistry, VendorRouter};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::node::{AnalystConfig, AnalystNode, NodeSettings};

const MACRO_ROLE: &str = "You are a macro environment analyst. Provide a concise but detailed report on the global \
macro backdrop, including recent macro news and the trajectory of key economic indicators over the last three years. \
Use get_global_news(curr_date, look_back_days, limit) for broad macro news and get_macro_ind(curr_date) for \
macroeconomic indicators. Always ground your analysis in the tool results and explain how the macro backdrop may \
impact the company or its sector.";

const SENTIMENT_ROLE: &str = "You are a sentiment analyst focused on gauging public mood and narrative momentum \
around a specific company over the past week. Always start by calling get_news with ticker={{ ticker }}, \
start_date={{ start_date }}, end_date={{ end_date }} to fetch the latest discussions before forming conclusions. \
Emphasize sentiment drivers, momentum shifts, and investor perception. Avoid generic statements; deliver specific \
observations that can help traders anticipate sentiment-driven moves. Append a concise Markdown table summarizing \
key sentiment drivers and their potential impact.";

const NEWS_ROLE: &str = "You are a news researcher tasked with analyzing recent news and trends over the past week. \
Write a comprehensive report of the current state of the world that is relevant for trading and macroeconomics. \
Use get_news(ticker, start_date, end_date) for company-specific news between {{ start_date }} and {{ end_date }}, \
and get_global_news(curr_date, look_back_days, limit) for broader macroeconomic news. Do not simply state that \
trends are mixed; provide detailed, fine-grained insights that may help traders make decisions. Append a Markdown \
table at the end of the report organizing its key points.";

/// Analyst types this crate knows how to build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalystKind {
    Macro,
    #[serde(alias = "social")]
    Sentiment,
    News,
}

impl AnalystKind {
    pub const ALL: [AnalystKind; 3] = [Self::Macro, Self::Sentiment, Self::News];

    /// Report field written by this analyst
    pub fn report_topic(self) -> ReportTopic {
        match self {
            Self::Macro => ReportTopic::Macro,
            Self::Sentiment => ReportTopic::Sentiment,
            Self::News => ReportTopic::News,
        }
    }

    /// Node name
    pub fn node_name(self) -> &'static str {
        match self {
            Self::Macro => "macro_analyst",
            Self::Sentiment => "sentiment_analyst",
            Self::News => "news_analyst",
        }
    }

    /// Preset configuration with capabilities served by `router`
    pub fn config(self, router: &Arc<VendorRouter>) -> AnalystConfig {
        let (role, tools, window_days) = match self {
            Self::Macro => (
                MACRO_ROLE,
                vec![
                    capabilities::global_news(router.clone()),
                    capabilities::macro_indicators(router.clone()),
                ],
                None,
            ),
            Self::Sentiment => (
                SENTIMENT_ROLE,
                vec![capabilities::company_news(router.clone())],
                Some(SENTIMENT_LOOKBACK_DAYS),
            ),
            Self::News => (
                NEWS_ROLE,
                vec![
                    capabilities::company_news(router.clone()),
                    capabilities::global_news(router.clone()),
                ],
                Some(SENTIMENT_LOOKBACK_DAYS),
            ),
        };

        AnalystConfig {
            name: self.node_name().to_string(),
            role_instruction: role.to_string(),
            capabilities: ToolRegistry::from_tools(tools),
            report_topic: self.report_topic(),
            window_days,
        }
    }
}

impl fmt::Display for AnalystKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Macro => f.write_str("macro"),
            Self::Sentiment => f.write_str("sentiment"),
            Self::News => f.write_str("news"),
        }
    }
}

impl FromStr for AnalystKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "macro" => Ok(Self::Macro),
            "sentiment" | "social" => Ok(Self::Sentiment),
            "news" => Ok(Self::News),
            other => Err(Error::Config(format!(
                "unknown analyst '{other}', expected one of: macro, sentiment, news"
            ))),
        }
    }
}

/// Build a preset analyst node
pub fn create_analyst(
    kind: AnalystKind,
    router: &Arc<VendorRouter>,
    provider: Arc<dyn LLMProvider>,
    settings: NodeSettings,
) -> AnalystNode {
    AnalystNode::new(kind.config(router), provider, settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::check_field_ownership;
    use crate::testing::ScriptedProvider;
    use analyst_core::AnalysisState;

    #[test]
    fn test_kind_parsing() {
        assert_eq!("macro".parse::<AnalystKind>().unwrap(), AnalystKind::Macro);
        assert_eq!("Social".parse::<AnalystKind>().unwrap(), AnalystKind::Sentiment);
        assert_eq!("news".parse::<AnalystKind>().unwrap(), AnalystKind::News);
        assert!("fundamentals".parse::<AnalystKind>().is_err());
        assert_eq!(AnalystKind::Sentiment.to_string(), "sentiment");
    }

    #[test]
    fn test_presets_own_distinct_fields() {
        let router = Arc::new(VendorRouter::new());
        let provider = ScriptedProvider::new(vec![]);
        let nodes: Vec<AnalystNode> = AnalystKind::ALL
            .iter()
            .map(|k| create_analyst(*k, &router, provider.clone(), NodeSettings::default()))
            .collect();

        assert!(check_field_ownership(&nodes).is_ok());
        assert_eq!(nodes[0].report_topic(), ReportTopic::Macro);
        assert_eq!(nodes[1].report_topic(), ReportTopic::Sentiment);
        assert_eq!(nodes[2].report_topic(), ReportTopic::News);
    }

    #[test]
    fn test_capability_sets() {
        let router = Arc::new(VendorRouter::new());
        assert_eq!(
            AnalystKind::Macro.config(&router).capabilities.names(),
            ["get_global_news", "get_macro_ind"]
        );
        assert_eq!(AnalystKind::Sentiment.config(&router).capabilities.names(), ["get_news"]);
        assert_eq!(
            AnalystKind::News.config(&router).capabilities.names(),
            ["get_news", "get_global_news"]
        );
    }

    #[test]
    fn test_sentiment_prompt_carries_window() {
        let router = Arc::new(VendorRouter::new());
        let node = create_analyst(
            AnalystKind::Sentiment,
            &router,
            ScriptedProvider::new(vec![]),
            NodeSettings::default(),
        );
        let state = AnalysisState::new("AAPL", "2024-06-15").unwrap();

        let prompt = node.system_prompt(&state).unwrap();
        assert!(prompt.contains("ticker=AAPL, start_date=2024-06-08, end_date=2024-06-15"));
        assert!(prompt.contains("You have access to the following tools: get_news."));
    }

    #[test]
    fn test_sentiment_window_from_datetime_anchor() {
        let router = Arc::new(VendorRouter::new());
        let node = create_analyst(
            AnalystKind::Sentiment,
            &router,
            ScriptedProvider::new(vec![]),
            NodeSettings::default(),
        );
        let state = AnalysisState::new("AAPL", "2024-06-15T09:30:00").unwrap();

        let prompt = node.system_prompt(&state).unwrap();
        assert!(prompt.contains("start_date=2024-06-08, end_date=2024-06-15"));
    }

    #[test]
    fn test_every_preset_renders() {
        let router = Arc::new(VendorRouter::new());
        let state = AnalysisState::new("MSFT", "2024-02-29").unwrap();
        for kind in AnalystKind::ALL {
            let node = create_analyst(kind, &router, ScriptedProvider::new(vec![]), NodeSettings::default());
            assert!(node.system_prompt(&state).is_ok(), "{kind}");
        }
    }
}
