//! Shared analysis state
//!
//! One [`AnalysisState`] exists per analysis run. The orchestrator owns it;
//! nodes only borrow it and hand back a [`StateUpdate`], which the owner
//! applies. Keeping appends in one place means concurrently scheduled nodes
//! never race on `messages`.

use analyst_llm::Message;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::{Error, Result};

/// Line prefix that tells the orchestrator the pipeline may stop
///
/// Downstream parsing matches this text verbatim.
pub const FINAL_PROPOSAL_MARKER: &str = "FINAL TRANSACTION PROPOSAL: **BUY/HOLD/SELL**";

/// Whether any line of `text` starts with [`FINAL_PROPOSAL_MARKER`]
pub fn has_final_proposal(text: &str) -> bool {
    text.lines()
        .any(|line| line.trim_start().starts_with(FINAL_PROPOSAL_MARKER))
}

/// Report fields of the shared record, one per analyst type
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ReportTopic {
    /// Macro backdrop and indicator trajectory
    #[serde(rename = "macro_report")]
    Macro,
    /// Week-long sentiment around the company
    #[serde(rename = "sentiment_report")]
    Sentiment,
    /// Company and world news
    #[serde(rename = "news_report")]
    News,
}

impl ReportTopic {
    /// Every topic the record carries
    pub const ALL: [ReportTopic; 3] = [Self::Macro, Self::Sentiment, Self::News];

    /// Field name as it appears in the serialized record
    pub fn field_name(self) -> &'static str {
        match self {
            Self::Macro => "macro_report",
            Self::Sentiment => "sentiment_report",
            Self::News => "news_report",
        }
    }
}

impl fmt::Display for ReportTopic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field_name())
    }
}

/// Report written by one activation; `text` is empty while tools are pending
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportUpdate {
    pub topic: ReportTopic,
    pub text: String,
}

/// Output of one node step: exactly one appended turn, plus an optional report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateUpdate {
    pub message: Message,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<ReportUpdate>,
}

impl StateUpdate {
    /// Update that only appends a turn (tool results, for instance)
    pub fn message(message: Message) -> Self {
        Self {
            message,
            report: None,
        }
    }

    /// Update from an analyst activation
    pub fn with_report(message: Message, topic: ReportTopic, text: impl Into<String>) -> Self {
        Self {
            message,
            report: Some(ReportUpdate {
                topic,
                text: text.into(),
            }),
        }
    }

    /// Whether this update carries a finished, non-empty report
    pub fn is_final(&self) -> bool {
        self.report.as_ref().is_some_and(|r| !r.text.is_empty())
    }
}

fn parse_trade_date(raw: &str) -> Result<NaiveDate> {
    let trimmed = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date);
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(stamp) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(stamp.date());
        }
    }
    DateTime::parse_from_rfc3339(trimmed)
        .map(|stamp| stamp.date_naive())
        .map_err(|_| Error::MalformedInput(format!("trade_date must be in YYYY-mm-dd format, got '{raw}'")))
}

/// The record threaded between node activations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisState {
    company_of_interest: String,
    trade_date: NaiveDate,
    messages: Vec<Message>,
    reports: BTreeMap<ReportTopic, String>,
}

impl AnalysisState {
    /// Start a run for `company` anchored at `trade_date`
    ///
    /// `trade_date` is `YYYY-MM-DD` or an ISO datetime, of which only the
    /// date part is kept. The history is seeded with one user turn naming the
    /// company, and every report field starts out empty.
    pub fn new(company: impl Into<String>, trade_date: &str) -> Result<Self> {
        let trade_date = parse_trade_date(trade_date)?;
        let company = company.into();
        if company.trim().is_empty() {
            return Err(Error::MalformedInput("company_of_interest is empty".to_string()));
        }

        Ok(Self {
            messages: vec![Message::user(company.clone())],
            company_of_interest: company,
            trade_date,
            reports: ReportTopic::ALL.iter().map(|t| (*t, String::new())).collect(),
        })
    }

    /// Ticker or symbol under analysis
    pub fn company_of_interest(&self) -> &str {
        &self.company_of_interest
    }

    /// Analysis anchor date
    pub fn trade_date(&self) -> NaiveDate {
        self.trade_date
    }

    /// Conversation so far, oldest first
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Most recent turn
    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Current text of a report field (empty until finalized)
    pub fn report(&self, topic: ReportTopic) -> &str {
        self.reports.get(&topic).map_or("", String::as_str)
    }

    /// All report fields
    pub fn reports(&self) -> &BTreeMap<ReportTopic, String> {
        &self.reports
    }

    /// Append one turn
    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Apply a node's output: append its turn and write its report field
    pub fn apply(&mut self, update: StateUpdate) {
        self.messages.push(update.message);
        if let Some(report) = update.report {
            self.reports.insert(report.topic, report.text);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_seeded() {
        let state = AnalysisState::new("NVDA", "2024-06-15").unwrap();
        assert_eq!(state.company_of_interest(), "NVDA");
        assert_eq!(state.trade_date().to_string(), "2024-06-15");
        assert_eq!(state.messages().len(), 1);
        assert_eq!(state.messages()[0].text(), Some("NVDA"));
        for topic in ReportTopic::ALL {
            assert_eq!(state.report(topic), "");
        }
    }

    #[test]
    fn test_malformed_trade_date() {
        let err = AnalysisState::new("NVDA", "2024/06/15").unwrap_err();
        assert!(matches!(err, Error::MalformedInput(_)));
        assert!(AnalysisState::new("", "2024-06-15").is_err());
    }

    #[test]
    fn test_trade_date_from_datetime() {
        for raw in ["2024-06-15T09:30:00", "2024-06-15 16:00:00.250", "2024-06-15T09:30:00-04:00"] {
            let state = AnalysisState::new("AAPL", raw).unwrap();
            assert_eq!(state.trade_date(), NaiveDate::from_ymd_opt(2024, 6, 15).unwrap(), "{raw}");
        }
        assert!(AnalysisState::new("AAPL", "2024-06-15T25:00:00").is_err());
    }

    #[test]
    fn test_apply_pending_then_final() {
        let mut state = AnalysisState::new("AAPL", "2024-06-15").unwrap();

        let pending = StateUpdate::with_report(Message::assistant("calling tools"), ReportTopic::Sentiment, "");
        assert!(!pending.is_final());
        state.apply(pending);
        assert_eq!(state.messages().len(), 2);
        assert_eq!(state.report(ReportTopic::Sentiment), "");

        state.apply(StateUpdate::message(Message::user("tool output")));
        assert_eq!(state.messages().len(), 3);

        let done = StateUpdate::with_report(Message::assistant("Mood is upbeat"), ReportTopic::Sentiment, "Mood is upbeat");
        assert!(done.is_final());
        state.apply(done);
        assert_eq!(state.report(ReportTopic::Sentiment), "Mood is upbeat");
        assert_eq!(state.report(ReportTopic::News), "");
        assert_eq!(state.last_message().and_then(Message::text), Some("Mood is upbeat"));
    }

    #[test]
    fn test_final_proposal_marker() {
        assert!(has_final_proposal(
            "FINAL TRANSACTION PROPOSAL: **BUY/HOLD/SELL** Hold, macro backdrop neutral."
        ));
        assert!(has_final_proposal("Summary first\nFINAL TRANSACTION PROPOSAL: **BUY/HOLD/SELL** Buy"));
        assert!(!has_final_proposal("A final transaction proposal is not ready"));
    }

    #[test]
    fn test_state_serializes_field_names() {
        let state = AnalysisState::new("AAPL", "2024-06-15").unwrap();
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["trade_date"], "2024-06-15");
        assert_eq!(json["reports"]["macro_report"], "");
        assert_eq!(json["reports"]["sentiment_report"], "");
    }
}
