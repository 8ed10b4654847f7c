//! Field-source capability used by the feature encoder.
//!
//! The encoder never sees concrete journal types. It asks a
//! [`TradeFieldSource`] for a named [`TradeField`] and gets back an optional
//! [`FieldValue`]. Drafts and persisted entries both implement the trait;
//! [`TradeSources`] combines them with draft-first precedence.

use chrono::NaiveDateTime;

/// Logical attributes a trade record may expose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TradeField {
    Date,
    EntryPrice,
    StopLoss,
    TakeProfit,
    RiskReward,
    NewsEvent,
    Strategy,
    Result,
}

impl TradeField {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeField::Date => "date",
            TradeField::EntryPrice => "entry_price",
            TradeField::StopLoss => "stop_loss",
            TradeField::TakeProfit => "take_profit",
            TradeField::RiskReward => "risk_reward",
            TradeField::NewsEvent => "news_event",
            TradeField::Strategy => "strategy",
            TradeField::Result => "result",
        }
    }
}

/// Raw value handed over by a field source, before any interpretation.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(f64),
    Flag(bool),
    Timestamp(NaiveDateTime),
}

impl FieldValue {
    /// A value is usable unless it is blank text.
    pub fn is_usable(&self) -> bool {
        match self {
            FieldValue::Text(text) => !text.trim().is_empty(),
            _ => true,
        }
    }

    /// Numeric view of the value. Malformed or non-finite input yields `None`.
    pub fn as_number(&self) -> Option<f64> {
        let value = match self {
            FieldValue::Number(n) => Some(*n),
            FieldValue::Text(text) => parse_numeric_text(text),
            FieldValue::Flag(_) | FieldValue::Timestamp(_) => None,
        }?;
        value.is_finite().then_some(value)
    }

    /// Hour of day, if the value carries a time component.
    pub fn as_hour(&self) -> Option<u32> {
        use chrono::Timelike;
        match self {
            FieldValue::Timestamp(ts) => Some(ts.hour()),
            FieldValue::Text(text) => parse_timestamp_text(text).map(|ts| ts.hour()),
            _ => None,
        }
    }

    /// Truthiness of an indicator field such as "news event".
    pub fn is_truthy(&self) -> bool {
        match self {
            FieldValue::Flag(flag) => *flag,
            FieldValue::Number(n) => *n != 0.0 && !n.is_nan(),
            FieldValue::Timestamp(_) => true,
            FieldValue::Text(text) => {
                let normalized = text.trim().to_lowercase();
                !normalized.is_empty() && !NEGATIVE_MARKERS.contains(&normalized.as_str())
            }
        }
    }

    /// Text view of the value, trimmed. Blank text yields `None`.
    pub fn as_text(&self) -> Option<String> {
        match self {
            FieldValue::Text(text) => {
                let trimmed = text.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            FieldValue::Number(n) => Some(n.to_string()),
            FieldValue::Flag(flag) => Some(flag.to_string()),
            FieldValue::Timestamp(ts) => Some(ts.to_string()),
        }
    }
}

const NEGATIVE_MARKERS: [&str; 5] = ["none", "no", "false", "0", "n/a"];

const TIMESTAMP_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

/// Strips currency symbols, thousands separators and whitespace, then
/// parses what is left. `"$2,650.50"` parses as `2650.5`.
pub fn parse_numeric_text(text: &str) -> Option<f64> {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok()
}

/// Parses a date-time string with an explicit time component.
/// A bare date has no hour and is rejected.
pub fn parse_timestamp_text(text: &str) -> Option<NaiveDateTime> {
    let trimmed = text.trim();
    if let Some(ts) = TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
    {
        return Some(ts);
    }
    chrono::DateTime::parse_from_rfc3339(trimmed)
        .ok()
        .map(|dt| dt.naive_local())
}

/// Anything that can yield an optional value for a named trade field.
pub trait TradeFieldSource {
    fn field(&self, field: TradeField) -> Option<FieldValue>;
}

/// Draft and persisted views of the same trade, draft first.
#[derive(Clone, Copy, Default)]
pub struct TradeSources<'a> {
    pub draft: Option<&'a dyn TradeFieldSource>,
    pub entry: Option<&'a dyn TradeFieldSource>,
}

impl<'a> TradeSources<'a> {
    pub fn new(
        draft: Option<&'a dyn TradeFieldSource>,
        entry: Option<&'a dyn TradeFieldSource>,
    ) -> Self {
        Self { draft, entry }
    }

    pub fn draft(draft: &'a dyn TradeFieldSource) -> Self {
        Self {
            draft: Some(draft),
            entry: None,
        }
    }

    pub fn entry(entry: &'a dyn TradeFieldSource) -> Self {
        Self {
            draft: None,
            entry: Some(entry),
        }
    }

    /// First usable value for `field`, preferring the draft.
    pub fn lookup(&self, field: TradeField) -> Option<FieldValue> {
        [self.draft, self.entry]
            .into_iter()
            .flatten()
            .filter_map(|source| source.field(field))
            .find(FieldValue::is_usable)
    }

    /// First value for `field` that also parses as a number.
    ///
    /// A draft holding unparseable text does not shadow a valid entry value.
    pub fn lookup_number(&self, field: TradeField) -> Option<f64> {
        [self.draft, self.entry]
            .into_iter()
            .flatten()
            .filter_map(|source| source.field(field))
            .filter(FieldValue::is_usable)
            .find_map(|value| value.as_number())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct MapSource(HashMap<TradeField, FieldValue>);

    impl TradeFieldSource for MapSource {
        fn field(&self, field: TradeField) -> Option<FieldValue> {
            self.0.get(&field).cloned()
        }
    }

    fn source(pairs: &[(TradeField, FieldValue)]) -> MapSource {
        MapSource(pairs.iter().cloned().collect())
    }

    #[test]
    fn test_parse_numeric_text_strips_currency() {
        assert_eq!(parse_numeric_text("$2,650.50"), Some(2650.5));
        assert_eq!(parse_numeric_text(" 2645 "), Some(2645.0));
        assert_eq!(parse_numeric_text("-1.5"), Some(-1.5));
        assert_eq!(parse_numeric_text("abc"), None);
        assert_eq!(parse_numeric_text("1.2.3"), None);
        assert_eq!(parse_numeric_text(""), None);
    }

    #[test]
    fn test_as_number_rejects_non_finite() {
        assert_eq!(FieldValue::Number(f64::NAN).as_number(), None);
        assert_eq!(FieldValue::Number(f64::INFINITY).as_number(), None);
        assert_eq!(FieldValue::Flag(true).as_number(), None);
        assert_eq!(FieldValue::Number(2.0).as_number(), Some(2.0));
    }

    #[test]
    fn test_as_hour_requires_time_component() {
        assert_eq!(FieldValue::Text("2024-05-01 14:30".into()).as_hour(), Some(14));
        assert_eq!(FieldValue::Text("2024-05-01T09:15:00".into()).as_hour(), Some(9));
        assert_eq!(FieldValue::Text("2024-05-01".into()).as_hour(), None);
        assert_eq!(FieldValue::Text("yesterday".into()).as_hour(), None);
    }

    #[test]
    fn test_news_truthiness() {
        assert!(FieldValue::Text("NFP".into()).is_truthy());
        assert!(!FieldValue::Text("None".into()).is_truthy());
        assert!(!FieldValue::Text("  ".into()).is_truthy());
        assert!(FieldValue::Flag(true).is_truthy());
        assert!(!FieldValue::Flag(false).is_truthy());
        assert!(!FieldValue::Number(0.0).is_truthy());
    }

    #[test]
    fn test_lookup_prefers_draft_and_skips_blank() {
        let draft = source(&[
            (TradeField::Strategy, FieldValue::Text("Breakout".into())),
            (TradeField::NewsEvent, FieldValue::Text("   ".into())),
        ]);
        let entry = source(&[
            (TradeField::Strategy, FieldValue::Text("Reversal".into())),
            (TradeField::NewsEvent, FieldValue::Text("CPI".into())),
        ]);
        let sources = TradeSources::new(Some(&draft), Some(&entry));

        assert_eq!(
            sources.lookup(TradeField::Strategy),
            Some(FieldValue::Text("Breakout".into()))
        );
        assert_eq!(
            sources.lookup(TradeField::NewsEvent),
            Some(FieldValue::Text("CPI".into()))
        );
        assert_eq!(sources.lookup(TradeField::Date), None);
    }

    #[test]
    fn test_lookup_number_falls_through_malformed_draft() {
        let draft = source(&[(TradeField::EntryPrice, FieldValue::Text("n/a".into()))]);
        let entry = source(&[(TradeField::EntryPrice, FieldValue::Number(100.0))]);
        let sources = TradeSources::new(Some(&draft), Some(&entry));

        assert_eq!(sources.lookup_number(TradeField::EntryPrice), Some(100.0));
        assert_eq!(TradeSources::default().lookup_number(TradeField::EntryPrice), None);
    }
}
