use super::field_source::{FieldValue, TradeField, TradeFieldSource};
use super::outcome::TradeOutcome;
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A saved journal entry, as the storage layer hands it back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: Uuid,
    pub pair: String,
    pub date: Option<NaiveDateTime>,
    pub entry_price: Option<Decimal>,
    pub stop_loss: Option<Decimal>,
    pub take_profit: Option<Decimal>,
    pub risk_reward: Option<f64>,
    /// e.g. "NFP", "CPI"
    pub news_event: Option<String>,
    pub strategy: Option<String>,
    /// win / loss / be
    pub result: Option<String>,
    /// Clamped model score stored when the entry was created.
    pub ai_confidence: Option<f64>,
}

impl JournalEntry {
    pub fn new(pair: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            pair: pair.into(),
            date: None,
            entry_price: None,
            stop_loss: None,
            take_profit: None,
            risk_reward: None,
            news_event: None,
            strategy: None,
            result: None,
            ai_confidence: None,
        }
    }

    /// Parsed outcome, if the entry has a non-blank result.
    pub fn outcome(&self) -> Option<TradeOutcome> {
        self.result.as_deref().and_then(TradeOutcome::parse)
    }
}

fn price(value: Option<Decimal>) -> Option<FieldValue> {
    value.and_then(|d| d.to_f64()).map(FieldValue::Number)
}

impl TradeFieldSource for JournalEntry {
    fn field(&self, field: TradeField) -> Option<FieldValue> {
        match field {
            TradeField::Date => self.date.map(FieldValue::Timestamp),
            TradeField::EntryPrice => price(self.entry_price),
            TradeField::StopLoss => price(self.stop_loss),
            TradeField::TakeProfit => price(self.take_profit),
            TradeField::RiskReward => self.risk_reward.map(FieldValue::Number),
            TradeField::NewsEvent => self.news_event.clone().map(FieldValue::Text),
            TradeField::Strategy => self.strategy.clone().map(FieldValue::Text),
            TradeField::Result => self.result.clone().map(FieldValue::Text),
        }
    }
}
