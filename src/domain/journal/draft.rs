use super::field_source::{FieldValue, TradeField, TradeFieldSource};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A single submitted form input. The value lives one level down in `data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormField<T> {
    pub data: Option<T>,
}

impl<T> Default for FormField<T> {
    fn default() -> Self {
        Self { data: None }
    }
}

impl<T> FormField<T> {
    pub fn new(data: T) -> Self {
        Self { data: Some(data) }
    }

    pub fn empty() -> Self {
        Self::default()
    }
}

impl<T> From<Option<T>> for FormField<T> {
    fn from(data: Option<T>) -> Self {
        Self { data }
    }
}

/// Pending journal entry as submitted by the user, before it is saved.
///
/// Prices and the risk:reward ratio are kept as the raw text the user typed
/// ("$2,650.50"); interpretation happens in the encoder.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TradeDraft {
    pub pair: FormField<String>,
    pub date: FormField<NaiveDateTime>,
    pub entry_price: FormField<String>,
    pub stop_loss: FormField<String>,
    pub take_profit: FormField<String>,
    pub risk_reward: FormField<String>,
    pub news_event: FormField<String>,
    pub strategy: FormField<String>,
    pub result: FormField<String>,
}

impl TradeDraft {
    pub fn new(pair: impl Into<String>) -> Self {
        Self {
            pair: FormField::new(pair.into()),
            ..Default::default()
        }
    }

    pub fn with_date(mut self, date: NaiveDateTime) -> Self {
        self.date = FormField::new(date);
        self
    }

    pub fn with_prices(
        mut self,
        entry_price: impl Into<String>,
        stop_loss: impl Into<String>,
        take_profit: impl Into<String>,
    ) -> Self {
        self.entry_price = FormField::new(entry_price.into());
        self.stop_loss = FormField::new(stop_loss.into());
        self.take_profit = FormField::new(take_profit.into());
        self
    }

    pub fn with_risk_reward(mut self, risk_reward: impl Into<String>) -> Self {
        self.risk_reward = FormField::new(risk_reward.into());
        self
    }

    pub fn with_news_event(mut self, news_event: impl Into<String>) -> Self {
        self.news_event = FormField::new(news_event.into());
        self
    }

    pub fn with_strategy(mut self, strategy: impl Into<String>) -> Self {
        self.strategy = FormField::new(strategy.into());
        self
    }

    pub fn with_result(mut self, result: impl Into<String>) -> Self {
        self.result = FormField::new(result.into());
        self
    }
}

fn text(field: &FormField<String>) -> Option<FieldValue> {
    field.data.clone().map(FieldValue::Text)
}

impl TradeFieldSource for TradeDraft {
    fn field(&self, field: TradeField) -> Option<FieldValue> {
        match field {
            TradeField::Date => self.date.data.map(FieldValue::Timestamp),
            TradeField::EntryPrice => text(&self.entry_price),
            TradeField::StopLoss => text(&self.stop_loss),
            TradeField::TakeProfit => text(&self.take_profit),
            TradeField::RiskReward => text(&self.risk_reward),
            TradeField::NewsEvent => text(&self.news_event),
            TradeField::Strategy => text(&self.strategy),
            TradeField::Result => text(&self.result),
        }
    }
}
