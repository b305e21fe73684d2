//! Alert payload parser
//!
//! JSON objects pass through untouched. Everything else is treated as the
//! text of an alert template (`Exchange=BINANCE, Symbol=ETHUSD, Price=3000.5`)
//! and scanned with a table of field rules. Parsing never fails; the worst
//! case is an empty record.

use regex::Regex;
use serde_json::{Map, Number, Value};
use tracing::debug;

use crate::domain::{fields, AlertRecord, Payload};
use crate::error::Result;

/// How the captured text is converted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    /// Dropped when the text is not a finite number
    Number,
}

/// Where an extracted value is written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldTarget {
    /// Top level of the record
    Top,
    /// Inside the `bar` object
    Bar,
    /// Both; a hit also forces `bar` to be attached
    TopAndBar,
}

/// One extraction rule: any of `keys` followed by `=` or `:` and a value
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub name: &'static str,
    pub keys: &'static [&'static str],
    pub target: FieldTarget,
    pub kind: FieldKind,
}

/// Fields recognised in text alerts
pub const FIELD_RULES: &[FieldRule] = &[
    FieldRule {
        name: "exchange",
        keys: &["exchange"],
        target: FieldTarget::Top,
        kind: FieldKind::Text,
    },
    FieldRule {
        name: "ticker",
        keys: &["ticker", "symbol"],
        target: FieldTarget::Top,
        kind: FieldKind::Text,
    },
    FieldRule {
        name: "close",
        keys: &["close", "price"],
        target: FieldTarget::TopAndBar,
        kind: FieldKind::Number,
    },
    FieldRule {
        name: "volume",
        keys: &["volume"],
        target: FieldTarget::Top,
        kind: FieldKind::Number,
    },
    FieldRule {
        name: "open",
        keys: &["open"],
        target: FieldTarget::Bar,
        kind: FieldKind::Number,
    },
    FieldRule {
        name: "high",
        keys: &["high"],
        target: FieldTarget::Bar,
        kind: FieldKind::Number,
    },
    FieldRule {
        name: "low",
        keys: &["low"],
        target: FieldTarget::Bar,
        kind: FieldKind::Number,
    },
];

struct CompiledRule {
    rule: FieldRule,
    pattern: Regex,
}

/// Turns raw payloads into alert records
pub struct AlertParser {
    rules: Vec<CompiledRule>,
    // Unfilled `{{open}}`-style template variables
    bar_placeholder: Regex,
}

impl AlertParser {
    /// Parser with the default rule table
    pub fn new() -> Result<Self> {
        Self::with_rules(FIELD_RULES)
    }

    pub fn with_rules(rules: &[FieldRule]) -> Result<Self> {
        let rules = rules
            .iter()
            .map(|rule| {
                Ok(CompiledRule {
                    rule: *rule,
                    pattern: rule_pattern(rule)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            rules,
            bar_placeholder: Regex::new(r"(?i)\{\{\s*(?:open|high|low)\s*\}\}")?,
        })
    }

    pub fn parse(&self, payload: Payload) -> AlertRecord {
        match payload {
            Payload::Json(Value::Object(map)) => AlertRecord::from(map),
            Payload::Json(Value::String(text)) => self.parse_text(&text),
            Payload::Json(other) => self.parse_text(&other.to_string()),
            Payload::Text(text) => {
                json_object(&text).unwrap_or_else(|| self.parse_text(&text))
            },
        }
    }

    /// Rule-table extraction over freeform text
    pub fn parse_text(&self, text: &str) -> AlertRecord {
        let mut record = AlertRecord::new();
        let mut bar = Map::new();
        let mut wants_bar = self.bar_placeholder.is_match(text);

        for CompiledRule { rule, pattern } in &self.rules {
            let Some(raw) = pattern.captures(text).and_then(|c| c.get(1)) else {
                continue;
            };
            let Some(value) = coerce(raw.as_str(), rule.kind) else {
                debug!("Ignoring malformed {} value: {}", rule.name, raw.as_str());
                continue;
            };

            match rule.target {
                FieldTarget::Top => record.insert(rule.name, value),
                FieldTarget::Bar => {
                    bar.insert(rule.name.to_string(), value);
                    wants_bar = true;
                },
                FieldTarget::TopAndBar => {
                    bar.insert(rule.name.to_string(), value.clone());
                    record.insert(rule.name, value);
                    wants_bar = true;
                },
            }
        }

        if wants_bar {
            record.insert(fields::BAR, Value::Object(bar));
        }

        debug!("Extracted {} field(s) from text alert", record.len());
        record
    }
}

/// `(?i)\b(?:ticker|symbol)\s*[=:]\s*"?(value)`
fn rule_pattern(rule: &FieldRule) -> Result<Regex> {
    let keys = rule
        .keys
        .iter()
        .map(|k| regex::escape(k))
        .collect::<Vec<_>>()
        .join("|");
    Ok(Regex::new(&format!(
        r#"(?i)\b(?:{})\s*[=:]\s*"?([^\s,;&"]+)"#,
        keys
    ))?)
}

fn coerce(raw: &str, kind: FieldKind) -> Option<Value> {
    match kind {
        FieldKind::Text => Some(Value::String(raw.to_string())),
        FieldKind::Number => {
            if let Ok(n) = raw.parse::<i64>() {
                return Some(Value::from(n));
            }
            raw.parse::<f64>()
                .ok()
                .and_then(Number::from_f64)
                .map(Value::Number)
        },
    }
}

/// A text body that is itself a JSON object
fn json_object(text: &str) -> Option<AlertRecord> {
    let trimmed = text.trim();
    if !trimmed.starts_with('{') {
        return None;
    }
    serde_json::from_str::<Map<String, Value>>(trimmed)
        .ok()
        .map(AlertRecord::from)
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)] // Test code - unwrap is acceptable
mod tests {
    use super::*;
    use serde_json::json;

    fn parser() -> AlertParser {
        AlertParser::new().unwrap()
    }

    fn text(body: &str) -> Value {
        parser().parse(Payload::Text(body.to_string())).into()
    }

    #[test]
    fn test_json_object_passes_through() {
        let body = json!({
            "ticker": "BTCUSD",
            "close": 50000,
            "strategy": {"order": {"action": "buy", "contracts": 2}},
            "bar": {"open": 1, "high": 2}
        });
        let record: Value = parser().parse(Payload::Json(body.clone())).into();
        assert_eq!(record, body);
    }

    #[test]
    fn test_text_json_object_passes_through() {
        assert_eq!(
            text(r#"  {"ticker":"X","close":1}  "#),
            json!({"ticker": "X", "close": 1})
        );
    }

    #[test]
    fn test_extracts_template_fields() {
        assert_eq!(
            text("Exchange=BINANCE, Symbol=ETHUSD, Price=3000.5, Volume=42"),
            json!({
                "exchange": "BINANCE",
                "ticker": "ETHUSD",
                "close": 3000.5,
                "volume": 42,
                "bar": {"close": 3000.5}
            })
        );
    }

    #[test]
    fn test_case_and_order_insensitive() {
        let a = text("ticker=XYZ, close=123.45");
        let b = text("CLOSE: 123.45; TICKER: XYZ");
        assert_eq!(a["ticker"], "XYZ");
        assert_eq!(a["close"], 123.45);
        assert_eq!(a, b);
    }

    #[test]
    fn test_bar_fields() {
        let record = text("ticker=X open=1.5 high=2 low=1 close=1.75");
        assert_eq!(
            record["bar"],
            json!({"open": 1.5, "high": 2, "low": 1, "close": 1.75})
        );
        assert!(record.get("open").is_none());
    }

    #[test]
    fn test_bar_attached_for_placeholders_only() {
        let record = text("ticker=X open={{open}} high={{ high }}");
        assert_eq!(record, json!({"ticker": "X", "bar": {}}));
    }

    #[test]
    fn test_no_bar_without_price_fields() {
        let record = text("exchange=NYSE ticker=IBM");
        assert_eq!(record, json!({"exchange": "NYSE", "ticker": "IBM"}));
    }

    #[test]
    fn test_malformed_number_is_absent() {
        let record = text("ticker=X, close=abc, volume=NaN");
        assert_eq!(record, json!({"ticker": "X"}));
    }

    #[test]
    fn test_quoted_values() {
        let record = text(r#"ticker: "AAPL", price: "189.2""#);
        assert_eq!(record["ticker"], "AAPL");
        assert_eq!(record["close"], 189.2);
    }

    #[test]
    fn test_key_must_be_whole_word() {
        assert_eq!(text("reclose=5 tickers=ABC"), json!({}));
    }

    #[test]
    fn test_unstructured_text_is_empty() {
        assert_eq!(text("hello world"), json!({}));
        assert_eq!(text(""), json!({}));
        assert_eq!(text("{not json"), json!({}));
    }

    #[test]
    fn test_non_object_json_uses_text_rules() {
        let p = parser();
        let record: Value = p
            .parse(Payload::Json(json!("ticker=SPY close=500")))
            .into();
        assert_eq!(record["ticker"], "SPY");
        assert_eq!(record["close"], 500);

        let record: Value = p.parse(Payload::Json(json!([1, 2, 3]))).into();
        assert_eq!(record, json!({}));
    }

    #[test]
    fn test_custom_rules() {
        const RULES: &[FieldRule] = &[FieldRule {
            name: "interval",
            keys: &["interval", "tf"],
            target: FieldTarget::Top,
            kind: FieldKind::Text,
        }];
        let p = AlertParser::with_rules(RULES).unwrap();
        let record: Value = p.parse(Payload::Text("tf=15m close=1".into())).into();
        assert_eq!(record, json!({"interval": "15m"}));
    }
}
