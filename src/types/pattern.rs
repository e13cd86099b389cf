use serde::{Deserialize, Serialize};

/// Category of a detected price-action pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    /// The latest move runs against the window's net trend.
    Reversal,
    /// The latest move extends the window's net trend.
    Continuation,
}

impl PatternKind {
    /// Display label.
    pub fn label(&self) -> &'static str {
        match self {
            PatternKind::Reversal => "Trend Reversal",
            PatternKind::Continuation => "Trend Continuation",
        }
    }
}

/// Direction qualifier for a detected pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternDirection {
    Bullish,
    Bearish,
}

impl PatternDirection {
    pub fn label(&self) -> &'static str {
        match self {
            PatternDirection::Bullish => "Bullish",
            PatternDirection::Bearish => "Bearish",
        }
    }
}

/// One detected price-action event. Lists are ordered most-recent-first.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pattern {
    pub kind: PatternKind,
    pub direction: PatternDirection,
    /// Closing price at the sample that triggered the pattern.
    pub price: f64,
    /// Unix milliseconds of the triggering sample.
    pub time: i64,
    pub description: String,
}

/// Boolean candle-pattern flags over the trailing candles.
///
/// This is the flags variant of the pattern detector; the event-list variant
/// is [`Pattern`]. Callers pick whichever contract fits their consumer.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandlePatterns {
    pub is_doji: bool,
    pub is_morning_star: bool,
    pub is_hammer: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_kind_labels() {
        assert_eq!(PatternKind::Reversal.label(), "Trend Reversal");
        assert_eq!(PatternKind::Continuation.label(), "Trend Continuation");
    }

    #[test]
    fn test_pattern_serialization() {
        let pattern = Pattern {
            kind: PatternKind::Reversal,
            direction: PatternDirection::Bullish,
            price: 50000.0,
            time: 1700000000000,
            description: "test".to_string(),
        };
        let json = serde_json::to_string(&pattern).unwrap();
        assert!(json.contains("\"kind\":\"reversal\""));
        assert!(json.contains("\"direction\":\"bullish\""));
    }

    #[test]
    fn test_candle_patterns_default() {
        let flags = CandlePatterns::default();
        assert!(!flags.is_doji && !flags.is_morning_star && !flags.is_hammer);
    }
}
