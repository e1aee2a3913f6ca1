// =============================================================================
// RSI Classifier — Oversold / Neutral / Overbought buckets
// =============================================================================
//
//   RSI <= 30  =>  Oversold
//   RSI >= 70  =>  Overbought
//   otherwise  =>  Neutral
//
// Both boundaries belong to the extreme bucket, never to Neutral.
// =============================================================================

use serde::{Deserialize, Serialize};

/// Upper bound (inclusive) of the oversold bucket.
pub const OVERSOLD_THRESHOLD: f64 = 30.0;

/// Lower bound (inclusive) of the overbought bucket.
pub const OVERBOUGHT_THRESHOLD: f64 = 70.0;

/// Momentum bucket derived from the latest RSI reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Classification {
    Oversold,
    Neutral,
    Overbought,
}

impl Classification {
    /// Lower-case token used for CSS classes in the HTML report.
    pub fn css_class(self) -> &'static str {
        match self {
            Self::Oversold => "oversold",
            Self::Neutral => "neutral",
            Self::Overbought => "overbought",
        }
    }
}

impl std::fmt::Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Oversold => write!(f, "Oversold"),
            Self::Neutral => write!(f, "Neutral"),
            Self::Overbought => write!(f, "Overbought"),
        }
    }
}

/// Bucket an RSI value.
pub fn classify(rsi: f64) -> Classification {
    if rsi <= OVERSOLD_THRESHOLD {
        Classification::Oversold
    } else if rsi >= OVERBOUGHT_THRESHOLD {
        Classification::Overbought
    } else {
        Classification::Neutral
    }
}
