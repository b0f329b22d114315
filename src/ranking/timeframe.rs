//! Ranking windows for trend scoring

use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Timeframe {
    #[default]
    Lifetime,
    Days30,
    Days7,
}

/// Extrapolation applied to candidates older than the window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowPolicy {
    pub window_days: i64,
    /// Fraction of lifetime stars/forks attributed to the window
    pub recent_share: f64,
}

impl Timeframe {
    pub fn as_str(&self) -> &'static str {
        match self {
            Timeframe::Lifetime => "lifetime",
            Timeframe::Days30 => "30days",
            Timeframe::Days7 => "7days",
        }
    }

    /// `None` for lifetime: the whole history is the window.
    pub fn window_policy(&self) -> Option<WindowPolicy> {
        match self {
            Timeframe::Lifetime => None,
            Timeframe::Days30 => Some(WindowPolicy {
                window_days: 30,
                recent_share: 0.3,
            }),
            Timeframe::Days7 => Some(WindowPolicy {
                window_days: 7,
                recent_share: 0.15,
            }),
        }
    }

    pub fn all() -> [Timeframe; 3] {
        [Timeframe::Lifetime, Timeframe::Days30, Timeframe::Days7]
    }
}

impl FromStr for Timeframe {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lifetime" => Ok(Timeframe::Lifetime),
            "30days" => Ok(Timeframe::Days30),
            "7days" => Ok(Timeframe::Days7),
            other => Err(ConfigError::UnsupportedTimeframe(other.to_string())),
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
