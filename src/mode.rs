//! Session timing modes.

use std::{fmt, str::FromStr};

use anyhow::anyhow;
use serde::{Deserialize, Serialize};

/// The countdown lengths a player can pick from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CountdownSecs {
    Thirty,
    Sixty,
    Ninety,
    OneTwenty,
}

impl CountdownSecs {
    pub const ALL: [CountdownSecs; 4] = [
        CountdownSecs::Thirty,
        CountdownSecs::Sixty,
        CountdownSecs::Ninety,
        CountdownSecs::OneTwenty,
    ];

    pub fn seconds(self) -> u64 {
        match self {
            CountdownSecs::Thirty => 30,
            CountdownSecs::Sixty => 60,
            CountdownSecs::Ninety => 90,
            CountdownSecs::OneTwenty => 120,
        }
    }

    pub fn millis(self) -> u64 {
        self.seconds() * 1000
    }

    pub fn from_seconds(seconds: u64) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.seconds() == seconds)
    }
}

/// Whether the clock counts down to a timeout or up without limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Mode {
    Countdown(CountdownSecs),
    Unlimited,
}

impl Mode {
    /// Every selectable mode, in picker order.
    pub const ALL: [Mode; 5] = [
        Mode::Countdown(CountdownSecs::Thirty),
        Mode::Countdown(CountdownSecs::Sixty),
        Mode::Countdown(CountdownSecs::Ninety),
        Mode::Countdown(CountdownSecs::OneTwenty),
        Mode::Unlimited,
    ];

    pub fn is_unlimited(self) -> bool {
        matches!(self, Mode::Unlimited)
    }

    pub fn is_countdown(self) -> bool {
        !self.is_unlimited()
    }

    /// Total countdown length in milliseconds; `None` for unlimited.
    pub fn total_millis(self) -> Option<u64> {
        match self {
            Mode::Countdown(secs) => Some(secs.millis()),
            Mode::Unlimited => None,
        }
    }

    /// Stable key used in storage.
    pub fn key(self) -> String {
        match self {
            Mode::Countdown(secs) => secs.seconds().to_string(),
            Mode::Unlimited => "unlimited".to_string(),
        }
    }

    /// Human-readable label.
    pub fn display_name(self) -> String {
        match self {
            Mode::Countdown(secs) => format!("{}s", secs.seconds()),
            Mode::Unlimited => "Unlimited".to_string(),
        }
    }

    /// The mode after this one in picker order, wrapping around.
    pub fn next(self) -> Self {
        let index = Self::ALL.iter().position(|m| *m == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }
}

impl Default for Mode {
    fn default() -> Self {
        Mode::Countdown(CountdownSecs::Thirty)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl FromStr for Mode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("unlimited") {
            return Ok(Mode::Unlimited);
        }

        let seconds: u64 = s
            .trim_end_matches('s')
            .parse()
            .map_err(|_| anyhow!("unknown mode: {}", s))?;

        CountdownSecs::from_seconds(seconds)
            .map(Mode::Countdown)
            .ok_or_else(|| anyhow!("unsupported countdown length: {}s", seconds))
    }
}

impl TryFrom<String> for Mode {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Mode> for String {
    fn from(mode: Mode) -> Self {
        mode.key()
    }
}
