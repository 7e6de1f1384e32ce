//! Engine configuration with defaults and validation.
//!
//! # Responsibility
//! - Hold tunables for outlines, the position write queue, and first layout.
//! - Load partial JSON overrides on top of defaults.
//!
//! # Invariants
//! - A config returned by `from_json_str` has passed `validate()`.
//! - Defaults match the values the graph view was designed around.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const DEFAULT_NODE_PADDING: f64 = 40.0;
pub const DEFAULT_TUBE_PADDING: f64 = 25.0;
pub const DEFAULT_OUTLINE_TENSION: f64 = 0.35;
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;
pub const DEFAULT_MAX_WAIT_MS: u64 = 1_000;
pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_FALLBACK_WIDTH: f64 = 800.0;
pub const DEFAULT_FALLBACK_HEIGHT: f64 = 600.0;

/// Configuration load/validation failures.
#[derive(Debug)]
pub enum ConfigError {
    Parse(serde_json::Error),
    Invalid { field: &'static str, reason: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "failed to parse engine config: {err}"),
            Self::Invalid { field, reason } => write!(f, "invalid `{field}`: {reason}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::Invalid { .. } => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

/// Region outline tunables.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutlineConfig {
    /// Padding beyond each node box before sampling its ellipse.
    pub node_padding: f64,
    /// Half-width of the corridor sampled along each connecting edge.
    pub tube_padding: f64,
    /// Catmull-Rom tension used when smoothing the hull.
    pub tension: f64,
}

impl Default for OutlineConfig {
    fn default() -> Self {
        Self {
            node_padding: DEFAULT_NODE_PADDING,
            tube_padding: DEFAULT_TUBE_PADDING,
            tension: DEFAULT_OUTLINE_TENSION,
        }
    }
}

/// Position write queue tunables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueConfig {
    /// Quiet period after the latest update before a flush fires.
    pub debounce_ms: u64,
    /// Upper bound between the first buffered update and its flush.
    pub max_wait_ms: u64,
    /// Failed persist attempts tolerated before a write is surfaced.
    pub max_retries: u32,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            max_wait_ms: DEFAULT_MAX_WAIT_MS,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

/// First-layout fallback area for nodes without a stored position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub fallback_width: f64,
    pub fallback_height: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            fallback_width: DEFAULT_FALLBACK_WIDTH,
            fallback_height: DEFAULT_FALLBACK_HEIGHT,
        }
    }
}

/// Top-level engine configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub outline: OutlineConfig,
    pub queue: QueueConfig,
    pub layout: LayoutConfig,
}

impl EngineConfig {
    /// Parses JSON overrides on top of defaults and validates the result.
    ///
    /// # Errors
    /// - `Parse` when the input is not valid JSON for this shape.
    /// - `Invalid` when a value is out of range.
    pub fn from_json_str(input: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_json::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        non_negative("outline.node_padding", self.outline.node_padding)?;
        non_negative("outline.tube_padding", self.outline.tube_padding)?;
        if !(self.outline.tension > 0.0 && self.outline.tension <= 1.0) {
            return Err(ConfigError::Invalid {
                field: "outline.tension",
                reason: format!("must be in (0, 1], got {}", self.outline.tension),
            });
        }
        if self.queue.max_wait_ms < self.queue.debounce_ms {
            return Err(ConfigError::Invalid {
                field: "queue.max_wait_ms",
                reason: format!(
                    "must be >= debounce_ms ({}), got {}",
                    self.queue.debounce_ms, self.queue.max_wait_ms
                ),
            });
        }
        positive("layout.fallback_width", self.layout.fallback_width)?;
        positive("layout.fallback_height", self.layout.fallback_height)?;
        Ok(())
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        return Ok(());
    }
    Err(ConfigError::Invalid {
        field,
        reason: format!("must be a finite non-negative number, got {value}"),
    })
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        return Ok(());
    }
    Err(ConfigError::Invalid {
        field,
        reason: format!("must be a finite positive number, got {value}"),
    })
}
