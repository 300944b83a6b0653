//! Labeled metric and progress gauge.

use crate::views::ViewError;
use colored::Colorize;
use std::fmt;

/// A metric value as handed to a widget.
#[derive(Debug, Clone, PartialEq)]
pub enum StatValue {
    Number(f64),
    Text(String),
}

impl From<u64> for StatValue {
    fn from(value: u64) -> Self {
        StatValue::Number(value as f64)
    }
}

impl From<f64> for StatValue {
    fn from(value: f64) -> Self {
        StatValue::Number(value)
    }
}

impl From<&str> for StatValue {
    fn from(value: &str) -> Self {
        StatValue::Text(value.to_string())
    }
}

impl From<String> for StatValue {
    fn from(value: String) -> Self {
        StatValue::Text(value)
    }
}

impl fmt::Display for StatValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatValue::Number(n) if n.fract() == 0.0 => write!(f, "{}", *n as i64),
            StatValue::Number(n) => write!(f, "{:.1}", n),
            StatValue::Text(s) => f.write_str(s),
        }
    }
}

/// Title over a value, with an optional prefix glyph.
#[derive(Debug, Clone, PartialEq)]
pub struct Statistic {
    pub title: String,
    pub value: StatValue,
    pub prefix: Option<String>,
}

impl Statistic {
    pub fn new(title: impl Into<String>, value: impl Into<StatValue>) -> Self {
        Self {
            title: title.into(),
            value: value.into(),
            prefix: None,
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn render(&self) -> String {
        let value = match &self.prefix {
            Some(prefix) => format!("{} {}", prefix, self.value),
            None => self.value.to_string(),
        };
        format!("{}\n  {}", self.title.dimmed(), value.bold())
    }
}

const GAUGE_WIDTH: usize = 20;
const WARN_ABOVE: f64 = 90.0;

/// Percentage gauge. Only numeric values can be shown.
#[derive(Debug, Clone, PartialEq)]
pub struct Progress {
    pub title: String,
    pub percent: f64,
}

impl Progress {
    pub fn new(title: impl Into<String>, value: impl Into<StatValue>) -> Result<Self, ViewError> {
        let title = title.into();
        match value.into() {
            StatValue::Number(percent) => Ok(Self { title, percent }),
            StatValue::Text(_) => Err(ViewError::NotNumeric(title)),
        }
    }

    /// Past the warning threshold the gauge turns red.
    pub fn is_critical(&self) -> bool {
        self.percent > WARN_ABOVE
    }

    pub fn render(&self) -> String {
        let clamped = self.percent.clamp(0.0, 100.0);
        let filled = ((clamped / 100.0) * GAUGE_WIDTH as f64).round() as usize;
        let bar = format!(
            "{}{}",
            "█".repeat(filled),
            "·".repeat(GAUGE_WIDTH - filled)
        );
        let bar = if self.is_critical() {
            bar.red().to_string()
        } else {
            bar.green().to_string()
        };
        format!("{}\n  [{}] {}%", self.title.dimmed(), bar, self.percent)
    }
}
