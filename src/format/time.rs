//! Relative-duration and absolute-date formatting
//!
//! The duration formatter walks a static, descending unit table and emits one
//! localized segment per enabled unit that fits at least once. The boundary is
//! strictly greater-than: a delta of exactly one unit length yields zero of
//! that unit and falls through to smaller units. That boundary is long-standing
//! observable behavior and is pinned by tests rather than corrected.

use crate::config::ConfigStore;
use crate::error::{TribunalError, TribunalResult};
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, FixedOffset};

/// Ordered (unit name, seconds per unit) table, descending magnitude
pub const TIME_UNITS: [(&str, u64); 6] = [
    ("years", 31_536_000),
    ("months", 2_592_000),
    ("weeks", 604_800),
    ("days", 86_400),
    ("hours", 3_600),
    ("minutes", 60),
];

struct UnitEntry {
    name: &'static str,
    length: u64,
    enabled: bool,
    message: String,
}

/// Decomposes a signed time delta into ordered unit segments
pub struct DurationFormatter {
    units: Vec<UnitEntry>,
    and_word: String,
    comma: bool,
}

impl DurationFormatter {
    /// Build a formatter from the `misc.time` configuration section
    ///
    /// # Errors
    /// Returns a configuration-integrity fault when a grammar or unit key is
    /// missing.
    pub fn from_config(config: &ConfigStore) -> TribunalResult<Self> {
        let mut units = Vec::with_capacity(TIME_UNITS.len());
        for (name, length) in TIME_UNITS {
            units.push(UnitEntry {
                name,
                length,
                enabled: config.get_bool(&format!("misc.time.{name}.enable"))?,
                message: config.get_string(&format!("misc.time.{name}.message"))?,
            });
        }
        Ok(Self {
            units,
            and_word: config.get_string("misc.time.and")?,
            comma: config.get_bool("misc.time.grammar.comma")?,
        })
    }

    /// Format a time delta in seconds as relative duration text
    ///
    /// Negative input is normalized by absolute value; the sign is not
    /// reflected in the output. Returns the empty string when no enabled unit
    /// fits.
    #[must_use]
    pub fn format_relative(&self, diff: i64) -> String {
        let mut remaining = diff.unsigned_abs();
        let mut segments = Vec::new();
        for unit in &self.units {
            // Strict: a delta of exactly one unit emits nothing for that unit.
            if remaining > unit.length && unit.enabled {
                let amount = remaining / unit.length;
                remaining -= amount * unit.length;
                let token = format!("%{}%", unit.name.to_uppercase());
                segments.push(unit.message.replace(&token, &amount.to_string()));
            }
        }

        let mut out = String::new();
        for (n, segment) in segments.iter().enumerate() {
            // Each separator precedes the segment it introduces, including the first.
            if n == segments.len() - 1 {
                out.push_str(&self.and_word);
            } else if self.comma {
                out.push(',');
            }
            if n != 0 {
                out.push(' ');
            }
            out.push_str(segment);
        }
        out
    }
}

/// Formats epoch seconds as absolute dates per configuration
pub struct DateFormatter {
    offset: FixedOffset,
    pattern: String,
}

impl DateFormatter {
    /// Build a formatter from the `date-formatting` configuration section
    ///
    /// # Errors
    /// Returns a configuration-integrity fault when the timezone offset or
    /// strftime pattern is missing or unparseable.
    pub fn from_config(config: &ConfigStore) -> TribunalResult<Self> {
        let timezone = config.get_string("date-formatting.timezone")?;
        let offset = timezone.parse::<FixedOffset>().map_err(|_| {
            TribunalError::ConfigurationIntegrity("date-formatting.timezone".to_string())
        })?;

        let pattern = config.get_string("date-formatting.format")?;
        let valid = StrftimeItems::new(&pattern).all(|item| !matches!(item, Item::Error));
        if !valid {
            return Err(TribunalError::ConfigurationIntegrity(
                "date-formatting.format".to_string(),
            ));
        }
        Ok(Self { offset, pattern })
    }

    /// Render epoch seconds using the configured timezone and pattern
    #[must_use]
    pub fn format_absolute(&self, epoch_seconds: i64) -> String {
        let utc = DateTime::from_timestamp(epoch_seconds, 0).unwrap_or_default();
        utc.with_timezone(&self.offset)
            .format(&self.pattern)
            .to_string()
    }
}
