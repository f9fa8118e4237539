//! Message formatting engine
//!
//! Composes punishment and alt-detection data with localized, configurable
//! templates: relative durations, absolute dates, token substitution, and
//! rich-text tag expansion.

mod alts;
mod formatter;
pub mod richtext;
pub mod template;
mod time;

pub use alts::{AltReportFormatter, DetectedAlt, DetectionKind};
pub use formatter::{MARGIN_OF_INITIATION, PunishmentFormatter};
pub use richtext::{ClickAction, Component, RenderedMessage};
pub use time::{DateFormatter, DurationFormatter, TIME_UNITS};
