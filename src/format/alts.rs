//! Alternate-account report formatting
//!
//! Alt detections arrive fully materialized, so the report renders
//! synchronously: a header with the target name substituted, then one row per
//! detected alt.

use crate::config::ConfigStore;
use crate::error::TribunalResult;
use crate::format::template;
use crate::format::time::DateFormatter;
use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::sync::Arc;
use uuid::Uuid;

/// How an alternate account was detected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DetectionKind {
    /// Same address seen on another account
    Normal,
    /// Stricter correlation across past sessions
    Strict,
}

impl DetectionKind {
    fn config_key(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Strict => "strict",
        }
    }
}

/// One alternate account flagged by the detection collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectedAlt {
    pub detection_kind: DetectionKind,
    pub address: IpAddr,
    pub user_id: Uuid,
    pub username: String,
    /// Epoch seconds when the correlation was recorded
    pub date_recorded: i64,
}

/// Renders multi-row alternate-account reports
pub struct AltReportFormatter {
    config: Arc<ConfigStore>,
    dates: DateFormatter,
}

impl AltReportFormatter {
    /// Create a formatter over the given configuration
    ///
    /// # Errors
    /// Returns a configuration-integrity fault when the date formatting
    /// section is incomplete.
    pub fn new(config: Arc<ConfigStore>) -> TribunalResult<Self> {
        let dates = DateFormatter::from_config(&config)?;
        Ok(Self { config, dates })
    }

    /// Render the report: header with `%TARGET%` substituted, one row per alt
    ///
    /// An empty alt sequence yields exactly the rendered header.
    ///
    /// # Errors
    /// Returns a configuration-integrity fault when a row layout or detection
    /// kind label is missing.
    pub fn render_report(
        &self,
        header: &str,
        target_name: &str,
        alts: &[DetectedAlt],
    ) -> TribunalResult<String> {
        let mut out = template::apply(header, &[("%TARGET%", target_name)]);
        let layout = self.config.get_string("alts.formatting.layout")?;
        for alt in alts {
            let kind = self
                .config
                .get_string(&format!("alts.formatting.{}", alt.detection_kind.config_key()))?;
            let row = template::apply(
                &layout,
                &[
                    ("%DETECTION_KIND%", kind.as_str()),
                    ("%ADDRESS%", &alt.address.to_string()),
                    ("%RELEVANT_USER%", &alt.username),
                    ("%RELEVANT_USERID%", &alt.user_id.to_string()),
                    ("%DATE_RECORDED%", &self.dates.format_absolute(alt.date_recorded)),
                ],
            );
            out.push('\n');
            out.push_str(&row);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn formatter(layout: &str) -> AltReportFormatter {
        let yaml = format!(
            r#"
date-formatting:
  timezone: '+00:00'
  format: '%d/%m/%Y %H:%M:%S'
alts:
  formatting:
    layout: '{layout}'
    normal: NORMAL
    strict: STRICT
"#
        );
        AltReportFormatter::new(Arc::new(ConfigStore::from_yaml_str(&yaml).unwrap())).unwrap()
    }

    #[test]
    fn test_render_single_row() {
        let formatter = formatter(
            "detection_kind: %DETECTION_KIND%, address: %ADDRESS%, username: %RELEVANT_USER%, \
             user_id: %RELEVANT_USERID%, date_recorded: %DATE_RECORDED%",
        );
        let user_id = Uuid::new_v4();
        let alt = DetectedAlt {
            detection_kind: DetectionKind::Normal,
            address: "207.144.101.102".parse().unwrap(),
            user_id,
            username: "AltUser".to_string(),
            date_recorded: 1_627_006_523,
        };

        let report = formatter
            .render_report("Alt report for %TARGET%", "MainUser", &[alt])
            .unwrap();
        assert_eq!(
            report,
            format!(
                "Alt report for MainUser\n\
                 detection_kind: NORMAL, address: 207.144.101.102, username: AltUser, \
                 user_id: {user_id}, date_recorded: 23/07/2021 02:15:23"
            )
        );
    }

    #[test]
    fn test_empty_alt_sequence_is_header_only() {
        let formatter = formatter("%DETECTION_KIND%");
        let report = formatter
            .render_report("Alt report for %TARGET%", "MainUser", &[])
            .unwrap();
        assert_eq!(report, "Alt report for MainUser");
    }

    #[test]
    fn test_rows_join_with_line_breaks() {
        let formatter = formatter("%DETECTION_KIND% %RELEVANT_USER%");
        let alt = |kind, name: &str| DetectedAlt {
            detection_kind: kind,
            address: "10.0.0.1".parse().unwrap(),
            user_id: Uuid::new_v4(),
            username: name.to_string(),
            date_recorded: 0,
        };

        let report = formatter
            .render_report(
                "header",
                "ignored",
                &[alt(DetectionKind::Normal, "a"), alt(DetectionKind::Strict, "b")],
            )
            .unwrap();
        assert_eq!(report, "header\nNORMAL a\nSTRICT b");
    }
}
