//! Configuration store
//!
//! This module provides key lookups over a YAML document for message layouts,
//! time-unit grammar, and date formatting. Missing or mistyped keys are a
//! configuration-integrity fault, meant to be caught at startup by
//! [`ConfigStore::validate`] rather than at render time.

use crate::error::{TribunalError, TribunalResult};
use serde_yaml::Value;
use std::path::Path;
use tracing::info;

/// Default messages document, used when the embedder supplies nothing else.
pub const DEFAULT_MESSAGES: &str = r#"
formatting:
  console-display: Console
  global-scope-display: all servers
  permanent-display:
    relative: permanent
    absolute: never
additions:
  bans:
    layout: '%VICTIM% has been banned by %OPERATOR% for %DURATION%.||ttp:Reason: %REASON%'
  mutes:
    layout: '%VICTIM% has been muted by %OPERATOR% for %DURATION%.||ttp:Reason: %REASON%'
  warns:
    layout: '%VICTIM% has been warned by %OPERATOR%.||ttp:Reason: %REASON%'
  kicks:
    layout: '%VICTIM% has been kicked by %OPERATOR%.||ttp:Reason: %REASON%'
removals:
  bans:
    layout: '%VICTIM% has been unbanned by %OPERATOR%.'
  mutes:
    layout: '%VICTIM% has been unmuted by %OPERATOR%.'
  warns:
    layout: 'A warning on %VICTIM% has been lifted by %OPERATOR%.'
  kicks:
    layout: 'A kick record on %VICTIM% has been lifted by %OPERATOR%.'
misc:
  time:
    and: ' and'
    grammar:
      comma: true
    years:
      enable: true
      message: '%YEARS% years'
    months:
      enable: true
      message: '%MONTHS% months'
    weeks:
      enable: true
      message: '%WEEKS% weeks'
    days:
      enable: true
      message: '%DAYS% days'
    hours:
      enable: true
      message: '%HOURS% hours'
    minutes:
      enable: true
      message: '%MINUTES% minutes'
date-formatting:
  timezone: '+00:00'
  format: '%d/%m/%Y %H:%M:%S'
alts:
  formatting:
    layout: '%DETECTION_KIND% %ADDRESS% %RELEVANT_USER% %RELEVANT_USERID% %DATE_RECORDED%'
    normal: Normal
    strict: Strict
"#;

/// String keys every deployment must provide.
const REQUIRED_STRING_KEYS: &[&str] = &[
    "formatting.console-display",
    "formatting.global-scope-display",
    "formatting.permanent-display.relative",
    "formatting.permanent-display.absolute",
    "additions.bans.layout",
    "additions.mutes.layout",
    "additions.warns.layout",
    "additions.kicks.layout",
    "removals.bans.layout",
    "removals.mutes.layout",
    "removals.warns.layout",
    "removals.kicks.layout",
    "misc.time.and",
    "date-formatting.timezone",
    "date-formatting.format",
    "alts.formatting.layout",
    "alts.formatting.normal",
    "alts.formatting.strict",
];

/// Boolean keys every deployment must provide.
const REQUIRED_BOOL_KEYS: &[&str] = &["misc.time.grammar.comma"];

/// Read-only key lookup over a parsed YAML document
#[derive(Debug, Clone)]
pub struct ConfigStore {
    root: Value,
}

impl ConfigStore {
    /// Parse a configuration document from a YAML string
    ///
    /// # Errors
    /// Returns a configuration-integrity fault if the document is not valid YAML.
    pub fn from_yaml_str(raw: &str) -> TribunalResult<Self> {
        let root: Value = serde_yaml::from_str(raw)
            .map_err(|e| TribunalError::ConfigurationIntegrity(format!("invalid yaml: {e}")))?;
        Ok(Self { root })
    }

    /// Load a configuration document from a file
    ///
    /// # Errors
    /// Returns a configuration-integrity fault if the file cannot be read or parsed.
    pub async fn load(path: impl AsRef<Path>) -> TribunalResult<Self> {
        let path = path.as_ref();
        let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
            TribunalError::ConfigurationIntegrity(format!("{}: {e}", path.display()))
        })?;
        let store = Self::from_yaml_str(&raw)?;
        info!(path = %path.display(), "Loaded configuration");
        Ok(store)
    }

    /// Built-in default messages document
    #[must_use]
    pub fn defaults() -> Self {
        // DEFAULT_MESSAGES is a compile-time constant and always parses.
        match Self::from_yaml_str(DEFAULT_MESSAGES) {
            Ok(store) => store,
            Err(_) => Self { root: Value::Null },
        }
    }

    fn lookup(&self, path: &str) -> Option<&Value> {
        let mut node = &self.root;
        for part in path.split('.') {
            node = node.get(part)?;
        }
        Some(node)
    }

    /// Get a string value at a dotted path
    ///
    /// # Errors
    /// Returns a configuration-integrity fault if the key is missing or not a string.
    pub fn get_string(&self, path: &str) -> TribunalResult<String> {
        self.lookup(path)
            .and_then(Value::as_str)
            .map(ToString::to_string)
            .ok_or_else(|| TribunalError::ConfigurationIntegrity(path.to_string()))
    }

    /// Get a boolean value at a dotted path
    ///
    /// # Errors
    /// Returns a configuration-integrity fault if the key is missing or not a boolean.
    pub fn get_bool(&self, path: &str) -> TribunalResult<bool> {
        self.lookup(path)
            .and_then(Value::as_bool)
            .ok_or_else(|| TribunalError::ConfigurationIntegrity(path.to_string()))
    }

    /// Check the full required key set, returning the first fault found
    ///
    /// # Errors
    /// Returns a configuration-integrity fault naming the offending key.
    pub fn validate(&self) -> TribunalResult<()> {
        for key in REQUIRED_STRING_KEYS {
            self.get_string(key)?;
        }
        for key in REQUIRED_BOOL_KEYS {
            self.get_bool(key)?;
        }
        for unit in crate::format::TIME_UNITS.iter().map(|(name, _)| name) {
            self.get_bool(&format!("misc.time.{unit}.enable"))?;
            self.get_string(&format!("misc.time.{unit}.message"))?;
        }
        Ok(())
    }
}
