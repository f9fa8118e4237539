//! Punishment notification formatting
//!
//! This module composes punishment data with configured message layouts.
//! Victim and operator display names are resolved concurrently; once both are
//! available the derived duration fields are substituted and the result is
//! expanded into rich text.

use crate::config::ConfigStore;
use crate::error::TribunalResult;
use crate::format::richtext::{self, RenderedMessage};
use crate::format::template;
use crate::format::time::{DateFormatter, DurationFormatter};
use crate::names::NameResolver;
use crate::punishment::{Operator, Punishment, Scope, ScopeManager, Victim};
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

/// Grace window, in seconds, after punishment creation during which the
/// remaining-time display equals the full duration. Prevents a just-created
/// punishment reading one tick short of its nominal duration.
pub const MARGIN_OF_INITIATION: i64 = 10;

/// Renders punishment notifications from configured layouts
pub struct PunishmentFormatter {
    config: Arc<ConfigStore>,
    names: Arc<dyn NameResolver>,
    scopes: Arc<dyn ScopeManager>,
    durations: DurationFormatter,
    dates: DateFormatter,
}

impl PunishmentFormatter {
    /// Create a formatter over the given collaborators
    ///
    /// # Errors
    /// Returns a configuration-integrity fault when the duration or date
    /// formatting sections are incomplete.
    pub fn new(
        config: Arc<ConfigStore>,
        names: Arc<dyn NameResolver>,
        scopes: Arc<dyn ScopeManager>,
    ) -> TribunalResult<Self> {
        let durations = DurationFormatter::from_config(&config)?;
        let dates = DateFormatter::from_config(&config)?;
        Ok(Self {
            config,
            names,
            scopes,
            durations,
            dates,
        })
    }

    /// Render the notification for a freshly applied punishment
    ///
    /// # Errors
    /// Fails when either identity resolution fails or the layout key is missing.
    pub async fn render_notification(
        &self,
        punishment: &Punishment,
    ) -> TribunalResult<RenderedMessage> {
        let layout = self
            .config
            .get_string(&format!("additions.{}.layout", punishment.kind.plural()))?;
        self.format_with_punishment(&layout, punishment).await
    }

    /// Render the notification for a lifted punishment
    ///
    /// # Errors
    /// Fails when either identity resolution fails or the layout key is missing.
    pub async fn render_removal(
        &self,
        punishment: &Punishment,
    ) -> TribunalResult<RenderedMessage> {
        let layout = self
            .config
            .get_string(&format!("removals.{}.layout", punishment.kind.plural()))?;
        self.format_with_punishment(&layout, punishment).await
    }

    /// Substitute punishment data into an arbitrary message layout
    ///
    /// # Errors
    /// Fails when either identity resolution fails, propagating the victim
    /// failure first.
    pub async fn format_with_punishment(
        &self,
        message: &str,
        punishment: &Punishment,
    ) -> TribunalResult<RenderedMessage> {
        // Both resolutions run concurrently; the combine point waits for both.
        let (victim, operator) = tokio::join!(
            self.format_victim(&punishment.victim),
            self.format_operator(&punishment.operator)
        );
        let victim = victim?;
        let operator = operator?;
        let text = self.substitute(message, punishment, &victim, &operator)?;
        Ok(richtext::expand(&text))
    }

    fn substitute(
        &self,
        message: &str,
        punishment: &Punishment,
        victim_name: &str,
        operator_name: &str,
    ) -> TribunalResult<String> {
        let now = Utc::now().timestamp();
        let start = punishment.start;
        let end = punishment.end;
        let time_passed = now - start;

        let (duration, time_end_rel) = if punishment.is_permanent() {
            (
                self.config
                    .get_string("formatting.permanent-display.relative")?,
                self.config
                    .get_string("formatting.permanent-display.absolute")?,
            )
        } else {
            let duration = end - start;
            let remaining = if time_passed < MARGIN_OF_INITIATION {
                duration
            } else {
                end - now
            };
            (
                self.durations.format_relative(duration),
                self.durations.format_relative(remaining),
            )
        };

        let tokens = [
            ("%ID%", punishment.id.to_string()),
            (
                "%TYPE%",
                template::capitalise_properly(&punishment.kind.to_string()),
            ),
            ("%VICTIM%", victim_name.to_string()),
            ("%VICTIM_ID%", Self::format_victim_id(&punishment.victim)),
            ("%OPERATOR%", operator_name.to_string()),
            ("%REASON%", punishment.reason.clone()),
            ("%SCOPE%", self.format_scope(&punishment.scope)?),
            ("%DURATION%", duration),
            ("%TIME_START_ABS%", self.dates.format_absolute(start)),
            (
                "%TIME_START_REL%",
                self.durations.format_relative(time_passed),
            ),
            ("%TIME_END_ABS%", self.dates.format_absolute(end)),
            ("%TIME_END_REL%", time_end_rel),
        ];
        let borrowed: Vec<(&str, &str)> = tokens
            .iter()
            .map(|(token, value)| (*token, value.as_str()))
            .collect();
        Ok(template::apply(message, &borrowed))
    }

    fn format_victim_id(victim: &Victim) -> String {
        match victim {
            Victim::Player(uuid) => uuid.simple().to_string(),
            Victim::Address(addr) => addr.to_string(),
        }
    }

    async fn format_victim(&self, victim: &Victim) -> TribunalResult<String> {
        match victim {
            Victim::Player(uuid) => self.full_lookup_name(*uuid).await,
            Victim::Address(addr) => Ok(addr.to_string()),
        }
    }

    async fn format_operator(&self, operator: &Operator) -> TribunalResult<String> {
        match operator {
            Operator::Player(uuid) => self.full_lookup_name(*uuid).await,
            Operator::Console => self.config.get_string("formatting.console-display"),
        }
    }

    /// A cached name completes immediately; a miss goes to the remote lookup.
    async fn full_lookup_name(&self, uuid: Uuid) -> TribunalResult<String> {
        match self.names.cached_name(uuid) {
            Some(name) => Ok(name),
            None => self.names.lookup_name(uuid).await,
        }
    }

    fn format_scope(&self, scope: &Scope) -> TribunalResult<String> {
        match self.scopes.display_name_for(scope) {
            Some(display) => Ok(display),
            None => self.config.get_string("formatting.global-scope-display"),
        }
    }
}
