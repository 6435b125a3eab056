//! Rule evaluation engine for cable selection.
//!
//! The `CableAdvisor` walks the rule table in priority order and answers with
//! the first rule whose conditions all hold. It never fails: when nothing
//! matches, the table's fallback answers.

use std::sync::OnceLock;

use tracing::debug;

use super::requirements::get_load_type_requirements;
use super::rules::default_rules;
use super::types::*;

/// The cable selection engine.
pub struct CableAdvisor {
    rules: CableRules,
}

impl CableAdvisor {
    /// Create a new advisor with the given rule table.
    ///
    /// # Arguments
    /// * `rules` - Rule table (typically from `default_rules()` or `load_rules()`)
    pub fn new(rules: CableRules) -> Self {
        Self { rules }
    }

    /// Evaluate the rule table against a context.
    ///
    /// Rules are checked in order and the first match wins, so a context
    /// matching several rules always gets the highest-priority one.
    pub fn select(&self, context: &CableSelectionContext) -> CableSelection {
        let load = context.load_text();
        let run = context.run_text();

        for rule in &self.rules.rules {
            if condition_holds(&rule.when, context, &load, run.as_deref()) {
                debug!(rule = %rule.id, cable = ?rule.cable_type, "cable rule matched");
                return CableSelection {
                    cable_type: rule.cable_type,
                    reason: rule.reason.clone(),
                    alternatives: rule.alternatives.clone(),
                    matched_rule: Some(rule.id.clone()),
                };
            }
        }

        let fallback = &self.rules.fallback;
        debug!(cable = ?fallback.cable_type, "no cable rule matched, using fallback");
        CableSelection {
            cable_type: fallback.cable_type,
            reason: fallback.reason.clone(),
            alternatives: fallback.alternatives.clone(),
            matched_rule: None,
        }
    }

    /// Merge the requirements implied by the load description, then select.
    pub fn advise(&self, context: &CableSelectionContext) -> CableSelection {
        let requirements = get_load_type_requirements(context.load_type.as_deref().unwrap_or(""));
        if requirements.is_empty() {
            self.select(context)
        } else {
            self.select(&requirements.apply_to(context))
        }
    }

    /// The rule table this advisor evaluates.
    pub fn rules(&self) -> &CableRules {
        &self.rules
    }
}

/// Select a cable using the embedded default rule table.
pub fn select_cable_type(context: &CableSelectionContext) -> CableSelection {
    static DEFAULT: OnceLock<CableAdvisor> = OnceLock::new();
    DEFAULT
        .get_or_init(|| CableAdvisor::new(default_rules()))
        .select(context)
}

fn condition_holds(
    when: &RuleCondition,
    context: &CableSelectionContext,
    load: &str,
    run: Option<&str>,
) -> bool {
    if !when.fire_protection.is_empty() && !when.fire_protection.contains(&context.fire_protection)
    {
        return false;
    }

    if !when.load_type_any.is_empty()
        && !when
            .load_type_any
            .iter()
            .any(|group| group.iter().all(|kw| load.contains(kw.as_str())))
    {
        return false;
    }

    if !when.location.is_empty() && !when.location.iter().any(|l| l.matches(context.location)) {
        return false;
    }

    if let Some(limit) = when.ambient_above {
        match context.ambient_temperature {
            Some(t) if t > limit => {}
            _ => return false,
        }
    }

    if let Some(required) = when.mechanical_protection {
        if context.mechanical_protection != required {
            return false;
        }
    }

    if !when.cable_run_any.is_empty() {
        let hit = match run {
            Some(text) => mentions_any(text, &when.cable_run_any),
            None => when.allow_unspecified_run,
        };
        if !hit {
            return false;
        }
    }

    if let Some(text) = run {
        if mentions_any(text, &when.cable_run_none) {
            return false;
        }
    }

    true
}

fn mentions_any(text: &str, keywords: &[String]) -> bool {
    keywords.iter().any(|kw| text.contains(kw.as_str()))
}
