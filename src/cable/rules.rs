//! TOML rule loading for the cable selection advisor.
//!
//! Provides two loading methods:
//! - `default_rules()` - Loads the embedded rule table compiled into the binary
//! - `load_rules(path)` - Loads a custom rule table from a file path

use std::collections::HashSet;
use std::path::Path;

use tracing::debug;

use super::types::CableRules;
use crate::error::AdvisorError;

/// Default rules embedded in the binary at compile time.
/// These are loaded from `config/cable_rules.toml`.
const DEFAULT_RULES: &str = include_str!("../../config/cable_rules.toml");

/// Load rules from a TOML file at the given path.
///
/// # Example
/// ```ignore
/// let rules = load_rules(Path::new("/path/to/cable_rules.toml"))?;
/// ```
pub fn load_rules(path: &Path) -> Result<CableRules, AdvisorError> {
    let content = std::fs::read_to_string(path)?;
    let rules = parse_rules(&content)?;
    debug!("Loaded {} cable rules from {:?}", rules.rules.len(), path);
    Ok(rules)
}

/// Parse and normalise a rule table from TOML text.
///
/// Keywords are lower-cased so matching stays case-insensitive. Duplicate
/// rule ids and empty keywords are rejected.
pub fn parse_rules(content: &str) -> Result<CableRules, AdvisorError> {
    let mut rules: CableRules = toml::from_str(content)?;
    normalise(&mut rules)?;
    Ok(rules)
}

/// Get the default rules embedded in the binary.
///
/// # Panics
/// Panics if the embedded TOML is invalid (this would be a compile-time bug).
pub fn default_rules() -> CableRules {
    parse_rules(DEFAULT_RULES).expect("embedded cable_rules.toml must be valid")
}

fn normalise(rules: &mut CableRules) -> Result<(), AdvisorError> {
    let mut seen = HashSet::new();

    for rule in &mut rules.rules {
        if rule.id.trim().is_empty() {
            return Err(AdvisorError::Rules("rule with empty id".to_string()));
        }
        if !seen.insert(rule.id.clone()) {
            return Err(AdvisorError::Rules(format!("duplicate rule id '{}'", rule.id)));
        }

        let when = &mut rule.when;
        for group in &mut when.load_type_any {
            if group.is_empty() {
                return Err(AdvisorError::Rules(format!(
                    "rule '{}' has an empty load_type_any group",
                    rule.id
                )));
            }
            lowercase_all(group, &rule.id)?;
        }
        lowercase_all(&mut when.cable_run_any, &rule.id)?;
        lowercase_all(&mut when.cable_run_none, &rule.id)?;
    }

    Ok(())
}

fn lowercase_all(keywords: &mut [String], rule_id: &str) -> Result<(), AdvisorError> {
    for keyword in keywords.iter_mut() {
        if keyword.trim().is_empty() {
            return Err(AdvisorError::Rules(format!(
                "rule '{}' has an empty keyword",
                rule_id
            )));
        }
        *keyword = keyword.to_lowercase();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cable::types::{CableType, FireProtection, LocationMatch};

    #[test]
    fn test_default_rules_loads() {
        let rules = default_rules();
        assert!(!rules.rules.is_empty(), "Should have rules");
        assert_eq!(rules.fallback.cable_type, CableType::TwinAndEarth);
    }

    #[test]
    fn test_default_rule_order() {
        let rules = default_rules();
        let ids: Vec<&str> = rules.rules.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "fire-alarm",
                "escape-route",
                "underground",
                "outside",
                "high-ambient",
                "plant-room",
                "data-center",
                "mechanical-protection",
                "containment",
                "cable-support",
                "loft-insulation",
                "loft",
                "inside-clipped",
            ]
        );
    }

    #[test]
    fn test_fire_alarm_rule_is_keyword_gated() {
        let rules = default_rules();
        let fire = &rules.rules[0];
        assert_eq!(fire.when.fire_protection, vec![FireProtection::FireAlarm]);
        assert_eq!(
            fire.when.load_type_any,
            vec![
                vec!["fire".to_string()],
                vec!["emergency".to_string(), "light".to_string()]
            ]
        );
    }

    #[test]
    fn test_inside_rule_accepts_unspecified() {
        let rules = default_rules();
        let inside = rules.rules.iter().find(|r| r.id == "inside-clipped").unwrap();
        assert!(inside.when.location.contains(&LocationMatch::Unspecified));
        assert!(inside.when.allow_unspecified_run);
    }

    #[test]
    fn test_every_rule_has_reason() {
        let rules = default_rules();
        for rule in &rules.rules {
            assert!(!rule.reason.is_empty(), "Rule '{}' needs a reason", rule.id);
        }
        assert!(!rules.fallback.reason.is_empty());
    }

    #[test]
    fn test_keywords_are_lowercased() {
        let toml = r#"
            [[rules]]
            id = "shouty"
            cable_type = "swa"
            reason = "test"
            [rules.when]
            cable_run_any = ["TRAY"]
            load_type_any = [["Heat", "PUMP"]]

            [fallback]
            cable_type = "twin-and-earth"
            reason = "fallback"
        "#;
        let rules = parse_rules(toml).unwrap();
        assert_eq!(rules.rules[0].when.cable_run_any, vec!["tray".to_string()]);
        assert_eq!(
            rules.rules[0].when.load_type_any,
            vec![vec!["heat".to_string(), "pump".to_string()]]
        );
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let toml = r#"
            [[rules]]
            id = "same"
            cable_type = "swa"
            reason = "a"

            [[rules]]
            id = "same"
            cable_type = "lszh"
            reason = "b"

            [fallback]
            cable_type = "twin-and-earth"
            reason = "fallback"
        "#;
        let err = parse_rules(toml).unwrap_err();
        assert!(err.to_string().contains("duplicate rule id"));
    }

    #[test]
    fn test_empty_keyword_group_rejected() {
        let toml = r#"
            [[rules]]
            id = "empty-group"
            cable_type = "swa"
            reason = "a"
            [rules.when]
            load_type_any = [[]]

            [fallback]
            cable_type = "twin-and-earth"
            reason = "fallback"
        "#;
        assert!(matches!(parse_rules(toml), Err(AdvisorError::Rules(_))));
    }

    #[test]
    fn test_missing_fallback_rejected() {
        let toml = r#"
            [[rules]]
            id = "only"
            cable_type = "swa"
            reason = "a"
        "#;
        assert!(matches!(parse_rules(toml), Err(AdvisorError::Toml(_))));
    }

    #[test]
    fn test_unknown_condition_rejected() {
        let toml = r#"
            [[rules]]
            id = "typo"
            cable_type = "swa"
            reason = "a"
            [rules.when]
            locaton = ["loft"]

            [fallback]
            cable_type = "twin-and-earth"
            reason = "fallback"
        "#;
        assert!(parse_rules(toml).is_err());
    }
}
