//! Installation requirements implied by a free-text load description.

use serde::{Deserialize, Serialize};

use super::types::{CableSelectionContext, FireProtection, InstallationLocation};

/// Partial context derived from a load description.
///
/// Fields that are `Some` override the matching context field when applied.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LoadRequirements {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<InstallationLocation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mechanical_protection: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fire_protection: Option<FireProtection>,
}

impl LoadRequirements {
    pub fn is_empty(&self) -> bool {
        self.location.is_none() && self.mechanical_protection.is_none() && self.fire_protection.is_none()
    }

    /// Return a copy of `context` with these requirements merged over it.
    pub fn apply_to(&self, context: &CableSelectionContext) -> CableSelectionContext {
        let mut merged = context.clone();
        if let Some(location) = self.location {
            merged.location = Some(location);
        }
        if let Some(mechanical) = self.mechanical_protection {
            merged.mechanical_protection = mechanical;
        }
        if let Some(fire) = self.fire_protection {
            merged.fire_protection = fire;
        }
        merged
    }

    fn outside(mechanical_protection: bool) -> Self {
        Self {
            location: Some(InstallationLocation::Outside),
            mechanical_protection: mechanical_protection.then_some(true),
            fire_protection: None,
        }
    }
}

/// Derive installation requirements from a load description.
///
/// Case-insensitive keyword matching. Order matters: the first matching
/// entry wins, so "outdoor socket" is checked before the generic outdoor
/// keywords and fire/emergency loads before everything else.
pub fn get_load_type_requirements(load_type: &str) -> LoadRequirements {
    let lower = load_type.to_lowercase();

    if (lower.contains("fire") && lower.contains("alarm"))
        || (lower.contains("emergency") && lower.contains("light"))
    {
        LoadRequirements {
            fire_protection: Some(FireProtection::FireAlarm),
            ..Default::default()
        }
    } else if lower.contains("outdoor socket") {
        LoadRequirements::outside(true)
    } else if lower.contains("outdoor") || lower.contains("garden") || lower.contains("outside") {
        LoadRequirements::outside(false)
    } else if lower.contains("ev") || lower.contains("charger") {
        LoadRequirements::outside(true)
    } else if lower.contains("heat pump") {
        LoadRequirements::outside(true)
    } else if lower.contains("underground") {
        LoadRequirements {
            location: Some(InstallationLocation::Underground),
            ..Default::default()
        }
    } else {
        LoadRequirements::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fire_alarm_and_emergency_lighting() {
        let expected = LoadRequirements {
            fire_protection: Some(FireProtection::FireAlarm),
            ..Default::default()
        };
        assert_eq!(get_load_type_requirements("Fire Alarm System"), expected);
        assert_eq!(get_load_type_requirements("emergency lighting"), expected);
    }

    #[test]
    fn test_outdoor_socket_needs_protection() {
        let req = get_load_type_requirements("Outdoor socket");
        assert_eq!(req.location, Some(InstallationLocation::Outside));
        assert_eq!(req.mechanical_protection, Some(true));
    }

    #[test]
    fn test_generic_outdoor() {
        for load in ["outdoor lighting", "Garden room", "outside tap heater"] {
            let req = get_load_type_requirements(load);
            assert_eq!(req.location, Some(InstallationLocation::Outside), "load: {}", load);
            assert_eq!(req.mechanical_protection, None, "load: {}", load);
        }
    }

    #[test]
    fn test_ev_charger() {
        let req = get_load_type_requirements("EV charger");
        assert_eq!(req, LoadRequirements::outside(true));

        let req = get_load_type_requirements("7kW charge point (EV)");
        assert_eq!(req.location, Some(InstallationLocation::Outside));
    }

    #[test]
    fn test_ev_is_a_substring_match() {
        // "ev" inside another word still implies an outdoor charger run
        for load in ["Smoke device", "Ground level lighting", "Heavy duty socket"] {
            assert_eq!(
                get_load_type_requirements(load),
                LoadRequirements::outside(true),
                "load: {}",
                load
            );
        }
    }

    #[test]
    fn test_heat_pump() {
        assert_eq!(
            get_load_type_requirements("Air source heat pump"),
            LoadRequirements::outside(true)
        );
    }

    #[test]
    fn test_underground_feed() {
        let req = get_load_type_requirements("Underground feed to outbuilding");
        assert_eq!(req.location, Some(InstallationLocation::Underground));
        assert_eq!(req.mechanical_protection, None);
    }

    #[test]
    fn test_garden_beats_underground() {
        let req = get_load_type_requirements("underground garden supply");
        assert_eq!(req.location, Some(InstallationLocation::Outside));
    }

    #[test]
    fn test_unknown_load_is_empty() {
        assert!(get_load_type_requirements("Kitchen ring final").is_empty());
        assert!(get_load_type_requirements("").is_empty());
    }

    #[test]
    fn test_apply_overrides_only_set_fields() {
        let context = CableSelectionContext {
            load_type: Some("EV charger".to_string()),
            location: Some(InstallationLocation::Inside),
            cable_run: Some("clipped-direct".to_string()),
            ambient_temperature: Some(20.0),
            ..Default::default()
        };
        let merged = get_load_type_requirements("EV charger").apply_to(&context);
        assert_eq!(merged.location, Some(InstallationLocation::Outside));
        assert!(merged.mechanical_protection);
        assert_eq!(merged.cable_run, context.cable_run);
        assert_eq!(merged.ambient_temperature, Some(20.0));
        assert_eq!(merged.fire_protection, FireProtection::None);
    }

    #[test]
    fn test_requirements_serialize_skips_unset() {
        let json = serde_json::to_string(&get_load_type_requirements("garden")).unwrap();
        assert_eq!(json, r#"{"location":"outside"}"#);
    }
}
