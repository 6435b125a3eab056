//! Type definitions for the cable selection advisor.
//!
//! These types support both TOML deserialization (for loading the rule table)
//! and JSON serialization (for the command layer).

use serde::{Deserialize, Serialize};

// =============================================================================
// CONFIGURATION TYPES (loaded from TOML)
// =============================================================================

/// Root configuration loaded from cable_rules.toml.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CableRules {
    /// Rules in priority order; the first matching rule wins
    pub rules: Vec<CableRule>,
    /// Answer used when no rule matches
    pub fallback: FallbackRule,
}

/// A guard condition plus the recommendation it produces.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CableRule {
    /// Stable identifier, reported back in `CableSelection::matched_rule`
    pub id: String,
    #[serde(default)]
    pub when: RuleCondition,
    pub cable_type: CableType,
    pub reason: String,
    #[serde(default)]
    pub alternatives: Vec<CableType>,
}

/// Conditions a context must satisfy for a rule to fire.
///
/// Every populated field must hold. Empty lists and `None` mean "don't care".
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct RuleCondition {
    /// Any of these classifications
    pub fire_protection: Vec<FireProtection>,
    /// Keyword groups; holds when every keyword of one group is in the load text
    pub load_type_any: Vec<Vec<String>>,
    /// Any of these locations (`unspecified` matches an absent location)
    pub location: Vec<LocationMatch>,
    /// Ambient temperature strictly above this value
    pub ambient_above: Option<f64>,
    pub mechanical_protection: Option<bool>,
    /// Run text must mention at least one of these
    pub cable_run_any: Vec<String>,
    /// Lets an absent run satisfy `cable_run_any`
    pub allow_unspecified_run: bool,
    /// Run text must mention none of these
    pub cable_run_none: Vec<String>,
}

/// Location selector used in rule conditions.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum LocationMatch {
    Inside,
    Outside,
    Underground,
    Loft,
    PlantRoom,
    DataCenter,
    Unspecified,
}

impl LocationMatch {
    pub fn matches(&self, location: Option<InstallationLocation>) -> bool {
        match (self, location) {
            (Self::Unspecified, None) => true,
            (_, None) | (Self::Unspecified, Some(_)) => false,
            (Self::Inside, Some(l)) => l == InstallationLocation::Inside,
            (Self::Outside, Some(l)) => l == InstallationLocation::Outside,
            (Self::Underground, Some(l)) => l == InstallationLocation::Underground,
            (Self::Loft, Some(l)) => l == InstallationLocation::Loft,
            (Self::PlantRoom, Some(l)) => l == InstallationLocation::PlantRoom,
            (Self::DataCenter, Some(l)) => l == InstallationLocation::DataCenter,
        }
    }
}

/// Recommendation returned when nothing else matched.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FallbackRule {
    pub cable_type: CableType,
    pub reason: String,
    #[serde(default)]
    pub alternatives: Vec<CableType>,
}

// =============================================================================
// INPUT TYPES
// =============================================================================

/// Where the circuit is installed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum InstallationLocation {
    Inside,
    Outside,
    Underground,
    Loft,
    PlantRoom,
    DataCenter,
}

impl InstallationLocation {
    /// Wire name as used in JSON and the rule table.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Inside => "inside",
            Self::Outside => "outside",
            Self::Underground => "underground",
            Self::Loft => "loft",
            Self::PlantRoom => "plant-room",
            Self::DataCenter => "data-center",
        }
    }
}

/// Fire protection classification of the circuit.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum FireProtection {
    #[default]
    None,
    FireAlarm,
    EscapeRoute,
    FireCompartment,
}

/// Installation scenario for one circuit.
///
/// Every field is optional on the wire, so `{}` is a valid (empty) context.
/// Absent fields simply fail to match the rules that need them.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CableSelectionContext {
    /// Free-text load description (e.g. "EV charger", "emergency lighting")
    pub load_type: Option<String>,
    /// Installation location, `None` when unspecified
    pub location: Option<InstallationLocation>,
    /// Free-text description of the cable run (e.g. "in conduit", "clipped-direct")
    pub cable_run: Option<String>,
    /// Whether the run needs mechanical protection
    pub mechanical_protection: bool,
    pub fire_protection: FireProtection,
    /// Ambient temperature in degrees Celsius
    pub ambient_temperature: Option<f64>,
}

impl CableSelectionContext {
    /// Lower-cased load text, empty when absent.
    pub(crate) fn load_text(&self) -> String {
        self.load_type.as_deref().unwrap_or_default().to_lowercase()
    }

    /// Lower-cased cable run text, `None` when absent or blank.
    pub(crate) fn run_text(&self) -> Option<String> {
        self.cable_run
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase)
    }
}

// =============================================================================
// OUTPUT TYPES
// =============================================================================

/// Supported cable constructions.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum CableType {
    /// 6242Y PVC flat twin and earth
    TwinAndEarth,
    /// XLPE insulated twin and earth rated to 90 C
    HeatResistantTwinAndEarth,
    /// 6491X single-core singles for conduit or trunking
    SingleCore,
    /// Steel-wire-armoured
    Swa,
    /// FP200-class fire-resistant (BS 7629 standard)
    FireResistant,
    /// FP400-class enhanced fire-resistant (BS 8519 / BS 5839 enhanced)
    EnhancedFireResistant,
    /// Mineral insulated copper clad
    Micc,
    /// XLPE/LSZH cable rated to 90 C for hot environments
    HighTemperature,
    /// Low smoke zero halogen
    Lszh,
}

impl CableType {
    /// All variants, in declaration order.
    pub const ALL: [CableType; 9] = [
        CableType::TwinAndEarth,
        CableType::HeatResistantTwinAndEarth,
        CableType::SingleCore,
        CableType::Swa,
        CableType::FireResistant,
        CableType::EnhancedFireResistant,
        CableType::Micc,
        CableType::HighTemperature,
        CableType::Lszh,
    ];

    /// Short trade label for display.
    pub fn label(&self) -> &'static str {
        match self {
            Self::TwinAndEarth => "6242Y Twin & Earth",
            Self::HeatResistantTwinAndEarth => "XLPE Twin & Earth (90°C)",
            Self::SingleCore => "6491X Single Core",
            Self::Swa => "SWA Armoured",
            Self::FireResistant => "FP200 Fire Resistant",
            Self::EnhancedFireResistant => "FP400 Enhanced Fire Resistant",
            Self::Micc => "MICC Mineral Insulated",
            Self::HighTemperature => "XLPE High Temperature",
            Self::Lszh => "LSZH Low Smoke Zero Halogen",
        }
    }

    /// One-line description of the construction.
    pub fn description(&self) -> &'static str {
        match self {
            Self::TwinAndEarth => "PVC insulated and sheathed flat cable for general domestic wiring",
            Self::HeatResistantTwinAndEarth => {
                "Flat twin and earth with XLPE insulation, tolerant of higher conductor temperatures"
            }
            Self::SingleCore => "PVC insulated single-core conductors drawn into conduit or trunking",
            Self::Swa => "Armoured multicore cable with steel wire mechanical protection",
            Self::FireResistant => "Fire-resistant cable maintaining circuit integrity under fire conditions",
            Self::EnhancedFireResistant => {
                "Enhanced fire-resistant cable for life safety and firefighting systems"
            }
            Self::Micc => "Copper-sheathed mineral insulated cable, inherently fire resistant",
            Self::HighTemperature => "Cross-linked polyethylene insulation rated for 90°C operation",
            Self::Lszh => "Low smoke zero halogen sheath limiting toxic smoke in a fire",
        }
    }
}

/// Outcome of evaluating the rule table for one context.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CableSelection {
    /// Recommended cable construction
    pub cable_type: CableType,
    /// Human-readable justification
    pub reason: String,
    /// Alternatives ordered by suitability (best first)
    pub alternatives: Vec<CableType>,
    /// Identifier of the rule that fired, `None` when the fallback answered
    pub matched_rule: Option<String>,
}
