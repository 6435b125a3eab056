use serde::{Deserialize, Serialize};

/// One priced line from the materials breakdown.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MaterialItem {
    pub name: String,
    /// Numeric prefix of the quantity text, 1 when none could be read
    pub quantity: f64,
    /// Unit label inferred from the quantity text ("m", "roll", "box", "pack", "length", "each")
    pub unit: String,
    /// Quoted price for the line
    pub unit_price: f64,
    /// Line total, counted towards the materials total
    pub total: f64,
    pub supplier: Option<String>,
}

/// Whether a labour rate is charged per hour or per day.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RateBasis {
    #[default]
    Hour,
    Day,
}

/// Labour section of a quotation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LabourEstimate {
    pub hours: f64,
    pub rate: f64,
    pub rate_basis: RateBasis,
    pub total: f64,
    pub description: String,
}

/// Extra cost line outside materials and labour.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AdditionalCost {
    pub description: String,
    pub amount: f64,
}

/// Structured breakdown of a free-form cost report.
///
/// `subtotal` is always `materials_total + labour.total`, never the
/// report's own subtotal line. `total` is `subtotal + vat_amount` unless the
/// report states a final total, in which case the stated figure is kept.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ParsedCostAnalysis {
    pub materials: Vec<MaterialItem>,
    pub labour: LabourEstimate,
    /// Reserved; the parser does not populate it yet
    pub additional_costs: Vec<AdditionalCost>,
    /// VAT rate as a percentage (20.0 = 20%)
    pub vat_rate: f64,
    pub vat_amount: f64,
    /// Materials plus labour, ex VAT
    pub subtotal: f64,
    pub total: f64,
    /// The text the analysis was parsed from, kept for manual inspection
    pub raw_text: String,
    /// True when `total` came from an explicit final-total line
    #[serde(default)]
    pub total_from_text: bool,
    /// Materials figure used in the subtotal (stated total or the item sum)
    #[serde(default)]
    pub materials_total: f64,
}

impl ParsedCostAnalysis {
    /// An all-zero analysis carrying only the raw text.
    pub fn empty(raw_text: &str, vat_rate: f64) -> Self {
        Self {
            materials: Vec::new(),
            labour: LabourEstimate::default(),
            additional_costs: Vec::new(),
            vat_rate,
            vat_amount: 0.0,
            subtotal: 0.0,
            total: 0.0,
            raw_text: raw_text.to_string(),
            total_from_text: false,
            materials_total: 0.0,
        }
    }

    /// Sum of the parsed material line totals.
    pub fn item_total(&self) -> f64 {
        self.materials.iter().map(|m| m.total).sum()
    }
}

/// A warning produced by sanity-checking a parsed analysis.
/// Warnings flag figures worth a second look; they never change the analysis.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValidationWarning {
    /// The field name that triggered the warning
    pub field: String,
    /// Human-readable warning message
    pub message: String,
    /// The offending value (as a string for display)
    pub value: String,
}
