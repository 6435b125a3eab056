use super::parser::round_pennies;
use super::types::{ParsedCostAnalysis, ValidationWarning};

/// UK VAT rates: zero, reduced and standard.
const UK_VAT_RATES: [f64; 3] = [0.0, 5.0, 20.0];

/// Largest gap (in pounds) between stated and recomputed figures treated as rounding.
const PENNY_TOLERANCE: f64 = 0.01;

/// Sanity-check a parsed analysis.
/// Returns warnings for figures that look inconsistent or implausible.
/// Warnings indicate a report worth reading by hand; the analysis itself is untouched.
pub fn validate_analysis(analysis: &ParsedCostAnalysis) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    // Nothing recognised at all
    if analysis.materials.is_empty()
        && analysis.materials_total == 0.0
        && analysis.labour.total == 0.0
        && analysis.total == 0.0
    {
        warnings.push(ValidationWarning {
            field: "raw_text".to_string(),
            message: "No cost figures could be read from the report".to_string(),
            value: format!("{} chars", analysis.raw_text.chars().count()),
        });
        return warnings;
    }

    // VAT rate outside the UK bands
    if !UK_VAT_RATES.iter().any(|r| (r - analysis.vat_rate).abs() < f64::EPSILON) {
        warnings.push(ValidationWarning {
            field: "vat_rate".to_string(),
            message: format!(
                "VAT rate {}% is not a UK rate (0%, 5% or 20%)",
                analysis.vat_rate
            ),
            value: analysis.vat_rate.to_string(),
        });
    }

    // Stated VAT amount disagrees with subtotal x rate
    let expected_vat = round_pennies(analysis.subtotal * analysis.vat_rate / 100.0);
    if (analysis.vat_amount - expected_vat).abs() > PENNY_TOLERANCE {
        warnings.push(ValidationWarning {
            field: "vat_amount".to_string(),
            message: format!(
                "VAT £{:.2} does not match {}% of subtotal £{:.2} (expected £{:.2})",
                analysis.vat_amount, analysis.vat_rate, analysis.subtotal, expected_vat
            ),
            value: format!("{:.2}", analysis.vat_amount),
        });
    }

    // Stated final total includes something other than subtotal + VAT
    if analysis.total_from_text {
        let expected_total = round_pennies(analysis.subtotal + analysis.vat_amount);
        let difference = analysis.total - expected_total;
        if difference.abs() > PENNY_TOLERANCE {
            warnings.push(ValidationWarning {
                field: "total".to_string(),
                message: format!(
                    "Stated total £{:.2} differs from subtotal + VAT (£{:.2}) by £{:.2}",
                    analysis.total, expected_total, difference
                ),
                value: format!("{:.2}", analysis.total),
            });
        }
    }

    // Zero-priced material lines
    for item in analysis.materials.iter().filter(|m| m.total <= 0.0) {
        warnings.push(ValidationWarning {
            field: "materials".to_string(),
            message: format!("Material '{}' has no price", item.name),
            value: format!("{:.2}", item.total),
        });
    }

    // Labour time quoted but not charged
    if analysis.labour.hours > 0.0 && analysis.labour.total <= 0.0 {
        warnings.push(ValidationWarning {
            field: "labour.total".to_string(),
            message: format!(
                "Labour of {} hours is quoted with no labour cost",
                analysis.labour.hours
            ),
            value: format!("{:.2}", analysis.labour.total),
        });
    }

    warnings
}
