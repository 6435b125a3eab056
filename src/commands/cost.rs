use serde::Serialize;
use tracing::{info, warn};

use crate::cost::{validate_analysis, CostParser, ParsedCostAnalysis, ValidationWarning};

/// Parsed report plus the advisory checks run over it.
#[derive(Debug, Serialize)]
pub struct ParseCostResponse {
    pub analysis: ParsedCostAnalysis,
    pub warnings: Vec<ValidationWarning>,
}

/// Parse a cost report and run validation over the result.
///
/// Never fails: a blank report comes back zeroed with a warning saying
/// nothing could be read.
pub fn parse_cost(parser: &CostParser, text: &str) -> ParseCostResponse {
    let analysis = parser.parse(text);
    let warnings = validate_analysis(&analysis);
    for w in &warnings {
        warn!("Cost report warning: {} (field: {}, value: {})", w.message, w.field, w.value);
    }

    info!(
        "Parsed cost report: {} materials, subtotal £{:.2}, total £{:.2}, warnings={}",
        analysis.materials.len(),
        analysis.subtotal,
        analysis.total,
        warnings.len()
    );

    ParseCostResponse { analysis, warnings }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cost_blank_input_degrades() {
        let response = parse_cost(&CostParser::default(), "  \n");
        assert!(response.analysis.materials.is_empty());
        assert_eq!(response.analysis.subtotal, 0.0);
        assert_eq!(response.analysis.total, 0.0);
        assert_eq!(response.warnings.len(), 1);
        assert_eq!(response.warnings[0].field, "raw_text");
    }

    #[test]
    fn test_parse_cost_returns_analysis_and_warnings() {
        let text = "Materials Total: £100\nVAT (20%): £20.00\nFINAL QUOTE: £150.00\n";
        let response = parse_cost(&CostParser::default(), text);
        assert_eq!(response.analysis.subtotal, 100.0);
        assert_eq!(response.analysis.total, 150.0);
        assert_eq!(response.warnings.len(), 1);
    }

    #[test]
    fn test_response_serialize() {
        let response = parse_cost(&CostParser::default(), "Materials Total: £10");
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"analysis\""));
        assert!(json.contains("\"warnings\""));
    }
}
