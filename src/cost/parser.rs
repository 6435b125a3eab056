//! Parser for free-form quotation reports.
//!
//! The reports loosely follow a template:
//! - `MATERIALS BREAKDOWN` heading followed by bullet lines
//!   `• <item> (<qty>) - £<price> [from <supplier>]` or `- <item> x <qty> - £<price>`
//! - `Subtotal Materials:` / `Materials Total` line
//! - `LABOUR ESTIMATE` heading with hours, a rate and usually a labour cost
//! - `VAT (<rate>%): £<amount>`
//! - optional `Subtotal:` and `FINAL QUOTE` / `TOTAL COST` lines
//!
//! Any part may be missing or out of order. The parser never fails: absent
//! figures come back as zero. The subtotal is always rebuilt from materials
//! and labour; a stated subtotal is only compared against it.

use std::sync::OnceLock;

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::types::{LabourEstimate, MaterialItem, ParsedCostAnalysis, RateBasis};

/// Hours in a working day, used to convert day counts and day rates.
const HOURS_PER_DAY: f64 = 8.0;

/// Tunable parser behaviour.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ParserOptions {
    /// VAT rate (percent) assumed when the report states none
    pub default_vat_rate: f64,
    /// Largest stated/calculated subtotal gap tolerated without a warning
    pub discrepancy_tolerance: f64,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            default_vat_rate: 20.0,
            discrepancy_tolerance: 0.01,
        }
    }
}

/// Compiled patterns shared by every parser instance.
struct Patterns {
    materials_heading: Regex,
    materials_end: Regex,
    item_line: Regex,
    leading_number: Regex,
    bare_metres: Regex,
    materials_total: Regex,
    labour_heading: Regex,
    labour_end: Regex,
    hours: Regex,
    days: Regex,
    rate_per: Regex,
    rate_named: Regex,
    labour_cost: Regex,
    labour_bare_total: Regex,
    labour_description: Regex,
    labour_total_top: Regex,
    vat_full: Regex,
    vat_rate_only: Regex,
    vat_amount_only: Regex,
    stated_subtotal: Regex,
    final_total: Regex,
}

const NUM: &str = r"([\d,]*\d(?:\.\d+)?)";

fn re(pattern: &str) -> Regex {
    Regex::new(&pattern.replace("{NUM}", NUM)).expect("valid regex")
}

impl Patterns {
    fn get() -> &'static Patterns {
        static PATTERNS: OnceLock<Patterns> = OnceLock::new();
        PATTERNS.get_or_init(|| Patterns {
            materials_heading: re(r"(?i)materials\s+breakdown"),
            materials_end: re(r"(?i)subtotal\s+materials|labou?r\s+estimate"),
            item_line: re(concat!(
                r"(?m)^[ \t]*(?:[-•*▪◦]|\d+[.)])[ \t]+",
                r"(?P<name>[^\n]+?)",
                r"(?:[ \t]*\((?P<paren>[^)\n]*)\)|[ \t]+[x×][ \t]*(?P<times>[^\s£]+))",
                r"[ \t]*[-–—:][ \t]*£[ \t]*(?P<price>[\d,]*\d(?:\.\d+)?)",
                r"(?:[ \t]+(?:from|@)[ \t]+(?P<supplier>[^\n]+)|[^\n]*)$",
            )),
            leading_number: re(r"^\s*{NUM}"),
            bare_metres: re(r"(?i)^\s*[\d.,]+\s*m\b"),
            materials_total: re(
                r"(?i)(?:subtotal\s+materials|materials\s+(?:sub)?total)[*_\s]*(?:\([^)\n]*\))?[*_\s]*[:=-]?[*_\s]*£\s*{NUM}",
            ),
            labour_heading: re(r"(?i)labou?r\s+estimate"),
            labour_end: re(concat!(
                r"(?im)^[ \t#*]*(?:subtotal\b|labou?r\s+total|vat\b|final\s+(?:quote|total)",
                r"|grand\s+total|total\s+cost|additional\s+costs?|cost\s+summary|materials\s+breakdown)",
            )),
            hours: re(r"(?i){NUM}\s*(?:hours?|hrs?)\b"),
            days: re(r"(?i){NUM}\s*(?:working\s+)?days?\b"),
            rate_per: re(r"(?i)£\s*{NUM}\s*(?:/|per|an?)\s*(hour|hr|h|day)\b"),
            rate_named: re(r"(?i)(day|daily|hourly|hour)\s+rate[*_\s]*[:=-]?[*_\s]*£\s*{NUM}"),
            labour_cost: re(
                r"(?i)(?:total\s+labou?r(?:\s+cost)?|labou?r\s+(?:cost|total|charge))[*_\s]*(?:\([^)\n]*\))?[*_\s]*[:=-]?[*_\s]*£\s*{NUM}",
            ),
            labour_bare_total: re(r"(?im)^[ \t\-•*]*(?:total|cost)[*_\s]*:[*_\s]*£\s*{NUM}"),
            labour_description: re(r"(?im)^[ \t\-•*]*(?:description|scope|work)[*_\s]*:[*_\s]*(.+)$"),
            labour_total_top: re(
                r"(?i)(?:subtotal\s+labou?r|labou?r\s+(?:sub)?total)[*_\s]*(?:\([^)\n]*\))?[*_\s]*[:=-]?[*_\s]*£\s*{NUM}",
            ),
            vat_full: re(r"(?i)VAT\s*\(\s*{NUM}\s*%\s*\)[*_\s]*[:=-]?[*_\s]*£\s*{NUM}"),
            vat_rate_only: re(r"(?i)VAT\s*(?:@|at)?\s*\(?\s*{NUM}\s*%"),
            vat_amount_only: re(r"(?im)^[ \t\-•*#]*VAT\b[*_\s]*[:=-][*_\s]*£\s*{NUM}"),
            stated_subtotal: re(concat!(
                r"(?im)^[ \t\-•*#]*(?:subtotal|net\s+total)[*_\s]*",
                r"(?:\((?:ex\.?|excl?\.?|excluding)\s*vat\)|ex\.?\s*vat)?",
                r"[*_\s]*[:=-]?[*_\s]*£\s*{NUM}",
            )),
            final_total: re(concat!(
                r"(?im)^[ \t\-•*#]*(?:final\s+quote|total\s+cost|grand\s+total|final\s+total)[*_\s]*",
                r"(?:\((?:inc|incl|including)\b[^)\n]*\))?",
                r"[*_\s:=-]*£\s*{NUM}",
            )),
        })
    }
}

/// Cost report parser.
#[derive(Debug, Clone, Copy, Default)]
pub struct CostParser {
    options: ParserOptions,
}

/// Parse a cost report with default options.
pub fn parse_cost_analysis(text: &str) -> ParsedCostAnalysis {
    CostParser::default().parse(text)
}

impl CostParser {
    pub fn new(options: ParserOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    /// Parse a report into a structured analysis. Never fails.
    pub fn parse(&self, text: &str) -> ParsedCostAnalysis {
        let p = Patterns::get();
        let normalised = text.replace("\r\n", "\n").replace('\r', "\n");
        let body = normalised.as_str();

        let mut analysis = ParsedCostAnalysis::empty(text, self.options.default_vat_rate);

        // Materials
        if let Some(section) = section(body, &p.materials_heading, &p.materials_end) {
            analysis.materials = parse_items(section, p);
        }
        let item_sum = round_pennies(analysis.item_total());
        analysis.materials_total = match capture_number(&p.materials_total, body) {
            Some(stated) => {
                if !analysis.materials.is_empty() && (stated - item_sum).abs() > self.options.discrepancy_tolerance {
                    debug!(stated, item_sum, "stated materials total overrides item sum");
                }
                stated
            }
            None => item_sum,
        };

        // Labour
        let mut labour = LabourEstimate::default();
        let mut labour_cost = None;
        if let Some(section) = section(body, &p.labour_heading, &p.labour_end) {
            labour_cost = parse_labour_section(section, p, &mut labour);
        }
        labour.total = labour_cost
            .or_else(|| capture_number(&p.labour_total_top, body))
            .unwrap_or_else(|| derived_labour_cost(&labour));
        analysis.labour = labour;

        // VAT
        let vat_amount = match p.vat_full.captures(body) {
            Some(caps) => {
                analysis.vat_rate = parse_number(&caps[1]);
                Some(parse_number(&caps[2]))
            }
            None => {
                if let Some(rate) = capture_number(&p.vat_rate_only, body) {
                    analysis.vat_rate = rate;
                }
                capture_number(&p.vat_amount_only, body)
            }
        };

        // Reconciliation: the subtotal is always rebuilt from its parts.
        let calculated = round_pennies(analysis.materials_total + analysis.labour.total);
        if let Some(stated) = capture_number(&p.stated_subtotal, body) {
            self.log_discrepancy(stated, calculated, &analysis);
        }
        analysis.subtotal = calculated;

        analysis.vat_amount =
            vat_amount.unwrap_or_else(|| round_pennies(calculated * analysis.vat_rate / 100.0));

        match capture_number(&p.final_total, body) {
            Some(stated_total) => {
                analysis.total = stated_total;
                analysis.total_from_text = true;
            }
            None => analysis.total = round_pennies(calculated + analysis.vat_amount),
        }

        debug!(
            items = analysis.materials.len(),
            materials_total = analysis.materials_total,
            labour_total = analysis.labour.total,
            subtotal = analysis.subtotal,
            total = analysis.total,
            "parsed cost analysis"
        );

        analysis
    }

    fn log_discrepancy(&self, stated: f64, calculated: f64, analysis: &ParsedCostAnalysis) {
        let Some((difference, percentage)) = self.discrepancy(stated, calculated) else {
            return;
        };
        warn!(
            stated,
            calculated,
            difference = round_pennies(difference),
            percentage = round_pennies(percentage),
            materials_total = analysis.materials_total,
            labour_total = analysis.labour.total,
            "stated subtotal disagrees with materials + labour, using calculated subtotal"
        );
    }

    /// Difference and percentage gap when `stated` is outside the tolerance.
    fn discrepancy(&self, stated: f64, calculated: f64) -> Option<(f64, f64)> {
        let difference = stated - calculated;
        if difference.abs() <= self.options.discrepancy_tolerance {
            return None;
        }
        let percentage = if calculated.abs() > f64::EPSILON {
            difference / calculated * 100.0
        } else {
            100.0
        };
        Some((difference, percentage))
    }
}

/// Slice from the end of `start` up to the first `end` match after it (or EOF).
fn section<'a>(text: &'a str, start: &Regex, end: &Regex) -> Option<&'a str> {
    let from = start.find(text)?.end();
    let rest = &text[from..];
    let to = end.find(rest).map_or(rest.len(), |m| m.start());
    Some(&rest[..to])
}

fn parse_items(section: &str, p: &Patterns) -> Vec<MaterialItem> {
    p.item_line
        .captures_iter(section)
        .map(|caps| item_from_captures(&caps, p))
        .collect()
}

fn item_from_captures(caps: &Captures<'_>, p: &Patterns) -> MaterialItem {
    let name = caps["name"]
        .trim()
        .trim_matches(|c: char| c == '*' || c == '_')
        .trim()
        .to_string();
    let quantity_text = caps
        .name("paren")
        .or_else(|| caps.name("times"))
        .map_or("", |m| m.as_str());
    let quantity = capture_number(&p.leading_number, quantity_text).unwrap_or(1.0);
    let price = parse_number(&caps["price"]);
    let supplier = caps
        .name("supplier")
        .map(|m| m.as_str().trim().trim_end_matches(|c: char| c == '*' || c == '.').trim().to_string())
        .filter(|s| !s.is_empty());

    MaterialItem {
        unit: infer_unit(quantity_text, &name, p).to_string(),
        name,
        quantity,
        unit_price: price,
        total: price,
        supplier,
    }
}

/// Unit label from the quantity text, falling back to the item name.
fn infer_unit(quantity_text: &str, name: &str, p: &Patterns) -> &'static str {
    if p.bare_metres.is_match(quantity_text) {
        return "m";
    }
    keyword_unit(&quantity_text.to_lowercase())
        .or_else(|| keyword_unit(&name.to_lowercase()))
        .unwrap_or("each")
}

fn keyword_unit(lower: &str) -> Option<&'static str> {
    if lower.contains("metre") || lower.contains("meter") {
        Some("m")
    } else if lower.contains("roll") {
        Some("roll")
    } else if lower.contains("box") {
        Some("box")
    } else if lower.contains("pack") {
        Some("pack")
    } else if lower.contains("length") {
        Some("length")
    } else {
        None
    }
}

/// Fill hours, rate and description; return the explicit labour cost if stated.
fn parse_labour_section(section: &str, p: &Patterns, labour: &mut LabourEstimate) -> Option<f64> {
    if let Some(hours) = first_unpriced_number(&p.hours, section) {
        labour.hours = hours;
    } else if let Some(days) = first_unpriced_number(&p.days, section) {
        labour.hours = days * HOURS_PER_DAY;
    }

    if let Some(caps) = p.rate_per.captures(section) {
        labour.rate = parse_number(&caps[1]);
        labour.rate_basis = rate_basis(&caps[2]);
    } else if let Some(caps) = p.rate_named.captures(section) {
        labour.rate = parse_number(&caps[2]);
        labour.rate_basis = rate_basis(&caps[1]);
    }

    labour.description = capture_text(&p.labour_description, section)
        .or_else(|| first_text_line(section))
        .unwrap_or_default();

    capture_number(&p.labour_cost, section).or_else(|| capture_number(&p.labour_bare_total, section))
}

fn rate_basis(unit: &str) -> RateBasis {
    match unit.to_lowercase().as_str() {
        "day" | "daily" => RateBasis::Day,
        _ => RateBasis::Hour,
    }
}

/// Hours × rate when no labour cost was stated anywhere.
fn derived_labour_cost(labour: &LabourEstimate) -> f64 {
    if labour.hours <= 0.0 || labour.rate <= 0.0 {
        return 0.0;
    }
    let cost = match labour.rate_basis {
        RateBasis::Hour => labour.hours * labour.rate,
        RateBasis::Day => labour.hours / HOURS_PER_DAY * labour.rate,
    };
    round_pennies(cost)
}

/// First match whose number is not a price (not directly preceded by `£`).
fn first_unpriced_number(re: &Regex, text: &str) -> Option<f64> {
    re.captures_iter(text).find_map(|caps| {
        let m = caps.get(1)?;
        let before = text[..m.start()].trim_end();
        if before.ends_with('£') {
            None
        } else {
            Some(parse_number(m.as_str()))
        }
    })
}

fn first_text_line(section: &str) -> Option<String> {
    section
        .lines()
        .map(|line| {
            line.trim()
                .trim_start_matches(|c: char| matches!(c, '-' | '•' | '*' | '#' | '▪' | '◦' | ':'))
                .trim_end_matches('*')
                .trim()
        })
        .find(|line| line.chars().any(char::is_alphabetic))
        .map(str::to_string)
}

fn capture_number(re: &Regex, text: &str) -> Option<f64> {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| parse_number(m.as_str()))
}

fn capture_text(re: &Regex, text: &str) -> Option<String> {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().trim_end_matches('*').trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Parse a number, ignoring thousands separators. Unparseable input is 0.
pub(crate) fn parse_number(raw: &str) -> f64 {
    raw.replace(',', "").trim().parse::<f64>().unwrap_or(0.0)
}

pub(crate) fn round_pennies(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
