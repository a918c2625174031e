// src/extractors/amounts.rs

// --- Imports ---
use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{AmountScale, MonetaryAmount};

// --- Regex Patterns (Lazy Static) ---
// Optional parentheses (accounting negative), optional currency symbol,
// numeric literal with optional thousands separators, optional scale word.
static AMOUNT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(?P<open>\()?\s*(?P<currency>\$)?\s*(?P<number>\d{1,3}(?:,\d{3})+(?:\.\d+)?|\d+(?:\.\d+)?)(?:\s*(?P<scale>thousand|million|billion)s?\b)?\s*(?P<close>\))?",
    )
    .expect("Failed to compile AMOUNT_RE")
});

/// Extracts every monetary amount from a text span, in document order.
///
/// A numeric literal counts as an amount only when a currency symbol or a
/// scale word accompanies it; bare numerals (years, note numbers, page
/// references) are not amounts. `value` is the literal times the scale
/// multiplier, negated when the whole match is parenthesized per the
/// financial-statement convention. No match returns an empty list.
pub fn extract_monetary_amounts(span: &str) -> Vec<MonetaryAmount> {
    let mut amounts = Vec::new();

    for caps in AMOUNT_RE.captures_iter(span) {
        let has_currency = caps.name("currency").is_some();
        let scale = caps
            .name("scale")
            .map(|m| AmountScale::from_word(m.as_str()))
            .unwrap_or(AmountScale::None);
        if !has_currency && scale == AmountScale::None {
            continue;
        }

        let literal: f64 = match caps["number"].replace(',', "").parse() {
            Ok(value) => value,
            Err(_) => continue,
        };

        let negative = caps.name("open").is_some() && caps.name("close").is_some();
        let mut value = literal * scale.multiplier();
        if negative {
            value = -value;
        }

        let raw_text = caps
            .get(0)
            .map(|m| m.as_str().trim().to_string())
            .unwrap_or_default();

        amounts.push(MonetaryAmount { raw_text, value, scale });
    }

    amounts
}

// --- Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    fn close(left: f64, right: f64) -> bool {
        (left - right).abs() < 1.0
    }

    #[test]
    fn test_dollar_amount_with_scale_word() {
        let amounts = extract_monetary_amounts("restructuring charges of $125.3 million in 2023");
        assert_eq!(amounts.len(), 1);
        assert!(close(amounts[0].value, 125_300_000.0));
        assert_eq!(amounts[0].scale, AmountScale::Million);
        assert_eq!(amounts[0].raw_text, "$125.3 million");
    }

    #[test]
    fn test_parenthetical_amounts_are_negative() {
        let amounts = extract_monetary_amounts("severance costs of ($23.5 million) were recorded");
        assert_eq!(amounts.len(), 1);
        assert!(close(amounts[0].value, -23_500_000.0));
        assert_eq!(amounts[0].raw_text, "($23.5 million)");
    }

    #[test]
    fn test_scale_word_without_currency_symbol() {
        let amounts = extract_monetary_amounts("impairment charges totaled 450 million");
        assert_eq!(amounts.len(), 1);
        assert!(close(amounts[0].value, 450_000_000.0));
    }

    #[test]
    fn test_currency_symbol_without_scale_word() {
        let amounts = extract_monetary_amounts("a payment of $1,234,567 was made");
        assert_eq!(amounts.len(), 1);
        assert!(close(amounts[0].value, 1_234_567.0));
        assert_eq!(amounts[0].scale, AmountScale::None);
    }

    #[test]
    fn test_bare_numerals_are_not_amounts() {
        assert!(extract_monetary_amounts("during fiscal 2023 and 2022").is_empty());
        assert!(extract_monetary_amounts("See Note 12 on page 87").is_empty());
        assert!(extract_monetary_amounts("").is_empty());
    }

    #[test]
    fn test_multiple_amounts_in_document_order() {
        let text = "charges of $125.3 million offset by a gain of $30 million and 2 billion in assets";
        let amounts = extract_monetary_amounts(text);
        assert_eq!(amounts.len(), 3);
        assert!(close(amounts[0].value, 125_300_000.0));
        assert!(close(amounts[1].value, 30_000_000.0));
        assert!(close(amounts[2].value, 2_000_000_000.0));
    }

    #[test]
    fn test_thousand_scale() {
        let amounts = extract_monetary_amounts("fees of $75 thousand");
        assert_eq!(amounts.len(), 1);
        assert!(close(amounts[0].value, 75_000.0));
        assert_eq!(amounts[0].scale, AmountScale::Thousand);
    }
}
