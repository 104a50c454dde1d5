//! JSON parsing helpers for LLM responses
//!
//! Models often wrap the JSON payload in prose or markdown fences, so the
//! parser slices from the first `{` to the last `}` before deserializing.

use crate::error::{Error, Result};

use super::types::ExtractedExpense;

/// Parse an expense extraction from a raw model response
pub fn parse_extraction(response: &str) -> Result<ExtractedExpense> {
    let response = response.trim();

    let start = response.find('{');
    let end = response.rfind('}');

    match (start, end) {
        (Some(s), Some(e)) if s < e => {
            let json_str = &response[s..=e];
            serde_json::from_str(json_str).map_err(|e| {
                Error::Llm(format!(
                    "Invalid JSON from model: {} | Raw: {}",
                    e,
                    truncate(json_str)
                ))
            })
        }
        _ => Err(Error::Llm(format!(
            "No JSON found in model response | Raw: {}",
            truncate(response)
        ))),
    }
}

fn truncate(raw: &str) -> String {
    // Cut on a char boundary; responses are routinely accented pt-BR text
    match raw.char_indices().nth(200) {
        Some((cut, _)) => format!("{}...", &raw[..cut]),
        None => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_parse_clean_json() {
        let response = r#"{"estabelecimento": "Padaria Estrela", "valor": 35.50, "data_competencia": "2024-05-03", "hora": "09:12", "id_subcategoria": "sub-7", "cartao": "Visa", "final_cartao": 4821}"#;
        let extracted = parse_extraction(response).unwrap();
        assert_eq!(extracted.establishment.as_deref(), Some("Padaria Estrela"));
        assert_eq!(extracted.amount, Decimal::new(3550, 2));
        assert_eq!(extracted.subcategory_id, "sub-7");
        assert_eq!(extracted.card_last4, Some(4821));
    }

    #[test]
    fn test_parse_json_with_surrounding_text() {
        let response = "Here is the extraction:\n```json\n{\"valor\": \"12.00\", \"id_subcategoria\": \"sub-1\"}\n```\nDone.";
        let extracted = parse_extraction(response).unwrap();
        assert_eq!(extracted.amount, Decimal::new(1200, 2));
        assert!(extracted.establishment.is_none());
        assert!(extracted.date.is_none());
    }

    #[test]
    fn test_parse_no_json() {
        let err = parse_extraction("sorry, I cannot help with that").unwrap_err();
        assert!(err.to_string().contains("No JSON found"));
    }

    #[test]
    fn test_parse_invalid_json_accented_raw() {
        // 242 bytes but only 122 chars; must not split a multibyte char
        let short = format!("{{{}}}", "é".repeat(120));
        let err = parse_extraction(&short).unwrap_err();
        assert!(err.to_string().contains("Invalid JSON"));

        let long = format!("{{{}}}", "é".repeat(300));
        let err = parse_extraction(&long).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("..."));
        assert!(message.len() < 500);
    }

    #[test]
    fn test_parse_invalid_json_truncates_raw() {
        let long = format!("{{\"valor\": {}", "x".repeat(500));
        let err = parse_extraction(&long).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("Invalid JSON"));
        assert!(message.contains("..."));
        assert!(message.len() < 400);
    }
}
