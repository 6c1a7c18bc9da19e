use chrono::NaiveDate;

use crate::error::FinInsightsError;

pub const MAX_TICKER_LENGTH: usize = 16;
pub const MAX_CATEGORY_LENGTH: usize = 32;
pub const MAX_ARTICLE_LIMIT: usize = 50;

/// Trim a ticker, rejecting only a blank one.
pub fn require_ticker(input: &str) -> Result<&str, FinInsightsError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(FinInsightsError::InvalidInput(
            "Ticker symbol cannot be empty".to_string(),
        ));
    }
    Ok(trimmed)
}

/// Trim a ticker and check it only contains characters that appear in real
/// symbols (`BRK.B`, `^GSPC`, `EURUSD=X`, `RDS-A`). The symbol ends up in URL
/// paths, so anything else is rejected. Case is preserved.
pub fn validate_ticker(input: &str) -> Result<String, FinInsightsError> {
    let trimmed = require_ticker(input)?;
    if trimmed.len() > MAX_TICKER_LENGTH {
        return Err(FinInsightsError::InvalidInput(format!(
            "ticker exceeds maximum length of {} characters",
            MAX_TICKER_LENGTH
        )));
    }
    if let Some(bad) = trimmed
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '^' | '=')))
    {
        return Err(FinInsightsError::InvalidInput(format!(
            "invalid character '{}' in ticker '{}'",
            bad, trimmed
        )));
    }
    Ok(trimmed.to_string())
}

/// Validate an arXiv category such as `cs.AI` or `astro-ph.CO`.
pub fn validate_category(input: &str) -> Result<String, FinInsightsError> {
    let trimmed = input.trim();
    if trimmed.is_empty() || trimmed.len() > MAX_CATEGORY_LENGTH {
        return Err(FinInsightsError::InvalidInput(format!(
            "category must be 1-{} characters",
            MAX_CATEGORY_LENGTH
        )));
    }
    if !trimmed
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-'))
    {
        return Err(FinInsightsError::InvalidInput(format!(
            "invalid category '{}'",
            trimmed
        )));
    }
    Ok(trimmed.to_string())
}

/// Parse a `YYYY-MM-DD` date.
pub fn validate_date(input: &str) -> Result<NaiveDate, FinInsightsError> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").map_err(|_| {
        FinInsightsError::InvalidInput(format!(
            "invalid date '{}', expected YYYY-MM-DD",
            input
        ))
    })
}
