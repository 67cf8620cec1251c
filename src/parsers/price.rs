use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::PriceFormatError;

/// Currency words, unit labels and any Unicode whitespace (incl. NBSP).
static LABEL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\p{Alphabetic}\s]+").expect("Invalid label regex")
});

static ZERO_FRACTION_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\.0+$").expect("Invalid zero fraction regex")
});

/// Convert a displayed price such as `"MAD 1,299.00"` into a number.
///
/// Strips letters and whitespace, drops thousands separators and a trailing
/// all-zero fraction, then parses what remains.
pub fn normalize_price(text: &str) -> Result<f64, PriceFormatError> {
    let format_error = || PriceFormatError {
        input: text.to_string(),
    };

    let stripped = LABEL_REGEX.replace_all(text, "").replace(',', "");
    let cleaned = ZERO_FRACTION_REGEX.replace(&stripped, "");

    if !cleaned.chars().any(|c| c.is_ascii_digit()) {
        return Err(format_error());
    }

    let value = cleaned.parse::<f64>().map_err(|_| format_error())?;
    if !value.is_finite() {
        return Err(format_error());
    }

    Ok(value)
}
