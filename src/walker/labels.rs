//! Label grammars for statute titles and subchapters.
//!
//! Title labels: `... <ROMAN> - <name>` where `<ROMAN>` is `[IVXLCDM]+`; the
//! pattern may appear anywhere in the label, the first occurrence wins.
//! Subchapter labels: `.<index> <name>` where `<index>` runs from the leading
//! dot to the first whitespace.

use std::sync::LazyLock;

use regex::Regex;

use super::ExtractError;

#[allow(clippy::expect_used)]
static TITLE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?P<ind>[IVXLCDM]+) - ").expect("title regex is valid") // Static pattern, safe to panic
});

#[allow(clippy::expect_used)]
static SUBCHAPTER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[.](?P<ind>\S+)").expect("subchapter regex is valid") // Static pattern, safe to panic
});

/// Converts a Roman numeral to its integer value
///
/// Scans left to right; when a symbol is larger than the previous one the
/// previous value is subtracted instead of added, which yields the usual
/// subtractive pairs (IV, IX, XL, ...). Well-formedness is not checked, so
/// `"IIV"` gives a deterministic but unconventional value. Returns `None` if
/// the input contains a symbol outside `IVXLCDM`.
///
/// # Examples
///
/// ```
/// use law_scraper::walker::roman_to_int;
///
/// assert_eq!(roman_to_int("XLII"), Some(42));
/// assert_eq!(roman_to_int("MCMXCIV"), Some(1994));
/// assert_eq!(roman_to_int("IIV"), Some(5));
/// assert_eq!(roman_to_int("X1"), None);
/// ```
pub fn roman_to_int(numeral: &str) -> Option<u32> {
    let mut result: i64 = 0;
    let mut last: i64 = 0;

    for symbol in numeral.chars() {
        let value = symbol_value(symbol)?;
        if value > last {
            result -= last;
        } else {
            result += last;
        }
        last = value;
    }

    u32::try_from(result + last).ok()
}

fn symbol_value(symbol: char) -> Option<i64> {
    match symbol {
        'I' => Some(1),
        'V' => Some(5),
        'X' => Some(10),
        'L' => Some(50),
        'C' => Some(100),
        'D' => Some(500),
        'M' => Some(1000),
        _ => None,
    }
}

/// Extracts the numeric index of a title from its display name
///
/// # Examples
///
/// ```
/// use law_scraper::walker::title_index;
///
/// assert_eq!(title_index("IV - Revenue and Taxation").unwrap(), 4);
/// assert!(title_index("Revenue and Taxation").is_err());
/// ```
pub fn title_index(title_name: &str) -> Result<u32, ExtractError> {
    TITLE_PATTERN
        .captures(title_name)
        .and_then(|caps| roman_to_int(&caps["ind"]))
        .ok_or_else(|| ExtractError::TitleLabel(title_name.to_string()))
}

/// Extracts the index token of a subchapter label (`".010 Definitions"` → `"010"`)
pub fn subchapter_index(label: &str) -> Result<String, ExtractError> {
    SUBCHAPTER_PATTERN
        .captures(label)
        .map(|caps| caps["ind"].to_string())
        .ok_or_else(|| ExtractError::SubchapterLabel(label.to_string()))
}
