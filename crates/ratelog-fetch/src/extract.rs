//! Numeric extraction from free text and HTML.

use regex::Regex;
use std::sync::LazyLock;

/// Optional sign, digits with optional `,ddd` groups, optional fraction,
/// optional trailing percent sign.
static NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[-+]?(?:\d{1,3}(?:,\d{3})+(?:\.\d+)?|\d+(?:\.\d+)?|\.\d+)%?")
        .expect("Invalid regex pattern")
});

static BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script\b.*?</script>|<style\b.*?</style>|<!--.*?-->")
        .expect("Invalid regex pattern")
});

static TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("Invalid regex pattern"));

/// Returns the first number in `text`, or `None` if there is none.
///
/// Thousands separators are stripped (`"$1,234.5"` gives `1234.5`); a comma
/// only counts as one when followed by exactly three digits. A trailing `%`
/// is dropped and currency symbols are skipped.
///
/// # Example
///
/// ```
/// use ratelog_fetch::extract::extract_first_float;
///
/// assert_eq!(extract_first_float("APR: 6.75%"), Some(6.75));
/// assert_eq!(extract_first_float("no numbers here"), None);
/// ```
#[must_use]
pub fn extract_first_float(text: &str) -> Option<f64> {
    NUMBER.find_iter(text).find_map(|m| {
        let mut number = m.as_str();
        // "1,2345": the group is not three digits, so only "1" is a number.
        let runs_on = number.ends_with(|c: char| c.is_ascii_digit())
            && text[m.end()..].starts_with(|c: char| c.is_ascii_digit());
        if runs_on {
            if let Some(comma) = number.find(',') {
                number = &number[..comma];
            }
        }
        let cleaned: String = number
            .chars()
            .filter(|c| *c != ',' && *c != '%')
            .collect();
        cleaned.parse::<f64>().ok()
    })
}

/// Reduces an HTML document to its visible text.
///
/// Drops scripts, styles, comments and tags, decodes the entities that show
/// up around rate figures and collapses runs of whitespace.
#[must_use]
pub fn strip_markup(html: &str) -> String {
    let without_blocks = BLOCK.replace_all(html, " ");
    let without_tags = TAG.replace_all(&without_blocks, " ");
    let decoded = decode_entities(&without_tags);
    normalize_whitespace(&decoded)
}

/// Finds `anchor` in `text` and returns the first number within the next
/// `window` characters after it.
#[must_use]
pub fn extract_after(text: &str, anchor: &Regex, window: usize) -> Option<f64> {
    let m = anchor.find(text)?;
    let tail = &text[m.end()..];
    let end = tail
        .char_indices()
        .nth(window)
        .map_or(tail.len(), |(idx, _)| idx);
    extract_first_float(&tail[..end])
}

fn decode_entities(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&#160;", " ")
        .replace("&percnt;", "%")
        .replace("&#37;", "%")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

fn normalize_whitespace(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space {
                out.push(' ');
                prev_space = true;
            }
        } else {
            out.push(ch);
            prev_space = false;
        }
    }
    out.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_percent() {
        assert_eq!(extract_first_float("APR: 6.75%"), Some(6.75));
    }

    #[test]
    fn test_extract_none_is_not_zero() {
        assert_eq!(extract_first_float("no numbers here"), None);
        assert_eq!(extract_first_float(""), None);
    }

    #[test]
    fn test_extract_strips_thousands_separator() {
        assert_eq!(extract_first_float("$1,234.5 rate 7.1%"), Some(1234.5));
        assert_eq!(extract_first_float("1,234,567"), Some(1_234_567.0));
    }

    #[test]
    fn test_extract_comma_without_three_digits_is_not_a_separator() {
        assert_eq!(extract_first_float("6,5"), Some(6.0));
        assert_eq!(extract_first_float("1,2345"), Some(1.0));
        assert_eq!(extract_first_float("-12,345,6789 units"), Some(-12.0));
        assert_eq!(extract_first_float("1,234 and 5"), Some(1234.0));
    }

    #[test]
    fn test_extract_signs_and_bare_fraction() {
        assert_eq!(extract_first_float("change -0.12 today"), Some(-0.12));
        assert_eq!(extract_first_float("down .25 points"), Some(0.25));
    }

    #[test]
    fn test_strip_markup() {
        let html = "<html><head><style>p { x: 1 }</style><script>var r = 9.9;</script></head>\
                    <body><p>Rate&nbsp;<b>6.82</b>&#37;</p>\n\n<!-- 1.0 --></body></html>";
        assert_eq!(strip_markup(html), "Rate 6.82 %");
    }

    #[test]
    fn test_extract_after_anchor() {
        let anchor = Regex::new(r"(?i)rates in oregon are").unwrap();
        let text = "Updated 2025. Current 30-year fixed mortgage rates in Oregon are 5.99% today";
        assert_eq!(extract_after(text, &anchor, 40), Some(5.99));
    }

    #[test]
    fn test_extract_after_respects_window() {
        let anchor = Regex::new(r"(?i)rate").unwrap();
        let text = "Rate is unavailable for now, check back later 6.5%";
        assert_eq!(extract_after(text, &anchor, 10), None);
        assert_eq!(extract_after("nothing to see", &anchor, 10), None);
    }
}
