use regex::Regex;

/// Interprets heterogeneous, locale-ambiguous cell text as a number.
///
/// Thousands and decimal separators vary by locale and are often
/// indistinguishable without context ("1.234" vs "1.2"). The rules here are
/// a fixed, context-free heuristic applied uniformly; no locale negotiation
/// is performed. `None` is the not-a-number sentinel and never equals any
/// parsed value, including zero.
pub struct NumberInterpreter {
    // The class also covers whitespace, non-breaking spaces included
    strip: Regex,
}

impl NumberInterpreter {
    pub fn new() -> Self {
        Self {
            strip: Regex::new(r"[^0-9.,\-]").unwrap(),
        }
    }

    /// Interpret raw cell text, resolving separator ambiguity.
    ///
    /// Rules, in order:
    /// 1. Empty or whitespace-only text yields the sentinel.
    /// 2. Every character that is not a digit, period, comma, or minus
    ///    sign is stripped, whitespace of any kind included.
    /// 3. When both separators appear, the one occurring last in the string
    ///    is the decimal point: all occurrences of the other are removed and
    ///    the final occurrence of the chosen one becomes a period.
    ///    When only commas appear, the first comma is the decimal point.
    ///    Otherwise a period is a thousands separator only when preceded by
    ///    a digit and followed by exactly three digits; such periods are
    ///    removed, all others kept as decimal points.
    /// 4. Anything the float parser still rejects, and any non-finite
    ///    result, yields the sentinel.
    pub fn interpret(&self, text: &str) -> Option<f64> {
        if text.trim().is_empty() {
            return None;
        }

        let s = self.strip.replace_all(text, "").into_owned();
        if s.is_empty() {
            return None;
        }

        let cleaned = match (s.rfind(','), s.rfind('.')) {
            (Some(comma), Some(dot)) => {
                if comma > dot {
                    // Comma is the decimal point: "1.234,56" -> "1234.56"
                    replace_last_with_dot(&s.replace('.', ""), ',')
                } else {
                    // Period is the decimal point: "1,234.56" -> "1234.56"
                    s.replace(',', "")
                }
            }
            (Some(_), None) => s.replacen(',', ".", 1),
            _ => strip_thousands_periods(&s),
        };

        match cleaned.parse::<f64>() {
            Ok(n) if n.is_finite() => Some(n),
            _ => None,
        }
    }
}

impl Default for NumberInterpreter {
    fn default() -> Self {
        Self::new()
    }
}

fn replace_last_with_dot(s: &str, sep: char) -> String {
    match s.rfind(sep) {
        Some(idx) => {
            let mut out = String::with_capacity(s.len());
            out.push_str(&s[..idx]);
            out.push('.');
            out.push_str(&s[idx + sep.len_utf8()..]);
            out
        }
        None => s.to_string(),
    }
}

/// Remove periods acting as thousands separators.
///
/// "1.234" is read as a grouped 1234, "1.23" as a decimal. This is a
/// pragmatic guess with known false positives ("1.234" meant as a precise
/// decimal); correct intent cannot be recovered from text alone, so the
/// rule is kept as-is.
fn strip_thousands_periods(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = String::with_capacity(s.len());
    for (i, &b) in bytes.iter().enumerate() {
        if b == b'.' && is_thousands_period(bytes, i) {
            continue;
        }
        out.push(b as char);
    }
    out
}

fn is_thousands_period(bytes: &[u8], i: usize) -> bool {
    if i == 0 || !bytes[i - 1].is_ascii_digit() {
        return false;
    }
    let run = bytes[i + 1..]
        .iter()
        .take_while(|b| b.is_ascii_digit())
        .count();
    run == 3
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interpret(text: &str) -> Option<f64> {
        NumberInterpreter::new().interpret(text)
    }

    #[test]
    fn test_plain_numbers() {
        assert_eq!(interpret("1234"), Some(1234.0));
        assert_eq!(interpret("1234.5"), Some(1234.5));
        assert_eq!(interpret("-42"), Some(-42.0));
        assert_eq!(interpret("0"), Some(0.0));
    }

    #[test]
    fn test_comma_as_decimal() {
        assert_eq!(interpret("1234,5"), Some(1234.5));
        assert_eq!(interpret("1,5"), Some(1.5));
    }

    #[test]
    fn test_dual_separator_last_wins() {
        assert_eq!(interpret("1.234,56"), Some(1234.56));
        assert_eq!(interpret("1,234.56"), Some(1234.56));
        assert_eq!(interpret("1.234.567,89"), Some(1234567.89));
        assert_eq!(interpret("1,234,567.89"), Some(1234567.89));
    }

    #[test]
    fn test_thousands_period_heuristic() {
        // Exactly three trailing digits reads as grouping
        assert_eq!(interpret("1.234"), Some(1234.0));
        assert_eq!(interpret("1.234.567"), Some(1234567.0));
        // Anything else reads as a decimal point
        assert_eq!(interpret("1.23"), Some(1.23));
        assert_eq!(interpret("1.2"), Some(1.2));
        assert_eq!(interpret("1.2345"), Some(1.2345));
    }

    #[test]
    fn test_currency_and_spacing_noise() {
        assert_eq!(interpret("$1,234.56"), Some(1234.56));
        assert_eq!(interpret("1\u{00A0}234,56"), Some(1234.56));
        assert_eq!(interpret(" 42 kg"), Some(42.0));
    }

    #[test]
    fn test_sentinel_cases() {
        assert_eq!(interpret(""), None);
        assert_eq!(interpret("   "), None);
        assert_eq!(interpret("abc"), None);
        assert_eq!(interpret("-"), None);
        assert_eq!(interpret("n/a"), None);
    }

    #[test]
    fn test_sentinel_distinct_from_zero() {
        assert_ne!(interpret("x"), Some(0.0));
        assert_eq!(interpret("0.00"), Some(0.0));
    }

    #[test]
    fn test_negative_with_separators() {
        assert_eq!(interpret("-1.234,56"), Some(-1234.56));
        assert_eq!(interpret("-1,234.56"), Some(-1234.56));
    }
}
