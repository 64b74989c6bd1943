//! Straight double quote → alternating 〝 / 〟.

/// Opening quote mark.
pub const OPEN_QUOTE: char = '〝';

/// Closing quote mark.
pub const CLOSE_QUOTE: char = '〟';

/// Replace each `"` with [`OPEN_QUOTE`] on odd occurrences and
/// [`CLOSE_QUOTE`] on even ones.
///
/// Pairing is positional only.  An odd number of quotes leaves the last one
/// opening; nesting is not tracked.
///
/// ```
/// use clipboard_ocr::normalize::alternate_quotes;
///
/// assert_eq!(alternate_quotes("\"a\"\"b\""), "〝a〟〝b〟");
/// ```
pub fn alternate_quotes(text: &str) -> String {
    let mut next_is_opening = true;
    text.chars()
        .map(|c| {
            if c != '"' {
                return c;
            }
            let mark = if next_is_opening { OPEN_QUOTE } else { CLOSE_QUOTE };
            next_is_opening = !next_is_opening;
            mark
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pairs_alternate() {
        assert_eq!(alternate_quotes("He said\"hi\"and\"bye\""), "He said〝hi〟and〝bye〟");
    }

    #[test]
    fn unbalanced_quote_stays_opening() {
        assert_eq!(alternate_quotes("\"a\"b\""), "〝a〟b〝");
    }

    #[test]
    fn adjacent_quotes() {
        assert_eq!(alternate_quotes("\"\"\"\""), "〝〟〝〟");
    }

    #[test]
    fn state_resets_between_calls() {
        assert_eq!(alternate_quotes("\""), "〝");
        assert_eq!(alternate_quotes("\""), "〝");
    }

    #[test]
    fn no_quotes_is_identity() {
        assert_eq!(alternate_quotes("テスト"), "テスト");
        assert_eq!(alternate_quotes(""), "");
    }

    #[test]
    fn single_quotes_are_not_touched() {
        assert_eq!(alternate_quotes("it's"), "it's");
    }
}
