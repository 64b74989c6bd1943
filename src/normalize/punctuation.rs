//! Western → full-width punctuation substitution.
//!
//! The table is applied entry by entry, each entry replacing every literal
//! occurrence in the whole string before the next entry runs.

use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Table
// ---------------------------------------------------------------------------

/// Raw substitution table, in application order.
///
/// `~` appears twice.  Duplicate keys keep the position of their first
/// occurrence and take the value of their last one, so `~` resolves to
/// `〜` (U+301C) at the fourth slot.  See [`resolved_table`].
const RAW_TABLE: &[(&str, &str)] = &[
    ("?", "？"),
    ("!", "！"),
    (",", "、"),
    ("~", "～"),
    (":", "："),
    (";", "；"),
    ("“", "〝"),
    ("”", "〟"),
    ("[", "【"),
    ("]", "】"),
    ("(", "（"),
    (")", "）"),
    (".", "・"),
    ("…", "・・・"),
    ("-", "ー"),
    ("~", "〜"),
];

/// The substitution table with duplicate keys collapsed.
pub fn resolved_table() -> &'static [(&'static str, &'static str)] {
    static TABLE: OnceLock<Vec<(&'static str, &'static str)>> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut table: Vec<(&'static str, &'static str)> = Vec::with_capacity(RAW_TABLE.len());
        for &(key, value) in RAW_TABLE {
            match table.iter_mut().find(|(k, _)| *k == key) {
                Some(entry) => entry.1 = value,
                None => table.push((key, value)),
            }
        }
        table
    })
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Replace Western punctuation in `text` with its full-width equivalent.
///
/// ```
/// use clipboard_ocr::normalize::map_punctuation;
///
/// assert_eq!(map_punctuation("Hello, world!"), "Hello、 world！");
/// assert_eq!(map_punctuation("wait~"), "wait〜");
/// ```
pub fn map_punctuation(text: &str) -> String {
    resolved_table()
        .iter()
        .fold(text.to_string(), |acc, (from, to)| {
            if acc.contains(from) {
                acc.replace(from, to)
            } else {
                acc
            }
        })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_tilde_resolves_to_last_value() {
        let tilde: Vec<_> = resolved_table().iter().filter(|(k, _)| *k == "~").collect();
        assert_eq!(tilde.len(), 1);
        assert_eq!(tilde[0].1, "〜");
    }

    #[test]
    fn duplicate_tilde_keeps_first_position() {
        let pos = resolved_table().iter().position(|(k, _)| *k == "~");
        assert_eq!(pos, Some(3));
        assert_eq!(resolved_table().len(), RAW_TABLE.len() - 1);
    }

    #[test]
    fn maps_every_table_key() {
        assert_eq!(map_punctuation("?!,~:;"), "？！、〜：；");
        assert_eq!(map_punctuation("“x”"), "〝x〟");
        assert_eq!(map_punctuation("[a](b)"), "【a】（b）");
        assert_eq!(map_punctuation("-"), "ー");
    }

    #[test]
    fn period_runs_before_ellipsis() {
        // "..." is three periods, each mapped individually.
        assert_eq!(map_punctuation("..."), "・・・");
        assert_eq!(map_punctuation("…"), "・・・");
    }

    #[test]
    fn leaves_spaces_and_plain_quotes_alone() {
        assert_eq!(map_punctuation("a \"b\" c"), "a \"b\" c");
    }

    #[test]
    fn japanese_text_is_untouched() {
        assert_eq!(map_punctuation("こんにちは"), "こんにちは");
    }

    #[test]
    fn empty_input() {
        assert_eq!(map_punctuation(""), "");
    }

    #[test]
    fn mapping_is_idempotent() {
        let samples = [
            "Hello, world!",
            "What?! No... (really) [sic]; ok: fine - \u{201C}quoted\u{201D} ~ …",
            "",
            "already、full！width？",
        ];
        for s in samples {
            let once = map_punctuation(s);
            assert_eq!(map_punctuation(&once), once, "not idempotent for {s:?}");
        }
    }

    #[test]
    fn output_contains_no_table_keys() {
        for (_, value) in resolved_table() {
            for (key, _) in resolved_table() {
                assert!(!value.contains(key), "{value:?} contains key {key:?}");
            }
        }
    }
}
