//! Text filters over a [`Buffer`]: comment stripping and line/record
//! conversion.

use tracing::warn;

use super::buffer::{Buffer, BufferResult};

/// Result of [`Buffer::strip_delimited`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StripOutcome {
    /// Number of spans deleted.
    pub removed: usize,
    /// Offset of an opener with no closer after it. Everything from here
    /// on was left untouched.
    pub unterminated_at: Option<usize>,
}

impl StripOutcome {
    /// `true` when every opener found was closed.
    pub fn is_complete(&self) -> bool {
        self.unterminated_at.is_none()
    }
}

impl Buffer {
    /// Delete every `open … close` span, left to right.
    ///
    /// `close` is deleted too when `consume_close` is set, so
    /// `("#", "\n", false)` strips shell comments but keeps the line
    /// breaks and `("/*", "*/", true)` strips C block comments.
    ///
    /// An opener without a closer stops the scan: the rest of the content
    /// is kept as is and its offset is reported in the outcome.
    pub fn strip_delimited(&mut self, open: &str, close: &str, consume_close: bool) -> StripOutcome {
        let mut outcome = StripOutcome::default();
        if open.is_empty() || close.is_empty() {
            return outcome;
        }
        let (open, close) = (open.as_bytes(), close.as_bytes());

        let mut from = 0;
        while let Some(start) = self.find_from(open, from) {
            let Some(close_at) = self.find_from(close, start + open.len()) else {
                warn!(offset = start, "Unterminated span, remainder left unmodified");
                outcome.unterminated_at = Some(start);
                break;
            };
            let stop = if consume_close {
                close_at + close.len()
            } else {
                close_at
            };
            self.delete_range(start, stop);
            outcome.removed += 1;

            // Deleting can join two fragments into a new opener.
            from = start.saturating_sub(open.len() - 1);
        }

        outcome
    }

    /// Count occurrences of `byte` in the content.
    pub fn count_byte(&self, byte: u8) -> usize {
        self.as_bytes().iter().filter(|b| **b == byte).count()
    }

    /// Append `\n` if the content does not already end with one.
    ///
    /// Returns `true` if a newline was added. Empty buffers are left empty.
    pub fn append_eol(&mut self, growth_hint: usize) -> BufferResult<bool> {
        match self.as_bytes().last() {
            None | Some(b'\n') => Ok(false),
            Some(_) => {
                self.insert(self.len(), b"\n", growth_hint)?;
                Ok(true)
            }
        }
    }

    /// Turn every `\n` into a NUL record terminator. Returns the count.
    pub fn lines_to_records(&mut self) -> usize {
        self.swap_bytes(b'\n', 0)
    }

    /// Turn every NUL record terminator into `\n`. Returns the count.
    pub fn records_to_lines(&mut self) -> usize {
        self.swap_bytes(0, b'\n')
    }

    /// NUL-terminated records, in order. A trailing unterminated chunk is
    /// yielded as the last record.
    pub fn records(&self) -> impl Iterator<Item = &[u8]> {
        let content = self.as_bytes();
        let content = content.strip_suffix(&[0]).unwrap_or(content);
        let count = if self.is_empty() { 0 } else { usize::MAX };
        content.split(|b| *b == 0).take(count)
    }

    /// Treat the content as lines: trim each, drop empty ones, keep order.
    ///
    /// A missing final newline is implied, so the last line is never lost.
    pub fn to_string_list(&self) -> Vec<String> {
        self.as_bytes()
            .split(|b| *b == b'\n')
            .map(String::from_utf8_lossy)
            .map(|line| line.trim().to_string())
            .filter(|line| !line.is_empty())
            .collect()
    }

    fn swap_bytes(&mut self, from: u8, to: u8) -> usize {
        let positions: Vec<usize> = self
            .as_bytes()
            .iter()
            .enumerate()
            .filter_map(|(i, b)| (*b == from).then_some(i))
            .collect();
        for at in &positions {
            self.set_byte(*at, to);
        }
        positions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn strips_shell_comments_keeping_newlines() {
        let mut buffer = Buffer::from("a=1 # one\n# whole line\nb=2\n");
        let outcome = buffer.strip_delimited("#", "\n", false);
        assert_eq!(outcome.removed, 2);
        assert!(outcome.is_complete());
        assert_eq!(buffer.to_string_lossy(), "a=1 \n\nb=2\n");
    }

    #[test]
    fn strips_c_block_comments_with_closer() {
        let mut buffer = Buffer::from("int a; /* x */ int b; /* y\n z */\n");
        let outcome = buffer.strip_delimited("/*", "*/", true);
        assert_eq!(outcome.removed, 2);
        assert_eq!(buffer.to_string_lossy(), "int a;  int b; \n");
    }

    #[test]
    fn closer_search_starts_after_opener() {
        let mut buffer = Buffer::from("a /*/ b */ c");
        buffer.strip_delimited("/*", "*/", true);
        assert_eq!(buffer.to_string_lossy(), "a  c");
    }

    #[test]
    fn unterminated_span_leaves_remainder() {
        let mut buffer = Buffer::from("keep <!-- gone --> tail <!-- open forever");
        let outcome = buffer.strip_delimited("<!--", "-->", true);
        assert_eq!(outcome.removed, 1);
        assert_eq!(outcome.unterminated_at, Some(11));
        assert!(!outcome.is_complete());
        assert_eq!(buffer.to_string_lossy(), "keep  tail <!-- open forever");
    }

    #[test]
    fn opener_formed_by_deletion_is_stripped() {
        let mut buffer = Buffer::from("xaab!b!y");
        let outcome = buffer.strip_delimited("ab", "!", true);
        assert_eq!(outcome.removed, 2);
        assert_eq!(buffer.to_string_lossy(), "xy");
    }

    #[test]
    fn empty_delimiters_do_nothing() {
        let mut buffer = Buffer::from("abc");
        assert_eq!(buffer.strip_delimited("", "c", true).removed, 0);
        assert_eq!(buffer.strip_delimited("a", "", true).removed, 0);
        assert_eq!(buffer.as_bytes(), b"abc");
    }

    #[test]
    fn to_string_list_trims_and_skips_blank_lines() {
        let buffer = Buffer::from("  first \n\n\t\nsecond\n   third");
        assert_eq!(buffer.to_string_list(), vec!["first", "second", "third"]);
    }

    #[test]
    fn to_string_list_of_empty_buffer() {
        assert!(Buffer::new().to_string_list().is_empty());
    }

    #[test]
    fn append_eol_only_when_missing() {
        let mut buffer = Buffer::from("line");
        assert!(buffer.append_eol(8).unwrap());
        assert!(!buffer.append_eol(8).unwrap());
        assert_eq!(buffer.as_bytes(), b"line\n");

        let mut empty = Buffer::new();
        assert!(!empty.append_eol(8).unwrap());
        assert!(empty.is_empty());
    }

    #[test]
    fn lines_and_records_convert_both_ways() {
        let mut buffer = Buffer::from("a\nbb\nccc\n");
        assert_eq!(buffer.count_byte(b'\n'), 3);
        assert_eq!(buffer.lines_to_records(), 3);

        let records: Vec<&[u8]> = buffer.records().collect();
        assert_eq!(records, vec![&b"a"[..], b"bb", b"ccc"]);

        assert_eq!(buffer.records_to_lines(), 3);
        assert_eq!(buffer.as_bytes(), b"a\nbb\nccc\n");
    }

    #[test]
    fn records_of_pushed_entries() {
        let mut buffer = Buffer::new();
        assert_eq!(buffer.records().count(), 0);
        buffer.push_record("x=1", 4).unwrap();
        buffer.push_record("y=2", 4).unwrap();
        assert_eq!(buffer.records().count(), 2);
    }

    proptest! {
        #[test]
        fn strip_delimited_is_idempotent(content in "[a-c#/*\n ]{0,80}") {
            let mut once = Buffer::from(content.as_str());
            once.strip_delimited("/*", "*/", true);
            once.strip_delimited("#", "\n", false);

            let mut twice = once.clone();
            twice.strip_delimited("/*", "*/", true);
            twice.strip_delimited("#", "\n", false);

            prop_assert_eq!(once.as_bytes(), twice.as_bytes());
        }

        #[test]
        fn single_strip_is_idempotent(content in "[ab<>\n]{0,80}", consume in any::<bool>()) {
            let mut once = Buffer::from(content.as_str());
            once.strip_delimited("<", ">", consume);
            let mut twice = once.clone();
            twice.strip_delimited("<", ">", consume);
            prop_assert_eq!(once.as_bytes(), twice.as_bytes());
        }

        #[test]
        fn string_list_round_trips(lines in proptest::collection::vec("[a-z0-9]([a-z0-9 =]{0,10}[a-z0-9])?", 0..12)) {
            let buffer = Buffer::from(lines.join("\n").as_str());
            prop_assert_eq!(buffer.to_string_list(), lines);
        }
    }
}
