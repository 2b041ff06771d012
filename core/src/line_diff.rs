//! Line-level comparison of two text blocks in the classic ndiff layout.
//!
//! Alignment comes from `similar`'s line diff. Replaced blocks are refined the
//! way ndiff does it: the most similar line pair is shown with `? ` marker
//! lines pointing at the changed characters, and the remainder on either side
//! of that pair is refined recursively.

use similar::{DiffTag, TextDiff};

/// Lines less similar than this are shown as plain delete/insert pairs.
const SIMILARITY_CUTOFF: f32 = 0.75;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SegmentKind {
    Unchanged,
    Inserted,
    Deleted,
    /// Intra-line marker line following a changed line.
    Annotation,
}

impl SegmentKind {
    pub fn prefix(self) -> &'static str {
        match self {
            SegmentKind::Unchanged => "  ",
            SegmentKind::Inserted => "+ ",
            SegmentKind::Deleted => "- ",
            SegmentKind::Annotation => "? ",
        }
    }
}

/// One classified output line, stored with its two-character prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffSegment {
    pub kind: SegmentKind,
    pub text: String,
}

impl DiffSegment {
    fn new(kind: SegmentKind, line: &str) -> DiffSegment {
        let mut text = String::with_capacity(line.len() + 2);
        text.push_str(kind.prefix());
        text.push_str(line);
        DiffSegment { kind, text }
    }

    /// The line content without the classification prefix.
    pub fn line(&self) -> &str {
        &self.text[self.kind.prefix().len()..]
    }
}

/// Compares `old` against `new` line by line.
///
/// Lines keep their trailing newline characters. Every line of both inputs
/// appears exactly once in the output, in alignment order.
pub fn diff(old: &str, new: &str) -> Vec<DiffSegment> {
    let text_diff = TextDiff::from_lines(old, new);
    let old_lines = text_diff.old_slices();
    let new_lines = text_diff.new_slices();
    let mut out = Vec::new();

    // Everything between two equal runs is one changed block. Only the equal
    // ops bound a block.
    let (mut old_from, mut new_from) = (0usize, 0usize);

    for op in text_diff.ops() {
        let (tag, old_range, new_range) = op.as_tag_tuple();
        if tag != DiffTag::Equal {
            continue;
        }
        flush_changed(
            between(old_lines, old_from, old_range.start),
            between(new_lines, new_from, new_range.start),
            &mut out,
        );
        dump(
            SegmentKind::Unchanged,
            between(old_lines, old_range.start, old_range.end),
            &mut out,
        );
        old_from = old_range.end;
        new_from = new_range.end;
    }
    flush_changed(
        between(old_lines, old_from, old_lines.len()),
        between(new_lines, new_from, new_lines.len()),
        &mut out,
    );

    out
}

fn between<'a, 'b>(lines: &'a [&'b str], from: usize, to: usize) -> &'a [&'b str] {
    lines.get(from.min(to)..to).unwrap_or(&[])
}

fn dump(kind: SegmentKind, lines: &[&str], out: &mut Vec<DiffSegment>) {
    out.extend(lines.iter().map(|line| DiffSegment::new(kind, line)));
}

fn flush_changed(old: &[&str], new: &[&str], out: &mut Vec<DiffSegment>) {
    match (old.is_empty(), new.is_empty()) {
        (false, false) => fancy_replace(old, new, out),
        (false, true) => dump(SegmentKind::Deleted, old, out),
        (true, false) => dump(SegmentKind::Inserted, new, out),
        (true, true) => {}
    }
}

fn fancy_replace(old: &[&str], new: &[&str], out: &mut Vec<DiffSegment>) {
    let mut best: Option<(usize, usize)> = None;
    let mut best_ratio = SIMILARITY_CUTOFF - 0.01;
    let mut identical: Option<(usize, usize)> = None;

    for (j, new_line) in new.iter().enumerate() {
        for (i, old_line) in old.iter().enumerate() {
            if old_line == new_line {
                if identical.is_none() {
                    identical = Some((i, j));
                }
                continue;
            }
            let ratio = TextDiff::from_chars(*old_line, *new_line).ratio();
            if ratio > best_ratio {
                best_ratio = ratio;
                best = Some((i, j));
            }
        }
    }

    let (sync, is_identical) = match (best, identical) {
        (Some(pair), _) if best_ratio >= SIMILARITY_CUTOFF => (pair, false),
        (_, Some(pair)) => (pair, true),
        _ => {
            plain_replace(old, new, out);
            return;
        }
    };

    let (i, j) = sync;
    flush_changed(&old[..i], &new[..j], out);
    if is_identical {
        out.push(DiffSegment::new(SegmentKind::Unchanged, old[i]));
    } else {
        annotated_pair(old[i], new[j], out);
    }
    flush_changed(&old[i + 1..], &new[j + 1..], out);
}

fn plain_replace(old: &[&str], new: &[&str], out: &mut Vec<DiffSegment>) {
    if new.len() < old.len() {
        dump(SegmentKind::Inserted, new, out);
        dump(SegmentKind::Deleted, old, out);
    } else {
        dump(SegmentKind::Deleted, old, out);
        dump(SegmentKind::Inserted, new, out);
    }
}

fn annotated_pair(old_line: &str, new_line: &str, out: &mut Vec<DiffSegment>) {
    let mut old_tags = String::new();
    let mut new_tags = String::new();
    let mut changed_old = 0usize;
    let mut changed_new = 0usize;

    for op in TextDiff::from_chars(old_line, new_line).ops() {
        let (tag, old_range, new_range) = op.as_tag_tuple();
        if tag == DiffTag::Equal {
            push_change_tags(&mut old_tags, &mut new_tags, changed_old, changed_new);
            changed_old = 0;
            changed_new = 0;
            old_tags.extend(std::iter::repeat_n(' ', old_range.len()));
            new_tags.extend(std::iter::repeat_n(' ', new_range.len()));
        } else {
            changed_old += old_range.len();
            changed_new += new_range.len();
        }
    }
    push_change_tags(&mut old_tags, &mut new_tags, changed_old, changed_new);

    out.push(DiffSegment::new(SegmentKind::Deleted, old_line));
    push_markers(old_line, &old_tags, out);
    out.push(DiffSegment::new(SegmentKind::Inserted, new_line));
    push_markers(new_line, &new_tags, out);
}

/// Tags one run of changed characters: `^` when both sides changed, `-` for
/// deletions only, `+` for insertions only.
fn push_change_tags(old_tags: &mut String, new_tags: &mut String, old_len: usize, new_len: usize) {
    let (old_mark, new_mark) = if old_len > 0 && new_len > 0 {
        ('^', '^')
    } else {
        ('-', '+')
    };
    old_tags.extend(std::iter::repeat_n(old_mark, old_len));
    new_tags.extend(std::iter::repeat_n(new_mark, new_len));
}

/// Emits a `? ` line for `tags`, keeping the line's own whitespace under
/// untouched positions so tabs stay aligned.
fn push_markers(line: &str, tags: &str, out: &mut Vec<DiffSegment>) {
    let aligned: String = line
        .chars()
        .zip(tags.chars())
        .map(|(c, tag)| if tag == ' ' && c.is_whitespace() { c } else { tag })
        .collect();
    let trimmed = aligned.trim_end();
    if !trimmed.is_empty() {
        out.push(DiffSegment::new(
            SegmentKind::Annotation,
            &format!("{trimmed}\n"),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(segments: &[DiffSegment]) -> Vec<&str> {
        segments.iter().map(|s| s.text.as_str()).collect()
    }

    #[test]
    fn identical_inputs_are_all_unchanged() {
        let text = "fn main() {\n    println!(\"hi\");\n}\n";
        let segments = diff(text, text);
        assert_eq!(segments.len(), 3);
        assert!(segments.iter().all(|s| s.kind == SegmentKind::Unchanged));
        assert_eq!(segments[0].text, "  fn main() {\n");
    }

    /// Small deterministic xorshift so generated cases are reproducible.
    struct Lines(u64);

    impl Lines {
        const VOCAB: [&'static str; 9] = [
            "x = 1\n",
            "x = 2\n",
            "x  = 2\n",
            "foo\n",
            "baz\n",
            "let y = 10;\n",
            "\tindented\n",
            "\n",
            "return value\n",
        ];

        fn next(&mut self, bound: usize) -> usize {
            self.0 ^= self.0 << 13;
            self.0 ^= self.0 >> 7;
            self.0 ^= self.0 << 17;
            (self.0 % bound as u64) as usize
        }

        fn line(&mut self) -> String {
            Self::VOCAB[self.next(Self::VOCAB.len())].to_string()
        }

        fn block(&mut self) -> Vec<String> {
            let len = self.next(7);
            (0..len).map(|_| self.line()).collect()
        }

        /// Applies a few inserts, deletes and in-line edits to `lines`.
        fn edit(&mut self, lines: &[String]) -> Vec<String> {
            let mut out = lines.to_vec();
            for _ in 0..=self.next(3) {
                let at = self.next(out.len() + 1);
                match self.next(3) {
                    0 => out.insert(at, self.line()),
                    1 if at < out.len() => {
                        out.remove(at);
                    }
                    _ if at < out.len() => {
                        let col = self.next(out[at].len());
                        out[at].insert(col, 'q');
                    }
                    _ => {}
                }
            }
            out
        }
    }

    fn join(lines: &[String], trailing_newline: bool) -> String {
        let mut text = lines.concat();
        if !trailing_newline && text.ends_with('\n') {
            text.pop();
        }
        text
    }

    fn side(segments: &[DiffSegment], kept: SegmentKind) -> String {
        segments
            .iter()
            .filter(|s| s.kind == SegmentKind::Unchanged || s.kind == kept)
            .map(DiffSegment::line)
            .collect()
    }

    #[test]
    fn generated_edits_keep_both_sides_intact() {
        let mut lines = Lines(0x9E37_79B9_7F4A_7C15);
        for case in 0..600 {
            let base = lines.block();
            let edited = lines.edit(&base);
            let old = join(&base, lines.next(4) != 0);
            let new = join(&edited, lines.next(4) != 0);

            let same = diff(&old, &old);
            assert!(
                same.iter().all(|s| s.kind == SegmentKind::Unchanged),
                "case {case}: {old:?}"
            );
            assert_eq!(side(&same, SegmentKind::Unchanged), old, "case {case}");

            let segments = diff(&old, &new);
            assert_eq!(side(&segments, SegmentKind::Deleted), old, "case {case}: {new:?}");
            assert_eq!(side(&segments, SegmentKind::Inserted), new, "case {case}: {old:?}");
        }
    }

    #[test]
    fn changed_block_after_leading_delete_is_bounded_by_equal_runs() {
        let old = "x = 2\nx = 1\nfoo\nbaz\n";
        let new = "x = 1\nx  = 2\nx = 1\nfoo\nbaz\n";
        let segments = diff(old, new);
        assert_eq!(side(&segments, SegmentKind::Deleted), old);
        assert_eq!(side(&segments, SegmentKind::Inserted), new);
        assert_eq!(
            segments.last().map(|s| s.text.as_str()),
            Some("  baz\n")
        );
    }

    #[test]
    fn empty_inputs_produce_nothing() {
        assert!(diff("", "").is_empty());
    }

    #[test]
    fn pure_insertion_and_deletion() {
        let segments = diff("a\nb\n", "a\nb\nc\n");
        assert_eq!(texts(&segments), vec!["  a\n", "  b\n", "+ c\n"]);

        let segments = diff("a\nb\nc\n", "a\nc\n");
        assert_eq!(texts(&segments), vec!["  a\n", "- b\n", "  c\n"]);
    }

    #[test]
    fn dissimilar_replacement_is_plain() {
        let segments = diff("return 1\n", "xyz\n");
        assert_eq!(texts(&segments), vec!["- return 1\n", "+ xyz\n"]);
    }

    #[test]
    fn plain_replacement_puts_shorter_new_side_first() {
        let segments = diff("aaaa\nbbbb\n", "zzzz\n");
        assert_eq!(texts(&segments), vec!["+ zzzz\n", "- aaaa\n", "- bbbb\n"]);
    }

    #[test]
    fn similar_lines_get_marker_annotations() {
        let segments = diff("value = compute(a)\n", "value = compute(b)\n");
        assert_eq!(
            texts(&segments),
            vec![
                "- value = compute(a)\n",
                "?                 ^\n",
                "+ value = compute(b)\n",
                "?                 ^\n",
            ]
        );
        assert_eq!(segments[1].kind, SegmentKind::Annotation);
    }

    #[test]
    fn insertion_inside_line_marks_plus() {
        let segments = diff("let x = 1;\n", "let x = 10;\n");
        assert_eq!(
            texts(&segments),
            vec!["- let x = 1;\n", "+ let x = 10;\n", "?          +\n"]
        );
    }

    #[test]
    fn last_line_without_newline_is_kept_verbatim() {
        let segments = diff("alpha", "alpha\nbeta");
        assert_eq!(segments[0].line(), "alpha");
        let inserted: Vec<&str> = segments
            .iter()
            .filter(|s| s.kind == SegmentKind::Inserted)
            .map(DiffSegment::line)
            .collect();
        assert!(inserted.contains(&"beta"));
    }
}
