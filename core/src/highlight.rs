//! Markup for diff segments and emphasized marker literals.

use crate::line_diff::{DiffSegment, SegmentKind};

const INSERTED_STYLE: &str = "color:green;";
const DELETED_STYLE: &str = "color:red;";
const MARKER_STYLE: &str = "color:blue; font-weight:bold;";

/// Renders diff segments as inline markup on a single line.
///
/// Inserted lines are green, deleted lines red, everything else unstyled.
/// Every line ends in a newline before styling, and newlines are emitted as
/// `<br>` so the result fits in one table cell.
pub fn render(segments: &[DiffSegment]) -> String {
    let mut html = String::new();

    for segment in segments {
        let style = match segment.kind {
            SegmentKind::Inserted => Some(INSERTED_STYLE),
            SegmentKind::Deleted => Some(DELETED_STYLE),
            SegmentKind::Unchanged | SegmentKind::Annotation => None,
        };

        if let Some(style) = style {
            html.push_str(&format!(r#"<span style="{style}">"#));
        }
        html.push_str(&segment.text);
        if !segment.text.ends_with('\n') {
            html.push('\n');
        }
        if style.is_some() {
            html.push_str("</span>");
        }
    }

    line_breaks(&html)
}

/// Replaces every newline with a `<br>` tag.
pub fn line_breaks(text: &str) -> String {
    text.replace('\n', "<br>")
}

/// Removes the span and line-break markup produced by [`render`], yielding
/// the plain ndiff text.
pub fn strip_markup(html: &str) -> String {
    let mut plain = html.replace("<br>", "\n").replace("</span>", "");
    for style in [INSERTED_STYLE, DELETED_STYLE] {
        plain = plain.replace(&format!(r#"<span style="{style}">"#), "");
    }
    plain
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    pub literal: String,
    pub replacement: String,
}

/// Ordered literal-substring replacements over serialized markup.
///
/// Entries apply in list order. Each entry claims the spans it matches; later
/// entries only see text no earlier entry has claimed, so with `["ab", "a"]`
/// the input `ab` is wrapped once as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MarkerSet {
    markers: Vec<Marker>,
}

#[derive(Clone, Copy)]
enum Piece<'a> {
    Open(&'a str),
    Claimed(&'a str),
}

impl MarkerSet {
    pub fn new() -> MarkerSet {
        MarkerSet::default()
    }

    /// Wraps each literal in the bold blue emphasis span.
    pub fn emphasize<S: AsRef<str>>(literals: &[S]) -> MarkerSet {
        let mut set = MarkerSet::new();
        for literal in literals {
            let literal = literal.as_ref();
            set.push(
                literal,
                format!(r#"<span style="{MARKER_STYLE}">{literal}</span>"#),
            );
        }
        set
    }

    /// Appends a replacement; empty literals are ignored.
    pub fn push(&mut self, literal: impl Into<String>, replacement: impl Into<String>) {
        let literal = literal.into();
        if literal.is_empty() {
            return;
        }
        self.markers.push(Marker {
            literal,
            replacement: replacement.into(),
        });
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub fn apply(&self, text: &str) -> String {
        let mut pieces = vec![Piece::Open(text)];

        for marker in &self.markers {
            let literal = marker.literal.as_str();
            let mut next = Vec::with_capacity(pieces.len());
            for piece in pieces {
                let Piece::Open(mut rest) = piece else {
                    next.push(piece);
                    continue;
                };
                while let Some(pos) = rest.find(literal) {
                    if pos > 0 {
                        next.push(Piece::Open(&rest[..pos]));
                    }
                    next.push(Piece::Claimed(&marker.replacement));
                    rest = &rest[pos + literal.len()..];
                }
                if !rest.is_empty() {
                    next.push(Piece::Open(rest));
                }
            }
            pieces = next;
        }

        pieces
            .into_iter()
            .map(|piece| match piece {
                Piece::Open(s) | Piece::Claimed(s) => s,
            })
            .collect()
    }
}
