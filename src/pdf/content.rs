//! Paint operator rewriting for raw content stream bytes
//!
//! Content is treated as a flat byte string (one byte per character), split
//! into whitespace-delimited tokens. Only tokens that exactly equal one of the
//! fill operators are rewritten, so `b` never matches inside `b*` and operands,
//! text and other operators pass through untouched.

use crate::color::StrokeColor;

/// Fill painting operators that get turned into strokes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaintOperator {
    /// `f` - fill (nonzero winding)
    Fill,
    /// `F` - fill, obsolete spelling
    FillObsolete,
    /// `f*` - fill (even-odd)
    FillEvenOdd,
    /// `B` - fill and stroke
    FillStroke,
    /// `B*` - fill (even-odd) and stroke
    FillStrokeEvenOdd,
    /// `b` - close, fill and stroke
    CloseFillStroke,
    /// `b*` - close, fill (even-odd) and stroke
    CloseFillStrokeEvenOdd,
}

impl PaintOperator {
    pub const ALL: [PaintOperator; 7] = [
        PaintOperator::Fill,
        PaintOperator::FillObsolete,
        PaintOperator::FillEvenOdd,
        PaintOperator::FillStroke,
        PaintOperator::FillStrokeEvenOdd,
        PaintOperator::CloseFillStroke,
        PaintOperator::CloseFillStrokeEvenOdd,
    ];

    /// The operator as it appears in a content stream
    pub fn token(self) -> &'static [u8] {
        match self {
            PaintOperator::Fill => b"f",
            PaintOperator::FillObsolete => b"F",
            PaintOperator::FillEvenOdd => b"f*",
            PaintOperator::FillStroke => b"B",
            PaintOperator::FillStrokeEvenOdd => b"B*",
            PaintOperator::CloseFillStroke => b"b",
            PaintOperator::CloseFillStrokeEvenOdd => b"b*",
        }
    }

    /// Look up the operator for an exact token
    pub fn from_token(token: &[u8]) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.token() == token)
    }

    /// The stroke operator that replaces this fill
    ///
    /// Closing variants keep closing the path (`s`), the rest stroke (`S`).
    pub fn stroke_operator(self) -> &'static str {
        match self {
            PaintOperator::CloseFillStroke | PaintOperator::CloseFillStrokeEvenOdd => "s",
            _ => "S",
        }
    }
}

/// Result of rewriting one page's content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    pub content: Vec<u8>,
    pub replacements: usize,
}

/// PDF whitespace: NUL, TAB, LF, FF, CR and SPACE
pub fn is_pdf_whitespace(byte: u8) -> bool {
    matches!(byte, b'\0' | b'\t' | b'\n' | b'\x0C' | b'\r' | b' ')
}

/// Replace every delimited fill operator with `<color command><stroke op>`
///
/// A token is only rewritten when whitespace follows it. A fill operator as
/// the very last bytes of the content, with nothing after it, is left alone.
pub fn rewrite_paint_operators(content: &[u8], color: Option<&StrokeColor>) -> Rewrite {
    let color_command = color.map(StrokeColor::command).unwrap_or_default();

    let mut output = Vec::with_capacity(content.len());
    let mut replacements = 0;
    let mut pos = 0;

    while pos < content.len() {
        if is_pdf_whitespace(content[pos]) {
            output.push(content[pos]);
            pos += 1;
            continue;
        }

        let start = pos;
        while pos < content.len() && !is_pdf_whitespace(content[pos]) {
            pos += 1;
        }
        let token = &content[start..pos];
        let delimited = pos < content.len();

        match PaintOperator::from_token(token) {
            Some(op) if delimited => {
                output.extend_from_slice(color_command.as_bytes());
                output.extend_from_slice(op.stroke_operator().as_bytes());
                replacements += 1;
            }
            _ => output.extend_from_slice(token),
        }
    }

    Rewrite { content: output, replacements }
}

/// Join a page's content streams the way they are rewritten: in order, `\n` between
pub fn join_streams<I, S>(streams: I) -> Vec<u8>
where
    I: IntoIterator<Item = S>,
    S: AsRef<[u8]>,
{
    let mut joined = Vec::new();
    for (i, stream) in streams.into_iter().enumerate() {
        if i > 0 {
            joined.push(b'\n');
        }
        joined.extend_from_slice(stream.as_ref());
    }
    joined
}
