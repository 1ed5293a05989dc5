//! Represent parsed templates and their placeholder options as Rust types.
//!
//! The first step in working with a template string such as `"x = {04x}"` is
//! to parse it into a [`Template`] with its `parse` method:
//!
//! ```
//! # use ggfmt::format_specs::Template;
//! let t = Template::parse("x = {04x}").unwrap();
//! ```
//!
//! From there, the template can be rendered against an argument list (see
//! [`render`](crate::render)) or you can inspect the segments directly with
//! `iter_segments` and `into_segments`.
use std::fmt::Display;

use pest::{iterators::Pair, Parser};

use crate::gg_error::{GError, GResult};

/// Upper bound on field width and precision.
pub const MAX_FIELD: u32 = 1024;

#[derive(Parser)]
#[grammar = "gg.pest"]
pub(crate) struct GgParser;

/// Horizontal alignment of a value inside its field.
///
/// The default is `Right`; a leading `-` in the placeholder body selects
/// `Left`. Padding goes on the opposite side of the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    Left,
    #[default]
    Right,
}

impl Display for Align {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Align::Left => "-",
            Align::Right => "",
        };

        write!(f, "{s}")
    }
}

/// Which base (10, 16, or 2) a numeric value is written in.
///
/// Selected by a trailing `x` (hex) or `b` (binary) in the placeholder body;
/// exactly one base is ever in effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NumBase {
    #[default]
    Decimal,
    Hex,
    Binary,
}

impl Display for NumBase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            NumBase::Decimal => "",
            NumBase::Hex => "x",
            NumBase::Binary => "b",
        };

        write!(f, "{s}")
    }
}

/// The parsed options of one placeholder.
///
/// Options are immutable once parsed and copied by value wherever used. A
/// default instance (`FormatOpts::default()`) corresponds to the empty
/// placeholder `{}`: right-aligned, no padding, decimal, sign only when
/// negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FormatOpts {
    /// Field alignment; padding fills the opposite side.
    pub align: Align,
    /// Pad with `'0'` instead of spaces. Ignored when left-aligned.
    pub zero_pad: bool,
    /// Minimum field width; `None` means no padding. At most [`MAX_FIELD`].
    pub width: Option<u32>,
    /// Digits after the decimal point for floats, or the maximum number of
    /// characters taken from a string. Integers ignore it.
    pub precision: Option<u32>,
    /// Numeric base for integer arguments.
    pub base: NumBase,
    /// Force a leading `+` on non-negative decimal numbers.
    pub plus_sign: bool,
}

impl Display for FormatOpts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.align)?;
        if self.zero_pad {
            write!(f, "0")?;
        }
        if let Some(w) = self.width {
            write!(f, "{w}")?;
        }
        if let Some(p) = self.precision {
            write!(f, ".{p}")?;
        }
        write!(f, "{}", self.base)?;
        if self.plus_sign {
            write!(f, "+")?;
        }
        Ok(())
    }
}

/// One piece of a parsed template, in source order.
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    /// Template text copied verbatim to the output. Brace escapes (`{{` and
    /// `}}`) have already been collapsed to single braces.
    Literal(String),
    /// A `{…}` occurrence; consumes the next positional argument.
    Placeholder(FormatOpts),
}

/// A parsed template string.
///
/// Generally the first step in handling a template will be to pass it to
/// this struct's `parse` method:
///
/// ```
/// # use ggfmt::format_specs::Template;
/// let t = Template::parse("{-10}: {04x}").unwrap();
/// assert_eq!(t.placeholder_count(), 2);
/// ```
///
/// Parsing is the expensive half of a formatting call; templates rendered
/// many times should be parsed once and reused.
#[derive(Debug, Clone)]
pub struct Template {
    pub(crate) segments: Vec<Segment>,
}

impl Template {
    /// Parse a template string and return a `Template` instance.
    ///
    /// `{{` and `}}` denote one literal brace each. Returns an error for an
    /// unmatched brace, an unrecognized character inside a placeholder, or a
    /// width/precision above [`MAX_FIELD`].
    pub fn parse(template: &str) -> GResult<Self> {
        let mut segments = vec![];
        let tree = GgParser::parse(Rule::template, template)
            .map_err(|e| GError::from_pest(e, template.to_string()))?
            .next()
            .unwrap();

        for pair in tree.into_inner() {
            match pair.as_rule() {
                // End of string, exit the loop
                Rule::EOI => break,

                Rule::literal => {
                    segments.push(Segment::Literal(unescape_braces(pair.as_str())));
                }

                Rule::placeholder => {
                    let spec = pair.into_inner().next().unwrap();
                    let opts = consume_opts_from_pair(spec, template)?;
                    segments.push(Segment::Placeholder(opts));
                }

                // Everything else only occurs nested inside the rules above
                _ => unreachable!(),
            }
        }

        Ok(Self { segments })
    }

    /// Consume the `Template` instance and return the inner `Vec<Segment>`.
    pub fn into_segments(self) -> Vec<Segment> {
        self.segments
    }

    /// Iterate over the segments of this template in source order.
    pub fn iter_segments(&self) -> std::slice::Iter<'_, Segment> {
        self.segments.iter()
    }

    /// Return the number of placeholders, i.e. the number of arguments a
    /// render of this template consumes.
    pub fn placeholder_count(&self) -> usize {
        self.segments
            .iter()
            .filter(|s| matches!(s, Segment::Placeholder(_)))
            .count()
    }
}

fn consume_opts_from_pair(spec: Pair<Rule>, template: &str) -> GResult<FormatOpts> {
    let mut opts = FormatOpts::default();

    for pair in spec.into_inner() {
        match pair.as_rule() {
            Rule::left => opts.align = Align::Left,
            Rule::zero => opts.zero_pad = true,
            Rule::width => {
                opts.width = Some(consume_field_size(&pair, template, "field width")?);
            }
            Rule::prec_digits => {
                opts.precision = Some(consume_field_size(&pair, template, "precision")?);
            }
            Rule::base => {
                opts.base = if pair.as_str() == "x" {
                    NumBase::Hex
                } else {
                    NumBase::Binary
                };
            }
            Rule::plus => opts.plus_sign = true,
            _ => unreachable!(),
        }
    }

    Ok(opts)
}

fn consume_field_size(pair: &Pair<Rule>, template: &str, what: &str) -> GResult<u32> {
    let digits = pair.as_str();
    digits
        .parse::<u32>()
        .ok()
        .filter(|&n| n <= MAX_FIELD)
        .ok_or_else(|| GError::BadTemplate {
            s: template.to_string(),
            reason: format!("{what} '{digits}' is out of range (maximum is {MAX_FIELD})"),
        })
}

/// Collapse `{{` and `}}` to single braces. The grammar guarantees every
/// brace in a literal run is doubled, so a brace always skips its twin.
fn unescape_braces(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        out.push(c);
        if c == '{' || c == '}' {
            chars.next();
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_single(body: &str) -> GResult<FormatOpts> {
        let template = format!("{{{body}}}");
        let segments = Template::parse(&template)?.into_segments();
        assert_eq!(
            segments.len(),
            1,
            "Parsing '{template}' did not return exactly 1 segment"
        );
        match segments.into_iter().next().unwrap() {
            Segment::Placeholder(opts) => Ok(opts),
            other => panic!("Parsing '{template}' returned {other:?}, not a placeholder"),
        }
    }

    #[test]
    fn test_empty_spec() -> GResult<()> {
        let opts = parse_single("")?;
        assert_eq!(opts, FormatOpts::default(), "Parsing '{{}}' failed");
        Ok(())
    }

    #[test]
    fn test_left_align() -> GResult<()> {
        let opts = parse_single("-5")?;
        assert_eq!(opts.align, Align::Left);
        assert_eq!(opts.width, Some(5));
        assert!(!opts.zero_pad);

        let opts = parse_single("-10")?;
        assert_eq!(opts.align, Align::Left);
        assert_eq!(opts.width, Some(10));
        Ok(())
    }

    #[test]
    fn test_zero_pad() -> GResult<()> {
        let opts = parse_single("04")?;
        assert!(opts.zero_pad);
        assert_eq!(opts.width, Some(4));
        assert_eq!(opts.align, Align::Right);

        // a lone zero is a fill marker, not a width
        let opts = parse_single("0")?;
        assert!(opts.zero_pad);
        assert_eq!(opts.width, None);
        Ok(())
    }

    #[test]
    fn test_plus_sign() -> GResult<()> {
        let opts = parse_single("+")?;
        assert!(opts.plus_sign);
        assert_eq!(opts.width, None);
        Ok(())
    }

    #[test]
    fn test_bases() -> GResult<()> {
        let opts = parse_single("04x")?;
        assert!(opts.zero_pad);
        assert_eq!(opts.width, Some(4));
        assert_eq!(opts.base, NumBase::Hex);

        let opts = parse_single("b")?;
        assert_eq!(opts.base, NumBase::Binary);
        assert_eq!(opts.width, None);

        let opts = parse_single("x")?;
        assert_eq!(opts.base, NumBase::Hex);
        Ok(())
    }

    #[test]
    fn test_precision() -> GResult<()> {
        let opts = parse_single("4.2")?;
        assert_eq!(opts.width, Some(4));
        assert_eq!(opts.precision, Some(2));

        let opts = parse_single("02.2")?;
        assert!(opts.zero_pad);
        assert_eq!(opts.width, Some(2));
        assert_eq!(opts.precision, Some(2));

        let opts = parse_single(".3")?;
        assert_eq!(opts.width, None);
        assert_eq!(opts.precision, Some(3));
        Ok(())
    }

    #[test]
    fn test_full_spec() -> GResult<()> {
        let opts = parse_single("-08.2x+")?;
        assert_eq!(
            opts,
            FormatOpts {
                align: Align::Left,
                zero_pad: true,
                width: Some(8),
                precision: Some(2),
                base: NumBase::Hex,
                plus_sign: true,
            },
            "Parsing '{{-08.2x+}}' failed"
        );
        Ok(())
    }

    #[test]
    fn test_escaped_braces() -> GResult<()> {
        let segments = Template::parse("{{ }}")?.into_segments();
        assert_eq!(segments, vec![Segment::Literal("{ }".to_string())]);

        let segments = Template::parse("a{{b}}c")?.into_segments();
        assert_eq!(segments, vec![Segment::Literal("a{b}c".to_string())]);
        Ok(())
    }

    #[test]
    fn test_segment_order() -> GResult<()> {
        let segments = Template::parse("x = {04x}, y = {}!")?.into_segments();
        let expected = vec![
            Segment::Literal("x = ".to_string()),
            Segment::Placeholder(FormatOpts {
                zero_pad: true,
                width: Some(4),
                base: NumBase::Hex,
                ..FormatOpts::default()
            }),
            Segment::Literal(", y = ".to_string()),
            Segment::Placeholder(FormatOpts::default()),
            Segment::Literal("!".to_string()),
        ];
        assert_eq!(segments, expected, "Parsing 'x = {{04x}}, y = {{}}!' failed");
        Ok(())
    }

    #[test]
    fn test_placeholder_count() -> GResult<()> {
        let t = Template::parse("{} and {} and {}")?;
        assert_eq!(t.placeholder_count(), 3);

        let t = Template::parse("no placeholders")?;
        assert_eq!(t.placeholder_count(), 0);
        Ok(())
    }

    #[test]
    fn test_unmatched_braces() {
        let e = Template::parse("hello {");
        assert!(e.is_err(), "Parsing 'hello {{' (unmatched open) did not return an error");

        let e = Template::parse("hello {0");
        assert!(e.is_err(), "Parsing 'hello {{0' (unterminated placeholder) did not return an error");

        let e = Template::parse("a}b");
        assert!(e.is_err(), "Parsing 'a}}b' (unmatched close) did not return an error");
    }

    #[test]
    fn test_malformed_body() {
        let e = Template::parse("{q}");
        assert!(e.is_err(), "Parsing '{{q}}' (unknown option) did not return an error");

        let e = Template::parse("{4 }");
        assert!(e.is_err(), "Parsing '{{4 }}' (space in body) did not return an error");

        let e = Template::parse("{+4}");
        assert!(e.is_err(), "Parsing '{{+4}}' (sign before width) did not return an error");
    }

    #[test]
    fn test_field_size_range() {
        let e = parse_single("1025");
        assert!(e.is_err(), "Parsing '{{1025}}' (width above MAX_FIELD) did not return an error");

        let e = parse_single(".1025");
        assert!(e.is_err(), "Parsing '{{.1025}}' (precision above MAX_FIELD) did not return an error");

        let opts = parse_single("1024").unwrap();
        assert_eq!(opts.width, Some(1024));
    }

    #[test]
    fn test_opts_display_roundtrip() -> GResult<()> {
        for body in ["-5", "04", "+", "", "04x", "b", "4.2", "02.2", "-10"] {
            let opts = parse_single(body)?;
            assert_eq!(
                opts.to_string(),
                body,
                "Display of the options parsed from '{{{body}}}' did not reproduce the body"
            );
        }
        Ok(())
    }
}
