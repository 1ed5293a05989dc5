//! Render parsed templates against positional argument lists.
//!
//! The driver walks a [`Template`]'s segments in order, copying literal runs
//! verbatim and pairing each placeholder with the next unconsumed argument.
//! Arguments are taken as a flat `&[&dyn GgFormat]` slice, which the
//! [`ggformat!`](crate::ggformat), [`ggwrite!`](crate::ggwrite), and
//! [`ggprint!`](crate::ggprint) macros build from a variadic call site:
//!
//! ```
//! let mut buf = [0u8; 32];
//! let n = ggfmt::ggformat!(&mut buf, "{} worth 0x{04x}", "item", 123).unwrap();
//! assert_eq!(n, 17);
//! assert_eq!(&buf[..n], b"item worth 0x007b");
//! ```
//!
//! Supplying fewer arguments than placeholders is an error; extra trailing
//! arguments are tolerated and ignored.
use std::io::Write;

use crate::buffer::FormatBuffer;
use crate::convert::GgFormat;
use crate::format_specs::{Segment, Template};
use crate::gg_error::{GError, GResult};

impl Template {
    /// Render this template into `fb`, consuming one argument per
    /// placeholder, left to right.
    ///
    /// Returns [`GError::TooFewArguments`] if the argument list runs out;
    /// segments rendered before the shortage remain in the sink. The
    /// argument list is never read past its length.
    pub fn render(&self, fb: &mut FormatBuffer, args: &[&dyn GgFormat]) -> GResult<()> {
        let mut next_arg = 0;
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => fb.write_str(text),
                Segment::Placeholder(opts) => {
                    let arg = args.get(next_arg).ok_or_else(|| GError::TooFewArguments {
                        nargs: args.len(),
                        nplaceholders: self.placeholder_count(),
                    })?;
                    arg.format(fb, opts);
                    next_arg += 1;
                }
            }
        }
        Ok(())
    }
}

/// Parse `template` and render it into an existing sink.
///
/// This is the recursion hook for user converters: a [`GgFormat`] impl may
/// call it (or [`ggwrite!`](crate::ggwrite)) on the sink it was handed to
/// compose its output from already-supported types.
pub fn write_into(fb: &mut FormatBuffer, template: &str, args: &[&dyn GgFormat]) -> GResult<()> {
    Template::parse(template)?.render(fb, args)
}

/// Format into a caller-owned buffer, clipping at its capacity.
///
/// Returns the length the output would have had with enough room; a return
/// value above `dst.len()` means the result was truncated.
///
/// ```
/// # use ggfmt::render::format_into;
/// let mut buf = [0u8; 8];
/// let n = format_into(&mut buf, "{04x}", &[&123]).unwrap();
/// assert_eq!(&buf[..n], b"007b");
/// ```
pub fn format_into(dst: &mut [u8], template: &str, args: &[&dyn GgFormat]) -> GResult<usize> {
    let mut fb = FormatBuffer::new(dst);
    write_into(&mut fb, template, args)?;
    Ok(fb.finish())
}

/// Format into a freshly allocated `String`; never truncates.
pub fn format_string(template: &str, args: &[&dyn GgFormat]) -> GResult<String> {
    let mut fb = FormatBuffer::growable();
    write_into(&mut fb, template, args)?;
    Ok(fb.into_string())
}

/// Render `template` and write the result to standard output.
///
/// The stream is not capacity-bounded, so truncation semantics do not
/// apply; parse and argument errors are reported the same as for the
/// buffer entry points.
pub fn print(template: &str, args: &[&dyn GgFormat]) -> GResult<()> {
    let rendered = format_string(template, args)?;
    std::io::stdout().write_all(rendered.as_bytes())?;
    Ok(())
}

/// Format into a byte buffer: `ggformat!(&mut buf, "{} {}", a, b)`.
///
/// Evaluates to [`format_into`]'s result: the pre-truncation length, or an
/// error for a malformed template or an argument shortage.
#[macro_export]
macro_rules! ggformat {
    ($dst:expr, $template:expr $(, $arg:expr)* $(,)?) => {
        $crate::render::format_into(
            $dst,
            $template,
            &[$( &$arg as &dyn $crate::convert::GgFormat ),*],
        )
    };
}

/// Append to an existing [`FormatBuffer`](crate::buffer::FormatBuffer):
/// `ggwrite!(fb, "{} {}", a, b)`.
#[macro_export]
macro_rules! ggwrite {
    ($fb:expr, $template:expr $(, $arg:expr)* $(,)?) => {
        $crate::render::write_into(
            $fb,
            $template,
            &[$( &$arg as &dyn $crate::convert::GgFormat ),*],
        )
    };
}

/// Print to standard output: `ggprint!("{} {}\n", a, b)`.
///
/// No newline is appended. Evaluates to a [`GResult`](crate::gg_error::GResult).
#[macro_export]
macro_rules! ggprint {
    ($template:expr $(, $arg:expr)* $(,)?) => {
        $crate::render::print(
            $template,
            &[$( &$arg as &dyn $crate::convert::GgFormat ),*],
        )
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format_specs::FormatOpts;

    fn fmt(template: &str, args: &[&dyn GgFormat]) -> String {
        format_string(template, args).unwrap()
    }

    #[test]
    fn test_literals_only() {
        assert_eq!(fmt("plain text", &[]), "plain text");
        assert_eq!(fmt("{{ }}", &[]), "{ }");
        assert_eq!(fmt("", &[]), "");
    }

    #[test]
    fn test_left_aligned_strings() {
        assert_eq!(fmt("{-5}:", &[&"world"]), "world:");
        assert_eq!(fmt("{-10}:", &[&"hi"]), "hi        :");
    }

    #[test]
    fn test_numeric_scenarios() {
        assert_eq!(fmt("{04x}", &[&123]), "007b");
        assert_eq!(fmt("{4.2}", &[&1.23]), "1.23");
        assert_eq!(fmt("{+}", &[&1]), "+1");
        assert_eq!(fmt("{b}", &[&123u8]), "1111011");
    }

    #[test]
    fn test_interleaving() {
        assert_eq!(
            fmt("ints: {-5} {04} {+} {}", &[&1, &1, &1, &1]),
            "ints: 1     0001 +1 1"
        );
        assert_eq!(fmt("bools: {} {}", &[&true, &false]), "bools: true false");
    }

    #[test]
    fn test_truncation_reports_full_length() {
        let mut buf = [0u8; 8];
        let n = format_into(&mut buf, "{}!", &[&"hello world"]).unwrap();
        assert_eq!(n, 12, "The reported length must be the pre-truncation count");
        assert_eq!(&buf, b"hello wo");
    }

    #[test]
    fn test_too_few_arguments() {
        let e = format_string("{} and {}", &[&1]);
        match e {
            Err(GError::TooFewArguments { nargs, nplaceholders }) => {
                assert_eq!(nargs, 1);
                assert_eq!(nplaceholders, 2);
            }
            other => panic!("Expected TooFewArguments, got {other:?}"),
        }
    }

    #[test]
    fn test_extra_arguments_ignored() {
        assert_eq!(fmt("{}", &[&1, &2, &3]), "1");
    }

    #[test]
    fn test_malformed_template_appends_nothing() {
        let mut fb = FormatBuffer::growable();
        fb.write_str("kept");
        let e = write_into(&mut fb, "{q}", &[&1]);
        assert!(e.is_err(), "Rendering '{{q}}' did not return an error");
        assert_eq!(fb.as_str(), "kept", "A failed render must not disturb earlier content");
    }

    #[test]
    fn test_parse_once_render_many() -> GResult<()> {
        let t = Template::parse("[{03}]")?;
        let mut fb = FormatBuffer::growable();
        for i in [1, 22, 333] {
            t.render(&mut fb, &[&i])?;
        }
        assert_eq!(fb.as_str(), "[001][022][333]");
        Ok(())
    }

    #[test]
    fn test_macros() {
        let mut buf = [0u8; 32];
        let n = ggformat!(&mut buf, "{} {} {}", 1, 2.5, "three").unwrap();
        assert_eq!(&buf[..n], b"1 2.50000 three");

        let mut fb = FormatBuffer::growable();
        ggwrite!(&mut fb, "{x}", 255).unwrap();
        assert_eq!(fb.as_str(), "ff");
    }

    struct V3 {
        x: f32,
        y: f32,
        z: f32,
    }

    // forwards the placeholder options to each component
    impl GgFormat for V3 {
        fn format(&self, fb: &mut FormatBuffer, opts: &FormatOpts) {
            fb.write_str("v3(");
            self.x.format(fb, opts);
            fb.write_str(", ");
            self.y.format(fb, opts);
            fb.write_str(", ");
            self.z.format(fb, opts);
            fb.write_str(")");
        }
    }

    struct Thing {
        a: i32,
        b: f64,
    }

    // ignores the options and re-enters the driver instead
    impl GgFormat for Thing {
        fn format(&self, fb: &mut FormatBuffer, _opts: &FormatOpts) {
            ggwrite!(fb, "a = {}. b = {}", self.a, self.b).unwrap();
        }
    }

    #[test]
    fn test_user_type_forwards_options() {
        let v = V3 { x: 1.0, y: 2.0, z: 3.0 };
        assert_eq!(
            fmt("{.1}", &[&v]),
            "v3(1.0, 2.0, 3.0)",
            "A composite converter must pass its options through to the fields"
        );
    }

    #[test]
    fn test_user_type_reenters_driver() {
        let thing = Thing { a: 12345, b: 67890.0 };
        assert_eq!(fmt("{}!", &[&thing]), "a = 12345. b = 67890.00000!");
    }

    #[test]
    fn test_nested_calls_keep_cursor_consistent() {
        let v = V3 { x: 1.0, y: 2.0, z: 3.0 };
        let mut buf = [0u8; 10];
        let mut fb = FormatBuffer::new(&mut buf);
        let before = fb.len();
        ggwrite!(&mut fb, "{.1}", v).unwrap();
        // "v3(1.0, 2.0, 3.0)" is 17 characters; the cursor keeps counting
        // past capacity while the backing stays within bounds
        assert_eq!(fb.len(), before + 17);
        assert_eq!(fb.written(), 10);
        assert_eq!(fb.as_str(), "v3(1.0, 2.");
    }
}
