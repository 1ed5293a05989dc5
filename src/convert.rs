//! Convert typed values to text under a set of placeholder options.
//!
//! The [`GgFormat`] trait is the open end of the engine: every formattable
//! type, built-in or user-defined, renders itself into a
//! [`FormatBuffer`](crate::buffer::FormatBuffer) given the
//! [`FormatOpts`](crate::format_specs::FormatOpts) parsed from its
//! placeholder. Built-in impls cover booleans, characters, strings, every
//! primitive integer width, and floats.
use ryu_floating_decimal::d2d;

use crate::buffer::FormatBuffer;
use crate::format_specs::{Align, FormatOpts, NumBase};

/// Default digits after the decimal point when a float placeholder carries
/// no precision.
pub const DEFAULT_FLOAT_PRECISION: u32 = 5;

/// A value that can render itself into a [`FormatBuffer`].
///
/// User types join the engine by implementing this trait. An impl may honor
/// the options, ignore them entirely, or forward them to its fields; it may
/// also recursively invoke other impls (or the driver, via
/// [`ggwrite!`](crate::ggwrite)) to compose from already-supported types:
///
/// ```
/// use ggfmt::buffer::FormatBuffer;
/// use ggfmt::convert::GgFormat;
/// use ggfmt::format_specs::FormatOpts;
///
/// struct V3 { x: f32, y: f32, z: f32 }
///
/// impl GgFormat for V3 {
///     fn format(&self, fb: &mut FormatBuffer, opts: &FormatOpts) {
///         fb.write_str("v3(");
///         self.x.format(fb, opts);
///         fb.write_str(", ");
///         self.y.format(fb, opts);
///         fb.write_str(", ");
///         self.z.format(fb, opts);
///         fb.write_str(")");
///     }
/// }
/// ```
///
/// A type with no impl is rejected at compile time; nothing ever formats as
/// garbage.
pub trait GgFormat {
    fn format(&self, fb: &mut FormatBuffer, opts: &FormatOpts);
}

impl<'a, T: GgFormat + ?Sized> GgFormat for &'a T {
    fn format(&self, fb: &mut FormatBuffer, opts: &FormatOpts) {
        (**self).format(fb, opts)
    }
}

impl GgFormat for bool {
    /// Renders `true`/`false`; width and alignment apply, numeric options
    /// and precision do not.
    fn format(&self, fb: &mut FormatBuffer, opts: &FormatOpts) {
        pad_str(fb, if *self { "true" } else { "false" }, opts);
    }
}

impl GgFormat for char {
    fn format(&self, fb: &mut FormatBuffer, opts: &FormatOpts) {
        let mut utf8 = [0u8; 4];
        pad_str(fb, self.encode_utf8(&mut utf8), opts);
    }
}

impl GgFormat for str {
    /// Width, alignment, and fill apply. `precision` caps the number of
    /// characters taken from the string; base and sign options are ignored.
    fn format(&self, fb: &mut FormatBuffer, opts: &FormatOpts) {
        let text = match opts.precision {
            Some(p) => truncate_chars(self, p as usize),
            None => self,
        };
        pad_str(fb, text, opts);
    }
}

impl GgFormat for String {
    fn format(&self, fb: &mut FormatBuffer, opts: &FormatOpts) {
        self.as_str().format(fb, opts)
    }
}

// One impl per primitive integer width, each paired with the same-width
// unsigned type so hex and binary render the two's-complement bit pattern
// of the declared width.
macro_rules! ggformat_int_impls {
    ($($int:ty => $uint:ty),+ $(,)?) => {$(
        impl GgFormat for $int {
            fn format(&self, fb: &mut FormatBuffer, opts: &FormatOpts) {
                match opts.base {
                    NumBase::Decimal => {
                        let mut itoa_buf = itoa::Buffer::new();
                        let formatted = itoa_buf.format(*self);
                        let (sign, digits) = split_sign(formatted, opts.plus_sign);
                        pad_number(fb, sign, digits, opts);
                    }
                    base => {
                        let mut scratch = [0u8; RADIX_SCRATCH];
                        let digits = radix_digits(*self as $uint as u128, base, &mut scratch);
                        pad_number(fb, "", digits, opts);
                    }
                }
            }
        }
    )+};
}

ggformat_int_impls! {
    i8 => u8, i16 => u16, i32 => u32, i64 => u64, i128 => u128, isize => usize,
    u8 => u8, u16 => u16, u32 => u32, u64 => u64, u128 => u128, usize => usize,
}

impl GgFormat for f32 {
    fn format(&self, fb: &mut FormatBuffer, opts: &FormatOpts) {
        format_float(fb, f64::from(*self), opts);
    }
}

impl GgFormat for f64 {
    /// Fixed-point rendering at `precision` digits after the decimal point
    /// (default [`DEFAULT_FLOAT_PRECISION`]); ties round away from zero.
    fn format(&self, fb: &mut FormatBuffer, opts: &FormatOpts) {
        format_float(fb, *self, opts);
    }
}

/// Pad `text` to the requested width. Zero fill only applies to the left of
/// a right-aligned value; left-aligned values always pad with spaces.
fn pad_str(fb: &mut FormatBuffer, text: &str, opts: &FormatOpts) {
    let width = opts.width.unwrap_or(0) as usize;
    let padding = width.saturating_sub(text.chars().count());
    match opts.align {
        Align::Right => {
            let fill = if opts.zero_pad { b'0' } else { b' ' };
            fb.pad(fill, padding);
            fb.write_str(text);
        }
        Align::Left => {
            fb.write_str(text);
            fb.pad(b' ', padding);
        }
    }
}

/// Pad a rendered number to the requested width. With zero fill the sign is
/// written first so `-42` pads to `-0042`, not `00-42`.
fn pad_number(fb: &mut FormatBuffer, sign: &str, digits: &str, opts: &FormatOpts) {
    let width = opts.width.unwrap_or(0) as usize;
    let padding = width.saturating_sub(sign.len() + digits.len());
    match opts.align {
        Align::Right if opts.zero_pad => {
            fb.write_str(sign);
            fb.pad(b'0', padding);
            fb.write_str(digits);
        }
        Align::Right => {
            fb.pad(b' ', padding);
            fb.write_str(sign);
            fb.write_str(digits);
        }
        Align::Left => {
            fb.write_str(sign);
            fb.write_str(digits);
            fb.pad(b' ', padding);
        }
    }
}

fn split_sign(formatted: &str, plus_sign: bool) -> (&'static str, &str) {
    match formatted.strip_prefix('-') {
        Some(digits) => ("-", digits),
        None if plus_sign => ("+", formatted),
        None => ("", formatted),
    }
}

/// Longest prefix of `s` holding at most `nchars` characters.
fn truncate_chars(s: &str, nchars: usize) -> &str {
    match s.char_indices().nth(nchars) {
        Some((i, _)) => &s[..i],
        None => s,
    }
}

// u128 rendered in binary is the widest digit string an integer can need.
const RADIX_SCRATCH: usize = 128;

/// Render `value` in the requested base into `scratch`, least significant
/// digit last, no leading zeros (a zero value renders as "0").
fn radix_digits(value: u128, base: NumBase, scratch: &mut [u8; RADIX_SCRATCH]) -> &str {
    let radix: u128 = match base {
        NumBase::Hex => 16,
        NumBase::Binary => 2,
        // decimal integers go through itoa
        NumBase::Decimal => unreachable!(),
    };

    let mut v = value;
    let mut i = RADIX_SCRATCH;
    loop {
        i -= 1;
        let d = (v % radix) as u8;
        scratch[i] = if d < 10 { b'0' + d } else { b'a' + (d - 10) };
        v /= radix;
        if v == 0 {
            break;
        }
    }

    std::str::from_utf8(&scratch[i..]).unwrap_or("")
}

// The mantissa from d2d has at most 17 significant digits.
const MANTISSA_DIGITS: usize = 24;

/// Decompose `mag` (finite, non-negative) into decimal digits rounded at
/// `precision` places after the decimal point.
///
/// Returns the number of significant digits left in `out` and the position
/// of the decimal point (how many of those digits sit before it; zero or
/// negative means the value is below 1). Digits past the returned count are
/// zeros, as are digit positions before the start of the string.
fn decimal_digits(mag: f64, precision: usize, out: &mut [u8; MANTISSA_DIGITS]) -> (usize, i64) {
    if mag == 0.0 {
        return (0, 0);
    }

    let fd = d2d(mag);
    let mut itoa_buf = itoa::Buffer::new();
    let formatted = itoa_buf.format(fd.mantissa);
    let n = formatted.len();
    out[..n].copy_from_slice(formatted.as_bytes());

    let mut point = n as i64 + i64::from(fd.exponent);
    let keep = point + precision as i64;
    if keep >= n as i64 {
        // every significant digit survives the rounding position
        return (n, point);
    }
    if keep < 0 {
        // the value is too small to register at this precision
        return (0, 0);
    }

    let keep = keep as usize;
    if out[keep] < b'5' {
        return (keep, point);
    }

    // round away from zero, propagating the carry through the kept prefix
    let mut i = keep;
    while i > 0 {
        i -= 1;
        if out[i] == b'9' {
            out[i] = b'0';
        } else {
            out[i] += 1;
            return (keep, point);
        }
    }

    // carried out of the leading digit: 9.99 at precision 1 becomes 10.0
    out[0] = b'1';
    point += 1;
    (keep.max(1), point)
}

fn format_float(fb: &mut FormatBuffer, value: f64, opts: &FormatOpts) {
    let precision = opts.precision.unwrap_or(DEFAULT_FLOAT_PRECISION) as usize;

    if !value.is_finite() {
        let body = if value.is_nan() { "nan" } else { "inf" };
        let sign = if value.is_nan() {
            ""
        } else if value.is_sign_negative() {
            "-"
        } else if opts.plus_sign {
            "+"
        } else {
            ""
        };
        // non-finite values pad with spaces even under zero fill
        let mut opts = *opts;
        opts.zero_pad = false;
        pad_number(fb, sign, body, &opts);
        return;
    }

    let sign = if value.is_sign_negative() {
        "-"
    } else if opts.plus_sign {
        "+"
    } else {
        ""
    };

    let mut digits = [0u8; MANTISSA_DIGITS];
    let (ndigits, point) = decimal_digits(value.abs(), precision, &mut digits);

    // the rendered length is known before a single byte is written, so
    // padding can lead and the digits can stream with no scratch buffer
    let int_len = if point > 0 { point as usize } else { 1 };
    let body_len = int_len + if precision > 0 { precision + 1 } else { 0 };
    let width = opts.width.unwrap_or(0) as usize;
    let padding = width.saturating_sub(sign.len() + body_len);

    match opts.align {
        Align::Right if opts.zero_pad => {
            fb.write_str(sign);
            fb.pad(b'0', padding);
        }
        Align::Right => {
            fb.pad(b' ', padding);
            fb.write_str(sign);
        }
        Align::Left => fb.write_str(sign),
    }

    for j in 0..int_len {
        let idx = j as i64 - (int_len as i64 - point);
        fb.write_ascii(digit_at(&digits, ndigits, idx));
    }
    if precision > 0 {
        fb.write_ascii(b'.');
        for i in 0..precision {
            fb.write_ascii(digit_at(&digits, ndigits, point + i as i64));
        }
    }

    if let Align::Left = opts.align {
        fb.pad(b' ', padding);
    }
}

fn digit_at(digits: &[u8; MANTISSA_DIGITS], ndigits: usize, idx: i64) -> u8 {
    if idx >= 0 && (idx as usize) < ndigits {
        digits[idx as usize]
    } else {
        b'0'
    }
}
