//! Bounded formatted output.
//!
//! Everything funnels through [`BoundedWriter`], which never writes past the
//! end of its buffer. Output longer than the buffer is cut at `capacity - 1`
//! bytes and NUL-terminated; the full length is still counted so callers can
//! detect truncation the way `snprintf` reports it. A zero-capacity buffer is
//! never written to.
//!
//! [`safe_format`] interprets printf-style directives over typed arguments:
//! flags `-+ #0`, width and precision (digits or `*`), length modifiers
//! (accepted and ignored), and the conversions `d i u o x X c s f F %`.

use core::ffi::{CStr, c_char, c_int};
use core::fmt::{self, Write as _};

use derive_more::{Display, Error};
use nkhost_config::abi::{FormatArg, FormatArgKind};

/// Result of a bounded format call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Formatted {
    /// Bytes stored, excluding the terminating NUL.
    pub written: usize,
    /// Bytes the complete output needs, excluding the terminating NUL.
    pub required: usize,
}

impl Formatted {
    pub fn truncated(&self) -> bool {
        self.required > self.written
    }
}

#[derive(Display, Debug, Error, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[display("directive at byte {offset} has no argument left")]
    MissingArgument { offset: usize },

    #[display("argument {index} cannot be formatted with `%{conversion}`")]
    ArgumentMismatch { index: usize, conversion: char },

    #[display("unsupported conversion `%{conversion}` at byte {offset}")]
    UnsupportedConversion { offset: usize, conversion: char },

    #[display("format string ends inside the directive at byte {offset}")]
    TruncatedDirective { offset: usize },

    #[display("argument {index} has unknown kind tag {tag}")]
    UnknownArgumentKind { index: usize, tag: u32 },

    #[display("width or precision of the directive at byte {offset} exceeds INT_MAX")]
    FieldOverflow { offset: usize },
}

/// One formatting argument.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Arg<'a> {
    Int(i64),
    Uint(u64),
    Double(f64),
    Char(u8),
    /// `None` is a null string pointer and prints as `(null)`.
    Str(Option<&'a [u8]>),
}

impl From<i32> for Arg<'_> {
    fn from(value: i32) -> Self {
        Arg::Int(value.into())
    }
}

impl From<i64> for Arg<'_> {
    fn from(value: i64) -> Self {
        Arg::Int(value)
    }
}

impl From<u32> for Arg<'_> {
    fn from(value: u32) -> Self {
        Arg::Uint(value.into())
    }
}

impl From<u64> for Arg<'_> {
    fn from(value: u64) -> Self {
        Arg::Uint(value)
    }
}

impl From<usize> for Arg<'_> {
    fn from(value: usize) -> Self {
        Arg::Uint(value as u64)
    }
}

impl From<f32> for Arg<'_> {
    fn from(value: f32) -> Self {
        Arg::Double(value.into())
    }
}

impl From<f64> for Arg<'_> {
    fn from(value: f64) -> Self {
        Arg::Double(value)
    }
}

impl<'a> From<&'a str> for Arg<'a> {
    fn from(value: &'a str) -> Self {
        Arg::Str(Some(value.as_bytes()))
    }
}

impl<'a> From<&'a [u8]> for Arg<'a> {
    fn from(value: &'a [u8]) -> Self {
        Arg::Str(Some(value))
    }
}

impl<'a> Arg<'a> {
    /// Decode a C argument.
    ///
    /// # Safety
    ///
    /// A `CStr` argument must be null or point to a NUL-terminated string
    /// that outlives `'a`.
    pub unsafe fn from_raw(raw: &FormatArg, index: usize) -> Result<Self, FormatError> {
        let kind = raw.kind().ok_or(FormatError::UnknownArgumentKind {
            index,
            tag: raw.kind,
        })?;
        // SAFETY: the tag selects the initialized union field.
        let arg = unsafe {
            match kind {
                FormatArgKind::Int => Arg::Int(raw.value.int),
                FormatArgKind::Uint => Arg::Uint(raw.value.uint),
                FormatArgKind::Double => Arg::Double(raw.value.double),
                FormatArgKind::Char => Arg::Char(raw.value.ch as u8),
                FormatArgKind::CStr => {
                    let ptr = raw.value.cstr;
                    Arg::Str((!ptr.is_null()).then(|| CStr::from_ptr(ptr).to_bytes()))
                }
            }
        };
        Ok(arg)
    }
}

// =============================================================================
// Bounded writer
// =============================================================================

/// Writes into a fixed buffer, reserving the last byte for the terminator.
pub struct BoundedWriter<'a> {
    buf: &'a mut [u8],
    len: usize,
    required: usize,
}

impl<'a> BoundedWriter<'a> {
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self {
            buf,
            len: 0,
            required: 0,
        }
    }

    fn room(&self) -> usize {
        self.buf.len().saturating_sub(1) - self.len
    }

    pub fn push(&mut self, bytes: &[u8]) {
        let take = self.room().min(bytes.len());
        self.buf[self.len..self.len + take].copy_from_slice(&bytes[..take]);
        self.len += take;
        self.required = self.required.saturating_add(bytes.len());
    }

    pub fn repeat(&mut self, byte: u8, count: usize) {
        let take = self.room().min(count);
        self.buf[self.len..self.len + take].fill(byte);
        self.len += take;
        self.required = self.required.saturating_add(count);
    }

    /// Terminate the output and report what was written.
    pub fn finish(self) -> Formatted {
        if let Some(terminator) = self.buf.get_mut(self.len) {
            *terminator = 0;
        }
        Formatted {
            written: self.len,
            required: self.required,
        }
    }

    fn emit(&mut self, args: fmt::Arguments<'_>) {
        // write_str below never fails
        let _ = self.write_fmt(args);
    }
}

impl fmt::Write for BoundedWriter<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.push(s.as_bytes());
        Ok(())
    }
}

/// Counts the bytes a `fmt` call would produce.
struct Measure(usize);

impl fmt::Write for Measure {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.0 += s.len();
        Ok(())
    }
}

/// Format Rust `format_args!` output into `buf` without overrunning it.
pub fn format_into(buf: &mut [u8], args: fmt::Arguments<'_>) -> Formatted {
    let mut out = BoundedWriter::new(buf);
    out.emit(args);
    out.finish()
}

/// Format `spec` with `args` into `buf` without overrunning it.
///
/// On error the buffer still holds a NUL-terminated prefix of the output.
pub fn safe_format(buf: &mut [u8], spec: &[u8], args: &[Arg<'_>]) -> Result<Formatted, FormatError> {
    let mut out = BoundedWriter::new(buf);
    let result = write_spec(&mut out, spec, args);
    let formatted = out.finish();
    if formatted.truncated() {
        tracing::trace!(
            written = formatted.written,
            required = formatted.required,
            "formatted output truncated"
        );
    }
    result.map(|()| formatted)
}

fn write_spec(out: &mut BoundedWriter<'_>, spec: &[u8], args: &[Arg<'_>]) -> Result<(), FormatError> {
    let mut cursor = ArgCursor { args, next: 0 };
    let mut pos = 0;
    while pos < spec.len() {
        let Some(rel) = spec[pos..].iter().position(|&b| b == b'%') else {
            out.push(&spec[pos..]);
            break;
        };
        out.push(&spec[pos..pos + rel]);
        let offset = pos + rel;
        let (directive, next) = Directive::parse(spec, offset, &mut cursor)?;
        directive.write(out, &mut cursor)?;
        pos = next;
    }
    Ok(())
}

struct ArgCursor<'s, 'a> {
    args: &'s [Arg<'a>],
    next: usize,
}

impl<'a> ArgCursor<'_, 'a> {
    fn take(&mut self, offset: usize) -> Result<(usize, Arg<'a>), FormatError> {
        let index = self.next;
        let arg = *self
            .args
            .get(index)
            .ok_or(FormatError::MissingArgument { offset })?;
        self.next += 1;
        Ok((index, arg))
    }

    /// A `*` width or precision.
    fn take_star(&mut self, offset: usize) -> Result<i64, FormatError> {
        match self.take(offset)? {
            (_, Arg::Int(v)) => Ok(v),
            (_, Arg::Uint(v)) => Ok(i64::try_from(v).unwrap_or(i64::MAX)),
            (index, _) => Err(FormatError::ArgumentMismatch {
                index,
                conversion: '*',
            }),
        }
    }
}

// =============================================================================
// Directives
// =============================================================================

/// Largest width or precision accepted, as printf's `int` fields.
const MAX_FIELD: usize = c_int::MAX as usize;

/// Most fraction digits handed to Rust's float formatter, which rejects more.
/// An `f64` fraction terminates long before this, so further digits are zeros.
const MAX_RENDERED_PRECISION: usize = u16::MAX as usize;

#[derive(Clone, Copy, Debug, Default)]
struct Flags {
    left: bool,
    plus: bool,
    space: bool,
    alt: bool,
    zero: bool,
}

#[derive(Debug)]
struct Directive {
    offset: usize,
    flags: Flags,
    width: usize,
    precision: Option<usize>,
    conversion: u8,
}

impl Directive {
    /// Parse the directive starting at `spec[offset] == b'%'`. Returns it
    /// with the index just past its conversion character.
    fn parse(spec: &[u8], offset: usize, cursor: &mut ArgCursor<'_, '_>) -> Result<(Self, usize), FormatError> {
        let truncated = FormatError::TruncatedDirective { offset };
        let mut pos = offset + 1;
        let mut flags = Flags::default();

        while let Some(&b) = spec.get(pos) {
            match b {
                b'-' => flags.left = true,
                b'+' => flags.plus = true,
                b' ' => flags.space = true,
                b'#' => flags.alt = true,
                b'0' => flags.zero = true,
                _ => break,
            }
            pos += 1;
        }

        let width = if spec.get(pos) == Some(&b'*') {
            pos += 1;
            let star = cursor.take_star(offset)?;
            // A negative width means left-justify.
            if star < 0 {
                flags.left = true;
            }
            usize::try_from(star.unsigned_abs()).unwrap_or(usize::MAX)
        } else {
            parse_number(spec, &mut pos).unwrap_or(0)
        };

        let mut precision = None;
        if spec.get(pos) == Some(&b'.') {
            pos += 1;
            if spec.get(pos) == Some(&b'*') {
                pos += 1;
                let star = cursor.take_star(offset)?;
                // A negative precision is taken as if it were omitted.
                precision = usize::try_from(star).ok();
            } else {
                precision = Some(parse_number(spec, &mut pos).unwrap_or(0));
            }
        }

        if width > MAX_FIELD || precision.is_some_and(|p| p > MAX_FIELD) {
            return Err(FormatError::FieldOverflow { offset });
        }

        while let Some(b'h' | b'l' | b'L' | b'j' | b'z' | b't') = spec.get(pos) {
            pos += 1;
        }

        let &conversion = spec.get(pos).ok_or(truncated)?;
        let directive = Directive {
            offset,
            flags,
            width,
            precision,
            conversion,
        };
        Ok((directive, pos + 1))
    }

    fn write(&self, out: &mut BoundedWriter<'_>, cursor: &mut ArgCursor<'_, '_>) -> Result<(), FormatError> {
        let conversion = self.conversion;
        match conversion {
            b'%' => {
                out.push(b"%");
                Ok(())
            }
            b'd' | b'i' => {
                let value = match cursor.take(self.offset)? {
                    (_, Arg::Int(v)) => v,
                    (_, Arg::Uint(v)) => v as i64,
                    (_, Arg::Char(c)) => i64::from(c),
                    (index, _) => return Err(self.mismatch(index)),
                };
                self.write_integer(out, value < 0, value.unsigned_abs(), 10, true);
                Ok(())
            }
            b'u' | b'o' | b'x' | b'X' => {
                let value = match cursor.take(self.offset)? {
                    (_, Arg::Uint(v)) => v,
                    (_, Arg::Int(v)) => v as u64,
                    (_, Arg::Char(c)) => u64::from(c),
                    (index, _) => return Err(self.mismatch(index)),
                };
                let radix = match conversion {
                    b'o' => 8,
                    b'x' | b'X' => 16,
                    _ => 10,
                };
                self.write_integer(out, false, value, radix, false);
                Ok(())
            }
            b'c' => {
                let byte = match cursor.take(self.offset)? {
                    (_, Arg::Char(c)) => c,
                    (_, Arg::Int(v)) => v as u8,
                    (_, Arg::Uint(v)) => v as u8,
                    (index, _) => return Err(self.mismatch(index)),
                };
                self.write_padded(out, &[byte]);
                Ok(())
            }
            b's' => {
                let bytes: &[u8] = match cursor.take(self.offset)? {
                    (_, Arg::Str(Some(s))) => s,
                    (_, Arg::Str(None)) => b"(null)",
                    (index, _) => return Err(self.mismatch(index)),
                };
                let shown = match self.precision {
                    Some(limit) => &bytes[..bytes.len().min(limit)],
                    None => bytes,
                };
                self.write_padded(out, shown);
                Ok(())
            }
            b'f' | b'F' => {
                let value = match cursor.take(self.offset)? {
                    (_, Arg::Double(v)) => v,
                    (index, _) => return Err(self.mismatch(index)),
                };
                self.write_float(out, value, conversion == b'F');
                Ok(())
            }
            other => Err(FormatError::UnsupportedConversion {
                offset: self.offset,
                conversion: char::from(other),
            }),
        }
    }

    fn mismatch(&self, index: usize) -> FormatError {
        FormatError::ArgumentMismatch {
            index,
            conversion: char::from(self.conversion),
        }
    }

    fn sign(&self, negative: bool) -> &'static [u8] {
        if negative {
            b"-"
        } else if self.flags.plus {
            b"+"
        } else if self.flags.space {
            b" "
        } else {
            b""
        }
    }

    fn write_integer(&self, out: &mut BoundedWriter<'_>, negative: bool, magnitude: u64, radix: u64, signed: bool) {
        let upper = self.conversion == b'X';
        let mut scratch = [0u8; 22];
        let digits: &[u8] = if self.precision == Some(0) && magnitude == 0 {
            &[]
        } else {
            render_digits(&mut scratch, magnitude, radix, upper)
        };

        let sign = if signed { self.sign(negative) } else { b"" };
        let zeros = self.precision.unwrap_or(0).saturating_sub(digits.len());
        let prefix: &[u8] = match (self.flags.alt, radix) {
            (true, 16) if magnitude != 0 => {
                if upper {
                    b"0X"
                } else {
                    b"0x"
                }
            }
            (true, 8) if zeros == 0 && digits.first() != Some(&b'0') => b"0",
            _ => b"",
        };

        let body = (sign.len() + prefix.len() + digits.len()).saturating_add(zeros);
        let pad = self.width.saturating_sub(body);
        if self.flags.left {
            out.push(sign);
            out.push(prefix);
            out.repeat(b'0', zeros);
            out.push(digits);
            out.repeat(b' ', pad);
        } else if self.flags.zero && self.precision.is_none() {
            out.push(sign);
            out.push(prefix);
            out.repeat(b'0', zeros.saturating_add(pad));
            out.push(digits);
        } else {
            out.repeat(b' ', pad);
            out.push(sign);
            out.push(prefix);
            out.repeat(b'0', zeros);
            out.push(digits);
        }
    }

    fn write_float(&self, out: &mut BoundedWriter<'_>, value: f64, upper: bool) {
        let negative = value.is_sign_negative() && !value.is_nan();
        let sign = self.sign(negative);

        if !value.is_finite() {
            let word: &[u8] = match (value.is_nan(), upper) {
                (true, false) => b"nan",
                (true, true) => b"NAN",
                (false, false) => b"inf",
                (false, true) => b"INF",
            };
            let pad = self.width.saturating_sub(sign.len() + word.len());
            if self.flags.left {
                out.push(sign);
                out.push(word);
                out.repeat(b' ', pad);
            } else {
                out.repeat(b' ', pad);
                out.push(sign);
                out.push(word);
            }
            return;
        }

        let precision = self.precision.unwrap_or(6);
        let rendered = precision.min(MAX_RENDERED_PRECISION);
        let trailing = precision - rendered;
        let magnitude = value.abs();
        let point: &[u8] = if self.flags.alt && precision == 0 { b"." } else { b"" };

        let mut measure = Measure(0);
        let _ = write!(measure, "{magnitude:.rendered$}");
        let body = (sign.len() + measure.0 + point.len()).saturating_add(trailing);
        let pad = self.width.saturating_sub(body);

        if self.flags.left {
            out.push(sign);
            write_fixed(out, magnitude, rendered, trailing, point);
            out.repeat(b' ', pad);
        } else if self.flags.zero {
            out.push(sign);
            out.repeat(b'0', pad);
            write_fixed(out, magnitude, rendered, trailing, point);
        } else {
            out.repeat(b' ', pad);
            out.push(sign);
            write_fixed(out, magnitude, rendered, trailing, point);
        }
    }

    /// Strings and characters: space padding only.
    fn write_padded(&self, out: &mut BoundedWriter<'_>, bytes: &[u8]) {
        let pad = self.width.saturating_sub(bytes.len());
        if self.flags.left {
            out.push(bytes);
            out.repeat(b' ', pad);
        } else {
            out.repeat(b' ', pad);
            out.push(bytes);
        }
    }
}

fn write_fixed(out: &mut BoundedWriter<'_>, magnitude: f64, rendered: usize, trailing: usize, point: &[u8]) {
    out.emit(format_args!("{magnitude:.rendered$}"));
    out.repeat(b'0', trailing);
    out.push(point);
}

fn parse_number(spec: &[u8], pos: &mut usize) -> Option<usize> {
    let start = *pos;
    let mut value: usize = 0;
    while let Some(&b) = spec.get(*pos).filter(|b| b.is_ascii_digit()) {
        value = value.saturating_mul(10).saturating_add(usize::from(b - b'0'));
        *pos += 1;
    }
    (*pos > start).then_some(value)
}

fn render_digits(scratch: &mut [u8; 22], mut value: u64, radix: u64, upper: bool) -> &[u8] {
    let table: &[u8; 16] = if upper {
        b"0123456789ABCDEF"
    } else {
        b"0123456789abcdef"
    };
    let mut start = scratch.len();
    loop {
        start -= 1;
        scratch[start] = table[(value % radix) as usize];
        value /= radix;
        if value == 0 {
            break;
        }
    }
    &scratch[start..]
}

// =============================================================================
// C entry point
// =============================================================================

/// Bounded formatting hook.
///
/// Returns the length the complete output needs (excluding the NUL), so a
/// return value `>= capacity` signals truncation. Returns -1 for a malformed
/// format, a missing or mismatched argument, a width or precision beyond
/// `INT_MAX`, or a length beyond `int`.
///
/// # Safety
///
/// - `buf` must be null or valid for writes of `capacity` bytes; null or a
///   zero capacity means nothing is written.
/// - `fmt` must be null or a NUL-terminated string.
/// - `args` must be null or point to `nargs` initialized arguments whose
///   string pointers are null or NUL-terminated.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn nkhost_snprintf(
    buf: *mut c_char,
    capacity: usize,
    fmt: *const c_char,
    args: *const FormatArg,
    nargs: usize,
) -> c_int {
    let out: &mut [u8] = if buf.is_null() || capacity == 0 {
        &mut []
    } else {
        unsafe { core::slice::from_raw_parts_mut(buf.cast::<u8>(), capacity) }
    };

    if fmt.is_null() {
        BoundedWriter::new(out).finish();
        return -1;
    }
    let spec = unsafe { CStr::from_ptr(fmt) }.to_bytes();

    let raw_args: &[FormatArg] = if args.is_null() || nargs == 0 {
        &[]
    } else {
        unsafe { core::slice::from_raw_parts(args, nargs) }
    };
    let decoded: Result<Vec<Arg<'_>>, FormatError> = raw_args
        .iter()
        .enumerate()
        .map(|(index, raw)| unsafe { Arg::from_raw(raw, index) })
        .collect();
    let args = match decoded {
        Ok(args) => args,
        Err(error) => {
            BoundedWriter::new(out).finish();
            tracing::debug!(%error, "bounded format rejected");
            return -1;
        }
    };

    match safe_format(out, spec, &args) {
        Ok(formatted) => c_int::try_from(formatted.required).unwrap_or(-1),
        Err(error) => {
            tracing::debug!(%error, "bounded format rejected");
            -1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(spec: &str, args: &[Arg<'_>]) -> String {
        let mut buf = [0u8; 128];
        let formatted = safe_format(&mut buf, spec.as_bytes(), args).expect("format succeeds");
        assert!(!formatted.truncated());
        String::from_utf8(buf[..formatted.written].to_vec()).unwrap()
    }

    #[test]
    fn truncates_within_capacity_and_signals_it() {
        let mut buf = [0xAAu8; 8];
        let formatted = safe_format(&mut buf[..5], b"%s", &["hello world".into()]).unwrap();
        assert_eq!(&buf[..5], b"hell\0");
        assert!(buf[5..].iter().all(|&b| b == 0xAA));
        assert_eq!(
            formatted,
            Formatted {
                written: 4,
                required: 11
            }
        );
        assert!(formatted.truncated());
    }

    #[test]
    fn zero_capacity_writes_nothing() {
        let mut buf = [0xAAu8; 4];
        let formatted = safe_format(&mut buf[..0], b"%s", &["hello world".into()]).unwrap();
        assert_eq!(buf, [0xAA; 4]);
        assert_eq!(formatted.written, 0);
        assert_eq!(formatted.required, 11);
        assert!(formatted.truncated());
    }

    #[test]
    fn exact_fit_leaves_room_for_terminator() {
        let mut buf = [0xAAu8; 6];
        let formatted = safe_format(&mut buf, b"hello", &[]).unwrap();
        assert_eq!(&buf, b"hello\0");
        assert!(!formatted.truncated());
    }

    #[test]
    fn signed_integers() {
        let args: [Arg<'_>; 6] = [42.into(); 6];
        assert_eq!(
            render("%d|%5d|%-5d|%05d|%+d|% d", &args),
            "42|   42|42   |00042|+42| 42"
        );
        assert_eq!(render("%i %d", &[(-7).into(), Arg::Int(i64::MIN)]), "-7 -9223372036854775808");
        assert_eq!(render("%05d", &[(-42).into()]), "-0042");
    }

    #[test]
    fn unsigned_radixes() {
        let args: [Arg<'_>; 5] = [
            255u32.into(),
            255u32.into(),
            255u32.into(),
            8u32.into(),
            8u32.into(),
        ];
        assert_eq!(render("%x %X %#x %o %#o", &args), "ff FF 0xff 10 010");
        assert_eq!(render("%u", &[Arg::Uint(u64::MAX)]), "18446744073709551615");
        assert_eq!(render("%#x", &[0u32.into()]), "0");
    }

    #[test]
    fn integer_precision() {
        assert_eq!(render("%.3d", &[7.into()]), "007");
        assert_eq!(render("[%.0d]", &[0.into()]), "[]");
        assert_eq!(render("%6.3x", &[10u32.into()]), "   00a");
        assert_eq!(render("%06.3d", &[5.into()]), "   005");
    }

    #[test]
    fn floats() {
        assert_eq!(render("%f", &[1.5.into()]), "1.500000");
        assert_eq!(render("%8.3f", &[3.14159.into()]), "   3.142");
        assert_eq!(render("%-8.2f|", &[2.5.into()]), "2.50    |");
        assert_eq!(render("%05.1f", &[(-2.3).into()]), "-02.3");
        assert_eq!(render("%+.1f", &[0.26f32.into()]), "+0.3");
        assert_eq!(render("%#.0f", &[3.0.into()]), "3.");
        assert_eq!(render("%.*f", &[2.into(), (1.0f64 / 3.0).into()]), "0.33");
    }

    #[test]
    fn non_finite_floats() {
        let args: [Arg<'_>; 3] = [
            f64::INFINITY.into(),
            f64::NAN.into(),
            f64::NEG_INFINITY.into(),
        ];
        assert_eq!(render("%f %F %5f", &args), "inf NAN  -inf");
    }

    #[test]
    fn strings_and_chars() {
        assert_eq!(render("%c%c", &[Arg::Char(b'o'), Arg::Char(b'k')]), "ok");
        assert_eq!(render("%.3s", &["abcdef".into()]), "abc");
        assert_eq!(render("%5s|%-4s|", &["ab".into(), "cd".into()]), "   ab|cd  |");
        assert_eq!(render("%s", &[Arg::Str(None)]), "(null)");
    }

    #[test]
    fn star_width_and_literal_percent() {
        assert_eq!(render("%*d", &[6.into(), 42.into()]), "    42");
        assert_eq!(render("%*d|", &[(-4).into(), 7.into()]), "7   |");
        assert_eq!(render("100%%", &[]), "100%");
    }

    #[test]
    fn length_modifiers_are_ignored() {
        let args: [Arg<'_>; 4] = [1.into(), 2.into(), 3usize.into(), 4.into()];
        assert_eq!(render("%ld %lld %zu %hhd", &args), "1 2 3 4");
    }

    #[test]
    fn errors_are_reported() {
        let mut buf = [0u8; 16];
        assert_eq!(
            safe_format(&mut buf, b"%d", &[]),
            Err(FormatError::MissingArgument { offset: 0 })
        );
        assert_eq!(
            safe_format(&mut buf, b"%s", &[1.into()]),
            Err(FormatError::ArgumentMismatch {
                index: 0,
                conversion: 's'
            })
        );
        assert_eq!(
            safe_format(&mut buf, b"x%q", &[]),
            Err(FormatError::UnsupportedConversion {
                offset: 1,
                conversion: 'q'
            })
        );
        assert_eq!(
            safe_format(&mut buf, b"abc%", &[]),
            Err(FormatError::TruncatedDirective { offset: 3 })
        );
    }

    #[test]
    fn error_leaves_terminated_prefix() {
        let mut buf = [0xAAu8; 8];
        assert!(safe_format(&mut buf, b"ab%d", &[]).is_err());
        assert_eq!(&buf[..3], b"ab\0");
    }

    #[test]
    fn rust_format_args_are_bounded() {
        let mut buf = [0xAAu8; 4];
        let formatted = format_into(&mut buf, format_args!("{}-{}", 12, "ab"));
        assert_eq!(&buf, b"12-\0");
        assert_eq!(formatted.required, 5);
        assert!(formatted.truncated());
    }

    #[test]
    fn precision_beyond_float_formatter_limit() {
        let mut buf = [0u8; 16];
        let formatted = safe_format(&mut buf, b"%.70000f", &[Arg::Double(1.0)]).unwrap();
        assert_eq!(formatted.required, 70_002);
        assert_eq!(&buf, b"1.0000000000000\0");

        let mut tail = vec![0u8; 70_004];
        let formatted = safe_format(&mut tail, b"%.*f|", &[70_000.into(), Arg::Double(0.5)]).unwrap();
        assert!(!formatted.truncated());
        assert_eq!(&tail[..3], b"0.5");
        assert!(tail[3..70_002].iter().all(|&b| b == b'0'));
        assert_eq!(&tail[70_002..], b"|\0");
    }

    #[test]
    fn long_integer_precision_is_counted() {
        let mut buf = [0u8; 8];
        let formatted = safe_format(&mut buf, b"%+.70000d", &[7.into()]).unwrap();
        assert_eq!(formatted.required, 70_001);
        assert_eq!(&buf, b"+000000\0");
    }

    #[test]
    fn fields_beyond_int_max_are_rejected() {
        let mut buf = [0xAAu8; 8];
        assert_eq!(
            safe_format(&mut buf, b"%+.99999999999999999999d", &[1.into()]),
            Err(FormatError::FieldOverflow { offset: 0 })
        );
        assert_eq!(buf[0], 0);
        assert_eq!(
            safe_format(&mut buf, b"ab%3000000000s", &["x".into()]),
            Err(FormatError::FieldOverflow { offset: 2 })
        );
        assert_eq!(
            safe_format(&mut buf, b"%*d", &[Arg::Int(i64::MIN), 1.into()]),
            Err(FormatError::FieldOverflow { offset: 0 })
        );
    }

    #[test]
    fn huge_width_only_counts() {
        let mut buf = [0u8; 4];
        let formatted = safe_format(&mut buf, b"%100000d", &[1.into()]).unwrap();
        assert_eq!(formatted.required, 100_000);
        assert_eq!(&buf, b"   \0");
    }
}
