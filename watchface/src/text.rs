//! Fixed-capacity text buffers

use core::fmt::{self, Write};

use heapless::String;

/// Writer that keeps what fits and silently drops the rest, cutting on a char boundary.
struct Truncating<'a, const N: usize> {
    buf: &'a mut String<N>,
    full: bool,
}

impl<const N: usize> Write for Truncating<'_, N> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for c in s.chars() {
            if self.full || self.buf.push(c).is_err() {
                self.full = true;
                break;
            }
        }
        Ok(())
    }
}

/// Format into a buffer of `N` bytes, truncating like `snprintf` would.
pub fn format<const N: usize>(args: fmt::Arguments) -> String<N> {
    let mut buf = String::new();
    let mut writer = Truncating {
        buf: &mut buf,
        full: false,
    };
    // Truncating never reports an error.
    let _ = writer.write_fmt(args);
    buf
}

/// Copy as much of `s` as fits into `N` bytes.
pub fn truncated<const N: usize>(s: &str) -> String<N> {
    format(format_args!("{}", s))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_short_text() {
        let s: String<8> = format(format_args!("{:02}:{:02}", 7, 5));
        assert_eq!(s.as_str(), "07:05");
    }

    #[test]
    fn truncates_on_char_boundary() {
        // "°" is two bytes; it must not be split.
        let s: String<4> = truncated("-12°C");
        assert_eq!(s.as_str(), "-12");
    }

    #[test]
    fn stops_after_first_overflow() {
        let s: String<5> = format(format_args!("{}{}", "abcd", "éf"));
        assert_eq!(s.as_str(), "abcd");
    }
}
