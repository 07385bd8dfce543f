//! Display adapters for diagnostic dumps.

use std::fmt;

use axum::http::HeaderMap;

/// Renders a header set one `name: value` per line, in map order.
///
/// Duplicate headers appear once per value.
pub struct HeaderDump<'a>(pub &'a HeaderMap);

impl fmt::Display for HeaderDump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (name, value)) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}: {}", name, BodyText(value.as_bytes()))?;
        }
        Ok(())
    }
}

/// Lossy UTF-8 view of raw bytes.
///
/// Invalid sequences render as U+FFFD. Display only; the bytes on the wire
/// are never touched.
pub struct BodyText<'a>(pub &'a [u8]);

impl fmt::Display for BodyText<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(self.0))
    }
}
