use std::fmt;

/// Hex formatter for arbitrary bytes.
///
/// - `Display` (`{}`) prints lowercase hex without `0x` prefix.
/// - `LowerHex` with alternate form (`{:#x}`) prints lowercase hex with `0x` prefix.
#[derive(Clone, Copy)]
pub struct HexBytes<'a>(pub &'a [u8]);

pub fn hx(bytes: &[u8]) -> HexBytes<'_> {
    HexBytes(bytes)
}

fn fmt_lower_hex_bytes(bytes: &[u8], f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if f.alternate() {
        f.write_str("0x")?;
    }
    f.write_str(&hex::encode(bytes))
}

impl fmt::Display for HexBytes<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_lower_hex_bytes(self.0, f)
    }
}

impl fmt::LowerHex for HexBytes<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_lower_hex_bytes(self.0, f)
    }
}

/// Short `0x1234..abcd` form for log lines that carry whole signatures.
pub fn short_hex(bytes: &[u8]) -> String {
    if bytes.len() <= 8 {
        return format!("{:#x}", hx(bytes));
    }
    format!("{:#x}..{}", hx(&bytes[..4]), hx(&bytes[bytes.len() - 4..]))
}
