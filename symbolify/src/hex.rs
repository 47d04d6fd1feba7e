//! Hexadecimal token recognition
//!
//! Disassemblers print addresses as lowercase hex without a prefix, logs print
//! them with or without `0x`. Both the disassembly parser and the annotator
//! build on the patterns here so they agree on what a hex number is.

/// Lowercase hex digits, as emitted by `objdump`.
pub const HEX_DIGITS: &str = "[0-9a-f]+";

static_regex!(bytes HEX_TOKEN, "(?:0x)?([0-9a-f]+)");

/// Iterate over the hex tokens of `line`, left to right, without their `0x`
/// prefix.
///
/// Matches never overlap. A repeated token is yielded once per occurrence.
pub fn hex_tokens(line: &[u8]) -> impl Iterator<Item = &[u8]> + '_ {
    HEX_TOKEN
        .captures_iter(line)
        .filter_map(|captures| captures.get(1))
        .map(|digits| digits.as_bytes())
}

/// Parse an address key such as `00001000` or `ffff000040081004`.
#[must_use]
pub fn parse_address(key: &str) -> Option<u64> {
    if key.is_empty() || !key.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u64::from_str_radix(key, 16).ok()
}

/// Render an address the way `objdump` does: lowercase, no prefix, no padding.
#[must_use]
pub fn format_address(addr: u64) -> String {
    format!("{addr:x}")
}
