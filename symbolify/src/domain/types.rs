//! Core domain types
//!
//! Newtypes keep a load offset from being mixed up with an address, and
//! [`SymbolEntry`] owns the one display format used in annotations.

use std::fmt;
use std::str::FromStr;

use super::errors::SymbolifyError;

/// Signed distance between where a binary runs and where it was disassembled
///
/// `runtime address = disassembly address + offset`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct LoadOffset(pub i64);

impl LoadOffset {
    /// Shift a disassembly address into the runtime address space.
    ///
    /// Returns `None` when the result would leave the 64-bit address space.
    #[must_use]
    pub fn apply(self, addr: u64) -> Option<u64> {
        addr.checked_add_signed(self.0)
    }

    #[must_use]
    pub fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl FromStr for LoadOffset {
    type Err = SymbolifyError;

    /// Parse `1000`, `0x1000`, `-0x1000` or a full-width two's-complement
    /// value such as `ffffffffffff0000`. The value is always hexadecimal.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || SymbolifyError::InvalidOffset(s.to_string());

        let trimmed = s.trim();
        let (negative, rest) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
        };
        let digits =
            rest.strip_prefix("0x").or_else(|| rest.strip_prefix("0X")).unwrap_or(rest);

        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let magnitude = u64::from_str_radix(digits, 16).map_err(|_| invalid())?;

        let value = if negative {
            0i64.checked_sub_unsigned(magnitude).ok_or_else(invalid)?
        } else {
            // Values with the top bit set are two's-complement negatives.
            i64::from_ne_bytes(magnitude.to_ne_bytes())
        };
        Ok(Self(value))
    }
}

impl fmt::Display for LoadOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 < 0 {
            write!(f, "-0x{:x}", self.0.unsigned_abs())
        } else {
            write!(f, "0x{:x}", self.0)
        }
    }
}

/// What an address resolves to
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SymbolEntry {
    /// The address starts a function: displayed as the bare name.
    Label(String),
    /// The `ordinal`-th instruction after the most recent label: displayed as
    /// `function+ordinal`. The ordinal counts instructions, not bytes.
    Instruction { function: String, ordinal: usize },
}

impl fmt::Display for SymbolEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Label(name) => f.write_str(name),
            Self::Instruction { function, ordinal } => write!(f, "{function}+{ordinal}"),
        }
    }
}
