//! Decoder for the base64 XDR `ScVal`s Soroban RPC returns as event topics
//! when the server is not asked for JSON output.
//!
//! Only the scalar shapes the crowdfund ledger publishes in topics are
//! surfaced: symbols, strings, `u32`, `u64` and `i128`. Anything else is
//! reported as `None` so callers can fall back to the raw text.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use stellar_xdr::curr::{Limits, ReadXdr, ScVal};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScalarVal {
    Symbol(String),
    Str(String),
    U32(u32),
    U64(u64),
    I128(i128),
}

impl ScalarVal {
    /// Render the value the way it is stored in the database.
    pub fn to_db_string(&self) -> String {
        match self {
            Self::Symbol(s) | Self::Str(s) => s.clone(),
            Self::U32(n) => n.to_string(),
            Self::U64(n) => n.to_string(),
            Self::I128(n) => n.to_string(),
        }
    }
}

/// Decode a base64 XDR-encoded `ScVal` of one of the supported scalar kinds.
///
/// Trailing bytes after the value are rejected by the XDR reader.
pub fn decode_scalar(encoded: &str) -> Option<ScalarVal> {
    let value = ScVal::from_xdr_base64(encoded.trim(), Limits::none()).ok()?;

    match value {
        ScVal::U32(n) => Some(ScalarVal::U32(n)),
        ScVal::U64(n) => Some(ScalarVal::U64(n)),
        ScVal::I128(parts) => Some(ScalarVal::I128(
            (i128::from(parts.hi) << 64) | i128::from(parts.lo),
        )),
        ScVal::Symbol(sym) => sym.0.to_utf8_string().ok().map(ScalarVal::Symbol),
        ScVal::String(s) => s.0.to_utf8_string().ok().map(ScalarVal::Str),
        _ => None,
    }
}

/// Hex rendering of a base64 payload, for topics we cannot decode.
pub fn raw_hex(encoded: &str) -> Option<String> {
    STANDARD.decode(encoded.trim()).ok().map(hex::encode)
}
