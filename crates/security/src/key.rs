//! Key material and formatting
//!
//! The engine's key-set primitive accepts two byte forms:
//!
//! | Material | Bytes handed to the engine |
//! |----------|----------------------------|
//! | Passphrase | UTF-8 bytes of the passphrase, no terminator; the engine derives the key |
//! | Raw bytes | ASCII literal `x'<hex>'`: lowercase, two digits per byte, quoted |
//!
//! The `x'...'` literal tells the engine to use the bytes directly and skip
//! derivation. Any other casing, padding or quoting changes its meaning.
//!
//! Formatted raw keys are built in a [`ScratchBuffer`] owned by the
//! [`KeyFormatter`] and zeroed after every call, whether the engine call
//! succeeded or not.

use crate::engine::EngineError;
use crate::error::KeyError;
use crate::wipe::{ScratchBuffer, VolatileWipe, Wipe};
use std::fmt;
use tracing::error;

/// Key material for one key-set or rekey call
#[derive(Clone, Copy)]
pub enum KeyMaterial<'a> {
    /// Human passphrase; the engine applies key derivation
    Passphrase(&'a str),
    /// Raw key bytes used verbatim
    Raw(&'a [u8]),
}

impl KeyMaterial<'_> {
    /// Form name (for logging; never the key itself)
    pub fn form(&self) -> &'static str {
        match self {
            KeyMaterial::Passphrase(_) => "passphrase",
            KeyMaterial::Raw(_) => "raw",
        }
    }

    /// Length of the bytes handed to the engine
    pub fn formatted_len(&self) -> usize {
        match self {
            KeyMaterial::Passphrase(p) => p.len(),
            KeyMaterial::Raw(raw) => hex_literal_len(raw.len()),
        }
    }
}

impl fmt::Debug for KeyMaterial<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyMaterial::Passphrase(_) => f.write_str("Passphrase(..)"),
            KeyMaterial::Raw(raw) => write!(f, "Raw({} bytes)", raw.len()),
        }
    }
}

impl<'a> From<&'a str> for KeyMaterial<'a> {
    fn from(passphrase: &'a str) -> Self {
        KeyMaterial::Passphrase(passphrase)
    }
}

impl<'a> From<&'a [u8]> for KeyMaterial<'a> {
    fn from(raw: &'a [u8]) -> Self {
        KeyMaterial::Raw(raw)
    }
}

/// Length of the `x'..'` literal for `raw_len` key bytes
pub const fn hex_literal_len(raw_len: usize) -> usize {
    raw_len * 2 + 3
}

/// Write the `x'..'` literal for `raw` into `out`
///
/// `out` must be exactly [`hex_literal_len`]`(raw.len())` bytes.
pub fn write_hex_literal(raw: &[u8], out: &mut [u8]) -> Result<(), KeyError> {
    let len = hex_literal_len(raw.len());
    if out.len() != len {
        return Err(KeyError::Format(format!(
            "hex literal needs {len} bytes, buffer has {}",
            out.len()
        )));
    }
    out[0] = b'x';
    out[1] = b'\'';
    hex::encode_to_slice(raw, &mut out[2..len - 1]).map_err(|e| KeyError::Format(e.to_string()))?;
    out[len - 1] = b'\'';
    Ok(())
}

/// Length of `bytes` as a single-quoted SQL string literal
pub fn sql_quoted_len(bytes: &[u8]) -> usize {
    bytes.len() + bytes.iter().filter(|b| **b == b'\'').count() + 2
}

/// `prefix || 'key' || suffix` in a fresh scratch buffer, quotes doubled
pub fn quoted_statement(prefix: &str, key: &[u8], suffix: &str) -> ScratchBuffer {
    let mut scratch = ScratchBuffer::zeroed(prefix.len() + sql_quoted_len(key) + suffix.len());
    let out = scratch.as_mut_bytes();
    out[..prefix.len()].copy_from_slice(prefix.as_bytes());
    let at = write_sql_quoted(key, out, prefix.len());
    out[at..].copy_from_slice(suffix.as_bytes());
    scratch
}

// Writes `bytes` as a single-quoted SQL string literal at `out[at..]`,
// returning the position after the closing quote.
fn write_sql_quoted(bytes: &[u8], out: &mut [u8], mut at: usize) -> usize {
    out[at] = b'\'';
    at += 1;
    for &b in bytes {
        out[at] = b;
        at += 1;
        if b == b'\'' {
            out[at] = b'\'';
            at += 1;
        }
    }
    out[at] = b'\'';
    at + 1
}

/// Formats key material and guarantees the scratch wipe
pub struct KeyFormatter<W: Wipe = VolatileWipe> {
    wiper: W,
    scratch: ScratchBuffer,
}

impl KeyFormatter {
    /// Formatter using volatile-write wiping
    pub fn new() -> Self {
        Self::with_wiper(VolatileWipe)
    }
}

impl Default for KeyFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Wipe> KeyFormatter<W> {
    /// Formatter using a custom wipe strategy
    pub fn with_wiper(wiper: W) -> Self {
        Self {
            wiper,
            scratch: ScratchBuffer::default(),
        }
    }

    /// Backing bytes of the most recent scratch buffer
    pub fn scratch(&self) -> &[u8] {
        self.scratch.as_bytes()
    }

    /// Format `key` and hand the bytes to `call`, then wipe the scratch
    ///
    /// A wipe failure is returned even when `call` succeeded.
    pub fn apply<T, F>(&mut self, key: KeyMaterial<'_>, call: F) -> Result<T, KeyError>
    where
        F: FnOnce(&[u8]) -> Result<T, EngineError>,
    {
        match key {
            KeyMaterial::Passphrase(passphrase) => call(passphrase.as_bytes()).map_err(KeyError::from),
            KeyMaterial::Raw(raw) => {
                self.scratch = ScratchBuffer::zeroed(hex_literal_len(raw.len()));
                let result = write_hex_literal(raw, self.scratch.as_mut_bytes())
                    .and_then(|()| call(self.scratch.as_bytes()).map_err(KeyError::from));
                let wiped = self.scratch.wipe_with(&self.wiper);
                settle(result, wiped)
            }
        }
    }

    /// Build `prefix || 'key' || suffix` and hand the statement to `call`
    ///
    /// The key appears as a quoted SQL string literal: the passphrase itself,
    /// or the `x'..'` literal for raw bytes. Every buffer holding key bytes is
    /// wiped afterwards.
    pub fn apply_in_statement<T, F>(
        &mut self,
        key: KeyMaterial<'_>,
        prefix: &str,
        suffix: &str,
        call: F,
    ) -> Result<T, KeyError>
    where
        F: FnOnce(&str) -> Result<T, EngineError>,
    {
        let mut literal = ScratchBuffer::zeroed(match key {
            KeyMaterial::Passphrase(_) => 0,
            KeyMaterial::Raw(raw) => hex_literal_len(raw.len()),
        });

        let result = self.build_statement(key, &mut literal, prefix, suffix).and_then(|()| {
            let sql = std::str::from_utf8(self.scratch.as_bytes())
                .map_err(|e| KeyError::Format(e.to_string()))?;
            call(sql).map_err(KeyError::from)
        });

        let wiped_literal = literal.wipe_with(&self.wiper);
        let wiped = self.scratch.wipe_with(&self.wiper).and(wiped_literal);
        settle(result, wiped)
    }

    fn build_statement(
        &mut self,
        key: KeyMaterial<'_>,
        literal: &mut ScratchBuffer,
        prefix: &str,
        suffix: &str,
    ) -> Result<(), KeyError> {
        let key_bytes: &[u8] = match key {
            KeyMaterial::Passphrase(passphrase) => passphrase.as_bytes(),
            KeyMaterial::Raw(raw) => {
                write_hex_literal(raw, literal.as_mut_bytes())?;
                literal.as_bytes()
            }
        };

        self.scratch = quoted_statement(prefix, key_bytes, suffix);
        Ok(())
    }
}

/// Combine a call result with the wipe of the buffer it used
///
/// A failed wipe replaces any call outcome; a call error it hides is logged.
pub fn settle<T>(result: Result<T, KeyError>, wiped: Result<(), KeyError>) -> Result<T, KeyError> {
    match (result, wiped) {
        (result, Ok(())) => result,
        (Ok(_), Err(wipe)) => {
            error!(error = %wipe, "key scratch wipe failed after successful engine call");
            Err(wipe)
        }
        (Err(call), Err(wipe)) => {
            error!(error = %wipe, call_error = %call, "key scratch wipe failed after engine error");
            Err(wipe)
        }
    }
}

impl<W: Wipe> fmt::Debug for KeyFormatter<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyFormatter")
            .field("scratch", &self.scratch)
            .finish_non_exhaustive()
    }
}
