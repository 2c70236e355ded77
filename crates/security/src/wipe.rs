//! Scratch buffers for key bytes
//!
//! Formatted key material lives in a [`ScratchBuffer`] for exactly one engine
//! call. Wiping writes zeros through volatile stores and then reads every byte
//! back; any byte still set is reported as `SecureWipeFailure`.

use crate::error::KeyError;
use std::fmt;
use std::ptr;
use std::sync::atomic::{compiler_fence, Ordering};

/// Strategy for zeroing a byte slice
pub trait Wipe {
    /// Overwrite `bytes` with zeros
    fn zero(&self, bytes: &mut [u8]);
}

/// Zeroes with volatile writes the optimizer cannot elide
#[derive(Debug, Default, Clone, Copy)]
pub struct VolatileWipe;

impl Wipe for VolatileWipe {
    fn zero(&self, bytes: &mut [u8]) {
        for byte in bytes.iter_mut() {
            // SAFETY: `byte` is a valid, aligned, exclusive reference.
            unsafe { ptr::write_volatile(byte, 0) };
        }
        compiler_fence(Ordering::SeqCst);
    }
}

fn nonzero_count(bytes: &[u8]) -> usize {
    bytes
        .iter()
        // SAFETY: `byte` is a valid, aligned reference.
        .map(|byte| unsafe { ptr::read_volatile(byte) })
        .filter(|b| *b != 0)
        .count()
}

/// Fixed-length buffer that is zeroed before release
///
/// The length is fixed at creation so the backing allocation never moves and
/// leaves no stale copy behind.
pub struct ScratchBuffer {
    bytes: Vec<u8>,
}

impl ScratchBuffer {
    /// Allocate `len` zero bytes
    pub fn zeroed(len: usize) -> Self {
        Self {
            bytes: vec![0; len],
        }
    }

    /// Contents
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Mutable contents
    pub fn as_mut_bytes(&mut self) -> &mut [u8] {
        &mut self.bytes
    }

    /// Length in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// True for a zero-length buffer
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Whether every byte is zero
    pub fn is_zeroed(&self) -> bool {
        nonzero_count(&self.bytes) == 0
    }

    /// Zero with `wiper` and verify
    pub fn wipe_with<W: Wipe + ?Sized>(&mut self, wiper: &W) -> Result<(), KeyError> {
        wiper.zero(&mut self.bytes);
        match nonzero_count(&self.bytes) {
            0 => Ok(()),
            remaining => Err(KeyError::SecureWipeFailure { remaining }),
        }
    }

    /// Zero with volatile writes and verify
    pub fn wipe(&mut self) -> Result<(), KeyError> {
        self.wipe_with(&VolatileWipe)
    }
}

impl Default for ScratchBuffer {
    fn default() -> Self {
        Self::zeroed(0)
    }
}

impl Drop for ScratchBuffer {
    fn drop(&mut self) {
        VolatileWipe.zero(&mut self.bytes);
    }
}

impl fmt::Debug for ScratchBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScratchBuffer")
            .field("len", &self.bytes.len())
            .finish_non_exhaustive()
    }
}
