//! Configuration values injected into the decoder.
//!
//! Nothing here is read from a global: the passphrase, the scrypt cost, the
//! strict/lenient policy and the I/O limits are all plain values handed to the
//! component that needs them.

use std::time::Duration;

/// Constant passphrase extracted from the binary (32 bytes)
const EMBEDDED_PASSPHRASE: [u8; 32] = [
    0x90, 0x37, 0x9B, 0x41, 0xBB, 0xFD, 0x51, 0x9D,
    0x7F, 0xA6, 0x8E, 0xEB, 0xAC, 0x34, 0xC9, 0x7A,
    0x12, 0xAF, 0x6E, 0x3B, 0xCD, 0x23, 0x18, 0x8A,
    0x5A, 0x53, 0x64, 0x8F, 0x72, 0xB4, 0x72, 0x71,
];

/// scrypt password used for key derivation.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Passphrase([u8; 32]);

impl Passphrase {
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl Default for Passphrase {
    fn default() -> Self {
        Self(EMBEDDED_PASSPHRASE)
    }
}

impl std::fmt::Debug for Passphrase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Passphrase(..)")
    }
}

/// scrypt cost parameters. The defaults match the binary: N=16384, r=8, p=1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    /// log2(N)
    pub log_n: u8,
    pub r: u32,
    pub p: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self { log_n: 14, r: 8, p: 1 }
    }
}

/// How recoverable per-frame faults are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecodeMode {
    /// Any frame fault is an error (conversion).
    #[default]
    Strict,
    /// Faults are logged and reported per frame, processing continues (inspection).
    Lenient,
}

impl DecodeMode {
    pub fn is_strict(self) -> bool {
        self == DecodeMode::Strict
    }
}

/// Output mask geometry and fill switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub width: u32,
    pub height: u32,
    pub fill: bool,
}

impl RenderOptions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height, fill: true }
    }

    pub fn with_fill(mut self, fill: bool) -> Self {
        self.fill = fill;
        self
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::new(1024, 1024)
    }
}

/// Limits applied at the storage boundary only; decode and render never time out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IoPolicy {
    pub open_timeout: Duration,
    /// Total attempts per read, including the first one.
    pub read_attempts: u32,
    /// Delay before retry `n` is `retry_backoff * n`.
    pub retry_backoff: Duration,
}

impl Default for IoPolicy {
    fn default() -> Self {
        Self {
            open_timeout: Duration::from_secs(30),
            read_attempts: 3,
            retry_backoff: Duration::from_millis(20),
        }
    }
}
