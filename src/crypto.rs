//! Key derivation and the per-block stream cipher.
//!
//! The key is scrypt(passphrase, salt) where the salt is
//! `LE32(scene_id) || version || base_url`. Every block of the container is
//! then XORed with a ChaCha20 keystream whose nonce carries the block id.

use chacha20::cipher::generic_array::GenericArray;
use chacha20::cipher::{KeyIvInit, StreamCipher};
use chacha20::ChaCha20Legacy as ChaCha20;
use scrypt::Params;

use crate::config::{KdfParams, Passphrase};
use crate::error::{AsvrError, Result};

/// Block id of the header + sizes table region.
pub const HEADER_BLOCK_ID: u32 = 0xFFFF_FFFF;

/// Length of the derived key in bytes
pub const KEY_LEN: usize = 32;

/// 32-byte symmetric key produced by [`derive_key`].
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct DerivedKey([u8; KEY_LEN]);

impl DerivedKey {
    pub const fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("DerivedKey(..)")
    }
}

/// Scene metadata supplied by the catalog; the three inputs of the salt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneMetadata {
    pub scene_id: u32,
    /// Raw version bytes, e.g. `b"1.5.0"`. Not re-encoded.
    pub version: Vec<u8>,
    /// Raw base URL bytes, conventionally the container file name.
    pub base_url: Vec<u8>,
}

impl SceneMetadata {
    pub fn new(scene_id: u32, version: impl Into<Vec<u8>>, base_url: impl Into<Vec<u8>>) -> Self {
        Self {
            scene_id,
            version: version.into(),
            base_url: base_url.into(),
        }
    }

    /// `LE32(scene_id) || version || base_url`
    pub fn salt(&self) -> Vec<u8> {
        let mut salt = Vec::with_capacity(4 + self.version.len() + self.base_url.len());
        salt.extend_from_slice(&self.scene_id.to_le_bytes());
        salt.extend_from_slice(&self.version);
        salt.extend_from_slice(&self.base_url);
        salt
    }
}

/// Extract the base-url salt component from a container URL or path.
///
/// The query string is dropped, then everything after the final `/` is kept:
/// `https://cdn/x/pov_mask.asvr?sig=1` gives `pov_mask.asvr`.
pub fn base_url_from_uri(uri: &str) -> &str {
    let path = uri.split_once('?').map_or(uri, |(path, _)| path);
    path.rsplit_once('/').map_or(path, |(_, tail)| tail)
}

fn scrypt_params(params: &KdfParams) -> Result<Params> {
    Params::new(params.log_n, params.r, params.p, KEY_LEN)
        .map_err(|e| AsvrError::CryptoConfig(format!("{e} (log_n={}, r={}, p={})", params.log_n, params.r, params.p)))
}

/// Derive the container key with the embedded passphrase and the binary's cost parameters.
pub fn derive_key(scene_id: u32, version: &[u8], base_url: &[u8]) -> Result<DerivedKey> {
    let meta = SceneMetadata::new(scene_id, version, base_url);
    derive_key_with(&Passphrase::default(), &KdfParams::default(), &meta)
}

/// Derive a key with an explicit passphrase and cost.
pub fn derive_key_with(passphrase: &Passphrase, params: &KdfParams, meta: &SceneMetadata) -> Result<DerivedKey> {
    let params = scrypt_params(params)?;
    let mut key = [0u8; KEY_LEN];
    scrypt::scrypt(passphrase.as_bytes(), &meta.salt(), &params, &mut key)
        .map_err(|e| AsvrError::CryptoConfig(e.to_string()))?;
    Ok(DerivedKey(key))
}

/// Stateless ChaCha20 transform keyed per block.
///
/// The binary feeds a 16-byte IV of `[0; 12] || LE32(block_id)` to ChaCha20
/// with a 64-bit counter, so the counter words are zero and the block id lands
/// in the last nonce word. The legacy (8-byte nonce) variant reproduces that
/// state exactly. There is no MAC: a wrong key or block id yields garbage, not
/// an error.
pub struct BlockCipher;

impl BlockCipher {
    fn nonce(block_id: u32) -> [u8; 8] {
        let mut nonce = [0u8; 8];
        nonce[4..8].copy_from_slice(&block_id.to_le_bytes());
        nonce
    }

    /// XOR `data` in place with the keystream of `block_id`, starting at keystream offset 0.
    pub fn apply_in_place(data: &mut [u8], key: &DerivedKey, block_id: u32) {
        let nonce = Self::nonce(block_id);
        let key_ga = GenericArray::from_slice(key.as_bytes());
        let nonce_ga = GenericArray::from_slice(&nonce);
        let mut cipher = ChaCha20::new(key_ga, nonce_ga);
        cipher.apply_keystream(data);
    }

    /// Decrypt a block. Encryption is the same operation.
    pub fn decrypt(data: &[u8], key: &DerivedKey, block_id: u32) -> Vec<u8> {
        let mut out = data.to_vec();
        Self::apply_in_place(&mut out, key, block_id);
        out
    }

    pub fn encrypt(data: &[u8], key: &DerivedKey, block_id: u32) -> Vec<u8> {
        Self::decrypt(data, key, block_id)
    }
}
