use argon2::{Algorithm, Argon2, Params, Version};
use secrecy::ExposeSecret;
use subtle::ConstantTimeEq;

use crate::crypto::device_key::DeviceSecret;
use crate::error::{PinGateError, Result};
use crate::storage::format::{Digest, PinBlock, DIGEST_SIZE};

/// Turns a fixed-width block into a fixed-width digest.
pub trait PinHasher {
    fn hash_block(&self, block: &PinBlock) -> Result<Digest>;
}

impl<H: PinHasher + ?Sized> PinHasher for &H {
    fn hash_block(&self, block: &PinBlock) -> Result<Digest> {
        (**self).hash_block(block)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct KdfParams {
    pub memory_cost_kib: u32,
    pub time_cost: u32,
    pub parallelism: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            memory_cost_kib: 19456, // 19 MB
            time_cost: 2,
            parallelism: 1,
        }
    }
}

impl KdfParams {
    /// Fast parameters for testing only.
    #[cfg(test)]
    pub fn test_params() -> Self {
        Self {
            memory_cost_kib: 64,
            time_cost: 1,
            parallelism: 1,
        }
    }
}

/// Argon2id keyed by the device secret, so digests only reproduce on the
/// installation that produced them.
pub struct DeviceHasher {
    secret: DeviceSecret,
    argon2: Argon2<'static>,
}

impl DeviceHasher {
    pub fn new(secret: DeviceSecret, params: &KdfParams) -> Result<Self> {
        let argon2_params = Params::new(
            params.memory_cost_kib,
            params.time_cost,
            params.parallelism,
            Some(DIGEST_SIZE),
        )
        .map_err(|e| PinGateError::Kdf(e.to_string()))?;

        Ok(Self {
            secret,
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, argon2_params),
        })
    }
}

impl PinHasher for DeviceHasher {
    fn hash_block(&self, block: &PinBlock) -> Result<Digest> {
        let mut digest = [0u8; DIGEST_SIZE];
        self.argon2
            .hash_password_into(block, self.secret.expose_secret(), &mut digest)
            .map_err(|e| PinGateError::Kdf(e.to_string()))?;
        Ok(digest)
    }
}

/// Constant-time digest equality.
pub fn digests_match(a: &Digest, b: &Digest) -> bool {
    a[..].ct_eq(&b[..]).into()
}
