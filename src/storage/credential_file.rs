use thiserror::Error;
use tracing::debug;

use crate::core::policy::PinLength;
use crate::crypto::pin_hash::PinHasher;
use crate::error::{PinGateError, Result};
use crate::storage::format::{
    Digest, DIGEST_SIZE, HASH_OFFSET, LENGTH_HASH_OFFSET, MAGIC, PIN_FILE, RECORD_SIZE,
    VERSION_MAJOR, VERSION_MINOR,
};
use crate::storage::BlockStorage;

/// Enrolled PIN record as persisted on storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    /// Digest of the canonical length block; a device and length test vector.
    pub length_hash: Digest,
    /// Digest of the zero-padded symbol block.
    pub hash: Digest,
}

/// Why a stored record was not accepted.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormatInvalid {
    #[error("short read: {0} bytes")]
    ShortRead(usize),

    #[error("invalid magic bytes")]
    BadMagic,

    #[error("unsupported version {major}.{minor}")]
    UnsupportedVersion { major: u8, minor: u8 },
}

impl Credential {
    pub fn encode(&self) -> [u8; RECORD_SIZE] {
        let mut data = [0u8; RECORD_SIZE];
        data[..4].copy_from_slice(MAGIC);
        data[4] = VERSION_MAJOR;
        data[5] = VERSION_MINOR;
        data[LENGTH_HASH_OFFSET..HASH_OFFSET].copy_from_slice(&self.length_hash);
        data[HASH_OFFSET..RECORD_SIZE].copy_from_slice(&self.hash);
        data
    }

    /// Parse a record, rejecting short data and foreign magic or versions.
    /// Bytes past the record are ignored.
    pub fn decode(data: &[u8]) -> std::result::Result<Self, FormatInvalid> {
        if data.len() < RECORD_SIZE {
            return Err(FormatInvalid::ShortRead(data.len()));
        }
        if &data[..4] != MAGIC {
            return Err(FormatInvalid::BadMagic);
        }
        let (major, minor) = (data[4], data[5]);
        if major != VERSION_MAJOR || minor != VERSION_MINOR {
            return Err(FormatInvalid::UnsupportedVersion { major, minor });
        }

        let mut length_hash = [0u8; DIGEST_SIZE];
        length_hash.copy_from_slice(&data[LENGTH_HASH_OFFSET..HASH_OFFSET]);
        let mut hash = [0u8; DIGEST_SIZE];
        hash.copy_from_slice(&data[HASH_OFFSET..RECORD_SIZE]);
        Ok(Self { length_hash, hash })
    }
}

/// Reads and writes the credential record through a [`BlockStorage`].
pub struct CredentialStore<S> {
    storage: S,
}

impl<S: BlockStorage> CredentialStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Persist a new credential for `length`, replacing any previous one.
    pub fn save(
        &mut self,
        length: PinLength,
        symbol_digest: Digest,
        hasher: &impl PinHasher,
    ) -> Result<()> {
        let credential = Credential {
            length_hash: hasher.hash_block(&length.block())?,
            hash: symbol_digest,
        };
        let data = credential.encode();

        let written = self
            .storage
            .write_file(PIN_FILE, &data)
            .map_err(PinGateError::CredentialWrite)?;
        if written != RECORD_SIZE {
            return Err(PinGateError::StorageWrite {
                expected: RECORD_SIZE,
                written,
            });
        }
        Ok(())
    }

    /// Load the credential. `None` means absent: missing, unreadable, short
    /// or foreign records are all treated the same.
    pub fn load(&self) -> Option<Credential> {
        let data = match self.storage.read_file(PIN_FILE, RECORD_SIZE) {
            Ok(data) => data,
            Err(e) => {
                debug!(error = %e, "no readable credential");
                return None;
            }
        };
        match Credential::decode(&data) {
            Ok(credential) => Some(credential),
            Err(reason) => {
                debug!(%reason, "credential rejected");
                None
            }
        }
    }
}
