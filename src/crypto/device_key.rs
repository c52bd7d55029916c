use std::io;

use rand::RngCore;
use secrecy::{ExposeSecret, SecretBox};
use tracing::info;

use crate::error::{PinGateError, Result};
use crate::storage::format::DEVICE_KEY_FILE;
use crate::storage::BlockStorage;

pub const DEVICE_SECRET_LENGTH: usize = 32;

pub type DeviceSecret = SecretBox<[u8; DEVICE_SECRET_LENGTH]>;

pub fn generate_secret() -> DeviceSecret {
    let mut secret = Box::new([0u8; DEVICE_SECRET_LENGTH]);
    rand::thread_rng().fill_bytes(&mut secret[..]);
    SecretBox::new(secret)
}

/// Read the device secret, creating one on first use.
pub fn load_or_create(storage: &mut impl BlockStorage) -> Result<DeviceSecret> {
    match storage.read_file(DEVICE_KEY_FILE, DEVICE_SECRET_LENGTH + 1) {
        Ok(data) => {
            let bytes: [u8; DEVICE_SECRET_LENGTH] =
                data.as_slice().try_into().map_err(|_| PinGateError::DeviceKey {
                    reason: format!("expected {DEVICE_SECRET_LENGTH} bytes, found {}", data.len()),
                })?;
            Ok(SecretBox::new(Box::new(bytes)))
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            let secret = generate_secret();
            let written = storage.write_file(DEVICE_KEY_FILE, secret.expose_secret())?;
            if written != DEVICE_SECRET_LENGTH {
                return Err(PinGateError::DeviceKey {
                    reason: format!("short write ({written} bytes)"),
                });
            }
            info!("generated new device secret");
            Ok(secret)
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
pub(crate) fn secret_from_bytes(bytes: [u8; DEVICE_SECRET_LENGTH]) -> DeviceSecret {
    SecretBox::new(Box::new(bytes))
}
