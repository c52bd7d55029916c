pub mod device_key;
pub mod pin_hash;
