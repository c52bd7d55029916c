/// Magic bytes identifying a PIN credential file: "PINF"
pub const MAGIC: &[u8; 4] = b"PINF";

/// Current credential format version.
pub const VERSION_MAJOR: u8 = 1;
pub const VERSION_MINOR: u8 = 3;

/// Width of the buffer handed to the hash primitive.
pub const PIN_BLOCK_SIZE: usize = 16;

/// Width of a digest produced by the hash primitive.
pub const DIGEST_SIZE: usize = 32;

pub type PinBlock = [u8; PIN_BLOCK_SIZE];
pub type Digest = [u8; DIGEST_SIZE];

pub const LENGTH_HASH_OFFSET: usize = 6;
pub const HASH_OFFSET: usize = LENGTH_HASH_OFFSET + DIGEST_SIZE;

/// Record size: magic(4) + major(1) + minor(1) + length_hash(32) + hash(32).
pub const RECORD_SIZE: usize = HASH_OFFSET + DIGEST_SIZE;

/// Credential file name inside the storage root.
pub const PIN_FILE: &str = "pin.bin";

/// Optional operator reminder shown above the verify prompt.
pub const MESSAGE_FILE: &str = "pinmessage.txt";

/// Longest operator message read from [`MESSAGE_FILE`].
pub const MESSAGE_MAX_LEN: usize = 800;

/// Device secret file name inside the storage root.
pub const DEVICE_KEY_FILE: &str = "device.key";
