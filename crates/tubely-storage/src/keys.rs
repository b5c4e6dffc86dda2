//! Shared key generation for storage backends.
//!
//! Key format: `{class}/{token}.mp4`, where the class prefix is the aspect classification
//! of the video and the token is 32 bytes from the OS CSPRNG, URL-safe base64 encoded
//! without padding (43 characters, never `/`, `+` or `=`).

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::RngCore;
use tubely_core::constants::ACCEPTED_VIDEO_EXTENSION;
use tubely_core::AspectClass;

const TOKEN_BYTES: usize = 32;

/// Generate a random, URL-safe token.
pub fn random_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Generate a storage key for a video of the given aspect class.
///
/// There is no collision check: with 256 bits of randomness a collision is not a
/// practical concern.
pub fn generate_storage_key(class: AspectClass) -> String {
    format!(
        "{}/{}.{}",
        class.as_str(),
        random_token(),
        ACCEPTED_VIDEO_EXTENSION
    )
}
