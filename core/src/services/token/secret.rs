//! Random secret generation for refresh credentials.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use rand::rngs::OsRng;
use rand::RngCore;

/// Number of random bytes in a generated secret (256 bits)
pub const SECRET_BYTES: usize = 32;

/// Generates a fresh single-use credential secret
///
/// Draws from the operating system CSPRNG and encodes URL-safe without
/// padding, so the result never contains the credential delimiter.
pub fn generate_secret() -> String {
    let mut bytes = [0u8; SECRET_BYTES];
    OsRng.fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}
