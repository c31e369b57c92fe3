//! Conversion between fingerprint hex strings and raw bytes

use crate::error::{CodecError, Result};

/// Number of raw bytes in a fingerprint
pub const FINGERPRINT_LEN: usize = 16;

/// Number of hex characters in a rendered fingerprint
pub const FINGERPRINT_HEX_LEN: usize = FINGERPRINT_LEN * 2;

/// Decode a 32-character hex fingerprint into its 16 bytes.
///
/// Both lowercase and uppercase digits are accepted. Anything that is not
/// exactly 32 hex digits is rejected with `InvalidFingerprintFormat`.
pub fn to_bytes(hex_str: &str) -> Result<[u8; FINGERPRINT_LEN]> {
    if hex_str.len() % 2 != 0 {
        return Err(invalid(hex_str, format!("odd length {}", hex_str.len())));
    }
    if hex_str.len() != FINGERPRINT_HEX_LEN {
        return Err(invalid(
            hex_str,
            format!("expected {} characters, got {}", FINGERPRINT_HEX_LEN, hex_str.len()),
        ));
    }

    let mut bytes = [0u8; FINGERPRINT_LEN];
    hex::decode_to_slice(hex_str, &mut bytes).map_err(|e| invalid(hex_str, e.to_string()))?;
    Ok(bytes)
}

/// Render 16 fingerprint bytes as 32 lowercase hex characters.
pub fn to_hex(bytes: &[u8; FINGERPRINT_LEN]) -> String {
    hex::encode(bytes)
}

fn invalid(input: &str, reason: String) -> CodecError {
    CodecError::InvalidFingerprintFormat {
        input: input.to_string(),
        reason,
    }
}
