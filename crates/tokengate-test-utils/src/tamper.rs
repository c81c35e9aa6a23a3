//! Token corruption helpers for tamper-sensitivity tests.

/// Flip one bit of one byte in the signature segment of a token.
///
/// Returns `None` when the flip would not leave an intact signature
/// segment to test: the byte index is out of range, the result is not
/// valid UTF-8 (bit 7 of an ASCII byte), or the flipped byte becomes the
/// `.` segment separator, which changes the token's structure instead of
/// its signature.
pub fn flip_signature_bit(token: &str, byte_index: usize, bit: u8) -> Option<String> {
    let (message, signature) = token.rsplit_once('.')?;

    let mut bytes = signature.as_bytes().to_vec();
    let byte = bytes.get_mut(byte_index)?;
    *byte ^= 1 << bit;
    if *byte == b'.' {
        return None;
    }

    let tampered = String::from_utf8(bytes).ok()?;
    Some(format!("{message}.{tampered}"))
}
