//! Room codes: short strings players type to find a room.
//!
//! Codes use Crockford's Base32 alphabet, which leaves out the letters that
//! are easy to misread (I, L, O, U).

use rand::Rng;

const CROCKFORD: &[u8] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ";

pub const ROOM_CODE_LEN: usize = 6;

/// Generates a random room code of [`ROOM_CODE_LEN`] characters.
pub fn generate_room_code() -> String {
    generate_room_code_with(&mut rand::rng())
}

pub fn generate_room_code_with<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..ROOM_CODE_LEN)
        .map(|_| CROCKFORD[rng.random_range(0..CROCKFORD.len())] as char)
        .collect()
}

/// Accepts any non-empty code made of ASCII letters, digits, `-` or `_`, so
/// callers can also pick fixed names like `MAIN`.
#[must_use]
pub fn is_valid_room_code(code: &str) -> bool {
    !code.is_empty()
        && code.len() <= 32
        && code
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}
