//! Opaque token generation for member and message ids.

use rand::distr::Alphanumeric;
use rand::Rng;

/// Generates a random token of `len` characters over `[A-Za-z0-9]`.
///
/// No uniqueness check is performed against existing ids: at 8 and 12
/// characters over a 62-symbol alphabet, collisions within one room's
/// lifetime are accepted as negligible.
pub fn generate_token(len: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}
