//! One-time-code generation.

use rand::Rng;

/// Number of digits in a generated code.
const CODE_LEN: usize = 6;

/// Generate a one-time code: a uniform random integer in `[0, 1_000_000)`
/// zero-padded to six digits.
///
/// `rand::rng()` is a CSPRNG, so codes are not guessable beyond the
/// 10^6 value space (which the 5-minute TTL and upstream rate limiting
/// are sized for).
pub fn generate_code() -> String {
    let n: u32 = rand::rng().random_range(0..1_000_000);
    format!("{n:06}")
}
