/// Multiplier of the polynomial.
pub const P_CONSTANT: u64 = 37;

/// Maps `key` to a slot index in `0..capacity` with Horner's rule over the
/// key's code points.
///
/// The accumulator is reduced modulo `capacity` after every step, which gives
/// the same index as evaluating the whole polynomial first and reducing once.
/// The index always depends on the capacity passed in, so callers must hash
/// again after every resize.
pub fn horner_index(key: &str, capacity: usize) -> usize {
    debug_assert!(capacity > 0);
    let modulus = capacity as u128;
    let p = u128::from(P_CONSTANT);

    let val = key.chars().fold(0u128, |val, c| {
        (p * val + u128::from(u32::from(c))) % modulus
    });

    val as usize
}
