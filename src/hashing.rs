//! Bucket hash for string keys.

/// Multiplier applied after each byte is folded in.
const MULTIPLIER: u32 = 31;

/// Order-dependent 32-bit string hash.
///
/// Each byte is added to the accumulator first and the sum is then
/// multiplied by 31; the accumulator starts at zero and wraps on overflow.
/// Bytes are sign-extended like a signed C `char`, so non-ASCII bytes
/// contribute `b - 256`. The result is stable across runs and platforms.
#[inline]
pub fn hashing(key: &str) -> u32 {
    key.bytes().fold(0u32, |acc, b| {
        acc.wrapping_add(b as i8 as u32).wrapping_mul(MULTIPLIER)
    })
}

/// Bucket index of `key` in a table of `capacity` slots.
#[inline]
pub(crate) fn bucket_index(key: &str, capacity: usize) -> usize {
    debug_assert!(capacity > 0);
    (u64::from(hashing(key)) % capacity as u64) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Invariant: the empty key hashes to zero.
    #[test]
    fn empty_key_is_zero() {
        assert_eq!(hashing(""), 0);
    }

    /// Invariant: add happens before multiply for every byte.
    #[test]
    fn add_then_multiply_order() {
        assert_eq!(hashing("A"), 65 * 31);
        assert_eq!(hashing("AB"), (65 * 31 + 66) * 31);
        assert_eq!(hashing("ABC"), 2_001_918);
        // Multiply-then-add would give 65*31*31 + 66*31 + 67 instead.
        assert_ne!(hashing("ABC"), 65 * 31 * 31 + 66 * 31 + 67);
    }

    /// Invariant: the accumulator wraps as a 32-bit unsigned integer.
    #[test]
    fn wraps_on_overflow() {
        assert_eq!(hashing("hello"), 3_074_031_982);
        let long = "z".repeat(64);
        let mut expected: u32 = 0;
        for _ in 0..64 {
            expected = expected.wrapping_add(b'z' as u32).wrapping_mul(31);
        }
        assert_eq!(hashing(&long), expected);
    }

    /// Invariant: non-ASCII bytes are sign-extended before being added.
    #[test]
    fn high_bytes_are_sign_extended() {
        // "é" is 0xC3 0xA9 in UTF-8.
        assert_eq!(hashing("é"), 4_294_905_978);
    }

    /// Invariant: the hash is order dependent.
    #[test]
    fn order_matters() {
        assert_ne!(hashing("ab"), hashing("ba"));
    }

    #[test]
    fn bucket_index_is_hash_mod_capacity() {
        assert_eq!(bucket_index("A", 8), 7);
        assert_eq!(bucket_index("B", 8), 6);
        assert_eq!(bucket_index("C", 8), 5);
        assert_eq!(bucket_index("anything", 1), 0);
    }
}
