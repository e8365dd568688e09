//! 32-bit FNV-1a.
//!
//! Wire-name indexes persist their hash values next to field indices,
//! so the function must stay bit-for-bit stable across releases.

const OFFSET_BASIS: u32 = 0x811C_9DC5;
const PRIME: u32 = 0x0100_0193;

/// Hashes `bytes` with 32-bit FNV-1a.
///
/// # Examples
///
/// ```
/// use vc_utils::hash::fnv1a_32;
///
/// assert_eq!(fnv1a_32(b""), 0x811C_9DC5);
/// assert_eq!(fnv1a_32(b"a"), 0xE40C_292C);
/// ```
#[inline]
pub const fn fnv1a_32(bytes: &[u8]) -> u32 {
    let mut hash = OFFSET_BASIS;
    let mut index = 0;
    while index < bytes.len() {
        hash ^= bytes[index] as u32;
        hash = hash.wrapping_mul(PRIME);
        index += 1;
    }
    hash
}

#[cfg(test)]
mod tests {
    use super::fnv1a_32;

    #[test]
    fn known_vectors() {
        assert_eq!(fnv1a_32(b""), 0x811C_9DC5);
        assert_eq!(fnv1a_32(b"a"), 0xE40C_292C);
        assert_eq!(fnv1a_32(b"foobar"), 0xBF9C_F968);
    }

    #[test]
    fn usable_in_const() {
        const HASH: u32 = fnv1a_32(b"int_2");
        assert_eq!(HASH, fnv1a_32("int_2".as_bytes()));
    }
}
