const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Hashes a string with 64-bit FNV-1a.
///
/// Usable in `const` context, so metadata keys can be declared as constants.
///
/// # Examples
///
/// ```
/// use vc_utils::hash::hash_str;
///
/// const TOOLTIP: u64 = hash_str("tooltip");
/// assert_eq!(TOOLTIP, hash_str("tooltip"));
/// assert_ne!(TOOLTIP, hash_str("Tooltip"));
/// ```
pub const fn hash_str(text: &str) -> u64 {
    let bytes = text.as_bytes();
    let mut hash = FNV_OFFSET;
    let mut index = 0;
    while index < bytes.len() {
        hash ^= bytes[index] as u64;
        hash = hash.wrapping_mul(FNV_PRIME);
        index += 1;
    }
    hash
}
