//! Hash states used by the registry containers.
//!
//! - [`FixedHashState`]: `foldhash` with a fixed seed, so name indexes hash
//!   the same way in every process.
//! - [`NoOpHashState`]: passes an already-hashed `u64` straight through,
//!   used for keys like `TypeId` that are hashes themselves.

use core::hash::{BuildHasher, Hasher};

use foldhash::fast::{FixedState, FoldHasher};

// -----------------------------------------------------------------------------
// FixedHasher

const FIXED_HASH_STATE: FixedState = FixedState::with_seed(0x95EE04C4F326B271);

/// Hasher produced by [`FixedHashState`].
pub type FixedHasher = FoldHasher<'static>;

/// A [`BuildHasher`] whose output depends only on the input.
///
/// # Examples
///
/// ```
/// use core::hash::BuildHasher;
/// use vc_utils::hash::FixedHashState;
///
/// let a = FixedHashState.hash_one("vc_type::Type");
/// let b = FixedHashState.hash_one("vc_type::Type");
/// assert_eq!(a, b);
/// ```
#[derive(Copy, Clone, Default, Debug)]
pub struct FixedHashState;

impl BuildHasher for FixedHashState {
    type Hasher = FixedHasher;

    #[inline(always)]
    fn build_hasher(&self) -> Self::Hasher {
        FIXED_HASH_STATE.build_hasher()
    }
}

// -----------------------------------------------------------------------------
// NoOpHasher

/// A hasher storing the last written `u64` as its result.
#[derive(Copy, Clone, Default, Debug)]
pub struct NoOpHasher {
    hash: u64,
}

impl Hasher for NoOpHasher {
    #[inline]
    fn finish(&self) -> u64 {
        self.hash
    }

    fn write(&mut self, bytes: &[u8]) {
        // `TypeId` hashes through `write_u64`, this path is a fallback.
        for byte in bytes.iter().rev() {
            self.hash = self.hash.rotate_left(8).wrapping_add(*byte as u64);
        }
    }

    #[inline]
    fn write_u64(&mut self, i: u64) {
        self.hash = i;
    }
}

/// A [`BuildHasher`] for keys that are already well distributed.
///
/// # Examples
///
/// ```
/// use core::hash::{Hash, Hasher, BuildHasher};
/// use vc_utils::hash::NoOpHashState;
///
/// let mut hasher = NoOpHashState.build_hasher();
/// 7_u64.hash(&mut hasher);
/// assert_eq!(hasher.finish(), 7);
/// ```
#[derive(Copy, Clone, Default, Debug)]
pub struct NoOpHashState;

impl BuildHasher for NoOpHashState {
    type Hasher = NoOpHasher;

    #[inline(always)]
    fn build_hasher(&self) -> Self::Hasher {
        NoOpHasher { hash: 0 }
    }
}

#[cfg(test)]
mod tests {
    use core::hash::{BuildHasher, Hasher};

    use super::{FixedHashState, NoOpHashState};

    #[test]
    fn fixed_state_is_stable() {
        let a = FixedHashState.hash_one("alloc::string::String");
        let b = FixedHashState.hash_one("alloc::string::String");
        let c = FixedHashState.hash_one("String");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn noop_state_passes_u64() {
        let mut hasher = NoOpHashState.build_hasher();
        hasher.write_u64(0xDEAD_BEEF);
        assert_eq!(hasher.finish(), 0xDEAD_BEEF);
    }
}
