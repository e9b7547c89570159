//! [hashbrown] map alias using [`FixedHashState`].
//!
//! Construct it with `with_hasher(FixedHashState)`, the default state
//! of `hashbrown` is not used anywhere in the workspace.

use crate::hash::FixedHashState;

/// A [`hashbrown::HashMap`] with a fixed hash seed.
pub type HashMap<K, V, S = FixedHashState> = hashbrown::HashMap<K, V, S>;
