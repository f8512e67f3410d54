// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the scene tree: node identifiers, query mode, and
//! cache-validity flags.

/// Identifier for a node in the scene tree.
///
/// This is a small, copyable handle that stays stable across updates but
/// becomes invalid when the underlying slot is reused. It consists of a slot
/// index and a generation counter.
///
/// ## Semantics
///
/// - On insert, a fresh slot is allocated with generation `1`.
/// - On remove, the slot is freed; any existing `NodeId` that pointed to
///   that slot is now stale.
/// - On reuse of a freed slot, its generation is incremented, producing a
///   new, distinct `NodeId`.
///
/// Use [`Scene::is_alive`](crate::Scene::is_alive) to check whether a
/// `NodeId` still refers to a live node. Stale `NodeId`s never alias a
/// different live node because the generation must match; accessors and
/// queries return `None` for them.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct NodeId(pub(crate) u32, pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }

    pub(crate) const fn generation(self) -> u32 {
        self.1
    }
}

/// Per-query policy selecting how descendant bounds are aggregated.
///
/// Both modes return identical rectangles; the mode only changes the cost of
/// getting there. The policy is an explicit parameter on every query rather
/// than process-wide or per-tree state, so callers (and tests) can mix modes
/// freely without interference.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BoundsMode {
    /// Recompute from leaf geometry and full matrix transforms on every
    /// query. Caches are refreshed but never consulted.
    Slow,
    /// Reuse a child's cached subtree box whenever every transform composed
    /// on the way down is axis-aligned (translation and scale only). Any
    /// rotation or skew on the path falls back to the exact recomputation
    /// for that subtree, so results never differ from [`Self::Slow`].
    FastIfEasy,
}

bitflags::bitflags! {
    /// Validity mask for a node's cached bounds.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub(crate) struct CacheFlags: u8 {
        /// The cached subtree-local bounds are up to date.
        const LOCAL = 0b0000_0001;
        /// The cached world-space bounds are up to date.
        const GLOBAL = 0b0000_0010;
    }
}
