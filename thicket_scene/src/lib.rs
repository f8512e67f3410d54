// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=thicket_scene --heading-base-level=0

//! Thicket Scene: a Kurbo-native scene tree with cached bounds queries.
//!
//! This crate maintains a hierarchy of transformable content nodes and
//! answers, for any node, the minimal axis-aligned bounding box of its
//! visible content, in the node's own coordinate space or in world space.
//! Leaf geometry comes from [`thicket_content`] descriptors; this crate owns
//! the tree structure, the per-node bounds caches, their invalidation, and
//! the aggregation walk.
//!
//! ## Local vs global bounds
//!
//! - [`Scene::local_bounds`]: the node's subtree in the node's own space,
//!   *excluding* the node's own transform. Moving, scaling, or rotating a
//!   node changes its parent's aggregate, never its own local box.
//! - [`Scene::global_bounds`]: the local box mapped through the node's
//!   world transform (the ancestor chain composed with its own transform).
//!
//! Empty subtrees report a zero-size box at the origin; `None` is reserved
//! for stale [`NodeId`]s.
//!
//! ## Exact and shortcut aggregation
//!
//! Every query takes a [`BoundsMode`]:
//!
//! - [`BoundsMode::Slow`] recomputes from leaf geometry, mapping each leaf
//!   envelope through the full composed transform into the target space.
//!   This is the exact path: rotated descendants still produce tight boxes
//!   because nothing is collapsed to an intermediate box first.
//! - [`BoundsMode::FastIfEasy`] reuses a child's memoized subtree box
//!   whenever every transform composed on the way down is axis-aligned
//!   ([`TransformClass`]), falling back to the exact walk under rotation or
//!   skew.
//!
//! The mode never changes an observable result, only the cost; the policy
//! boundary is that an axis-aligned map commutes with box-taking while a
//! rotation does not. [`Scene::has_easy_local_bounds`] reports whether the
//! shortcut is eligible for a node's whole ancestor chain.
//!
//! ## Mutation and invalidation
//!
//! The tree is mutated through [`Scene::insert`], [`Scene::remove`],
//! [`Scene::reparent`], [`Scene::set_local_transform`],
//! [`Scene::update_content`], and [`Scene::rasterize`]. Each mutator marks
//! stale exactly the caches it can affect; hosts that mutate content state
//! through channels of their own call [`Scene::invalidate_content`] /
//! [`Scene::invalidate_transform`] directly. The engine's contract is
//! "recompute when told, trust the cache otherwise."
//!
//! ## API overview
//!
//! - [`Scene`]: node arena, mutation surface, and queries.
//! - [`NodeId`]: generational handle of a node.
//! - [`BoundsMode`]: per-query aggregation policy.
//! - [`Bounds`]: AABB with an explicit empty state (the union identity).
//! - [`TransformClass`]: conservative transform classification.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod bounds;
mod scene;
mod transform;
mod types;

pub use bounds::Bounds;
pub use scene::Scene;
pub use transform::TransformClass;
pub use types::{BoundsMode, NodeId};
