// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core scene tree: structure, mutation, invalidation, and bounds queries.

use alloc::vec::Vec;
use kurbo::{Affine, Rect};
use thicket_content::Content;

use crate::bounds::{Bounds, transform_rect_bbox};
use crate::transform::TransformClass;
use crate::types::{BoundsMode, CacheFlags, NodeId};

/// Memoized bounds for one node.
///
/// Local and global values are cached independently: local bounds exclude
/// the node's own transform, global bounds include the full ancestor chain,
/// so the two go stale under different mutations.
#[derive(Clone, Copy, Debug, Default)]
struct BoundsCache {
    local: Bounds,
    global: Bounds,
    valid: CacheFlags,
}

#[derive(Clone, Debug)]
struct Node {
    generation: u32,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    local_transform: Affine,
    transform_class: TransformClass,
    content: Content,
    cache: BoundsCache,
}

impl Node {
    fn new(generation: u32, content: Content) -> Self {
        Self {
            generation,
            parent: None,
            children: Vec::new(),
            local_transform: Affine::IDENTITY,
            transform_class: TransformClass::Translation,
            content,
            cache: BoundsCache::default(),
        }
    }
}

/// Scene tree with cached local/global bounds queries.
///
/// Nodes live in a generational slot arena and are addressed by [`NodeId`].
/// Each node carries a local [`Affine`] transform and a
/// [`Content`] descriptor; parents own their children, and a node's parent
/// link is a non-owning id used only for upward walks.
///
/// Mutations (structure, transforms, content) invalidate exactly the caches
/// they can affect; queries recompute on miss and memoize. Queries take
/// `&mut self` because they fill caches; mutation and queries are thereby
/// serialized, which is the whole concurrency model of this layer.
///
/// ## Example
///
/// ```rust
/// use kurbo::{Affine, Rect, Vec2};
/// use thicket_content::{Content, Quad};
/// use thicket_scene::{BoundsMode, Scene};
///
/// let mut scene = Scene::new();
/// let root = scene.insert(None, Content::Container);
/// let sprite = scene.insert(Some(root), Content::Quad(Quad::with_frame(10.0, 10.0)));
/// scene.set_local_transform(sprite, Affine::translate(Vec2::new(20.0, 20.0)));
///
/// // The sprite's own transform moves it in the root's space, not its own.
/// assert_eq!(
///     scene.local_bounds(sprite, BoundsMode::FastIfEasy),
///     Some(Rect::new(0.0, 0.0, 10.0, 10.0)),
/// );
/// assert_eq!(
///     scene.local_bounds(root, BoundsMode::FastIfEasy),
///     Some(Rect::new(20.0, 20.0, 30.0, 30.0)),
/// );
/// ```
pub struct Scene {
    /// slots
    nodes: Vec<Option<Node>>,
    /// last generation per slot (persists across frees)
    generations: Vec<u32>,
    free_list: Vec<usize>,
}

impl core::fmt::Debug for Scene {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.nodes.len();
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        let free = self.free_list.len();
        f.debug_struct("Scene")
            .field("nodes_total", &total)
            .field("nodes_alive", &alive)
            .field("free_list", &free)
            .finish_non_exhaustive()
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// Create a new empty scene.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
        }
    }

    /// Insert a new node as a child of `parent` (or as a root if `None`).
    ///
    /// The new node starts with the identity transform and fully invalid
    /// caches. Ancestor caches are invalidated since the new content now
    /// contributes to their unions.
    pub fn insert(&mut self, parent: Option<NodeId>, content: Content) -> NodeId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(Node::new(generation, content));
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId uses 32-bit indices by design."
            )]
            (idx as u32, generation)
        } else {
            let generation = 1_u32;
            self.nodes.push(Some(Node::new(generation, content)));
            self.generations.push(generation);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId uses 32-bit indices by design."
            )]
            ((self.nodes.len() - 1) as u32, generation)
        };
        let id = NodeId::new(idx, generation);
        if let Some(p) = parent {
            self.link_parent(id, p);
            self.invalidate_up(Some(p));
        }
        id
    }

    /// Remove a node and its whole subtree. All ids in it become stale.
    pub fn remove(&mut self, id: NodeId) {
        if !self.is_alive(id) {
            return;
        }
        let parent = self.node(id).parent;
        if let Some(p) = parent {
            self.unlink_parent(id, p);
        }
        self.remove_subtree(id);
        self.invalidate_up(parent);
    }

    fn remove_subtree(&mut self, id: NodeId) {
        let children = core::mem::take(&mut self.node_mut(id).children);
        for child in children {
            self.remove_subtree(child);
        }
        self.nodes[id.idx()] = None;
        self.free_list.push(id.idx());
    }

    /// Move `id` under `new_parent` (or make it a root with `None`).
    ///
    /// Reparenting a node under itself or one of its own descendants would
    /// create a cycle and is ignored; acyclicity is this layer's invariant
    /// to keep. The node's own local cache survives the move; only world
    /// data and the old and new ancestor chains go stale.
    pub fn reparent(&mut self, id: NodeId, new_parent: Option<NodeId>) {
        if !self.is_alive(id) {
            return;
        }
        if let Some(p) = new_parent {
            if !self.is_alive(p) || self.is_in_subtree(p, id) {
                return;
            }
        }
        let old_parent = self.node(id).parent;
        if let Some(p) = old_parent {
            self.unlink_parent(id, p);
        }
        if let Some(p) = new_parent {
            self.link_parent(id, p);
        }
        self.invalidate_up(old_parent);
        self.invalidate_up(new_parent);
        self.mark_subtree_global_invalid(id);
    }

    /// Update a node's local transform.
    ///
    /// No-op when the value is unchanged. Otherwise the cached transform
    /// class is refreshed and caches are invalidated per
    /// [`Scene::invalidate_transform`]. Notably the node's own *local*
    /// bounds stay valid, since they exclude its own transform.
    pub fn set_local_transform(&mut self, id: NodeId, transform: Affine) {
        let Some(node) = self.node_opt_mut(id) else {
            return;
        };
        if node.local_transform == transform {
            return;
        }
        node.local_transform = transform;
        node.transform_class = TransformClass::classify(transform);
        self.invalidate_transform(id);
    }

    /// Edit a node's content in place, then invalidate content-dependent
    /// caches.
    ///
    /// This is the single mutation funnel for content state: drawing into a
    /// shape set, binding a texture frame, resolving text metrics. Returns
    /// `None` for stale ids without running `f`.
    pub fn update_content<R>(&mut self, id: NodeId, f: impl FnOnce(&mut Content) -> R) -> Option<R> {
        let node = self.node_opt_mut(id)?;
        let result = f(&mut node.content);
        self.invalidate_content(id);
        Some(result)
    }

    /// Snapshot a node's subtree into frozen raster extents.
    ///
    /// Computes the subtree's exact local bounds, replaces the node's
    /// content with a [`thicket_content::Raster`] carrying them, and returns
    /// them. From then on the node reports the frozen extents and its
    /// children no longer contribute; later mutation attempts find no shape
    /// or quad state to touch.
    pub fn rasterize(&mut self, id: NodeId) -> Option<Rect> {
        if !self.is_alive(id) {
            return None;
        }
        let extents = self.subtree_bounds(id, BoundsMode::Slow).as_rect();
        let node = self.node_mut(id);
        node.content = Content::Raster(thicket_content::Raster::new(extents));
        self.invalidate_content(id);
        Some(extents)
    }

    /// Mark content-dependent caches stale after `id`'s content changed.
    ///
    /// Invalidates the node's own local and global caches and both caches of
    /// every ancestor (their unions include this node). Descendants are
    /// untouched: their bounds do not depend on an ancestor's content.
    ///
    /// Mutations made through [`Scene::update_content`] call this
    /// automatically; it is public for hosts that mutate content state
    /// through channels of their own.
    pub fn invalidate_content(&mut self, id: NodeId) {
        if !self.is_alive(id) {
            return;
        }
        self.invalidate_up(Some(id));
    }

    /// Mark transform-dependent caches stale after `id`'s local transform
    /// changed.
    ///
    /// Invalidates the global caches of the node and its whole subtree
    /// (their world transforms changed) and both caches of every ancestor
    /// (the node's contribution to their unions moved). The node's own
    /// local cache stays valid: local bounds exclude the node's own
    /// transform.
    pub fn invalidate_transform(&mut self, id: NodeId) {
        if !self.is_alive(id) {
            return;
        }
        self.mark_subtree_global_invalid(id);
        let parent = self.node(id).parent;
        self.invalidate_up(parent);
    }

    /// Returns true if `id` refers to a live node.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.nodes
            .get(id.idx())
            .and_then(|n| n.as_ref())
            .map(|n| n.generation == id.generation())
            .unwrap_or(false)
    }

    /// Returns the parent of a node if live, or `None` for roots and stale
    /// ids.
    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        if !self.is_alive(id) {
            return None;
        }
        self.node(id).parent
    }

    /// Get the children of a node, or an empty slice if the id is stale.
    pub fn children_of(&self, id: NodeId) -> &[NodeId] {
        if !self.is_alive(id) {
            return &[];
        }
        &self.node(id).children
    }

    /// Returns a node's local transform if the id is live.
    pub fn local_transform(&self, id: NodeId) -> Option<Affine> {
        if !self.is_alive(id) {
            return None;
        }
        Some(self.node(id).local_transform)
    }

    /// Borrow a node's content if the id is live.
    pub fn content(&self, id: NodeId) -> Option<&Content> {
        if !self.is_alive(id) {
            return None;
        }
        Some(&self.node(id).content)
    }

    /// Returns a node's world transform: the product of every ancestor's
    /// local transform composed with its own.
    ///
    /// Derived by walking the parent chain; world transforms are never
    /// stored.
    pub fn world_transform(&self, id: NodeId) -> Option<Affine> {
        if !self.is_alive(id) {
            return None;
        }
        let mut transform = self.node(id).local_transform;
        let mut current = self.node(id).parent;
        while let Some(ancestor) = current {
            let node = self.node(ancestor);
            transform = node.local_transform * transform;
            current = node.parent;
        }
        Some(transform)
    }

    /// Returns true if no transform on the chain from `id` up to its root
    /// (the node's own included) has a rotation or skew component, i.e. the
    /// shortcut aggregation path is eligible for this node.
    pub fn has_easy_local_bounds(&self, id: NodeId) -> Option<bool> {
        if !self.is_alive(id) {
            return None;
        }
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = self.node(node_id);
            if !node.transform_class.is_axis_aligned() {
                return Some(false);
            }
            current = node.parent;
        }
        Some(true)
    }

    /// Bounds of `id`'s subtree in `id`'s own coordinate space, excluding
    /// `id`'s own transform.
    ///
    /// Moving, scaling, or rotating the node itself never changes this
    /// value, only its parent's aggregate. An empty subtree reports
    /// `Rect::ZERO`; `None` is returned only for stale ids. Both modes
    /// return identical rectangles (see [`BoundsMode`]).
    pub fn local_bounds(&mut self, id: NodeId, mode: BoundsMode) -> Option<Rect> {
        if !self.is_alive(id) {
            return None;
        }
        Some(self.subtree_bounds(id, mode).as_rect())
    }

    /// Bounds of `id`'s subtree in world space: the local bounds mapped
    /// through the node's world transform.
    pub fn global_bounds(&mut self, id: NodeId, mode: BoundsMode) -> Option<Rect> {
        if !self.is_alive(id) {
            return None;
        }
        if mode == BoundsMode::FastIfEasy {
            let cache = &self.node(id).cache;
            if cache.valid.contains(CacheFlags::GLOBAL) {
                return Some(cache.global.as_rect());
            }
        }
        let world = self.world_transform(id)?;
        let global = self.subtree_bounds(id, mode).transformed(world);
        let node = self.node_mut(id);
        node.cache.global = global;
        node.cache.valid.insert(CacheFlags::GLOBAL);
        Some(global.as_rect())
    }

    // --- internals ---

    /// Access a node; panics if the slot is empty.
    fn node(&self, id: NodeId) -> &Node {
        self.nodes[id.idx()].as_ref().expect("dangling NodeId")
    }

    /// Access a node mutably; panics if the slot is empty.
    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        self.nodes[id.idx()].as_mut().expect("dangling NodeId")
    }

    fn node_opt_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        let n = self.nodes.get_mut(id.idx())?.as_mut()?;
        if n.generation != id.generation() {
            return None;
        }
        Some(n)
    }

    fn link_parent(&mut self, id: NodeId, parent: NodeId) {
        let parent_node = self.node_mut(parent);
        parent_node.children.push(id);
        self.node_mut(id).parent = Some(parent);
    }

    fn unlink_parent(&mut self, id: NodeId, parent: NodeId) {
        let p = self.node_mut(parent);
        p.children.retain(|c| *c != id);
        self.node_mut(id).parent = None;
    }

    /// True if `id` is inside the subtree rooted at `root` (inclusive).
    fn is_in_subtree(&self, id: NodeId, root: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node_id) = current {
            if node_id == root {
                return true;
            }
            current = self.node(node_id).parent;
        }
        false
    }

    /// Clear both caches of `start` and every ancestor above it.
    fn invalidate_up(&mut self, start: Option<NodeId>) {
        let mut current = start;
        while let Some(id) = current {
            let node = self.node_mut(id);
            node.cache.valid = CacheFlags::empty();
            current = node.parent;
        }
    }

    /// Clear the global cache of `id` and every descendant.
    fn mark_subtree_global_invalid(&mut self, id: NodeId) {
        let children = {
            let node = self.node_mut(id);
            node.cache.valid.remove(CacheFlags::GLOBAL);
            node.children.clone()
        };
        for child in children {
            self.mark_subtree_global_invalid(child);
        }
    }

    /// Subtree bounds of a live node in its own space, memoized.
    ///
    /// `Slow` refreshes the cache without consulting it; `FastIfEasy`
    /// returns a valid cache entry directly.
    fn subtree_bounds(&mut self, id: NodeId, mode: BoundsMode) -> Bounds {
        if mode == BoundsMode::FastIfEasy {
            let cache = &self.node(id).cache;
            if cache.valid.contains(CacheFlags::LOCAL) {
                return cache.local;
            }
        }
        let mut acc = Bounds::EMPTY;
        self.accumulate(id, Affine::IDENTITY, mode == BoundsMode::FastIfEasy, &mut acc);
        let node = self.node_mut(id);
        node.cache.local = acc;
        node.cache.valid.insert(CacheFlags::LOCAL);
        acc
    }

    /// Union the subtree rooted at `id` into `acc`, expressed in the target
    /// space reached through `transform`.
    ///
    /// `fast` holds while the query runs in [`BoundsMode::FastIfEasy`] *and*
    /// every transform composed since the target node is axis-aligned. While
    /// it holds, an axis-aligned child contributes its memoized subtree box
    /// mapped through the composed transform, which is exact because
    /// axis-aligned maps commute with box-taking. A rotated or skewed child clears the
    /// flag for its subtree and is walked leaf by leaf, which keeps the
    /// result tight: collapsing such a subtree to its box first would
    /// inflate the aggregate.
    fn accumulate(&mut self, id: NodeId, transform: Affine, fast: bool, acc: &mut Bounds) {
        let (envelope, children, frozen) = {
            let node = self.node(id);
            (
                node.content.envelope(),
                node.children.clone(),
                matches!(node.content, Content::Raster(_)),
            )
        };
        if let Some(e) = envelope {
            *acc = acc.union(Bounds::from_rect(transform_rect_bbox(transform, e)));
        }
        // A rasterized node is represented entirely by its snapshot; the
        // children it was rendered from no longer contribute.
        if frozen {
            return;
        }
        for child in children {
            let (child_local, child_class) = {
                let node = self.node(child);
                (node.local_transform, node.transform_class)
            };
            let child_transform = transform * child_local;
            if fast && child_class.is_axis_aligned() {
                let sub = self.subtree_bounds(child, BoundsMode::FastIfEasy);
                *acc = acc.union(sub.transformed(child_transform));
            } else {
                self.accumulate(child, child_transform, false, acc);
            }
        }
    }
}
