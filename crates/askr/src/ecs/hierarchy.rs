//! # Hierarchy — Parent/Child Trees of Entities
//!
//! The [`Node`] component links an entity into a tree over other entities.
//! Operations are free functions over the [`World`]: [`attach`], [`detach`],
//! the pre-order traversals [`descend`]/[`descend_until`] and their upward
//! mirrors [`ascend`]/[`ascend_until`], and the cascading [`destroy`].
//!
//! ## Invariants
//!
//! - Bidirectional consistency: a node appears in its parent's child list iff
//!   its parent link is set.
//! - Acyclicity: no node is its own ancestor. [`attach`] rejects both
//!   self-attachment and attaching an ancestor beneath its own descendant.
//!
//! Links are plain [`Entity`] handles, validated on every dereference. A
//! child slot whose entity has died (despawned without going through
//! [`destroy`]) is skipped by traversal, never trusted.
//!
//! Structural mutation during an in-progress traversal of the same subtree is
//! not supported; traversals borrow the world shared for their whole duration,
//! which rules it out at compile time. Collect entities first when a visit
//! needs to mutate.

use super::entity::Entity;
use super::world::World;

/// Links an entity into a parent/child tree.
///
/// Created lazily by [`attach`] the first time an entity becomes part of a
/// hierarchy, as parent or child. Child order is insertion order, and is the
/// traversal order of [`descend`].
#[derive(Debug, Default, Clone)]
pub struct Node {
    pub(crate) parent: Option<Entity>,
    pub(crate) children: Vec<Entity>,
}

impl Node {
    /// The raw parent link. Prefer [`parent`] (the free function), which also
    /// validates that the parent is still alive.
    pub fn parent(&self) -> Option<Entity> {
        self.parent
    }

    /// The raw child links, in attach order. May contain stale handles if
    /// children were despawned without [`destroy`]; traversals skip those.
    pub fn children(&self) -> &[Entity] {
        &self.children
    }

    /// True iff this node has no parent link.
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// True iff this node has no children.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Attach `child` under `parent`, as its last child.
///
/// Either entity gains a [`Node`] lazily if it doesn't have one. The child is
/// first detached from any current parent. Attaching a node to itself, or
/// attaching one of `parent`'s ancestors (which would close a cycle), is a
/// silent no-op — as is a stale handle on either side.
pub fn attach(world: &mut World, parent: Entity, child: Entity) {
    if parent == child {
        return;
    }
    if !world.is_alive(parent) || !world.is_alive(child) {
        log::debug!("attach of {child:?} under {parent:?} skipped: dead handle");
        return;
    }
    if is_ancestor(world, parent, child) {
        log::debug!("attach of {child:?} under {parent:?} skipped: would create a cycle");
        return;
    }

    if !world.has::<Node>(parent) {
        world.insert(parent, Node::default());
    }
    if !world.has::<Node>(child) {
        world.insert(child, Node::default());
    }

    detach(world, child);

    if let Some(node) = world.get_mut::<Node>(child) {
        node.parent = Some(parent);
    }
    if let Some(node) = world.get_mut::<Node>(parent) {
        node.children.push(child);
    }
}

/// Detach `child` from its parent, making it a root. No-op if it already is
/// one (or has no [`Node`] at all).
pub fn detach(world: &mut World, child: Entity) {
    let Some(former_parent) = world.get::<Node>(child).and_then(|n| n.parent) else {
        return;
    };
    if let Some(node) = world.get_mut::<Node>(former_parent) {
        node.children.retain(|&c| c != child);
    }
    if let Some(node) = world.get_mut::<Node>(child) {
        node.parent = None;
    }
}

/// The entity's parent, if it has one that is still alive.
pub fn parent(world: &World, entity: Entity) -> Option<Entity> {
    world
        .get::<Node>(entity)?
        .parent
        .filter(|&p| world.is_alive(p))
}

/// The entity's live children, in attach order.
pub fn children(world: &World, entity: Entity) -> Vec<Entity> {
    match world.get::<Node>(entity) {
        Some(node) => node
            .children
            .iter()
            .copied()
            .filter(|&c| world.is_alive(c))
            .collect(),
        None => Vec::new(),
    }
}

/// True iff the entity is alive and is the root of a hierarchy. An entity
/// with no [`Node`] counts as a trivial root.
pub fn is_root(world: &World, entity: Entity) -> bool {
    world.is_alive(entity) && parent(world, entity).is_none()
}

/// True iff the entity is alive and has no live children.
pub fn is_leaf(world: &World, entity: Entity) -> bool {
    world.is_alive(entity) && children(world, entity).is_empty()
}

/// True iff `ancestor` appears on `entity`'s parent chain.
pub fn is_ancestor(world: &World, entity: Entity, ancestor: Entity) -> bool {
    let mut found = false;
    ascend_until(world, entity, |_, p| {
        found = p == ancestor;
        found
    });
    found
}

/// Number of entities in the subtree below `entity` (excluding `entity`).
pub fn descendant_count(world: &World, entity: Entity) -> usize {
    let mut count = 0;
    descend(world, entity, |_, _| count += 1);
    count
}

/// Visit the subtree below `entity` depth-first, pre-order: each child is
/// passed to `visit(parent, child)` before its own subtree is entered.
pub fn descend(world: &World, entity: Entity, mut visit: impl FnMut(Entity, Entity)) {
    descend_inner(world, entity, &mut visit);
}

fn descend_inner<F: FnMut(Entity, Entity)>(world: &World, entity: Entity, visit: &mut F) {
    let Some(node) = world.get::<Node>(entity) else {
        return;
    };
    // Children are visited through a liveness check; a stale slot is skipped
    // along with the subtree it used to own.
    for &child in &node.children {
        if !world.is_alive(child) {
            continue;
        }
        visit(entity, child);
        descend_inner(world, child, visit);
    }
}

/// Like [`descend`], but when `visit` returns `true` the child's subtree is
/// not entered. Siblings (and their subtrees) are still visited.
pub fn descend_until(world: &World, entity: Entity, mut visit: impl FnMut(Entity, Entity) -> bool) {
    descend_until_inner(world, entity, &mut visit);
}

fn descend_until_inner<F: FnMut(Entity, Entity) -> bool>(
    world: &World,
    entity: Entity,
    visit: &mut F,
) {
    let Some(node) = world.get::<Node>(entity) else {
        return;
    };
    for &child in &node.children {
        if !world.is_alive(child) {
            continue;
        }
        if !visit(entity, child) {
            descend_until_inner(world, child, visit);
        }
    }
}

/// Visit the parent chain from `entity` toward the root, calling
/// `visit(child, parent)` at each step.
pub fn ascend(world: &World, entity: Entity, mut visit: impl FnMut(Entity, Entity)) {
    let mut current = entity;
    while let Some(p) = parent(world, current) {
        visit(current, p);
        current = p;
    }
}

/// Like [`ascend`], but stops climbing once `visit` returns `true`.
pub fn ascend_until(world: &World, entity: Entity, mut visit: impl FnMut(Entity, Entity) -> bool) {
    let mut current = entity;
    while let Some(p) = parent(world, current) {
        if visit(current, p) {
            return;
        }
        current = p;
    }
}

/// Destroy `entity` and its entire subtree.
///
/// The entity is detached from its parent first, then it and every descendant
/// are despawned. A destroyed subtree takes its children with it; orphaning
/// (promoting children to roots) is a documented alternative this crate does
/// not implement. Returns the number of entities despawned; zero for a stale
/// handle.
pub fn destroy(world: &mut World, entity: Entity) -> usize {
    if !world.is_alive(entity) {
        return 0;
    }

    detach(world, entity);

    let mut doomed = vec![entity];
    descend(world, entity, |_, child| doomed.push(child));

    for e in &doomed {
        world.despawn(*e);
    }
    log::trace!("destroyed {entity:?} and {} descendants", doomed.len() - 1);
    doomed.len()
}
