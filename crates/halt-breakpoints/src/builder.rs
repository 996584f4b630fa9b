use std::sync::Arc;

use halt_proto::{PredicateCatalog, PredicateKind};

use crate::predicate::Predicate;

/// Stable reference to one node of a [`PredicateBuilder`].
///
/// Handles stay valid until their node (or an ancestor) is removed. A removed
/// slot may be reused, but with a new generation, so stale handles never alias
/// a newer node. Handles are only meaningful for the builder that issued them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BuilderHandle {
    index: u32,
    generation: u32,
}

#[derive(Clone, Debug, Default)]
struct Node {
    name: String,
    value: String,
    children: Vec<BuilderHandle>,
}

#[derive(Clone, Debug)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// Editable mirror of a [`Predicate`] tree.
///
/// Every node holds a name, a literal value and an ordered list of child
/// nodes, all of which can be edited independently. Whether a node compiles
/// to a flat or a compound predicate is not stored: it is looked up in the
/// catalog by the node's current name each time it is needed, so renaming a
/// node can change its shape. Nodes live in an arena owned by the builder and
/// are addressed through [`BuilderHandle`]s; removing a node discards its
/// whole subtree.
#[derive(Clone, Debug)]
pub struct PredicateBuilder {
    catalog: Arc<PredicateCatalog>,
    slots: Vec<Slot>,
    free: Vec<u32>,
    root: BuilderHandle,
}

impl PredicateBuilder {
    /// A builder with a single empty root node.
    pub fn new(catalog: Arc<PredicateCatalog>) -> Self {
        Self {
            catalog,
            slots: vec![Slot {
                generation: 0,
                node: Some(Node::default()),
            }],
            free: Vec::new(),
            root: BuilderHandle {
                index: 0,
                generation: 0,
            },
        }
    }

    /// A builder whose root is hydrated from `predicate`.
    pub fn from_predicate(catalog: Arc<PredicateCatalog>, predicate: &Predicate) -> Self {
        let mut builder = Self::new(catalog);
        let root = builder.root;
        builder.hydrate(root, predicate);
        builder
    }

    pub fn root(&self) -> BuilderHandle {
        self.root
    }

    pub fn catalog(&self) -> &PredicateCatalog {
        &self.catalog
    }

    /// Whether `handle` still refers to a live node.
    pub fn contains(&self, handle: BuilderHandle) -> bool {
        self.node(handle).is_some()
    }

    /// Number of live nodes in the tree. Never zero: the root always exists.
    pub fn node_count(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub fn name(&self, handle: BuilderHandle) -> Option<&str> {
        self.node(handle).map(|node| node.name.as_str())
    }

    pub fn value(&self, handle: BuilderHandle) -> Option<&str> {
        self.node(handle).map(|node| node.value.as_str())
    }

    pub fn set_name(&mut self, handle: BuilderHandle, name: impl Into<String>) -> bool {
        match self.node_mut(handle) {
            Some(node) => {
                node.name = name.into();
                true
            }
            None => false,
        }
    }

    /// Sets the literal used when the node compiles to a flat predicate.
    pub fn set_value(&mut self, handle: BuilderHandle, value: impl Into<String>) -> bool {
        match self.node_mut(handle) {
            Some(node) => {
                node.value = value.into();
                true
            }
            None => false,
        }
    }

    /// Child nodes in order; empty for a stale handle.
    pub fn children(&self, handle: BuilderHandle) -> &[BuilderHandle] {
        self.node(handle)
            .map(|node| node.children.as_slice())
            .unwrap_or(&[])
    }

    /// Kind of the node's current name according to the catalog.
    ///
    /// `None` means "not yet a valid predicate": the name is empty, unknown to
    /// the catalog, or the handle is stale.
    pub fn derived_kind(&self, handle: BuilderHandle) -> Option<PredicateKind> {
        self.node(handle)
            .and_then(|node| self.catalog.kind_of(&node.name))
    }

    /// Appends an empty child node to `parent`.
    ///
    /// Allowed whatever the parent's current kind is, so a node can hold
    /// children while its name is still being chosen.
    pub fn add_child(&mut self, parent: BuilderHandle) -> Option<BuilderHandle> {
        if !self.contains(parent) {
            return None;
        }
        let child = self.alloc()?;
        self.node_mut(parent)?.children.push(child);
        Some(child)
    }

    /// Removes `child` and its whole subtree from `parent`.
    ///
    /// Returns `false` if `child` is not currently a direct child of `parent`.
    pub fn remove_child(&mut self, parent: BuilderHandle, child: BuilderHandle) -> bool {
        let Some(node) = self.node_mut(parent) else {
            return false;
        };
        let Some(position) = node.children.iter().position(|&c| c == child) else {
            return false;
        };
        node.children.remove(position);
        self.release_subtree(child);
        true
    }

    /// Replaces the node at `handle` with a copy of `predicate`.
    ///
    /// Any previous children and value of the node are discarded first, so
    /// the result never carries edits made before hydration.
    pub fn hydrate(&mut self, handle: BuilderHandle, predicate: &Predicate) -> bool {
        let Some(node) = self.node_mut(handle) else {
            return false;
        };
        let previous = std::mem::take(&mut node.children);
        node.value.clear();
        node.name = predicate.name().to_string();
        for child in previous {
            self.release_subtree(child);
        }

        match predicate {
            Predicate::Flat { content, .. } => {
                self.set_value(handle, content.as_str());
            }
            Predicate::Compound { children, .. } => {
                for source in children {
                    if let Some(child) = self.add_child(handle) {
                        self.hydrate(child, source);
                    }
                }
            }
        }
        true
    }

    /// Compiles the whole tree starting at the root.
    pub fn compile(&self) -> Predicate {
        self.compile_node(self.root)
            .unwrap_or_else(|| Predicate::flat("", ""))
    }

    /// Compiles the subtree at `handle`.
    ///
    /// A node whose name resolves to `compound` compiles its children in
    /// order, however many there are. Any other node becomes a flat predicate
    /// with its current value, and children it still holds are left out.
    pub fn compile_node(&self, handle: BuilderHandle) -> Option<Predicate> {
        let node = self.node(handle)?;
        match self.catalog.kind_of(&node.name) {
            Some(PredicateKind::Compound) => {
                let children = node
                    .children
                    .iter()
                    .filter_map(|&child| self.compile_node(child))
                    .collect();
                Some(Predicate::compound(node.name.clone(), children))
            }
            kind => {
                if !node.children.is_empty() {
                    tracing::debug!(
                        target: "halt.breakpoints",
                        name = %node.name,
                        kind = kind.map(PredicateKind::as_str).unwrap_or("unknown"),
                        dropped = node.children.len(),
                        "compiling non-compound predicate; child builders are not included"
                    );
                }
                Some(Predicate::flat(node.name.clone(), node.value.clone()))
            }
        }
    }

    fn node(&self, handle: BuilderHandle) -> Option<&Node> {
        let slot = self.slots.get(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.node.as_ref()
    }

    fn node_mut(&mut self, handle: BuilderHandle) -> Option<&mut Node> {
        let slot = self.slots.get_mut(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.node.as_mut()
    }

    /// `None` once every `u32` index is in use.
    fn alloc(&mut self) -> Option<BuilderHandle> {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.node = Some(Node::default());
            return Some(BuilderHandle {
                index,
                generation: slot.generation,
            });
        }

        let Ok(index) = u32::try_from(self.slots.len()) else {
            tracing::warn!(target: "halt.breakpoints", "predicate builder has no free node slots");
            return None;
        };
        self.slots.push(Slot {
            generation: 0,
            node: Some(Node::default()),
        });
        Some(BuilderHandle {
            index,
            generation: 0,
        })
    }

    fn release_subtree(&mut self, handle: BuilderHandle) {
        let mut pending = vec![handle];
        while let Some(handle) = pending.pop() {
            let Some(slot) = self.slots.get_mut(handle.index as usize) else {
                continue;
            };
            if slot.generation != handle.generation {
                continue;
            }
            let Some(node) = slot.node.take() else {
                continue;
            };
            slot.generation = slot.generation.wrapping_add(1);
            self.free.push(handle.index);
            pending.extend(node.children);
        }
    }
}
