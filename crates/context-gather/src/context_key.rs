use crate::error::{GatherError, Result};
use std::collections::{HashMap, HashSet};

pub type ContextKeyId = u64;

struct ContextNode {
    parent: Option<ContextKeyId>,
    children: HashSet<ContextKeyId>,
    values: HashMap<String, String>,
}

/// Hierarchical context-key store (spec §3, design note §9). A cyclic-looking
/// parent/child graph reshaped as an arena: nodes are integer ids with
/// parent ids, no owning back-pointers, so a child can outlive nothing it
/// doesn't itself hold a reference to. Lookups fall through from a node to
/// its ancestors; the root can never be disposed, and no node can be
/// disposed while it still has children.
#[derive(Default)]
pub struct ContextStore {
    nodes: HashMap<ContextKeyId, ContextNode>,
    next_id: ContextKeyId,
    root: Option<ContextKeyId>,
}

impl ContextStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_root(&mut self) -> ContextKeyId {
        let id = self.allocate(None);
        self.root = Some(id);
        id
    }

    pub fn root(&self) -> Option<ContextKeyId> {
        self.root
    }

    pub fn create_child(&mut self, parent: ContextKeyId) -> Result<ContextKeyId> {
        if !self.nodes.contains_key(&parent) {
            return Err(GatherError::UnknownKey(parent));
        }
        let id = self.allocate(Some(parent));
        self.nodes.get_mut(&parent).expect("checked above").children.insert(id);
        Ok(id)
    }

    fn allocate(&mut self, parent: Option<ContextKeyId>) -> ContextKeyId {
        let id = self.next_id;
        self.next_id += 1;
        self.nodes.insert(id, ContextNode { parent, children: HashSet::new(), values: HashMap::new() });
        id
    }

    pub fn set(&mut self, id: ContextKeyId, name: impl Into<String>, value: impl Into<String>) -> Result<()> {
        let node = self.nodes.get_mut(&id).ok_or(GatherError::UnknownKey(id))?;
        node.values.insert(name.into(), value.into());
        Ok(())
    }

    /// Fallthrough lookup: checks `id` then walks up the parent chain,
    /// returning the first match.
    pub fn get(&self, id: ContextKeyId, name: &str) -> Option<&str> {
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = self.nodes.get(&node_id)?;
            if let Some(value) = node.values.get(name) {
                return Some(value.as_str());
            }
            current = node.parent;
        }
        None
    }

    /// All values visible from `id`, with ancestor values overridden by
    /// closer descendants (spec §8 scenario 3).
    pub fn collect_all_values(&self, id: ContextKeyId) -> Result<HashMap<String, String>> {
        if !self.nodes.contains_key(&id) {
            return Err(GatherError::UnknownKey(id));
        }

        let mut chain = Vec::new();
        let mut current = Some(id);
        while let Some(node_id) = current {
            chain.push(node_id);
            current = self.nodes[&node_id].parent;
        }

        let mut merged = HashMap::new();
        for node_id in chain.into_iter().rev() {
            for (key, value) in &self.nodes[&node_id].values {
                merged.insert(key.clone(), value.clone());
            }
        }
        Ok(merged)
    }

    /// Disposes `id`. The root can never be disposed; any other node can be
    /// disposed only once it has no children of its own.
    pub fn dispose(&mut self, id: ContextKeyId) -> Result<()> {
        if Some(id) == self.root {
            return Err(GatherError::RootNotDisposable);
        }
        let node = self.nodes.get(&id).ok_or(GatherError::UnknownKey(id))?;
        if !node.children.is_empty() {
            return Err(GatherError::HasChildren(id));
        }
        let parent = node.parent;
        self.nodes.remove(&id);
        if let Some(parent_id) = parent {
            if let Some(parent_node) = self.nodes.get_mut(&parent_id) {
                parent_node.children.remove(&id);
            }
        }
        Ok(())
    }
}
