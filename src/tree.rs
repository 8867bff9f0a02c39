//! The node arena.
//!
//! A [`Tree`] owns every node of one or more value trees in a slab: a vector
//! of slots plus a free list. All construction, parsing, and editing goes
//! through the owning `Tree`, so two trees are fully independent and there is
//! no process-wide allocator or error state to serialize around.
//!
//! Removing a node frees its whole subtree depth-first, but never follows a
//! [`Node::Ref`]: the aliased subtree stays live and remains independently
//! removable.

use crate::error::{Error, Result};
use crate::node::{Member, Node, NodeId, Number};

#[derive(Debug, Clone)]
enum Slot {
    Occupied(Node),
    Vacant,
}

/// Arena owning the nodes of one or more JSON value trees.
#[derive(Debug, Clone, Default)]
pub struct Tree {
    slots: Vec<Slot>,
    free: Vec<usize>,
    live: usize,
}

impl Tree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Tree::default()
    }

    /// Create an empty tree with room for `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        Tree {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            live: 0,
        }
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.live
    }

    /// Returns true if the tree holds no live nodes.
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    pub(crate) fn alloc(&mut self, node: Node) -> NodeId {
        self.live += 1;
        match self.free.pop() {
            Some(index) => {
                self.slots[index] = Slot::Occupied(node);
                NodeId(index)
            }
            None => {
                self.slots.push(Slot::Occupied(node));
                NodeId(self.slots.len() - 1)
            }
        }
    }

    /// Look up a node; `None` if the id names a vacant slot.
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        match self.slots.get(id.0) {
            Some(Slot::Occupied(node)) => Some(node),
            _ => None,
        }
    }

    /// Mutable lookup; `None` if the id names a vacant slot.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        match self.slots.get_mut(id.0) {
            Some(Slot::Occupied(node)) => Some(node),
            _ => None,
        }
    }

    /// Vacate one slot and hand back the node it held.
    fn release(&mut self, id: NodeId) -> Option<Node> {
        match self.slots.get_mut(id.0) {
            Some(slot @ Slot::Occupied(_)) => {
                let old = std::mem::replace(slot, Slot::Vacant);
                self.free.push(id.0);
                self.live -= 1;
                match old {
                    Slot::Occupied(node) => Some(node),
                    Slot::Vacant => None,
                }
            }
            _ => None,
        }
    }

    /// Remove a subtree, freeing every owned descendant.
    ///
    /// Traversal is iterative and follows `Array`/`Object` children only;
    /// the target of a [`Node::Ref`] is left untouched. Removing an id that
    /// is already vacant is a no-op.
    pub fn remove(&mut self, id: NodeId) {
        let mut pending = vec![id];
        while let Some(id) = pending.pop() {
            match self.release(id) {
                Some(Node::Array(items)) => pending.extend(items),
                Some(Node::Object(members)) => {
                    pending.extend(members.iter().map(Member::value));
                }
                _ => {}
            }
        }
    }

    /// Follow `Ref` links to the node they ultimately alias.
    ///
    /// Returns `None` when the chain ends in a vacant slot.
    pub(crate) fn resolve(&self, id: NodeId) -> Option<NodeId> {
        let mut id = id;
        let mut hops = 0usize;
        while let Some(Node::Ref(target)) = self.get(id) {
            id = *target;
            hops += 1;
            if hops > self.slots.len() {
                return None;
            }
        }
        self.get(id).map(|_| id)
    }

    // ---- factories ----

    /// Create a `null` node.
    pub fn null(&mut self) -> NodeId {
        self.alloc(Node::Null)
    }

    /// Create a boolean node.
    pub fn bool(&mut self, value: bool) -> NodeId {
        self.alloc(Node::Bool(value))
    }

    /// Create a number node.
    pub fn number(&mut self, value: f64) -> NodeId {
        self.alloc(Node::Number(Number::new(value)))
    }

    /// Create a string node.
    pub fn string(&mut self, value: &str) -> NodeId {
        self.alloc(Node::String(value.to_owned()))
    }

    /// Create an empty array node.
    pub fn array(&mut self) -> NodeId {
        self.alloc(Node::Array(Vec::new()))
    }

    /// Create an empty object node.
    pub fn object(&mut self) -> NodeId {
        self.alloc(Node::Object(Vec::new()))
    }

    /// Build a flat array of numbers from integers.
    pub fn int_array(&mut self, values: &[i32]) -> NodeId {
        let items = values
            .iter()
            .map(|&v| self.number(f64::from(v)))
            .collect();
        self.alloc(Node::Array(items))
    }

    /// Build a flat array of numbers from single-precision floats.
    pub fn float_array(&mut self, values: &[f32]) -> NodeId {
        let items = values
            .iter()
            .map(|&v| self.number(f64::from(v)))
            .collect();
        self.alloc(Node::Array(items))
    }

    /// Build a flat array of numbers from doubles.
    pub fn double_array(&mut self, values: &[f64]) -> NodeId {
        let items = values.iter().map(|&v| self.number(v)).collect();
        self.alloc(Node::Array(items))
    }

    /// Build a flat array of strings.
    pub fn string_array(&mut self, values: &[&str]) -> NodeId {
        let items = values.iter().map(|&v| self.string(v)).collect();
        self.alloc(Node::Array(items))
    }

    // ---- in-place mutation ----

    /// Replace a node's content wholesale, freeing any children the old
    /// content owned.
    fn set_node(&mut self, id: NodeId, node: Node) -> Result<()> {
        let old = match self.get_mut(id) {
            Some(slot) => std::mem::replace(slot, node),
            None => return Err(Error::Dangling),
        };
        match old {
            Node::Array(items) => {
                for item in items {
                    self.remove(item);
                }
            }
            Node::Object(members) => {
                for member in members {
                    self.remove(member.value());
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// Turn a node into `null`, dropping its previous payload.
    pub fn set_null(&mut self, id: NodeId) -> Result<()> {
        self.set_node(id, Node::Null)
    }

    /// Turn a node into a boolean, dropping its previous payload.
    pub fn set_bool(&mut self, id: NodeId, value: bool) -> Result<()> {
        self.set_node(id, Node::Bool(value))
    }

    /// Turn a node into a number, dropping its previous payload. The integer
    /// snapshot is recomputed from `value`.
    pub fn set_number(&mut self, id: NodeId, value: f64) -> Result<()> {
        self.set_node(id, Node::Number(Number::new(value)))
    }

    /// Turn a node into a string, dropping its previous payload.
    pub fn set_string(&mut self, id: NodeId, value: &str) -> Result<()> {
        self.set_node(id, Node::String(value.to_owned()))
    }

    // ---- queries ----

    /// Number of children of an array or object (references resolve to
    /// their target first). Non-containers have size 0.
    pub fn array_size(&self, id: NodeId) -> usize {
        match self.resolve(id).and_then(|id| self.get(id)) {
            Some(Node::Array(items)) => items.len(),
            Some(Node::Object(members)) => members.len(),
            _ => 0,
        }
    }

    /// Child of an array (or member value of an object) by position.
    pub fn get_array_item(&self, id: NodeId, index: usize) -> Option<NodeId> {
        match self.resolve(id).and_then(|id| self.get(id)) {
            Some(Node::Array(items)) => items.get(index).copied(),
            Some(Node::Object(members)) => members.get(index).map(Member::value),
            _ => None,
        }
    }

    /// First member of an object whose key matches case-insensitively
    /// (ASCII), scanning in insertion order.
    pub fn get_by_key(&self, id: NodeId, key: &str) -> Option<NodeId> {
        match self.resolve(id).and_then(|id| self.get(id)) {
            Some(Node::Object(members)) => members
                .iter()
                .find(|m| m.key().eq_ignore_ascii_case(key))
                .map(Member::value),
            _ => None,
        }
    }

    /// Structural equality between subtrees, possibly across trees: same
    /// kinds, values, keys, and child order. References compare through to
    /// their targets; a dangling id is never equal to anything.
    pub fn deep_eq(&self, a: NodeId, other: &Tree, b: NodeId) -> bool {
        let (a, b) = match (self.resolve(a), other.resolve(b)) {
            (Some(a), Some(b)) => (a, b),
            _ => return false,
        };
        match (self.get(a), other.get(b)) {
            (Some(Node::Null), Some(Node::Null)) => true,
            (Some(Node::Bool(x)), Some(Node::Bool(y))) => x == y,
            (Some(Node::Number(x)), Some(Node::Number(y))) => x.value() == y.value(),
            (Some(Node::String(x)), Some(Node::String(y))) => x == y,
            (Some(Node::Array(xs)), Some(Node::Array(ys))) => {
                xs.len() == ys.len()
                    && xs
                        .iter()
                        .zip(ys.iter())
                        .all(|(&x, &y)| self.deep_eq(x, other, y))
            }
            (Some(Node::Object(xs)), Some(Node::Object(ys))) => {
                xs.len() == ys.len()
                    && xs.iter().zip(ys.iter()).all(|(x, y)| {
                        x.key() == y.key() && self.deep_eq(x.value(), other, y.value())
                    })
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alloc_and_get() {
        let mut tree = Tree::new();
        let id = tree.number(4.25);
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.get(id).and_then(Node::as_f64), Some(4.25));
    }

    #[test]
    fn remove_frees_subtree_and_reuses_slots() {
        let mut tree = Tree::new();
        let arr = tree.int_array(&[1, 2, 3]);
        assert_eq!(tree.len(), 4);
        tree.remove(arr);
        assert!(tree.is_empty());
        assert!(tree.get(arr).is_none());

        // Freed slots are recycled.
        let replacement = tree.string("again");
        assert_eq!(tree.len(), 1);
        assert!(tree.get(replacement).is_some());
    }

    #[test]
    fn remove_skips_reference_targets() {
        let mut tree = Tree::new();
        let target = tree.string("shared");
        let holder = tree.array();
        tree.add_reference_to_array(holder, target).unwrap();
        tree.remove(holder);
        assert_eq!(tree.get(target).and_then(Node::as_str), Some("shared"));
    }

    #[test]
    fn set_replaces_payload_and_frees_children() {
        let mut tree = Tree::new();
        let arr = tree.int_array(&[7, 8]);
        tree.set_number(arr, 1.5).unwrap();
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.get(arr).and_then(Node::as_f64), Some(1.5));
        assert_eq!(tree.set_null(NodeId(999)), Err(Error::Dangling));
    }

    #[test]
    fn key_lookup_is_case_insensitive() {
        let mut tree = Tree::new();
        let obj = tree.object();
        let v = tree.number(1.0);
        tree.append_to_object(obj, "Name", v).unwrap();
        assert_eq!(tree.get_by_key(obj, "name"), Some(v));
        assert_eq!(tree.get_by_key(obj, "NAME"), Some(v));
        assert_eq!(tree.get_by_key(obj, "other"), None);
    }

    #[test]
    fn positional_lookup() {
        let mut tree = Tree::new();
        let arr = tree.string_array(&["a", "b"]);
        let first = tree.get_array_item(arr, 0).unwrap();
        assert_eq!(tree.get(first).and_then(Node::as_str), Some("a"));
        assert!(tree.get_array_item(arr, 2).is_none());
        assert_eq!(tree.array_size(arr), 2);
        assert_eq!(tree.array_size(first), 0);
    }

    #[test]
    fn deep_eq_compares_structure() {
        let mut a = Tree::new();
        let mut b = Tree::new();
        let ra = a.double_array(&[1.0, 2.0]);
        let rb = b.double_array(&[1.0, 2.0]);
        assert!(a.deep_eq(ra, &b, rb));

        let rb2 = b.double_array(&[1.0, 3.0]);
        assert!(!a.deep_eq(ra, &b, rb2));
    }
}
