//! Structural editing of value trees.
//!
//! Append, detach, delete, replace, alias, and duplicate, all with explicit
//! ownership contracts. Single-step edits are strongly exception-safe: a
//! failed operation leaves the tree exactly as it was. The one multi-step
//! operation, recursive [`Tree::duplicate`], removes its partial copy before
//! reporting failure.
//!
//! Key matching is case-insensitive ASCII throughout, and lookups are linear
//! scans in insertion order.

use crate::error::{Error, Result};
use crate::node::{Member, Node, NodeId};
use crate::tree::Tree;

impl Tree {
    /// Append `item` to the end of an array. The array takes ownership.
    pub fn append_to_array(&mut self, array: NodeId, item: NodeId) -> Result<()> {
        if self.get(item).is_none() {
            return Err(Error::Dangling);
        }
        match self.get_mut(array) {
            Some(Node::Array(items)) => {
                items.push(item);
                Ok(())
            }
            Some(_) => Err(Error::NotContainer),
            None => Err(Error::Dangling),
        }
    }

    /// Append `item` to the end of an object under a fresh copy of `key`.
    pub fn append_to_object(&mut self, object: NodeId, key: &str, item: NodeId) -> Result<()> {
        if self.get(item).is_none() {
            return Err(Error::Dangling);
        }
        match self.get_mut(object) {
            Some(Node::Object(members)) => {
                members.push(Member::new(key.to_owned(), item));
                Ok(())
            }
            Some(_) => Err(Error::NotContainer),
            None => Err(Error::Dangling),
        }
    }

    /// Append a non-owning alias of `target` to an array.
    ///
    /// The alias lets one subtree appear in several containers without
    /// double ownership; removing the array later leaves `target` intact.
    /// Aliases of aliases collapse to the ultimate target.
    pub fn add_reference_to_array(&mut self, array: NodeId, target: NodeId) -> Result<()> {
        let target = self.resolve(target).ok_or(Error::Dangling)?;
        match self.get(array) {
            Some(Node::Array(_)) => {}
            Some(_) => return Err(Error::NotContainer),
            None => return Err(Error::Dangling),
        }
        let alias = self.alloc(Node::Ref(target));
        self.append_to_array(array, alias)
    }

    /// Append a non-owning alias of `target` to an object under `key`.
    pub fn add_reference_to_object(
        &mut self,
        object: NodeId,
        key: &str,
        target: NodeId,
    ) -> Result<()> {
        let target = self.resolve(target).ok_or(Error::Dangling)?;
        match self.get(object) {
            Some(Node::Object(_)) => {}
            Some(_) => return Err(Error::NotContainer),
            None => return Err(Error::Dangling),
        }
        let alias = self.alloc(Node::Ref(target));
        self.append_to_object(object, key, alias)
    }

    /// Unlink the array entry at `index` and hand the subtree to the caller.
    pub fn detach_from_array(&mut self, array: NodeId, index: usize) -> Result<NodeId> {
        match self.get_mut(array) {
            Some(Node::Array(items)) => {
                if index < items.len() {
                    Ok(items.remove(index))
                } else {
                    Err(Error::NotFound)
                }
            }
            Some(_) => Err(Error::NotContainer),
            None => Err(Error::Dangling),
        }
    }

    /// Unlink the first member whose key matches (case-insensitive ASCII)
    /// and hand the value subtree to the caller. The member's key is
    /// dropped.
    pub fn detach_from_object(&mut self, object: NodeId, key: &str) -> Result<NodeId> {
        match self.get_mut(object) {
            Some(Node::Object(members)) => {
                match members
                    .iter()
                    .position(|m| m.key().eq_ignore_ascii_case(key))
                {
                    Some(pos) => Ok(members.remove(pos).into_parts().1),
                    None => Err(Error::NotFound),
                }
            }
            Some(_) => Err(Error::NotContainer),
            None => Err(Error::Dangling),
        }
    }

    /// Detach the array entry at `index` and free its subtree.
    pub fn delete_from_array(&mut self, array: NodeId, index: usize) -> Result<()> {
        let id = self.detach_from_array(array, index)?;
        self.remove(id);
        Ok(())
    }

    /// Detach the matching member and free its subtree.
    pub fn delete_from_object(&mut self, object: NodeId, key: &str) -> Result<()> {
        let id = self.detach_from_object(object, key)?;
        self.remove(id);
        Ok(())
    }

    /// Put `new_item` in the position of the array entry at `index` and free
    /// the entry it displaced.
    pub fn replace_in_array(&mut self, array: NodeId, index: usize, new_item: NodeId) -> Result<()> {
        if self.get(new_item).is_none() {
            return Err(Error::Dangling);
        }
        let old = match self.get_mut(array) {
            Some(Node::Array(items)) => match items.get_mut(index) {
                Some(slot) => std::mem::replace(slot, new_item),
                None => return Err(Error::NotFound),
            },
            Some(_) => return Err(Error::NotContainer),
            None => return Err(Error::Dangling),
        };
        if old != new_item {
            self.remove(old);
        }
        Ok(())
    }

    /// Put `new_item` in the position of the matching member and free the
    /// value it displaced. The member keeps its existing key string.
    pub fn replace_in_object(&mut self, object: NodeId, key: &str, new_item: NodeId) -> Result<()> {
        if self.get(new_item).is_none() {
            return Err(Error::Dangling);
        }
        let old = match self.get_mut(object) {
            Some(Node::Object(members)) => {
                match members
                    .iter_mut()
                    .find(|m| m.key().eq_ignore_ascii_case(key))
                {
                    Some(member) => member.set_value(new_item),
                    None => return Err(Error::NotFound),
                }
            }
            Some(_) => return Err(Error::NotContainer),
            None => return Err(Error::Dangling),
        };
        if old != new_item {
            self.remove(old);
        }
        Ok(())
    }

    /// Deep-copy a subtree. String and key payloads are freshly allocated,
    /// never shared with the source.
    ///
    /// Aliases are resolved first, so the copy is always owned outright.
    /// With `recursive` false a container copies to an empty container of
    /// the same kind. On failure the partial copy is removed and the tree is
    /// otherwise unchanged.
    pub fn duplicate(&mut self, id: NodeId, recursive: bool) -> Result<NodeId> {
        let source = self.resolve(id).ok_or(Error::Dangling)?;
        let node = self.get(source).ok_or(Error::Dangling)?.clone();
        match node {
            Node::Null => Ok(self.alloc(Node::Null)),
            Node::Bool(b) => Ok(self.alloc(Node::Bool(b))),
            Node::Number(n) => Ok(self.alloc(Node::Number(n))),
            Node::String(s) => Ok(self.alloc(Node::String(s))),
            Node::Array(items) => {
                if !recursive {
                    return Ok(self.alloc(Node::Array(Vec::new())));
                }
                let mut copies = Vec::with_capacity(items.len());
                for item in items {
                    match self.duplicate(item, true) {
                        Ok(copy) => copies.push(copy),
                        Err(e) => {
                            for copy in copies {
                                self.remove(copy);
                            }
                            return Err(e);
                        }
                    }
                }
                Ok(self.alloc(Node::Array(copies)))
            }
            Node::Object(members) => {
                if !recursive {
                    return Ok(self.alloc(Node::Object(Vec::new())));
                }
                let mut copies: Vec<Member> = Vec::with_capacity(members.len());
                for member in members {
                    let (key, value) = member.into_parts();
                    match self.duplicate(value, true) {
                        Ok(copy) => copies.push(Member::new(key, copy)),
                        Err(e) => {
                            for member in copies {
                                self.remove(member.value());
                            }
                            return Err(e);
                        }
                    }
                }
                Ok(self.alloc(Node::Object(copies)))
            }
            // resolve() never lands on an alias.
            Node::Ref(_) => Err(Error::Dangling),
        }
    }
}
