use crate::arena::{Arena, Handle};
use crate::error::Error;
use crate::red_black_tree::node::{Color, Node, Side};
use std::cmp::Ordering;
use std::vec;

/// An ordered collection of distinct values implemented using an arena-backed red black tree.
///
/// Every ordering decision goes through the comparator supplied at construction. Nodes are
/// addressed through copyable handles; a handle stays valid until the node it refers to is
/// removed or the tree is cleared.
///
/// # Examples
///
/// ```
/// use arena_collections::red_black_tree::RedBlackTree;
///
/// let mut tree = RedBlackTree::new();
/// tree.insert(0).unwrap();
/// tree.insert(3).unwrap();
///
/// assert_eq!(tree.len(), 2);
/// assert!(tree.contains(&3));
///
/// let min = tree.min().unwrap();
/// assert_eq!(tree.get(min), Some(&0));
///
/// let handle = tree.search(&3).unwrap();
/// assert_eq!(tree.remove(handle), Ok(3));
/// assert_eq!(tree.search(&3), None);
/// ```
pub struct RedBlackTree<T, C> {
    arena: Arena<Node<T>>,
    root: Option<Handle>,
    compare: C,
}

impl<T> RedBlackTree<T, fn(&T, &T) -> Ordering>
where
    T: Ord,
{
    /// Constructs a new, empty `RedBlackTree<T>` ordered by `T`'s natural ordering.
    ///
    /// # Examples
    ///
    /// ```
    /// use arena_collections::red_black_tree::RedBlackTree;
    ///
    /// let tree: RedBlackTree<u32, _> = RedBlackTree::new();
    /// ```
    pub fn new() -> Self {
        RedBlackTree::with_comparator(T::cmp as fn(&T, &T) -> Ordering)
    }
}

impl<T, C> RedBlackTree<T, C>
where
    C: Fn(&T, &T) -> Ordering,
{
    /// Constructs a new, empty `RedBlackTree<T, C>` that orders values with the given three-way
    /// comparator.
    ///
    /// # Examples
    ///
    /// ```
    /// use arena_collections::red_black_tree::RedBlackTree;
    ///
    /// let mut tree = RedBlackTree::with_comparator(|a: &u32, b: &u32| b.cmp(a));
    /// tree.insert(1).unwrap();
    /// tree.insert(2).unwrap();
    ///
    /// let min = tree.min().unwrap();
    /// assert_eq!(tree.get(min), Some(&2));
    /// ```
    pub fn with_comparator(compare: C) -> Self {
        RedBlackTree {
            arena: Arena::new(),
            root: None,
            compare,
        }
    }

    /// Inserts a value into the tree and returns a handle to the new node. Returns
    /// `Err(Error::DuplicateValue)` without modifying the tree if an equal value is already
    /// present.
    ///
    /// # Examples
    ///
    /// ```
    /// use arena_collections::error::Error;
    /// use arena_collections::red_black_tree::RedBlackTree;
    ///
    /// let mut tree = RedBlackTree::new();
    /// assert!(tree.insert(1).is_ok());
    /// assert_eq!(tree.insert(1), Err(Error::DuplicateValue));
    /// assert_eq!(tree.len(), 1);
    /// ```
    pub fn insert(&mut self, value: T) -> Result<Handle, Error> {
        let mut current = match self.root {
            None => {
                let handle = self.arena.allocate(Node::new(value, Color::Black));
                self.root = Some(handle);
                return Ok(handle);
            }
            Some(root) => root,
        };

        let (parent, side) = loop {
            let side = match (self.compare)(&value, &self.arena[current].value) {
                Ordering::Equal => return Err(Error::DuplicateValue),
                Ordering::Less => Side::Left,
                Ordering::Greater => Side::Right,
            };
            match self.arena[current].child(side) {
                Some(child) => current = child,
                None => break (current, side),
            }
        };

        let handle = self.arena.allocate(Node::new(value, Color::Red));
        self.arena[handle].parent = Some(parent);
        self.arena[parent].set_child(side, Some(handle));
        self.insert_fixup(handle);
        Ok(handle)
    }

    /// Returns a handle to the node holding a value equal to the given value, or `None` if no
    /// such node exists. Searching an empty tree is a normal not-found outcome, not an error.
    ///
    /// # Examples
    ///
    /// ```
    /// use arena_collections::red_black_tree::RedBlackTree;
    ///
    /// let mut tree = RedBlackTree::new();
    /// tree.insert(2).unwrap();
    ///
    /// let handle = tree.search(&2).unwrap();
    /// assert_eq!(tree.get(handle), Some(&2));
    /// assert_eq!(tree.search(&1), None);
    /// ```
    pub fn search(&self, value: &T) -> Option<Handle> {
        let mut current = self.root;
        while let Some(handle) = current {
            current = match (self.compare)(value, &self.arena[handle].value) {
                Ordering::Equal => return Some(handle),
                Ordering::Less => self.arena[handle].left,
                Ordering::Greater => self.arena[handle].right,
            };
        }
        None
    }

    /// Checks if a value exists in the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use arena_collections::red_black_tree::RedBlackTree;
    ///
    /// let mut tree = RedBlackTree::new();
    /// tree.insert(1).unwrap();
    /// assert!(!tree.contains(&0));
    /// assert!(tree.contains(&1));
    /// ```
    pub fn contains(&self, value: &T) -> bool {
        self.search(value).is_some()
    }
}

impl<T, C> RedBlackTree<T, C> {
    /// Removes the node the handle refers to, rebalances the tree, and returns the node's value.
    /// Returns `Err(Error::InvalidHandle)` if the handle does not refer to a live node.
    ///
    /// # Examples
    ///
    /// ```
    /// use arena_collections::error::Error;
    /// use arena_collections::red_black_tree::RedBlackTree;
    ///
    /// let mut tree = RedBlackTree::new();
    /// let handle = tree.insert(1).unwrap();
    /// assert_eq!(tree.remove(handle), Ok(1));
    /// assert_eq!(tree.remove(handle), Err(Error::InvalidHandle));
    /// ```
    pub fn remove(&mut self, node: Handle) -> Result<T, Error> {
        if self.arena.get(node).is_none() {
            return Err(Error::InvalidHandle);
        }

        let left = self.arena[node].left;
        let right = self.arena[node].right;
        let mut removed_color = self.arena[node].color;

        // `replacement` is the node that takes over the vacated position. It may be absent, in
        // which case its effective parent has to be tracked on the side since an absent child
        // carries no parent link of its own.
        let (replacement, replacement_parent) = match (left, right) {
            (None, child) | (child, None) => {
                let parent = self.arena[node].parent;
                self.transplant(node, child);
                (child, parent)
            }
            (Some(_), Some(right_child)) => {
                let successor = self.descend(right_child, Side::Left);
                removed_color = self.arena[successor].color;
                let replacement = self.arena[successor].right;

                let replacement_parent = if self.arena[successor].parent == Some(node) {
                    // The successor keeps its right subtree, so it remains the effective parent
                    // of the vacated position after it is grafted in.
                    Some(successor)
                } else {
                    let successor_parent = self.arena[successor].parent;
                    self.transplant(successor, replacement);
                    let grafted_right = self.arena[node].right;
                    self.arena[successor].right = grafted_right;
                    if let Some(child) = grafted_right {
                        self.arena[child].parent = Some(successor);
                    }
                    successor_parent
                };

                self.transplant(node, Some(successor));
                let grafted_left = self.arena[node].left;
                self.arena[successor].left = grafted_left;
                if let Some(child) = grafted_left {
                    self.arena[child].parent = Some(successor);
                }
                let node_color = self.arena[node].color;
                self.arena[successor].color = node_color;

                (replacement, replacement_parent)
            }
        };

        if removed_color == Color::Black {
            self.remove_fixup(replacement, replacement_parent);
        }

        Ok(self.arena.free(node).value)
    }

    /// Returns an immutable reference to the value of the node the handle refers to, or `None`
    /// if the handle does not refer to a live node. No mutable access is provided because the
    /// value is the ordering key.
    ///
    /// # Examples
    ///
    /// ```
    /// use arena_collections::red_black_tree::RedBlackTree;
    ///
    /// let mut tree = RedBlackTree::new();
    /// let handle = tree.insert(1).unwrap();
    /// assert_eq!(tree.get(handle), Some(&1));
    /// ```
    pub fn get(&self, handle: Handle) -> Option<&T> {
        self.arena.get(handle).map(|node| &node.value)
    }

    /// Returns a handle to the node holding the minimum value of the tree. Calling `min` on an
    /// empty tree is an invalid operation and returns `Err(Error::EmptyTree)`, unlike `search`
    /// where not-found is a normal outcome.
    ///
    /// # Examples
    ///
    /// ```
    /// use arena_collections::error::Error;
    /// use arena_collections::red_black_tree::RedBlackTree;
    ///
    /// let mut tree = RedBlackTree::new();
    /// assert_eq!(tree.min(), Err(Error::EmptyTree));
    ///
    /// tree.insert(3).unwrap();
    /// tree.insert(1).unwrap();
    ///
    /// let min = tree.min().unwrap();
    /// assert_eq!(tree.get(min), Some(&1));
    /// ```
    pub fn min(&self) -> Result<Handle, Error> {
        match self.root {
            None => Err(Error::EmptyTree),
            Some(root) => Ok(self.descend(root, Side::Left)),
        }
    }

    /// Returns a handle to the node holding the maximum value of the tree. Calling `max` on an
    /// empty tree is an invalid operation and returns `Err(Error::EmptyTree)`.
    ///
    /// # Examples
    ///
    /// ```
    /// use arena_collections::red_black_tree::RedBlackTree;
    ///
    /// let mut tree = RedBlackTree::new();
    /// tree.insert(3).unwrap();
    /// tree.insert(1).unwrap();
    ///
    /// let max = tree.max().unwrap();
    /// assert_eq!(tree.get(max), Some(&3));
    /// ```
    pub fn max(&self) -> Result<Handle, Error> {
        match self.root {
            None => Err(Error::EmptyTree),
            Some(root) => Ok(self.descend(root, Side::Right)),
        }
    }

    /// Performs an in-order traversal of the tree, invoking `visit` on every value in ascending
    /// comparator order.
    ///
    /// # Examples
    ///
    /// ```
    /// use arena_collections::red_black_tree::RedBlackTree;
    ///
    /// let mut tree = RedBlackTree::new();
    /// tree.insert(5).unwrap();
    /// tree.insert(1).unwrap();
    /// tree.insert(3).unwrap();
    ///
    /// let mut values = Vec::new();
    /// tree.traverse(|value| values.push(*value));
    /// assert_eq!(values, vec![1, 3, 5]);
    /// ```
    pub fn traverse<F>(&self, mut visit: F)
    where
        F: FnMut(&T),
    {
        self.traverse_subtree(self.root, &mut visit);
    }

    /// Returns the number of nodes in the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use arena_collections::red_black_tree::RedBlackTree;
    ///
    /// let mut tree = RedBlackTree::new();
    /// tree.insert(1).unwrap();
    /// assert_eq!(tree.len(), 1);
    /// ```
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    /// Returns `true` if the tree is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use arena_collections::red_black_tree::RedBlackTree;
    ///
    /// let tree: RedBlackTree<u32, _> = RedBlackTree::new();
    /// assert!(tree.is_empty());
    /// ```
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Clears the tree, removing all nodes and invalidating every outstanding handle.
    ///
    /// # Examples
    ///
    /// ```
    /// use arena_collections::red_black_tree::RedBlackTree;
    ///
    /// let mut tree = RedBlackTree::new();
    /// tree.insert(1).unwrap();
    /// tree.insert(2).unwrap();
    /// tree.clear();
    /// assert_eq!(tree.is_empty(), true);
    /// ```
    pub fn clear(&mut self) {
        self.arena.clear();
        self.root = None;
    }

    /// Returns an iterator over the tree. The iterator will yield immutable references to the
    /// values using in-order traversal.
    ///
    /// # Examples
    ///
    /// ```
    /// use arena_collections::red_black_tree::RedBlackTree;
    ///
    /// let mut tree = RedBlackTree::new();
    /// tree.insert(1).unwrap();
    /// tree.insert(3).unwrap();
    ///
    /// let mut iterator = tree.iter();
    /// assert_eq!(iterator.next(), Some(&1));
    /// assert_eq!(iterator.next(), Some(&3));
    /// assert_eq!(iterator.next(), None);
    /// ```
    pub fn iter(&self) -> RedBlackTreeIter<'_, T> {
        let mut iter = RedBlackTreeIter {
            arena: &self.arena,
            stack: Vec::new(),
        };
        iter.push_left_spine(self.root);
        iter
    }

    fn color_of(&self, node: Option<Handle>) -> Color {
        match node {
            None => Color::Black,
            Some(handle) => self.arena[handle].color,
        }
    }

    fn side_of(&self, node: Handle, parent: Handle) -> Side {
        if self.arena[parent].left == Some(node) {
            Side::Left
        } else {
            Side::Right
        }
    }

    fn descend(&self, from: Handle, side: Side) -> Handle {
        let mut current = from;
        while let Some(child) = self.arena[current].child(side) {
            current = child;
        }
        current
    }

    fn traverse_subtree<F>(&self, node: Option<Handle>, visit: &mut F)
    where
        F: FnMut(&T),
    {
        if let Some(handle) = node {
            self.traverse_subtree(self.arena[handle].left, visit);
            visit(&self.arena[handle].value);
            self.traverse_subtree(self.arena[handle].right, visit);
        }
    }

    /// Rotates the subtree rooted at `root` toward `side`, making the child opposite `side` the
    /// new subtree root. Purely structural; colors are untouched.
    fn rotate(&mut self, root: Handle, side: Side) {
        let pivot = self.arena[root]
            .child(side.opposite())
            .expect("Expected a child opposite the rotation direction.");
        let transplanted = self.arena[pivot].child(side);
        let parent = self.arena[root].parent;

        self.arena[pivot].parent = parent;
        match parent {
            None => self.root = Some(pivot),
            Some(parent) => {
                let root_side = self.side_of(root, parent);
                self.arena[parent].set_child(root_side, Some(pivot));
            }
        }

        self.arena[root].parent = Some(pivot);
        self.arena[pivot].set_child(side, Some(root));
        self.arena[root].set_child(side.opposite(), transplanted);
        if let Some(child) = transplanted {
            self.arena[child].parent = Some(root);
        }
    }

    /// Restores the no-red-red-edge invariant bottom-up from a freshly inserted red node, then
    /// recolors the root black.
    fn insert_fixup(&mut self, mut node: Handle) {
        while Some(node) != self.root
            && self.arena[node].color == Color::Red
            && self.color_of(self.arena[node].parent) == Color::Red
        {
            let mut parent = self.arena[node]
                .parent
                .expect("Expected a parent during insert rebalancing.");
            let grandparent = self.arena[parent]
                .parent
                .expect("Expected a grandparent during insert rebalancing.");
            let parent_side = self.side_of(parent, grandparent);
            let uncle = self.arena[grandparent].child(parent_side.opposite());

            match uncle {
                Some(uncle) if self.arena[uncle].color == Color::Red => {
                    // Red uncle: recoloring alone resolves the conflict at this level but may
                    // introduce a new one at the grandparent, so keep ascending.
                    self.arena[grandparent].color = Color::Red;
                    self.arena[parent].color = Color::Black;
                    self.arena[uncle].color = Color::Black;
                    node = grandparent;
                }
                _ => {
                    if self.side_of(node, parent) != parent_side {
                        // Zig-zag: straighten the edge first, then the old parent becomes the
                        // node under consideration.
                        self.rotate(parent, parent_side);
                        node = parent;
                        parent = self.arena[node]
                            .parent
                            .expect("Expected a parent during insert rebalancing.");
                    }

                    self.rotate(grandparent, parent_side.opposite());
                    let parent_color = self.arena[parent].color;
                    let grandparent_color = self.arena[grandparent].color;
                    self.arena[parent].color = grandparent_color;
                    self.arena[grandparent].color = parent_color;
                    node = parent;
                }
            }
        }

        let root = self.root.expect("Expected a non-empty tree.");
        self.arena[root].color = Color::Black;
    }

    /// Restores the uniform black-height invariant after splicing out a black node. `node` is
    /// the replacement (possibly absent) and `leaf_parent` its effective parent, used when the
    /// replacement is absent.
    fn remove_fixup(&mut self, mut node: Option<Handle>, leaf_parent: Option<Handle>) {
        while node != self.root && self.color_of(node) == Color::Black {
            let parent = match node {
                Some(handle) => self.arena[handle].parent,
                None => leaf_parent,
            }
            .expect("Expected a parent during delete rebalancing.");

            let side = match node {
                Some(handle) => self.side_of(handle, parent),
                None => {
                    if self.arena[parent].left.is_none() {
                        Side::Left
                    } else {
                        Side::Right
                    }
                }
            };

            let mut sibling = self.arena[parent]
                .child(side.opposite())
                .expect("Expected a sibling during delete rebalancing.");

            if self.arena[sibling].color == Color::Red {
                // Red sibling: rotate it above the parent to reduce to one of the black-sibling
                // cases below.
                self.arena[sibling].color = Color::Black;
                self.arena[parent].color = Color::Red;
                self.rotate(parent, side);
                sibling = self.arena[parent]
                    .child(side.opposite())
                    .expect("Expected a sibling during delete rebalancing.");
            }

            let near_child = self.arena[sibling].child(side);
            let far_child = self.arena[sibling].child(side.opposite());

            if self.color_of(near_child) == Color::Black
                && self.color_of(far_child) == Color::Black
            {
                // Both sibling children black: push the black-height deficit up one level.
                self.arena[sibling].color = Color::Red;
                node = Some(parent);
                continue;
            }

            if self.color_of(far_child) == Color::Black {
                // Near child red, far child black: rotate the sibling to make the far child red.
                if let Some(near_child) = near_child {
                    self.arena[near_child].color = Color::Black;
                }
                self.arena[sibling].color = Color::Red;
                self.rotate(sibling, side.opposite());
                sibling = self.arena[parent]
                    .child(side.opposite())
                    .expect("Expected a sibling during delete rebalancing.");
            }

            // Far child red: one rotation settles the deficit for good.
            let parent_color = self.arena[parent].color;
            self.arena[sibling].color = parent_color;
            self.arena[parent].color = Color::Black;
            if let Some(far_child) = self.arena[sibling].child(side.opposite()) {
                self.arena[far_child].color = Color::Black;
            }
            self.rotate(parent, side);
            node = self.root;
        }

        if let Some(handle) = node {
            self.arena[handle].color = Color::Black;
        }
    }

    /// Replaces `node` in its parent's child slot with `replacement`, which may be absent. The
    /// replaced node keeps its own links.
    fn transplant(&mut self, node: Handle, replacement: Option<Handle>) {
        let parent = self.arena[node].parent;
        match parent {
            None => self.root = replacement,
            Some(parent) => {
                let side = self.side_of(node, parent);
                self.arena[parent].set_child(side, replacement);
            }
        }
        if let Some(handle) = replacement {
            self.arena[handle].parent = parent;
        }
    }
}

impl<T> Default for RedBlackTree<T, fn(&T, &T) -> Ordering>
where
    T: Ord,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, C> IntoIterator for RedBlackTree<T, C> {
    type IntoIter = RedBlackTreeIntoIter<T>;
    type Item = T;

    fn into_iter(self) -> Self::IntoIter {
        let mut ordered = Vec::with_capacity(self.len());
        let mut stack = Vec::new();
        let mut current = self.root;
        loop {
            while let Some(handle) = current {
                stack.push(handle);
                current = self.arena[handle].left;
            }
            match stack.pop() {
                None => break,
                Some(handle) => {
                    current = self.arena[handle].right;
                    ordered.push(handle);
                }
            }
        }
        RedBlackTreeIntoIter {
            arena: self.arena,
            ordered: ordered.into_iter(),
        }
    }
}

impl<'a, T, C> IntoIterator for &'a RedBlackTree<T, C>
where
    T: 'a,
{
    type IntoIter = RedBlackTreeIter<'a, T>;
    type Item = &'a T;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An owning iterator for `RedBlackTree<T, C>`.
///
/// This iterator traverses the nodes of the tree in-order and yields owned values.
pub struct RedBlackTreeIntoIter<T> {
    arena: Arena<Node<T>>,
    ordered: vec::IntoIter<Handle>,
}

impl<T> Iterator for RedBlackTreeIntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.ordered
            .next()
            .map(|handle| self.arena.free(handle).value)
    }
}

/// An iterator for `RedBlackTree<T, C>`.
///
/// This iterator traverses the nodes of the tree in-order and yields immutable references.
pub struct RedBlackTreeIter<'a, T> {
    arena: &'a Arena<Node<T>>,
    stack: Vec<Handle>,
}

impl<'a, T> RedBlackTreeIter<'a, T> {
    fn push_left_spine(&mut self, mut current: Option<Handle>) {
        while let Some(handle) = current {
            self.stack.push(handle);
            current = self.arena[handle].left;
        }
    }
}

impl<'a, T> Iterator for RedBlackTreeIter<'a, T>
where
    T: 'a,
{
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let handle = self.stack.pop()?;
        let arena = self.arena;
        self.push_left_spine(arena[handle].right);
        Some(&arena[handle].value)
    }
}
