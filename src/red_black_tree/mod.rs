//! Self-balancing binary search tree that uses a color bit to ensure that the tree remains
//! approximately balanced during insertions and deletions. Nodes are allocated in an arena and
//! exposed through stable handles.

mod node;
mod tree;

pub use self::tree::{RedBlackTree, RedBlackTreeIntoIter, RedBlackTreeIter};
pub use crate::arena::Handle as NodeHandle;
