use crate::arena::Handle;

/// An enum representing the color of a node in a red black tree.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Color {
    Red,
    Black,
}

/// An enum naming the two child slots of a node.
///
/// The rebalancing passes are written once in terms of a side and its opposite, so the mirrored
/// left-handed and right-handed cases share a single implementation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// A struct representing an internal node of a red black tree.
///
/// The parent handle is a non-owning back-reference used only for upward traversal during
/// rebalancing; ownership of a node belongs to the arena.
pub struct Node<T> {
    pub value: T,
    pub color: Color,
    pub parent: Option<Handle>,
    pub left: Option<Handle>,
    pub right: Option<Handle>,
}

impl<T> Node<T> {
    pub fn new(value: T, color: Color) -> Self {
        Node {
            value,
            color,
            parent: None,
            left: None,
            right: None,
        }
    }

    pub fn child(&self, side: Side) -> Option<Handle> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    pub fn set_child(&mut self, side: Side, child: Option<Handle>) {
        match side {
            Side::Left => self.left = child,
            Side::Right => self.right = child,
        }
    }
}
