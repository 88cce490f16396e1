use crate::index::{IndexType, NodeIndex};

/// Node of the red-black tree
#[derive(Debug, Clone)]
pub struct Node<K, V, Ix> {
    /// Left children
    pub left: NodeIndex<Ix>,
    /// Right children
    pub right: NodeIndex<Ix>,
    /// Parent
    pub parent: NodeIndex<Ix>,
    /// Color of the node
    pub color: Color,

    /// Key of the node, `None` only for the sentinel
    pub key: Option<K>,
    /// Value of the node, `None` only for the sentinel
    pub value: Option<V>,
}

// Convenient getter/setter methods
impl<K, V, Ix> Node<K, V, Ix>
where
    Ix: IndexType,
{
    pub fn color(&self) -> Color {
        self.color
    }

    pub fn key(&self) -> &K {
        self.key.as_ref().expect("sentinel node has no key")
    }

    pub fn left(&self) -> NodeIndex<Ix> {
        self.left
    }

    pub fn right(&self) -> NodeIndex<Ix> {
        self.right
    }

    pub fn parent(&self) -> NodeIndex<Ix> {
        self.parent
    }

    pub fn is_sentinel(&self) -> bool {
        self.key.is_none()
    }

    pub fn is_black(&self) -> bool {
        matches!(self.color, Color::Black)
    }

    pub fn is_red(&self) -> bool {
        matches!(self.color, Color::Red)
    }

    pub fn value(&self) -> &V {
        self.value.as_ref().expect("sentinel node has no value")
    }

    pub fn value_mut(&mut self) -> &mut V {
        self.value.as_mut().expect("sentinel node has no value")
    }

    pub fn key_value(&self) -> (&K, &V) {
        (self.key(), self.value())
    }

    pub fn key_value_mut(&mut self) -> Option<(&K, &mut V)> {
        match (&self.key, &mut self.value) {
            (Some(key), Some(value)) => Some((key, value)),
            _ => None,
        }
    }

    pub fn take_entry(&mut self) -> Option<(K, V)> {
        self.key.take().zip(self.value.take())
    }

    pub fn set_value(value: V) -> impl FnOnce(&mut Node<K, V, Ix>) -> V {
        move |node: &mut Node<K, V, Ix>| {
            std::mem::replace(node.value_mut(), value)
        }
    }

    pub fn set_color(color: Color) -> impl FnOnce(&mut Node<K, V, Ix>) {
        move |node: &mut Node<K, V, Ix>| {
            node.color = color;
        }
    }

    pub fn set_left(left: NodeIndex<Ix>) -> impl FnOnce(&mut Node<K, V, Ix>) {
        move |node: &mut Node<K, V, Ix>| {
            node.left = left;
        }
    }

    pub fn set_right(right: NodeIndex<Ix>) -> impl FnOnce(&mut Node<K, V, Ix>) {
        move |node: &mut Node<K, V, Ix>| {
            node.right = right;
        }
    }

    pub fn set_parent(parent: NodeIndex<Ix>) -> impl FnOnce(&mut Node<K, V, Ix>) {
        move |node: &mut Node<K, V, Ix>| {
            node.parent = parent;
        }
    }
}

/// The color of the node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    /// Red node
    Red,
    /// Black node
    Black,
}
