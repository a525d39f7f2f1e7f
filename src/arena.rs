//! Fast, but limited allocator.

use std::mem;
use std::ops::{Index, IndexMut};

/// A handle to an object allocated in an `Arena<T>`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Handle {
    index: usize,
}

enum Slot<T> {
    Occupied(T),
    Vacant(Option<usize>),
}

/// A fast, but limited allocator that only allocates a single type of object.
///
/// Objects are stored in a vector of slots and addressed through copyable handles, so they can
/// freely refer to each other without sharing ownership. Freed slots are threaded into a free
/// list and reused by later allocations, which also means a handle is only valid until the object
/// it refers to is freed. All remaining objects are destroyed when the arena is destroyed.
///
/// # Examples
///
/// ```
/// use arena_collections::arena::Arena;
///
/// let mut arena = Arena::new();
///
/// let x = arena.allocate(1);
/// assert_eq!(arena[x], 1);
///
/// arena[x] += 1;
/// assert_eq!(arena.free(x), 2);
/// ```
pub struct Arena<T> {
    slots: Vec<Slot<T>>,
    head: Option<usize>,
    len: usize,
}

impl<T> Arena<T> {
    /// Constructs a new, empty `Arena<T>`.
    ///
    /// # Examples
    ///
    /// ```
    /// use arena_collections::arena::Arena;
    ///
    /// let arena: Arena<u32> = Arena::new();
    /// ```
    pub fn new() -> Self {
        Arena {
            slots: Vec::new(),
            head: None,
            len: 0,
        }
    }

    /// Allocates an object in the arena and returns a handle to it. The handle can later be used
    /// to retrieve mutable and immutable references to the object, and to free the object.
    ///
    /// # Examples
    ///
    /// ```
    /// use arena_collections::arena::Arena;
    ///
    /// let mut arena = Arena::new();
    /// let x = arena.allocate(0);
    /// ```
    pub fn allocate(&mut self, value: T) -> Handle {
        self.len += 1;
        match self.head.take() {
            None => {
                self.slots.push(Slot::Occupied(value));
                Handle {
                    index: self.slots.len() - 1,
                }
            }
            Some(index) => {
                let vacant_slot = mem::replace(&mut self.slots[index], Slot::Occupied(value));
                match vacant_slot {
                    Slot::Vacant(next_vacant) => {
                        self.head = next_vacant;
                        Handle { index }
                    }
                    Slot::Occupied(_) => panic!("Expected a vacant slot."),
                }
            }
        }
    }

    /// Frees an object in the arena and returns the object. The freed slot will be reused by a
    /// later allocation, invalidating the handle.
    ///
    /// # Panics
    ///
    /// Panics if the handle refers to an invalid or vacant slot.
    ///
    /// # Examples
    ///
    /// ```
    /// use arena_collections::arena::Arena;
    ///
    /// let mut arena = Arena::new();
    /// let x = arena.allocate(0);
    /// assert_eq!(arena.free(x), 0);
    /// ```
    pub fn free(&mut self, handle: Handle) -> T {
        if handle.index >= self.slots.len() {
            panic!("Error: attempting to free an invalid slot.");
        }
        let old_slot = mem::replace(
            &mut self.slots[handle.index],
            Slot::Vacant(self.head.take()),
        );
        match old_slot {
            Slot::Vacant(_) => panic!("Error: attempting to free a vacant slot."),
            Slot::Occupied(value) => {
                self.len -= 1;
                self.head = Some(handle.index);
                value
            }
        }
    }

    /// Returns an immutable reference to the object the handle refers to. Returns `None` if the
    /// handle does not refer to a live object.
    ///
    /// # Examples
    ///
    /// ```
    /// use arena_collections::arena::Arena;
    ///
    /// let mut arena = Arena::new();
    /// let x = arena.allocate(0);
    /// assert_eq!(arena.get(x), Some(&0));
    /// ```
    pub fn get(&self, handle: Handle) -> Option<&T> {
        match self.slots.get(handle.index) {
            Some(Slot::Occupied(ref value)) => Some(value),
            _ => None,
        }
    }

    /// Returns a mutable reference to the object the handle refers to. Returns `None` if the
    /// handle does not refer to a live object.
    ///
    /// # Examples
    ///
    /// ```
    /// use arena_collections::arena::Arena;
    ///
    /// let mut arena = Arena::new();
    /// let x = arena.allocate(0);
    /// assert_eq!(arena.get_mut(x), Some(&mut 0));
    /// ```
    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut T> {
        match self.slots.get_mut(handle.index) {
            Some(Slot::Occupied(ref mut value)) => Some(value),
            _ => None,
        }
    }

    /// Returns the number of live objects in the arena.
    ///
    /// # Examples
    ///
    /// ```
    /// use arena_collections::arena::Arena;
    ///
    /// let mut arena = Arena::new();
    /// arena.allocate(0);
    /// assert_eq!(arena.len(), 1);
    /// ```
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the arena contains no live objects.
    ///
    /// # Examples
    ///
    /// ```
    /// use arena_collections::arena::Arena;
    ///
    /// let arena: Arena<u32> = Arena::new();
    /// assert!(arena.is_empty());
    /// ```
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Destroys all objects in the arena, invalidating every outstanding handle.
    ///
    /// # Examples
    ///
    /// ```
    /// use arena_collections::arena::Arena;
    ///
    /// let mut arena = Arena::new();
    /// arena.allocate(0);
    /// arena.clear();
    /// assert!(arena.is_empty());
    /// ```
    pub fn clear(&mut self) {
        self.slots.clear();
        self.head = None;
        self.len = 0;
    }
}

impl<T> Index<Handle> for Arena<T> {
    type Output = T;

    fn index(&self, handle: Handle) -> &Self::Output {
        self.get(handle).expect("Error: handle out of bounds.")
    }
}

impl<T> IndexMut<Handle> for Arena<T> {
    fn index_mut(&mut self, handle: Handle) -> &mut Self::Output {
        self.get_mut(handle).expect("Error: handle out of bounds.")
    }
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::Arena;
    use super::Handle;

    #[test]
    #[should_panic]
    fn test_free_invalid_slot() {
        let mut arena: Arena<u32> = Arena::new();
        arena.free(Handle { index: 0 });
    }

    #[test]
    #[should_panic]
    fn test_free_vacant_slot() {
        let mut arena = Arena::new();
        let handle = arena.allocate(0);
        arena.free(handle);
        arena.free(handle);
    }

    #[test]
    fn test_allocate() {
        let mut arena = Arena::new();
        assert_eq!(arena.allocate(0), Handle { index: 0 });
        assert_eq!(arena.allocate(0), Handle { index: 1 });
        assert_eq!(arena.allocate(0), Handle { index: 2 });
        assert_eq!(arena.len(), 3);
    }

    #[test]
    fn test_free_reuses_slot() {
        let mut arena = Arena::new();
        let handle = arena.allocate(0);
        assert_eq!(handle, Handle { index: 0 });
        assert_eq!(arena.free(handle), 0);
        assert_eq!(arena.allocate(1), handle);
        assert_eq!(arena.len(), 1);
    }

    #[test]
    fn test_get() {
        let mut arena = Arena::new();
        let handle = arena.allocate(0);
        assert_eq!(arena.get(handle), Some(&0));
    }

    #[test]
    fn test_get_invalid_slot() {
        let arena: Arena<u32> = Arena::new();
        assert_eq!(arena.get(Handle { index: 0 }), None);
    }

    #[test]
    fn test_get_vacant_slot() {
        let mut arena = Arena::new();
        let handle = arena.allocate(0);
        arena.free(handle);
        assert_eq!(arena.get(handle), None);
    }

    #[test]
    fn test_get_mut() {
        let mut arena = Arena::new();
        let handle = arena.allocate(0);
        *arena.get_mut(handle).unwrap() = 1;
        assert_eq!(arena.get(handle), Some(&1));
    }

    #[test]
    fn test_clear() {
        let mut arena = Arena::new();
        let handle = arena.allocate(0);
        arena.allocate(1);
        arena.clear();
        assert!(arena.is_empty());
        assert_eq!(arena.get(handle), None);
    }
}
