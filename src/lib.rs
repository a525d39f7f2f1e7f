//! Arena-backed ordered collections with stable handles to their elements.
//!
//! Nodes live in a typed arena and refer to each other through copyable
//! handles, so structures that need parent back-references can keep them
//! without sharing ownership.

pub mod arena;
pub mod error;
pub mod red_black_tree;
