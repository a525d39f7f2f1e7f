/// Error enumerates over all recoverable errors returned by tree operations.
///
/// Internal inconsistencies discovered during rebalancing are not represented here; they indicate
/// a broken tree rather than caller misuse and cause a panic instead.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Error {
    /// Returned by insert when the value is already present in the tree.
    DuplicateValue,
    /// Returned by min and max when the tree contains no nodes.
    EmptyTree,
    /// Returned by operations taking a handle when the handle does not refer to a live node.
    InvalidHandle,
}
