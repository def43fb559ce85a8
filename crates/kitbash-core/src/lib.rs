//! Kitbash Core -- recursive bill-of-materials resolution for crafting trees.
//!
//! A crafting tree is built from [`component::Component`] nodes: a node with
//! no children is a raw resource, anything else is an assembly. Trees live in
//! a [`tree::CraftingTree`] arena and are aggregated in three ways:
//!
//! - **Mind cost** and **time cost**: each node's own cost plus the totals of
//!   all of its children ([`tree::CraftingTree::totals`]).
//! - **Collapse**: the flat map of leaf resource name to total quantity
//!   ([`tree::CraftingTree::collapse`]).
//!
//! # Building a tree
//!
//! ```rust
//! use kitbash_core::component::ComponentDef;
//! use kitbash_core::grade::Grade;
//! use kitbash_core::tree::CraftingTree;
//!
//! let mut tree = CraftingTree::new();
//! let frame = tree.create(
//!     ComponentDef::new("Mechanical Auto Frame")
//!         .grade(Grade::Basic)
//!         .mind_cost(5)
//!         .time_cost(20),
//! );
//! let alloy = tree.create(ComponentDef::leaf("Alloy Metal", 3));
//! tree.add(frame, alloy).unwrap();
//!
//! assert_eq!(tree.total_mind(frame).unwrap(), 5);
//! assert_eq!(tree.collapse(frame).unwrap()["Alloy Metal"], 3);
//! ```
//!
//! # Key Types
//!
//! - [`tree::CraftingTree`] -- Arena of components with construction and
//!   aggregation; guards every walk against cycles and excessive depth.
//! - [`component::ComponentDef`] -- Factory arguments with defaults.
//! - [`merge`] -- Key-wise map merge that sums numeric collisions.
//! - [`grade::Grade`] -- Quality tier with a stable ordinal contract.
//! - [`metadata`] -- Item categories and expiration, descriptive only.

pub mod component;
pub mod grade;
pub mod id;
pub mod merge;
pub mod metadata;
pub mod tree;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
