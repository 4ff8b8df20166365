//! # Overview
//!
//! This crate implements the [Zhang–Shasha][zs] algorithm for the edit distance between ordered,
//! labeled trees, together with the recovery of a lowest cost sequence of edits that transforms
//! one tree into the other. It is geared towards comparing the dependency trees of two
//! sentences, as printed by the [CaboCha][cabocha] parser, but any label that can be compared for
//! equality will do.
//!
//! Edits follow the unit-cost model: removing or adding a node costs one, relabeling a node costs
//! one if the labels differ and nothing otherwise.
//!
//! [zs]: https://doi.org/10.1137/0218082
//! [cabocha]: https://taku910.github.io/cabocha/
//!
//! # Example
//!
//! ```rust
//! use dependency_ted::*;
//!
//! //     f            f
//! //    / \          / \
//! //   d   e        c   e
//! //  / \           |
//! // a   c          d
//! //     |         / \
//! //     b        a   b
//! let left = Tree::build(
//!     &[Some(3), Some(2), Some(3), Some(5), Some(5), None],
//!     vec!["a", "b", "c", "d", "e", "f"],
//! )?;
//!
//! let right = Tree::build(
//!     &[Some(3), Some(3), Some(5), Some(2), Some(5), None],
//!     vec!["a", "b", "c", "d", "e", "f"],
//! )?;
//!
//! let (distance, edits) = compute(&left, &right);
//!
//! assert_eq!(f64::from(distance), 2.);
//!
//! assert_eq!(&*edits, &[
//!     Edit::Delete(&"c"), // c is added above d on the right-hand side
//!     Edit::Insert(&"c"), // and dropped below d on the left-hand side
//! ]);
//! # Ok::<(), TreeError>(())
//! ```

pub mod cabocha;

mod cost;
mod edit;
mod engine;
mod tree;

pub use cost::*;
pub use edit::*;
pub use engine::*;
pub use tree::*;

mod backtrack;
mod distance;
