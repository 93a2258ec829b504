//! Inventory model served by the agent.
//!
//! The cache and the supervisor are generic over the snapshot type; this
//! module provides the concrete one, a list of Gardener shoots, together with
//! the decoding of Gardener's JSON representation and the filters applied by
//! the query path.

mod filter;
mod gardener;
mod shoot;

#[cfg(test)]
mod inventory_test;

pub use filter::*;
pub use gardener::*;
pub use shoot::*;
