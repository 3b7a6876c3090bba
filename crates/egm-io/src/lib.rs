//! # egm-io: Dataset Assembly and Persistence
//!
//! Composes generator outputs into one validated [`egm_core::Dataset`] and
//! persists it (and the optional topology edges) as structured JSON with a
//! lossless round trip.

pub mod assemble;
pub mod store;

pub use assemble::assemble;
pub use store::{load_dataset, load_topology, save_dataset, save_topology};
