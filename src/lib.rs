//! Computes minimal, rule-specific fixes for violations reported against C# and
//! Visual Basic program models, and folds batches of them into new snapshots.
//!
//! Hosts open [`model::Document`] snapshots on a [`core::engine::FixEngine`],
//! register violations, then apply or preview the resulting fixes.

pub mod adapters;
pub mod cli;
pub mod core;
pub mod fixers;
pub mod model;
pub mod utils;

#[cfg(test)]
mod testing;
