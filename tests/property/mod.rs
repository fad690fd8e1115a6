//! Property-based tests for chain and layout invariants

mod chain_properties;
mod layout_properties;
