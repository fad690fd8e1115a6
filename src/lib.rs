//! Frameflow: content flow across linked page chains
//!
//! Places a stream of items onto pages top to bottom, optionally wrapping into
//! columns, and spawns new pages on overflow. Spawned pages are linked into a
//! chain with Next, Previous and First navigation buttons.

pub mod cli;
pub mod config;
pub mod error;
pub mod flow;
pub mod geometry;
pub mod item;
pub mod logging;
pub mod nav;
pub mod page;
pub mod store;
pub mod types;
