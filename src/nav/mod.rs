//! Navigation
//!
//! Button templates and the chain of pages they link together.

pub mod button;
pub mod chain;

pub use button::{attach, make_button, ButtonTemplates, NavRole};
pub use chain::{follow_stored, Chain, ChainWalk, NavEdge, PageId, PageLinks};
