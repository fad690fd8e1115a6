//! Integration tests for frame flow and page chaining

mod config_integration;
mod pagination;
mod spawn_protocol;
mod stored_sessions;
mod test_utils;
