// Library crate: exposes the editor core for integration tests and the
// command-line driver. Rendering and widget code live outside this crate.

pub mod catalog;
pub mod command;
pub mod error;
pub mod fixtures;
pub mod harness;
pub mod input;
pub mod state;
pub mod storage;
pub mod viewport;
