//! the test_utils folder here will share utils or test components between
//! unit tests of the storage layer
mod common;
mod record_builder;

pub use common::*;
pub use record_builder::*;
