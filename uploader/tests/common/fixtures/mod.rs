//! This module provides reusable test utilities:
//! - Mock exchange server speaking the line protocol
//! - Input file builders on temporary directories
//! - Common test data

// Allow unused code in test fixtures - not every test file uses every helper
#![allow(dead_code)]
#![allow(unused_imports)]

pub mod mock_exchange;
pub mod test_data;
pub mod test_files;

// Re-export commonly used items
pub use mock_exchange::*;
pub use test_data::*;
pub use test_files::*;
