pub mod common;
pub mod attributes_tests;
pub mod loader_tests;
pub mod manager_tests;
pub mod controller_tests;
