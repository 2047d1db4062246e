pub mod fault_tests;
