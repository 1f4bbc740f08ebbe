//! Quire Benchmark Library
//!
//! Document generators and database setup shared by the criterion benches.

pub mod data_gen;
pub mod stores;
