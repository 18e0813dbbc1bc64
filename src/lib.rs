pub mod affinity;
pub mod config;
pub mod consts;
pub mod core_types;
pub mod cost;
pub mod error;
pub mod generator;
pub mod grid;
pub mod inertia;
pub mod ledger;
pub mod loader;
pub mod pipeline;
pub mod refine;
pub mod solver;
pub mod stats;
// cmd and reports are modules of the binary crate (main.rs).
