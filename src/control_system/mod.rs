// control_system/mod.rs
pub mod signal_arbitrator;

pub use signal_arbitrator::{arbitrate, rank_lanes};
