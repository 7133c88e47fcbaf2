// simulation_engine/mod.rs
pub mod arrivals;
pub mod junctions;
pub mod lanes;
pub mod simulation;

pub use arrivals::ArrivalSampler;
pub use junctions::{Junction, JunctionId, SignalState};
pub use lanes::Lane;
pub use simulation::{simulate, simulate_concurrent, SimulationRun};
