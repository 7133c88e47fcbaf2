//! Poisson arrivals and signal arbitration for road junctions.
//!
//! Each simulation step draws a vehicle arrival count for every lane of a junction
//! and hands green to the busiest lane, yellow to the runner-up and red to the rest.
//! Junctions are independent of each other; a run is a single snapshot per junction.

pub mod control_system;
pub mod error;
pub mod global_variables;
pub mod monitoring;
pub mod shared_data;
pub mod simulation_engine;

pub use control_system::signal_arbitrator::{arbitrate, rank_lanes};
pub use error::{Result, SimError};
pub use shared_data::{JunctionConfig, LaneView, RunConfig};
pub use simulation_engine::{
    simulate, simulate_concurrent, ArrivalSampler, Junction, JunctionId, Lane, SignalState,
    SimulationRun,
};
