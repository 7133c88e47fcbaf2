use crate::control_system::signal_arbitrator::arbitrate;
use crate::error::{Result, SimError};
use crate::shared_data::LaneView;
use crate::simulation_engine::arrivals::ArrivalSampler;
use crate::simulation_engine::lanes::{create_lanes, Lane};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Position of a junction within a run, starting at 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct JunctionId(pub usize);

impl fmt::Display for JunctionId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Junction {}", self.0 + 1)
    }
}

/// Signal shown to a lane for one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SignalState {
    Green,
    Yellow,
    Red,
}

impl fmt::Display for SignalState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SignalState::Green => write!(f, "GREEN"),
            SignalState::Yellow => write!(f, "YELLOW"),
            SignalState::Red => write!(f, "RED"),
        }
    }
}

/// A group of lanes sharing one arbitration decision per step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Junction {
    pub id: JunctionId,
    pub lanes: Vec<Lane>,
}

impl Junction {
    /// Builds a junction with one lane per rate. Rates are checked when sampled.
    pub fn new(id: JunctionId, rates: &[f64]) -> Result<Self> {
        if rates.is_empty() {
            return Err(SimError::InvalidTopology { junction: Some(id.0) });
        }
        Ok(Self {
            id,
            lanes: create_lanes(rates),
        })
    }

    pub fn rates(&self) -> Vec<f64> {
        self.lanes.iter().map(|lane| lane.arrival_rate).collect()
    }

    /// Runs one sample-then-arbitrate step, overwriting every lane's result.
    ///
    /// On error the lanes are left exactly as they were.
    pub fn step<R: Rng>(&mut self, sampler: &mut ArrivalSampler<R>) -> Result<()> {
        let junction = self.id.0;
        let arrivals = sampler
            .sample(&self.rates())
            .map_err(|e| e.at_junction(junction))?;
        let signals = arbitrate(&arrivals).map_err(|e| e.at_junction(junction))?;

        for ((lane, count), signal) in self.lanes.iter_mut().zip(arrivals).zip(signals) {
            lane.record_step(count, signal);
        }
        log::debug!(
            "{}: arrivals {:?}, green lane {:?}",
            self.id,
            self.arrivals(),
            self.green_lane()
        );
        Ok(())
    }

    pub fn arrivals(&self) -> Vec<u64> {
        self.lanes.iter().map(|lane| lane.arrivals).collect()
    }

    /// Signals in lane order, or `None` if the junction has not been stepped yet.
    pub fn signals(&self) -> Option<Vec<SignalState>> {
        self.lanes.iter().map(|lane| lane.signal).collect()
    }

    pub fn is_arbitrated(&self) -> bool {
        self.lanes.iter().all(|lane| lane.signal.is_some())
    }

    pub fn green_lane(&self) -> Option<usize> {
        self.lane_with(SignalState::Green)
    }

    pub fn yellow_lane(&self) -> Option<usize> {
        self.lane_with(SignalState::Yellow)
    }

    fn lane_with(&self, signal: SignalState) -> Option<usize> {
        self.lanes
            .iter()
            .find(|lane| lane.signal == Some(signal))
            .map(|lane| lane.index)
    }

    /// What a presentation layer needs to draw each lane.
    pub fn lane_views(&self) -> Vec<LaneView> {
        self.lanes
            .iter()
            .map(|lane| LaneView {
                junction: self.id,
                lane: lane.index,
                arrivals: lane.arrivals,
                signal: lane.signal,
            })
            .collect()
    }
}

pub fn create_junctions(rate_sets: &[Vec<f64>]) -> Result<Vec<Junction>> {
    rate_sets
        .iter()
        .enumerate()
        .map(|(i, rates)| Junction::new(JunctionId(i), rates))
        .collect()
}
