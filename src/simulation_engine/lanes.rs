use crate::simulation_engine::junctions::SignalState;
use serde::{Deserialize, Serialize};

/// One approach into a junction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lane {
    /// Position within the junction, starting at 0.
    pub index: usize,
    /// Mean vehicle arrivals per simulation step.
    pub arrival_rate: f64,
    /// Arrivals drawn for the latest step.
    pub arrivals: u64,
    /// Signal assigned for the latest step, `None` until the junction is arbitrated.
    pub signal: Option<SignalState>,
}

impl Lane {
    pub fn new(index: usize, arrival_rate: f64) -> Self {
        Self {
            index,
            arrival_rate,
            arrivals: 0,
            signal: None,
        }
    }

    /// Overwrites the lane's step result. Nothing carries over from earlier steps.
    pub fn record_step(&mut self, arrivals: u64, signal: SignalState) {
        self.arrivals = arrivals;
        self.signal = Some(signal);
    }

    pub fn is_green(&self) -> bool {
        self.signal == Some(SignalState::Green)
    }
}

pub fn create_lanes(rates: &[f64]) -> Vec<Lane> {
    rates
        .iter()
        .enumerate()
        .map(|(index, &rate)| Lane::new(index, rate))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lanes_are_indexed_in_rate_order() {
        let lanes = create_lanes(&[4.0, 0.0, 12.5]);
        assert_eq!(lanes.len(), 3);
        for (i, lane) in lanes.iter().enumerate() {
            assert_eq!(lane.index, i);
            assert_eq!(lane.arrivals, 0);
            assert!(lane.signal.is_none());
        }
        assert_eq!(lanes[2].arrival_rate, 12.5);
    }

    #[test]
    fn record_step_overwrites() {
        let mut lane = Lane::new(0, 5.0);
        lane.record_step(9, SignalState::Green);
        assert!(lane.is_green());
        lane.record_step(2, SignalState::Red);
        assert_eq!(lane.arrivals, 2);
        assert!(!lane.is_green());
    }
}
