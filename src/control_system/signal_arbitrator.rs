use std::cmp::Reverse;

use crate::error::{Result, SimError};
use crate::simulation_engine::junctions::SignalState;

/// Orders lane indices from busiest to quietest.
///
/// Lanes with equal arrival counts keep their original relative order, so the
/// lower index always ranks first among ties. `sort_by_key` is stable, which is
/// what gives that guarantee.
pub fn rank_lanes(arrivals: &[u64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..arrivals.len()).collect();
    order.sort_by_key(|&lane| Reverse(arrivals[lane]));
    order
}

/// Converts one step's arrival counts into a signal per lane.
///
/// The busiest lane gets `Green`, the runner-up `Yellow`, everything else `Red`.
/// A single-lane junction is just `[Green]`. Zero traffic is not special: the
/// tie-break hands green to lane 0 and yellow to lane 1.
///
/// The result depends only on `arrivals`; calling this twice with the same slice
/// yields the same vector.
pub fn arbitrate(arrivals: &[u64]) -> Result<Vec<SignalState>> {
    if arrivals.is_empty() {
        return Err(SimError::InvalidTopology { junction: None });
    }

    let mut signals = vec![SignalState::Red; arrivals.len()];
    let order = rank_lanes(arrivals);
    signals[order[0]] = SignalState::Green;
    if let Some(&runner_up) = order.get(1) {
        signals[runner_up] = SignalState::Yellow;
    }

    log::debug!(
        "Arbitrated arrivals {:?}: green lane {}, yellow lane {:?}",
        arrivals,
        order[0],
        order.get(1)
    );
    Ok(signals)
}
