// simulation.rs
use crate::error::Result;
use crate::shared_data::{LaneView, RunConfig};
use crate::simulation_engine::arrivals::{validate_rates, ArrivalSampler};
use crate::simulation_engine::junctions::{create_junctions, Junction, JunctionId};

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// The junctions produced by one `simulate` call. The caller owns the result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationRun {
    /// Seed the run was drawn from, if it was reproducible.
    pub seed: Option<u64>,
    pub junctions: Vec<Junction>,
}

impl SimulationRun {
    pub fn junction(&self, id: JunctionId) -> Option<&Junction> {
        self.junctions.get(id.0)
    }

    pub fn lane_views(&self) -> Vec<LaneView> {
        self.junctions.iter().flat_map(Junction::lane_views).collect()
    }

    /// Sum of every lane's arrivals, saturating at `u64::MAX`.
    pub fn total_arrivals(&self) -> u64 {
        self.junctions
            .iter()
            .flat_map(|junction| junction.lanes.iter())
            .fold(0u64, |total, lane| total.saturating_add(lane.arrivals))
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Builds every junction and checks every rate before any random draw.
fn prepare_junctions(config: &RunConfig) -> Result<Vec<Junction>> {
    let rate_sets: Vec<Vec<f64>> = config
        .junctions
        .iter()
        .map(|junction| junction.lane_rates.clone())
        .collect();
    let junctions = create_junctions(&rate_sets)?;
    for junction in &junctions {
        validate_rates(&junction.rates()).map_err(|e| e.at_junction(junction.id.0))?;
    }
    Ok(junctions)
}

/// One seed per junction, drawn in junction order from a master generator.
/// Each junction then samples from its own generator, so junctions never share
/// random state and the sequential and concurrent paths agree.
fn junction_seeds(seed: Option<u64>, count: usize) -> Vec<u64> {
    let mut master = match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_rng(&mut rand::rng()),
    };
    (0..count).map(|_| master.next_u64()).collect()
}

/// Samples and arbitrates every junction in `config`.
///
/// Fails with `InvalidTopology` for a junction with no lanes and `InvalidRate` for
/// any bad rate. Either way nothing is sampled and no partial run is returned.
pub fn simulate(config: &RunConfig) -> Result<SimulationRun> {
    let mut junctions = prepare_junctions(config)?;
    let seeds = junction_seeds(config.seed, junctions.len());

    for (junction, seed) in junctions.iter_mut().zip(seeds) {
        junction.step(&mut ArrivalSampler::seeded(seed))?;
    }

    let run = SimulationRun {
        seed: config.seed,
        junctions,
    };
    log::info!(
        "Simulated {} junction(s), {} arrivals in total",
        run.junctions.len(),
        run.total_arrivals()
    );
    Ok(run)
}

/// Same result as [`simulate`], with each junction stepped on its own blocking task.
pub async fn simulate_concurrent(config: &RunConfig) -> Result<SimulationRun> {
    let junctions = prepare_junctions(config)?;
    let seeds = junction_seeds(config.seed, junctions.len());

    let handles: Vec<_> = junctions
        .into_iter()
        .zip(seeds)
        .map(|(mut junction, seed)| {
            tokio::task::spawn_blocking(move || -> Result<Junction> {
                junction.step(&mut ArrivalSampler::seeded(seed))?;
                Ok(junction)
            })
        })
        .collect();

    // Awaiting in spawn order keeps junctions in configuration order.
    let mut finished = Vec::with_capacity(handles.len());
    for handle in handles {
        finished.push(handle.await??);
    }

    let run = SimulationRun {
        seed: config.seed,
        junctions: finished,
    };
    log::info!(
        "Simulated {} junction(s) concurrently, {} arrivals in total",
        run.junctions.len(),
        run.total_arrivals()
    );
    Ok(run)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SimError;
    use crate::shared_data::JunctionConfig;
    use crate::simulation_engine::junctions::SignalState;

    #[test]
    fn test_seeded_runs_repeat() {
        let config = RunConfig::uniform(3, 4, 10.0).with_seed(77);
        let first = simulate(&config).unwrap();
        let second = simulate(&config).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.seed, Some(77));
    }

    #[test]
    fn test_every_junction_is_arbitrated() {
        let config = RunConfig::uniform(4, 4, 10.0).with_seed(1);
        let run = simulate(&config).unwrap();
        assert_eq!(run.junctions.len(), 4);
        for (i, junction) in run.junctions.iter().enumerate() {
            assert_eq!(junction.id, JunctionId(i));
            assert!(junction.is_arbitrated());
            assert!(junction.green_lane().is_some());
            assert!(junction.yellow_lane().is_some());
        }
    }

    #[test]
    fn test_junctions_draw_independently() {
        // Identical rates on every junction; independent generators should not
        // produce four identical vectors for a high rate.
        let config = RunConfig::uniform(4, 4, 20.0).with_seed(3);
        let run = simulate(&config).unwrap();
        let first = run.junctions[0].arrivals();
        assert!(run.junctions[1..].iter().any(|j| j.arrivals() != first));
    }

    #[test]
    fn test_empty_run_is_fine() {
        let config = RunConfig {
            seed: Some(1),
            junctions: Vec::new(),
        };
        let run = simulate(&config).unwrap();
        assert!(run.junctions.is_empty());
        assert_eq!(run.total_arrivals(), 0);
    }

    #[test]
    fn test_zero_lane_junction_fails_whole_run() {
        let config = RunConfig {
            seed: Some(1),
            junctions: vec![
                JunctionConfig {
                    lane_rates: vec![1.0, 2.0],
                },
                JunctionConfig {
                    lane_rates: Vec::new(),
                },
            ],
        };
        let err = simulate(&config).unwrap_err();
        assert!(matches!(err, SimError::InvalidTopology { junction: Some(1) }));
    }

    #[test]
    fn test_negative_rate_fails_whole_run() {
        let mut config = RunConfig::uniform(2, 4, 5.0);
        config.junctions[1].lane_rates[3] = -0.1;
        let err = simulate(&config).unwrap_err();
        assert!(matches!(
            err,
            SimError::InvalidRate {
                junction: Some(1),
                lane: 3,
                ..
            }
        ));
    }

    #[test]
    fn test_zero_rates_give_lane_order_signals() {
        let config = RunConfig::uniform(1, 4, 0.0);
        let run = simulate(&config).unwrap();
        assert_eq!(run.junctions[0].arrivals(), vec![0, 0, 0, 0]);
        assert_eq!(
            run.junctions[0].signals().unwrap(),
            vec![
                SignalState::Green,
                SignalState::Yellow,
                SignalState::Red,
                SignalState::Red
            ]
        );
    }

    #[test]
    fn test_astronomical_rates_saturate_and_still_arbitrate() {
        let config = RunConfig {
            seed: Some(12),
            junctions: vec![JunctionConfig {
                lane_rates: vec![1e300, 4.0, 1e300, 1e12],
            }],
        };
        let run = simulate(&config).unwrap();
        let junction = &run.junctions[0];
        assert_eq!(junction.arrivals()[0], u64::MAX);
        assert_eq!(junction.arrivals()[2], u64::MAX);
        assert_eq!(run.total_arrivals(), u64::MAX);
        assert_eq!(junction.green_lane(), Some(0));
        assert_eq!(junction.yellow_lane(), Some(2));
    }

    #[tokio::test]
    async fn test_concurrent_matches_sequential() {
        let config = RunConfig::uniform(4, 6, 12.0).with_seed(2026);
        let sequential = simulate(&config).unwrap();
        let concurrent = simulate_concurrent(&config).await.unwrap();
        assert_eq!(sequential, concurrent);
    }

    #[tokio::test]
    async fn test_concurrent_rejects_bad_config() {
        let mut config = RunConfig::uniform(2, 2, 1.0);
        config.junctions[0].lane_rates[0] = f64::NAN;
        assert!(simulate_concurrent(&config).await.is_err());
    }

    #[test]
    fn test_run_serializes_to_json() {
        let run = simulate(&RunConfig::uniform(1, 2, 3.0).with_seed(4)).unwrap();
        let json = run.to_json().unwrap();
        let back: SimulationRun = serde_json::from_str(&json).unwrap();
        assert_eq!(back, run);
        assert!(json.contains("\"signal\""));
    }
}
