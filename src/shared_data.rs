// src/shared_data.rs

use crate::error::{Result, SimError};
use crate::global_variables::{
    DEFAULT_ARRIVAL_RATE, DEFAULT_JUNCTION_COUNT, DEFAULT_LANES_PER_JUNCTION, UI_LANES_PER_JUNCTION,
    UI_MAX_JUNCTIONS, UI_MAX_RATE, UI_MIN_RATE,
};
use crate::simulation_engine::junctions::{JunctionId, SignalState};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Per-junction input: one arrival rate per lane.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JunctionConfig {
    pub lane_rates: Vec<f64>,
}

/// Everything `simulate` needs for one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Fixed seed for a reproducible run. `None` draws fresh entropy.
    #[serde(default)]
    pub seed: Option<u64>,
    pub junctions: Vec<JunctionConfig>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self::uniform(
            DEFAULT_JUNCTION_COUNT,
            DEFAULT_LANES_PER_JUNCTION,
            DEFAULT_ARRIVAL_RATE,
        )
    }
}

impl RunConfig {
    /// `junctions` junctions of `lanes` lanes, all at the same rate.
    pub fn uniform(junctions: usize, lanes: usize, rate: f64) -> Self {
        Self {
            seed: None,
            junctions: vec![
                JunctionConfig {
                    lane_rates: vec![rate; lanes],
                };
                junctions
            ],
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| SimError::Config(e.to_string()))
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .map_err(|e| SimError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_json_str(&raw)
    }

    /// Dashboard limits: integer rates in 0..=25, four lanes, one to four junctions.
    /// Returns a description of each violation; the engine itself ignores these limits.
    pub fn check_ui_bounds(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if self.junctions.is_empty() || self.junctions.len() > UI_MAX_JUNCTIONS {
            problems.push(format!(
                "{} junctions configured, dashboard shows 1 to {}",
                self.junctions.len(),
                UI_MAX_JUNCTIONS
            ));
        }
        for (j, junction) in self.junctions.iter().enumerate() {
            if junction.lane_rates.len() != UI_LANES_PER_JUNCTION {
                problems.push(format!(
                    "junction {} has {} lanes, dashboard shows {}",
                    j,
                    junction.lane_rates.len(),
                    UI_LANES_PER_JUNCTION
                ));
            }
            for (lane, &rate) in junction.lane_rates.iter().enumerate() {
                if !(UI_MIN_RATE..=UI_MAX_RATE).contains(&rate) || rate.fract() != 0.0 {
                    problems.push(format!(
                        "junction {} lane {} rate {} outside the slider range {}..={}",
                        j, lane, rate, UI_MIN_RATE, UI_MAX_RATE
                    ));
                }
            }
        }
        problems
    }
}

/// Render-facing snapshot of one lane after a step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaneView {
    pub junction: JunctionId,
    pub lane: usize,
    pub arrivals: u64,
    pub signal: Option<SignalState>,
}
