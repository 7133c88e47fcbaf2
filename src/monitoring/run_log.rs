use crate::error::Result;
use crate::simulation_engine::junctions::SignalState;
use crate::simulation_engine::simulation::SimulationRun;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::path::Path;

/// One lane of one junction, flattened for the CSV run log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaneRecord {
    pub junction: usize,
    pub lane: usize,
    pub arrival_rate: f64,
    pub arrivals: u64,
    pub signal: Option<SignalState>,
}

pub fn lane_records(run: &SimulationRun) -> Vec<LaneRecord> {
    run.junctions
        .iter()
        .flat_map(|junction| {
            junction.lanes.iter().map(move |lane| LaneRecord {
                junction: junction.id.0,
                lane: lane.index,
                arrival_rate: lane.arrival_rate,
                arrivals: lane.arrivals,
                signal: lane.signal,
            })
        })
        .collect()
}

/// Appends every lane of `run` to the CSV file at `path`.
/// The header row is written only when the file is new.
pub fn log_run<P: AsRef<Path>>(path: P, run: &SimulationRun) -> Result<usize> {
    let path = path.as_ref();
    let file_exists = path.exists();
    let file = OpenOptions::new().append(true).create(true).open(path)?;
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(!file_exists)
        .from_writer(file);

    let records = lane_records(run);
    for record in &records {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    log::info!("Logged {} lane records to {}", records.len(), path.display());
    Ok(records.len())
}

/// Reads back every record from a run log.
pub fn read_run_log<P: AsRef<Path>>(path: P) -> Result<Vec<LaneRecord>> {
    let file = File::open(path)?;
    let mut rdr = csv::Reader::from_reader(file);
    let mut records = Vec::new();
    for result in rdr.deserialize() {
        let record: LaneRecord = result?;
        records.push(record);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared_data::RunConfig;
    use crate::simulation_engine::simulation::simulate;
    use std::path::PathBuf;

    fn scratch_file(name: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "junction_signals_{}_{}.csv",
            name,
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);
        path
    }

    #[test]
    fn records_follow_junction_then_lane_order() {
        let run = simulate(&RunConfig::uniform(2, 3, 4.0).with_seed(9)).unwrap();
        let records = lane_records(&run);
        assert_eq!(records.len(), 6);
        assert_eq!((records[0].junction, records[0].lane), (0, 0));
        assert_eq!((records[5].junction, records[5].lane), (1, 2));
        assert!(records.iter().all(|r| r.signal.is_some()));
    }

    #[test]
    fn log_appends_and_reads_back() {
        let path = scratch_file("append");
        let run = simulate(&RunConfig::uniform(1, 4, 10.0).with_seed(5)).unwrap();

        assert_eq!(log_run(&path, &run).unwrap(), 4);
        assert_eq!(log_run(&path, &run).unwrap(), 4);

        let records = read_run_log(&path).unwrap();
        assert_eq!(records.len(), 8);
        assert_eq!(records[..4], records[4..]);
        assert_eq!(records[..4], lane_records(&run)[..]);

        let raw = std::fs::read_to_string(&path).unwrap();
        assert_eq!(raw.matches("junction,lane").count(), 1);
        assert!(raw.contains("GREEN"));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn missing_log_is_an_io_error() {
        let path = scratch_file("missing");
        assert!(read_run_log(&path).is_err());
    }
}
