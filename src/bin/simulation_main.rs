// simulation_main.rs
use junction_signals::global_variables::{ENV_SEED, MAX_VEHICLE_GLYPHS};
use junction_signals::monitoring::run_log::log_run;
use junction_signals::{simulate_concurrent, Junction, RunConfig, SignalState};
use std::env;
use std::process::ExitCode;

fn signal_icon(signal: Option<SignalState>) -> &'static str {
    match signal {
        Some(SignalState::Green) => "🟢",
        Some(SignalState::Yellow) => "🟡",
        Some(SignalState::Red) => "🔴",
        None => "⚪",
    }
}

fn lane_block(junction: &Junction, lane: usize) -> Vec<String> {
    let lane = &junction.lanes[lane];
    let shown = (lane.arrivals as usize).min(MAX_VEHICLE_GLYPHS);
    vec![
        format!("Lane {} {}", lane.index + 1, signal_icon(lane.signal)),
        "🚗".repeat(shown),
        format!("Vehicles: {}", lane.arrivals),
    ]
}

/// Four-lane junctions are drawn as a cross: lane 1 top, 2 right, 3 bottom, 4 left.
/// Anything else is listed lane by lane.
fn render_junction(junction: &Junction) -> String {
    let mut out = format!("## 🚦 {}\n", junction.id);
    if junction.lanes.len() == 4 {
        let pad = " ".repeat(24);
        for line in lane_block(junction, 0) {
            out.push_str(&format!("{}{}\n", pad, line));
        }
        let left = lane_block(junction, 3);
        let right = lane_block(junction, 1);
        let centre = ["", "⛔ Junction", ""];
        for ((l, c), r) in left.iter().zip(centre).zip(&right) {
            out.push_str(&format!("{:<24}{:<24}{}\n", l, c, r));
        }
        for line in lane_block(junction, 2) {
            out.push_str(&format!("{}{}\n", pad, line));
        }
    } else {
        for lane in 0..junction.lanes.len() {
            out.push_str(&lane_block(junction, lane).join("  "));
            out.push('\n');
        }
    }
    out
}

fn load_config(path: Option<&String>) -> junction_signals::Result<RunConfig> {
    let mut config = match path {
        Some(path) => RunConfig::load(path)?,
        None => RunConfig::default(),
    };
    if let Ok(raw) = env::var(ENV_SEED) {
        let seed = raw
            .parse::<u64>()
            .map_err(|e| junction_signals::SimError::Config(format!("{}={}: {}", ENV_SEED, raw, e)))?;
        config.seed = Some(seed);
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let config = match load_config(args.first()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    for problem in config.check_ui_bounds() {
        log::warn!("Outside dashboard bounds: {}", problem);
    }

    let run = match simulate_concurrent(&config).await {
        Ok(run) => run,
        Err(e) => {
            eprintln!("Simulation error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    for junction in &run.junctions {
        println!("{}", render_junction(junction));
    }

    if let Some(log_path) = args.get(1) {
        if let Err(e) = log_run(log_path, &run) {
            eprintln!("Error logging run: {}", e);
            return ExitCode::FAILURE;
        }
    }
    ExitCode::SUCCESS
}
