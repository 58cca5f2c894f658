// SPDX-License-Identifier: Apache-2.0 OR MIT

//! satcdn-sim
//!
//! Loads a scenario file and drives the satellite CDN tick loop to
//! completion.
//!
//! ```bash
//! satcdn-sim --scenario scenario.json --log-level debug
//! satcdn-sim --scenario scenario.json --telemetry-file run.log
//! ```
//!
//! Orbital propagation and elevation-angle geometry are out of scope for
//! this crate; this binary wires satellites and requesters to fixed-snapshot
//! position/FoV tables supplied alongside the scenario, which is enough to
//! exercise the cache/directory/ISL engine end to end. A production
//! embedding swaps in its own `PositionOracle`/`FovService`.

mod config;

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use satcdn_core::fov::StaticFovService;
use satcdn_core::position::{Position, StaticPositionOracle};
use satcdn_core::{
    CdnProvider, ConfigError, GroundLocation, Requester, RequesterConfig, SimTime, Telemetry,
    TickDriver, Topology,
};

use config::{ModelConfig, NodeType, ScenarioFile};

#[derive(Parser, Debug)]
#[command(name = "satcdn-sim")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Scenario file (JSON format).
    #[arg(short, long)]
    scenario: PathBuf,

    /// Optional satellite position snapshot file (satID -> [x,y,z]). Falls
    /// back to the origin for every satellite when absent.
    #[arg(long)]
    ephemeris: Option<PathBuf>,

    /// Optional per-requester elevation snapshot directory; files are named
    /// `<requester-name>.json` and map satID -> elevation degrees. Falls
    /// back to "always out of service" when absent.
    #[arg(long)]
    fov_dir: Option<PathBuf>,

    /// Write telemetry lines to this file instead of stdout.
    #[arg(long)]
    telemetry_file: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[derive(Debug, thiserror::Error)]
enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Topology(#[from] satcdn_core::error::TopologyError),
    #[error(transparent)]
    Sanity(#[from] satcdn_core::error::SanityError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    if let Some(path) = &args.telemetry_file {
        let output = satcdn_core::telemetry::output::FileOutput::create(path)?;
        Telemetry::init(Arc::new(output));
    }

    info!("loading scenario from {:?}", args.scenario);
    run(&args).map_err(|e| -> Box<dyn std::error::Error> { Box::new(e) })
}

fn run(args: &Args) -> Result<(), RunError> {
    let scenario = ScenarioFile::from_file(&args.scenario)?;
    let ephemeris = load_ephemeris(args.ephemeris.as_deref())?;

    for topo_cfg in scenario.topologies {
        info!("building topology `{}` (id {})", topo_cfg.name, topo_cfg.id);

        let adjacency = match &topo_cfg.isl_topology_file {
            Some(path) => config::load_isl_topology(&PathBuf::from(path))?,
            None => HashMap::new(),
        };
        let topology = Topology::new(topo_cfg.name.clone(), topo_cfg.id, adjacency);
        let positions: Arc<dyn satcdn_core::PositionOracle> =
            Arc::new(StaticPositionOracle::new(ephemeris.clone()));

        let mut requesters = Vec::new();

        for node in topo_cfg.nodes {
            match node.node_type {
                NodeType::Sat => {
                    for model in &node.models {
                        if let ModelConfig::ModelCDNProvider {
                            cache_size,
                            cache_eviction_strategy,
                            handle_requests_strategy,
                            active_scheduling_strategy,
                            hop_to_check,
                        } = model
                        {
                            validate_provider_strategies(
                                handle_requests_strategy,
                                active_scheduling_strategy,
                            )?;
                            let cache = satcdn_core::CacheEngine::new(
                                *cache_size,
                                cache_eviction_strategy.build(),
                            );
                            let provider = Arc::new(CdnProvider::new(
                                node.nodeid,
                                cache,
                                topology.directory.clone(),
                                topology.isl.clone(),
                                positions.clone(),
                                *hop_to_check,
                            ));
                            topology.add_satellite(provider)?;
                        }
                    }
                }
                NodeType::Gs => {
                    for model in &node.models {
                        if let ModelConfig::ModelCDNUser {
                            access_pattern_file,
                            access_generation_function,
                            scheduling_strategy_function,
                            num_access_to_gen,
                            satellites_to_schedule,
                            hop_to_check,
                            prob_one_hitter,
                        } = model
                        {
                            validate_user_strategies(
                                access_generation_function,
                                scheduling_strategy_function,
                            )?;
                            let pattern = config::load_access_pattern(&PathBuf::from(
                                access_pattern_file,
                            ))?;
                            let elevations = load_fov(args.fov_dir.as_deref(), node.nodeid)?;
                            let fov: Arc<dyn satcdn_core::FovService> =
                                Arc::new(StaticFovService::new(elevations));
                            let config = RequesterConfig {
                                name: format!("gs-{}", node.nodeid),
                                location: GroundLocation {
                                    lat: node.latitude,
                                    lon: node.longitude,
                                    alt: node.elevation,
                                },
                                num_requests: *num_access_to_gen,
                                load_balance_count: *satellites_to_schedule,
                                hop_to_check: *hop_to_check,
                                pattern,
                                prob_one_hitter: *prob_one_hitter,
                            };
                            let satellites = topology.satellites();
                            let requester = Requester::new(
                                config,
                                fov,
                                satellites,
                                u64::from(node.nodeid),
                            );
                            requesters.push((node.nodeid, requester));
                        }
                    }
                }
                NodeType::Iot | NodeType::TrafficScheduler => {
                    // Out of scope for this engine.
                }
            }
        }

        let start = parse_simtime(&topo_cfg.simtime.starttime)?;
        let end = parse_simtime(&topo_cfg.simtime.endtime)?;
        let elapsed_secs = (end - start).num_seconds() as f64;

        let requesters: Vec<Requester> = requesters.into_iter().map(|(_, r)| r).collect();
        let mut driver = TickDriver::new(
            SimTime::from_secs(0.0),
            SimTime::from_secs(elapsed_secs),
            topo_cfg.simtime.delta,
            requesters,
            topology.satellites(),
        );
        driver.run()?;
        info!("topology `{}` finished at t={}", topology.name, elapsed_secs);
    }

    Ok(())
}

fn validate_provider_strategies(handle: &str, scheduling: &str) -> Result<(), ConfigError> {
    if handle != "check_local_cache_only" {
        return Err(ConfigError::UnknownPolicy(
            handle.to_string(),
            "handle_requests_strategy",
        ));
    }
    if scheduling != "no_op" {
        return Err(ConfigError::UnknownPolicy(
            scheduling.to_string(),
            "active_scheduling_strategy",
        ));
    }
    Ok(())
}

/// `scheduling_strategy_function`'s accepted value reproduces the original
/// scenario generator's misspelling verbatim (`schdeule_by_largest_elevation`
/// [sic]) rather than the corrected English, since it is the literal string
/// scenario files in the wild carry.
fn validate_user_strategies(generation: &str, scheduling: &str) -> Result<(), ConfigError> {
    if generation != "generate_by_distribution" {
        return Err(ConfigError::UnknownPolicy(
            generation.to_string(),
            "access_generation_function",
        ));
    }
    if scheduling != "schdeule_by_largest_elevation" {
        return Err(ConfigError::UnknownPolicy(
            scheduling.to_string(),
            "scheduling_strategy_function",
        ));
    }
    Ok(())
}

fn parse_simtime(s: &str) -> Result<chrono::NaiveDateTime, RunError> {
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map_err(|e| RunError::Config(ConfigError::MalformedJson(e.to_string())))
}

fn load_ephemeris(path: Option<&std::path::Path>) -> Result<HashMap<u32, Position>, RunError> {
    let Some(path) = path else {
        return Ok(HashMap::new());
    };
    let text = std::fs::read_to_string(path)?;
    let raw: HashMap<String, [f64; 3]> =
        serde_json::from_str(&text).map_err(|e| ConfigError::MalformedJson(e.to_string()))?;
    Ok(raw
        .into_iter()
        .filter_map(|(k, [x, y, z])| k.parse::<u32>().ok().map(|id| (id, Position::new(x, y, z))))
        .collect())
}

fn load_fov(dir: Option<&std::path::Path>, nodeid: u32) -> Result<HashMap<u32, f64>, RunError> {
    let Some(dir) = dir else {
        return Ok(HashMap::new());
    };
    let path = dir.join(format!("gs-{nodeid}.json"));
    if !path.exists() {
        return Ok(HashMap::new());
    }
    let text = std::fs::read_to_string(&path)?;
    let raw: HashMap<String, f64> =
        serde_json::from_str(&text).map_err(|e| ConfigError::MalformedJson(e.to_string()))?;
    Ok(raw
        .into_iter()
        .filter_map(|(k, v)| k.parse::<u32>().ok().map(|id| (id, v)))
        .collect())
}
