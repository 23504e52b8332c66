mod app;
mod cli;
mod config;
mod gpu;
mod simulation;

use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use winit::event_loop::EventLoop;

use crate::app::App;
use crate::cli::CliArgs;
use crate::simulation::{Census, Experiment, Simulation};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = CliArgs::parse();
    if args.list {
        for experiment in Experiment::ALL {
            println!("{}", experiment);
        }
        return Ok(());
    }

    let seed = args.seed.unwrap_or_else(rand::random::<u64>);
    let config = args.to_config(seed)?;

    log::info!("Experiment {}", config.experiment);
    log::info!(
        "Grid {}x{}, excitability draw 1..{}, max refractory {}{}",
        config.grid_size,
        config.grid_size,
        config.excitability,
        config.max_refractory_period,
        if config.vary_refractory { " (per cell)" } else { "" }
    );
    if let Some(time) = config.defibrillation_time {
        log::info!("Defibrillation at time step {}", time);
    }
    log::info!("Seed: {}", seed);

    let simulation = Simulation::new(config);

    if args.headless {
        run_headless(simulation);
        return Ok(());
    }

    let event_loop = EventLoop::new()?;
    let mut app = App::new(simulation, Duration::from_millis(args.interval_ms));
    event_loop.run_app(&mut app)?;

    Ok(())
}

/// Drive the run to completion without a window
fn run_headless(mut simulation: Simulation) {
    let refractory = simulation.params().refractory.iter();
    let mean_refractory =
        refractory.map(|&d| d as f64).sum::<f64>() / simulation.grid().as_slice().len() as f64;
    log::info!("Mean refractory duration: {:.2}", mean_refractory);

    let mut quiescent_since = None;
    while !simulation.is_finished() {
        let time = simulation.time();
        simulation.advance();

        let census = simulation.census();
        log::debug!(
            "t={} excited={} refractory={} resting={}",
            time,
            census.excited,
            census.refractory,
            census.resting
        );
        match (census.is_quiescent(), quiescent_since) {
            (true, None) => {
                log::info!("Tissue at rest after time step {}", time);
                quiescent_since = Some(time);
            }
            (false, Some(_)) => quiescent_since = None,
            _ => {}
        }
    }

    let Census {
        resting,
        excited,
        refractory,
    } = simulation.census();
    log::info!(
        "Finished {} steps: {} excited, {} refractory, {} resting",
        simulation.time(),
        excited,
        refractory,
        resting
    );
}
