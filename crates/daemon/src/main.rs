// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Weapon control processor daemon entry point (§6, §9). Wires the engine
//! crate's collaborators together, speaks the newline-delimited JSON bus
//! adapter in [`bus`] for ingress/egress, and shuts down cleanly on
//! `SIGINT`/`SIGTERM`.
//!
//! The real wire transport, and any interactive CLI surface, are out of
//! scope (§1) — this binary is the minimal process shell the engine needs
//! to run standalone.

mod bus;
mod file_store;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use signal_hook::consts::{SIGINT, SIGTERM};
use wcp_core::{Config, RealSleeper, SystemClock};
use wcp_engine::{CommandPipeline, Controller, EventPublisher, TubeBank, WeaponRegistry};

use bus::StdioEgress;
use file_store::FileMinePlanStore;

const HELP: &str = "\
wcpd - weapon control processor daemon

USAGE:
    wcpd [--config <path>] [--mine-plan-dir <path>]
    wcpd --help

Ingress/egress travel as newline-delimited JSON on stdin/stdout (§6).
SIGINT and SIGTERM both trigger a clean shutdown.";

struct Args {
    config_path: Option<PathBuf>,
    mine_plan_dir: PathBuf,
}

fn parse_args() -> Option<Args> {
    let mut config_path = None;
    let mut mine_plan_dir = PathBuf::from("./wcp-mine-plans");
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--help" | "-h" => {
                println!("{HELP}");
                return None;
            }
            "--config" => config_path = iter.next().map(PathBuf::from),
            "--mine-plan-dir" => {
                if let Some(dir) = iter.next() {
                    mine_plan_dir = PathBuf::from(dir);
                }
            }
            other => {
                eprintln!("unrecognized argument: {other}");
                return None;
            }
        }
    }
    Some(Args { config_path, mine_plan_dir })
}

fn main() -> ExitCode {
    let Some(args) = parse_args() else {
        return ExitCode::SUCCESS;
    };

    let config = match Config::load(args.config_path.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("config error: {e}");
            return ExitCode::FAILURE;
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(config.log_level.clone()))
        .init();

    let plan_store = match FileMinePlanStore::new(&args.mine_plan_dir) {
        Ok(store) => Arc::new(store),
        Err(e) => {
            tracing::error!("failed to open mine plan store at {:?}: {e}", args.mine_plan_dir);
            return ExitCode::FAILURE;
        }
    };

    let clock = SystemClock;
    let publisher = EventPublisher::new(clock.clone());
    let registry = WeaponRegistry::with_defaults(RealSleeper);
    let bank = TubeBank::new(registry, clock.clone(), publisher.clone());
    let pipeline = CommandPipeline::new(
        config.history_len,
        config.undo_redo_depth,
        clock.clone(),
        publisher.clone(),
    );
    let egress = Arc::new(StdioEgress::new());

    let controller = Controller::new(bank, pipeline, publisher, plan_store, egress, config, clock);

    if let Err(e) = controller.initialize() {
        tracing::error!("controller failed to initialize: {e}");
        return ExitCode::FAILURE;
    }

    let shutdown = Arc::new(AtomicBool::new(false));
    for signal in [SIGINT, SIGTERM] {
        if let Err(e) = signal_hook::flag::register(signal, Arc::clone(&shutdown)) {
            tracing::error!("failed to register signal handler for {signal}: {e}");
            controller.stop();
            return ExitCode::FAILURE;
        }
    }

    let ingress_controller = Arc::clone(&controller);
    std::thread::spawn(move || bus::run_ingress_loop(&ingress_controller));

    tracing::info!("wcpd running, send SIGINT or SIGTERM to stop");
    while !shutdown.load(Ordering::Relaxed) {
        std::thread::sleep(Duration::from_millis(200));
    }

    tracing::info!("shutdown signal received, stopping");
    controller.stop();
    ExitCode::SUCCESS
}
