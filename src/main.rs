//! # Kestrel Control
//!
//! Offline simulation harness for the superstructure coordination layer.
//!
//! Runs a selected autonomous routine against simple first-order mechanism
//! models and reports the resulting timeline and cycle statistics. Useful
//! for checking routine timing and state sequencing without a robot.

use std::cell::RefCell;
use std::path::PathBuf;
use std::process;
use std::rc::Rc;

use clap::Parser;
use tracing::{error, info, Level};
use tracing_subscriber::EnvFilter;

use kestrel_control::auto::routines;
use kestrel_control::config::load_config;
use kestrel_control::cycle::{Orchestrator, RobotMode};
use kestrel_control::hw::{
    AimSolution, ClimberCommand, DriveMode, Drivetrain, MechanismCommands, NeutralIntent,
    PathHandle, PivotCommand, SensorSnapshot,
};

/// Kestrel Control — superstructure coordination simulator
#[derive(Parser, Debug)]
#[command(name = "kestrel_control")]
#[command(version)]
#[command(about = "Simulates an autonomous routine through the coordination layer")]
struct Args {
    /// Path to the configuration TOML.
    #[arg(default_value = "config/kestrel.toml")]
    config: PathBuf,

    /// Routine to run (see --list).
    #[arg(long, default_value = "shoot-only")]
    routine: String,

    /// List the routine catalog and exit.
    #[arg(long)]
    list: bool,

    /// Simulated autonomous duration [s].
    #[arg(long, default_value_t = 15.0)]
    duration: f64,

    /// Enable verbose logging (DEBUG level).
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format.
    #[arg(long)]
    json: bool,
}

fn main() {
    let args = Args::parse();
    setup_tracing(&args);

    if args.list {
        for name in routines::NAMES {
            println!("{name}");
        }
        return;
    }

    info!("Kestrel Control v{} starting", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(&args) {
        error!("FATAL: {e}");
        process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(&args.config)?;
    let dt = config.cycle_period().as_secs_f64();

    let routine = routines::by_name(&args.routine).ok_or_else(|| {
        format!(
            "unknown routine '{}' (known: {})",
            args.routine,
            routines::NAMES.join(", ")
        )
    })?;

    let drive_state = Rc::new(RefCell::new(SimDriveState::default()));
    let mut orch = Orchestrator::new(
        &config,
        Box::new(NeutralIntent),
        Box::new(SimAim),
        Box::new(SimDrive(drive_state.clone())),
    );
    orch.select_routine(Some(routine));

    let mut sim = SimMechanisms::preloaded();
    let mut commands = MechanismCommands::default();
    let cycles = (args.duration / dt).ceil() as u64;
    info!(
        routine = %args.routine,
        cycles,
        cycle_period_ms = config.cycle_period_ms,
        "simulation start"
    );

    let mut prev_state = orch.superstructure().state();
    for cycle in 0..cycles {
        drive_state.borrow_mut().advance(dt);
        let snap = sim.snapshot(drive_state.borrow().path_finished());

        commands = orch.run_cycle(RobotMode::Autonomous, &snap, dt);
        sim.step(&commands, dt);

        let state = orch.superstructure().state();
        if state != prev_state {
            info!(t = cycle as f64 * dt, ?state, "state change");
            prev_state = state;
        }
    }

    let stats = orch.stats();
    info!(
        cycles = stats.cycle_count,
        transitioning = stats.transitioning_cycles,
        shots = sim.shots_fired,
        "simulation complete"
    );
    info!(?commands, "final commands");
    Ok(())
}

// ─── Simulation models ──────────────────────────────────────────────

/// First-order mechanism models plus a one-piece game piece model: the
/// robot starts preloaded, and a shot fires when the trigger feeds while
/// the flywheels are near their setpoint.
struct SimMechanisms {
    pivot_deg: f64,
    deploy_deg: f64,
    flywheel_rps: f64,
    climber: f64,
    diverter: f64,
    piece_at_trigger: bool,
    shot_pulse: bool,
    shots_fired: u32,
}

impl SimMechanisms {
    fn preloaded() -> Self {
        Self {
            pivot_deg: 33.0,
            deploy_deg: 0.0,
            flywheel_rps: 0.0,
            climber: 0.0,
            diverter: 0.0,
            piece_at_trigger: true,
            shot_pulse: false,
            shots_fired: 0,
        }
    }

    fn step(&mut self, cmds: &MechanismCommands, dt: f64) {
        match cmds.pivot {
            PivotCommand::Angle(target) => slew(&mut self.pivot_deg, target, 180.0 * dt),
            PivotCommand::Percent(duty) => self.pivot_deg += duty * 90.0 * dt,
        }
        slew(&mut self.deploy_deg, cmds.intake_deploy_angle, 360.0 * dt);
        match cmds.climber {
            ClimberCommand::Extension(target) => slew(&mut self.climber, target, 0.5 * dt),
            ClimberCommand::Percent(duty) => self.climber += duty * 0.5 * dt,
        }
        slew(&mut self.diverter, cmds.diverter_extension, 2.0 * dt);
        self.flywheel_rps += (cmds.flywheel_velocity - self.flywheel_rps) * (dt / 0.25).min(1.0);

        self.shot_pulse = false;
        let spun_up = cmds.flywheel_velocity > 0.0
            && (self.flywheel_rps - cmds.flywheel_velocity).abs() < 2.5;
        if self.piece_at_trigger && cmds.trigger_percent > 0.5 && spun_up {
            self.piece_at_trigger = false;
            self.shot_pulse = true;
            self.shots_fired += 1;
        }
    }

    fn snapshot(&self, path_finished: bool) -> SensorSnapshot {
        SensorSnapshot {
            pivot_angle: Some(self.pivot_deg),
            intake_deploy_angle: Some(self.deploy_deg),
            flywheel_velocity: Some(self.flywheel_rps),
            climber_extension: Some(self.climber),
            diverter_extension: Some(self.diverter),
            flywheel_switch: false,
            trigger_switch: self.piece_at_trigger,
            shot_detected: self.shot_pulse,
            field_x_blue: 1.5,
            path_finished,
        }
    }
}

fn slew(value: &mut f64, target: f64, max_step: f64) {
    let delta = (target - *value).clamp(-max_step, max_step);
    *value += delta;
}

/// Fixed aim solution: point-blank speaker shot from the starting pose.
struct SimAim;

impl AimSolution for SimAim {
    fn target_pivot_angle(&self) -> f64 {
        50.0
    }

    fn target_flywheel_velocity(&self) -> f64 {
        40.0
    }

    fn shot_ready(&self) -> bool {
        false
    }
}

/// Path follower model: a started path finishes after its nominal duration.
#[derive(Default)]
struct SimDriveState {
    active: Option<PathHandle>,
    elapsed: f64,
}

impl SimDriveState {
    fn advance(&mut self, dt: f64) {
        if self.active.is_some() {
            self.elapsed += dt;
        }
    }

    fn path_finished(&self) -> bool {
        self.active.is_some_and(|p| self.elapsed >= p.duration_s)
    }
}

struct SimDrive(Rc<RefCell<SimDriveState>>);

impl Drivetrain for SimDrive {
    fn request_mode(&mut self, _mode: DriveMode) {}

    fn start_path(&mut self, path: PathHandle) {
        let mut state = self.0.borrow_mut();
        if state.active == Some(path) {
            return;
        }
        info!(path = path.name, "path start");
        state.active = Some(path);
        state.elapsed = 0.0;
    }

    fn cancel_path(&mut self) {
        self.0.borrow_mut().active = None;
    }
}

fn setup_tracing(args: &Args) {
    let level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    if args.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
