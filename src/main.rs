/* 3rd party libraries */
use clap::Parser;
use log::info;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread::sleep;
use std::time::{Duration, Instant};

/* Custom libraries */
use elevator_dispatch::config::{self, Config};
use elevator_dispatch::dispatcher::Dispatcher;
use elevator_dispatch::intake::{console, simulation};
use elevator_dispatch::unwrap_or_exit;

/* Command line */
#[derive(Parser, Debug)]
#[clap(name = "elevator-dispatch", version, about = "Multi-elevator dispatch simulator")]
struct Args {
    /// Configuration file
    #[clap(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Numbered floors above Parking
    #[clap(long)]
    floors: Option<u32>,

    /// Number of elevators
    #[clap(long)]
    elevators: Option<usize>,

    /// Random users submitted at start-up
    #[clap(long)]
    users: Option<usize>,

    /// Length of one tick in milliseconds
    #[clap(long)]
    tick_ms: Option<u64>,

    /// Seed for the simulated users
    #[clap(long)]
    seed: Option<u64>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[clap(short, long)]
    verbose: bool,

    /// Only run the simulated users, then stop once every request is served
    #[clap(long)]
    no_console: bool,

    /// Upper bound on a --no-console run
    #[clap(long)]
    run_for_secs: Option<u64>,
}

impl Args {
    fn apply(&self, config: &mut Config) {
        if let Some(floors) = self.floors {
            config.dispatch.n_floors = floors;
        }
        if let Some(elevators) = self.elevators {
            config.dispatch.n_elevators = elevators;
        }
        if let Some(tick_ms) = self.tick_ms {
            config.dispatch.tick_interval_ms = tick_ms;
        }
        if let Some(users) = self.users {
            config.simulation.n_users = users;
        }
        if self.seed.is_some() {
            config.simulation.seed = self.seed;
        }
    }
}

/* Main */
fn main() -> io::Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    // Load the configuration
    let mut config = unwrap_or_exit!(config::load_config(&args.config), "Invalid configuration");
    args.apply(&mut config);
    unwrap_or_exit!(config.validate(), "Invalid configuration");

    // Start the elevators and the dispatcher
    let dispatcher = Arc::new(unwrap_or_exit!(
        Dispatcher::from_config(&config.dispatch),
        "Failed to build the elevator system"
    ));

    // SIGINT/SIGTERM: stop every loop after its current tick, then exit
    let signal_dispatcher = dispatcher.clone();
    unwrap_or_exit!(
        ctrlc::set_handler(move || {
            signal_dispatcher.shutdown();
            std::process::exit(0);
        }),
        "Failed to install the signal handler"
    );

    dispatcher.start()?;

    // Simulate initial users
    simulation::simulate_users(
        &dispatcher,
        config.simulation.n_users,
        config.simulation.seed,
    );

    if args.no_console {
        let deadline = args
            .run_for_secs
            .map(|secs| Instant::now() + Duration::from_secs(secs));
        loop {
            sleep(config.dispatch.tick_interval());
            if dispatcher.is_settled() {
                info!("All requests served");
                break;
            }
            if deadline.map_or(false, |deadline| Instant::now() >= deadline) {
                info!("Run time elapsed");
                break;
            }
        }
        dispatcher.stop();
    } else {
        // Main thread for user input
        let stdin = io::stdin();
        console::run(&dispatcher, stdin.lock(), io::stdout())?;
    }

    dispatcher.join();
    Ok(())
}
