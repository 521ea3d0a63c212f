/***************************************/
/*        3rd party libraries          */
/***************************************/
use crossbeam_channel as cbc;
use log::{debug, error, info, warn};
use std::collections::BTreeMap;
use std::io;
use std::sync::{Arc, Mutex};
use std::thread::{Builder, JoinHandle};
use std::time::Duration;

/***************************************/
/*           Local modules             */
/***************************************/
use crate::config::DispatchConfig;
use crate::elevator::ElevatorUnit;
use crate::lock;
use crate::shared::shutdown;
use crate::shared::{
    ConfigError, Direction, DispatchError, Floor, FloorRegistry, PendingRequest, ShutdownToken,
    ShutdownTrigger, SystemSnapshot, UnitSnapshot,
};

/***************************************/
/*       Private data structures       */
/***************************************/
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingEntry {
    destination: Floor,
    direction: Direction,
}

/// Origin floor -> requests waiting there, swept in floor order.
type PendingTable = BTreeMap<Floor, Vec<PendingEntry>>;

/***************************************/
/*             Public API              */
/***************************************/

/**
 * Assigns pending requests to elevator units.
 *
 * Requests are recorded by `submit_request` and handed out by the sweep
 * loop, greedily, to the nearest unit that is idle or already heading the
 * requested way. Lock order is always pending table, then one unit.
 *
 * # Fields
 * - `floors`:          Shared floor registry.
 * - `units`:           The elevator units, in scan order.
 * - `pending`:         Requests not yet assigned.
 * - `tick_interval`:   Retry period of the sweep loop and travel time per stop.
 * - `sweep_tx/rx`:     Wakes the sweep loop on new submissions.
 * - `trigger/token`:   Cooperative shutdown of every loop.
 * - `threads`:         Handles of the running loops, empty until `start`.
 */
pub struct Dispatcher {
    floors: Arc<FloorRegistry>,
    units: Vec<Arc<ElevatorUnit>>,
    pending: Mutex<PendingTable>,
    tick_interval: Duration,
    sweep_tx: cbc::Sender<()>,
    sweep_rx: cbc::Receiver<()>,
    trigger: ShutdownTrigger,
    token: ShutdownToken,
    threads: Mutex<Option<Vec<JoinHandle<()>>>>,
}

impl Dispatcher {
    /// Fails if a resting floor does not belong to `floors`.
    pub fn new(
        floors: Arc<FloorRegistry>,
        resting_floors: Vec<Floor>,
        tick_interval: Duration,
    ) -> Result<Dispatcher, ConfigError> {
        if let Some(foreign) = resting_floors.iter().find(|floor| !floors.contains(**floor)) {
            return Err(ConfigError::ForeignFloor(foreign.index()));
        }

        let units = resting_floors
            .into_iter()
            .enumerate()
            .map(|(i, resting)| Arc::new(ElevatorUnit::new(i + 1, resting, floors.clone())))
            .collect();
        let (sweep_tx, sweep_rx) = cbc::bounded::<()>(1);
        let (trigger, token) = shutdown::channel();

        Ok(Dispatcher {
            floors,
            units,
            pending: Mutex::new(PendingTable::new()),
            tick_interval,
            sweep_tx,
            sweep_rx,
            trigger,
            token,
            threads: Mutex::new(None),
        })
    }

    pub fn from_config(config: &DispatchConfig) -> Result<Dispatcher, ConfigError> {
        let floors = config.floor_registry()?;
        let resting_floors = config.resting_floors(&floors)?;

        Dispatcher::new(Arc::new(floors), resting_floors, config.tick_interval())
    }

    pub fn floors(&self) -> &FloorRegistry {
        &self.floors
    }

    pub fn units(&self) -> &[Arc<ElevatorUnit>] {
        &self.units
    }

    /// Records a request for the next sweep. Nothing is assigned here.
    pub fn submit_request(&self, origin: &str, destination: &str) -> Result<(), DispatchError> {
        let origin_floor = self.floors.floor(origin)?;
        let destination_floor = self.floors.floor(destination)?;
        if origin_floor == destination_floor {
            return Err(DispatchError::SameFloorRequest(origin.to_string()));
        }

        let direction = self.floors.direction_between(origin_floor, destination_floor);
        lock!(self.pending)
            .entry(origin_floor)
            .or_default()
            .push(PendingEntry {
                destination: destination_floor,
                direction,
            });
        info!(
            "Added request from {} to {}. Direction: {}",
            origin, destination, direction
        );

        // A full channel already holds a wake-up.
        let _ = self.sweep_tx.try_send(());
        Ok(())
    }

    /// Nearest unit that is idle or already committed to `direction`; ties go
    /// to the unit scanned first.
    pub fn find_best_unit(&self, origin: Floor, direction: Direction) -> Option<&Arc<ElevatorUnit>> {
        let mut best_unit = None;
        let mut minimum_distance = usize::MAX;

        for unit in self.units.iter() {
            let (current_floor, unit_direction) = unit.position();
            if unit_direction != direction && unit_direction != Direction::Stop {
                continue;
            }

            let distance = self.floors.distance(current_floor, origin);
            if distance < minimum_distance {
                minimum_distance = distance;
                best_unit = Some(unit);
            }
        }

        debug!(
            "Best elevator for floor {} in direction {} is {}",
            self.floors.name(origin),
            direction,
            best_unit.map_or("none".to_string(), |unit| format!("Elevator {}", unit.id()))
        );
        best_unit
    }

    /// Hands one request to the best unit. Returns the unit's id, or `None`
    /// when no unit is eligible and the request has to wait.
    pub fn assign(&self, origin: Floor, destination: Floor) -> Option<usize> {
        let direction = self.floors.direction_between(origin, destination);

        match self.find_best_unit(origin, direction) {
            Some(unit) => {
                unit.assign_pickup(origin, direction, destination);
                info!(
                    "Assigned Elevator {} to floor {} for direction {}",
                    unit.id(),
                    self.floors.name(origin),
                    direction
                );
                debug!("{}", unit.snapshot());
                Some(unit.id())
            }
            None => {
                warn!(
                    "No available elevator for request from {} to {}",
                    self.floors.name(origin),
                    self.floors.name(destination)
                );
                None
            }
        }
    }

    /// One pass over the pending table. Returns the number of requests
    /// assigned; the rest stay for the next sweep.
    pub fn sweep(&self) -> usize {
        let mut pending = lock!(self.pending);
        let mut assigned = 0;

        for (origin, entries) in pending.iter_mut() {
            entries.retain(|entry| match self.assign(*origin, entry.destination) {
                Some(_) => {
                    assigned += 1;
                    false
                }
                None => true,
            });
        }
        pending.retain(|_, entries| !entries.is_empty());

        assigned
    }

    pub fn has_pending(&self) -> bool {
        !lock!(self.pending).is_empty()
    }

    pub fn pending_snapshot(&self) -> Vec<PendingRequest> {
        let pending = lock!(self.pending);

        let requests: Vec<PendingRequest> = pending
            .iter()
            .flat_map(|(origin, entries)| {
                entries.iter().map(move |entry| PendingRequest {
                    origin: self.floors.name(*origin).to_string(),
                    destination: self.floors.name(entry.destination).to_string(),
                    direction: entry.direction,
                })
            })
            .collect();
        requests
    }

    pub fn unit_snapshots(&self) -> Vec<UnitSnapshot> {
        self.units.iter().map(|unit| unit.snapshot()).collect()
    }

    /// Units are read one at a time, so the view is not atomic across units.
    pub fn snapshot(&self) -> SystemSnapshot {
        SystemSnapshot {
            units: self.unit_snapshots(),
            pending: self.pending_snapshot(),
        }
    }

    /// Nothing pending and every unit idle at its resting floor.
    pub fn is_settled(&self) -> bool {
        !self.has_pending() && self.units.iter().all(|unit| unit.is_idle())
    }

    /// Spawns one service loop per unit plus the sweep loop. Does nothing if
    /// already started or stopped.
    pub fn start(self: &Arc<Self>) -> io::Result<()> {
        self.start_with(|name, body| Builder::new().name(name).spawn(body))
    }

    /// `start` with the thread spawner passed in. If a spawn fails, the loops
    /// already running are kept for `join` and told to stop.
    pub fn start_with<S>(self: &Arc<Self>, mut spawn: S) -> io::Result<()>
    where
        S: FnMut(String, Box<dyn FnOnce() + Send>) -> io::Result<JoinHandle<()>>,
    {
        let mut threads = lock!(self.threads);
        if threads.is_some() || self.token.is_cancelled() {
            return Ok(());
        }

        let mut loops: Vec<(String, Box<dyn FnOnce() + Send>)> =
            Vec::with_capacity(self.units.len() + 1);
        for unit in self.units.iter() {
            let unit = unit.clone();
            let token = self.token.clone();
            let tick_interval = self.tick_interval;
            loops.push((
                format!("elevator-{}", unit.id()),
                Box::new(move || unit.run(&token, tick_interval)),
            ));
        }
        let dispatcher = self.clone();
        loops.push(("dispatcher".to_string(), Box::new(move || dispatcher.run())));

        let mut handles = Vec::with_capacity(loops.len());
        for (name, body) in loops {
            match spawn(name.clone(), body) {
                Ok(handle) => handles.push(handle),
                Err(e) => {
                    error!("Failed to spawn thread {}: {}", name, e);
                    *threads = Some(handles);
                    self.stop();
                    return Err(e);
                }
            }
        }

        *threads = Some(handles);
        info!(
            "Started {} elevators over {} floors",
            self.units.len(),
            self.floors.len()
        );
        Ok(())
    }

    /// Idempotent. Loops exit after their current tick.
    pub fn stop(&self) {
        if self.trigger.fire() {
            info!("Stopping elevator system gracefully...");
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Waits for every loop spawned by `start` to exit. A second caller
    /// blocks until the first is done.
    pub fn join(&self) {
        let mut threads = lock!(self.threads);

        for handle in threads.take().unwrap_or_default() {
            let name = handle.thread().name().unwrap_or("unnamed").to_string();
            if handle.join().is_err() {
                error!("Thread {} panicked", name);
            }
        }
    }

    /// `stop` followed by `join`, for signal handlers.
    pub fn shutdown(&self) {
        self.stop();
        self.join();
    }

    /***************************************/
    /*          Private helpers            */
    /***************************************/
    fn run(&self) {
        info!("Dispatcher started");

        while !self.token.is_cancelled() {
            self.sweep();

            if self.has_pending() {
                cbc::select! {
                    recv(self.sweep_rx) -> _ => {}
                    recv(self.token.receiver()) -> _ => {}
                    default(self.tick_interval) => {}
                }
            } else {
                cbc::select! {
                    recv(self.sweep_rx) -> _ => {}
                    recv(self.token.receiver()) -> _ => {}
                }
            }
        }

        info!("Dispatcher stopped");
    }
}
