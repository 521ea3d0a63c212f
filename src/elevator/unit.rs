/***************************************/
/*        3rd party libraries          */
/***************************************/
use crossbeam_channel as cbc;
use log::{debug, info};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/***************************************/
/*           Local modules             */
/***************************************/
use crate::lock;
use crate::shared::{Behaviour, Direction, Floor, FloorRegistry, ShutdownToken, UnitSnapshot};

/***************************************/
/*               Enums                 */
/***************************************/

/// What one pass of the service loop did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Popped the next destination and moved there.
    Moved,
    /// Queue was empty, moved back to the resting floor.
    Returned,
    /// Queue empty and already resting.
    Idle,
}

struct UnitState {
    current_floor: Floor,
    direction: Direction,
    queue: VecDeque<Floor>,
}

/**
 * One simulated elevator car.
 *
 * The car owns its position, direction and FIFO queue of destinations behind
 * a single mutex. The dispatcher only reaches it through `enqueue`,
 * `set_direction` and `assign_pickup`; the car's own service loop (`run`)
 * pops one destination per tick.
 *
 * # Fields
 * - `id`:              1-based number, displayed as `Elevator <id>`.
 * - `resting_floor`:   Floor the car returns to when it runs out of work.
 * - `floors`:          Shared floor registry, used for display.
 * - `state`:           Current floor, direction and pending destinations.
 * - `wake_tx/rx`:      Wakes an idle service loop when work arrives.
 */
pub struct ElevatorUnit {
    id: usize,
    resting_floor: Floor,
    floors: Arc<FloorRegistry>,
    state: Mutex<UnitState>,
    wake_tx: cbc::Sender<()>,
    wake_rx: cbc::Receiver<()>,
}

/***************************************/
/*             Public API              */
/***************************************/
impl ElevatorUnit {
    pub fn new(id: usize, resting_floor: Floor, floors: Arc<FloorRegistry>) -> ElevatorUnit {
        let (wake_tx, wake_rx) = cbc::bounded::<()>(1);

        ElevatorUnit {
            id,
            resting_floor,
            floors,
            state: Mutex::new(UnitState {
                current_floor: resting_floor,
                direction: Direction::Stop,
                queue: VecDeque::new(),
            }),
            wake_tx,
            wake_rx,
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    /// Appends `floor` to the tail of the queue.
    pub fn enqueue(&self, floor: Floor) {
        let mut state = lock!(self.state);
        self.push_destination(&mut state, floor);
    }

    /// Records a commitment without moving. An idle loop is woken so that a
    /// commitment left on an empty queue gets cleared on its next tick.
    pub fn set_direction(&self, direction: Direction) {
        let mut state = lock!(self.state);
        state.direction = direction;
        if state.queue.is_empty() {
            let _ = self.wake_tx.try_send(());
        }
    }

    /// Pickup and drop-off of one request in a single critical section: the
    /// car jumps to `origin`, commits to `direction` and queues `destination`.
    pub fn assign_pickup(&self, origin: Floor, direction: Direction, destination: Floor) {
        let mut state = lock!(self.state);
        self.move_to(&mut state, origin);
        state.direction = direction;
        self.push_destination(&mut state, destination);
    }

    /// Current floor and direction, as seen by the dispatcher.
    pub fn position(&self) -> (Floor, Direction) {
        let state = lock!(self.state);
        (state.current_floor, state.direction)
    }

    pub fn is_idle(&self) -> bool {
        let state = lock!(self.state);
        Self::behaviour(&state) == Behaviour::Idle
    }

    pub fn snapshot(&self) -> UnitSnapshot {
        let state = lock!(self.state);

        UnitSnapshot {
            id: self.id,
            behaviour: Self::behaviour(&state),
            current_floor: self.floors.name(state.current_floor).to_string(),
            resting_floor: self.floors.name(self.resting_floor).to_string(),
            direction: state.direction,
            pending: self.queue_names(&state),
        }
    }

    /// One pass of the service loop.
    pub fn tick(&self) -> Tick {
        let mut state = lock!(self.state);

        if let Some(next_floor) = state.queue.pop_front() {
            info!(
                "Elevator {} servicing floors: [{}]. Currently going to floor {} from floor {}",
                self.id,
                self.queue_names(&state).join(", "),
                self.floors.name(next_floor),
                self.floors.name(state.current_floor)
            );
            self.move_to(&mut state, next_floor);
            Tick::Moved
        } else if state.current_floor != self.resting_floor {
            info!(
                "Elevator {} not servicing any floors, moving to resting floor {}",
                self.id,
                self.floors.name(self.resting_floor)
            );
            self.move_to(&mut state, self.resting_floor);
            state.direction = Direction::Stop;
            Tick::Returned
        } else {
            state.direction = Direction::Stop;
            Tick::Idle
        }
    }

    /// Service loop. Runs until `shutdown` fires; a move in progress always
    /// completes first since it happens inside `tick`.
    pub fn run(&self, shutdown: &ShutdownToken, tick_interval: Duration) {
        info!(
            "Elevator {} started at floor {}",
            self.id,
            self.floors.name(self.resting_floor)
        );

        while !shutdown.is_cancelled() {
            match self.tick() {
                Tick::Idle => {
                    cbc::select! {
                        recv(self.wake_rx) -> _ => {}
                        recv(shutdown.receiver()) -> _ => {}
                    }
                }
                Tick::Moved | Tick::Returned => {
                    cbc::select! {
                        recv(shutdown.receiver()) -> _ => {}
                        default(tick_interval) => {}
                    }
                }
            }
        }

        info!("Elevator {} stopped", self.id);
    }

    /***************************************/
    /*          Private helpers            */
    /***************************************/
    fn behaviour(state: &UnitState) -> Behaviour {
        if state.queue.is_empty() && state.direction == Direction::Stop {
            Behaviour::Idle
        } else {
            Behaviour::Servicing
        }
    }

    fn move_to(&self, state: &mut UnitState, floor: Floor) {
        info!(
            "Elevator {} moving from {} to {}",
            self.id,
            self.floors.name(state.current_floor),
            self.floors.name(floor)
        );
        state.current_floor = floor;
        info!("Elevator {} reached {}", self.id, self.floors.name(floor));
    }

    fn push_destination(&self, state: &mut UnitState, floor: Floor) {
        let was_empty = state.queue.is_empty();
        state.queue.push_back(floor);
        debug!(
            "Elevator {} added request to {}. Current requests: [{}]",
            self.id,
            self.floors.name(floor),
            self.queue_names(state).join(", ")
        );

        // A full channel already holds a wake-up.
        if was_empty {
            let _ = self.wake_tx.try_send(());
        }
    }

    fn queue_names(&self, state: &UnitState) -> Vec<String> {
        state
            .queue
            .iter()
            .map(|floor| self.floors.name(*floor).to_string())
            .collect()
    }
}
