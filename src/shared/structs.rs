/***************************************/
/*        3rd party libraries          */
/***************************************/
use serde::Deserialize;
use serde::Serialize;
use std::fmt;

/***************************************/
/*       Public data structures        */
/***************************************/
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Behaviour {
    Idle,
    Servicing,
}

/// Travel direction of a car. `Stop` is the uncommitted direction of an
/// idle car; requests themselves are always `Up` or `Down`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Stop,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Up => write!(f, "up"),
            Direction::Down => write!(f, "down"),
            Direction::Stop => write!(f, "none"),
        }
    }
}

/// Point-in-time view of one elevator, floors given by name.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct UnitSnapshot {
    pub id: usize,
    pub behaviour: Behaviour,
    pub current_floor: String,
    pub resting_floor: String,
    pub direction: Direction,
    pub pending: Vec<String>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct PendingRequest {
    pub origin: String,
    pub destination: String,
    pub direction: Direction,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct SystemSnapshot {
    pub units: Vec<UnitSnapshot>,
    pub pending: Vec<PendingRequest>,
}

impl fmt::Display for UnitSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.pending.is_empty() {
            write!(
                f,
                "Elevator {} at {} ({}), no pending requests",
                self.id, self.current_floor, self.direction
            )
        } else {
            write!(
                f,
                "Elevator {} at {} ({}), servicing floors: [{}]",
                self.id,
                self.current_floor,
                self.direction,
                self.pending.join(", ")
            )
        }
    }
}
