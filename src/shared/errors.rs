/***************************************/
/*        3rd party libraries          */
/***************************************/
use std::path::PathBuf;

/***************************************/
/*            Error types              */
/***************************************/

/// Errors raised at the request boundary, before anything reaches the
/// dispatch algorithm.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    #[error("invalid floor '{0}'")]
    InvalidFloor(String),
    #[error("origin and destination are both floor '{0}'")]
    SameFloorRequest(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read configuration file {}: {}", .path.display(), .source)]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse configuration file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("a building needs at least one numbered floor")]
    InvalidFloorCount,
    #[error("a building needs at least one elevator")]
    NoElevators,
    #[error("tick interval must be at least 1 ms")]
    InvalidTickInterval,
    #[error("{given} resting floors given for {expected} elevators")]
    RestingFloorCount { given: usize, expected: usize },
    #[error("resting floor '{0}' is not a floor of the building")]
    InvalidFloor(String),
    #[error("resting floor index {0} is outside the building")]
    ForeignFloor(usize),
    #[error("floor list is empty")]
    EmptyFloorNames,
    #[error("floor '{0}' appears more than once")]
    DuplicateFloor(String),
}
