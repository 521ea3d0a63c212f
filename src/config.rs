/***************************************/
/*        3rd party libraries          */
/***************************************/
use log::warn;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

/***************************************/
/*           Local modules             */
/***************************************/
use crate::shared::{ConfigError, Floor, FloorRegistry};

/***************************************/
/*       Public data structures        */
/***************************************/
#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub dispatch: DispatchConfig,
    pub simulation: SimulationConfig,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct DispatchConfig {
    pub n_floors: u32,
    pub n_elevators: usize,
    pub tick_interval_ms: u64,
    pub resting_floors: Option<Vec<String>>,
    pub floor_names: Option<Vec<String>>,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct SimulationConfig {
    pub n_users: usize,
    pub seed: Option<u64>,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        DispatchConfig {
            n_floors: 50,
            n_elevators: 4,
            tick_interval_ms: 1000,
            resting_floors: None,
            floor_names: None,
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            n_users: 10,
            seed: None,
        }
    }
}

impl DispatchConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Custom floor names win over `n_floors`.
    pub fn floor_registry(&self) -> Result<FloorRegistry, ConfigError> {
        match &self.floor_names {
            Some(names) => FloorRegistry::from_names(names.clone()),
            None if self.n_floors == 0 => Err(ConfigError::InvalidFloorCount),
            None => Ok(FloorRegistry::new(self.n_floors)),
        }
    }

    pub fn resting_floors(&self, floors: &FloorRegistry) -> Result<Vec<Floor>, ConfigError> {
        if self.n_elevators == 0 {
            return Err(ConfigError::NoElevators);
        }

        let names = match &self.resting_floors {
            Some(names) => names,
            None => return Ok(floors.resting_floors(self.n_elevators)),
        };

        if names.len() != self.n_elevators {
            return Err(ConfigError::RestingFloorCount {
                given: names.len(),
                expected: self.n_elevators,
            });
        }

        names
            .iter()
            .map(|name| {
                floors
                    .floor(name)
                    .map_err(|_| ConfigError::InvalidFloor(name.clone()))
            })
            .collect()
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.dispatch.tick_interval_ms == 0 {
            return Err(ConfigError::InvalidTickInterval);
        }
        let floors = self.dispatch.floor_registry()?;
        self.dispatch.resting_floors(&floors)?;
        Ok(())
    }
}

/***************************************/
/*             Public API              */
/***************************************/
pub fn parse_config(config_str: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(config_str)?;
    config.validate()?;
    Ok(config)
}

/// A missing file means defaults; an unreadable or invalid one is an error.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        warn!(
            "No configuration file at {}, using default settings",
            path.display()
        );
        return Ok(Config::default());
    }

    let config_str = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&config_str)
}

/***************************************/
/*             Unit tests              */
/***************************************/
