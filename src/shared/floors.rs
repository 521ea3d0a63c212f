/***************************************/
/*           Local modules             */
/***************************************/
use crate::shared::errors::{ConfigError, DispatchError};
use crate::shared::Direction;
use std::collections::HashSet;

/***************************************/
/*       Public data structures        */
/***************************************/

/// Handle to a floor of a `FloorRegistry`.
///
/// Only the registry hands these out, so anything holding a `Floor` holds a
/// valid one. Ordering follows the registry sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Floor(usize);

impl Floor {
    pub fn index(self) -> usize {
        self.0
    }
}

/**
 * The fixed, ordered sequence of floors of the building.
 *
 * Built once at start-up and shared read-only (behind an `Arc`) by the
 * dispatcher and every elevator unit.
 *
 * # Fields
 * - `names`:   Floor identifiers, lowest floor first.
 */
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FloorRegistry {
    names: Vec<String>,
}

/***************************************/
/*             Public API              */
/***************************************/
impl FloorRegistry {
    pub const GROUND: &'static str = "Parking";

    /// `Parking` followed by floors `1..=n_floors`.
    pub fn new(n_floors: u32) -> FloorRegistry {
        let names = std::iter::once(Self::GROUND.to_string())
            .chain((1..=n_floors).map(|floor| floor.to_string()))
            .collect();

        FloorRegistry { names }
    }

    pub fn from_names(names: Vec<String>) -> Result<FloorRegistry, ConfigError> {
        if names.is_empty() {
            return Err(ConfigError::EmptyFloorNames);
        }

        let mut seen = HashSet::new();
        for name in names.iter() {
            if !seen.insert(name.as_str()) {
                return Err(ConfigError::DuplicateFloor(name.clone()));
            }
        }

        Ok(FloorRegistry { names })
    }

    pub fn floor(&self, name: &str) -> Result<Floor, DispatchError> {
        self.index_of(name).map(Floor)
    }

    pub fn index_of(&self, name: &str) -> Result<usize, DispatchError> {
        self.names
            .iter()
            .position(|candidate| candidate == name)
            .ok_or_else(|| DispatchError::InvalidFloor(name.to_string()))
    }

    pub fn name(&self, floor: Floor) -> &str {
        &self.names[floor.0]
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// False for handles minted by a larger registry.
    pub fn contains(&self, floor: Floor) -> bool {
        floor.0 < self.names.len()
    }

    /// Every floor, lowest first.
    pub fn iter(&self) -> impl Iterator<Item = Floor> + '_ {
        (0..self.names.len()).map(Floor)
    }

    /// Up iff `to` lies above `from`. Equal floors never get here, they are
    /// rejected as `SameFloorRequest` at the boundary.
    pub fn direction_between(&self, from: Floor, to: Floor) -> Direction {
        if to.0 > from.0 {
            Direction::Up
        } else {
            Direction::Down
        }
    }

    /// Number of floors between `a` and `b`; the only travel cost there is.
    pub fn distance(&self, a: Floor, b: Floor) -> usize {
        a.0.abs_diff(b.0)
    }

    /// Evenly spaced resting floors: elevator `i` rests `i * step` floors
    /// above the ground level, `step` being the numbered floors per elevator.
    pub fn resting_floors(&self, n_elevators: usize) -> Vec<Floor> {
        let step = (self.len() - 1) / n_elevators.max(1);

        (0..n_elevators)
            .map(|i| Floor((i * step).min(self.len() - 1)))
            .collect()
    }
}

/***************************************/
/*             Unit tests              */
/***************************************/
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_building_layout() {
        let floors = FloorRegistry::new(5);

        assert_eq!(floors.names(), &["Parking", "1", "2", "3", "4", "5"]);
        assert_eq!(floors.index_of("Parking"), Ok(0));
        assert_eq!(floors.index_of("5"), Ok(5));
    }

    #[test]
    fn test_unknown_floor_is_rejected() {
        let floors = FloorRegistry::new(5);

        assert_eq!(
            floors.index_of("Roof"),
            Err(DispatchError::InvalidFloor("Roof".to_string()))
        );
        assert!(floors.floor("6").is_err());
    }

    #[test]
    fn test_direction_is_antisymmetric() {
        let floors = FloorRegistry::new(5);

        for fa in floors.iter() {
            for fb in floors.iter() {
                if fa == fb {
                    continue;
                }
                let forward = floors.direction_between(fa, fb);
                let backward = floors.direction_between(fb, fa);

                assert_eq!(forward == Direction::Up, fb.index() > fa.index());
                assert_ne!(forward, backward);
                assert_ne!(forward, Direction::Stop);
            }
        }
    }

    #[test]
    fn test_iter_follows_registry_order() {
        let floors = FloorRegistry::new(3);

        let names: Vec<&str> = floors.iter().map(|floor| floors.name(floor)).collect();

        assert_eq!(names, vec!["Parking", "1", "2", "3"]);
        assert_eq!(floors.iter().count(), floors.len());
    }

    #[test]
    fn test_contains_rejects_floors_of_a_taller_building() {
        let floors = FloorRegistry::new(3);
        let taller = FloorRegistry::new(10);

        assert!(floors.contains(taller.floor("3").unwrap()));
        assert!(!floors.contains(taller.floor("4").unwrap()));
        assert!(taller.iter().all(|floor| taller.contains(floor)));
    }

    #[test]
    fn test_distance() {
        let floors = FloorRegistry::new(5);
        let parking = floors.floor("Parking").unwrap();
        let third = floors.floor("3").unwrap();

        assert_eq!(floors.distance(parking, third), 3);
        assert_eq!(floors.distance(third, parking), 3);
        assert_eq!(floors.distance(third, third), 0);
    }

    #[test]
    fn test_resting_floors_are_evenly_spaced() {
        let floors = FloorRegistry::new(50);
        let resting: Vec<&str> = floors
            .resting_floors(4)
            .into_iter()
            .map(|floor| floors.name(floor))
            .collect();

        assert_eq!(resting, vec!["Parking", "12", "24", "36"]);
    }

    #[test]
    fn test_more_elevators_than_floors_rest_at_ground() {
        let floors = FloorRegistry::new(2);
        let resting = floors.resting_floors(4);

        assert_eq!(resting.len(), 4);
        assert!(resting.iter().all(|floor| floor.index() == 0));
    }

    #[test]
    fn test_custom_names() {
        let names = vec!["B1".to_string(), "L".to_string(), "1".to_string()];
        let floors = FloorRegistry::from_names(names).unwrap();
        assert_eq!(floors.index_of("L"), Ok(1));

        let duplicate = vec!["L".to_string(), "L".to_string()];
        assert!(matches!(
            FloorRegistry::from_names(duplicate),
            Err(ConfigError::DuplicateFloor(name)) if name == "L"
        ));
        assert!(matches!(
            FloorRegistry::from_names(Vec::new()),
            Err(ConfigError::EmptyFloorNames)
        ));
    }
}
