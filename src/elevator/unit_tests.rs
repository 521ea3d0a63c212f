/*
 * Unit tests for the elevator module
 *
 * The unit tests follows the Arrange, Act, Assert pattern.
 *
 * Tests:
 * - test_unit_init
 * - test_destinations_are_visited_in_fifo_order
 * - test_return_to_resting_floor_after_last_destination
 * - test_set_direction_does_not_move
 * - test_snapshot_is_stable_without_mutation
 * - test_service_loop_wakes_on_enqueue
 * - test_service_loop_clears_direction_set_while_idle
 * - test_service_loop_stops_when_idle
 */

/***************************************/
/*             Unit tests              */
/***************************************/
#[cfg(test)]
mod unit_tests {
    use crate::elevator::{ElevatorUnit, Tick};
    use crate::shared::shutdown;
    use crate::shared::Behaviour::{Idle, Servicing};
    use crate::shared::Direction::{Stop, Up};
    use crate::shared::FloorRegistry;
    use crossbeam_channel::unbounded;
    use std::sync::Arc;
    use std::thread::{sleep, spawn};
    use std::time::{Duration, Instant};

    fn setup_unit(resting: &str) -> (ElevatorUnit, Arc<FloorRegistry>) {
        let floors = Arc::new(FloorRegistry::new(5));
        let resting = floors.floor(resting).unwrap();
        (ElevatorUnit::new(1, resting, floors.clone()), floors)
    }

    fn wait_until(timeout: Duration, condition: impl Fn() -> bool) -> bool {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if condition() {
                return true;
            }
            sleep(Duration::from_millis(1));
        }
        condition()
    }

    #[test]
    fn test_unit_init() {
        // Arrange
        let (unit, _floors) = setup_unit("3");

        // Act
        let snapshot = unit.snapshot();

        // Assert
        assert_eq!(snapshot.id, 1);
        assert_eq!(snapshot.behaviour, Idle);
        assert_eq!(snapshot.current_floor, "3");
        assert_eq!(snapshot.resting_floor, "3");
        assert_eq!(snapshot.direction, Stop);
        assert!(snapshot.pending.is_empty());
        assert_eq!(unit.tick(), Tick::Idle);
    }

    #[test]
    fn test_destinations_are_visited_in_fifo_order() {
        // Arrange
        let (unit, floors) = setup_unit("Parking");
        let order = ["3", "1", "5"];

        // Act
        for name in order {
            unit.enqueue(floors.floor(name).unwrap());
        }

        // Assert
        assert_eq!(unit.snapshot().pending, vec!["3", "1", "5"]);
        assert_eq!(unit.snapshot().behaviour, Servicing);
        for name in order {
            assert_eq!(unit.tick(), Tick::Moved);
            assert_eq!(unit.snapshot().current_floor, name);
        }
        assert!(unit.snapshot().pending.is_empty());
    }

    #[test]
    fn test_return_to_resting_floor_after_last_destination() {
        // Arrange: at floor 1 heading up with [3, 1] queued
        let (unit, floors) = setup_unit("Parking");
        let first = floors.floor("1").unwrap();
        let third = floors.floor("3").unwrap();
        unit.assign_pickup(first, Up, third);
        unit.enqueue(first);
        assert_eq!(unit.snapshot().current_floor, "1");
        assert_eq!(unit.snapshot().pending, vec!["3", "1"]);

        // Act & Assert
        assert_eq!(unit.tick(), Tick::Moved);
        assert_eq!(unit.snapshot().current_floor, "3");

        assert_eq!(unit.tick(), Tick::Moved);
        let snapshot = unit.snapshot();
        assert_eq!(snapshot.current_floor, "1");
        assert!(snapshot.pending.is_empty());
        assert_eq!(snapshot.direction, Up);

        assert_eq!(unit.tick(), Tick::Returned);
        let snapshot = unit.snapshot();
        assert_eq!(snapshot.current_floor, "Parking");
        assert_eq!(snapshot.direction, Stop);
        assert_eq!(snapshot.behaviour, Idle);

        assert_eq!(unit.tick(), Tick::Idle);
    }

    #[test]
    fn test_set_direction_does_not_move() {
        // Arrange
        let (unit, _floors) = setup_unit("2");

        // Act
        unit.set_direction(Up);

        // Assert
        let (floor, direction) = unit.position();
        assert_eq!(floor.index(), 2);
        assert_eq!(direction, Up);
        assert!(!unit.is_idle());

        // An idle tick at the resting floor clears the commitment
        assert_eq!(unit.tick(), Tick::Idle);
        assert!(unit.is_idle());
    }

    #[test]
    fn test_snapshot_is_stable_without_mutation() {
        // Arrange
        let (unit, floors) = setup_unit("Parking");
        unit.assign_pickup(floors.floor("2").unwrap(), Up, floors.floor("4").unwrap());

        // Act
        let first = unit.snapshot();
        let second = unit.snapshot();

        // Assert
        assert_eq!(first, second);
    }

    #[test]
    fn test_service_loop_wakes_on_enqueue() {
        // Arrange
        let (unit, floors) = setup_unit("Parking");
        let unit = Arc::new(unit);
        let (trigger, token) = shutdown::channel();
        let runner = unit.clone();
        let unit_thread = spawn(move || runner.run(&token, Duration::from_secs(10)));

        // Act
        unit.enqueue(floors.floor("3").unwrap());

        // Assert
        assert!(wait_until(Duration::from_secs(3), || {
            unit.snapshot().current_floor == "3"
        }));

        // Cleanup
        trigger.fire();
        unit_thread.join().unwrap();
    }

    #[test]
    fn test_service_loop_clears_direction_set_while_idle() {
        // Arrange
        let (unit, _floors) = setup_unit("Parking");
        let unit = Arc::new(unit);
        let (trigger, token) = shutdown::channel();
        let runner = unit.clone();
        let unit_thread = spawn(move || runner.run(&token, Duration::from_millis(5)));
        sleep(Duration::from_millis(30));

        // Act
        unit.set_direction(Up);

        // Assert
        assert!(wait_until(Duration::from_secs(3), || unit.position().1 == Stop));
        assert!(unit.is_idle());

        // Cleanup
        trigger.fire();
        unit_thread.join().unwrap();
    }

    #[test]
    fn test_service_loop_stops_when_idle() {
        // Arrange
        let (unit, _floors) = setup_unit("Parking");
        let (trigger, token) = shutdown::channel();
        let (done_tx, done_rx) = unbounded::<()>();
        let unit_thread = spawn(move || {
            unit.run(&token, Duration::from_millis(5));
            done_tx.send(()).unwrap();
        });
        sleep(Duration::from_millis(20));

        // Act
        trigger.fire();

        // Assert
        assert!(done_rx.recv_timeout(Duration::from_secs(3)).is_ok());
        unit_thread.join().unwrap();
    }
}
