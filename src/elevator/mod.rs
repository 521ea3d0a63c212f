pub mod unit;
pub mod unit_tests;

pub use unit::ElevatorUnit;
pub use unit::Tick;
