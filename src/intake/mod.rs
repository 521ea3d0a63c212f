pub mod console;
pub mod simulation;
