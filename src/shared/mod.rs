pub mod errors;
pub mod floors;
pub mod macros;
pub mod shutdown;
pub mod structs;

pub use errors::ConfigError;
pub use errors::DispatchError;
pub use floors::Floor;
pub use floors::FloorRegistry;
pub use shutdown::ShutdownToken;
pub use shutdown::ShutdownTrigger;
pub use structs::Behaviour;
pub use structs::Direction;
pub use structs::PendingRequest;
pub use structs::SystemSnapshot;
pub use structs::UnitSnapshot;
