/* Modules */
pub mod config;
pub mod dispatcher;
pub mod elevator;
pub mod intake;
pub mod shared;
