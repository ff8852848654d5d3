pub mod client;
pub mod location;
pub mod simulation;
pub mod stats;
