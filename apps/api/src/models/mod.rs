pub mod simulation;
pub mod user;
