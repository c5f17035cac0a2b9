pub mod judge;
pub mod session;
pub mod targets;
