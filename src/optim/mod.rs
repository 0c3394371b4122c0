pub mod gap_fill;
pub mod optimizer;
pub mod targets;
pub mod tolerance;
