pub mod export;
pub mod schedule;
