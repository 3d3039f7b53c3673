//! Domain models for the back-office directories.

pub mod comment;
pub mod group;
pub mod manager;
pub mod order;
pub mod statistic;
