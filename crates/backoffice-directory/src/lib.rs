//! Back-office Directory — manager and order directory services plus
//! spreadsheet export.

pub mod export;
pub mod manager;
pub mod order;

pub use manager::ManagerDirectory;
pub use order::OrderDirectory;
