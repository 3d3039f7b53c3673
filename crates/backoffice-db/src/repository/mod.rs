//! SurrealDB repository implementations.

mod comment;
mod group;
mod manager;
mod order;

pub use comment::SurrealCommentRepository;
pub use group::SurrealGroupRepository;
pub use manager::SurrealManagerRepository;
pub use order::SurrealOrderRepository;
