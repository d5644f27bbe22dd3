pub mod articles;
pub mod bulk;
pub mod config;
pub mod events;
pub mod queue;
pub mod review;
