pub mod article;
pub mod bulk;
pub mod command;
pub mod config;
pub mod error;
pub mod event;
pub mod io;
pub mod operation;
pub mod paths;
pub mod queue;
pub mod store;
pub mod transition;
pub mod types;
pub mod workflow;

pub use error::{ErrorKind, NewsroomError, Result};
