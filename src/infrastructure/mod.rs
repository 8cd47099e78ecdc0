//! Transport adapters implementing [`crate::domain::ports::Transport`].

pub mod http;
pub mod stub;
