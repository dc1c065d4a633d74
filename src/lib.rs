pub mod bump;
pub mod changelog;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod guard;
pub mod lint;
pub mod registry;
pub mod rewrite;
pub mod suggest;
pub mod sync;
pub mod ui;
pub mod warning;

pub use error::{Result, TempletError};
