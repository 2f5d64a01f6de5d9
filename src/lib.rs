#![forbid(unsafe_code)]

pub mod chapters;
pub mod error;
pub mod keys;
pub mod logging;
pub mod page;
pub mod project;
pub mod series;
pub mod server;
pub mod store;
