extern crate log;

pub mod config;
pub mod release;
