//! Chain configuration

mod config;

pub use config::{chain_ids, ChainConfig};
