//! Local agent keeping a live, cached view of cloud inventories.
//!
//! A [`Supervisor`] runs one restart-on-failure watch loop per configured
//! source and writes every snapshot into a [`Cache`]. The [`QueryServer`]
//! answers reads from the cache only, and [`network`] exposes it over a unix
//! or tcp socket.

mod cache;
mod config;
mod constants;
mod errors;
mod inventory;
mod server;
mod supervisor;

pub mod cli;
pub mod metrics;
pub mod network;
pub mod output;
pub mod upstream;

pub use cache::*;
pub use config::*;
pub use constants::*;
pub use errors::*;
pub use inventory::*;
pub use network::AgentClient;
pub use network::InventoryService;
pub use network::Listener;
pub use server::*;
pub use supervisor::*;
pub use upstream::FileUpstream;
pub use upstream::Upstream;

//-----------------------------------------------------------
// Test utils

#[cfg(test)]
pub mod test_utils;
