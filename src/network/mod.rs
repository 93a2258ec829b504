//! RPC boundary of the agent
//!
//! The server side exposes the query server as `cloud_agent.Agent` over a
//! unix or tcp socket; the client side is used by the `state` command.

mod client;
mod grpc_service;
pub mod proto;
mod socket;

pub use client::*;
pub use grpc_service::*;
pub use socket::*;
