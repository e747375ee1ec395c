//! Sincronização do snapshot de saúde: feed ao vivo com reconexão e
//! polling de fallback.
//!
//! - [`state`] – máquina de estados pura do feed
//! - [`runtime`] – capacidades (socket, timers, HTTP) e eventos
//! - [`client`] – [`TelemetrySyncClient`], que liga os dois

pub mod client;
pub mod runtime;
pub mod state;

pub use client::{HealthUpdate, SyncSettings, TelemetrySyncClient, UpdateSource};
pub use runtime::{LinkId, RequestId, SyncError, SyncEvent, SyncRuntime, TimerId};
pub use state::{ConnectionState, LiveAction, LiveEvent, transition};
