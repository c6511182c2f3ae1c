// vilfo-api: Async Rust client for the Vilfo router REST API

pub mod capability;
pub mod client;
pub mod config;
pub mod dashboard;
pub mod detect;
pub mod devices;
pub mod error;
pub mod models;
pub mod system;

mod mac;

pub use capability::CapabilityState;
pub use client::{RequestOptions, VilfoClient};
pub use config::ClientConfig;
pub use error::Error;
pub use models::{BandwidthUsage, DeviceRecord, DeviceStatus};
