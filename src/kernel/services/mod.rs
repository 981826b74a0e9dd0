//! Services layer (ports + adapters).
//!
//! - `ports`: pure contracts/types used across the app (kernel-facing).
//! - `adapters`: OS/runtime specific implementations (IO/async).

#[cfg(feature = "storage")]
pub mod adapters;
pub mod bus;
pub mod ports;

pub use bus::{store_bus, StoreBusReceiver, StoreBusSender, StoreMessage};
