//! Application-level configuration.
//!
//! - [`RegistryConfig`]: session defaults, lifetimes and code allocation
//! - [`PollingConfig`]: cadence of the client-side polling loop

pub mod polling;
pub mod registry;

pub use polling::PollingConfig;
pub use registry::RegistryConfig;
