//! Client side of the external voice agent service
//!
//! [`ApiClient`] speaks the service's REST surface; [`ConsoleApi`] is the seam
//! the console screens depend on, so they can run against [`MockApi`] as
//! well. [`RealtimeSdk`] is the equally narrow seam to the real-time calling
//! SDK that joins a started session.

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

pub mod api;
pub mod api_client;
pub mod envelope;
pub mod mock;
pub mod session;

pub use api::ConsoleApi;
pub use api_client::ApiClient;
pub use mock::{MockApi, Operation};
pub use session::{MockRealtimeSdk, RealtimeSdk, SessionError, SessionHandle};
