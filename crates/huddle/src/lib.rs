//! # Huddle
//!
//! An ephemeral, capacity-bounded group-chat relay: short-lived rooms
//! identified by an opaque 16-character hash accept joins and text
//! messages, retain a bounded recent-message window, and expire one
//! hour after creation. Room creation per network address is throttled
//! with escalating cooldown delays.
//!
//! This crate is the boundary adapter. It validates room hashes before
//! anything keyed runs, parses request bodies leniently, sequences the
//! rate-check → create and join → rate-reset couplings, and renders
//! every outcome as a JSON body with an HTTP-style status. Plug a
//! router of your choice in front of a [`Gateway`]; the relay itself
//! does not speak HTTP.
//!
//! ```rust,no_run
//! # async fn demo() {
//! use huddle::Gateway;
//!
//! let gateway = Gateway::builder().build();
//! let resp = gateway
//!     .create("abcdef0123456789", "203.0.113.7",
//!             Some(r#"{"room_hash":"abcdef0123456789"}"#))
//!     .await;
//! assert_eq!(resp.status, 200);
//! # }
//! ```

mod gateway;
mod response;

pub use gateway::{Gateway, GatewayBuilder};
pub use response::ApiResponse;

/// Installs a `tracing` subscriber reading `RUST_LOG`.
///
/// Call once at process start; embedding applications with their own
/// subscriber should skip this.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
}
