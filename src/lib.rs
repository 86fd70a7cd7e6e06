//! # wayfire-ipc
//!
//! Client for the [Wayfire] compositor's IPC control socket.
//!
//! The compositor exposes a Unix domain socket (named by the
//! `WAYFIRE_SOCKET` environment variable) speaking length-prefixed JSON:
//! each message is a 4-byte little-endian length followed by that many bytes
//! of UTF-8 JSON. Requests are `{method, data}` envelopes; replies are
//! matched positionally, one outstanding request per connection.
//!
//! [Wayfire]: https://wayfire.org
//!
//! ## Example
//!
//! ```ignore
//! use wayfire_ipc::{Client, Message};
//!
//! #[tokio::main]
//! async fn main() -> wayfire_ipc::Result<()> {
//!     let mut client = Client::connect_to_env().await?;
//!
//!     // Request/response.
//!     let views = client.list_views().await?;
//!     println!("{views}");
//!
//!     // Event loop: bindings push `command-binding` events.
//!     let id = client
//!         .register_binding("<alt>", &Default::default())
//!         .await?;
//!     loop {
//!         if let Message::Event { payload, .. } = client.next_message().await? {
//!             if payload["binding-id"] == id {
//!                 break;
//!             }
//!         }
//!     }
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod protocol;
pub mod transport;

mod client;

pub use client::{socket_path, BindingOptions, Client, SOCKET_ENV};
pub use error::{Error, Result};
pub use protocol::{Envelope, Message};
