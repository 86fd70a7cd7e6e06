//! The Wayfire IPC client.
//!
//! [`Client`] couples envelope construction and framing with the transport:
//! each request is serialized, length-prefixed, written, and followed by
//! exactly one read of the framed reply. The typed methods below cover the
//! compositor's known control surface; [`Client::call`] sends anything else.
//!
//! # Example
//!
//! ```ignore
//! use wayfire_ipc::Client;
//!
//! #[tokio::main]
//! async fn main() -> wayfire_ipc::Result<()> {
//!     let mut client = Client::connect_to_env().await?;
//!     for method in client.list_methods().await? {
//!         println!("{method}");
//!     }
//!     Ok(())
//! }
//! ```

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::protocol::{
    decode_length, encode_frame, geometry, into_reply, Envelope, Message, LENGTH_PREFIX_SIZE,
};
use crate::transport::Socket;

/// Environment variable naming the compositor's active control socket.
pub const SOCKET_ENV: &str = "WAYFIRE_SOCKET";

/// The compositor's control socket path from the process environment, if set.
pub fn socket_path() -> Option<PathBuf> {
    std::env::var_os(SOCKET_ENV).map(PathBuf::from)
}

/// Options for [`Client::register_binding`].
///
/// `call_method`/`call_data` and `command` are all passed through when set;
/// which one wins if several are present is compositor-defined, not enforced
/// here.
#[derive(Debug, Clone, Default)]
pub struct BindingOptions {
    /// IPC method to invoke when the binding fires.
    pub call_method: Option<String>,
    /// Data for `call_method`.
    pub call_data: Option<Value>,
    /// Shell command to run when the binding fires.
    pub command: Option<String>,
    /// Activation mode. `press` and `normal` match the compositor defaults
    /// and are omitted from the wire payload.
    pub mode: Option<String>,
    /// Fire even when a compositor plugin has grabbed input.
    pub exec_always: bool,
}

/// A connection to a running Wayfire compositor.
///
/// One socket, one outstanding operation: every request blocks until its
/// reply has been read, and the protocol carries no request ids, so matching
/// is purely positional. Callers that need concurrent requests must
/// serialize access externally (a mutex or a single owning task) or open
/// multiple connections; unsynchronized sharing interleaves request and
/// event traffic with no way to untangle them.
///
/// There is no built-in timeout. A hung compositor blocks the pending read
/// until the socket is closed from elsewhere, which surfaces as
/// [`Error::ConnectionClosed`]. Transport failures leave the connection
/// unusable; reconnecting is the caller's concern.
pub struct Client {
    socket: Socket,
}

impl Client {
    /// Connect to the compositor socket at `path`.
    pub async fn connect(path: impl AsRef<Path>) -> Result<Self> {
        let socket = Socket::connect(path).await?;
        Ok(Self { socket })
    }

    /// Connect to the socket named by the `WAYFIRE_SOCKET` environment
    /// variable.
    pub async fn connect_to_env() -> Result<Self> {
        let path = socket_path()
            .ok_or_else(|| Error::InvalidArgument(format!("{SOCKET_ENV} is not set")))?;
        Self::connect(path).await
    }

    /// Close the connection. Idempotent.
    pub async fn close(&mut self) {
        self.socket.close().await;
    }

    // ------------------------------------------------------------------
    // Request/response core
    // ------------------------------------------------------------------

    /// Send an envelope and read its reply.
    ///
    /// Exactly one read follows each write; do not issue a second request
    /// before the prior reply (or an awaited event) has been consumed.
    pub async fn send_request(&mut self, envelope: &Envelope) -> Result<Value> {
        let payload = serde_json::to_vec(envelope)?;
        tracing::debug!(method = %envelope.method, len = payload.len(), "sending request");

        self.socket.write_all(&encode_frame(&payload)).await?;
        self.read_message().await
    }

    /// Read one framed message and surface compositor errors.
    ///
    /// Blocks until a full frame has arrived. A reply carrying a top-level
    /// `error` key fails with [`Error::Remote`]; malformed JSON fails with
    /// [`Error::Protocol`].
    pub async fn read_message(&mut self) -> Result<Value> {
        let mut prefix = [0u8; LENGTH_PREFIX_SIZE];
        self.socket.read_exact(&mut prefix).await?;
        let len = decode_length(prefix)?;

        let mut payload = vec![0u8; len as usize];
        self.socket.read_exact(&mut payload).await?;

        let value: Value = serde_json::from_slice(&payload)
            .map_err(|e| Error::Protocol(format!("malformed JSON payload: {e}")))?;
        into_reply(value)
    }

    /// Read one message and classify it as reply or pushed event.
    ///
    /// After [`watch`](Client::watch), the stream may interleave unsolicited
    /// event envelopes with call replies; event loops drain them here.
    pub async fn next_message(&mut self) -> Result<Message> {
        let message = Message::from_value(self.read_message().await?);
        if let Some(event) = message.event() {
            tracing::debug!(event, "received pushed event");
        }
        Ok(message)
    }

    /// Send an arbitrary method, for methods without a typed builder
    /// (e.g. `expo/toggle`).
    pub async fn call(&mut self, method: &str, data: Map<String, Value>) -> Result<Value> {
        self.send_request(&Envelope::with_data(method, data)).await
    }

    // ------------------------------------------------------------------
    // Discovery and events
    // ------------------------------------------------------------------

    /// List the method names the compositor supports.
    pub async fn list_methods(&mut self) -> Result<Vec<String>> {
        let reply = self.send_request(&Envelope::new("list-methods")).await?;

        let methods = reply
            .get("methods")
            .and_then(Value::as_array)
            .ok_or_else(|| Error::Protocol("reply is missing the methods array".into()))?;

        Ok(methods
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_owned)
            .collect())
    }

    /// Start watching compositor events, optionally scoped to the given
    /// event names. Returns the command acknowledgement.
    pub async fn watch(&mut self, events: Option<&[&str]>) -> Result<Value> {
        let mut envelope = Envelope::new("window-rules/events/watch");
        if let Some(events) = events {
            envelope.set("events", Value::from(events.to_vec()));
        }
        self.send_request(&envelope).await
    }

    // ------------------------------------------------------------------
    // Bindings
    // ------------------------------------------------------------------

    /// Register an input accelerator, e.g. `"<alt>"`. Returns the
    /// compositor-issued binding id used for unregistration and for matching
    /// `command-binding` events.
    pub async fn register_binding(
        &mut self,
        binding: &str,
        options: &BindingOptions,
    ) -> Result<u64> {
        let reply = self
            .send_request(&binding_envelope(binding, options))
            .await?;

        reply
            .get("binding-id")
            .and_then(Value::as_u64)
            .ok_or_else(|| Error::Protocol("reply is missing binding-id".into()))
    }

    /// Unregister a binding by id. An already-gone id surfaces as
    /// [`Error::Remote`].
    pub async fn unregister_binding(&mut self, binding_id: u64) -> Result<Value> {
        self.send_request(
            &Envelope::new("command/unregister_binding").with("binding_id", binding_id),
        )
        .await
    }

    /// Unregister every binding held by this connection.
    pub async fn clear_bindings(&mut self) -> Result<Value> {
        self.send_request(&Envelope::new("command/clear_bindings"))
            .await
    }

    // ------------------------------------------------------------------
    // Outputs and views
    // ------------------------------------------------------------------

    /// Query an output descriptor by id.
    pub async fn query_output(&mut self, output_id: u64) -> Result<Value> {
        self.send_request(&Envelope::new("window-rules/output-info").with("id", output_id))
            .await
    }

    /// List all views known to the compositor.
    pub async fn list_views(&mut self) -> Result<Value> {
        self.send_request(&Envelope::new("window-rules/list-views"))
            .await
    }

    /// Move and resize a view.
    pub async fn configure_view(
        &mut self,
        view_id: u64,
        x: i32,
        y: i32,
        w: i32,
        h: i32,
    ) -> Result<Value> {
        self.send_request(
            &Envelope::new("window-rules/configure-view")
                .with("id", view_id)
                .with("geometry", geometry(x, y, w, h)),
        )
        .await
    }

    /// Snap a view to a grid slot, e.g. `slot_br`.
    pub async fn assign_slot(&mut self, view_id: u64, slot: &str) -> Result<Value> {
        self.send_request(&Envelope::new(format!("grid/{slot}")).with("view_id", view_id))
            .await
    }

    /// Focus a view.
    pub async fn set_focus(&mut self, view_id: u64) -> Result<Value> {
        self.send_request(&Envelope::new("window-rules/focus-view").with("id", view_id))
            .await
    }

    /// Pin or unpin a view above the others.
    pub async fn set_always_on_top(&mut self, view_id: u64, always_on_top: bool) -> Result<Value> {
        self.send_request(
            &Envelope::new("wm-actions/set-always-on-top")
                .with("view_id", view_id)
                .with("state", always_on_top),
        )
        .await
    }

    /// Set a view's opacity. Note the `view-id` key spelling on this method.
    pub async fn set_view_alpha(&mut self, view_id: u64, alpha: f64) -> Result<Value> {
        self.send_request(
            &Envelope::new("wf/alpha/set-view-alpha")
                .with("view-id", view_id)
                .with("alpha", alpha),
        )
        .await
    }

    // ------------------------------------------------------------------
    // Input devices
    // ------------------------------------------------------------------

    /// List input devices.
    pub async fn list_input_devices(&mut self) -> Result<Value> {
        self.send_request(&Envelope::new("input/list-devices"))
            .await
    }

    /// Enable or disable an input device by id.
    pub async fn configure_input_device(&mut self, id: u64, enabled: bool) -> Result<Value> {
        self.send_request(
            &Envelope::new("input/configure-device")
                .with("id", id)
                .with("enabled", enabled),
        )
        .await
    }

    // ------------------------------------------------------------------
    // Headless outputs
    // ------------------------------------------------------------------

    /// Create a virtual output of the given pixel dimensions. The reply
    /// carries the new descriptor under `output`.
    pub async fn create_headless_output(&mut self, width: u32, height: u32) -> Result<Value> {
        self.send_request(
            &Envelope::new("wayfire/create-headless-output")
                .with("width", width)
                .with("height", height),
        )
        .await
    }

    /// Destroy a headless output selected by name or by id.
    ///
    /// Exactly one selector must be given; anything else fails with
    /// [`Error::InvalidArgument`] before any bytes hit the transport.
    pub async fn destroy_headless_output(
        &mut self,
        output_name: Option<&str>,
        output_id: Option<u64>,
    ) -> Result<Value> {
        let (key, value) = headless_selector(output_name, output_id)?;
        self.send_request(&Envelope::new("wayfire/destroy-headless-output").with(key, value))
            .await
    }

    // ------------------------------------------------------------------
    // Configuration options
    // ------------------------------------------------------------------

    /// Read a configuration option, e.g. `core/plugins`.
    pub async fn get_option_value(&mut self, option: &str) -> Result<Value> {
        self.send_request(&Envelope::new("wayfire/get-config-option").with("option", option))
            .await
    }

    /// Write configuration options.
    ///
    /// Keys containing `/` pass through verbatim; a key without `/` is
    /// treated as a section name whose nested option names are flattened to
    /// `section/option`, values unchanged.
    pub async fn set_option_values(&mut self, options: Map<String, Value>) -> Result<Value> {
        let flattened = flatten_options(options)?;
        self.send_request(&Envelope::with_data("wayfire/set-config-options", flattened))
            .await
    }
}

/// Build the `command/register_binding` envelope.
///
/// `mode` values `press` and `normal` match the compositor defaults and are
/// left off the wire; `exec_always` is always present.
fn binding_envelope(binding: &str, options: &BindingOptions) -> Envelope {
    let mut envelope = Envelope::new("command/register_binding")
        .with("binding", binding)
        .with("exec_always", options.exec_always);

    if let Some(mode) = options.mode.as_deref() {
        if mode != "press" && mode != "normal" {
            envelope.set("mode", mode);
        }
    }
    if let Some(method) = &options.call_method {
        envelope.set("call_method", method.as_str());
    }
    if let Some(data) = &options.call_data {
        envelope.set("call_data", data.clone());
    }
    if let Some(command) = &options.command {
        envelope.set("command", command.as_str());
    }

    envelope
}

/// Validate the headless-output selector pair into a wire key/value.
fn headless_selector(
    output_name: Option<&str>,
    output_id: Option<u64>,
) -> Result<(&'static str, Value)> {
    match (output_name, output_id) {
        (Some(name), None) => Ok(("output", Value::from(name))),
        (None, Some(id)) => Ok(("output-id", Value::from(id))),
        (None, None) => Err(Error::InvalidArgument(
            "destroy_headless_output requires an output name or id".into(),
        )),
        (Some(_), Some(_)) => Err(Error::InvalidArgument(
            "destroy_headless_output takes an output name or an id, not both".into(),
        )),
    }
}

/// Flatten section-grouped option keys to fully qualified `section/option`
/// keys. Keys already containing `/` pass through untouched.
fn flatten_options(options: Map<String, Value>) -> Result<Map<String, Value>> {
    let mut flattened = Map::new();

    for (key, value) in options {
        if key.contains('/') {
            flattened.insert(key, value);
            continue;
        }

        let nested = match value {
            Value::Object(nested) => nested,
            other => {
                return Err(Error::InvalidArgument(format!(
                    "section {key:?} must map option names to values, got {other}"
                )));
            }
        };
        for (option, option_value) in nested {
            flattened.insert(format!("{key}/{option}"), option_value);
        }
    }

    Ok(flattened)
}
