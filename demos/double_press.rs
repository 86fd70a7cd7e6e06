//! Toggle Expo by double-pressing the left alt key.
//!
//! Demonstrates custom bindings for command sequences the compositor cannot
//! express on its own: a binding is registered on `<alt>` press, the client
//! then loops on pushed `command-binding` events and toggles Expo when two
//! presses land within half a second.

use std::time::{Duration, Instant};

use serde_json::Map;
use wayfire_ipc::{BindingOptions, Client, Message};

const MAX_DELAY: Duration = Duration::from_millis(500);

#[tokio::main]
async fn main() -> wayfire_ipc::Result<()> {
    let mut client = Client::connect_to_env().await?;

    let options = BindingOptions {
        mode: Some("press".to_string()),
        exec_always: true,
        ..Default::default()
    };
    let binding_id = client.register_binding("<alt>", &options).await?;

    let mut last_press: Option<Instant> = None;
    loop {
        let Message::Event { event, payload } = client.next_message().await? else {
            continue;
        };
        if event != "command-binding" || payload["binding-id"].as_u64() != Some(binding_id) {
            continue;
        }

        match last_press {
            Some(previous) if previous.elapsed() <= MAX_DELAY => {
                client.call("expo/toggle", Map::new()).await?;
                // Forget the press so a triple press does not toggle twice.
                last_press = None;
            }
            _ => last_press = Some(Instant::now()),
        }
    }
}
