//! Print the methods the running compositor supports.
//!
//! ```sh
//! cargo run --example list_methods
//! ```

use wayfire_ipc::Client;

#[tokio::main]
async fn main() -> wayfire_ipc::Result<()> {
    let mut client = Client::connect_to_env().await?;

    println!("Supported methods:");
    for method in client.list_methods().await? {
        println!("  {method}");
    }

    Ok(())
}
