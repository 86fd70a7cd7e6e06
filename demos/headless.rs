//! Manage headless (virtual) outputs.
//!
//! ```sh
//! cargo run --example headless -- add [width] [height]
//! cargo run --example headless -- remove <output-id|output-name>
//! ```

use std::env;

use wayfire_ipc::Client;

fn usage() {
    eprintln!("usage: headless add [width] [height] | remove <output-id|output-name>");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().skip(1).collect();
    let mut client = Client::connect_to_env().await?;

    match args.first().map(String::as_str) {
        Some("add") => {
            let width = args.get(1).map(|s| s.parse()).transpose()?.unwrap_or(1920);
            let height = args.get(2).map(|s| s.parse()).transpose()?.unwrap_or(1080);

            let reply = client.create_headless_output(width, height).await?;
            match reply.get("output") {
                Some(output) => println!(
                    "Created headless output:\n{}",
                    serde_json::to_string_pretty(output)?
                ),
                None => println!("Failed to create headless output: {reply}"),
            }
        }
        Some("remove") => {
            let Some(selector) = args.get(1) else {
                usage();
                return Ok(());
            };

            let reply = match selector.parse::<u64>() {
                Ok(id) => client.destroy_headless_output(None, Some(id)).await?,
                Err(_) => client.destroy_headless_output(Some(selector), None).await?,
            };
            println!("{reply}");
        }
        _ => usage(),
    }

    Ok(())
}
