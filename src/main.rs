use request_client::{config::load_settings, Headers, RequestClient};

use std::process;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let settings = load_settings()?;
    let client = RequestClient::from_settings(&settings)?;

    let endpoint = std::env::args().nth(1).unwrap_or_else(|| "/".to_string());

    match client.get(&endpoint, &Headers::new()).await {
        Ok(Some(body)) => println!("{}", serde_json::to_string_pretty(&body)?),
        Ok(None) => {}
        Err(e) => {
            eprintln!("Request failed: {}", e);
            process::exit(1);
        }
    }

    Ok(())
}
