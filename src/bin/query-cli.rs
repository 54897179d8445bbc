use clap::Parser;
use serde_json::Value;

use query_dispatch::http::{ErrorBody, ExecuteResponse};

#[derive(Parser)]
#[command(name = "query-cli")]
#[command(about = "Send a natural-language query to a query-dispatch server", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://127.0.0.1:8000")]
    url: String,

    /// Print the raw response body instead of decoding `arguments`.
    #[arg(long)]
    raw: bool,

    /// The query, e.g. "What is the status of ticket 83742?"
    #[arg(required = true, num_args = 1..)]
    query: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let query = cli.query.join(" ");
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/execute", cli.url.trim_end_matches('/')))
        .query(&[("q", query.as_str())])
        .send()
        .await?;

    let status = res.status();
    let text = res.text().await?;

    if !status.is_success() {
        let detail = serde_json::from_str::<ErrorBody>(&text)
            .map(|b| b.detail)
            .unwrap_or(text);
        eprintln!("Error: server returned status {}", status);
        eprintln!("Response: {}", detail);
        std::process::exit(1);
    }

    if cli.raw {
        println!("{}", text);
        return Ok(());
    }

    let response: ExecuteResponse = serde_json::from_str(&text)?;
    println!("{}", render(&response)?);
    Ok(())
}

/// Pretty-print a response with `arguments` decoded.
///
/// `serde_json` is built with `preserve_order` and `arbitrary_precision`, so
/// arguments keep their declaration order and integers print exactly.
fn render(response: &ExecuteResponse) -> Result<String, serde_json::Error> {
    let arguments: Value = serde_json::from_str(&response.arguments)?;
    let pretty = serde_json::json!({
        "name": response.name,
        "arguments": arguments,
    });
    serde_json::to_string_pretty(&pretty)
}
