// Tool server entry point (spec §4.8): a long-lived process that reads one
// JSON request per line from stdin and writes one JSON response per line to
// stdout until stdin closes.

use mira_memory::toolserver::{handle_line, AmbientContext};
use mira_memory::{config, logging};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cfg = config::Config::load();
    let _guard = logging::init(&cfg.logging);

    let store = match mira_memory::store::Store::open(&config::default_db_path()).await {
        Ok(store) => store,
        Err(err) => {
            tracing::error!(error = %err, "tool server could not open memory store");
            return;
        }
    };

    let ctx = AmbientContext::from_env();

    let stdin = tokio::io::stdin();
    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(stdin).lines();

    while let Ok(Some(line)) = lines.next_line().await {
        if line.trim().is_empty() {
            continue;
        }
        let response = handle_line(&store, &ctx, &line).await;
        if stdout.write_all(response.as_bytes()).await.is_err() {
            break;
        }
        if stdout.write_all(b"\n").await.is_err() {
            break;
        }
        if stdout.flush().await.is_err() {
            break;
        }
    }

    store.close().await;
}
