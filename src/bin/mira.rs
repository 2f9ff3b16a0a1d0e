// Operator CLI entry point: query/stats/gc/export/backup against the
// memory store, reusing the router's own handler functions.

use clap::Parser;
use mira_memory::cli::CliArgs;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = CliArgs::parse();
    let exit_code = mira_memory::cli::run(args).await;
    std::process::exit(exit_code);
}
