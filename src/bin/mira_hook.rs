// Hook entry point: one short-lived process per hook invocation.
//
// Reads the hook event JSON from stdin, dispatches it against the memory
// store, and writes exactly one JSON response line to stdout — the
// never-block contract (spec §4.7, §7) that the host integration depends on.
// A panic anywhere inside dispatch is caught here rather than letting the
// process die without producing output.

use mira_memory::{config, logging, router};
use std::io::Read;

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = args.first().cloned().unwrap_or_default();
    let rest = if args.len() > 1 { args[1..].to_vec() } else { Vec::new() };

    // Always drain stdin first (spec §4.7 step 1), even on the sub-agent
    // bypass below — the host may be mid-write on a full pipe, and exiting
    // without reading would stall it.
    let mut raw = String::new();
    let _ = std::io::stdin().read_to_string(&mut raw);

    // Sub-agent processes share the parent's memory and must not double
    // record or inject context, but still owe the host a valid response.
    if std::env::var("CLAUDE_AGENT_IS_SUBAGENT").as_deref() == Ok("1") {
        println!("{}", router::HookResponse::neutral().to_json_line());
        return;
    }

    let cfg = config::Config::load();
    let _guard = logging::init(&cfg.logging);

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(_) => {
            println!("{}", router::HookResponse::neutral().to_json_line());
            return;
        }
    };

    let db_path = config::default_db_path();
    let event = router::HookEvent::parse(&raw);

    let response = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        runtime.block_on(router::dispatch(&command, &rest, event, &db_path))
    }))
    .unwrap_or_else(|_| {
        tracing::error!("panicked while dispatching hook command");
        router::HookResponse::neutral()
    });

    println!("{}", response.to_json_line());
}
