//! # CLI — interactive shell over the storage engine
//!
//! A REPL-style command-line interface that exercises the engine directly.
//! Reads commands from stdin, executes them, and prints results to stdout.
//! This is an illustrative transport, not the RPC server the rest of the
//! system expects — it exists so the engine can be exercised without one.
//!
//! ## Commands
//!
//! ```text
//! SET key value              Insert or overwrite a key
//! GET key                    Look up a key (prints value or "(nil)")
//! GETPREFIX prefix [max]     Prefix scan, ascending order, 0 = unlimited
//! STAT                       Print the counters snapshot
//! EXIT / QUIT                Shut down
//! ```
//!
//! ## Configuration
//!
//! All settings come from the environment, via [`config::EngineConfig::from_env`]:
//!
//! ```text
//! KV_WAL_PATH          WAL file path              (default: "wal.log")
//! KV_STRIPE_COUNT       number of stripe locks     (default: 64)
//! KV_MAX_KEY_BYTES      reject Set beyond this     (default: 4096)
//! KV_MAX_VALUE_BYTES    reject Set beyond this     (default: 1048576)
//! KV_FSYNC_ON_APPEND    fsync every WAL append     (default: "true")
//! ```

use anyhow::Result;
use config::EngineConfig;
use engine::Engine;
use std::io::{self, BufRead, Write};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = EngineConfig::from_env();
    let engine = Engine::new(config.clone())?;

    println!(
        "store started (wal={}, stripes={}, keys={})",
        config.wal_path.display(),
        config.stripe_count,
        engine.stat().key_count,
    );
    println!("Commands: SET key value | GET key | GETPREFIX prefix [max] | STAT | EXIT");
    print!("> ");
    io::stdout().flush().ok();

    let stdin = io::stdin();

    for line in stdin.lock().lines() {
        let line = line?;
        let mut parts = line.split_whitespace();
        if let Some(cmd) = parts.next() {
            match cmd.to_uppercase().as_str() {
                "SET" => {
                    if let Some(k) = parts.next() {
                        let v: String = parts.collect::<Vec<&str>>().join(" ");
                        if v.is_empty() {
                            println!("ERR usage: SET key value");
                        } else {
                            match engine.set(k.as_bytes(), v.as_bytes()) {
                                Ok(()) => println!("OK"),
                                Err(e) => println!("ERR set failed: {e}"),
                            }
                        }
                    } else {
                        println!("ERR usage: SET key value");
                    }
                }
                "GET" => {
                    if let Some(k) = parts.next() {
                        match engine.get(k.as_bytes()) {
                            Ok(Some(v)) => println!("{}", String::from_utf8_lossy(&v)),
                            Ok(None) => println!("(nil)"),
                            Err(e) => println!("ERR get failed: {e}"),
                        }
                    } else {
                        println!("ERR usage: GET key");
                    }
                }
                "GETPREFIX" => {
                    let prefix = parts.next().unwrap_or("").as_bytes();
                    let max_results: usize =
                        parts.next().and_then(|s| s.parse().ok()).unwrap_or(0);
                    let results = engine.get_prefix(prefix, max_results);
                    if results.is_empty() {
                        println!("(empty)");
                    } else {
                        for (k, v) in &results {
                            println!(
                                "{} -> {}",
                                String::from_utf8_lossy(k),
                                String::from_utf8_lossy(v)
                            );
                        }
                        println!("({} entries)", results.len());
                    }
                }
                "STAT" => {
                    let stat = engine.stat();
                    println!(
                        "key_count={} server_start_time={} total_requests={} set_count={} get_count={} getprefix_count={}",
                        stat.key_count,
                        stat.server_start_time,
                        stat.total_requests,
                        stat.set_count,
                        stat.get_count,
                        stat.getprefix_count,
                    );
                }
                "EXIT" | "QUIT" => {
                    println!("bye");
                    break;
                }
                other => {
                    println!("unknown command: {other}");
                }
            }
        }

        print!("> ");
        io::stdout().flush().ok();
    }

    Ok(())
}
