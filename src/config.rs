//! Command-line and environment configuration.
//!
//! Every flag has an environment fallback so the same binary runs unchanged
//! under a process manager or in a container:
//!
//! ```text
//! rolodex --addr 127.0.0.1:8080 --public-dir ./public
//! ROLODEX_ADDR=127.0.0.1:8080 rolodex
//! ```
//!
//! Log verbosity is controlled by `RUST_LOG` (default `info`).

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

#[derive(Clone, Debug, Parser)]
#[command(name = "rolodex", version, about = "Contact list web service")]
pub struct Config {
    /// Address to listen on.
    #[arg(long, env = "ROLODEX_ADDR", default_value = "0.0.0.0:9001")]
    pub addr: SocketAddr,

    /// Directory holding index.html and the browser script.
    #[arg(long, env = "ROLODEX_PUBLIC_DIR", default_value = "public")]
    pub public_dir: PathBuf,
}
