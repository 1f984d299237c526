// SPDX-License-Identifier: BUSL-1.1

//! `eve-cli status` — poll a running node's `/status` endpoint.
//!
//! Grounded on the teacher's `coop peek` CLI: a thin `reqwest` client
//! against a URL taken from an env var, pretty-printing JSON on success.

/// CLI arguments for `eve-cli status`.
#[derive(Debug, clap::Args)]
pub struct StatusArgs {
    /// Base URL of a running node's status endpoint.
    #[arg(long, default_value = "http://127.0.0.1:4145", env = "EVE_NODE_URL")]
    pub node_url: String,
}

pub async fn run(args: &StatusArgs) -> i32 {
    let url = format!("{}/status", args.node_url.trim_end_matches('/'));
    let client = reqwest::Client::builder().timeout(std::time::Duration::from_secs(10)).build().unwrap_or_default();

    let resp = match client.get(&url).send().await {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            return 1;
        }
    };

    let status = resp.status();
    let text = resp.text().await.unwrap_or_default();

    if !status.is_success() {
        eprintln!("error ({status}): {text}");
        return 1;
    }

    match serde_json::from_str::<serde_json::Value>(&text) {
        Ok(value) => {
            match serde_json::to_string_pretty(&value) {
                Ok(pretty) => println!("{pretty}"),
                Err(_) => println!("{text}"),
            }
            0
        }
        Err(_) => {
            println!("{text}");
            0
        }
    }
}
