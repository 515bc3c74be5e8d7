use std::sync::Arc;

use fraserpay_retry::{run_with_retry, Notice, RetryConfig, RetryHooks, RetryOptions};
use serde_json::Value as JsonValue;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let url = std::env::var("FRASERPAY_BACKEND_URL")?;
    let api_key = std::env::var("FRASERPAY_API_KEY")?;
    let student_id = std::env::args().nth(1).unwrap_or_else(|| "s-1042".to_owned());

    let toast = Arc::new(|notice: Notice| eprintln!("[{:?}] {}", notice.level, notice.message));
    let config = RetryConfig::new()
        .with_options(RetryOptions::from_env()?)
        .with_hooks(RetryHooks::notifying(toast));

    let http = reqwest::Client::new();
    let endpoint = format!("{}/rest/v1/users?id=eq.{student_id}", url.trim_end_matches('/'));

    let user = run_with_retry(
        || {
            let request = http.get(&endpoint).header("apikey", &api_key);
            async move {
                request
                    .send()
                    .await?
                    .error_for_status()?
                    .json::<JsonValue>()
                    .await
            }
        },
        &config,
    )
    .await;

    match user {
        Some(user) => println!("{user:#}"),
        None => eprintln!("could not load student {student_id}"),
    }

    Ok(())
}
