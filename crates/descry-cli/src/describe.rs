//! One-shot describe command.

use std::time::Duration;

use anyhow::Context;

use descry_genai::{FileStoreClient, GenerativeClient, PollPolicy};
use descry_types::MediaKind;

/// Upload the fixed file for `kind`, wait for readiness, and print the
/// model's description to stdout.
pub async fn run_describe(kind: MediaKind) -> anyhow::Result<()> {
    let config = descry_config::load_config().context("failed to load configuration")?;
    let api_key = descry_config::api_key().context("missing remote service credential")?;
    let genai = &config.genai;

    let store = FileStoreClient::new(&genai.base_url, &api_key).with_poll_policy(PollPolicy {
        interval: Duration::from_secs(genai.poll_interval_secs),
        max_checks: genai.max_poll_checks,
    });
    let model = GenerativeClient::new(&genai.base_url, &api_key, &genai.model);

    let path = genai.media_dir.join(kind.file_name());
    let file = store
        .await_ready(kind, &path)
        .await
        .with_context(|| format!("{kind} upload failed"))?;
    let text = model
        .describe_file(kind.prompt(), &file.uri, &file.mime_type)
        .await
        .context("description request failed")?;

    println!("{text}");
    Ok(())
}
