//! Scripted sessions: one host event per stdin line.

use anyhow::Context;
use sunclock_relay::{HostEvent, Relay};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};

/// Feeds each JSON line from `input` to `relay`, waiting for the resulting
/// pipelines before reading the next one. Blank lines and `#` comments are
/// skipped.
///
/// # Errors
///
/// Returns an error if `input` cannot be read or a line is not a host event.
pub(crate) async fn run_replay<R>(relay: &Relay, input: R) -> anyhow::Result<()>
where
    R: AsyncRead + Unpin,
{
    let mut lines = BufReader::new(input).lines();
    let mut line_no = 0_usize;
    while let Some(line) = lines.next_line().await.context("failed to read replay input")? {
        line_no += 1;
        let Some(event) = parse_line(&line).with_context(|| format!("replay line {line_no}"))?
        else {
            continue;
        };
        tracing::debug!(line = line_no, ?event, "replaying event");
        relay.handle(event);
        relay.settle().await;
    }
    tracing::info!(lines = line_no, "replay finished");
    Ok(())
}

pub(crate) fn parse_line(line: &str) -> anyhow::Result<Option<HostEvent>> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }
    let event = serde_json::from_str(trimmed).context("not a host event")?;
    Ok(Some(event))
}
