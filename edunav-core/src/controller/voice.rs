//! Transcript input: any `Stream` of recognised phrases becomes a sequence of
//! `Action::Transcript` values on the action channel.

use std::path::PathBuf;

use futures::{Stream, StreamExt, stream};
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::controller::actions::Action;

/// Forward transcripts until the stream ends, the receiver is dropped, or
/// `cancel` fires. Blank transcripts are skipped.
pub fn spawn_transcript_forwarder<S>(
    transcripts: S,
    action_tx: UnboundedSender<Action>,
    cancel: CancellationToken,
) -> JoinHandle<usize>
where
    S: Stream<Item = String> + Send + 'static,
{
    tokio::spawn(async move {
        let mut transcripts = std::pin::pin!(transcripts);
        let mut forwarded = 0usize;

        loop {
            tokio::select! {
                () = cancel.cancelled() => {
                    debug!("Transcript forwarding cancelled");
                    break;
                }
                next = transcripts.next() => {
                    let Some(text) = next else {
                        debug!("Transcript source ended");
                        break;
                    };
                    if text.trim().is_empty() {
                        continue;
                    }
                    if action_tx.send(Action::Transcript(text)).is_err() {
                        break;
                    }
                    forwarded += 1;
                }
            }
        }

        forwarded
    })
}

/// Lines of `path`, read as they are written. A FIFO lets an external
/// speech-to-text tool feed the browser.
pub async fn line_transcripts(
    path: PathBuf,
) -> std::io::Result<impl Stream<Item = String> + Send + 'static> {
    let file = File::open(&path).await?;
    info!("Reading keyword transcripts from {}", path.display());
    let lines = BufReader::new(file).lines();

    Ok(stream::unfold(lines, |mut lines| async move {
        match lines.next_line().await {
            Ok(Some(line)) => Some((line, lines)),
            Ok(None) => None,
            Err(e) => {
                warn!("Transcript source read failed: {e}");
                None
            }
        }
    }))
}
