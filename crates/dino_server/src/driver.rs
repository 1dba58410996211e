//! JSON-lines request loop.
//!
//! Reads one [`Request`] per line and writes one [`Response`] per line, in
//! order. A malformed line is answered with an error and the loop goes on.

use dino_core::store::BattleStore;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::protocol::{Request, Response};
use crate::service::BattleService;

/// Serve requests from `reader` until end of input.
///
/// # Errors
///
/// Returns an error if reading input or writing output fails.
pub async fn run_lines<S, R, W>(
    service: &BattleService<S>,
    reader: R,
    mut writer: W,
) -> std::io::Result<()>
where
    S: BattleStore,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    write_response(&mut writer, &Response::ready()).await?;

    let (mut handled, mut failed) = (0_u64, 0_u64);
    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let response = match serde_json::from_str::<Request>(line) {
            Ok(request) => service.handle(request).await,
            Err(e) => {
                tracing::warn!(error = %e, "Malformed request line");
                Response::malformed(e.to_string())
            }
        };
        handled += 1;
        if response.is_error() {
            failed += 1;
        }
        write_response(&mut writer, &response).await?;
    }
    tracing::info!(handled, failed, "Input closed, stopping");
    Ok(())
}

async fn write_response<W: AsyncWrite + Unpin>(
    writer: &mut W,
    response: &Response,
) -> std::io::Result<()> {
    let mut line = serde_json::to_string(response)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    line.push('\n');
    writer.write_all(line.as_bytes()).await?;
    writer.flush().await
}
