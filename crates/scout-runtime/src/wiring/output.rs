//! Discovery output: every distinct new name, one per line.

use shared_types::{Request, StringFilter};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::{mpsc, watch};

/// Write distinct names from `names` to `out` until shutdown is signalled.
///
/// Names already queued when the signal arrives are still written. Returns
/// the number of lines written.
pub async fn write_names<W>(
    mut names: mpsc::UnboundedReceiver<Request>,
    mut shutdown: watch::Receiver<bool>,
    mut out: W,
) -> std::io::Result<u64>
where
    W: AsyncWrite + Unpin,
{
    let printed = StringFilter::new();
    let mut written = 0;

    loop {
        tokio::select! {
            next = names.recv() => match next {
                Some(req) => written += write_one(&mut out, &printed, &req).await?,
                None => break,
            },
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    while let Ok(req) = names.try_recv() {
                        written += write_one(&mut out, &printed, &req).await?;
                    }
                    break;
                }
            }
        }
    }

    out.flush().await?;
    Ok(written)
}

async fn write_one<W>(out: &mut W, printed: &StringFilter, req: &Request) -> std::io::Result<u64>
where
    W: AsyncWrite + Unpin,
{
    if printed.duplicate(&req.name) {
        return Ok(0);
    }
    out.write_all(req.name.as_bytes()).await?;
    out.write_all(b"\n").await?;
    Ok(1)
}
