//! File-backed message source.
//!
//! Follows a text file that another process appends records to, one record
//! per line, and submits each complete line to the service.

use std::io::SeekFrom;
use std::path::Path;
use std::time::Duration;

use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, AsyncSeekExt, BufReader};
use tokio::time::sleep;

use crate::service::ServiceHandle;

/// Tail `path`, starting at the end unless `from_start` is set.
///
/// A line without its terminating newline is held back until the writer
/// finishes it. If the file shrinks (truncated or rotated in place) reading
/// restarts from the top. Bytes that are not valid UTF-8 are replaced
/// rather than ending the tail. Returns when the service closes.
pub async fn tail_file<P: AsRef<Path>>(
    path: P,
    from_start: bool,
    poll_interval: Duration,
    handle: ServiceHandle,
) -> std::io::Result<()> {
    let path = path.as_ref();
    let origin = path.display().to_string();
    let file = File::open(path).await?;
    let mut reader = BufReader::new(file);

    let mut position = if from_start {
        0
    } else {
        reader.seek(SeekFrom::End(0)).await?
    };
    tracing::info!(path = %origin, position, "Tailing message file");

    let mut line = Vec::new();
    loop {
        match reader.read_until(b'\n', &mut line).await {
            Ok(0) => {
                sleep(poll_interval).await;
                let len = tokio::fs::metadata(path).await?.len();
                if len < position {
                    tracing::warn!(path = %origin, len, position, "File shrank, restarting from the top");
                    position = reader.seek(SeekFrom::Start(0)).await?;
                    line.clear();
                }
            }
            Ok(read) => {
                position += read as u64;
                if line.last() != Some(&b'\n') {
                    // Partial line; keep it and wait for the rest.
                    continue;
                }
                let text = String::from_utf8_lossy(&line);
                if let std::borrow::Cow::Owned(_) = text {
                    tracing::warn!(path = %origin, "Line is not valid UTF-8, decoding lossily");
                }
                let record = text.trim_end_matches(['\r', '\n']);
                if !record.trim().is_empty()
                    && handle.submit(record, &origin).await.is_err()
                {
                    tracing::debug!(path = %origin, "Service closed, stopping tail");
                    return Ok(());
                }
                line.clear();
            }
            Err(e) => {
                tracing::error!(path = %origin, error = %e, "Error reading message file");
                return Err(e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::ServiceCommand;
    use tokio::io::AsyncWriteExt;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn test_tail_submits_complete_lines() {
        let dir = std::env::temp_dir().join(format!("suitcast-tail-{}", std::process::id()));
        tokio::fs::create_dir_all(&dir).await.unwrap();
        let path = dir.join("feed.log");
        tokio::fs::write(&path, "#N1. ✅(a)(b)\n").await.unwrap();

        let (cmd_tx, mut cmd_rx) = mpsc::channel(8);
        let handle = ServiceHandle { cmd_tx };
        let task = tokio::spawn(tail_file(path.clone(), true, Duration::from_millis(5), handle));

        let mut file = tokio::fs::OpenOptions::new()
            .append(true)
            .open(&path)
            .await
            .unwrap();
        file.write_all(b"#N2. ").await.unwrap();
        file.flush().await.unwrap();
        sleep(Duration::from_millis(30)).await;
        file.write_all("✅(c)(d)\n".as_bytes()).await.unwrap();
        file.flush().await.unwrap();

        let mut texts = Vec::new();
        while texts.len() < 2 {
            match cmd_rx.recv().await {
                Some(ServiceCommand::Message { text, .. }) => texts.push(text),
                Some(_) => {}
                None => break,
            }
        }
        assert_eq!(texts, vec!["#N1. ✅(a)(b)", "#N2. ✅(c)(d)"]);

        drop(cmd_rx);
        task.abort();
        tokio::fs::remove_dir_all(&dir).await.ok();
    }

    #[tokio::test]
    async fn test_tail_survives_invalid_utf8() {
        let dir = std::env::temp_dir().join(format!("suitcast-utf8-{}", std::process::id()));
        tokio::fs::create_dir_all(&dir).await.unwrap();
        let path = dir.join("feed.log");
        let mut bytes = b"#N1. \xff\xfe bad\n".to_vec();
        bytes.extend_from_slice("#N2. ✅(c)(d)\n".as_bytes());
        tokio::fs::write(&path, bytes).await.unwrap();

        let (cmd_tx, mut cmd_rx) = mpsc::channel(8);
        let handle = ServiceHandle { cmd_tx };
        let task = tokio::spawn(tail_file(path.clone(), true, Duration::from_millis(5), handle));

        let mut texts = Vec::new();
        while texts.len() < 2 {
            match cmd_rx.recv().await {
                Some(ServiceCommand::Message { text, .. }) => texts.push(text),
                Some(_) => {}
                None => break,
            }
        }
        assert_eq!(texts, vec!["#N1. \u{FFFD}\u{FFFD} bad", "#N2. ✅(c)(d)"]);
        assert!(!task.is_finished());

        drop(cmd_rx);
        task.abort();
        tokio::fs::remove_dir_all(&dir).await.ok();
    }
}
