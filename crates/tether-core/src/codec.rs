//! Async frame codec over the stream halves.

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use tether_proto::{Frame, FrameHeader, Message};

use crate::error::StreamError;

/// Writes one message as a frame and flushes it.
///
/// # Errors
///
/// Returns [`StreamError`] on encode failure or transport I/O failure.
pub async fn write_message<W: AsyncWrite + Unpin>(
    writer: &mut W,
    message: &Message,
) -> Result<(), StreamError> {
    let frame = Frame::from_message(message)?;
    let mut buf = Vec::with_capacity(FrameHeader::SIZE + frame.body().len());
    frame.encode(&mut buf);
    writer.write_all(&buf).await?;
    writer.flush().await?;
    Ok(())
}

/// Reads one complete frame and decodes its message.
///
/// Returns `Ok(None)` when the stream ends cleanly at a frame boundary —
/// that is stream completion, the graceful shutdown trigger. EOF anywhere
/// inside a frame is [`StreamError::Truncated`].
///
/// # Errors
///
/// Returns [`StreamError`] on transport failure, truncation, or a wire
/// format violation.
pub async fn read_message<R: AsyncRead + Unpin>(
    reader: &mut R,
) -> Result<Option<Message>, StreamError> {
    let mut header_buf = [0u8; FrameHeader::SIZE];
    let mut filled = 0;
    while filled < FrameHeader::SIZE {
        let n = reader.read(&mut header_buf[filled..]).await?;
        if n == 0 {
            if filled == 0 {
                return Ok(None);
            }
            return Err(StreamError::Truncated);
        }
        filled += n;
    }

    let header = *FrameHeader::from_bytes(&header_buf)?;
    let mut body = vec![0u8; header.body_len() as usize];
    reader.read_exact(&mut body).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::UnexpectedEof {
            StreamError::Truncated
        } else {
            StreamError::Io(e)
        }
    })?;

    let message = Frame::new(header, body)?.into_message()?;
    Ok(Some(message))
}
