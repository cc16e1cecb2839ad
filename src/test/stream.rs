use std::{
    collections::VecDeque,
    io::{Error, ErrorKind, Result},
    pin::Pin,
    task::{Context, Poll},
};

use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};

use super::journal::{Event, Journal};

/// In-memory serial stream. Writes are journaled; reads drain a fixed input
/// and then report end of stream.
#[derive(Debug, Default)]
pub struct JournalStream {
    input: VecDeque<u8>,
    fail_writes: bool,
    journal: Journal,
}

impl JournalStream {
    pub fn with_input(input: &[u8]) -> JournalStream {
        JournalStream {
            input: input.iter().copied().collect(),
            ..Default::default()
        }
    }

    pub fn failing_writes() -> JournalStream {
        JournalStream {
            fail_writes: true,
            ..Default::default()
        }
    }

    pub fn journal(&self) -> Journal {
        self.journal.clone()
    }
}

impl AsyncRead for JournalStream {
    fn poll_read(
        mut self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<Result<()>> {
        while buf.remaining() > 0 {
            match self.input.pop_front() {
                Some(byte) => buf.put_slice(&[byte]),
                None => break,
            }
        }
        Poll::Ready(Ok(()))
    }
}

impl AsyncWrite for JournalStream {
    fn poll_write(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<Result<usize>> {
        if self.fail_writes {
            return Poll::Ready(Err(Error::new(ErrorKind::BrokenPipe, "line unplugged")));
        }
        self.journal.record(Event::Wrote(buf.to_vec()));
        Poll::Ready(Ok(buf.len()))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Result<()>> {
        self.journal.record(Event::Flushed);
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Result<()>> {
        Poll::Ready(Ok(()))
    }
}
