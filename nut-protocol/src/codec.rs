//! Command send and reply receive primitives
//!
//! These work against any [`StreamAccessor`]; they own no connection state.

use crate::list::ListKind;
use crate::reply::decode_line;
use nut_core::{Command, NutError, NutResult};
use nut_transport::StreamAccessor;
use std::time::Duration;

/// Default upper bound for an accumulated list reply
pub const DEFAULT_MAX_LIST_BYTES: usize = 1024 * 1024;

/// Encode and write a command, then flush
pub async fn send<S>(stream: &mut S, command: &Command) -> NutResult<()>
where
    S: StreamAccessor + ?Sized,
{
    let encoded = command.encode()?;
    log::trace!(target: "nut_protocol", "-> {}", command);
    stream.write_all(&encoded).await?;
    stream.flush().await
}

/// Read and decode a single-line reply
///
/// See [`decode_line`] for the error mapping.
pub async fn read_simple<S>(
    stream: &mut S,
    command: &Command,
    expected_prefix: Option<&str>,
) -> NutResult<String>
where
    S: StreamAccessor + ?Sized,
{
    let raw = stream.read_line().await?;
    let line = decode_line(command, &raw, expected_prefix)?;
    log::trace!(target: "nut_protocol", "<- {}", line);
    Ok(line)
}

/// Send a command and read its single-line reply
pub async fn request_simple<S>(
    stream: &mut S,
    command: &Command,
    expected_prefix: Option<&str>,
) -> NutResult<String>
where
    S: StreamAccessor + ?Sized,
{
    send(stream, command).await?;
    read_simple(stream, command, expected_prefix).await
}

/// Read a complete list reply
///
/// The header must start with `BEGIN LIST <kind>`; lines are then collected
/// until the accumulated bytes end with `END LIST <kind>\n`.
///
/// # Returns
/// The whole reply text, header and sentinel included
///
/// # Errors
/// - Anything [`read_simple`] returns for the header line
/// - `ConnectionClosed` if the stream ends before the sentinel
/// - `InvalidData` if the reply grows beyond `max_bytes` or is not UTF-8
/// - `Timeout` if the whole list is not received within `timeout`
pub async fn read_list<S>(
    stream: &mut S,
    command: &Command,
    kind: &ListKind,
    timeout: Option<Duration>,
    max_bytes: usize,
) -> NutResult<String>
where
    S: StreamAccessor + ?Sized,
{
    let header = read_simple(stream, command, Some(&kind.begin_line())).await?;
    let sentinel = kind.end_sentinel();

    let collect = async {
        let mut body = Vec::with_capacity(header.len() + sentinel.len() + 1);
        body.extend_from_slice(header.as_bytes());
        body.push(b'\n');

        loop {
            let line = stream.read_line().await?;
            if line.is_empty() {
                return Err(NutError::ConnectionClosed(format!(
                    "server closed the connection before the end of the reply to {}",
                    command
                )));
            }
            body.extend_from_slice(&line);
            if body.ends_with(sentinel.as_bytes()) {
                break;
            }
            if body.len() > max_bytes {
                return Err(NutError::InvalidData(format!(
                    "reply to {} exceeds {} bytes",
                    command, max_bytes
                )));
            }
        }

        String::from_utf8(body).map_err(|e| {
            NutError::InvalidData(format!("reply to {} is not UTF-8: {}", command, e))
        })
    };

    match timeout {
        Some(timeout) => tokio::time::timeout(timeout, collect).await.map_err(|_| {
            NutError::Timeout(format!(
                "reply to {} not completed within {:?}",
                command, timeout
            ))
        })?,
        None => collect.await,
    }
}

/// Send a command and read its list reply
pub async fn request_list<S>(
    stream: &mut S,
    command: &Command,
    kind: &ListKind,
    timeout: Option<Duration>,
    max_bytes: usize,
) -> NutResult<String>
where
    S: StreamAccessor + ?Sized,
{
    send(stream, command).await?;
    read_list(stream, command, kind, timeout, max_bytes).await
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use mockall::mock;
    use nut_core::ErrorKind;
    use nut_transport::LineStream;
    use std::collections::VecDeque;
    use tokio::io::AsyncWriteExt;

    mock! {
        pub Stream {}

        #[async_trait]
        impl StreamAccessor for Stream {
            async fn set_timeout(&mut self, timeout: Option<Duration>) -> NutResult<()>;
            async fn read_line(&mut self) -> NutResult<Vec<u8>>;
            async fn write_all(&mut self, buf: &[u8]) -> NutResult<()>;
            async fn flush(&mut self) -> NutResult<()>;
            fn is_closed(&self) -> bool;
            async fn close(&mut self) -> NutResult<()>;
        }
    }

    /// Mock stream that expects `request` and answers with `reply`, one line per read
    pub(crate) fn scripted(request: &'static [u8], reply: &[&str]) -> MockStream {
        let mut lines: VecDeque<Vec<u8>> = reply.iter().map(|l| l.as_bytes().to_vec()).collect();
        let mut stream = MockStream::new();
        stream
            .expect_write_all()
            .withf(move |buf| buf.to_vec() == request)
            .times(1)
            .returning(|_| Ok(()));
        stream.expect_flush().returning(|| Ok(()));
        stream
            .expect_read_line()
            .returning(move || Ok(lines.pop_front().unwrap_or_default()));
        stream
    }

    #[tokio::test]
    async fn test_request_simple() {
        let mut stream = scripted(b"INSTCMD test valid\n", &["OK\n"]);
        let command = Command::instant_command("test", "valid", None);
        let reply = request_simple(&mut stream, &command, None).await.unwrap();
        assert_eq!(reply, "OK");
    }

    #[tokio::test]
    async fn test_send_rejects_bad_input_before_writing() {
        let mut stream = MockStream::new();
        stream.expect_write_all().never();
        let command = Command::list_vars("bad\nname");
        let err = send(&mut stream, &command).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Value);
    }

    #[tokio::test]
    async fn test_request_list() {
        let mut stream = scripted(
            b"LIST UPS\n",
            &["BEGIN LIST UPS\n", "UPS test \"bob\"\n", "END LIST UPS\n"],
        );
        let body = request_list(
            &mut stream,
            &Command::list_ups(),
            &ListKind::Ups,
            Some(Duration::from_secs(1)),
            DEFAULT_MAX_LIST_BYTES,
        )
        .await
        .unwrap();
        assert_eq!(body, "BEGIN LIST UPS\nUPS test \"bob\"\nEND LIST UPS\n");
    }

    #[tokio::test]
    async fn test_list_wrong_header() {
        let mut stream = scripted(b"LIST VAR test\n", &["BEGIN LIST UPS\n"]);
        let err = request_list(
            &mut stream,
            &Command::list_vars("test"),
            &ListKind::Var("test".into()),
            None,
            DEFAULT_MAX_LIST_BYTES,
        )
        .await
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Protocol);
    }

    #[tokio::test]
    async fn test_list_access_denied() {
        let mut stream = scripted(b"LIST UPS\n", &["ERR ACCESS-DENIED\n"]);
        let err = request_list(
            &mut stream,
            &Command::list_ups(),
            &ListKind::Ups,
            None,
            DEFAULT_MAX_LIST_BYTES,
        )
        .await
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Login);
        assert!(err.to_string().contains("LIST UPS"));
    }

    #[tokio::test]
    async fn test_list_closed_before_sentinel() {
        let mut stream = scripted(b"LIST UPS\n", &["BEGIN LIST UPS\n", "UPS test \"bob\"\n"]);
        let err = request_list(
            &mut stream,
            &Command::list_ups(),
            &ListKind::Ups,
            None,
            DEFAULT_MAX_LIST_BYTES,
        )
        .await
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConnectionClosed);
    }

    #[tokio::test]
    async fn test_list_too_large() {
        let mut stream = scripted(
            b"LIST UPS\n",
            &["BEGIN LIST UPS\n", "UPS a \"aaaaaaaaaaaaaaaa\"\n", "UPS b \"b\"\n", "END LIST UPS\n"],
        );
        let err = request_list(&mut stream, &Command::list_ups(), &ListKind::Ups, None, 24)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Value);
    }

    #[tokio::test]
    async fn test_list_without_sentinel_times_out() {
        let (client, mut server) = tokio::io::duplex(256);
        // no per-read timeout: only the bound on the whole list applies
        let mut stream = LineStream::new(client, None);
        server
            .write_all(b"BEGIN LIST VAR test\nVAR test x.y \"z\"\n")
            .await
            .unwrap();

        let err = read_list(
            &mut stream,
            &Command::list_vars("test"),
            &ListKind::Var("test".into()),
            Some(Duration::from_millis(50)),
            DEFAULT_MAX_LIST_BYTES,
        )
        .await
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Timeout);
        assert!(err.to_string().contains("LIST VAR test"));
        drop(server);
    }
}
