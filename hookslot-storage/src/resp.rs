//! RESP (Redis wire protocol) remote backend.
//!
//! A deliberately small client: each call opens a fresh TCP connection,
//! issues one `GET` or `SET` as a RESP array of bulk strings, reads the
//! single reply, and drops the connection. The store serializes calls per
//! key anyway, so there is nothing to gain from pooling here.
//!
//! Failure classification follows the seam contract: anything
//! connection-level (connect, read, write, truncated reply) is
//! `Unreachable`; a well-delivered but unparseable or error reply is
//! `Protocol`.

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;

use hookslot_core::{RemoteError, StorageKey};

use crate::remote::{RemoteBackend, RemoteRead};

/// Remote backend speaking RESP to a Redis-compatible server.
#[derive(Debug, Clone)]
pub struct RespRemote {
    addr: String,
}

impl RespRemote {
    /// Create a backend for a `host:port` address.
    pub fn new(addr: impl Into<String>) -> Self {
        Self { addr: addr.into() }
    }

    /// The configured `host:port` address.
    pub fn addr(&self) -> &str {
        &self.addr
    }

    async fn connect(&self) -> Result<TcpStream, RemoteError> {
        TcpStream::connect(&self.addr)
            .await
            .map_err(|err| self.unreachable(err))
    }

    fn unreachable(&self, err: std::io::Error) -> RemoteError {
        RemoteError::Unreachable {
            endpoint: self.addr.clone(),
            reason: err.to_string(),
        }
    }

    fn protocol(reason: impl Into<String>) -> RemoteError {
        RemoteError::Protocol {
            reason: reason.into(),
        }
    }

    /// Send one encoded command and return the first reply line, CRLF
    /// stripped, along with the reader for any bulk payload that follows.
    async fn roundtrip(
        &self,
        command: Vec<u8>,
    ) -> Result<(String, BufReader<TcpStream>), RemoteError> {
        let mut stream = self.connect().await?;
        stream
            .write_all(&command)
            .await
            .map_err(|err| self.unreachable(err))?;

        let mut reader = BufReader::new(stream);
        let mut line = String::new();
        let read = reader
            .read_line(&mut line)
            .await
            .map_err(|err| self.unreachable(err))?;
        if read == 0 {
            return Err(self.unreachable(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "connection closed before reply",
            )));
        }
        while line.ends_with('\n') || line.ends_with('\r') {
            line.pop();
        }
        Ok((line, reader))
    }
}

#[async_trait]
impl RemoteBackend for RespRemote {
    async fn get_raw(&self, key: &StorageKey) -> Result<RemoteRead, RemoteError> {
        let command = encode_command(&[b"GET", key.as_str().as_bytes()]);
        let (line, mut reader) = self.roundtrip(command).await?;

        match line.as_bytes().first() {
            Some(b'$') => {
                let len: i64 = line[1..]
                    .parse()
                    .map_err(|_| Self::protocol(format!("bad bulk length in reply: {line}")))?;
                if len < 0 {
                    return Ok(RemoteRead::Absent);
                }
                // Bulk payload is followed by a trailing CRLF.
                let mut payload = vec![0u8; len as usize + 2];
                reader
                    .read_exact(&mut payload)
                    .await
                    .map_err(|err| self.unreachable(err))?;
                payload.truncate(len as usize);
                Ok(RemoteRead::Value(payload))
            }
            Some(b'-') => Err(Self::protocol(line[1..].to_string())),
            _ => Err(Self::protocol(format!("unexpected GET reply: {line}"))),
        }
    }

    async fn set_raw(&self, key: &StorageKey, payload: &[u8]) -> Result<(), RemoteError> {
        let command = encode_command(&[b"SET", key.as_str().as_bytes(), payload]);
        let (line, _reader) = self.roundtrip(command).await?;

        match line.as_bytes().first() {
            Some(b'+') => Ok(()),
            Some(b'-') => Err(Self::protocol(line[1..].to_string())),
            _ => Err(Self::protocol(format!("unexpected SET reply: {line}"))),
        }
    }
}

/// Encode a command as a RESP array of bulk strings:
/// `*<argc>\r\n` then `$<len>\r\n<arg>\r\n` per argument.
fn encode_command(args: &[&[u8]]) -> Vec<u8> {
    let payload_len: usize = args.iter().map(|arg| arg.len() + 16).sum();
    let mut buf = Vec::with_capacity(payload_len);
    buf.push(b'*');
    buf.extend_from_slice(args.len().to_string().as_bytes());
    buf.extend_from_slice(b"\r\n");
    for arg in args {
        buf.push(b'$');
        buf.extend_from_slice(arg.len().to_string().as_bytes());
        buf.extend_from_slice(b"\r\n");
        buf.extend_from_slice(arg);
        buf.extend_from_slice(b"\r\n");
    }
    buf
}
