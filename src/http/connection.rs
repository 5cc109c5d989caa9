use bytes::{Buf, BytesMut};
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::http::parser::{parse_http_request, ParseError};
use crate::http::request::Request;
use crate::http::response::Response;
use crate::http::writer::ResponseWriter;
use crate::server::state::AppState;

const READ_CHUNK: usize = 4096;

pub struct Connection<S> {
    stream: S,
    buffer: BytesMut,
    state: ConnectionState,
    app: Arc<AppState>,
}

pub enum ConnectionState {
    Reading,
    Processing(Request),
    Writing(ResponseWriter, bool), // bool = keep_alive?
    Closed,
}

enum Frame {
    Request(Request),
    Malformed(ParseError),
    Eof,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, app: Arc<AppState>) -> Self {
        Self {
            stream,
            buffer: BytesMut::with_capacity(READ_CHUNK),
            state: ConnectionState::Reading,
            app,
        }
    }

    /// Serves requests until the peer leaves or a response closes the connection.
    ///
    /// An `Err` means the request was abandoned without a response; the
    /// caller should drop the stream.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        loop {
            match &mut self.state {
                ConnectionState::Reading => {
                    self.state = match self.read_request().await? {
                        Frame::Request(req) => ConnectionState::Processing(req),
                        Frame::Malformed(e) => {
                            tracing::warn!(error = %e, "Malformed request, answering 400");
                            self.buffer.clear();
                            let writer = ResponseWriter::new(&Response::bad_request(), false);
                            ConnectionState::Writing(writer, false)
                        }
                        Frame::Eof => ConnectionState::Closed,
                    };
                }

                ConnectionState::Processing(req) => {
                    let (response, keep_alive) = match Self::handle_request(&self.app, req).await {
                        Ok(handled) => handled,
                        Err(e) => {
                            self.buffer.clear();
                            return Err(e);
                        }
                    };

                    let writer = ResponseWriter::new(&response, keep_alive);
                    self.state = ConnectionState::Writing(writer, keep_alive);
                }

                ConnectionState::Writing(writer, keep_alive) => {
                    writer.write_to_stream(&mut self.stream).await?;

                    if *keep_alive {
                        // Leftover bytes are the next pipelined request.
                        self.state = ConnectionState::Reading;
                    } else {
                        self.buffer.clear();
                        self.stream.shutdown().await?;
                        self.state = ConnectionState::Closed;
                    }
                }

                ConnectionState::Closed => {
                    break;
                }
            }
        }

        Ok(())
    }

    async fn read_request(&mut self) -> anyhow::Result<Frame> {
        loop {
            // Try parsing whatever we already have
            match parse_http_request(&self.buffer) {
                Ok((request, consumed)) => {
                    self.buffer.advance(consumed);
                    return Ok(Frame::Request(request));
                }

                Err(ParseError::Incomplete) => {
                    // Need more data → fall through to read
                }

                Err(e) => return Ok(Frame::Malformed(e)),
            }

            self.buffer.reserve(READ_CHUNK);
            let n = self.stream.read_buf(&mut self.buffer).await?;

            if n == 0 {
                if !self.buffer.is_empty() {
                    tracing::debug!(
                        pending = self.buffer.len(),
                        "Client closed with a partial request buffered"
                    );
                }
                return Ok(Frame::Eof);
            }
        }
    }

    async fn handle_request(app: &AppState, req: &Request) -> anyhow::Result<(Response, bool)> {
        let keep_alive = req.keep_alive();

        let response = match app.router.dispatch(req).await? {
            Some(response) => response,
            None => app.static_files.resolve(&req.path).await.into_response(),
        };

        tracing::info!(
            method = %req.method,
            path = %req.path,
            status = response.status.as_u16(),
            keep_alive,
            "Request served"
        );

        Ok((response, keep_alive))
    }
}
