/* Licensed to the Apache Software Foundation (ASF) under one
 * or more contributor license agreements.  See the NOTICE file
 * distributed with this work for additional information
 * regarding copyright ownership.  The ASF licenses this file
 * to you under the Apache License, Version 2.0 (the
 * "License"); you may not use this file except in compliance
 * with the License.  You may obtain a copy of the License at
 *
 *   http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing,
 * software distributed under the License is distributed on an
 * "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
 * KIND, either express or implied.  See the License for the
 * specific language governing permissions and limitations
 * under the License.
 */

use crate::deadline::Deadline;
use crate::error::{WirelineError, os_error_code};
use crate::socket::{Socket, SocketOption};
use crate::stream::{Stream, StreamKind};
use std::io::{self, ErrorKind, IoSlice, IoSliceMut};
use tracing::error;

/// Stream over a connected socket. Owns the socket exclusively and
/// closes it when dropped.
#[derive(Debug)]
pub struct SocketStream<S: Socket> {
    socket: Option<S>,
}

impl<S: Socket> SocketStream<S> {
    /// Creates a stream by taking ownership of an already connected
    /// socket. Connection establishment belongs to the layers above.
    pub fn new(socket: S) -> Self {
        Self {
            socket: Some(socket),
        }
    }

    /// Releases the underlying socket to the caller, leaving the
    /// stream permanently without a channel.
    pub fn take_socket(&mut self) -> Option<S> {
        self.socket.take()
    }
}

impl<S: Socket> Stream for SocketStream<S> {
    fn kind(&self) -> StreamKind {
        StreamKind::Tcp
    }

    fn close(&mut self) -> Result<(), WirelineError> {
        let Some(socket) = self.socket.as_mut() else {
            return Ok(());
        };
        socket
            .close()
            .map_err(|error| WirelineError::CannotCloseSocket(os_error_code(&error)))
    }

    fn flush(&mut self) -> Result<(), WirelineError> {
        // This transport is unbuffered.
        Ok(())
    }

    fn readv(
        &mut self,
        segments: &mut [IoSliceMut<'_>],
        min_bytes: usize,
        timeout_ms: i32,
    ) -> Result<usize, WirelineError> {
        let socket = self.socket.as_mut().ok_or(WirelineError::NotConnected)?;

        // One deadline for the whole call: every receive below shares
        // it, so the total latency is bounded by the original timeout
        // no matter how many partial receives occur.
        let deadline = Deadline::from_timeout_ms(timeout_ms);
        let mut cur = 0;
        let mut offset = 0;
        let mut total = 0;

        while cur < segments.len() {
            if segments[cur].is_empty() {
                cur += 1;
                continue;
            }

            let received = match socket.receive(&mut segments[cur][offset..], deadline) {
                Ok(0) => {
                    if total >= min_bytes {
                        return Ok(total);
                    }
                    return Err(WirelineError::ConnectionClosed);
                }
                Ok(received) => received,
                Err(error) => {
                    if total >= min_bytes {
                        return Ok(total);
                    }
                    error!("Failed to receive data from the socket: {error}");
                    return Err(receive_error(error));
                }
            };

            total += received;

            // Advance across every segment the received count fully
            // consumes. Today's receive primitive fills one segment
            // per call, but a future one may span segment boundaries.
            let mut leftover = received;
            while cur < segments.len() && offset + leftover >= segments[cur].len() {
                leftover -= segments[cur].len() - offset;
                offset = 0;
                cur += 1;
            }

            if cur == segments.len() {
                break;
            }

            if total >= min_bytes {
                break;
            }

            offset += leftover;
        }

        Ok(total)
    }

    fn writev(
        &mut self,
        segments: &[IoSlice<'_>],
        timeout_ms: i32,
    ) -> Result<usize, WirelineError> {
        let Some(socket) = self.socket.as_mut() else {
            return Err(WirelineError::NotConnected);
        };
        let deadline = Deadline::from_timeout_ms(timeout_ms);
        // The socket's vectored send loops over partial sends itself;
        // the whole vector goes down in a single call.
        socket.send_vectored(segments, deadline).map_err(|error| {
            error!("Failed to send data over the socket: {error}");
            send_error(error)
        })
    }

    fn set_option(&mut self, option: SocketOption) -> Result<(), WirelineError> {
        let socket = self.socket.as_mut().ok_or(WirelineError::NotConnected)?;
        socket
            .set_option(option)
            .map_err(|error| WirelineError::CannotSetSocketOption(os_error_code(&error)))
    }

    fn check_closed(&mut self) -> bool {
        match self.socket.as_mut() {
            Some(socket) => socket.is_closed(),
            None => true,
        }
    }
}

impl<S: Socket> Drop for SocketStream<S> {
    fn drop(&mut self) {
        if let Some(socket) = self.socket.as_mut() {
            let _ = socket.close();
        }
    }
}

fn receive_error(error: io::Error) -> WirelineError {
    match error.kind() {
        ErrorKind::WouldBlock | ErrorKind::TimedOut => WirelineError::Timeout,
        ErrorKind::ConnectionReset | ErrorKind::ConnectionAborted | ErrorKind::UnexpectedEof => {
            WirelineError::ConnectionClosed
        }
        _ => WirelineError::SocketReceiveFailed(os_error_code(&error)),
    }
}

fn send_error(error: io::Error) -> WirelineError {
    match error.kind() {
        ErrorKind::WouldBlock | ErrorKind::TimedOut => WirelineError::Timeout,
        ErrorKind::ConnectionReset | ErrorKind::ConnectionAborted | ErrorKind::BrokenPipe => {
            WirelineError::ConnectionClosed
        }
        _ => WirelineError::SocketSendFailed(os_error_code(&error)),
    }
}
