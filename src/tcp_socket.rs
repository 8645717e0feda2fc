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
use crate::socket::{Socket, SocketOption};
use crate::tcp_socket_config::TcpSocketConfig;
use socket2::SockRef;
use std::io::{self, ErrorKind, IoSlice, Read, Write};
use std::net::{Shutdown, SocketAddr, TcpStream};
use std::time::Duration;
use tracing::trace;

/// Deadline-aware socket over a connected TCP stream.
#[derive(Debug)]
pub struct TcpSocket {
    stream: TcpStream,
    peer_address: SocketAddr,
}

impl TcpSocket {
    /// Wraps an already connected TCP stream. Connection establishment
    /// belongs to the callers above this layer.
    pub fn new(stream: TcpStream) -> io::Result<Self> {
        let peer_address = stream.peer_addr()?;
        Ok(Self {
            stream,
            peer_address,
        })
    }

    /// Address of the connected peer.
    pub fn peer_address(&self) -> SocketAddr {
        self.peer_address
    }

    /// Applies every option the config resolves to.
    pub fn configure(&mut self, config: &TcpSocketConfig) -> io::Result<()> {
        for option in config.as_options() {
            self.set_option(option)?;
        }
        Ok(())
    }
}

/// Time window a blocking call may take under the deadline. Fails up
/// front once an absolute deadline has already passed, so a sequence
/// of calls sharing one deadline cannot overstay it.
fn io_window(deadline: Deadline) -> io::Result<Option<Duration>> {
    match deadline.remaining() {
        None => Ok(None),
        Some(remaining) if remaining.is_zero() => Err(ErrorKind::TimedOut.into()),
        Some(remaining) => Ok(Some(remaining)),
    }
}

impl Socket for TcpSocket {
    fn receive(&mut self, buffer: &mut [u8], deadline: Deadline) -> io::Result<usize> {
        trace!(
            "Receiving up to {} bytes from {}...",
            buffer.len(),
            self.peer_address
        );
        if let Deadline::Immediate = deadline {
            self.stream.set_nonblocking(true)?;
            let received = self.stream.read(buffer);
            self.stream.set_nonblocking(false)?;
            return received;
        }

        self.stream.set_read_timeout(io_window(deadline)?)?;
        self.stream.read(buffer)
    }

    fn send_vectored(&mut self, segments: &[IoSlice<'_>], deadline: Deadline) -> io::Result<usize> {
        let total: usize = segments.iter().map(|segment| segment.len()).sum();
        trace!("Sending {total} bytes to {}...", self.peer_address);

        if let Deadline::Immediate = deadline {
            self.stream.set_nonblocking(true)?;
            let sent = self.stream.write_vectored(segments);
            self.stream.set_nonblocking(false)?;
            return sent;
        }

        let mut storage = segments.to_vec();
        let mut slices = storage.as_mut_slice();
        let mut written = 0;
        while written < total {
            // Re-arm the timeout from the shared deadline before every
            // attempt, so partial sends never extend the total latency.
            self.stream.set_write_timeout(io_window(deadline)?)?;
            let sent = match self.stream.write_vectored(slices) {
                Ok(0) => return Err(ErrorKind::WriteZero.into()),
                Ok(sent) => sent,
                Err(error) => return Err(error),
            };
            written += sent;
            IoSlice::advance_slices(&mut slices, sent);
        }
        Ok(written)
    }

    fn close(&mut self) -> io::Result<()> {
        match self.stream.shutdown(Shutdown::Both) {
            Err(error) if error.kind() != ErrorKind::NotConnected => Err(error),
            _ => Ok(()),
        }
    }

    fn set_option(&mut self, option: SocketOption) -> io::Result<()> {
        let socket = SockRef::from(&self.stream);
        match option {
            SocketOption::NoDelay(enabled) => socket.set_tcp_nodelay(enabled),
            SocketOption::Keepalive(enabled) => socket.set_keepalive(enabled),
            SocketOption::RecvBufferSize(size) => socket.set_recv_buffer_size(size),
            SocketOption::SendBufferSize(size) => socket.set_send_buffer_size(size),
            SocketOption::Linger(linger) => socket.set_linger(linger),
        }
    }

    fn is_closed(&mut self) -> bool {
        let mut probe = [0u8; 1];
        if self.stream.set_nonblocking(true).is_err() {
            return true;
        }
        let probed = self.stream.peek(&mut probe);
        let _ = self.stream.set_nonblocking(false);
        match probed {
            Ok(0) => true,
            Ok(_) => false,
            Err(error) => error.kind() != ErrorKind::WouldBlock,
        }
    }
}
