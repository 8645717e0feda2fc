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
use std::fmt::Debug;
use std::io::{self, IoSlice};
use std::time::Duration;

/// Typed socket options accepted by `set_option` implementations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SocketOption {
    /// Disable the Nagle algorithm for the TCP socket.
    NoDelay(bool),
    /// Enable keepalive probes.
    Keepalive(bool),
    /// SO_RCVBUF size in bytes.
    RecvBufferSize(usize),
    /// SO_SNDBUF size in bytes.
    SendBufferSize(usize),
    /// How long a close may linger flushing unsent data.
    Linger(Option<Duration>),
}

/// Connected, deadline-aware channel performing the actual blocking
/// receive and send operations underneath a stream.
///
/// Exactly one stream owns a socket at any time; the layers handing
/// sockets out must never give the same channel to two owners.
pub trait Socket: Debug + Send {
    /// Receives into a single buffer, honoring the deadline. `Ok(0)`
    /// means the peer closed the connection.
    fn receive(&mut self, buffer: &mut [u8], deadline: Deadline) -> io::Result<usize>;

    /// Sends the entire vector, looping over partial sends internally,
    /// all under the one deadline.
    fn send_vectored(&mut self, segments: &[IoSlice<'_>], deadline: Deadline) -> io::Result<usize>;

    /// Shuts the connection down in both directions.
    fn close(&mut self) -> io::Result<()>;

    /// Applies a socket option.
    fn set_option(&mut self, option: SocketOption) -> io::Result<()>;

    /// Probes whether the peer has closed the connection, without
    /// consuming any data and without blocking.
    fn is_closed(&mut self) -> bool;
}
