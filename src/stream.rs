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

use crate::error::WirelineError;
use crate::socket::SocketOption;
use std::fmt::Debug;
use std::io::{IoSlice, IoSliceMut};
use strum::Display;

/// The concrete transport carried by a stream.
///
/// `Tls` is a reserved tag: the encrypted kind shares this contract,
/// but the TLS handshake itself belongs to the layers above.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum StreamKind {
    Tcp,
    Tls,
    Buffered,
    File,
}

/// Uniform transport capability contract over heterogeneous underlying
/// channels. Callers hold mixed kinds as `Box<dyn Stream>` and treat
/// them polymorphically.
///
/// Streams are single-owner resources: the underlying channel is
/// released exactly once when the stream is dropped, on every exit
/// path. Instances perform no internal synchronization; sharing one
/// across threads requires external serialization.
pub trait Stream: Debug + Send {
    /// Type tag identifying the concrete transport kind.
    fn kind(&self) -> StreamKind;

    /// Closes the underlying channel. Closing a stream that no longer
    /// holds a channel is a no-op.
    fn close(&mut self) -> Result<(), WirelineError>;

    /// Flushes whatever the concrete kind buffers, if anything.
    fn flush(&mut self) -> Result<(), WirelineError>;

    /// Reads into the scatter/gather list until every segment is full,
    /// at least `min_bytes` bytes have accumulated, or the deadline
    /// derived from `timeout_ms` elapses.
    ///
    /// Any return value greater than or equal to `min_bytes` is a
    /// success, regardless of whether the whole vector was filled.
    /// Callers that only need "at least N bytes" are not blocked
    /// waiting for the remaining segments.
    fn readv(
        &mut self,
        segments: &mut [IoSliceMut<'_>],
        min_bytes: usize,
        timeout_ms: i32,
    ) -> Result<usize, WirelineError>;

    /// Writes the entire scatter/gather list within the deadline
    /// derived from `timeout_ms`.
    fn writev(&mut self, segments: &[IoSlice<'_>], timeout_ms: i32)
    -> Result<usize, WirelineError>;

    /// Applies a socket option to the underlying channel.
    fn set_option(&mut self, option: SocketOption) -> Result<(), WirelineError>;

    /// Whether the underlying channel is no longer usable.
    fn check_closed(&mut self) -> bool;
}
