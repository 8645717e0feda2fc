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
use crate::stream::{Stream, StreamKind};
use bytes::BytesMut;
use std::io::{IoSlice, IoSliceMut};

const DEFAULT_BUFFER_SIZE: usize = 8192;

/// Wraps another stream and amortizes small reads through an internal
/// buffer. The write path stays unbuffered.
#[derive(Debug)]
pub struct BufferedStream {
    inner: Box<dyn Stream>,
    buffer: BytesMut,
    capacity: usize,
}

impl BufferedStream {
    pub fn new(inner: Box<dyn Stream>) -> Self {
        Self::with_capacity(inner, DEFAULT_BUFFER_SIZE)
    }

    pub fn with_capacity(inner: Box<dyn Stream>, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            inner,
            buffer: BytesMut::with_capacity(capacity),
            capacity,
        }
    }

    /// Bytes read ahead of the caller and not yet consumed.
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Copies buffered bytes into the segments, skipping the part of
    /// the vector that is already filled.
    fn drain_into(&mut self, segments: &mut [IoSliceMut<'_>], mut skip: usize) -> usize {
        let mut copied = 0;
        for segment in segments.iter_mut() {
            if self.buffer.is_empty() {
                break;
            }
            if skip >= segment.len() {
                skip -= segment.len();
                continue;
            }
            let count = (segment.len() - skip).min(self.buffer.len());
            let chunk = self.buffer.split_to(count);
            segment[skip..skip + count].copy_from_slice(&chunk);
            copied += count;
            skip = 0;
        }
        copied
    }
}

impl Stream for BufferedStream {
    fn kind(&self) -> StreamKind {
        StreamKind::Buffered
    }

    fn close(&mut self) -> Result<(), WirelineError> {
        self.inner.close()
    }

    fn flush(&mut self) -> Result<(), WirelineError> {
        self.inner.flush()
    }

    fn readv(
        &mut self,
        segments: &mut [IoSliceMut<'_>],
        min_bytes: usize,
        timeout_ms: i32,
    ) -> Result<usize, WirelineError> {
        let wanted: usize = segments.iter().map(|segment| segment.len()).sum();
        let mut total = self.drain_into(segments, 0);
        if total == wanted || total >= min_bytes {
            return Ok(total);
        }

        // The internal buffer is empty at this point. One inner read
        // under the caller's single deadline: ask for enough to finish
        // the vector, rounded up to the buffer capacity so later small
        // reads are served from memory, with the minimum adjusted by
        // what the buffer already provided.
        let needed = (min_bytes - total).min(wanted - total);
        let target = (wanted - total).max(self.capacity);
        self.buffer.resize(target, 0);
        let read = {
            let mut window = [IoSliceMut::new(&mut self.buffer)];
            self.inner.readv(&mut window, needed, timeout_ms)
        };
        let read = match read {
            Ok(read) => read,
            Err(error) => {
                self.buffer.clear();
                return Err(error);
            }
        };
        self.buffer.truncate(read);

        total += self.drain_into(segments, total);
        Ok(total)
    }

    fn writev(
        &mut self,
        segments: &[IoSlice<'_>],
        timeout_ms: i32,
    ) -> Result<usize, WirelineError> {
        self.inner.writev(segments, timeout_ms)
    }

    fn set_option(&mut self, option: SocketOption) -> Result<(), WirelineError> {
        self.inner.set_option(option)
    }

    fn check_closed(&mut self) -> bool {
        if !self.buffer.is_empty() {
            return false;
        }
        self.inner.check_closed()
    }
}
