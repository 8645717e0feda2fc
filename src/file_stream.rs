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

use crate::error::{WirelineError, os_error_code};
use crate::socket::SocketOption;
use crate::stream::{Stream, StreamKind};
use std::fs::File;
use std::io::{ErrorKind, IoSlice, IoSliceMut, Read, Write};

/// File-backed stream. Deadlines do not apply to local files; the
/// timeout argument is accepted and ignored.
#[derive(Debug)]
pub struct FileStream {
    file: Option<File>,
}

impl FileStream {
    /// Creates a stream by taking ownership of an open file.
    pub fn new(file: File) -> Self {
        Self { file: Some(file) }
    }
}

impl Stream for FileStream {
    fn kind(&self) -> StreamKind {
        StreamKind::File
    }

    fn close(&mut self) -> Result<(), WirelineError> {
        self.file.take();
        Ok(())
    }

    fn flush(&mut self) -> Result<(), WirelineError> {
        let Some(file) = self.file.as_mut() else {
            return Ok(());
        };
        file.sync_all()
            .map_err(|error| WirelineError::CannotSyncFile(os_error_code(&error)))
    }

    fn readv(
        &mut self,
        segments: &mut [IoSliceMut<'_>],
        min_bytes: usize,
        _timeout_ms: i32,
    ) -> Result<usize, WirelineError> {
        let file = self.file.as_mut().ok_or(WirelineError::NotConnected)?;
        let mut total = 0;
        for segment in segments.iter_mut() {
            let mut filled = 0;
            while filled < segment.len() {
                let read = match file.read(&mut segment[filled..]) {
                    Ok(0) => {
                        total += filled;
                        if total >= min_bytes {
                            return Ok(total);
                        }
                        return Err(WirelineError::UnexpectedEndOfFile);
                    }
                    Ok(read) => read,
                    Err(error) if error.kind() == ErrorKind::Interrupted => continue,
                    Err(error) => {
                        return Err(WirelineError::CannotReadFile(os_error_code(&error)));
                    }
                };
                filled += read;
            }
            total += filled;
        }
        Ok(total)
    }

    fn writev(
        &mut self,
        segments: &[IoSlice<'_>],
        _timeout_ms: i32,
    ) -> Result<usize, WirelineError> {
        let file = self.file.as_mut().ok_or(WirelineError::NotConnected)?;
        let mut written = 0;
        for segment in segments {
            file.write_all(segment)
                .map_err(|error| WirelineError::CannotWriteToFile(os_error_code(&error)))?;
            written += segment.len();
        }
        Ok(written)
    }

    fn set_option(&mut self, _option: SocketOption) -> Result<(), WirelineError> {
        // Socket options have no file counterpart.
        Err(WirelineError::InvalidConfiguration)
    }

    fn check_closed(&mut self) -> bool {
        self.file.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::OpenOptions;
    use tempfile::tempdir;

    #[test]
    fn writev_then_readv_should_round_trip_through_the_file() {
        let dir = tempdir().expect("failed to create a temp dir");
        let path = dir.path().join("stream.dat");

        let file = File::create(&path).expect("failed to create the file");
        let mut stream = FileStream::new(file);
        let head = [1u8, 2, 3];
        let tail = [4u8, 5, 6, 7, 8];
        let written = stream
            .writev(&[IoSlice::new(&head), IoSlice::new(&tail)], -1)
            .expect("writev failed");
        assert_eq!(8, written);
        stream.flush().expect("flush failed");

        let file = File::open(&path).expect("failed to open the file");
        let mut stream = FileStream::new(file);
        let mut first = [0u8; 3];
        let mut second = [0u8; 5];
        let read = stream
            .readv(
                &mut [IoSliceMut::new(&mut first), IoSliceMut::new(&mut second)],
                8,
                -1,
            )
            .expect("readv failed");
        assert_eq!(8, read);
        assert_eq!([1, 2, 3], first);
        assert_eq!([4, 5, 6, 7, 8], second);
    }

    #[test]
    fn readv_should_tolerate_eof_once_min_bytes_is_met() {
        let dir = tempdir().expect("failed to create a temp dir");
        let path = dir.path().join("short.dat");
        std::fs::write(&path, [9u8; 6]).expect("failed to seed the file");

        let file = File::open(&path).expect("failed to open the file");
        let mut stream = FileStream::new(file);
        let mut buffer = [0u8; 16];

        let read = stream
            .readv(&mut [IoSliceMut::new(&mut buffer)], 6, -1)
            .expect("readv failed");

        assert_eq!(6, read);
        assert_eq!([9; 6], buffer[..6]);
    }

    #[test]
    fn readv_should_fail_on_eof_before_min_bytes() {
        let dir = tempdir().expect("failed to create a temp dir");
        let path = dir.path().join("truncated.dat");
        std::fs::write(&path, [9u8; 4]).expect("failed to seed the file");

        let file = File::open(&path).expect("failed to open the file");
        let mut stream = FileStream::new(file);
        let mut buffer = [0u8; 16];

        let read = stream.readv(&mut [IoSliceMut::new(&mut buffer)], 8, -1);

        assert_eq!(Err(WirelineError::UnexpectedEndOfFile), read);
    }

    #[test]
    fn set_option_should_be_rejected() {
        let dir = tempdir().expect("failed to create a temp dir");
        let path = dir.path().join("options.dat");
        let file = OpenOptions::new()
            .create(true)
            .truncate(true)
            .write(true)
            .open(&path)
            .expect("failed to open the file");
        let mut stream = FileStream::new(file);

        assert_eq!(
            Err(WirelineError::InvalidConfiguration),
            stream.set_option(SocketOption::NoDelay(true))
        );
    }

    #[test]
    fn close_should_release_the_file_and_stay_idempotent() {
        let dir = tempdir().expect("failed to create a temp dir");
        let path = dir.path().join("closed.dat");
        let file = File::create(&path).expect("failed to create the file");
        let mut stream = FileStream::new(file);
        assert!(!stream.check_closed());

        stream.close().expect("first close failed");
        assert!(stream.check_closed());
        stream.close().expect("second close failed");

        let read = stream.readv(&mut [IoSliceMut::new(&mut [0u8; 4])], 1, -1);
        assert_eq!(Err(WirelineError::NotConnected), read);
    }
}
