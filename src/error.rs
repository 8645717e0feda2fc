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

use strum::{EnumDiscriminants, FromRepr, IntoStaticStr};
use thiserror::Error;

/// Transport failures surfaced to the protocol layer above. Every
/// variant has a stable numeric code; where the operating system
/// reported an error, its code is carried in the variant payload.
#[derive(Clone, Debug, Error, EnumDiscriminants, IntoStaticStr, FromRepr, Default)]
#[repr(u32)]
#[strum(serialize_all = "snake_case")]
#[strum_discriminants(
    vis(pub),
    derive(FromRepr, IntoStaticStr),
    strum(serialize_all = "snake_case")
)]
pub enum WirelineError {
    #[default]
    #[error("Error")]
    Error = 1,
    #[error("Invalid configuration")]
    InvalidConfiguration = 2,
    #[error("Not connected")]
    NotConnected = 3,
    #[error("Connection closed")]
    ConnectionClosed = 4,
    #[error("Operation timed out")]
    Timeout = 5,
    #[error("Failed to receive data from the socket, error code: {0}")]
    SocketReceiveFailed(i32) = 10,
    #[error("Failed to send data over the socket, error code: {0}")]
    SocketSendFailed(i32) = 11,
    #[error("Failed to close the socket, error code: {0}")]
    CannotCloseSocket(i32) = 12,
    #[error("Failed to set the socket option, error code: {0}")]
    CannotSetSocketOption(i32) = 13,
    #[error("Cannot read file, error code: {0}")]
    CannotReadFile(i32) = 20,
    #[error("Cannot write to file, error code: {0}")]
    CannotWriteToFile(i32) = 21,
    #[error("Cannot sync file, error code: {0}")]
    CannotSyncFile(i32) = 22,
    #[error("Unexpected end of file")]
    UnexpectedEndOfFile = 23,
}

impl WirelineError {
    pub fn as_code(&self) -> u32 {
        // SAFETY: WirelineError specifies #[repr(u32)] representation.
        // https://doc.rust-lang.org/reference/items/enumerations.html#pointer-casting
        unsafe { *(self as *const Self as *const u32) }
    }

    pub fn as_string(&self) -> &'static str {
        self.into()
    }

    pub fn from_code(code: u32) -> Self {
        WirelineError::from_repr(code).unwrap_or(WirelineError::Error)
    }

    pub fn from_code_as_string(code: u32) -> &'static str {
        WirelineErrorDiscriminants::from_repr(code)
            .map(|discriminant| discriminant.into())
            .unwrap_or("unknown error code")
    }
}

impl PartialEq for WirelineError {
    fn eq(&self, other: &Self) -> bool {
        self.as_code() == other.as_code()
    }
}

/// Code the operating system reported for an I/O failure, zero when
/// the failure did not originate from the OS.
pub(crate) fn os_error_code(error: &std::io::Error) -> i32 {
    error.raw_os_error().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECEIVE_ERROR_CODE: u32 = 10;

    #[test]
    fn derived_error_discriminant_keeps_codes() {
        assert_eq!(
            RECEIVE_ERROR_CODE,
            WirelineError::SocketReceiveFailed(0).as_code()
        );
        assert_eq!(
            RECEIVE_ERROR_CODE,
            WirelineErrorDiscriminants::SocketReceiveFailed as u32
        );
    }

    #[test]
    fn static_str_uses_snake_case() {
        assert_eq!("timeout", WirelineError::Timeout.as_string());
        assert_eq!(
            "socket_receive_failed",
            WirelineError::SocketReceiveFailed(104).as_string()
        );
    }

    #[test]
    fn gets_string_from_code() {
        assert_eq!(
            WirelineError::ConnectionClosed.as_string(),
            WirelineError::from_code_as_string(WirelineError::ConnectionClosed.as_code())
        );
        assert_eq!("unknown error code", WirelineError::from_code_as_string(999));
    }

    #[test]
    fn errors_compare_by_code() {
        assert_eq!(
            WirelineError::SocketSendFailed(32),
            WirelineError::SocketSendFailed(104)
        );
        assert_ne!(WirelineError::Timeout, WirelineError::ConnectionClosed);
    }
}
