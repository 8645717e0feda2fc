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

use crate::socket::SocketOption;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Socket tuning applied when a TCP stream is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TcpSocketConfig {
    /// Whether to apply the values below instead of the system defaults.
    pub override_defaults: bool,
    /// Disable the Nagle algorithm for the TCP socket.
    pub nodelay: bool,
    /// Enable keepalive probes.
    pub keepalive: bool,
    /// SO_RCVBUF size in bytes.
    pub recv_buffer_size: usize,
    /// SO_SNDBUF size in bytes.
    pub send_buffer_size: usize,
    /// How long a close may linger flushing unsent data.
    pub linger: Option<Duration>,
}

impl Default for TcpSocketConfig {
    fn default() -> TcpSocketConfig {
        TcpSocketConfig {
            override_defaults: false,
            nodelay: false,
            keepalive: true,
            recv_buffer_size: 262144,
            send_buffer_size: 262144,
            linger: None,
        }
    }
}

impl TcpSocketConfig {
    /// Options this config resolves to, in application order. Without
    /// `override_defaults` the system defaults stay untouched.
    pub fn as_options(&self) -> Vec<SocketOption> {
        if !self.override_defaults {
            return Vec::new();
        }
        vec![
            SocketOption::RecvBufferSize(self.recv_buffer_size),
            SocketOption::SendBufferSize(self.send_buffer_size),
            SocketOption::Keepalive(self.keepalive),
            SocketOption::NoDelay(self.nodelay),
            SocketOption::Linger(self.linger),
        ]
    }
}
