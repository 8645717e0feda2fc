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

//! Convenience re-exports of the types needed to work with streams.

pub use crate::buffered_stream::BufferedStream;
pub use crate::deadline::Deadline;
pub use crate::error::WirelineError;
pub use crate::file_stream::FileStream;
pub use crate::socket::{Socket, SocketOption};
pub use crate::socket_stream::SocketStream;
pub use crate::stream::{Stream, StreamKind};
pub use crate::tcp_socket::TcpSocket;
pub use crate::tcp_socket_config::TcpSocketConfig;
