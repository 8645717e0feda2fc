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

use std::time::{Duration, Instant};

/// Absolute point on the monotonic clock after which a blocking
/// operation must give up and report a timeout.
///
/// The monotonic clock is used on purpose: wall-clock adjustments must
/// never shorten or extend an in-flight deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deadline {
    /// Block without limit.
    Infinite,
    /// Single non-blocking attempt.
    Immediate,
    /// Give up once the monotonic clock passes the given point.
    At(Instant),
}

impl Deadline {
    /// Maps a relative timeout in milliseconds into an absolute deadline.
    ///
    /// Negative timeouts block without limit and a timeout of zero means
    /// a single non-blocking attempt.
    pub fn from_timeout_ms(timeout_ms: i32) -> Self {
        match timeout_ms {
            t if t < 0 => Deadline::Infinite,
            0 => Deadline::Immediate,
            t => Deadline::At(Instant::now() + Duration::from_millis(t as u64)),
        }
    }

    /// Time left before the deadline passes, saturating at zero.
    /// `None` when there is no point in time to measure against.
    pub fn remaining(&self) -> Option<Duration> {
        match self {
            Deadline::Infinite | Deadline::Immediate => None,
            Deadline::At(at) => Some(at.saturating_duration_since(Instant::now())),
        }
    }

    /// Whether the deadline has already passed. `Immediate` never
    /// expires, it bounds the number of attempts rather than their
    /// duration.
    pub fn has_expired(&self) -> bool {
        match self {
            Deadline::Infinite | Deadline::Immediate => false,
            Deadline::At(at) => *at <= Instant::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_timeout_should_block_without_limit() {
        assert_eq!(Deadline::Infinite, Deadline::from_timeout_ms(-1));
        assert_eq!(Deadline::Infinite, Deadline::from_timeout_ms(i32::MIN));
        assert!(!Deadline::from_timeout_ms(-1).has_expired());
        assert_eq!(None, Deadline::from_timeout_ms(-1).remaining());
    }

    #[test]
    fn zero_timeout_should_mean_a_single_non_blocking_attempt() {
        assert_eq!(Deadline::Immediate, Deadline::from_timeout_ms(0));
        assert!(!Deadline::Immediate.has_expired());
        assert_eq!(None, Deadline::Immediate.remaining());
    }

    #[test]
    fn positive_timeout_should_map_to_a_monotonic_point() {
        let before = Instant::now();
        let deadline = Deadline::from_timeout_ms(250);
        let after = Instant::now();
        let Deadline::At(at) = deadline else {
            panic!("expected an absolute deadline, got: {deadline:?}");
        };
        assert!(at >= before + Duration::from_millis(250));
        assert!(at <= after + Duration::from_millis(250));
        assert!(!deadline.has_expired());
    }

    #[test]
    fn remaining_should_saturate_at_zero_once_passed() {
        let deadline = Deadline::At(Instant::now() - Duration::from_millis(10));
        assert!(deadline.has_expired());
        assert_eq!(Some(Duration::ZERO), deadline.remaining());
    }
}
