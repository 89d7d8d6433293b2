// SPDX-License-Identifier: MIT OR Apache-2.0

use std::fmt::Display;
#[cfg(not(any(test, feature = "test_utils")))]
use std::time::{SystemTime, UNIX_EPOCH};

#[cfg(any(test, feature = "test_utils"))]
use mock_instant::thread_local::{SystemTime, UNIX_EPOCH};
use serde::{Deserialize, Serialize};

/// Microseconds since the UNIX epoch based on system time.
///
/// With the `test_utils` feature enabled the clock is driven by `mock_instant::thread_local::MockClock`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(u64);

impl Timestamp {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn now() -> Self {
        // A clock set before the epoch is treated as the epoch itself.
        let micros = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|duration| duration.as_micros() as u64)
            .unwrap_or_default();
        Self(micros)
    }
}

impl From<Timestamp> for u64 {
    fn from(value: Timestamp) -> Self {
        value.0
    }
}

impl From<u64> for Timestamp {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use mock_instant::thread_local::MockClock;

    use super::Timestamp;

    #[test]
    fn follows_mocked_clock() {
        MockClock::set_system_time(Duration::from_secs(10));
        assert_eq!(Timestamp::now(), Timestamp::new(10_000_000));

        MockClock::advance_system_time(Duration::from_micros(5));
        assert_eq!(u64::from(Timestamp::now()), 10_000_005);
    }
}
