//! Log-once warning ledger.
//!
//! Widgets read their entity on every host update. A sensor that stays
//! unavailable for an hour would otherwise log the same warning thousands of
//! times. The ledger remembers which messages were already reported and
//! forwards only new ones to `log::warn!`.
//!
//! # Usage
//!
//! ```ignore
//! let mut ledger = WarningLedger::new();
//! ledger.report(format_args!("sensor.temp: entity is unavailable")); // logged
//! ledger.report(format_args!("sensor.temp: entity is unavailable")); // suppressed
//! ledger.clear(); // widget recovered; the next error is news again
//! ```

use core::fmt::{self, Write};

use heapless::{Deque, String};

// =============================================================================
// Ledger Configuration
// =============================================================================

/// Maximum number of distinct messages remembered per ledger.
pub const LEDGER_SIZE: usize = 8;

/// Maximum characters per remembered message.
pub const MESSAGE_LENGTH: usize = 96;

// =============================================================================
// Warning Ledger
// =============================================================================

/// Remembers the last `LEDGER_SIZE` reported warnings.
///
/// When full, the oldest message is forgotten and would be logged again if
/// it recurred.
pub struct WarningLedger {
    reported: Deque<String<MESSAGE_LENGTH>, LEDGER_SIZE>,
}

impl WarningLedger {
    /// Create an empty ledger.
    pub const fn new() -> Self { Self { reported: Deque::new() } }

    /// Log `message` at warn level unless it was already reported.
    ///
    /// Returns `true` if the message was logged. Messages longer than
    /// [`MESSAGE_LENGTH`] are compared on their truncated form.
    pub fn report(
        &mut self,
        message: fmt::Arguments<'_>,
    ) -> bool {
        let mut line: String<MESSAGE_LENGTH> = String::new();
        Truncating(&mut line).write_fmt(message).ok();

        if self.reported.iter().any(|seen| *seen == line) {
            return false;
        }

        log::warn!("{line}");

        if self.reported.is_full() {
            self.reported.pop_front();
        }
        self.reported.push_back(line).ok();
        true
    }

    /// Forget everything reported so far.
    pub fn clear(&mut self) { self.reported.clear(); }

    /// Number of remembered messages.
    #[inline]
    pub fn len(&self) -> usize { self.reported.len() }

    /// Check if nothing has been reported.
    #[inline]
    pub fn is_empty(&self) -> bool { self.reported.is_empty() }
}

impl Default for WarningLedger {
    fn default() -> Self { Self::new() }
}

/// Writer that keeps as many characters as fit and drops the rest.
struct Truncating<'a>(&'a mut String<MESSAGE_LENGTH>);

impl Write for Truncating<'_> {
    fn write_str(
        &mut self,
        s: &str,
    ) -> fmt::Result {
        for c in s.chars() {
            if self.0.push(c).is_err() {
                break;
            }
        }
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_once() {
        let mut ledger = WarningLedger::new();
        assert!(ledger.report(format_args!("sensor.a: unavailable")));
        assert!(!ledger.report(format_args!("sensor.a: unavailable")), "Repeat should be suppressed");
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_distinct_messages_each_logged() {
        let mut ledger = WarningLedger::new();
        assert!(ledger.report(format_args!("sensor.a: unavailable")));
        assert!(ledger.report(format_args!("sensor.a: state is not numeric")));
        assert_eq!(ledger.len(), 2);
    }

    #[test]
    fn test_clear_rearms() {
        let mut ledger = WarningLedger::new();
        ledger.report(format_args!("x"));
        ledger.clear();
        assert!(ledger.is_empty());
        assert!(ledger.report(format_args!("x")), "Cleared ledger should log again");
    }

    #[test]
    fn test_oldest_forgotten_when_full() {
        let mut ledger = WarningLedger::new();
        for i in 0..LEDGER_SIZE {
            ledger.report(format_args!("message {i}"));
        }
        assert_eq!(ledger.len(), LEDGER_SIZE);

        ledger.report(format_args!("one more"));
        assert_eq!(ledger.len(), LEDGER_SIZE);
        assert!(ledger.report(format_args!("message 0")), "Oldest entry was dropped");
        assert!(!ledger.report(format_args!("message 2")), "Recent entries are still remembered");
    }

    #[test]
    fn test_long_message_truncated() {
        let mut ledger = WarningLedger::new();
        let long = "z".repeat(MESSAGE_LENGTH * 2);
        assert!(ledger.report(format_args!("{long}")));
        assert!(!ledger.report(format_args!("{long}")));
        assert!(!ledger.report(format_args!("{long}tail")), "Only the first MESSAGE_LENGTH chars count");
    }
}
