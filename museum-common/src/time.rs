//! Timestamp utilities

use chrono::{DateTime, SecondsFormat, Utc};

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Current time as Unix epoch milliseconds
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// RFC 3339 form stored in TEXT timestamp columns
pub fn to_db_string(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_now_returns_valid_timestamp() {
        let timestamp = now();
        // Should be a reasonable timestamp (after year 2000)
        assert!(timestamp.timestamp() > 946_684_800);
    }

    #[tokio::test]
    async fn test_now_millis_advances() {
        let t1 = now_millis();
        tokio::time::sleep(Duration::from_millis(10)).await;
        let t2 = now_millis();
        assert!(t2 > t1);
    }

    #[test]
    fn test_db_string_is_utc_rfc3339() {
        let ts = DateTime::parse_from_rfc3339("2024-05-01T12:30:00Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(to_db_string(ts), "2024-05-01T12:30:00Z");
    }
}
