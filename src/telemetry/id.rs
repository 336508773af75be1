//! Request id generation
//!
//! Ids use a `REQ_<millis>_<suffix>` shape so they sort roughly by
//! arrival time and stay greppable in logs. The suffix is a slice of a
//! v4 uuid rather than a thread id; thread ids are reused across requests
//! by pooled runtimes, which would make collisions routine.

use chrono::Utc;
use uuid::Uuid;

/// Generate a globally unique request id
pub(crate) fn next_request_id() -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("REQ_{}_{}", Utc::now().timestamp_millis(), &suffix[..8])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_ids_have_expected_shape() {
        let id = next_request_id();
        assert!(id.starts_with("REQ_"));
        assert_eq!(id.split('_').count(), 3);
    }

    #[test]
    fn test_ids_are_unique() {
        let ids: HashSet<String> = (0..1000).map(|_| next_request_id()).collect();
        assert_eq!(ids.len(), 1000);
    }
}
