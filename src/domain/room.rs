use time::OffsetDateTime;
use uuid::Uuid;

/// A time-boxed sharing session identified by a short public code.
///
/// Rooms are created once, never mutated, and deleted exactly once (by an
/// explicit end-session request or by the sweeper). Expiry is purely a
/// function of wall-clock time against `expires_at`; it is never written
/// back to storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    pub id: Uuid,
    pub code: String,
    pub created_at: OffsetDateTime,
    pub expires_at: OffsetDateTime,
}

impl Room {
    /// Whether the room is logically expired at `now`. Readers must treat
    /// this as authoritative even if the physical row has not been swept yet.
    #[must_use]
    pub fn is_expired_at(&self, now: OffsetDateTime) -> bool {
        now >= self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Duration;

    fn room_expiring_at(expires_at: OffsetDateTime) -> Room {
        Room {
            id: Uuid::new_v4(),
            code: "ABC123".to_string(),
            created_at: expires_at - Duration::minutes(30),
            expires_at,
        }
    }

    #[test]
    fn test_room_active_before_expiry() {
        let now = OffsetDateTime::now_utc();
        let room = room_expiring_at(now + Duration::minutes(1));
        assert!(!room.is_expired_at(now));
    }

    #[test]
    fn test_room_expired_at_exact_deadline() {
        let now = OffsetDateTime::now_utc();
        let room = room_expiring_at(now);
        assert!(room.is_expired_at(now));
    }

    #[test]
    fn test_room_expired_after_deadline() {
        let now = OffsetDateTime::now_utc();
        let room = room_expiring_at(now - Duration::seconds(1));
        assert!(room.is_expired_at(now));
    }
}
