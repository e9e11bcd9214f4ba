use crate::matchmaking::pool::WaitingPool;
use crate::profile::{ClientProfile, ConnectionId};

/// Mutual gender/preference check: each side must accept the other's gender.
pub fn compatible(a: &ClientProfile, b: &ClientProfile) -> bool {
    a.preference.accepts(b.gender) && b.preference.accepts(a.gender)
}

/// Pick a partner for `candidate` from the pool, or `None`.
///
/// Scans in insertion order. A pair where both sides hold a specific
/// preference wins immediately; otherwise the earliest compatible entry is
/// kept as the fallback. The candidate never matches its own connection.
pub fn select_partner(candidate: &ClientProfile, pool: &WaitingPool) -> Option<ConnectionId> {
    let mut fallback = None;
    for entry in pool.iter() {
        let other = &entry.profile;
        if other.connection_id == candidate.connection_id {
            continue;
        }
        if !compatible(candidate, other) {
            continue;
        }
        if candidate.preference.is_specific() && other.preference.is_specific() {
            return Some(other.connection_id);
        }
        if fallback.is_none() {
            fallback = Some(other.connection_id);
        }
    }
    fallback
}
