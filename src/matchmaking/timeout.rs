use std::sync::Arc;

use rand::seq::IndexedRandom;
use tokio::time::sleep_until;

use crate::matchmaking::Matchmaker;
use crate::profile::{ConnectionId, Preference};

/// Retry copy shown to clients holding a specific (priority) preference.
pub const RETRY_PRIORITY: [&str; 8] = [
    "Oops, your match is busy. Try again!",
    "Someone’s chatting, but you’ll get your turn. Try again!",
    "Patience, young grasshopper, the match awaits. Try again!",
    "Love is in the air… just not for you yet. Try again!",
    "Good things take time—your match is worth it. Try again!",
    "Your preferred partner is currently away. Try again!",
    "Looks like Cupid is tied up. Try again!",
    "They’re busy charming someone else. Try again!",
];

/// Retry copy for preference-free clients.
pub const RETRY_FREE: [&str; 8] = [
    "Everyone’s chatting. Hang tight, try again!",
    "No freebirds available. Retry shortly!",
    "All ears are busy. Give it another try!",
    "Cupid is taking a nap. Try again soon!",
    "Good chats come to those who wait. Try again!",
    "Looks like everyone’s talking. Try again!",
    "No one is free right now. Try again!",
    "All your potential partners are busy. Try again!",
];

pub fn flavor_pool(preference: Preference) -> &'static [&'static str] {
    if preference.is_specific() {
        &RETRY_PRIORITY
    } else {
        &RETRY_FREE
    }
}

/// Heartbeat copy rotates through the flavor pool by index.
pub fn rotating_message(preference: Preference, index: usize) -> &'static str {
    let pool = flavor_pool(preference);
    pool[index % pool.len()]
}

/// The final timeout picks at random.
pub fn timeout_message(preference: Preference) -> &'static str {
    let pool = flavor_pool(preference);
    pool.choose(&mut rand::rng()).copied().unwrap_or(pool[0])
}

/// One of these runs per pool entry. It emits a rotating "still searching"
/// status every interval and, at the deadline, retires the entry with a
/// single timeout notification. Every removal path aborts this task; a
/// firing that lost that race bails out on the ticket check inside the
/// matchmaker.
pub(crate) async fn supervise(
    matchmaker: Arc<Matchmaker>,
    connection_id: ConnectionId,
    ticket: u64,
) {
    let interval = matchmaker.config.status_interval;
    let deadline = tokio::time::Instant::now() + matchmaker.config.match_timeout;
    let mut msg_index = 0;
    loop {
        let next_tick = tokio::time::Instant::now() + interval;
        if next_tick >= deadline {
            sleep_until(deadline).await;
            break;
        }
        sleep_until(next_tick).await;
        if !matchmaker.searching_heartbeat(connection_id, ticket, msg_index).await {
            return;
        }
        msg_index += 1;
    }
    matchmaker.expire(connection_id, ticket).await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flavor_follows_specificity() {
        assert_eq!(flavor_pool(Preference::Male), &RETRY_PRIORITY);
        assert_eq!(flavor_pool(Preference::Female), &RETRY_PRIORITY);
        assert_eq!(flavor_pool(Preference::Any), &RETRY_FREE);
    }

    #[test]
    fn rotation_wraps_around() {
        assert_eq!(rotating_message(Preference::Any, 0), RETRY_FREE[0]);
        assert_eq!(rotating_message(Preference::Any, 7), RETRY_FREE[7]);
        assert_eq!(rotating_message(Preference::Any, 8), RETRY_FREE[0]);
        assert_eq!(rotating_message(Preference::Male, 9), RETRY_PRIORITY[1]);
    }

    #[test]
    fn timeout_message_comes_from_the_right_pool() {
        for _ in 0..32 {
            assert!(RETRY_FREE.contains(&timeout_message(Preference::Any)));
            assert!(RETRY_PRIORITY.contains(&timeout_message(Preference::Female)));
        }
    }
}
