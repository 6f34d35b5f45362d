//! Property-based tests for transcript reconciliation.

use chrono::{DateTime, TimeZone, Utc};
use parlor_core::{Message, Transcript};
use parlor_proto::ServerEvent;
use proptest::prelude::*;

fn ts(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000 + secs, 0).single().unwrap()
}

fn confirmed_event(id: u8, at: i64) -> ServerEvent {
    ServerEvent::Message {
        sender: format!("user-{}", id % 4),
        content: format!("message {id}"),
        id: Some(format!("m{id}")),
        timestamp: Some(ts(at)),
    }
}

fn history_message(id: u8, at: i64) -> Message {
    Message::confirmed(format!("m{id}"), format!("user-{}", id % 4), format!("message {id}"), ts(at))
}

/// Property: replaying any mix of history and live delivery for the same IDs
/// leaves exactly one entry per distinct ID.
#[test]
fn prop_merge_is_idempotent_per_id() {
    proptest!(|(
        ids in prop::collection::vec(0u8..16, 1..40),
        seed_point in 0usize..40,
    )| {
        let mut transcript = Transcript::new();
        let history: Vec<Message> =
            ids.iter().map(|&id| history_message(id, i64::from(id))).collect();

        for (step, &id) in ids.iter().enumerate() {
            if step == seed_point {
                transcript.seed(history.clone());
            }
            transcript.apply_inbound(confirmed_event(id, i64::from(id)), ts(i64::from(id)));
        }
        if seed_point >= ids.len() {
            transcript.seed(history);
        }

        let mut distinct: Vec<u8> = ids.clone();
        distinct.sort_unstable();
        distinct.dedup();
        prop_assert_eq!(transcript.len(), distinct.len());

        let snapshot = transcript.snapshot();
        let mut seen: Vec<&str> = snapshot.iter().map(|m| m.id.as_str()).collect();
        seen.sort_unstable();
        seen.dedup();
        prop_assert_eq!(seen.len(), snapshot.len());
    });
}

/// Property: snapshots are always sorted by timestamp, with equal timestamps
/// in arrival order, for any call order of seed/inbound/outbound.
#[test]
fn prop_snapshot_is_display_ordered() {
    proptest!(|(ops in prop::collection::vec((0u8..3, 0u8..8, 0i64..5), 1..40))| {
        let mut transcript = Transcript::new();

        for (op, id, at) in ops {
            match op {
                0 => {
                    transcript.apply_inbound(confirmed_event(id, at), ts(at));
                },
                1 => {
                    transcript.apply_outbound("me", format!("draft {id}"), ts(at));
                },
                _ => {
                    transcript.seed([history_message(id, at)]);
                },
            }
        }

        let snapshot = transcript.snapshot();
        for pair in snapshot.windows(2) {
            prop_assert!(pair[0].timestamp <= pair[1].timestamp);
        }

        // A snapshot taken twice with no mutation in between is identical,
        // including the order of equal timestamps.
        prop_assert_eq!(snapshot, transcript.snapshot());
    });
}

/// Property: pending echoes survive any amount of unrelated traffic.
#[test]
fn prop_pending_is_never_silently_dropped() {
    proptest!(|(
        drafts in prop::collection::vec(0u8..8, 1..10),
        noise in prop::collection::vec(0u8..16, 0..30),
    )| {
        let mut transcript = Transcript::new();
        let mut pending_ids = Vec::new();

        for (step, &draft) in drafts.iter().enumerate() {
            // Distinct bodies so no stream event below can confirm them.
            let echo = transcript.apply_outbound("me", format!("draft-{step}-{draft}"), ts(0));
            pending_ids.push(echo.id);
        }

        for &id in &noise {
            transcript.apply_inbound(confirmed_event(id, i64::from(id)), ts(i64::from(id)));
        }

        let snapshot = transcript.snapshot();
        for id in &pending_ids {
            prop_assert!(snapshot.iter().any(|m| &m.id == id && m.is_pending()));
        }
        prop_assert_eq!(transcript.pending_count(), pending_ids.len());
    });
}

/// Property: every confirmation consumes exactly one pending echo.
#[test]
fn prop_each_confirmation_consumes_one_echo() {
    proptest!(|(count in 1usize..8)| {
        let mut transcript = Transcript::new();
        for i in 0..count {
            transcript.apply_outbound("me", "same body", ts(i as i64));
        }
        prop_assert_eq!(transcript.pending_count(), count);

        for i in 0..count {
            let event = ServerEvent::Message {
                sender: "me".to_owned(),
                content: "same body".to_owned(),
                id: Some(format!("srv-{i}")),
                timestamp: Some(ts(100 + i as i64)),
            };
            transcript.apply_inbound(event, ts(100 + i as i64));
            prop_assert_eq!(transcript.pending_count(), count - i - 1);
        }

        prop_assert_eq!(transcript.len(), count);
    });
}
