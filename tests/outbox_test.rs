//! Transactional-outbox tests: confirmation events stay in the ledger until
//! the relay lands them, survive a broker outage, and duplicates from a
//! crashed relay pass are absorbed downstream.

mod common;

use std::time::Duration;

use common::SagaFixture;
use helabooking_core::orchestration::{OutboxRelayConfig, PublishMode};
use helabooking_core::state_machine::BookingState;

#[tokio::test]
async fn test_outbox_entry_drains_to_consumers() {
    let fixture = SagaFixture::with_mode(PublishMode::Outbox);
    let event = fixture.seed_event(10);

    let booking = fixture.book(7, event.id, 2).await;
    assert_eq!(booking.status, BookingState::Confirmed);

    // Committed alongside the status, but not on the broker yet
    assert_eq!(fixture.ledger.outbox_depth(), 1);
    fixture.drain_consumers().await;
    assert_eq!(fixture.tickets.ticket_count(), 0);

    let relay = fixture.relay();
    assert_eq!(relay.drain_once(), 1);
    assert_eq!(fixture.ledger.outbox_depth(), 0);

    fixture.drain_consumers().await;
    assert_eq!(fixture.tickets.tickets_for_booking(booking.id).len(), 2);
    assert_eq!(fixture.notifications.notification_count(), 1);
    assert_eq!(fixture.audit.entry_count(), 1);
}

#[tokio::test]
async fn test_relay_retries_until_the_exchange_accepts() {
    // The exchange does not exist yet: every relay pass fails to publish
    let fixture = SagaFixture::with_undeclared_exchange(PublishMode::Outbox);
    let event = fixture.seed_event(10);

    // Confirmation never touches the broker in outbox mode
    let booking = fixture.book(7, event.id, 1).await;
    assert_eq!(booking.status, BookingState::Confirmed);
    assert_eq!(fixture.ledger.outbox_depth(), 1);

    let relay = fixture.relay();
    assert_eq!(relay.drain_once(), 0, "nothing lands while the broker is dark");
    assert_eq!(
        fixture.ledger.outbox_depth(),
        1,
        "the entry stays claimable for the next pass"
    );

    // Broker comes back; the same entry drains on the next pass
    fixture.topology.declare_all(&fixture.broker).unwrap();
    assert_eq!(relay.drain_once(), 1);
    assert_eq!(fixture.ledger.outbox_depth(), 0);

    fixture.drain_consumers().await;
    assert_eq!(fixture.tickets.tickets_for_booking(booking.id).len(), 1);
}

#[tokio::test]
async fn test_relay_crash_between_publish_and_mark_is_safe() {
    let fixture = SagaFixture::with_mode(PublishMode::Outbox);
    let event = fixture.seed_event(10);
    let booking = fixture.book(7, event.id, 2).await;

    // A relay pass publishes the entry but dies before marking it
    let entries = fixture.ledger.claim_unpublished(10);
    assert_eq!(entries.len(), 1);
    fixture
        .publisher
        .publish_message(&entries[0].event_type, entries[0].to_message())
        .unwrap();

    // The restarted relay claims the same entry and publishes it again
    let relay = fixture.relay();
    assert_eq!(relay.drain_once(), 1);

    fixture.drain_consumers().await;

    // Two deliveries of the same correlation id, one set of side effects
    assert_eq!(fixture.tickets.tickets_for_booking(booking.id).len(), 2);
    assert_eq!(fixture.notifications.notification_count(), 1);
    assert_eq!(fixture.audit.entry_count(), 1);
}

#[tokio::test]
async fn test_spawned_relay_publishes_in_the_background() {
    let fixture = SagaFixture::with_mode(PublishMode::Outbox);
    let event = fixture.seed_event(10);

    let relay_handle = fixture
        .relay_with(OutboxRelayConfig {
            poll_interval: Duration::from_millis(10),
            batch_size: 16,
        })
        .spawn();

    let booking = fixture.book(7, event.id, 1).await;
    assert_eq!(booking.status, BookingState::Confirmed);

    // Give the relay a few ticks to notice the staged entry
    let mut drained = false;
    for _ in 0..50 {
        tokio::time::sleep(Duration::from_millis(10)).await;
        if fixture.ledger.outbox_depth() == 0 {
            drained = true;
            break;
        }
    }
    assert!(drained, "the background relay drains the staged entry");

    fixture.drain_consumers().await;
    assert_eq!(fixture.tickets.tickets_for_booking(booking.id).len(), 1);

    relay_handle.abort();
}
