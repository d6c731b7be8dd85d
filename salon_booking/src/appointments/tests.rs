use std::{collections::HashSet, sync::Arc};

use proptest::prelude::*;
use test_strategy::proptest;

use super::*;
use crate::test_utils::{BrokenScheduler, OWNER_PHONE, at, harness, harness_with_scheduler};

const CLIENT: &str = "919876543210";

fn status(status: &str) -> StatusUpdateRequest {
    StatusUpdateRequest {
        status: status.to_owned(),
        reason: None,
    }
}

fn move_to(date: &str, time: &str) -> RescheduleRequest {
    RescheduleRequest {
        appointment_date: date.to_owned(),
        appointment_time: time.to_owned(),
    }
}

#[tokio::test]
async fn booking_schedules_reminder_and_notifies_both_parties() {
    let h = harness().await;

    let outcome = h
        .engine
        .create(h.booking("98765 43210", "2024-12-25", "14:30"))
        .await
        .unwrap();

    assert_eq!(
        outcome.appointment.appointment.status,
        AppointmentStatus::Upcoming
    );
    assert_eq!(outcome.appointment.service_name, "Haircut");
    assert_eq!(
        outcome.notifications,
        BookingNotifications {
            client_notified: true,
            owner_notified: true,
            reminder_scheduled: true,
        }
    );
    assert_eq!(
        h.scheduler.pending_reminder(outcome.appointment.id()).await,
        Some(at("2024-12-25", "13:30"))
    );
    assert_eq!(h.transport.sent_to(CLIENT).len(), 1);
    assert_eq!(h.transport.sent_to(OWNER_PHONE).len(), 1);
}

#[tokio::test]
async fn notification_failure_does_not_undo_booking() {
    let h = harness().await;
    h.transport.fail(true);

    let outcome = h
        .engine
        .create(h.booking("9876543210", "2024-12-25", "14:30"))
        .await
        .unwrap();

    assert!(!outcome.notifications.client_notified);
    assert!(!outcome.notifications.owner_notified);
    assert!(outcome.notifications.reminder_scheduled);
    assert!(h.engine.get(outcome.appointment.id()).await.is_ok());
}

#[tokio::test]
async fn scheduler_failure_degrades_to_not_scheduled() {
    let h = harness_with_scheduler(Arc::new(BrokenScheduler)).await;

    let outcome = h
        .engine
        .create(h.booking("9876543210", "2024-12-25", "14:30"))
        .await
        .unwrap();
    assert!(!outcome.notifications.reminder_scheduled);

    let update = h
        .engine
        .update_status(outcome.appointment.id(), status("cancelled"))
        .await
        .unwrap();
    assert_eq!(
        update.appointment.appointment.status,
        AppointmentStatus::Cancelled
    );
}

#[tokio::test]
async fn booking_within_the_hour_is_not_reminded() {
    let h = harness().await;

    let outcome = h
        .engine
        .create(h.booking("9876543210", "2024-12-20", "10:45"))
        .await
        .unwrap();

    assert!(!outcome.notifications.reminder_scheduled);
    assert_eq!(
        h.scheduler.pending_reminder(outcome.appointment.id()).await,
        None
    );
}

#[tokio::test]
async fn taken_slot_is_a_conflict_without_side_effects() {
    let h = harness().await;
    h.engine
        .create(h.booking("9876543210", "2024-12-25", "14:30"))
        .await
        .unwrap();
    let sent_before = h.transport.sent().len();

    let result = h
        .engine
        .create(h.booking("9123456780", "2024-12-25", "14:30"))
        .await;

    assert!(matches!(result, Err(BookingError::Conflict(_))));
    assert_eq!(h.transport.sent().len(), sent_before);
}

#[tokio::test]
async fn malformed_booking_is_rejected() {
    let h = harness().await;

    let mut no_name = h.booking("9876543210", "2024-12-25", "14:30");
    no_name.name = "  ".to_owned();
    let bad_phone = h.booking("call me", "2024-12-25", "14:30");
    let bad_date = h.booking("9876543210", "25/12/2024", "14:30");
    let bad_time = h.booking("9876543210", "2024-12-25", "2:30pm");

    for request in [no_name, bad_phone, bad_date, bad_time] {
        let result = h.engine.create(request).await;
        assert!(matches!(result, Err(BookingError::Validation(_))));
    }
    assert!(h.transport.sent().is_empty());
}

#[tokio::test]
async fn unknown_service_is_not_found() {
    let h = harness().await;
    let mut request = h.booking("9876543210", "2024-12-25", "14:30");
    request.service_id = 404;

    let result = h.engine.create(request).await;

    assert!(matches!(result, Err(BookingError::NotFound(_))));
}

#[tokio::test]
async fn cancelling_twice_is_a_quiet_no_op() {
    let h = harness().await;
    let id = h
        .engine
        .create(h.booking("9876543210", "2024-12-25", "14:30"))
        .await
        .unwrap()
        .appointment
        .id();

    let first = h
        .engine
        .update_status(
            id,
            StatusUpdateRequest {
                status: "cancelled".to_owned(),
                reason: Some("Stylist unavailable".to_owned()),
            },
        )
        .await
        .unwrap();
    assert_eq!(first.client_notified, Some(true));
    assert_eq!(h.scheduler.pending_reminder(id).await, None);

    let second = h.engine.update_status(id, status("cancelled")).await.unwrap();
    assert_eq!(second.client_notified, None);
    assert_eq!(h.scheduler.pending_reminder(id).await, None);

    let client_messages = h.transport.sent_to(CLIENT);
    assert_eq!(client_messages.len(), 2);
    assert!(client_messages[1].contains("Stylist unavailable"));
}

#[tokio::test]
async fn reactivation_restores_exactly_one_reminder() {
    let h = harness().await;
    let id = h
        .engine
        .create(h.booking("9876543210", "2024-12-25", "14:30"))
        .await
        .unwrap()
        .appointment
        .id();
    h.engine.update_status(id, status("cancelled")).await.unwrap();

    let update = h.engine.update_status(id, status("upcoming")).await.unwrap();

    assert_eq!(update.reminder_scheduled, Some(true));
    assert_eq!(
        h.scheduler.pending_reminder(id).await,
        Some(at("2024-12-25", "13:30"))
    );
}

#[tokio::test]
async fn reactivation_into_a_taken_slot_is_a_conflict() {
    let h = harness().await;
    let first = h
        .engine
        .create(h.booking("9876543210", "2024-12-25", "14:30"))
        .await
        .unwrap()
        .appointment
        .id();
    h.engine.update_status(first, status("cancelled")).await.unwrap();
    h.engine
        .create(h.booking("9123456780", "2024-12-25", "14:30"))
        .await
        .unwrap();

    let result = h.engine.update_status(first, status("upcoming")).await;

    assert!(matches!(result, Err(BookingError::Conflict(_))));
    assert_eq!(h.scheduler.pending_reminder(first).await, None);
}

#[tokio::test]
async fn completed_is_terminal() {
    let h = harness().await;
    let id = h
        .engine
        .create(h.booking("9876543210", "2024-12-25", "14:30"))
        .await
        .unwrap()
        .appointment
        .id();

    h.engine.update_status(id, status("completed")).await.unwrap();
    assert_eq!(h.scheduler.pending_reminder(id).await, None);

    let result = h.engine.update_status(id, status("upcoming")).await;
    assert!(matches!(
        result,
        Err(BookingError::InvalidTransition {
            from: AppointmentStatus::Completed,
            to: AppointmentStatus::Upcoming,
        })
    ));

    let result = h.engine.reschedule(id, move_to("2024-12-26", "10:00")).await;
    assert!(matches!(result, Err(BookingError::Validation(_))));

    assert!(h.engine.update_status(id, status("completed")).await.is_ok());
}

#[tokio::test]
async fn unknown_status_is_rejected() {
    let h = harness().await;
    let id = h
        .engine
        .create(h.booking("9876543210", "2024-12-25", "14:30"))
        .await
        .unwrap()
        .appointment
        .id();

    let result = h.engine.update_status(id, status("postponed")).await;
    assert!(matches!(result, Err(BookingError::Validation(_))));

    let result = h.engine.update_status(999, status("cancelled")).await;
    assert!(matches!(result, Err(BookingError::NotFound(_))));
}

#[tokio::test]
async fn reschedule_moves_reminder_and_notifies_old_and_new_slot() {
    let h = harness().await;
    let id = h
        .engine
        .create(h.booking("9876543210", "2024-12-25", "14:30"))
        .await
        .unwrap()
        .appointment
        .id();

    let update = h
        .engine
        .reschedule(id, move_to("2024-12-27", "11:00"))
        .await
        .unwrap();

    assert_eq!(update.appointment.slot(), Slot::parse("2024-12-27", "11:00").unwrap());
    assert_eq!(update.reminder_scheduled, Some(true));
    assert_eq!(update.client_notified, Some(true));
    assert_eq!(
        h.scheduler.pending_reminder(id).await,
        Some(at("2024-12-27", "10:00"))
    );

    let notice = h.transport.sent_to(CLIENT).pop().unwrap();
    assert!(notice.contains("Wednesday, December 25, 2024"));
    assert!(notice.contains("Friday, December 27, 2024"));
}

#[tokio::test]
async fn conflicting_reschedule_changes_nothing() {
    let h = harness().await;
    let a = h
        .engine
        .create(h.booking("9876543210", "2024-12-25", "14:30"))
        .await
        .unwrap()
        .appointment;
    let b = h
        .engine
        .create(h.booking("9123456780", "2024-12-25", "16:00"))
        .await
        .unwrap()
        .appointment;

    let result = h.engine.reschedule(b.id(), move_to("2024-12-25", "14:30")).await;

    assert!(matches!(result, Err(BookingError::Conflict(_))));
    assert_eq!(h.engine.get(a.id()).await.unwrap().slot(), a.slot());
    assert_eq!(h.engine.get(b.id()).await.unwrap().slot(), b.slot());
    assert_eq!(
        h.scheduler.pending_reminder(a.id()).await,
        Some(at("2024-12-25", "13:30"))
    );
    assert_eq!(
        h.scheduler.pending_reminder(b.id()).await,
        Some(at("2024-12-25", "15:00"))
    );
}

#[tokio::test]
async fn manual_reminder_requires_upcoming_appointment() {
    let h = harness().await;
    let id = h
        .engine
        .create(h.booking("9876543210", "2024-12-25", "14:30"))
        .await
        .unwrap()
        .appointment
        .id();

    h.engine.send_manual_reminder(id).await.unwrap();
    assert!(h.transport.sent_to(CLIENT).last().unwrap().contains("is in 1 hour"));

    h.transport.fail(true);
    assert!(matches!(
        h.engine.send_manual_reminder(id).await,
        Err(BookingError::Delivery(_))
    ));
    h.transport.fail(false);

    h.engine.update_status(id, status("cancelled")).await.unwrap();
    assert!(matches!(
        h.engine.send_manual_reminder(id).await,
        Err(BookingError::Validation(_))
    ));
}

#[tokio::test]
async fn list_defaults_to_upcoming_and_filters_by_phone() {
    let h = harness().await;
    let a = h
        .engine
        .create(h.booking("9876543210", "2024-12-26", "10:00"))
        .await
        .unwrap()
        .appointment
        .id();
    let b = h
        .engine
        .create(h.booking("9123456780", "2024-12-25", "10:00"))
        .await
        .unwrap()
        .appointment
        .id();
    h.engine.update_status(a, status("cancelled")).await.unwrap();

    let upcoming = h.engine.list(AppointmentQuery::default()).await.unwrap();
    assert_eq!(upcoming.iter().map(|a| a.id()).collect::<Vec<_>>(), vec![b]);

    let all = h
        .engine
        .list(AppointmentQuery {
            status: Some("all".to_owned()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(all.iter().map(|a| a.id()).collect::<Vec<_>>(), vec![b, a]);

    let mine = h
        .engine
        .list(AppointmentQuery {
            status: Some("cancelled".to_owned()),
            phone: Some("98765 43210".to_owned()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(mine.len(), 1);

    let bad = h
        .engine
        .list(AppointmentQuery {
            date: Some("tomorrow".to_owned()),
            ..Default::default()
        })
        .await;
    assert!(matches!(bad, Err(BookingError::Validation(_))));
}

fn tokio_ct(
    future: impl std::future::Future<Output = Result<(), TestCaseError>>,
) -> Result<(), TestCaseError> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
        .block_on(future)
}

#[derive(Debug, Clone, test_strategy::Arbitrary)]
enum Operation {
    Book {
        #[strategy(0usize..4)]
        slot: usize,
    },
    Cancel {
        #[strategy(0usize..6)]
        target: usize,
    },
    Reactivate {
        #[strategy(0usize..6)]
        target: usize,
    },
    Reschedule {
        #[strategy(0usize..6)]
        target: usize,
        #[strategy(0usize..4)]
        slot: usize,
    },
}

fn pick(ids: &[AppointmentId], i: usize) -> Option<AppointmentId> {
    ids.get(i % ids.len().max(1)).copied()
}

const TIMES: [&str; 4] = ["10:00", "11:00", "12:00", "13:00"];

#[proptest(async = tokio_ct)]
async fn upcoming_slots_stay_unique(
    #[strategy(proptest::collection::vec(any::<Operation>(), 1..16))] operations: Vec<Operation>,
) {
    let h = harness().await;
    let mut ids = Vec::new();

    for (n, operation) in operations.into_iter().enumerate() {
        let _ = match operation {
            Operation::Book { slot } => {
                let phone = format!("90000000{n:02}");
                match h.engine.create(h.booking(&phone, "2024-12-25", TIMES[slot])).await {
                    Ok(outcome) => {
                        ids.push(outcome.appointment.id());
                        Ok(())
                    }
                    Err(error) => Err(error),
                }
            }
            Operation::Cancel { target: i } => match pick(&ids, i) {
                Some(id) => h.engine.update_status(id, status("cancelled")).await.map(drop),
                None => Ok(()),
            },
            Operation::Reactivate { target: i } => match pick(&ids, i) {
                Some(id) => h.engine.update_status(id, status("upcoming")).await.map(drop),
                None => Ok(()),
            },
            Operation::Reschedule { target: i, slot } => match pick(&ids, i) {
                Some(id) => h
                    .engine
                    .reschedule(id, move_to("2024-12-25", TIMES[slot]))
                    .await
                    .map(drop),
                None => Ok(()),
            },
        };

        let upcoming = h.engine.list(AppointmentQuery::default()).await.unwrap();
        let slots: HashSet<_> = upcoming.iter().map(|a| a.slot()).collect();
        prop_assert_eq!(slots.len(), upcoming.len());

        for appointment in &upcoming {
            prop_assert_eq!(
                h.scheduler.pending_reminder(appointment.id()).await,
                Some(appointment.slot().reminder_at())
            );
        }
    }
}

#[tokio::test]
async fn overlapping_cancels_send_one_notice() {
    let h = harness().await;
    let id = h
        .engine
        .create(h.booking("9876543210", "2024-12-25", "14:30"))
        .await
        .unwrap()
        .appointment
        .id();

    let (first, second) = tokio::join!(
        h.engine.update_status(id, status("cancelled")),
        h.engine.update_status(id, status("cancelled")),
    );

    let notified: Vec<_> = [first.unwrap(), second.unwrap()]
        .into_iter()
        .filter_map(|update| update.client_notified)
        .collect();
    assert_eq!(notified, vec![true]);
    assert_eq!(h.transport.sent_to(CLIENT).len(), 2);
}
