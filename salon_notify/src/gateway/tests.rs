use std::sync::Mutex;

use salon_models::{
    appointment::{Appointment, AppointmentStatus},
    chrono_tz::Tz,
    review::{Rating, Review, ReviewStatus},
};

use super::*;

type Sent = Arc<Mutex<Vec<(String, String)>>>;

struct RecordingTransport {
    sent: Sent,
    fail: bool,
}

#[async_trait]
impl NotificationTransport for RecordingTransport {
    async fn send(&self, to: &PhoneNumber, text: &str) -> Result<(), TransportError> {
        if self.fail {
            return Err(TransportError::Api {
                status: 500,
                body: "down".to_owned(),
            });
        }
        self.sent
            .lock()
            .unwrap()
            .push((to.as_str().to_owned(), text.to_owned()));
        Ok(())
    }
}

fn settings(owner_phone: &str) -> BusinessSettings {
    BusinessSettings {
        name: "Beauty Palace".to_owned(),
        location: "Saswad, Pune".to_owned(),
        owner_phone: owner_phone.to_owned(),
        default_country_code: "91".to_owned(),
        timezone: Tz::Asia__Kolkata,
    }
}

fn gateway(owner_phone: &str, fail: bool) -> (NotificationGateway, Sent) {
    let sent = Sent::default();
    let transport = RecordingTransport {
        sent: sent.clone(),
        fail,
    };
    (
        NotificationGateway::new(Arc::new(transport), &settings(owner_phone)),
        sent,
    )
}

fn appointment(phone: Option<&str>) -> AppointmentDetails {
    AppointmentDetails {
        appointment: Appointment {
            id: 3,
            user_id: 1,
            service_id: 1,
            slot: Slot::parse("2024-12-25", "14:30").unwrap(),
            status: AppointmentStatus::Upcoming,
            notes: None,
            created_at: Slot::parse("2024-12-01", "09:00").unwrap().starts_at(),
        },
        user_name: "Asha".to_owned(),
        user_phone: phone.and_then(|p| PhoneNumber::normalize(p, "91")),
        service_name: "Haircut".to_owned(),
        service_duration: 60,
    }
}

fn review(phone: Option<&str>) -> ReviewDetails {
    ReviewDetails {
        review: Review {
            id: 1,
            user_id: 1,
            service_name: "Facial".to_owned(),
            rating: Rating::try_from(5).unwrap(),
            comment: "Great".to_owned(),
            status: ReviewStatus::Pending,
            images: Vec::new(),
            created_at: Slot::parse("2024-12-01", "09:00").unwrap().starts_at(),
        },
        user_name: "Meera".to_owned(),
        user_phone: phone.and_then(|p| PhoneNumber::normalize(p, "91")),
    }
}

#[tokio::test]
async fn confirmation_goes_to_client_and_alert_to_owner() {
    let (gateway, sent) = gateway("+91 90000 00000", false);
    let a = appointment(Some("9876543210"));

    gateway.send_booking_confirmation(&a).await.unwrap();
    gateway.send_owner_alert(&a).await.unwrap();

    let sent = sent.lock().unwrap();
    assert_eq!(sent[0].0, "919876543210");
    assert_eq!(sent[1].0, "919000000000");
}

#[tokio::test]
async fn missing_owner_phone_is_reported() {
    let (gateway, sent) = gateway("", false);

    let result = gateway.send_owner_alert(&appointment(Some("9876543210"))).await;

    assert!(matches!(result, Err(NotificationError::MissingPhone)));
    assert!(sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn client_without_phone_is_not_contacted() {
    let (gateway, sent) = gateway("9000000000", false);

    let result = gateway.send_review_approved(&review(None)).await;

    assert!(matches!(result, Err(NotificationError::MissingPhone)));
    assert!(sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn transport_failure_surfaces_as_error() {
    let (gateway, _) = gateway("9000000000", true);

    let result = gateway
        .send_cancellation(&appointment(Some("9876543210")), Some("Closed"))
        .await;

    assert!(matches!(result, Err(NotificationError::Transport(_))));
}

#[tokio::test]
async fn reminder_channel_delivers_reminder_template() {
    let (gateway, sent) = gateway("9000000000", false);
    let channel: &dyn ReminderDeliveryChannel = &gateway;

    channel
        .send_reminder(&appointment(Some("9876543210")))
        .await
        .unwrap();

    let sent = sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].1.contains("is in 1 hour"));
}

#[tokio::test]
async fn auto_reply_normalizes_sender_and_picks_template() {
    let (gateway, sent) = gateway("9000000000", false);

    let kind = gateway
        .send_auto_reply("919876543210", "Where is your address?", &[])
        .await
        .unwrap();

    assert_eq!(kind, AutoReplyKind::Location);
    assert_eq!(sent.lock().unwrap()[0].0, "919876543210");

    let invalid = gateway.send_auto_reply("not a phone", "hi", &[]).await;
    assert!(matches!(invalid, Err(NotificationError::InvalidPhone(_))));
}

#[tokio::test]
async fn thank_you_mentions_rating() {
    let (gateway, sent) = gateway("9000000000", false);

    gateway
        .send_review_thank_you(&review(Some("9123456780")))
        .await
        .unwrap();

    assert!(sent.lock().unwrap()[0].1.contains("5-star"));
}
