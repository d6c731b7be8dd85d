use std::sync::Arc;

use async_trait::async_trait;
use salon_models::{
    appointment::{AppointmentDetails, Slot},
    review::ReviewDetails,
    service::Service,
    settings::BusinessSettings,
    user::PhoneNumber,
};
use salon_scheduler::ReminderDeliveryChannel;
use thiserror::Error;

use crate::{
    AutoReplyKind, Business, Notification, NotificationTransport, TransportError,
    template::render,
};

#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("No phone number on file")]
    MissingPhone,

    #[error("Not a usable phone number: {0:?}")]
    InvalidPhone(String),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Renders notifications and hands them to the configured transport.
pub struct NotificationGateway {
    transport: Arc<dyn NotificationTransport>,
    business: Business,
    owner_phone: Option<PhoneNumber>,
    default_country_code: String,
}

impl NotificationGateway {
    pub fn new(transport: Arc<dyn NotificationTransport>, settings: &BusinessSettings) -> Self {
        let owner_phone = PhoneNumber::normalize(&settings.owner_phone, &settings.default_country_code);
        if owner_phone.is_none() {
            log::warn!("Owner phone is not configured, booking alerts will not be delivered.");
        }

        Self {
            transport,
            business: Business::from(settings),
            owner_phone,
            default_country_code: settings.default_country_code.clone(),
        }
    }

    pub fn business(&self) -> &Business {
        &self.business
    }

    pub fn normalize_phone(&self, raw: &str) -> Option<PhoneNumber> {
        PhoneNumber::normalize(raw, &self.default_country_code)
    }

    async fn deliver(
        &self,
        to: Option<&PhoneNumber>,
        notification: Notification<'_>,
    ) -> Result<(), NotificationError> {
        let to = to.ok_or(NotificationError::MissingPhone)?;
        let text = render(&notification, &self.business);

        self.transport.send(to, &text).await?;
        log::info!(
            "Notification sent. [kind = {}, to = {}]",
            notification.kind(),
            to
        );

        Ok(())
    }

    pub async fn send_booking_confirmation(
        &self,
        appointment: &AppointmentDetails,
    ) -> Result<(), NotificationError> {
        self.deliver(
            appointment.user_phone.as_ref(),
            Notification::BookingConfirmation(appointment),
        )
        .await
    }

    pub async fn send_owner_alert(
        &self,
        appointment: &AppointmentDetails,
    ) -> Result<(), NotificationError> {
        self.deliver(
            self.owner_phone.as_ref(),
            Notification::OwnerAlert(appointment),
        )
        .await
    }

    pub async fn send_appointment_reminder(
        &self,
        appointment: &AppointmentDetails,
    ) -> Result<(), NotificationError> {
        self.deliver(
            appointment.user_phone.as_ref(),
            Notification::Reminder(appointment),
        )
        .await
    }

    pub async fn send_cancellation(
        &self,
        appointment: &AppointmentDetails,
        reason: Option<&str>,
    ) -> Result<(), NotificationError> {
        self.deliver(
            appointment.user_phone.as_ref(),
            Notification::Cancellation {
                appointment,
                reason,
            },
        )
        .await
    }

    pub async fn send_reschedule(
        &self,
        appointment: &AppointmentDetails,
        previous: Slot,
    ) -> Result<(), NotificationError> {
        self.deliver(
            appointment.user_phone.as_ref(),
            Notification::Rescheduled {
                appointment,
                previous,
            },
        )
        .await
    }

    pub async fn send_review_thank_you(
        &self,
        review: &ReviewDetails,
    ) -> Result<(), NotificationError> {
        self.deliver(
            review.user_phone.as_ref(),
            Notification::ReviewThankYou {
                name: &review.user_name,
                rating: review.review.rating,
            },
        )
        .await
    }

    pub async fn send_review_approved(
        &self,
        review: &ReviewDetails,
    ) -> Result<(), NotificationError> {
        self.deliver(
            review.user_phone.as_ref(),
            Notification::ReviewApproved {
                name: &review.user_name,
            },
        )
        .await
    }

    /// Answers an inbound message. `from` is the sender as reported by the
    /// messaging platform and is normalized here.
    pub async fn send_auto_reply(
        &self,
        from: &str,
        message: &str,
        services: &[Service],
    ) -> Result<AutoReplyKind, NotificationError> {
        let to = self
            .normalize_phone(from)
            .ok_or_else(|| NotificationError::InvalidPhone(from.to_owned()))?;
        let kind = AutoReplyKind::for_message(message);

        self.deliver(Some(&to), Notification::AutoReply { kind, services })
            .await?;

        Ok(kind)
    }
}

#[async_trait]
impl ReminderDeliveryChannel for NotificationGateway {
    async fn send_reminder(&self, appointment: &AppointmentDetails) -> anyhow::Result<()> {
        self.send_appointment_reminder(appointment).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests;
