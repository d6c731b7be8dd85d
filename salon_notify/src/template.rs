//! Message bodies. Rendering is pure: a [`Notification`] plus the business
//! profile in, text out.

use std::fmt::Write;

use chrono::{NaiveDate, NaiveTime};
use salon_models::{
    appointment::{AppointmentDetails, Slot},
    review::Rating,
    service::Service,
    settings::BusinessSettings,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Business {
    pub name: String,
    pub location: String,
}

impl From<&BusinessSettings> for Business {
    fn from(settings: &BusinessSettings) -> Self {
        Self {
            name: settings.name.clone(),
            location: settings.location.clone(),
        }
    }
}

/// Canned replies to inbound WhatsApp messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoReplyKind {
    Booking,
    Pricing,
    Location,
    Welcome,
}

impl AutoReplyKind {
    /// Keyword routing, first match wins.
    pub fn for_message(text: &str) -> Self {
        let text = text.to_lowercase();
        let mentions = |words: &[&str]| words.iter().any(|w| text.contains(w));

        if mentions(&["book", "appointment"]) {
            AutoReplyKind::Booking
        } else if mentions(&["price", "cost"]) {
            AutoReplyKind::Pricing
        } else if mentions(&["location", "address"]) {
            AutoReplyKind::Location
        } else {
            AutoReplyKind::Welcome
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Notification<'a> {
    BookingConfirmation(&'a AppointmentDetails),
    OwnerAlert(&'a AppointmentDetails),
    Reminder(&'a AppointmentDetails),
    Cancellation {
        appointment: &'a AppointmentDetails,
        reason: Option<&'a str>,
    },
    Rescheduled {
        appointment: &'a AppointmentDetails,
        previous: Slot,
    },
    ReviewThankYou {
        name: &'a str,
        rating: Rating,
    },
    ReviewApproved {
        name: &'a str,
    },
    AutoReply {
        kind: AutoReplyKind,
        services: &'a [Service],
    },
}

impl Notification<'_> {
    pub fn kind(&self) -> &'static str {
        match self {
            Notification::BookingConfirmation(_) => "booking_confirmation",
            Notification::OwnerAlert(_) => "owner_alert",
            Notification::Reminder(_) => "reminder",
            Notification::Cancellation { .. } => "cancellation",
            Notification::Rescheduled { .. } => "rescheduled",
            Notification::ReviewThankYou { .. } => "review_thank_you",
            Notification::ReviewApproved { .. } => "review_approved",
            Notification::AutoReply { .. } => "auto_reply",
        }
    }
}

pub const REVIEW_THANK_YOU_DISCOUNT: u8 = 10;
pub const REVIEW_APPROVED_DISCOUNT: u8 = 15;

fn long_date(date: NaiveDate) -> String {
    date.format("%A, %B %d, %Y").to_string()
}

fn twelve_hour(time: NaiveTime) -> String {
    time.format("%I:%M %p").to_string()
}

fn signature(business: &Business) -> String {
    format!("*{} Team*", business.name)
}

pub fn render(notification: &Notification<'_>, business: &Business) -> String {
    // Writing into a String never fails.
    let mut out = String::new();
    let _ = write_notification(&mut out, notification, business);
    out
}

fn write_notification(
    out: &mut String,
    notification: &Notification<'_>,
    business: &Business,
) -> std::fmt::Result {
    match *notification {
        Notification::BookingConfirmation(a) => {
            writeln!(out, "*{} Booking Confirmed!*\n", business.name)?;
            writeln!(out, "Hello {}!\n", a.user_name)?;
            writeln!(out, "Your appointment has been successfully booked:\n")?;
            write_slot(out, a.slot())?;
            writeln!(out, "*Service:* {}", a.service_name)?;
            writeln!(out, "*Duration:* {} minutes\n", a.service_duration)?;
            writeln!(out, "*Location:* {}\n", business.location)?;
            writeln!(out, "*Important Notes:*")?;
            writeln!(out, "• Please arrive 10 minutes early")?;
            writeln!(out, "• Cancellations must be made 24 hours in advance")?;
            writeln!(out, "• You'll receive a reminder 1 hour before your appointment\n")?;
            write!(out, "{}", signature(business))
        }
        Notification::OwnerAlert(a) => {
            writeln!(out, "*NEW BOOKING ALERT!*\n")?;
            writeln!(out, "*Client Details:*")?;
            writeln!(out, "Name: {}", a.user_name)?;
            if let Some(phone) = &a.user_phone {
                writeln!(out, "Phone: {phone}")?;
            }
            writeln!(out, "\n*Appointment Details:*")?;
            writeln!(out, "Service: {}", a.service_name)?;
            writeln!(out, "Date: {}", long_date(a.slot().date))?;
            writeln!(out, "Time: {}", twelve_hour(a.slot().time))?;
            writeln!(out, "Duration: {} minutes", a.service_duration)?;
            if let Some(notes) = a.appointment.notes.as_deref().filter(|n| !n.is_empty()) {
                writeln!(out, "Notes: {notes}")?;
            }
            write!(out, "\n*{} Admin*", business.name)
        }
        Notification::Reminder(a) => {
            writeln!(out, "*Appointment Reminder*\n")?;
            writeln!(out, "Hello {}!\n", a.user_name)?;
            writeln!(
                out,
                "This is a friendly reminder that your appointment at *{}* is in 1 hour:\n",
                business.name
            )?;
            writeln!(out, "*Service:* {}", a.service_name)?;
            write_slot(out, a.slot())?;
            writeln!(out, "\n*Address:* {}\n", business.location)?;
            writeln!(out, "Please arrive 10 minutes early. Looking forward to seeing you!\n")?;
            write!(out, "{}", signature(business))
        }
        Notification::Cancellation {
            appointment: a,
            reason,
        } => {
            writeln!(out, "*Appointment Cancelled*\n")?;
            writeln!(out, "Hello {},\n", a.user_name)?;
            writeln!(out, "We regret to inform you that your appointment has been cancelled:\n")?;
            writeln!(out, "*Service:* {}", a.service_name)?;
            write_slot(out, a.slot())?;
            if let Some(reason) = reason.filter(|r| !r.trim().is_empty()) {
                writeln!(out, "\n*Reason:* {}", reason.trim())?;
            }
            writeln!(out, "\nReply to this message or book online to pick a new time.")?;
            writeln!(out, "We apologize for any inconvenience.\n")?;
            write!(out, "{}", signature(business))
        }
        Notification::Rescheduled {
            appointment: a,
            previous,
        } => {
            writeln!(out, "*Appointment Rescheduled*\n")?;
            writeln!(out, "Hello {}!\n", a.user_name)?;
            writeln!(out, "Your appointment has been rescheduled:\n")?;
            writeln!(out, "*Previous:*")?;
            write_slot(out, previous)?;
            writeln!(out, "\n*New Schedule:*")?;
            write_slot(out, a.slot())?;
            writeln!(out, "*Service:* {}\n", a.service_name)?;
            writeln!(out, "Looking forward to seeing you!\n")?;
            write!(out, "{}", signature(business))
        }
        Notification::ReviewThankYou { name, rating } => {
            writeln!(out, "*Thank You for Your Review!*\n")?;
            writeln!(out, "Dear {name},\n")?;
            writeln!(
                out,
                "Thank you for sharing your experience with us! Your {}-star review means the world to our team.\n",
                rating.value()
            )?;
            writeln!(
                out,
                "*Special Offer:* Get {REVIEW_THANK_YOU_DISCOUNT}% off your next appointment as a thank you!\n"
            )?;
            write!(out, "{}", signature(business))
        }
        Notification::ReviewApproved { name } => {
            writeln!(out, "*Review Approved!*\n")?;
            writeln!(out, "Hello {name}!\n")?;
            writeln!(
                out,
                "Great news! Your review is now live. Thank you for sharing your experience with {}.\n",
                business.name
            )?;
            writeln!(
                out,
                "*Special Offer:* Enjoy {REVIEW_APPROVED_DISCOUNT}% off your next appointment as a thank you!\n"
            )?;
            write!(out, "{}", signature(business))
        }
        Notification::AutoReply { kind, services } => write_auto_reply(out, kind, services, business),
    }
}

fn write_slot(out: &mut String, slot: Slot) -> std::fmt::Result {
    writeln!(out, "*Date:* {}", long_date(slot.date))?;
    writeln!(out, "*Time:* {}", twelve_hour(slot.time))
}

fn write_auto_reply(
    out: &mut String,
    kind: AutoReplyKind,
    services: &[Service],
    business: &Business,
) -> std::fmt::Result {
    match kind {
        AutoReplyKind::Booking => {
            writeln!(out, "*Book Your Appointment*\n")?;
            writeln!(out, "Thank you for your interest! Book on our website or send us your preferred date and time.\n")?;
            if !services.is_empty() {
                writeln!(out, "*Available Services:*")?;
                for service in services {
                    writeln!(out, "• {}", service.name)?;
                }
                writeln!(out)?;
            }
        }
        AutoReplyKind::Pricing => {
            writeln!(out, "*Our Service Prices*\n")?;
            for service in services {
                writeln!(
                    out,
                    "• *{}:* ₹{:.0} ({} min)",
                    service.name, service.price, service.duration
                )?;
            }
            if !services.is_empty() {
                writeln!(out)?;
            }
            writeln!(out, "Prices vary based on specific requirements.\n")?;
        }
        AutoReplyKind::Location => {
            writeln!(out, "*{} Location*\n", business.name)?;
            writeln!(out, "*Address:*\n{}\n", business.location)?;
            writeln!(out, "See you soon!\n")?;
        }
        AutoReplyKind::Welcome => {
            writeln!(out, "*Welcome to {}!*\n", business.name)?;
            writeln!(out, "Thank you for contacting us!\n")?;
            writeln!(out, "*Quick Help:*")?;
            writeln!(out, "Type \"book\" for appointment booking")?;
            writeln!(out, "Type \"price\" for service pricing")?;
            writeln!(out, "Type \"location\" for our address\n")?;
            writeln!(out, "Our team will respond shortly!\n")?;
        }
    }

    write!(out, "{}", signature(business))
}
