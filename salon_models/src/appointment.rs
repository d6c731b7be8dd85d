use std::{fmt, str::FromStr};

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Timelike};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    service::ServiceId,
    user::{PhoneNumber, UserId},
};

pub type AppointmentId = i64;

/// How long before the appointment the reminder goes out.
pub const REMINDER_LEAD_MINUTES: i64 = 60;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Upcoming,
    Completed,
    Cancelled,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid status: {0}")]
pub struct ParseStatusError(pub String);

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Upcoming => "upcoming",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Cancelled => "cancelled",
        }
    }

    /// `Completed` is terminal. Staying in the same status is always allowed.
    pub fn can_transition_to(self, next: AppointmentStatus) -> bool {
        self == next || self != AppointmentStatus::Completed
    }
}

impl FromStr for AppointmentStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "upcoming" => Ok(AppointmentStatus::Upcoming),
            "completed" => Ok(AppointmentStatus::Completed),
            "cancelled" => Ok(AppointmentStatus::Cancelled),
            other => Err(ParseStatusError(other.to_owned())),
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SlotParseError {
    #[error("appointment_date must be YYYY-MM-DD, got {0:?}")]
    Date(String),
    #[error("appointment_time must be HH:MM, got {0:?}")]
    Time(String),
}

/// The `(date, time)` pair an appointment occupies. Minute precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Slot {
    #[serde(rename = "appointment_date")]
    pub date: NaiveDate,
    #[serde(rename = "appointment_time", with = "hh_mm")]
    pub time: NaiveTime,
}

impl Slot {
    pub fn new(date: NaiveDate, time: NaiveTime) -> Self {
        let time = time
            .with_second(0)
            .and_then(|t| t.with_nanosecond(0))
            .unwrap_or(time);
        Self { date, time }
    }

    pub fn parse(date: &str, time: &str) -> Result<Self, SlotParseError> {
        let date = NaiveDate::parse_from_str(date.trim(), DATE_FORMAT)
            .map_err(|_| SlotParseError::Date(date.to_owned()))?;
        let time = hh_mm::parse(time.trim()).ok_or_else(|| SlotParseError::Time(time.to_owned()))?;

        Ok(Self::new(date, time))
    }

    pub fn starts_at(&self) -> NaiveDateTime {
        self.date.and_time(self.time)
    }

    pub fn reminder_at(&self) -> NaiveDateTime {
        self.starts_at() - TimeDelta::minutes(REMINDER_LEAD_MINUTES)
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}",
            self.date.format(DATE_FORMAT),
            self.time.format(TIME_FORMAT)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Appointment {
    pub id: AppointmentId,
    pub user_id: UserId,
    pub service_id: ServiceId,
    #[serde(flatten)]
    pub slot: Slot,
    pub status: AppointmentStatus,
    pub notes: Option<String>,
    /// UTC, unlike the business-local slot and clock times.
    pub created_at: NaiveDateTime,
}

/// An appointment joined with the client and service it refers to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppointmentDetails {
    #[serde(flatten)]
    pub appointment: Appointment,
    pub user_name: String,
    pub user_phone: Option<PhoneNumber>,
    pub service_name: String,
    pub service_duration: i64,
}

impl AppointmentDetails {
    pub fn id(&self) -> AppointmentId {
        self.appointment.id
    }

    pub fn slot(&self) -> Slot {
        self.appointment.slot
    }

    pub fn is_upcoming(&self) -> bool {
        self.appointment.status == AppointmentStatus::Upcoming
    }
}

pub mod hh_mm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    use super::TIME_FORMAT;

    pub fn parse(value: &str) -> Option<NaiveTime> {
        NaiveTime::parse_from_str(value, TIME_FORMAT)
            .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
            .ok()
    }

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&time.format(TIME_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let value = String::deserialize(deserializer)?;
        parse(&value).ok_or_else(|| D::Error::custom(format!("invalid time {value:?}")))
    }
}
