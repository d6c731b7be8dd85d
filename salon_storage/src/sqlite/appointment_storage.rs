mod model;

use async_trait::async_trait;
use model::AppointmentStorageModel;
use salon_models::appointment::{AppointmentDetails, AppointmentId, AppointmentStatus, Slot};
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};

use super::user_storage;
use crate::{
    AppointmentFilter, AppointmentStorage, NewBooking, StatusChange, StorageError,
    error::map_slot_violation,
};

const SELECT_DETAILS: &str = "
SELECT a.id, a.user_id, a.service_id, a.appointment_date, a.appointment_time,
       a.status, a.notes, a.created_at,
       u.name AS user_name, u.phone AS user_phone,
       s.name AS service_name, s.duration AS service_duration
FROM appointments a
JOIN users u ON u.id = a.user_id
JOIN services s ON s.id = a.service_id";

pub struct SqliteAppointmentStorage {
    pool: SqlitePool,
}

impl SqliteAppointmentStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

async fn fetch_details(
    conn: &mut SqliteConnection,
    id: AppointmentId,
) -> Result<Option<AppointmentDetails>, StorageError> {
    let row = sqlx::query_as::<_, AppointmentStorageModel>(&format!(
        "{SELECT_DETAILS} WHERE a.id = ?"
    ))
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    row.map(TryInto::try_into).transpose()
}

/// Whether an upcoming appointment other than `except` occupies `slot`.
async fn slot_taken(
    conn: &mut SqliteConnection,
    slot: &Slot,
    except: Option<AppointmentId>,
) -> Result<bool, StorageError> {
    let taken = sqlx::query_scalar::<_, i64>(
        "SELECT id FROM appointments
         WHERE appointment_date = ? AND appointment_time = ? AND status = 'upcoming'
           AND id != ?
         LIMIT 1",
    )
    .bind(slot.date)
    .bind(slot.time)
    .bind(except.unwrap_or(-1))
    .fetch_optional(&mut *conn)
    .await?;

    Ok(taken.is_some())
}

#[async_trait]
impl AppointmentStorage for SqliteAppointmentStorage {
    async fn book(&self, booking: NewBooking) -> Result<AppointmentDetails, StorageError> {
        let NewBooking {
            name,
            phone,
            email,
            service_id,
            slot,
            notes,
        } = booking;

        let mut tx = self.pool.begin().await?;

        let service_active = sqlx::query_scalar::<_, i64>(
            "SELECT id FROM services WHERE id = ? AND is_active = 1",
        )
        .bind(service_id)
        .fetch_optional(&mut *tx)
        .await?;
        if service_active.is_none() {
            return Err(StorageError::not_found("service", service_id));
        }

        if slot_taken(&mut tx, &slot, None).await? {
            return Err(StorageError::slot_taken());
        }

        let user = user_storage::resolve_by_phone(&mut tx, &name, &phone, email.as_deref()).await?;

        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO appointments (user_id, service_id, appointment_date, appointment_time, status, notes)
             VALUES (?, ?, ?, ?, ?, ?)
             RETURNING id",
        )
        .bind(user.id)
        .bind(service_id)
        .bind(slot.date)
        .bind(slot.time)
        .bind(AppointmentStatus::Upcoming.as_str())
        .bind(notes)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_slot_violation)?;

        let details = fetch_details(&mut tx, id)
            .await?
            .ok_or_else(|| StorageError::not_found("appointment", id))?;

        tx.commit().await?;
        log::info!(
            "Appointment booked. [appointment_id = {}, slot = {}, user_id = {}]",
            id,
            slot,
            user.id
        );

        Ok(details)
    }

    async fn get(&self, id: AppointmentId) -> Result<Option<AppointmentDetails>, StorageError> {
        let mut conn = self.pool.acquire().await?;
        fetch_details(&mut conn, id).await
    }

    async fn list(
        &self,
        filter: &AppointmentFilter,
    ) -> Result<Vec<AppointmentDetails>, StorageError> {
        let mut query = QueryBuilder::<Sqlite>::new(SELECT_DETAILS);
        query.push(" WHERE 1 = 1");

        if let Some(date) = filter.date {
            query.push(" AND a.appointment_date = ").push_bind(date);
        }
        if let Some(service_id) = filter.service_id {
            query.push(" AND a.service_id = ").push_bind(service_id);
        }
        if let Some(status) = filter.status {
            query.push(" AND a.status = ").push_bind(status.as_str());
        }
        if let Some(phone) = &filter.phone {
            query.push(" AND u.phone = ").push_bind(phone.as_str().to_owned());
        }

        query.push(" ORDER BY a.appointment_date ASC, a.appointment_time ASC, a.id ASC");

        let rows = query
            .build_query_as::<AppointmentStorageModel>()
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn set_status(
        &self,
        id: AppointmentId,
        status: AppointmentStatus,
    ) -> Result<StatusChange, StorageError> {
        let mut tx = self.pool.begin().await?;

        let current = fetch_details(&mut tx, id)
            .await?
            .ok_or_else(|| StorageError::not_found("appointment", id))?;
        let previous = current.appointment.status;

        if !previous.can_transition_to(status) {
            return Err(StorageError::InvalidTransition {
                from: previous,
                to: status,
            });
        }

        if status == AppointmentStatus::Upcoming
            && previous != AppointmentStatus::Upcoming
            && slot_taken(&mut tx, &current.slot(), Some(id)).await?
        {
            return Err(StorageError::slot_taken());
        }

        // Only one writer may observe `previous`.
        let updated =
            sqlx::query("UPDATE appointments SET status = ? WHERE id = ? AND status = ?")
                .bind(status.as_str())
                .bind(id)
                .bind(previous.as_str())
                .execute(&mut *tx)
                .await
                .map_err(map_slot_violation)?;
        if updated.rows_affected() == 0 {
            return Err(StorageError::Conflict(format!(
                "appointment {id} was changed concurrently"
            )));
        }

        let appointment = fetch_details(&mut tx, id)
            .await?
            .ok_or_else(|| StorageError::not_found("appointment", id))?;

        tx.commit().await?;

        Ok(StatusChange {
            appointment,
            previous,
        })
    }

    async fn reschedule(
        &self,
        id: AppointmentId,
        slot: Slot,
    ) -> Result<AppointmentDetails, StorageError> {
        let mut tx = self.pool.begin().await?;

        if fetch_details(&mut tx, id).await?.is_none() {
            return Err(StorageError::not_found("appointment", id));
        }

        if slot_taken(&mut tx, &slot, Some(id)).await? {
            return Err(StorageError::slot_taken());
        }

        sqlx::query(
            "UPDATE appointments SET appointment_date = ?, appointment_time = ? WHERE id = ?",
        )
        .bind(slot.date)
        .bind(slot.time)
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(map_slot_violation)?;

        let updated = fetch_details(&mut tx, id)
            .await?
            .ok_or_else(|| StorageError::not_found("appointment", id))?;

        tx.commit().await?;

        Ok(updated)
    }
}
