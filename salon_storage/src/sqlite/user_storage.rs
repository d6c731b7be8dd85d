mod model;

use model::UserStorageModel;
use salon_models::user::{PhoneNumber, User};
use sqlx::SqliteConnection;

/// Returns the user owning `phone`, inserting one if the phone is unknown.
/// An existing user's name and email are left untouched.
pub(super) async fn resolve_by_phone(
    conn: &mut SqliteConnection,
    name: &str,
    phone: &PhoneNumber,
    email: Option<&str>,
) -> Result<User, sqlx::Error> {
    sqlx::query("INSERT OR IGNORE INTO users (name, phone, email) VALUES (?, ?, ?)")
        .bind(name)
        .bind(phone.as_str())
        .bind(email)
        .execute(&mut *conn)
        .await?;

    let user = sqlx::query_as::<_, UserStorageModel>("SELECT * FROM users WHERE phone = ?")
        .bind(phone.as_str())
        .fetch_one(&mut *conn)
        .await?;

    Ok(user.into())
}

/// Users without a phone are never merged with anyone.
pub(super) async fn create_without_phone(
    conn: &mut SqliteConnection,
    name: &str,
    email: Option<&str>,
) -> Result<User, sqlx::Error> {
    let user = sqlx::query_as::<_, UserStorageModel>(
        "INSERT INTO users (name, email) VALUES (?, ?) RETURNING *",
    )
    .bind(name)
    .bind(email)
    .fetch_one(&mut *conn)
    .await?;

    Ok(user.into())
}
