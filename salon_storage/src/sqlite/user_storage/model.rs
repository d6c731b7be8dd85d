use salon_models::{
    chrono::NaiveDateTime,
    user::{PhoneNumber, User},
};

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserStorageModel {
    pub id: i64,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub is_admin: bool,
    pub created_at: NaiveDateTime,
}

impl From<UserStorageModel> for User {
    fn from(value: UserStorageModel) -> Self {
        Self {
            id: value.id,
            name: value.name,
            phone: value.phone.map(PhoneNumber::from_normalized),
            email: value.email,
            is_admin: value.is_admin,
            created_at: value.created_at,
        }
    }
}
