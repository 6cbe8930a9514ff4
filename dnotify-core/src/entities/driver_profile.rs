use sqlx::PgPool;

/// A delivery driver's profile row.
///
/// Only the columns the assignment watcher consults are mapped.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct DriverProfile {
    pub email: String,
    pub fcm_token: Option<String>,
}

impl DriverProfile {
    /// Fetch the unique profile registered under `email`.
    pub async fn get_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            "SELECT email, fcm_token FROM driver_profiles WHERE email = $1 LIMIT 1",
        )
        .bind(email)
        .fetch_optional(pool)
        .await
    }

    /// The registered device token, if the driver has one.
    ///
    /// An empty string in the column counts the same as NULL.
    pub fn device_token(&self) -> Option<&str> {
        match self.fcm_token.as_deref() {
            Some("") | None => None,
            Some(token) => Some(token),
        }
    }
}
