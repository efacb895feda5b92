use chrono::{Duration, Utc};
use rand::distributions::Alphanumeric;
use rand::Rng;
use tracing::info;
use crate::storage::CookieJar;
use crate::Result;

pub const USER_ID_COOKIE: &str = "userId";
const USER_ID_SUFFIX_LEN: usize = 10;

pub fn user_id_max_age() -> Duration {
    Duration::days(10 * 365)
}

/// Anonymous personalization key: `u` + unix millis + a random alphanumeric suffix.
/// Not a credential; collisions are unlikely but not ruled out.
pub fn generate_user_id() -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(USER_ID_SUFFIX_LEN)
        .map(char::from)
        .collect();
    format!("u{}{}", Utc::now().timestamp_millis(), suffix)
}

/// Return the persisted user id, creating and storing one on first use.
pub async fn user_id(cookies: &dyn CookieJar) -> Result<String> {
    if let Some(id) = cookies.get(USER_ID_COOKIE).await? {
        if !id.is_empty() {
            return Ok(id);
        }
    }

    let id = generate_user_id();
    cookies.set(USER_ID_COOKIE, &id, user_id_max_age()).await?;
    info!("🪪 Created anonymous user id {}", id);
    Ok(id)
}
