// Session store trait - key/value capability holding the auth token

/// Key under which the backend bearer token is kept.
pub const AUTH_TOKEN_KEY: &str = "token";

pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&self, key: &str, value: String);

    fn remove(&self, key: &str);
}
