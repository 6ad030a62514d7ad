use serde_json::Value;
use std::collections::HashMap;

pub struct RequestData {
    pub url:     String,
    pub headers: HashMap<&'static str, String>,
    pub body:    Value,
}

impl RequestData {
    pub fn new<T>(url: T, body: Value) -> Self
    where
        T: Into<String>,
    {
        Self {
            url: url.into(),
            headers: Default::default(),
            body,
        }
    }

    /// The suggestion API wants `Token`, not `Bearer`.
    pub fn token_auth<T>(&mut self, key: T)
    where
        T: AsRef<str>,
    {
        self.headers
            .insert("authorization", format!("Token {}", key.as_ref()));
    }

    pub fn secret<T>(&mut self, secret: T)
    where
        T: Into<String>,
    {
        self.headers.insert("x-secret", secret.into());
    }
}
