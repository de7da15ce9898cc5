use serde::de::{DeserializeOwned, Deserializer, Error as _};
use serde::Deserialize;
use serde_json::Value;

/// An unwrapped response payload.
///
/// Most endpoints answer `{"result": T, "message": "..."}` inside `data`;
/// some return `T` directly. Both shapes deserialize into `Payload<T>`.
#[derive(Debug, Clone, PartialEq)]
pub struct Payload<T> {
    pub result: T,
    pub message: Option<String>,
}

impl<T> Payload<T> {
    pub fn into_result(self) -> T {
        self.result
    }

    /// The server's message, or `fallback` when it sent none.
    pub fn message_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.message.as_deref().filter(|m| !m.is_empty()).unwrap_or(fallback)
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for Payload<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut value = Value::deserialize(deserializer)?;
        let message = value
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string);
        let result = match value.as_object_mut().and_then(|obj| obj.remove("result")) {
            Some(result) => result,
            None => value,
        };
        let result = T::deserialize(result).map_err(D::Error::custom)?;
        Ok(Self { result, message })
    }
}
