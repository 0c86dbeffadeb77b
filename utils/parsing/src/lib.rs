use serde::de::DeserializeOwned; // Trait bound for deserialization

pub struct JsonParser;

// Provide a concrete implementation of from_json for any type that implements
// DeserializeOwned
impl JsonParser {
	pub fn from_json<T: DeserializeOwned>(json_str: &str) -> Result<T, serde_json::Error> {
		serde_json::from_str(json_str)
	}
}
