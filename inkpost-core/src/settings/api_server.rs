use serde::{Deserialize, Deserializer};

#[derive(Debug, Deserialize, Clone)]
#[allow(unused)]
#[readonly::make]
pub struct ApiServer {
    pub bind_address: String,
    /// Upper bound for request bodies, accepts `K`, `M` and `G` suffixes
    #[serde(deserialize_with = "deserialize_bytes")]
    pub body_limit: usize,
    /// bcrypt work factor for stored credentials
    #[serde(default = "default_password_hash_cost")]
    pub password_hash_cost: u32,
    #[serde(default)]
    pub cors_allowed_origins: Vec<String>,
}

fn default_password_hash_cost() -> u32 {
    12
}

impl Default for ApiServer {
    fn default() -> Self {
        ApiServer {
            bind_address: "0.0.0.0:8000".to_string(),
            body_limit: 1024 * 1024,
            password_hash_cost: default_password_hash_cost(),
            cors_allowed_origins: Vec::new(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ByteSize {
    Number(usize),
    Text(String),
}

fn deserialize_bytes<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    let s = match ByteSize::deserialize(deserializer)? {
        ByteSize::Number(n) => return Ok(n),
        ByteSize::Text(s) => s.trim().to_uppercase(),
    };

    let (num_part, multiplier) = match s.chars().last() {
        Some('G') => (&s[..s.len() - 1], 1_024 * 1_024 * 1_024),
        Some('M') => (&s[..s.len() - 1], 1_024 * 1_024),
        Some('K') => (&s[..s.len() - 1], 1_024),
        _ => (s.as_str(), 1),
    };

    let num: usize = num_part.trim().parse().map_err(serde::de::Error::custom)?;
    Ok(num * multiplier)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_limit_suffixes() {
        let api: ApiServer =
            serde_json::from_str(r#"{"bind_address": "127.0.0.1:1", "body_limit": "2M"}"#).unwrap();
        assert_eq!(api.body_limit, 2 * 1024 * 1024);
        assert_eq!(api.password_hash_cost, 12);

        let api: ApiServer =
            serde_json::from_str(r#"{"bind_address": "127.0.0.1:1", "body_limit": 512}"#).unwrap();
        assert_eq!(api.body_limit, 512);
    }

    #[test]
    fn test_invalid_body_limit() {
        let result: Result<ApiServer, _> =
            serde_json::from_str(r#"{"bind_address": "127.0.0.1:1", "body_limit": "lots"}"#);
        assert!(result.is_err());
    }
}
