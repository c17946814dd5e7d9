//! Secret values loaded from configuration, zeroized on drop and never printed.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer};

#[derive(Clone)]
pub struct MaskedSecret(SecretString);

impl MaskedSecret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(SecretString::new(value.into().into_boxed_str()))
    }

    /// Only call this where the plain value is compared or hashed.
    pub fn expose_secret(&self) -> &str {
        self.0.expose_secret()
    }

    pub fn is_empty(&self) -> bool {
        self.0.expose_secret().is_empty()
    }
}

/// Keeps the last two characters visible for values long enough to survive it.
fn mask(value: &str) -> String {
    let len = value.chars().count();
    let visible = if len >= 12 { 2 } else { 0 };
    value
        .chars()
        .enumerate()
        .map(|(i, c)| if i < len - visible { '*' } else { c })
        .collect()
}

impl std::fmt::Debug for MaskedSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "\"{}\"", mask(self.0.expose_secret()))
    }
}

impl<'de> Deserialize<'de> for MaskedSecret {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Ok(MaskedSecret::new(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_output_hides_value() {
        let secret = MaskedSecret::new("pass");
        assert_eq!(format!("{secret:?}"), "\"****\"");

        let secret = MaskedSecret::new("a-much-longer-token");
        let debug_output = format!("{secret:?}");
        assert!(!debug_output.contains("longer"));
        assert!(debug_output.ends_with("en\""));
    }

    #[test]
    fn test_deserialization_keeps_full_value() {
        let secret: MaskedSecret = serde_json::from_str("\"hunter2\"").unwrap();
        assert_eq!(secret.expose_secret(), "hunter2");
        assert!(!secret.is_empty());
    }
}
