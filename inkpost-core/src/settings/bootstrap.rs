use serde::Deserialize;

use crate::utils::secret::MaskedSecret;

/// Staff account ensured at startup so a fresh store can be administered.
#[derive(Debug, Deserialize, Clone, Default)]
#[allow(unused)]
#[readonly::make]
pub struct BootstrapSettings {
    pub admin_username: Option<String>,
    pub admin_password: Option<MaskedSecret>,
    pub admin_email: Option<String>,
    /// Fixed token for the admin account, in addition to tokens issued at login
    pub admin_token: Option<MaskedSecret>,
}

impl BootstrapSettings {
    /// Username and password when both are configured and non-empty.
    pub fn admin_credentials(&self) -> Option<(&str, &MaskedSecret)> {
        let username = self.admin_username.as_deref().filter(|u| !u.trim().is_empty())?;
        let password = self.admin_password.as_ref().filter(|p| !p.is_empty())?;
        Some((username, password))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_credentials_need_both_values() {
        let settings: BootstrapSettings =
            serde_json::from_str(r#"{"admin_username": "root"}"#).unwrap();
        assert!(settings.admin_credentials().is_none());

        let settings: BootstrapSettings =
            serde_json::from_str(r#"{"admin_username": "root", "admin_password": "s3cret"}"#)
                .unwrap();
        let (username, password) = settings.admin_credentials().unwrap();
        assert_eq!(username, "root");
        assert_eq!(password.expose_secret(), "s3cret");
        assert!(settings.admin_token.is_none());
    }
}
