use serde::Deserialize;

use crate::moderation::Denylist;

#[derive(Debug, Deserialize, Clone)]
#[allow(unused)]
#[readonly::make]
pub struct ModerationSettings {
    #[serde(default = "default_denylist")]
    pub denylist: Vec<String>,
}

fn default_denylist() -> Vec<String> {
    vec!["badword1".to_string(), "badword2".to_string()]
}

impl Default for ModerationSettings {
    fn default() -> Self {
        ModerationSettings {
            denylist: default_denylist(),
        }
    }
}

impl ModerationSettings {
    pub fn build_denylist(&self) -> Denylist {
        Denylist::new(self.denylist.iter())
    }
}
