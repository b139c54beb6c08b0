use serde::{Deserialize, Serialize};

/// One tracked player as listed in the profile links table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileLink {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "UAID")]
    pub uaid: String,
    #[serde(rename = "WTN_Profile")]
    pub profile_url: String,
}

impl ProfileLink {
    pub fn new(
        name: impl Into<String>,
        uaid: impl Into<String>,
        profile_url: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            uaid: uaid.into(),
            profile_url: profile_url.into(),
        }
    }
}
