use serde::{Deserialize, Serialize};

/// Response body of the Graph token endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct MockTokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
}

impl MockTokenResponse {
    pub fn new(access_token: &str) -> Self {
        Self {
            access_token: access_token.to_string(),
            token_type: "bearer".to_string(),
            expires_in: 5_183_944,
        }
    }
}

/// Response body of the Graph `/me` endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct MockProfileResponse {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl MockProfileResponse {
    pub fn ann() -> Self {
        Self {
            id: "fb123".to_string(),
            first_name: "Ann".to_string(),
            last_name: "Archer".to_string(),
            email: Some("ann@x.com".to_string()),
        }
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = id.to_string();
        self
    }

    pub fn without_email(mut self) -> Self {
        self.email = None;
        self
    }
}
