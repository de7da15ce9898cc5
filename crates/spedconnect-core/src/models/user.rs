use serde::{Deserialize, Serialize};

/// A select-box style `{value, label}` pair used for country/state/city.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub label: String,
}

/// The signed-in account as returned by login, sign-up and social sign-in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LoginDetails {
    #[serde(rename = "_id")]
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub address: String,
    pub country: Location,
    pub state: Location,
    pub city: Location,
    pub zip_code: String,
    pub occupation: String,
    pub insurance_plans: Vec<String>,
    pub role: String,
    pub is_deleted: bool,
    pub is_subscribed: bool,
    pub token: String,
    pub avatar: Option<String>,
    pub bio: Option<String>,
}

impl LoginDetails {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub phone_number: String,
    pub address: String,
    pub zip_code: String,
    pub occupation: String,
    pub insurance_plans: Option<Vec<String>>,
    pub country: String,
    pub state: String,
    pub city: String,
}

/// Identity obtained from the social provider, forwarded to the backend.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialSignInRequest {
    pub id: String,
    pub email: String,
    #[serde(rename = "verified_email")]
    pub verified_email: bool,
    pub name: String,
    pub social_type: String,
}

/// Partial profile update; unset fields are left out of the request body.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zip_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insurance_plans: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
}

/// Entry of the insurance or occupation pick lists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NamedOption {
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_login_details() {
        let json = r#"{"_id":"u1","firstName":"Ada","lastName":"Lovelace","email":"ada@example.com",
            "country":{"value":"US","label":"United States"},"insurancePlans":["Aetna"],
            "role":"provider","isSubscribed":true,"token":"abc123","avatar":null}"#;
        let details: LoginDetails = serde_json::from_str(json).expect("login details");
        assert_eq!(details.id, "u1");
        assert_eq!(details.full_name(), "Ada Lovelace");
        assert_eq!(details.country.label, "United States");
        assert_eq!(details.state, Location::default());
        assert!(details.is_subscribed);
        assert_eq!(details.token, "abc123");
        assert_eq!(details.avatar, None);
    }

    #[test]
    fn test_profile_update_skips_unset_fields() {
        let update = ProfileUpdate {
            bio: Some("Speech therapist".into()),
            ..Default::default()
        };
        let value = serde_json::to_value(&update).expect("serialize");
        assert_eq!(value, serde_json::json!({"bio": "Speech therapist"}));
    }

    #[test]
    fn test_social_sign_in_field_names() {
        let request = SocialSignInRequest {
            id: "g-1".into(),
            email: "a@b.c".into(),
            verified_email: true,
            name: "A".into(),
            social_type: "google".into(),
        };
        let value = serde_json::to_value(&request).expect("serialize");
        assert_eq!(value["verified_email"], true);
        assert_eq!(value["socialType"], "google");
    }
}
