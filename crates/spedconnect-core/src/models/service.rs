use serde::{Deserialize, Serialize};

/// A service offered by a provider.
///
/// `rate` is a string in the provider's own list and a number in the public
/// directory, so it is kept as raw JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ServiceDetails {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub description: String,
    pub rate: serde_json::Value,
    pub provider_id: Option<String>,
    pub is_deleted: bool,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl ServiceDetails {
    pub fn rate_display(&self) -> String {
        match &self.rate {
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Null => "-".to_string(),
            other => other.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ServiceInput {
    pub name: String,
    pub description: String,
    pub rate: String,
}

/// One page of the provider's own services.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ServicePage {
    #[serde(rename = "ServiceDetails")]
    pub services: Vec<ServiceDetails>,
    pub total_count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_service_page() {
        let json = r#"{"ServiceDetails":[{"_id":"s1","name":"Speech","description":"1:1","rate":"40"}],"totalCount":1}"#;
        let page: ServicePage = serde_json::from_str(json).expect("service page");
        assert_eq!(page.total_count, 1);
        assert_eq!(page.services[0].rate_display(), "40");
    }

    #[test]
    fn test_rate_display_numeric() {
        let service = ServiceDetails {
            rate: serde_json::json!(55),
            ..Default::default()
        };
        assert_eq!(service.rate_display(), "55");
        assert_eq!(ServiceDetails::default().rate_display(), "-");
    }
}
