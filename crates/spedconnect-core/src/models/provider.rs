use serde::{Deserialize, Serialize};

use super::ServiceDetails;

/// Directory card for a provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProviderSummary {
    #[serde(rename = "_id")]
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub avatar: Option<String>,
    pub occupation: String,
    pub phone_number: String,
    pub address: String,
    pub average_rate: f64,
    pub ratings_count: u64,
}

impl ProviderSummary {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProviderPage {
    pub providers_details: Vec<ProviderSummary>,
    pub total_count: u64,
}

/// Full provider profile shown on the directory details view.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProviderDetails {
    #[serde(rename = "_id")]
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub avatar: Option<String>,
    pub occupation: String,
    pub phone_number: String,
    pub full_address: String,
    pub email: String,
    pub average_rate: f64,
    pub ratings_count: u64,
    pub bio: Option<String>,
    pub insurance_plans: Vec<String>,
    pub services: Vec<ServiceDetails>,
}

impl ProviderDetails {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }
}

/// Rating bucket filter accepted by the directory listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RatingRange {
    #[default]
    All,
    Unrated,
    OneToTwo,
    TwoToThree,
    ThreeToFour,
    FourToFive,
}

impl RatingRange {
    pub fn as_query(&self) -> &'static str {
        match self {
            RatingRange::All => "",
            RatingRange::Unrated => "0",
            RatingRange::OneToTwo => "1-2",
            RatingRange::TwoToThree => "2-3",
            RatingRange::ThreeToFour => "3-4",
            RatingRange::FourToFive => "4-5",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "" | "all" => Some(RatingRange::All),
            "0" => Some(RatingRange::Unrated),
            "1-2" => Some(RatingRange::OneToTwo),
            "2-3" => Some(RatingRange::TwoToThree),
            "3-4" => Some(RatingRange::ThreeToFour),
            "4-5" => Some(RatingRange::FourToFive),
            _ => None,
        }
    }
}

/// Filters for the paginated directory listing.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderQuery {
    pub page: u32,
    pub per_page: u32,
    pub search: String,
    pub rating: RatingRange,
    pub insurance: String,
}

impl Default for ProviderQuery {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: 10,
            search: String::new(),
            rating: RatingRange::All,
            insurance: String::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingInput {
    pub provider_id: String,
    pub rate: u8,
    pub description: String,
}

/// How a directory visitor contacted a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactKind {
    Call,
    Email,
}
