use serde::{Deserialize, Serialize};

/// Maximum number of coupon codes a subscriber may hold.
pub const MAX_COUPONS: u64 = 50;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Plan {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub price: String,
    pub is_active_plan: bool,
    pub description: Vec<serde_json::Value>,
}

/// The plan the signed-in user is currently subscribed to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ActivePlan {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub price: String,
    pub is_active_plan: bool,
}

impl From<&Plan> for ActivePlan {
    fn from(plan: &Plan) -> Self {
        Self {
            id: plan.id.clone(),
            name: plan.name.clone(),
            kind: plan.kind.clone(),
            price: plan.price.clone(),
            is_active_plan: plan.is_active_plan,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlanOverview {
    #[serde(rename = "transformedArray")]
    pub plans: Vec<Plan>,
    pub active_plan_expiration: Option<String>,
}

impl PlanOverview {
    pub fn active_plan(&self) -> Option<ActivePlan> {
        self.plans.iter().find(|p| p.is_active_plan).map(ActivePlan::from)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Coupon {
    #[serde(rename = "_id")]
    pub id: String,
    pub code: String,
    pub is_active: bool,
    pub expiration: Option<String>,
    pub is_used: bool,
    pub used_by: Option<serde_json::Value>,
    pub plan_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CouponPage {
    #[serde(rename = "CouponsDetails")]
    pub coupons: Vec<Coupon>,
    pub coupon_expiration: Option<String>,
    pub total_count: u64,
}

impl CouponPage {
    /// How many more coupons may be created before hitting [`MAX_COUPONS`].
    pub fn remaining_slots(&self) -> u64 {
        MAX_COUPONS.saturating_sub(self.total_count)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CouponCreate {
    pub count: u64,
    pub plan_id: String,
}
