use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;

use crate::api::client::{ApiClient, RequestSpec};
use crate::api::error::ApiResult;
use crate::models::Membership;

/// 订阅状态（只读查询，浏览控制器据此做会员内容判定）
#[derive(Debug, Clone, Deserialize)]
pub struct SubscriptionStatus {
    #[serde(default)]
    pub membership: Membership,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

/// 支付网关的跳转信息；结账流程本身由网关页面完成
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutRedirect {
    pub payment_url: String,
    #[serde(default)]
    pub reference: Option<String>,
}

/// 订阅服务：状态查询、发起订阅、支付回调核验
pub struct SubscriptionService {
    client: ApiClient,
}

impl SubscriptionService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn status(&self) -> ApiResult<SubscriptionStatus> {
        self.client
            .send_json(RequestSpec::get("/api/subscription"))
            .await
    }

    /// 发起订阅，返回支付网关跳转地址
    pub async fn create(&self, tier: Membership) -> ApiResult<CheckoutRedirect> {
        self.client
            .send_json(RequestSpec::post("/api/subscription").json(json!({ "tier": tier })))
            .await
    }

    /// 支付完成后按网关回传的 reference 核验，
    /// 核验通过时同步本地会话里的订阅等级
    pub async fn verify(&self, reference: &str) -> ApiResult<SubscriptionStatus> {
        let status: SubscriptionStatus = self
            .client
            .send_json(
                RequestSpec::post("/api/subscription/verify")
                    .json(json!({ "reference": reference })),
            )
            .await?;

        if status.active {
            let mut session = self.client.session().current();
            if session.membership != status.membership {
                session.membership = status.membership;
                if let Err(e) = self.client.session().save(&session) {
                    tracing::warn!("Failed to update stored membership: {}", e);
                }
            }
        }
        Ok(status)
    }
}
