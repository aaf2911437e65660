use serde_json::json;

use crate::api::client::{ApiClient, RequestSpec};
use crate::api::error::ApiResult;

/// 推送通知注册
///
/// 设备 token 由第三方消息 SDK 生成，这里只负责转发给后端，
/// 对本客户端而言是一个不透明的异步调用。
pub struct NotificationService {
    client: ApiClient,
}

impl NotificationService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn register_device_token(&self, device_token: &str) -> ApiResult<()> {
        self.client
            .send_unit(
                RequestSpec::post("/api/notifications/device-token")
                    .json(json!({ "device_token": device_token })),
            )
            .await
    }
}
