use serde::Deserialize;
use serde_json::json;

use crate::api::client::{ApiClient, RequestSpec};
use crate::api::error::ApiResult;
use crate::models::{validate_email, validate_password, validate_phone, Membership, Role, Session};

/// 当前用户信息（服务端视角）
#[derive(Debug, Clone, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub role: Role,
    pub email: String,
    #[serde(default)]
    pub membership: Membership,
}

#[derive(Debug, Deserialize)]
struct AuthResponse {
    token: String,
    user: UserProfile,
}

/// 认证服务：登录、注册、当前用户
pub struct AuthService {
    client: ApiClient,
}

impl AuthService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// 登录成功后把会话写入本地存储
    pub async fn sign_in(&self, email: &str, password: &str) -> ApiResult<Session> {
        // 表单验证在本地完成，不合法的输入不发请求
        validate_email(email)?;
        validate_password(password)?;

        let resp: AuthResponse = self
            .client
            .send_json(
                RequestSpec::post("/api/auth/sign-in")
                    .unauthenticated()
                    .json(json!({ "email": email, "password": password })),
            )
            .await?;

        Ok(self.store_session(resp))
    }

    pub async fn sign_up(&self, email: &str, password: &str, phone: &str) -> ApiResult<Session> {
        validate_email(email)?;
        validate_password(password)?;
        validate_phone(phone)?;

        let resp: AuthResponse = self
            .client
            .send_json(
                RequestSpec::post("/api/auth/sign-up")
                    .unauthenticated()
                    .json(json!({ "email": email, "password": password, "phone": phone })),
            )
            .await?;

        Ok(self.store_session(resp))
    }

    /// 以当前 token 查询用户信息（401 会触发强制登出）
    pub async fn current_user(&self) -> ApiResult<UserProfile> {
        self.client
            .send_json(RequestSpec::get("/api/auth/me"))
            .await
    }

    pub fn sign_out(&self) {
        self.client.session().clear();
    }

    fn store_session(&self, resp: AuthResponse) -> Session {
        let session = Session {
            role: resp.user.role,
            email: Some(resp.user.email),
            membership: resp.user.membership,
            token: Some(resp.token),
            saved_at: None,
        };
        if let Err(e) = self.client.session().save(&session) {
            // 持久化失败不阻断登录，本次进程内仍可用
            tracing::warn!("Failed to persist session: {}", e);
        }
        session
    }
}
