use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 用户角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Guest,
    User,
    Supervisor,
}

impl Role {
    pub fn is_supervisor(&self) -> bool {
        matches!(self, Role::Supervisor)
    }
}

/// 订阅等级
///
/// Basic 为付费去广告档，Premium 解锁会员专享内容。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Membership {
    #[default]
    Free,
    Basic,
    Premium,
}

impl Membership {
    /// 是否可以观看 premium 标记的内容
    pub fn unlocks_premium(&self) -> bool {
        matches!(self, Membership::Premium)
    }
}

/// 本地持久化的会话记录
///
/// 不存在或解析失败时一律视为访客，只有带 token 的 API 调用
/// 会向服务端校验（401 即强制登出）。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Session {
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub membership: Membership,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub saved_at: Option<DateTime<Utc>>,
}

impl Session {
    /// 访客会话（无 token、无邮箱）
    pub fn guest() -> Self {
        Self::default()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some() && !matches!(self.role, Role::Guest)
    }
}
