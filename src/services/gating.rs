use crate::models::{Movie, Session};

/// 打开条目的访问判定结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    /// 可以进入详情页
    Granted,
    /// 订阅等级不足，改为跳转升级路径
    UpgradeRequired { upgrade_url: String },
}

/// 会员内容的访问策略
///
/// premium 条目只对 Premium 订阅开放，判定集中在这里，
/// 调整档位策略时只改这一处。
#[derive(Debug, Clone)]
pub struct AccessPolicy {
    upgrade_url: String,
}

impl AccessPolicy {
    pub fn new(upgrade_url: impl Into<String>) -> Self {
        Self {
            upgrade_url: upgrade_url.into(),
        }
    }

    pub fn check(&self, session: &Session, movie: &Movie) -> Access {
        if !movie.premium || session.membership.unlocks_premium() {
            Access::Granted
        } else {
            Access::UpgradeRequired {
                upgrade_url: self.upgrade_url.clone(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Membership, Role};

    fn movie(premium: bool) -> Movie {
        Movie {
            id: 1,
            title: "M".to_string(),
            genre: String::new(),
            year: None,
            rating: None,
            director: None,
            duration: None,
            description: None,
            premium,
            lead_actor: None,
            platform: None,
            poster_url: None,
            banner_url: None,
        }
    }

    fn session(membership: Membership) -> Session {
        Session {
            role: Role::User,
            membership,
            ..Session::guest()
        }
    }

    #[test]
    fn test_free_content_is_open_to_everyone() {
        let policy = AccessPolicy::new("/upgrade");
        for m in [Membership::Free, Membership::Basic, Membership::Premium] {
            assert_eq!(policy.check(&session(m), &movie(false)), Access::Granted);
        }
    }

    #[test]
    fn test_premium_content_requires_premium_tier() {
        let policy = AccessPolicy::new("/upgrade");
        assert_eq!(
            policy.check(&session(Membership::Free), &movie(true)),
            Access::UpgradeRequired {
                upgrade_url: "/upgrade".to_string()
            }
        );
        assert_eq!(
            policy.check(&session(Membership::Basic), &movie(true)),
            Access::UpgradeRequired {
                upgrade_url: "/upgrade".to_string()
            }
        );
        assert_eq!(
            policy.check(&session(Membership::Premium), &movie(true)),
            Access::Granted
        );
    }

    #[test]
    fn test_guest_hits_upgrade_wall() {
        let policy = AccessPolicy::new("/upgrade");
        assert!(matches!(
            policy.check(&Session::guest(), &movie(true)),
            Access::UpgradeRequired { .. }
        ));
    }
}
