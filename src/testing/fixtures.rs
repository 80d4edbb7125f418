//! # 测试数据 Fixtures

use chrono::{Duration, NaiveDateTime, Utc};
use entity::{api_keys, users};
use sea_orm::Set;

/// 用户测试数据构建器
#[derive(Debug, Clone)]
pub struct UserFixture {
    /// 用户名
    pub user_name: String,
    /// 密码
    pub password: String,
    /// 是否管理员
    pub is_admin: bool,
    /// 存活密钥计数
    pub ak_num: i32,
    /// 账户过期时间
    pub delete_at: Option<NaiveDateTime>,
}

impl Default for UserFixture {
    fn default() -> Self {
        Self {
            user_name: "test_user".to_string(),
            password: "test_password".to_string(),
            is_admin: false,
            ak_num: 0,
            delete_at: None,
        }
    }
}

impl UserFixture {
    /// 创建新的用户 fixture
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置用户名
    #[must_use]
    pub fn user_name(mut self, user_name: &str) -> Self {
        self.user_name = user_name.to_string();
        self
    }

    /// 设置密码
    #[must_use]
    pub fn password(mut self, password: &str) -> Self {
        self.password = password.to_string();
        self
    }

    /// 设置为管理员
    #[must_use]
    pub const fn admin(mut self) -> Self {
        self.is_admin = true;
        self
    }

    /// 设置密钥计数
    #[must_use]
    pub const fn ak_num(mut self, ak_num: i32) -> Self {
        self.ak_num = ak_num;
        self
    }

    /// 设置为已过期用户
    #[must_use]
    pub fn expired(mut self) -> Self {
        self.delete_at = Some(Utc::now().naive_utc() - Duration::days(1));
        self
    }

    /// 转换为 Sea-ORM ActiveModel
    #[must_use]
    pub fn to_active_model(self) -> users::ActiveModel {
        users::ActiveModel {
            user_name: Set(self.user_name),
            password: Set(self.password),
            is_admin: Set(self.is_admin),
            ak_num: Set(self.ak_num),
            delete_at: Set(self.delete_at),
            ..Default::default()
        }
    }
}

/// API 密钥测试数据构建器
#[derive(Debug, Clone)]
pub struct ApiKeyFixture {
    /// 属主
    pub uid: i32,
    /// 密文
    pub api_key_secret: String,
    /// 创建时间
    pub create_at: NaiveDateTime,
    /// 过期时间
    pub delete_at: Option<NaiveDateTime>,
}

impl ApiKeyFixture {
    /// 为指定用户创建存活密钥
    #[must_use]
    pub fn live(uid: i32, secret: &str) -> Self {
        let now = Utc::now().naive_utc();
        Self {
            uid,
            api_key_secret: secret.to_string(),
            create_at: now,
            delete_at: Some(now + Duration::days(30)),
        }
    }

    /// 已过期的密钥
    #[must_use]
    pub fn expired(uid: i32, secret: &str) -> Self {
        let now = Utc::now().naive_utc();
        Self {
            uid,
            api_key_secret: secret.to_string(),
            create_at: now - Duration::days(31),
            delete_at: Some(now - Duration::days(1)),
        }
    }

    /// 转换为 Sea-ORM ActiveModel
    #[must_use]
    pub fn to_active_model(self) -> api_keys::ActiveModel {
        api_keys::ActiveModel {
            uid: Set(self.uid),
            api_key_secret: Set(self.api_key_secret),
            create_at: Set(self.create_at),
            delete_at: Set(self.delete_at),
            ..Default::default()
        }
    }
}
