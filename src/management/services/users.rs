//! # 用户服务
//!
//! 注册与登录。密码按原样存储与比较。

use entity::{Users, users};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set, SqlErr};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::app::AppContext;
use crate::auth::TokenCodec;
use crate::database::ConnectionProvider;
use crate::error::{BusinessError, Context, Result};

/// 注册/登录请求
#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    /// 用户名
    pub user_name: String,
    /// 密码
    pub password: String,
}

/// 登录成功返回的数据
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    /// 用户 ID
    pub uid: i32,
    /// 签发的访问令牌
    pub token: String,
}

/// 用户服务
pub struct UsersService<'a> {
    db: &'a ConnectionProvider,
    tokens: &'a TokenCodec,
}

impl<'a> UsersService<'a> {
    /// 从应用上下文借用依赖
    #[must_use]
    pub fn new(context: &'a AppContext) -> Self {
        Self {
            db: &context.db,
            tokens: context.tokens.as_ref(),
        }
    }

    /// 注册新用户，返回新用户的 uid
    pub async fn register(&self, request: &Credentials) -> Result<i32> {
        let unit = self.db.acquire("register").await?;

        let existing = Users::find()
            .filter(users::Column::UserName.eq(request.user_name.as_str()))
            .one(unit.conn())
            .await
            .context("Failed to look up user")?;
        if existing.is_some() {
            info!(user_name = %request.user_name, "用户名已存在");
            return Err(BusinessError::UserExists.into());
        }

        let inserted = users::ActiveModel {
            user_name: Set(request.user_name.clone()),
            password: Set(request.password.clone()),
            is_admin: Set(false),
            ak_num: Set(0),
            delete_at: Set(None),
            ..Default::default()
        }
        .insert(unit.conn())
        .await;

        let user = match inserted {
            Ok(user) => user,
            Err(err) if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                info!(user_name = %request.user_name, "并发注册冲突");
                return Err(BusinessError::UserExists.into());
            }
            Err(err) => return Err(err).context("Failed to create user"),
        };

        unit.commit().await?;
        info!(uid = user.uid, "用户注册成功");
        Ok(user.uid)
    }

    /// 校验凭据并签发令牌
    ///
    /// 用户不存在与密码错误返回同一个错误。
    pub async fn login(&self, request: &Credentials) -> Result<LoginResponse> {
        let unit = self.db.acquire("login").await?;

        let user = Users::find()
            .filter(users::Column::UserName.eq(request.user_name.as_str()))
            .filter(users::Column::Password.eq(request.password.as_str()))
            .one(unit.conn())
            .await
            .context("Failed to look up user")?;
        unit.commit().await?;

        let Some(user) = user else {
            info!(user_name = %request.user_name, "登录失败");
            return Err(BusinessError::InvalidCredentials.into());
        };

        let token = self.tokens.encode(user.uid, user.level())?;
        info!(uid = user.uid, level = user.level(), "用户登录成功");
        Ok(LoginResponse {
            uid: user.uid,
            token,
        })
    }
}
