//! # API 密钥服务
//!
//! 列表、生成与软删除。`users.ak_num` 与存活密钥数量在同一个工作单元内维护。

use chrono::{NaiveDateTime, SubsecRound, Utc};
use entity::{ApiKeys, Users, api_keys, users};
use rand::Rng;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::app::AppContext;
use crate::config::KeyPolicyConfig;
use crate::database::ConnectionProvider;
use crate::error::{BusinessError, Context, Result};
use crate::management::middleware::AuthContext;

const KEY_PREFIX: &str = "sk-";
const KEY_BODY_LEN: usize = 48;

/// 列表中的单个密钥
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiKeyItem {
    /// 密钥行 ID
    pub api_key_id: i32,
    /// 密钥密文
    pub api_key_secret: String,
    /// 创建时间
    pub create_at: NaiveDateTime,
    /// 过期时间
    pub expire_at: Option<NaiveDateTime>,
}

impl From<api_keys::Model> for ApiKeyItem {
    fn from(key: api_keys::Model) -> Self {
        Self {
            api_key_id: key.ak_id,
            api_key_secret: key.api_key_secret,
            create_at: key.create_at,
            expire_at: key.delete_at,
        }
    }
}

/// 密钥列表响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiKeyList {
    /// 请求路径中的用户 ID
    pub uid: i32,
    /// 按 ID 升序的存活密钥
    pub api_key_list: Vec<ApiKeyItem>,
}

/// 新生成的密钥，密文只返回这一次
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedApiKey {
    /// 密钥属主
    pub uid: i32,
    /// 创建时间
    pub create_at: NaiveDateTime,
    /// 过期时间
    pub expire_at: NaiveDateTime,
    /// 密钥密文
    pub api_key_secret: String,
}

/// 生成 `sk-` 前缀加 48 位字母数字的密钥
#[must_use]
pub fn generate_key_secret() -> String {
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    let mut rng = rand::thread_rng();

    let body: String = (0..KEY_BODY_LEN)
        .map(|_| {
            let idx = rng.gen_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect();
    format!("{KEY_PREFIX}{body}")
}

fn now() -> NaiveDateTime {
    Utc::now().naive_utc().trunc_subsecs(0)
}

/// API 密钥服务
pub struct ApiKeysService<'a> {
    db: &'a ConnectionProvider,
    policy: &'a KeyPolicyConfig,
}

impl<'a> ApiKeysService<'a> {
    /// 从应用上下文借用依赖
    #[must_use]
    pub fn new(context: &'a AppContext) -> Self {
        Self {
            db: &context.db,
            policy: &context.config.keys,
        }
    }

    /// 列出存活密钥
    ///
    /// 管理员可以查看任意用户，且结果不按属主过滤。
    pub async fn list(&self, uid: i32, auth: &AuthContext) -> Result<ApiKeyList> {
        if !auth.can_access(uid) {
            info!(caller = auth.user_id, uid, "无权查看密钥列表");
            return Err(BusinessError::NoPermission.into());
        }

        let unit = self.db.acquire("list_api_keys").await?;
        let mut select = ApiKeys::find().filter(api_keys::live(now()));
        if !auth.is_admin() {
            select = select.filter(api_keys::Column::Uid.eq(uid));
        }
        let keys = select
            .order_by_asc(api_keys::Column::AkId)
            .all(unit.conn())
            .await
            .context("Failed to list api keys")?;
        unit.commit().await?;

        debug!(uid, count = keys.len(), "密钥列表查询完成");
        Ok(ApiKeyList {
            uid,
            api_key_list: keys.into_iter().map(ApiKeyItem::from).collect(),
        })
    }

    /// 为调用者本人生成新密钥，管理员同样不能替他人生成
    pub async fn generate(&self, uid: i32, auth: &AuthContext) -> Result<GeneratedApiKey> {
        if auth.user_id != uid {
            info!(caller = auth.user_id, uid, "无权生成密钥");
            return Err(BusinessError::NoPermission.into());
        }

        let now = now();
        let unit = self.db.acquire("generate_api_key").await?;

        let Some(user) = Users::find_by_id(uid)
            .one(unit.conn())
            .await
            .context("Failed to look up user")?
        else {
            warn!(uid, "令牌中的用户不存在");
            return Err(BusinessError::TokenInvalid.into());
        };

        let live = ApiKeys::find()
            .filter(api_keys::Column::Uid.eq(uid))
            .filter(api_keys::live(now))
            .count(unit.conn())
            .await
            .context("Failed to count api keys")?;

        // 过期密钥不再占用配额
        let live_num = i32::try_from(live).unwrap_or(i32::MAX);
        if live_num != user.ak_num {
            debug!(uid, recorded = user.ak_num, live = live_num, "校正密钥计数");
            Users::update_many()
                .col_expr(users::Column::AkNum, Expr::value(live_num))
                .filter(users::Column::Uid.eq(uid))
                .exec(unit.conn())
                .await
                .context("Failed to reconcile key count")?;
        }

        if live >= self.policy.max_per_user {
            info!(uid, live, "密钥数量已达上限");
            return Err(BusinessError::KeyQuotaExceeded {
                max: self.policy.max_per_user,
            }
            .into());
        }

        let expire_at = now + self.policy.ttl();
        let key = api_keys::ActiveModel {
            uid: Set(uid),
            api_key_secret: Set(generate_key_secret()),
            create_at: Set(now),
            delete_at: Set(Some(expire_at)),
            ..Default::default()
        }
        .insert(unit.conn())
        .await
        .context("Failed to insert api key")?;

        Users::update_many()
            .col_expr(
                users::Column::AkNum,
                Expr::col(users::Column::AkNum).add(1),
            )
            .filter(users::Column::Uid.eq(uid))
            .filter(users::not_expired(now))
            .exec(unit.conn())
            .await
            .context("Failed to increase key count")?;

        unit.commit().await?;
        info!(uid, ak_id = key.ak_id, "密钥生成成功");

        Ok(GeneratedApiKey {
            uid,
            create_at: key.create_at,
            expire_at,
            api_key_secret: key.api_key_secret,
        })
    }

    /// 软删除存活密钥，并减少密钥属主的计数
    pub async fn delete(&self, uid: i32, secret: &str, auth: &AuthContext) -> Result<()> {
        if !auth.can_access(uid) {
            info!(caller = auth.user_id, uid, "无权删除密钥");
            return Err(BusinessError::NoPermission.into());
        }

        let now = now();
        let unit = self.db.acquire("delete_api_key").await?;

        let mut select = ApiKeys::find()
            .filter(api_keys::Column::ApiKeySecret.eq(secret))
            .filter(api_keys::live(now));
        if !auth.is_admin() {
            select = select.filter(api_keys::Column::Uid.eq(uid));
        }
        let Some(key) = select
            .one(unit.conn())
            .await
            .context("Failed to look up api key")?
        else {
            info!(caller = auth.user_id, uid, "密钥不存在");
            return Err(BusinessError::KeyNotFound.into());
        };

        ApiKeys::update_many()
            .col_expr(api_keys::Column::DeleteAt, Expr::value(now))
            .filter(api_keys::Column::AkId.eq(key.ak_id))
            .exec(unit.conn())
            .await
            .context("Failed to revoke api key")?;

        Users::update_many()
            .col_expr(
                users::Column::AkNum,
                Expr::col(users::Column::AkNum).sub(1),
            )
            .filter(users::Column::Uid.eq(key.uid))
            .filter(users::Column::AkNum.gt(0))
            .filter(users::not_expired(now))
            .exec(unit.conn())
            .await
            .context("Failed to decrease key count")?;

        unit.commit().await?;
        info!(caller = auth.user_id, owner = key.uid, ak_id = key.ak_id, "密钥已删除");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ApiKeyFixture, create_test_context, insert_api_key, insert_user};
    use pretty_assertions::assert_eq;
    use sea_orm::DatabaseConnection;

    const fn user(uid: i32) -> AuthContext {
        AuthContext {
            user_id: uid,
            level: 0,
        }
    }

    const fn admin(uid: i32) -> AuthContext {
        AuthContext {
            user_id: uid,
            level: 1,
        }
    }

    async fn ak_num(db: &DatabaseConnection, uid: i32) -> i32 {
        Users::find_by_id(uid).one(db).await.unwrap().unwrap().ak_num
    }

    #[test]
    fn test_generate_key_secret_format() {
        let secret = generate_key_secret();
        assert!(secret.starts_with("sk-"));
        assert_eq!(secret.len(), 3 + 48);
        assert!(secret[3..].chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(secret, generate_key_secret());
    }

    #[tokio::test]
    async fn test_quota_allows_five_live_keys() {
        let context = create_test_context().await.unwrap();
        let uid = insert_user(context.db.connection(), "alice", "pw", false)
            .await
            .unwrap();
        let service = ApiKeysService::new(&context);

        for _ in 0..5 {
            service.generate(uid, &user(uid)).await.unwrap();
        }
        assert_eq!(ak_num(context.db.connection(), uid).await, 5);

        let err = service.generate(uid, &user(uid)).await.unwrap_err();
        assert_eq!(
            err.as_business(),
            Some(&BusinessError::KeyQuotaExceeded { max: 5 })
        );
        assert_eq!(
            err.to_string(),
            "You can only generate 5 api keys at most"
        );
        assert_eq!(ak_num(context.db.connection(), uid).await, 5);
    }

    #[tokio::test]
    async fn test_generate_requires_exact_owner() {
        let context = create_test_context().await.unwrap();
        let db = context.db.connection();
        let alice = insert_user(db, "alice", "pw", false).await.unwrap();
        let root = insert_user(db, "root", "pw", true).await.unwrap();
        let service = ApiKeysService::new(&context);

        let err = service.generate(alice, &admin(root)).await.unwrap_err();
        assert_eq!(err.as_business(), Some(&BusinessError::NoPermission));
    }

    #[tokio::test]
    async fn test_generate_for_missing_user_is_token_invalid() {
        let context = create_test_context().await.unwrap();
        let service = ApiKeysService::new(&context);

        let err = service.generate(404, &user(404)).await.unwrap_err();
        assert_eq!(err.as_business(), Some(&BusinessError::TokenInvalid));
    }

    #[tokio::test]
    async fn test_delete_hides_key_and_frees_quota() {
        let context = create_test_context().await.unwrap();
        let uid = insert_user(context.db.connection(), "alice", "pw", false)
            .await
            .unwrap();
        let service = ApiKeysService::new(&context);

        let first = service.generate(uid, &user(uid)).await.unwrap();
        let second = service.generate(uid, &user(uid)).await.unwrap();

        service
            .delete(uid, &first.api_key_secret, &user(uid))
            .await
            .unwrap();

        let list = service.list(uid, &user(uid)).await.unwrap();
        let secrets: Vec<_> = list
            .api_key_list
            .iter()
            .map(|k| k.api_key_secret.as_str())
            .collect();
        assert_eq!(secrets, vec![second.api_key_secret.as_str()]);
        assert_eq!(ak_num(context.db.connection(), uid).await, 1);

        let again = service
            .delete(uid, &first.api_key_secret, &user(uid))
            .await
            .unwrap_err();
        assert_eq!(again.as_business(), Some(&BusinessError::KeyNotFound));
        assert_eq!(ak_num(context.db.connection(), uid).await, 1);
    }

    #[tokio::test]
    async fn test_permissions_for_list_and_delete() {
        let context = create_test_context().await.unwrap();
        let db = context.db.connection();
        let alice = insert_user(db, "alice", "pw", false).await.unwrap();
        let bob = insert_user(db, "bob", "pw", false).await.unwrap();
        let root = insert_user(db, "root", "pw", true).await.unwrap();
        let service = ApiKeysService::new(&context);

        let key = service.generate(alice, &user(alice)).await.unwrap();

        let err = service.list(alice, &user(bob)).await.unwrap_err();
        assert_eq!(err.as_business(), Some(&BusinessError::NoPermission));
        let err = service
            .delete(alice, &key.api_key_secret, &user(bob))
            .await
            .unwrap_err();
        assert_eq!(err.as_business(), Some(&BusinessError::NoPermission));

        let list = service.list(alice, &admin(root)).await.unwrap();
        assert_eq!(list.api_key_list.len(), 1);

        service
            .delete(alice, &key.api_key_secret, &admin(root))
            .await
            .unwrap();
        assert_eq!(ak_num(db, alice).await, 0);
        assert_eq!(ak_num(db, root).await, 0);
    }

    #[tokio::test]
    async fn test_user_cannot_delete_foreign_key_through_own_uid() {
        let context = create_test_context().await.unwrap();
        let db = context.db.connection();
        let alice = insert_user(db, "alice", "pw", false).await.unwrap();
        let bob = insert_user(db, "bob", "pw", false).await.unwrap();
        let service = ApiKeysService::new(&context);

        let key = service.generate(alice, &user(alice)).await.unwrap();

        let err = service
            .delete(bob, &key.api_key_secret, &user(bob))
            .await
            .unwrap_err();
        assert_eq!(err.as_business(), Some(&BusinessError::KeyNotFound));
        assert_eq!(ak_num(db, alice).await, 1);
    }

    #[tokio::test]
    async fn test_admin_delete_through_own_uid_charges_owner() {
        let context = create_test_context().await.unwrap();
        let db = context.db.connection();
        let alice = insert_user(db, "alice", "pw", false).await.unwrap();
        let root = insert_user(db, "root", "pw", true).await.unwrap();
        let service = ApiKeysService::new(&context);

        let key = service.generate(alice, &user(alice)).await.unwrap();
        assert_eq!(ak_num(db, alice).await, 1);

        service
            .delete(root, &key.api_key_secret, &admin(root))
            .await
            .unwrap();
        assert_eq!(ak_num(db, alice).await, 0);
        assert_eq!(ak_num(db, root).await, 0);

        let list = service.list(alice, &user(alice)).await.unwrap();
        assert!(list.api_key_list.is_empty());
    }

    #[tokio::test]
    async fn test_admin_list_includes_every_owner() {
        let context = create_test_context().await.unwrap();
        let db = context.db.connection();
        let alice = insert_user(db, "alice", "pw", false).await.unwrap();
        let bob = insert_user(db, "bob", "pw", false).await.unwrap();
        let root = insert_user(db, "root", "pw", true).await.unwrap();
        let service = ApiKeysService::new(&context);

        service.generate(alice, &user(alice)).await.unwrap();
        service.generate(bob, &user(bob)).await.unwrap();

        let own = service.list(alice, &user(alice)).await.unwrap();
        assert_eq!(own.api_key_list.len(), 1);

        let all = service.list(alice, &admin(root)).await.unwrap();
        assert_eq!(all.uid, alice);
        assert_eq!(all.api_key_list.len(), 2);
        assert!(all.api_key_list[0].api_key_id < all.api_key_list[1].api_key_id);
    }

    #[tokio::test]
    async fn test_expired_keys_stop_counting_against_quota() {
        let context = create_test_context().await.unwrap();
        let db = context.db.connection();
        let uid = crate::testing::insert_user_fixture(
            db,
            crate::testing::UserFixture::new().user_name("alice").ak_num(5),
        )
        .await
        .unwrap();
        for i in 0..4 {
            insert_api_key(db, ApiKeyFixture::expired(uid, &format!("sk-old-{i}")))
                .await
                .unwrap();
        }
        insert_api_key(db, ApiKeyFixture::live(uid, "sk-live-0"))
            .await
            .unwrap();

        let service = ApiKeysService::new(&context);
        service.generate(uid, &user(uid)).await.unwrap();
        assert_eq!(ak_num(db, uid).await, 2);

        let list = service.list(uid, &user(uid)).await.unwrap();
        assert_eq!(list.api_key_list.len(), 2);
    }
}
