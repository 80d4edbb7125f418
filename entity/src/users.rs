//! # 用户实体定义
//!
//! 用户基础信息表的 Sea-ORM 实体模型

use sea_orm::entity::prelude::*;
use sea_orm::Condition;
use serde::{Deserialize, Serialize};

/// 用户实体
///
/// `ak_num` 记录该用户当前存活的 API 密钥数量，只由密钥生成/删除流程维护。
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub uid: i32,
    #[sea_orm(unique)]
    pub user_name: String,
    pub password: String,
    pub is_admin: bool,
    pub ak_num: i32,
    pub delete_at: Option<DateTime>,
}

impl Model {
    /// 令牌中携带的权限等级
    #[must_use]
    pub const fn level(&self) -> i32 {
        if self.is_admin { 1 } else { 0 }
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::api_keys::Entity")]
    ApiKeys,
    #[sea_orm(has_many = "super::sessions::Entity")]
    Sessions,
}

impl Related<super::api_keys::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ApiKeys.def()
    }
}

impl Related<super::sessions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sessions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// 未过期用户条件：`delete_at IS NULL OR delete_at > now`
#[must_use]
pub fn not_expired(now: DateTime) -> Condition {
    Condition::any()
        .add(Column::DeleteAt.is_null())
        .add(Column::DeleteAt.gt(now))
}
