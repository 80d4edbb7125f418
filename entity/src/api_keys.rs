//! # API 密钥实体定义
//!
//! 用户 API 密钥表的 Sea-ORM 实体模型。密钥从不物理删除，
//! 通过把 `delete_at` 设置为当前时间完成软删除。

use sea_orm::entity::prelude::*;
use sea_orm::Condition;
use serde::{Deserialize, Serialize};

/// API 密钥实体
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "api_keys")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub ak_id: i32,
    pub uid: i32,
    #[sea_orm(unique)]
    pub api_key_secret: String,
    pub create_at: DateTime,
    pub delete_at: Option<DateTime>,
}

impl Model {
    /// 密钥在 `now` 时刻是否仍然有效
    #[must_use]
    pub fn is_live(&self, now: DateTime) -> bool {
        self.delete_at.is_none_or(|at| at > now)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::Uid",
        to = "super::users::Column::Uid",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// 存活密钥条件：`delete_at IS NULL OR delete_at > now`
#[must_use]
pub fn live(now: DateTime) -> Condition {
    Condition::any()
        .add(Column::DeleteAt.is_null())
        .add(Column::DeleteAt.gt(now))
}
