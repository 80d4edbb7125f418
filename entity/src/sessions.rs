//! # 对话会话实体定义
//!
//! 与 HTTP 会话无关，表示用户与某个模型之间的一次对话。

use sea_orm::entity::prelude::*;
use sea_orm::Set;
use serde::{Deserialize, Serialize};

/// 对话会话实体
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "sessions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub session_id: i32,
    pub create_at: DateTime,
    pub update_at: DateTime,
    pub delete_at: Option<DateTime>,
    pub llm_id: Option<i32>,
    pub uid: i32,
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
    #[sea_orm(
        belongs_to = "super::llms::Entity",
        from = "Column::LlmId",
        to = "super::llms::Column::LlmId",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Llm,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::llms::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Llm.def()
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let now = chrono::Utc::now().naive_utc();
        if insert && self.create_at.is_not_set() {
            self.create_at = Set(now);
        }
        // 每次保存都刷新更新时间
        self.update_at = Set(now);
        Ok(self)
    }
}
