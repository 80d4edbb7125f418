//! # 模型实体定义

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 语言模型实体，会话通过 `llm_id` 引用
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "llms")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub llm_id: i32,
    #[sea_orm(unique)]
    pub llm_name: String,
    pub create_at: DateTime,
    pub delete_at: Option<DateTime>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::sessions::Entity")]
    Sessions,
}

impl Related<super::sessions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sessions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
