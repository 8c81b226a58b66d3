//! Tagging pokin entity - penanda bernama pada sebuah node
//!
//! Tabel: tb_tagging_pokin

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tb_tagging_pokin")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Node yang ditandai
    pub id_pokin: i32,

    #[sea_orm(column_type = "String(Some(128))")]
    pub nama_tagging: String,

    /// ID tagging sumber jika hasil clone (0 = bukan clone)
    pub clone_from: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
