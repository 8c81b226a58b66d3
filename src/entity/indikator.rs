//! Indikator entity - indikator kinerja milik sebuah node
//!
//! Tabel: tb_indikator

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tb_indikator")]
pub struct Model {
    /// ID string berprefiks ("IND-...", "IND-POKIN-..." untuk hasil clone)
    #[sea_orm(primary_key, auto_increment = false, column_type = "String(Some(64))")]
    pub id: String,

    /// Node pemilik
    pub pokin_id: i32,

    /// Rumusan indikator
    #[sea_orm(column_type = "String(Some(255))")]
    pub indikator: String,

    #[sea_orm(column_type = "String(Some(8))")]
    pub tahun: String,

    /// ID indikator sumber jika hasil clone ("" = bukan clone)
    #[sea_orm(column_type = "String(Some(64))")]
    pub clone_from: String,

    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
