//! Target entity - target tahunan sebuah indikator
//!
//! Tabel: tb_target

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tb_target")]
pub struct Model {
    /// ID string berprefiks ("TRG-...", "TRGT-IND-..." untuk hasil clone)
    #[sea_orm(primary_key, auto_increment = false, column_type = "String(Some(64))")]
    pub id: String,

    /// Indikator pemilik
    #[sea_orm(column_type = "String(Some(64))")]
    pub indikator_id: String,

    /// Nilai target
    #[sea_orm(column_type = "String(Some(64))")]
    pub target: String,

    /// Satuan nilai
    #[sea_orm(column_type = "String(Some(64))")]
    pub satuan: String,

    #[sea_orm(column_type = "String(Some(8))")]
    pub tahun: String,

    /// ID target sumber jika hasil clone ("" = bukan clone)
    #[sea_orm(column_type = "String(Some(64))")]
    pub clone_from: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
