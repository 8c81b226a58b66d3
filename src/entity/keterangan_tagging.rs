//! Keterangan tagging entity - kaitan tagging ke program unggulan per tahun
//!
//! Tabel: tb_keterangan_tagging_program_unggulan

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tb_keterangan_tagging_program_unggulan")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Tagging pemilik
    pub id_tagging: i32,

    /// Kode program unggulan yang dikaitkan
    #[sea_orm(column_type = "String(Some(64))")]
    pub kode_program_unggulan: String,

    #[sea_orm(column_type = "String(Some(8))")]
    pub tahun: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
