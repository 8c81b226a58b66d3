//! Rencana kinerja entity - rencana kinerja pegawai pada sebuah node
//! (dibaca saja oleh engine, untuk rekap kepatuhan)
//!
//! Tabel: tb_rencana_kinerja

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tb_rencana_kinerja")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_type = "String(Some(64))")]
    pub id: String,

    /// Node pohon kinerja yang direncanakan
    pub id_pohon: i32,

    /// NIP pegawai penyusun rencana
    #[sea_orm(column_type = "String(Some(32))")]
    pub pegawai_id: String,

    #[sea_orm(column_type = "String(Some(8))")]
    pub tahun: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
