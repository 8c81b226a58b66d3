//! Pegawai entity - identitas pegawai (dibaca saja oleh engine)
//!
//! Tabel: tb_pegawai

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tb_pegawai")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_type = "String(Some(64))")]
    pub id: String,

    /// Nomor induk pegawai
    #[sea_orm(column_type = "String(Some(32))")]
    pub nip: String,

    #[sea_orm(column_type = "String(Some(128))")]
    pub nama: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
