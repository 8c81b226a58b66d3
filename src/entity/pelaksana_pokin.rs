//! Pelaksana pokin entity - penugasan pegawai ke sebuah node
//!
//! Tabel: tb_pelaksana_pokin

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tb_pelaksana_pokin")]
pub struct Model {
    /// ID string berprefiks ("PLKS-...")
    #[sea_orm(primary_key, auto_increment = false, column_type = "String(Some(64))")]
    pub id: String,

    /// Node yang dilaksanakan
    pub pohon_kinerja_id: i32,

    /// Pegawai pelaksana
    #[sea_orm(column_type = "String(Some(64))")]
    pub pegawai_id: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
