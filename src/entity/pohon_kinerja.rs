//! Pohon kinerja entity - node pohon kinerja
//!
//! Tabel: tb_pohon_kinerja

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tb_pohon_kinerja")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// ID node induk (0 = akar)
    pub parent: i32,

    /// Nama pohon kinerja
    #[sea_orm(column_type = "String(Some(255))")]
    pub nama_pohon: String,

    /// Kategori node (Tematik, Strategic, Operational, ...)
    #[sea_orm(column_type = "String(Some(64))")]
    pub jenis_pohon: String,

    /// Kedalaman node: 0=Tematik, 4=Strategic, 5+=Operational
    pub level_pohon: i32,

    /// Kode OPD pemilik ("" untuk pohon pemda)
    #[sea_orm(column_type = "String(Some(32))")]
    pub kode_opd: String,

    pub keterangan: String,

    pub keterangan_crosscutting: String,

    /// Tahun anggaran
    #[sea_orm(column_type = "String(Some(8))")]
    pub tahun: String,

    /// Status workflow, lihat [`crate::pokin::PokinStatus`]
    #[sea_orm(column_type = "String(Some(32))")]
    pub status: String,

    /// ID node sumber jika node ini hasil clone (0 = bukan clone)
    pub clone_from: i32,

    pub is_active: bool,

    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

// Relasi parent/clone self-referencing ditangani lewat query manual

impl ActiveModelBehavior for ActiveModel {}
