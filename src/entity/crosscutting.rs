//! Crosscutting entity - relasi pinjam-silang antar pohon
//!
//! Tabel: tb_crosscutting
//!
//! Relasi sekunder di luar hirarki parent: `crosscutting_from` adalah node
//! asal yang dipinjam, `crosscutting_to` node hasil pinjaman di konteks
//! peminjam (0 setelah target dihapus).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tb_crosscutting")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub crosscutting_from: i32,

    pub crosscutting_to: i32,

    /// Status relasi, lihat [`crate::pokin::CrosscuttingStatus`]
    #[sea_orm(column_type = "String(Some(32))")]
    pub status: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
