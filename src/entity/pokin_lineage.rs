//! Pokin lineage entity - garis keturunan hasil clone
//!
//! Tabel: tb_pokin_lineage
//!
//! Sisi eksplisit "diturunkan-dari": satu baris per operasi clone, dari node
//! sumber ke node hasil pada tahun tujuan. Bebas-siklus dijaga saat insert.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tb_pokin_lineage")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Node sumber
    pub source_id: i32,

    /// Node hasil clone
    pub derived_id: i32,

    /// Tahun tujuan clone
    #[sea_orm(column_type = "String(Some(8))")]
    pub tahun: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
