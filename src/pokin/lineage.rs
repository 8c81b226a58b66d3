//! Lineage - garis keturunan hasil clone
//!
//! Selain kolom `clone_from` pada node, setiap operasi clone mencatat sisi
//! eksplisit sumber -> hasil di `tb_pokin_lineage`. Rantai keturunan wajib
//! bebas-siklus; pelanggaran ditolak saat insert.

use std::collections::HashSet;

use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set};

use crate::entity::pokin_lineage;
use crate::error::{AppError, AppResult, StoreStep};

/// Catat sisi keturunan `source_id -> derived_id` untuk tahun tujuan.
///
/// Menolak sisi yang akan membentuk siklus pada rantai keturunan.
pub async fn record<C: ConnectionTrait>(
    db: &C,
    source_id: i32,
    derived_id: i32,
    tahun: &str,
) -> AppResult<()> {
    if source_id == derived_id {
        return Err(AppError::Integrity(format!(
            "lineage menunjuk dirinya sendiri: {}",
            source_id
        )));
    }

    // derived tidak boleh menjadi leluhur dari sumbernya
    let ancestors = ancestors_of(db, source_id).await?;
    if ancestors.contains(&derived_id) {
        return Err(AppError::Integrity(format!(
            "lineage {} -> {} membentuk siklus",
            source_id, derived_id
        )));
    }

    pokin_lineage::ActiveModel {
        source_id: Set(source_id),
        derived_id: Set(derived_id),
        tahun: Set(tahun.to_string()),
        ..Default::default()
    }
    .insert(db)
    .await
    .step("gagal mencatat lineage")?;
    Ok(())
}

/// Rantai leluhur lineage sebuah node, dari sumber langsung ke sumber awal
pub async fn ancestors_of<C: ConnectionTrait>(db: &C, id: i32) -> AppResult<Vec<i32>> {
    let mut chain = Vec::new();
    let mut seen: HashSet<i32> = HashSet::from([id]);
    let mut current = id;

    loop {
        let edge = pokin_lineage::Entity::find()
            .filter(pokin_lineage::Column::DerivedId.eq(current))
            .one(db)
            .await
            .step("gagal membaca lineage")?;

        let Some(edge) = edge else { break };
        if !seen.insert(edge.source_id) {
            return Err(AppError::Integrity(format!(
                "rantai lineage node {} membentuk siklus",
                id
            )));
        }
        chain.push(edge.source_id);
        current = edge.source_id;
    }
    Ok(chain)
}

/// Node asal paling awal dari sebuah clone; node itu sendiri bila bukan clone
pub async fn origin_of<C: ConnectionTrait>(db: &C, id: i32) -> AppResult<i32> {
    let chain = ancestors_of(db, id).await?;
    Ok(chain.last().copied().unwrap_or(id))
}

/// Clone langsung sebuah node menurut relasi lineage
pub async fn derived_from<C: ConnectionTrait>(db: &C, source_id: i32) -> AppResult<Vec<i32>> {
    let rows = pokin_lineage::Entity::find()
        .filter(pokin_lineage::Column::SourceId.eq(source_id))
        .all(db)
        .await
        .step("gagal membaca lineage")?;
    Ok(rows.into_iter().map(|r| r.derived_id).collect())
}

/// Bersihkan sisi lineage yang menyentuh node yang dihapus
pub(crate) async fn delete_for<C: ConnectionTrait>(db: &C, ids: &[i32]) -> AppResult<()> {
    pokin_lineage::Entity::delete_many()
        .filter(
            sea_orm::Condition::any()
                .add(pokin_lineage::Column::SourceId.is_in(ids.to_vec()))
                .add(pokin_lineage::Column::DerivedId.is_in(ids.to_vec())),
        )
        .exec(db)
        .await
        .step("gagal menghapus lineage")?;
    Ok(())
}
