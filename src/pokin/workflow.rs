//! Status Workflow - siklus persetujuan node dan aktivasi tematik
//!
//! Perubahan status dari luar selalu lewat [`update_status`] yang memeriksa
//! tabel transisi [`PokinStatus::can_transition`]; operasi keputusan
//! (setujui/tolak) menambahkan guard status asal seperti di service lama.

use std::collections::HashSet;

use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, Condition, ConnectionTrait, EntityTrait, QueryFilter};

use crate::entity::pohon_kinerja;
use crate::error::{AppError, AppResult, OptionExt, StoreStep};
use crate::pokin::status::PokinStatus;
use crate::pokin::store;

/// Pindahkan status sebuah node, tervalidasi tabel transisi
pub async fn update_status<C: ConnectionTrait>(
    db: &C,
    id: i32,
    to: PokinStatus,
) -> AppResult<()> {
    let from = store::check_status(db, id).await?;
    if !from.can_transition(to) {
        return Err(AppError::Validation(format!(
            "transisi status '{}' ke '{}' tidak diizinkan",
            from.as_str(),
            to.as_str()
        )));
    }
    store::set_status(db, id, to).await
}

/// Setujui node yang sedang menunggu keputusan pemda
pub async fn setujui_pokin<C: ConnectionTrait>(db: &C, id: i32) -> AppResult<()> {
    let status = store::check_status(db, id).await?;
    if status != PokinStatus::MenungguDisetujui {
        return Err(AppError::Validation(
            "hanya pohon kinerja dengan status menunggu_disetujui yang dapat disetujui".to_string(),
        ));
    }
    store::set_status(db, id, PokinStatus::Disetujui).await
}

/// Tolak node yang sedang menunggu keputusan pemda
pub async fn tolak_pokin<C: ConnectionTrait>(db: &C, id: i32) -> AppResult<()> {
    let status = store::check_status(db, id).await?;
    if status != PokinStatus::MenungguDisetujui {
        return Err(AppError::Validation(
            "hanya pohon kinerja dengan status menunggu_disetujui yang dapat ditolak".to_string(),
        ));
    }
    store::set_status(db, id, PokinStatus::Ditolak).await
}

/// Buka kembali node yang sudah disetujui (dipanggil saat clone-nya dihapus).
///
/// Gagal dengan NotFound bila node tidak sedang berstatus disetujui, lewat
/// pemeriksaan rows-affected.
pub async fn revert_approved<C: ConnectionTrait>(db: &C, id: i32) -> AppResult<()> {
    let result = pohon_kinerja::Entity::update_many()
        .col_expr(
            pohon_kinerja::Column::Status,
            Expr::value(PokinStatus::MenungguDisetujui.as_str()),
        )
        .filter(pohon_kinerja::Column::Id.eq(id))
        .filter(pohon_kinerja::Column::Status.eq(PokinStatus::Disetujui.as_str()))
        .exec(db)
        .await
        .step("gagal mengupdate status")?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound(format!(
            "tidak ada data yang diupdate untuk ID {}",
            id
        )));
    }
    Ok(())
}

/// Aktif/nonaktifkan sebuah tematik beserta seluruh turunan dan clone-nya.
///
/// Hanya node level 0 yang boleh dipicu. Yang diubah hanya node yang sedang
/// berada di keadaan sebaliknya, sehingga pemanggilan ulang tidak mengubah
/// apa pun. Mengembalikan id turunan/clone yang ikut berubah.
pub async fn set_tematik_active<C: ConnectionTrait>(
    db: &C,
    id: i32,
    is_active: bool,
) -> AppResult<Vec<i32>> {
    let node = pohon_kinerja::Entity::find_by_id(id)
        .one(db)
        .await
        .step("gagal mengambil pohon kinerja")?
        .ok_or_not_found(format!("pohon kinerja dengan ID {} tidak ditemukan", id))?;

    if node.level_pohon != 0 {
        return Err(AppError::Validation(format!(
            "pohon kinerja dengan id {} bukan merupakan tematik (level 0)",
            id
        )));
    }

    let affected = collect_children_and_clones(db, id, is_active).await?;

    let mut ids = affected.clone();
    if node.is_active != is_active {
        ids.push(id);
    }
    if !ids.is_empty() {
        pohon_kinerja::Entity::update_many()
            .col_expr(pohon_kinerja::Column::IsActive, Expr::value(is_active))
            .filter(pohon_kinerja::Column::Id.is_in(ids))
            .exec(db)
            .await
            .step("gagal mengupdate status aktif")?;
    }
    Ok(affected)
}

/// Kumpulkan turunan dan clone (rekursif, gabungan sisi parent dan
/// clone_from) yang masih berada di keadaan kebalikan dari `activating`.
///
/// Rantai berhenti pada node yang sudah berada di keadaan tujuan, sama
/// seperti traversal aslinya.
pub async fn collect_children_and_clones<C: ConnectionTrait>(
    db: &C,
    parent_id: i32,
    activating: bool,
) -> AppResult<Vec<i32>> {
    let mut seen: HashSet<i32> = HashSet::from([parent_id]);
    let mut result = Vec::new();
    let mut frontier = vec![parent_id];

    while !frontier.is_empty() {
        let rows = pohon_kinerja::Entity::find()
            .filter(
                Condition::any()
                    .add(pohon_kinerja::Column::Parent.is_in(frontier.clone()))
                    .add(pohon_kinerja::Column::CloneFrom.is_in(frontier.clone())),
            )
            .filter(pohon_kinerja::Column::IsActive.eq(!activating))
            .all(db)
            .await
            .step("gagal mengambil turunan pohon")?;

        frontier = Vec::new();
        for row in rows {
            if seen.insert(row.id) {
                frontier.push(row.id);
                result.push(row.id);
            }
        }
    }
    Ok(result)
}
