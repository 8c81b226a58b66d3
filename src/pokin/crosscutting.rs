//! Crosscutting Linker - pinjam-silang objektif antar pohon
//!
//! Sebuah OPD dapat meminjam objektif milik pohon lain tanpa mengubah
//! hirarki parent utamanya: node salinan dibuat di konteks peminjam dengan
//! status `crosscutting_menunggu`, dan relasinya dicatat di `tb_crosscutting`
//! untuk diputuskan (setujui/tolak) oleh pemilik tujuan.

use sea_orm::sea_query::Expr;
use sea_orm::{ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, QueryFilter, Set};

use crate::entity::{crosscutting, pohon_kinerja};
use crate::error::{AppError, AppResult, OptionExt, StoreStep};
use crate::pokin::domain::PohonKinerja;
use crate::pokin::status::{CrosscuttingStatus, PokinStatus};
use crate::pokin::{clone, hierarchy, lineage, store};

/// Permintaan pinjam-silang sebuah node ke konteks pemohon
#[derive(Debug, Clone)]
pub struct CrosscuttingRequest {
    /// Node yang ingin dipinjam
    pub id_to_clone: i32,
    /// Induk baru di pohon pemohon
    pub parent: i32,
    /// Kategori node salinan, wajib diisi
    pub jenis_pohon: String,
}

/// Buat usulan crosscutting: salin node sumber ke bawah `parent` pemohon
/// dengan status menunggu, tandai sumbernya terpakai (disetujui), dan catat
/// relasinya. Bila sumber sendiri adalah clone, jejak menunjuk node asalnya.
pub async fn crosscutting_opd<C: ConnectionTrait>(
    db: &C,
    request: &CrosscuttingRequest,
) -> AppResult<PohonKinerja> {
    if request.id_to_clone == 0 {
        return Err(AppError::Validation("id tidak boleh kosong".to_string()));
    }
    if request.jenis_pohon.is_empty() {
        return Err(AppError::Validation(
            "jenis pohon tidak boleh kosong".to_string(),
        ));
    }

    let clone_from = store::check_clone_from(db, request.id_to_clone).await?;
    let clone_reference = if clone_from != 0 {
        clone_from
    } else {
        request.id_to_clone
    };

    let source = pohon_kinerja::Entity::find_by_id(request.id_to_clone)
        .one(db)
        .await
        .step("gagal memeriksa data yang akan di-clone")?
        .ok_or_not_found(format!(
            "data dengan ID {} tidak ditemukan",
            request.id_to_clone
        ))?;

    hierarchy::validate_parent_level(db, request.parent, source.level_pohon).await?;

    // Node asal ditandai terpakai oleh relasi silang
    store::set_status(db, request.id_to_clone, PokinStatus::Disetujui).await?;

    let inserted = pohon_kinerja::ActiveModel {
        parent: Set(request.parent),
        nama_pohon: Set(source.nama_pohon.clone()),
        jenis_pohon: Set(request.jenis_pohon.clone()),
        level_pohon: Set(source.level_pohon),
        kode_opd: Set(source.kode_opd.clone()),
        keterangan: Set(source.keterangan.clone()),
        keterangan_crosscutting: Set(source.keterangan_crosscutting.clone()),
        tahun: Set(source.tahun.clone()),
        status: Set(PokinStatus::CrosscuttingMenunggu.as_str().to_string()),
        clone_from: Set(clone_reference),
        is_active: Set(source.is_active),
        created_at: Set(chrono::Utc::now().naive_utc()),
        ..Default::default()
    }
    .insert(db)
    .await
    .step("gagal menyimpan data pohon kinerja yang di-clone")?;

    lineage::record(db, clone_reference, inserted.id, &source.tahun).await?;
    clone::clone_indikator_and_target(db, request.id_to_clone, inserted.id).await?;
    clone::clone_pelaksana(db, request.id_to_clone, inserted.id).await?;

    crosscutting::ActiveModel {
        crosscutting_from: Set(request.id_to_clone),
        crosscutting_to: Set(inserted.id),
        status: Set(CrosscuttingStatus::Menunggu.as_str().to_string()),
        ..Default::default()
    }
    .insert(db)
    .await
    .step("gagal menyimpan relasi crosscutting")?;

    store::find_by_id(db, inserted.id).await
}

/// Setujui usulan crosscutting pada node hasil pinjaman
pub async fn setujui_crosscutting<C: ConnectionTrait>(db: &C, id: i32) -> AppResult<()> {
    decide_crosscutting(
        db,
        id,
        PokinStatus::CrosscuttingDisetujui,
        CrosscuttingStatus::Disetujui,
        "hanya pohon kinerja dengan status crosscutting_menunggu yang dapat disetujui",
    )
    .await
}

/// Tolak usulan crosscutting pada node hasil pinjaman
pub async fn tolak_crosscutting<C: ConnectionTrait>(db: &C, id: i32) -> AppResult<()> {
    decide_crosscutting(
        db,
        id,
        PokinStatus::CrosscuttingDitolak,
        CrosscuttingStatus::Ditolak,
        "hanya pohon kinerja dengan status crosscutting_menunggu yang dapat ditolak",
    )
    .await
}

async fn decide_crosscutting<C: ConnectionTrait>(
    db: &C,
    id: i32,
    node_status: PokinStatus,
    relation_status: CrosscuttingStatus,
    guard_message: &str,
) -> AppResult<()> {
    if id == 0 {
        return Err(AppError::Validation("id tidak boleh kosong".to_string()));
    }

    let status = store::check_status(db, id).await?;
    if status != PokinStatus::CrosscuttingMenunggu {
        return Err(AppError::Validation(guard_message.to_string()));
    }

    store::set_status(db, id, node_status).await?;

    crosscutting::Entity::update_many()
        .col_expr(
            crosscutting::Column::Status,
            Expr::value(relation_status.as_str()),
        )
        .filter(crosscutting::Column::CrosscuttingTo.eq(id))
        .filter(crosscutting::Column::Status.eq(CrosscuttingStatus::Menunggu.as_str()))
        .exec(db)
        .await
        .step("gagal mengupdate status crosscutting")?;
    Ok(())
}

/// Relasi crosscutting yang menyentuh sebuah node, dari sisi mana pun
pub async fn find_relations_for<C: ConnectionTrait>(
    db: &C,
    node_id: i32,
) -> AppResult<Vec<crosscutting::Model>> {
    crosscutting::Entity::find()
        .filter(
            Condition::any()
                .add(crosscutting::Column::CrosscuttingFrom.eq(node_id))
                .add(crosscutting::Column::CrosscuttingTo.eq(node_id)),
        )
        .all(db)
        .await
        .step("gagal mengambil relasi crosscutting")
}
