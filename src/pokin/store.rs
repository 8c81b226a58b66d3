//! Node Store - CRUD pohon kinerja beserta koleksi anaknya
//!
//! Koleksi anak disinkronkan dengan disiplin diff-per-kunci: baris yang masih
//! ada di permintaan dipertahankan/diupdate (riwayat seperti `clone_from`
//! ikut terjaga), sisanya dihapus berikut turunannya.

use std::collections::{HashMap, HashSet};

use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};

use crate::entity::{
    crosscutting, indikator, keterangan_tagging, pegawai, pelaksana_pokin, pohon_kinerja,
    tagging_pokin, target,
};
use crate::error::{AppError, AppResult, OptionExt, StoreStep};
use crate::pokin::domain::{Indikator, PelaksanaPokin, PohonKinerja, TaggingPokin, Target};
use crate::pokin::status::{CrosscuttingStatus, PokinStatus};
use crate::pokin::{lineage, tagging};

/// ID string berprefiks untuk baris anak (pelaksana, indikator, target)
pub(crate) fn new_id(prefix: &str) -> String {
    let uuid = uuid::Uuid::new_v4().simple().to_string();
    format!("{}{}", prefix, &uuid[..8])
}

/// Simpan node baru beserta pelaksana, indikator+target, dan tagging
pub async fn create<C: ConnectionTrait>(db: &C, pokin: &PohonKinerja) -> AppResult<PohonKinerja> {
    let now = chrono::Utc::now().naive_utc();

    let inserted = pohon_kinerja::ActiveModel {
        parent: Set(pokin.parent),
        nama_pohon: Set(pokin.nama_pohon.clone()),
        jenis_pohon: Set(pokin.jenis_pohon.clone()),
        level_pohon: Set(pokin.level_pohon),
        kode_opd: Set(pokin.kode_opd.clone()),
        keterangan: Set(pokin.keterangan.clone()),
        keterangan_crosscutting: Set(pokin.keterangan_crosscutting.clone()),
        tahun: Set(pokin.tahun.clone()),
        status: Set(pokin.status.as_str().to_string()),
        clone_from: Set(pokin.clone_from),
        is_active: Set(pokin.is_active),
        created_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .step("gagal menyimpan pohon kinerja")?;

    insert_pelaksana(db, inserted.id, &pokin.pelaksana).await?;
    for ind in &pokin.indikator {
        insert_indikator(db, inserted.id, ind).await?;
    }
    tagging::insert_tagging(db, inserted.id, &pokin.tagging).await?;

    find_by_id(db, inserted.id).await
}

/// Update node dan sinkronkan koleksi anaknya.
///
/// Node hasil clone tidak boleh pindah induk: `parent` hanya berubah bila
/// `clone_from == 0`. Status tidak disentuh di sini, itu milik workflow.
pub async fn update<C: ConnectionTrait>(db: &C, pokin: &PohonKinerja) -> AppResult<PohonKinerja> {
    let existing = pohon_kinerja::Entity::find_by_id(pokin.id)
        .one(db)
        .await
        .step("gagal memeriksa pohon kinerja")?
        .ok_or_not_found(format!("pohon kinerja dengan ID {} tidak ditemukan", pokin.id))?;

    let parent = if existing.clone_from == 0 {
        pokin.parent
    } else {
        existing.parent
    };

    let mut row: pohon_kinerja::ActiveModel = existing.into();
    row.parent = Set(parent);
    row.nama_pohon = Set(pokin.nama_pohon.clone());
    row.jenis_pohon = Set(pokin.jenis_pohon.clone());
    row.level_pohon = Set(pokin.level_pohon);
    row.kode_opd = Set(pokin.kode_opd.clone());
    row.keterangan = Set(pokin.keterangan.clone());
    row.keterangan_crosscutting = Set(pokin.keterangan_crosscutting.clone());
    row.tahun = Set(pokin.tahun.clone());
    row.update(db).await.step("gagal mengupdate pohon kinerja")?;

    sync_pelaksana(db, pokin.id, &pokin.pelaksana).await?;
    sync_indikator(db, pokin.id, &pokin.indikator).await?;
    tagging::update_tagging(db, pokin.id, &pokin.tagging).await?;

    find_by_id(db, pokin.id).await
}

/// Hapus node beserta seluruh turunannya lewat sisi parent DAN sisi clone.
///
/// Node asli yang clone-nya ikut terhapus dibuka kembali untuk persetujuan
/// (Disetujui -> MenungguDisetujui). Relasi crosscutting yang menunggu atau
/// ditolak ikut terhapus; relasi berjalan diputus dengan target dikosongkan.
pub async fn delete<C: ConnectionTrait>(db: &C, id: i32) -> AppResult<()> {
    pohon_kinerja::Entity::find_by_id(id)
        .one(db)
        .await
        .step("gagal mencari turunan pohon")?
        .ok_or_not_found("tidak ada data yang akan dihapus")?;

    let ids = collect_closure(db, id, true).await?;
    revert_cloned_sources(db, &ids).await?;
    detach_crosscutting(db, &ids).await?;
    delete_related(db, &ids).await?;
    Ok(())
}

/// Hapus sebuah subtree hasil clone (hanya mengikuti sisi parent)
pub async fn delete_cloned_hierarchy<C: ConnectionTrait>(db: &C, id: i32) -> AppResult<()> {
    pohon_kinerja::Entity::find_by_id(id)
        .one(db)
        .await
        .step("gagal mengambil hierarki clone")?
        .ok_or_not_found("tidak ada data yang akan dihapus")?;

    let ids = collect_closure(db, id, false).await?;
    detach_crosscutting(db, &ids).await?;
    delete_related(db, &ids).await?;
    Ok(())
}

/// Ambil satu node beserta koleksi anaknya
pub async fn find_by_id<C: ConnectionTrait>(db: &C, id: i32) -> AppResult<PohonKinerja> {
    let model = pohon_kinerja::Entity::find_by_id(id)
        .one(db)
        .await
        .step("gagal mengambil pohon kinerja")?
        .ok_or_not_found(format!("pohon kinerja dengan ID {} tidak ditemukan", id))?;

    let aggregates = attach_collections(db, vec![model]).await?;
    aggregates
        .into_iter()
        .next()
        .ok_or_not_found(format!("pohon kinerja dengan ID {} tidak ditemukan", id))
}

/// Daftar pohon aktif sebuah OPD pada satu tahun.
///
/// Status transien workflow disembunyikan; node kiriman pemda tampil lebih
/// dulu, lalu urut level dan id.
pub async fn find_all<C: ConnectionTrait>(
    db: &C,
    kode_opd: &str,
    tahun: &str,
) -> AppResult<Vec<PohonKinerja>> {
    let mut rows = pohon_kinerja::Entity::find()
        .filter(pohon_kinerja::Column::KodeOpd.eq(kode_opd))
        .filter(pohon_kinerja::Column::Tahun.eq(tahun))
        .filter(pohon_kinerja::Column::Status.is_not_in(PokinStatus::excluded_listing_values()))
        .all(db)
        .await
        .step("gagal mengambil daftar pohon kinerja")?;

    rows.sort_by_key(|m| {
        (
            m.status != PokinStatus::PokinDariPemda.as_str(),
            m.level_pohon,
            m.id,
        )
    });

    attach_collections(db, rows).await
}

/// Node pada satu level dengan induk tertentu (tanpa koleksi anak)
pub async fn find_strategic_no_parent<C: ConnectionTrait>(
    db: &C,
    level_pohon: i32,
    parent: i32,
    kode_opd: &str,
    tahun: &str,
) -> AppResult<Vec<PohonKinerja>> {
    let rows = pohon_kinerja::Entity::find()
        .filter(pohon_kinerja::Column::LevelPohon.eq(level_pohon))
        .filter(pohon_kinerja::Column::Parent.eq(parent))
        .filter(pohon_kinerja::Column::KodeOpd.eq(kode_opd))
        .filter(pohon_kinerja::Column::Tahun.eq(tahun))
        .order_by_asc(pohon_kinerja::Column::Id)
        .all(db)
        .await
        .step("gagal mengambil pohon kinerja")?;

    rows.into_iter().map(PohonKinerja::from_model).collect()
}

/// Node sebuah OPD dengan status tertentu (tanpa koleksi anak)
pub async fn find_by_status<C: ConnectionTrait>(
    db: &C,
    kode_opd: &str,
    tahun: &str,
    status: PokinStatus,
) -> AppResult<Vec<PohonKinerja>> {
    let rows = pohon_kinerja::Entity::find()
        .filter(pohon_kinerja::Column::KodeOpd.eq(kode_opd))
        .filter(pohon_kinerja::Column::Tahun.eq(tahun))
        .filter(pohon_kinerja::Column::Status.eq(status.as_str()))
        .order_by_asc(pohon_kinerja::Column::LevelPohon)
        .order_by_asc(pohon_kinerja::Column::Id)
        .all(db)
        .await
        .step("gagal mengambil pohon kinerja")?;

    rows.into_iter().map(PohonKinerja::from_model).collect()
}

/// Node yang sedang atau gagal dipinjam-silang
pub async fn find_by_crosscutting_status<C: ConnectionTrait>(
    db: &C,
    kode_opd: &str,
    tahun: &str,
) -> AppResult<Vec<PohonKinerja>> {
    let rows = pohon_kinerja::Entity::find()
        .filter(pohon_kinerja::Column::KodeOpd.eq(kode_opd))
        .filter(pohon_kinerja::Column::Tahun.eq(tahun))
        .filter(pohon_kinerja::Column::Status.is_in([
            PokinStatus::CrosscuttingMenunggu.as_str(),
            PokinStatus::CrosscuttingDitolak.as_str(),
        ]))
        .order_by_asc(pohon_kinerja::Column::LevelPohon)
        .order_by_asc(pohon_kinerja::Column::Id)
        .all(db)
        .await
        .step("gagal mengambil pohon kinerja")?;

    rows.into_iter().map(PohonKinerja::from_model).collect()
}

/// Filter pencarian dropdown; field kosong / 0 / None berarti tidak difilter
#[derive(Debug, Clone, Default)]
pub struct PokinFilter {
    pub jenis_pohon: String,
    pub level_pohon: i32,
    pub kode_opd: String,
    pub tahun: String,
    pub status: Option<PokinStatus>,
}

/// Pencarian node berdasarkan kombinasi jenis/level/OPD/tahun/status
pub async fn find_by_jenis_pohon<C: ConnectionTrait>(
    db: &C,
    filter: &PokinFilter,
) -> AppResult<Vec<PohonKinerja>> {
    let mut query = pohon_kinerja::Entity::find();
    if !filter.jenis_pohon.is_empty() {
        query = query.filter(pohon_kinerja::Column::JenisPohon.eq(filter.jenis_pohon.as_str()));
    }
    if filter.level_pohon != 0 {
        query = query.filter(pohon_kinerja::Column::LevelPohon.eq(filter.level_pohon));
    }
    if !filter.kode_opd.is_empty() {
        query = query.filter(pohon_kinerja::Column::KodeOpd.eq(filter.kode_opd.as_str()));
    }
    if !filter.tahun.is_empty() {
        query = query.filter(pohon_kinerja::Column::Tahun.eq(filter.tahun.as_str()));
    }
    if let Some(status) = filter.status {
        query = query.filter(pohon_kinerja::Column::Status.eq(status.as_str()));
    }

    let rows = query
        .order_by_asc(pohon_kinerja::Column::NamaPohon)
        .all(db)
        .await
        .step("gagal mengambil pohon kinerja")?;

    rows.into_iter().map(PohonKinerja::from_model).collect()
}

/// Node yang dilaksanakan seorang pegawai (dicari lewat NIP) pada satu tahun
pub async fn find_by_pelaksana<C: ConnectionTrait>(
    db: &C,
    nip: &str,
    tahun: &str,
) -> AppResult<Vec<PohonKinerja>> {
    let pegawai = pegawai::Entity::find()
        .filter(pegawai::Column::Nip.eq(nip))
        .one(db)
        .await
        .step("gagal mengambil data pegawai")?
        .ok_or_not_found(format!("pegawai dengan NIP {} tidak ditemukan", nip))?;

    let pelaksana_rows = pelaksana_pokin::Entity::find()
        .filter(pelaksana_pokin::Column::PegawaiId.eq(pegawai.id.as_str()))
        .all(db)
        .await
        .step("gagal mengambil pelaksana")?;

    let node_ids: Vec<i32> = pelaksana_rows.iter().map(|p| p.pohon_kinerja_id).collect();
    if node_ids.is_empty() {
        return Ok(Vec::new());
    }

    let mut rows = pohon_kinerja::Entity::find()
        .filter(pohon_kinerja::Column::Id.is_in(node_ids))
        .filter(pohon_kinerja::Column::Tahun.eq(tahun))
        .all(db)
        .await
        .step("gagal mengambil data pohon kinerja")?;
    rows.sort_by_key(|m| (m.level_pohon, m.id));

    let mut aggregates = attach_collections(db, rows).await?;
    for pokin in &mut aggregates {
        for pelaksana in &mut pokin.pelaksana {
            if pelaksana.pegawai_id == pegawai.id {
                pelaksana.nip = pegawai.nip.clone();
                pelaksana.nama_pegawai = pegawai.nama.clone();
            }
        }
    }
    Ok(aggregates)
}

/// Clone langsung dari sebuah node (tanpa koleksi anak)
pub async fn find_by_clone_from<C: ConnectionTrait>(
    db: &C,
    clone_from_id: i32,
) -> AppResult<Vec<PohonKinerja>> {
    let rows = pohon_kinerja::Entity::find()
        .filter(pohon_kinerja::Column::CloneFrom.eq(clone_from_id))
        .order_by_asc(pohon_kinerja::Column::Id)
        .all(db)
        .await
        .step("gagal mengambil clone pohon kinerja")?;

    rows.into_iter().map(PohonKinerja::from_model).collect()
}

/// Status sebuah node
pub async fn check_status<C: ConnectionTrait>(db: &C, id: i32) -> AppResult<PokinStatus> {
    let model = pohon_kinerja::Entity::find_by_id(id)
        .one(db)
        .await
        .step("gagal mengecek status")?
        .ok_or_not_found(format!("pohon kinerja dengan ID {} tidak ditemukan", id))?;
    PokinStatus::parse_db(&model.status)
}

/// Asal clone sebuah node (0 = bukan clone)
pub async fn check_clone_from<C: ConnectionTrait>(db: &C, id: i32) -> AppResult<i32> {
    let model = pohon_kinerja::Entity::find_by_id(id)
        .one(db)
        .await
        .step("gagal mengecek clone_from")?
        .ok_or_not_found(format!("pohon kinerja dengan ID {} tidak ditemukan", id))?;
    Ok(model.clone_from)
}

/// Apakah sebuah OPD sudah punya pohon pada tahun tersebut
pub async fn is_exists_by_tahun<C: ConnectionTrait>(
    db: &C,
    kode_opd: &str,
    tahun: &str,
) -> AppResult<bool> {
    let count = pohon_kinerja::Entity::find()
        .filter(pohon_kinerja::Column::KodeOpd.eq(kode_opd))
        .filter(pohon_kinerja::Column::Tahun.eq(tahun))
        .count(db)
        .await
        .step("gagal menghitung pohon kinerja")?;
    Ok(count > 0)
}

/// Pindahkan induk sebuah node tanpa menyentuh field lain
pub async fn update_parent<C: ConnectionTrait>(db: &C, id: i32, parent: i32) -> AppResult<()> {
    pohon_kinerja::Entity::update_many()
        .col_expr(pohon_kinerja::Column::Parent, Expr::value(parent))
        .filter(pohon_kinerja::Column::Id.eq(id))
        .exec(db)
        .await
        .step("gagal mengupdate parent")?;
    Ok(())
}

/// Sinkronkan pelaksana saja, tanpa menyentuh field node
pub async fn update_pelaksana_only<C: ConnectionTrait>(
    db: &C,
    id: i32,
    pelaksana: &[PelaksanaPokin],
) -> AppResult<()> {
    sync_pelaksana(db, id, pelaksana).await
}

/// Pastikan node ada
pub async fn validate_pokin_id<C: ConnectionTrait>(db: &C, id: i32) -> AppResult<()> {
    let count = pohon_kinerja::Entity::find()
        .filter(pohon_kinerja::Column::Id.eq(id))
        .count(db)
        .await
        .step("gagal melakukan validasi pohon kinerja")?;
    if count == 0 {
        return Err(AppError::NotFound(format!(
            "pohon kinerja dengan ID {} tidak ditemukan",
            id
        )));
    }
    Ok(())
}

/// Pastikan node berada pada level yang diharapkan suatu pemakaian
pub async fn validate_pokin_level<C: ConnectionTrait>(
    db: &C,
    id: i32,
    expected_level: i32,
    purpose: &str,
) -> AppResult<()> {
    let model = pohon_kinerja::Entity::find_by_id(id)
        .one(db)
        .await
        .step("gagal melakukan validasi pohon kinerja")?
        .ok_or_not_found(format!("pohon kinerja dengan ID {} tidak ditemukan", id))?;

    if model.level_pohon != expected_level {
        return Err(AppError::Validation(format!(
            "{} hanya bisa dibuat dari pohon kinerja level {}, bukan level {}",
            purpose, expected_level, model.level_pohon
        )));
    }
    Ok(())
}

/// Setter status mentah, tanpa tabel transisi.
///
/// Dipakai aturan bisnis internal (clone, crosscutting, delete-cascade);
/// pemanggil luar memakai `workflow::update_status` yang tervalidasi.
pub(crate) async fn set_status<C: ConnectionTrait>(
    db: &C,
    id: i32,
    status: PokinStatus,
) -> AppResult<()> {
    pohon_kinerja::Entity::update_many()
        .col_expr(pohon_kinerja::Column::Status, Expr::value(status.as_str()))
        .filter(pohon_kinerja::Column::Id.eq(id))
        .exec(db)
        .await
        .step("gagal mengupdate status")?;
    Ok(())
}

/// Lengkapi kumpulan baris node dengan koleksi anaknya (query per tabel, batch)
pub(crate) async fn attach_collections<C: ConnectionTrait>(
    db: &C,
    models: Vec<pohon_kinerja::Model>,
) -> AppResult<Vec<PohonKinerja>> {
    if models.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<i32> = models.iter().map(|m| m.id).collect();

    let pelaksana_rows = pelaksana_pokin::Entity::find()
        .filter(pelaksana_pokin::Column::PohonKinerjaId.is_in(ids.clone()))
        .order_by_asc(pelaksana_pokin::Column::Id)
        .all(db)
        .await
        .step("gagal mengambil pelaksana")?;

    let indikator_rows = indikator::Entity::find()
        .filter(indikator::Column::PokinId.is_in(ids.clone()))
        .order_by_asc(indikator::Column::CreatedAt)
        .order_by_asc(indikator::Column::Id)
        .all(db)
        .await
        .step("gagal mengambil indikator")?;

    let indikator_ids: Vec<String> = indikator_rows.iter().map(|i| i.id.clone()).collect();
    let target_rows = if indikator_ids.is_empty() {
        Vec::new()
    } else {
        target::Entity::find()
            .filter(target::Column::IndikatorId.is_in(indikator_ids))
            .order_by_asc(target::Column::Id)
            .all(db)
            .await
            .step("gagal mengambil target")?
    };

    let tagging_map = tagging::find_tagging_for_pokins(db, &ids).await?;

    let mut targets_by_indikator: HashMap<String, Vec<Target>> = HashMap::new();
    for row in target_rows {
        targets_by_indikator
            .entry(row.indikator_id.clone())
            .or_default()
            .push(Target::from(row));
    }

    let mut indikator_by_pokin: HashMap<i32, Vec<Indikator>> = HashMap::new();
    for row in indikator_rows {
        let pokin_id = row.pokin_id;
        let mut ind = Indikator::from_model(row);
        ind.target = targets_by_indikator.remove(&ind.id).unwrap_or_default();
        indikator_by_pokin.entry(pokin_id).or_default().push(ind);
    }

    let mut pelaksana_by_pokin: HashMap<i32, Vec<PelaksanaPokin>> = HashMap::new();
    for row in pelaksana_rows {
        pelaksana_by_pokin
            .entry(row.pohon_kinerja_id)
            .or_default()
            .push(PelaksanaPokin::from(row));
    }

    let mut tagging_by_pokin = tagging_map;

    let mut result = Vec::with_capacity(models.len());
    for model in models {
        let id = model.id;
        let mut pokin = PohonKinerja::from_model(model)?;
        pokin.pelaksana = pelaksana_by_pokin.remove(&id).unwrap_or_default();
        pokin.indikator = indikator_by_pokin.remove(&id).unwrap_or_default();
        pokin.tagging = tagging_by_pokin.remove(&id).unwrap_or_default();
        result.push(pokin);
    }
    Ok(result)
}

// --- sinkronisasi koleksi anak ---

/// Rencana perubahan pelaksana; kunci diff adalah pegawai, karena keunikan
/// penugasan adalah (node, pegawai)
fn diff_pelaksana(
    existing: &[pelaksana_pokin::Model],
    incoming: &[PelaksanaPokin],
) -> (Vec<String>, Vec<String>) {
    let existing_by_pegawai: HashMap<&str, &str> = existing
        .iter()
        .map(|row| (row.pegawai_id.as_str(), row.id.as_str()))
        .collect();

    let mut wanted: HashSet<&str> = HashSet::new();
    let mut to_insert = Vec::new();
    for pelaksana in incoming {
        if pelaksana.pegawai_id.is_empty() || !wanted.insert(pelaksana.pegawai_id.as_str()) {
            continue;
        }
        if !existing_by_pegawai.contains_key(pelaksana.pegawai_id.as_str()) {
            to_insert.push(pelaksana.pegawai_id.clone());
        }
    }

    let to_delete = existing
        .iter()
        .filter(|row| !wanted.contains(row.pegawai_id.as_str()))
        .map(|row| row.id.clone())
        .collect();

    (to_insert, to_delete)
}

async fn insert_pelaksana<C: ConnectionTrait>(
    db: &C,
    pokin_id: i32,
    pelaksana: &[PelaksanaPokin],
) -> AppResult<()> {
    let mut seen: HashSet<&str> = HashSet::new();
    for p in pelaksana {
        if p.pegawai_id.is_empty() || !seen.insert(p.pegawai_id.as_str()) {
            continue;
        }
        let id = if p.id.is_empty() {
            new_id("PLKS-")
        } else {
            p.id.clone()
        };
        pelaksana_pokin::ActiveModel {
            id: Set(id),
            pohon_kinerja_id: Set(pokin_id),
            pegawai_id: Set(p.pegawai_id.clone()),
        }
        .insert(db)
        .await
        .step("gagal menyimpan pelaksana")?;
    }
    Ok(())
}

async fn sync_pelaksana<C: ConnectionTrait>(
    db: &C,
    pokin_id: i32,
    incoming: &[PelaksanaPokin],
) -> AppResult<()> {
    let existing = pelaksana_pokin::Entity::find()
        .filter(pelaksana_pokin::Column::PohonKinerjaId.eq(pokin_id))
        .all(db)
        .await
        .step("gagal mengambil pelaksana")?;

    let (to_insert, to_delete) = diff_pelaksana(&existing, incoming);

    if !to_delete.is_empty() {
        pelaksana_pokin::Entity::delete_many()
            .filter(pelaksana_pokin::Column::Id.is_in(to_delete))
            .exec(db)
            .await
            .step("gagal menghapus pelaksana")?;
    }
    for pegawai_id in to_insert {
        pelaksana_pokin::ActiveModel {
            id: Set(new_id("PLKS-")),
            pohon_kinerja_id: Set(pokin_id),
            pegawai_id: Set(pegawai_id),
        }
        .insert(db)
        .await
        .step("gagal menyimpan pelaksana")?;
    }
    Ok(())
}

async fn insert_indikator<C: ConnectionTrait>(
    db: &C,
    pokin_id: i32,
    ind: &Indikator,
) -> AppResult<()> {
    let now = chrono::Utc::now().naive_utc();
    let indikator_id = if ind.id.is_empty() {
        new_id("IND-")
    } else {
        ind.id.clone()
    };

    indikator::ActiveModel {
        id: Set(indikator_id.clone()),
        pokin_id: Set(pokin_id),
        indikator: Set(ind.indikator.clone()),
        tahun: Set(ind.tahun.clone()),
        clone_from: Set(ind.clone_from.clone()),
        created_at: Set(now),
    }
    .insert(db)
    .await
    .step("gagal menyimpan indikator")?;

    insert_targets(db, &indikator_id, &ind.target).await
}

async fn insert_targets<C: ConnectionTrait>(
    db: &C,
    indikator_id: &str,
    targets: &[Target],
) -> AppResult<()> {
    for t in targets {
        let target_id = if t.id.is_empty() {
            new_id("TRG-")
        } else {
            t.id.clone()
        };
        target::ActiveModel {
            id: Set(target_id),
            indikator_id: Set(indikator_id.to_string()),
            target: Set(t.target.clone()),
            satuan: Set(t.satuan.clone()),
            tahun: Set(t.tahun.clone()),
            clone_from: Set(t.clone_from.clone()),
        }
        .insert(db)
        .await
        .step("gagal menyimpan target")?;
    }
    Ok(())
}

async fn sync_indikator<C: ConnectionTrait>(
    db: &C,
    pokin_id: i32,
    incoming: &[Indikator],
) -> AppResult<()> {
    let existing = indikator::Entity::find()
        .filter(indikator::Column::PokinId.eq(pokin_id))
        .all(db)
        .await
        .step("gagal mengambil indikator")?;
    let existing_ids: HashSet<&str> = existing.iter().map(|i| i.id.as_str()).collect();

    let mut kept: HashSet<&str> = HashSet::new();
    for ind in incoming {
        if !ind.id.is_empty() && existing_ids.contains(ind.id.as_str()) {
            kept.insert(ind.id.as_str());
            // Riwayat clone_from baris lama dipertahankan
            indikator::Entity::update_many()
                .col_expr(indikator::Column::Indikator, Expr::value(ind.indikator.clone()))
                .col_expr(indikator::Column::Tahun, Expr::value(ind.tahun.clone()))
                .filter(indikator::Column::Id.eq(ind.id.as_str()))
                .exec(db)
                .await
                .step("gagal mengupdate indikator")?;

            target::Entity::delete_many()
                .filter(target::Column::IndikatorId.eq(ind.id.as_str()))
                .exec(db)
                .await
                .step("gagal menghapus target")?;
            insert_targets(db, &ind.id, &ind.target).await?;
        } else {
            insert_indikator(db, pokin_id, ind).await?;
        }
    }

    // Indikator yang tidak ada dalam permintaan dihapus berikut targetnya
    let removed: Vec<String> = existing
        .iter()
        .filter(|row| !kept.contains(row.id.as_str()))
        .map(|row| row.id.clone())
        .collect();
    if !removed.is_empty() {
        target::Entity::delete_many()
            .filter(target::Column::IndikatorId.is_in(removed.clone()))
            .exec(db)
            .await
            .step("gagal menghapus target")?;
        indikator::Entity::delete_many()
            .filter(indikator::Column::Id.is_in(removed))
            .exec(db)
            .await
            .step("gagal menghapus indikator")?;
    }
    Ok(())
}

// --- penghapusan rekursif ---

/// Kumpulkan id node yang tergabung dengan `root`: selalu lewat sisi parent,
/// dan bila `with_clones` juga lewat sisi clone_from
pub(crate) async fn collect_closure<C: ConnectionTrait>(
    db: &C,
    root: i32,
    with_clones: bool,
) -> AppResult<Vec<i32>> {
    let mut seen: HashSet<i32> = HashSet::from([root]);
    let mut order = vec![root];
    let mut frontier = vec![root];

    while !frontier.is_empty() {
        let mut condition =
            Condition::any().add(pohon_kinerja::Column::Parent.is_in(frontier.clone()));
        if with_clones {
            condition = condition.add(pohon_kinerja::Column::CloneFrom.is_in(frontier.clone()));
        }
        let rows = pohon_kinerja::Entity::find()
            .filter(condition)
            .all(db)
            .await
            .step("gagal mencari turunan pohon")?;

        frontier = rows
            .into_iter()
            .filter(|m| seen.insert(m.id))
            .map(|m| m.id)
            .collect();
        order.extend(&frontier);
    }
    Ok(order)
}

/// Buka kembali node asli yang clone-nya ikut terhapus
async fn revert_cloned_sources<C: ConnectionTrait>(db: &C, ids: &[i32]) -> AppResult<()> {
    let inside: HashSet<i32> = ids.iter().copied().collect();
    let clones = pohon_kinerja::Entity::find()
        .filter(pohon_kinerja::Column::Id.is_in(ids.to_vec()))
        .filter(pohon_kinerja::Column::CloneFrom.ne(0))
        .all(db)
        .await
        .step("gagal membaca ID turunan pohon")?;

    for clone in clones {
        if inside.contains(&clone.clone_from) {
            continue;
        }
        pohon_kinerja::Entity::update_many()
            .col_expr(
                pohon_kinerja::Column::Status,
                Expr::value(PokinStatus::MenungguDisetujui.as_str()),
            )
            .filter(pohon_kinerja::Column::Id.eq(clone.clone_from))
            .filter(pohon_kinerja::Column::Status.eq(PokinStatus::Disetujui.as_str()))
            .exec(db)
            .await
            .step("gagal mengupdate status node asli")?;
    }
    Ok(())
}

/// Relasi crosscutting tidak boleh menunjuk node yang sudah dihapus
async fn detach_crosscutting<C: ConnectionTrait>(db: &C, ids: &[i32]) -> AppResult<()> {
    let touches = Condition::any()
        .add(crosscutting::Column::CrosscuttingFrom.is_in(ids.to_vec()))
        .add(crosscutting::Column::CrosscuttingTo.is_in(ids.to_vec()));

    crosscutting::Entity::delete_many()
        .filter(touches.clone())
        .filter(crosscutting::Column::Status.is_in([
            CrosscuttingStatus::Menunggu.as_str(),
            CrosscuttingStatus::Ditolak.as_str(),
        ]))
        .exec(db)
        .await
        .step("gagal menghapus crosscutting pending")?;

    crosscutting::Entity::update_many()
        .col_expr(
            crosscutting::Column::Status,
            Expr::value(CrosscuttingStatus::Terputus.as_str()),
        )
        .col_expr(crosscutting::Column::CrosscuttingTo, Expr::value(0))
        .filter(touches)
        .filter(crosscutting::Column::Status.eq(CrosscuttingStatus::Disetujui.as_str()))
        .exec(db)
        .await
        .step("gagal mengupdate status crosscutting")?;
    Ok(())
}

async fn delete_related<C: ConnectionTrait>(db: &C, ids: &[i32]) -> AppResult<()> {
    let indikator_ids: Vec<String> = indikator::Entity::find()
        .filter(indikator::Column::PokinId.is_in(ids.to_vec()))
        .all(db)
        .await
        .step("gagal mengambil indikator")?
        .into_iter()
        .map(|i| i.id)
        .collect();

    if !indikator_ids.is_empty() {
        target::Entity::delete_many()
            .filter(target::Column::IndikatorId.is_in(indikator_ids))
            .exec(db)
            .await
            .step("gagal menghapus target")?;
    }

    indikator::Entity::delete_many()
        .filter(indikator::Column::PokinId.is_in(ids.to_vec()))
        .exec(db)
        .await
        .step("gagal menghapus indikator")?;

    pelaksana_pokin::Entity::delete_many()
        .filter(pelaksana_pokin::Column::PohonKinerjaId.is_in(ids.to_vec()))
        .exec(db)
        .await
        .step("gagal menghapus pelaksana")?;

    let tagging_ids: Vec<i32> = tagging_pokin::Entity::find()
        .filter(tagging_pokin::Column::IdPokin.is_in(ids.to_vec()))
        .all(db)
        .await
        .step("gagal mengambil tagging")?
        .into_iter()
        .map(|t| t.id)
        .collect();

    if !tagging_ids.is_empty() {
        keterangan_tagging::Entity::delete_many()
            .filter(keterangan_tagging::Column::IdTagging.is_in(tagging_ids))
            .exec(db)
            .await
            .step("gagal menghapus keterangan tagging")?;
    }

    tagging_pokin::Entity::delete_many()
        .filter(tagging_pokin::Column::IdPokin.is_in(ids.to_vec()))
        .exec(db)
        .await
        .step("gagal menghapus tagging")?;

    lineage::delete_for(db, ids).await?;

    pohon_kinerja::Entity::delete_many()
        .filter(pohon_kinerja::Column::Id.is_in(ids.to_vec()))
        .exec(db)
        .await
        .step("gagal menghapus pohon kinerja")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pelaksana_row(id: &str, pegawai: &str) -> pelaksana_pokin::Model {
        pelaksana_pokin::Model {
            id: id.to_string(),
            pohon_kinerja_id: 1,
            pegawai_id: pegawai.to_string(),
        }
    }

    fn pelaksana_input(pegawai: &str) -> PelaksanaPokin {
        PelaksanaPokin {
            pegawai_id: pegawai.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_new_id_prefix_and_length() {
        let id = new_id("PLKS-");
        assert!(id.starts_with("PLKS-"));
        assert_eq!(id.len(), "PLKS-".len() + 8);
        assert_ne!(new_id("PLKS-"), new_id("PLKS-"));
    }

    #[test]
    fn test_diff_pelaksana_keeps_unchanged_rows() {
        let existing = vec![pelaksana_row("PLKS-a", "peg-1"), pelaksana_row("PLKS-b", "peg-2")];
        let incoming = vec![pelaksana_input("peg-2"), pelaksana_input("peg-3")];

        let (to_insert, to_delete) = diff_pelaksana(&existing, &incoming);
        assert_eq!(to_insert, vec!["peg-3".to_string()]);
        assert_eq!(to_delete, vec!["PLKS-a".to_string()]);
    }

    #[test]
    fn test_diff_pelaksana_dedups_by_pegawai() {
        let existing = vec![];
        let incoming = vec![
            pelaksana_input("peg-1"),
            pelaksana_input("peg-1"),
            pelaksana_input(""),
        ];

        let (to_insert, to_delete) = diff_pelaksana(&existing, &incoming);
        assert_eq!(to_insert, vec!["peg-1".to_string()]);
        assert!(to_delete.is_empty());
    }

    #[test]
    fn test_diff_pelaksana_empty_incoming_clears_all() {
        let existing = vec![pelaksana_row("PLKS-a", "peg-1")];
        let (to_insert, to_delete) = diff_pelaksana(&existing, &[]);
        assert!(to_insert.is_empty());
        assert_eq!(to_delete, vec!["PLKS-a".to_string()]);
    }
}
