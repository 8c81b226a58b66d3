//! Clone Engine - penggandaan subtree antar tahun dan antar konteks
//!
//! Dua mode: clone subtree penuh dengan penulisan ulang parent
//! ([`clone_hierarchy_recursive`]), dan clone massal pohon satu OPD ke tahun
//! berikutnya ([`clone_pokin_opd`]). Operasi di sini atomik hanya per
//! statement; transaksi milik pemanggil yang menjadi batas atomisitas
//! keseluruhan.

use std::collections::HashMap;

use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set};

use crate::entity::{indikator, pelaksana_pokin, pohon_kinerja, target};
use crate::error::{AppResult, OptionExt, StoreStep};
use crate::pokin::hierarchy::TreeSnapshot;
use crate::pokin::status::PokinStatus;
use crate::pokin::store::{self, new_id};
use crate::pokin::{lineage, tagging};

/// Status node hasil clone: level 0-3 meneruskan status sumbernya, level di
/// atas itu selalu masuk antrean persetujuan lagi
pub(crate) fn clone_status(level_pohon: i32, source_status: PokinStatus) -> PokinStatus {
    if level_pohon <= 3 {
        source_status
    } else {
        PokinStatus::MenungguDisetujui
    }
}

/// Clone satu node pemda ke tahun tujuan beserta indikator, target, dan
/// pelaksananya. Parent hasil clone diset 0; pemanggil rekursif yang
/// menuliskan parent barunya. Mengembalikan id node baru.
pub async fn clone_pokin_pemda<C: ConnectionTrait>(
    db: &C,
    source_id: i32,
    target_tahun: &str,
) -> AppResult<i32> {
    let source = pohon_kinerja::Entity::find_by_id(source_id)
        .one(db)
        .await
        .step("gagal mengambil data source")?
        .filter(|m| m.status != PokinStatus::TarikPokinOpd.as_str())
        .ok_or_not_found(format!("data dengan ID {} tidak ditemukan", source_id))?;

    let status = clone_status(source.level_pohon, PokinStatus::parse_db(&source.status)?);

    let inserted = pohon_kinerja::ActiveModel {
        parent: Set(0),
        nama_pohon: Set(source.nama_pohon.clone()),
        jenis_pohon: Set(source.jenis_pohon.clone()),
        level_pohon: Set(source.level_pohon),
        kode_opd: Set(source.kode_opd.clone()),
        keterangan: Set(source.keterangan.clone()),
        keterangan_crosscutting: Set(source.keterangan_crosscutting.clone()),
        tahun: Set(target_tahun.to_string()),
        status: Set(status.as_str().to_string()),
        clone_from: Set(source_id),
        is_active: Set(source.is_active),
        created_at: Set(chrono::Utc::now().naive_utc()),
        ..Default::default()
    }
    .insert(db)
    .await
    .step("gagal menyimpan data pohon kinerja yang di-clone")?;

    lineage::record(db, source_id, inserted.id, target_tahun).await?;
    clone_indikator_and_target(db, source_id, inserted.id).await?;
    clone_pelaksana(db, source_id, inserted.id).await?;

    Ok(inserted.id)
}

/// Clone subtree penuh: node ini lalu, rekursif, seluruh turunannya.
///
/// Setiap salinan menunjuk id baru dari salinan induknya; akar subtree
/// memakai `new_parent_id` dari pemanggil (0 = jadi akar). Node yang sudah
/// ditarik OPD (`tarik pokin opd`) dilewati bersama turunannya.
pub async fn clone_hierarchy_recursive<C: ConnectionTrait>(
    db: &C,
    source_id: i32,
    new_parent_id: i32,
    target_tahun: &str,
) -> AppResult<i32> {
    let new_id = clone_pokin_pemda(db, source_id, target_tahun).await?;
    if new_parent_id > 0 {
        store::update_parent(db, new_id, new_parent_id).await?;
    }

    let children = pohon_kinerja::Entity::find()
        .filter(pohon_kinerja::Column::Parent.eq(source_id))
        .filter(pohon_kinerja::Column::Status.ne(PokinStatus::TarikPokinOpd.as_str()))
        .all(db)
        .await
        .step("gagal mengambil child")?;

    for child in children {
        Box::pin(clone_hierarchy_recursive(db, child.id, new_id, target_tahun)).await?;
    }

    Ok(new_id)
}

/// Salin indikator (dan targetnya) sebuah node ke node lain, dengan id baru
/// berprefiks clone dan `clone_from` menunjuk baris sumbernya
pub(crate) async fn clone_indikator_and_target<C: ConnectionTrait>(
    db: &C,
    source_pokin_id: i32,
    new_pokin_id: i32,
) -> AppResult<()> {
    let sources = indikator::Entity::find()
        .filter(indikator::Column::PokinId.eq(source_pokin_id))
        .all(db)
        .await
        .step("gagal mengambil data indikator")?;

    for source in sources {
        let new_indikator_id = new_id("IND-POKIN-");
        indikator::ActiveModel {
            id: Set(new_indikator_id.clone()),
            pokin_id: Set(new_pokin_id),
            indikator: Set(source.indikator.clone()),
            tahun: Set(source.tahun.clone()),
            clone_from: Set(source.id.clone()),
            created_at: Set(chrono::Utc::now().naive_utc()),
        }
        .insert(db)
        .await
        .step("gagal menyimpan indikator baru")?;

        let targets = target::Entity::find()
            .filter(target::Column::IndikatorId.eq(source.id.as_str()))
            .all(db)
            .await
            .step("gagal mengambil data target")?;

        for t in targets {
            target::ActiveModel {
                id: Set(new_id("TRGT-IND-")),
                indikator_id: Set(new_indikator_id.clone()),
                target: Set(t.target.clone()),
                satuan: Set(t.satuan.clone()),
                tahun: Set(t.tahun.clone()),
                clone_from: Set(t.id.clone()),
            }
            .insert(db)
            .await
            .step("gagal menyimpan target baru")?;
        }
    }
    Ok(())
}

/// Salin pelaksana sebuah node ke node lain dengan id penugasan baru
pub(crate) async fn clone_pelaksana<C: ConnectionTrait>(
    db: &C,
    source_pokin_id: i32,
    new_pokin_id: i32,
) -> AppResult<()> {
    let sources = pelaksana_pokin::Entity::find()
        .filter(pelaksana_pokin::Column::PohonKinerjaId.eq(source_pokin_id))
        .all(db)
        .await
        .step("gagal mengambil pelaksana")?;

    for source in sources {
        pelaksana_pokin::ActiveModel {
            id: Set(new_id("PLKS-")),
            pohon_kinerja_id: Set(new_pokin_id),
            pegawai_id: Set(source.pegawai_id.clone()),
        }
        .insert(db)
        .await
        .step("gagal clone pelaksana")?;
    }
    Ok(())
}

/// Node yang layak ikut clone tahunan: berstatus draft, dan induknya akar,
/// draft, atau di luar cakupan. Urut level lalu id sehingga induk selalu
/// tersalin sebelum anaknya.
pub(crate) fn eligible_for_year_clone(snapshot: &TreeSnapshot) -> Vec<i32> {
    let draft = PokinStatus::Draft.as_str();
    let mut eligible: Vec<i32> = snapshot
        .ids()
        .filter(|id| {
            let Some(node) = snapshot.get(*id) else {
                return false;
            };
            if node.status != draft {
                return false;
            }
            node.parent == 0
                || snapshot
                    .get(node.parent)
                    .map(|p| p.status == draft)
                    .unwrap_or(true)
        })
        .collect();
    eligible.sort_by_key(|id| snapshot.get(*id).map(|n| (n.level_pohon, n.id)).unwrap_or((0, *id)));
    eligible
}

/// Clone massal pohon sebuah OPD dari satu tahun ke tahun lain.
///
/// Pemetaan id lama -> id baru dibawa eksplisit selama proses sehingga
/// parent hasil clone langsung menunjuk salinan induknya; induk yang tidak
/// ikut tersalin dibiarkan menunjuk id lamanya. Mengembalikan banyaknya node
/// yang tersalin.
pub async fn clone_pokin_opd<C: ConnectionTrait>(
    db: &C,
    kode_opd: &str,
    source_tahun: &str,
    target_tahun: &str,
) -> AppResult<usize> {
    let snapshot = TreeSnapshot::load(db, kode_opd, source_tahun).await?;
    let eligible = eligible_for_year_clone(&snapshot);

    let mut id_map: HashMap<i32, i32> = HashMap::new();
    for old_id in &eligible {
        let Some(source) = snapshot.get(*old_id) else {
            continue;
        };
        let parent = id_map.get(&source.parent).copied().unwrap_or(source.parent);

        let inserted = pohon_kinerja::ActiveModel {
            parent: Set(parent),
            nama_pohon: Set(source.nama_pohon.clone()),
            jenis_pohon: Set(source.jenis_pohon.clone()),
            level_pohon: Set(source.level_pohon),
            kode_opd: Set(source.kode_opd.clone()),
            keterangan: Set(source.keterangan.clone()),
            keterangan_crosscutting: Set(source.keterangan_crosscutting.clone()),
            tahun: Set(target_tahun.to_string()),
            status: Set(PokinStatus::Draft.as_str().to_string()),
            clone_from: Set(0),
            is_active: Set(source.is_active),
            created_at: Set(chrono::Utc::now().naive_utc()),
            ..Default::default()
        }
        .insert(db)
        .await
        .step("gagal menyimpan data pohon kinerja yang di-clone")?;

        id_map.insert(source.id, inserted.id);
        lineage::record(db, source.id, inserted.id, target_tahun).await?;

        clone_indikator_target_for_year(db, source.id, inserted.id, target_tahun).await?;
        tagging::clone_tagging(db, source.id, inserted.id).await?;
    }

    Ok(id_map.len())
}

/// Salin indikator/target untuk clone tahunan: id baru berprefiks biasa dan
/// tahun diganti ke tahun tujuan (salinan pengarang baru, bukan jejak
/// persetujuan, sehingga `clone_from` tidak diisi)
async fn clone_indikator_target_for_year<C: ConnectionTrait>(
    db: &C,
    source_pokin_id: i32,
    new_pokin_id: i32,
    target_tahun: &str,
) -> AppResult<()> {
    let sources = indikator::Entity::find()
        .filter(indikator::Column::PokinId.eq(source_pokin_id))
        .all(db)
        .await
        .step("gagal mengambil data indikator")?;

    for source in sources {
        let new_indikator_id = new_id("IND-");
        indikator::ActiveModel {
            id: Set(new_indikator_id.clone()),
            pokin_id: Set(new_pokin_id),
            indikator: Set(source.indikator.clone()),
            tahun: Set(target_tahun.to_string()),
            clone_from: Set(String::new()),
            created_at: Set(chrono::Utc::now().naive_utc()),
        }
        .insert(db)
        .await
        .step("gagal menyimpan indikator baru")?;

        let targets = target::Entity::find()
            .filter(target::Column::IndikatorId.eq(source.id.as_str()))
            .all(db)
            .await
            .step("gagal mengambil data target")?;

        for t in targets {
            target::ActiveModel {
                id: Set(new_id("TRG-")),
                indikator_id: Set(new_indikator_id.clone()),
                target: Set(t.target.clone()),
                satuan: Set(t.satuan.clone()),
                tahun: Set(target_tahun.to_string()),
                clone_from: Set(String::new()),
            }
            .insert(db)
            .await
            .step("gagal menyimpan target baru")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clone_status_rule() {
        // level tematik/sub-tematik meneruskan status sumber
        assert_eq!(clone_status(0, PokinStatus::Draft), PokinStatus::Draft);
        assert_eq!(
            clone_status(3, PokinStatus::PokinDariPemda),
            PokinStatus::PokinDariPemda
        );

        // level strategic ke bawah selalu antre persetujuan lagi
        assert_eq!(
            clone_status(4, PokinStatus::Disetujui),
            PokinStatus::MenungguDisetujui
        );
        assert_eq!(
            clone_status(6, PokinStatus::Draft),
            PokinStatus::MenungguDisetujui
        );
    }

    fn node(id: i32, parent: i32, level: i32, status: &str) -> pohon_kinerja::Model {
        pohon_kinerja::Model {
            id,
            parent,
            nama_pohon: format!("node-{}", id),
            jenis_pohon: String::new(),
            level_pohon: level,
            kode_opd: "opd-1".to_string(),
            keterangan: String::new(),
            keterangan_crosscutting: String::new(),
            tahun: "2024".to_string(),
            status: status.to_string(),
            clone_from: 0,
            is_active: true,
            created_at: chrono::NaiveDateTime::default(),
        }
    }

    #[test]
    fn test_eligible_for_year_clone() {
        let snapshot = TreeSnapshot::from_models(vec![
            node(1, 0, 4, ""),
            node(2, 1, 5, ""),
            // node yang sudah diajukan tidak ikut
            node(3, 1, 5, "menunggu_disetujui"),
            // anak dari induk non-draft tidak ikut
            node(4, 3, 6, ""),
            // induk di luar cakupan dianggap sah
            node(5, 999, 4, ""),
        ]);

        let eligible = eligible_for_year_clone(&snapshot);
        assert_eq!(eligible, vec![1, 5, 2]);
    }

    #[test]
    fn test_eligible_orders_parents_first() {
        let snapshot = TreeSnapshot::from_models(vec![
            node(30, 20, 6, ""),
            node(20, 10, 5, ""),
            node(10, 0, 4, ""),
        ]);
        assert_eq!(eligible_for_year_clone(&snapshot), vec![10, 20, 30]);
    }
}
