//! Tagging - penanda program unggulan pada node pohon kinerja
//!
//! Tagging mengikuti disiplin diff-per-id yang sama dengan indikator:
//! baris dengan id dikenal diupdate, baris tanpa id dibuat, id yang hilang
//! dari permintaan dihapus berikut keterangan programnya.

use std::collections::{HashMap, HashSet};

use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::entity::{keterangan_tagging, tagging_pokin};
use crate::error::{AppResult, StoreStep};
use crate::pokin::domain::{KeteranganTagging, TaggingPokin};

/// Simpan tagging baru beserta keterangan programnya
pub async fn insert_tagging<C: ConnectionTrait>(
    db: &C,
    pokin_id: i32,
    taggings: &[TaggingPokin],
) -> AppResult<Vec<TaggingPokin>> {
    let mut result = Vec::with_capacity(taggings.len());
    for tagging in taggings {
        result.push(insert_one(db, pokin_id, tagging).await?);
    }
    Ok(result)
}

async fn insert_one<C: ConnectionTrait>(
    db: &C,
    pokin_id: i32,
    tagging: &TaggingPokin,
) -> AppResult<TaggingPokin> {
    let inserted = tagging_pokin::ActiveModel {
        id_pokin: Set(pokin_id),
        nama_tagging: Set(tagging.nama_tagging.clone()),
        clone_from: Set(tagging.clone_from),
        ..Default::default()
    }
    .insert(db)
    .await
    .step("gagal menyimpan tagging")?;

    insert_keterangan(db, inserted.id, &tagging.keterangan).await?;

    let mut created = TaggingPokin::from_model(inserted);
    created.keterangan = tagging.keterangan.clone();
    Ok(created)
}

async fn insert_keterangan<C: ConnectionTrait>(
    db: &C,
    tagging_id: i32,
    keterangan: &[KeteranganTagging],
) -> AppResult<()> {
    for k in keterangan {
        keterangan_tagging::ActiveModel {
            id_tagging: Set(tagging_id),
            kode_program_unggulan: Set(k.kode_program_unggulan.clone()),
            tahun: Set(k.tahun.clone()),
            ..Default::default()
        }
        .insert(db)
        .await
        .step("gagal menyimpan keterangan tagging")?;
    }
    Ok(())
}

/// Id tagging lama yang tidak disebut lagi oleh permintaan
fn removed_tagging_ids(existing_ids: &[i32], incoming: &[TaggingPokin]) -> Vec<i32> {
    let kept: HashSet<i32> = incoming.iter().filter(|t| t.id != 0).map(|t| t.id).collect();
    existing_ids
        .iter()
        .copied()
        .filter(|id| !kept.contains(id))
        .collect()
}

/// Sinkronkan tagging sebuah node dengan himpunan yang diminta
pub async fn update_tagging<C: ConnectionTrait>(
    db: &C,
    pokin_id: i32,
    taggings: &[TaggingPokin],
) -> AppResult<Vec<TaggingPokin>> {
    let existing_ids: Vec<i32> = tagging_pokin::Entity::find()
        .filter(tagging_pokin::Column::IdPokin.eq(pokin_id))
        .all(db)
        .await
        .step("gagal mengambil tagging")?
        .into_iter()
        .map(|t| t.id)
        .collect();

    let removed = removed_tagging_ids(&existing_ids, taggings);
    if !removed.is_empty() {
        keterangan_tagging::Entity::delete_many()
            .filter(keterangan_tagging::Column::IdTagging.is_in(removed.clone()))
            .exec(db)
            .await
            .step("gagal menghapus keterangan tagging")?;
        tagging_pokin::Entity::delete_many()
            .filter(tagging_pokin::Column::Id.is_in(removed))
            .exec(db)
            .await
            .step("gagal menghapus tagging")?;
    }

    let mut result = Vec::with_capacity(taggings.len());
    for tagging in taggings {
        if tagging.id != 0 {
            tagging_pokin::Entity::update_many()
                .col_expr(
                    tagging_pokin::Column::NamaTagging,
                    Expr::value(tagging.nama_tagging.clone()),
                )
                .filter(tagging_pokin::Column::Id.eq(tagging.id))
                .filter(tagging_pokin::Column::IdPokin.eq(pokin_id))
                .exec(db)
                .await
                .step("gagal mengupdate tagging")?;

            // Keterangan program diganti utuh per tagging
            keterangan_tagging::Entity::delete_many()
                .filter(keterangan_tagging::Column::IdTagging.eq(tagging.id))
                .exec(db)
                .await
                .step("gagal menghapus keterangan tagging")?;
            insert_keterangan(db, tagging.id, &tagging.keterangan).await?;

            result.push(tagging.clone());
        } else {
            result.push(insert_one(db, pokin_id, tagging).await?);
        }
    }
    Ok(result)
}

/// Tagging sebuah node berikut keterangan programnya, urut id
pub async fn find_tagging_by_pokin_id<C: ConnectionTrait>(
    db: &C,
    pokin_id: i32,
) -> AppResult<Vec<TaggingPokin>> {
    let mut map = find_tagging_for_pokins(db, &[pokin_id]).await?;
    Ok(map.remove(&pokin_id).unwrap_or_default())
}

/// Tagging untuk sekumpulan node sekaligus, dikelompokkan per node
pub(crate) async fn find_tagging_for_pokins<C: ConnectionTrait>(
    db: &C,
    pokin_ids: &[i32],
) -> AppResult<HashMap<i32, Vec<TaggingPokin>>> {
    if pokin_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let tagging_rows = tagging_pokin::Entity::find()
        .filter(tagging_pokin::Column::IdPokin.is_in(pokin_ids.to_vec()))
        .order_by_asc(tagging_pokin::Column::Id)
        .all(db)
        .await
        .step("gagal mengambil tagging")?;

    let tagging_ids: Vec<i32> = tagging_rows.iter().map(|t| t.id).collect();
    let keterangan_rows = if tagging_ids.is_empty() {
        Vec::new()
    } else {
        keterangan_tagging::Entity::find()
            .filter(keterangan_tagging::Column::IdTagging.is_in(tagging_ids))
            .order_by_asc(keterangan_tagging::Column::Id)
            .all(db)
            .await
            .step("gagal mengambil keterangan tagging")?
    };

    let mut keterangan_by_tagging: HashMap<i32, Vec<KeteranganTagging>> = HashMap::new();
    for row in keterangan_rows {
        keterangan_by_tagging
            .entry(row.id_tagging)
            .or_default()
            .push(KeteranganTagging::from(row));
    }

    let mut result: HashMap<i32, Vec<TaggingPokin>> = HashMap::new();
    for row in tagging_rows {
        let pokin_id = row.id_pokin;
        let mut tagging = TaggingPokin::from_model(row);
        tagging.keterangan = keterangan_by_tagging.remove(&tagging.id).unwrap_or_default();
        result.entry(pokin_id).or_default().push(tagging);
    }
    Ok(result)
}

/// Salin seluruh tagging sebuah node ke node lain, dengan jejak `clone_from`
pub(crate) async fn clone_tagging<C: ConnectionTrait>(
    db: &C,
    source_pokin_id: i32,
    new_pokin_id: i32,
) -> AppResult<()> {
    let sources = find_tagging_by_pokin_id(db, source_pokin_id).await?;
    for source in sources {
        let copy = TaggingPokin {
            id: 0,
            nama_tagging: source.nama_tagging.clone(),
            clone_from: source.id,
            keterangan: source
                .keterangan
                .iter()
                .map(|k| KeteranganTagging {
                    id: 0,
                    kode_program_unggulan: k.kode_program_unggulan.clone(),
                    tahun: k.tahun.clone(),
                })
                .collect(),
        };
        insert_one(db, new_pokin_id, &copy).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tagging(id: i32) -> TaggingPokin {
        TaggingPokin {
            id,
            nama_tagging: format!("tagging-{}", id),
            clone_from: 0,
            keterangan: Vec::new(),
        }
    }

    #[test]
    fn test_removed_tagging_ids() {
        let existing = vec![1, 2, 3];
        let incoming = vec![tagging(2), tagging(0)];
        assert_eq!(removed_tagging_ids(&existing, &incoming), vec![1, 3]);
    }

    #[test]
    fn test_removed_tagging_ids_keeps_all_when_unchanged() {
        let existing = vec![4, 5];
        let incoming = vec![tagging(4), tagging(5)];
        assert!(removed_tagging_ids(&existing, &incoming).is_empty());
    }

    #[test]
    fn test_incoming_without_id_never_deletes() {
        let existing = vec![7];
        let incoming = vec![tagging(0), tagging(0)];
        assert_eq!(removed_tagging_ids(&existing, &incoming), vec![7]);
    }
}
