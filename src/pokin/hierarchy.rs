//! Hierarchy Engine - traversal, validasi level, dan rekap per level
//!
//! Semua traversal rekursif dinyatakan sebagai penelusuran graf eksplisit:
//! loop aplikasi yang mengquery store per tingkat (leluhur/turunan), atau
//! fungsi murni di atas [`TreeSnapshot`] yang dimaterialisasi sekali per
//! cakupan (rekap per level). Tidak ada recursive CTE.

use std::collections::{BTreeMap, HashMap, HashSet};

use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};
use serde::{Deserialize, Serialize};

use crate::entity::{pegawai, pelaksana_pokin, pohon_kinerja, rencana_kinerja};
use crate::error::{AppError, AppResult, OptionExt, StoreStep};
use crate::pokin::domain::{PelaksanaPokin, PohonKinerja};
use crate::pokin::status::PokinStatus;
use crate::pokin::store;

/// Subtree lengkap sebuah node (node itu sendiri plus seluruh turunannya),
/// beserta koleksi anak tiap node, urut level lalu id
pub async fn find_hierarchy<C: ConnectionTrait>(db: &C, id: i32) -> AppResult<Vec<PohonKinerja>> {
    let root = pohon_kinerja::Entity::find_by_id(id)
        .one(db)
        .await
        .step("gagal mengambil pohon kinerja")?
        .ok_or_not_found(format!("pohon kinerja dengan ID {} tidak ditemukan", id))?;

    let mut rows = vec![root];
    let mut seen: HashSet<i32> = HashSet::from([id]);
    let mut frontier = vec![id];
    while !frontier.is_empty() {
        let children = pohon_kinerja::Entity::find()
            .filter(pohon_kinerja::Column::Parent.is_in(frontier.clone()))
            .all(db)
            .await
            .step("gagal mengambil turunan pohon")?;

        frontier = Vec::new();
        for child in children {
            if seen.insert(child.id) {
                frontier.push(child.id);
                rows.push(child);
            }
        }
    }

    rows.sort_by_key(|m| (m.level_pohon, m.id));
    store::attach_collections(db, rows).await
}

/// Rantai leluhur sebuah node dari akar tematik sampai node itu sendiri,
/// beserta koleksi anak tiap node
pub async fn find_with_all_tema<C: ConnectionTrait>(db: &C, id: i32) -> AppResult<Vec<PohonKinerja>> {
    let mut rows = Vec::new();
    let mut seen: HashSet<i32> = HashSet::new();
    let mut current = id;

    loop {
        if !seen.insert(current) {
            return Err(AppError::Integrity(format!(
                "rantai parent node {} membentuk siklus",
                id
            )));
        }
        let Some(node) = pohon_kinerja::Entity::find_by_id(current)
            .one(db)
            .await
            .step("gagal mengambil pohon kinerja")?
        else {
            if current == id {
                return Err(AppError::NotFound(format!(
                    "pohon kinerja dengan ID {} tidak ditemukan",
                    id
                )));
            }
            break;
        };
        let parent = node.parent;
        rows.push(node);
        if parent == 0 {
            break;
        }
        current = parent;
    }

    rows.sort_by_key(|m| (m.level_pohon, m.id));
    store::attach_collections(db, rows).await
}

/// Induk langsung sebuah node beserta identitas pelaksananya
pub async fn find_atasan<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> AppResult<(PohonKinerja, Vec<PelaksanaPokin>)> {
    let node = pohon_kinerja::Entity::find_by_id(id)
        .one(db)
        .await
        .step("gagal mengambil pohon kinerja")?
        .ok_or_not_found(format!("pohon kinerja dengan ID {} tidak ditemukan", id))?;

    let parent = pohon_kinerja::Entity::find_by_id(node.parent)
        .one(db)
        .await
        .step("gagal mengambil pohon kinerja atasan")?
        .ok_or_not_found(format!(
            "pohon kinerja atasan dari ID {} tidak ditemukan",
            id
        ))?;

    let pelaksana_rows = pelaksana_pokin::Entity::find()
        .filter(pelaksana_pokin::Column::PohonKinerjaId.eq(parent.id))
        .all(db)
        .await
        .step("gagal mengambil pelaksana")?;

    let pegawai_ids: Vec<String> = pelaksana_rows.iter().map(|p| p.pegawai_id.clone()).collect();
    let pegawai_rows = if pegawai_ids.is_empty() {
        Vec::new()
    } else {
        pegawai::Entity::find()
            .filter(pegawai::Column::Id.is_in(pegawai_ids))
            .all(db)
            .await
            .step("gagal mengambil data pegawai")?
    };
    let pegawai_by_id: HashMap<&str, &pegawai::Model> =
        pegawai_rows.iter().map(|p| (p.id.as_str(), p)).collect();

    let mut seen_pegawai: HashSet<String> = HashSet::new();
    let mut pelaksana = Vec::new();
    for row in pelaksana_rows {
        if !seen_pegawai.insert(row.pegawai_id.clone()) {
            continue;
        }
        let mut item = PelaksanaPokin::from(row);
        if let Some(p) = pegawai_by_id.get(item.pegawai_id.as_str()) {
            item.nip = p.nip.clone();
            item.nama_pegawai = p.nama.clone();
        }
        pelaksana.push(item);
    }

    Ok((PohonKinerja::from_model(parent)?, pelaksana))
}

/// Akar tematik (level 0) dari sebuah node, bila rantai parent sampai ke sana
pub async fn find_tematik_of<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> AppResult<Option<PohonKinerja>> {
    let mut seen: HashSet<i32> = HashSet::new();
    let mut current = id;

    loop {
        if !seen.insert(current) {
            return Err(AppError::Integrity(format!(
                "rantai parent node {} membentuk siklus",
                id
            )));
        }
        let Some(node) = pohon_kinerja::Entity::find_by_id(current)
            .one(db)
            .await
            .step("gagal mengambil pohon kinerja")?
        else {
            return Ok(None);
        };
        if node.level_pohon == 0 {
            return Ok(Some(PohonKinerja::from_model(node)?));
        }
        if node.parent == 0 {
            return Ok(None);
        }
        current = node.parent;
    }
}

// --- validasi level/parent ---

/// Aturan level/parent untuk node OPD; `parent_level` None berarti parent 0.
///
/// Level 4 (Strategic) boleh menggantung di akar atau di node level 0-3;
/// level di atas 4 wajib menempel tepat satu tingkat di atasnya.
pub fn check_parent_level(level_pohon: i32, parent_level: Option<i32>) -> AppResult<()> {
    if level_pohon < 4 {
        return Err(AppError::Validation(
            "level pohon tidak boleh kurang dari 4".to_string(),
        ));
    }

    if level_pohon == 4 {
        return match parent_level {
            None => Ok(()),
            Some(pl) if (0..=3).contains(&pl) => Ok(()),
            Some(pl) => Err(AppError::Validation(format!(
                "level pohon 4 harus memiliki parent dengan level 0 hingga 3, bukan level {}",
                pl
            ))),
        };
    }

    match parent_level {
        None => Err(AppError::Validation(format!(
            "level pohon {} harus memiliki parent",
            level_pohon
        ))),
        Some(pl) if pl == level_pohon - 1 => Ok(()),
        Some(pl) => Err(AppError::Validation(format!(
            "level pohon {} harus memiliki parent dengan level {}, bukan level {}",
            level_pohon,
            level_pohon - 1,
            pl
        ))),
    }
}

/// Varian untuk penarikan strategi OPD: tanpa batas level minimum, dan
/// parent 0 selalu sah
pub fn check_parent_level_tarik(child_level: i32, parent_level: Option<i32>) -> AppResult<()> {
    let Some(pl) = parent_level else {
        return Ok(());
    };

    if child_level == 4 {
        if (0..=3).contains(&pl) {
            return Ok(());
        }
        return Err(AppError::Validation(format!(
            "untuk level Strategic (4), parent harus memiliki level 0-3, parent level saat ini: {}",
            pl
        )));
    }

    let expected = child_level - 1;
    if pl != expected {
        return Err(AppError::Validation(format!(
            "level parent ({}) tidak sesuai dengan yang diharapkan ({}) untuk child level {}",
            pl, expected, child_level
        )));
    }
    Ok(())
}

/// Validasi level/parent sebelum create/update node OPD
pub async fn validate_parent_level<C: ConnectionTrait>(
    db: &C,
    parent_id: i32,
    level_pohon: i32,
) -> AppResult<()> {
    if level_pohon < 4 {
        return check_parent_level(level_pohon, None);
    }
    let parent_level = fetch_parent_level(db, parent_id).await?;
    check_parent_level(level_pohon, parent_level)
}

/// Validasi level/parent saat menarik strategi OPD ke konteks lain
pub async fn validate_parent_level_tarik_strategi_opd<C: ConnectionTrait>(
    db: &C,
    parent_id: i32,
    child_level: i32,
) -> AppResult<()> {
    let parent_level = fetch_parent_level(db, parent_id).await?;
    check_parent_level_tarik(child_level, parent_level)
}

async fn fetch_parent_level<C: ConnectionTrait>(
    db: &C,
    parent_id: i32,
) -> AppResult<Option<i32>> {
    if parent_id == 0 {
        return Ok(None);
    }
    let parent = pohon_kinerja::Entity::find_by_id(parent_id)
        .one(db)
        .await
        .step("gagal memeriksa level parent")?
        .ok_or_not_found(format!("parent dengan ID {} tidak ditemukan", parent_id))?;
    Ok(Some(parent.level_pohon))
}

// --- snapshot dan rekap per level ---

/// Arena node satu cakupan (kode_opd, tahun), diindeks per id dengan peta
/// anak per parent. Semua perhitungan kelayakan berjalan murni di atasnya.
pub struct TreeSnapshot {
    nodes: HashMap<i32, pohon_kinerja::Model>,
    children: HashMap<i32, Vec<i32>>,
}

impl TreeSnapshot {
    pub fn from_models(rows: Vec<pohon_kinerja::Model>) -> Self {
        let mut nodes = HashMap::with_capacity(rows.len());
        let mut children: HashMap<i32, Vec<i32>> = HashMap::new();
        for row in rows {
            children.entry(row.parent).or_default().push(row.id);
            nodes.insert(row.id, row);
        }
        for ids in children.values_mut() {
            ids.sort_unstable();
        }
        Self { nodes, children }
    }

    /// Materialisasi satu cakupan dalam satu query
    pub async fn load<C: ConnectionTrait>(db: &C, kode_opd: &str, tahun: &str) -> AppResult<Self> {
        let rows = pohon_kinerja::Entity::find()
            .filter(pohon_kinerja::Column::KodeOpd.eq(kode_opd))
            .filter(pohon_kinerja::Column::Tahun.eq(tahun))
            .all(db)
            .await
            .step("gagal memuat cakupan pohon kinerja")?;
        Ok(Self::from_models(rows))
    }

    pub fn get(&self, id: i32) -> Option<&pohon_kinerja::Model> {
        self.nodes.get(&id)
    }

    pub fn children_of(&self, id: i32) -> &[i32] {
        self.children.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn ids(&self) -> impl Iterator<Item = i32> + '_ {
        self.nodes.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Strategic (level 4) yang sah sebagai akar rekap: induk tidak ada
    /// (parent 0 atau di luar cakupan) atau induk bertingkat 0-3
    pub fn is_valid_strategic(&self, id: i32) -> bool {
        let Some(node) = self.nodes.get(&id) else {
            return false;
        };
        if node.level_pohon != 4 {
            return false;
        }
        match self.nodes.get(&node.parent) {
            None => true,
            Some(parent) => (0..=3).contains(&parent.level_pohon),
        }
    }

    /// Kelayakan direkap: level 4 harus strategic sah, level di atasnya
    /// harus menggantung pada rantai leluhur yang seluruhnya layak.
    /// `chain_ok` diterapkan pada setiap mata rantai, termasuk node ini.
    ///
    /// Sisa crosscutting yang yatim (strategic dengan induk level >= 4)
    /// gugur di sini beserta seluruh turunannya.
    pub fn is_eligible(&self, id: i32, chain_ok: &dyn Fn(&pohon_kinerja::Model) -> bool) -> bool {
        let Some(node) = self.nodes.get(&id) else {
            return false;
        };
        if node.level_pohon < 4 || !chain_ok(node) {
            return false;
        }
        if node.level_pohon == 4 {
            return self.is_valid_strategic(id);
        }
        match self.nodes.get(&node.parent) {
            Some(parent) => self.is_eligible(parent.id, chain_ok),
            None => false,
        }
    }
}

/// Jumlah node kiriman pemda yang layak direkap, per level
pub fn count_pemda_levels(snapshot: &TreeSnapshot) -> BTreeMap<i32, u64> {
    let chain_ok = |m: &pohon_kinerja::Model| {
        m.status == PokinStatus::PokinDariPemda.as_str() || m.status == PokinStatus::Draft.as_str()
    };

    let mut result = BTreeMap::new();
    for id in snapshot.ids() {
        let Some(node) = snapshot.get(id) else { continue };
        if node.status != PokinStatus::PokinDariPemda.as_str() {
            continue;
        }
        if snapshot.is_eligible(id, &chain_ok) {
            *result.entry(node.level_pohon).or_insert(0) += 1;
        }
    }
    result
}

/// Rekap kepatuhan pohon kinerja sebuah OPD per level
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlPokinLevel {
    pub level_pohon: i32,
    pub jumlah_pokin: u64,
    /// Pegawai pelaksana berbeda pada level ini
    pub jumlah_pelaksana: u64,
    pub jumlah_pokin_ada_pelaksana: u64,
    pub jumlah_pokin_tanpa_pelaksana: u64,
    /// Rencana kinerja yang disusun oleh pelaksana node terkait
    pub jumlah_rencana_kinerja: u64,
    pub jumlah_pokin_ada_rekin: u64,
    pub jumlah_pokin_tanpa_rekin: u64,
}

/// Hitung rekap kepatuhan murni dari data yang sudah dimaterialisasi.
///
/// `nip_by_pegawai` memetakan id pegawai ke NIP; rencana kinerja dihitung
/// hanya bila disusun (pegawai_id = NIP) oleh salah satu pelaksana node-nya.
pub fn control_levels(
    snapshot: &TreeSnapshot,
    pelaksana_rows: &[pelaksana_pokin::Model],
    nip_by_pegawai: &HashMap<String, String>,
    rekin_rows: &[rencana_kinerja::Model],
) -> BTreeMap<i32, ControlPokinLevel> {
    let chain_ok = |m: &pohon_kinerja::Model| {
        PokinStatus::parse_db(&m.status)
            .map(PokinStatus::operative)
            .unwrap_or(false)
    };

    let mut pelaksana_by_pokin: HashMap<i32, Vec<&pelaksana_pokin::Model>> = HashMap::new();
    for row in pelaksana_rows {
        pelaksana_by_pokin
            .entry(row.pohon_kinerja_id)
            .or_default()
            .push(row);
    }
    let mut rekin_by_pokin: HashMap<i32, Vec<&rencana_kinerja::Model>> = HashMap::new();
    for row in rekin_rows {
        rekin_by_pokin.entry(row.id_pohon).or_default().push(row);
    }

    let mut result: BTreeMap<i32, ControlPokinLevel> = BTreeMap::new();
    let mut pegawai_per_level: HashMap<i32, HashSet<&str>> = HashMap::new();

    for id in snapshot.ids() {
        if !snapshot.is_eligible(id, &chain_ok) {
            continue;
        }
        let Some(node) = snapshot.get(id) else { continue };

        let entry = result.entry(node.level_pohon).or_insert_with(|| ControlPokinLevel {
            level_pohon: node.level_pohon,
            ..Default::default()
        });
        entry.jumlah_pokin += 1;

        let pelaksana = pelaksana_by_pokin.get(&id).map(Vec::as_slice).unwrap_or(&[]);
        if !pelaksana.is_empty() {
            entry.jumlah_pokin_ada_pelaksana += 1;
        }
        let level_pegawai = pegawai_per_level.entry(node.level_pohon).or_default();
        for p in pelaksana {
            level_pegawai.insert(p.pegawai_id.as_str());
        }

        // NIP para pelaksana node ini
        let nips: HashSet<&str> = pelaksana
            .iter()
            .filter_map(|p| nip_by_pegawai.get(&p.pegawai_id))
            .map(String::as_str)
            .collect();
        let rekin = rekin_by_pokin.get(&id).map(Vec::as_slice).unwrap_or(&[]);
        let authored = rekin
            .iter()
            .filter(|r| nips.contains(r.pegawai_id.as_str()))
            .count() as u64;
        entry.jumlah_rencana_kinerja += authored;
        if authored > 0 {
            entry.jumlah_pokin_ada_rekin += 1;
        }
    }

    for (level, entry) in result.iter_mut() {
        entry.jumlah_pelaksana = pegawai_per_level
            .get(level)
            .map(|set| set.len() as u64)
            .unwrap_or(0);
        entry.jumlah_pokin_tanpa_pelaksana = entry.jumlah_pokin - entry.jumlah_pokin_ada_pelaksana;
        entry.jumlah_pokin_tanpa_rekin = entry.jumlah_pokin - entry.jumlah_pokin_ada_rekin;
    }
    result
}

/// Jumlah node kiriman pemda per level pada pohon sebuah OPD
pub async fn count_pokin_pemda_by_level<C: ConnectionTrait>(
    db: &C,
    kode_opd: &str,
    tahun: &str,
) -> AppResult<BTreeMap<i32, u64>> {
    let snapshot = TreeSnapshot::load(db, kode_opd, tahun).await?;
    Ok(count_pemda_levels(&snapshot))
}

/// Rekap kepatuhan pohon sebuah OPD per level (pelaksana dan rencana kinerja)
pub async fn control_pokin_opd_by_level<C: ConnectionTrait>(
    db: &C,
    kode_opd: &str,
    tahun: &str,
) -> AppResult<BTreeMap<i32, ControlPokinLevel>> {
    let snapshot = TreeSnapshot::load(db, kode_opd, tahun).await?;
    let node_ids: Vec<i32> = snapshot.ids().collect();
    if node_ids.is_empty() {
        return Ok(BTreeMap::new());
    }

    let pelaksana_rows = pelaksana_pokin::Entity::find()
        .filter(pelaksana_pokin::Column::PohonKinerjaId.is_in(node_ids.clone()))
        .all(db)
        .await
        .step("gagal mengambil pelaksana")?;

    let pegawai_ids: Vec<String> = pelaksana_rows.iter().map(|p| p.pegawai_id.clone()).collect();
    let pegawai_rows = if pegawai_ids.is_empty() {
        Vec::new()
    } else {
        pegawai::Entity::find()
            .filter(pegawai::Column::Id.is_in(pegawai_ids))
            .all(db)
            .await
            .step("gagal mengambil data pegawai")?
    };
    let nip_by_pegawai: HashMap<String, String> =
        pegawai_rows.into_iter().map(|p| (p.id, p.nip)).collect();

    let rekin_rows = rencana_kinerja::Entity::find()
        .filter(rencana_kinerja::Column::IdPohon.is_in(node_ids))
        .all(db)
        .await
        .step("gagal mengambil rencana kinerja")?;

    Ok(control_levels(&snapshot, &pelaksana_rows, &nip_by_pegawai, &rekin_rows))
}

#[cfg(test)]
mod tests {
    use super::*;

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
    fn test_check_parent_level() {
        // level di bawah Strategic ditolak
        assert!(check_parent_level(3, None).is_err());

        // Strategic: akar atau induk tematik/sub-tematik
        assert!(check_parent_level(4, None).is_ok());
        assert!(check_parent_level(4, Some(0)).is_ok());
        assert!(check_parent_level(4, Some(3)).is_ok());
        assert!(check_parent_level(4, Some(4)).is_err());

        // Operational: wajib tepat satu tingkat di bawah induknya
        assert!(check_parent_level(5, None).is_err());
        assert!(check_parent_level(5, Some(4)).is_ok());
        assert!(check_parent_level(5, Some(3)).is_err());
        assert!(check_parent_level(7, Some(6)).is_ok());
        assert!(check_parent_level(7, Some(4)).is_err());
    }

    #[test]
    fn test_check_parent_level_tarik() {
        // parent 0 selalu sah pada varian tarik
        assert!(check_parent_level_tarik(4, None).is_ok());
        assert!(check_parent_level_tarik(6, None).is_ok());

        assert!(check_parent_level_tarik(4, Some(2)).is_ok());
        assert!(check_parent_level_tarik(4, Some(5)).is_err());
        assert!(check_parent_level_tarik(5, Some(4)).is_ok());
        assert!(check_parent_level_tarik(5, Some(5)).is_err());
    }

    #[test]
    fn test_snapshot_children_index() {
        let snapshot = TreeSnapshot::from_models(vec![
            node(1, 0, 4, ""),
            node(3, 1, 5, ""),
            node(2, 1, 5, ""),
        ]);
        assert_eq!(snapshot.len(), 3);
        assert_eq!(snapshot.children_of(1), &[2, 3]);
        assert!(snapshot.children_of(2).is_empty());
    }

    #[test]
    fn test_valid_strategic() {
        let snapshot = TreeSnapshot::from_models(vec![
            node(1, 0, 0, ""),
            node(2, 1, 4, ""),
            // strategic menggantung pada node luar cakupan
            node(3, 999, 4, ""),
            // sisa crosscutting: strategic di bawah strategic
            node(4, 2, 4, ""),
            node(5, 0, 5, ""),
        ]);
        assert!(snapshot.is_valid_strategic(2));
        assert!(snapshot.is_valid_strategic(3));
        assert!(!snapshot.is_valid_strategic(4));
        assert!(!snapshot.is_valid_strategic(5));
    }

    #[test]
    fn test_eligibility_requires_valid_chain() {
        let pemda = PokinStatus::PokinDariPemda.as_str();
        let snapshot = TreeSnapshot::from_models(vec![
            node(10, 0, 4, pemda),
            node(11, 10, 5, pemda),
            node(12, 11, 6, pemda),
            // rantai menggantung pada strategic yatim
            node(20, 21, 4, pemda),
            node(21, 10, 4, pemda),
            node(22, 20, 5, pemda),
        ]);
        let chain_ok = |_: &pohon_kinerja::Model| true;

        assert!(snapshot.is_eligible(10, &chain_ok));
        assert!(snapshot.is_eligible(11, &chain_ok));
        assert!(snapshot.is_eligible(12, &chain_ok));

        assert!(!snapshot.is_eligible(20, &chain_ok));
        assert!(!snapshot.is_eligible(22, &chain_ok));
    }

    #[test]
    fn test_count_pemda_levels() {
        let pemda = PokinStatus::PokinDariPemda.as_str();
        let snapshot = TreeSnapshot::from_models(vec![
            node(1, 0, 4, pemda),
            node(2, 1, 5, pemda),
            // anak melalui induk draft tetap dihitung
            node(3, 1, 5, ""),
            node(4, 3, 6, pemda),
            // node menunggu persetujuan memutus rantai
            node(5, 1, 5, "menunggu_disetujui"),
            node(6, 5, 6, pemda),
        ]);

        let counts = count_pemda_levels(&snapshot);
        assert_eq!(counts.get(&4), Some(&1));
        assert_eq!(counts.get(&5), Some(&1));
        assert_eq!(counts.get(&6), Some(&1));
    }

    fn pelaksana(pokin_id: i32, pegawai: &str) -> pelaksana_pokin::Model {
        pelaksana_pokin::Model {
            id: format!("PLKS-{}-{}", pokin_id, pegawai),
            pohon_kinerja_id: pokin_id,
            pegawai_id: pegawai.to_string(),
        }
    }

    fn rekin(id: &str, pokin_id: i32, nip: &str) -> rencana_kinerja::Model {
        rencana_kinerja::Model {
            id: id.to_string(),
            id_pohon: pokin_id,
            pegawai_id: nip.to_string(),
            tahun: "2024".to_string(),
        }
    }

    #[test]
    fn test_control_levels() {
        let snapshot = TreeSnapshot::from_models(vec![
            node(1, 0, 4, ""),
            node(2, 1, 5, ""),
            node(3, 1, 5, ""),
        ]);
        let pelaksana_rows = vec![
            pelaksana(1, "peg-1"),
            pelaksana(2, "peg-1"),
            pelaksana(2, "peg-2"),
        ];
        let nip_by_pegawai: HashMap<String, String> = [
            ("peg-1".to_string(), "197001011990031001".to_string()),
            ("peg-2".to_string(), "198203052006042002".to_string()),
        ]
        .into();
        let rekin_rows = vec![
            rekin("RK-1", 2, "197001011990031001"),
            rekin("RK-2", 2, "198203052006042002"),
            // rencana dari pegawai yang bukan pelaksana node, tidak dihitung
            rekin("RK-3", 1, "198203052006042002"),
        ];

        let result = control_levels(&snapshot, &pelaksana_rows, &nip_by_pegawai, &rekin_rows);

        let level4 = result.get(&4).unwrap();
        assert_eq!(level4.jumlah_pokin, 1);
        assert_eq!(level4.jumlah_pelaksana, 1);
        assert_eq!(level4.jumlah_pokin_ada_pelaksana, 1);
        assert_eq!(level4.jumlah_rencana_kinerja, 0);
        assert_eq!(level4.jumlah_pokin_tanpa_rekin, 1);

        let level5 = result.get(&5).unwrap();
        assert_eq!(level5.jumlah_pokin, 2);
        assert_eq!(level5.jumlah_pelaksana, 2);
        assert_eq!(level5.jumlah_pokin_ada_pelaksana, 1);
        assert_eq!(level5.jumlah_pokin_tanpa_pelaksana, 1);
        assert_eq!(level5.jumlah_rencana_kinerja, 2);
        assert_eq!(level5.jumlah_pokin_ada_rekin, 1);
        assert_eq!(level5.jumlah_pokin_tanpa_rekin, 1);
    }

    #[test]
    fn test_control_levels_excludes_transient_status() {
        let snapshot = TreeSnapshot::from_models(vec![
            node(1, 0, 4, "menunggu_disetujui"),
            node(2, 0, 4, ""),
        ]);
        let result = control_levels(&snapshot, &[], &HashMap::new(), &[]);
        assert_eq!(result.get(&4).unwrap().jumlah_pokin, 1);
    }
}
