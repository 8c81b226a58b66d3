//! Struktur domain agregat pohon kinerja
//!
//! Bentuk baca/tulis yang dipakai Node Store: satu node beserta pelaksana,
//! indikator (dengan target), dan tagging (dengan keterangan program).

use serde::{Deserialize, Serialize};

use crate::entity;
use crate::error::AppResult;
use crate::pokin::status::PokinStatus;

/// Node pohon kinerja beserta koleksi anaknya
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PohonKinerja {
    /// 0 saat create (id diberikan database)
    pub id: i32,
    /// ID node induk (0 = akar)
    pub parent: i32,
    pub nama_pohon: String,
    pub jenis_pohon: String,
    pub level_pohon: i32,
    pub kode_opd: String,
    pub keterangan: String,
    pub keterangan_crosscutting: String,
    pub tahun: String,
    pub status: PokinStatus,
    /// ID node sumber jika hasil clone (0 = bukan clone)
    pub clone_from: i32,
    pub is_active: bool,
    pub pelaksana: Vec<PelaksanaPokin>,
    pub indikator: Vec<Indikator>,
    pub tagging: Vec<TaggingPokin>,
}

impl PohonKinerja {
    /// Konversi baris tabel menjadi agregat tanpa koleksi anak
    pub fn from_model(model: entity::pohon_kinerja::Model) -> AppResult<Self> {
        Ok(Self {
            id: model.id,
            parent: model.parent,
            nama_pohon: model.nama_pohon,
            jenis_pohon: model.jenis_pohon,
            level_pohon: model.level_pohon,
            kode_opd: model.kode_opd,
            keterangan: model.keterangan,
            keterangan_crosscutting: model.keterangan_crosscutting,
            tahun: model.tahun,
            status: PokinStatus::parse_db(&model.status)?,
            clone_from: model.clone_from,
            is_active: model.is_active,
            pelaksana: Vec::new(),
            indikator: Vec::new(),
            tagging: Vec::new(),
        })
    }
}

/// Penugasan pegawai pada sebuah node
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PelaksanaPokin {
    /// "" saat create (id dibuat engine)
    pub id: String,
    pub pegawai_id: String,
    /// Diisi hanya oleh query yang menggabungkan identitas pegawai
    #[serde(default)]
    pub nip: String,
    #[serde(default)]
    pub nama_pegawai: String,
}

impl From<entity::pelaksana_pokin::Model> for PelaksanaPokin {
    fn from(model: entity::pelaksana_pokin::Model) -> Self {
        Self {
            id: model.id,
            pegawai_id: model.pegawai_id,
            nip: String::new(),
            nama_pegawai: String::new(),
        }
    }
}

/// Indikator kinerja beserta targetnya
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Indikator {
    /// "" saat create (id dibuat engine)
    pub id: String,
    pub indikator: String,
    pub tahun: String,
    /// ID indikator sumber jika hasil clone ("" = bukan clone)
    pub clone_from: String,
    pub target: Vec<Target>,
}

impl Indikator {
    pub fn from_model(model: entity::indikator::Model) -> Self {
        Self {
            id: model.id,
            indikator: model.indikator,
            tahun: model.tahun,
            clone_from: model.clone_from,
            target: Vec::new(),
        }
    }
}

/// Target tahunan sebuah indikator
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Target {
    pub id: String,
    pub indikator_id: String,
    pub target: String,
    pub satuan: String,
    pub tahun: String,
    pub clone_from: String,
}

impl From<entity::target::Model> for Target {
    fn from(model: entity::target::Model) -> Self {
        Self {
            id: model.id,
            indikator_id: model.indikator_id,
            target: model.target,
            satuan: model.satuan,
            tahun: model.tahun,
            clone_from: model.clone_from,
        }
    }
}

/// Penanda bernama pada node beserta kaitan program unggulannya
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaggingPokin {
    /// 0 saat create (id diberikan database)
    pub id: i32,
    pub nama_tagging: String,
    pub clone_from: i32,
    pub keterangan: Vec<KeteranganTagging>,
}

impl TaggingPokin {
    pub fn from_model(model: entity::tagging_pokin::Model) -> Self {
        Self {
            id: model.id,
            nama_tagging: model.nama_tagging,
            clone_from: model.clone_from,
            keterangan: Vec::new(),
        }
    }
}

/// Kaitan sebuah tagging ke kode program unggulan pada satu tahun
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KeteranganTagging {
    pub id: i32,
    pub kode_program_unggulan: String,
    pub tahun: String,
}

impl From<entity::keterangan_tagging::Model> for KeteranganTagging {
    fn from(model: entity::keterangan_tagging::Model) -> Self {
        Self {
            id: model.id,
            kode_program_unggulan: model.kode_program_unggulan,
            tahun: model.tahun,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node_model(status: &str) -> entity::pohon_kinerja::Model {
        entity::pohon_kinerja::Model {
            id: 12,
            parent: 0,
            nama_pohon: "Peningkatan pelayanan publik".to_string(),
            jenis_pohon: "Strategic".to_string(),
            level_pohon: 4,
            kode_opd: "5.01.5.05.0.00.02.0000".to_string(),
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
    fn test_from_model_parses_status() {
        let pokin = PohonKinerja::from_model(node_model("menunggu_disetujui")).unwrap();
        assert_eq!(pokin.status, PokinStatus::MenungguDisetujui);
        assert!(pokin.indikator.is_empty());
    }

    #[test]
    fn test_from_model_rejects_unknown_status() {
        assert!(PohonKinerja::from_model(node_model("status liar")).is_err());
    }

    #[test]
    fn test_status_serializes_as_db_string() {
        let pokin = PohonKinerja::from_model(node_model("")).unwrap();
        let value = serde_json::to_value(&pokin).unwrap();
        assert_eq!(value["status"], "");
        assert_eq!(value["level_pohon"], 4);
    }
}
