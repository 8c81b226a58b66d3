//! Status workflow pohon kinerja
//!
//! Status tersimpan sebagai string di tabel; di dalam engine dipakai enum
//! tertutup dengan tabel transisi eksplisit, sehingga pemanggil tidak bisa
//! menulis status sembarang.

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Status workflow sebuah node pohon kinerja
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PokinStatus {
    /// Sedang disusun OPD (string kosong di tabel)
    #[serde(rename = "")]
    Draft,
    /// Menunggu persetujuan pemda
    #[serde(rename = "menunggu_disetujui")]
    MenungguDisetujui,
    #[serde(rename = "disetujui")]
    Disetujui,
    #[serde(rename = "ditolak")]
    Ditolak,
    /// Ditarik dari pohon pemda ke OPD (baca-saja di sisi OPD)
    #[serde(rename = "pokin dari pemda")]
    PokinDariPemda,
    /// Ditarik ke dalam OPD, disembunyikan dari daftar pemda
    #[serde(rename = "tarik pokin opd")]
    TarikPokinOpd,
    #[serde(rename = "crosscutting_menunggu")]
    CrosscuttingMenunggu,
    #[serde(rename = "crosscutting_disetujui")]
    CrosscuttingDisetujui,
    #[serde(rename = "crosscutting_ditolak")]
    CrosscuttingDitolak,
}

impl PokinStatus {
    /// Representasi string di kolom `status`
    pub fn as_str(self) -> &'static str {
        match self {
            PokinStatus::Draft => "",
            PokinStatus::MenungguDisetujui => "menunggu_disetujui",
            PokinStatus::Disetujui => "disetujui",
            PokinStatus::Ditolak => "ditolak",
            PokinStatus::PokinDariPemda => "pokin dari pemda",
            PokinStatus::TarikPokinOpd => "tarik pokin opd",
            PokinStatus::CrosscuttingMenunggu => "crosscutting_menunggu",
            PokinStatus::CrosscuttingDisetujui => "crosscutting_disetujui",
            PokinStatus::CrosscuttingDitolak => "crosscutting_ditolak",
        }
    }

    /// Parse nilai kolom `status`; nilai tak dikenal adalah kerusakan data
    pub fn parse_db(value: &str) -> AppResult<Self> {
        match value {
            "" => Ok(PokinStatus::Draft),
            "menunggu_disetujui" => Ok(PokinStatus::MenungguDisetujui),
            "disetujui" => Ok(PokinStatus::Disetujui),
            "ditolak" => Ok(PokinStatus::Ditolak),
            "pokin dari pemda" => Ok(PokinStatus::PokinDariPemda),
            "tarik pokin opd" => Ok(PokinStatus::TarikPokinOpd),
            "crosscutting_menunggu" => Ok(PokinStatus::CrosscuttingMenunggu),
            "crosscutting_disetujui" => Ok(PokinStatus::CrosscuttingDisetujui),
            "crosscutting_ditolak" => Ok(PokinStatus::CrosscuttingDitolak),
            other => Err(AppError::Integrity(format!(
                "status pohon kinerja tidak dikenal: '{}'",
                other
            ))),
        }
    }

    /// Status yang disembunyikan dari daftar pohon aktif sebuah OPD
    pub fn excluded_from_listing(self) -> bool {
        matches!(
            self,
            PokinStatus::MenungguDisetujui
                | PokinStatus::TarikPokinOpd
                | PokinStatus::Disetujui
                | PokinStatus::Ditolak
                | PokinStatus::CrosscuttingMenunggu
                | PokinStatus::CrosscuttingDitolak
        )
    }

    /// Kebalikan dari [`Self::excluded_from_listing`]
    pub fn operative(self) -> bool {
        !self.excluded_from_listing()
    }

    /// Daftar string status yang dikecualikan dari listing, untuk filter query
    pub fn excluded_listing_values() -> [&'static str; 6] {
        [
            PokinStatus::MenungguDisetujui.as_str(),
            PokinStatus::TarikPokinOpd.as_str(),
            PokinStatus::Disetujui.as_str(),
            PokinStatus::Ditolak.as_str(),
            PokinStatus::CrosscuttingMenunggu.as_str(),
            PokinStatus::CrosscuttingDitolak.as_str(),
        ]
    }

    /// Tabel transisi status.
    ///
    /// Transisi ke status yang sama selalu diizinkan (no-op).
    pub fn can_transition(self, to: PokinStatus) -> bool {
        use PokinStatus::*;

        if self == to {
            return true;
        }

        matches!(
            (self, to),
            // Pengajuan, persetujuan pinjam-silang, dan penarikan dari draft
            (Draft, MenungguDisetujui)
                | (Draft, Disetujui)
                | (Draft, CrosscuttingMenunggu)
                | (Draft, TarikPokinOpd)
                // Keputusan pemda
                | (MenungguDisetujui, Disetujui)
                | (MenungguDisetujui, Ditolak)
                // Pembukaan ulang saat clone dihapus
                | (Disetujui, MenungguDisetujui)
                // Pengajuan ulang setelah ditolak
                | (Ditolak, MenungguDisetujui)
                // Siklus crosscutting
                | (CrosscuttingDitolak, CrosscuttingMenunggu)
                | (CrosscuttingMenunggu, CrosscuttingDisetujui)
                | (CrosscuttingMenunggu, CrosscuttingDitolak)
        )
    }
}

/// Status sebuah relasi crosscutting di `tb_crosscutting`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CrosscuttingStatus {
    /// Usulan menunggu keputusan OPD tujuan
    #[serde(rename = "menunggu_disetujui")]
    Menunggu,
    /// Usulan ditolak
    #[serde(rename = "ditolak")]
    Ditolak,
    /// Relasi berjalan
    #[serde(rename = "crosscutting_disetujui")]
    Disetujui,
    /// Relasi diputus karena node targetnya dihapus
    #[serde(rename = "crosscutting_ditolak")]
    Terputus,
}

impl CrosscuttingStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            CrosscuttingStatus::Menunggu => "menunggu_disetujui",
            CrosscuttingStatus::Ditolak => "ditolak",
            CrosscuttingStatus::Disetujui => "crosscutting_disetujui",
            CrosscuttingStatus::Terputus => "crosscutting_ditolak",
        }
    }

    pub fn parse_db(value: &str) -> AppResult<Self> {
        match value {
            "menunggu_disetujui" => Ok(CrosscuttingStatus::Menunggu),
            "ditolak" => Ok(CrosscuttingStatus::Ditolak),
            "crosscutting_disetujui" => Ok(CrosscuttingStatus::Disetujui),
            "crosscutting_ditolak" => Ok(CrosscuttingStatus::Terputus),
            other => Err(AppError::Integrity(format!(
                "status crosscutting tidak dikenal: '{}'",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_db_strings() {
        let all = [
            PokinStatus::Draft,
            PokinStatus::MenungguDisetujui,
            PokinStatus::Disetujui,
            PokinStatus::Ditolak,
            PokinStatus::PokinDariPemda,
            PokinStatus::TarikPokinOpd,
            PokinStatus::CrosscuttingMenunggu,
            PokinStatus::CrosscuttingDisetujui,
            PokinStatus::CrosscuttingDitolak,
        ];
        for status in all {
            assert_eq!(PokinStatus::parse_db(status.as_str()).unwrap(), status);
        }
        assert!(PokinStatus::parse_db("dibekukan").is_err());
    }

    #[test]
    fn test_listing_exclusion() {
        assert!(PokinStatus::Draft.operative());
        assert!(PokinStatus::PokinDariPemda.operative());
        assert!(PokinStatus::CrosscuttingDisetujui.operative());

        assert!(PokinStatus::MenungguDisetujui.excluded_from_listing());
        assert!(PokinStatus::TarikPokinOpd.excluded_from_listing());
        assert!(PokinStatus::Disetujui.excluded_from_listing());
        assert!(PokinStatus::Ditolak.excluded_from_listing());
        assert!(PokinStatus::CrosscuttingMenunggu.excluded_from_listing());
        assert!(PokinStatus::CrosscuttingDitolak.excluded_from_listing());
    }

    #[test]
    fn test_approval_transitions() {
        use PokinStatus::*;

        assert!(Draft.can_transition(MenungguDisetujui));
        assert!(MenungguDisetujui.can_transition(Disetujui));
        assert!(MenungguDisetujui.can_transition(Ditolak));
        assert!(Disetujui.can_transition(MenungguDisetujui));
        assert!(Ditolak.can_transition(MenungguDisetujui));

        // Keputusan tidak boleh melompati antrean
        assert!(!Ditolak.can_transition(Disetujui));
        assert!(!Draft.can_transition(Ditolak));
        assert!(!Disetujui.can_transition(Ditolak));
    }

    #[test]
    fn test_crosscutting_transitions() {
        use PokinStatus::*;

        assert!(Draft.can_transition(CrosscuttingMenunggu));
        assert!(CrosscuttingDitolak.can_transition(CrosscuttingMenunggu));
        assert!(CrosscuttingMenunggu.can_transition(CrosscuttingDisetujui));
        assert!(CrosscuttingMenunggu.can_transition(CrosscuttingDitolak));

        assert!(!CrosscuttingDisetujui.can_transition(Disetujui));
        assert!(!Disetujui.can_transition(CrosscuttingMenunggu));
    }

    #[test]
    fn test_self_transition_is_noop() {
        for status in [PokinStatus::Draft, PokinStatus::Disetujui, PokinStatus::TarikPokinOpd] {
            assert!(status.can_transition(status));
        }
    }
}
