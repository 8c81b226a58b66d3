//! Entity module - SeaORM entity definitions
//!
//! Satu file per tabel pohon kinerja beserta tabel anak dan relasinya.

pub mod crosscutting;
pub mod indikator;
pub mod keterangan_tagging;
pub mod pegawai;
pub mod pelaksana_pokin;
pub mod pohon_kinerja;
pub mod pokin_lineage;
pub mod rencana_kinerja;
pub mod tagging_pokin;
pub mod target;
