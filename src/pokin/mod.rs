//! Pohon kinerja engine
//!
//! Komponen inti pengelolaan pohon kinerja:
//!
//! - [`store`]: CRUD node beserta koleksi anaknya (Node Store)
//! - [`hierarchy`]: traversal leluhur/turunan, validasi level, rekap per level
//! - [`workflow`]: mesin status persetujuan dan aktivasi tematik
//! - [`clone`]: penggandaan subtree antar tahun / antar OPD
//! - [`crosscutting`]: relasi pinjam-silang antar pohon
//! - [`tagging`]: penanda program unggulan pada node
//! - [`lineage`]: pencatatan garis keturunan hasil clone
//!
//! Semua operasi menerima `&C where C: ConnectionTrait`; pemanggil yang
//! memegang transaksi, dan transaksi itulah batas atomisitas untuk operasi
//! gabungan seperti clone subtree.

pub mod clone;
pub mod crosscutting;
pub mod domain;
pub mod hierarchy;
pub mod lineage;
pub mod status;
pub mod store;
pub mod tagging;
pub mod workflow;

pub use domain::{
    Indikator, KeteranganTagging, PelaksanaPokin, PohonKinerja, TaggingPokin, Target,
};
pub use status::{CrosscuttingStatus, PokinStatus};
