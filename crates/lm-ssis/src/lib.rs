//! lm-ssis - SSIS extraction for lineamap
//!
//! ISPAC archives are unpacked in place, connection managers are resolved
//! from `.conmgr` files, and `.dtsx` packages are DOM-walked for precedence
//! constraints, Execute Package references, data-flow components, Execute
//! SQL tasks, and SSAS processing commands.

pub mod conmgr;
pub mod error;
pub mod package;
pub mod unpack;
pub mod walk;

pub use conmgr::ConnectionManagers;
pub use error::{SsisError, SsisResult};
pub use package::{Package, PackageCall, PrecedenceLink, TaskKind, TaskLineage};
pub use unpack::{extract_ispac_files, normalize_dtsx_names, recreate_dir, unpack_all};
pub use walk::{extract_index, PackageIndex, PackageIndexEntry, PackageLink, SsisExtraction, TaskLink};
