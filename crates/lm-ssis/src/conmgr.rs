//! Connection manager resolution
//!
//! `.conmgr` files map the GUIDs that tasks reference back to the connection
//! names (which carry the database) shown in the designer.

use crate::error::SsisResult;
use crate::package::DTS_NS;
use crate::unpack::files_with_extension;
use log::warn;
use std::collections::HashMap;
use std::path::Path;

/// DTSID -> ObjectName map built from every `.conmgr` under a directory
#[derive(Debug, Default, Clone)]
pub struct ConnectionManagers {
    map: HashMap<String, String>,
}

impl ConnectionManagers {
    /// Scan a directory tree for `.conmgr` files. Unparseable files are
    /// logged and skipped; the first name seen for a DTSID wins.
    pub fn load_dir(dir: &Path) -> SsisResult<Self> {
        let mut managers = Self::default();

        for path in files_with_extension(dir, "conmgr")? {
            let content = match std::fs::read_to_string(&path) {
                Ok(content) => content,
                Err(e) => {
                    warn!("Skipping {}: {e}", path.display());
                    continue;
                }
            };
            let doc = match roxmltree::Document::parse(&content) {
                Ok(doc) => doc,
                Err(e) => {
                    warn!("Skipping {}: {e}", path.display());
                    continue;
                }
            };

            let root = doc.root_element();
            let object_name = root.attribute((DTS_NS, "ObjectName"));
            let dtsid = root.attribute((DTS_NS, "DTSID"));
            if let (Some(id), Some(name)) = (dtsid, object_name) {
                managers
                    .map
                    .entry(id.to_string())
                    .or_insert_with(|| name.to_string());
            }
        }

        Ok(managers)
    }

    /// Look up a connection name by DTSID
    pub fn get(&self, dtsid: &str) -> Option<&str> {
        self.map.get(dtsid).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    #[cfg(test)]
    pub(crate) fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        Self {
            map: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}
