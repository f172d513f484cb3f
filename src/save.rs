use crate::vars::VarTable;
use crate::{SzValue, statics};
use anyhow::Context;
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Represents a loaded save file: the parsed outer document, the decoded
/// variables table, and the original bytes to ensure byte-for-byte
/// roundtripping if unmodified. This is the one long-lived editing session
/// value; the codec and table stay testable without it.
#[derive(Debug, Clone)]
pub struct LoadedSave {
    pub source_path: Option<PathBuf>,
    pub original_bytes: Vec<u8>,
    pub root: SzValue,
    pub vars: VarTable,
    pub dirty: bool,
}

impl LoadedSave {
    pub fn load_path(path: &Path) -> anyhow::Result<Self> {
        let bytes = fs::read(path).with_context(|| format!("reading {path:?}"))?;
        let text = std::str::from_utf8(&bytes).context("save file is not valid UTF-8")?;
        let root = SzValue::parse(text).context("parsing save JSON")?;
        anyhow::ensure!(root.as_object().is_some(), "save root is not a JSON object");

        // A save without the field is legal and edits as an empty table, but a
        // field of the wrong type would be clobbered on save, so reject it.
        let variables = match root.get(statics::SZ_FIELD_VARIABLES) {
            None => "",
            Some(v) => v
                .as_str()
                .context("`variables` field is not a string")?,
        };
        let vars = VarTable::decode(variables).context("decoding variables block")?;

        Ok(Self {
            source_path: Some(path.to_path_buf()),
            original_bytes: bytes,
            root,
            vars,
            dirty: false,
        })
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Re-encode the variables table into a copy of the root document and
    /// serialize the whole thing in the game's compact style.
    pub fn generate_bytes(&self) -> anyhow::Result<Vec<u8>> {
        let mut root = self.root.clone();
        let map = root
            .as_object_mut()
            .context("save root is not a JSON object")?;
        map.insert(
            statics::SZ_FIELD_VARIABLES.to_string(),
            SzValue::String(self.vars.encode()),
        );
        Ok(root.to_save_compact().into_bytes())
    }

    /// Bytes to write for the current state. Unmodified saves reuse the
    /// original bytes so an untouched load/save cycle is byte-identical.
    pub fn save_bytes(&self) -> anyhow::Result<Vec<u8>> {
        if !self.dirty {
            return Ok(self.original_bytes.clone());
        }
        self.generate_bytes()
    }

    /// Write to `path`, first copying any existing file there to `<path>.bak`.
    pub fn save_to_path(&mut self, path: &Path) -> anyhow::Result<()> {
        let bytes = self.save_bytes()?;

        if path.exists() {
            let backup = backup_path(path);
            fs::copy(path, &backup).with_context(|| format!("backing up to {backup:?}"))?;
        }
        fs::write(path, &bytes).with_context(|| format!("writing {path:?}"))?;

        self.source_path = Some(path.to_path_buf());
        self.original_bytes = bytes;
        self.dirty = false;
        Ok(())
    }
}

/// `<path>.bak`, appended to the full file name.
fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".bak");
    PathBuf::from(name)
}
