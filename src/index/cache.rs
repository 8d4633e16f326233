use super::SpatialIndex;
use crate::error::CacheError;
use crate::placetype::Placetype;
use std::fs::{self, File};
use bincode::Options;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const MAGIC: &[u8; 4] = b"WOFX";
pub const FORMAT_VERSION: u32 = 2;

/// Serialized spatial index of one layer, at `<data>/serialized/<layer>.bin`.
#[derive(Debug, Clone)]
pub struct IndexCache {
    layer: Placetype,
    path: PathBuf,
}

impl IndexCache {
    pub fn new(data_path: &Path, layer: Placetype) -> Self {
        let path = data_path
            .join("serialized")
            .join(format!("{}.bin", layer));
        IndexCache { layer, path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<SpatialIndex, CacheError> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(CacheError::Missing(self.path.clone()))
            }
            Err(e) => return Err(e.into()),
        };
        info!(path = ?self.path, "found serialized index, deserializing");
        let file_len = file.metadata()?.len();
        let mut reader = BufReader::new(file);

        let mut header = [0u8; 8];
        reader
            .read_exact(&mut header)
            .map_err(|_| CacheError::BadMagic)?;
        if &header[..4] != MAGIC {
            return Err(CacheError::BadMagic);
        }
        let mut version = [0u8; 4];
        version.copy_from_slice(&header[4..]);
        let found = u32::from_le_bytes(version);
        if found != FORMAT_VERSION {
            return Err(CacheError::Version {
                found,
                expected: FORMAT_VERSION,
            });
        }

        // same encoding as bincode::serialize_into, but no length may claim
        // more bytes than the file holds
        let index: SpatialIndex = bincode::options()
            .with_fixint_encoding()
            .allow_trailing_bytes()
            .with_limit(file_len)
            .deserialize_from(reader)?;
        if index.layer != self.layer {
            return Err(CacheError::LayerMismatch {
                found: index.layer,
                expected: self.layer,
            });
        }
        Ok(index)
    }

    /// Best effort: failures are logged and the cache is skipped.
    pub fn store(&self, index: &SpatialIndex) -> bool {
        let dir = match self.path.parent() {
            Some(dir) => dir,
            None => return false,
        };
        if let Err(e) = fs::create_dir(dir) {
            if e.kind() != io::ErrorKind::AlreadyExists {
                warn!(dir = ?dir, error = %e, "could not create cache directory, skipping serialization");
                return false;
            }
        }
        info!(path = ?self.path, "serializing index");
        match self.write(index) {
            Ok(()) => true,
            Err(e) => {
                warn!(path = ?self.path, error = %e, "could not serialize index");
                false
            }
        }
    }

    /// Writes next to the target and renames, so readers never see a partial file.
    fn write(&self, index: &SpatialIndex) -> Result<(), CacheError> {
        let tmp = self
            .path
            .with_extension(format!("bin.{}.tmp", std::process::id()));
        let result = (|| -> Result<(), CacheError> {
            let mut writer = BufWriter::new(File::create(&tmp)?);
            writer.write_all(MAGIC)?;
            writer.write_all(&FORMAT_VERSION.to_le_bytes())?;
            bincode::serialize_into(&mut writer, index)?;
            writer.flush()?;
            Ok(())
        })();
        match result {
            Ok(()) => Ok(fs::rename(&tmp, &self.path)?),
            Err(e) => {
                let _ = fs::remove_file(&tmp);
                Err(e)
            }
        }
    }
}
