use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use async_trait::async_trait;
use log::{debug, error, trace};
use serde::{Deserialize, Serialize};
use tokio::fs;
use crate::lib_constants::TMP_FILENAME_INFIX;
use crate::rng::make_uuid;
use crate::storage::{MediumError, Record, StoreError};

/// The medium a table is loaded from once and written back to on every
/// change.
#[async_trait]
pub trait TableIo<R: Record>: Send + Sync + 'static {
    async fn read_table(&self) -> Result<Vec<R>, StoreError>;

    async fn write_table(&self, records: &[R]) -> Result<(), StoreError>;
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TableData<R> {
    #[serde(default = "Vec::new", rename = "record")]
    records: Vec<R>,
}

#[derive(Debug, Serialize)]
struct TableDataRef<'a, R> {
    #[serde(rename = "record")]
    records: &'a [R],
}

/// A table kept in a TOML file, replaced atomically on every write.
#[derive(Debug)]
pub struct ProductionTableIo {
    path: PathBuf,
}

impl ProductionTableIo {
    pub async fn new(
        path: impl Into<PathBuf>,
    ) -> Result<Self, StoreError> {
        let path = path.into();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            trace!("ensuring table directory \"{}\" exists", parent.display());
            fs::create_dir_all(parent).await?;
        }
        debug!("using table file \"{}\"", path.display());
        Ok(ProductionTableIo { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn get_tmp_path(&self) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(TMP_FILENAME_INFIX);
        name.push(make_uuid(&mut rand::rng()).hyphenated().to_string());
        PathBuf::from(name)
    }
}

#[async_trait]
impl<R: Record> TableIo<R> for ProductionTableIo {
    async fn read_table(&self) -> Result<Vec<R>, StoreError> {
        trace!("reading table file \"{}\"", self.path.display());
        let contents = match fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(
                    "table file \"{}\" does not exist yet, starting empty",
                    self.path.display(),
                );
                return Ok(Vec::new())
            },
            Err(e) => return Err(e.into()),
        };
        let data: TableData<R> = toml::from_str(&contents)
            .map_err(MediumError::from)?;
        trace!(
            "read {} records from \"{}\"",
            data.records.len(),
            self.path.display(),
        );
        Ok(data.records)
    }

    async fn write_table(&self, records: &[R]) -> Result<(), StoreError> {
        let serialized = toml::to_string(&TableDataRef { records })
            .map_err(MediumError::from)?;
        let tmp_path = self.get_tmp_path();
        trace!(
            "writing {} records to tmp file \"{}\"",
            records.len(),
            tmp_path.display(),
        );
        if let Err(e) = fs::write(&tmp_path, serialized).await {
            error!("failed to write tmp file \"{}\": {e}", tmp_path.display());
            remove_tmp_file(&tmp_path).await;
            return Err(e.into())
        }
        if let Err(e) = fs::rename(&tmp_path, &self.path).await {
            error!(
                "failed to rename tmp file \"{}\" to \"{}\": {e}",
                tmp_path.display(),
                self.path.display(),
            );
            remove_tmp_file(&tmp_path).await;
            return Err(e.into())
        }
        debug!("table file \"{}\" written", self.path.display());
        Ok(())
    }
}

async fn remove_tmp_file(tmp_path: &Path) {
    match fs::remove_file(tmp_path).await {
        Ok(()) => {},
        Err(e) if e.kind() == ErrorKind::NotFound => {},
        Err(e) => error!(
            "failed to remove tmp file \"{}\": {e}",
            tmp_path.display(),
        ),
    }
}

/// Keeps nothing outside the process: the table lives and dies with it.
#[derive(Clone, Copy, Debug, Default)]
pub struct EphemeralTableIo;

#[async_trait]
impl<R: Record> TableIo<R> for EphemeralTableIo {
    async fn read_table(&self) -> Result<Vec<R>, StoreError> {
        Ok(Vec::new())
    }

    async fn write_table(&self, _records: &[R]) -> Result<(), StoreError> {
        Ok(())
    }
}
