//! Load-once dataset cache.
//!
//! The sales CSV is parsed at most once per process. [`DataManager::dataset`]
//! loads on first use and hands out the same [`Arc<Dataset>`] on every later
//! call; a failed load is not cached, so the caller may retry.

use std::path::{Component, Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use dashboard_core::error::{DashboardError, Result};
use dashboard_data::dataset::Dataset;
use dashboard_data::reader::load_dataset;
use once_cell::sync::OnceCell;

static GLOBAL: OnceCell<DataManager> = OnceCell::new();

/// Cached access to the immutable dataset.
///
/// # Example
/// ```no_run
/// use dashboard_runtime::data_manager::DataManager;
///
/// let mgr = DataManager::new("restaurant_data.csv");
/// let dataset = mgr.dataset()?;
/// println!("{} order lines", dataset.len());
/// # Ok::<(), dashboard_runtime::core::error::DashboardError>(())
/// ```
#[derive(Debug)]
pub struct DataManager {
    data_path: PathBuf,
    dataset: OnceCell<Arc<Dataset>>,
    /// Successful loads performed; stays at 1 once the cache is warm.
    load_count: AtomicUsize,
}

impl DataManager {
    pub fn new(data_path: impl Into<PathBuf>) -> Self {
        Self {
            data_path: data_path.into(),
            dataset: OnceCell::new(),
            load_count: AtomicUsize::new(0),
        }
    }

    /// Install the process-wide manager for `data_path`.
    ///
    /// Installing again with the same path returns the existing instance;
    /// a different path is a configuration error.
    pub fn install_global(data_path: impl Into<PathBuf>) -> Result<&'static DataManager> {
        let data_path = data_path.into();
        let manager = GLOBAL.get_or_init(|| DataManager::new(data_path.clone()));
        if normalize_path(&manager.data_path) != normalize_path(&data_path) {
            return Err(DashboardError::Config(format!(
                "data manager already installed for {}, refusing {}",
                manager.data_path.display(),
                data_path.display()
            )));
        }
        Ok(manager)
    }

    /// The process-wide manager, if one has been installed.
    pub fn global() -> Option<&'static DataManager> {
        GLOBAL.get()
    }

    // ── Public API ────────────────────────────────────────────────────────

    /// Return the dataset, loading it on the first call.
    pub fn dataset(&self) -> Result<Arc<Dataset>> {
        if let Some(dataset) = self.dataset.get() {
            tracing::debug!("returning cached dataset");
            return Ok(Arc::clone(dataset));
        }

        let dataset = self.dataset.get_or_try_init(|| self.load())?;
        Ok(Arc::clone(dataset))
    }

    pub fn data_path(&self) -> &Path {
        &self.data_path
    }

    pub fn is_loaded(&self) -> bool {
        self.dataset.get().is_some()
    }

    pub fn load_count(&self) -> usize {
        self.load_count.load(Ordering::SeqCst)
    }

    // ── Private helpers ───────────────────────────────────────────────────

    fn load(&self) -> Result<Arc<Dataset>> {
        let started = Instant::now();
        let dataset = load_dataset(&self.data_path).map_err(|e| {
            tracing::warn!(path = %self.data_path.display(), error = %e, "dataset load failed");
            DashboardError::from(e)
        })?;
        self.load_count.fetch_add(1, Ordering::SeqCst);
        tracing::debug!(
            rows = dataset.len(),
            elapsed_s = started.elapsed().as_secs_f64(),
            "dataset cached"
        );
        Ok(Arc::new(dataset))
    }
}

/// Lexically resolve `path` against the working directory, dropping `.`
/// and folding `..`, so equivalent spellings of one file compare equal.
fn normalize_path(path: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    };
    let mut normalized = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_csv(dir: &TempDir) -> PathBuf {
        let path = dir.path().join("restaurant_data.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "order_id,cust_id,category,item,quantity,order_total,order_date"
        )
        .unwrap();
        writeln!(file, "1,A,Drinks,Tea,2,10.0,2023-01-02 10:00:00").unwrap();
        writeln!(file, "2,B,Food,Burger,1,20.0,2023-01-03 12:00:00").unwrap();
        path
    }

    // ── dataset caching ───────────────────────────────────────────────────────

    #[test]
    fn test_dataset_loaded_once() {
        let dir = TempDir::new().unwrap();
        let mgr = DataManager::new(write_csv(&dir));
        assert!(!mgr.is_loaded());

        let first = mgr.dataset().unwrap();
        let second = mgr.dataset().unwrap();

        assert_eq!(first.len(), 2);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(mgr.load_count(), 1);
        assert!(mgr.is_loaded());
    }

    #[test]
    fn test_cached_dataset_survives_file_removal() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(&dir);
        let mgr = DataManager::new(&path);
        mgr.dataset().unwrap();

        std::fs::remove_file(&path).unwrap();
        assert_eq!(mgr.dataset().unwrap().len(), 2);
        assert_eq!(mgr.load_count(), 1);
    }

    #[test]
    fn test_failed_load_is_not_cached() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("restaurant_data.csv");
        let mgr = DataManager::new(&path);

        let err = mgr.dataset().unwrap_err();
        assert!(err.is_load_error());
        assert!(!mgr.is_loaded());
        assert_eq!(mgr.load_count(), 0);

        write_csv(&dir);
        assert_eq!(mgr.dataset().unwrap().len(), 2);
        assert_eq!(mgr.load_count(), 1);
    }

    // ── global instance ───────────────────────────────────────────────────────

    #[test]
    fn test_install_global() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(&dir);

        let installed = DataManager::install_global(&path).unwrap();
        assert_eq!(installed.data_path(), path.as_path());

        let again = DataManager::install_global(&path).unwrap();
        assert!(std::ptr::eq(installed, again));
        assert!(std::ptr::eq(DataManager::global().unwrap(), installed));

        let dotted = dir.path().join(".").join("restaurant_data.csv");
        let same_file = DataManager::install_global(dotted).unwrap();
        assert!(std::ptr::eq(installed, same_file));

        let err = DataManager::install_global(dir.path().join("other.csv")).unwrap_err();
        assert!(matches!(err, DashboardError::Config(_)));
    }

    #[test]
    fn test_normalize_path_equivalent_spellings() {
        assert_eq!(
            normalize_path(Path::new("./restaurant_data.csv")),
            normalize_path(Path::new("restaurant_data.csv"))
        );
        assert_eq!(
            normalize_path(Path::new("/data/sales/../restaurant_data.csv")),
            PathBuf::from("/data/restaurant_data.csv")
        );
        assert_ne!(
            normalize_path(Path::new("a.csv")),
            normalize_path(Path::new("b.csv"))
        );
    }
}
