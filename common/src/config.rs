//! This is the `ConfigFile` struct.
//!
//! This is for finding the right default locations for the various configuration files of
//! `tourguard`.  This is a configuration file/struct neutral loading engine, storing only the
//! base directory and with `load()` read the proper file or the default one.
//!
//! This encapsulates the configuration file, available with `.inner()` or `.inner_mut()`.
//!

use std::fmt::Debug;
use std::fs;
use std::path::{Path, PathBuf};

use directories::BaseDirs;
use eyre::{eyre, Result};
use serde::de::DeserializeOwned;
use tracing::{debug, trace};

use crate::makepath;

/// Main name for the directory base
const TAG: &str = "tourguard";

/// Every configuration file carries a version number, checked on load.
///
pub trait Versioned {
    fn version(&self) -> usize;
}

/// Configuration file loaded from disk, along with the directory it is expected to live in.
///
#[derive(Debug)]
pub struct ConfigFile<T: Debug + DeserializeOwned + Versioned> {
    /// This is the base directory for all files.
    basedir: PathBuf,
    /// Default filename inside `basedir`.
    filename: String,
    inner: T,
}

/// Returns the path of the default config directory, `$HOME/.config/tourguard` on Unix.
///
#[tracing::instrument]
pub fn config_path() -> Result<PathBuf> {
    let base = BaseDirs::new().ok_or_else(|| eyre!("No home directory, can not continue"))?;

    #[cfg(unix)]
    let base: PathBuf = makepath!(base.home_dir(), ".config", TAG);

    #[cfg(windows)]
    let base: PathBuf = makepath!(base.data_local_dir(), TAG);

    debug!("base = {base:?}");
    Ok(base)
}

impl<T> ConfigFile<T>
where
    T: Debug + DeserializeOwned + Versioned,
{
    /// Returns the path of the default config directory
    ///
    pub fn config_path(&self) -> PathBuf {
        self.basedir.clone()
    }

    /// Returns the path of the default config file
    ///
    pub fn default_file(&self) -> PathBuf {
        self.basedir.join(&self.filename)
    }

    /// Load the file and return a struct T in the right format.
    ///
    /// Use the following search path:
    /// - file specified on CLI
    /// - default basedir (base on $HOME or $LOCALAPPDATA)
    ///
    /// `expected` is the only version we accept.
    ///
    #[tracing::instrument]
    pub fn load(fname: Option<&Path>, filename: &str, expected: usize) -> Result<ConfigFile<T>> {
        let basedir = config_path()?;
        let fname = match fname {
            Some(fname) => fname.to_path_buf(),
            None => basedir.join(filename),
        };

        if !fname.exists() {
            return Err(eyre!("Unknown config file {:?}", fname));
        }

        trace!("Loading config file {fname:?}");
        let inner: T = read_hcl(&fname)?;

        if inner.version() != expected {
            return Err(eyre!(
                "Bad config file version {} in {:?} (want {})",
                inner.version(),
                fname,
                expected
            ));
        }

        Ok(ConfigFile {
            basedir,
            filename: filename.to_string(),
            inner,
        })
    }

    /// Return the inner configuration file
    ///
    pub fn inner(&self) -> &T {
        &self.inner
    }

    /// Return the inner configuration file as mutable
    ///
    pub fn inner_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the wrapper.
    ///
    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl<T> ConfigFile<T>
where
    T: Debug + Default + DeserializeOwned + Versioned,
{
    /// Same as `load()` except that a missing *default* file gives us `T::default()`.
    ///
    /// An explicitly named file must exist.
    ///
    #[tracing::instrument]
    pub fn load_or_default(fname: Option<&Path>, filename: &str, expected: usize) -> Result<T> {
        if fname.is_none() {
            let def = config_path()?.join(filename);
            if !def.exists() {
                debug!("no {def:?}, using defaults");
                return Ok(T::default());
            }
        }
        Ok(Self::load(fname, filename, expected)?.into_inner())
    }
}

/// Read and parse any HCL file into `T`.
///
pub fn read_hcl<T: DeserializeOwned>(fname: &Path) -> Result<T> {
    let data = fs::read_to_string(fname)?;
    debug!("string data = {data}");

    let data: T = hcl::from_str(&data)?;
    Ok(data)
}
