//! Fence file handling.
//!
//! Fences are described in a versioned HCL file, one labelled block per fence, the label being
//! the fence id:
//!
//! ```hcl
//! version = 1
//!
//! fence "red-fort-perimeter" {
//!   name     = "Red Fort security perimeter"
//!   center   = { latitude = 28.6562, longitude = 77.2410 }
//!   radius   = 0.3
//!   type     = "restricted"
//!   isActive = true
//! }
//! ```
//!
//! A built-in set is used when no file is given.
//!

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use async_trait::async_trait;
use eyre::Result;
use serde::Deserialize;
use tabled::builder::Builder;
use tabled::settings::Style;
use tracing::trace;

use tourguard_geofence::{Coordinate, FenceKind, GeoFence};

use crate::{EngineError, FenceStore};

/// Current fence file version
const FENCE_FILE_VER: usize = 1;

fn default_active() -> bool {
    true
}

/// One block of the file, the id is the block label.
///
#[derive(Debug, Deserialize)]
struct FenceEntry {
    name: String,
    center: Coordinate,
    radius: f64,
    #[serde(rename = "type")]
    kind: FenceKind,
    #[serde(rename = "isActive", default = "default_active")]
    active: bool,
}

/// On-disk structure for the fence file
///
#[derive(Debug, Deserialize)]
struct FencesFile {
    /// Version number for safety
    version: usize,
    /// All fences by id
    #[serde(default)]
    fence: BTreeMap<String, FenceEntry>,
}

/// Parse fence file content, every fence is validated.
///
pub fn parse_fences(data: &str) -> Result<Vec<GeoFence>> {
    let file: FencesFile = hcl::from_str(data)?;
    if file.version != FENCE_FILE_VER {
        return Err(EngineError::BadFileVersion(file.version).into());
    }

    let fences = file
        .fence
        .into_iter()
        .map(|(id, e)| GeoFence {
            id,
            name: e.name,
            center: e.center,
            radius: e.radius,
            kind: e.kind,
            active: e.active,
        })
        .collect::<Vec<_>>();

    fences
        .iter()
        .try_for_each(|f| f.validate())
        .map_err(EngineError::from)?;
    Ok(fences)
}

/// Load all fences, from `fname` or the built-in set.
///
#[tracing::instrument]
pub fn load_fences(fname: Option<&Path>) -> Result<Vec<GeoFence>> {
    trace!("enter");

    let data = match fname {
        Some(fname) => fs::read_to_string(fname)?,
        None => include_str!("fences.hcl").to_owned(),
    };
    parse_fences(&data)
}

/// Render the fence list as a table.
///
#[tracing::instrument(skip(fences))]
pub fn list_fences(fences: &[GeoFence]) -> String {
    let header = vec!["Id", "Name", "Type", "Center", "Radius (km)", "Active"];

    let mut builder = Builder::default();
    builder.push_record(header);

    fences.iter().for_each(|f| {
        let center = format!("{:.4}, {:.4}", f.center.lat(), f.center.lon());
        let radius = format!("{:.2}", f.radius);
        let active = if f.active { "yes" } else { "no" };
        builder.push_record(vec![
            f.id.clone(),
            f.name.clone(),
            f.kind.to_string(),
            center,
            radius,
            active.to_string(),
        ]);
    });

    let allf = builder.build().with(Style::modern()).to_string();
    format!("List all fences ({}):\n{allf}", fences.len())
}

/// Fence store serving a fixed set, typically loaded from a file.
///
#[derive(Clone, Debug)]
pub struct FileFenceStore {
    fences: Vec<GeoFence>,
}

impl FileFenceStore {
    pub fn new(fences: Vec<GeoFence>) -> Self {
        FileFenceStore { fences }
    }

    pub fn load(fname: Option<&Path>) -> Result<Self> {
        Ok(FileFenceStore::new(load_fences(fname)?))
    }

    /// Every fence, active or not.
    ///
    pub fn all(&self) -> &[GeoFence] {
        &self.fences
    }
}

#[async_trait]
impl FenceStore for FileFenceStore {
    async fn active_fences(&self) -> Result<Vec<GeoFence>, EngineError> {
        Ok(self.fences.iter().filter(|f| f.active).cloned().collect())
    }
}
