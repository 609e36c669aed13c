//! Generation parameters and the two standard fixture sets.
use crate::error::{Error, Result};
use crate::layout::Layout;
use crate::quantize::DEFAULT_PRECISION;

/// Slots available to a 1-to-n consumer for one embedding coordinate: one row
/// of a 4096-degree batching ring. Larger galleries have to be chunked.
pub const BATCH_SLOT_CAPACITY: usize = 2048;

/// Which side of a match a bank plays.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Role {
    /// Enrolled reference set.
    Gallery,
    /// Query set.
    Probe,
}

impl Role {
    pub fn name(&self) -> &'static str {
        match self {
            Role::Gallery => "gallery",
            Role::Probe => "probe",
        }
    }
}

/// One file a run produces.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Artifact {
    pub role: Role,
    pub layout: Layout,
    pub file_name: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GenerationConfig {
    pub dim: usize,
    pub num_gallery: usize,
    pub num_probe: usize,
    pub precision: i32,
    /// Probe bank is a copy of the gallery bank.
    pub identical_sets: bool,
    pub layouts: Vec<Layout>,
    /// Put the layout tag in file names (`gallery-1-to-n.bin` vs `gallery.bin`).
    pub tagged_names: bool,
    pub seed: Option<u64>,
}

impl GenerationConfig {
    /// 512-d, 16 gallery and 16 distinct probes, written in both layouts.
    pub fn one_to_n() -> Self {
        Self {
            dim: 512,
            num_gallery: 16,
            num_probe: 16,
            precision: DEFAULT_PRECISION,
            identical_sets: false,
            layouts: vec![Layout::Pairwise, Layout::Batch],
            tagged_names: true,
            seed: None,
        }
    }

    /// 64-d, 5 vectors used as both gallery and probe, pairwise only.
    pub fn identical() -> Self {
        Self {
            dim: 64,
            num_gallery: 5,
            num_probe: 5,
            precision: DEFAULT_PRECISION,
            identical_sets: true,
            layouts: vec![Layout::Pairwise],
            tagged_names: false,
            seed: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.dim == 0 || self.num_gallery == 0 || self.num_probe == 0 {
            return Err(Error::InvalidConfig("dimension and bank sizes must be positive"));
        }
        if self.precision <= 0 {
            return Err(Error::InvalidPrecision(self.precision));
        }
        if self.identical_sets && self.num_gallery != self.num_probe {
            return Err(Error::InvalidConfig("identical sets need equal bank sizes"));
        }
        if self.layouts.is_empty() {
            return Err(Error::InvalidConfig("no output layout selected"));
        }
        if !self.tagged_names && self.layouts.len() > 1 {
            return Err(Error::InvalidConfig("untagged names only allow one layout"));
        }
        if self.layouts.contains(&Layout::Batch) && self.num_gallery > BATCH_SLOT_CAPACITY {
            tracing::warn!(
                num_gallery = self.num_gallery,
                capacity = BATCH_SLOT_CAPACITY,
                "gallery exceeds one batch row; 1-to-n consumers must chunk it"
            );
        }
        Ok(())
    }

    pub fn file_name(&self, role: Role, layout: Layout) -> String {
        if self.tagged_names {
            format!("{}-{}.bin", role.name(), layout.tag())
        } else {
            format!("{}.bin", role.name())
        }
    }

    /// Every file a run writes, probe before gallery within each layout.
    pub fn artifacts(&self) -> Vec<Artifact> {
        self.layouts
            .iter()
            .flat_map(|&layout| {
                [Role::Probe, Role::Gallery].map(|role| Artifact {
                    role,
                    layout,
                    file_name: self.file_name(role, layout),
                })
            })
            .collect()
    }
}
