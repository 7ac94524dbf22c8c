//! Execution backends.
//!
//! - [`cpu`] - Multi-core renderer over plain Rust entities
//! - [`gpu`] - `bytemuck::Pod` entities packed into upload-ready buffers
//!
//! Both share the scene builder in [`crate::scene`]; only their
//! [`SceneTypes`](crate::scene::SceneTypes) differ.

pub mod cpu;
pub mod gpu;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::scene::SceneTypes;
use crate::util::Error;

/// Which backend renders the scene.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Cpu,
    Gpu,
}

impl Backend {
    pub const ALL: [Backend; 2] = [Backend::Cpu, Backend::Gpu];

    pub fn name(self) -> &'static str {
        match self {
            Backend::Cpu => <cpu::CpuSceneTypes as SceneTypes>::NAME,
            Backend::Gpu => <gpu::GpuSceneTypes as SceneTypes>::NAME,
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Backend {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Backend::ALL
            .into_iter()
            .find(|b| b.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::settings(format!("unknown backend '{s}' (expected cpu or gpu)")))
    }
}
