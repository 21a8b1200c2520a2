//! # Assets Module
//!
//! Loading of the cake model. Parsing goes through `tobj`; each named mesh
//! becomes a [`ModelPart`], and parts whose name mentions a candle are flagged
//! so the party can hang a light on them.

pub mod loader;
pub mod model;

use std::path::PathBuf;

use thiserror::Error;

pub use loader::{LoadState, PendingModel};
pub use model::{face_normals, is_candle_name, load_model, parse_model, CakeModel, ModelPart};

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to load model {}: {source}", .path.display())]
    Obj {
        path: PathBuf,
        source: tobj::LoadError,
    },
    #[error("model {} contains no triangle meshes", .0.display())]
    Empty(PathBuf),
    #[error("model loader stopped before delivering a result")]
    LoaderDropped,
    #[error("model load result was already taken")]
    AlreadyDelivered,
    #[error("failed to start model loader thread: {0}")]
    Spawn(#[source] std::io::Error),
}
