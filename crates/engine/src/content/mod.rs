mod atlas_loader;
mod world_def;

pub use atlas_loader::{load_atlas_set, load_scaled_atlas, AtlasLoadError};
pub use world_def::{
    load_world_def, parse_world_def, AtlasFiles, EntityDef, TileDef, WorldDef, WorldDefError,
};
