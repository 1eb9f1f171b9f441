mod assets;
mod camera;
mod loader;
mod texture;
mod tilemap;

pub use camera::Camera;

pub use loader::{DEFAULT_SPAWN, MapData, load_map, parse_map, parse_plane};

pub use texture::{NO_TEXTURE, Rgb, Texture, TextureAtlas, TextureError, TextureId, TextureSet};

pub use tilemap::{BOUNDARY_TILE, MapError, TileId, TileMap};
