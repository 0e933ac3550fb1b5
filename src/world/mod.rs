pub mod camera;
pub mod grid;
pub mod props;
pub mod texture;

pub use camera::Camera;
pub use grid::{DOOR_MAX, DoorState, Grid, MapError, TILE, Tile, WallKind};
pub use props::{LayoutError, Prop, PropKind, PropRegistry, PropState};
pub use texture::{NO_TEXTURE, SceneSheets, Texture, TextureBank, TextureError, TextureId};
