//! Imagery hook object shared by every tile of a tree.

use std::any::Any;

use crate::{Mesh, Tile, TileKey};

/// Result of texturizing a tile.
pub struct Texturized {
    /// The texturized mesh, `None` while no imagery is available.
    pub mesh: Option<Box<dyn Mesh>>,
    /// Whether the applied texture is final rather than a placeholder.
    pub texture_solved: bool,
    /// Ask to be texturized again on the next render (imagery still pending).
    pub dirty: bool,
    /// Replacement for the tile's texturizer-private payload, if any.
    pub data: Option<Box<dyn Any>>,
}

impl Texturized {
    /// No imagery yet; try again next frame.
    pub fn pending() -> Self {
        Self {
            mesh: None,
            texture_solved: false,
            dirty: true,
            data: None,
        }
    }
}

/// Applies imagery to tiles and receives their lifecycle notifications.
///
/// One texturizer is shared by a whole tree. Methods take `&self`; any
/// mutable caching belongs to the implementation.
pub trait TileTexturizer {
    /// Lets the texturizer stop refinement of a tile, e.g. while its imagery
    /// is still being downloaded.
    fn tile_meets_render_criteria(&self, tile: &Tile) -> bool;

    /// Produce the texturized mesh of `tile` from its tessellated mesh.
    /// `previous` is the mesh returned by the last call, if any.
    fn texturize(
        &self,
        tile: &Tile,
        tessellated: &dyn Mesh,
        previous: Option<Box<dyn Mesh>>,
    ) -> Texturized;

    /// An ancestor of `tile` changed its texture-solved state.
    fn ancestor_texture_solved_changed(&self, tile: &mut Tile, ancestor: TileKey, solved: bool);

    /// `mesh`, the texturized mesh of `tile`, is about to be dropped.
    fn tile_mesh_to_be_deleted(&self, tile: &Tile, mesh: &dyn Mesh);

    /// `tile` is about to be destroyed by a prune. Outstanding imagery
    /// requests for it must be cancelled here.
    fn tile_to_be_deleted(&self, tile: &Tile, mesh: Option<&dyn Mesh>);
}
