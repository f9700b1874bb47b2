//! Mesh capabilities consumed by the tile quadtree.

use globe_geo::{Camera, Extent};

use crate::Tile;

/// A renderable mesh owned by a tile. Dropping it releases its resources.
pub trait Mesh {
    /// Bounding volume of the mesh, `None` when it could not be computed.
    fn extent(&self) -> Option<&dyn Extent>;

    /// Issue the draw for this mesh.
    fn render(&self, camera: &Camera);
}

/// Builds the geometry of a tile's sector.
///
/// Mesh creation is expensive: each tile asks for its mesh at most once per
/// validity period and caches the result.
pub trait TileTessellator {
    /// Geometry for the tile, `None` if no mesh can be built.
    fn create_mesh(&self, tile: &Tile) -> Option<Box<dyn Mesh>>;

    /// Diagnostic wireframe for the tile.
    fn create_debug_mesh(&self, tile: &Tile) -> Option<Box<dyn Mesh>>;
}
