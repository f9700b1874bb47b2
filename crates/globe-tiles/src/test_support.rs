//! Mocks shared by the unit tests: a counting tessellator whose meshes report
//! scripted extents, a recording texturizer and a frozen split timer.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use glam::{DVec3, UVec2};
use globe_geo::{Camera, Extent, Frustum};

use crate::{
    Mesh, SplitTimer, Texturized, Tile, TileKey, TileRenderContext, TileTessellator,
    TileTexturizer, TilesRenderParameters, TilesStatistics,
};

/// What the mesh of a tile looks like to visibility and LOD tests.
#[derive(Clone, Copy, Debug)]
pub enum Shape {
    /// The tessellator cannot build a mesh.
    NoMesh,
    /// A mesh without a computable extent.
    NoExtent,
    Extent { visible: bool, projected: UVec2 },
}

impl Shape {
    /// Visible, projecting to `pixels` x `pixels`.
    pub fn visible(pixels: u32) -> Self {
        Shape::Extent {
            visible: true,
            projected: UVec2::splat(pixels),
        }
    }

    pub fn hidden() -> Self {
        Shape::Extent {
            visible: false,
            projected: UVec2::ZERO,
        }
    }
}

type ShapeFn = Rc<dyn Fn(&TileKey) -> Shape>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MeshKind {
    Tessellated,
    Debug,
    Texturized,
}

/// Mesh lifecycle counters, shared by every mock.
#[derive(Default)]
pub struct Counters {
    created: RefCell<Vec<MeshKind>>,
    dropped: RefCell<Vec<MeshKind>>,
    rendered: RefCell<Vec<(TileKey, MeshKind)>>,
}

impl Counters {
    pub fn created(&self, kind: MeshKind) -> usize {
        self.created.borrow().iter().filter(|k| **k == kind).count()
    }

    pub fn dropped(&self, kind: MeshKind) -> usize {
        self.dropped.borrow().iter().filter(|k| **k == kind).count()
    }

    pub fn rendered(&self, kind: MeshKind) -> usize {
        self.rendered
            .borrow()
            .iter()
            .filter(|(_, k)| *k == kind)
            .count()
    }

    /// Keys of tiles drawn with their tessellated or texturized mesh.
    pub fn rendered_keys(&self) -> Vec<TileKey> {
        self.rendered
            .borrow()
            .iter()
            .filter(|(_, kind)| *kind != MeshKind::Debug)
            .map(|(key, _)| *key)
            .collect()
    }

    pub fn clear_rendered(&self) {
        self.rendered.borrow_mut().clear();
    }
}

/// Extent that asks the shape script on every query, so tests can move the
/// camera without rebuilding meshes.
struct MockExtent {
    key: TileKey,
    shape: ShapeFn,
}

impl Extent for MockExtent {
    fn touches(&self, _frustum: &Frustum) -> bool {
        matches!((self.shape)(&self.key), Shape::Extent { visible: true, .. })
    }

    fn projected_extent(&self, _camera: &Camera) -> UVec2 {
        match (self.shape)(&self.key) {
            Shape::Extent { projected, .. } => projected,
            Shape::NoMesh | Shape::NoExtent => UVec2::ZERO,
        }
    }
}

pub struct MockMesh {
    key: TileKey,
    kind: MeshKind,
    extent: Option<MockExtent>,
    counters: Rc<Counters>,
}

impl MockMesh {
    fn new(key: TileKey, kind: MeshKind, extent: Option<MockExtent>, counters: &Rc<Counters>) -> Self {
        counters.created.borrow_mut().push(kind);
        Self {
            key,
            kind,
            extent,
            counters: counters.clone(),
        }
    }
}

impl Mesh for MockMesh {
    fn extent(&self) -> Option<&dyn Extent> {
        self.extent.as_ref().map(|extent| extent as &dyn Extent)
    }

    fn render(&self, _camera: &Camera) {
        self.counters
            .rendered
            .borrow_mut()
            .push((self.key, self.kind));
    }
}

impl Drop for MockMesh {
    fn drop(&mut self) {
        self.counters.dropped.borrow_mut().push(self.kind);
    }
}

pub struct MockTessellator {
    shape: ShapeFn,
    counters: Rc<Counters>,
}

impl TileTessellator for MockTessellator {
    fn create_mesh(&self, tile: &Tile) -> Option<Box<dyn Mesh>> {
        let key = tile.key();
        let extent = match (self.shape)(&key) {
            Shape::NoMesh => return None,
            Shape::NoExtent => None,
            Shape::Extent { .. } => Some(MockExtent {
                key,
                shape: self.shape.clone(),
            }),
        };
        Some(Box::new(MockMesh::new(
            key,
            MeshKind::Tessellated,
            extent,
            &self.counters,
        )))
    }

    fn create_debug_mesh(&self, tile: &Tile) -> Option<Box<dyn Mesh>> {
        Some(Box::new(MockMesh::new(
            tile.key(),
            MeshKind::Debug,
            None,
            &self.counters,
        )))
    }
}

/// Texturizer recording every notification. Imagery is available
/// immediately unless `ready` is cleared.
pub struct MockTexturizer {
    counters: Rc<Counters>,
    pub meets_criteria: Cell<bool>,
    pub ready: Cell<bool>,
    pub texturize_calls: Cell<usize>,
    meshes_to_be_deleted: RefCell<Vec<TileKey>>,
    tiles_to_be_deleted: RefCell<Vec<TileKey>>,
    ancestor_notifications: RefCell<Vec<(TileKey, TileKey, bool)>>,
}

impl MockTexturizer {
    pub fn meshes_to_be_deleted(&self) -> Vec<TileKey> {
        self.meshes_to_be_deleted.borrow().clone()
    }

    pub fn tiles_to_be_deleted(&self) -> Vec<TileKey> {
        self.tiles_to_be_deleted.borrow().clone()
    }

    /// `(tile, ancestor, solved)` triples in notification order.
    pub fn ancestor_notifications(&self) -> Vec<(TileKey, TileKey, bool)> {
        self.ancestor_notifications.borrow().clone()
    }
}

impl TileTexturizer for MockTexturizer {
    fn tile_meets_render_criteria(&self, _tile: &Tile) -> bool {
        self.meets_criteria.get()
    }

    fn texturize(
        &self,
        tile: &Tile,
        _tessellated: &dyn Mesh,
        _previous: Option<Box<dyn Mesh>>,
    ) -> Texturized {
        self.texturize_calls.set(self.texturize_calls.get() + 1);
        if !self.ready.get() {
            return Texturized::pending();
        }
        Texturized {
            mesh: Some(Box::new(MockMesh::new(
                tile.key(),
                MeshKind::Texturized,
                None,
                &self.counters,
            ))),
            texture_solved: true,
            dirty: false,
            data: Some(Box::new(tile.key())),
        }
    }

    fn ancestor_texture_solved_changed(&self, tile: &mut Tile, ancestor: TileKey, solved: bool) {
        self.ancestor_notifications
            .borrow_mut()
            .push((tile.key(), ancestor, solved));
    }

    fn tile_mesh_to_be_deleted(&self, tile: &Tile, _mesh: &dyn Mesh) {
        self.meshes_to_be_deleted.borrow_mut().push(tile.key());
    }

    fn tile_to_be_deleted(&self, tile: &Tile, _mesh: Option<&dyn Mesh>) {
        self.tiles_to_be_deleted.borrow_mut().push(tile.key());
    }
}

/// A split clock frozen at `elapsed` milliseconds; `start` only counts.
#[derive(Clone, Default)]
pub struct ManualTimer {
    elapsed: Rc<Cell<f64>>,
    starts: Rc<Cell<usize>>,
}

impl ManualTimer {
    pub fn set_elapsed(&self, ms: f64) {
        self.elapsed.set(ms);
    }

    pub fn starts(&self) -> usize {
        self.starts.get()
    }
}

impl SplitTimer for ManualTimer {
    fn start(&mut self) {
        self.starts.set(self.starts.get() + 1);
    }

    fn elapsed_ms(&self) -> f64 {
        self.elapsed.get()
    }
}

pub fn test_camera() -> Camera {
    Camera::look_at(
        DVec3::new(0.0, 0.0, 10.0),
        DVec3::ZERO,
        DVec3::Y,
        1.0,
        UVec2::new(800, 600),
    )
}

/// Everything needed to build a [`TileRenderContext`] in a test.
pub struct Harness {
    pub camera: Camera,
    pub parameters: TilesRenderParameters,
    pub tessellator: MockTessellator,
    pub statistics: TilesStatistics,
    pub timer: ManualTimer,
    pub counters: Rc<Counters>,
}

impl Harness {
    pub fn new(shape: impl Fn(&TileKey) -> Shape + 'static) -> Self {
        let counters = Rc::new(Counters::default());
        Self {
            camera: test_camera(),
            parameters: TilesRenderParameters::default(),
            tessellator: MockTessellator {
                shape: Rc::new(shape),
                counters: counters.clone(),
            },
            statistics: TilesStatistics::new(),
            timer: ManualTimer::default(),
            counters,
        }
    }

    pub fn ctx(&mut self) -> TileRenderContext<'_> {
        TileRenderContext::new(
            &self.camera,
            &self.parameters,
            &self.tessellator,
            &mut self.statistics,
            &mut self.timer,
        )
    }

    /// A tessellator sharing this harness's shape script and counters.
    pub fn tessellator(&self) -> MockTessellator {
        MockTessellator {
            shape: self.tessellator.shape.clone(),
            counters: self.counters.clone(),
        }
    }

    pub fn texturizer(&self) -> Rc<MockTexturizer> {
        Rc::new(MockTexturizer {
            counters: self.counters.clone(),
            meets_criteria: Cell::new(false),
            ready: Cell::new(true),
            texturize_calls: Cell::new(0),
            meshes_to_be_deleted: RefCell::default(),
            tiles_to_be_deleted: RefCell::default(),
            ancestor_notifications: RefCell::default(),
        })
    }
}
