//! One node of the tile quadtree and its per-frame render/split/prune decision.

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use globe_geo::{Angle, Geodetic2D, Sector};
use tracing::trace;

use crate::{Mesh, TileKey, TileRenderContext, TileTexturizer};

/// A tile whose projected width + height is at most this factor times the
/// texture width + height is displayed at native resolution or finer.
pub const SPLIT_TEXTURE_FACTOR: f64 = 1.75;

/// With the split budget enabled, a new split must wait this long after the
/// previous one.
pub const MIN_SPLIT_INTERVAL_MS: f64 = 25.0;

/// With the split budget enabled, no tile splits once this many splits
/// happened in the frame.
const MAX_SPLITS_IN_FRAME: usize = 2;

/// A node of the quadtree covering one geographic sector.
///
/// A tile is either a leaf or has exactly four children. It owns its
/// children and every cached mesh; dropping a tile drops its whole subtree
/// first, then its own caches.
pub struct Tile {
    // Declared first so a dropped tile releases its descendants before its own meshes.
    children: Option<Box<[Tile; 4]>>,
    key: TileKey,
    sector: Sector,
    parent: Option<TileKey>,
    texturizer: Option<Rc<dyn TileTexturizer>>,

    tessellated_mesh: Option<Box<dyn Mesh>>,
    debug_mesh: Option<Box<dyn Mesh>>,
    texturized_mesh: Option<Box<dyn Mesh>>,
    texturizer_data: Option<Box<dyn Any>>,

    is_visible: bool,
    texture_solved: bool,
    texturizer_dirty: bool,
    just_created_subtiles: bool,
}

impl Tile {
    pub fn new(
        texturizer: Option<Rc<dyn TileTexturizer>>,
        parent: Option<TileKey>,
        sector: Sector,
        key: TileKey,
    ) -> Self {
        Self {
            children: None,
            key,
            sector,
            parent,
            texturizer,
            tessellated_mesh: None,
            debug_mesh: None,
            texturized_mesh: None,
            texturizer_data: None,
            is_visible: false,
            texture_solved: false,
            texturizer_dirty: true,
            just_created_subtiles: false,
        }
    }

    pub fn key(&self) -> TileKey {
        self.key
    }

    pub fn level(&self) -> u32 {
        self.key.level
    }

    pub fn row(&self) -> u32 {
        self.key.row
    }

    pub fn column(&self) -> u32 {
        self.key.column
    }

    pub fn sector(&self) -> &Sector {
        &self.sector
    }

    /// Key of the parent tile. Only a lookup handle, the parent owns this tile.
    pub fn parent_key(&self) -> Option<TileKey> {
        self.parent
    }

    pub fn texturizer(&self) -> Option<&Rc<dyn TileTexturizer>> {
        self.texturizer.as_ref()
    }

    pub fn children(&self) -> Option<&[Tile; 4]> {
        self.children.as_deref()
    }

    pub fn children_mut(&mut self) -> Option<&mut [Tile; 4]> {
        self.children.as_deref_mut()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    /// Visibility computed by the last traversal.
    pub fn is_visible(&self) -> bool {
        self.is_visible
    }

    pub fn is_texture_solved(&self) -> bool {
        self.texture_solved
    }

    pub fn is_texturizer_dirty(&self) -> bool {
        self.texturizer_dirty
    }

    pub fn set_texturizer_dirty(&mut self, dirty: bool) {
        self.texturizer_dirty = dirty;
    }

    pub fn tessellated_mesh(&self) -> Option<&dyn Mesh> {
        self.tessellated_mesh.as_deref()
    }

    pub fn texturized_mesh(&self) -> Option<&dyn Mesh> {
        self.texturized_mesh.as_deref()
    }

    pub fn has_texturizer_data(&self) -> bool {
        self.texturizer_data.is_some()
    }

    pub fn texturizer_data(&self) -> Option<&dyn Any> {
        self.texturizer_data.as_deref()
    }

    /// Replace the texturizer payload, dropping the previous one.
    pub fn set_texturizer_data(&mut self, data: Option<Box<dyn Any>>) {
        self.texturizer_data = data;
    }

    /// The cached tessellated mesh, built on first use.
    ///
    /// `None` when the tessellator cannot build a mesh; the tile is then not
    /// renderable this frame.
    pub fn get_or_create_mesh(&mut self, ctx: &TileRenderContext<'_>) -> Option<&dyn Mesh> {
        if self.tessellated_mesh.is_none() {
            self.tessellated_mesh = ctx.tessellator().create_mesh(self);
        }
        self.tessellated_mesh.as_deref()
    }

    fn get_or_create_debug_mesh(&mut self, ctx: &TileRenderContext<'_>) -> Option<&dyn Mesh> {
        if self.debug_mesh.is_none() {
            self.debug_mesh = ctx.tessellator().create_debug_mesh(self);
        }
        self.debug_mesh.as_deref()
    }

    /// Drop the tessellated and debug meshes so they are rebuilt on the next
    /// render, and force a new texturization on top of them.
    pub fn invalidate_tessellation(&mut self) {
        self.tessellated_mesh = None;
        self.debug_mesh = None;
        self.texturizer_dirty = true;
    }

    /// True iff the mesh has an extent and it touches the camera's view volume.
    pub fn is_visible_from(&mut self, ctx: &TileRenderContext<'_>) -> bool {
        let frustum = ctx.camera().frustum();
        self.get_or_create_mesh(ctx)
            .and_then(|mesh| mesh.extent())
            .is_some_and(|extent| extent.touches(frustum))
    }

    /// Whether this tile should render as-is instead of splitting.
    pub fn meets_render_criteria(&mut self, ctx: &TileRenderContext<'_>) -> bool {
        let parameters = ctx.parameters();

        if self.key.level >= parameters.max_level || !self.key.can_split() {
            return true;
        }

        if let Some(texturizer) = &self.texturizer
            && texturizer.tile_meets_render_criteria(self)
        {
            return true;
        }

        let camera = ctx.camera();
        let Some(projected) = self
            .get_or_create_mesh(ctx)
            .and_then(|mesh| mesh.extent())
            .map(|extent| extent.projected_extent(camera))
        else {
            return true;
        };

        let projected_size = f64::from(projected.x) + f64::from(projected.y);
        let texture_size = f64::from(parameters.tile_texture_width)
            + f64::from(parameters.tile_texture_height);
        if projected_size <= texture_size * SPLIT_TEXTURE_FACTOR {
            return true;
        }

        if parameters.use_split_budget && self.children.is_none() {
            if ctx.statistics().splits_count_in_frame() >= MAX_SPLITS_IN_FRAME {
                return true;
            }
            if ctx.last_split_timer().elapsed_ms() < MIN_SPLIT_INTERVAL_MS {
                return true;
            }
        }

        false
    }

    /// The four children, created on first call. Later calls return the same
    /// children until the tile is pruned.
    pub fn split(&mut self) -> &mut [Tile; 4] {
        let (key, sector) = (self.key, self.sector);
        let texturizer = &self.texturizer;
        let mut created = false;
        let children = self.children.get_or_insert_with(|| {
            created = true;
            Box::new(create_subtiles(key, &sector, texturizer))
        });
        if created {
            trace!(tile = %key, "split");
            self.just_created_subtiles = true;
        }
        children
    }

    /// Visit this tile for the current frame.
    ///
    /// Invisible tiles collapse their subtree. Visible tiles either render now
    /// (and drop their children) or push their four children onto
    /// `to_visit_next`. Without a queue the tile always renders as-is.
    pub fn render<'t>(
        &'t mut self,
        ctx: &mut TileRenderContext<'_>,
        to_visit_next: Option<&mut Vec<&'t mut Tile>>,
    ) {
        ctx.statistics_mut().compute_tile_processed(self);

        if !self.is_visible_from(ctx) {
            self.set_visible(false);
            self.prune();
            return;
        }

        self.set_visible(true);
        ctx.statistics_mut().compute_visible_tile(self);

        let render_now = to_visit_next.is_none()
            || self.meets_render_criteria(ctx)
            || (ctx.parameters().incremental_tile_quality && !self.texture_solved);

        match to_visit_next {
            Some(queue) if !render_now => self.defer_to_children(ctx, queue),
            _ => {
                self.render_mesh(ctx);
                if ctx.parameters().render_debug {
                    self.render_debug_mesh(ctx);
                }
                ctx.statistics_mut().compute_tile_rendered(self);
                self.prune();
            }
        }
    }

    fn defer_to_children<'t>(
        &'t mut self,
        ctx: &mut TileRenderContext<'_>,
        queue: &mut Vec<&'t mut Tile>,
    ) {
        self.split();
        if self.just_created_subtiles {
            ctx.last_split_timer_mut().start();
            ctx.statistics_mut().compute_split_in_frame();
            self.just_created_subtiles = false;
        }
        if let Some(children) = self.children.as_deref_mut() {
            queue.extend(children.iter_mut());
        }
    }

    fn render_mesh(&mut self, ctx: &TileRenderContext<'_>) {
        if self.get_or_create_mesh(ctx).is_none() {
            return;
        }

        if let Some(texturizer) = self.texturizer.clone()
            && (self.texturized_mesh.is_none() || self.texturizer_dirty)
        {
            self.texturize(&*texturizer);
        }

        // Imagery not ready yet degrades to the bare geometry.
        if let Some(mesh) = self
            .texturized_mesh
            .as_deref()
            .or(self.tessellated_mesh.as_deref())
        {
            mesh.render(ctx.camera());
        }
    }

    fn render_debug_mesh(&mut self, ctx: &TileRenderContext<'_>) {
        if let Some(mesh) = self.get_or_create_debug_mesh(ctx) {
            mesh.render(ctx.camera());
        }
    }

    fn texturize(&mut self, texturizer: &dyn TileTexturizer) {
        let previous = self.texturized_mesh.take();
        let Some(tessellated) = self.tessellated_mesh.as_deref() else {
            self.texturized_mesh = previous;
            return;
        };

        let outcome = texturizer.texturize(self, tessellated, previous);
        self.texturized_mesh = outcome.mesh;
        self.texturizer_dirty = outcome.dirty;
        if outcome.data.is_some() {
            self.texturizer_data = outcome.data;
        }
        self.set_texture_solved(outcome.texture_solved);
    }

    /// Build the mesh and texturize it without drawing anything.
    pub fn prepare_for_full_rendering(&mut self, ctx: &TileRenderContext<'_>) {
        if self.get_or_create_mesh(ctx).is_none() {
            return;
        }
        if let Some(texturizer) = self.texturizer.clone()
            && (self.texturized_mesh.is_none() || self.texturizer_dirty)
        {
            self.texturize(&*texturizer);
        }
    }

    fn set_visible(&mut self, visible: bool) {
        if self.is_visible != visible {
            self.is_visible = visible;
            if !visible {
                self.delete_texturized_mesh();
            }
        }
    }

    /// Top-level tiles keep their imagery across visibility changes.
    fn delete_texturized_mesh(&mut self) {
        if self.key.level == 0 {
            return;
        }
        let Some(mesh) = self.texturized_mesh.take() else {
            return;
        };
        if let Some(texturizer) = &self.texturizer {
            texturizer.tile_mesh_to_be_deleted(self, &*mesh);
        }
        drop(mesh);
        self.texturizer_data = None;
        self.texturizer_dirty = true;
        self.set_texture_solved(false);
    }

    /// Collapse this tile back to a leaf.
    ///
    /// Each child is hidden, pruned recursively, announced to the texturizer
    /// and dropped. This tile's own meshes are kept.
    pub fn prune(&mut self) {
        let Some(children) = self.children.take() else {
            return;
        };
        let children: [Tile; 4] = *children;
        for mut child in children {
            child.is_visible = false;
            child.delete_texturized_mesh();
            child.prune();
            if let Some(texturizer) = &child.texturizer {
                texturizer.tile_to_be_deleted(&child, child.texturized_mesh.as_deref());
            }
        }
    }

    /// Record whether this tile's texture is final, notifying every
    /// descendant on change.
    pub fn set_texture_solved(&mut self, solved: bool) {
        if solved == self.texture_solved {
            return;
        }
        self.texture_solved = solved;
        let ancestor = self.key;
        if let Some(children) = self.children.as_deref_mut() {
            for child in children.iter_mut() {
                child.ancestor_texture_solved_changed(ancestor, solved);
            }
        }
    }

    fn ancestor_texture_solved_changed(&mut self, ancestor: TileKey, solved: bool) {
        // A solved tile does not depend on its ancestors' imagery.
        if solved && self.texture_solved {
            return;
        }
        if let Some(texturizer) = self.texturizer.clone() {
            texturizer.ancestor_texture_solved_changed(self, ancestor, solved);
        }
        if let Some(children) = self.children.as_deref_mut() {
            for child in children.iter_mut() {
                child.ancestor_texture_solved_changed(ancestor, solved);
            }
        }
    }

    /// The deepest existing tile whose sector contains `position`, or `None`
    /// if the position is outside this tile.
    pub fn find_deepest_tile_containing(&self, position: &Geodetic2D) -> Option<&Tile> {
        if !self.sector.contains(position) {
            return None;
        }
        match self.children.as_deref() {
            None => Some(self),
            Some(children) => children
                .iter()
                .find_map(|child| child.find_deepest_tile_containing(position)),
        }
    }

    /// The descendant (or self) with the given key, if it currently exists.
    pub fn descendant(&self, key: &TileKey) -> Option<&Tile> {
        if key.ancestor_at(self.key.level) != Some(self.key) {
            return None;
        }
        let mut tile = self;
        for level in self.key.level + 1..=key.level {
            let step = key.ancestor_at(level)?;
            tile = &tile.children.as_deref()?[step.quadrant()];
        }
        Some(tile)
    }

    pub fn descendant_mut(&mut self, key: &TileKey) -> Option<&mut Tile> {
        if key.ancestor_at(self.key.level) != Some(self.key) {
            return None;
        }
        let mut tile = self;
        for level in tile.key.level + 1..=key.level {
            let step = key.ancestor_at(level)?;
            tile = &mut tile.children.as_deref_mut()?[step.quadrant()];
        }
        Some(tile)
    }

    /// Visit this tile and every existing descendant, parents first.
    pub fn for_each(&self, f: &mut dyn FnMut(&Tile)) {
        f(self);
        if let Some(children) = self.children.as_deref() {
            for child in children {
                child.for_each(f);
            }
        }
    }
}

/// The four quadrants of `sector`, split at the midpoint latitude and longitude,
/// in the quadrant order of [`TileKey::children`].
fn create_subtiles(
    key: TileKey,
    sector: &Sector,
    texturizer: &Option<Rc<dyn TileTexturizer>>,
) -> [Tile; 4] {
    let lower = sector.lower();
    let upper = sector.upper();
    let mid_lat = Angle::mid_angle(lower.latitude, upper.latitude);
    let mid_lon = Angle::mid_angle(lower.longitude, upper.longitude);

    let bounds = [
        (lower.latitude, lower.longitude, mid_lat, mid_lon),
        (lower.latitude, mid_lon, mid_lat, upper.longitude),
        (mid_lat, lower.longitude, upper.latitude, mid_lon),
        (mid_lat, mid_lon, upper.latitude, upper.longitude),
    ];
    let keys = key.children();

    std::array::from_fn(|i| {
        let (lower_lat, lower_lon, upper_lat, upper_lon) = bounds[i];
        Tile::new(
            texturizer.clone(),
            Some(key),
            Sector::new(
                Geodetic2D::new(lower_lat, lower_lon),
                Geodetic2D::new(upper_lat, upper_lon),
            ),
            keys[i],
        )
    })
}

impl fmt::Debug for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tile")
            .field("key", &self.key)
            .field("sector", &self.sector)
            .field("is_visible", &self.is_visible)
            .field("texture_solved", &self.texture_solved)
            .field("texturizer_dirty", &self.texturizer_dirty)
            .field("has_children", &self.children.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{Harness, MeshKind, Shape};
    use glam::UVec2;

    fn root() -> Tile {
        Tile::new(None, None, Sector::FULL_SPHERE, TileKey::new(0, 0, 0))
    }

    #[test]
    fn test_split_partitions_sector_into_quadrants() {
        let mut tile = Tile::new(
            None,
            None,
            Sector::from_degrees(-10.0, 20.0, 30.0, 60.0),
            TileKey::new(2, 3, 5),
        );
        let parent_sector = *tile.sector();
        let children = tile.split();

        let expected_keys = [(6, 10), (6, 11), (7, 10), (7, 11)];
        let mut total_area = 0.0;
        for (child, (row, column)) in children.iter().zip(expected_keys) {
            assert_eq!(child.key(), TileKey::new(3, row, column));
            assert_eq!(child.parent_key(), Some(TileKey::new(2, 3, 5)));
            let area = child.sector().area_degrees();
            assert!((area - parent_sector.area_degrees() / 4.0).abs() < 1e-9);
            total_area += area;
        }
        assert!((total_area - parent_sector.area_degrees()).abs() < 1e-9);

        assert_eq!(children[0].sector().lower(), parent_sector.lower());
        assert_eq!(children[3].sector().upper(), parent_sector.upper());
        assert_eq!(children[0].sector().upper(), parent_sector.center());
        assert_eq!(children[3].sector().lower(), parent_sector.center());
        assert_eq!(
            children[1].sector().lower(),
            Geodetic2D::from_degrees(-10.0, 40.0)
        );
        assert_eq!(
            children[2].sector().lower(),
            Geodetic2D::from_degrees(10.0, 20.0)
        );
    }

    #[test]
    fn test_split_is_idempotent() {
        let mut tile = root();
        let first: Vec<TileKey> = tile.split().iter().map(Tile::key).collect();
        let second: Vec<TileKey> = tile.split().iter().map(Tile::key).collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 4);
    }

    #[test]
    fn test_sector_is_copied() {
        let mut sector = Sector::from_degrees(0.0, 0.0, 10.0, 10.0);
        let tile = Tile::new(None, None, sector, TileKey::new(0, 0, 0));
        sector = Sector::FULL_SPHERE;
        assert_ne!(*tile.sector(), sector);
    }

    #[test]
    fn test_mesh_is_created_once() {
        let mut harness = Harness::new(|_| Shape::visible(100));
        let mut tile = root();
        {
            let ctx = harness.ctx();
            assert!(tile.get_or_create_mesh(&ctx).is_some());
            assert!(tile.get_or_create_mesh(&ctx).is_some());
        }
        assert_eq!(harness.counters.created(MeshKind::Tessellated), 1);
    }

    #[test]
    fn test_tile_without_mesh_is_not_visible() {
        let mut harness = Harness::new(|_| Shape::NoMesh);
        let mut tile = root();
        assert!(!tile.is_visible_from(&harness.ctx()));
    }

    #[test]
    fn test_tile_without_extent_is_not_visible_but_meets_criteria() {
        let mut harness = Harness::new(|_| Shape::NoExtent);
        let mut tile = root();
        let ctx = harness.ctx();
        assert!(!tile.is_visible_from(&ctx));
        assert!(tile.meets_render_criteria(&ctx));
    }

    #[test]
    fn test_visibility_follows_extent() {
        let mut harness = Harness::new(|_| Shape::hidden());
        let mut tile = root();
        assert!(!tile.is_visible_from(&harness.ctx()));

        let mut harness = Harness::new(|_| Shape::visible(10));
        let mut tile = root();
        assert!(tile.is_visible_from(&harness.ctx()));
    }

    #[test]
    fn test_max_level_meets_criteria() {
        let mut harness = Harness::new(|_| Shape::visible(100_000));
        harness.parameters.max_level = 3;
        let mut tile = Tile::new(None, None, Sector::FULL_SPHERE, TileKey::new(3, 0, 0));
        assert!(tile.meets_render_criteria(&harness.ctx()));
    }

    #[test]
    fn test_tile_at_key_limit_meets_criteria() {
        let mut harness = Harness::new(|_| Shape::visible(100_000));
        harness.parameters.max_level = u32::MAX;
        harness.parameters.use_split_budget = false;
        let mut tile = Tile::new(
            None,
            None,
            Sector::FULL_SPHERE,
            TileKey::new(31, 1 << 31, 0),
        );
        assert!(tile.meets_render_criteria(&harness.ctx()));
    }

    #[test]
    fn test_huge_texture_size_does_not_overflow() {
        let mut harness = Harness::new(|_| Shape::visible(100_000));
        harness.parameters.tile_texture_width = u32::MAX;
        harness.parameters.tile_texture_height = u32::MAX;
        let mut tile = root();
        assert!(tile.meets_render_criteria(&harness.ctx()));
    }

    #[test]
    fn test_projected_size_threshold() {
        // 256 + 256 texels * 1.75 = 896 pixels of width + height.
        let mut harness = Harness::new(|_| Shape::Extent {
            visible: true,
            projected: UVec2::new(448, 448),
        });
        harness.parameters.use_split_budget = false;
        let mut tile = root();
        assert!(tile.meets_render_criteria(&harness.ctx()));

        let mut harness = Harness::new(|_| Shape::Extent {
            visible: true,
            projected: UVec2::new(448, 449),
        });
        harness.parameters.use_split_budget = false;
        let mut tile = root();
        assert!(!tile.meets_render_criteria(&harness.ctx()));
    }

    #[test]
    fn test_texturizer_can_stop_refinement() {
        let mut harness = Harness::new(|_| Shape::visible(10_000));
        harness.parameters.use_split_budget = false;
        let texturizer = harness.texturizer();
        texturizer.meets_criteria.set(true);
        let mut tile = Tile::new(
            Some(texturizer.clone()),
            None,
            Sector::FULL_SPHERE,
            TileKey::new(0, 0, 0),
        );
        assert!(tile.meets_render_criteria(&harness.ctx()));

        texturizer.meets_criteria.set(false);
        assert!(!tile.meets_render_criteria(&harness.ctx()));
    }

    #[test]
    fn test_split_budget_counts_and_interval() {
        let mut harness = Harness::new(|_| Shape::visible(10_000));
        harness.timer.set_elapsed(100.0);
        let mut tile = root();
        assert!(!tile.meets_render_criteria(&harness.ctx()));

        // Too soon after the previous split.
        harness.timer.set_elapsed(10.0);
        assert!(tile.meets_render_criteria(&harness.ctx()));

        // Budget spent.
        harness.timer.set_elapsed(100.0);
        harness.statistics.compute_split_in_frame();
        harness.statistics.compute_split_in_frame();
        assert!(tile.meets_render_criteria(&harness.ctx()));

        // Already split tiles are not limited.
        tile.split();
        assert!(!tile.meets_render_criteria(&harness.ctx()));
    }

    #[test]
    fn test_render_without_queue_renders_raw() {
        let mut harness = Harness::new(|_| Shape::visible(10_000));
        let mut tile = root();
        tile.render(&mut harness.ctx(), None);

        assert!(tile.is_leaf());
        assert!(tile.is_visible());
        assert_eq!(harness.counters.rendered_keys(), vec![TileKey::new(0, 0, 0)]);
        assert_eq!(harness.statistics.tiles_rendered(), 1);
    }

    #[test]
    fn test_render_defers_to_children() {
        let mut harness = Harness::new(|key: &TileKey| {
            if key.level == 0 {
                Shape::visible(10_000)
            } else {
                Shape::visible(10)
            }
        });
        harness.timer.set_elapsed(100.0);
        let mut tile = root();
        {
            let mut ctx = harness.ctx();
            let mut next = Vec::new();
            tile.render(&mut ctx, Some(&mut next));
            let keys: Vec<TileKey> = next.iter().map(|t| t.key()).collect();
            assert_eq!(keys, TileKey::new(0, 0, 0).children().to_vec());
        }
        assert_eq!(harness.statistics.splits_count_in_frame(), 1);
        assert_eq!(harness.timer.starts(), 1);
        assert!(harness.counters.rendered_keys().is_empty());
    }

    #[test]
    fn test_render_debug_mesh() {
        let mut harness = Harness::new(|_| Shape::visible(10));
        harness.parameters.render_debug = true;
        let mut tile = root();
        tile.render(&mut harness.ctx(), None);
        assert_eq!(harness.counters.created(MeshKind::Debug), 1);
        assert_eq!(harness.counters.rendered(MeshKind::Debug), 1);
    }

    #[test]
    fn test_texturized_mesh_preferred_and_raw_fallback() {
        let mut harness = Harness::new(|_| Shape::visible(10));
        let texturizer = harness.texturizer();
        let mut tile = Tile::new(
            Some(texturizer.clone()),
            None,
            Sector::FULL_SPHERE,
            TileKey::new(0, 0, 0),
        );

        // Imagery pending: geometry only, texturizer asked again next frame.
        texturizer.ready.set(false);
        tile.render(&mut harness.ctx(), None);
        assert_eq!(harness.counters.rendered(MeshKind::Tessellated), 1);
        assert!(tile.is_texturizer_dirty());

        texturizer.ready.set(true);
        tile.render(&mut harness.ctx(), None);
        assert_eq!(harness.counters.rendered(MeshKind::Texturized), 1);
        assert!(tile.is_texture_solved());
        assert!(!tile.is_texturizer_dirty());

        // Clean texturized mesh is reused.
        tile.render(&mut harness.ctx(), None);
        assert_eq!(texturizer.texturize_calls.get(), 2);
        assert_eq!(harness.counters.rendered(MeshKind::Texturized), 2);
    }

    #[test]
    fn test_invisible_tile_releases_texturized_mesh_except_level_zero() {
        let visible = std::rc::Rc::new(std::cell::Cell::new(true));
        let flag = visible.clone();
        let mut harness = Harness::new(move |_| {
            if flag.get() {
                Shape::visible(10)
            } else {
                Shape::hidden()
            }
        });
        let texturizer = harness.texturizer();
        let mut top = Tile::new(
            Some(texturizer.clone()),
            None,
            Sector::FULL_SPHERE,
            TileKey::new(0, 0, 0),
        );
        let mut deep = Tile::new(
            Some(texturizer.clone()),
            Some(TileKey::new(0, 0, 0)),
            Sector::FULL_SPHERE,
            TileKey::new(1, 0, 0),
        );
        top.render(&mut harness.ctx(), None);
        deep.render(&mut harness.ctx(), None);
        assert!(top.texturized_mesh().is_some());
        assert!(deep.texturized_mesh().is_some());

        visible.set(false);
        top.render(&mut harness.ctx(), None);
        deep.render(&mut harness.ctx(), None);

        assert!(top.texturized_mesh().is_some());
        assert!(top.is_texture_solved());
        assert!(deep.texturized_mesh().is_none());
        assert!(!deep.is_texture_solved());
        assert!(deep.is_texturizer_dirty());
        assert_eq!(texturizer.meshes_to_be_deleted(), vec![TileKey::new(1, 0, 0)]);
    }

    #[test]
    fn test_prune_releases_subtree() {
        let mut harness = Harness::new(|_| Shape::visible(10));
        let texturizer = harness.texturizer();
        let mut tile = Tile::new(
            Some(texturizer.clone()),
            None,
            Sector::FULL_SPHERE,
            TileKey::new(0, 0, 0),
        );

        // Two levels of visible, texturized descendants.
        {
            let ctx = harness.ctx();
            for child in tile.split().iter_mut() {
                child.prepare_for_full_rendering(&ctx);
                child.is_visible = true;
                for grandchild in child.split().iter_mut() {
                    grandchild.prepare_for_full_rendering(&ctx);
                    grandchild.is_visible = true;
                }
            }
        }
        let created = harness.counters.created(MeshKind::Tessellated)
            + harness.counters.created(MeshKind::Texturized);
        assert_eq!(created, 40);

        tile.prune();

        assert!(tile.is_leaf());
        let dropped = harness.counters.dropped(MeshKind::Tessellated)
            + harness.counters.dropped(MeshKind::Texturized);
        assert_eq!(dropped, created);
        // One deletion notice per descendant, one mesh notice per texturized descendant.
        assert_eq!(texturizer.tiles_to_be_deleted().len(), 20);
        assert_eq!(texturizer.meshes_to_be_deleted().len(), 20);

        // Grandchildren are announced before their parent.
        let deleted = texturizer.tiles_to_be_deleted();
        let first_child = deleted
            .iter()
            .position(|key| *key == TileKey::new(1, 0, 0))
            .unwrap();
        assert!(deleted[..first_child]
            .iter()
            .all(|key| TileKey::new(1, 0, 0).is_ancestor_of(key)));
    }

    #[test]
    fn test_texture_solved_propagates_to_unsolved_descendants() {
        let harness = Harness::new(|_| Shape::visible(10));
        let texturizer = harness.texturizer();
        let mut tile = Tile::new(
            Some(texturizer.clone()),
            None,
            Sector::FULL_SPHERE,
            TileKey::new(0, 0, 0),
        );
        tile.split();
        let children = tile.children_mut().unwrap();
        children[0].split();
        children[1].texture_solved = true;

        tile.set_texture_solved(true);
        let notified = texturizer.ancestor_notifications();
        // 4 children minus the solved one, plus the 4 grandchildren of child 0.
        assert_eq!(notified.len(), 7);
        assert!(notified.iter().all(|(_, ancestor, solved)| {
            *ancestor == TileKey::new(0, 0, 0) && *solved
        }));
        assert!(!notified.iter().any(|(key, _, _)| *key == TileKey::new(1, 0, 1)));

        // No change, no notification.
        tile.set_texture_solved(true);
        assert_eq!(texturizer.ancestor_notifications().len(), 7);

        // Becoming unsolved reaches every descendant.
        tile.set_texture_solved(false);
        assert_eq!(texturizer.ancestor_notifications().len(), 7 + 8);
    }

    #[test]
    fn test_find_deepest_tile_containing() {
        let mut tile = root();
        tile.split()[3].split();

        let position = Geodetic2D::from_degrees(60.0, 150.0);
        let found = tile.find_deepest_tile_containing(&position).unwrap();
        assert_eq!(found.level(), 2);
        assert!(found.is_leaf());
        assert!(found.sector().contains(&position));

        let shallow = Geodetic2D::from_degrees(-45.0, -90.0);
        assert_eq!(
            tile.find_deepest_tile_containing(&shallow).unwrap().key(),
            TileKey::new(1, 0, 0)
        );

        let mut small = Tile::new(
            None,
            None,
            Sector::from_degrees(0.0, 0.0, 1.0, 1.0),
            TileKey::new(0, 0, 0),
        );
        small.split();
        assert!(small.find_deepest_tile_containing(&position).is_none());
    }

    #[test]
    fn test_descendant_lookup() {
        let mut tile = root();
        tile.split()[2].split();
        let target = TileKey::new(1, 1, 0).children()[1];
        assert_eq!(tile.descendant(&target).unwrap().key(), target);
        assert_eq!(tile.descendant(&tile.key()).unwrap().key(), tile.key());
        assert!(tile.descendant(&TileKey::new(2, 0, 0)).is_none());
        assert!(tile.descendant(&TileKey::new(0, 0, 1)).is_none());

        tile.descendant_mut(&target).unwrap().set_texturizer_dirty(false);
        assert!(!tile.descendant(&target).unwrap().is_texturizer_dirty());
    }

    #[test]
    fn test_invalidate_tessellation_rebuilds_mesh() {
        let mut harness = Harness::new(|_| Shape::visible(10));
        let mut tile = root();
        tile.render(&mut harness.ctx(), None);
        tile.invalidate_tessellation();
        assert!(tile.tessellated_mesh().is_none());
        assert!(tile.is_texturizer_dirty());
        assert_eq!(harness.counters.dropped(MeshKind::Tessellated), 1);

        tile.render(&mut harness.ctx(), None);
        assert_eq!(harness.counters.created(MeshKind::Tessellated), 2);
    }

    #[test]
    fn test_prepare_for_full_rendering_texturizes_without_drawing() {
        let mut harness = Harness::new(|_| Shape::visible(10));
        let texturizer = harness.texturizer();
        let mut tile = Tile::new(
            Some(texturizer.clone()),
            None,
            Sector::FULL_SPHERE,
            TileKey::new(0, 0, 0),
        );
        tile.prepare_for_full_rendering(&harness.ctx());
        assert!(tile.texturized_mesh().is_some());
        assert!(tile.is_texture_solved());
        assert!(tile.has_texturizer_data());
        assert!(harness.counters.rendered_keys().is_empty());
    }
}
