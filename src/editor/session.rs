//! Voxel editor session.
//!
//! One owned value holds the loaded image, the live voxel grid, its
//! overrides, the selection and the undo/redo history. Every mutating
//! operation that changes the voxel set records a snapshot first, so any
//! edit can be undone. Operations whose preconditions are not met (no
//! image, empty selection, empty voxel set) do nothing and report it
//! through their return value.

use std::path::{Path, PathBuf};

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::color::{Palette, Rgb};
use crate::core::camera::CameraState;
use crate::core::config::EditorConfig;
use crate::core::types::{Result, Vec2};
use crate::export::{export_to_dir, ExportFormat};
use crate::render::{Frame, Renderer};
use crate::source::{ImageSource, PixelSource};
use crate::voxel::depth::DepthMode;
use crate::voxel::edit::{apply_palette, background_cells, EditHistory, Selection};
use crate::voxel::grid::{GenerateOptions, GridSnapshot, VoxelGrid};
use crate::voxel::grid_key::{is_valid_cell_size, CellKey, GridParams};
use crate::voxel::voxel::Voxel;

/// Editable voxel sculpture derived from an image.
#[derive(Debug)]
pub struct VoxelEditorSession {
    config: EditorConfig,
    /// Image as loaded, kept for revert
    original: Option<ImageSource>,
    /// Image fitted to the canvas; the one that gets sampled
    fitted: Option<ImageSource>,
    grid: VoxelGrid,
    history: EditHistory<GridSnapshot>,
    selection: Selection,
    rng: StdRng,
}

impl VoxelEditorSession {
    pub fn new(config: EditorConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let history = match config.history_limit {
            Some(limit) => EditHistory::with_limit(limit),
            None => EditHistory::new(),
        };

        Self {
            grid: VoxelGrid::new(GridParams::new(0, 0, config.cell_size)),
            selection: Selection::new(config.color_threshold),
            original: None,
            fitted: None,
            history,
            rng,
            config,
        }
    }

    // --- Accessors ---

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn voxels(&self) -> &[Voxel] {
        self.grid.voxels()
    }

    pub fn grid(&self) -> &VoxelGrid {
        &self.grid
    }

    pub fn grid_params(&self) -> &GridParams {
        self.grid.params()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn has_image(&self) -> bool {
        self.fitted.is_some()
    }

    /// The sampled (canvas-fitted) image
    pub fn image(&self) -> Option<&ImageSource> {
        self.fitted.as_ref()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    fn generate_options(&self) -> GenerateOptions {
        GenerateOptions {
            depth: self.config.depth,
            reduce_percent: self.config.reduce_percent,
            extrude: self.config.extrude,
        }
    }

    /// Rebuild the live set from the fitted image and refresh the selection.
    fn rebuild(&mut self) -> usize {
        let options = self.generate_options();
        let source = self.fitted.as_ref().map(|s| s as &dyn PixelSource);
        let count = self.grid.regenerate(source, &options, &mut self.rng);
        self.selection.refresh(self.grid.voxels());
        count
    }

    fn record(&mut self) {
        self.history.record(&self.grid.snapshot());
    }

    // --- Image and grid ---

    /// Replace the image. Fits it to the canvas, lays out a fresh grid and
    /// generates voxels. Clears overrides, selection and history.
    ///
    /// An unusable configured cell size falls back to the default.
    pub fn load_image(&mut self, image: ImageSource) -> usize {
        if !is_valid_cell_size(self.config.cell_size) {
            let fallback = EditorConfig::default().cell_size;
            log::warn!("Invalid cell size {}, using {}", self.config.cell_size, fallback);
            self.config.cell_size = fallback;
        }
        let (max_w, max_h) = self.config.fit_bounds();
        let fitted = image.fit_within(max_w, max_h);
        let params = GridParams::for_image(fitted.width(), fitted.height(), self.config.cell_size);

        self.original = Some(image);
        self.fitted = Some(fitted);
        self.grid.set_params(params);
        self.grid.clear_overrides();
        self.selection.clear();
        self.history.clear();

        let count = self.rebuild();
        log::info!(
            "Image loaded: {}x{} cells of {}px, {} voxels",
            params.cols,
            params.rows,
            params.cell_size,
            count
        );
        count
    }

    /// Decode an image file and load it
    pub fn open_image(&mut self, path: impl AsRef<Path>) -> Result<usize> {
        let image = ImageSource::open(path)?;
        Ok(self.load_image(image))
    }

    /// Change the cell size. With an image loaded the grid is re-laid out
    /// (undoable) and regenerated; overrides are kept.
    pub fn resize_grid(&mut self, cell_size: f32) -> bool {
        if !is_valid_cell_size(cell_size) {
            log::debug!("Ignoring invalid cell size {}", cell_size);
            return false;
        }
        self.config.cell_size = cell_size;

        let Some(fitted) = &self.fitted else {
            return false;
        };
        let params = GridParams::for_image(fitted.width(), fitted.height(), cell_size);

        self.record();
        self.grid.set_params(params);
        self.rebuild();
        true
    }

    /// Reload the original image, discarding every edit
    pub fn revert_to_original(&mut self) -> bool {
        match self.original.take() {
            Some(original) => {
                self.load_image(original);
                true
            }
            None => false,
        }
    }

    /// Regenerate from the image with the current settings (undoable)
    pub fn regenerate(&mut self) -> usize {
        if !self.has_image() {
            log::debug!("Regenerate skipped: no image loaded");
            return 0;
        }
        self.record();
        self.rebuild()
    }

    /// After a generation setting changed: regenerate if there is an image.
    fn settings_changed(&mut self) -> bool {
        if !self.has_image() {
            return false;
        }
        self.record();
        self.rebuild();
        true
    }

    // --- Generation settings ---

    pub fn set_depth_mode(&mut self, mode: DepthMode) -> bool {
        self.config.depth.mode = mode;
        self.settings_changed()
    }

    pub fn set_depth_scale(&mut self, scale: f32) -> bool {
        self.config.depth.scale = scale;
        self.settings_changed()
    }

    pub fn set_invert_depth(&mut self, invert: bool) -> bool {
        self.config.depth.invert = invert;
        self.settings_changed()
    }

    pub fn toggle_invert_depth(&mut self) -> bool {
        self.set_invert_depth(!self.config.depth.invert)
    }

    /// Percentage (clamped to 0-100) of cells randomly dropped
    pub fn set_reduce_percent(&mut self, percent: f32) -> bool {
        self.config.reduce_percent = percent.clamp(0.0, 100.0);
        self.settings_changed()
    }

    pub fn set_extrude(&mut self, extrude: bool) -> bool {
        self.config.extrude = extrude;
        self.settings_changed()
    }

    // --- Selection ---

    /// Select by the color of the voxel under a world position. A miss
    /// clears the selection.
    pub fn select_at(&mut self, world: Vec2) -> bool {
        let hit = self
            .grid
            .params()
            .cell_of(world)
            .and_then(|cell| self.grid.voxel_at(cell))
            .map(|v| v.color);

        match hit {
            Some(color) => {
                self.selection.set_reference(color, self.grid.voxels());
                true
            }
            None => {
                self.selection.clear();
                false
            }
        }
    }

    /// Select every voxel near `color`
    pub fn select_color(&mut self, color: Rgb) -> usize {
        self.selection.set_reference(color, self.grid.voxels());
        self.selection.len()
    }

    pub fn set_color_threshold(&mut self, threshold: f32) {
        self.config.color_threshold = threshold;
        self.selection.set_threshold(threshold, self.grid.voxels());
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    // --- Edits ---

    /// Delete the selected cells. Returns the number of voxels removed.
    pub fn delete_selected(&mut self) -> usize {
        if self.selection.is_empty() {
            log::debug!("Delete skipped: nothing selected");
            return 0;
        }
        self.record();

        let cells = self.selection.cells();
        let removed = self.grid.remove_cells(&cells);
        self.selection.clear();
        log::info!("Deleted {} voxels", removed);
        removed
    }

    /// Recolor the selection (or everything, with no selection) from
    /// `palette` by brightness. Returns the number of cells recolored.
    pub fn apply_palette(&mut self, palette: &Palette) -> usize {
        if self.grid.is_empty() || palette.is_empty() {
            log::debug!("Palette skipped: no voxels or empty palette");
            return 0;
        }
        self.record();

        let source = if self.selection.is_empty() {
            self.grid.voxels()
        } else {
            self.selection.members()
        };
        let targets: Vec<CellKey> = source.iter().map(|v| v.cell).collect();

        let count = apply_palette(&mut self.grid, &targets, palette);
        self.selection.refresh(self.grid.voxels());
        log::info!("Applied {}-color palette to {} cells", palette.len(), count);
        count
    }

    /// Recompute depths from current colors with the current depth settings
    pub fn recalculate_depths(&mut self) -> bool {
        if self.grid.is_empty() {
            log::debug!("Depth recalculation skipped: no voxels");
            return false;
        }
        self.record();
        self.grid.recompute_depths(&self.config.depth, self.config.extrude);
        self.selection.refresh(self.grid.voxels());
        true
    }

    /// Delete every voxel within `threshold` of the most frequent color.
    /// Returns the number of voxels removed.
    pub fn remove_background(&mut self, threshold: f32) -> usize {
        let Some(background) = background_cells(self.grid.voxels(), threshold) else {
            log::debug!("Background removal skipped: no voxels");
            return 0;
        };
        self.record();

        let removed = self.grid.remove_cells(&background.cells);
        self.selection.refresh(self.grid.voxels());
        log::info!(
            "Removed background {} ({} occurrences): {} voxels",
            background.color,
            background.frequency,
            removed
        );
        removed
    }

    // --- History ---

    pub fn undo(&mut self) -> bool {
        let current = self.grid.snapshot();
        match self.history.undo(&current) {
            Some(previous) => {
                self.restore(previous);
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        let current = self.grid.snapshot();
        match self.history.redo(&current) {
            Some(next) => {
                self.restore(next);
                true
            }
            None => false,
        }
    }

    fn restore(&mut self, snapshot: GridSnapshot) {
        self.config.cell_size = snapshot.params.cell_size;
        self.grid.restore(snapshot);
        self.selection.clear();
    }

    // --- Output ---

    /// Hand the current frame to a renderer
    pub fn render(&self, renderer: &mut dyn Renderer, camera: &CameraState) {
        let frame = Frame {
            voxels: self.grid.voxels(),
            selection: self.selection.members(),
            camera: camera.transform(),
            cube_size: self.grid.params().cell_size,
        };
        renderer.draw(&frame);
    }

    /// Write the voxel set into `dir` as `{stem}.<ext>`
    pub fn export(&self, format: ExportFormat, dir: &Path, stem: &str) -> Result<Vec<PathBuf>> {
        export_to_dir(dir, stem, format, self.grid.voxels(), self.grid.params().cell_size)
    }
}

impl Default for VoxelEditorSession {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::Error;
    use image::RgbImage;
    use std::collections::HashSet;
    use tempfile::TempDir;

    /// 40x30 image: 4x3 cells of 10px, each a distinct gray
    fn checker_image() -> ImageSource {
        ImageSource::new(RgbImage::from_fn(40, 30, |x, y| {
            let v = ((x / 10) * 20 + (y / 10) * 80) as u8;
            image::Rgb([v, v, v])
        }))
    }

    fn config() -> EditorConfig {
        EditorConfig {
            cell_size: 10.0,
            color_threshold: 0.0,
            seed: Some(42),
            ..Default::default()
        }
    }

    fn session() -> VoxelEditorSession {
        let mut session = VoxelEditorSession::new(config());
        session.load_image(checker_image());
        session
    }

    fn cells(session: &VoxelEditorSession) -> HashSet<CellKey> {
        session.voxels().iter().map(|v| v.cell).collect()
    }

    fn gray(v: u8) -> Rgb {
        Rgb::new(v, v, v)
    }

    #[derive(Default)]
    struct Recorder {
        frames: Vec<(usize, usize, f32)>,
    }

    impl Renderer for Recorder {
        fn draw(&mut self, frame: &Frame<'_>) {
            self.frames.push((frame.voxels.len(), frame.selection.len(), frame.cube_size));
        }
    }

    #[test]
    fn test_load_image() {
        let session = session();
        assert!(session.has_image());
        assert_eq!(session.voxels().len(), 12);
        assert_eq!(*session.grid_params(), GridParams::new(4, 3, 10.0));
        assert!(session.grid().has_unique_cells());
        assert!(!session.can_undo());
    }

    #[test]
    fn test_no_image_is_noop() {
        let mut session = VoxelEditorSession::new(config());
        assert_eq!(session.regenerate(), 0);
        assert!(!session.set_depth_scale(10.0));
        assert!(!session.resize_grid(5.0));
        assert!(!session.recalculate_depths());
        assert_eq!(session.remove_background(30.0), 0);
        assert_eq!(session.apply_palette(&Palette::preset("neon").unwrap()), 0);
        assert_eq!(session.delete_selected(), 0);
        assert!(!session.undo());
        assert!(!session.revert_to_original());
        assert!(!session.can_undo());
        // The setting itself is still stored
        assert_eq!(session.config().depth.scale, 10.0);
    }

    #[test]
    fn test_select_at() {
        let mut session = session();
        let world = session.grid_params().world_of(CellKey::new(2, 1));

        assert!(session.select_at(world));
        assert_eq!(session.selection().reference(), Some(gray(120)));
        assert_eq!(session.selection().len(), 1);

        assert!(!session.select_at(Vec2::new(1000.0, 1000.0)));
        assert!(session.selection().is_empty());
    }

    #[test]
    fn test_threshold_widens_selection() {
        let mut session = session();
        session.select_color(gray(100));
        assert_eq!(session.selection().len(), 1);

        // Neighbours at 80 and 120 are sqrt(3) * 20 away
        session.set_color_threshold(35.0);
        assert_eq!(session.selection().len(), 3);
        assert_eq!(session.config().color_threshold, 35.0);
    }

    #[test]
    fn test_delete_selected_excludes_cells() {
        let mut session = session();
        session.select_color(gray(0));
        assert_eq!(session.delete_selected(), 1);
        assert!(session.selection().is_empty());
        assert!(session.selection().reference().is_none());

        // Stays deleted through regeneration and setting changes
        session.regenerate();
        session.set_depth_scale(20.0);
        session.set_depth_mode(DepthMode::Red);
        assert_eq!(session.voxels().len(), 11);
        assert!(!cells(&session).contains(&CellKey::new(0, 0)));
    }

    #[test]
    fn test_undo_redo_roundtrip() {
        let mut session = session();
        let initial = session.grid().snapshot();

        session.select_color(gray(220));
        session.delete_selected();
        session.apply_palette(&Palette::preset("ocean").unwrap());
        let edited = session.grid().snapshot();

        assert!(session.undo());
        assert!(session.undo());
        assert_eq!(session.grid().snapshot(), initial);
        assert!(!session.undo());

        assert!(session.redo());
        assert!(session.redo());
        assert_eq!(session.grid().snapshot(), edited);
        assert!(!session.redo());
    }

    #[test]
    fn test_new_edit_invalidates_redo() {
        let mut session = session();
        session.remove_background(0.0);
        session.undo();
        assert!(session.can_redo());

        session.recalculate_depths();
        assert!(!session.can_redo());
        assert!(!session.redo());
    }

    #[test]
    fn test_undo_clears_selection_and_rebuilds_overrides() {
        let mut session = session();
        session.select_color(gray(20));
        session.delete_selected();
        assert!(session.grid().overrides().is_deleted(CellKey::new(1, 0)));

        session.select_color(gray(40));
        session.undo();
        assert!(session.selection().is_empty());

        // The restored cell is active again and survives regeneration
        assert!(!session.grid().overrides().is_deleted(CellKey::new(1, 0)));
        session.regenerate();
        assert_eq!(session.voxels().len(), 12);
    }

    #[test]
    fn test_palette_on_selection_only() {
        let mut session = session();
        session.select_color(gray(160));
        let palette = Palette::from_hex(&["#ff0000"]).unwrap();

        assert_eq!(session.apply_palette(&palette), 1);
        let recolored: Vec<_> = session
            .voxels()
            .iter()
            .filter(|v| v.color == Rgb::new(255, 0, 0))
            .map(|v| v.cell)
            .collect();
        assert_eq!(recolored, vec![CellKey::new(0, 2)]);

        // Reference color no longer matches anything
        assert!(session.selection().is_empty());
    }

    #[test]
    fn test_palette_overrides_survive_regeneration() {
        let mut session = session();
        let palette = Palette::preset("earth").unwrap();
        assert_eq!(session.apply_palette(&palette), 12);

        let before: Vec<_> = session.voxels().iter().map(|v| v.color).collect();
        session.set_invert_depth(true);
        let after: Vec<_> = session.voxels().iter().map(|v| v.color).collect();
        assert_eq!(before, after);

        // Darkest cell got the first palette color, brightest the last
        assert_eq!(session.grid().voxel_at(CellKey::new(0, 0)).unwrap().color, palette.colors()[0]);
        assert_eq!(session.grid().voxel_at(CellKey::new(3, 2)).unwrap().color, palette.colors()[4]);
    }

    #[test]
    fn test_recalculate_depths() {
        let mut session = session();
        session.apply_palette(&Palette::from_hex(&["#ffffff"]).unwrap());
        assert!(session.recalculate_depths());

        // Every voxel is white now: pulled fully forward
        assert!(session.voxels().iter().all(|v| v.z == -50.0));
        // Recoloring alone leaves depth untouched
        session.undo();
        let black_cell = *session.grid().voxel_at(CellKey::new(0, 0)).unwrap();
        assert_eq!((black_cell.color, black_cell.z), (Rgb::WHITE, 50.0));
        session.undo();
        assert_eq!(session.grid().voxel_at(CellKey::new(0, 0)).unwrap().color, gray(0));
    }

    #[test]
    fn test_remove_background_majority() {
        let image = RgbImage::from_fn(10, 1, |x, _| {
            if x < 7 { image::Rgb([10, 10, 10]) } else { image::Rgb([200, 200, 200]) }
        });
        let mut session = VoxelEditorSession::new(EditorConfig {
            cell_size: 1.0,
            seed: Some(1),
            ..Default::default()
        });
        session.load_image(ImageSource::new(image));
        assert_eq!(session.voxels().len(), 10);

        assert_eq!(session.remove_background(5.0), 7);
        assert_eq!(session.voxels().len(), 3);
        assert!(session.voxels().iter().all(|v| v.color == gray(200)));
        assert_eq!(session.grid().overrides().deleted_count(), 7);
    }

    #[test]
    fn test_resize_grid_is_undoable() {
        let mut session = session();
        assert!(session.resize_grid(20.0));
        assert_eq!(*session.grid_params(), GridParams::new(2, 1, 20.0));
        assert_eq!(session.voxels().len(), 2);

        session.undo();
        assert_eq!(*session.grid_params(), GridParams::new(4, 3, 10.0));
        assert_eq!(session.config().cell_size, 10.0);
        assert_eq!(session.voxels().len(), 12);
        assert!(!session.resize_grid(0.0));
    }

    #[test]
    fn test_zero_cell_size_falls_back() {
        let mut session = VoxelEditorSession::new(EditorConfig {
            cell_size: 0.0,
            seed: Some(5),
            ..Default::default()
        });
        let count = session.load_image(ImageSource::new(RgbImage::new(8, 8)));

        let default_size = EditorConfig::default().cell_size;
        assert_eq!(session.config().cell_size, default_size);
        assert_eq!(*session.grid_params(), GridParams::new(1, 1, default_size));
        assert_eq!(count, 1);

        assert!(!session.resize_grid(f32::NAN));
        assert!(!session.resize_grid(0.5));
        assert_eq!(session.config().cell_size, default_size);
    }

    #[test]
    fn test_revert_to_original() {
        let mut session = session();
        session.remove_background(1000.0);
        assert!(session.voxels().is_empty());

        assert!(session.revert_to_original());
        assert_eq!(session.voxels().len(), 12);
        assert!(!session.can_undo());
        assert!(session.grid().overrides().is_empty());
    }

    #[test]
    fn test_reduce_and_extrude() {
        let mut session = session();
        assert!(session.set_reduce_percent(100.0));
        assert!(session.voxels().is_empty());
        session.set_reduce_percent(-5.0);
        assert_eq!(session.config().reduce_percent, 0.0);
        assert_eq!(session.voxels().len(), 12);

        session.set_depth_scale(20.0);
        session.set_extrude(true);
        assert!(!session.grid().has_unique_cells());
        // Extruded columns are still deleted as a unit
        session.select_color(gray(0));
        assert_eq!(session.delete_selected(), 3);
        assert!(!cells(&session).contains(&CellKey::new(0, 0)));
    }

    #[test]
    fn test_seeded_regeneration_is_deterministic() {
        let build = || {
            let mut session = VoxelEditorSession::new(EditorConfig {
                reduce_percent: 50.0,
                ..config()
            });
            session.load_image(checker_image());
            session.voxels().to_vec()
        };
        assert_eq!(build(), build());
    }

    #[test]
    fn test_history_limit() {
        let mut session = VoxelEditorSession::new(EditorConfig {
            history_limit: Some(2),
            ..config()
        });
        session.load_image(checker_image());
        for scale in [10.0, 20.0, 30.0] {
            session.set_depth_scale(scale);
        }
        assert!(session.undo());
        assert!(session.undo());
        assert!(!session.undo());
    }

    #[test]
    fn test_render_frame() {
        let mut session = session();
        session.select_color(gray(0));
        let mut recorder = Recorder::default();
        session.render(&mut recorder, &CameraState::new());
        assert_eq!(recorder.frames, vec![(12, 1, 10.0)]);
    }

    #[test]
    fn test_export() {
        let dir = TempDir::new().unwrap();
        let session = session();
        let paths = session.export(ExportFormat::Ply, dir.path(), "sculpture").unwrap();
        assert_eq!(paths, vec![dir.path().join("sculpture.ply")]);

        let empty = VoxelEditorSession::new(config());
        assert!(matches!(
            empty.export(ExportFormat::Obj, dir.path(), "none"),
            Err(Error::EmptyExport)
        ));
    }

    #[test]
    fn test_snapshots_do_not_alias() {
        let mut session = session();
        let snapshot = session.grid().snapshot();
        session.apply_palette(&Palette::from_hex(&["#123456"]).unwrap());
        assert_ne!(session.grid().snapshot(), snapshot);
        assert_eq!(snapshot.voxels[0].color, gray(0));
    }
}
