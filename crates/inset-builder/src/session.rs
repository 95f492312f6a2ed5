//! Editing session for one screenshot.
//!
//! The session owns the hotspot list and everything derived from it: the
//! per-hotspot previews, the hit regions they occupy and the property form
//! of the selected hotspot. Hosts feed it pointer and form events and poll
//! [`BuilderSession::tick`] to flush debounced edits.

use std::collections::HashMap;
use std::time::Instant;

use inset_markdown::MarkdownCache;
use inset_overlay::render::{render_hotspot, HotspotGeometry};
use inset_overlay::schema::{BaseImage, Description, Line};
use inset_overlay::{
    defaults, ColorSpec, ConfigDocument, Hotspot, OverlayConfig, Point, Rect, Scale, Segment, Size,
    Theme, ValidationError,
};
use serde_json::{Map, Value};

use crate::debounce::{Debouncer, InputCategory};
use crate::error::SessionError;
use crate::form::{self, Field, FormInput};
use crate::hit_test::{tooltip_rect, Hit, HitPart, HitTestRegistry, NOMINAL_TOOLTIP};

/// Smallest drag, in display pixels, that creates a hotspot.
pub const MIN_DRAG: f64 = 10.0;

const DEFAULT_SCRIPT_NAME: &str = "Untitled Script";
const DEFAULT_VERSION: &str = "1.0.0";
const DEFAULT_DESCRIPTION: &str = "Script description";
const DEFAULT_IMAGE_SRC: &str = "screenshot.png";
const DEFAULT_IMAGE_SIZE: Size = Size::new(800.0, 600.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Select,
    Create,
}

/// The screenshot being annotated.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageState {
    pub src: String,
    pub natural: Size,
    pub display: Size,
}

/// A rendered hotspot in the editor.
///
/// The editor always shows the complex tier with its tooltip.
#[derive(Debug, Clone, PartialEq)]
pub struct Preview {
    pub geometry: HotspotGeometry,
    pub description_html: Option<String>,
    pub selected: bool,
}

/// Render pass counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderStats {
    pub full: usize,
    pub single: usize,
}

#[derive(Debug, Clone, Copy)]
struct Drag {
    start: Point,
    current: Point,
}

/// Document fields the editor carries through untouched.
#[derive(Debug, Clone, Default)]
struct DocumentMeta {
    script_name: Option<String>,
    version: Option<String>,
    description: Option<String>,
    base_image: Option<BaseImage>,
    extras: Map<String, Value>,
}

pub struct BuilderSession {
    mode: Mode,
    image: Option<ImageState>,
    scale: Option<Scale>,
    hotspots: Vec<Hotspot>,
    selected: Option<String>,
    color: ColorSpec,
    drag: Option<Drag>,
    form: FormInput,
    turning_enabled: bool,
    /// A distance field was edited since selection
    path_edited: bool,
    timers: Debouncer<InputCategory>,
    previews: HashMap<String, Preview>,
    hits: HitTestRegistry,
    markdown: MarkdownCache,
    tooltip_sizes: HashMap<String, Size>,
    theme: Theme,
    stats: RenderStats,
    meta: DocumentMeta,
}

impl BuilderSession {
    pub fn new(theme: Theme) -> Self {
        Self {
            mode: Mode::default(),
            image: None,
            scale: None,
            hotspots: Vec::new(),
            selected: None,
            color: ColorSpec::default(),
            drag: None,
            form: FormInput::default(),
            turning_enabled: false,
            path_edited: false,
            timers: Debouncer::new(),
            previews: HashMap::new(),
            hits: HitTestRegistry::new(),
            markdown: MarkdownCache::new(inset_markdown::cache::DEFAULT_CAPACITY),
            tooltip_sizes: HashMap::new(),
            theme,
            stats: RenderStats::default(),
            meta: DocumentMeta::default(),
        }
    }

    // ----- loading -----

    /// Load the screenshot to annotate. Discards pending edits and redraws
    /// every hotspot at the new scale.
    pub fn load_image(
        &mut self,
        src: impl Into<String>,
        natural: Size,
        display: Size,
    ) -> Result<(), SessionError> {
        let scale = Scale::new(display, natural)?;
        let src = src.into();
        let (shown_width, shown_height) = (display.width, display.height);
        tracing::debug!(
            "Loaded image {} ({}x{} shown at {}x{})",
            src,
            natural.width,
            natural.height,
            shown_width,
            shown_height
        );
        self.image = Some(ImageState {
            src,
            natural,
            display,
        });
        self.scale = Some(scale);
        self.timers.clear();
        self.drag = None;
        self.render_all();
        Ok(())
    }

    /// The image was laid out at a new size.
    pub fn resize(&mut self, display: Size) -> Result<(), SessionError> {
        let image = self.image.as_mut().ok_or(SessionError::NoImage)?;
        let scale = Scale::new(display, image.natural)?;
        image.display = display;
        self.scale = Some(scale);
        self.render_all();
        Ok(())
    }

    /// Replace every hotspot with those of `doc`.
    pub fn load_document(&mut self, doc: ConfigDocument) -> Vec<ValidationError> {
        let validated = OverlayConfig::from_document(doc);
        let config = validated.config;

        self.meta = DocumentMeta {
            script_name: Some(config.script_name).filter(|s| !s.is_empty()),
            version: config.version,
            description: config.description,
            base_image: Some(config.base_image),
            extras: config.extras,
        };
        self.hotspots = config.hotspots;
        self.selected = None;
        self.form = FormInput::default();
        self.turning_enabled = false;
        self.path_edited = false;
        self.timers.clear();
        self.tooltip_sizes.clear();
        tracing::info!("Loaded {} hotspots", self.hotspots.len());

        self.render_all();
        validated.warnings
    }

    // ----- modes and pointer -----

    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
        self.drag = None;
    }

    /// Pick the color for new hotspots. Also recolors the selection.
    pub fn set_color(&mut self, color: ColorSpec) {
        self.color = color.clone();
        if let Some(id) = self.selected.clone() {
            if let Some(hotspot) = self.hotspot_mut(&id) {
                hotspot.color = Some(color);
                self.render_single(&id, &id);
            }
        }
    }

    /// Start a drag. Ignored outside create mode or outside the image.
    pub fn pointer_down(&mut self, point: Point) -> bool {
        if self.mode != Mode::Create {
            return false;
        }
        let Some(image) = &self.image else {
            return false;
        };
        let bounds = Rect::new(0.0, 0.0, image.display.width, image.display.height);
        if !bounds.contains(point) {
            return false;
        }
        self.drag = Some(Drag {
            start: point,
            current: point,
        });
        true
    }

    /// Track the drag. Returns the rectangle being drawn.
    pub fn pointer_move(&mut self, point: Point) -> Option<Rect> {
        let drag = self.drag.as_mut()?;
        drag.current = point;
        Some(Rect::from_corners(drag.start, drag.current))
    }

    /// Finish a drag, creating a hotspot if it was large enough.
    pub fn pointer_up(&mut self, point: Point) -> Result<Option<String>, SessionError> {
        let Some(drag) = self.drag.take() else {
            return Ok(None);
        };
        let rect = Rect::from_corners(drag.start, point);
        if rect.width > MIN_DRAG && rect.height > MIN_DRAG {
            self.create_hotspot(rect).map(Some)
        } else {
            tracing::debug!("Ignoring {}x{} drag", rect.width, rect.height);
            Ok(None)
        }
    }

    /// Rectangle of the drag in progress, in display pixels.
    pub fn drag_rect(&self) -> Option<Rect> {
        self.drag.map(|d| Rect::from_corners(d.start, d.current))
    }

    /// Add a hotspot covering `display_rect` and select it.
    pub fn create_hotspot(&mut self, display_rect: Rect) -> Result<String, SessionError> {
        let scale = self.scale.ok_or(SessionError::NoImage)?;
        let mut coordinates = scale.to_reference(&display_rect);
        coordinates.width = coordinates.width.max(1.0);
        coordinates.height = coordinates.height.max(1.0);

        let id = self.next_id();
        self.hotspots.push(Hotspot {
            id: id.clone(),
            coordinates,
            color: Some(self.color.clone()),
            line: Some(Line::new(vec![Segment::horizontal(defaults::NEW_HORIZONTAL_DISTANCE)])),
            description: Some(Description::new(defaults::PLACEHOLDER_DESCRIPTION)),
        });
        tracing::info!(
            "Created {} at {},{} {}x{}",
            id,
            coordinates.x,
            coordinates.y,
            coordinates.width,
            coordinates.height
        );

        self.render_single(&id, &id);
        self.select(&id)?;
        Ok(id)
    }

    fn next_id(&self) -> String {
        let mut n = self.hotspots.len() + 1;
        loop {
            let candidate = format!("hotspot-{}", n);
            if self.hotspot(&candidate).is_none() {
                return candidate;
            }
            n += 1;
        }
    }

    /// Resolve a click through the hit regions. Selects in select mode.
    pub fn click(&mut self, point: Point) -> Option<Hit> {
        if self.mode != Mode::Select {
            return None;
        }
        let hit = self.hits.hit(point)?;
        if let Err(e) = self.select(&hit.id) {
            tracing::warn!("{}", e);
            return None;
        }
        Some(hit)
    }

    // ----- selection and form -----

    pub fn select(&mut self, id: &str) -> Result<(), SessionError> {
        let hotspot = self
            .hotspot(id)
            .ok_or_else(|| SessionError::UnknownHotspot(id.to_string()))?;
        let form = FormInput::from_hotspot(hotspot);
        self.form = form;
        self.turning_enabled = form::turning_enabled(
            form::parse_int(&self.form.vertical).unwrap_or(0) as f64,
        );
        self.path_edited = false;
        self.timers.clear();

        let previous = self.selected.replace(id.to_string());
        if let Some(prev) = previous.filter(|p| p != id) {
            self.set_preview_selected(&prev, false);
        }
        self.set_preview_selected(id, true);
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        if let Some(prev) = self.selected.take() {
            self.set_preview_selected(&prev, false);
        }
        self.form = FormInput::default();
        self.turning_enabled = false;
        self.path_edited = false;
        self.timers.clear();
    }

    fn set_preview_selected(&mut self, id: &str, selected: bool) {
        if let Some(preview) = self.previews.get_mut(id) {
            preview.selected = selected;
        }
    }

    /// A keystroke in a form field. Applied after the field's debounce
    /// delay; descriptions wait for [`Self::blur_description`].
    pub fn input(&mut self, field: Field, value: &str, now: Instant) -> Result<(), SessionError> {
        if self.selected.is_none() {
            return Err(SessionError::NoSelection);
        }
        self.form.set(field, value);
        self.path_edited |= field.is_distance();
        if field.is_geometry() {
            self.timers
                .schedule(InputCategory::Geometry, now, InputCategory::Geometry.delay());
        }
        if field == Field::Vertical {
            self.timers.schedule(
                InputCategory::TurningPoint,
                now,
                InputCategory::TurningPoint.delay(),
            );
        }
        Ok(())
    }

    /// A committed field change, applied immediately.
    pub fn change(&mut self, field: Field, value: &str) -> Result<Vec<ValidationError>, SessionError> {
        if self.selected.is_none() {
            return Err(SessionError::NoSelection);
        }
        self.form.set(field, value);
        self.path_edited |= field.is_distance();
        if field == Field::Vertical {
            self.timers.cancel(InputCategory::TurningPoint);
            self.update_turning_state();
        }
        self.timers.cancel(InputCategory::Geometry);
        self.apply_form()
    }

    pub fn blur_description(&mut self, value: &str) -> Result<Vec<ValidationError>, SessionError> {
        self.change(Field::Description, value)
    }

    /// Flush every debounce slot whose delay has elapsed.
    pub fn tick(&mut self, now: Instant) -> Result<Vec<ValidationError>, SessionError> {
        let mut warnings = Vec::new();
        for category in self.timers.due(now) {
            match category {
                InputCategory::TurningPoint => self.update_turning_state(),
                InputCategory::Geometry => warnings.extend(self.apply_form()?),
            }
        }
        Ok(warnings)
    }

    /// When the host should call [`Self::tick`] next.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.next_deadline()
    }

    /// Enable the turning point field for an elbow, zero it otherwise.
    pub fn update_turning_state(&mut self) {
        let vertical = form::parse_int(&self.form.vertical).unwrap_or(0) as f64;
        self.turning_enabled = form::turning_enabled(vertical);
        if !self.turning_enabled {
            self.form.turning = "0".to_string();
        }
    }

    /// Write the form back to the selected hotspot and redraw it.
    pub fn apply_form(&mut self) -> Result<Vec<ValidationError>, SessionError> {
        let current = self.selected.clone().ok_or(SessionError::NoSelection)?;
        let index = self
            .hotspots
            .iter()
            .position(|h| h.id == current)
            .ok_or_else(|| SessionError::UnknownHotspot(current.clone()))?;

        let (values, mut warnings) = self.form.parse();

        let id = if values.id.is_empty() {
            warnings.push(ValidationError::EmptyId { index });
            current.clone()
        } else if values.id != current && self.hotspot(&values.id).is_some() {
            warnings.push(ValidationError::DuplicateId { id: values.id.clone() });
            current.clone()
        } else {
            values.id.clone()
        };

        let hotspot = &mut self.hotspots[index];
        hotspot.id = id.clone();
        hotspot.coordinates = values.coordinates;
        // A hotspot without a connector keeps none until a distance is edited.
        if hotspot.line.is_some() || self.path_edited {
            let mut line = Line::from_distances(&values.distances);
            if let Some(old) = &hotspot.line {
                line.color = old.color.clone();
                line.thickness = old.thickness;
            }
            hotspot.line = Some(line);
        }
        hotspot.description = Some(values.description.as_str())
            .filter(|d| !d.trim().is_empty())
            .map(Description::new);

        for warning in &warnings {
            tracing::warn!("{}", warning);
        }

        self.form.id = id.clone();
        if self.turning_enabled {
            self.form.turning = form::number(values.distances.turning_point);
        }
        if id != current {
            tracing::debug!("Renamed {} to {}", current, id);
            if let Some(size) = self.tooltip_sizes.remove(&current) {
                self.tooltip_sizes.insert(id.clone(), size);
            }
            self.selected = Some(id.clone());
        }
        self.render_single(&current, &id);
        Ok(warnings)
    }

    // ----- deletion -----

    pub fn delete(&mut self, id: &str) -> Result<(), SessionError> {
        let index = self
            .hotspots
            .iter()
            .position(|h| h.id == id)
            .ok_or_else(|| SessionError::UnknownHotspot(id.to_string()))?;
        self.hotspots.remove(index);
        self.tooltip_sizes.remove(id);
        if self.selected.as_deref() == Some(id) {
            self.clear_selection();
        }
        tracing::info!("Deleted {}", id);
        self.render_all();
        Ok(())
    }

    pub fn delete_selected(&mut self) -> Result<String, SessionError> {
        let id = self.selected.clone().ok_or(SessionError::NoSelection)?;
        self.delete(&id)?;
        Ok(id)
    }

    // ----- theme and rendering -----

    /// Re-resolve every preview color. Positions are not recomputed.
    pub fn set_theme(&mut self, theme: Theme) {
        if theme == self.theme {
            return;
        }
        self.theme = theme;
        for preview in self.previews.values_mut() {
            preview.geometry.apply_theme(theme);
        }
    }

    /// Report the measured size of a hotspot's tooltip.
    pub fn set_tooltip_size(&mut self, id: &str, size: Size) {
        self.tooltip_sizes.insert(id.to_string(), size);
        if self.previews.contains_key(id) {
            self.render_single(id, id);
        }
    }

    /// Drop every cached description rendering.
    pub fn clear_cache(&mut self) {
        self.markdown.clear();
    }

    fn render_all(&mut self) {
        self.previews.clear();
        self.hits.clear();
        let Some(scale) = self.scale else {
            return;
        };
        for index in 0..self.hotspots.len() {
            self.render_preview(index, &scale);
        }
        self.stats.full += 1;
        tracing::debug!("Rendered {} previews", self.previews.len());
    }

    /// Redraw one hotspot, previously known as `old_id`.
    fn render_single(&mut self, old_id: &str, id: &str) {
        self.previews.remove(old_id);
        self.hits.remove(old_id);
        let Some(scale) = self.scale else {
            return;
        };
        if let Some(index) = self.hotspots.iter().position(|h| h.id == id) {
            self.render_preview(index, &scale);
            self.stats.single += 1;
        }
    }

    fn render_preview(&mut self, index: usize, scale: &Scale) {
        let hotspot = &self.hotspots[index];
        let geometry = render_hotspot(hotspot, scale, self.theme);
        let id = geometry.id.clone();

        self.hits.register(&id, HitPart::Hotspot, geometry.bounds);
        if let Some(line) = &geometry.complex.line {
            for segment in &line.segments {
                self.hits.register(&id, HitPart::Line, segment.rect);
            }
        }
        if let Some(placement) = &geometry.complex.tooltip {
            let size = self
                .tooltip_sizes
                .get(&id)
                .copied()
                .unwrap_or(NOMINAL_TOOLTIP);
            self.hits
                .register(&id, HitPart::Tooltip, tooltip_rect(placement, size));
        }

        let description_html = geometry
            .description
            .as_deref()
            .map(|source| self.markdown.render(source));
        let selected = self.selected.as_deref() == Some(id.as_str());
        self.previews.insert(
            id,
            Preview {
                geometry,
                description_html,
                selected,
            },
        );
    }

    // ----- export -----

    /// The `"overlays": [...]` fragment for pasting into a document.
    pub fn export_overlays(&self) -> Result<String, SessionError> {
        let list = serde_json::to_string_pretty(&self.hotspots)?;
        Ok(format!("\"overlays\": {}", list))
    }

    /// A whole document, filling unknown metadata with defaults.
    pub fn to_document(&self) -> ConfigDocument {
        let base_image = match (&self.image, &self.meta.base_image) {
            (Some(image), _) => BaseImage {
                src: image.src.clone(),
                width: image.natural.width,
                height: image.natural.height,
            },
            (None, Some(base)) => base.clone(),
            (None, None) => BaseImage {
                src: DEFAULT_IMAGE_SRC.to_string(),
                width: DEFAULT_IMAGE_SIZE.width,
                height: DEFAULT_IMAGE_SIZE.height,
            },
        };

        OverlayConfig {
            script_name: self
                .meta
                .script_name
                .clone()
                .unwrap_or_else(|| DEFAULT_SCRIPT_NAME.to_string()),
            version: Some(
                self.meta
                    .version
                    .clone()
                    .unwrap_or_else(|| DEFAULT_VERSION.to_string()),
            ),
            description: Some(
                self.meta
                    .description
                    .clone()
                    .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
            ),
            base_image,
            hotspots: self.hotspots.clone(),
            extras: self.meta.extras.clone(),
        }
        .to_document()
    }

    pub fn export_document(&self) -> Result<String, SessionError> {
        Ok(self.to_document().to_json_pretty()?)
    }

    // ----- accessors -----

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn image(&self) -> Option<&ImageState> {
        self.image.as_ref()
    }

    pub fn hotspots(&self) -> &[Hotspot] {
        &self.hotspots
    }

    pub fn hotspot(&self, id: &str) -> Option<&Hotspot> {
        self.hotspots.iter().find(|h| h.id == id)
    }

    fn hotspot_mut(&mut self, id: &str) -> Option<&mut Hotspot> {
        self.hotspots.iter_mut().find(|h| h.id == id)
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn color(&self) -> &ColorSpec {
        &self.color
    }

    pub fn form(&self) -> &FormInput {
        &self.form
    }

    pub fn turning_enabled(&self) -> bool {
        self.turning_enabled
    }

    /// Previews in hotspot order.
    pub fn previews(&self) -> Vec<&Preview> {
        self.hotspots
            .iter()
            .filter_map(|h| self.previews.get(&h.id))
            .collect()
    }

    pub fn preview(&self, id: &str) -> Option<&Preview> {
        self.previews.get(id)
    }

    pub fn hits(&self) -> &HitTestRegistry {
        &self.hits
    }

    pub fn stats(&self) -> RenderStats {
        self.stats
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }
}

impl Default for BuilderSession {
    fn default() -> Self {
        Self::new(Theme::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    const MS: Duration = Duration::from_millis(1);

    /// 328x612 screenshot shown at twice its size.
    fn session() -> BuilderSession {
        let mut s = BuilderSession::new(Theme::Light);
        s.load_image("shot.png", Size::new(328.0, 612.0), Size::new(656.0, 1224.0))
            .unwrap();
        s
    }

    fn drag(s: &mut BuilderSession, from: Point, to: Point) -> Option<String> {
        s.pointer_down(from);
        s.pointer_move(to);
        s.pointer_up(to).unwrap()
    }

    #[test]
    fn drag_creates_hotspot_in_reference_pixels() {
        let mut s = session();
        s.set_mode(Mode::Create);
        let id = drag(&mut s, Point::new(200.0, 100.0), Point::new(281.0, 161.0)).unwrap();

        assert_eq!(id, "hotspot-1");
        let hotspot = s.hotspot(&id).unwrap();
        assert_eq!(hotspot.coordinates, Rect::new(100.0, 50.0, 41.0, 31.0));
        assert_eq!(hotspot.color, Some(ColorSpec::parse("green")));
        assert_eq!(
            hotspot.line.as_ref().unwrap().segments,
            vec![Segment::horizontal(-120.0)]
        );
        assert_eq!(hotspot.line.as_ref().unwrap().thickness(), 2.0);
        assert_eq!(
            hotspot.description.as_ref().unwrap().content,
            "Add description here with **bold** and _italic_ formatting"
        );
        assert_eq!(s.selected(), Some("hotspot-1"));
        assert_eq!(s.form().horizontal, "-120");
        assert!(s.preview(&id).unwrap().selected);
    }

    #[test]
    fn small_drags_are_discarded() {
        let mut s = session();
        s.set_mode(Mode::Create);
        assert_eq!(drag(&mut s, Point::new(0.0, 0.0), Point::new(10.0, 50.0)), None);
        assert_eq!(drag(&mut s, Point::new(0.0, 0.0), Point::new(50.0, 10.0)), None);
        assert!(s.hotspots().is_empty());
    }

    #[test]
    fn drags_outside_image_or_in_select_mode_are_ignored() {
        let mut s = session();
        assert!(!s.pointer_down(Point::new(5.0, 5.0)));

        s.set_mode(Mode::Create);
        assert!(!s.pointer_down(Point::new(700.0, 5.0)));
        assert_eq!(s.pointer_up(Point::new(720.0, 40.0)).unwrap(), None);
        assert!(s.hotspots().is_empty());
    }

    #[test]
    fn create_without_image_fails() {
        let mut s = BuilderSession::default();
        let err = s.create_hotspot(Rect::new(0.0, 0.0, 20.0, 20.0)).unwrap_err();
        assert!(matches!(err, SessionError::NoImage));
    }

    #[test]
    fn sequential_ids_skip_taken_ones() {
        let mut s = session();
        s.create_hotspot(Rect::new(0.0, 0.0, 20.0, 20.0)).unwrap();
        s.change(Field::Id, "hotspot-2").unwrap();
        let id = s.create_hotspot(Rect::new(40.0, 40.0, 20.0, 20.0)).unwrap();
        assert_eq!(id, "hotspot-3");
    }

    #[test]
    fn click_selects_through_hit_regions() {
        let mut s = session();
        let a = s.create_hotspot(Rect::new(200.0, 100.0, 80.0, 60.0)).unwrap();
        let b = s.create_hotspot(Rect::new(400.0, 600.0, 80.0, 60.0)).unwrap();
        assert_eq!(s.selected(), Some(b.as_str()));

        let hit = s.click(Point::new(240.0, 130.0)).unwrap();
        assert_eq!(hit.id, a);
        assert_eq!(hit.part, HitPart::Hotspot);
        assert_eq!(s.selected(), Some(a.as_str()));
        assert!(!s.preview(&b).unwrap().selected);

        // The connector of `a` leaves the left edge towards x = -40.
        let hit = s.click(Point::new(100.0, 130.0)).unwrap();
        assert_eq!(hit.part, HitPart::Line);

        assert!(s.click(Point::new(600.0, 300.0)).is_none());
    }

    #[test]
    fn clicks_do_nothing_in_create_mode() {
        let mut s = session();
        s.create_hotspot(Rect::new(200.0, 100.0, 80.0, 60.0)).unwrap();
        s.clear_selection();
        s.set_mode(Mode::Create);
        assert!(s.click(Point::new(240.0, 130.0)).is_none());
        assert_eq!(s.selected(), None);
    }

    #[test]
    fn geometry_edits_are_debounced() {
        let mut s = session();
        let id = s.create_hotspot(Rect::new(200.0, 100.0, 80.0, 60.0)).unwrap();
        let t0 = Instant::now();

        s.input(Field::X, "1", t0).unwrap();
        s.input(Field::X, "12", t0 + 60 * MS).unwrap();
        assert!(s.tick(t0 + 120 * MS).unwrap().is_empty());
        assert_eq!(s.hotspot(&id).unwrap().coordinates.x, 100.0);

        s.tick(t0 + 160 * MS).unwrap();
        assert_eq!(s.hotspot(&id).unwrap().coordinates.x, 12.0);
        assert_eq!(s.preview(&id).unwrap().geometry.bounds.x, 24.0);
    }

    #[test]
    fn vertical_edit_enables_turning_point() {
        let mut s = session();
        let id = s.create_hotspot(Rect::new(200.0, 100.0, 80.0, 60.0)).unwrap();
        assert!(!s.turning_enabled());

        let t0 = Instant::now();
        s.input(Field::Vertical, "-50", t0).unwrap();
        s.tick(t0 + 50 * MS).unwrap();
        assert!(s.turning_enabled());
        assert_eq!(s.hotspot(&id).unwrap().line.as_ref().unwrap().segments.len(), 1);

        s.tick(t0 + 100 * MS).unwrap();
        assert_eq!(
            s.hotspot(&id).unwrap().line.as_ref().unwrap().segments,
            vec![
                Segment::horizontal(-60.0),
                Segment::vertical(-50.0),
                Segment::horizontal(-60.0),
            ]
        );
        assert_eq!(s.form().turning, "60");

        s.change(Field::Vertical, "0").unwrap();
        assert!(!s.turning_enabled());
        assert_eq!(s.form().turning, "0");
        assert_eq!(
            s.hotspot(&id).unwrap().line.as_ref().unwrap().segments,
            vec![Segment::horizontal(-120.0)]
        );
    }

    #[test]
    fn edits_redraw_only_the_edited_hotspot() {
        let mut s = session();
        s.create_hotspot(Rect::new(200.0, 100.0, 80.0, 60.0)).unwrap();
        s.create_hotspot(Rect::new(400.0, 600.0, 80.0, 60.0)).unwrap();
        let before = s.stats();

        s.change(Field::Width, "50").unwrap();
        let after = s.stats();
        assert_eq!(after.full, before.full);
        assert_eq!(after.single, before.single + 1);
        assert_eq!(s.previews().len(), 2);
    }

    #[test]
    fn description_commits_on_blur() {
        let mut s = session();
        let id = s.create_hotspot(Rect::new(200.0, 100.0, 80.0, 60.0)).unwrap();
        let t0 = Instant::now();

        s.input(Field::Description, "Draft", t0).unwrap();
        assert_eq!(s.next_deadline(), None);
        assert_eq!(
            s.hotspot(&id).unwrap().description.as_ref().unwrap().content,
            defaults::PLACEHOLDER_DESCRIPTION
        );

        s.blur_description("Press **Run**").unwrap();
        assert_eq!(
            s.preview(&id).unwrap().description_html.as_deref(),
            Some("<p>Press <strong>Run</strong></p>\n")
        );
    }

    #[test]
    fn rename_to_taken_id_is_rejected() {
        let mut s = session();
        s.create_hotspot(Rect::new(200.0, 100.0, 80.0, 60.0)).unwrap();
        s.create_hotspot(Rect::new(400.0, 600.0, 80.0, 60.0)).unwrap();

        let warnings = s.change(Field::Id, "hotspot-1").unwrap();
        assert_eq!(
            warnings,
            vec![ValidationError::DuplicateId {
                id: "hotspot-1".to_string()
            }]
        );
        assert_eq!(s.selected(), Some("hotspot-2"));
        assert_eq!(s.form().id, "hotspot-2");

        assert!(s.change(Field::Id, "save-button").unwrap().is_empty());
        assert_eq!(s.selected(), Some("save-button"));
        assert!(s.preview("save-button").is_some());
        assert!(s.preview("hotspot-2").is_none());
    }

    #[test]
    fn edits_need_a_selection() {
        let mut s = session();
        let err = s.input(Field::X, "4", Instant::now()).unwrap_err();
        assert!(matches!(err, SessionError::NoSelection));
    }

    #[test]
    fn delete_clears_selection() {
        let mut s = session();
        s.create_hotspot(Rect::new(200.0, 100.0, 80.0, 60.0)).unwrap();
        let b = s.create_hotspot(Rect::new(400.0, 600.0, 80.0, 60.0)).unwrap();

        assert_eq!(s.delete_selected().unwrap(), b);
        assert_eq!(s.selected(), None);
        assert_eq!(s.form(), &FormInput::default());
        assert_eq!(s.previews().len(), 1);
        assert!(matches!(
            s.delete("nope").unwrap_err(),
            SessionError::UnknownHotspot(_)
        ));
    }

    #[test]
    fn theme_change_recolors_previews() {
        let mut s = session();
        let id = s.create_hotspot(Rect::new(200.0, 100.0, 80.0, 60.0)).unwrap();
        let light = s.preview(&id).unwrap().geometry.clone();

        s.set_theme(Theme::Dark);
        let dark = &s.preview(&id).unwrap().geometry;
        assert_ne!(dark.highlight.border_color, light.highlight.border_color);
        assert_eq!(dark.bounds, light.bounds);
    }

    #[test]
    fn color_change_applies_to_selection() {
        let mut s = session();
        let id = s.create_hotspot(Rect::new(200.0, 100.0, 80.0, 60.0)).unwrap();
        s.set_color(ColorSpec::parse("#ff0000"));
        assert_eq!(
            s.hotspot(&id).unwrap().color,
            Some(ColorSpec::parse("#ff0000"))
        );
        assert_eq!(
            s.preview(&id).unwrap().geometry.highlight.border_color.as_deref(),
            Some("#ff0000")
        );
    }

    #[test]
    fn exports_overlays_fragment() {
        let mut s = session();
        s.create_hotspot(Rect::new(200.0, 100.0, 80.0, 60.0)).unwrap();
        let fragment = s.export_overlays().unwrap();
        assert!(fragment.starts_with("\"overlays\": ["));

        let value: Value = serde_json::from_str(&format!("{{{}}}", fragment)).unwrap();
        assert_eq!(value["overlays"][0]["id"], "hotspot-1");
        assert_eq!(value["overlays"][0]["coordinates"]["width"], 40);
        assert_eq!(
            value["overlays"][0]["line"]["segments"][0]["length"],
            -120
        );
    }

    #[test]
    fn whole_document_uses_defaults() {
        let s = BuilderSession::default();
        let doc = s.to_document();
        assert_eq!(doc.script_name, "Untitled Script");
        assert_eq!(doc.version.as_deref(), Some("1.0.0"));
        assert_eq!(doc.description.as_deref(), Some("Script description"));
        assert_eq!(doc.base_image.src, "screenshot.png");
        assert_eq!(doc.base_image.size(), Size::new(800.0, 600.0));
    }

    #[test]
    fn loading_a_document_replaces_state() {
        let mut s = session();
        s.create_hotspot(Rect::new(200.0, 100.0, 80.0, 60.0)).unwrap();
        s.input(Field::X, "3", Instant::now()).unwrap();

        let doc = ConfigDocument::from_json(
            "config.json",
            r#"{
                "scriptName": "Rename",
                "baseImage": { "src": "rename.png", "width": 328, "height": 612 },
                "owner": "tools",
                "overlays": [
                    { "id": "a", "coordinates": { "x": 1, "y": 2, "width": 3, "height": 4 } },
                    { "id": "a", "coordinates": { "x": 5, "y": 6, "width": 7, "height": 8 } }
                ]
            }"#,
        )
        .unwrap();
        let warnings = s.load_document(doc);

        assert_eq!(warnings.len(), 1);
        assert_eq!(s.selected(), None);
        assert_eq!(s.next_deadline(), None);
        assert_eq!(s.previews().len(), 2);

        let out = s.to_document();
        assert_eq!(out.script_name, "Rename");
        assert_eq!(out.base_image.src, "shot.png");
        assert_eq!(out.extras["owner"], "tools");
    }

    fn lineless() -> BuilderSession {
        let mut s = session();
        let doc = ConfigDocument::from_json(
            "config.json",
            r#"{
                "scriptName": "Rename",
                "baseImage": { "src": "rename.png", "width": 328, "height": 612 },
                "overlays": [
                    { "id": "b", "coordinates": { "x": 100, "y": 50, "width": 40, "height": 30 } }
                ]
            }"#,
        )
        .unwrap();
        s.load_document(doc);
        s
    }

    #[test]
    fn editing_geometry_keeps_hotspot_without_line() {
        let mut s = lineless();
        s.select("b").unwrap();
        s.change(Field::X, "110").unwrap();

        let hotspot = s.hotspot("b").unwrap();
        assert_eq!(hotspot.coordinates, Rect::new(110.0, 50.0, 40.0, 30.0));
        assert_eq!(hotspot.line, None);
        assert!(s.preview("b").unwrap().geometry.simple.line.is_none());
        assert!(!s.export_overlays().unwrap().contains("segments"));
    }

    #[test]
    fn editing_a_distance_adds_a_line() {
        let mut s = lineless();
        s.select("b").unwrap();
        s.change(Field::Horizontal, "-80").unwrap();

        let line = s.hotspot("b").unwrap().line.as_ref().unwrap();
        assert_eq!(line.segments, vec![Segment::horizontal(-80.0)]);
        assert_eq!(line.thickness(), 2.0);
    }
}
