//! Overlay display state for one image.
//!
//! Loading is two-phase: [`OverlayEngine::begin_load`] hands out a
//! [`LoadTicket`], and only the most recent ticket may commit a result.
//! A slow load that finishes after the user switched documents is reported
//! as [`Commit::Stale`] and dropped.

use crate::color::Theme;
use crate::error::{Diagnostic, LoadError, ScaleError};
use crate::geometry::Size;
use crate::render::{self, HotspotGeometry};
use crate::schema::OverlayConfig;

/// Identifies one load attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoadTicket(u64);

/// Whether a load result was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commit {
    Applied,
    Stale,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EngineState {
    Idle,
    Loading,
    Loaded,
    Failed(Diagnostic),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayMode {
    /// One simple tier at a time, on hover
    #[default]
    Hover,
    /// Every complex tier at once
    ShowAll,
}

/// Lifecycle phase of a single hotspot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loaded,
    Hover,
    ShowAll,
}

/// Which tier of a hotspot is currently displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Visibility {
    pub simple: bool,
    pub complex: bool,
}

#[derive(Debug)]
pub struct OverlayEngine {
    generation: u64,
    state: EngineState,
    config: Option<OverlayConfig>,
    display: Option<Size>,
    theme: Theme,
    mode: DisplayMode,
    hovered: Option<String>,
    geometry: Vec<HotspotGeometry>,
}

impl OverlayEngine {
    pub fn new(theme: Theme) -> Self {
        Self {
            generation: 0,
            state: EngineState::Idle,
            config: None,
            display: None,
            theme,
            mode: DisplayMode::default(),
            hovered: None,
            geometry: Vec::new(),
        }
    }

    /// Drop everything from the previous document and start a new load.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.reset();
        self.generation += 1;
        self.state = EngineState::Loading;
        tracing::debug!("Begin overlay load #{}", self.generation);
        LoadTicket(self.generation)
    }

    /// Apply a loaded document rendered at `display`.
    pub fn complete(
        &mut self,
        ticket: LoadTicket,
        config: OverlayConfig,
        display: Size,
    ) -> Result<Commit, ScaleError> {
        if !self.is_current(ticket) {
            tracing::debug!("Dropping stale overlay load #{}", ticket.0);
            return Ok(Commit::Stale);
        }

        let geometry = render::render_overlay(&config, display, self.theme)?;
        tracing::info!(
            "Loaded {} overlays for {}",
            geometry.len(),
            config.script_name
        );
        self.geometry = geometry;
        self.config = Some(config);
        self.display = Some(display);
        self.state = EngineState::Loaded;
        Ok(Commit::Applied)
    }

    /// Record a failed load as an inline diagnostic.
    pub fn fail(&mut self, ticket: LoadTicket, err: &LoadError) -> Commit {
        if !self.is_current(ticket) {
            return Commit::Stale;
        }
        tracing::warn!("{}", err);
        self.reset();
        self.state = EngineState::Failed(Diagnostic::from(err));
        Commit::Applied
    }

    /// Re-layout after the rendered image changed size.
    pub fn resize(&mut self, display: Size) -> Result<(), ScaleError> {
        let Some(config) = &self.config else {
            return Ok(());
        };
        self.geometry = render::render_overlay(config, display, self.theme)?;
        self.display = Some(display);
        Ok(())
    }

    /// Re-resolve colors without touching positions.
    pub fn set_theme(&mut self, theme: Theme) {
        if self.theme == theme {
            return;
        }
        self.theme = theme;
        for geo in &mut self.geometry {
            geo.apply_theme(theme);
        }
    }

    pub fn set_show_all(&mut self, show_all: bool) {
        self.mode = if show_all {
            DisplayMode::ShowAll
        } else {
            DisplayMode::Hover
        };
        self.hovered = None;
    }

    /// Flip the display mode, returning whether show-all is now on.
    pub fn toggle_show_all(&mut self) -> bool {
        let show_all = self.mode == DisplayMode::Hover;
        self.set_show_all(show_all);
        show_all
    }

    pub fn hover_enter(&mut self, id: &str) {
        if self.mode == DisplayMode::Hover && self.geometry.iter().any(|g| g.id == id) {
            self.hovered = Some(id.to_string());
        }
    }

    pub fn hover_leave(&mut self, id: &str) {
        if self.hovered.as_deref() == Some(id) {
            self.hovered = None;
        }
    }

    /// Phase of a hotspot. Unknown ids are `Idle`.
    pub fn phase(&self, id: &str) -> Phase {
        if self.state != EngineState::Loaded || !self.geometry.iter().any(|g| g.id == id) {
            return Phase::Idle;
        }
        match self.mode {
            DisplayMode::ShowAll => Phase::ShowAll,
            DisplayMode::Hover if self.hovered.as_deref() == Some(id) => Phase::Hover,
            DisplayMode::Hover => Phase::Loaded,
        }
    }

    pub fn visibility(&self, id: &str) -> Visibility {
        match self.phase(id) {
            Phase::Hover => Visibility {
                simple: true,
                complex: false,
            },
            Phase::ShowAll => Visibility {
                simple: false,
                complex: true,
            },
            Phase::Idle | Phase::Loaded => Visibility::default(),
        }
    }

    /// Return to idle, invalidating any load in flight.
    pub fn clear(&mut self) {
        self.reset();
        self.generation += 1;
        self.state = EngineState::Idle;
    }

    pub fn state(&self) -> &EngineState {
        &self.state
    }

    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    pub fn config(&self) -> Option<&OverlayConfig> {
        self.config.as_ref()
    }

    pub fn geometry(&self) -> &[HotspotGeometry] {
        &self.geometry
    }

    pub fn display(&self) -> Option<Size> {
        self.display
    }

    fn is_current(&self, ticket: LoadTicket) -> bool {
        ticket.0 == self.generation
    }

    fn reset(&mut self) {
        self.config = None;
        self.display = None;
        self.hovered = None;
        self.geometry.clear();
    }
}

impl Default for OverlayEngine {
    fn default() -> Self {
        Self::new(Theme::default())
    }
}
