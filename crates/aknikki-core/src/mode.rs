//! Selection and side-panel state machine.
//!
//! Selection and the open panel are independent: opening a panel keeps the
//! selection, and selecting an element keeps the panel. Panels are mutually
//! exclusive with each other. The floating action menu is only ever visible
//! while something is selected.

use crate::element::{ElementId, ElementKind};
use crate::scene::Scene;
use serde::{Deserialize, Serialize};

/// Side drawers reachable from the sidebar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PanelKind {
    Background,
    Character,
    Text,
    Audio,
    Upload,
}

impl PanelKind {
    /// Sidebar label.
    pub fn label(self) -> &'static str {
        match self {
            PanelKind::Background => "BG",
            PanelKind::Character => "Char",
            PanelKind::Text => "Text",
            PanelKind::Audio => "Audio",
            PanelKind::Upload => "Upload",
        }
    }

    /// Element kind created when an entry of this panel is picked.
    ///
    /// Audio entries have no visual element.
    pub fn element_kind(self) -> Option<ElementKind> {
        match self {
            PanelKind::Background | PanelKind::Character | PanelKind::Upload => {
                Some(ElementKind::Image)
            }
            PanelKind::Text => Some(ElementKind::Text),
            PanelKind::Audio => None,
        }
    }

    /// All panels in sidebar order.
    pub fn all() -> &'static [PanelKind] {
        &[
            PanelKind::Background,
            PanelKind::Character,
            PanelKind::Text,
            PanelKind::Audio,
            PanelKind::Upload,
        ]
    }
}

/// The combined UI mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Idle,
    PanelOpen(PanelKind),
    ElementSelected(ElementId),
    ElementSelectedWithPanel(ElementId, PanelKind),
}

/// Selection, open panel, and action-menu visibility.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModeState {
    selection: Option<ElementId>,
    panel: Option<PanelKind>,
    action_menu_open: bool,
}

impl ModeState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current combined mode.
    pub fn mode(&self) -> Mode {
        match (self.selection, self.panel) {
            (None, None) => Mode::Idle,
            (None, Some(panel)) => Mode::PanelOpen(panel),
            (Some(id), None) => Mode::ElementSelected(id),
            (Some(id), Some(panel)) => Mode::ElementSelectedWithPanel(id, panel),
        }
    }

    pub fn selection(&self) -> Option<ElementId> {
        self.selection
    }

    pub fn is_selected(&self, id: ElementId) -> bool {
        self.selection == Some(id)
    }

    pub fn panel(&self) -> Option<PanelKind> {
        self.panel
    }

    /// Whether the floating delete/duplicate/layer menu is shown.
    pub fn action_menu_visible(&self) -> bool {
        self.selection.is_some() && self.action_menu_open
    }

    /// Select an element. The open panel is left alone.
    pub fn select(&mut self, id: ElementId) {
        self.selection = Some(id);
        self.action_menu_open = true;
    }

    /// Clear the selection (background click). The open panel is left alone.
    pub fn clear_selection(&mut self) {
        self.selection = None;
        self.action_menu_open = false;
    }

    /// Hide the action menu but keep the selection.
    pub fn dismiss_action_menu(&mut self) {
        self.action_menu_open = false;
    }

    /// Open a panel, replacing any other. Selection is kept.
    ///
    /// Returns the panel that was replaced, if any.
    pub fn open_panel(&mut self, panel: PanelKind) -> Option<PanelKind> {
        let previous = self.panel.replace(panel);
        previous.filter(|p| *p != panel)
    }

    /// Open `panel`, or close it if it is already open.
    pub fn toggle_panel(&mut self, panel: PanelKind) {
        if self.panel == Some(panel) {
            self.panel = None;
        } else {
            self.panel = Some(panel);
        }
    }

    /// Close whichever panel is open.
    pub fn close_panel(&mut self) -> Option<PanelKind> {
        self.panel.take()
    }

    /// Drop every reference to a deleted element.
    pub fn forget(&mut self, id: ElementId) {
        if self.selection == Some(id) {
            self.clear_selection();
        }
    }

    /// Clear a selection that no longer exists in `scene`.
    pub fn retain_valid(&mut self, scene: &Scene) {
        if let Some(id) = self.selection {
            if !scene.contains(id) {
                log::debug!("Clearing selection of missing element {id}");
                self.clear_selection();
            }
        }
    }
}
