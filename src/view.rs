//! Transient view state: tabs, summary cards, the voice dialog and the
//! module screens. Nothing here is persisted or fetched.

use serde::Serialize;

use crate::types::{Collection, DashboardStats};

// =============================================================================
// Tabs and summary cards
// =============================================================================

impl Collection {
    pub fn label(&self) -> &'static str {
        match self {
            Collection::Leads => "Leads",
            Collection::Opportunities => "Opportunities",
            Collection::Quotes => "Quotes",
            Collection::RecentItems => "Recent",
        }
    }

    fn chip(&self) -> &'static str {
        match self {
            Collection::Leads => "Active",
            Collection::Opportunities => "In Progress",
            Collection::Quotes => "Pending",
            Collection::RecentItems => "Updated",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TabLabel {
    pub collection: Collection,
    pub label: String,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryCard {
    pub title: &'static str,
    pub count: usize,
    pub chip: &'static str,
}

pub fn summary_cards(stats: &DashboardStats) -> Vec<SummaryCard> {
    Collection::ALL
        .iter()
        .map(|c| SummaryCard {
            title: c.label(),
            count: stats.count(*c),
            chip: c.chip(),
        })
        .collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DashboardView {
    active_tab: usize,
}

impl DashboardView {
    pub fn active_tab(&self) -> usize {
        self.active_tab
    }

    pub fn active_collection(&self) -> Collection {
        Collection::ALL[self.active_tab]
    }

    /// Out-of-range indexes are ignored.
    pub fn select_tab(&mut self, index: usize) -> bool {
        if index >= Collection::ALL.len() {
            log::debug!("DashboardView: ignoring tab index {index}");
            return false;
        }
        self.active_tab = index;
        true
    }

    pub fn tabs(&self, stats: &DashboardStats) -> Vec<TabLabel> {
        Collection::ALL
            .iter()
            .enumerate()
            .map(|(i, c)| TabLabel {
                collection: *c,
                label: format!("{} ({})", c.label(), stats.count(*c)),
                active: i == self.active_tab,
            })
            .collect()
    }
}

// =============================================================================
// Voice dialog
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceDialog {
    pub title: String,
    pub prompt: String,
    open: bool,
    listening: bool,
    transcript: String,
}

impl Default for VoiceDialog {
    fn default() -> Self {
        Self::new("Voice Command", "Speak your command...")
    }
}

impl VoiceDialog {
    pub fn new(title: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            prompt: prompt.into(),
            open: false,
            listening: false,
            transcript: String::new(),
        }
    }

    pub fn open(&mut self) {
        self.open = true;
        self.transcript.clear();
    }

    pub fn close(&mut self) {
        self.open = false;
        self.listening = false;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn set_listening(&mut self, listening: bool) {
        self.listening = listening && self.open;
    }

    pub fn is_listening(&self) -> bool {
        self.listening
    }

    /// Recognizers emit empty interim results; those keep the last text.
    pub fn set_transcript(&mut self, transcript: &str) {
        if !transcript.trim().is_empty() {
            self.transcript = transcript.to_string();
        }
    }

    pub fn transcript(&self) -> &str {
        &self.transcript
    }

    /// Text shown in the dialog body: the transcript once there is one.
    pub fn display_text(&self) -> &str {
        if self.transcript.is_empty() {
            &self.prompt
        } else {
            &self.transcript
        }
    }

    /// Take the transcript for dispatch. Stops listening; the dialog stays
    /// open so the reply can be shown.
    pub fn submit(&mut self) -> Option<String> {
        self.listening = false;
        if self.transcript.is_empty() {
            return None;
        }
        Some(self.transcript.clone())
    }
}

// =============================================================================
// Module screens
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ModuleScreen {
    Illustration,
    MeetingPrep,
}

impl ModuleScreen {
    pub fn title(&self) -> &'static str {
        match self {
            ModuleScreen::Illustration => "Guided Income Planning & Illustrations",
            ModuleScreen::MeetingPrep => "Meeting Preparation Intelligence",
        }
    }

    pub fn subtitle(&self) -> &'static str {
        match self {
            ModuleScreen::Illustration => {
                "Agent-assisted income projections, gap analysis, and regulatory compliance"
            }
            ModuleScreen::MeetingPrep => {
                "Pre-meeting data assembly, conversation guidance, and document preparation"
            }
        }
    }
}

/// Everything the view layer holds between renders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    pub dashboard: DashboardView,
    pub voice_dialog: VoiceDialog,
    /// `None` shows the dashboard.
    pub module: Option<ModuleScreen>,
}
