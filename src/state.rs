use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use crate::agent::{AgentReply, VoiceAgent};
use crate::api::{AdvisorClient, HttpTransport, Transport};
use crate::containers::{
    ComplianceContainer, CustomerIntelligenceContainer, IllustrationContainer,
    MeetingPrepContainer, PredictiveAnalyticsContainer,
};
use crate::dashboard::{Dashboard, DashboardSnapshot};
use crate::error::DashboardError;
use crate::intent::CommandInterpreter;
use crate::mock_data;
use crate::narration::{self, Insight};
use crate::speech::{SpeechDevice, SpeechOptions, SpeechService};
use crate::types::Config;
use crate::view::{summary_cards, ModuleScreen, SummaryCard, TabLabel, ViewState};

/// Everything one application session owns.
///
/// Built once at startup; the containers, dashboard and speech service live
/// exactly as long as the session.
pub struct AdvisorSession {
    pub config: Config,
    pub compliance: Arc<ComplianceContainer>,
    pub customer_intelligence: Arc<CustomerIntelligenceContainer>,
    pub illustration: Arc<IllustrationContainer>,
    pub meeting_prep: Arc<MeetingPrepContainer>,
    pub predictive_analytics: Arc<PredictiveAnalyticsContainer>,
    pub dashboard: Dashboard,
    pub speech: SpeechService,
    pub agent: VoiceAgent,
    pub view: Mutex<ViewState>,
}

impl AdvisorSession {
    pub fn new(
        config: Config,
        transport: Arc<dyn Transport>,
        device: Option<Box<dyn SpeechDevice>>,
    ) -> Self {
        let api = Arc::new(AdvisorClient::new(transport));

        let compliance = Arc::new(ComplianceContainer::new(api.clone()));
        let customer_intelligence = Arc::new(CustomerIntelligenceContainer::new(api.clone()));
        let illustration = Arc::new(IllustrationContainer::new(api.clone()));
        let meeting_prep = Arc::new(MeetingPrepContainer::new(api.clone()));
        let predictive_analytics = Arc::new(PredictiveAnalyticsContainer::new(api.clone()));

        let interpreters: Vec<Arc<dyn CommandInterpreter>> = vec![
            compliance.clone(),
            customer_intelligence.clone(),
            illustration.clone(),
            meeting_prep.clone(),
            predictive_analytics.clone(),
        ];

        Self {
            dashboard: Dashboard::new(api, config.fallback_policy),
            speech: SpeechService::new(device, config.speech.clone()),
            agent: VoiceAgent::new(interpreters),
            view: Mutex::new(ViewState::default()),
            compliance,
            customer_intelligence,
            illustration,
            meeting_prep,
            predictive_analytics,
            config,
        }
    }

    /// Session against the configured HTTP backend.
    pub fn from_config(
        config: Config,
        device: Option<Box<dyn SpeechDevice>>,
    ) -> Result<Self, DashboardError> {
        let transport = HttpTransport::new(
            &config.api_base_url,
            config.api_token.clone(),
            config.request_timeout_secs.map(Duration::from_secs),
        )?;
        log::info!("AdvisorSession: backend {}", config.api_base_url);
        Ok(Self::new(config, Arc::new(transport), device))
    }

    // =========================================================================
    // Dashboard
    // =========================================================================

    /// Initial load when the dashboard is first shown.
    pub async fn mount(&self) -> DashboardSnapshot {
        self.dashboard.load().await
    }

    pub fn tabs(&self) -> Vec<TabLabel> {
        let stats = self.dashboard.stats();
        self.view.lock().dashboard.tabs(&stats)
    }

    pub fn select_tab(&self, index: usize) -> bool {
        self.view.lock().dashboard.select_tab(index)
    }

    pub fn summary_cards(&self) -> Vec<SummaryCard> {
        summary_cards(&self.dashboard.stats())
    }

    // =========================================================================
    // Voice
    // =========================================================================

    /// Interpret `text` across every domain and speak the reply.
    pub fn handle_command(&self, text: &str) -> AgentReply {
        let reply = self.agent.dispatch(text);
        self.speech.speak(&reply.spoken, SpeechOptions::default());
        reply
    }

    pub fn open_voice_dialog(&self) {
        let mut view = self.view.lock();
        view.voice_dialog.open();
        view.voice_dialog.set_listening(true);
    }

    pub fn update_transcript(&self, transcript: &str) {
        self.view.lock().voice_dialog.set_transcript(transcript);
    }

    /// Hand the dialog transcript to the agent. `None` when nothing was heard.
    pub fn submit_voice_dialog(&self) -> Option<AgentReply> {
        let transcript = self.view.lock().voice_dialog.submit()?;
        Some(self.handle_command(&transcript))
    }

    pub fn close_voice_dialog(&self) {
        self.view.lock().voice_dialog.close();
    }

    fn advisor_name(&self) -> &str {
        self.config.advisor_name.as_deref().unwrap_or("Advisor")
    }

    pub fn speak_welcome(&self, hour: u32) -> String {
        let message =
            narration::welcome_message(self.advisor_name(), &mock_data::day_stats(), hour);
        self.speech.speak(&message, SpeechOptions::default());
        message
    }

    pub fn speak_daily_summary(&self) -> String {
        let summary = narration::daily_summary(&mock_data::day_stats());
        self.speech.speak(&summary, SpeechOptions::default());
        summary
    }

    /// Insights shown on the home screen, most urgent first.
    pub fn insights(&self) -> Vec<Insight> {
        mock_data::insights()
    }

    pub fn speak_insight(&self, insight: &Insight) -> String {
        let message = narration::insight_message(insight);
        self.speech.speak(&message, SpeechOptions::default());
        message
    }

    pub fn speak_top_insight(&self) -> Option<String> {
        let insight = self.insights().into_iter().next()?;
        Some(self.speak_insight(&insight))
    }

    // =========================================================================
    // Module screens
    // =========================================================================

    pub fn open_module(&self, screen: ModuleScreen) {
        self.view.lock().module = Some(screen);
    }

    pub fn close_module(&self) {
        self.view.lock().module = None;
    }

    /// Load the meeting-prep screen for one appointment with one customer.
    pub async fn load_meeting_prep(
        &self,
        appointment_id: &str,
        customer_id: &str,
    ) -> Result<(), DashboardError> {
        self.open_module(ModuleScreen::MeetingPrep);
        tokio::try_join!(
            self.meeting_prep.fetch_meeting_prep(appointment_id),
            self.meeting_prep.fetch_client_snapshot(customer_id),
            self.meeting_prep.fetch_exposure_view(customer_id),
        )?;
        Ok(())
    }

    /// Load the illustration screen for one scenario.
    pub async fn load_illustration(&self, scenario_id: &str) -> Result<(), DashboardError> {
        self.open_module(ModuleScreen::Illustration);
        self.illustration.fetch_projections(scenario_id).await?;
        Ok(())
    }
}

// =============================================================================
// Configuration file
// =============================================================================

/// Get the canonical config file path (~/.advisor-assistant/config.json)
pub fn config_path() -> Result<PathBuf, DashboardError> {
    let home = dirs::home_dir()
        .ok_or_else(|| DashboardError::Config("Could not find home directory".to_string()))?;
    Ok(home.join(".advisor-assistant").join("config.json"))
}

/// Load configuration from `path`. A missing file yields the defaults.
pub fn load_config_from(path: &Path) -> Result<Config, DashboardError> {
    if !path.exists() {
        log::debug!("Config: {} not found, using defaults", path.display());
        return Ok(Config::default());
    }

    let content = fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|e| {
        DashboardError::Config(format!("Failed to parse {}: {}", path.display(), e))
    })
}

/// Load configuration from ~/.advisor-assistant/config.json
pub fn load_config() -> Result<Config, DashboardError> {
    load_config_from(&config_path()?)
}

/// Create or update the config file at `path`.
///
/// Reads the current file (or defaults on first run), applies the mutator,
/// ensures the parent directory exists and writes the result back.
pub fn create_or_update_config(
    path: &Path,
    mutator: impl FnOnce(&mut Config),
) -> Result<Config, DashboardError> {
    let mut config = load_config_from(path)?;
    mutator(&mut config);

    if let Some(parent) = path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }

    let content = serde_json::to_string_pretty(&config)?;
    fs::write(path, content)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::stub::StubTransport;
    use crate::intent::ActionKind;
    use crate::speech::testing::{spoken, RecordingDevice};
    use crate::speech::Voice;
    use crate::types::FallbackPolicy;
    use serde_json::json;

    fn session(stub: &Arc<StubTransport>) -> (AdvisorSession, Arc<Mutex<Vec<crate::speech::testing::DeviceCall>>>) {
        let (device, log) = RecordingDevice::new(vec![Voice::new("Kate", "en-GB")]);
        let config = Config {
            advisor_name: Some("Jamie Rivera".into()),
            ..Config::default()
        };
        (AdvisorSession::new(config, stub.clone(), Some(device)), log)
    }

    #[tokio::test]
    async fn test_mount_falls_back_to_mock_and_labels_tabs() {
        let stub = StubTransport::new();
        let (session, _log) = session(&stub);

        session.mount().await;

        let labels: Vec<String> = session.tabs().into_iter().map(|t| t.label).collect();
        assert_eq!(labels[0], "Leads (2)");
        assert_eq!(labels[3], "Recent (0)");
        assert_eq!(session.summary_cards()[2].count, 1);
    }

    #[tokio::test]
    async fn test_voice_dialog_round_trip_speaks_reply() {
        let stub = StubTransport::new();
        let (session, log) = session(&stub);

        session.open_voice_dialog();
        session.update_transcript("show documents");
        session.update_transcript("");
        let reply = session.submit_voice_dialog().unwrap();

        assert_eq!(reply.matches[0].descriptor.action, ActionKind::ShowDocuments);
        assert_eq!(spoken(&log), vec!["Here are the compliance documents on file."]);
        assert!(!session.view.lock().voice_dialog.is_listening());
    }

    #[tokio::test]
    async fn test_empty_dialog_submits_nothing() {
        let stub = StubTransport::new();
        let (session, log) = session(&stub);
        session.open_voice_dialog();
        assert!(session.submit_voice_dialog().is_none());
        assert!(spoken(&log).is_empty());
    }

    #[tokio::test]
    async fn test_command_data_reflects_container_state() {
        let stub = StubTransport::new();
        stub.respond(
            "GET compliance/customers/C-1/documents",
            json!([{ "name": "Annuity disclosure" }]),
        );
        let (session, _log) = session(&stub);

        session.compliance.fetch_documents("C-1").await.unwrap();
        let reply = session.handle_command("Show documents");

        assert_eq!(
            reply.matches[0].descriptor.data,
            Some(json!([{ "name": "Annuity disclosure" }]))
        );
    }

    #[tokio::test]
    async fn test_load_meeting_prep_opens_screen() {
        let stub = StubTransport::new();
        stub.respond("GET meeting-prep/appointments/APT-1", json!({ "agenda": [] }));
        stub.respond("GET meeting-prep/customers/C-1/snapshot", json!({ "age": 35 }));
        stub.respond("GET meeting-prep/customers/C-1/exposure", json!({ "gap": 0 }));
        let (session, _log) = session(&stub);

        session.load_meeting_prep("APT-1", "C-1").await.unwrap();

        assert_eq!(session.view.lock().module, Some(ModuleScreen::MeetingPrep));
        assert_eq!(session.meeting_prep.client_snapshot("C-1"), Some(json!({ "age": 35 })));
    }

    #[tokio::test]
    async fn test_load_illustration_surfaces_error() {
        let stub = StubTransport::new();
        let (session, _log) = session(&stub);

        let err = session.load_illustration("S-9").await.unwrap_err();
        assert!(err.is_transport());
        assert!(session.illustration.error().is_some());
        assert_eq!(session.view.lock().module, Some(ModuleScreen::Illustration));
    }

    #[tokio::test]
    async fn test_welcome_uses_first_name() {
        let stub = StubTransport::new();
        let (session, log) = session(&stub);
        let message = session.speak_welcome(14);
        assert!(message.starts_with("Good afternoon Jamie!"));
        assert_eq!(spoken(&log), vec![message]);
    }

    #[tokio::test]
    async fn test_top_insight_is_spoken_with_intro_and_action() {
        let stub = StubTransport::new();
        let (session, log) = session(&stub);

        let message = session.speak_top_insight().unwrap();

        assert!(narration::INSIGHT_INTROS
            .iter()
            .any(|intro| message.starts_with(intro)));
        assert!(message.ends_with("Policy renewal expires in 3 days. View Customer?"));
        assert_eq!(spoken(&log), vec![message]);
    }

    #[tokio::test]
    async fn test_speak_insight_reads_chosen_insight() {
        let stub = StubTransport::new();
        let (session, log) = session(&stub);
        let insights = session.insights();
        assert_eq!(insights.len(), 3);

        let message = session.speak_insight(&insights[2]);
        assert!(message.ends_with("Client birthday today: Michael Chen - Send wishes. Send Message?"));
        assert_eq!(spoken(&log), vec![message]);
    }

    #[test]
    fn test_load_config_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_config_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();
        let err = load_config_from(&path).unwrap_err();
        assert!(matches!(err, DashboardError::Config(_)));
    }

    #[test]
    fn test_create_or_update_config_writes_and_merges() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        create_or_update_config(&path, |c| c.api_base_url = "https://crm.example.com".into())
            .unwrap();
        let updated = create_or_update_config(&path, |c| {
            c.fallback_policy = FallbackPolicy::PartialFill
        })
        .unwrap();

        assert_eq!(updated.api_base_url, "https://crm.example.com");
        let on_disk = load_config_from(&path).unwrap();
        assert_eq!(on_disk, updated);
        assert_eq!(on_disk.fallback_policy, FallbackPolicy::PartialFill);
    }
}
