//! Speech output service.
//!
//! Wraps a host speech device behind a small state machine:
//!
//! ```text
//! Idle --speak--> Speaking --pause--> Paused
//!   ^                |  ^               |
//!   +--stop/ended----+  +----resume-----+
//! ```
//!
//! Only the service talks to the device. Device callbacks come back in
//! through `handle_event`, tagged with the utterance id, so a late event for
//! a cancelled utterance can be told apart from the current one.

mod console;
mod voice;

pub use console::ConsoleDevice;
pub use voice::{select_voice, Voice};

use parking_lot::Mutex;
use rand::seq::IndexedRandom;
use serde::Serialize;
use tokio::sync::watch;
use uuid::Uuid;

use crate::error::DashboardError;
use crate::types::SpeechConfig;

/// A host text-to-speech engine.
pub trait SpeechDevice: Send {
    fn voices(&self) -> Vec<Voice>;
    fn speak(&mut self, utterance: &Utterance);
    fn cancel(&mut self);
    fn pause(&mut self);
    fn resume(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeechState {
    Idle,
    Speaking,
    Paused,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Utterance {
    pub id: Uuid,
    pub text: String,
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
    /// `None` uses the host default voice.
    pub voice: Option<Voice>,
}

/// Per-call overrides; unset fields use the configured defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SpeechOptions {
    pub rate: Option<f32>,
    pub pitch: Option<f32>,
    pub volume: Option<f32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UtteranceEvent {
    Started(Uuid),
    Ended(Uuid),
    Errored(Uuid),
}

struct Inner {
    device: Option<Box<dyn SpeechDevice>>,
    enabled: bool,
    state: SpeechState,
    current: Option<Uuid>,
}

pub struct SpeechService {
    config: SpeechConfig,
    inner: Mutex<Inner>,
    state_tx: watch::Sender<SpeechState>,
}

impl SpeechService {
    pub fn new(device: Option<Box<dyn SpeechDevice>>, config: SpeechConfig) -> Self {
        if device.is_none() {
            log::info!("SpeechService: no speech device, voice output disabled");
        }
        let (state_tx, _) = watch::channel(SpeechState::Idle);
        Self {
            inner: Mutex::new(Inner {
                device,
                enabled: config.enabled,
                state: SpeechState::Idle,
                current: None,
            }),
            config,
            state_tx,
        }
    }

    /// Speak `text`, cutting off anything already playing.
    ///
    /// Returns the utterance id, or `None` when speech is disabled or no
    /// device is present.
    pub fn speak(&self, text: &str, options: SpeechOptions) -> Option<Uuid> {
        let mut inner = self.inner.lock();
        if !inner.enabled {
            return None;
        }
        let device = inner.device.as_mut()?;

        device.cancel();
        let utterance = Utterance {
            id: Uuid::new_v4(),
            text: text.to_string(),
            rate: options.rate.unwrap_or(self.config.default_rate).clamp(0.1, 10.0),
            pitch: options.pitch.unwrap_or(self.config.default_pitch).clamp(0.0, 2.0),
            volume: options
                .volume
                .unwrap_or(self.config.default_volume)
                .clamp(0.0, 1.0),
            voice: select_voice(&device.voices(), &self.config),
        };
        log::debug!(
            "SpeechService: speaking {} with voice {:?}",
            utterance.id,
            utterance.voice.as_ref().map(|v| v.name.as_str())
        );
        device.speak(&utterance);

        inner.current = Some(utterance.id);
        self.transition(&mut inner, SpeechState::Speaking);
        Some(utterance.id)
    }

    pub fn stop(&self) {
        let mut inner = self.inner.lock();
        self.stop_locked(&mut inner);
    }

    fn stop_locked(&self, inner: &mut Inner) {
        let Some(device) = inner.device.as_mut() else {
            return;
        };
        device.cancel();
        inner.current = None;
        self.transition(inner, SpeechState::Idle);
    }

    pub fn pause(&self) {
        let mut inner = self.inner.lock();
        if inner.state != SpeechState::Speaking {
            return;
        }
        let Some(device) = inner.device.as_mut() else {
            return;
        };
        device.pause();
        self.transition(&mut inner, SpeechState::Paused);
    }

    pub fn resume(&self) {
        let mut inner = self.inner.lock();
        if inner.state != SpeechState::Paused {
            return;
        }
        let Some(device) = inner.device.as_mut() else {
            return;
        };
        device.resume();
        self.transition(&mut inner, SpeechState::Speaking);
    }

    /// Flip enablement. Anything playing is stopped.
    pub fn toggle_enabled(&self) -> bool {
        let mut inner = self.inner.lock();
        inner.enabled = !inner.enabled;
        if inner.state != SpeechState::Idle {
            self.stop_locked(&mut inner);
        }
        log::info!("SpeechService: voice output enabled = {}", inner.enabled);
        inner.enabled
    }

    /// Feed a device callback back into the state machine.
    pub fn handle_event(&self, event: UtteranceEvent) {
        let mut inner = self.inner.lock();
        let id = match event {
            UtteranceEvent::Started(id) | UtteranceEvent::Ended(id) | UtteranceEvent::Errored(id) => id,
        };
        if inner.current != Some(id) {
            log::debug!("SpeechService: ignoring {:?} for stale utterance", event);
            return;
        }
        match event {
            UtteranceEvent::Started(_) => {
                if inner.state == SpeechState::Idle {
                    self.transition(&mut inner, SpeechState::Speaking);
                }
            }
            UtteranceEvent::Ended(_) | UtteranceEvent::Errored(_) => {
                inner.current = None;
                self.transition(&mut inner, SpeechState::Idle);
            }
        }
    }

    fn transition(&self, inner: &mut Inner, next: SpeechState) {
        inner.state = next;
        self.state_tx.send_replace(next);
    }

    pub fn state(&self) -> SpeechState {
        self.inner.lock().state
    }

    pub fn is_speaking(&self) -> bool {
        self.state() == SpeechState::Speaking
    }

    pub fn is_enabled(&self) -> bool {
        self.inner.lock().enabled
    }

    pub fn is_supported(&self) -> bool {
        self.inner.lock().device.is_some()
    }

    pub fn current_utterance(&self) -> Option<Uuid> {
        self.inner.lock().current
    }

    pub fn ensure_supported(&self) -> Result<(), DashboardError> {
        if self.is_supported() {
            Ok(())
        } else {
            Err(DashboardError::NotSupported(
                "speech synthesis is not available".to_string(),
            ))
        }
    }

    pub fn voices(&self) -> Vec<Voice> {
        self.inner
            .lock()
            .device
            .as_ref()
            .map(|d| d.voices())
            .unwrap_or_default()
    }

    /// The voice `speak` would use right now.
    pub fn selected_voice(&self) -> Option<Voice> {
        select_voice(&self.voices(), &self.config)
    }

    pub fn subscribe(&self) -> watch::Receiver<SpeechState> {
        self.state_tx.subscribe()
    }
}

impl Drop for SpeechService {
    fn drop(&mut self) {
        if let Some(device) = self.inner.get_mut().device.as_mut() {
            device.cancel();
        }
    }
}

/// Pick one phrase at random so repeated prompts don't sound canned.
pub fn random_response<'a>(responses: &[&'a str]) -> Option<&'a str> {
    responses.choose(&mut rand::rng()).copied()
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Arc;

    use parking_lot::Mutex;

    use super::{SpeechDevice, Utterance, Voice};

    #[derive(Debug, Clone, PartialEq)]
    pub enum DeviceCall {
        Speak(Utterance),
        Cancel,
        Pause,
        Resume,
    }

    /// Records every call; the log stays readable after the device is
    /// moved into a service.
    pub struct RecordingDevice {
        pub voices: Vec<Voice>,
        pub log: Arc<Mutex<Vec<DeviceCall>>>,
    }

    impl RecordingDevice {
        pub fn new(voices: Vec<Voice>) -> (Box<dyn SpeechDevice>, Arc<Mutex<Vec<DeviceCall>>>) {
            let log = Arc::new(Mutex::new(Vec::new()));
            (
                Box::new(Self {
                    voices,
                    log: log.clone(),
                }),
                log,
            )
        }
    }

    impl SpeechDevice for RecordingDevice {
        fn voices(&self) -> Vec<Voice> {
            self.voices.clone()
        }

        fn speak(&mut self, utterance: &Utterance) {
            self.log.lock().push(DeviceCall::Speak(utterance.clone()));
        }

        fn cancel(&mut self) {
            self.log.lock().push(DeviceCall::Cancel);
        }

        fn pause(&mut self) {
            self.log.lock().push(DeviceCall::Pause);
        }

        fn resume(&mut self) {
            self.log.lock().push(DeviceCall::Resume);
        }
    }

    pub fn spoken(log: &Mutex<Vec<DeviceCall>>) -> Vec<String> {
        log.lock()
            .iter()
            .filter_map(|c| match c {
                DeviceCall::Speak(u) => Some(u.text.clone()),
                _ => None,
            })
            .collect()
    }
}
