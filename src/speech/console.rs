//! Terminal stand-in for a speech engine: prints what would be spoken.

use std::io::Write;

use super::{SpeechDevice, Utterance, Voice};

pub struct ConsoleDevice<W: Write + Send> {
    out: W,
}

impl ConsoleDevice<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self {
            out: std::io::stdout(),
        }
    }
}

impl<W: Write + Send> ConsoleDevice<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, line: &str) {
        if let Err(e) = writeln!(self.out, "{line}") {
            log::warn!("ConsoleDevice: write failed: {e}");
        }
    }
}

impl<W: Write + Send> SpeechDevice for ConsoleDevice<W> {
    fn voices(&self) -> Vec<Voice> {
        vec![Voice::new("Console", "en-GB")]
    }

    fn speak(&mut self, utterance: &Utterance) {
        self.emit(&format!("🔊 {}", utterance.text));
    }

    fn cancel(&mut self) {}

    fn pause(&mut self) {
        self.emit("(paused)");
    }

    fn resume(&mut self) {
        self.emit("(resumed)");
    }
}
