use crate::assets::AssetState;
use crate::settings::AmbienceSettings;

/// Playback instructions for the host audio engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AudioCue {
    pub looping: bool,
    pub volume: f32,
}

impl From<AmbienceSettings> for AudioCue {
    fn from(settings: AmbienceSettings) -> Self {
        Self {
            looping: settings.looping,
            volume: settings.volume.clamp(0.0, 1.0),
        }
    }
}

/// Background sound. Holds the encoded clip until the host starts playing it.
pub struct Ambience {
    cue: AudioCue,
    state: AssetState<Vec<u8>>,
}

impl Ambience {
    #[must_use]
    pub fn new(settings: AmbienceSettings) -> Self {
        Self {
            cue: settings.into(),
            state: AssetState::Pending,
        }
    }

    #[must_use]
    pub fn cue(&self) -> AudioCue {
        self.cue
    }

    #[must_use]
    pub fn state(&self) -> &AssetState<Vec<u8>> {
        &self.state
    }

    #[must_use]
    pub fn bytes(&self) -> Option<&[u8]> {
        self.state.loaded().map(Vec::as_slice)
    }

    pub fn on_loaded(&mut self, bytes: Vec<u8>) {
        log::info!("Ambience ready ({} bytes)", bytes.len());
        self.state = AssetState::Loaded(bytes);
    }

    pub fn on_failed(&mut self, reason: impl Into<String>) {
        self.state.fail(reason);
    }
}
