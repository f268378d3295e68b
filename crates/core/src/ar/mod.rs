//! AR marker session: the single active marker and its narration.

use crate::audio::{AudioOrigin, AudioSession};
use crate::model::{ArMarker, ModelTransform};
use crate::notice::{Notice, NoticeKind, View};
use crate::render::ArRenderer;
use crate::{ExhibitError, Result};

/// Rendering attributes of the active marker.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveMarker {
    pub id: String,
    pub pattern_url: String,
    pub model_url: String,
    pub transform: ModelTransform,
    pub audio: Option<String>,
}

impl ActiveMarker {
    fn from_marker(marker: &ArMarker, shared_audio: Option<&str>) -> Self {
        Self {
            id: marker.id.clone(),
            pattern_url: marker.pattern_url.clone(),
            model_url: marker.model_url.clone(),
            transform: marker.transform,
            audio: marker
                .audio
                .clone()
                .or_else(|| shared_audio.map(str::to_string)),
        }
    }
}

pub struct ArSession {
    renderer: Option<Box<dyn ArRenderer>>,
    shared_audio: Option<String>,
    active: Option<ActiveMarker>,
}

impl ArSession {
    pub fn new(renderer: Option<Box<dyn ArRenderer>>, shared_audio: Option<String>) -> Self {
        Self {
            renderer,
            shared_audio,
            active: None,
        }
    }

    /// Activates the first marker, or reports that there is nothing to show.
    pub fn init(&mut self, markers: &[ArMarker]) -> Option<Notice> {
        match markers.first() {
            Some(first) => {
                self.activate(first);
                None
            }
            None => {
                tracing::info!("no AR markers available");
                Some(Notice::new(
                    NoticeKind::EmptyView(View::Ar),
                    "No AR markers to display yet.",
                ))
            }
        }
    }

    /// Replaces every attribute of the active marker with `marker`'s.
    pub fn activate(&mut self, marker: &ArMarker) {
        let active = ActiveMarker::from_marker(marker, self.shared_audio.as_deref());
        if let Some(renderer) = self.renderer.as_mut() {
            renderer.set_pattern(&active.pattern_url);
            renderer.set_model(&active.model_url);
            renderer.set_transform(&active.transform);
        }
        tracing::info!(marker_id = %active.id, "AR marker activated");
        self.active = Some(active);
    }

    pub fn active(&self) -> Option<&ActiveMarker> {
        self.active.as_ref()
    }

    /// Plays the active marker's narration on the shared channel. Whatever
    /// was playing is halted first, even when the request then fails.
    pub fn play_audio(&self, audio: &mut AudioSession) -> Result<()> {
        audio.stop();
        let active = self
            .active
            .as_ref()
            .ok_or_else(|| ExhibitError::playback("no AR marker is loaded"))?;
        let source = active
            .audio
            .as_deref()
            .ok_or_else(|| ExhibitError::playback("this marker has no audio file"))?;
        audio.play(source, AudioOrigin::Marker(active.id.clone()))
    }
}

impl std::fmt::Debug for ArSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArSession")
            .field("active", &self.active)
            .finish()
    }
}
