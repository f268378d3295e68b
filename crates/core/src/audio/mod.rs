use std::fmt;

use crate::render::{AudioChannel, AudioStream};
use crate::{ExhibitError, Result};

/// What a playing stream belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioOrigin {
    /// Narration of an AR marker, keyed by marker id.
    Marker(String),
    /// Audio attached to a map point or museum item.
    Exhibit(String),
}

impl fmt::Display for AudioOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AudioOrigin::Marker(id) => write!(f, "marker `{id}`"),
            AudioOrigin::Exhibit(id) => write!(f, "exhibit `{id}`"),
        }
    }
}

#[derive(Debug)]
struct NowPlaying {
    stream: AudioStream,
    origin: AudioOrigin,
    source: String,
}

/// The single audio channel of a session.
///
/// At most one stream plays at a time: [`AudioSession::play`] stops the
/// current stream before starting the next one, and a failed start leaves
/// the channel idle.
pub struct AudioSession {
    channel: Option<Box<dyn AudioChannel>>,
    current: Option<NowPlaying>,
}

impl AudioSession {
    pub fn new(channel: Option<Box<dyn AudioChannel>>) -> Self {
        Self {
            channel,
            current: None,
        }
    }

    pub fn play(&mut self, source: &str, origin: AudioOrigin) -> Result<()> {
        self.stop();

        let channel = self
            .channel
            .as_mut()
            .ok_or_else(|| ExhibitError::playback("no audio output available"))?;

        let stream = channel.play(source)?;
        tracing::info!(%origin, source, "audio started");
        self.current = Some(NowPlaying {
            stream,
            origin,
            source: source.to_string(),
        });
        Ok(())
    }

    /// Stops whatever is playing. No-op when idle.
    pub fn stop(&mut self) {
        if let Some(playing) = self.current.take() {
            if let Some(channel) = self.channel.as_mut() {
                channel.stop(playing.stream);
            }
            tracing::debug!(origin = %playing.origin, "audio stopped");
        }
    }

    /// Stops the current stream only if it belongs to `origin`.
    pub fn stop_if(&mut self, origin: &AudioOrigin) {
        if self.current.as_ref().is_some_and(|playing| &playing.origin == origin) {
            self.stop();
        }
    }

    /// Returns `true` while a stream is playing.
    pub fn is_playing(&self) -> bool {
        self.current.is_some()
    }

    /// What started the current stream.
    pub fn current_origin(&self) -> Option<&AudioOrigin> {
        self.current.as_ref().map(|playing| &playing.origin)
    }

    /// Source of the current stream, as passed to [`Self::play`].
    pub fn current_source(&self) -> Option<&str> {
        self.current.as_ref().map(|playing| playing.source.as_str())
    }
}

impl fmt::Debug for AudioSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AudioSession")
            .field("has_channel", &self.channel.is_some())
            .field("current", &self.current)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{AudioEvent, RecordingAudio};

    fn session(audio: &RecordingAudio) -> AudioSession {
        AudioSession::new(Some(Box::new(audio.clone())))
    }

    #[test]
    fn stops_previous_stream_before_starting_next() {
        let audio = RecordingAudio::new();
        let mut channel = session(&audio);

        channel
            .play("a.wav", AudioOrigin::Marker("m1".into()))
            .unwrap();
        channel
            .play("b.wav", AudioOrigin::Exhibit("p1".into()))
            .unwrap();

        assert_eq!(
            audio.events(),
            vec![
                AudioEvent::Started("a.wav".into()),
                AudioEvent::Stopped("a.wav".into()),
                AudioEvent::Started("b.wav".into()),
            ]
        );
        assert_eq!(audio.peak_concurrent(), 1);
    }

    #[test]
    fn failed_start_leaves_channel_idle() {
        let audio = RecordingAudio::new();
        audio.fail_on("broken.wav");
        let mut channel = session(&audio);
        channel
            .play("a.wav", AudioOrigin::Marker("m1".into()))
            .unwrap();

        let err = channel
            .play("broken.wav", AudioOrigin::Marker("m2".into()))
            .unwrap_err();

        assert!(matches!(err, ExhibitError::Playback(_)));
        assert!(!channel.is_playing());
        assert!(audio.playing().is_empty());
    }

    #[test]
    fn missing_output_is_a_playback_error() {
        let mut channel = AudioSession::new(None);
        let err = channel
            .play("a.wav", AudioOrigin::Exhibit("p1".into()))
            .unwrap_err();
        assert!(matches!(err, ExhibitError::Playback(_)));
    }

    #[test]
    fn stop_if_only_matches_owner() {
        let audio = RecordingAudio::new();
        let mut channel = session(&audio);
        channel
            .play("a.wav", AudioOrigin::Exhibit("p1".into()))
            .unwrap();

        channel.stop_if(&AudioOrigin::Marker("p1".into()));
        assert!(channel.is_playing());

        channel.stop_if(&AudioOrigin::Exhibit("p1".into()));
        assert!(!channel.is_playing());
    }
}
