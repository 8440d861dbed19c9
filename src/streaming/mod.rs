//! Audio device playback using rodio
//!
//! Plays encoded takes on the default output device. Playback runs on
//! rodio's mixer thread; the calls here never block except
//! [`ClickPlayer::wait_until_end`].

use crate::{CadenceError, Result};
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
use std::io::Cursor;
use std::time::Duration;

/// Decode an encoded take into a rodio source
pub fn decode_take(wav: Vec<u8>) -> Result<Decoder<Cursor<Vec<u8>>>> {
    Decoder::new(Cursor::new(wav))
        .map_err(|e| CadenceError::AudioDevice(format!("Failed to decode take: {}", e)))
}

/// Player for rendered click tracks
pub struct ClickPlayer {
    _stream: OutputStream,
    handle: OutputStreamHandle,
    sink: Option<Sink>,
}

impl ClickPlayer {
    /// Open the default output device
    pub fn new() -> Result<Self> {
        let (stream, handle) = OutputStream::try_default()
            .map_err(|e| CadenceError::AudioDevice(format!("Failed to create audio stream: {}", e)))?;

        Ok(ClickPlayer {
            _stream: stream,
            handle,
            sink: None,
        })
    }

    /// Start playing a take, replacing whatever is playing
    pub fn play(&mut self, wav: Vec<u8>) -> Result<()> {
        self.stop();

        let source = decode_take(wav)?;
        let length = source.total_duration().unwrap_or(Duration::ZERO);
        let sink = Sink::try_new(&self.handle)
            .map_err(|e| CadenceError::AudioDevice(format!("Failed to create audio sink: {}", e)))?;
        sink.append(source);

        log::info!("playing take ({:.1}s)", length.as_secs_f32());
        self.sink = Some(sink);
        Ok(())
    }

    /// Stop the current take
    pub fn stop(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
    }

    /// True while a take is still sounding
    pub fn is_playing(&self) -> bool {
        self.sink
            .as_ref()
            .is_some_and(|sink| !sink.empty() && !sink.is_paused())
    }

    /// Block until the current take has finished
    pub fn wait_until_end(&self) {
        if let Some(sink) = &self.sink {
            sink.sleep_until_end();
        }
    }
}

impl Drop for ClickPlayer {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{render_take, TakeSpec, TempoSpec};

    #[test]
    fn test_decode_rendered_take() {
        let wav = render_take(&TakeSpec::new(TempoSpec::new(120, 4), 2.0, false)).unwrap();
        let source = decode_take(wav).unwrap();
        assert_eq!(source.channels(), 1);
        assert_eq!(source.sample_rate(), 44_100);
        assert_eq!(source.count(), 88_200);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(
            decode_take(vec![1, 2, 3, 4]),
            Err(CadenceError::AudioDevice(_))
        ));
    }

    #[test]
    fn test_player_lifecycle() {
        let mut player = match ClickPlayer::new() {
            Ok(player) => player,
            Err(err) => {
                eprintln!("Skipping playback test (audio backend unavailable): {}", err);
                return;
            }
        };
        assert!(!player.is_playing());

        let wav = render_take(&TakeSpec::new(TempoSpec::new(120, 4), 2.0, false)).unwrap();
        player.play(wav).unwrap();
        player.stop();
        assert!(!player.is_playing());
    }
}
