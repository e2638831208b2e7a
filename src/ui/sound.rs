/// Sound engine: procedural chiptune cues for game events via rodio.
///
/// All cues are generated as in-memory WAV buffers at init time.
/// Playback is fire-and-forget (non-blocking) via rodio's Sink.
///
/// Compile without the "sound" feature to disable audio entirely
/// (the stub SoundEngine does nothing).

use crate::sim::event::GameEvent;

/// One sound per kind of event.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Cue {
    Key,
    Door,
    Companion,
    LevelClear,
    Finish,
}

/// Which cue an event plays. The first level entry is silent.
pub fn cue_for(event: &GameEvent) -> Option<Cue> {
    match event {
        GameEvent::KeyCollected { .. } => Some(Cue::Key),
        GameEvent::DoorUnlocked { .. } => Some(Cue::Door),
        GameEvent::CompanionJoined { .. } => Some(Cue::Companion),
        GameEvent::LevelEntered { index: 0 } => None,
        GameEvent::LevelEntered { .. } => Some(Cue::LevelClear),
        GameEvent::GameFinished => Some(Cue::Finish),
    }
}

#[cfg(feature = "sound")]
mod inner {
    use std::io::Cursor;
    use std::sync::Arc;

    use rodio::{OutputStream, OutputStreamHandle, Sink};

    use super::Cue;

    pub(super) const SAMPLE_RATE: u32 = 22050;

    const TAU: f32 = std::f32::consts::PI * 2.0;

    /// Pre-generated WAV buffers for each cue.
    pub struct SoundEngine {
        _stream: OutputStream,
        handle: OutputStreamHandle,
        sfx_key: Arc<Vec<u8>>,
        sfx_door: Arc<Vec<u8>>,
        sfx_companion: Arc<Vec<u8>>,
        sfx_clear: Arc<Vec<u8>>,
        sfx_finish: Arc<Vec<u8>>,
    }

    impl SoundEngine {
        pub fn new() -> Option<Self> {
            let (stream, handle) = match OutputStream::try_default() {
                Ok(pair) => pair,
                Err(e) => {
                    log::info!("no audio output: {e}");
                    return None;
                }
            };

            Some(SoundEngine {
                _stream: stream,
                handle,
                sfx_key: Arc::new(make_wav(&gen_key())),
                sfx_door: Arc::new(make_wav(&gen_door())),
                sfx_companion: Arc::new(make_wav(&gen_companion())),
                sfx_clear: Arc::new(make_wav(&gen_clear())),
                sfx_finish: Arc::new(make_wav(&gen_finish())),
            })
        }

        pub fn play(&self, cue: Cue) {
            let buf = match cue {
                Cue::Key => &self.sfx_key,
                Cue::Door => &self.sfx_door,
                Cue::Companion => &self.sfx_companion,
                Cue::LevelClear => &self.sfx_clear,
                Cue::Finish => &self.sfx_finish,
            };
            match Sink::try_new(&self.handle) {
                Ok(sink) => {
                    let cursor = Cursor::new(buf.as_ref().clone());
                    match rodio::Decoder::new(cursor) {
                        Ok(src) => {
                            sink.append(src);
                            sink.detach(); // fire-and-forget
                        }
                        Err(e) => log::warn!("could not decode {cue:?}: {e}"),
                    }
                }
                Err(e) => log::warn!("could not open sink for {cue:?}: {e}"),
            }
        }
    }

    // ════════════════════════════════════════════════════════════
    //  Waveform generators: all produce Vec<f32> mono samples
    // ════════════════════════════════════════════════════════════

    /// A run of notes, each `(freq, seconds)`, with a fixed harmonic mix.
    /// `harmonics` holds (multiple, weight) pairs.
    pub(super) fn gen_notes(notes: &[(f32, f32)], harmonics: &[(f32, f32)], volume: f32) -> Vec<f32> {
        let mut samples = Vec::new();
        for &(freq, dur) in notes {
            let n = (SAMPLE_RATE as f32 * dur) as usize;
            for i in 0..n {
                let t = i as f32 / SAMPLE_RATE as f32;
                let env = 1.0 - (i as f32 / n as f32).powf(0.5);
                let wave: f32 = harmonics
                    .iter()
                    .map(|&(mult, weight)| (t * freq * mult * TAU).sin() * weight)
                    .sum();
                samples.push(wave * env * volume);
            }
        }
        samples
    }

    /// Key pickup: bright two-note ping E6→B6
    fn gen_key() -> Vec<f32> {
        gen_notes(&[(1319.0, 0.04), (1976.0, 0.08)], &[(1.0, 0.7), (3.0, 0.3)], 0.25)
    }

    /// Door: low creak, a noisy tone sliding downward
    fn gen_door() -> Vec<f32> {
        let duration = 0.22;
        let n = (SAMPLE_RATE as f32 * duration) as usize;
        let mut rng: u32 = 2024;
        (0..n)
            .map(|i| {
                let t = i as f32 / n as f32;
                let freq = 180.0 - t * 90.0;
                let ti = i as f32 / SAMPLE_RATE as f32;
                let tone = (ti * freq * TAU).sin();
                // Simple LCG noise
                rng = rng.wrapping_mul(1103515245).wrapping_add(12345);
                let noise = (rng as f32 / u32::MAX as f32) * 2.0 - 1.0;
                let env = (1.0 - t).powf(0.7);
                (tone * 0.7 + noise * 0.3) * env * 0.3
            })
            .collect()
    }

    /// Companion joins: rising chirp G5→C6→E6
    fn gen_companion() -> Vec<f32> {
        gen_notes(
            &[(784.0, 0.05), (1047.0, 0.05), (1319.0, 0.1)],
            &[(1.0, 0.8), (2.0, 0.2)],
            0.25,
        )
    }

    /// Level clear: ascending fanfare C5→E5→G5→C6
    fn gen_clear() -> Vec<f32> {
        gen_notes(
            &[(523.0, 0.1), (659.0, 0.1), (784.0, 0.1), (1047.0, 0.25)],
            &[(1.0, 0.6), (2.0, 0.3), (3.0, 0.1)],
            0.3,
        )
    }

    /// Game finished: the fanfare twice, the second time an octave up
    fn gen_finish() -> Vec<f32> {
        let mut samples = gen_clear();
        samples.extend(gen_notes(
            &[(1047.0, 0.1), (1319.0, 0.1), (1568.0, 0.1), (2093.0, 0.4)],
            &[(1.0, 0.7), (2.0, 0.3)],
            0.3,
        ));
        samples
    }

    // ════════════════════════════════════════════════════════════
    //  WAV encoder: wraps f32 samples into a valid WAV buffer
    // ════════════════════════════════════════════════════════════

    pub(super) fn make_wav(samples: &[f32]) -> Vec<u8> {
        let num_channels: u16 = 1;
        let bits_per_sample: u16 = 16;
        let byte_rate = SAMPLE_RATE * (num_channels as u32) * (bits_per_sample as u32) / 8;
        let block_align = num_channels * bits_per_sample / 8;
        let data_size = samples.len() as u32 * 2; // 16-bit = 2 bytes per sample
        let file_size = 36 + data_size;

        let mut buf = Vec::with_capacity(44 + data_size as usize);

        // RIFF header
        buf.extend_from_slice(b"RIFF");
        buf.extend_from_slice(&file_size.to_le_bytes());
        buf.extend_from_slice(b"WAVE");

        // fmt chunk
        buf.extend_from_slice(b"fmt ");
        buf.extend_from_slice(&16u32.to_le_bytes()); // chunk size
        buf.extend_from_slice(&1u16.to_le_bytes());  // PCM format
        buf.extend_from_slice(&num_channels.to_le_bytes());
        buf.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
        buf.extend_from_slice(&byte_rate.to_le_bytes());
        buf.extend_from_slice(&block_align.to_le_bytes());
        buf.extend_from_slice(&bits_per_sample.to_le_bytes());

        // data chunk
        buf.extend_from_slice(b"data");
        buf.extend_from_slice(&data_size.to_le_bytes());

        for &s in samples {
            let val = (s.clamp(-1.0, 1.0) * 32767.0) as i16;
            buf.extend_from_slice(&val.to_le_bytes());
        }

        buf
    }
}

// ════════════════════════════════════════════════════════════
//  Public API, compiling to no-ops when sound feature is off
// ════════════════════════════════════════════════════════════

#[cfg(feature = "sound")]
pub use inner::SoundEngine;

#[cfg(not(feature = "sound"))]
pub struct SoundEngine;

#[cfg(not(feature = "sound"))]
impl SoundEngine {
    pub fn new() -> Option<Self> { Some(SoundEngine) }
    pub fn play(&self, _cue: Cue) {}
}

impl SoundEngine {
    pub fn play_event(&self, event: &GameEvent) {
        if let Some(cue) = cue_for(event) {
            self.play(cue);
        }
    }
}
