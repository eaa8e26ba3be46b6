/// Sound engine: procedural sound cues via rodio.
///
/// Five cues cover the whole game: click (rotation, placement, menu),
/// slide (tiles and returned fragments), lock (ring turns, mismatches),
/// correct (pad presses, level complete), win (unlock, game complete).
/// All buffers are generated as in-memory WAVs at init time; playback
/// is fire-and-forget via detached sinks, and any audio failure leaves
/// the game silent rather than broken.
///
/// Compile without the "sound" feature to stub the engine out entirely.

#[cfg(feature = "sound")]
mod inner {
    use std::io::Cursor;
    use std::sync::Arc;

    use rodio::{OutputStream, OutputStreamHandle, Sink};

    const SAMPLE_RATE: u32 = 22050;
    const TAU: f32 = 2.0 * std::f32::consts::PI;

    /// Pre-generated WAV buffers for each cue.
    pub struct SoundEngine {
        _stream: OutputStream,
        handle: OutputStreamHandle,
        sfx_click: Arc<Vec<u8>>,
        sfx_slide: Arc<Vec<u8>>,
        sfx_lock: Arc<Vec<u8>>,
        sfx_correct: Arc<Vec<u8>>,
        sfx_win: Arc<Vec<u8>>,
    }

    impl SoundEngine {
        pub fn new() -> Option<Self> {
            let (stream, handle) = OutputStream::try_default().ok()?;

            Some(SoundEngine {
                _stream: stream,
                handle,
                sfx_click: Arc::new(make_wav(&gen_click())),
                sfx_slide: Arc::new(make_wav(&gen_slide())),
                sfx_lock: Arc::new(make_wav(&gen_lock())),
                sfx_correct: Arc::new(make_wav(&gen_correct())),
                sfx_win: Arc::new(make_wav(&gen_win())),
            })
        }

        fn play(&self, buf: &Arc<Vec<u8>>) {
            if let Ok(sink) = Sink::try_new(&self.handle) {
                let cursor = Cursor::new(buf.as_ref().clone());
                if let Ok(src) = rodio::Decoder::new(cursor) {
                    sink.append(src);
                    sink.detach(); // fire-and-forget
                }
            }
        }

        pub fn play_click(&self) { self.play(&self.sfx_click); }
        pub fn play_slide(&self) { self.play(&self.sfx_slide); }
        pub fn play_lock(&self) { self.play(&self.sfx_lock); }
        pub fn play_correct(&self) { self.play(&self.sfx_correct); }
        pub fn play_win(&self) { self.play(&self.sfx_win); }
    }

    // ════════════════════════════════════════════════════════════
    //  Waveform generators — all produce Vec<f32> mono samples
    // ════════════════════════════════════════════════════════════

    /// Click: wood-block tap, a sine sweeping 800Hz → 100Hz over 100ms.
    fn gen_click() -> Vec<f32> {
        let duration = 0.1;
        let n = (SAMPLE_RATE as f32 * duration) as usize;
        let mut phase = 0.0_f32;
        (0..n)
            .map(|i| {
                let t = i as f32 / n as f32;
                // Exponential-ish frequency fall keeps the tap woody.
                let freq = 800.0 * (100.0_f32 / 800.0).powf(t);
                phase += freq * TAU / SAMPLE_RATE as f32;
                let env = (1.0 - t).powf(2.0);
                phase.sin() * env * 0.3
            })
            .collect()
    }

    /// Slide: paper-on-paper noise, lowpassed and fading over 200ms.
    fn gen_slide() -> Vec<f32> {
        let duration = 0.2;
        let n = (SAMPLE_RATE as f32 * duration) as usize;
        let mut rng: u32 = 0x2F6E2B1;
        let mut filtered = 0.0_f32;
        (0..n)
            .map(|i| {
                let t = i as f32 / n as f32;
                // LCG noise through a one-pole lowpass ≈ 400Hz
                rng = rng.wrapping_mul(1103515245).wrapping_add(12345);
                let noise = (rng as f32 / u32::MAX as f32) * 2.0 - 1.0;
                filtered += 0.11 * (noise - filtered);
                filtered * (1.0 - t) * 0.35
            })
            .collect()
    }

    /// Lock: one mechanical tumbler tick, a 200Hz square over 50ms.
    fn gen_lock() -> Vec<f32> {
        let duration = 0.05;
        let n = (SAMPLE_RATE as f32 * duration) as usize;
        (0..n)
            .map(|i| {
                let t = i as f32 / SAMPLE_RATE as f32;
                let wave = if (t * 200.0 * TAU).sin() >= 0.0 { 1.0 } else { -1.0 };
                let env = (1.0 - i as f32 / n as f32).powf(1.5);
                wave * env * 0.12
            })
            .collect()
    }

    /// Correct: soft C-major chime, three sines staggered 50ms apart.
    fn gen_correct() -> Vec<f32> {
        let notes = [523.25_f32, 659.25, 783.99]; // C5, E5, G5
        let note_dur = 0.7;
        let stagger = 0.05;
        let total = note_dur + stagger * (notes.len() - 1) as f32;
        let mut samples = vec![0.0; (SAMPLE_RATE as f32 * total) as usize];
        for (i, &freq) in notes.iter().enumerate() {
            let start = (SAMPLE_RATE as f32 * stagger * i as f32) as usize;
            mix_at(&mut samples, start, &gen_tone(freq, note_dur, 0.12, sine));
        }
        samples
    }

    /// Win: an ethereal five-note chord, triangles staggered 100ms.
    fn gen_win() -> Vec<f32> {
        let notes = [523.25_f32, 659.25, 783.99, 1046.50, 1318.51];
        let note_dur = 1.6;
        let stagger = 0.1;
        let total = note_dur + stagger * (notes.len() - 1) as f32;
        let mut samples = vec![0.0; (SAMPLE_RATE as f32 * total) as usize];
        for (i, &freq) in notes.iter().enumerate() {
            let start = (SAMPLE_RATE as f32 * stagger * i as f32) as usize;
            mix_at(&mut samples, start, &gen_tone(freq, note_dur, 0.08, triangle));
        }
        samples
    }

    fn sine(t: f32, freq: f32) -> f32 {
        (t * freq * TAU).sin()
    }

    fn triangle(t: f32, freq: f32) -> f32 {
        let cycle = t * freq - (t * freq + 0.5).floor();
        4.0 * cycle.abs() - 1.0
    }

    /// One enveloped note: quick attack, long decay.
    fn gen_tone(freq: f32, duration: f32, volume: f32, wave: fn(f32, f32) -> f32) -> Vec<f32> {
        let n = (SAMPLE_RATE as f32 * duration) as usize;
        (0..n)
            .map(|i| {
                let t = i as f32 / SAMPLE_RATE as f32;
                let p = i as f32 / n as f32;
                let env = if p < 0.05 { p / 0.05 } else { (1.0 - p).powf(1.8) };
                wave(t, freq) * env * volume
            })
            .collect()
    }

    /// Additively mix `note` into `samples` starting at `start`.
    fn mix_at(samples: &mut [f32], start: usize, note: &[f32]) {
        for (i, &s) in note.iter().enumerate() {
            if let Some(slot) = samples.get_mut(start + i) {
                *slot += s;
            }
        }
    }

    // ════════════════════════════════════════════════════════════
    //  WAV encoder — wraps f32 samples into a valid WAV buffer
    // ════════════════════════════════════════════════════════════

    fn make_wav(samples: &[f32]) -> Vec<u8> {
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
        buf.extend_from_slice(&1u16.to_le_bytes()); // PCM format
        buf.extend_from_slice(&num_channels.to_le_bytes());
        buf.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
        buf.extend_from_slice(&byte_rate.to_le_bytes());
        buf.extend_from_slice(&block_align.to_le_bytes());
        buf.extend_from_slice(&bits_per_sample.to_le_bytes());

        // data chunk
        buf.extend_from_slice(b"data");
        buf.extend_from_slice(&data_size.to_le_bytes());

        for &s in samples {
            let clamped = s.max(-1.0).min(1.0);
            let val = (clamped * 32767.0) as i16;
            buf.extend_from_slice(&val.to_le_bytes());
        }

        buf
    }
}

// ════════════════════════════════════════════════════════════
//  Public API — compiles to no-ops when sound feature is off
// ════════════════════════════════════════════════════════════

#[cfg(feature = "sound")]
pub use inner::SoundEngine;

#[cfg(not(feature = "sound"))]
pub struct SoundEngine;

#[cfg(not(feature = "sound"))]
impl SoundEngine {
    pub fn new() -> Option<Self> {
        Some(SoundEngine)
    }
    pub fn play_click(&self) {}
    pub fn play_slide(&self) {}
    pub fn play_lock(&self) {}
    pub fn play_correct(&self) {}
    pub fn play_win(&self) {}
}
