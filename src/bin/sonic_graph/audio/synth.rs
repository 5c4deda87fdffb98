use std::f32::consts::TAU;

use sonic_graph::mapping::InstrumentFamily;
use sonic_graph::scheduler::{MessageReceiver, PlaybackMessage};

use super::envelope::Envelope;

/// Per-voice output scale so a full chord stays below clipping
const VOICE_GAIN: f32 = 0.2;

/// Oscillator shape, picked from the note's instrument family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Triangle,
    Saw,
    Square,
}

impl Waveform {
    pub fn for_family(family: Option<InstrumentFamily>) -> Self {
        match family {
            Some(InstrumentFamily::Keyboard) | None => Waveform::Triangle,
            Some(InstrumentFamily::Strings) | Some(InstrumentFamily::Brass) => Waveform::Saw,
            Some(InstrumentFamily::Woodwinds) | Some(InstrumentFamily::Experimental) => {
                Waveform::Sine
            }
            Some(InstrumentFamily::Electronic) => Waveform::Square,
        }
    }

    /// One sample at `phase` in 0..1
    fn sample(self, phase: f32) -> f32 {
        match self {
            Waveform::Sine => (phase * TAU).sin(),
            Waveform::Triangle => 4.0 * (phase - 0.5).abs() - 1.0,
            Waveform::Saw => 2.0 * phase - 1.0,
            Waveform::Square => {
                if phase < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
        }
    }
}

struct Voice {
    waveform: Waveform,
    phase: f32,
    /// Phase increment per sample
    step: f32,
    velocity: f32,
    /// Samples left before the gate closes
    gate_samples: u32,
    age: u64,
    envelope: Envelope,
}

impl Voice {
    fn new(sample_rate: f32) -> Self {
        Self {
            waveform: Waveform::Sine,
            phase: 0.0,
            step: 0.0,
            velocity: 0.0,
            gate_samples: 0,
            age: 0,
            envelope: Envelope::adsr(sample_rate, 0.01, 0.12, 0.7, 0.25),
        }
    }

    fn start(
        &mut self,
        frequency: f32,
        velocity: f32,
        gate_samples: u32,
        waveform: Waveform,
        age: u64,
        sample_rate: f32,
    ) {
        self.waveform = waveform;
        self.phase = 0.0;
        self.step = frequency / sample_rate;
        self.velocity = velocity.clamp(0.0, 1.0);
        self.gate_samples = gate_samples.max(1);
        self.age = age;
        self.envelope.gate_on();
    }

    fn release(&mut self) {
        self.gate_samples = 0;
        self.envelope.gate_off();
    }

    fn render_add(&mut self, out: &mut [f32]) {
        for sample in out.iter_mut() {
            if self.gate_samples > 0 {
                self.gate_samples -= 1;
                if self.gate_samples == 0 {
                    self.envelope.gate_off();
                }
            }
            let level = self.envelope.next_level();
            *sample += self.waveform.sample(self.phase) * level * self.velocity * VOICE_GAIN;
            self.phase = (self.phase + self.step).fract();
        }
    }

    fn is_free(&self) -> bool {
        !self.envelope.is_active()
    }
}

/// Fixed-size polyphonic synth driven by [`PlaybackMessage`]s.
///
/// Runs inside the audio callback: no allocation after construction.
pub struct PolySynth<R: MessageReceiver> {
    voices: Vec<Voice>,
    rx: R,
    sample_rate: f32,
    frame_counter: u64,
}

impl<R: MessageReceiver> PolySynth<R> {
    pub fn new(sample_rate: f32, max_voices: usize, rx: R) -> Self {
        Self {
            voices: (0..max_voices.max(1)).map(|_| Voice::new(sample_rate)).collect(),
            rx,
            sample_rate,
            frame_counter: 0,
        }
    }

    pub fn render_block(&mut self, out: &mut [f32]) {
        while let Some(msg) = self.rx.pop() {
            match msg {
                PlaybackMessage::NoteOn {
                    frequency,
                    velocity,
                    duration,
                    family,
                } => {
                    let gate = (duration.max(0.0) * self.sample_rate) as u32;
                    let age = self.frame_counter;
                    let sample_rate = self.sample_rate;
                    let voice = self.allocate_voice();
                    voice.start(
                        frequency,
                        velocity,
                        gate,
                        Waveform::for_family(family),
                        age,
                        sample_rate,
                    );
                }
                PlaybackMessage::AllNotesOff => {
                    for voice in self.voices.iter_mut().filter(|v| !v.is_free()) {
                        voice.release();
                    }
                }
            }
        }

        out.fill(0.0);
        for voice in self.voices.iter_mut().filter(|v| !v.is_free()) {
            voice.render_add(out);
        }

        self.frame_counter += out.len() as u64;
    }

    #[cfg(test)]
    fn active_voices(&self) -> usize {
        self.voices.iter().filter(|v| !v.is_free()).count()
    }

    /// A free voice, else the oldest releasing one, else the oldest overall
    fn allocate_voice(&mut self) -> &mut Voice {
        let index = self
            .voices
            .iter()
            .position(Voice::is_free)
            .or_else(|| {
                self.voices
                    .iter()
                    .enumerate()
                    .filter(|(_, v)| v.envelope.is_releasing())
                    .min_by_key(|(_, v)| v.age)
                    .map(|(i, _)| i)
            })
            .or_else(|| {
                self.voices
                    .iter()
                    .enumerate()
                    .min_by_key(|(_, v)| v.age)
                    .map(|(i, _)| i)
            })
            .unwrap_or(0);

        let voice = &mut self.voices[index];
        voice.envelope.reset();
        voice
    }
}
