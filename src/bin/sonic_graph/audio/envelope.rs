/*
Linear ADSR
===========

    level
      1 ┐   ╱╲
        │  ╱  ╲_________
      S │ ╱             ╲
      0 └╱───────────────╲──→ t
         A   D     S      R
             (gate high)  (gate low)

Each stage converts seconds to a per-sample step:

    step = change / (seconds * sample_rate)

Release always starts from the current level, so a note released during its
attack fades from wherever it got to instead of jumping.
*/

/// Shortest stage length, one sample at 48 kHz
const MIN_TIME: f32 = 1.0 / 48_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    Attack,
    Decay,
    Sustain,
    Release,
}

#[derive(Debug, Clone)]
pub struct Envelope {
    attack: f32,
    decay: f32,
    sustain: f32,
    release: f32,
    sample_rate: f32,

    stage: Stage,
    level: f32,
    release_from: f32,
    release_samples: u32,
    release_elapsed: u32,
}

impl Envelope {
    pub fn adsr(sample_rate: f32, attack: f32, decay: f32, sustain: f32, release: f32) -> Self {
        Self {
            attack: attack.max(MIN_TIME),
            decay: decay.max(MIN_TIME),
            sustain: sustain.clamp(0.0, 1.0),
            release: release.max(MIN_TIME),
            sample_rate,
            stage: Stage::Idle,
            level: 0.0,
            release_from: 0.0,
            release_samples: 1,
            release_elapsed: 0,
        }
    }

    /// Restart from silence so repeated notes stay distinct
    pub fn gate_on(&mut self) {
        self.level = 0.0;
        self.release_elapsed = 0;
        self.stage = Stage::Attack;
    }

    pub fn gate_off(&mut self) {
        if self.stage == Stage::Idle || self.stage == Stage::Release {
            return;
        }
        self.release_from = self.level;
        self.release_samples = (self.release * self.sample_rate).round().max(1.0) as u32;
        self.release_elapsed = 0;
        self.stage = Stage::Release;
    }

    pub fn next_level(&mut self) -> f32 {
        match self.stage {
            Stage::Idle => self.level = 0.0,
            Stage::Attack => {
                self.level += 1.0 / (self.attack * self.sample_rate);
                if self.level >= 1.0 {
                    self.level = 1.0;
                    self.stage = Stage::Decay;
                }
            }
            Stage::Decay => {
                self.level -= (1.0 - self.sustain) / (self.decay * self.sample_rate);
                if self.level <= self.sustain {
                    self.level = self.sustain;
                    self.stage = Stage::Sustain;
                }
            }
            Stage::Sustain => self.level = self.sustain,
            Stage::Release => {
                let progress = self.release_elapsed as f32 / self.release_samples as f32;
                self.level = (self.release_from * (1.0 - progress)).max(0.0);
                self.release_elapsed = self.release_elapsed.saturating_add(1);
                if self.release_elapsed >= self.release_samples {
                    self.level = 0.0;
                    self.stage = Stage::Idle;
                }
            }
        }
        self.level
    }

    pub fn is_active(&self) -> bool {
        self.stage != Stage::Idle
    }

    pub fn is_releasing(&self) -> bool {
        self.stage == Stage::Release
    }

    pub fn reset(&mut self) {
        self.stage = Stage::Idle;
        self.level = 0.0;
        self.release_elapsed = 0;
    }
}
