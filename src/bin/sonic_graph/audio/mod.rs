//! Sound output: a cpal stream running [`PolySynth`], fed through an rtrb
//! ring from the scheduler thread.

mod envelope;
mod synth;

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use rtrb::{Producer, RingBuffer};

use sonic_graph::scheduler::{AudioSink, PlaybackMessage, SinkError};
use sonic_graph::NoteMapping;

use synth::PolySynth;

const MAX_VOICES: usize = 24;
const QUEUE_CAPACITY: usize = 256;
/// Frames rendered per synth call
const MAX_BLOCK_SIZE: usize = 2048;

/// Where the player sends notes
pub enum Output {
    Device(DeviceOutput),
    /// No sound; notes are only logged
    Log,
}

impl Output {
    /// Open the default device, falling back to logging when that fails.
    pub fn open(enabled: bool) -> Self {
        if !enabled {
            tracing::info!("audio disabled; notes will be logged");
            return Output::Log;
        }
        match DeviceOutput::open() {
            Ok(device) => Output::Device(device),
            Err(err) => {
                tracing::warn!(error = %err, "no audio output; notes will be logged");
                Output::Log
            }
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Output::Device(device) => format!("{:.1} kHz", device.sample_rate / 1000.0),
            Output::Log => "log only".to_string(),
        }
    }

    /// Release everything still sounding
    pub fn silence(&mut self) {
        if let Output::Device(device) = self {
            if device.tx.push(PlaybackMessage::AllNotesOff).is_err() {
                tracing::warn!("audio queue full; could not silence voices");
            }
        }
    }
}

impl AudioSink for Output {
    fn play_note_immediate(&mut self, note: &NoteMapping, timestamp: f64) -> Result<(), SinkError> {
        match self {
            Output::Device(device) => device.tx.play_note_immediate(note, timestamp),
            Output::Log => {
                tracing::info!(
                    node = %note.node_id,
                    pitch = format_args!("{:.2}", note.pitch),
                    duration = format_args!("{:.2}", note.duration),
                    velocity = format_args!("{:.2}", note.velocity),
                    instrument = %note.instrument,
                    at = timestamp,
                    "note"
                );
                Ok(())
            }
        }
    }
}

pub struct DeviceOutput {
    // Dropping the stream stops playback
    _stream: cpal::Stream,
    tx: Producer<PlaybackMessage>,
    sample_rate: f32,
}

impl DeviceOutput {
    fn open() -> EyreResult<Self> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| eyre!("no default output device available"))?;
        let config = device
            .default_output_config()
            .wrap_err("failed to fetch default output config")?;

        let sample_rate = config.sample_rate().0 as f32;
        let channels = config.channels() as usize;

        let (tx, rx) = RingBuffer::<PlaybackMessage>::new(QUEUE_CAPACITY);
        let mut synth = PolySynth::new(sample_rate, MAX_VOICES, rx);
        let mut block = vec![0.0f32; MAX_BLOCK_SIZE];

        let stream = device
            .build_output_stream(
                &config.into(),
                move |data: &mut [f32], _| {
                    // Mono synth copied to every channel
                    for frames in data.chunks_mut(MAX_BLOCK_SIZE * channels) {
                        let count = frames.len() / channels;
                        let mono = &mut block[..count];
                        synth.render_block(mono);
                        for (frame, &sample) in frames.chunks_mut(channels).zip(mono.iter()) {
                            frame.fill(sample);
                        }
                    }
                },
                |err| tracing::error!(error = %err, "audio stream error"),
                None,
            )
            .wrap_err("failed to build output stream")?;
        stream.play().wrap_err("failed to start output stream")?;

        tracing::info!(sample_rate, channels, "audio output running");

        Ok(Self {
            _stream: stream,
            tx,
            sample_rate,
        })
    }
}
