use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use sonic_graph::mapping::{MappingConfig, Spacing};
use sonic_graph::tonal::{NoteName, Scale};

/// Play a note-link graph as music
#[derive(Debug, Parser)]
#[command(name = "sonic-graph", version, about)]
pub struct Cli {
    /// Graph export: a JSON array of nodes. A demo vault is used when omitted.
    #[arg(short, long, value_name = "FILE")]
    pub graph: Option<PathBuf>,

    /// Mapping settings (TOML). Flags below override it.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Notes in the demo vault
    #[arg(long, default_value_t = 48)]
    pub demo_size: usize,

    /// Play only the neighborhood of this node id (local soundscape)
    #[arg(long, value_name = "ID")]
    pub center: Option<String>,

    /// Link hops included around --center
    #[arg(long, default_value_t = 2, requires = "center")]
    pub depth: usize,

    /// Scale name, e.g. dorian or minor-pentatonic
    #[arg(long)]
    pub scale: Option<Scale>,

    /// Tonic, e.g. C, F#, Bb
    #[arg(long)]
    pub root: Option<NoteName>,

    /// Octave of the tonic
    #[arg(long)]
    pub octave: Option<i32>,

    /// Re-roll seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Seconds from first to last note
    #[arg(long, value_name = "SECONDS")]
    pub duration: Option<f64>,

    /// Seconds before phrase and size adjustments
    #[arg(long, value_name = "SECONDS")]
    pub base_duration: Option<f64>,

    #[arg(long, value_enum)]
    pub spacing: Option<SpacingArg>,

    /// Log notes instead of opening an audio device
    #[arg(long)]
    pub no_audio: bool,

    /// Play without the terminal UI, logging to stderr
    #[arg(long)]
    pub headless: bool,

    /// Write logs to this file (the only way to see logs with the UI)
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SpacingArg {
    Chronological,
    Sequential,
}

impl From<SpacingArg> for Spacing {
    fn from(arg: SpacingArg) -> Self {
        match arg {
            SpacingArg::Chronological => Spacing::Chronological,
            SpacingArg::Sequential => Spacing::Sequential,
        }
    }
}

impl Cli {
    /// Apply flag overrides on top of file or default settings
    pub fn apply(&self, mut config: MappingConfig) -> MappingConfig {
        if let Some(scale) = self.scale {
            config.scale = scale;
        }
        if let Some(root) = self.root {
            config.root_note = root;
        }
        if let Some(octave) = self.octave {
            config.root_octave = octave;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if let Some(duration) = self.duration {
            config.timeline.total_duration = duration;
        }
        if let Some(base) = self.base_duration {
            config.base_duration = base;
        }
        if let Some(spacing) = self.spacing {
            config.timeline.spacing = spacing.into();
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_config() {
        let cli = Cli::parse_from([
            "sonic-graph",
            "--scale",
            "minor_pentatonic",
            "--root",
            "f#",
            "--seed",
            "7",
            "--spacing",
            "sequential",
        ]);
        let config = cli.apply(MappingConfig::default().base_duration(0.5));

        assert_eq!(config.scale, Scale::MinorPentatonic);
        assert_eq!(config.root_note, NoteName::Fs);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.timeline.spacing, Spacing::Sequential);
        assert_eq!(config.base_duration, 0.5);
    }

    #[test]
    fn bad_scale_is_a_parse_error() {
        assert!(Cli::try_parse_from(["sonic-graph", "--scale", "klingon"]).is_err());
    }

    #[test]
    fn depth_requires_center() {
        assert!(Cli::try_parse_from(["sonic-graph", "--depth", "3"]).is_err());
    }
}
