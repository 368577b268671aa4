//! Logical artifact names and their path-agnostic mapping onto the
//! workspace directory tree (§3 "Workspace layout").

use std::path::PathBuf;

/// A logical artifact name, resolved to a relative path by [`relative_path`].
/// Fixed, well-known names live as variants; the output/audio and
/// output/video families are per-`section_id` and use the `Output*`
/// variants with an owned name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LogicalName {
    OriginalAudio,
    OriginalVideo,
    Transcript,
    Pass1Analysis,
    Pass2Filtered,
    UnifiedScript,
    VerifiedScript,
    StageDebugDump(String),
    OutputAudio(String),
    OutputVideo(String),
    OutputFinal(String),
    /// One append-only newline-delimited-JSON file per run session (§4.8:
    /// "one session per file under the workspace").
    SessionLog(String),
}

impl LogicalName {
    pub fn relative_path(&self) -> PathBuf {
        match self {
            LogicalName::OriginalAudio => PathBuf::from("Input/original_audio"),
            LogicalName::OriginalVideo => PathBuf::from("Input/original_video"),
            LogicalName::Transcript => PathBuf::from("Processing/transcript.json"),
            LogicalName::Pass1Analysis => PathBuf::from("Processing/pass1_analysis.json"),
            LogicalName::Pass2Filtered => PathBuf::from("Processing/pass2_filtered.json"),
            LogicalName::UnifiedScript => PathBuf::from("Processing/unified_script.json"),
            LogicalName::VerifiedScript => PathBuf::from("Processing/verified_script.json"),
            LogicalName::StageDebugDump(name) => {
                PathBuf::from("Processing").join(format!("debug_{name}.json"))
            },
            LogicalName::OutputAudio(section_id) => {
                PathBuf::from("Output/Audio").join(section_id)
            },
            LogicalName::OutputVideo(section_id) => {
                PathBuf::from("Output/Video").join(section_id)
            },
            LogicalName::OutputFinal(filename) => PathBuf::from("Output/Final").join(filename),
            LogicalName::SessionLog(session_id) => {
                PathBuf::from(format!("session_log_{session_id}.ndjson"))
            },
        }
    }

    /// Top-level directories that must exist before any artifact under this
    /// name can be written.
    pub fn directories() -> &'static [&'static str] {
        &["Input", "Processing", "Output/Audio", "Output/Video", "Output/Final"]
    }
}
