//! Unified and verified script artifacts.
//!
//! Sections are a sum type rather than one dict-shaped struct with optional
//! fields: a `pre_clip`/`post_clip` section always carries a `clip_id`, a
//! `video_clip` section never carries `script_content`, and the compiler
//! should say so.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Intro,
    PreClip,
    VideoClip,
    PostClip,
    Outro,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "section_type", rename_all = "snake_case")]
pub enum Section {
    Intro {
        section_id: String,
        script_content: String,
        audio_tone: String,
        estimated_duration: f64,
    },
    PreClip {
        section_id: String,
        script_content: String,
        audio_tone: String,
        estimated_duration: f64,
        clip_id: String,
    },
    VideoClip {
        section_id: String,
        clip_id: String,
        start_time: f64,
        end_time: f64,
        #[serde(skip_serializing_if = "Option::is_none")]
        title: Option<String>,
    },
    PostClip {
        section_id: String,
        script_content: String,
        audio_tone: String,
        estimated_duration: f64,
        clip_id: String,
    },
    Outro {
        section_id: String,
        script_content: String,
        audio_tone: String,
        estimated_duration: f64,
    },
}

impl Section {
    pub fn kind(&self) -> SectionKind {
        match self {
            Section::Intro { .. } => SectionKind::Intro,
            Section::PreClip { .. } => SectionKind::PreClip,
            Section::VideoClip { .. } => SectionKind::VideoClip,
            Section::PostClip { .. } => SectionKind::PostClip,
            Section::Outro { .. } => SectionKind::Outro,
        }
    }

    pub fn section_id(&self) -> &str {
        match self {
            Section::Intro { section_id, .. }
            | Section::PreClip { section_id, .. }
            | Section::VideoClip { section_id, .. }
            | Section::PostClip { section_id, .. }
            | Section::Outro { section_id, .. } => section_id,
        }
    }

    pub fn clip_id(&self) -> Option<&str> {
        match self {
            Section::PreClip { clip_id, .. }
            | Section::VideoClip { clip_id, .. }
            | Section::PostClip { clip_id, .. } => Some(clip_id),
            _ => None,
        }
    }

    pub fn script_content(&self) -> Option<&str> {
        match self {
            Section::Intro { script_content, .. }
            | Section::PreClip { script_content, .. }
            | Section::PostClip { script_content, .. }
            | Section::Outro { script_content, .. } => Some(script_content),
            Section::VideoClip { .. } => None,
        }
    }

    /// Returns a copy of this section with `script_content` replaced, used
    /// by rebuttal verification to rewrite narration bodies without
    /// touching any other field. No-op on `video_clip` sections.
    pub fn with_script_content(&self, content: impl Into<String>) -> Section {
        let content = content.into();
        match self.clone() {
            Section::Intro { section_id, audio_tone, estimated_duration, .. } => {
                Section::Intro { section_id, script_content: content, audio_tone, estimated_duration }
            },
            Section::PreClip { section_id, audio_tone, estimated_duration, clip_id, .. } => {
                Section::PreClip {
                    section_id,
                    script_content: content,
                    audio_tone,
                    estimated_duration,
                    clip_id,
                }
            },
            Section::PostClip { section_id, audio_tone, estimated_duration, clip_id, .. } => {
                Section::PostClip {
                    section_id,
                    script_content: content,
                    audio_tone,
                    estimated_duration,
                    clip_id,
                }
            },
            Section::Outro { section_id, audio_tone, estimated_duration, .. } => {
                Section::Outro { section_id, script_content: content, audio_tone, estimated_duration }
            },
            other @ Section::VideoClip { .. } => other,
        }
    }

    /// Equality of every field the rebuttal invariant freezes: everything
    /// except `script_content`.
    pub fn structurally_equal(&self, other: &Section) -> bool {
        match (self, other) {
            (
                Section::Intro { section_id: a, .. },
                Section::Intro { section_id: b, .. },
            ) => a == b,
            (
                Section::Outro { section_id: a, .. },
                Section::Outro { section_id: b, .. },
            ) => a == b,
            (
                Section::PreClip { section_id: a, clip_id: ca, .. },
                Section::PreClip { section_id: b, clip_id: cb, .. },
            ) => a == b && ca == cb,
            (
                Section::PostClip { section_id: a, clip_id: ca, .. },
                Section::PostClip { section_id: b, clip_id: cb, .. },
            ) => a == b && ca == cb,
            (
                Section::VideoClip {
                    section_id: a,
                    clip_id: ca,
                    start_time: sa,
                    end_time: ea,
                    ..
                },
                Section::VideoClip {
                    section_id: b,
                    clip_id: cb,
                    start_time: sb,
                    end_time: eb,
                    ..
                },
            ) => a == b && ca == cb && sa == sb && ea == eb,
            _ => false,
        }
    }
}

/// Shared validation for both unified and verified scripts: the adjacency
/// and uniqueness invariants from §3 that do not depend on pass-2 data.
fn validate_structure(sections: &[Section]) -> Result<(), String> {
    if sections.is_empty() {
        return Err("script has no sections".into());
    }
    if !matches!(sections.first().unwrap().kind(), SectionKind::Intro) {
        return Err("script must begin with exactly one intro section".into());
    }
    if !matches!(sections.last().unwrap().kind(), SectionKind::Outro) {
        return Err("script must end with exactly one outro section".into());
    }
    let intro_count = sections.iter().filter(|s| s.kind() == SectionKind::Intro).count();
    let outro_count = sections.iter().filter(|s| s.kind() == SectionKind::Outro).count();
    if intro_count != 1 {
        return Err(format!("expected exactly one intro section, found {intro_count}"));
    }
    if outro_count != 1 {
        return Err(format!("expected exactly one outro section, found {outro_count}"));
    }

    let mut seen_ids = std::collections::HashSet::new();
    for section in sections {
        if !seen_ids.insert(section.section_id()) {
            return Err(format!("duplicate section_id {}", section.section_id()));
        }
    }

    for (i, section) in sections.iter().enumerate() {
        if section.kind() != SectionKind::VideoClip {
            continue;
        }
        let clip_id = section.clip_id().expect("video_clip sections always carry a clip_id");

        let prev = i.checked_sub(1).and_then(|j| sections.get(j));
        match prev {
            Some(Section::PreClip { clip_id: prev_clip, .. }) if prev_clip == clip_id => {},
            _ => {
                return Err(format!(
                    "video_clip section {} at index {i} is not preceded by a matching pre_clip",
                    section.section_id()
                ));
            },
        }

        let next = sections.get(i + 1);
        match next {
            Some(Section::PostClip { clip_id: next_clip, .. }) if next_clip == clip_id => {},
            _ => {
                return Err(format!(
                    "video_clip section {} at index {i} is not followed by a matching post_clip",
                    section.section_id()
                ));
            },
        }
    }

    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct UnifiedScript {
    pub sections: Vec<Section>,
}

impl UnifiedScript {
    pub fn validate(&self) -> Result<(), String> {
        validate_structure(&self.sections)
    }

    /// Every `clip_id` referenced by a `video_clip` section must exist in
    /// the pass-2 filtered set.
    pub fn validate_clip_ids_against(
        &self,
        pass2: &crate::analysis::Pass2Analysis,
    ) -> Result<(), String> {
        for section in &self.sections {
            if let Some(clip_id) = section.clip_id() {
                if section.kind() == SectionKind::VideoClip && !pass2.contains(clip_id) {
                    return Err(format!(
                        "unified_script references clip_id {clip_id} which is not in pass2_filtered"
                    ));
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct VerifiedScript {
    pub sections: Vec<Section>,
}

impl VerifiedScript {
    pub fn validate(&self) -> Result<(), String> {
        validate_structure(&self.sections)
    }

    /// Structural-preservation invariant (§4.6, §8): identical to the
    /// unified script in every field except `script_content`.
    pub fn validate_preserves_structure_of(&self, unified: &UnifiedScript) -> Result<(), String> {
        if self.sections.len() != unified.sections.len() {
            return Err(format!(
                "verified_script has {} sections, unified_script has {}",
                self.sections.len(),
                unified.sections.len()
            ));
        }
        for (i, (verified, original)) in self.sections.iter().zip(&unified.sections).enumerate() {
            if !verified.structurally_equal(original) {
                return Err(format!(
                    "verified_script section {i} ({}) diverges structurally from unified_script",
                    verified.section_id()
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn happy_path_sections() -> Vec<Section> {
        vec![
            Section::Intro {
                section_id: "s0".into(),
                script_content: "welcome".into(),
                audio_tone: "upbeat".into(),
                estimated_duration: 10.0,
            },
            Section::PreClip {
                section_id: "s1".into(),
                script_content: "here's clip one".into(),
                audio_tone: "neutral".into(),
                estimated_duration: 5.0,
                clip_id: "seg-1".into(),
            },
            Section::VideoClip {
                section_id: "s2".into(),
                clip_id: "seg-1".into(),
                start_time: 10.0,
                end_time: 20.0,
                title: None,
            },
            Section::PostClip {
                section_id: "s3".into(),
                script_content: "that happened".into(),
                audio_tone: "neutral".into(),
                estimated_duration: 5.0,
                clip_id: "seg-1".into(),
            },
            Section::Outro {
                section_id: "s4".into(),
                script_content: "goodbye".into(),
                audio_tone: "calm".into(),
                estimated_duration: 8.0,
            },
        ]
    }

    #[test]
    fn validate_accepts_well_formed_script() {
        let script = UnifiedScript { sections: happy_path_sections() };
        assert!(script.validate().is_ok());
    }

    #[test]
    fn validate_rejects_video_clip_without_pre_clip() {
        let mut sections = happy_path_sections();
        sections.remove(1); // drop the pre_clip
        let script = UnifiedScript { sections };
        assert!(script.validate().is_err());
    }

    #[test]
    fn validate_rejects_mismatched_clip_id() {
        let mut sections = happy_path_sections();
        if let Section::PostClip { clip_id, .. } = &mut sections[3] {
            *clip_id = "seg-2".into();
        }
        let script = UnifiedScript { sections };
        assert!(script.validate().is_err());
    }

    #[test]
    fn structural_preservation_allows_script_content_changes_only() {
        let unified = UnifiedScript { sections: happy_path_sections() };
        let mut verified_sections = happy_path_sections();
        verified_sections[3] = verified_sections[3].with_script_content("corrected claim");
        let verified = VerifiedScript { sections: verified_sections };
        assert!(verified.validate_preserves_structure_of(&unified).is_ok());
    }

    #[test]
    fn structural_preservation_rejects_timing_change() {
        let unified = UnifiedScript { sections: happy_path_sections() };
        let mut verified_sections = happy_path_sections();
        if let Section::VideoClip { end_time, .. } = &mut verified_sections[2] {
            *end_time += 1.0;
        }
        let verified = VerifiedScript { sections: verified_sections };
        assert!(verified.validate_preserves_structure_of(&unified).is_err());
    }
}
