use serde::Serialize;

use super::record::PromptRecord;

pub const PREAMBLE: &str = "You are producing a Kling 2.6 talking-head video.";
pub const UPLOADED_AVATAR_SENTENCE: &str =
    "Use the uploaded avatar image as the exact face reference for the talent.";
pub const EXPORT_CONSTRAINTS: &str =
    "Export at 1080p, 16:9. Keep total duration under 60 seconds.";
pub const STORY_BEATS_LABEL: &str = "Story beats (follow sequentially):";
pub const NARRATION_LABEL: &str = "Narration script (match timing & lip sync):";
pub const CLOSING_PREFIX: &str = "Closing moment: ";
pub const NOTES_PREFIX: &str = "Production notes: ";
pub const ATTRIBUTION_PREFIX: &str = "Avatar reference attribution: ";

const SECTION_SEPARATOR: &str = "\n\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Preamble,
    AvatarIdentity,
    Attribution,
    Tone,
    Camera,
    LightingBackground,
    StoryBeats,
    Narration,
    Closing,
    ProductionNotes,
    Export,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComposedSection {
    pub kind: SectionKind,
    pub text: String,
}

type Renderer = fn(&PromptRecord) -> Option<String>;

// Evaluated top to bottom; a renderer returning None drops its section.
const SECTIONS: [(SectionKind, Renderer); 11] = [
    (SectionKind::Preamble, render_preamble),
    (SectionKind::AvatarIdentity, render_identity),
    (SectionKind::Attribution, render_attribution),
    (SectionKind::Tone, render_tone),
    (SectionKind::Camera, render_camera),
    (SectionKind::LightingBackground, render_lighting),
    (SectionKind::StoryBeats, render_story_beats),
    (SectionKind::Narration, render_narration),
    (SectionKind::Closing, render_closing),
    (SectionKind::ProductionNotes, render_notes),
    (SectionKind::Export, render_export),
];

fn render_preamble(_: &PromptRecord) -> Option<String> {
    Some(PREAMBLE.to_string())
}

fn render_identity(record: &PromptRecord) -> Option<String> {
    if record.has_avatar_image() {
        Some(UPLOADED_AVATAR_SENTENCE.to_string())
    } else {
        Some(named_avatar_sentence(
            &record.avatar_name,
            &record.role_description,
        ))
    }
}

fn render_attribution(record: &PromptRecord) -> Option<String> {
    non_empty(&record.avatar_attribution).map(|credits| format!("{ATTRIBUTION_PREFIX}{credits}."))
}

fn render_tone(record: &PromptRecord) -> Option<String> {
    Some(format!(
        "Voice & delivery tone: {}. Ensure syncing with the following narration script and keep mouth shapes crisp for each phoneme.",
        record.tone
    ))
}

fn render_camera(record: &PromptRecord) -> Option<String> {
    Some(format!(
        "Camera framing: medium close-up from chest up. Camera motion: {}.",
        record.camera_motion
    ))
}

fn render_lighting(record: &PromptRecord) -> Option<String> {
    Some(format!(
        "Lighting: {}. Background: {}.",
        record.lighting, record.background_description
    ))
}

fn render_story_beats(record: &PromptRecord) -> Option<String> {
    Some(format!("{STORY_BEATS_LABEL}\n{}", record.story_beats.trim()))
}

fn render_narration(record: &PromptRecord) -> Option<String> {
    Some(format!("{NARRATION_LABEL}\n{}", record.narrative.trim()))
}

fn render_closing(record: &PromptRecord) -> Option<String> {
    non_empty(&record.call_to_action).map(|cta| format!("{CLOSING_PREFIX}{cta}"))
}

fn render_notes(record: &PromptRecord) -> Option<String> {
    non_empty(&record.extra_notes).map(|notes| format!("{NOTES_PREFIX}{notes}"))
}

fn render_export(_: &PromptRecord) -> Option<String> {
    Some(EXPORT_CONSTRAINTS.to_string())
}

pub fn named_avatar_sentence(name: &str, role: &str) -> String {
    format!("Use a digital avatar named {name}, {role}.")
}

// Optional sections key off emptiness of the raw value, not of its trimmed form.
fn non_empty(value: &str) -> Option<&str> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

pub fn compose_sections(record: &PromptRecord) -> Vec<ComposedSection> {
    SECTIONS
        .iter()
        .filter_map(|(kind, render)| {
            render(record).map(|text| ComposedSection { kind: *kind, text })
        })
        .collect()
}

pub fn compose_prompt(record: &PromptRecord) -> String {
    compose_sections(record)
        .into_iter()
        .map(|section| section.text)
        .collect::<Vec<_>>()
        .join(SECTION_SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::record::{CameraMotion, Lighting, Tone};

    fn kinds(record: &PromptRecord) -> Vec<SectionKind> {
        compose_sections(record).iter().map(|s| s.kind).collect()
    }

    #[test]
    fn default_record_keeps_every_section_but_attribution() {
        let record = PromptRecord::default();
        assert_eq!(
            kinds(&record),
            vec![
                SectionKind::Preamble,
                SectionKind::AvatarIdentity,
                SectionKind::Tone,
                SectionKind::Camera,
                SectionKind::LightingBackground,
                SectionKind::StoryBeats,
                SectionKind::Narration,
                SectionKind::Closing,
                SectionKind::ProductionNotes,
                SectionKind::Export,
            ]
        );
    }

    #[test]
    fn attribution_follows_credit_text_not_image_presence() {
        let mut record = PromptRecord {
            avatar_attribution: "Photo by Sam".to_string(),
            ..PromptRecord::default()
        };
        let without_image = compose_prompt(&record);
        record.set_avatar_image("data:image/png;base64,AAAA".to_string());
        let with_image = compose_prompt(&record);

        let line = "Avatar reference attribution: Photo by Sam.";
        assert!(without_image.contains(line));
        assert!(with_image.contains(line));
    }

    #[test]
    fn choices_are_interpolated_by_value() {
        let record = PromptRecord {
            tone: Tone::Inspirational,
            camera_motion: CameraMotion::SlowPushIn,
            lighting: Lighting::CinematicMoody,
            background_description: "Rooftop at dusk".to_string(),
            ..PromptRecord::default()
        };
        let prompt = compose_prompt(&record);
        assert!(prompt.contains("Voice & delivery tone: inspirational. Ensure syncing"));
        assert!(prompt.contains("Camera motion: slow push-in."));
        assert!(prompt.contains("Lighting: cinematic moody. Background: Rooftop at dusk."));
    }

    #[test]
    fn whitespace_only_call_to_action_still_counts_as_present() {
        let record = PromptRecord {
            call_to_action: "  ".to_string(),
            ..PromptRecord::default()
        };
        assert!(kinds(&record).contains(&SectionKind::Closing));
    }

    #[test]
    fn story_beats_keep_internal_line_breaks() {
        let record = PromptRecord {
            story_beats: "\n  1. Hook\n2. Demo\n\n".to_string(),
            ..PromptRecord::default()
        };
        let prompt = compose_prompt(&record);
        assert!(prompt.contains("Story beats (follow sequentially):\n1. Hook\n2. Demo\n\nNarration"));
    }
}
