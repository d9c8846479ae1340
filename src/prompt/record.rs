use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_AVATAR_NAME: &str = "Avery";
pub const DEFAULT_ROLE_DESCRIPTION: &str =
    "Product specialist with a welcoming, tech-savvy presence";
pub const DEFAULT_BACKGROUND_DESCRIPTION: &str =
    "Minimalist studio backdrop with subtle branded gradients";
pub const DEFAULT_STORY_BEATS: &str =
    "1. Friendly greeting\n2. Highlight key product benefit\n3. Short demo walkthrough\n4. CTA";
pub const DEFAULT_NARRATIVE: &str = "Hey there! I'm excited to walk you through our latest product update. Here's what you need to know...";
pub const DEFAULT_CALL_TO_ACTION: &str =
    "Close with a confident smile and invite viewers to explore the full release notes.";
pub const DEFAULT_EXTRA_NOTES: &str =
    "Maintain lip sync accuracy with clear enunciation. Focus on natural facial expressions.";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("unknown field '{0}'")]
    UnknownField(String),
    #[error("invalid {field} '{value}' (allowed: {allowed})")]
    InvalidOption {
        field: &'static str,
        value: String,
        allowed: String,
    },
}

pub trait Choice: Copy + Sized + 'static {
    const ALL: &'static [Self];

    /// Literal value interpolated into the prompt.
    fn value(self) -> &'static str;

    fn label(self) -> &'static str;

    fn parse(raw: &str) -> Option<Self> {
        let wanted = raw.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|option| option.value().eq_ignore_ascii_case(wanted))
    }

    fn allowed_values() -> String {
        Self::ALL
            .iter()
            .map(|option| option.value())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Confident,
    #[default]
    Friendly,
    Inspirational,
    Urgent,
}

impl Choice for Tone {
    const ALL: &'static [Self] = &[
        Self::Confident,
        Self::Friendly,
        Self::Inspirational,
        Self::Urgent,
    ];

    fn value(self) -> &'static str {
        match self {
            Self::Confident => "confident",
            Self::Friendly => "friendly",
            Self::Inspirational => "inspirational",
            Self::Urgent => "urgent",
        }
    }

    // Tone chips show the raw value.
    fn label(self) -> &'static str {
        self.value()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CameraMotion {
    #[default]
    #[serde(rename = "steady")]
    Steady,
    #[serde(rename = "slow push-in")]
    SlowPushIn,
    #[serde(rename = "dynamic")]
    Dynamic,
    #[serde(rename = "handheld")]
    Handheld,
}

impl Choice for CameraMotion {
    const ALL: &'static [Self] = &[
        Self::Steady,
        Self::SlowPushIn,
        Self::Dynamic,
        Self::Handheld,
    ];

    fn value(self) -> &'static str {
        match self {
            Self::Steady => "steady",
            Self::SlowPushIn => "slow push-in",
            Self::Dynamic => "dynamic",
            Self::Handheld => "handheld",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Steady => "Locked-off, steady shot",
            Self::SlowPushIn => "Slow push-in",
            Self::Dynamic => "Dynamic slider motion",
            Self::Handheld => "Handheld energy",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Lighting {
    #[default]
    #[serde(rename = "soft daylight")]
    SoftDaylight,
    #[serde(rename = "studio key light")]
    StudioKeyLight,
    #[serde(rename = "cinematic moody")]
    CinematicMoody,
    #[serde(rename = "vivid neon")]
    VividNeon,
}

impl Choice for Lighting {
    const ALL: &'static [Self] = &[
        Self::SoftDaylight,
        Self::StudioKeyLight,
        Self::CinematicMoody,
        Self::VividNeon,
    ];

    fn value(self) -> &'static str {
        match self {
            Self::SoftDaylight => "soft daylight",
            Self::StudioKeyLight => "studio key light",
            Self::CinematicMoody => "cinematic moody",
            Self::VividNeon => "vivid neon",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::SoftDaylight => "Soft daylight",
            Self::StudioKeyLight => "Studio key light",
            Self::CinematicMoody => "Cinematic moody",
            Self::VividNeon => "Vivid neon",
        }
    }
}

macro_rules! display_as_value {
    ($($ty:ty),+) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.value())
            }
        })+
    };
}

display_as_value!(Tone, CameraMotion, Lighting);

/// Text-settable fields of [`PromptRecord`]. The avatar image is not listed;
/// it only changes through image intake.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    AvatarName,
    AvatarAttribution,
    RoleDescription,
    Tone,
    CameraMotion,
    Lighting,
    BackgroundDescription,
    StoryBeats,
    Narrative,
    CallToAction,
    ExtraNotes,
}

impl Field {
    pub const ALL: [Field; 11] = [
        Field::AvatarName,
        Field::AvatarAttribution,
        Field::RoleDescription,
        Field::Tone,
        Field::CameraMotion,
        Field::Lighting,
        Field::BackgroundDescription,
        Field::StoryBeats,
        Field::Narrative,
        Field::CallToAction,
        Field::ExtraNotes,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Field::AvatarName => "avatar_name",
            Field::AvatarAttribution => "avatar_attribution",
            Field::RoleDescription => "role_description",
            Field::Tone => "tone",
            Field::CameraMotion => "camera_motion",
            Field::Lighting => "lighting",
            Field::BackgroundDescription => "background_description",
            Field::StoryBeats => "story_beats",
            Field::Narrative => "narrative",
            Field::CallToAction => "call_to_action",
            Field::ExtraNotes => "extra_notes",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Field::AvatarName => "Avatar name",
            Field::AvatarAttribution => "Credit / Source",
            Field::RoleDescription => "Role & presence",
            Field::Tone => "Tone",
            Field::CameraMotion => "Camera motion",
            Field::Lighting => "Lighting",
            Field::BackgroundDescription => "Background",
            Field::StoryBeats => "Story beats",
            Field::Narrative => "Voiceover lines",
            Field::CallToAction => "Call to action",
            Field::ExtraNotes => "Additional production notes",
        }
    }

    pub fn is_multiline(self) -> bool {
        matches!(
            self,
            Field::StoryBeats | Field::Narrative | Field::ExtraNotes
        )
    }

    pub fn options(self) -> Option<Vec<(&'static str, &'static str)>> {
        fn pairs<C: Choice>() -> Vec<(&'static str, &'static str)> {
            C::ALL.iter().map(|c| (c.value(), c.label())).collect()
        }
        match self {
            Field::Tone => Some(pairs::<Tone>()),
            Field::CameraMotion => Some(pairs::<CameraMotion>()),
            Field::Lighting => Some(pairs::<Lighting>()),
            _ => None,
        }
    }

    /// Accepts `call_to_action`, `call-to-action` and `callToAction`.
    pub fn parse(raw: &str) -> Result<Self, RecordError> {
        let wanted = squash(raw);
        Field::ALL
            .into_iter()
            .find(|field| squash(field.name()) == wanted)
            .ok_or_else(|| RecordError::UnknownField(raw.trim().to_string()))
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn squash(raw: &str) -> String {
    raw.trim()
        .chars()
        .filter(|ch| *ch != '_' && *ch != '-')
        .flat_map(char::to_lowercase)
        .collect()
}

fn parse_choice<C: Choice>(field: Field, raw: &str) -> Result<C, RecordError> {
    C::parse(raw).ok_or_else(|| RecordError::InvalidOption {
        field: field.name(),
        value: raw.trim().to_string(),
        allowed: C::allowed_values(),
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PromptRecord {
    #[serde(skip_deserializing)]
    pub avatar_image: Option<String>,
    pub avatar_attribution: String,
    pub avatar_name: String,
    pub role_description: String,
    pub tone: Tone,
    pub camera_motion: CameraMotion,
    pub lighting: Lighting,
    pub background_description: String,
    pub story_beats: String,
    pub narrative: String,
    pub call_to_action: String,
    pub extra_notes: String,
}

impl Default for PromptRecord {
    fn default() -> Self {
        Self {
            avatar_image: None,
            avatar_attribution: String::new(),
            avatar_name: DEFAULT_AVATAR_NAME.to_string(),
            role_description: DEFAULT_ROLE_DESCRIPTION.to_string(),
            tone: Tone::default(),
            camera_motion: CameraMotion::default(),
            lighting: Lighting::default(),
            background_description: DEFAULT_BACKGROUND_DESCRIPTION.to_string(),
            story_beats: DEFAULT_STORY_BEATS.to_string(),
            narrative: DEFAULT_NARRATIVE.to_string(),
            call_to_action: DEFAULT_CALL_TO_ACTION.to_string(),
            extra_notes: DEFAULT_EXTRA_NOTES.to_string(),
        }
    }
}

impl PromptRecord {
    pub fn has_avatar_image(&self) -> bool {
        self.avatar_image.is_some()
    }

    pub fn set_avatar_image(&mut self, data_uri: String) {
        self.avatar_image = Some(data_uri);
    }

    /// Sets one field from its textual form. On error the record is untouched.
    pub fn set_field(&mut self, field: Field, value: &str) -> Result<(), RecordError> {
        match field {
            Field::AvatarName => self.avatar_name = value.to_string(),
            Field::AvatarAttribution => self.avatar_attribution = value.to_string(),
            Field::RoleDescription => self.role_description = value.to_string(),
            Field::Tone => self.tone = parse_choice(field, value)?,
            Field::CameraMotion => self.camera_motion = parse_choice(field, value)?,
            Field::Lighting => self.lighting = parse_choice(field, value)?,
            Field::BackgroundDescription => self.background_description = value.to_string(),
            Field::StoryBeats => self.story_beats = value.to_string(),
            Field::Narrative => self.narrative = value.to_string(),
            Field::CallToAction => self.call_to_action = value.to_string(),
            Field::ExtraNotes => self.extra_notes = value.to_string(),
        }
        Ok(())
    }

    pub fn clear_field(&mut self, field: Field) {
        match field {
            Field::Tone => self.tone = Tone::default(),
            Field::CameraMotion => self.camera_motion = CameraMotion::default(),
            Field::Lighting => self.lighting = Lighting::default(),
            Field::AvatarName => self.avatar_name.clear(),
            Field::AvatarAttribution => self.avatar_attribution.clear(),
            Field::RoleDescription => self.role_description.clear(),
            Field::BackgroundDescription => self.background_description.clear(),
            Field::StoryBeats => self.story_beats.clear(),
            Field::Narrative => self.narrative.clear(),
            Field::CallToAction => self.call_to_action.clear(),
            Field::ExtraNotes => self.extra_notes.clear(),
        }
    }

    pub fn field_value(&self, field: Field) -> &str {
        match field {
            Field::AvatarName => &self.avatar_name,
            Field::AvatarAttribution => &self.avatar_attribution,
            Field::RoleDescription => &self.role_description,
            Field::Tone => self.tone.value(),
            Field::CameraMotion => self.camera_motion.value(),
            Field::Lighting => self.lighting.value(),
            Field::BackgroundDescription => &self.background_description,
            Field::StoryBeats => &self.story_beats,
            Field::Narrative => &self.narrative,
            Field::CallToAction => &self.call_to_action,
            Field::ExtraNotes => &self.extra_notes,
        }
    }
}
