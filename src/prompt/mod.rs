pub mod composer;
pub mod record;
pub mod seed;

pub use composer::{compose_prompt, compose_sections, ComposedSection, SectionKind};
pub use record::{CameraMotion, Choice, Field, Lighting, PromptRecord, RecordError, Tone};
