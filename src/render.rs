use crate::media::AvatarPreview;
use crate::prompt::{compose_prompt, Field, PromptRecord};

pub const STUDIO_TITLE: &str = "Kling 2.6 Avatar Prompt Studio";
const OUTPUT_HEADING: &str = "Generated Kling 2.6 Prompt";
const INDENT: &str = "    ";

const PANELS: [(&str, &[Field]); 3] = [
    (
        "Avatar Reference",
        &[Field::AvatarName, Field::AvatarAttribution, Field::RoleDescription],
    ),
    (
        "Performance Direction",
        &[
            Field::Tone,
            Field::CameraMotion,
            Field::Lighting,
            Field::BackgroundDescription,
            Field::StoryBeats,
        ],
    ),
    (
        "Narration Script",
        &[Field::Narrative, Field::CallToAction, Field::ExtraNotes],
    ),
];

pub fn copy_button_label(copied: bool) -> &'static str {
    if copied {
        "[Copied!]"
    } else {
        "[Copy]"
    }
}

fn avatar_line(preview: Option<&AvatarPreview>, has_image: bool) -> String {
    match (preview, has_image) {
        (Some(preview), _) => format!("Avatar image: {}", preview.describe()),
        (None, true) => "Avatar image: loaded".to_string(),
        (None, false) => "Avatar image: none (use `avatar <path>` to upload)".to_string(),
    }
}

fn render_field(record: &PromptRecord, field: Field, lines: &mut Vec<String>) {
    let heading = format!("{} [{}]", field.label(), field.name());
    let value = record.field_value(field);

    if let Some(options) = field.options() {
        let rendered = options
            .iter()
            .map(|(option, label)| {
                if *option == value {
                    format!("[{label}]")
                } else {
                    label.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join("  ");
        lines.push(format!("{heading}: {rendered}"));
        return;
    }

    if value.is_empty() {
        lines.push(format!("{heading}: (empty)"));
    } else if field.is_multiline() {
        lines.push(format!("{heading}:"));
        lines.extend(value.lines().map(|line| format!("{INDENT}{line}")));
    } else {
        lines.push(format!("{heading}: {value}"));
    }
}

pub fn render_form(record: &PromptRecord, preview: Option<&AvatarPreview>, copied: bool) -> String {
    let mut lines = vec![format!("== {STUDIO_TITLE} =="), String::new()];

    for (index, (title, fields)) in PANELS.iter().enumerate() {
        lines.push(format!("-- {title} --"));
        if index == 0 {
            lines.push(avatar_line(preview, record.has_avatar_image()));
        }
        for field in fields.iter() {
            render_field(record, *field, &mut lines);
        }
        lines.push(String::new());
    }

    lines.push(format!(
        "-- {OUTPUT_HEADING} -- {}",
        copy_button_label(copied)
    ));
    lines.push(compose_prompt(record));
    lines.join("\n")
}

pub fn render_field_reference(defaults: &PromptRecord) -> String {
    let mut lines = Vec::new();
    for field in Field::ALL {
        let kind = if field.options().is_some() {
            "choice"
        } else if field.is_multiline() {
            "multi-line text"
        } else {
            "text"
        };
        lines.push(format!("{} ({}) - {}", field.name(), kind, field.label()));
        if let Some(options) = field.options() {
            for (value, label) in options {
                lines.push(format!("{INDENT}{value:<18} {label}"));
            }
        }
        let default = defaults.field_value(field);
        if default.is_empty() {
            lines.push(format!("{INDENT}default: (empty)"));
        } else {
            lines.push(format!("{INDENT}default: {}", default.replace('\n', "\\n")));
        }
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_marks_selected_choices_and_copy_state() {
        let record = PromptRecord::default();
        let form = render_form(&record, None, false);
        assert!(form.contains("Tone [tone]: confident  [friendly]  inspirational  urgent"));
        assert!(form.contains("Camera motion [camera_motion]: [Locked-off, steady shot]"));
        assert!(form.contains("-- Generated Kling 2.6 Prompt -- [Copy]"));
        assert!(form.contains("Credit / Source [avatar_attribution]: (empty)"));
        assert!(form.ends_with(&compose_prompt(&record)));

        let copied = render_form(&record, None, true);
        assert!(copied.contains("[Copied!]"));
    }

    #[test]
    fn multiline_fields_are_indented() {
        let record = PromptRecord::default();
        let form = render_form(&record, None, false);
        assert!(form.contains("Story beats [story_beats]:\n    1. Friendly greeting\n    2."));
    }

    #[test]
    fn preview_is_described_when_present() {
        let preview = AvatarPreview {
            mime_type: "image/png".to_string(),
            byte_len: 10,
            dimensions: Some((4, 4)),
        };
        let form = render_form(&PromptRecord::default(), Some(&preview), false);
        assert!(form.contains("Avatar image: image/png 4x4 (10 B)"));
    }

    #[test]
    fn reference_lists_every_field() {
        let reference = render_field_reference(&PromptRecord::default());
        for field in Field::ALL {
            assert!(reference.contains(field.name()));
        }
        assert!(reference.contains("slow push-in"));
    }
}
