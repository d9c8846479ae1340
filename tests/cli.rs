use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

fn studio(log_dir: &Path) -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_avatar-prompt-studio"));
    command
        .env("STUDIO_LOG_DIR", log_dir)
        .env("STUDIO_CONSOLE_LOG_LEVEL", "off")
        .env_remove("STUDIO_SEED_PATH");
    command
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn compose_prints_the_prompt_with_overrides() {
    let dir = tempfile::tempdir().unwrap();
    let output = studio(dir.path())
        .args([
            "--set",
            "avatar_name=Kai",
            "--set",
            "call_to_action=",
            "--set",
            "camera_motion=slow push-in",
            "compose",
        ])
        .output()
        .unwrap();

    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.starts_with("You are producing a Kling 2.6 talking-head video."));
    assert!(text.contains("Use a digital avatar named Kai,"));
    assert!(text.contains("Camera motion: slow push-in."));
    assert!(!text.contains("Closing moment:"));
    assert!(text.trim_end().ends_with("Keep total duration under 60 seconds."));
}

#[test]
fn seed_file_and_avatar_flag_feed_the_record() {
    let dir = tempfile::tempdir().unwrap();
    let seed = dir.path().join("seed.yaml");
    std::fs::write(&seed, "avatar_attribution: Photo by Lee\nlighting: vivid neon\n").unwrap();
    let avatar = dir.path().join("face.png");
    image::RgbaImage::new(2, 2).save(&avatar).unwrap();

    let output = studio(dir.path())
        .arg("--seed")
        .arg(&seed)
        .arg("--avatar")
        .arg(&avatar)
        .arg("record")
        .output()
        .unwrap();

    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("avatar_attribution: Photo by Lee"));
    assert!(text.contains("lighting: vivid neon"));
    assert!(text.contains("data:image/png;base64,"));
    assert!(text.contains("avatar_name: Avery"));
}

#[test]
fn invalid_assignment_fails_the_run() {
    let dir = tempfile::tempdir().unwrap();
    let output = studio(dir.path())
        .args(["--set", "tone=sleepy", "compose"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
}

#[test]
fn interactive_session_reads_commands_from_stdin() {
    let dir = tempfile::tempdir().unwrap();
    let mut child = studio(dir.path())
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();

    child
        .stdin
        .take()
        .unwrap()
        .write_all(b"set narrative Line one\\nLine two\nbogus\nprompt\nquit\n")
        .unwrap();
    let output = child.wait_with_output().unwrap();

    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("-- Avatar Reference --"));
    assert!(text.contains("Updated narrative."));
    assert!(text.contains("Narration script (match timing & lip sync):\nLine one\nLine two"));
    assert!(String::from_utf8_lossy(&output.stderr).contains("! unknown command 'bogus'"));
}

#[test]
fn fields_lists_every_option() {
    let dir = tempfile::tempdir().unwrap();
    let output = studio(dir.path()).arg("fields").output().unwrap();
    assert!(output.status.success());
    let text = stdout(&output);
    for name in ["avatar_name", "tone", "camera_motion", "lighting", "extra_notes"] {
        assert!(text.contains(name), "{name} missing");
    }
    assert!(text.contains("studio key light"));
}
