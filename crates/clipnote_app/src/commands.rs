use std::path::{Path, PathBuf};

use clipnote_core::{Msg, NoteOptions, PendingFile, Platform, Quality};

/// One parsed line of shell input.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum CliCommand {
    Submit {
        url: String,
        platform: Platform,
        quality: Quality,
        options: NoteOptions,
    },
    Upload {
        paths: Vec<PathBuf>,
        quality: Quality,
        options: NoteOptions,
    },
    List,
    Select(Option<String>),
    Show,
    Delete(String),
    Clear,
    Help,
    Quit,
}

/// Parses one input line. `Ok(None)` means a blank line.
pub(crate) fn parse_line(line: &str) -> Result<Option<CliCommand>, String> {
    let mut words = line.split_whitespace();
    let Some(command) = words.next() else {
        return Ok(None);
    };
    let args: Vec<&str> = words.collect();

    let parsed = match command {
        "submit" => parse_submit(&args)?,
        "upload" => parse_upload(&args)?,
        "list" | "ls" => CliCommand::List,
        "select" => match args.as_slice() {
            [id] if *id == "none" => CliCommand::Select(None),
            [id] => CliCommand::Select(Some(id.to_string())),
            _ => return Err("usage: select <task-id|none>".to_string()),
        },
        "show" => CliCommand::Show,
        "delete" | "rm" => match args.as_slice() {
            [id] => CliCommand::Delete(id.to_string()),
            _ => return Err("usage: delete <task-id>".to_string()),
        },
        "clear" => CliCommand::Clear,
        "help" => CliCommand::Help,
        "quit" | "exit" => CliCommand::Quit,
        other => return Err(format!("unknown command {other:?}; try `help`")),
    };
    Ok(Some(parsed))
}

fn parse_submit(args: &[&str]) -> Result<CliCommand, String> {
    let Some((url, rest)) = args.split_first() else {
        return Err("usage: submit <url> [bilibili|youtube] [fast|medium|slow] [--screenshot] [--link]".to_string());
    };
    let mut platform = Platform::default();
    let mut quality = Quality::default();
    let mut options = NoteOptions::default();
    for arg in rest {
        if let Some(parsed) = parse_platform(arg) {
            platform = parsed;
        } else if let Some(parsed) = parse_quality(arg) {
            quality = parsed;
        } else if !apply_flag(arg, &mut options) {
            return Err(format!("unknown submit argument {arg:?}"));
        }
    }
    Ok(CliCommand::Submit {
        url: url.to_string(),
        platform,
        quality,
        options,
    })
}

fn parse_upload(args: &[&str]) -> Result<CliCommand, String> {
    let mut paths = Vec::new();
    let mut quality = Quality::default();
    let mut options = NoteOptions::default();
    for arg in args {
        if let Some(parsed) = parse_quality(arg) {
            quality = parsed;
        } else if apply_flag(arg, &mut options) {
            // consumed as a flag
        } else if arg.starts_with("--") {
            return Err(format!("unknown upload flag {arg:?}"));
        } else {
            paths.push(PathBuf::from(arg));
        }
    }
    if paths.is_empty() {
        return Err("usage: upload <path>... [fast|medium|slow] [--screenshot] [--link]".to_string());
    }
    Ok(CliCommand::Upload {
        paths,
        quality,
        options,
    })
}

fn parse_platform(arg: &str) -> Option<Platform> {
    match arg {
        "bilibili" => Some(Platform::Bilibili),
        "youtube" => Some(Platform::Youtube),
        "local" => Some(Platform::Local),
        _ => None,
    }
}

fn parse_quality(arg: &str) -> Option<Quality> {
    match arg {
        "fast" => Some(Quality::Fast),
        "medium" => Some(Quality::Medium),
        "slow" => Some(Quality::Slow),
        _ => None,
    }
}

fn apply_flag(arg: &str, options: &mut NoteOptions) -> bool {
    match arg {
        "--screenshot" => {
            options.screenshot = true;
            true
        }
        "--link" => {
            options.link = true;
            true
        }
        _ => false,
    }
}

/// Expands a submission command into the core messages that drive it.
pub(crate) fn to_msgs(command: CliCommand) -> Vec<Msg> {
    match command {
        CliCommand::Submit {
            url,
            platform,
            quality,
            options,
        } => vec![
            Msg::InputChanged(url),
            Msg::PlatformSelected(platform),
            Msg::SubmitRequested { quality, options },
        ],
        CliCommand::Upload {
            paths,
            quality,
            mut options,
        } => {
            let files: Vec<PendingFile> = paths.iter().map(|path| pending_file(path)).collect();
            // Screenshots only make sense when the batch carries a video.
            if !files.iter().any(PendingFile::is_video) {
                options.screenshot = false;
            }
            vec![
                Msg::FilesChosen(files),
                Msg::SubmitRequested { quality, options },
            ]
        }
        CliCommand::Select(task_id) => vec![Msg::TaskSelected(task_id)],
        CliCommand::Delete(task_id) => vec![Msg::DeleteRequested(task_id)],
        CliCommand::Clear => vec![Msg::ClearAllRequested],
        // Queries and shell control never reach the reducer.
        CliCommand::List | CliCommand::Show | CliCommand::Help | CliCommand::Quit => Vec::new(),
    }
}

fn pending_file(path: &Path) -> PendingFile {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    PendingFile {
        path: path.to_path_buf(),
        content_type: declared_content_type(path).to_string(),
        name,
    }
}

/// The declared MIME type for an upload, derived from the file extension
/// the way a file picker would declare it.
fn declared_content_type(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .as_deref()
    {
        Some("txt") => "text/plain",
        Some("mp3") => "audio/mpeg",
        Some("mp4") => "video/mp4",
        _ => "application/octet-stream",
    }
}

pub(crate) const HELP_TEXT: &str = "\
commands:
  submit <url> [bilibili|youtube] [fast|medium|slow] [--screenshot] [--link]
  upload <path>... [fast|medium|slow] [--screenshot] [--link]
  list                 show the task history
  select <task-id|none>
  show                 print the selected task's note
  delete <task-id>
  clear                drop the whole history
  quit";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_line_parses_to_nothing() {
        assert_eq!(parse_line("   "), Ok(None));
    }

    #[test]
    fn submit_defaults_platform_and_quality() {
        let command = parse_line("submit https://example.com/v").unwrap().unwrap();
        assert_eq!(
            command,
            CliCommand::Submit {
                url: "https://example.com/v".to_string(),
                platform: Platform::Bilibili,
                quality: Quality::Medium,
                options: NoteOptions::default(),
            }
        );
    }

    #[test]
    fn submit_accepts_platform_quality_and_flags() {
        let command = parse_line("submit https://example.com/v youtube slow --screenshot --link")
            .unwrap()
            .unwrap();
        assert_eq!(
            command,
            CliCommand::Submit {
                url: "https://example.com/v".to_string(),
                platform: Platform::Youtube,
                quality: Quality::Slow,
                options: NoteOptions {
                    screenshot: true,
                    link: true,
                },
            }
        );
    }

    #[test]
    fn upload_collects_paths_and_flags() {
        let command = parse_line("upload a.mp4 b.txt fast --link").unwrap().unwrap();
        assert_eq!(
            command,
            CliCommand::Upload {
                paths: vec![PathBuf::from("a.mp4"), PathBuf::from("b.txt")],
                quality: Quality::Fast,
                options: NoteOptions {
                    screenshot: false,
                    link: true,
                },
            }
        );
    }

    #[test]
    fn upload_without_paths_is_an_error() {
        assert!(parse_line("upload --link").is_err());
    }

    #[test]
    fn unknown_command_is_an_error() {
        assert!(parse_line("frobnicate").is_err());
    }

    #[test]
    fn upload_msgs_declare_content_types_by_extension() {
        let command = CliCommand::Upload {
            paths: vec![
                PathBuf::from("talk.MP4"),
                PathBuf::from("notes.txt"),
                PathBuf::from("weird.bin"),
            ],
            quality: Quality::Medium,
            options: NoteOptions::default(),
        };
        let msgs = to_msgs(command);
        let Msg::FilesChosen(files) = &msgs[0] else {
            panic!("expected FilesChosen");
        };
        assert_eq!(files[0].content_type, "video/mp4");
        assert_eq!(files[1].content_type, "text/plain");
        assert_eq!(files[2].content_type, "application/octet-stream");
    }

    #[test]
    fn screenshot_flag_is_dropped_for_non_video_batches() {
        let command = CliCommand::Upload {
            paths: vec![PathBuf::from("notes.txt")],
            quality: Quality::Medium,
            options: NoteOptions {
                screenshot: true,
                link: false,
            },
        };
        let msgs = to_msgs(command);
        let Msg::SubmitRequested { options, .. } = &msgs[1] else {
            panic!("expected SubmitRequested");
        };
        assert!(!options.screenshot);
    }

    #[test]
    fn screenshot_flag_survives_when_a_video_is_present() {
        let command = CliCommand::Upload {
            paths: vec![PathBuf::from("talk.mp4"), PathBuf::from("notes.txt")],
            quality: Quality::Medium,
            options: NoteOptions {
                screenshot: true,
                link: false,
            },
        };
        let msgs = to_msgs(command);
        let Msg::SubmitRequested { options, .. } = &msgs[1] else {
            panic!("expected SubmitRequested");
        };
        assert!(options.screenshot);
    }
}
