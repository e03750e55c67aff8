//! Command-line arguments
//!
//! `min [-t <task>] [-s <search>] [url | file.min | page.html ...]`

use std::path::Path;

use url::Url;

use crate::command::{AddTabPayload, Command, OpenTaskFilePayload, SwitchToTaskPayload};

const TASK_FLAG: &str = "-t";
const SEARCH_FLAG: &str = "-s";

const PAGE_EXTENSIONS: &[&str] = &["html", "htm", "mht", "mhtml", "pdf"];

/// Translate process arguments into commands. The first argument is the
/// executable and is skipped. Relative file paths are resolved against `cwd`;
/// whether the files exist is up to the caller.
pub fn commands_from_args<S: AsRef<str>>(argv: &[S], cwd: &Path) -> Vec<Command> {
    let args: Vec<&str> = argv.iter().skip(1).map(|a| a.as_ref()).collect();

    let task_query = args
        .iter()
        .position(|a| *a == TASK_FLAG)
        .and_then(|i| args.get(i + 1))
        .map(|q| q.to_string());

    let add_tab = |url: String| {
        Command::AddTab(AddTabPayload {
            url: Some(url),
            task_query: task_query.clone(),
        })
    };

    let mut commands = Vec::new();
    let mut iter = args.iter();

    while let Some(&arg) = iter.next() {
        if arg.is_empty() {
            continue;
        }

        if arg == TASK_FLAG {
            iter.next();
            continue;
        }

        if arg == SEARCH_FLAG {
            if let Some(&search) = iter.next() {
                commands.push(add_tab(search.to_string()));
            }
            continue;
        }

        if arg.contains("://") {
            commands.push(add_tab(arg.to_string()));
            continue;
        }

        let path = cwd.join(arg);
        match extension(&path).as_deref() {
            Some("min") => {
                commands.push(Command::OpenTaskFile(OpenTaskFilePayload { file_path: path }));
                continue;
            }
            Some(ext) if PAGE_EXTENSIONS.contains(&ext) => match Url::from_file_path(&path) {
                Ok(url) => {
                    commands.push(add_tab(url.to_string()));
                    continue;
                }
                Err(()) => {
                    tracing::warn!(path = %path.display(), "Cannot open file as a page");
                }
            },
            _ => {}
        }

        if let Some(query) = &task_query {
            push_switch(&mut commands, query);
        }
    }

    // `min -t work` on its own still switches
    if commands.is_empty() {
        if let Some(query) = &task_query {
            push_switch(&mut commands, query);
        }
    }

    commands
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
}

fn push_switch(commands: &mut Vec<Command>, query: &str) {
    let switch = Command::SwitchToTask(SwitchToTaskPayload {
        task_query: query.to_string(),
    });
    if commands.last() != Some(&switch) {
        commands.push(switch);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn cwd() -> PathBuf {
        PathBuf::from("/home/user")
    }

    fn add_tab(url: &str, task_query: Option<&str>) -> Command {
        Command::AddTab(AddTabPayload {
            url: Some(url.to_string()),
            task_query: task_query.map(str::to_string),
        })
    }

    #[test]
    fn test_urls_and_searches() {
        let commands = commands_from_args(
            &["min", "https://example.com", "-s", "rust borrow checker"],
            &cwd(),
        );
        assert_eq!(
            commands,
            vec![
                add_tab("https://example.com", None),
                add_tab("rust borrow checker", None),
            ]
        );
    }

    #[test]
    fn test_task_query_applies_to_every_tab() {
        let commands = commands_from_args(
            &["min", "https://a.example", "-t", "work", "https://b.example"],
            &cwd(),
        );
        assert_eq!(
            commands,
            vec![
                add_tab("https://a.example", Some("work")),
                add_tab("https://b.example", Some("work")),
            ]
        );
    }

    #[test]
    fn test_task_query_alone_switches() {
        let commands = commands_from_args(&["min", "-t", "2"], &cwd());
        assert_eq!(
            commands,
            vec![Command::SwitchToTask(SwitchToTaskPayload {
                task_query: "2".to_string()
            })]
        );
    }

    #[test]
    fn test_files() {
        let commands =
            commands_from_args(&["min", "saved.min", "/tmp/Page.HTML", "notes.txt"], &cwd());
        assert_eq!(
            commands,
            vec![
                Command::OpenTaskFile(OpenTaskFilePayload {
                    file_path: PathBuf::from("/home/user/saved.min")
                }),
                add_tab("file:///tmp/Page.HTML", None),
            ]
        );
    }

    #[test]
    fn test_unrecognized_arguments_switch_when_task_given() {
        let commands =
            commands_from_args(&["min", "-t", "reading", "notes.txt", "other.txt"], &cwd());
        assert_eq!(
            commands,
            vec![Command::SwitchToTask(SwitchToTaskPayload {
                task_query: "reading".to_string()
            })]
        );
    }

    #[test]
    fn test_executable_is_skipped() {
        assert!(commands_from_args(&["/usr/bin/min"], &cwd()).is_empty());
        assert!(commands_from_args::<&str>(&[], &cwd()).is_empty());
    }
}
