//! Interactive line-command session over the tracker.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use plantcare_identify::ImageUpload;
use plantcare_services::{AddOutcome, PlantTracker};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::dashboard::render_dashboard;

const HELP: &str = "\
Commands:
  name <text>           set the name of the new plant
  image <path>          choose a JPG or PNG photo
  add [<name> <path>]   identify and add the plant
  remove <n>            delete reminder n and its plant
  clear                 delete all reminders
  show                  print the dashboard
  help                  print this help
  quit                  leave";

/// A parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Name(String),
    Image(PathBuf),
    Add(Option<(String, PathBuf)>),
    /// 1-based reminder number.
    Remove(usize),
    Clear,
    Show,
    Help,
    Quit,
}

impl Command {
    /// Parse one input line. Blank lines yield `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Self>, String> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let command = match word.to_ascii_lowercase().as_str() {
            "name" => Self::Name(rest.to_string()),
            "image" if !rest.is_empty() => Self::Image(PathBuf::from(rest)),
            "image" => return Err("usage: image <path>".to_string()),
            "add" if rest.is_empty() => Self::Add(None),
            "add" => {
                // The path is the last token; everything before it is the name.
                let Some((name, path)) = rest.rsplit_once(char::is_whitespace) else {
                    return Err("usage: add [<name> <path>]".to_string());
                };
                Self::Add(Some((name.trim().to_string(), PathBuf::from(path))))
            }
            "remove" | "rm" => {
                let n = rest
                    .parse::<usize>()
                    .map_err(|_| "usage: remove <n>".to_string())?;
                Self::Remove(n)
            }
            "clear" => Self::Clear,
            "show" | "ls" => Self::Show,
            "help" | "?" => Self::Help,
            "quit" | "exit" | "q" => Self::Quit,
            other => return Err(format!("unknown command '{}', try 'help'", other)),
        };
        Ok(Some(command))
    }
}

/// Owns the tracker for the lifetime of one interactive run.
pub struct Session {
    tracker: PlantTracker,
}

impl Session {
    pub fn new(tracker: PlantTracker) -> Self {
        Self { tracker }
    }

    pub fn tracker(&self) -> &PlantTracker {
        &self.tracker
    }

    /// Load the weather once, then execute commands until `quit` or EOF.
    pub async fn run<R, W>(&mut self, input: R, output: &mut W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        self.tracker.load_weather().await;
        write_out(output, &render_dashboard(&self.tracker)).await?;
        write_out(output, "Type 'help' for commands.\n").await?;

        let mut lines = input.lines();
        while let Some(line) = lines.next_line().await.context("Failed to read input")? {
            let command = match Command::parse(&line) {
                Ok(Some(command)) => command,
                Ok(None) => continue,
                Err(usage) => {
                    write_out(output, &format!("{}\n", usage)).await?;
                    continue;
                }
            };

            if command == Command::Quit {
                break;
            }
            let reply = self.execute(command).await;
            write_out(output, &reply).await?;
        }

        tracing::info!("Session ended");
        Ok(())
    }

    /// Apply one command and return the text to show.
    pub async fn execute(&mut self, command: Command) -> String {
        match command {
            Command::Name(name) => {
                self.tracker.set_draft_name(name);
                String::new()
            }
            Command::Image(path) => match self.choose_image(&path).await {
                Ok(_) => self.status_line(),
                Err(message) => message,
            },
            Command::Add(args) => {
                if let Some((name, path)) = args {
                    self.tracker.set_draft_name(name);
                    match self.choose_image(&path).await {
                        Ok(true) => {}
                        Ok(false) => return self.status_line(),
                        Err(message) => return message,
                    }
                }
                match self.tracker.add_plant().await {
                    AddOutcome::NotAdded => self.status_line(),
                    AddOutcome::Added(_) | AddOutcome::Fallback(_) => {
                        render_dashboard(&self.tracker)
                    }
                }
            }
            Command::Remove(n) => {
                let removed = n
                    .checked_sub(1)
                    .is_some_and(|index| self.tracker.remove_reminder(index));
                if removed {
                    render_dashboard(&self.tracker)
                } else {
                    format!("No reminder #{}.\n", n)
                }
            }
            Command::Clear => {
                self.tracker.clear_reminders();
                render_dashboard(&self.tracker)
            }
            Command::Show => render_dashboard(&self.tracker),
            Command::Help => format!("{}\n", HELP),
            Command::Quit => String::new(),
        }
    }

    /// Read a photo from disk into the draft. Unreadable files leave the
    /// draft unchanged and produce a message instead.
    async fn choose_image(&mut self, path: &Path) -> Result<bool, String> {
        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(path = %path.display(), "Cannot read image: {}", e);
                return Err(format!("Cannot read {}: {}\n", path.display(), e));
            }
        };
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(self
            .tracker
            .select_image(ImageUpload::from_file_bytes(file_name, bytes)))
    }

    fn status_line(&self) -> String {
        match self.tracker.error() {
            Some(error) => format!("! {}\n", error),
            None => String::new(),
        }
    }
}

async fn write_out<W: AsyncWrite + Unpin>(output: &mut W, text: &str) -> Result<()> {
    output
        .write_all(text.as_bytes())
        .await
        .context("Failed to write output")?;
    output.flush().await.context("Failed to flush output")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use plantcare_identify::{IdentificationClient, Identifier};
    use plantcare_services::{MemoryStore, ReminderScheduler, ReminderStore};
    use plantcare_weather::WeatherProvider;
    use std::sync::Arc;
    use tempfile::tempdir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    fn session(uri: &str) -> Session {
        Session::new(
            PlantTracker::new(
                Identifier::direct(IdentificationClient::new_with_base_url("k", uri)),
                WeatherProvider::new_with_base_url("k", "Berlin", uri),
                ReminderScheduler::mock(),
                ReminderStore::new(Arc::new(MemoryStore::new())),
            )
            .with_clock(today),
        )
    }

    async fn mock_services(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "weather": [{ "main": "Clouds" }],
                "main": { "temp": 18.0 }
            })))
            .mount(server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v2/identify"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "suggestions": [{
                    "probability": 0.8,
                    "plant_name": "Pachira aquatica",
                    "plant_details": { "care": { "watering": { "interval_days": 10 } } }
                }]
            })))
            .mount(server)
            .await;
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("  "), Ok(None));
        assert_eq!(
            Command::parse("name Money Tree"),
            Ok(Some(Command::Name("Money Tree".into())))
        );
        assert_eq!(
            Command::parse("add Money Tree ./tree.jpg"),
            Ok(Some(Command::Add(Some((
                "Money Tree".into(),
                PathBuf::from("./tree.jpg")
            )))))
        );
        assert_eq!(Command::parse("add"), Ok(Some(Command::Add(None))));
        assert_eq!(Command::parse("remove 2"), Ok(Some(Command::Remove(2))));
        assert_eq!(Command::parse("QUIT"), Ok(Some(Command::Quit)));
    }

    #[test]
    fn test_parse_errors() {
        assert!(Command::parse("remove two").is_err());
        assert!(Command::parse("image").is_err());
        assert!(Command::parse("add lonely").is_err());
        assert!(Command::parse("water").is_err());
    }

    #[tokio::test]
    async fn test_add_without_input_reports_missing() {
        let mut session = session("http://127.0.0.1:9");

        let reply = session.execute(Command::Add(None)).await;

        assert_eq!(reply, "! Please enter a name and an image.\n");
    }

    #[tokio::test]
    async fn test_remove_out_of_range() {
        let mut session = session("http://127.0.0.1:9");

        assert_eq!(session.execute(Command::Remove(0)).await, "No reminder #0.\n");
        assert_eq!(session.execute(Command::Remove(3)).await, "No reminder #3.\n");
    }

    #[tokio::test]
    async fn test_scripted_session() {
        let server = MockServer::start().await;
        mock_services(&server).await;
        let dir = tempdir().unwrap();
        let photo = dir.path().join("tree.jpg");
        std::fs::write(&photo, [0xff, 0xd8, 0xff, 0xe0, 0x00]).unwrap();

        let script = format!(
            "add Money Tree {}\nshow\nremove 1\nquit\nshow\n",
            photo.display()
        );
        let mut session = session(&server.uri());
        let mut output = Vec::new();

        session.run(script.as_bytes(), &mut output).await.unwrap();

        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("Weather: Clouds, 18°C"));
        assert!(text.contains("Money Tree (Pachira aquatica)"));
        assert!(text.contains("1. Water Money Tree on 10/28/2026"));
        assert!(session.tracker().plants().is_empty());
        assert!(session.tracker().reminders().is_empty());
    }

    #[tokio::test]
    async fn test_image_with_wrong_format_is_rejected() {
        let dir = tempdir().unwrap();
        let gif = dir.path().join("anim.gif");
        std::fs::write(&gif, b"GIF89a").unwrap();
        let mut session = session("http://127.0.0.1:9");

        let reply = session.execute(Command::Image(gif)).await;

        assert_eq!(
            reply,
            "! Invalid image format. Please upload a JPG or PNG image.\n"
        );
        assert!(session.tracker().draft().image.is_none());
    }

    #[tokio::test]
    async fn test_missing_image_file() {
        let dir = tempdir().unwrap();
        let mut session = session("http://127.0.0.1:9");

        let reply = session
            .execute(Command::Image(dir.path().join("nope.png")))
            .await;

        assert!(reply.starts_with("Cannot read "));
        assert_eq!(session.tracker().error(), None);
    }
}
