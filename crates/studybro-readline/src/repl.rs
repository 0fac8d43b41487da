use crate::commands::{Command, HELP_TEXT};
use crate::helper::CliHelper;
use anyhow::{Context, Result};
use chrono::{Local, TimeZone};
use colored::Colorize;
use rustyline::Editor;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use std::io::Write;
use std::path::Path;
use studybro_application::{ChatService, DoubtSolverUseCase, MediaOutcome, ProfileService, SubmitOutcome};
use studybro_core::doubt::ImageAttachment;
use studybro_core::history::HistoryItem;
use studybro_core::StudyError;
use studybro_infrastructure::image_loader::load_image_attachment;

/// The interactive session: one solver, the profile and the follow-up chat.
pub struct Repl {
    solver: DoubtSolverUseCase,
    profile: ProfileService,
    chat: ChatService,
}

enum Flow {
    Continue,
    Quit,
}

impl Repl {
    pub fn new(solver: DoubtSolverUseCase, profile: ProfileService, chat: ChatService) -> Self {
        Self {
            solver,
            profile,
            chat,
        }
    }

    pub async fn run(&self) -> Result<()> {
        let mut rl: Editor<CliHelper, DefaultHistory> = Editor::new()?;
        rl.set_helper(Some(CliHelper::new()));

        let name = self.profile.profile().display_name;
        println!("{}", "=== StudyBro ===".bright_magenta().bold());
        println!("{}", format!("Hi {name}! Ask a question, or type /help.").bright_black());
        self.print_status().await;
        println!();

        loop {
            match rl.readline(">> ") {
                Ok(line) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }
                    let _ = rl.add_history_entry(trimmed);

                    let command = match Command::parse(trimmed) {
                        Ok(command) => command,
                        Err(message) => {
                            println!("{}", message.yellow());
                            continue;
                        }
                    };

                    match self.dispatch(command).await {
                        Ok(Flow::Continue) => {}
                        Ok(Flow::Quit) => break,
                        Err(e) => eprintln!("{}", format!("Error: {e:#}").red()),
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("{}", "CTRL-C detected. Type /quit to exit.".yellow());
                }
                Err(ReadlineError::Eof) => break,
                Err(err) => {
                    eprintln!("{}", format!("Error: {err:?}").red());
                    break;
                }
            }
        }

        println!("{}", "Goodbye!".bright_green());
        Ok(())
    }

    async fn dispatch(&self, command: Command) -> Result<Flow> {
        match command {
            Command::Ask(query) => {
                self.solver.set_query(query).await;
                self.solve().await?;
            }
            Command::Solve => self.solve().await?,
            Command::Class(student_class) => {
                self.solver.set_student_class(student_class).await?;
                self.print_status().await;
            }
            Command::Lang(language) => {
                self.solver.set_language(language).await;
                self.print_status().await;
            }
            Command::Mode(mode) => {
                self.solver.set_mode(mode).await;
                self.print_status().await;
            }
            Command::AttachImage(path) => {
                let image = load_image_attachment(&path)?;
                println!(
                    "{}",
                    format!("Attached {} ({}).", path.display(), image.mime_type()).green()
                );
                // A new photo starts a new doubt
                self.solver.set_query("").await;
                self.solver.attach_image(image).await;
                println!(
                    "{}",
                    "Type a question about the photo, or /solve to send the photo alone."
                        .bright_black()
                );
            }
            Command::RemoveImage => {
                self.solver.remove_image().await;
                println!("{}", "Photo removed.".green());
            }
            Command::Diagram => {
                println!("{}", "Drawing a diagram...".bright_black());
                let outcome = self.solver.generate_diagram().await?;
                report_media("Diagram", outcome, |url| {
                    format!("Diagram ready ({} bytes of image data). Save it with /save-diagram <file>.", url.len())
                });
            }
            Command::SaveDiagram(path) => self.save_diagram(&path).await?,
            Command::Video => {
                println!(
                    "{}",
                    "Making a video. This can take a few minutes...".bright_black()
                );
                let outcome = self.solver.generate_video().await?;
                report_media("Video", outcome, |path| format!("Video saved to {path}"));
            }
            Command::History => self.print_history(),
            Command::Load(key) => {
                let id = self.resolve_history_id(&key)?;
                let item = self.solver.load_history_item(&id).await?;
                print_loaded(&item);
            }
            Command::ClearHistory => {
                self.solver.clear_history().await;
                println!("{}", "History cleared.".green());
            }
            Command::Chat(text) => {
                let language = self.solver.snapshot().await.config.language;
                if let Some(reply) = self.chat.send(&text, language) {
                    println!("{}", reply.text.bright_blue());
                }
            }
            Command::Profile => self.print_profile(),
            Command::Name(name) => {
                let profile = self.profile.rename(&name)?;
                println!("{}", format!("Hi {}!", profile.display_name).green());
            }
            Command::SetAvatar(path) => {
                let picture = load_image_attachment(&path)?;
                self.profile.set_picture(&picture);
                println!("{}", "Profile picture updated.".green());
            }
            Command::RemoveAvatar => {
                self.profile.remove_picture();
                println!("{}", "Profile picture removed.".green());
            }
            Command::Status => self.print_status().await,
            Command::Help => println!("{}", HELP_TEXT.bright_black()),
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    async fn solve(&self) -> Result<()> {
        println!("{}", "Analyzing...".bright_black());

        let outcome = self
            .solver
            .submit(|fragment| {
                print!("{}", fragment.bright_blue());
                let _ = std::io::stdout().flush();
            })
            .await;
        println!();

        match outcome {
            Ok(SubmitOutcome::Ignored) => {
                println!("{}", "Type a question or attach a photo first.".yellow());
            }
            Ok(SubmitOutcome::Solved(_)) => {
                let snapshot = self.solver.snapshot().await;
                if !snapshot.result.citation_urls.is_empty() {
                    println!("{}", "Sources:".bright_black());
                    for url in &snapshot.result.citation_urls {
                        println!("  {}", url.bright_black());
                    }
                }
                println!(
                    "{}",
                    "Try /diagram or /video to see it explained visually.".bright_black()
                );
            }
            Ok(SubmitOutcome::Failed) => {
                let snapshot = self.solver.snapshot().await;
                let message = snapshot.result.error_message.unwrap_or_default();
                println!("{}", message.red());
            }
            Err(e) => return Err(e.into()),
        }
        Ok(())
    }

    async fn save_diagram(&self, path: &Path) -> Result<()> {
        let snapshot = self.solver.snapshot().await;
        let Some(url) = snapshot.result.diagram_url else {
            println!("{}", "No diagram yet. Use /diagram first.".yellow());
            return Ok(());
        };

        let bytes = ImageAttachment::from_data_url(&url).decode_bytes()?;
        std::fs::write(path, bytes)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("{}", format!("Diagram saved to {}", path.display()).green());
        Ok(())
    }

    fn resolve_history_id(&self, key: &str) -> Result<String> {
        let items = self.solver.history();
        if let Ok(index) = key.parse::<usize>() {
            return items
                .get(index.wrapping_sub(1))
                .map(|item| item.id.clone())
                .ok_or_else(|| StudyError::not_found("HistoryItem", key).into());
        }
        Ok(key.to_string())
    }

    fn print_history(&self) {
        let items = self.solver.history();
        if items.is_empty() {
            println!("{}", "No past doubts yet.".bright_black());
            return;
        }

        for (index, item) in items.iter().enumerate() {
            let when = Local
                .timestamp_millis_opt(item.timestamp_ms)
                .single()
                .map(|time| time.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default();
            let marker = if item.image_data.is_some() { " [photo]" } else { "" };
            println!(
                "{:>3}. {} {} {}{}",
                index + 1,
                when.bright_black(),
                format!("({})", item.student_class).cyan(),
                preview(&item.query, 60),
                marker.bright_black()
            );
        }
    }

    fn print_profile(&self) {
        let profile = self.profile.profile();
        println!("{} {}", "Name:".bright_black(), profile.display_name.bold());
        let picture = if profile.profile_picture.is_some() {
            "set"
        } else {
            "none"
        };
        println!("{} {}", "Picture:".bright_black(), picture);
        println!(
            "{} {}",
            "Solved doubts:".bright_black(),
            self.solver.history().len()
        );
    }

    async fn print_status(&self) {
        let snapshot = self.solver.snapshot().await;
        let photo = if snapshot.image.is_some() {
            "attached"
        } else {
            "none"
        };
        println!(
            "{}",
            format!(
                "[{} | {} | {} | photo: {}]",
                snapshot.config.student_class, snapshot.config.language, snapshot.config.mode, photo
            )
            .bright_black()
        );
    }
}

fn report_media(label: &str, outcome: MediaOutcome, ready: impl FnOnce(&str) -> String) {
    let line = match outcome {
        MediaOutcome::Ready(value) => ready(&value).green(),
        MediaOutcome::Skipped => "Solve a doubt first.".yellow(),
        MediaOutcome::NotProduced | MediaOutcome::Failed => {
            format!("{label} could not be generated.").yellow()
        }
        MediaOutcome::TimedOut => format!("{label} generation timed out.").yellow(),
    };
    println!("{line}");
}

fn print_loaded(item: &HistoryItem) {
    println!(
        "{}",
        format!("({}) {}", item.student_class, item.query).bright_black()
    );
    for line in item.result.lines() {
        println!("{}", line.bright_blue());
    }
}

fn preview(text: &str, max_chars: usize) -> String {
    let first_line = text.lines().next().unwrap_or_default();
    if first_line.chars().count() <= max_chars {
        return first_line.to_string();
    }
    let truncated: String = first_line.chars().take(max_chars).collect();
    format!("{truncated}...")
}
