use anyhow::Context;
use assistant_core::{Assistant, Config, RouteReply};
use clap::{Parser, Subcommand};
use inquire::{InquireError, Password, PasswordDisplayMode, Text};

const GREETING: &str = "Hello, I'm Jarvis. How can I assist you?";

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "assistant", version, about = "Conversational assistant CLI")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Route a single message and print the reply.
    Ask {
        /// The message, e.g. "weather in Paris".
        #[arg(required = true, num_args = 1..)]
        message: Vec<String>,

        /// Print `{"reply", "status"}` JSON instead of plain text.
        #[arg(long)]
        json: bool,
    },

    /// Current weather for a city, skipping intent classification.
    Weather {
        #[arg(num_args = 0..)]
        city: Vec<String>,
    },

    /// Encyclopedia summary for a topic, skipping intent classification.
    Wiki {
        #[arg(num_args = 0..)]
        topic: Vec<String>,
    },

    /// Interactive conversation; each line is routed independently.
    Chat,

    /// Store the generative API key and model.
    Configure,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Ask { message, json } => {
                let reply = assistant()?.route(&message.join(" ")).await;
                print_reply(&reply, json)?;

                if !reply.is_ok() {
                    std::process::exit(1);
                }
            }
            Command::Weather { city } => {
                let reply = assistant()?.weather().weather_for(&city.join(" ")).await?;
                println!("{reply}");
            }
            Command::Wiki { topic } => {
                let reply = assistant()?.encyclopedia().summary_for(&topic.join(" ")).await?;
                println!("{reply}");
            }
            Command::Chat => chat(&assistant()?).await?,
            Command::Configure => configure()?,
        }

        Ok(())
    }
}

fn assistant() -> anyhow::Result<Assistant> {
    let config = Config::load()?;
    tracing::debug!(generative = config.api_key().is_some(), "loaded configuration");
    Ok(Assistant::from_config(&config))
}

fn print_reply(reply: &RouteReply, json: bool) -> anyhow::Result<()> {
    if json {
        let out = serde_json::to_string_pretty(reply).context("Failed to serialize reply")?;
        println!("{out}");
    } else {
        println!("{}", reply.reply);
    }
    Ok(())
}

async fn chat(assistant: &Assistant) -> anyhow::Result<()> {
    println!("{GREETING}");

    loop {
        let line = match Text::new("you>").prompt() {
            Ok(line) => line,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(e) => return Err(e).context("Failed to read input"),
        };

        let trimmed = line.trim();
        if trimmed.eq_ignore_ascii_case("exit") || trimmed.eq_ignore_ascii_case("quit") {
            break;
        }
        if trimmed.is_empty() {
            continue;
        }

        let reply = assistant.route(trimmed).await;
        println!("{}\n", reply.reply);
    }

    Ok(())
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenAI API key (leave empty to disable):")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;
    config.set_api_key(api_key);

    let model = Text::new("Model:")
        .with_default(&config.generative.model)
        .prompt()
        .context("Failed to read model name")?;
    if !model.trim().is_empty() {
        config.generative.model = model.trim().to_string();
    }

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ask_joins_words() {
        let cli = Cli::try_parse_from(["assistant", "ask", "weather", "in", "Paris"]).unwrap();
        match cli.command {
            Command::Ask { message, json } => {
                assert_eq!(message.join(" "), "weather in Paris");
                assert!(!json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn ask_requires_a_message() {
        assert!(Cli::try_parse_from(["assistant", "ask"]).is_err());
    }

    #[test]
    fn weather_allows_empty_city() {
        let cli = Cli::try_parse_from(["assistant", "weather"]).unwrap();
        assert!(matches!(cli.command, Command::Weather { city } if city.is_empty()));
    }
}
