mod agents;
mod config;
mod extract;
mod llm;
mod tools;
mod workflow;

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use agents::{classify_and_answer, CrewReply, DevTeam, TriageCrew};
use config::Config;
use extract::{leading_prose, CodeExtractor};
use llm::ChatClient;
use workflow::ComponentBuilder;

const BANNER: &str = r#"
     _
  __| | _____   _____ _ __ _____      __
 / _` |/ _ \ \ / / __| '__/ _ \ \ /\ / /
| (_| |  __/\ V / (__| | |  __/\ V  V /
 \__,_|\___| \_/ \___|_|  \___| \_/\_/
"#;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "devcrew")]
#[command(about = "An AI development team in your terminal")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Model to use
    #[arg(short, long, default_value = config::DEFAULT_MODEL)]
    model: String,

    /// Sampling temperature for chat
    #[arg(short, long, default_value_t = 0.7)]
    temperature: f32,
}

#[derive(Subcommand)]
enum Commands {
    /// Chat with the full development team (default)
    Chat,

    /// Chat with the construction crew (explicit JSON handoffs)
    Triage,

    /// One-shot question routed to a single specialist
    Ask {
        /// Question to ask
        question: String,
    },

    /// Generate a UI component end to end and write its files
    Component {
        /// What the component should do
        description: String,

        /// Component name, used as the stem for default file names
        #[arg(short, long, default_value = "Component")]
        name: String,

        /// Output directory
        #[arg(short, long, default_value = "component")]
        out: PathBuf,
    },

    /// Extract fenced code blocks from a saved response file
    Extract {
        /// File holding the response text
        file: PathBuf,

        /// Output directory
        #[arg(short, long, default_value = "extracted")]
        out: PathBuf,

        /// Stem for default file names
        #[arg(short, long, default_value = "Component")]
        name: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Chat);

    // Extraction is a pure post-processing pass; no API key needed.
    if let Commands::Extract { file, out, name } = &command {
        return run_extract(file, out, name);
    }

    let config = Config::resolve(cli.model, cli.temperature)?;
    let client = config.client();

    match command {
        Commands::Chat => run_team_chat(&client).await?,

        Commands::Triage => run_triage_chat(&client).await?,

        Commands::Ask { question } => {
            println!("{}", "Thinking...".cyan());
            let (domain, answer) = classify_and_answer(&client, &question).await;
            println!("\n[{} SPECIALIST]: {}", domain.green(), answer);
        }

        Commands::Component {
            description,
            name,
            out,
        } => {
            println!("{}", format!("=== Building the {name} component ===").cyan());
            let mut builder = ComponentBuilder::new(&name, &description);
            let written = builder.run(&client, &out).await?;
            println!(
                "\n{}",
                format!("Done. {} files under {}", written.len(), out.display()).green()
            );
        }

        Commands::Extract { .. } => unreachable!("handled above"),
    }

    Ok(())
}

async fn run_team_chat(client: &ChatClient) -> Result<()> {
    print_banner(client, "Welcome to the AI Development Team!");

    let mut team = DevTeam::new();
    let mut rl = editor_with_history("team_history.txt")?;

    loop {
        let prompt = format!("[{}] > ", team.current_agent_name());
        match rl.readline(&prompt) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(line);

                if line.eq_ignore_ascii_case("exit") {
                    println!("{}", "Goodbye!".green());
                    break;
                }
                if line.eq_ignore_ascii_case("reset") {
                    team.reset();
                    println!("{}", "Conversation reset. Starting fresh!".yellow());
                    continue;
                }

                let before = team.current_agent_name().to_string();
                let response = team.process_query(client, line).await;
                println!("\n{response}");

                let after = team.current_agent_name();
                if after != before {
                    println!("\n{}", format!("[Now speaking with: {after}]").cyan());
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "Ctrl-C pressed. Type 'exit' to quit.".yellow());
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "Goodbye!".green());
                break;
            }
            Err(err) => {
                println!("{}", format!("Error: {err:?}").red());
                break;
            }
        }
    }

    save_history(&mut rl, "team_history.txt");
    Ok(())
}

async fn run_triage_chat(client: &ChatClient) -> Result<()> {
    print_banner(client, "Welcome to the Multi-Agent Construction Assistant!");

    let mut crew = TriageCrew::new();
    let mut rl = editor_with_history("triage_history.txt")?;

    loop {
        let prompt = format!("[{}] What can I help you with? ", crew.current_agent_name());
        match rl.readline(&prompt) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(line);

                if line.eq_ignore_ascii_case("exit") {
                    println!("{}", "Goodbye!".green());
                    break;
                }
                if line.eq_ignore_ascii_case("reset") {
                    crew.reset();
                    println!("{}", "Starting a new conversation.".yellow());
                    continue;
                }

                match crew.process(client, line).await {
                    CrewReply::Message { agent, text } => {
                        println!("\n[{}]: {text}", agent.green());
                    }
                    CrewReply::Handoff { from, to, message } => {
                        println!("\n[{}]: {message}", from.green());
                        println!("\n{}", format!("[System]: Now speaking with {to}").cyan());
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "Ctrl-C pressed. Type 'exit' to quit.".yellow());
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "Goodbye!".green());
                break;
            }
            Err(err) => {
                println!("{}", format!("Error: {err:?}").red());
                break;
            }
        }
    }

    save_history(&mut rl, "triage_history.txt");
    Ok(())
}

fn run_extract(file: &Path, out: &Path, stem: &str) -> Result<()> {
    let text = std::fs::read_to_string(file)?;

    let extractor = CodeExtractor::new(stem);
    let mut files = extractor.extract(&text);
    if !files.contains("README.md") {
        files.insert("README.md", format!("# {stem}\n\n{}", leading_prose(&text)));
    }

    let written = files.write_to(out)?;
    for path in &written {
        println!("Saved file: {}", path.display());
    }
    println!(
        "{}",
        format!("Extracted {} files to {}", written.len(), out.display()).green()
    );
    Ok(())
}

fn print_banner(client: &ChatClient, welcome: &str) {
    println!("{}", BANNER.cyan());
    println!("{}", format!("devcrew v{VERSION}").bright_white());
    println!("{welcome}");
    println!("Model: {}", client.model().green());
    println!("Type 'exit' to quit or 'reset' to start a new conversation.");
    println!("{}", "─".repeat(50).bright_black());
}

fn editor_with_history(name: &str) -> Result<DefaultEditor> {
    let mut rl = DefaultEditor::new()?;
    if let Some(path) = history_path(name) {
        let _ = rl.load_history(&path);
    }
    Ok(rl)
}

fn save_history(rl: &mut DefaultEditor, name: &str) {
    if let Some(path) = history_path(name) {
        let _ = rl.save_history(&path);
    }
}

fn history_path(name: &str) -> Option<PathBuf> {
    let dir = dirs::data_dir()?.join("devcrew");
    std::fs::create_dir_all(&dir).ok()?;
    Some(dir.join(name))
}
