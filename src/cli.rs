//! Command-line REPL for the playground

use anyhow::{anyhow, bail, Context, Result};
use colored::*;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use serde_json::Value;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use miniapp_sdk::bridge::methods::{state_field, MAIN_BUTTON_FIELDS};
use miniapp_sdk::bridge::{LocalBridge, OutboundEvent, MAIN_BUTTON_PRESSED};
use miniapp_sdk::classnames::merge_class_names;
use miniapp_sdk::components::{ButtonState, MainButton};

/// A parsed REPL line
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Mount,
    Unmount,
    Set(ButtonState),
    Click,
    Show,
    Merge(Vec<Value>),
    Help,
    Quit,
}

/// Whether the REPL should keep going after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Result<Self> {
        let line = line.trim();
        let (head, rest) = line
            .split_once(char::is_whitespace)
            .map(|(h, r)| (h, r.trim()))
            .unwrap_or((line, ""));

        match head {
            "mount" => Ok(Command::Mount),
            "unmount" => Ok(Command::Unmount),
            "set" => parse_params(rest).map(Command::Set),
            "click" => Ok(Command::Click),
            "show" | "state" => Ok(Command::Show),
            "merge" => parse_json_args(rest).map(Command::Merge),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            other => bail!("unknown command '{}' (try 'help')", other),
        }
    }
}

/// Parse `key=value` pairs into a partial button state
///
/// Keys may use either the state name (`isVisible`) or the wire name
/// (`is_visible`). Values containing spaces can be double-quoted.
fn parse_params(input: &str) -> Result<ButtonState> {
    let mut params = ButtonState::new();

    for token in tokenize(input)? {
        let (key, value) = token
            .split_once('=')
            .ok_or_else(|| anyhow!("expected key=value, got '{}'", token))?;

        let field = MAIN_BUTTON_FIELDS
            .iter()
            .map(|(state, _)| *state)
            .find(|state| *state == key)
            .or_else(|| state_field(key))
            .ok_or_else(|| anyhow!("unknown main button field '{}'", key))?;

        let flag = || -> Result<bool> {
            value
                .parse::<bool>()
                .with_context(|| format!("'{}' expects true or false", key))
        };

        match field {
            "isVisible" => params.is_visible = Some(flag()?),
            "isEnabled" => params.is_enabled = Some(flag()?),
            "isLoaderVisible" => params.is_loader_visible = Some(flag()?),
            "hasShineEffect" => params.has_shine_effect = Some(flag()?),
            "text" => params.text = Some(value.to_string()),
            "backgroundColor" => params.background_color = Some(value.to_string()),
            "textColor" => params.text_color = Some(value.to_string()),
            _ => unreachable!("field table and match arms are out of sync"),
        }
    }

    Ok(params)
}

/// Split on whitespace, keeping double-quoted runs together
fn tokenize(input: &str) -> Result<Vec<String>> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for c in input.chars() {
        match c {
            '"' => in_quotes = !in_quotes,
            c if c.is_whitespace() && !in_quotes => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }

    if in_quotes {
        bail!("unterminated quote");
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    Ok(tokens)
}

/// Parse a whitespace separated stream of JSON values
fn parse_json_args(input: &str) -> Result<Vec<Value>> {
    serde_json::Deserializer::from_str(input)
        .into_iter::<Value>()
        .collect::<Result<Vec<_>, _>>()
        .context("merge expects JSON arguments, e.g. merge {\"root\":\"a\"} {\"root\":\"b\"}")
}

/// Run one command against the playground button
pub fn execute(command: Command, button: &MainButton, bridge: &LocalBridge) -> Result<Flow> {
    debug!(?command, "Executing REPL command");

    match command {
        Command::Mount => {
            button.mount()?;
            println!("{}", "mounted".green());
        }
        Command::Unmount => {
            button.unmount();
            println!("{}", "unmounted".yellow());
        }
        Command::Set(params) => button.set_params(params),
        Command::Click => {
            let delivered = bridge.emit(MAIN_BUTTON_PRESSED, Value::Null);
            println!("click delivered to {} listener(s)", delivered.to_string().cyan());
        }
        Command::Show => {
            let state = serde_json::to_string_pretty(&button.state())?;
            println!(
                "{} {}",
                "mounted:".bold(),
                button.is_mounted().to_string().cyan()
            );
            println!("{}\n{}", "committed state:".bold(), state);
        }
        Command::Merge(partials) => {
            let merged = merge_class_names(&partials);
            println!("{}", serde_json::to_string_pretty(&merged)?.green());
        }
        Command::Help => print_help(),
        Command::Quit => return Ok(Flow::Quit),
    }

    Ok(Flow::Continue)
}

fn print_help() {
    println!("\n{}", "Commands:".bold());
    println!("  {}                 start syncing to storage and host", "mount".yellow());
    println!("  {}               stop syncing", "unmount".yellow());
    println!("  {}   update params, e.g. set text=\"Pay now\" is_visible=true", "set k=v ...".yellow());
    println!("  {}                 simulate a main button tap", "click".yellow());
    println!("  {}                  print the committed state", "show".yellow());
    println!("  {}    merge class-name mappings", "merge {..} {..}".yellow());
    println!("  {}                  leave the playground\n", "quit".yellow());
}

/// Print an outbound bridge event the way a host would receive it
pub fn print_outbound(event: &OutboundEvent) {
    let params = event
        .params
        .as_ref()
        .map(|p| p.to_string())
        .unwrap_or_else(|| "(no params)".to_string());

    let sent_at = chrono::DateTime::from_timestamp_millis(event.ts as i64)
        .map(|ts| ts.with_timezone(&chrono::Local))
        .unwrap_or_else(chrono::Local::now);

    println!(
        "📤 [{}] {} {}",
        sent_at.format("%H:%M:%S%.3f"),
        event.method.bright_white().bold(),
        params.dimmed()
    );
}

/// Read lines on a dedicated thread and forward them to the event loop
///
/// The channel closes on EOF, Ctrl-C or Ctrl-D.
pub fn spawn_line_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(16);

    std::thread::spawn(move || {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(e) => {
                warn!("Failed to start line editor: {}", e);
                return;
            }
        };

        loop {
            match rl.readline("miniapp> ") {
                Ok(line) => {
                    if line.trim().is_empty() {
                        continue;
                    }
                    let _ = rl.add_history_entry(line.as_str());
                    if tx.blocking_send(line).is_err() {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
                Err(e) => {
                    warn!("Failed to read line: {}", e);
                    break;
                }
            }
        }
    });

    rx
}
