//! Interactive terminal chat with the FlowFix assistant.
//!
//! This binary hosts one chat widget in a REPL and relays each message to
//! the assistant's `POST /chat` endpoint.
//!
//! # Usage
//!
//! ```bash
//! # Talk to a local assistant on http://127.0.0.1:5000/
//! flowfix-chat
//!
//! # Point at another deployment
//! flowfix-chat --url https://assist.flowfix.example/
//!
//! # Send a session id with each message and log the exchanges
//! flowfix-chat --session-id visitor-42 --verbose
//! ```
//!
//! # Commands
//!
//! While chatting, you can use slash commands:
//! - `/help` - Show available commands
//! - `/open`, `/close` - Show or hide the chat
//! - `/new` - Start a fresh conversation
//! - `/history` - Print the conversation so far
//! - `/save <file>` - Save the conversation as JSON
//! - `/stats` - Show session statistics
//! - `/quit` - Exit the application

use std::sync::Arc;

use arrrg::CommandLine;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use flowfix::chat::{
    ChatArgs, ChatCommand, ChatConfig, ChatWidget, PlainTextRenderer, Renderer, SubmitOutcome,
    help_text, parse_command,
};
use flowfix::{FlowFix, StderrLogger};

/// Main entry point for the flowfix-chat application.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (args, _) = ChatArgs::from_command_line_relaxed("flowfix-chat [OPTIONS]");
    let config = ChatConfig::from(args);

    let mut client = FlowFix::with_options(
        Some(config.base_url.clone()),
        Some(config.timeout),
        config.session_id.clone(),
    )?;
    if config.verbose {
        client = client.with_logger(Arc::new(StderrLogger::new()));
    }

    let mut renderer = PlainTextRenderer::with_color(config.use_color);
    let mut widget = ChatWidget::new();
    let mut rl = DefaultEditor::new()?;

    println!("FlowFix Chat ({})", client.endpoint());
    println!("Type /help for commands, /quit to exit\n");
    open_widget(&mut widget, &mut renderer);

    loop {
        let readline = rl.readline("You: ");

        match readline {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(line.as_str());

                if let Some(cmd) = parse_command(&line) {
                    match cmd {
                        ChatCommand::Quit => {
                            println!("Goodbye!");
                            break;
                        }
                        ChatCommand::Open => open_widget(&mut widget, &mut renderer),
                        ChatCommand::Close => {
                            widget.close();
                            renderer.print_info("Chat hidden. Use /open to continue.");
                        }
                        ChatCommand::New => {
                            widget.reset();
                            renderer.print_info("Started a new conversation.");
                            if let Some(greeting) =
                                widget.session().and_then(|s| s.last_message())
                            {
                                renderer.print_message(greeting);
                            }
                        }
                        ChatCommand::History => match widget.session() {
                            Some(session) => {
                                for message in session.transcript() {
                                    renderer.print_message(message);
                                }
                            }
                            None => renderer.print_info("No conversation yet."),
                        },
                        ChatCommand::SaveTranscript(path) => match widget.session() {
                            Some(session) => match session.save_transcript_to(&path) {
                                Ok(_) => {
                                    renderer.print_info(&format!("Transcript saved to {}", path))
                                }
                                Err(err) => renderer
                                    .print_error(&format!("Failed to save transcript: {}", err)),
                            },
                            None => renderer.print_info("No conversation yet."),
                        },
                        ChatCommand::Stats => print_stats(&widget),
                        ChatCommand::ShowConfig => print_config(&config, &client),
                        ChatCommand::Help => {
                            for line in help_text().lines() {
                                println!("    {}", line);
                            }
                        }
                        ChatCommand::Invalid(message) => {
                            renderer.print_error(&message);
                        }
                    }
                    continue;
                }

                if !widget.is_open() {
                    renderer.print_info("Chat is hidden. Use /open to continue.");
                    continue;
                }

                renderer.start_typing();
                let outcome = widget.submit(&client, &line).await;
                renderer.finish_typing();
                match outcome {
                    Some(SubmitOutcome::Replied) | Some(SubmitOutcome::FellBack) => {
                        if let Some(reply) = widget.session().and_then(|s| s.last_message()) {
                            renderer.print_message(reply);
                        }
                    }
                    Some(SubmitOutcome::RejectedBusy) => {
                        renderer.print_info("Still waiting for the last reply.");
                    }
                    Some(SubmitOutcome::RejectedEmpty) | None => {}
                }
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl+C at prompt - soft interrupt
                println!();
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("\nGoodbye!");
                break;
            }
            Err(err) => {
                renderer.print_error(&format!("Input error: {}", err));
                break;
            }
        }
    }

    Ok(())
}

fn open_widget(widget: &mut ChatWidget, renderer: &mut PlainTextRenderer) {
    if widget.is_open() {
        return;
    }
    if widget.open() {
        if let Some(greeting) = widget.session().and_then(|s| s.last_message()) {
            renderer.print_message(greeting);
        }
    } else {
        renderer.print_info("Chat reopened. Use /history to see the conversation.");
    }
}

fn print_stats(widget: &ChatWidget) {
    let Some(session) = widget.session() else {
        println!("    No conversation yet.");
        return;
    };
    let stats = session.stats();
    println!("    Session Statistics:");
    println!("      Visible: {}", if widget.is_open() { "yes" } else { "no" });
    println!("      Messages: {}", stats.message_count);
    println!("      User turns: {}", stats.user_turns);
    println!("      Assistant turns: {}", stats.assistant_turns);
    println!("      Fallback replies: {}", stats.fallback_count);
    println!(
        "      Awaiting response: {}",
        if stats.awaiting_response { "yes" } else { "no" }
    );
}

fn print_config(config: &ChatConfig, client: &FlowFix) {
    println!("    Current Configuration:");
    println!("      Endpoint: {}", client.endpoint());
    println!("      Timeout: {}s", config.timeout.as_secs());
    match config.session_id.as_deref() {
        Some(id) => println!("      Session id: {}", id),
        None => println!("      Session id: (none)"),
    }
    println!(
        "      Color: {}",
        if config.use_color { "on" } else { "off" }
    );
    println!(
        "      Exchange logging: {}",
        if config.verbose { "on" } else { "off" }
    );
}
