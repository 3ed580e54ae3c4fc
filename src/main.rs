use clap::Parser;
use colored::*;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::Editor;
use std::io;
use std::process;
use std::sync::Arc;
use tokio::time::{timeout, Duration};

use pm_chat::api::{AgentApi, HttpAgentClient};
use pm_chat::chat::{
    help_text, parse_command, ChatCommand, ChatSessionClient, HealthProbe, OutboundRequest,
};
use pm_chat::cli::Args;
use pm_chat::config::{Config, FileConfig};
use pm_chat::error::{ChatError, Result};
use pm_chat::models::ConnectionStatus;
use pm_chat::ui::{
    display_diagnostic, format_status, print_error, print_info, ComposerHelper, DiagnosticLog,
    PromptGate, TerminalRenderer,
};

const PROMPT: &str = "> ";
const HEALTH_GRACE_MILLIS: u64 = 300;

type LineEditor = Editor<ComposerHelper, DefaultHistory>;

#[derive(PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if let Err(e) = run(args).await {
        print_error(&e.to_string());
        process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    if args.config_init {
        let path = FileConfig::default_init_path()?;
        FileConfig::write_example(&path)?;
        println!(
            "{}",
            format!("Wrote example config to {}", path.display()).green()
        );
        return Ok(());
    }

    let config = Config::from_env_and_args(&args)?;
    if !config.color {
        colored::control::set_override(false);
    }
    display_diagnostic(config.verbose, &format!("Agent endpoint: {}", config.base_url));

    let agent = Arc::new(HttpAgentClient::new(
        &config.base_url,
        config.request_timeout,
        config.health_timeout,
    )?);

    let mut client = ChatSessionClient::new(agent);
    let gate = PromptGate::default();
    let mut view = TerminalRenderer::stdout(config.welcome.clone(), config.examples.clone());
    client.subscribe(Box::new(TerminalRenderer::new(
        gate.writer(io::stdout()),
        config.welcome.clone(),
        config.examples.clone(),
    )));
    client.subscribe(Box::new(DiagnosticLog::new(config.verbose)));
    display_diagnostic(
        config.verbose,
        &format!("Session ID: {}", client.session_id()),
    );

    println!("{}", "Product Management Agent".bold());
    view.render_welcome()?;

    let mut probe = HealthProbe::default();
    if config.health_check {
        println!("{}", format_status(client.status()));
        probe = HealthProbe::spawn(client.agent(), config.verbose);
        // Give a fast service the chance to report before the first prompt.
        let grace = Duration::from_millis(HEALTH_GRACE_MILLIS);
        if let Ok(status) = timeout(grace, probe.finished()).await {
            client.set_status(status);
        }
    }

    if let Some(message) = args.initial_message() {
        client.composer_mut().set_text(message);
        send_composer(&mut client, &mut probe).await;
    }

    let mut rl: LineEditor = Editor::new()?;
    rl.set_helper(Some(ComposerHelper::new(config.color)));
    match rl.create_external_printer() {
        Ok(printer) => gate.attach(printer),
        Err(e) => display_diagnostic(
            config.verbose,
            &format!("Background output disabled: {}", e),
        ),
    }
    println!("{}", "Type /help for commands, /quit to exit\n".dimmed());

    loop {
        let (editor, line) = read_line(rl, &mut client, &mut probe, &gate).await?;
        rl = editor;

        match line {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(line.trim());

                if let Some(command) = parse_command(&line) {
                    let flow =
                        handle_command(command, &mut client, &mut view, &config, &mut probe)
                            .await?;
                    if flow == Flow::Quit {
                        break;
                    }
                    continue;
                }

                client.composer_mut().set_text(line);
                send_composer(&mut client, &mut probe).await;
            }
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        }
    }

    println!("Goodbye!");
    Ok(())
}

/// Read one line on a blocking thread so the health probe can still report meanwhile.
async fn read_line(
    mut rl: LineEditor,
    client: &mut ChatSessionClient,
    probe: &mut HealthProbe,
    gate: &PromptGate,
) -> Result<(LineEditor, std::result::Result<String, ReadlineError>)> {
    gate.set_prompt_open(true);
    let reading = tokio::task::spawn_blocking(move || {
        let line = rl.readline(PROMPT);
        (rl, line)
    });
    let joined = client.wait_with_probe(probe, reading).await;
    gate.set_prompt_open(false);
    joined.map_err(|e| ChatError::Other(format!("input thread failed: {}", e)))
}

/// Send the composer contents, racing the reply against Ctrl+C.
async fn send_composer(client: &mut ChatSessionClient, probe: &mut HealthProbe) {
    let text = client.composer().text().to_string();
    let Some(OutboundRequest { ticket, payload }) = client.begin_submit(&text) else {
        return;
    };

    let agent: Arc<dyn AgentApi> = client.agent();
    let reply = async {
        tokio::select! {
            result = agent.send_message(&payload) => Some(result),
            _ = tokio::signal::ctrl_c() => None,
        }
    };
    match client.wait_with_probe(probe, reply).await {
        Some(result) => {
            client.complete(ticket, result);
        }
        None => {
            client.abandon_pending();
        }
    }
}

async fn handle_command(
    command: ChatCommand,
    client: &mut ChatSessionClient,
    view: &mut TerminalRenderer<io::Stdout>,
    config: &Config,
    probe: &mut HealthProbe,
) -> Result<Flow> {
    match command {
        ChatCommand::Quit => return Ok(Flow::Quit),
        ChatCommand::New => client.start_new_conversation(),
        ChatCommand::Status => {
            probe.cancel();
            let checked = client
                .check_connectivity_until(config.verbose, tokio::signal::ctrl_c())
                .await;
            match checked {
                Some(ConnectionStatus::Connected) => {
                    print_info(&format!("Agent reachable at {}", config.base_url))
                }
                Some(_) => {}
                None => print_info("Stopped the status check."),
            }
        }
        ChatCommand::History => view.render_history(client.state().messages())?,
        ChatCommand::Session => print_info(&format!("Session ID: {}", client.session_id())),
        ChatCommand::Examples => {
            if config.examples.is_empty() {
                print_info("No example prompts configured.");
            } else {
                view.render_examples()?;
            }
        }
        ChatCommand::Example(index) => match config.examples.get(index - 1) {
            Some(example) => {
                client.composer_mut().set_text(example.clone());
                send_composer(client, probe).await;
            }
            None => print_info(&format!(
                "There is no example {} (have {}).",
                index,
                config.examples.len()
            )),
        },
        ChatCommand::Help => {
            for line in help_text().lines() {
                println!("    {}", line);
            }
        }
        ChatCommand::Invalid(message) => print_info(&message),
    }
    Ok(Flow::Continue)
}
