use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use interview_voice::{
    create_router, format_questions, interviewer, AppState, CallEvent, ChannelRecognizer, Config,
    ConsoleSynthesizer, EventKind, HttpCompletionClient, UpstreamGenerator, VariableValues,
    VoiceCall,
};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "interview-voice", version, about = "Voice-driven mock interviews")]
struct Cli {
    /// Config file (without extension)
    #[arg(long, default_value = "config/interview-voice")]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the chat relay HTTP server
    Serve,

    /// Hold an interview in the terminal; each line you type is one utterance
    Console {
        /// Interview question (repeatable)
        #[arg(long = "question", short = 'q')]
        questions: Vec<String>,

        /// Extra prompt variable as key=value (repeatable)
        #[arg(long = "var", value_parser = parse_var)]
        vars: Vec<(String, String)>,
    },
}

fn parse_var(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.trim().to_string(), v.to_string()))
        .ok_or_else(|| format!("expected key=value, got '{}'", raw))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let cfg = Config::load(&cli.config)?;

    info!("Interview Voice v{}", env!("CARGO_PKG_VERSION"));
    info!("Loaded config: {}", cfg.service.name);

    match cli.command {
        Command::Serve => serve(cfg).await,
        Command::Console { questions, vars } => console(cfg, questions, vars).await,
    }
}

async fn serve(cfg: Config) -> Result<()> {
    let generator = UpstreamGenerator::new(cfg.upstream.clone())?;
    let app = create_router(AppState::new(Arc::new(generator)));

    let addr = format!("{}:{}", cfg.service.http.bind, cfg.service.http.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Chat relay listening on {}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}

async fn console(cfg: Config, questions: Vec<String>, vars: Vec<(String, String)>) -> Result<()> {
    let completion =
        HttpCompletionClient::new(cfg.completion.endpoint.clone(), cfg.completion.timeout())?;
    info!("Using chat endpoint {}", completion.endpoint());

    let (recognizer, feed) = ChannelRecognizer::new();
    let call = VoiceCall::new(
        Some(Box::new(recognizer)),
        Arc::new(ConsoleSynthesizer::new("Interviewer")),
        Arc::new(completion),
        cfg.call_config(),
    );

    call.on(EventKind::Error, |event| {
        if let CallEvent::Error(e) = event {
            warn!("{}", e);
        }
    });
    call.on(EventKind::CallEnd, |_| info!("Call ended"));

    let mut variables: VariableValues = vars.into_iter().collect();
    variables
        .entry("questions".to_string())
        .or_insert_with(|| format_questions(&questions));

    call.start(interviewer(), &variables).await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => match line? {
                Some(line) if !line.trim().is_empty() => {
                    if !feed.final_text(line) {
                        warn!("Not listening, line ignored");
                    }
                }
                Some(_) => {}
                None => break,
            },
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    call.stop().await;
    let stats = call.stats().await;
    info!(
        "Interview finished: {} turns in {:.1}s",
        stats.turns_completed, stats.duration_secs
    );

    Ok(())
}
