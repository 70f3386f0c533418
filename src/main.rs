mod cli;

use std::io::Write;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use elicit_engine::models::CompanyProfile;
use elicit_engine::{Engine, EngineConfig, PriorKnowledge, QuizStep};

use crate::cli::{CheckConfigArgs, Cli, Commands, InterviewArgs, QuizArgs, SessionArgs};

#[tokio::main]
async fn main() {
    init_tracing();

    if let Err(err) = run().await {
        error!(error = %err, "command failed");
        for cause in err.chain().skip(1) {
            error!(cause = %cause, "caused by");
        }
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Interview(args) => run_interview(args).await,
        Commands::Quiz(args) => run_quiz(args).await,
        Commands::CheckConfig(args) => check_config(args).await,
    }
}

fn init_tracing() {
    let env_filter =
        EnvFilter::try_from_env("ELICIT_LOG").unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(args: &SessionArgs) -> Result<EngineConfig> {
    match &args.config {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => Ok(EngineConfig::default()),
    }
}

/// Prompts go to stdout, or to stderr when stdout is reserved for JSON.
struct Console {
    json: bool,
    lines: Lines<BufReader<Stdin>>,
}

impl Console {
    fn new(json: bool) -> Self {
        Self {
            json,
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }

    fn say(&self, text: &str) -> Result<()> {
        if text.is_empty() {
            return Ok(());
        }
        if self.json {
            writeln!(std::io::stderr(), "{}", text)?;
        } else {
            let mut stdout = std::io::stdout();
            writeln!(stdout, "{}", text)?;
            stdout.flush()?;
        }
        Ok(())
    }

    /// Next non-blank answer, `None` at end of input.
    async fn answer(&mut self) -> Result<Option<String>> {
        while let Some(line) = self.lines.next_line().await.context("failed to read stdin")? {
            if !line.trim().is_empty() {
                return Ok(Some(line));
            }
        }
        Ok(None)
    }

    fn finish<T: serde::Serialize>(&self, value: &T) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        }
        Ok(())
    }
}

async fn run_interview(args: InterviewArgs) -> Result<()> {
    let engine = Engine::from_config(load_config(&args.session)?)?;
    let mut console = Console::new(args.session.json);
    let mut session = engine.start_interview();

    console.say(session.opening_question())?;
    while !session.is_complete() {
        let Some(answer) = console.answer().await? else {
            info!(interview_id = %session.id(), "Input ended before the interview completed");
            break;
        };
        let turn = session.submit_answer(&answer).await?;
        console.say(&turn.acknowledgment)?;
        console.say(&turn.next_question)?;
    }

    console.finish(&serde_json::json!({
        "progress": session.progress(),
        "state": session.state(),
    }))?;
    engine.shutdown();
    Ok(())
}

async fn run_quiz(args: QuizArgs) -> Result<()> {
    let engine = Engine::from_config(load_config(&args.session)?)?;
    let mut console = Console::new(args.session.json);
    let mut session = engine.start_quiz(&prior_knowledge(&args));

    let mut step = session.next_question().await;
    loop {
        let text = match &step {
            QuizStep::Question(question) => question.text.clone(),
            QuizStep::Finished { .. } => break,
        };
        console.say(&text)?;
        let Some(answer) = console.answer().await? else {
            info!(quiz_id = %session.id(), "Input ended before the quiz finished");
            break;
        };
        let turn = session.submit_answer(&answer).await?;
        console.say(&turn.acknowledgment)?;
        step = turn.next;
    }

    if let QuizStep::Finished { reason, .. } = &step {
        console.say(&format!("Quiz finished ({:?}).", reason))?;
    }
    console.finish(&serde_json::json!({
        "progress": session.progress(),
        "state": session.state(),
    }))?;
    engine.shutdown();
    Ok(())
}

fn prior_knowledge(args: &QuizArgs) -> PriorKnowledge {
    let has_company =
        args.company.is_some() || args.industry.is_some() || args.employees.is_some();
    PriorKnowledge {
        company: has_company.then(|| CompanyProfile {
            name: args.company.clone(),
            employee_count: args.employees,
            industry: args.industry.clone(),
            ..Default::default()
        }),
        technologies: args.technologies.clone(),
    }
}

async fn check_config(args: CheckConfigArgs) -> Result<()> {
    let config = EngineConfig::load(&args.config)
        .with_context(|| format!("invalid config {}", args.config.display()))?;
    info!(
        path = %args.config.display(),
        signals = config.signals.len(),
        llm = config.llm.is_some(),
        "Configuration is valid"
    );
    if args.ping {
        let engine = Engine::from_config(config)?;
        engine.ping().await.context("model collaborator is not usable")?;
    }
    println!("{}: ok", args.config.display());
    Ok(())
}
