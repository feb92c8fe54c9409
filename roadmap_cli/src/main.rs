use clap::{Parser, Subcommand};
use roadmap_core::*;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "manabi")]
#[command(about = "Adaptive learning roadmap and session runner", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the adaptive roadmap (default)
    Plan,

    /// Run an answer session for a topic
    Session {
        /// Topic id to practice
        #[arg(long)]
        topic: String,

        /// Session mode (practice, review, final)
        #[arg(long, default_value = "practice")]
        mode: String,

        /// Override the question cap (review) or total (final)
        #[arg(long)]
        max: Option<u32>,

        /// Scripted verdicts for non-interactive runs: 'c' correct,
        /// 'x' incorrect (e.g. --answers ccxcc)
        #[arg(long)]
        answers: Option<String>,
    },

    /// Roll up WAL attempts to CSV
    Rollup {
        /// Clean up processed WAL files after rollup
        #[arg(long)]
        cleanup: bool,
    },

    /// Show recent attempts
    History {
        /// Window in days
        #[arg(long, default_value_t = 7)]
        days: i64,
    },
}

struct DataPaths {
    state: PathBuf,
    overrides: PathBuf,
    wal: PathBuf,
    wal_dir: PathBuf,
    csv: PathBuf,
}

impl DataPaths {
    fn new(data_dir: &Path) -> Self {
        let wal_dir = data_dir.join("wal");
        Self {
            state: data_dir.join("state.json"),
            overrides: data_dir.join("mastered.json"),
            wal: wal_dir.join("attempts.wal"),
            wal_dir,
            csv: data_dir.join("attempts.csv"),
        }
    }
}

fn main() -> Result<()> {
    roadmap_core::logging::init();

    let cli = Cli::parse();

    let config = Config::load()?;
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());

    match cli.command {
        Some(Commands::Plan) | None => cmd_plan(&data_dir),
        Some(Commands::Session {
            topic,
            mode,
            max,
            answers,
        }) => cmd_session(&data_dir, &topic, &mode, max, answers, &config),
        Some(Commands::Rollup { cleanup }) => cmd_rollup(&data_dir, cleanup),
        Some(Commands::History { days }) => cmd_history(&data_dir, days),
    }
}

fn cmd_plan(data_dir: &Path) -> Result<()> {
    let paths = DataPaths::new(data_dir);
    let now = chrono::Utc::now();

    let curriculum = get_default_curriculum();
    let warnings = curriculum.validate();
    for warning in &warnings {
        eprintln!("curriculum warning: {}", warning);
    }

    let state = LearnerState::load(&paths.state)?;
    let mastered = load_manual_overrides(&paths.overrides)?;
    let progress = build_progress_map(&state.records, &mastered, now);

    let nodes = curriculum.base_order();
    let input = SequencingInput {
        nodes: nodes.clone(),
        edges: curriculum.edges.clone(),
        base_order: nodes,
        mastery: progress.clone(),
    };
    let order = sequence(&input, now);

    let graph = PrereqGraph::build(&input.nodes, &input.edges);
    let locked = graph.locked_set(&progress);

    println!("Learning roadmap ({} topics):\n", order.len());
    for (i, id) in order.iter().enumerate() {
        let record = progress.get(id);
        let rank = mastery_rank(record);
        let due_marker = if is_due(record, now) { " [due]" } else { "" };
        let lock_marker = if locked.contains(id) { " [locked]" } else { "" };

        let detail = match curriculum.topic(id) {
            Some(topic) => match &topic.section {
                Some(section) => format!("{} / {}", topic.unit.label(), section),
                None => topic.unit.label().to_string(),
            },
            None => String::new(),
        };

        println!(
            "{:>3}. {:<36} {}{}{}",
            i + 1,
            id,
            rank.label(),
            due_marker,
            lock_marker
        );
        if !detail.is_empty() {
            println!("     {}", detail);
        }
    }

    Ok(())
}

fn cmd_session(
    data_dir: &Path,
    topic_id: &str,
    mode_arg: &str,
    max: Option<u32>,
    answers: Option<String>,
    config: &Config,
) -> Result<()> {
    let paths = DataPaths::new(data_dir);
    std::fs::create_dir_all(&paths.wal_dir)?;

    let mode = match mode_arg.to_lowercase().as_str() {
        "practice" => SessionMode::Practice,
        "review" => SessionMode::Review,
        "final" => SessionMode::Final,
        other => {
            return Err(Error::Other(format!("Unknown session mode: {}", other)));
        }
    };

    let curriculum = get_default_curriculum();
    if curriculum.topic(topic_id).is_none() {
        return Err(Error::Other(format!("Unknown topic: {}", topic_id)));
    }

    // Locking is advisory: warn, but let the learner proceed
    let now = chrono::Utc::now();
    let state = LearnerState::load(&paths.state)?;
    let mastered = load_manual_overrides(&paths.overrides)?;
    let progress = build_progress_map(&state.records, &mastered, now);
    let nodes = curriculum.base_order();
    let graph = PrereqGraph::build(&nodes, &curriculum.edges);
    if graph.is_locked(topic_id, &progress) {
        let prereqs = graph.prereqs_of(topic_id);
        println!(
            "Note: prerequisites not yet solid: {}",
            prereqs.join(", ")
        );
    }

    let mut limits = config.session_limits();
    if let Some(max) = max {
        limits.max_questions = max;
        limits.final_total = max;
    }

    let mut scripted = answers.map(ScriptedVerdicts::new);
    let mut session = Session::new(mode, limits);
    let mut sink = JsonlSink::new(&paths.wal);

    loop {
        if session.fetch_next().is_err() {
            break;
        }
        let snap = session.snapshot();
        println!("\n── Question {} on {} ──", snap.answered_count + 1, topic_id);

        // Grading itself is an external collaborator; here the learner
        // self-reports. A failed/aborted verdict leaves the session as-is.
        let verdict = match scripted.as_mut() {
            Some(script) => match script.next() {
                Some(v) => v,
                None => break, // script exhausted, end the session
            },
            None => match prompt_verdict()? {
                Some(v) => v,
                None => {
                    println!("Session ended.");
                    break;
                }
            },
        };

        let srs_event = session.would_finish_review(verdict);
        let attempt = AttemptRecord {
            id: uuid::Uuid::new_v4(),
            topic_id: topic_id.to_string(),
            mode,
            is_correct: verdict,
            srs_event,
            answered_at: chrono::Utc::now(),
        };
        sink.append(&attempt)?;

        session.submit_answer(verdict)?;

        let snap = session.snapshot();
        println!(
            "Answered: {} | Streak: {} | Correct: {}",
            snap.answered_count, snap.correct_streak, snap.correct_count
        );

        if snap.complete {
            print_completion(&session);
            break;
        }
    }

    Ok(())
}

fn print_completion(session: &Session) {
    let snap = session.snapshot();
    match snap.completion_reason {
        Some(CompletionReason::Streak) => {
            println!(
                "\n✓ Review complete: {} correct in a row!",
                snap.correct_streak
            );
        }
        Some(CompletionReason::Cap) => {
            println!(
                "\n✓ Review complete: question cap reached ({} answered). \
                 This topic will come back around.",
                snap.answered_count
            );
        }
        Some(CompletionReason::FinalTotal) => {
            if let Some(result) = session.final_result() {
                println!(
                    "\n✓ Final complete: {} / {} correct — {}",
                    result.correct,
                    result.total,
                    if result.passed { "PASSED" } else { "not passed" }
                );
            }
        }
        None => {}
    }
}

fn cmd_rollup(data_dir: &Path, cleanup: bool) -> Result<()> {
    let paths = DataPaths::new(data_dir);

    if !paths.wal.exists() {
        println!("No WAL file found - nothing to roll up.");
        return Ok(());
    }

    let count = roadmap_core::csv_rollup::wal_to_csv_and_archive(&paths.wal, &paths.csv)?;

    println!("✓ Rolled up {} attempts to CSV", count);
    println!("  CSV: {}", paths.csv.display());

    if cleanup {
        let cleaned = roadmap_core::csv_rollup::cleanup_processed_wals(&paths.wal_dir)?;
        if cleaned > 0 {
            println!("✓ Cleaned up {} processed WAL files", cleaned);
        }
    }

    Ok(())
}

fn cmd_history(data_dir: &Path, days: i64) -> Result<()> {
    let paths = DataPaths::new(data_dir);
    let attempts = load_recent_attempts(&paths.wal, &paths.csv, days)?;

    if attempts.is_empty() {
        println!("No attempts in the last {} days.", days);
        return Ok(());
    }

    println!("Attempts in the last {} days:\n", days);
    for attempt in &attempts {
        println!(
            "  {}  {:<36} {:?}  {}{}",
            attempt.answered_at.format("%Y-%m-%d %H:%M"),
            attempt.topic_id,
            attempt.mode,
            if attempt.is_correct { "correct" } else { "incorrect" },
            if attempt.srs_event { "  [srs]" } else { "" }
        );
    }

    Ok(())
}

/// Scripted verdict stream for non-interactive runs
struct ScriptedVerdicts {
    verdicts: Vec<bool>,
    next: usize,
}

impl ScriptedVerdicts {
    fn new(script: String) -> Self {
        let verdicts = script
            .chars()
            .filter_map(|c| match c.to_ascii_lowercase() {
                'c' => Some(true),
                'x' => Some(false),
                _ => None,
            })
            .collect();
        Self { verdicts, next: 0 }
    }

    fn next(&mut self) -> Option<bool> {
        let v = self.verdicts.get(self.next).copied();
        self.next += 1;
        v
    }
}

/// Prompt for the learner's answer, validate it at the boundary, then ask
/// for the self-graded verdict. Returns None to end the session.
fn prompt_verdict() -> Result<Option<bool>> {
    let answer = loop {
        print!("Your answer (or 'q' to quit): ");
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        let trimmed = input.trim().to_string();

        if trimmed.eq_ignore_ascii_case("q") {
            return Ok(None);
        }

        let payload = AnswerPayload::Single { value: trimmed };
        match payload.validate() {
            Ok(()) => break payload,
            Err(e) => println!("{}", e),
        }
    };

    // Self-graded: compare against the answer key on paper
    if let AnswerPayload::Single { value } = &answer {
        println!("You answered: {}", value);
    }

    loop {
        print!("Was that correct? [y/n]: ");
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;

        match input.trim().to_lowercase().as_str() {
            "y" | "yes" => return Ok(Some(true)),
            "n" | "no" => return Ok(Some(false)),
            "q" => return Ok(None),
            _ => println!("Please answer y or n."),
        }
    }
}
