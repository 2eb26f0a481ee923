use ai_client::{AiScorer, OpenAiConfig, OpenAiReasoningService};
use anyhow::{anyhow, Context, Result};
use catalog::seed::load_seed_file;
use catalog::{Difficulty, Preferences, Recommendation, SqliteStore, UserId, WorkoutFilter};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use engine::{CyclePath, EngineConfig, PersistOutcome, RecommendationCycle, RecommendationOrchestrator};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Workout Recs - Workout Recommendation Engine
#[derive(Parser)]
#[command(name = "workout-recs")]
#[command(about = "Workout recommendations scored by a language model", long_about = None)]
struct Cli {
    /// Path to the SQLite database
    #[arg(long, env = "WORKOUT_DB_PATH", default_value = "data/workouts.db")]
    db_path: PathBuf,

    #[command(flatten)]
    ai: AiArgs,

    /// Maximum number of scored recommendations per request
    #[arg(long, env = "WORKOUT_MAX_RECOMMENDATIONS", default_value = "10")]
    max_recommendations: usize,

    /// Try rule-based scoring before returning the whole catalog
    #[arg(long, env = "WORKOUT_HEURISTIC_FALLBACK")]
    heuristic_fallback: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct AiArgs {
    /// API key for the OpenAI-compatible endpoint
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    openai_api_key: Option<String>,

    /// Base URL of the OpenAI-compatible endpoint
    #[arg(long, env = "OPENAI_BASE_URL", default_value = ai_client::service::DEFAULT_BASE_URL)]
    openai_base_url: String,

    /// Model used for scoring
    #[arg(long, env = "OPENAI_MODEL", default_value = ai_client::service::DEFAULT_MODEL)]
    openai_model: String,

    /// Seconds to wait for the model before falling back
    #[arg(long, env = "AI_TIMEOUT_SECS", default_value = "30")]
    ai_timeout_secs: u64,
}

#[derive(Subcommand)]
enum Commands {
    /// Load users and workouts from a JSON seed file
    Seed {
        #[arg(long, default_value = "data/seed.json")]
        file: PathBuf,
    },

    /// List workouts, optionally filtered
    Workouts {
        /// Case-insensitive text to find in the name or description
        #[arg(long)]
        search: Option<String>,

        #[arg(long)]
        difficulty: Option<Difficulty>,

        /// Minimum duration in minutes (inclusive)
        #[arg(long)]
        min_duration: Option<u32>,

        /// Maximum duration in minutes (inclusive)
        #[arg(long)]
        max_duration: Option<u32>,

        /// Muscle group to target; repeat for several (any may match)
        #[arg(long = "muscle-group")]
        muscle_groups: Vec<String>,

        /// Equipment to use; repeat for several (any may match)
        #[arg(long)]
        equipment: Vec<String>,
    },

    /// Get workout recommendations
    Recommend {
        /// User to recommend for; anonymous when omitted
        #[arg(long)]
        user_id: Option<UserId>,

        /// Number of recommendations to return
        #[arg(long)]
        limit: Option<usize>,

        /// Show the reasoning for each recommendation
        #[arg(long)]
        explain: bool,

        /// Print the full cycle as JSON
        #[arg(long)]
        json: bool,
    },

    /// Replace a user's preferences
    Preferences {
        #[arg(long)]
        user_id: UserId,

        #[arg(long)]
        difficulty: Option<Difficulty>,

        /// Preferred duration in minutes
        #[arg(long)]
        duration: Option<u32>,

        #[arg(long = "muscle-group")]
        muscle_groups: Vec<String>,

        #[arg(long)]
        equipment: Vec<String>,

        #[arg(long = "goal")]
        goals: Vec<String>,
    },

    /// Show a user's profile and preferences
    User {
        #[arg(long)]
        user_id: UserId,
    },

    /// Show stored recommendations for a user
    History {
        #[arg(long)]
        user_id: UserId,
    },

    /// Check that the model endpoint answers
    PingAi,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let Cli {
        db_path,
        ai,
        max_recommendations,
        heuristic_fallback,
        command,
    } = Cli::parse();

    // The model check needs no database
    if let Commands::PingAi = command {
        return handle_ping(&ai).await;
    }

    let start = Instant::now();
    let store = Arc::new(
        SqliteStore::open(&db_path)
            .await
            .with_context(|| format!("Failed to open database {}", db_path.display()))?,
    );
    println!(
        "{} Opened {} in {:?}",
        "✓".green(),
        db_path.display(),
        start.elapsed()
    );

    let scorer = AiScorer::new(
        OpenAiReasoningService::new(openai_config(&ai))
            .context("Failed to configure reasoning service")?,
    );
    let max_recommendations = match &command {
        Commands::Recommend {
            limit: Some(limit), ..
        } => *limit,
        _ => max_recommendations,
    };
    let config = EngineConfig {
        max_recommendations,
        scoring_timeout: Duration::from_secs(ai.ai_timeout_secs),
        heuristic_fallback,
    };
    let orchestrator = RecommendationOrchestrator::new(store.clone(), Arc::new(scorer), config);

    // Dispatch to appropriate command handler
    match command {
        Commands::Seed { file } => handle_seed(&store, file).await?,
        Commands::Workouts {
            search,
            difficulty,
            min_duration,
            max_duration,
            muscle_groups,
            equipment,
        } => {
            let filter = WorkoutFilter {
                search,
                difficulty,
                min_duration,
                max_duration,
                muscle_groups: non_empty(muscle_groups),
                equipment: non_empty(equipment),
            };
            handle_workouts(&orchestrator, &filter).await?
        }
        Commands::Recommend {
            user_id,
            explain,
            json,
            ..
        } => handle_recommend(&orchestrator, user_id.as_deref(), explain, json).await?,
        Commands::Preferences {
            user_id,
            difficulty,
            duration,
            muscle_groups,
            equipment,
            goals,
        } => {
            let preferences = Preferences {
                difficulty,
                duration,
                muscle_groups: non_empty(muscle_groups),
                equipment: non_empty(equipment),
                goals: non_empty(goals),
            };
            handle_preferences(&orchestrator, &user_id, &preferences).await?
        }
        Commands::User { user_id } => handle_user(&orchestrator, &user_id).await?,
        Commands::History { user_id } => handle_history(&orchestrator, &user_id).await?,
        Commands::PingAi => handle_ping(&ai).await?,
    }

    Ok(())
}

fn openai_config(args: &AiArgs) -> OpenAiConfig {
    OpenAiConfig {
        base_url: args.openai_base_url.clone(),
        api_key: args.openai_api_key.clone().filter(|k| !k.trim().is_empty()),
        model: args.openai_model.clone(),
        ..OpenAiConfig::default()
    }
}

fn non_empty(values: Vec<String>) -> Option<Vec<String>> {
    (!values.is_empty()).then_some(values)
}

/// Handle the 'seed' command
async fn handle_seed(store: &SqliteStore, file: PathBuf) -> Result<()> {
    let seed = load_seed_file(&file)
        .with_context(|| format!("Failed to load seed file {}", file.display()))?;
    let (users, workouts) = seed.apply(store).await.context("Failed to write seed data")?;
    println!(
        "{} Seeded {} users and {} workouts",
        "✓".green(),
        users,
        workouts
    );
    Ok(())
}

/// Handle the 'workouts' command
async fn handle_workouts(
    orchestrator: &RecommendationOrchestrator,
    filter: &WorkoutFilter,
) -> Result<()> {
    let workouts = orchestrator.list_workouts(filter).await?;

    println!("{}", format!("Workouts ({}):", workouts.len()).bold().blue());
    for workout in &workouts {
        println!(
            "{} {} [{}] {} min - {}",
            workout.id.dimmed(),
            workout.name.bold(),
            workout.difficulty,
            workout.duration,
            workout.muscle_groups.join(", ")
        );
        if !workout.equipment.is_empty() {
            println!("   Equipment: {}", workout.equipment.join(", "));
        }
    }
    Ok(())
}

/// Handle the 'recommend' command
async fn handle_recommend(
    orchestrator: &RecommendationOrchestrator,
    user_id: Option<&str>,
    explain: bool,
    json: bool,
) -> Result<()> {
    if let Some(id) = user_id {
        if orchestrator.user(id).await?.is_none() {
            println!(
                "{} User {} not found; recommending without preferences",
                "!".yellow(),
                id
            );
        }
    }

    let cycle = orchestrator.get_recommendations(user_id).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&cycle)?);
    } else {
        print_cycle(&cycle, explain);
    }
    Ok(())
}

/// Handle the 'preferences' command
async fn handle_preferences(
    orchestrator: &RecommendationOrchestrator,
    user_id: &str,
    preferences: &Preferences,
) -> Result<()> {
    let user = orchestrator
        .update_preferences(user_id, preferences)
        .await?
        .ok_or_else(|| anyhow!("User {} not found", user_id))?;

    println!("{} Updated preferences for {}", "✓".green(), user.name);
    println!("{}", serde_json::to_string_pretty(&user.preferences)?);
    Ok(())
}

/// Handle the 'user' command
async fn handle_user(orchestrator: &RecommendationOrchestrator, user_id: &str) -> Result<()> {
    let user = orchestrator
        .user(user_id)
        .await?
        .ok_or_else(|| anyhow!("User {} not found", user_id))?;

    println!("{}", format!("User ID: {}", user.id).bold().blue());
    println!("{}Name: {}", "• ".green(), user.name);
    println!("{}Email: {}", "• ".green(), user.email);
    println!("{}Fitness level: {}", "• ".green(), user.fitness_level);

    let prefs = &user.preferences;
    if prefs.is_empty() {
        println!("{}Preferences: none", "• ".cyan());
        return Ok(());
    }
    println!("{}Preferences:", "• ".cyan());
    if let Some(difficulty) = prefs.difficulty {
        println!("  - Difficulty: {}", difficulty);
    }
    if let Some(duration) = prefs.duration {
        println!("  - Duration: {} min", duration);
    }
    for (label, values) in [
        ("Muscle groups", &prefs.muscle_groups),
        ("Equipment", &prefs.equipment),
        ("Goals", &prefs.goals),
    ] {
        if let Some(values) = values {
            println!("  - {}: {}", label, values.join(", "));
        }
    }
    Ok(())
}

/// Handle the 'history' command
async fn handle_history(orchestrator: &RecommendationOrchestrator, user_id: &str) -> Result<()> {
    let history = orchestrator.recommendation_history(user_id).await?;

    println!(
        "{}",
        format!("Stored recommendations for {} ({}):", user_id, history.len())
            .bold()
            .blue()
    );
    for (rank, rec) in history.iter().enumerate() {
        let source = rec
            .origin()
            .map_or("unknown", |origin| origin.label());
        println!(
            "{}. {} - Confidence: {:.2} ({}, {})",
            (rank + 1).to_string().green(),
            rec.workout_id,
            rec.confidence,
            source,
            rec.created_at.format("%Y-%m-%d %H:%M")
        );
        if let Some(reasoning) = &rec.reasoning {
            println!("   {}", reasoning.dimmed());
        }
    }
    Ok(())
}

/// Handle the 'ping-ai' command
async fn handle_ping(args: &AiArgs) -> Result<()> {
    let service = OpenAiReasoningService::new(openai_config(args))
        .context("Failed to configure reasoning service")?;
    let start = Instant::now();
    let answer = service.ping().await.context("Reasoning service did not answer")?;
    println!(
        "{} {} answered {:?} in {:?}",
        "✓".green(),
        args.openai_model,
        answer.trim(),
        start.elapsed()
    );
    Ok(())
}

/// Helper function to format and print a recommendation cycle
fn print_cycle(cycle: &RecommendationCycle, explain: bool) {
    let source = match cycle.path {
        CyclePath::AiScored => "AI scored".green(),
        CyclePath::HeuristicScored => "rule-based fallback".yellow(),
        CyclePath::CatalogFallback => "full catalog fallback".yellow(),
    };
    println!("{} ({})", "Workout Recommendations:".bold().blue(), source);

    for (rank, rec) in cycle.recommendations.iter().enumerate() {
        print_recommendation(rank + 1, rec, explain);
    }

    match &cycle.persistence {
        PersistOutcome::Persisted(report) if report.skipped() > 0 => println!(
            "{} Saved {} recommendations ({} not saved)",
            "✓".green(),
            report.written,
            report.skipped()
        ),
        PersistOutcome::Persisted(report) => {
            println!("{} Saved {} recommendations", "✓".green(), report.written)
        }
        PersistOutcome::Skipped { reason } => {
            println!("{} Recommendations not saved: {}", "✗".red(), reason)
        }
    }
}

fn print_recommendation(rank: usize, rec: &Recommendation, explain: bool) {
    let workout = &rec.workout;
    println!(
        "{}. {} [{}] {} min - {} - Confidence: {:.2}",
        rank.to_string().green(),
        workout.name,
        workout.difficulty,
        workout.duration,
        workout.muscle_groups.join(", "),
        rec.confidence
    );
    if explain {
        match &rec.reasoning {
            Some(reasoning) => println!("   Reasoning: {}", reasoning),
            None => println!("   Reasoning: {}", "(none)".dimmed()),
        }
    }
}
