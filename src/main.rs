//! gymcoach - Workout planning core for a conversational fitness coach

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use gymcoach::config::{DEFAULT_DB_PATH, DeletePolicy, Settings};
use gymcoach::profile::{ExperienceLevel, ProfileUpdate, WeightUnit};
use gymcoach::progress::Progress;
use gymcoach::resolver::NameResolver;
use gymcoach::workout::day::monday_of;
use gymcoach::workout::{NewSet, PlanInput, SessionInput, SessionUpdate, SetUpdate};
use gymcoach::{Database, Profiles, Scheduler, Tracker};

#[derive(Parser)]
#[command(name = "gymcoach")]
#[command(author, version, about = "Workout plans, sessions and exercise-name resolution")]
struct Cli {
    /// SQLite database file
    #[arg(long, global = true, env = "GYMCOACH_DB", default_value = DEFAULT_DB_PATH)]
    db: PathBuf,

    /// Acting user
    #[arg(long, global = true, env = "GYMCOACH_USER")]
    user: Option<Uuid>,

    /// Which sessions may be deleted
    #[arg(long, global = true, env = "GYMCOACH_DELETE_POLICY", value_enum, default_value_t = DeletePolicy::Unconditional)]
    delete_policy: DeletePolicy,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the built-in exercise catalog
    Seed,

    /// Resolve exercise names to their canonical form
    Resolve {
        names: Vec<String>,

        /// Only look names up; never add them to the catalog
        #[arg(long)]
        dry_run: bool,
    },

    /// Show a catalog exercise with its aliases
    Exercise { name: String },

    /// Search the exercise catalog
    Search {
        query: String,

        #[arg(short, long, default_value = "10")]
        limit: usize,
    },

    /// Replace the plan for a week (JSON file, "-" for stdin)
    SavePlan {
        #[arg(short, long)]
        week: Option<NaiveDate>,

        file: String,
    },

    /// Add or replace one day of a week (JSON file, "-" for stdin)
    AddSession {
        #[arg(short, long)]
        week: Option<NaiveDate>,

        file: String,
    },

    /// Update title, exercises or date of a session (JSON file, "-" for stdin)
    UpdateSession { session_id: Uuid, file: String },

    /// Delete a session and its logged sets
    DeleteSession { session_id: Uuid },

    /// Show one session
    Show { session_id: Uuid },

    /// Show the stored plan for a week
    Plan {
        #[arg(short, long)]
        week: Option<NaiveDate>,
    },

    /// List the sessions of a week
    Week {
        #[arg(short, long)]
        week: Option<NaiveDate>,
    },

    /// Start a scheduled session
    Start { session_id: Uuid },

    /// Complete a running session
    Complete { session_id: Uuid },

    /// Log a set in a running session
    Log {
        session_id: Uuid,

        exercise: String,

        #[arg(short, long, default_value = "0")]
        weight: f64,

        #[arg(short, long)]
        reps: u32,

        #[arg(long)]
        rpe: Option<f32>,

        #[arg(short, long)]
        notes: Option<String>,
    },

    /// List the sets of an exercise in a session
    Sets { session_id: Uuid, exercise: String },

    /// Edit a logged set
    EditSet {
        log_id: Uuid,

        #[arg(short, long)]
        weight: Option<f64>,

        #[arg(short, long)]
        reps: Option<u32>,

        #[arg(long)]
        rpe: Option<f32>,

        #[arg(short, long)]
        notes: Option<String>,
    },

    /// Delete a logged set
    DeleteSet { log_id: Uuid },

    /// Exercise history over the last days
    History {
        exercise: String,

        #[arg(short, long, default_value = "90")]
        days: u32,

        /// Every set instead of per-day bests
        #[arg(long, conflicts_with = "recent")]
        detail: bool,

        /// The latest N sets instead, newest first
        #[arg(long)]
        recent: Option<usize>,
    },

    /// Show training statistics
    Stats {
        /// Filter by exercise name
        exercise: Option<String>,
    },

    /// Weekly sets per muscle group
    Balance,

    /// Create a training profile for the user
    CreateProfile { display_name: String },

    /// Show the user's training profile
    Profile,

    /// Edit the user's training profile
    EditProfile {
        /// Training goal (repeat for several)
        #[arg(short, long = "goal")]
        goals: Vec<String>,

        #[arg(short, long, value_enum)]
        level: Option<ExperienceLevel>,

        /// Training days per week
        #[arg(short, long)]
        days: Option<u32>,

        #[arg(short, long, value_enum)]
        unit: Option<WeightUnit>,
    },

    /// Set a measurable training objective ("" clears it)
    Objective { text: String },
}

impl Cli {
    fn user_id(&self) -> Result<Uuid> {
        match self.user {
            Some(id) => Ok(id),
            None => bail!("this command needs --user or GYMCOACH_USER"),
        }
    }

    fn settings(&self) -> Settings {
        Settings {
            db_path: self.db.clone(),
            delete_policy: self.delete_policy,
        }
    }
}

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();
    let settings = cli.settings();
    info!(version = env!("CARGO_PKG_VERSION"), db = %settings.db_path.display(), "gymcoach starting");

    let mut db = Database::open(&settings.db_path)
        .with_context(|| format!("opening {}", settings.db_path.display()))?;

    match &cli.command {
        Commands::Seed => {
            let inserted = db.seed_catalog()?;
            println!("Seeded {} new exercises ({} total)", inserted, db.catalog().count()?);
        }

        Commands::Resolve { names, dry_run } => {
            let catalog = db.catalog();
            let resolver = NameResolver::new(&catalog);
            for raw in names {
                if *dry_run {
                    match resolver.lookup(raw)? {
                        Some(found) => println!("{} -> {} ({:?})", raw, found.name, found.kind),
                        None => println!("{} -> (no match)", raw),
                    }
                } else {
                    let found = resolver.resolve_detailed(raw)?;
                    println!("{} -> {} ({:?})", raw, found.name, found.kind);
                }
            }
        }

        Commands::Exercise { name } => match db.catalog().get(name)? {
            Some(exercise) => print_json(&exercise)?,
            None => bail!("no catalog exercise named '{}'", name),
        },

        Commands::Search { query, limit } => {
            print_json(&db.catalog().search(query, *limit)?)?;
        }

        Commands::SavePlan { week, file } => {
            let plan: PlanInput = read_json(file)?;
            let week = week_start(*week)?;
            let saved = Scheduler::new(&mut db).save_plan(cli.user_id()?, week, &plan)?;
            print_json(&saved)?;
        }

        Commands::AddSession { week, file } => {
            let session: SessionInput = read_json(file)?;
            let week = week_start(*week)?;
            let added = Scheduler::new(&mut db).add_session_to_week(cli.user_id()?, week, &session)?;
            print_json(&added)?;
        }

        Commands::UpdateSession { session_id, file } => {
            let update: SessionUpdate = read_json(file)?;
            let session = Scheduler::new(&mut db).update_session(cli.user_id()?, *session_id, update)?;
            print_json(&session)?;
        }

        Commands::DeleteSession { session_id } => {
            let deleted = Scheduler::new(&mut db)
                .with_delete_policy(settings.delete_policy)
                .delete_session(cli.user_id()?, *session_id)?;
            println!("Deleted session {}", deleted);
        }

        Commands::Show { session_id } => {
            print_json(&Scheduler::new(&mut db).get_session(cli.user_id()?, *session_id)?)?;
        }

        Commands::Plan { week } => {
            let week = week_start(*week)?;
            match Scheduler::new(&mut db).get_plan(cli.user_id()?, week)? {
                Some(plan) => print_json(&plan)?,
                None => println!("No plan for the week of {}", week),
            }
        }

        Commands::Week { week } => {
            let week = week_start(*week)?;
            let sessions = Scheduler::new(&mut db).list_week(cli.user_id()?, week)?;
            println!("Week of {}", week);
            println!("{:-<60}", "");
            for s in &sessions {
                println!(
                    "{} | {:20} | {:11} | {} exercises | {}",
                    s.scheduled_date.format("%a %Y-%m-%d"),
                    s.title,
                    s.status,
                    s.exercises.entries().len(),
                    s.id
                );
            }
        }

        Commands::Start { session_id } => {
            print_json(&Tracker::new(&mut db).start_session(cli.user_id()?, *session_id)?)?;
        }

        Commands::Complete { session_id } => {
            print_json(&Tracker::new(&mut db).complete_session(cli.user_id()?, *session_id)?)?;
        }

        Commands::Log { session_id, exercise, weight, reps, rpe, notes } => {
            let set = NewSet {
                exercise_name: exercise.clone(),
                weight_kg: *weight,
                reps: *reps,
                rpe: *rpe,
                notes: notes.clone(),
            };
            let log = Tracker::new(&mut db).log_set(cli.user_id()?, *session_id, &set)?;
            println!(
                "Logged: {} set {} - {}kg x{} (id: {})",
                log.exercise_name, log.set_number, log.weight_kg, log.reps, log.id
            );
        }

        Commands::Sets { session_id, exercise } => {
            print_json(&Tracker::new(&mut db).list_sets(cli.user_id()?, *session_id, exercise)?)?;
        }

        Commands::EditSet { log_id, weight, reps, rpe, notes } => {
            let update = SetUpdate {
                weight_kg: *weight,
                reps: *reps,
                rpe: *rpe,
                notes: notes.clone(),
            };
            print_json(&Tracker::new(&mut db).update_set(cli.user_id()?, *log_id, update)?)?;
        }

        Commands::DeleteSet { log_id } => {
            Tracker::new(&mut db).delete_set(cli.user_id()?, *log_id)?;
            println!("Deleted set {}", log_id);
        }

        Commands::History { exercise, days, detail, recent } => {
            let progress = Progress::new(&db);
            if let Some(limit) = recent {
                print_json(&progress.recent_sets(cli.user_id()?, exercise, *limit)?)?;
            } else if *detail {
                print_json(&progress.history_detail(cli.user_id()?, exercise, *days)?)?;
            } else {
                print_json(&progress.exercise_history(cli.user_id()?, exercise, *days)?)?;
            }
        }

        Commands::Stats { exercise } => {
            let progress = Progress::new(&db);
            let analytics = progress.analytics(cli.user_id()?)?;

            println!("Training Statistics");
            println!("{:-<40}", "");

            if let Some(ex) = exercise {
                println!("Exercise: {}", ex);
                println!("Total volume: {:.1} kg", analytics.total_volume(ex));

                if let Some(next) = analytics.predict_next_load(ex) {
                    println!("Suggested next: {}kg x{}", next.weight_kg, next.reps);
                }
            } else {
                println!("Weekly frequency: {:.1} sessions/week", analytics.weekly_frequency());
                for name in progress.logged_exercise_names(cli.user_id()?)? {
                    println!("  {:30} {:.1} kg", name, analytics.total_volume(&name));
                }
            }
        }

        Commands::Balance => {
            let balance = Progress::new(&db).muscle_balance(cli.user_id()?)?;
            println!("Muscle balance: {:.0}%", balance.balance_score());
            println!("{:-<40}", "");
            for (group, sets, bar) in balance.weekly_report() {
                println!("{:10} {} {:3} sets", group.as_str(), bar, sets);
            }
        }

        Commands::CreateProfile { display_name } => {
            print_json(&Profiles::new(&mut db).create(cli.user_id()?, display_name)?)?;
        }

        Commands::Profile => {
            print_json(&Profiles::new(&mut db).get(cli.user_id()?)?)?;
        }

        Commands::EditProfile { goals, level, days, unit } => {
            let update = ProfileUpdate {
                training_goals: (!goals.is_empty()).then(|| goals.clone()),
                experience_level: *level,
                available_days: *days,
                preferred_unit: *unit,
            };
            print_json(&Profiles::new(&mut db).update(cli.user_id()?, update)?)?;
        }

        Commands::Objective { text } => {
            match Profiles::new(&mut db).set_training_objective(cli.user_id()?, text)? {
                Some(objective) => println!("Training objective: {}", objective),
                None => println!("Training objective cleared"),
            }
        }
    }

    Ok(())
}

fn week_start(week: Option<NaiveDate>) -> Result<NaiveDate> {
    match week {
        Some(week) => Ok(week),
        None => Ok(monday_of(Local::now().date_naive())?),
    }
}

fn read_json<T: DeserializeOwned>(file: &str) -> Result<T> {
    let text = if file == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf).context("reading stdin")?;
        buf
    } else {
        fs::read_to_string(file).with_context(|| format!("reading {}", file))?
    };
    serde_json::from_str(&text).with_context(|| format!("parsing {}", file))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
