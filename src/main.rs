use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use thiserror::Error;

use sendboard::record::{RawRecord, SendRecord, normalize_all, raw_batch_from_json, raw_from_json};
use sendboard::scope::{Scope, ScopeKind};
use sendboard::scoring::{attempts_penalty, grade_number, score, status_multiplier};
use sendboard::store::{SendStore, StoreError};
use sendboard::profile::{UserProfile, normalize_email};
use sendboard::{
    LeaderboardEntry, TrendPoint, last_session, rank, rank_with_names, weekly_trend,
};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Library(#[from] sendboard::Error),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Invalid timestamp '{0}', expected RFC 3339")]
    Timestamp(String),

    #[error("Scope '{0}' needs --user")]
    MissingUser(ScopeKind),

    #[error("Send not found: {0}")]
    NotFound(String),

    #[error("No profile for user: {0}")]
    ProfileNotFound(String),
}

/// How results are printed.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Aligned, human-readable text.
    #[default]
    Table,
    /// Pretty-printed JSON.
    Json,
}

#[derive(Parser)]
#[command(name = "sendboard")]
#[command(about = "Log climbing sends, rank climbers and chart their progress")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new send store
    Init {
        /// Store path
        #[arg(long, default_value = ".sendboard", env = "SENDBOARD_PATH")]
        path: PathBuf,
    },

    /// Add a send from a JSON object
    Add {
        /// JSON object with the send's fields
        #[arg(long, group = "input")]
        json: Option<String>,

        /// Read the JSON object from a file
        #[arg(long, group = "input")]
        file: Option<PathBuf>,

        /// Store path
        #[arg(long, default_value = ".sendboard", env = "SENDBOARD_PATH")]
        path: PathBuf,
    },

    /// Print a send as JSON
    Get {
        /// Send id
        id: String,

        /// Store path
        #[arg(long, default_value = ".sendboard", env = "SENDBOARD_PATH")]
        path: PathBuf,
    },

    /// Delete a send
    Delete {
        /// Send id
        id: String,

        /// Store path
        #[arg(long, default_value = ".sendboard", env = "SENDBOARD_PATH")]
        path: PathBuf,
    },

    /// Make a send visible to others
    Share {
        /// Send id
        id: String,

        /// Store path
        #[arg(long, default_value = ".sendboard", env = "SENDBOARD_PATH")]
        path: PathBuf,
    },

    /// Make a send private
    Unshare {
        /// Send id
        id: String,

        /// Store path
        #[arg(long, default_value = ".sendboard", env = "SENDBOARD_PATH")]
        path: PathBuf,
    },

    /// List sends visible in a scope, newest first
    List {
        /// Visibility scope: world, friends or mine
        #[arg(long, default_value = "world")]
        scope: ScopeKind,

        /// Viewer id (required for friends and mine)
        #[arg(long)]
        user: Option<String>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,

        /// Store path
        #[arg(long, default_value = ".sendboard", env = "SENDBOARD_PATH")]
        path: PathBuf,
    },

    /// Rank climbers in a scope
    Leaderboard {
        /// Visibility scope: world, friends or mine
        #[arg(long, default_value = "world")]
        scope: ScopeKind,

        /// Viewer id (required for friends and mine)
        #[arg(long)]
        user: Option<String>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,

        /// Store path
        #[arg(long, default_value = ".sendboard", env = "SENDBOARD_PATH")]
        path: PathBuf,
    },

    /// Weekly average grade for a climber over the last 24 weeks
    Trend {
        /// Climber id
        #[arg(long)]
        user: String,

        /// RFC 3339 instant to chart back from (defaults to now)
        #[arg(long)]
        as_of: Option<String>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,

        /// Store path
        #[arg(long, default_value = ".sendboard", env = "SENDBOARD_PATH")]
        path: PathBuf,
    },

    /// Sends from a climber's most recent session
    LastSession {
        /// Climber id
        #[arg(long)]
        user: String,

        /// Store path
        #[arg(long, default_value = ".sendboard", env = "SENDBOARD_PATH")]
        path: PathBuf,
    },

    /// Follow another climber
    Follow {
        /// Follower id
        user: String,

        /// Id of the climber to follow
        target: String,

        /// Store path
        #[arg(long, default_value = ".sendboard", env = "SENDBOARD_PATH")]
        path: PathBuf,
    },

    /// Follow the climber who registered an email
    FollowEmail {
        /// Follower id
        user: String,

        /// Email on the followed climber's profile
        email: String,

        /// Store path
        #[arg(long, default_value = ".sendboard", env = "SENDBOARD_PATH")]
        path: PathBuf,
    },

    /// Stop following a climber
    Unfollow {
        /// Follower id
        user: String,

        /// Id of the climber to unfollow
        target: String,

        /// Store path
        #[arg(long, default_value = ".sendboard", env = "SENDBOARD_PATH")]
        path: PathBuf,
    },

    /// List who a climber follows
    Following {
        /// Climber id
        user: String,

        /// Store path
        #[arg(long, default_value = ".sendboard", env = "SENDBOARD_PATH")]
        path: PathBuf,
    },

    /// Save a climber's display name and email
    SetProfile {
        /// Climber id
        user: String,

        /// Display name shown on leaderboards
        #[arg(long, default_value = "")]
        name: String,

        /// Email friends can follow you by
        #[arg(long, default_value = "")]
        email: String,

        /// Store path
        #[arg(long, default_value = ".sendboard", env = "SENDBOARD_PATH")]
        path: PathBuf,
    },

    /// Print a climber's profile as JSON
    Profile {
        /// Climber id
        user: String,

        /// Store path
        #[arg(long, default_value = ".sendboard", env = "SENDBOARD_PATH")]
        path: PathBuf,
    },

    /// Score a single send given as JSON, without a store
    Score {
        /// JSON object with the send's fields
        #[arg(long, group = "input")]
        json: Option<String>,

        /// Read the JSON object from a file
        #[arg(long, group = "input")]
        file: Option<PathBuf>,
    },

    /// Rank a JSON array of sends, without a store
    Rank {
        /// File holding a JSON array of send objects
        #[arg(long)]
        file: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
}

fn read_input(json: Option<String>, file: Option<PathBuf>) -> Result<RawRecord, AppError> {
    let text = match (json, file) {
        (Some(text), _) => text,
        (None, Some(path)) => std::fs::read_to_string(path)?,
        (None, None) => std::io::read_to_string(std::io::stdin())?,
    };
    Ok(raw_from_json(&text)?)
}

fn parse_as_of(as_of: Option<String>) -> Result<DateTime<Utc>, AppError> {
    match as_of {
        Some(text) => DateTime::parse_from_rfc3339(&text)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|_| AppError::Timestamp(text)),
        None => Ok(Utc::now()),
    }
}

fn resolve_scope(
    store: &SendStore,
    kind: ScopeKind,
    user: Option<String>,
) -> Result<Scope, AppError> {
    match (kind, user.filter(|u| !u.is_empty())) {
        (ScopeKind::World, _) => Ok(Scope::World),
        (ScopeKind::Friends, Some(user)) => Ok(store.friends_scope(&user)?),
        (ScopeKind::Mine, Some(user)) => Ok(Scope::Mine { user_id: user }),
        (kind, None) => Err(AppError::MissingUser(kind)),
    }
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<(), AppError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_sends(records: &[SendRecord]) {
    for record in records {
        println!(
            "{}  {}  {:<14} {:<10} {:<28} {}",
            record.timestamp.format("%Y-%m-%d %H:%M"),
            record.id,
            record.color_grade(),
            record.user_id,
            record.summary(),
            if record.is_shared { "shared" } else { "private" },
        );
    }
}

fn print_leaderboard(board: &[LeaderboardEntry]) {
    for entry in board {
        println!(
            "{:>4}  {:<24} {:>8}",
            entry.rank, entry.display_name, entry.score
        );
    }
}

fn print_trend(points: &[TrendPoint]) {
    for point in points {
        println!("{}  {:>5.2}", point.date, point.average_grade);
    }
}

fn main() -> Result<(), AppError> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Init { path } => {
            SendStore::init(&path)?;
            println!("Initialized send store at {}", path.display());
            Ok(())
        }
        Commands::Add { json, file, path } => {
            let raw = read_input(json, file)?;
            let store = SendStore::open(&path)?;
            let record = store.add(&raw, Utc::now())?;
            println!(
                "Added {} ({}, score {})",
                record.id,
                record.color_grade(),
                score(&record)
            );
            Ok(())
        }
        Commands::Get { id, path } => {
            let store = SendStore::open(&path)?;
            let record = store.get(&id)?.ok_or(AppError::NotFound(id))?;
            print_json(&record)
        }
        Commands::Delete { id, path } => {
            let store = SendStore::open(&path)?;
            store.delete(&id)?;
            println!("Deleted send {}", id);
            Ok(())
        }
        Commands::Share { id, path } => {
            let store = SendStore::open(&path)?;
            store.set_shared(&id, true)?;
            println!("Send {} is now shared", id);
            Ok(())
        }
        Commands::Unshare { id, path } => {
            let store = SendStore::open(&path)?;
            store.set_shared(&id, false)?;
            println!("Send {} is now private", id);
            Ok(())
        }
        Commands::List {
            scope,
            user,
            format,
            path,
        } => {
            let store = SendStore::open(&path)?;
            let scope = resolve_scope(&store, scope, user)?;
            let mut records = store.in_scope(&scope)?;
            records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
            match format {
                OutputFormat::Table => {
                    print_sends(&records);
                    Ok(())
                }
                OutputFormat::Json => print_json(&records),
            }
        }
        Commands::Leaderboard {
            scope,
            user,
            format,
            path,
        } => {
            let store = SendStore::open(&path)?;
            let scope = resolve_scope(&store, scope, user)?;
            let board = rank_with_names(&store.in_scope(&scope)?, &store.display_names()?);
            match format {
                OutputFormat::Table => {
                    print_leaderboard(&board);
                    Ok(())
                }
                OutputFormat::Json => print_json(&board),
            }
        }
        Commands::Trend {
            user,
            as_of,
            format,
            path,
        } => {
            let as_of = parse_as_of(as_of)?;
            let store = SendStore::open(&path)?;
            let points = weekly_trend(&store.for_user(&user)?, as_of);
            match format {
                OutputFormat::Table => {
                    print_trend(&points);
                    Ok(())
                }
                OutputFormat::Json => print_json(&points),
            }
        }
        Commands::LastSession { user, path } => {
            let store = SendStore::open(&path)?;
            let records = store.for_user(&user)?;
            let session: Vec<SendRecord> =
                last_session(&records).into_iter().cloned().collect();
            if session.is_empty() {
                println!("No sends found for {}", user);
            } else {
                print_sends(&session);
            }
            Ok(())
        }
        Commands::Follow { user, target, path } => {
            let store = SendStore::open(&path)?;
            store.follow(&user, &target, Utc::now())?;
            println!("{} now follows {}", user, target);
            Ok(())
        }
        Commands::FollowEmail { user, email, path } => {
            let store = SendStore::open(&path)?;
            let target = store.follow_by_email(&user, &email, Utc::now())?;
            println!("{} now follows {}", user, target);
            Ok(())
        }
        Commands::SetProfile {
            user,
            name,
            email,
            path,
        } => {
            let store = SendStore::open(&path)?;
            let existing = store.profile(&user)?.unwrap_or_default();
            let profile = UserProfile {
                user_id: user,
                custom_user_name: name.trim().to_string(),
                email: normalize_email(&email),
                ..existing
            };
            store.put_profile(&profile)?;
            println!("Saved profile for {}", profile.user_id);
            Ok(())
        }
        Commands::Profile { user, path } => {
            let store = SendStore::open(&path)?;
            let profile = store
                .profile(&user)?
                .ok_or(AppError::ProfileNotFound(user))?;
            print_json(&profile)
        }
        Commands::Unfollow { user, target, path } => {
            let store = SendStore::open(&path)?;
            store.unfollow(&user, &target)?;
            println!("{} no longer follows {}", user, target);
            Ok(())
        }
        Commands::Following { user, path } => {
            let store = SendStore::open(&path)?;
            let mut following: Vec<String> = store.following(&user)?.into_iter().collect();
            following.sort();
            for target in following {
                println!("{}", target);
            }
            Ok(())
        }
        Commands::Score { json, file } => {
            let raw = read_input(json, file)?;
            let record = sendboard::normalize_at("", &raw, Utc::now());
            println!(
                "{} x {} x {} x {} = {}",
                grade_number(&record.grade),
                sendboard::scoring::POINTS_PER_GRADE,
                status_multiplier(&record.status),
                attempts_penalty(&record.attempts),
                score(&record)
            );
            Ok(())
        }
        Commands::Rank { file, format } => {
            let text = std::fs::read_to_string(&file)?;
            let batch = raw_batch_from_json(&text)?;
            let records = normalize_all(
                batch.iter().map(|(id, raw)| (id.as_str(), raw)),
                Utc::now(),
            );
            let board = rank(&records);
            match format {
                OutputFormat::Table => {
                    print_leaderboard(&board);
                    Ok(())
                }
                OutputFormat::Json => print_json(&board),
            }
        }
    }
}
