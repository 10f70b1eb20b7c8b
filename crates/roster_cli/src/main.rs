//! Command-line front end for the roster engine.
//!
//! # Responsibility
//! - Drive `roster_core` operations against a local SQLite store.
//! - Render results as plain text for quick local checks.

use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use roster_core::db::open_db;
use roster_core::{
    default_log_level, init_logging, parse_role, Location, PersonDraft, PersonId, Role,
    RosterRepository, RosterService, SqliteRosterRepository, ZoneId, ZoneRegistry,
};
use std::error::Error;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "roster", version, about = "Assign staff to capacity-limited zones")]
struct Cli {
    /// SQLite file holding the roster.
    #[arg(long, default_value = "roster.db")]
    db: PathBuf,
    /// JSON zone layout replacing the built-in one.
    #[arg(long)]
    layout: Option<PathBuf>,
    /// Absolute directory for rolling log files; logging is off when unset.
    #[arg(long)]
    log_dir: Option<String>,
    #[arg(long)]
    log_level: Option<String>,
    /// Replace malformed stored data with the demonstration roster.
    #[arg(long)]
    reset_on_corruption: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List every person with their location.
    List,
    /// Show zone occupancy and empty-zone alerts.
    Zones,
    /// Add a person (starts unassigned).
    Add {
        name: String,
        #[arg(value_parser = parse_role)]
        role: Role,
        email: String,
        phone: String,
        #[arg(long)]
        photo_url: Option<String>,
    },
    /// Move a person to a zone after checking placement rules.
    Move { id: PersonId, zone: String },
    /// Move a person back to unassigned.
    Unassign { id: PersonId },
    /// Delete a person.
    Delete { id: PersonId },
    /// Reassign everyone with the placement heuristic.
    AutoPlace {
        /// Seed for a reproducible assignment.
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Place the first eligible unassigned person into a zone.
    QuickAdd { zone: String },
    /// Filter persons by name or role.
    Search { query: String },
    /// Restore the demonstration roster.
    Reset,
}

fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        init_logging(level, log_dir)?;
    }

    let registry = match &cli.layout {
        Some(path) => ZoneRegistry::from_json_str(&std::fs::read_to_string(path)?)?,
        None => ZoneRegistry::default(),
    };

    let conn = open_db(&cli.db)?;
    let repo = SqliteRosterRepository::try_new(&conn)?;
    let mut service = if cli.reset_on_corruption {
        RosterService::open_with_reset(repo, registry)?
    } else {
        RosterService::open(repo, registry)?
    };

    match cli.command {
        Command::List => print_roster(&service),
        Command::Zones => print_zones(&service),
        Command::Add {
            name,
            role,
            email,
            phone,
            photo_url,
        } => {
            let mut draft = PersonDraft::new(name, role, email, phone);
            draft.photo_url = photo_url;
            let id = service.add_person(draft)?;
            println!("added {id}");
        }
        Command::Move { id, zone } => {
            let check = service.try_move_person(id, Location::zone(zone))?;
            match check.reason {
                None => println!("moved {id}"),
                Some(reason) => println!("refused: {reason}"),
            }
        }
        Command::Unassign { id } => {
            if service.unassign_person(id)? {
                println!("unassigned {id}");
            } else {
                println!("no person {id}");
            }
        }
        Command::Delete { id } => {
            if service.delete_person(id)? {
                println!("deleted {id}");
            } else {
                println!("no person {id}");
            }
        }
        Command::AutoPlace { seed } => {
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            let report = service.auto_place(&mut rng)?;
            for (zone_id, count) in &report.placed {
                println!("{zone_id}: {count}");
            }
            println!("unassigned: {}", report.unassigned);
        }
        Command::QuickAdd { zone } => match service.quick_assign(&ZoneId::new(zone)) {
            Ok(placed) => println!("{} assigned to {}", placed.person_name, placed.zone_name),
            Err(err) => println!("refused: {err}"),
        },
        Command::Search { query } => {
            let matches = service.search(&query);
            for person in &matches.items {
                println!(
                    "{}  {:<20} {:<15} {}",
                    person.id, person.name, person.role, person.location
                );
            }
            println!("{} match(es), {} unassigned", matches.items.len(), matches.unassigned_count);
        }
        Command::Reset => {
            service.reset_to_defaults()?;
            println!("roster reset ({} persons)", service.roster().len());
        }
    }

    Ok(())
}

fn print_roster<R: RosterRepository>(service: &RosterService<R>) {
    for person in service.roster().persons() {
        println!(
            "{}  {:<20} {:<15} {}",
            person.id, person.name, person.role, person.location
        );
    }
}

fn print_zones<R: RosterRepository>(service: &RosterService<R>) {
    for zone in service.zone_occupancy() {
        let marker = if zone.is_full() { " (full)" } else { "" };
        println!(
            "{:<12} {:<12} {}/{}{marker}",
            zone.zone_id.as_str(),
            zone.display_name,
            zone.occupancy,
            zone.capacity
        );
    }
    for alert in service.mandatory_alerts().iter().filter(|alert| alert.empty) {
        println!("alert: {} has no staff", alert.zone_id);
    }
}
