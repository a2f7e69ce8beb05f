use crate::app::App;
use crate::clock::UtcClock;
use crate::store::Store;
use anyhow::Result;
use anyhow::bail;
use pico_args::Arguments;
use std::path::PathBuf;

mod app;
mod clock;
mod prompt;
mod stats;
mod store;

const HELP: &str = "\
Review flashcards with spaced repetition

USAGE:
  srs-engine [OPTIONS] <COMMAND>

OPTIONS:
  -p, --path <FILE>  Database to use [default: $SRS_DB, or srs.db]
  -h, --help         Print this help

COMMANDS:
  init                                Create the database schema
  create-category <NAME> [--foundational]
  categories                          List categories
  add <CATEGORY_ID> <FRONT> <BACK>    Add a new card
  delete <CARD_ID>                    Delete a card
  cards                               List cards and their state
  review                              Review new and due cards
  stats                               Summarise progress
";

#[derive(Debug, PartialEq)]
struct Args {
    path: PathBuf,
    command: Command,
}

#[derive(Debug, PartialEq)]
enum Command {
    Init,
    CreateCategory { name: String, is_foundational: bool },
    Categories,
    Add {
        category_id: u64,
        front: String,
        back: String,
    },
    Delete { card_id: u64 },
    Cards,
    Review,
    Stats,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let mut args = Arguments::from_env();

    if args.contains(["-h", "--help"]) {
        print!("{HELP}");
        return Ok(());
    }

    let default_path = std::env::var_os("SRS_DB")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("srs.db"));

    let args = parse_args(args, default_path)?;
    log::debug!("{args:?}");

    let mut app = App::new(Store::open(&args.path)?, UtcClock);

    match args.command {
        Command::Init => app.init(),
        Command::CreateCategory {
            name,
            is_foundational,
        } => app.create_category(&name, is_foundational),
        Command::Categories => app.categories(),
        Command::Add {
            category_id,
            front,
            back,
        } => app.add(category_id, &front, &back).map(|_| ()),
        Command::Delete { card_id } => app.delete(card_id),
        Command::Cards => app.cards(),
        Command::Review => app.review(),
        Command::Stats => app.stats(),
    }
}

fn parse_args(mut args: Arguments, default_path: PathBuf) -> Result<Args> {
    let path = args
        .opt_value_from_str(["-p", "--path"])?
        .unwrap_or(default_path);

    let command = match args.subcommand()?.as_deref() {
        Some("init") => Command::Init,
        Some("create-category") => Command::CreateCategory {
            is_foundational: args.contains("--foundational"),
            name: args.free_from_str()?,
        },
        Some("categories") => Command::Categories,
        Some("add") => Command::Add {
            category_id: args.free_from_str()?,
            front: args.free_from_str()?,
            back: args.free_from_str()?,
        },
        Some("delete") => Command::Delete {
            card_id: args.free_from_str()?,
        },
        Some("cards") => Command::Cards,
        Some("review") => Command::Review,
        Some("stats") => Command::Stats,
        Some(other) => bail!("unknown command '{other}'\n\n{HELP}"),
        None => bail!("missing command\n\n{HELP}"),
    };

    let remaining = args.finish();
    if !remaining.is_empty() {
        bail!("unexpected arguments: {remaining:?}");
    }

    Ok(Args { path, command })
}
