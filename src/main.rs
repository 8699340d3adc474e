//! CLI for the wishlist
//!
//! Subcommands:
//! - `add`, `remove`: change the wishlist
//! - `toggle`: flip membership and print `true` if the id is now on the list
//! - `check`: print whether an id is on the wishlist
//! - `list`: print the wishlist, most recently added first

use std::io::Write;

use clap::Parser;
use tracing::{error, info};
use wishlist_sync::config::load_config;
use wishlist_sync::utils::{WishlistError, logging};
use wishlist_sync::{Backing, SelectionStore, SledBacking};

#[derive(Parser)]
#[command(name = "wishlist", about = "Manage the saved wishlist")]
enum Command {
    /// Add a product id to the wishlist
    Add { id: u64 },
    /// Remove a product id from the wishlist
    Remove { id: u64 },
    /// Add the id if absent, remove it otherwise
    Toggle { id: u64 },
    /// Print `true` if the id is on the wishlist, `false` otherwise
    Check { id: u64 },
    /// Print the wishlist, one id per line
    List,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();
    let cmd = Command::parse();

    if let Err(e) = start(cmd) {
        error!("wishlist failed: {}", e);
        return Err(e.into());
    }
    Ok(())
}

fn start(cmd: Command) -> Result<(), WishlistError> {
    let settings = load_config()?;
    logging::init(&settings.logging.level);

    let backing = SledBacking::open(&settings.storage.path)?;
    let stdout = std::io::stdout();
    run(cmd, backing, &settings.storage.key, &mut stdout.lock())
}

fn run(
    cmd: Command,
    backing: impl Backing + 'static,
    key: &str,
    out: &mut impl Write,
) -> Result<(), WishlistError> {
    let store = SelectionStore::init(backing, key);

    match cmd {
        Command::Add { id } => {
            if store.add(id) {
                info!(id, "added to wishlist");
            } else {
                info!(id, "already on wishlist");
            }
        }
        Command::Remove { id } => {
            if store.remove(id) {
                info!(id, "removed from wishlist");
            } else {
                info!(id, "not on wishlist");
            }
        }
        Command::Toggle { id } => writeln!(out, "{}", store.toggle(id))?,
        Command::Check { id } => writeln!(out, "{}", store.is_member(id))?,
        Command::List => {
            for id in store.current_members() {
                writeln!(out, "{id}")?;
            }
        }
    }

    Ok(())
}
