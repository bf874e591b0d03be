// main.rs
//
// Copyright 2017 Jordan Petridis <jpetridis@gnome.org>
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Thin front-end over `podsync-data`. No invariants live here.

#[macro_use]
extern crate log;

use anyhow::Result;
use clap::{Parser, Subcommand};

use std::path::PathBuf;
use std::process;

use podsync_data::database;
use podsync_data::dbqueries;
use podsync_data::export;
use podsync_data::pipeline;
use podsync_data::HttpFetcher;

#[derive(Parser, Debug)]
#[command(name = "podsync", about = "Track podcast feeds and record new episodes.")]
struct Opt {
    /// Path to the database file. Defaults to the XDG data home.
    #[arg(short, long)]
    database: Option<PathBuf>,

    /// Cap the number of feed items scanned per pass.
    #[arg(short, long)]
    limit: Option<usize>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Subscribe to a feed url and record its current episodes.
    Subscribe { url: String },
    /// Sync one subscription by identity, or every subscription.
    Sync { identity: Option<String> },
    /// List the subscription catalog.
    List,
    /// List every table in the store.
    Tables,
    /// Dump a table to a JSON file.
    Export {
        table: String,
        output: PathBuf,
        /// Indent the output instead of writing it compact.
        #[arg(short, long)]
        pretty: bool,
    },
}

fn run(args: Opt) -> Result<()> {
    let path = match args.database {
        Some(path) => path,
        None => database::default_path()?,
    };
    let store = database::open(&path)?;
    debug!("Using database at {}.", path.display());

    match args.command {
        Command::Subscribe { url } => {
            let fetcher = HttpFetcher::new()?;
            let subscription = pipeline::subscribe(&store, &fetcher, &url, args.limit)?;
            println!("{}  {}", subscription.table_id(), subscription.title());
        }
        Command::Sync { identity } => {
            let fetcher = HttpFetcher::new()?;
            match identity {
                Some(identity) => {
                    let outcome = pipeline::sync(&store, &fetcher, &identity, args.limit)?;
                    println!("{outcome:?}");
                }
                None => {
                    for (subscription, outcome) in
                        pipeline::sync_all(&store, &fetcher, args.limit)?
                    {
                        match outcome {
                            Ok(outcome) => {
                                println!("{}: {:?}", subscription.title(), outcome)
                            }
                            Err(err) => println!("{}: {}", subscription.title(), err),
                        }
                    }
                }
            }
        }
        Command::List => {
            for subscription in dbqueries::get_subscriptions(&store)? {
                println!(
                    "{}  {}  {}",
                    subscription.table_id(),
                    subscription.title(),
                    subscription.feed_url()
                );
            }
        }
        Command::Tables => {
            for table in store.list_tables()? {
                println!("{table}");
            }
        }
        Command::Export {
            table,
            output,
            pretty,
        } => {
            let written = export::export_table(&store, &table, output, pretty)?;
            println!("{}", written.display());
        }
    }

    Ok(())
}

fn main() {
    pretty_env_logger::init();

    let args = Opt::parse();
    if let Err(err) = run(args) {
        error!("{}", err);
        process::exit(1);
    }
}
