// Copyright 2025 larder
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

mod build_info;
mod cmd;
mod config;

use clap::{Parser, Subcommand};
use snafu::Whatever;

use crate::cmd::{get::GetArgs, install::InstallArgs, status::StatusArgs};

#[derive(Debug, Parser)]
#[clap(
name = "larder",
about = "offline asset cache client",
author = build_info::AUTHOR,
version = build_info::FULL_VERSION)]
struct Cli {
    #[command(subcommand)]
    commands: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Install(InstallArgs),
    Get(GetArgs),
    Status(StatusArgs),
}

fn main() -> Result<(), Whatever> {
    let cli = Cli::parse();
    match cli.commands {
        Commands::Install(args) => args.run(),
        Commands::Get(args) => args.run(),
        Commands::Status(args) => args.run(),
    }
}
