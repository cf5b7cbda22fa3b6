/*!
Bencode Tools - A CLI for working with bencoded data

# Commands

- `inspect`: Display bencoded data in various formats (diagnostic, JSON, hex)
- `compose`: Convert text formats (diagnostic, JSON) to bencode
- `check`: Validate bencoded data and report whether it is canonical

# Examples

```bash
# Inspect a torrent file
bencode-tool inspect ubuntu.torrent

# Inspect as JSON (lossy)
bencode-tool inspect --format json ubuntu.torrent

# Convert diagnostic notation to bencode
echo '{"cow": "moo", "spam": [1, h'"'"'ff00'"'"']}' | bencode-tool compose -o data.bin -

# Convert JSON to bencode
echo '{"name": "Alice", "age": 30}' | bencode-tool compose --format json -

# Round-trip test
bencode-tool inspect data.bin | bencode-tool compose - | bencode-tool inspect -
```
*/

use clap::{Parser, Subcommand};
use tracing_subscriber::filter::LevelFilter;

mod check;
mod compose;
mod diag;
mod inspect;
mod io;
mod options;

/// A CLI tool for working with bencoded data
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "A CLI tool for inspecting and manipulating bencoded data",
    long_about = "Bencode Tools provides utilities for working with bencoded data, such as torrent files.\n\n\
                  Features:\n\
                  - Inspect bencoded data in human-readable formats\n\
                  - Convert between bencode and a diagnostic notation\n\
                  - Check that data is in canonical form"
)]
struct Cli {
    /// Log level for diagnostics written to stderr
    #[arg(long, global = true, default_value = "warn", value_name = "LEVEL")]
    log_level: LevelFilter,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Inspect and display bencoded data in various formats
    Inspect(inspect::Command),

    /// Convert diagnostic notation or JSON to bencode
    Compose(compose::Command),

    /// Check that bencoded data is valid and canonical
    Check(check::Command),
}

fn init_logger(log_level: LevelFilter) {
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(log_level > LevelFilter::from_level(tracing::Level::INFO))
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logger(cli.log_level);

    match cli.command {
        Commands::Inspect(args) => args.exec(),
        Commands::Compose(args) => args.exec(),
        Commands::Check(args) => args.exec(),
    }
}
