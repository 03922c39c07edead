use std::io::{self, IsTerminal};

use anyhow::Context;

use hbnb_console::{Console, ConsoleConfig};
use hbnb_storage::FileStorage;

fn main() -> anyhow::Result<()> {
    hbnb_observability::init();

    let config = ConsoleConfig::from_env();
    tracing::info!(path = %config.storage_path.display(), "opening store");
    let storage = FileStorage::open(&config.storage_path);

    let stdin = io::stdin();
    let mut console = Console::new(storage, io::stdout().lock());
    if stdin.is_terminal() {
        console = console.with_prompt(config.prompt);
    }

    console
        .run(stdin.lock())
        .with_context(|| format!("console aborted (store: {})", config.storage_path.display()))
}
