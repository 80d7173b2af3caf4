use std::fs::OpenOptions;
use std::io;
use std::path::Path;

use env_logger::{Builder, Env, Target};

/// Route `log` output into a file so it never draws over the TUI.
///
/// Level comes from `RUST_LOG`, defaulting to `info`. Without a path the
/// output is discarded.
pub fn init(path: Option<&Path>) -> io::Result<()> {
    let target: Box<dyn io::Write + Send> = match path {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            Box::new(OpenOptions::new().create(true).append(true).open(path)?)
        }
        None => Box::new(io::sink()),
    };

    Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Pipe(target))
        .try_init()
        .map_err(io::Error::other)
}
