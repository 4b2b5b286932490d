//! Logging Setup
//!
//! `log` facade backed by env_logger. Records go to `app.log` under the
//! program root in append mode; stderr if the file can't be opened.
//! `RUST_LOG` overrides the default `info` filter.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use crate::constants::LOG_FILE;

pub fn init(root: &Path) {
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));

    builder.format(|buf, record| {
        writeln!(
            buf,
            "{} - {} - {} - {}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S,%3f"),
            record.target(),
            record.level(),
            record.args()
        )
    });

    let path = root.join(LOG_FILE);
    match OpenOptions::new().create(true).append(true).open(&path) {
        Ok(file) => {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }
        Err(e) => {
            eprintln!("Não foi possível abrir {}: {}", path.display(), e);
            builder.target(env_logger::Target::Stderr);
        }
    }

    // A second init (tests, repeated runs) keeps the first logger
    let _ = builder.try_init();
}
