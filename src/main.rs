use std::io::{self, IsTerminal};

use minish::{Config, Repl, Session, SharedSink, repl};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let session = Session::new(SharedSink::new(io::stdout()), Config::default());

    let result = if io::stdin().is_terminal() {
        repl::run_interactive(session)
    } else {
        Repl::new(session, io::stdin().lock()).run()
    };

    if let Err(err) = result {
        eprintln!("minish: {err:#}");
        std::process::exit(1);
    }
}
