//! kubectl-safe: kubectl plugin entry point.
//!
//! `kubectl safe <command> [flags]` behaves like `kubectl <command> [flags]`,
//! except that guarded commands require `--context` and `--namespace` and an
//! interactive confirmation first.

use std::io::{self, Write};

use kubectl_safe::config::Config;
use kubectl_safe::guard::Guard;
use kubectl_safe::logging;
use kubectl_safe::process::Kubectl;
use kubectl_safe::prompt::BufLineReader;

fn main() {
    let config = Config::load();
    logging::init(logging::parse_level(&config.settings.log_level));

    let guard = Guard::from_config(&config);
    let kubectl = Kubectl::from_config(&config.kubectl);
    let args: Vec<String> = std::env::args().skip(1).collect();

    let stdin = io::stdin();
    let mut input = BufLineReader::new(stdin.lock());
    let mut out = io::stdout().lock();

    let result = guard.run(
        &args,
        kubectl.display_name(),
        &mut input,
        &mut out,
        &kubectl,
    );
    let _ = out.flush();

    if config.settings.audit_log {
        let decision = guard.classifier().classify(&args).decision;
        let outcome = match &result {
            Ok(outcome) => outcome.as_str(),
            Err(e) => e.kind(),
        };
        logging::log_decision(&args, decision, outcome);
    }

    match result {
        Ok(outcome) => {
            log::debug!("finished: {}", outcome.as_str());
        }
        Err(e) => {
            log::warn!("{}: {e}", e.kind());
            eprintln!("kubectl-safe: {e}");
            std::process::exit(e.exit_code());
        }
    }
}
