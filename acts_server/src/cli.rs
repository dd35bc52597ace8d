use std::{env, env::VarError};

/// There's no real CLI for the server, so just do quick 'n dirty
pub fn handle_command_line_args() -> bool {
    let has_cli_args = env::args().count() > 1;
    if has_cli_args {
        // We don't expect any CLI args, so always print the help
        display_readme();
        display_envs();
    }
    has_cli_args
}

fn display_readme() {
    const README: &str = include_str!("./cli-help.txt");
    println!("\n{README}\n");
}

fn display_envs() {
    // Be explicit about which envars to print. ACTS_TOKENS_PATH is a path, the tokens themselves are never printed.
    const DISPLAY_ENVS: [&str; 17] = [
        "RUST_LOG",
        "ACTS_HOST",
        "ACTS_PORT",
        "ACTS_DATABASE_URL",
        "ACTS_POOL_SIZE",
        "ACTS_TOKENS_PATH",
        "ACTS_MARKETPLACE_URL",
        "ACTS_HTTP_TIMEOUT",
        "ACTS_HTTP_RETRIES",
        "ACTS_HTTP_RETRY_DELAY",
        "ACTS_RATE_LIMIT_COOLDOWN",
        "ACTS_HTTP_MAX_IDLE_CONNECTIONS",
        "ACTS_RUN_TIMEOUT",
        "ACTS_SCHEDULER_ENABLED",
        "ACTS_UPDATE_CERTIFICATES_AT",
        "ACTS_HEALTHCHECK_AT",
        "ACTS_VALIDATE_ORDERS_AT",
    ];

    println!("Current environment values (EXCLUDING variables that contain secrets):");
    DISPLAY_ENVS.iter().for_each(|&name| {
        let val = match env::var(name) {
            Ok(s) => s,
            Err(VarError::NotPresent) => "Not set".into(),
            Err(VarError::NotUnicode(s)) => format!("Invalid value: {}", s.to_string_lossy()),
        };
        println!("  {name:<35} {val:<15}");
    })
}
