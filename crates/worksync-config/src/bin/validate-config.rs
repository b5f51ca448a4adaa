//! Checks a worksync config file and prints what it resolves to

use std::path::PathBuf;
use std::process::ExitCode;
use worksync_config::{load_config, ConfigError, Settings, CURRENT_CONFIG_VERSION};
use worksync_util::default_config_path;

fn main() -> ExitCode {
    let Some(config_path) = std::env::args().nth(1).map(PathBuf::from) else {
        eprintln!("usage: validate-config <config.toml>");
        eprintln!("(worksync itself reads {})", default_config_path().display());
        return ExitCode::from(2);
    };

    match load_config(&config_path) {
        Ok(settings) => {
            print_summary(&settings);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}: invalid", config_path.display());
            report(&e);
            ExitCode::from(1)
        }
    }
}

fn print_summary(settings: &Settings) {
    let seed = if settings.seed.enabled {
        format!(
            "{} days, check-in {:02}:{:02}-{:02}:{:02}",
            settings.seed.days,
            settings.seed.check_in_start.hour(),
            settings.seed.check_in_start.minute(),
            settings.seed.check_in_end.hour(),
            settings.seed.check_in_end.minute()
        )
    } else {
        "off".to_string()
    };
    let insight = if settings.insight.enabled {
        format!("{} via {}", settings.insight.model, settings.insight.endpoint)
    } else {
        "off".to_string()
    };

    println!("OK (config_version {})", CURRENT_CONFIG_VERSION);
    println!("data dir  {}", settings.storage.data_dir.display());
    println!("seeding   {}", seed);
    println!("insight   {}", insight);
    println!("roster    {} employees", settings.roster.len());
    for employee in settings.roster.employees() {
        println!(
            "          {:<6} {} ({}, {})",
            employee.id.as_str(),
            employee.name,
            employee.role,
            employee.team
        );
    }
}

fn report(error: &ConfigError) {
    match error {
        ConfigError::ValidationFailed { errors } => {
            for err in errors {
                eprintln!("  - {}", err);
            }
        }
        ConfigError::UnsupportedVersion(version) => {
            eprintln!(
                "  config_version {} is not supported (this build reads {})",
                version, CURRENT_CONFIG_VERSION
            );
        }
        other => eprintln!("  {}", other),
    }
}
