use std::io::{self, BufRead, Write};

use projects_client::config::{Config, DEFAULT_API_URL};
use projects_client::error::{ProjectsError, Result};
use projects_client::FileTokenStore;

fn prompt(label: &str) -> Result<String> {
    print!("{label}");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().lock().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

pub async fn run() -> Result<()> {
    let config_path = Config::config_path()?;

    if config_path.exists() {
        let answer = prompt(&format!(
            "Config file already exists at {}. Overwrite? [y/N] ",
            config_path.display()
        ))?;

        if !answer.eq_ignore_ascii_case("y") {
            println!("Aborted.");
            return Ok(());
        }
    }

    println!("Projects CLI Configuration");
    println!("==========================\n");

    let api_url = prompt(&format!("API base URL [{DEFAULT_API_URL}]: "))?;
    let api_url = if api_url.is_empty() {
        DEFAULT_API_URL.to_string()
    } else {
        api_url
    };
    url::Url::parse(&api_url).map_err(|_| ProjectsError::InvalidUrl(api_url.clone()))?;

    let token = prompt("API token [optional]: ")?;

    // Create config directory if it doesn't exist
    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ProjectsError::ConfigRead {
            path: config_path.clone(),
            source: e,
        })?;
    }

    let config_content = format!("api_url = \"{api_url}\"\n");
    std::fs::write(&config_path, config_content).map_err(|e| ProjectsError::ConfigRead {
        path: config_path.clone(),
        source: e,
    })?;

    if !token.is_empty() {
        FileTokenStore::open()?.save(&token)?;
    }

    println!("\nConfig saved to {}", config_path.display());
    println!("You can now use 'projects' commands!");

    Ok(())
}
