use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use shopify_data::report::events_to_csv;
use shopify_data::store::fetch_all_events;
use shopify_data::{CostTracker, Paginator, RestClient};

use super::load_settings;
use crate::cli::ExportFormat;

const FILE_STEM: &str = "store_events";

pub async fn run(format: ExportFormat, output_dir: Option<PathBuf>, limit: u32) -> Result<()> {
    let (config, settings) = load_settings()?;
    let client = RestClient::new(&config).context("failed to build REST client")?;
    let paginator = Paginator::new(CostTracker::new(settings.throttle));

    let events = fetch_all_events(&client, &paginator, limit.max(1))
        .await
        .context("failed to fetch store events")?;

    let dir = match output_dir {
        Some(dir) => {
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("failed to create {}", dir.display()))?;
            dir
        }
        None => default_output_dir(std::env::var_os("HOME").map(PathBuf::from).as_deref()),
    };
    let path = dir.join(format!("{FILE_STEM}.{}", format.extension()));

    let body = match format {
        ExportFormat::Json => serde_json::to_string_pretty(&events)?,
        ExportFormat::Csv => events_to_csv(&events),
    };
    std::fs::write(&path, body).with_context(|| format!("failed to write {}", path.display()))?;

    println!("Wrote {} events to {}", events.len(), path.display());
    Ok(())
}

/// `~/Downloads`, else `~/Desktop`, else the working directory.
fn default_output_dir(home: Option<&Path>) -> PathBuf {
    home.into_iter()
        .flat_map(|home| [home.join("Downloads"), home.join("Desktop")])
        .find(|dir| dir.is_dir())
        .unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("shopify-data-{name}-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_default_output_dir_prefers_downloads() {
        let home = scratch_dir("downloads");
        std::fs::create_dir_all(home.join("Downloads")).unwrap();
        std::fs::create_dir_all(home.join("Desktop")).unwrap();
        assert_eq!(default_output_dir(Some(&home)), home.join("Downloads"));
    }

    #[test]
    fn test_default_output_dir_falls_back_to_desktop() {
        let home = scratch_dir("desktop");
        std::fs::create_dir_all(home.join("Desktop")).unwrap();
        assert_eq!(default_output_dir(Some(&home)), home.join("Desktop"));
    }

    #[test]
    fn test_default_output_dir_without_home() {
        assert_eq!(default_output_dir(None), PathBuf::from("."));
        let home = scratch_dir("bare");
        assert_eq!(default_output_dir(Some(&home)), PathBuf::from("."));
    }
}
