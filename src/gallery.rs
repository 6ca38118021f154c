use log::error;
use serde::Serialize;

use crate::config::AppConfig;
use crate::images;
use crate::models::project::Project;
use crate::store::Store;

/// One gallery tile as sent to the browser.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct Tile {
    pub id: i64,
    pub url: String,
    pub project_link: String,
    pub ranking: i64,
}

impl From<&Project> for Tile {
    fn from(p: &Project) -> Self {
        Tile {
            id: p.id,
            url: p.url.clone(),
            project_link: p.project_link.clone(),
            ranking: p.ranking,
        }
    }
}

/// Projects in display order. A failed fetch is logged and shows as an
/// empty gallery.
pub fn load(store: &dyn Store) -> Vec<Project> {
    match store.project_list() {
        Ok(projects) => projects,
        Err(e) => {
            error!("Error fetching projects: {}", e);
            Vec::new()
        }
    }
}

/// Tiles for the public grid, skipping images served from hosts that are
/// not allowed.
pub fn tiles(store: &dyn Store, config: &AppConfig) -> Vec<Tile> {
    let allowlist = images::remote_hosts(store);
    load(store)
        .iter()
        .filter(|p| images::is_allowed_source(&p.url, &config.public_url, &allowlist))
        .map(Tile::from)
        .collect()
}
