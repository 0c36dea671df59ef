//! Project loading, saving, validation and listing.

use std::path::Path;

use hl_project::schema::Project;

use crate::error::AppResult;

/// One case in a project, for listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseSummary {
    pub kind: &'static str,
    pub id: String,
}

/// Load a project (YAML, or JSON by extension), migrated and validated.
pub fn load_project(path: &Path) -> AppResult<Project> {
    Ok(hl_project::load(path)?)
}

/// Save a project; JSON for a `.json` path, YAML otherwise.
pub fn save_project(path: &Path, project: &Project) -> AppResult<()> {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => hl_project::save_json(path, project)?,
        _ => hl_project::save_yaml(path, project)?,
    }
    Ok(())
}

pub fn validate_project(project: &Project) -> AppResult<()> {
    Ok(hl_project::validate_project(project)?)
}

/// Every case in the project in report order.
pub fn list_cases(project: &Project) -> Vec<CaseSummary> {
    let mut cases = Vec::new();
    let mut push = |kind: &'static str, id: &String| {
        cases.push(CaseSummary {
            kind,
            id: id.clone(),
        })
    };
    project.glasshouses.iter().for_each(|c| push("glasshouse", &c.id));
    project.designs.iter().for_each(|c| push("design", &c.id));
    project.radiation.iter().for_each(|c| push("radiation", &c.id));
    project.networks.iter().for_each(|c| push("network", &c.id));
    project.transients.iter().for_each(|c| push("transient", &c.id));
    cases
}
