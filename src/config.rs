//! Loads the deploy-time [`Config`]: where the index file lives and which
//! folder rendered pages go to. Both come from an optional `postgen.yaml`
//! project file.

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::fs::File;
use std::path::{Path, PathBuf};

/// The project file searched for in a directory and its parents.
pub const PROJECT_FILE: &str = "postgen.yaml";

fn default_index_file() -> String {
    String::from("posts.json")
}

fn default_output_folder() -> String {
    String::from("blogposts")
}

#[derive(Deserialize)]
struct Project {
    #[serde(default = "default_index_file")]
    index_file: String,

    #[serde(default = "default_output_folder")]
    output_folder: String,
}

impl Default for Project {
    fn default() -> Self {
        Project {
            index_file: default_index_file(),
            output_folder: default_output_folder(),
        }
    }
}

#[derive(Debug, PartialEq)]
pub struct Config {
    /// The JSON index file.
    pub index_file: PathBuf,

    /// The directory rendered pages are written to.
    pub output_directory: PathBuf,

    /// The output folder as it appears in record URLs, e.g. `blogposts`.
    pub output_folder: String,
}

impl Config {
    /// Searches `dir` and then each of its parents for [`PROJECT_FILE`]. If
    /// none is found, the defaults are used relative to `dir`.
    pub fn from_directory(dir: &Path) -> Result<Config> {
        let mut current = Some(dir);
        while let Some(d) = current {
            let path = d.join(PROJECT_FILE);
            if path.exists() {
                return Config::from_project_file(&path)
                    .with_context(|| format!("Loading configuration `{}`", path.display()));
            }
            current = d.parent();
        }
        Ok(Config::from_project(dir, Project::default()))
    }

    /// Loads the project file at `path`. Paths inside it are relative to the
    /// file's directory.
    pub fn from_project_file(path: &Path) -> Result<Config> {
        let file = File::open(path)
            .map_err(|e| anyhow!("Opening project file `{}`: {}", path.display(), e))?;
        let project: Project = serde_yaml::from_reader(file)?;
        match path.parent() {
            None => Err(anyhow!(
                "Can't get parent directory for provided project file path '{:?}'",
                path
            )),
            Some(project_root) => Ok(Config::from_project(project_root, project)),
        }
    }

    fn from_project(root: &Path, project: Project) -> Config {
        let output_folder = project.output_folder.trim_end_matches('/').to_owned();
        Config {
            index_file: root.join(project.index_file),
            output_directory: root.join(&output_folder),
            output_folder,
        }
    }
}
