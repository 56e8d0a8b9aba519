// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Fixture lookup and output storage.
//!
//! Layout under the fixtures root:
//!
//! ```text
//! input/<sample>.txt              prompt sent to the assistant
//! expected/<sample>_expected.rtf  reference document
//! ```
//!
//! Generated documents go to `<output>/<name>_output.rtf`.

use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum FixtureError {
    #[error("Missing input fixture for sample {sample}: {}", .path.display())]
    MissingInput { sample: String, path: PathBuf },

    #[error("Missing expected fixture for sample {sample}: {}", .path.display())]
    MissingExpected { sample: String, path: PathBuf },

    #[error("Invalid sample name {0:?}")]
    InvalidName(String),

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// One named sample
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fixture {
    pub sample: String,
    pub prompt: String,
    /// Absent for samples used only for format checks
    pub expected: Option<String>,
}

/// Convention-based access to fixture and output directories
#[derive(Clone, Debug)]
pub struct FixtureStore {
    root: PathBuf,
    output_dir: PathBuf,
}

impl FixtureStore {
    pub fn new(root: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            output_dir: output_dir.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn input_path(&self, sample: &str) -> PathBuf {
        self.root.join("input").join(format!("{sample}.txt"))
    }

    pub fn expected_path(&self, sample: &str) -> PathBuf {
        self.root
            .join("expected")
            .join(format!("{sample}_expected.rtf"))
    }

    pub fn output_path(&self, name: &str) -> PathBuf {
        self.output_dir.join(format!("{name}_output.rtf"))
    }

    /// Sample names from `input/*.txt`, sorted. A missing directory yields none.
    pub fn discover_samples(&self) -> Result<Vec<String>, FixtureError> {
        let dir = self.root.join("input");
        let entries = match std::fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(dir = %dir.display(), "no input fixture directory");
                return Ok(Vec::new());
            }
            Err(source) => return Err(FixtureError::Io { path: dir, source }),
        };

        let mut samples = Vec::new();
        for entry in entries {
            let path = entry
                .map_err(|source| FixtureError::Io {
                    path: dir.clone(),
                    source,
                })?
                .path();
            if path.extension().is_some_and(|ext| ext == "txt") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    samples.push(stem.to_string());
                }
            }
        }
        samples.sort();
        tracing::debug!(count = samples.len(), "discovered samples");
        Ok(samples)
    }

    /// Prompt text for `sample`
    pub fn load_prompt(&self, sample: &str) -> Result<String, FixtureError> {
        check_name(sample)?;
        let path = self.input_path(sample);
        read_optional(&path)?.ok_or_else(|| FixtureError::MissingInput {
            sample: sample.to_string(),
            path,
        })
    }

    /// Reference document for `sample`
    pub fn load_expected(&self, sample: &str) -> Result<String, FixtureError> {
        check_name(sample)?;
        let path = self.expected_path(sample);
        read_optional(&path)?.ok_or_else(|| FixtureError::MissingExpected {
            sample: sample.to_string(),
            path,
        })
    }

    /// Prompt plus reference document when one exists
    pub fn load(&self, sample: &str) -> Result<Fixture, FixtureError> {
        let prompt = self.load_prompt(sample)?;
        let expected = read_optional(&self.expected_path(sample))?;
        Ok(Fixture {
            sample: sample.to_string(),
            prompt,
            expected,
        })
    }

    /// Write a generated document, creating the output directory.
    pub fn save_output(&self, name: &str, content: &str) -> Result<PathBuf, FixtureError> {
        check_name(name)?;
        std::fs::create_dir_all(&self.output_dir).map_err(|source| FixtureError::Io {
            path: self.output_dir.clone(),
            source,
        })?;
        let path = self.output_path(name);
        std::fs::write(&path, content).map_err(|source| FixtureError::Io {
            path: path.clone(),
            source,
        })?;
        tracing::debug!(path = %path.display(), bytes = content.len(), "saved output");
        Ok(path)
    }
}

/// `*.rtf` files in `dir`, sorted by file name. A missing directory yields none.
pub fn list_rtf_files(dir: &Path) -> Result<Vec<PathBuf>, FixtureError> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(source) => {
            return Err(FixtureError::Io {
                path: dir.to_path_buf(),
                source,
            })
        }
    };
    let mut files: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|e| e.path())
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "rtf"))
        .collect();
    files.sort();
    Ok(files)
}

fn read_optional(path: &Path) -> Result<Option<String>, FixtureError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(FixtureError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn check_name(name: &str) -> Result<(), FixtureError> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'))
        && !name.starts_with('.');
    if valid {
        Ok(())
    } else {
        Err(FixtureError::InvalidName(name.to_string()))
    }
}

#[cfg(test)]
#[path = "fixtures_tests.rs"]
mod tests;
