//! File system steps
//!
//! Built-in bodies for the file shuffling most build tasks need: deleting
//! intermediate output, copying sources into a staging directory and
//! rewriting text in place. Patterns are globs relative to the context's
//! working directory and are interpolated before matching.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

use crate::error::{BodyError, BodyResult};
use crate::runner::{interpolate, interpolate_list, Context, TaskBody};

/// Expand one interpolated glob pattern into existing paths
fn expand_pattern(ctx: &Context, pattern: &str) -> BodyResult<Vec<PathBuf>> {
    let full = ctx.resolve_path(pattern);

    let paths = glob::glob(&full.to_string_lossy()).map_err(|e| BodyError::Pattern {
        pattern: pattern.to_string(),
        error: e.to_string(),
    })?;

    paths
        .map(|entry| {
            entry.map_err(|e| {
                let path = e.path().to_path_buf();
                BodyError::io(path, e.into())
            })
        })
        .collect()
}

/// Expand interpolated glob patterns into existing paths
fn expand_patterns(ctx: &Context, patterns: &[String]) -> BodyResult<Vec<PathBuf>> {
    let mut matches = Vec::new();
    for pattern in interpolate_list(patterns, &ctx.vars)? {
        matches.extend(expand_pattern(ctx, &pattern)?);
    }
    Ok(matches)
}

fn is_glob(component: &str) -> bool {
    component.contains(|c: char| matches!(c, '*' | '?' | '['))
}

/// Directory a pattern's matches are relative to: the literal components
/// before the first wildcard, or the parent of a literal path
fn glob_base(pattern: &str) -> PathBuf {
    let path = Path::new(pattern);
    if !is_glob(pattern) {
        return path.parent().map(Path::to_path_buf).unwrap_or_default();
    }

    path.components()
        .take_while(|component| !is_glob(&component.as_os_str().to_string_lossy()))
        .collect()
}

/// Delete everything matching a set of patterns; missing paths are fine
#[derive(Debug, Clone)]
pub struct RemovePaths {
    pub patterns: Vec<String>,
}

#[async_trait]
impl TaskBody for RemovePaths {
    async fn run(&self, ctx: &Context) -> BodyResult<()> {
        let mut paths = expand_patterns(ctx, &self.patterns)?;
        // parents first, their children are then already gone
        paths.sort();

        for path in paths {
            let metadata = match fs::symlink_metadata(&path).await {
                Ok(metadata) => metadata,
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => return Err(BodyError::io(path, e)),
            };

            let result = if metadata.is_dir() {
                fs::remove_dir_all(&path).await
            } else {
                fs::remove_file(&path).await
            };

            match result {
                Ok(()) => debug!(path = %path.display(), "removed"),
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(BodyError::io(path, e)),
            }
        }

        Ok(())
    }

    fn describe(&self) -> String {
        format!("remove {}", self.patterns.join(" "))
    }
}

/// Copy every match of `from` into the `to` directory
///
/// Matches keep their path relative to the pattern's literal prefix, or to
/// `base` when given. With `rename`, exactly one file must match and it is
/// written to `to` under the new name.
#[derive(Debug, Clone, Default)]
pub struct CopyPaths {
    pub from: Vec<String>,
    pub to: String,
    pub base: Option<String>,
    pub rename: Option<String>,
}

impl CopyPaths {
    /// Matched sources paired with their destination-relative paths, deduplicated
    fn sources(&self, ctx: &Context) -> BodyResult<Vec<(PathBuf, PathBuf)>> {
        let base = match &self.base {
            Some(base) => Some(ctx.resolve_path(&interpolate(base, &ctx.vars)?)),
            None => None,
        };

        let mut sources: Vec<(PathBuf, PathBuf)> = Vec::new();
        for pattern in interpolate_list(&self.from, &ctx.vars)? {
            let pattern_base = base
                .clone()
                .unwrap_or_else(|| ctx.working_dir.join(glob_base(&pattern)));

            for source in expand_pattern(ctx, &pattern)? {
                if sources.iter().any(|(seen, _)| *seen == source) {
                    continue;
                }

                let relative = match source.strip_prefix(&pattern_base) {
                    Ok(relative) if !relative.as_os_str().is_empty() => relative.to_path_buf(),
                    _ => match source.file_name() {
                        Some(name) => PathBuf::from(name),
                        None => continue,
                    },
                };
                sources.push((source, relative));
            }
        }

        Ok(sources)
    }
}

#[async_trait]
impl TaskBody for CopyPaths {
    async fn run(&self, ctx: &Context) -> BodyResult<()> {
        let dest = ctx.resolve_path(&interpolate(&self.to, &ctx.vars)?);
        let sources = self.sources(ctx)?;

        if sources.is_empty() {
            warn!(patterns = ?self.from, "copy matched no files");
            return Ok(());
        }

        if let Some(rename) = &self.rename {
            let rename = interpolate(rename, &ctx.vars)?;
            return match sources.as_slice() {
                [(source, _)] if source.is_file() => copy_file(source, &dest.join(&rename)).await,
                _ => Err(BodyError::Failed(format!(
                    "rename to '{}' needs exactly one source file, {} matched",
                    rename,
                    sources.len()
                ))),
            };
        }

        for (source, relative) in &sources {
            let target = dest.join(relative);

            if source.is_dir() {
                // matched children are copied on their own
                let children_matched = sources
                    .iter()
                    .any(|(other, _)| other != source && other.starts_with(source));
                if children_matched {
                    fs::create_dir_all(&target)
                        .await
                        .map_err(|e| BodyError::io(&target, e))?;
                } else {
                    copy_dir(source, &target).await?;
                }
            } else {
                copy_file(source, &target).await?;
            }
            debug!(from = %source.display(), to = %target.display(), "copied");
        }

        Ok(())
    }

    fn describe(&self) -> String {
        match &self.rename {
            Some(rename) => format!("copy {} -> {}/{}", self.from.join(" "), self.to, rename),
            None => format!("copy {} -> {}", self.from.join(" "), self.to),
        }
    }
}

/// Copy a single file, creating the target's parent directories
async fn copy_file(source: &Path, target: &Path) -> BodyResult<()> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)
            .await
            .map_err(|e| BodyError::io(parent, e))?;
    }
    fs::copy(source, target)
        .await
        .map_err(|e| BodyError::io(source, e))?;
    Ok(())
}

/// Recursively copy a directory tree
async fn copy_dir(source: &Path, target: &Path) -> BodyResult<()> {
    let mut pending = vec![(source.to_path_buf(), target.to_path_buf())];

    while let Some((from, to)) = pending.pop() {
        fs::create_dir_all(&to)
            .await
            .map_err(|e| BodyError::io(&to, e))?;

        let mut entries = fs::read_dir(&from)
            .await
            .map_err(|e| BodyError::io(&from, e))?;

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| BodyError::io(&from, e))?
        {
            let path = entry.path();
            let file_type = entry
                .file_type()
                .await
                .map_err(|e| BodyError::io(&path, e))?;
            let dest = to.join(entry.file_name());

            if file_type.is_dir() {
                pending.push((path, dest));
            } else {
                fs::copy(&path, &dest)
                    .await
                    .map_err(|e| BodyError::io(&path, e))?;
            }
        }
    }

    Ok(())
}

/// Replace literal text in every file matching `files`
#[derive(Debug, Clone)]
pub struct ReplaceText {
    pub files: Vec<String>,
    pub from: String,
    pub to: String,
}

#[async_trait]
impl TaskBody for ReplaceText {
    async fn run(&self, ctx: &Context) -> BodyResult<()> {
        let from = interpolate(&self.from, &ctx.vars)?;
        let to = interpolate(&self.to, &ctx.vars)?;

        let mut rewritten = 0usize;
        for path in expand_patterns(ctx, &self.files)? {
            if !path.is_file() {
                continue;
            }

            let contents = fs::read_to_string(&path)
                .await
                .map_err(|e| BodyError::io(&path, e))?;
            if !contents.contains(&from) {
                continue;
            }

            fs::write(&path, contents.replace(&from, &to))
                .await
                .map_err(|e| BodyError::io(&path, e))?;
            rewritten += 1;
        }

        debug!(files = rewritten, from = %from, to = %to, "replaced text");
        Ok(())
    }

    fn describe(&self) -> String {
        format!("replace '{}' -> '{}' in {}", self.from, self.to, self.files.join(" "))
    }
}
