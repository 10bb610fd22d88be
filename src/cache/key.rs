//! Cache Key Module
//!
//! Validated workspace and dataset path types, and the cache key derived from them.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::cache::{DEFAULT_MAX_PATH_DEPTH, MAX_SEGMENT_LENGTH, MAX_WORKSPACE_LENGTH};
use crate::error::{CacheError, Result};

/// Separates the workspace from the path inside a cache key.
const WORKSPACE_SEPARATOR: char = ':';
/// Separates path segments.
const SEGMENT_SEPARATOR: char = '/';

// == Workspace ==
/// A validated workspace identifier.
///
/// Non-empty, at most `MAX_WORKSPACE_LENGTH` bytes, and free of `:` and `/`
/// so that it can never be confused with the path part of a key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Workspace(String);

impl Workspace {
    /// Parses a workspace identifier, rejecting malformed input.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(CacheError::InvalidPath(
                "Workspace cannot be empty".to_string(),
            ));
        }
        if name.len() > MAX_WORKSPACE_LENGTH {
            return Err(CacheError::InvalidPath(format!(
                "Workspace exceeds maximum length of {} bytes",
                MAX_WORKSPACE_LENGTH
            )));
        }
        if name.contains(WORKSPACE_SEPARATOR) || name.contains(SEGMENT_SEPARATOR) {
            return Err(CacheError::InvalidPath(format!(
                "Workspace '{}' must not contain '{}' or '{}'",
                name, WORKSPACE_SEPARATOR, SEGMENT_SEPARATOR
            )));
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Workspace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Workspace {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

// == Dataset Path ==
/// An ordered sequence of validated path segments.
///
/// The empty path is the root of a workspace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DatasetPath {
    segments: Vec<String>,
}

impl DatasetPath {
    /// Returns the root path (no segments).
    pub fn root() -> Self {
        Self::default()
    }

    /// Builds a path from individual segments.
    ///
    /// Each segment must be non-empty, free of `/`, and at most
    /// `MAX_SEGMENT_LENGTH` bytes.
    pub fn from_segments<I, S>(segments: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments = segments
            .into_iter()
            .map(|segment| {
                let segment = segment.into();
                validate_segment(&segment)?;
                Ok(segment)
            })
            .collect::<Result<Vec<_>>>()?;

        if segments.len() > DEFAULT_MAX_PATH_DEPTH {
            return Err(depth_error(DEFAULT_MAX_PATH_DEPTH));
        }

        Ok(Self { segments })
    }

    /// Parses a `/`-separated path using the default depth limit.
    pub fn parse(raw: &str) -> Result<Self> {
        Self::parse_with_depth(raw, DEFAULT_MAX_PATH_DEPTH)
    }

    /// Parses a `/`-separated path with an explicit depth limit.
    ///
    /// Leading and trailing slashes are ignored; an empty inner segment
    /// (such as `a//b`) is rejected.
    pub fn parse_with_depth(raw: &str, max_depth: usize) -> Result<Self> {
        let trimmed = raw.trim_matches(SEGMENT_SEPARATOR);
        if trimmed.is_empty() {
            return Ok(Self::root());
        }

        let segments: Vec<String> = trimmed
            .split(SEGMENT_SEPARATOR)
            .map(|segment| {
                validate_segment(segment)?;
                Ok(segment.to_string())
            })
            .collect::<Result<_>>()?;

        if segments.len() > max_depth {
            return Err(depth_error(max_depth));
        }

        Ok(Self { segments })
    }

    /// Returns a new path with `name` appended.
    ///
    /// # Errors
    /// - `InvalidPath` if `name` is not a valid segment or the result would
    ///   exceed `DEFAULT_MAX_PATH_DEPTH`
    pub fn child(&self, name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        validate_segment(&name)?;
        if self.segments.len() >= DEFAULT_MAX_PATH_DEPTH {
            return Err(depth_error(DEFAULT_MAX_PATH_DEPTH));
        }
        let mut segments = self.segments.clone();
        segments.push(name);
        Ok(Self { segments })
    }

    /// Returns the parent path, or None for the root.
    pub fn parent(&self) -> Option<Self> {
        if self.segments.is_empty() {
            return None;
        }
        let mut segments = self.segments.clone();
        segments.pop();
        Some(Self { segments })
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// Returns true if `self` is a strict ancestor of `other`.
    pub fn is_ancestor_of(&self, other: &DatasetPath) -> bool {
        other.segments.len() > self.segments.len()
            && other.segments.starts_with(&self.segments)
    }
}

impl fmt::Display for DatasetPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("/"))
    }
}

impl FromStr for DatasetPath {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

fn validate_segment(segment: &str) -> Result<()> {
    if segment.is_empty() {
        return Err(CacheError::InvalidPath(
            "Path segments cannot be empty".to_string(),
        ));
    }
    if segment.contains(SEGMENT_SEPARATOR) {
        return Err(CacheError::InvalidPath(format!(
            "Path segment '{}' must not contain '{}'",
            segment, SEGMENT_SEPARATOR
        )));
    }
    if segment.len() > MAX_SEGMENT_LENGTH {
        return Err(CacheError::InvalidPath(format!(
            "Path segment exceeds maximum length of {} bytes",
            MAX_SEGMENT_LENGTH
        )));
    }
    Ok(())
}

fn depth_error(max_depth: usize) -> CacheError {
    CacheError::InvalidPath(format!(
        "Path exceeds maximum depth of {} segments",
        max_depth
    ))
}

// == Cache Key ==
/// String key derived from a `(workspace, path)` pair.
///
/// Format: `{workspace}:{seg1}/{seg2}/...`. Injective because the workspace
/// never contains `:` and segments never contain `/`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn new(workspace: &Workspace, path: &DatasetPath) -> Self {
        Self(format!("{}{}{}", workspace, WORKSPACE_SEPARATOR, path))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<CacheKey> for String {
    fn from(key: CacheKey) -> Self {
        key.0
    }
}
