//! In-memory project description tree.
//!
//! A [`Project`] holds the file references known to the user project, the
//! groups organizing them, and the user targets. It is persisted as a TOML
//! document (`Project.toml`):
//!
//! ```toml
//! [[file]]
//! id = 1
//! path = "Config/Custom.xcconfig"
//!
//! [[group]]
//! name = "Pods"
//! files = [2]
//!
//! [[target]]
//! name = "App"
//!
//! [[target.configuration]]
//! name = "Debug"
//! base_configuration = 1
//! ```

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::target::Target;
use crate::util::fs::{normalize_path, resolve_against, write_string};

/// File name of the project description.
pub const PROJECT_FILE_NAME: &str = "Project.toml";

/// Errors raised while building or mutating a project tree.
#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("could not find Project.toml in `{}` or any parent directory", .dir.display())]
    NotFound { dir: PathBuf },

    #[error("file reference path must not be empty")]
    EmptyPath,

    #[error("no file reference ids left to allocate")]
    IdSpaceExhausted,

    #[error("group name must not be empty")]
    EmptyGroupName,

    #[error("duplicate file reference id {0}")]
    DuplicateFileId(FileRefId),

    #[error("duplicate group `{0}`")]
    DuplicateGroup(String),

    #[error("group `{group}` refers to unknown file reference {id}")]
    DanglingGroupMember { group: String, id: FileRefId },

    #[error("configuration `{configuration}` of target `{target}` refers to unknown file reference {id}")]
    DanglingBaseConfiguration {
        target: String,
        configuration: String,
        id: FileRefId,
    },
}

/// Stable identity of a file reference within one project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileRefId(u32);

impl FileRefId {
    pub fn new(raw: u32) -> Self {
        FileRefId(raw)
    }
}

impl fmt::Display for FileRefId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A file on disk known to the project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileReference {
    pub id: FileRefId,
    /// Project-relative or absolute path
    pub path: String,
}

impl FileReference {
    /// File extension of the referenced path.
    pub fn extension(&self) -> Option<&str> {
        Path::new(&self.path).extension().and_then(|e| e.to_str())
    }
}

/// Handle to a group inside a [`FileTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GroupId(usize);

/// A named container of file references.
///
/// Lookups go through an explicit path table. When several members share a
/// path, the first member wins.
#[derive(Debug, Clone, Default)]
pub struct Group {
    name: String,
    members: Vec<FileRefId>,
    by_path: HashMap<String, FileRefId>,
}

impl Group {
    /// Group name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Member ids in insertion order.
    pub fn members(&self) -> &[FileRefId] {
        &self.members
    }

    /// Find the member with exactly this path.
    pub fn find_file(&self, path: &str) -> Option<FileRefId> {
        self.by_path.get(path).copied()
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the group has no members.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// File references and groups of one project.
#[derive(Debug, Clone)]
pub struct FileTree {
    /// Directory relative paths are resolved against
    root: PathBuf,
    files: BTreeMap<FileRefId, FileReference>,
    groups: Vec<Group>,
    /// Wider than `FileRefId` so the id after `u32::MAX` is representable
    next_id: u64,
}

impl FileTree {
    /// Create an empty tree rooted at a directory.
    pub fn new(root: impl AsRef<Path>) -> Self {
        FileTree {
            root: normalize_path(root.as_ref()),
            files: BTreeMap::new(),
            groups: Vec::new(),
            next_id: 1,
        }
    }

    /// Directory relative paths are resolved against.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// All file references, ordered by id.
    pub fn files(&self) -> impl Iterator<Item = &FileReference> {
        self.files.values()
    }

    /// Look up a file reference.
    pub fn file(&self, id: FileRefId) -> Option<&FileReference> {
        self.files.get(&id)
    }

    /// Check whether a file reference exists.
    pub fn contains(&self, id: FileRefId) -> bool {
        self.files.contains_key(&id)
    }

    /// Resolved absolute path of a file reference.
    pub fn real_path(&self, id: FileRefId) -> Option<PathBuf> {
        self.file(id)
            .map(|f| normalize_path(&resolve_against(&self.root, Path::new(&f.path))))
    }

    /// All groups.
    pub fn groups(&self) -> impl Iterator<Item = (GroupId, &Group)> {
        self.groups.iter().enumerate().map(|(i, g)| (GroupId(i), g))
    }

    /// Get a group by handle.
    pub fn group(&self, id: GroupId) -> &Group {
        &self.groups[id.0]
    }

    /// Find a group by name.
    pub fn find_group(&self, name: &str) -> Option<GroupId> {
        self.groups.iter().position(|g| g.name == name).map(GroupId)
    }

    /// Find a group by name, creating it if absent.
    pub fn ensure_group(&mut self, name: &str) -> Result<GroupId, ProjectError> {
        if let Some(id) = self.find_group(name) {
            return Ok(id);
        }
        self.create_group(name, Vec::new())
    }

    /// Add a file reference that belongs to no group.
    pub fn add_file(&mut self, path: &str) -> Result<FileRefId, ProjectError> {
        if path.is_empty() {
            return Err(ProjectError::EmptyPath);
        }
        let raw = u32::try_from(self.next_id).map_err(|_| ProjectError::IdSpaceExhausted)?;
        let id = FileRefId(raw);
        self.next_id += 1;
        self.files.insert(
            id,
            FileReference {
                id,
                path: path.to_string(),
            },
        );
        Ok(id)
    }

    /// Create a new file reference inside a group.
    pub fn new_file(&mut self, group: GroupId, path: &str) -> Result<FileRefId, ProjectError> {
        let id = self.add_file(path)?;
        let group = &mut self.groups[group.0];
        group.members.push(id);
        group.by_path.entry(path.to_string()).or_insert(id);
        Ok(id)
    }

    /// Remove a file reference from the tree and from every group.
    pub fn remove_file(&mut self, id: FileRefId) -> Option<FileReference> {
        let removed = self.files.remove(&id)?;
        for index in 0..self.groups.len() {
            if self.groups[index].members.contains(&id) {
                self.groups[index].members.retain(|m| *m != id);
                self.reindex_group(index);
            }
        }
        Some(removed)
    }

    fn create_group(
        &mut self,
        name: &str,
        members: Vec<FileRefId>,
    ) -> Result<GroupId, ProjectError> {
        if name.is_empty() {
            return Err(ProjectError::EmptyGroupName);
        }
        if self.find_group(name).is_some() {
            return Err(ProjectError::DuplicateGroup(name.to_string()));
        }
        for id in &members {
            if !self.contains(*id) {
                return Err(ProjectError::DanglingGroupMember {
                    group: name.to_string(),
                    id: *id,
                });
            }
        }

        self.groups.push(Group {
            name: name.to_string(),
            members,
            by_path: HashMap::new(),
        });
        let index = self.groups.len() - 1;
        self.reindex_group(index);
        Ok(GroupId(index))
    }

    fn reindex_group(&mut self, index: usize) {
        let mut by_path = HashMap::new();
        for id in &self.groups[index].members {
            if let Some(file) = self.files.get(id) {
                by_path.entry(file.path.clone()).or_insert(*id);
            }
        }
        self.groups[index].by_path = by_path;
    }

    fn insert_loaded(&mut self, file: FileReference) -> Result<(), ProjectError> {
        if file.path.is_empty() {
            return Err(ProjectError::EmptyPath);
        }
        if self.files.contains_key(&file.id) {
            return Err(ProjectError::DuplicateFileId(file.id));
        }
        self.next_id = self.next_id.max(u64::from(file.id.0) + 1);
        self.files.insert(file.id, file);
        Ok(())
    }
}

/// A user project: its file tree and its targets.
///
/// The tree and the targets are separate fields so that a configuration can
/// be updated while new file references are added to the tree.
#[derive(Debug, Clone)]
pub struct Project {
    pub tree: FileTree,
    pub targets: Vec<Target>,
}

/// On-disk shape of a project description.
#[derive(Debug, Default, Serialize, Deserialize)]
struct ProjectDocument {
    #[serde(default, rename = "file", skip_serializing_if = "Vec::is_empty")]
    files: Vec<FileReference>,

    #[serde(default, rename = "group", skip_serializing_if = "Vec::is_empty")]
    groups: Vec<GroupDocument>,

    #[serde(default, rename = "target", skip_serializing_if = "Vec::is_empty")]
    targets: Vec<Target>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GroupDocument {
    name: String,
    #[serde(default)]
    files: Vec<FileRefId>,
}

impl Project {
    /// Create an empty project rooted at a directory.
    pub fn new(root: impl AsRef<Path>) -> Self {
        Project {
            tree: FileTree::new(root),
            targets: Vec::new(),
        }
    }

    /// Add a target.
    pub fn with_target(mut self, target: Target) -> Self {
        self.targets.push(target);
        self
    }

    /// Directory relative file paths are resolved against.
    pub fn root(&self) -> &Path {
        self.tree.root()
    }

    /// Find a target by name.
    pub fn target(&self, name: &str) -> Option<&Target> {
        self.targets.iter().find(|t| t.name == name)
    }

    /// Parse a project description.
    pub fn parse(source: &str, root: &Path) -> Result<Self> {
        let document: ProjectDocument =
            toml::from_str(source).context("failed to parse project description")?;
        Ok(Self::from_document(document, root)?)
    }

    /// Load a project description; its directory becomes the project root.
    pub fn load(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read project: {}", path.display()))?;
        let root = path.parent().unwrap_or(Path::new("."));
        Self::parse(&source, root).with_context(|| format!("invalid project: {}", path.display()))
    }

    /// Serialize the project description.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(&self.to_document()).context("failed to serialize project")
    }

    /// Write the project description.
    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = self.to_toml_string()?;
        write_string(path, &contents)
    }

    fn from_document(document: ProjectDocument, root: &Path) -> Result<Self, ProjectError> {
        let mut tree = FileTree::new(root);
        for file in document.files {
            tree.insert_loaded(file)?;
        }
        for group in document.groups {
            tree.create_group(&group.name, group.files)?;
        }

        for target in &document.targets {
            for config in &target.configurations {
                if let Some(id) = config.base_configuration_reference {
                    if !tree.contains(id) {
                        return Err(ProjectError::DanglingBaseConfiguration {
                            target: target.name.clone(),
                            configuration: config.name.clone(),
                            id,
                        });
                    }
                }
            }
        }

        Ok(Project {
            tree,
            targets: document.targets,
        })
    }

    fn to_document(&self) -> ProjectDocument {
        ProjectDocument {
            files: self.tree.files().cloned().collect(),
            groups: self
                .tree
                .groups
                .iter()
                .map(|g| GroupDocument {
                    name: g.name.clone(),
                    files: g.members.clone(),
                })
                .collect(),
            targets: self.targets.clone(),
        }
    }
}

/// Ids referenced by more than one group member with the same path.
///
/// Such duplicates only arise from erroneous edits; lookups use the first.
pub fn shadowed_members(group: &Group, tree: &FileTree) -> Vec<FileRefId> {
    let mut seen = HashSet::new();
    group
        .members
        .iter()
        .filter(|id| {
            tree.file(**id)
                .map(|f| !seen.insert(f.path.clone()))
                .unwrap_or(false)
        })
        .copied()
        .collect()
}
