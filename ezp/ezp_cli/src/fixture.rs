//! Fixture files.
//!
//! A fixture describes roles, users, groups, role assignments and content
//! in TOML and is loaded into an in-memory role store:
//!
//! ```toml
//! [[roles]]
//! identifier = "Editor"
//!
//! [[roles.policies]]
//! module = "content"
//! function = "edit"
//! limitations = [{ identifier = "Language", values = ["ger-DE"] }]
//!
//! [[groups]]
//! name = "Editors"
//!
//! [[users]]
//! login = "anna"
//! groups = ["Editors"]
//!
//! [[assignments]]
//! role = "Editor"
//! group = "Editors"
//!
//! [[contents]]
//! id = 42
//! content_type = "folder"
//! main_language = "eng-GB"
//! ```

use anyhow::{anyhow, bail, Context, Result};
use ezp_core::id::{ContentId, UserGroupId, UserId};
use ezp_policy::{
    ContentInfo, InMemoryRoleStore, Limitation, LimitationService, Role, RoleStore, UserReference,
};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::debug;

/// A user group.
#[derive(Debug, Clone, Deserialize)]
pub struct GroupDef {
    /// Group name, referenced by users and assignments.
    pub name: String,
}

/// A user.
#[derive(Debug, Clone, Deserialize)]
pub struct UserDef {
    /// Login, referenced on the command line.
    pub login: String,

    /// Names of the groups the user belongs to.
    #[serde(default)]
    pub groups: Vec<String>,
}

/// A role assignment to exactly one user or group.
#[derive(Debug, Clone, Deserialize)]
pub struct AssignmentDef {
    /// Role identifier.
    pub role: String,

    /// Login of the assignee.
    pub user: Option<String>,

    /// Group name of the assignee.
    pub group: Option<String>,

    /// Optional role limitation.
    pub limitation: Option<Limitation>,
}

/// A content item.
#[derive(Debug, Clone, Deserialize)]
pub struct ContentDef {
    pub id: ContentId,
    pub content_type: String,
    #[serde(default = "default_section")]
    pub section: String,
    /// Login of the owner.
    pub owner: Option<String>,
    pub main_language: String,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub locations: Vec<String>,
}

fn default_section() -> String {
    "standard".to_string()
}

/// A parsed fixture file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FixtureFile {
    #[serde(default)]
    pub roles: Vec<Role>,
    #[serde(default)]
    pub groups: Vec<GroupDef>,
    #[serde(default)]
    pub users: Vec<UserDef>,
    #[serde(default)]
    pub assignments: Vec<AssignmentDef>,
    #[serde(default)]
    pub contents: Vec<ContentDef>,
}

impl FixtureFile {
    /// Read and parse a fixture file.
    pub fn read(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read fixture {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse fixture {}", path.display()))
    }

    /// Describe every stored limitation `service` rejects.
    pub fn problems(&self, service: &LimitationService) -> Vec<String> {
        let mut problems = Vec::new();

        for role in &self.roles {
            for policy in &role.policies {
                for limitation in &policy.limitations {
                    if let Err(e) = service.validate(limitation) {
                        problems.push(format!(
                            "role '{}' policy {}/{}: {}",
                            role.identifier, policy.module, policy.function, e
                        ));
                    }
                }
            }
        }

        for assignment in &self.assignments {
            if let Some(limitation) = &assignment.limitation {
                let checked = service
                    .validate(limitation)
                    .and_then(|_| service.resolve_role_limitation(limitation));
                if let Err(e) = checked {
                    problems.push(format!(
                        "assignment of role '{}': {}",
                        assignment.role, e
                    ));
                }
            }
        }

        problems
    }
}

/// A fixture loaded into a role store.
pub struct Fixture {
    /// Roles and assignments.
    pub store: InMemoryRoleStore,

    /// Users by login.
    pub users: HashMap<String, UserReference>,

    /// Content by id.
    pub contents: HashMap<ContentId, ContentInfo>,
}

impl Fixture {
    /// Read a fixture file and load it.
    pub fn load(path: &Path) -> Result<Self> {
        Self::build(FixtureFile::read(path)?)
    }

    /// Load a parsed fixture into a fresh store.
    pub fn build(file: FixtureFile) -> Result<Self> {
        let store = InMemoryRoleStore::new();

        let mut role_ids = HashMap::new();
        for role in file.roles {
            if role_ids.insert(role.identifier.clone(), role.id).is_some() {
                bail!("Duplicate role '{}'", role.identifier);
            }
            store.add_role(role)?;
        }

        let group_ids: HashMap<String, UserGroupId> = file
            .groups
            .iter()
            .map(|group| (group.name.clone(), UserGroupId::new()))
            .collect();

        let mut users = HashMap::new();
        for user in file.users {
            let groups = user
                .groups
                .iter()
                .map(|name| {
                    group_ids
                        .get(name)
                        .copied()
                        .ok_or_else(|| anyhow!("User '{}' is in unknown group '{}'", user.login, name))
                })
                .collect::<Result<Vec<_>>>()?;
            let reference = UserReference::with_login(user.login.clone()).in_groups(groups);
            users.insert(user.login, reference);
        }

        for assignment in file.assignments {
            let role_id = role_ids
                .get(&assignment.role)
                .ok_or_else(|| anyhow!("Assignment references unknown role '{}'", assignment.role))?;

            match (&assignment.user, &assignment.group) {
                (Some(login), None) => {
                    let user = users
                        .get(login)
                        .ok_or_else(|| anyhow!("Assignment references unknown user '{}'", login))?;
                    store.assign_role_to_user(role_id, user.user_id, assignment.limitation)?;
                }
                (None, Some(name)) => {
                    let group_id = group_ids
                        .get(name)
                        .ok_or_else(|| anyhow!("Assignment references unknown group '{}'", name))?;
                    store.assign_role_to_group(role_id, *group_id, assignment.limitation)?;
                }
                _ => bail!(
                    "Assignment of role '{}' needs exactly one of user or group",
                    assignment.role
                ),
            }
        }

        let mut contents = HashMap::new();
        for content in file.contents {
            let owner_id = match &content.owner {
                Some(login) => {
                    users
                        .get(login)
                        .ok_or_else(|| {
                            anyhow!("Content #{} has unknown owner '{}'", content.id, login)
                        })?
                        .user_id
                }
                None => UserId::nil(),
            };

            let mut info = ContentInfo::new(
                content.id,
                content.content_type,
                content.section,
                owner_id,
                content.main_language,
            )
            .with_languages(content.languages);
            for location in content.locations {
                info = info.with_location(location);
            }
            contents.insert(content.id, info);
        }

        debug!(
            "Loaded fixture with {} users and {} content items",
            users.len(),
            contents.len()
        );

        Ok(Self {
            store,
            users,
            contents,
        })
    }

    /// Look up a user by login.
    pub fn user(&self, login: &str) -> Result<UserReference> {
        self.users
            .get(login)
            .cloned()
            .ok_or_else(|| anyhow!("Unknown user '{}'", login))
    }

    /// Look up content by id.
    pub fn content(&self, id: ContentId) -> Result<ContentInfo> {
        self.contents
            .get(&id)
            .cloned()
            .ok_or_else(|| anyhow!("Unknown content #{}", id))
    }
}
