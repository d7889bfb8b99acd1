//! The `check` command

use anyhow::Result;
use clap::{ArgGroup, Args};
use ezp_core::id::ContentId;
use ezp_policy::{
    ContentCreateStruct, Decision, EngineConfig, PermissionContext, PermissionObject, RoleStore,
    Target, VersionBuilder,
};
use std::path::PathBuf;
use std::process::ExitCode;

use super::resolver_for;
use crate::fixture::Fixture;

/// Arguments for the check command
#[derive(Args)]
#[clap(group(
    ArgGroup::new("object")
        .required(true)
        .args(["content", "new_content_type"])
))]
pub struct CheckArgs {
    /// Fixture file with roles, users and content
    #[clap(long)]
    pub fixture: PathBuf,

    /// Login of the user to check for
    #[clap(long)]
    pub user: String,

    /// Module, e.g. content
    #[clap(long, default_value = "content")]
    pub module: String,

    /// Function, e.g. publish
    #[clap(long)]
    pub function: String,

    /// Id of existing content from the fixture
    #[clap(long)]
    pub content: Option<ContentId>,

    /// Check creation of new content of this type instead
    #[clap(long)]
    pub new_content_type: Option<String>,

    /// Section of the new content
    #[clap(long, default_value = "standard")]
    pub section: String,

    /// Main language of the new content
    #[clap(long, default_value = "eng-GB")]
    pub language: String,

    /// Translations the operation publishes
    #[clap(long, value_delimiter = ',')]
    pub publish_translations: Vec<String>,

    /// Languages the user wants to translate into
    #[clap(long, value_delimiter = ',')]
    pub translate_to: Vec<String>,

    /// Translations the operation updates
    #[clap(long, value_delimiter = ',')]
    pub update_translations: Vec<String>,

    /// Parent location path strings, e.g. /1/2/
    #[clap(long)]
    pub parent_location: Vec<String>,

    /// Print the decision as JSON
    #[clap(long)]
    pub json: bool,
}

impl CheckArgs {
    fn targets(&self) -> Vec<Target> {
        let mut targets = Vec::new();

        if !self.publish_translations.is_empty()
            || !self.translate_to.is_empty()
            || !self.update_translations.is_empty()
        {
            let mut builder = VersionBuilder::new();
            if !self.publish_translations.is_empty() {
                builder = builder.publish_translations(self.publish_translations.iter().cloned());
            }
            if !self.translate_to.is_empty() {
                builder = builder.translate_to_any_language_of(self.translate_to.iter().cloned());
            }
            if !self.update_translations.is_empty() {
                builder = builder.update_fields_to(None, self.update_translations.iter().cloned());
            }
            targets.push(builder.build());
        }

        targets.extend(self.parent_location.iter().map(Target::location));
        targets
    }

    fn object(&self, fixture: &Fixture) -> Result<PermissionObject> {
        match (&self.content, &self.new_content_type) {
            (Some(id), _) => Ok(fixture.content(*id)?.into()),
            (None, Some(content_type)) => Ok(ContentCreateStruct::new(
                content_type.as_str(),
                self.section.as_str(),
                self.language.as_str(),
            )
            .into()),
            (None, None) => anyhow::bail!("Either --content or --new-content-type is required"),
        }
    }
}

/// Implementation of the check command
pub fn execute_check(args: &CheckArgs, config: &EngineConfig) -> Result<ExitCode> {
    let fixture = Fixture::load(&args.fixture)?;
    let resolver = resolver_for(&fixture, config)?;
    let context = PermissionContext::new(fixture.user(&args.user)?);

    let object = args.object(&fixture)?;
    let targets = args.targets();
    let decision = resolver.evaluate(&context, &args.module, &args.function, &object, &targets)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&decision)?);
    } else {
        println!("{}", describe(&decision, &fixture));
    }

    Ok(if decision.granted {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}

fn describe(decision: &Decision, fixture: &Fixture) -> String {
    let Some(matched) = decision.matched else {
        return decision.to_string();
    };

    match fixture.store.get_role(&matched.role_id) {
        Ok(role) => {
            let policy = role
                .policies
                .iter()
                .find(|policy| policy.id == matched.policy_id)
                .map(ToString::to_string)
                .unwrap_or_else(|| matched.policy_id.to_string());
            format!("granted by role '{}': {}", role.identifier, policy)
        }
        Err(_) => decision.to_string(),
    }
}
