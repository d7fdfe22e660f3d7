use clap::Parser;
use github_sync_plugin::config::cli::Command;
use github_sync_plugin::core::assets::{default_asset, GitHubAssets};
use github_sync_plugin::core::fields::GitHubFields;
use github_sync_plugin::core::inbound;
use github_sync_plugin::core::mapping::TRIGGER_CATEGORY_NAME;
use github_sync_plugin::core::outbound::GitHubOutbound;
use github_sync_plugin::core::triggers::TriggerRegistrar;
use github_sync_plugin::core::webhook::GitHubWebhook;
use github_sync_plugin::core::{
    AssetCatalog, ConfigProvider, FieldDescriptor, GitHubApi, Organization, OutboundField,
    OutboundSync, Project, WebhookRegistrar,
};
use github_sync_plugin::utils::error::ErrorSeverity;
use github_sync_plugin::utils::{logger, validation::Validate};
use github_sync_plugin::{CliConfig, GitHubClient, PluginConfig, PluginError, Result, TriggerClient};
use serde::Serialize;

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    let config = match PluginConfig::from_file(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            logger::init_cli_logger(cli.verbose, None);
            tracing::error!("❌ Failed to load {}: {}", cli.config, e);
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    if config.json_logging() {
        logger::init_json_logger(config.log_level());
    } else {
        logger::init_cli_logger(cli.verbose, config.log_level());
    }

    tracing::info!("Starting github-sync-plugin against {}", config.api_url());

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    if let Err(e) = run(cli.command, &config).await {
        tracing::error!(
            "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        // exit code follows severity
        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };

        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }

    Ok(())
}

async fn run(command: Command, config: &PluginConfig) -> Result<()> {
    if let Command::Classify { payload, event } = &command {
        let body = std::fs::read(payload)?;
        let parsed = inbound::parse_event(event.as_deref(), &body)?;
        return print_json(&inbound::summarize(&parsed, config.sync_user())?);
    }

    let client = GitHubClient::connect(config)?;
    let assets = GitHubAssets::new(&client, config.sync_user());

    match command {
        Command::TestConnection => {
            let login = assets.test_connection().await?;
            println!("✅ Connected to {} as {}", config.instance_url(), login);
        }
        Command::Orgs => print_json(&assets.fetch_org().await?)?,
        Command::Projects { org } => {
            let org = find_org(&assets, &org).await?;
            print_json(&assets.fetch_projects(&org).await?)?;
        }
        Command::Assets { org } => {
            let org = find_org(&assets, &org).await?;
            print_json(&assets.fetch_assets(&org).await?)?;
        }
        Command::Fields { org, repo } => {
            let project = find_projects(&assets, &org, &[repo]).await?.remove(0);
            print_json(&describe_fields(&client, &project).await?)?;
        }
        Command::RegisterWebhook {
            org,
            repos,
            url,
            name,
            description,
        } => {
            let projects = find_projects(&assets, &org, &repos).await?;
            let triggers = connect_triggers(config)?;

            let mut webhook: GitHubWebhook<'_, _, TriggerClient> =
                GitHubWebhook::new(&client, &projects, config.webhook_settings());
            if let Some((trigger_client, category)) = &triggers {
                webhook = webhook.with_triggers(TriggerRegistrar::new(trigger_client, category));
            }
            let hooks = webhook
                .create_webhook(&name, &url, &description, &org)
                .await?;
            print_json(&hooks)?;
        }
        Command::CreateIssue { org, repo, fields } => {
            let project = find_projects(&assets, &org, &[repo]).await?.remove(0);
            let asset = default_asset();
            let outbound =
                GitHubOutbound::new(&client, &project, &asset, config.instance_url());

            let fields: Vec<OutboundField> = fields
                .into_iter()
                .map(|(name, raw)| OutboundField {
                    name,
                    // lists and numbers may be passed as JSON
                    value: serde_json::from_str(&raw)
                        .unwrap_or(serde_json::Value::String(raw)),
                })
                .collect();
            let sync_fields = outbound.transform_fields(&fields);
            print_json(&outbound.create(&sync_fields).await?)?;
        }
        Command::Comment {
            org,
            repo,
            issue,
            body,
        } => {
            let project = find_projects(&assets, &org, &[repo]).await?.remove(0);
            let asset = default_asset();
            GitHubOutbound::new(&client, &project, &asset, config.instance_url())
                .with_workitem(issue.clone())
                .comment_create(&body)
                .await?;
            println!("✅ Commented on {}#{}", project.full_name(), issue);
        }
        Command::Classify { .. } => {}
    }

    Ok(())
}

/// Client and category name for trigger registration, when enabled.
fn connect_triggers(config: &PluginConfig) -> Result<Option<(TriggerClient, String)>> {
    let Some(triggers) = config.trigger_settings() else {
        return Ok(None);
    };

    let base_url = triggers
        .api_url
        .as_deref()
        .ok_or_else(|| PluginError::MissingConfigError {
            field: "triggers.api_url".to_string(),
        })?;
    let token = triggers
        .token
        .as_deref()
        .ok_or_else(|| PluginError::MissingConfigError {
            field: "triggers.token".to_string(),
        })?;
    let category = triggers
        .category_name
        .clone()
        .unwrap_or_else(|| TRIGGER_CATEGORY_NAME.to_string());

    Ok(Some((TriggerClient::connect(base_url, token, config)?, category)))
}

async fn find_org<A: GitHubApi>(assets: &GitHubAssets<'_, A>, name: &str) -> Result<Organization> {
    assets
        .fetch_org()
        .await?
        .into_iter()
        .find(|org| org.organization.eq_ignore_ascii_case(name))
        .ok_or_else(|| PluginError::InvalidConfigValueError {
            field: "org".to_string(),
            value: name.to_string(),
            reason: "organization not visible to the sync user".to_string(),
        })
}

/// Resolves repository names to projects, in the order given.
async fn find_projects<A: GitHubApi>(
    assets: &GitHubAssets<'_, A>,
    org: &str,
    repos: &[String],
) -> Result<Vec<Project>> {
    let org = find_org(assets, org).await?;
    let available = assets.fetch_projects(&org).await?;

    repos
        .iter()
        .map(|repo| {
            available
                .iter()
                .find(|p| p.display_name.eq_ignore_ascii_case(repo))
                .cloned()
                .ok_or_else(|| PluginError::InvalidConfigValueError {
                    field: "repo".to_string(),
                    value: repo.clone(),
                    reason: format!("not found in {} or issues are disabled", org.organization),
                })
        })
        .collect()
}

#[derive(Serialize)]
struct DescribedField {
    #[serde(flatten)]
    attributes: github_sync_plugin::core::FieldAttributes,
    type_info: github_sync_plugin::core::FieldTypeInfo,
}

async fn describe_fields(client: &GitHubClient, project: &Project) -> Result<Vec<DescribedField>> {
    let mut described = Vec::new();
    for field in GitHubFields::new(client, project).describe().await? {
        described.push(DescribedField {
            type_info: field.fetch_fieldtype_info().await?,
            attributes: field.attributes().clone(),
        });
    }
    Ok(described)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
