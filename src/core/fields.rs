use crate::core::mapping::{self, FieldKind, IssueFieldSpec};
use crate::core::{
    FieldAttributes, FieldDescriptor, FieldSource, FieldTypeInfo, FieldValue, GitHubApi, Project,
};
use crate::domain::model::FieldType;
use crate::utils::error::{PluginError, Result};
use async_trait::async_trait;

/// One issue field of a repository.
pub struct GitHubField<'a, A: GitHubApi> {
    api: &'a A,
    project: &'a Project,
    attrs: FieldAttributes,
}

impl<'a, A: GitHubApi> GitHubField<'a, A> {
    pub fn new(api: &'a A, project: &'a Project, attrs: FieldAttributes) -> Self {
        Self {
            api,
            project,
            attrs,
        }
    }

    pub fn attributes(&self) -> &FieldAttributes {
        &self.attrs
    }

    fn kind(&self) -> Result<FieldKind> {
        FieldKind::parse(&self.attrs.kind).ok_or_else(|| PluginError::UnsupportedFieldType {
            field: self.attrs.raw_title.clone(),
            kind: self.attrs.kind.clone(),
        })
    }

    async fn milestone_values(&self) -> Result<Vec<FieldValue>> {
        let milestones = self
            .api
            .list_milestones(self.project.owner(), self.project.repo())
            .await?;

        // GitHub takes the milestone number, not its id, when setting it on an issue
        Ok(milestones
            .into_iter()
            .map(|m| FieldValue::new(m.number.to_string(), m.title))
            .collect())
    }
}

#[async_trait]
impl<'a, A: GitHubApi> FieldDescriptor for GitHubField<'a, A> {
    fn is_required_field(&self) -> bool {
        self.attrs.required
    }

    fn is_disabled_field(&self) -> bool {
        false
    }

    fn is_custom_field(&self) -> bool {
        self.attrs.custom_field_options.is_some()
    }

    fn is_readonly_field(&self) -> bool {
        false
    }

    fn fetch_name(&self) -> &str {
        &self.attrs.raw_title
    }

    fn fetch_display_name(&self) -> &str {
        &self.attrs.title
    }

    fn is_multivalue_field(&self) -> bool {
        self.attrs.multivalue
    }

    async fn fetch_fieldtype_info(&self) -> Result<FieldTypeInfo> {
        let kind = self.kind()?;

        let info = match kind {
            FieldKind::Relation => {
                FieldTypeInfo::list(self.milestone_values().await?, FieldType::Text)
            }
            FieldKind::MultiSelect | FieldKind::Tagger | FieldKind::Lookup => {
                let values = self.attrs.custom_field_options.clone().unwrap_or_default();
                FieldTypeInfo::list(values, FieldType::Text)
            }
            scalar => {
                let (field_type, icon) = scalar.host_type();
                FieldTypeInfo::scalar(field_type, icon)
            }
        };

        tracing::debug!(
            "Field {} ({}) maps to {:?}",
            self.attrs.raw_title,
            kind.as_str(),
            info.field_type
        );
        Ok(info)
    }
}

/// Issue field catalog of one repository.
pub struct GitHubFields<'a, A: GitHubApi> {
    api: &'a A,
    project: &'a Project,
}

impl<'a, A: GitHubApi> GitHubFields<'a, A> {
    pub fn new(api: &'a A, project: &'a Project) -> Self {
        Self { api, project }
    }

    /// Wraps every fetched field for introspection.
    pub async fn describe(&self) -> Result<Vec<GitHubField<'a, A>>> {
        Ok(self
            .fetch_fields()
            .await?
            .into_iter()
            .map(|attrs| GitHubField::new(self.api, self.project, attrs))
            .collect())
    }

    async fn label_options(&self) -> Result<Vec<FieldValue>> {
        let labels = self
            .api
            .list_labels(self.project.owner(), self.project.repo())
            .await?;
        // labels are set by name
        Ok(labels
            .into_iter()
            .map(|label| FieldValue::new(label.name.clone(), label.name))
            .collect())
    }
}

fn attributes_for(spec: &IssueFieldSpec, options: Option<Vec<FieldValue>>) -> FieldAttributes {
    FieldAttributes {
        raw_title: spec.raw_title.to_string(),
        title: spec.title.to_string(),
        kind: spec.kind.as_str().to_string(),
        required: spec.required,
        multivalue: spec.multivalue,
        custom_field_options: options,
    }
}

#[async_trait]
impl<'a, A: GitHubApi> FieldSource for GitHubFields<'a, A> {
    async fn fetch_fields(&self) -> Result<Vec<FieldAttributes>> {
        let mut fields = Vec::with_capacity(mapping::ISSUE_FIELDS.len());

        for spec in mapping::ISSUE_FIELDS {
            let options = match spec.raw_title {
                mapping::LABELS_FIELD => Some(self.label_options().await?),
                mapping::STATE_FIELD => Some(mapping::state_options()),
                _ => None,
            };
            fields.push(attributes_for(spec, options));
        }

        tracing::info!(
            "Fetched {} issue fields for {}",
            fields.len(),
            self.project.full_name()
        );
        Ok(fields)
    }
}
