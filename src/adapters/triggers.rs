use crate::adapters::http::{build_client, join_url, send_json};
use crate::core::{ConfigProvider, TriggerApi};
use crate::domain::remote::{Trigger, TriggerCategory};
use crate::utils::error::Result;
use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::Client;
use serde::Deserialize;

#[derive(Deserialize)]
struct CategoryList {
    trigger_categories: Vec<TriggerCategory>,
}

#[derive(Deserialize)]
struct CategoryEnvelope {
    trigger_category: TriggerCategory,
}

#[derive(Deserialize)]
struct TriggerList {
    triggers: Vec<Trigger>,
}

#[derive(Deserialize)]
struct TriggerEnvelope {
    trigger: Trigger,
}

/// Client for the automation service that owns trigger rules. It carries
/// the automation service's own token, never the GitHub one.
#[derive(Debug, Clone)]
pub struct TriggerClient {
    client: Client,
    base_url: String,
}

impl TriggerClient {
    pub fn connect<C: ConfigProvider + ?Sized>(
        base_url: &str,
        token: &str,
        config: &C,
    ) -> Result<Self> {
        url::Url::parse(base_url)?;
        Ok(Self {
            client: build_client(config, "triggers.token", token, HeaderMap::new())?,
            base_url: base_url.to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }
}

#[async_trait]
impl TriggerApi for TriggerClient {
    async fn list_trigger_categories(&self) -> Result<Vec<TriggerCategory>> {
        let list: CategoryList =
            send_json(self.client.get(self.endpoint("trigger_categories"))).await?;
        Ok(list.trigger_categories)
    }

    async fn create_trigger_category(
        &self,
        payload: &serde_json::Value,
    ) -> Result<TriggerCategory> {
        let created: CategoryEnvelope = send_json(
            self.client
                .post(self.endpoint("trigger_categories"))
                .json(payload),
        )
        .await?;
        Ok(created.trigger_category)
    }

    async fn list_triggers(&self) -> Result<Vec<Trigger>> {
        let list: TriggerList = send_json(self.client.get(self.endpoint("triggers"))).await?;
        Ok(list.triggers)
    }

    async fn create_trigger(&self, payload: &serde_json::Value) -> Result<Trigger> {
        let created: TriggerEnvelope =
            send_json(self.client.post(self.endpoint("triggers")).json(payload)).await?;
        Ok(created.trigger)
    }

    async fn update_trigger(&self, id: &str, payload: &serde_json::Value) -> Result<Trigger> {
        let updated: TriggerEnvelope = send_json(
            self.client
                .put(self.endpoint(&format!("triggers/{}", id)))
                .json(payload),
        )
        .await?;
        Ok(updated.trigger)
    }
}
