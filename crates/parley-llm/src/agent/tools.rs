//! Built-in agent tools

use super::AgentTool;
use super::flow::{AgentAction, AgentFlow, AgentStep};
use anyhow::{Error, anyhow};
use async_trait::async_trait;
use serde_json::{Value, json};
use tracing::debug;

/// Reports the current local time
pub struct ClockTool;

#[async_trait]
impl AgentTool for ClockTool {
    fn name(&self) -> &str {
        "clock"
    }

    fn description(&self) -> &str {
        "gets the current time"
    }

    fn schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {}
        })
    }

    async fn execute(&self, _params: Value) -> Result<Value, Error> {
        let now = chrono::Local::now();
        Ok(Value::String(now.format("%Y-%m-%d %H:%M:%S%.6f").to_string()))
    }
}

/// Produces a browser flow that fills a site's contact form with a name
pub struct ContactFormTool {
    pub site_url: String,
    pub contact_selector: String,
    pub name_selector: String,
}

impl Default for ContactFormTool {
    fn default() -> Self {
        Self {
            site_url: "https://abstracta.us".to_string(),
            contact_selector: r#"xpath://a[@href="./contact-us"]"#.to_string(),
            name_selector: "#fullname".to_string(),
        }
    }
}

#[async_trait]
impl AgentTool for ContactFormTool {
    fn name(&self) -> &str {
        "contact_form"
    }

    fn description(&self) -> &str {
        "navigates to the company site and fills the contact form with the given full name"
    }

    fn schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "full_name": {
                    "type": "string",
                    "description": "Full name to put in the contact form"
                }
            },
            "required": ["full_name"]
        })
    }

    async fn execute(&self, params: Value) -> Result<Value, Error> {
        let full_name = params
            .get("full_name")
            .and_then(|v| v.as_str())
            .ok_or_else(|| anyhow!("Missing 'full_name' parameter"))?;
        debug!("Building contact flow for {}", full_name);

        let flow = AgentFlow {
            steps: vec![
                AgentStep::new(AgentAction::Goto).with_value(&self.site_url),
                AgentStep::new(AgentAction::Click).with_selector(&self.contact_selector),
                AgentStep::new(AgentAction::Fill)
                    .with_selector(&self.name_selector)
                    .with_value(full_name),
                AgentStep::new(AgentAction::Message)
                    .with_value("I have filled the contact form with your name."),
            ],
        };
        Ok(Value::String(flow.to_json()?))
    }

    fn return_direct(&self) -> bool {
        true
    }
}
