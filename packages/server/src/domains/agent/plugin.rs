use anyhow::Result;

use super::actions::{
    Action, AnalyzeDealsAction, DomainInfoAction, ScrapeListingsAction, ValuateDomainAction,
};
use crate::kernel::ServerDeps;

/// Plugin definition handed to the agent runtime
pub struct Plugin {
    pub name: String,
    pub description: String,
    /// Checked in order; the first action that validates handles the message
    pub actions: Vec<Box<dyn Action>>,
}

/// Reply produced by a dispatched action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionReply {
    pub action: &'static str,
    pub text: String,
}

impl Plugin {
    pub fn action_names(&self) -> Vec<&'static str> {
        self.actions.iter().map(|a| a.name()).collect()
    }

    /// Find an action by name or simile (case-insensitive)
    pub fn find_action(&self, name: &str) -> Option<&dyn Action> {
        let wanted = name.trim().to_uppercase();
        self.actions
            .iter()
            .find(|a| a.name() == wanted || a.similes().contains(&wanted.as_str()))
            .map(|a| a.as_ref())
    }

    /// Route a chat message to the first action that accepts it.
    ///
    /// Returns `Ok(None)` when no action applies.
    pub async fn dispatch(&self, message: &str, deps: &ServerDeps) -> Result<Option<ActionReply>> {
        let Some(action) = self.actions.iter().find(|a| a.validate(message)) else {
            tracing::debug!(message = %message, "No action matched message");
            return Ok(None);
        };

        tracing::info!(action = action.name(), "Dispatching agent action");
        let text = action.handle(message, deps).await?;
        Ok(Some(ActionReply {
            action: action.name(),
            text,
        }))
    }
}

/// The ENS deals plugin. Specific lookups come before the broad scrape action.
pub fn ens_deals_plugin() -> Plugin {
    Plugin {
        name: "ens-deals".to_string(),
        description: "Finds ENS domains listed below floor price across marketplaces".to_string(),
        actions: vec![
            Box::new(DomainInfoAction),
            Box::new(ValuateDomainAction),
            Box::new(AnalyzeDealsAction),
            Box::new(ScrapeListingsAction),
        ],
    }
}
