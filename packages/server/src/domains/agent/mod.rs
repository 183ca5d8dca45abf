//! Agent domain - chat actions and the plugin that routes messages to them.

pub mod actions;
pub mod plugin;

pub use actions::{
    extract_ens_names, Action, AnalyzeDealsAction, DomainInfoAction, ScrapeListingsAction,
    ValuateDomainAction,
};
pub use plugin::{ens_deals_plugin, ActionReply, Plugin};
