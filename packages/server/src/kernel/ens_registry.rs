//! ENS subgraph client for single-domain lookups.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::BaseDomainRegistry;

pub const DEFAULT_ENS_SUBGRAPH_URL: &str =
    "https://api.thegraph.com/subgraphs/name/ensdomains/ens";

const DOMAIN_QUERY: &str = r#"
query Domain($name: String!) {
  domains(where: { name: $name }) {
    name
    labelName
    createdAt
    owner { id }
    resolvedAddress { id }
    registration { registrationDate expiryDate }
  }
}
"#;

/// Registry facts about one ENS name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainInfo {
    pub name: String,
    pub label_name: Option<String>,
    pub owner: Option<String>,
    pub resolved_address: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub registered_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl DomainInfo {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.map(|at| at <= now).unwrap_or(false)
    }
}

// GraphQL wire types

#[derive(Deserialize)]
struct GraphQlResponse {
    data: Option<DomainsData>,
    errors: Option<Vec<GraphQlError>>,
}

#[derive(Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Deserialize)]
struct DomainsData {
    domains: Vec<SubgraphDomain>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubgraphDomain {
    name: String,
    label_name: Option<String>,
    created_at: Option<String>,
    owner: Option<AccountRef>,
    resolved_address: Option<AccountRef>,
    registration: Option<Registration>,
}

#[derive(Deserialize)]
struct AccountRef {
    id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Registration {
    registration_date: Option<String>,
    expiry_date: Option<String>,
}

impl From<SubgraphDomain> for DomainInfo {
    fn from(domain: SubgraphDomain) -> Self {
        let (registered_at, expires_at) = match domain.registration {
            Some(reg) => (
                parse_unix(reg.registration_date.as_deref()),
                parse_unix(reg.expiry_date.as_deref()),
            ),
            None => (None, None),
        };

        Self {
            name: domain.name,
            label_name: domain.label_name,
            owner: domain.owner.map(|o| o.id),
            resolved_address: domain.resolved_address.map(|a| a.id),
            created_at: parse_unix(domain.created_at.as_deref()),
            registered_at,
            expires_at,
        }
    }
}

/// Subgraph BigInt timestamps arrive as decimal strings of unix seconds.
fn parse_unix(value: Option<&str>) -> Option<DateTime<Utc>> {
    let secs: i64 = value?.trim().parse().ok()?;
    Utc.timestamp_opt(secs, 0).single()
}

/// GraphQL client for the ENS subgraph
pub struct EnsSubgraphClient {
    client: reqwest::Client,
    endpoint: String,
}

impl EnsSubgraphClient {
    pub fn new(endpoint: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
        }
    }
}

#[async_trait]
impl BaseDomainRegistry for EnsSubgraphClient {
    async fn lookup(&self, name: &str) -> Result<Option<DomainInfo>> {
        let name = name.trim().to_lowercase();
        tracing::debug!(name = %name, "Looking up ENS domain");

        let response = self
            .client
            .post(&self.endpoint)
            .json(&json!({
                "query": DOMAIN_QUERY,
                "variables": { "name": name },
            }))
            .send()
            .await
            .context("ENS subgraph request failed")?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            anyhow::bail!("ENS subgraph error: {} - {}", status, text);
        }

        let body: GraphQlResponse = response
            .json()
            .await
            .context("Failed to decode ENS subgraph response")?;

        if let Some(errors) = body.errors.filter(|e| !e.is_empty()) {
            let messages: Vec<_> = errors.into_iter().map(|e| e.message).collect();
            anyhow::bail!("ENS subgraph query failed: {}", messages.join("; "));
        }

        let domain = body
            .data
            .context("ENS subgraph returned no data")?
            .domains
            .into_iter()
            .next();

        Ok(domain.map(DomainInfo::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_lookup_parses_registration() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({ "variables": { "name": "nick.eth" } })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": { "domains": [{
                    "name": "nick.eth",
                    "labelName": "nick",
                    "createdAt": "1497775154",
                    "owner": { "id": "0xb8c2c29ee19d8307cb7255e1cd9cbde883a267d5" },
                    "resolvedAddress": { "id": "0xb8c2c29ee19d8307cb7255e1cd9cbde883a267d5" },
                    "registration": { "registrationDate": "1580803395", "expiryDate": "2000000000" }
                }]}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = EnsSubgraphClient::new(server.uri());
        let info = client.lookup("Nick.eth").await.unwrap().unwrap();

        assert_eq!(info.label_name.as_deref(), Some("nick"));
        assert_eq!(
            info.owner.as_deref(),
            Some("0xb8c2c29ee19d8307cb7255e1cd9cbde883a267d5")
        );
        assert_eq!(info.expires_at.unwrap().timestamp(), 2_000_000_000);
        assert!(!info.is_expired(Utc.timestamp_opt(1_900_000_000, 0).unwrap()));
        assert!(info.is_expired(Utc.timestamp_opt(2_000_000_001, 0).unwrap()));
    }

    #[tokio::test]
    async fn test_lookup_unknown_name_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "data": { "domains": [] } })),
            )
            .mount(&server)
            .await;

        let client = EnsSubgraphClient::new(server.uri());
        assert!(client.lookup("unregistered-name.eth").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_lookup_surfaces_graphql_errors() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "errors": [{ "message": "indexing error" }]
            })))
            .mount(&server)
            .await;

        let client = EnsSubgraphClient::new(server.uri());
        let err = client.lookup("nick.eth").await.unwrap_err();
        assert!(err.to_string().contains("indexing error"));
    }
}
