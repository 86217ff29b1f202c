//! Milvus RESTful v2 API client
//!
//! Speaks the `/v2/vectordb` HTTP endpoints of a Milvus standalone server:
//! collection existence/creation/loading, entity counting, bulk insert and
//! vector search.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde::Serialize;
use serde_json::json;
use tracing::debug;

use crate::errors::CourtIqError;
use crate::errors::Result;
use crate::models::CaseRecord;
use crate::models::RetrievedCase;
use crate::store::CollectionClient;

/// Maximum stored length of a case text, mirrored in the collection schema.
const TEXT_MAX_LENGTH: usize = 5000;

/// HTTP client for one Milvus collection.
pub struct MilvusClient {
    base_url: String,
    collection: String,
    client: Client,
}

/// Response envelope shared by all `/v2/vectordb` endpoints.
#[derive(Debug, Deserialize)]
struct MilvusResponse<T> {
    code: i64,
    #[serde(default)]
    message: Option<String>,
    data: Option<T>,
}

#[derive(Debug, Deserialize)]
struct HasCollectionData {
    has: bool,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    text: String,
    year: i64,
}

#[derive(Debug, Serialize)]
struct InsertRow<'a> {
    text: &'a str,
    year: i64,
    embedding: &'a [f32],
}

impl MilvusClient {
    /// Create a client for `collection` on the server at `base_url`
    /// (e.g. `http://localhost:19530`).
    pub fn new(base_url: impl Into<String>, collection: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()?;

        Ok(Self {
            base_url: base_url.into(),
            collection: collection.into(),
            client,
        })
    }

    /// POST a vectordb request and unwrap the response envelope.
    async fn post<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: serde_json::Value,
    ) -> Result<Option<T>> {
        let url = format!("{}/v2/vectordb/{}", self.base_url, path);
        debug!("POST {}", url);

        let response: MilvusResponse<T> = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await?
            .json()
            .await?;

        if response.code != 0 {
            return Err(CourtIqError::Retrieval(format!(
                "milvus {} failed with code {}: {}",
                path,
                response.code,
                response.message.unwrap_or_else(|| "unknown error".to_string())
            )));
        }

        Ok(response.data)
    }
}

#[async_trait]
impl CollectionClient for MilvusClient {
    async fn has_collection(&self) -> Result<bool> {
        let data: Option<HasCollectionData> = self
            .post(
                "collections/has",
                json!({ "collectionName": self.collection }),
            )
            .await?;

        Ok(data.is_some_and(|d| d.has))
    }

    async fn create_collection(&self, dimension: usize) -> Result<()> {
        let body = json!({
            "collectionName": self.collection,
            "schema": {
                "autoId": true,
                "enableDynamicField": false,
                "fields": [
                    {
                        "fieldName": "id",
                        "dataType": "Int64",
                        "isPrimary": true
                    },
                    {
                        "fieldName": "text",
                        "dataType": "VarChar",
                        "elementTypeParams": { "max_length": TEXT_MAX_LENGTH.to_string() }
                    },
                    {
                        "fieldName": "year",
                        "dataType": "Int64"
                    },
                    {
                        "fieldName": "embedding",
                        "dataType": "FloatVector",
                        "elementTypeParams": { "dim": dimension.to_string() }
                    }
                ]
            },
            "indexParams": [
                {
                    "fieldName": "embedding",
                    "indexName": "embedding_index",
                    "metricType": "L2"
                }
            ]
        });

        self.post::<serde_json::Value>("collections/create", body)
            .await?;
        Ok(())
    }

    async fn load_collection(&self) -> Result<()> {
        self.post::<serde_json::Value>(
            "collections/load",
            json!({ "collectionName": self.collection }),
        )
        .await?;
        Ok(())
    }

    async fn entity_count(&self) -> Result<u64> {
        let data: Option<Vec<serde_json::Value>> = self
            .post(
                "entities/query",
                json!({
                    "collectionName": self.collection,
                    "outputFields": ["count(*)"]
                }),
            )
            .await?;

        let count = data
            .unwrap_or_default()
            .first()
            .and_then(|row| row.get("count(*)"))
            .and_then(serde_json::Value::as_u64)
            .unwrap_or(0);

        Ok(count)
    }

    async fn insert(&self, records: &[CaseRecord]) -> Result<()> {
        let rows: Vec<InsertRow> = records
            .iter()
            .map(|r| InsertRow {
                text: &r.text,
                year: r.year,
                embedding: &r.embedding,
            })
            .collect();

        self.post::<serde_json::Value>(
            "entities/insert",
            json!({
                "collectionName": self.collection,
                "data": rows
            }),
        )
        .await?;
        Ok(())
    }

    async fn search(&self, vector: &[f32], limit: usize) -> Result<Vec<RetrievedCase>> {
        let hits: Option<Vec<SearchHit>> = self
            .post(
                "entities/search",
                json!({
                    "collectionName": self.collection,
                    "data": [vector],
                    "annsField": "embedding",
                    "limit": limit,
                    "outputFields": ["text", "year"]
                }),
            )
            .await?;

        Ok(hits
            .unwrap_or_default()
            .into_iter()
            .map(|hit| RetrievedCase {
                text: hit.text,
                year: hit.year,
            })
            .collect())
    }
}
