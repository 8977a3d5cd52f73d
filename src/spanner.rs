use anyhow::{Context, Result};
use async_trait::async_trait;
use gcloud_gax::grpc::Code;
use gcloud_googleapis::spanner::admin::database::v1::{
    CreateDatabaseRequest, GetDatabaseDdlRequest, GetDatabaseRequest, UpdateDatabaseDdlRequest,
};
use gcloud_googleapis::spanner::admin::instance::v1::{
    CreateInstanceRequest, GetInstanceRequest, Instance,
};
use gcloud_spanner::admin::client::Client as AdminClient;
use gcloud_spanner::admin::AdminClientConfig;
use gcloud_spanner::client::{Client, ClientConfig};
use gcloud_spanner::key::Key;
use gcloud_spanner::mutation::{delete, insert, insert_or_update};
use gcloud_spanner::statement::Statement;
use gcloud_spanner::value::CommitTimestamp;
use std::sync::Arc;

use crate::config::SpannerConfig;
use crate::store::{generate_document_id, Document, DocumentStore};

const DOCUMENTS_TABLE: &str = "documents";
const CHILD_DOCUMENTS_TABLE: &str = "child_documents";

const CREATE_DOCUMENTS_DDL: &str = r#"
CREATE TABLE documents (
    collection STRING(1024) NOT NULL,
    id STRING(1024) NOT NULL,
    data JSON NOT NULL,
    created_at TIMESTAMP NOT NULL OPTIONS (allow_commit_timestamp=true),
    updated_at TIMESTAMP NOT NULL OPTIONS (allow_commit_timestamp=true),
) PRIMARY KEY (collection, id)
"#;

// Not interleaved in `documents`: children may exist under an absent parent.
const CREATE_CHILD_DOCUMENTS_DDL: &str = r#"
CREATE TABLE child_documents (
    collection STRING(1024) NOT NULL,
    parent_id STRING(1024) NOT NULL,
    subcollection STRING(1024) NOT NULL,
    id STRING(1024) NOT NULL,
    data JSON NOT NULL,
    created_at TIMESTAMP NOT NULL OPTIONS (allow_commit_timestamp=true),
) PRIMARY KEY (collection, parent_id, subcollection, id)
"#;

/// Shareable Spanner-backed document store for use across async handlers
#[derive(Clone)]
pub struct SpannerStore {
    inner: Arc<Client>,
}

impl SpannerStore {
    /// Create a new Spanner client from configuration
    ///
    /// The gcloud-spanner library detects the SPANNER_EMULATOR_HOST
    /// environment variable and connects to the emulator when set, or
    /// production Spanner otherwise.
    ///
    /// The instance, database and both document tables are created first
    /// if they don't exist.
    pub async fn from_config(config: &SpannerConfig) -> Result<Self> {
        auto_provision(config).await?;

        let database_path = config.database_path();

        match &config.emulator_host {
            Some(host) => tracing::info!("Connecting to Spanner emulator at: {}", host),
            None => tracing::info!("Connecting to production Spanner"),
        }

        let client = Client::new(&database_path, ClientConfig::default())
            .await
            .context("Failed to create Spanner client")?;

        tracing::info!(
            "Successfully connected to Spanner database: {}",
            database_path
        );

        Ok(Self {
            inner: Arc::new(client),
        })
    }

    /// Run a query whose rows carry a single `data` JSON column
    async fn query_documents(&self, statement: Statement) -> Result<Vec<Document>> {
        let mut tx = self.inner
            .single()
            .await
            .context("Failed to create read transaction")?;

        let mut result_set = tx
            .query(statement)
            .await
            .context("Failed to query documents from Spanner")?;

        let mut documents = Vec::new();
        while let Some(row) = result_set.next().await? {
            let data_str: String = row.column_by_name("data")?;
            let document: Document = serde_json::from_str(&data_str)
                .context("Failed to deserialize JSON document")?;
            documents.push(document);
        }
        Ok(documents)
    }
}

#[async_trait]
impl DocumentStore for SpannerStore {
    async fn get(&self, collection: &str, key: &str) -> Result<Option<Document>> {
        let mut statement = Statement::new(
            "SELECT data FROM documents WHERE collection = @collection AND id = @id"
        );
        statement.add_param("collection", &collection.to_string());
        statement.add_param("id", &key.to_string());

        let document = self.query_documents(statement).await?.into_iter().next();
        tracing::debug!("Read {}/{} (found: {})", collection, key, document.is_some());
        Ok(document)
    }

    /// Both timestamps are rewritten on every overwrite; the row is
    /// replaced as a whole, matching the document's full-replace semantics.
    async fn set(&self, collection: &str, key: &str, value: Document) -> Result<()> {
        let data_str = serde_json::to_string(&value)
            .context("Failed to serialize JSON document")?;

        let mutation = insert_or_update(
            DOCUMENTS_TABLE,
            &["collection", "id", "data", "created_at", "updated_at"],
            &[
                &collection.to_string(),
                &key.to_string(),
                &data_str,
                &CommitTimestamp::new(),
                &CommitTimestamp::new(),
            ],
        );

        self.inner
            .apply(vec![mutation])
            .await
            .context("Failed to write document to Spanner")?;

        tracing::debug!("Wrote {}/{}", collection, key);
        Ok(())
    }

    async fn list_children(
        &self,
        collection: &str,
        parent_key: &str,
        subcollection: &str,
    ) -> Result<Vec<Document>> {
        let mut statement = Statement::new(
            "SELECT data FROM child_documents \
             WHERE collection = @collection AND parent_id = @parent_id AND subcollection = @subcollection"
        );
        statement.add_param("collection", &collection.to_string());
        statement.add_param("parent_id", &parent_key.to_string());
        statement.add_param("subcollection", &subcollection.to_string());

        let documents = self.query_documents(statement).await?;
        tracing::debug!(
            "Listed {} documents in {}/{}/{}",
            documents.len(),
            collection,
            parent_key,
            subcollection
        );
        Ok(documents)
    }

    async fn create_child(
        &self,
        collection: &str,
        parent_key: &str,
        subcollection: &str,
        value: Document,
    ) -> Result<String> {
        let id = generate_document_id();
        let data_str = serde_json::to_string(&value)
            .context("Failed to serialize JSON document")?;

        let mutation = insert(
            CHILD_DOCUMENTS_TABLE,
            &["collection", "parent_id", "subcollection", "id", "data", "created_at"],
            &[
                &collection.to_string(),
                &parent_key.to_string(),
                &subcollection.to_string(),
                &id,
                &data_str,
                &CommitTimestamp::new(),
            ],
        );

        self.inner
            .apply(vec![mutation])
            .await
            .context("Failed to insert child document into Spanner")?;

        tracing::debug!("Created {}/{}/{}/{}", collection, parent_key, subcollection, id);
        Ok(id)
    }

    async fn delete_child(
        &self,
        collection: &str,
        parent_key: &str,
        subcollection: &str,
        child_key: &str,
    ) -> Result<()> {
        // Spanner deletes of a missing key succeed without effect
        let key = Key::composite(&[
            &collection.to_string(),
            &parent_key.to_string(),
            &subcollection.to_string(),
            &child_key.to_string(),
        ]);

        self.inner
            .apply(vec![delete(CHILD_DOCUMENTS_TABLE, key)])
            .await
            .context("Failed to delete child document from Spanner")?;

        tracing::debug!("Deleted {}/{}/{}/{}", collection, parent_key, subcollection, child_key);
        Ok(())
    }

    /// Executes `SELECT 1` to verify the connection is alive
    async fn health_check(&self) -> Result<()> {
        let statement = Statement::new("SELECT 1");

        let mut tx = self.inner
            .single()
            .await
            .context("Failed to create health check transaction")?;

        let mut result_set = tx
            .query(statement)
            .await
            .context("Failed to execute health check query")?;

        if result_set.next().await?.is_some() {
            tracing::debug!("Health check query succeeded");
            Ok(())
        } else {
            Err(anyhow::anyhow!("Health check query returned no results"))
        }
    }
}

/// Automatically provision Spanner instance, database, and tables
///
/// Checks that the configured resources exist and creates them if needed,
/// so local development against the emulator needs no setup.
async fn auto_provision(config: &SpannerConfig) -> Result<()> {
    tracing::info!("Starting auto-provisioning checks...");

    let admin_client = AdminClient::new(AdminClientConfig::default())
        .await
        .context("Failed to create Spanner admin client")?;

    let project_path = format!("projects/{}", config.project);
    let instance_path = format!("{}/instances/{}", project_path, config.instance);
    let database_path = config.database_path();

    ensure_instance_exists(&admin_client, config, &project_path, &instance_path).await?;
    ensure_database_exists(&admin_client, &instance_path, &database_path).await?;
    ensure_tables_exist(&admin_client, &database_path).await?;

    tracing::info!("Auto-provisioning complete");
    Ok(())
}

async fn ensure_instance_exists(
    admin_client: &AdminClient,
    config: &SpannerConfig,
    project_path: &str,
    instance_path: &str,
) -> Result<()> {
    let get_request = GetInstanceRequest {
        name: instance_path.to_string(),
        field_mask: None,
    };

    match admin_client.instance().get_instance(get_request, None).await {
        Ok(_) => {
            tracing::info!("Instance already exists: {}", instance_path);
            Ok(())
        }
        Err(status) if status.code() == Code::NotFound => {
            tracing::info!("Instance not found, creating: {}", instance_path);

            let instance_config = if config.emulator_host.is_some() {
                format!("{}/instanceConfigs/emulator-config", project_path)
            } else {
                format!("{}/instanceConfigs/regional-us-central1", project_path)
            };

            let create_request = CreateInstanceRequest {
                parent: project_path.to_string(),
                instance_id: config.instance.clone(),
                instance: Some(Instance {
                    name: instance_path.to_string(),
                    config: instance_config,
                    display_name: format!("{} instance", config.instance),
                    node_count: 1,
                    ..Default::default()
                }),
            };

            let mut operation = admin_client
                .instance()
                .create_instance(create_request, None)
                .await
                .context("Failed to start instance creation")?;

            operation
                .wait(None)
                .await
                .context("Failed to create instance")?;

            tracing::info!("Instance created successfully: {}", instance_path);
            Ok(())
        }
        Err(e) => Err(anyhow::anyhow!(
            "Failed to check instance existence: {}",
            e.message()
        )),
    }
}

async fn ensure_database_exists(
    admin_client: &AdminClient,
    instance_path: &str,
    database_path: &str,
) -> Result<()> {
    let get_request = GetDatabaseRequest {
        name: database_path.to_string(),
    };

    match admin_client
        .database()
        .get_database(get_request, None)
        .await
    {
        Ok(_) => {
            tracing::info!("Database already exists: {}", database_path);
            Ok(())
        }
        Err(status) if status.code() == Code::NotFound => {
            tracing::info!("Database not found, creating: {}", database_path);

            let database_id = database_path
                .split('/')
                .next_back()
                .context("Invalid database path")?;

            let create_request = CreateDatabaseRequest {
                parent: instance_path.to_string(),
                create_statement: format!("CREATE DATABASE `{}`", database_id),
                extra_statements: vec![],
                encryption_config: None,
                database_dialect: 1, // Google Standard SQL
                proto_descriptors: vec![],
            };

            let mut operation = admin_client
                .database()
                .create_database(create_request, None)
                .await
                .context("Failed to start database creation")?;

            operation
                .wait(None)
                .await
                .context("Failed to create database")?;

            tracing::info!("Database created successfully: {}", database_path);
            Ok(())
        }
        Err(e) => Err(anyhow::anyhow!(
            "Failed to check database existence: {}",
            e.message()
        )),
    }
}

/// DDL statements for whichever document tables are missing
fn missing_table_ddl(existing: &[String]) -> Vec<String> {
    [
        (DOCUMENTS_TABLE, CREATE_DOCUMENTS_DDL),
        (CHILD_DOCUMENTS_TABLE, CREATE_CHILD_DOCUMENTS_DDL),
    ]
    .into_iter()
    .filter(|(table, _)| {
        let plain = format!("CREATE TABLE {} ", table);
        let quoted = format!("CREATE TABLE `{}`", table);
        !existing
            .iter()
            .any(|stmt| stmt.contains(&plain) || stmt.contains(&quoted))
    })
    .map(|(_, ddl)| ddl.trim().to_string())
    .collect()
}

async fn ensure_tables_exist(admin_client: &AdminClient, database_path: &str) -> Result<()> {
    let get_ddl_request = GetDatabaseDdlRequest {
        database: database_path.to_string(),
    };

    let ddl_response = admin_client
        .database()
        .get_database_ddl(get_ddl_request, None)
        .await
        .context("Failed to get database DDL")?;

    let statements = missing_table_ddl(&ddl_response.into_inner().statements);

    if statements.is_empty() {
        tracing::info!("Document tables already exist");
        return Ok(());
    }

    tracing::info!("Creating {} missing document table(s)...", statements.len());

    let update_request = UpdateDatabaseDdlRequest {
        database: database_path.to_string(),
        statements,
        operation_id: String::new(),
        proto_descriptors: vec![],
        throughput_mode: false,
    };

    let mut operation = admin_client
        .database()
        .update_database_ddl(update_request, None)
        .await
        .context("Failed to start table creation")?;

    operation
        .wait(None)
        .await
        .context("Failed to create document tables")?;

    tracing::info!("Document tables created successfully");
    Ok(())
}
