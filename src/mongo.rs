use crate::document::LogDocument;
use crate::sink::DocumentSink;
use mongodb::options::{ClientOptions, ServerAddress};
use mongodb::sync::{Client, Collection};
use std::error::Error;

/// Configuration for [`MongoSink`].
///
/// Defaults target a local server and write into the `logs` collection of
/// the `logs` database.
#[derive(Clone, Debug)]
pub struct MongoConfig {
    /// Host name or IP address of the MongoDB server.
    pub host: String,
    /// TCP port of the server.
    pub port: u16,
    /// Database the documents are written to.
    pub database: String,
    /// Collection within the database.
    pub collection: String,
}

impl Default for MongoConfig {
    fn default() -> Self {
        MongoConfig {
            host: "localhost".to_string(),
            port: 27017,
            database: "logs".to_string(),
            collection: "logs".to_string(),
        }
    }
}

/// Error building a [`MongoSink`] from a [`MongoConfig`].
#[derive(thiserror::Error, Debug)]
pub enum BuildError {
    #[error("database and collection names must be non-empty")]
    EmptyName,

    #[error("failed to configure mongodb client: {0}")]
    Client(#[from] mongodb::error::Error),
}

/// MongoDB implementation of [`DocumentSink`] using the driver's blocking
/// API. One insert per document, no batching.
#[derive(Clone)]
pub struct MongoSink {
    collection: Collection<LogDocument>,
}

impl MongoSink {
    /// Build a sink writing into `config.collection` of `config.database`.
    ///
    /// **Parameters**
    /// - `config`: [`MongoConfig`] describing the target server, database
    ///   and collection.
    ///
    /// **Returns**
    /// - A ready-to-use [`MongoSink`]. The driver connects lazily: this
    ///   constructor does not verify that the server is reachable, and
    ///   connectivity errors surface on the first insert instead.
    pub fn connect(config: MongoConfig) -> Result<Self, BuildError> {
        if config.database.is_empty() || config.collection.is_empty() {
            return Err(BuildError::EmptyName);
        }

        let address = ServerAddress::Tcp {
            host: config.host,
            port: Some(config.port),
        };
        let options = ClientOptions::builder().hosts(vec![address]).build();
        let client = Client::with_options(options)?;

        Ok(MongoSink {
            collection: client
                .database(&config.database)
                .collection::<LogDocument>(&config.collection),
        })
    }
}

impl DocumentSink for MongoSink {
    fn insert(&self, document: &LogDocument) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.collection.insert_one(document).run()?;
        Ok(())
    }
}
