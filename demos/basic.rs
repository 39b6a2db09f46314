use std::sync::Arc;

use tracing::{error, info, warn};
use tracing_mongo_sink::{handler::MongoHandler, init::init_tracing, mongo::MongoConfig};

fn main() {
    // Requires a MongoDB server on localhost:27017. Documents land in
    // the `logs` collection of the `logs` database.
    let handler =
        MongoHandler::new(MongoConfig::default()).expect("failed to build mongo log handler");

    init_tracing(Arc::new(handler));

    info!("basic example started");
    warn!(free_mb = 412, "disk space getting low");
    error!(error_code = 123, "simulated error persisted to MongoDB");
}
