use std::error::Error;
use std::fmt;

use tracing_mongo_sink::{
    handler::MongoHandler,
    mongo::MongoConfig,
    record::{LogEvent, MessagePayload},
};

/// Example of persisting a structured error payload by building the event
/// by hand and passing it straight to the handler, without going through
/// `tracing`. Useful on error paths that already hold a typed error.
#[derive(Debug)]
struct ReplicationLag {
    seconds: u64,
    source: std::io::Error,
}

impl fmt::Display for ReplicationLag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "replica is {} seconds behind", self.seconds)
    }
}

impl Error for ReplicationLag {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.source)
    }
}

fn main() {
    // Requires a MongoDB server on localhost:27017.
    let handler =
        MongoHandler::new(MongoConfig::default()).expect("failed to build mongo log handler");

    let err = ReplicationLag {
        seconds: 42,
        source: std::io::Error::other("heartbeat timed out"),
    };

    let event =
        LogEvent::new("ERROR", MessagePayload::from_error(&err)).at("replication", "check_lag", 31);

    handler.emit(&event);
    println!("persisted: {}", event.payload);
}
