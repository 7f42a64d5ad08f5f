use tandem_core::Domain;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DiffError {
    #[error("could not parse {side} {domain} document: {source}")]
    Parse {
        domain: Domain,
        side: &'static str,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("could not serialize {domain} document: {source}")]
    Serialize {
        domain: Domain,
        #[source]
        source: serde_yaml::Error,
    },
}
