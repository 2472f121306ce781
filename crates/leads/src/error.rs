#[derive(Debug, thiserror::Error)]
pub enum LeadError {
    #[error("invalid lead client configuration: {0}")]
    Config(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("CRM error ({0}): {1}")]
    Api(u16, String),
    #[error("parse error: {0}")]
    Parse(String),
}
