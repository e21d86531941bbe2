pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("graph has self-loops or parallel edges; simplify it first")]
    GraphNotSimple,

    #[error("graph is disconnected; use the multi-component entry point")]
    GraphNotConnected,

    #[error("layout of component {index} failed: {source}")]
    Component {
        index: usize,
        #[source]
        source: Box<Error>,
    },
}
