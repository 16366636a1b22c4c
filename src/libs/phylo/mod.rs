pub mod error;
pub mod import;
pub mod json;
pub mod node;
pub mod parser;
pub mod tree;

pub use error::TreeError;
pub use node::Node;
pub use tree::Tree;
