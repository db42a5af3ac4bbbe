pub mod post;
pub mod source;

pub use post::{
    GraphqlPost, GraphqlResponse, PostDetail, PostReference, SubstackPost, DEFAULT_LIMIT,
};
pub use source::Source;
