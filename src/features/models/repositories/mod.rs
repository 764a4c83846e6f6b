mod model_repository;

pub use model_repository::{ModelRepository, PgModelRepository, RepositoryError};
