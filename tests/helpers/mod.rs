pub mod library_fixture;
pub mod model_helpers;
