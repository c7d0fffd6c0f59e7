/*!
This crate is a typed client for the rice classification service. [`Client`](struct.Client.html) predicts rice varieties from grain features, fetches 2D projections of the dataset and fetches evaluation metrics for each model. Responses are parsed and validated at the boundary, so a body that does not match the expected shape fails with [`Error::InvalidResponse`](enum.Error.html#variant.InvalidResponse) instead of surfacing later.

The [`features`](features/index.html) module describes the feature groups a prediction request must fill in.
*/

mod client;
mod error;
pub mod features;
mod options;
mod types;

pub use self::client::Client;
pub use self::error::{Error, Result};
pub use self::features::{generate_random_features, FeatureForm, FeatureGroup, FeatureGroups};
pub use self::options::{ClientOptions, DEFAULT_BASE_URL};
pub use self::types::*;
