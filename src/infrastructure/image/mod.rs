mod dog_api_client;

pub use dog_api_client::{DogApiClient, FixedImageProvider, UnavailableImageProvider};
