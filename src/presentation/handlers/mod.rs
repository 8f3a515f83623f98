mod dogs;
mod health;
mod jobs;
mod users;
mod workers;

pub use dogs::{
    adopted_dogs_handler, create_dog_handler, delete_dog_handler, dog_by_name_handler,
    list_dogs_handler, update_dog_handler, DogResponse,
};
pub use health::health_handler;
pub use jobs::job_status_handler;
pub use users::{
    create_user_handler, delete_user_handler, list_users_handler, update_user_handler,
    user_by_id_handler,
};
pub use workers::worker_status_handler;
