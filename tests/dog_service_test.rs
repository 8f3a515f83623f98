use std::sync::Arc;

use tokio::sync::mpsc;

use kennel::application::ports::{DogRepository, UserRepository};
use kennel::application::services::{DogService, DogServiceError, UserService, FALLBACK_IMAGE};
use kennel::domain::{CreationRequest, DogUpdate, NewUser, UserUpdate};
use kennel::infrastructure::image::{FixedImageProvider, UnavailableImageProvider};
use kennel::infrastructure::persistence::{InMemoryEntityStore, InMemoryJobRepository};
use kennel::infrastructure::queue::ChannelJobQueue;

const TEST_IMAGE: &str = "https://images.dog.ceo/breeds/pembroke/n02113023_219.jpg";

struct Services {
    dogs: DogService,
    users: UserService,
    // Keeps the queue channel open; these tests never spawn a worker.
    _receiver: mpsc::Receiver<kennel::application::services::WorkerMessage>,
}

fn services(image_available: bool) -> Services {
    let store = Arc::new(InMemoryEntityStore::new());
    let jobs = Arc::new(InMemoryJobRepository::new());
    let (sender, receiver) = mpsc::channel(16);
    let queue = Arc::new(ChannelJobQueue::new(sender, jobs));

    let image: Arc<dyn kennel::application::ports::ImageProvider> = if image_available {
        Arc::new(FixedImageProvider::new(TEST_IMAGE))
    } else {
        Arc::new(UnavailableImageProvider)
    };

    let dogs = DogService::new(
        Arc::clone(&store) as Arc<dyn DogRepository>,
        Arc::clone(&store) as Arc<dyn UserRepository>,
        image,
        queue,
    );
    let users = UserService::new(
        Arc::clone(&store) as Arc<dyn UserRepository>,
        Arc::clone(&store) as Arc<dyn DogRepository>,
    );

    Services {
        dogs,
        users,
        _receiver: receiver,
    }
}

fn creation(name: &str, owner_id: Option<i64>) -> CreationRequest {
    CreationRequest {
        name: name.to_string(),
        is_adopted: false,
        owner_id,
    }
}

fn new_user(email: &str) -> NewUser {
    NewUser {
        name: "Grace".to_string(),
        last_name: "Hopper".to_string(),
        email: email.to_string(),
    }
}

#[tokio::test]
async fn create_direct_uses_the_provider_image() {
    let svc = services(true);

    let dog = svc
        .dogs
        .create_direct(creation("rex", None))
        .await
        .expect("direct creation failed");
    assert_eq!(dog.picture, TEST_IMAGE);

    let stored = svc
        .dogs
        .get_by_name("rex")
        .await
        .expect("lookup failed")
        .expect("dog missing");
    assert_eq!(stored, dog);
}

#[tokio::test]
async fn create_direct_falls_back_when_provider_is_down() {
    let svc = services(false);

    let dog = svc
        .dogs
        .create_direct(creation("luna", None))
        .await
        .expect("direct creation failed");
    assert_eq!(dog.picture, FALLBACK_IMAGE);
}

#[tokio::test]
async fn create_direct_rejects_unknown_owner() {
    let svc = services(true);

    let err = svc
        .dogs
        .create_direct(creation("ghost", Some(7)))
        .await
        .expect_err("creation should fail");
    assert!(matches!(err, DogServiceError::UnknownOwner(7)));
    assert!(svc
        .dogs
        .get_by_name("ghost")
        .await
        .expect("lookup failed")
        .is_none());
}

#[tokio::test]
async fn create_direct_rejects_duplicate_names() {
    let svc = services(true);

    svc.dogs
        .create_direct(creation("twin", None))
        .await
        .expect("first creation failed");
    let err = svc
        .dogs
        .create_direct(creation("twin", None))
        .await
        .expect_err("second creation should fail");
    assert!(matches!(err, DogServiceError::AlreadyExists(_)));
}

#[tokio::test]
async fn submit_creation_pre_checks_existing_names() {
    let svc = services(true);

    svc.dogs
        .create_direct(creation("rex", None))
        .await
        .expect("creation failed");

    let err = svc
        .dogs
        .submit_creation(creation("rex", None))
        .await
        .expect_err("submission should be rejected");
    assert!(matches!(err, DogServiceError::AlreadyExists(_)));
}

#[tokio::test]
async fn update_applies_partial_fields() {
    let svc = services(true);
    svc.dogs
        .create_direct(creation("rex", None))
        .await
        .expect("creation failed");

    let updated = svc
        .dogs
        .update(
            "rex",
            DogUpdate {
                is_adopted: Some(true),
                ..Default::default()
            },
        )
        .await
        .expect("update failed")
        .expect("dog missing");
    assert!(updated.is_adopted);
    assert_eq!(updated.picture, TEST_IMAGE);
    assert_eq!(updated.name, "rex");
}

#[tokio::test]
async fn update_rejects_unknown_owner() {
    let svc = services(true);
    svc.dogs
        .create_direct(creation("rex", None))
        .await
        .expect("creation failed");

    let err = svc
        .dogs
        .update(
            "rex",
            DogUpdate {
                owner_id: Some(99),
                ..Default::default()
            },
        )
        .await
        .expect_err("update should fail");
    assert!(matches!(err, DogServiceError::UnknownOwner(99)));
}

#[tokio::test]
async fn update_missing_dog_returns_none() {
    let svc = services(true);

    let result = svc
        .dogs
        .update(
            "nobody",
            DogUpdate {
                is_adopted: Some(true),
                ..Default::default()
            },
        )
        .await
        .expect("update failed");
    assert!(result.is_none());
}

#[tokio::test]
async fn deleting_a_user_detaches_its_dogs() {
    let svc = services(true);

    let owner = svc
        .users
        .create(new_user("grace@example.com"))
        .await
        .expect("user creation failed");
    let dog = svc
        .dogs
        .create_direct(creation("bran", Some(owner.id)))
        .await
        .expect("dog creation failed");
    assert_eq!(dog.owner_id, Some(owner.id));

    let deleted = svc.users.delete(owner.id).await.expect("delete failed");
    assert!(deleted);

    // The dog survives, detached.
    let stored = svc
        .dogs
        .get_by_name("bran")
        .await
        .expect("lookup failed")
        .expect("dog missing");
    assert_eq!(stored.owner_id, None);
}

#[tokio::test]
async fn user_with_dogs_uses_an_explicit_owner_lookup() {
    let svc = services(true);

    let owner = svc
        .users
        .create(new_user("ada@example.com"))
        .await
        .expect("user creation failed");
    svc.dogs
        .create_direct(creation("bran", Some(owner.id)))
        .await
        .expect("dog creation failed");
    svc.dogs
        .create_direct(creation("rex", None))
        .await
        .expect("dog creation failed");

    let (user, dogs) = svc
        .users
        .get_with_dogs(owner.id)
        .await
        .expect("lookup failed")
        .expect("user missing");
    assert_eq!(user.id, owner.id);
    assert_eq!(dogs.len(), 1);
    assert_eq!(dogs[0].name, "bran");
}

#[tokio::test]
async fn duplicate_emails_are_rejected() {
    let svc = services(true);

    svc.users
        .create(new_user("same@example.com"))
        .await
        .expect("first user failed");
    let err = svc
        .users
        .create(new_user("same@example.com"))
        .await
        .expect_err("second user should fail");
    assert!(matches!(
        err,
        kennel::application::ports::RepositoryError::DuplicateEmail(_)
    ));
}

#[tokio::test]
async fn user_update_refreshes_the_timestamp() {
    let svc = services(true);

    let user = svc
        .users
        .create(new_user("grace@example.com"))
        .await
        .expect("user creation failed");

    let updated = svc
        .users
        .update(
            user.id,
            UserUpdate {
                last_name: Some("Hopper-Murray".to_string()),
                ..Default::default()
            },
        )
        .await
        .expect("update failed")
        .expect("user missing");
    assert_eq!(updated.last_name, "Hopper-Murray");
    assert!(updated.updated_at >= user.updated_at);
}
