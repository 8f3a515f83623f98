use chrono::{DateTime, Utc};

/// A registered dog. `picture` is always populated: the creation worker
/// substitutes a fallback reference when the image provider is unavailable.
#[derive(Debug, Clone, PartialEq)]
pub struct Dog {
    pub id: i64,
    pub name: String,
    pub picture: String,
    pub is_adopted: bool,
    pub owner_id: Option<i64>,
    pub create_date: DateTime<Utc>,
}

/// Fields required to insert a dog. Only the creation worker and the
/// internal direct-creation path build one of these.
#[derive(Debug, Clone)]
pub struct NewDog {
    pub name: String,
    pub picture: String,
    pub is_adopted: bool,
    pub owner_id: Option<i64>,
}

/// Partial update applied by name. Absent fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct DogUpdate {
    pub name: Option<String>,
    pub picture: Option<String>,
    pub is_adopted: Option<bool>,
    pub owner_id: Option<i64>,
}

impl DogUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.picture.is_none()
            && self.is_adopted.is_none()
            && self.owner_id.is_none()
    }
}

/// Listing filter. Default selects every dog.
#[derive(Debug, Clone, Copy, Default)]
pub struct DogFilter {
    pub is_adopted: Option<bool>,
}

impl DogFilter {
    pub fn adopted() -> Self {
        Self {
            is_adopted: Some(true),
        }
    }
}
