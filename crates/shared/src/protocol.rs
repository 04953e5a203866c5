//! Wire format of the randomuser.me profile API. Only the fields the browser
//! consumes are modelled; everything else in the payload is ignored.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Profile, ProfileId};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RandomUserEnvelope {
    Error { error: String },
    Batch(RandomUserResponse),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomUserResponse {
    pub results: Vec<RandomUserRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomUserRecord {
    pub login: LoginPayload,
    pub name: NamePayload,
    pub dob: DobPayload,
    pub location: LocationPayload,
    pub picture: PicturePayload,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginPayload {
    pub uuid: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamePayload {
    pub first: String,
    pub last: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DobPayload {
    pub age: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationPayload {
    pub city: String,
    pub country: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PicturePayload {
    pub large: String,
}

impl From<RandomUserRecord> for Profile {
    fn from(record: RandomUserRecord) -> Self {
        Self {
            id: ProfileId(record.login.uuid),
            first_name: record.name.first,
            last_name: record.name.last,
            age: record.dob.age,
            city: record.location.city,
            country: record.location.country,
            image_url: record.picture.large,
        }
    }
}
