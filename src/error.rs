use std::fmt::{Debug, Display};
use std::io::Error as IoError;

use actix_web::error::{JsonPayloadError, PathError, QueryPayloadError, UrlencodedError};
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use derivative::Derivative;
use mongodb::bson::ser::Error as BsonError;
use mongodb::error::Error as DatabaseError;
use serde::{Serialize, Serializer};

use crate::campaign::CampaignId;
use crate::district::DistrictId;
use crate::identity::AdvertiserId;
use crate::target_area::TargetAreaId;

#[derive(Debug, Serialize, Derivative)]
#[derivative(PartialEq)]
#[serde(untagged)]
pub enum Error {
    // 400
    #[serde(serialize_with = "display")]
    InvalidJson(#[derivative(PartialEq = "ignore")] JsonPayloadError),
    #[serde(serialize_with = "display")]
    InvalidPath(#[derivative(PartialEq = "ignore")] PathError),
    #[serde(serialize_with = "display")]
    InvalidForm(#[derivative(PartialEq = "ignore")] UrlencodedError),
    #[serde(serialize_with = "display")]
    InvalidQuery(#[derivative(PartialEq = "ignore")] QueryPayloadError),
    InvalidGeometry {
        distinct_points: usize,
    },
    InvalidPoint {
        latitude: f64,
        longitude: f64,
    },
    PriorityLevelOutOfRange {
        priority_level: i32,
    },

    // 401
    MissingAdvertiserIdentity,
    InvalidAdvertiserIdentity,

    // 403
    CampaignNotOwnedByAdvertiser {
        campaign_id: CampaignId,
        advertiser_id: AdvertiserId,
    },

    // 404
    PathDoesNotExist,
    CampaignDoesNotExist {
        campaign_id: CampaignId,
    },
    DistrictDoesNotExist {
        district_id: DistrictId,
    },
    TargetAreaDoesNotExist {
        target_area_id: TargetAreaId,
    },

    // 409
    TargetAreaAlreadyExists {
        campaign_id: CampaignId,
        district_id: DistrictId,
    },
    DistrictNotActive {
        district_id: DistrictId,
    },

    // 500
    MalformedGeometry {
        detail: String,
    },
    #[serde(serialize_with = "display")]
    FailedDatabaseCall(#[derivative(PartialEq = "ignore")] DatabaseError),
    #[serde(serialize_with = "display")]
    FailedToSerializeToBson(#[derivative(PartialEq = "ignore")] BsonError),
    #[serde(serialize_with = "display")]
    IoError(#[derivative(PartialEq = "ignore")] IoError),
}

impl Error {
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::InvalidJson(_) => "E4001000",
            Error::InvalidPath(_) => "E4001001",
            Error::InvalidForm(_) => "E4001002",
            Error::InvalidQuery(_) => "E4001003",
            Error::InvalidGeometry { .. } => "E4001004",
            Error::InvalidPoint { .. } => "E4001005",
            Error::PriorityLevelOutOfRange { .. } => "E4001006",
            Error::MissingAdvertiserIdentity => "E4011000",
            Error::InvalidAdvertiserIdentity => "E4011001",
            Error::CampaignNotOwnedByAdvertiser { .. } => "E4031000",
            Error::PathDoesNotExist => "E4041000",
            Error::CampaignDoesNotExist { .. } => "E4041001",
            Error::DistrictDoesNotExist { .. } => "E4041002",
            Error::TargetAreaDoesNotExist { .. } => "E4041003",
            Error::TargetAreaAlreadyExists { .. } => "E4091000",
            Error::DistrictNotActive { .. } => "E4091001",
            Error::MalformedGeometry { .. } => "E5001000",
            Error::FailedDatabaseCall(_) => "E5001001",
            Error::FailedToSerializeToBson(_) => "E5001002",
            Error::IoError(_) => "E5001003",
        }
    }

    pub fn error_message(&self) -> &'static str {
        match self {
            Error::InvalidJson(_) => "The given json could not be parsed",
            Error::InvalidPath(_) => "The given path could not be parsed",
            Error::InvalidForm(_) => "The given form could not be parsed",
            Error::InvalidQuery(_) => "The given query could not be parsed",
            Error::InvalidGeometry { .. } => {
                "A polygon requires at least 3 distinct coordinate pairs in valid range"
            }
            Error::InvalidPoint { .. } => {
                "The given point is outside the valid latitude/longitude range"
            }
            Error::PriorityLevelOutOfRange { .. } => {
                "The priority level must be between 1 and 10"
            }
            Error::MissingAdvertiserIdentity => {
                "The request does not carry an advertiser identity"
            }
            Error::InvalidAdvertiserIdentity => {
                "The request carries an advertiser identity that could not be parsed"
            }
            Error::CampaignNotOwnedByAdvertiser { .. } => {
                "The requested campaign belongs to a different advertiser"
            }
            Error::PathDoesNotExist => "The requested path was not found",
            Error::CampaignDoesNotExist { .. } => "The requested campaign was not found",
            Error::DistrictDoesNotExist { .. } => "The requested district was not found",
            Error::TargetAreaDoesNotExist { .. } => "The requested target area was not found",
            Error::TargetAreaAlreadyExists { .. } => {
                "The requested district is already targeted by the campaign"
            }
            Error::DistrictNotActive { .. } => {
                "The requested district is not currently available for targeting"
            }
            Error::MalformedGeometry { .. } => {
                "A stored polygon could not be decoded"
            }
            Error::FailedDatabaseCall(_) => {
                "An error occurred when communicating with the database"
            }
            Error::FailedToSerializeToBson(_) => {
                "An error occurred when serializing an object to bson"
            }
            Error::IoError(_) => "An error occurred during an I/O operation",
        }
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::InvalidJson(_) => StatusCode::BAD_REQUEST,
            Error::InvalidPath(_) => StatusCode::BAD_REQUEST,
            Error::InvalidForm(_) => StatusCode::BAD_REQUEST,
            Error::InvalidQuery(_) => StatusCode::BAD_REQUEST,
            Error::InvalidGeometry { .. } => StatusCode::BAD_REQUEST,
            Error::InvalidPoint { .. } => StatusCode::BAD_REQUEST,
            Error::PriorityLevelOutOfRange { .. } => StatusCode::BAD_REQUEST,
            Error::MissingAdvertiserIdentity => StatusCode::UNAUTHORIZED,
            Error::InvalidAdvertiserIdentity => StatusCode::UNAUTHORIZED,
            Error::CampaignNotOwnedByAdvertiser { .. } => StatusCode::FORBIDDEN,
            Error::PathDoesNotExist => StatusCode::NOT_FOUND,
            Error::CampaignDoesNotExist { .. } => StatusCode::NOT_FOUND,
            Error::DistrictDoesNotExist { .. } => StatusCode::NOT_FOUND,
            Error::TargetAreaDoesNotExist { .. } => StatusCode::NOT_FOUND,
            Error::TargetAreaAlreadyExists { .. } => StatusCode::CONFLICT,
            Error::DistrictNotActive { .. } => StatusCode::CONFLICT,
            Error::MalformedGeometry { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Error::FailedDatabaseCall(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::FailedToSerializeToBson(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::IoError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        #[derive(Serialize)]
        struct Dummy<'a> {
            error_code: &'static str,
            error_message: &'static str,
            error_meta: &'a Error,
        }

        HttpResponse::build(self.status_code()).json(&Dummy {
            error_code: self.error_code(),
            error_message: self.error_message(),
            error_meta: self,
        })
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        Debug::fmt(self, f)
    }
}

impl From<DatabaseError> for Error {
    fn from(error: DatabaseError) -> Error {
        Error::FailedDatabaseCall(error)
    }
}

impl From<BsonError> for Error {
    fn from(error: BsonError) -> Error {
        Error::FailedToSerializeToBson(error)
    }
}

impl From<IoError> for Error {
    fn from(error: IoError) -> Error {
        Error::IoError(error)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::InvalidJson(err) => Some(err),
            Error::InvalidPath(err) => Some(err),
            Error::InvalidForm(err) => Some(err),
            Error::InvalidQuery(err) => Some(err),
            Error::FailedDatabaseCall(err) => Some(err),
            Error::FailedToSerializeToBson(err) => Some(err),
            _ => None,
        }
    }
}

fn display<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    T: Display,
    S: Serializer,
{
    serializer.collect_str(value)
}
