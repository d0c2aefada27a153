use std::fmt::{Debug, Display};
use std::io::Error as IoError;

use actix_web::error::{JsonPayloadError, PathError, QueryPayloadError, UrlencodedError};
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use chrono::NaiveDate;
use derivative::Derivative;
use mongodb::bson::ser::Error as BsonError;
use mongodb::error::Error as DatabaseError;
use serde::{Serialize, Serializer};

use crate::campaign::{CampaignId, CampaignStatus};
use crate::user::UserId;

#[derive(Debug, Serialize, Derivative)]
#[derivative(PartialEq, Eq)]
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
    InvalidCampaignName,
    CampaignEndsBeforeStart {
        start_date: NaiveDate,
        end_date: NaiveDate,
    },
    InvalidUserName,
    InvalidEmail {
        email: String,
    },
    PasswordTooShort {
        min_length: usize,
    },

    // 401
    NotAuthenticated,
    InvalidCredentials,

    // 403
    NotPermitted {
        user_id: UserId,
    },

    // 404
    PathNotFound,
    CampaignNotFound {
        campaign_id: CampaignId,
    },
    UserNotFound {
        user_id: UserId,
    },

    // 409
    ConcurrentModificationDetected,
    EmailAlreadyInUse {
        email: String,
    },
    CampaignArchived {
        campaign_id: CampaignId,
    },
    CampaignNotActive {
        campaign_id: CampaignId,
        status: CampaignStatus,
    },

    // 500
    #[serde(serialize_with = "display")]
    FailedDatabaseCall(#[derivative(PartialEq = "ignore")] DatabaseError),
    #[serde(serialize_with = "display")]
    FailedToSerializeToBson(#[derivative(PartialEq = "ignore")] BsonError),
    FailedToHashPassword(String),
    InvalidConfiguration {
        key: String,
        reason: String,
    },
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
            Error::InvalidCampaignName => "E4001004",
            Error::CampaignEndsBeforeStart { .. } => "E4001005",
            Error::InvalidUserName => "E4001006",
            Error::InvalidEmail { .. } => "E4001007",
            Error::PasswordTooShort { .. } => "E4001008",
            Error::NotAuthenticated => "E4011000",
            Error::InvalidCredentials => "E4011001",
            Error::NotPermitted { .. } => "E4031000",
            Error::PathNotFound => "E4041000",
            Error::CampaignNotFound { .. } => "E4041001",
            Error::UserNotFound { .. } => "E4041002",
            Error::ConcurrentModificationDetected => "E4091000",
            Error::EmailAlreadyInUse { .. } => "E4091001",
            Error::CampaignArchived { .. } => "E4091002",
            Error::CampaignNotActive { .. } => "E4091003",
            Error::FailedDatabaseCall(_) => "E5001000",
            Error::FailedToSerializeToBson(_) => "E5001001",
            Error::FailedToHashPassword(_) => "E5001002",
            Error::InvalidConfiguration { .. } => "E5001003",
            Error::IoError(_) => "E5001004",
        }
    }

    pub fn error_message(&self) -> &'static str {
        match self {
            Error::InvalidJson(_) => "The given json could not be parsed",
            Error::InvalidPath(_) => "The given path could not be parsed",
            Error::InvalidForm(_) => "The given form could not be parsed",
            Error::InvalidQuery(_) => "The given query could not be parsed",
            Error::InvalidCampaignName => "The campaign name must not be empty",
            Error::CampaignEndsBeforeStart { .. } => {
                "The campaign end date is before its start date"
            }
            Error::InvalidUserName => "The user name must not be empty",
            Error::InvalidEmail { .. } => "The given email address is not valid",
            Error::PasswordTooShort { .. } => "The given password is too short",
            Error::NotAuthenticated => "The request requires a signed in user",
            Error::InvalidCredentials => "The email or password is incorrect",
            Error::NotPermitted { .. } => "The signed in user may not perform this action",
            Error::PathNotFound => "The requested path was not found",
            Error::CampaignNotFound { .. } => "The requested campaign was not found",
            Error::UserNotFound { .. } => "The requested user was not found",
            Error::ConcurrentModificationDetected => {
                "The server detected a concurrent modification"
            }
            Error::EmailAlreadyInUse { .. } => "The given email address is already in use",
            Error::CampaignArchived { .. } => "The requested campaign is archived",
            Error::CampaignNotActive { .. } => "The requested campaign is not active",
            Error::FailedDatabaseCall(_) => {
                "An error occurred when communicating with the database"
            }
            Error::FailedToSerializeToBson(_) => {
                "An error occurred when serializing an object to bson"
            }
            Error::FailedToHashPassword(_) => "An error occurred when hashing a password",
            Error::InvalidConfiguration { .. } => "The server configuration is invalid",
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
            Error::InvalidCampaignName => StatusCode::BAD_REQUEST,
            Error::CampaignEndsBeforeStart { .. } => StatusCode::BAD_REQUEST,
            Error::InvalidUserName => StatusCode::BAD_REQUEST,
            Error::InvalidEmail { .. } => StatusCode::BAD_REQUEST,
            Error::PasswordTooShort { .. } => StatusCode::BAD_REQUEST,
            Error::NotAuthenticated => StatusCode::UNAUTHORIZED,
            Error::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Error::NotPermitted { .. } => StatusCode::FORBIDDEN,
            Error::PathNotFound => StatusCode::NOT_FOUND,
            Error::CampaignNotFound { .. } => StatusCode::NOT_FOUND,
            Error::UserNotFound { .. } => StatusCode::NOT_FOUND,
            Error::ConcurrentModificationDetected => StatusCode::CONFLICT,
            Error::EmailAlreadyInUse { .. } => StatusCode::CONFLICT,
            Error::CampaignArchived { .. } => StatusCode::CONFLICT,
            Error::CampaignNotActive { .. } => StatusCode::CONFLICT,
            Error::FailedDatabaseCall(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::FailedToSerializeToBson(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::FailedToHashPassword(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::InvalidConfiguration { .. } => StatusCode::INTERNAL_SERVER_ERROR,
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
            Error::IoError(err) => Some(err),
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
