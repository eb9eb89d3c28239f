use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Failure taxonomy for the booking core and its HTTP surface.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Administrator data defect; rendering the hall is impossible.
    #[error("malformed hall layout: {0}")]
    MalformedLayout(String),

    /// One or more requested seats were reserved between read and commit.
    /// Recoverable: the caller must re-fetch availability and re-select.
    #[error("seats no longer available: {}", taken.join(", "))]
    SeatConflict { taken: Vec<String> },

    #[error("authentication required")]
    AuthenticationRequired,

    #[error("administrator access required")]
    Forbidden,

    /// Local validation; never reaches the store.
    #[error("no seats selected")]
    EmptySelection,

    /// Requested label does not exist in the hall's layout.
    #[error("unknown seat {0} for this hall")]
    UnknownSeat(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("database error")]
    Database(#[from] sqlx::Error),
}

impl Error {
    fn status(&self) -> StatusCode {
        match self {
            Error::MalformedLayout(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Error::SeatConflict { .. } => StatusCode::CONFLICT,
            Error::AuthenticationRequired => StatusCode::UNAUTHORIZED,
            Error::Forbidden => StatusCode::FORBIDDEN,
            Error::EmptySelection => StatusCode::BAD_REQUEST,
            Error::UnknownSeat(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        if let Error::Database(ref e) = self {
            tracing::error!("database error: {e:?}");
        }

        let status = self.status();
        let body = match &self {
            Error::SeatConflict { taken } => json!({
                "error": self.to_string(),
                "conflicting_seats": taken,
            }),
            _ => json!({ "error": self.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflict_maps_to_409() {
        let err = Error::SeatConflict { taken: vec!["A1".into()] };
        assert_eq!(err.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn auth_maps_to_401() {
        assert_eq!(Error::AuthenticationRequired.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn empty_selection_maps_to_400() {
        assert_eq!(Error::EmptySelection.status(), StatusCode::BAD_REQUEST);
    }
}
