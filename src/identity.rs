//! Advertiser identity resolution.
//!
//! Authentication happens upstream; the gateway forwards the resolved
//! advertiser as an `X-Advertiser-Id` header (`ADV-<uuid>`). Endpoints that
//! mutate campaign-owned data extract an [`AdvertiserId`] and the managers
//! compare it against the owning campaign's advertiser.

use std::future::{ready, Ready};
use std::str::FromStr;

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};

use crate::error::Error;
use crate::typedid::{TypedId, TypedIdMarker};

pub const ADVERTISER_ID_HEADER: &str = "X-Advertiser-Id";

/// Marker for advertiser ids. Advertiser profiles themselves live in the
/// account service; this service only ever sees their ids.
#[derive(Clone, Debug)]
pub struct Advertiser;

pub type AdvertiserId = TypedId<Advertiser>;

impl TypedIdMarker for Advertiser {
    fn tag() -> &'static str {
        "ADV"
    }
}

impl FromRequest for AdvertiserId {
    type Error = Error;
    type Future = Ready<Result<AdvertiserId, Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let result = match req.headers().get(ADVERTISER_ID_HEADER) {
            Some(value) => value
                .to_str()
                .ok()
                .and_then(|value| AdvertiserId::from_str(value).ok())
                .ok_or(Error::InvalidAdvertiserIdentity),
            None => Err(Error::MissingAdvertiserIdentity),
        };

        ready(result)
    }
}

#[cfg(test)]
mod tests {
    use actix_web::test::TestRequest;

    use super::*;

    #[actix_web::test]
    async fn extracts_a_well_formed_header() {
        let advertiser_id = AdvertiserId::new();
        let req = TestRequest::default()
            .insert_header((ADVERTISER_ID_HEADER, advertiser_id.to_string()))
            .to_http_request();

        let extracted = AdvertiserId::extract(&req).await.unwrap();

        assert_eq!(extracted, advertiser_id);
    }

    #[actix_web::test]
    async fn missing_header_is_rejected() {
        let req = TestRequest::default().to_http_request();

        let result = AdvertiserId::extract(&req).await;

        assert_eq!(result.unwrap_err(), Error::MissingAdvertiserIdentity);
    }

    #[actix_web::test]
    async fn header_with_wrong_tag_is_rejected() {
        let req = TestRequest::default()
            .insert_header((
                ADVERTISER_ID_HEADER,
                "CPN-16E77539-8873-4C8A-BCA3-2036010474AD",
            ))
            .to_http_request();

        let result = AdvertiserId::extract(&req).await;

        assert_eq!(result.unwrap_err(), Error::InvalidAdvertiserIdentity);
    }
}
