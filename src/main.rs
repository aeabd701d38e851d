use actix_web::web::{self, Data, FormConfig, JsonConfig, PathConfig, QueryConfig};
use actix_web::{App, HttpServer, ResponseError};
use mongodb::Client;
use tracing::{info, Level};
use tracing_actix_web::TracingLogger;
use tracing_subscriber::fmt::format::FmtSpan;

mod campaign;
mod database;
mod district;
mod error;
mod geometry;
mod identity;
mod seed;
mod target_area;
mod typedid;

use error::Error;

use crate::database::MongoDatabase;

#[actix_web::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_span_events(FmtSpan::NEW)
        .compact()
        .init();

    let uri = std::env::var("WRAPADS_MONGODB_URI")
        .unwrap_or_else(|_| "mongodb://localhost:27017".to_string());
    info!("connecting to db: {}", uri);
    let db = MongoDatabase::new(Client::with_uri_str(&uri).await?.database("wrapads"));

    seed::seed(&db).await?;
    db.create_indexes().await?;

    HttpServer::new(move || {
        App::new()
            .app_data(JsonConfig::default().error_handler(|err, _req| {
                // format json errors with custom format
                Error::InvalidJson(err).into()
            }))
            .app_data(PathConfig::default().error_handler(|err, _req| {
                // format path errors with custom format
                Error::InvalidPath(err).into()
            }))
            .app_data(FormConfig::default().error_handler(|err, _req| {
                // format form errors with custom format
                Error::InvalidForm(err).into()
            }))
            .app_data(QueryConfig::default().error_handler(|err, _req| {
                // format query errors with custom format
                Error::InvalidQuery(err).into()
            }))
            .app_data(Data::new(db.clone()))
            .wrap(TracingLogger::default())
            .service(campaign::endpoints::create_campaign)
            .service(campaign::endpoints::get_campaigns)
            .service(campaign::endpoints::get_campaign_by_id)
            .service(district::endpoints::get_districts)
            .service(district::endpoints::get_districts_by_city)
            .service(district::endpoints::get_district_by_id)
            .service(district::endpoints::check_point_in_district)
            .service(target_area::endpoints::create_target_area)
            .service(target_area::endpoints::get_target_areas_in_campaign)
            .service(target_area::endpoints::check_point_in_target_areas)
            .service(target_area::endpoints::get_target_area_by_id)
            .service(target_area::endpoints::update_target_area)
            .service(target_area::endpoints::delete_target_area)
            .default_service(web::to(|| async { Error::PathDoesNotExist.error_response() }))
    })
    .bind("127.0.0.1:8080")?
    .run()
    .await?;

    Ok(())
}
