use crate::catchers::*;
use crate::configuration::Settings;
use crate::cors::{preflight, Cors};
use crate::email::Email;
use crate::port_saver;
use crate::port_saver::Port;
use crate::routes::*;
use crate::storage::{PublicDisk, PUBLIC_MOUNT};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use rocket::config::LogLevel;
use rocket::data::{Limits, ToByteUnit};
use rocket::fairing::{self, AdHoc};
use rocket::fs::{FileServer, Options};
use rocket::{Build, Ignite, Rocket};
use rocket_sync_db_pools::database;
use secrecy::ExposeSecret;
use std::sync::Arc;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

#[database("hotel_admin")]
pub struct HotelDbConn(diesel::PgConnection);

pub struct Application {
    pub server: Rocket<Ignite>,
    pub port: Port,
}

impl Application {
    pub async fn build(
        configuration: &Settings,
        email_client: Arc<dyn Email>,
    ) -> Result<Application, rocket::Error> {
        let (port_saver, port) = port_saver::create_pair();
        let max_upload = configuration.storage.max_upload_bytes();

        // Body limits sit above the photo limit so oversized photos reach the
        // validation layer instead of being cut off by the form parser.
        let limits = Limits::default()
            .limit("file", (max_upload * 4).bytes())
            .limit("data-form", (max_upload * 4 + 64 * 1024).bytes())
            .limit("json", 1.mebibytes());

        let figment = rocket::Config::figment()
            .merge(("address", configuration.application.host))
            .merge(("port", configuration.application.port.unwrap_or(0)))
            .merge(("log_level", LogLevel::Critical))
            .merge(("limits", limits))
            .merge((
                "databases.hotel_admin.url",
                configuration.database.connection_string().expose_secret().clone(),
            ));

        let disk = PublicDisk::new(
            configuration.storage.public_directory.clone(),
            &configuration.application.base_url,
        );

        rocket::custom(figment)
            .attach(HotelDbConn::fairing())
            .attach(AdHoc::try_on_ignite("Database migrations", run_migrations))
            .attach(Cors::new(&configuration.application.frontend_url))
            .attach(port_saver)
            .manage(email_client)
            .manage(disk)
            .manage(configuration.application.clone())
            .manage(configuration.auth.clone())
            .manage(configuration.storage.clone())
            .mount("/", routes![health_check::health_check, csrf_cookie::csrf_cookie, preflight])
            .mount(
                "/api",
                routes![
                    auth::register::register,
                    auth::login::login,
                    auth::logout::logout,
                    auth::current_user::current_user,
                    upload_photo,
                    forgot_password,
                    reset_password,
                    list_hotels,
                    show_hotel,
                    create_hotel,
                    update_hotel,
                    delete_hotel,
                ],
            )
            .mount(
                PUBLIC_MOUNT,
                FileServer::new(&configuration.storage.public_directory, Options::Missing),
            )
            .register(
                "/",
                catchers![
                    bad_request,
                    unauthorized_request_token,
                    forbidden,
                    not_found,
                    payload_too_large,
                    unsupported_media_type,
                    unprocessable_entity,
                    internal_error,
                    default_catcher,
                ],
            )
            .ignite()
            .await
            .map(|server| Application { server, port })
    }
}

async fn run_migrations(rocket: Rocket<Build>) -> fairing::Result {
    let conn = match HotelDbConn::get_one(&rocket).await {
        Some(conn) => conn,
        None => {
            tracing::error!("No database connection available for migrations.");
            return Err(rocket);
        }
    };
    let outcome = conn
        .run(|c| {
            c.run_pending_migrations(MIGRATIONS)
                .map(|applied| applied.len())
                .map_err(|e| e.to_string())
        })
        .await;
    match outcome {
        Ok(applied) => {
            tracing::info!(applied, "Database migrations are up to date.");
            Ok(rocket)
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to run database migrations.");
            Err(rocket)
        }
    }
}
