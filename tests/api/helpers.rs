use async_trait::async_trait;
use diesel::prelude::*;
use diesel::PgConnection;
use hotel_admin::configuration::{get_configuration, Settings};
use hotel_admin::domain::EmailAddress;
use hotel_admin::email::Email;
use hotel_admin::startup::Application;
use hotel_admin::telemetry::{get_subscriber, init_subscriber};
use once_cell::sync::Lazy;
use reqwest::multipart::{Form, Part};
use secrecy::ExposeSecret;
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

pub const BASE_URL: &str = "http://hotel-admin.test";
pub const FRONTEND_URL: &str = "http://dashboard.hotel-admin.test";

/// A 1x1 transparent PNG.
pub const PNG_BYTES: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F,
    0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x0A, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x00,
    0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49,
    0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
];

static TRACING: Lazy<()> = Lazy::new(|| {
    let default_filter_level = "info".into();
    let subscriber_name = "test".into();
    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::stdout);
        init_subscriber(subscriber).expect("Failed to install the tracing subscriber.");
    } else {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::sink);
        init_subscriber(subscriber).expect("Failed to install the tracing subscriber.");
    }
});

#[derive(Debug, Clone)]
pub struct SentEmail {
    pub recipient: String,
    pub subject: String,
    pub html: String,
    pub text: String,
}

/// Records outgoing mail instead of sending it.
#[derive(Clone, Default)]
pub struct MockEmailClient {
    sent: Arc<Mutex<Vec<SentEmail>>>,
}

impl MockEmailClient {
    pub fn sent(&self) -> Vec<SentEmail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Email for MockEmailClient {
    async fn send_email(
        &self,
        recipient: &EmailAddress,
        subject: &str,
        html_content: &str,
        text_content: &str,
    ) -> Result<(), anyhow::Error> {
        self.sent.lock().unwrap().push(SentEmail {
            recipient: recipient.as_ref().to_string(),
            subject: subject.to_string(),
            html: html_content.to_string(),
            text: text_content.to_string(),
        });
        Ok(())
    }
}

pub struct TestUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub token: String,
    pub id: i64,
}

pub struct TestApp {
    pub address: String,
    pub db_connection: PgConnection,
    pub storage_root: PathBuf,
    pub email_client: MockEmailClient,
    pub api_client: reqwest::Client,
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with(|_| {}).await
}

/// Spawns the app after letting the test adjust its settings.
pub async fn spawn_app_with(configure: impl FnOnce(&mut Settings)) -> TestApp {
    Lazy::force(&TRACING);

    let storage_root = std::env::temp_dir().join(format!("hotel-admin-{}", Uuid::new_v4()));
    let configuration = {
        let mut c = get_configuration().expect("Failed to read configuration.");
        c.application.port = None;
        c.application.base_url = BASE_URL.into();
        c.application.frontend_url = FRONTEND_URL.into();
        c.database.database_name = Uuid::new_v4().to_string();
        c.storage.public_directory = storage_root.clone();
        configure(&mut c);
        c
    };

    let db_connection = setup_database(&configuration);
    let email_client = MockEmailClient::default();

    let app = Application::build(&configuration, Arc::new(email_client.clone()))
        .await
        .expect("Failed to build the application.");
    let port = app.port;
    let _ = tokio::spawn(app.server.launch());
    let port = port.get().await.expect("The server did not start.");

    TestApp {
        address: format!("http://127.0.0.1:{}", port),
        db_connection,
        storage_root,
        email_client,
        api_client: reqwest::Client::new(),
    }
}

fn setup_database(configuration: &Settings) -> PgConnection {
    let mut connection = PgConnection::establish(
        configuration
            .database
            .connection_string_without_database()
            .expose_secret(),
    )
    .expect("Failed to connect to Postgres.");
    diesel::sql_query(format!(
        r#"CREATE DATABASE "{}";"#,
        configuration.database.database_name
    ))
    .execute(&mut connection)
    .expect("Failed to create the database.");

    PgConnection::establish(configuration.database.connection_string().expose_secret())
        .expect("Failed to connect to Postgres.")
}

const HOTEL_FIELDS: [(&str, &str); 6] = [
    ("name", "Grand Hotel"),
    ("address", "1 Harbour Road, Galway"),
    ("email", "desk@grand-hotel.com"),
    ("phone", "+353 91 000 000"),
    ("price", "120.5"),
    ("currency", "EUR"),
];

/// A multipart hotel form with every field filled in and no photo.
pub fn hotel_form(name: &str) -> Form {
    hotel_form_with("name", name)
}

/// Like [`hotel_form`], with one field replaced.
pub fn hotel_form_with(field: &str, value: &str) -> Form {
    HOTEL_FIELDS.iter().fold(Form::new(), |form, (name, default)| {
        let value = if *name == field { value } else { *default };
        form.text(*name, value.to_string())
    })
}

pub fn png_part() -> Part {
    png_part_of_size(PNG_BYTES.len())
}

/// A PNG upload padded with zeros up to `size` bytes.
pub fn png_part_of_size(size: usize) -> Part {
    let mut bytes = PNG_BYTES.to_vec();
    bytes.resize(size.max(PNG_BYTES.len()), 0);
    Part::bytes(bytes)
        .file_name("photo.png")
        .mime_str("image/png")
        .unwrap()
}

/// Maps a public photo URL back to the file on disk.
pub fn stored_file(app: &TestApp, url: &str) -> PathBuf {
    let prefix = format!("{}/storage/", BASE_URL);
    let relative = url
        .strip_prefix(&prefix)
        .unwrap_or_else(|| panic!("{} is not a public storage URL", url));
    app.storage_root.join(relative)
}

impl TestApp {
    pub async fn post_register(&self, body: &Value) -> reqwest::Response {
        self.api_client
            .post(&format!("{}/api/register", &self.address))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn register_user(&self) -> TestUser {
        let name = "Ursula Le Guin".to_string();
        let email = format!("{}@example.com", Uuid::new_v4());
        let password = Uuid::new_v4().to_string();
        let response = self
            .post_register(&json!({
                "name": name,
                "email": email,
                "password": password,
                "password_confirmation": password,
            }))
            .await;
        assert_eq!(201, response.status().as_u16());
        let body: Value = response.json().await.unwrap();
        TestUser {
            name,
            email,
            password,
            token: body["token"].as_str().unwrap().to_string(),
            id: body["user"]["id"].as_i64().unwrap(),
        }
    }

    pub async fn post_login(&self, body: &Value) -> reqwest::Response {
        self.api_client
            .post(&format!("{}/api/login", &self.address))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_logout(&self, token: &str) -> reqwest::Response {
        self.api_client
            .post(&format!("{}/api/logout", &self.address))
            .bearer_auth(token)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn get_user(&self, token: &str) -> reqwest::Response {
        self.api_client
            .get(&format!("{}/api/user", &self.address))
            .bearer_auth(token)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_upload_photo(&self, token: &str, form: Form) -> reqwest::Response {
        self.api_client
            .post(&format!("{}/api/upload-photo", &self.address))
            .bearer_auth(token)
            .multipart(form)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_forgot_password(&self, body: &Value) -> reqwest::Response {
        self.api_client
            .post(&format!("{}/api/forgot-password", &self.address))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_reset_password(&self, body: &Value) -> reqwest::Response {
        self.api_client
            .post(&format!("{}/api/reset-password", &self.address))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn get_hotels(&self, token: &str) -> reqwest::Response {
        self.api_client
            .get(&format!("{}/api/hotels", &self.address))
            .bearer_auth(token)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn get_hotel(&self, token: &str, id: i64) -> reqwest::Response {
        self.api_client
            .get(&format!("{}/api/hotels/{}", &self.address, id))
            .bearer_auth(token)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_hotel(&self, token: &str, form: Form) -> reqwest::Response {
        self.api_client
            .post(&format!("{}/api/hotels", &self.address))
            .bearer_auth(token)
            .multipart(form)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    /// Creates a hotel and returns its JSON.
    pub async fn create_hotel(&self, token: &str, form: Form) -> Value {
        let response = self.post_hotel(token, form).await;
        assert_eq!(201, response.status().as_u16());
        response.json().await.unwrap()
    }

    pub async fn put_hotel(&self, token: &str, id: i64, form: Form) -> reqwest::Response {
        self.api_client
            .put(&format!("{}/api/hotels/{}", &self.address, id))
            .bearer_auth(token)
            .multipart(form)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn delete_hotel(&self, token: &str, id: i64) -> reqwest::Response {
        self.api_client
            .delete(&format!("{}/api/hotels/{}", &self.address, id))
            .bearer_auth(token)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    /// Pulls the single link out of an email body.
    pub fn get_reset_link(&self, email: &SentEmail) -> reqwest::Url {
        let links: Vec<_> = linkify::LinkFinder::new()
            .links(&email.text)
            .filter(|l| *l.kind() == linkify::LinkKind::Url)
            .collect();
        assert_eq!(links.len(), 1);
        reqwest::Url::parse(links[0].as_str()).unwrap()
    }
}
