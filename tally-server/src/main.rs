#[macro_use]
extern crate tracing;
extern crate serde_json;

use std::error::Error;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use actix_cors::Cors;
use actix_web::error::JsonPayloadError;
use actix_web::web::Data;
use actix_web::{web, App};
use actix_web::{HttpResponse, HttpServer};
use anyhow::Context;
use rustls::{Certificate, PrivateKey, ServerConfig};
use rustls_pemfile::{certs, pkcs8_private_keys};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry;

use tally_lib::auth::{self, password, SessionAuth};
use tally_lib::config::{Config, DefaultUserConfig};
use tally_lib::{budget, dashboard, health, transaction, user};
use tally_repo::session_repo::SessionRepo;
use tally_repo::user_repo::{NewUser, UserRepo, UserRepoError};

#[actix_web::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let subscriber = registry::Registry::default()
        .with(LevelFilter::INFO)
        .with(tracing_subscriber::fmt::Layer::default());
    tracing::subscriber::set_global_default(subscriber).expect("set up subscriber");
    info!("tracing initialized");

    let config = match get_config_file() {
        Ok(path) => Config::from_file(path)?,
        Err(_) => Config::from_env().context("no config file found and environment incomplete")?,
    };

    let (transaction_repo, budget_repo, user_repo, session_repo, health_check) =
        tally_repo::sqlx_repo::create_repos(&config.database_url, 10).await?;

    if let Some(seed) = &config.default_user {
        seed_default_user(&user_repo, seed).await?;
    }

    spawn_session_sweeper(
        session_repo.clone(),
        Duration::from_secs(config.session.sweep_interval_minutes * 60),
    );

    let session_auth = SessionAuth::new(session_repo.clone());
    let session_config = config.session;
    let signups_enabled = config.signups_enabled;
    let cors_allowed_origin = config.cors_allowed_origin.clone();

    let mut server = HttpServer::new(move || {
        let cors = match &cors_allowed_origin {
            Some(origin) => Cors::default()
                .allowed_origin(origin)
                .allow_any_method()
                .allow_any_header()
                .supports_credentials(),
            None => Cors::default(),
        };
        App::new()
            .app_data(Data::new(transaction_repo.clone()))
            .app_data(Data::new(budget_repo.clone()))
            .app_data(Data::new(user_repo.clone()))
            .app_data(Data::new(session_repo.clone()))
            .app_data(Data::new(health_check.clone()))
            .app_data(Data::new(session_config))
            .wrap(cors)
            .wrap(tally_lib::tracing::create_middleware())
            .service(transaction::transaction_service().wrap(session_auth.clone()))
            .service(budget::budget_service().wrap(session_auth.clone()))
            .service(dashboard::dashboard_service().wrap(session_auth.clone()))
            .service(user::user_service().wrap(session_auth.clone()))
            .service(auth::auth_service(signups_enabled))
            .service(health::health_service())
            .app_data(web::JsonConfig::default().error_handler(|err, req| {
                error!(req_path = req.path(), %err);
                match err {
                    JsonPayloadError::Deserialize(deserialize_err) => {
                        let error_body = serde_json::json!({
                            "error": "Missing or invalid fields in JSON payload",
                            "detail": format!("{}", deserialize_err),
                        });
                        actix_web::error::InternalError::from_response(
                            deserialize_err,
                            HttpResponse::BadRequest()
                                .content_type("application/json")
                                .body(error_body.to_string()),
                        )
                        .into()
                    }
                    _ => err.into(),
                }
            }))
            .app_data(web::QueryConfig::default().error_handler(|err, req| {
                error!(req_path = req.path(), %err);
                let error_body = serde_json::json!({
                    "error": "Invalid query parameters",
                    "detail": format!("{}", err),
                });
                actix_web::error::InternalError::from_response(
                    err,
                    HttpResponse::BadRequest()
                        .content_type("application/json")
                        .body(error_body.to_string()),
                )
                .into()
            }))
    });
    server = match config.ssl {
        None => {
            warn!("Using http");
            server.bind("0.0.0.0:8000")?
        }
        Some(ssl_config) => {
            info!("Using https");

            let tls_config = ServerConfig::builder()
                .with_safe_defaults()
                .with_no_client_auth();

            let mut cert_file = BufReader::new(
                File::open(ssl_config.certificate_chain_file)
                    .context("Error opening certificate chain file")?,
            );
            let mut key_file = BufReader::new(
                File::open(ssl_config.private_key_file)
                    .context("Error opening private key file")?,
            );

            let cert_chain = certs(&mut cert_file)
                .context("Unable to read certificate chain file")?
                .into_iter()
                .map(Certificate)
                .collect();
            let mut keys: Vec<PrivateKey> = pkcs8_private_keys(&mut key_file)
                .context("Unable to read private key file")?
                .into_iter()
                .map(PrivateKey)
                .collect();

            if keys.is_empty() {
                error!("No private key found in file");
                std::process::exit(1);
            }

            let tls_config = tls_config.with_single_cert(cert_chain, keys.remove(0))?;

            server.bind_rustls("0.0.0.0:8000", tls_config)?
        }
    };
    server.run().await?;

    Ok(())
}

fn get_config_file() -> Result<PathBuf, &'static str> {
    let config_current_dir = PathBuf::from("config.toml");
    if config_current_dir.exists() {
        return Ok(config_current_dir);
    }
    if let Ok(config_env) = std::env::var("CONFIGURATION_DIRECTORY") {
        let config_path = PathBuf::from(config_env).join("config.toml");
        if config_path.exists() {
            return Ok(config_path);
        }
    }

    Err("Config file not found")
}

async fn seed_default_user(
    user_repo: &Arc<dyn UserRepo>,
    seed: &DefaultUserConfig,
) -> Result<(), anyhow::Error> {
    let password_hash =
        password::encode_password(&seed.password).context("Unable to hash default user password")?;
    match user_repo
        .create_user(NewUser {
            username: seed.username.clone(),
            password_hash,
            email: seed.email.clone(),
        })
        .await
    {
        Ok(user) => {
            info!(username = %seed.username, user_id = user.id, "created default user");
            Ok(())
        }
        Err(UserRepoError::UserAlreadyExists(_)) => {
            debug!(username = %seed.username, "default user already exists");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

/// Periodically reclaims expired session rows; lookups already treat them
/// as missing, so the sweep only bounds table growth.
fn spawn_session_sweeper(session_repo: Arc<dyn SessionRepo>, period: Duration) {
    actix_rt::spawn(async move {
        let mut interval = actix_rt::time::interval(period);
        // the first tick fires immediately
        interval.tick().await;
        loop {
            interval.tick().await;
            match session_repo.delete_expired().await {
                Ok(0) => {}
                Ok(swept) => info!(swept, "swept expired sessions"),
                Err(e) => error!(error = ?e, "session sweep failed"),
            }
        }
    });
}
