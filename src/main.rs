use actix_cors::Cors;
use actix_web::{
    self, App, HttpServer,
    middleware::{Logger, from_fn},
    web,
};
use std::sync::{Arc, LazyLock};

use crate::{
    configs::{RedisCache, connect_database},
    middlewares::authentication,
    modules::{
        account::{repository_pg::AccountRepositoryPg, service::AccountService},
        relationship::{
            linker::ContactLinkerPg, repository_pg::RelationshipStorePg,
            service::RelationshipService,
        },
    },
};

mod api;
mod configs;
mod constants;
mod middlewares;
mod modules;
mod utils;

pub static ENV: LazyLock<constants::Env> = LazyLock::new(|| {
    dotenvy::dotenv().ok();
    env_logger::init();
    log::info!("Environment variables loaded from .env file");
    constants::Env::default()
});

#[actix_web::get("/")]
async fn health_check() -> &'static str {
    "Server is running"
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let db_pool =
        connect_database().await.map_err(|_| std::io::Error::other("Database connection error"))?;

    let redis_pool =
        RedisCache::new().await.map_err(|_| std::io::Error::other("Redis connection error"))?;

    let account_repo = AccountRepositoryPg::new(db_pool.clone());
    let relationship_store = RelationshipStorePg::new(db_pool.clone());
    let contact_linker = ContactLinkerPg::new(db_pool.clone());

    let account_service =
        AccountService::with_dependencies(Arc::new(account_repo.clone()), Arc::new(redis_pool));
    let relationship_service = RelationshipService::with_dependencies(
        Arc::new(relationship_store),
        Arc::new(account_repo),
    );

    println!("Starting server at http://{}:{}", ENV.ip.as_str(), ENV.port);
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(web::Data::new(account_service.clone()))
            .app_data(web::Data::new(relationship_service.clone()))
            .app_data(web::Data::new(contact_linker.clone()))
            .app_data(web::Data::new(db_pool.clone()))
            .service(health_check)
            .service(
                web::scope("/api")
                    .wrap(from_fn(authentication))
                    .wrap(
                        Cors::default()
                            .allowed_origin(ENV.frontend_url.as_str())
                            .allow_any_method()
                            .allow_any_header()
                            .supports_credentials(),
                    )
                    .configure(modules::account::route::configure)
                    .configure(modules::relationship::route::configure),
            )
    })
    .bind((ENV.ip.as_str(), ENV.port))?
    .workers(2)
    .run()
    .await
}
